//! # Vectors in 3D reference frames
//!
//! Symbolic 3-component vectors tied to a named Cartesian reference frame, with the usual
//! products, angles between vectors and the vector equations of lines and planes.
//!
//! ## Main Structures
//! - `ReferenceFrame`: name of the frame, its basis labels and coordinate symbols
//! - `FrameVector`: components along the frame basis, stored as an `ExprVector`
//!
//! Operations combining two vectors check that both live in the same frame and return
//! `CalculusError::DimensionMismatch` otherwise.
//!
//! # Example
//! ```rust, ignore
//! let n = ReferenceFrame::new("N");
//! let a = vector(&n, 3.0.into(), 4.0.into(), 0.0.into());
//! let b = vector(&n, 2.0.into(), (-1.0).into(), 0.0.into());
//! let cos_ab = angle_between_two_vectors(&a, &b)?; // 2/(5*sqrt(5))
//! ```
use crate::error::CalculusError;
use crate::symbolic::symbolic_engine::{Expr, PI};
use crate::symbolic::symbolic_equation::Equation;
use crate::symbolic::symbolic_solve::solve_linear_system;
use crate::symbolic::symbolic_vectors::ExprVector;
use log::debug;
use nalgebra::DVector;
use std::fmt;

const BASIS: [&str; 3] = ["i", "j", "k"];
const COORDINATES: [&str; 3] = ["x", "y", "z"];

/// Named Cartesian reference frame
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceFrame {
    name: String,
}

impl ReferenceFrame {
    pub fn new(name: &str) -> Self {
        ReferenceFrame {
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// LaTeX labels of the basis vectors, `\mathbf{\hat{i}_{N}}` and so on
    pub fn basis_latex(&self) -> [String; 3] {
        BASIS.map(|b| format!("\\mathbf{{\\hat{{{}}}_{{{}}}}}", b, self.name))
    }

    /// coordinate symbols `x, y, z` of the frame
    pub fn coordinates(&self) -> [Expr; 3] {
        COORDINATES.map(|c| Expr::Var(c.to_string()))
    }

    pub fn i(&self) -> FrameVector {
        vector(self, Expr::Const(1.0), Expr::Const(0.0), Expr::Const(0.0))
    }

    pub fn j(&self) -> FrameVector {
        vector(self, Expr::Const(0.0), Expr::Const(1.0), Expr::Const(0.0))
    }

    pub fn k(&self) -> FrameVector {
        vector(self, Expr::Const(0.0), Expr::Const(0.0), Expr::Const(1.0))
    }

    pub fn zero(&self) -> FrameVector {
        vector(self, Expr::Const(0.0), Expr::Const(0.0), Expr::Const(0.0))
    }
}

/// Vector given by its components along the basis of a reference frame
#[derive(Clone, Debug, PartialEq)]
pub struct FrameVector {
    frame: ReferenceFrame,
    components: ExprVector,
}

impl FrameVector {
    pub fn frame(&self) -> &ReferenceFrame {
        &self.frame
    }

    pub fn components(&self) -> &ExprVector {
        &self.components
    }

    fn same_frame(&self, other: &FrameVector) -> Result<(), CalculusError> {
        if self.frame != other.frame {
            return Err(CalculusError::DimensionMismatch(format!(
                "vectors belong to different reference frames {} and {}",
                self.frame.name, other.frame.name
            )));
        }
        Ok(())
    }

    fn with_components(&self, components: ExprVector) -> FrameVector {
        FrameVector {
            frame: self.frame.clone(),
            components,
        }
    }

    pub fn try_add(&self, other: &FrameVector) -> Result<FrameVector, CalculusError> {
        self.same_frame(other)?;
        Ok(self.with_components((self.components.clone() + other.components.clone()).simplify()))
    }

    pub fn try_sub(&self, other: &FrameVector) -> Result<FrameVector, CalculusError> {
        self.same_frame(other)?;
        Ok(self.with_components((self.components.clone() - other.components.clone()).simplify()))
    }

    /// multiplication by a scalar expression
    pub fn scale(&self, scalar: &Expr) -> FrameVector {
        let mut components = self.components.clone();
        components.scale(scalar);
        self.with_components(components)
    }

    pub fn dot(&self, other: &FrameVector) -> Result<Expr, CalculusError> {
        self.same_frame(other)?;
        Ok(self.components.dot(&other.components))
    }

    pub fn cross(&self, other: &FrameVector) -> Result<FrameVector, CalculusError> {
        self.same_frame(other)?;
        Ok(self.with_components(self.components.cross(&other.components)))
    }

    pub fn magnitude(&self) -> Expr {
        self.components.magnitude()
    }

    pub fn is_zero(&self) -> bool {
        self.components.iter().all(|c| c.is_zero())
    }

    pub fn simplify(&self) -> FrameVector {
        self.with_components(self.components.simplify())
    }

    /// numeric components for the given variable values
    pub fn evaluate(&self, vars: &[&str], values: &[f64]) -> Result<DVector<f64>, CalculusError> {
        self.components.evaluate(vars, values)
    }

    pub fn to_latex(&self) -> String {
        let basis = self.frame.basis_latex();
        let terms: Vec<String> = self
            .components
            .iter()
            .zip(basis.iter())
            .filter(|(c, _)| !c.is_zero())
            .map(|(c, b)| match c {
                Expr::Const(v) if *v == 1.0 => b.clone(),
                Expr::Add(..) | Expr::Sub(..) => format!("\\left({}\\right) {}", c.to_latex(), b),
                _ => format!("{} {}", c.to_latex(), b),
            })
            .collect();
        if terms.is_empty() {
            "\\mathbf{0}".to_string()
        } else {
            terms.join(" + ")
        }
    }
}

impl fmt::Display for FrameVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let terms: Vec<String> = self
            .components
            .iter()
            .zip(BASIS.iter())
            .filter(|(c, _)| !c.is_zero())
            .map(|(c, b)| match c {
                Expr::Const(v) if *v == 1.0 => format!("{}.{}", self.frame.name, b),
                Expr::Add(..) | Expr::Sub(..) => format!("({})*{}.{}", c, self.frame.name, b),
                _ => format!("{}*{}.{}", c, self.frame.name, b),
            })
            .collect();
        if terms.is_empty() {
            write!(f, "0")
        } else {
            write!(f, "{}", terms.join(" + "))
        }
    }
}

/// `rx*i + ry*j + rz*k` in `frame`
pub fn vector(frame: &ReferenceFrame, rx: Expr, ry: Expr, rz: Expr) -> FrameVector {
    FrameVector {
        frame: frame.clone(),
        components: ExprVector::new(vec![rx, ry, rz]),
    }
}

/// Vector of given magnitude from its direction angles theta, phi, psi to the x, y and z axes.
/// `psi` defaults to π/2, a vector in the xy-plane.
pub fn vector_cos(
    frame: &ReferenceFrame,
    magnitude: Expr,
    theta: Expr,
    phi: Expr,
    psi: Option<Expr>,
) -> FrameVector {
    let psi = psi.unwrap_or(PI / Expr::Const(2.0));
    let direction = [theta, phi, psi].map(|angle| Expr::cos(angle.boxed()));
    let components = direction
        .into_iter()
        .map(|c| (magnitude.clone() * c).simplify())
        .collect();
    FrameVector {
        frame: frame.clone(),
        components: ExprVector::new(components),
    }
}

/// components of `v` along the basis of `frame`
pub fn vector_to_list(frame: &ReferenceFrame, v: &FrameVector) -> Result<Vec<Expr>, CalculusError> {
    if v.frame != *frame {
        return Err(CalculusError::DimensionMismatch(format!(
            "vector of frame {} requested in frame {}",
            v.frame.name, frame.name
        )));
    }
    Ok(v.components.as_vec())
}

/// `(a_x, a_y, a_z)` component symbols for every name
pub fn create_3d_components(names: &[&str]) -> Vec<[Expr; 3]> {
    names
        .iter()
        .map(|name| COORDINATES.map(|c| Expr::Var(format!("{}_{}", name, c))))
        .collect()
}

/// one vector with symbolic components per name
pub fn create_vectors(frame: &ReferenceFrame, names: &[&str]) -> Vec<FrameVector> {
    create_3d_components(names)
        .into_iter()
        .map(|[x, y, z]| vector(frame, x, y, z))
        .collect()
}

/// cosine of the smallest angle between two vectors, `v1.v2/|v1|/|v2|`
pub fn angle_between_two_vectors(v1: &FrameVector, v2: &FrameVector) -> Result<Expr, CalculusError> {
    let dot = v1.dot(v2)?;
    Ok((dot / v1.magnitude() / v2.magnitude()).simplify())
}

/// smallest angle between two vectors
pub fn angle_between_vectors(v1: &FrameVector, v2: &FrameVector) -> Result<Expr, CalculusError> {
    let cosine = angle_between_two_vectors(v1, v2)?;
    Ok(Expr::arccos(cosine.boxed()).simplify())
}

/// cos(theta) for the angle theta between `v` and `u`, solved from the cosine rule
/// `|v - u|^2 = |u|^2 + |v|^2 - 2|u||v|cos(theta)`
pub fn cosine_of_angle_between_vectors(
    v: &FrameVector,
    u: &FrameVector,
    theta: &str,
) -> Result<Expr, CalculusError> {
    let difference = v.try_sub(u)?;
    let cos_theta = Expr::cos(Expr::Var(theta.to_string()).boxed());
    let cosine_rule = Equation::new(
        difference.dot(&difference)?,
        u.dot(u)? + v.dot(v)?
            - Expr::Const(2.0) * u.magnitude() * v.magnitude() * cos_theta.clone(),
    );
    debug!("cosine rule {}", cosine_rule);
    let solution = solve_linear_system(&[cosine_rule], &[cos_theta])?;
    solution
        .into_iter()
        .next()
        .ok_or_else(|| CalculusError::UnsolvableSystem {
            unknowns: vec![format!("cos({})", theta)],
            reason: "cosine rule has no solution".to_string(),
        })
}

/// `1 - cos^2(theta)` for the angle between two vectors
pub fn square_of_sine_of_angle_between_vectors(
    v: &FrameVector,
    u: &FrameVector,
    theta: &str,
) -> Result<Expr, CalculusError> {
    let cosine = cosine_of_angle_between_vectors(v, u, theta)?;
    Ok((Expr::Const(1.0) - cosine.clone() * cosine).simplify())
}

/// displacement from `start` to `finish`
pub fn vector_line(start: &FrameVector, finish: &FrameVector) -> Result<FrameVector, CalculusError> {
    finish.try_sub(start)
}

/// `start + lambda*(finish - start)`
pub fn vector_line_eqn(
    start: &FrameVector,
    finish: &FrameVector,
    lambda: &str,
) -> Result<FrameVector, CalculusError> {
    let direction = vector_line(start, finish)?.scale(&Expr::Var(lambda.to_string()));
    start.try_add(&direction)
}

/// Plane through three points as the equation `(r - r1).n = 0` in the frame coordinates,
/// with `n = (r2 - r1) x (r3 - r2)`. Returns the equation and the coordinate symbols.
pub fn vector_plane(
    frame: &ReferenceFrame,
    r1: &FrameVector,
    r2: &FrameVector,
    r3: &FrameVector,
) -> Result<(Equation, [Expr; 3]), CalculusError> {
    let normal = vector_line(r1, r2)?.cross(&vector_line(r2, r3)?)?;
    if normal.is_zero() {
        return Err(CalculusError::DimensionMismatch(
            "collinear points do not define a plane".to_string(),
        ));
    }
    let coordinates = frame.coordinates();
    let [x, y, z] = coordinates.clone();
    let r = vector(frame, x, y, z);
    let lhs = r.try_sub(r1)?.dot(&normal)?;
    Ok((Equation::new(lhs, Expr::Const(0.0)), coordinates))
}

/// Laplacian of a scalar field: sum of the second derivatives over `coordinates`
pub fn laplacian(f: &Expr, coordinates: &[&str]) -> Expr {
    coordinates
        .iter()
        .map(|c| f.diff(c).diff(c))
        .fold(Expr::Const(0.0), |acc, d| acc + d)
        .simplify()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn v(frame: &ReferenceFrame, x: f64, y: f64, z: f64) -> FrameVector {
        vector(frame, Expr::Const(x), Expr::Const(y), Expr::Const(z))
    }

    fn parse(s: &str) -> Expr {
        Expr::parse_expression(s).unwrap()
    }

    #[test]
    fn test_vector_display() {
        let n = ReferenceFrame::new("N");
        assert_eq!(n.i().to_string(), "N.i");
        assert_eq!(v(&n, 1.0, 2.0, 3.0).to_string(), "N.i + 2*N.j + 3*N.k");
        assert_eq!(n.zero().to_string(), "0");
        assert_eq!(
            n.j().to_latex(),
            "\\mathbf{\\hat{j}_{N}}"
        );
    }

    #[test]
    fn test_vector_cos() {
        let n = ReferenceFrame::new("N");
        let half_pi = PI / Expr::Const(2.0);
        let along_y = vector_cos(&n, Expr::Const(1.0), half_pi.clone(), Expr::Const(0.0), None);
        assert_eq!(along_y.to_string(), "N.j");
        let along_x = vector_cos(&n, Expr::Const(1.0), Expr::Const(0.0), half_pi, None);
        assert_eq!(along_x, n.i());

        let tilted = vector_cos(
            &n,
            Expr::Const(2.0_f64.sqrt()),
            PI / Expr::Const(4.0),
            PI / Expr::Const(4.0),
            None,
        );
        let values = tilted.evaluate(&[], &[]).unwrap();
        assert_relative_eq!(values[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(values[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(values[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_components() {
        let n = ReferenceFrame::new("N");
        let comps = create_3d_components(&["a", "b"]);
        assert_eq!(comps.len(), 2);
        assert_eq!(comps[1][2], Expr::Var("b_z".to_string()));
        let vs = create_vectors(&n, &["a"]);
        assert_eq!(vs[0].to_string(), "a_x*N.i + a_y*N.j + a_z*N.k");

        let list = vector_to_list(&n, &v(&n, 3.0, 4.0, 0.0)).unwrap();
        assert_eq!(list, vec![Expr::Const(3.0), Expr::Const(4.0), Expr::Const(0.0)]);
        let other = ReferenceFrame::new("A");
        assert!(matches!(
            vector_to_list(&other, &vs[0]),
            Err(CalculusError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_angle_between_two_vectors() {
        let n = ReferenceFrame::new("N");
        let a = v(&n, 3.0, 4.0, 0.0);
        let b = v(&n, 2.0, -1.0, 0.0);
        let cosine = angle_between_two_vectors(&a, &b).unwrap();
        assert_relative_eq!(cosine.as_const().unwrap(), 2.0 / (5.0 * 5.0_f64.sqrt()), epsilon = 1e-12);

        assert!(angle_between_two_vectors(&n.i(), &n.j()).unwrap().is_zero());
        let parallel = angle_between_two_vectors(&v(&n, 1.0, 1.0, 0.0), &v(&n, 2.0, 2.0, 0.0)).unwrap();
        assert_relative_eq!(parallel.as_const().unwrap(), 1.0, epsilon = 1e-12);

        let a = v(&n, 5.0, -2.0, 4.0);
        let b = v(&n, 3.0, 1.0, 7.0);
        let angle = angle_between_vectors(&a, &b).unwrap().as_const().unwrap();
        assert_relative_eq!(angle.to_degrees(), 37.3, epsilon = 0.05);
    }

    #[test]
    fn test_frame_mismatch() {
        let n = ReferenceFrame::new("N");
        let a = ReferenceFrame::new("A");
        assert!(matches!(
            n.i().dot(&a.i()),
            Err(CalculusError::DimensionMismatch(_))
        ));
        assert!(n.i().cross(&a.j()).is_err());
    }

    #[test]
    fn test_cosine_rule() {
        let n = ReferenceFrame::new("N");
        let right = cosine_of_angle_between_vectors(&n.i(), &n.j(), "alpha").unwrap();
        assert!(right.is_zero());
        let diagonal = cosine_of_angle_between_vectors(&n.i(), &v(&n, 1.0, 1.0, 0.0), "alpha").unwrap();
        assert_relative_eq!(diagonal.as_const().unwrap().acos(), std::f64::consts::FRAC_PI_4, epsilon = 1e-10);

        let a = vector_cos(&n, Expr::Const(4.0), PI / Expr::Const(12.0), Expr::Const(5.0) * PI / Expr::Const(12.0), None);
        let b = vector_cos(&n, Expr::Const(8.0), PI / Expr::Const(4.0), PI / Expr::Const(4.0), None);
        let cosine = cosine_of_angle_between_vectors(&a, &b, "alpha").unwrap();
        assert_relative_eq!(cosine.as_const().unwrap().acos(), std::f64::consts::FRAC_PI_6, epsilon = 1e-10);
        let sine_sq = square_of_sine_of_angle_between_vectors(&a, &b, "alpha").unwrap();
        assert_relative_eq!(sine_sq.as_const().unwrap(), 0.25, epsilon = 1e-10);
    }

    #[test]
    fn test_cosine_rule_symbolic_components() {
        let n = ReferenceFrame::new("N");
        let vs = create_vectors(&n, &["a", "b"]);
        let by_rule = cosine_of_angle_between_vectors(&vs[0], &vs[1], "alpha").unwrap();
        let direct = angle_between_two_vectors(&vs[0], &vs[1]).unwrap();
        let vars = ["a_x", "a_y", "a_z", "b_x", "b_y", "b_z"];
        let values = [1.0, 2.0, -1.0, 0.5, 3.0, 2.0];
        assert_relative_eq!(
            by_rule.eval_expression(&vars, &values).unwrap(),
            direct.eval_expression(&vars, &values).unwrap(),
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_vector_line_eqn() {
        let a = ReferenceFrame::new("A");
        let finish = v(&a, 3.0, 4.0, 5.0);
        let line = vector_line_eqn(&a.zero(), &finish, "lambda").unwrap();
        assert_eq!(line.to_string(), "3*lambda*A.i + 4*lambda*A.j + 5*lambda*A.k");

        let start = v(&a, 2.0, -1.0, 0.0);
        let finish = v(&a, 0.0, 4.0, 3.0);
        assert_eq!(vector_line(&start, &finish).unwrap(), v(&a, -2.0, 5.0, 3.0));
        let line = vector_line_eqn(&start, &finish, "lambda").unwrap();
        let comps = line.components();
        assert!(comps[0].is_equivalent(&parse("2 - 2*lambda")));
        assert!(comps[1].is_equivalent(&parse("5*lambda - 1")));
        assert!(comps[2].is_equivalent(&parse("3*lambda")));
    }

    #[test]
    fn test_vector_plane() {
        let n = ReferenceFrame::new("N");
        let (plane, coordinates) = vector_plane(
            &n,
            &v(&n, -1.0, -1.0, -1.0),
            &v(&n, 1.0, 1.0, 1.0),
            &v(&n, 1.0, -1.0, 0.0),
        )
        .unwrap();
        assert_eq!(coordinates[0], Expr::Var("x".to_string()));
        assert!(plane.lhs.is_equivalent(&parse("2*x + 2*y - 4*z")));
        assert!(plane.rhs.is_zero());

        let collinear = vector_plane(&n, &n.zero(), &n.i(), &v(&n, 2.0, 0.0, 0.0));
        assert!(collinear.is_err());
    }

    #[test]
    fn test_laplacian() {
        let f = parse("x^2 + 3*y^2 + 2*x*y + 3*x + 5");
        assert_eq!(laplacian(&f, &["x", "y", "z"]), Expr::Const(8.0));
        let harmonic = parse("x^2 - y^2");
        assert!(laplacian(&harmonic, &["x", "y"]).is_zero());
    }
}
