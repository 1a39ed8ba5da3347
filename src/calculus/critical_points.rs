//! # Critical points of functions of two variables
//!
//! Critical points of z = f(x, y) are the points where fx = fy = 0. They are located with
//! Newton iterations on the gradient started from a grid of seed points and classified with
//! the second derivative test:
//!
//! D = fxx·fyy - fxy²
//! - D > 0, fxx > 0: local minimum
//! - D > 0, fxx < 0: local maximum
//! - D < 0: saddle point
//! - otherwise the test is inconclusive
//!
//! ## Main Structures
//! - `CriticalPointSearch`: seed grid and Newton settings
//! - `ExtremumKind`: outcome of the second derivative test
//!
//! # Example
//! ```rust, ignore
//! let f = Expr::parse_expression("x^3/3 + y^2 + 2*x*y - 6*x - 3*y + 4")?;
//! let points = analyse_critical_points(&f, "x", "y", &CriticalPointSearch::default())?;
//! // [((-1.0, 2.5), SADDLEPOINT), ((3.0, -1.5), LOCAL_MINIMUM)]
//! ```
use crate::error::{CalculusError, Stage};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_vectors::{ExprMatrix, ExprVector};
use itertools::Itertools;
use log::{debug, info, warn};
use nalgebra::DVector;
use std::fmt;

// values closer to zero are treated as zero by the second derivative test
const CLASSIFICATION_TOLERANCE: f64 = 1e-9;

/// Settings of the numeric critical point search
#[derive(Clone, Debug, PartialEq)]
pub struct CriticalPointSearch {
    /// seed grid range along x
    pub x_range: (f64, f64),
    /// seed grid range along y
    pub y_range: (f64, f64),
    /// number of seeds along each axis
    pub grid_points: usize,
    /// Newton stops when the gradient norm falls below this value
    pub tolerance: f64,
    pub max_iterations: usize,
    /// points closer than this are the same critical point
    pub dedup_tolerance: f64,
}

impl Default for CriticalPointSearch {
    fn default() -> Self {
        CriticalPointSearch {
            x_range: (-10.0, 10.0),
            y_range: (-10.0, 10.0),
            grid_points: 9,
            tolerance: 1e-10,
            max_iterations: 50,
            dedup_tolerance: 1e-6,
        }
    }
}

impl CriticalPointSearch {
    fn axis(range: (f64, f64), n: usize) -> Vec<f64> {
        match n {
            0 => Vec::new(),
            1 => vec![(range.0 + range.1) / 2.0],
            _ => {
                let step = (range.1 - range.0) / (n - 1) as f64;
                (0..n).map(|i| range.0 + step * i as f64).collect()
            }
        }
    }

    /// seed points, row by row
    pub fn seeds(&self) -> Vec<(f64, f64)> {
        let xs = Self::axis(self.x_range, self.grid_points);
        let ys = Self::axis(self.y_range, self.grid_points);
        xs.into_iter().cartesian_product(ys).collect()
    }
}

/// Outcome of the second derivative test
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtremumKind {
    LOCAL_MINIMUM,
    LOCAL_MAXIMUM,
    SADDLEPOINT,
    INCONCLUSIVE_EXTREMA,
}

impl fmt::Display for ExtremumKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ExtremumKind::LOCAL_MINIMUM => "LOCAL_MINIMUM",
            ExtremumKind::LOCAL_MAXIMUM => "LOCAL_MAXIMUM",
            ExtremumKind::SADDLEPOINT => "SADDLEPOINT",
            ExtremumKind::INCONCLUSIVE_EXTREMA => "INCONCLUSIVE_EXTREMA",
        };
        write!(f, "{}", name)
    }
}

/// sign of a number: 1, -1 or 0
pub fn sgn(x: f64) -> i32 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

fn sgn_with_tolerance(x: f64) -> i32 {
    if x.abs() < CLASSIFICATION_TOLERANCE { 0 } else { sgn(x) }
}

/// (fxx, fyy, fxy)
pub fn second_order_partial_derivatives(f: &Expr, x: &str, y: &str) -> (Expr, Expr, Expr) {
    let fx = f.diff(x);
    let fxx = fx.diff(x).simplify();
    let fyy = f.diff(y).diff(y).simplify();
    let fxy = fx.diff(y).simplify();
    (fxx, fyy, fxy)
}

/// fxx·fyy - fxy²
pub fn discriminant(f: &Expr, x: &str, y: &str) -> Expr {
    let (fxx, fyy, fxy) = second_order_partial_derivatives(f, x, y);
    (fxx * fyy - fxy.clone() * fxy).simplify()
}

/// discriminant at the point (a, b)
pub fn evaluate_discriminant(f: &Expr, x: &str, y: &str, a: f64, b: f64) -> Result<f64, CalculusError> {
    discriminant(f, x, y).eval_expression(&[x, y], &[a, b])
}

pub fn second_derivative_test(
    f: &Expr,
    x: &str,
    y: &str,
    a: f64,
    b: f64,
) -> Result<ExtremumKind, CalculusError> {
    let (fxx, _, _) = second_order_partial_derivatives(f, x, y);
    let d = evaluate_discriminant(f, x, y, a, b)?;
    let fxx_ab = fxx.eval_expression(&[x, y], &[a, b])?;
    let kind = match (sgn_with_tolerance(d), sgn_with_tolerance(fxx_ab)) {
        (1, 1) => ExtremumKind::LOCAL_MINIMUM,
        (1, -1) => ExtremumKind::LOCAL_MAXIMUM,
        (-1, _) => ExtremumKind::SADDLEPOINT,
        _ => ExtremumKind::INCONCLUSIVE_EXTREMA,
    };
    debug!("({}, {}): D = {}, fxx = {} -> {}", a, b, d, fxx_ab, kind);
    Ok(kind)
}

/// 2x2 matrix of second derivatives
/// ```text
/// | fxx fxy |
/// | fyx fyy |
/// ```
pub fn hessian(f: &Expr, x: &str, y: &str) -> ExprMatrix {
    let fx = f.diff(x);
    let fy = f.diff(y);
    ExprMatrix::new(vec![
        vec![fx.diff(x).simplify(), fx.diff(y).simplify()],
        vec![fy.diff(x).simplify(), fy.diff(y).simplify()],
    ])
}

/// Newton iteration x_{k+1} = x_k - H(x_k)^-1·∇f(x_k); None if the Hessian becomes singular, the
/// iterate leaves the finite numbers or the iteration limit is reached
fn newton_on_gradient(
    gradient: &ExprVector,
    hessian: &ExprMatrix,
    vars: &[&str],
    seed: (f64, f64),
    search: &CriticalPointSearch,
) -> Result<Option<(f64, f64)>, CalculusError> {
    let mut point = DVector::from_vec(vec![seed.0, seed.1]);
    for _ in 0..search.max_iterations {
        let values = [point[0], point[1]];
        let g = gradient.evaluate(vars, &values)?;
        if g.norm() < search.tolerance {
            return Ok(Some((point[0], point[1])));
        }
        let h = hessian.evaluate(vars, &values)?;
        let step = match h.lu().solve(&g) {
            Some(step) => step,
            None => return Ok(None),
        };
        point -= step;
        if !point.iter().all(|v| v.is_finite()) {
            return Ok(None);
        }
    }
    let g = gradient.evaluate(vars, &[point[0], point[1]])?;
    if g.norm() < search.tolerance {
        Ok(Some((point[0], point[1])))
    } else {
        Ok(None)
    }
}

fn clean(v: f64, tolerance: f64) -> f64 {
    let r = v.round();
    if (v - r).abs() < tolerance { r + 0.0 } else { v }
}

/// Critical points of f found from the seed grid of `search`, deduplicated and sorted by x
/// then y.
///
/// # Errors
/// `Collaborator { stage: Evaluation }` when the gradient cannot be evaluated, for instance
/// because f depends on variables other than x and y.
pub fn critical_points(
    f: &Expr,
    x: &str,
    y: &str,
    search: &CriticalPointSearch,
) -> Result<Vec<(f64, f64)>, CalculusError> {
    let vars = [x, y];
    if let Some(other) = f.free_variables().iter().find(|v| !vars.contains(&v.as_str())) {
        return Err(CalculusError::collaborator(
            Stage::Evaluation,
            format!("{} depends on {} besides {} and {}", f, other, x, y),
        ));
    }
    let gradient = ExprVector::new(f.diff_multi_args(&vars)).simplify();
    let hessian = hessian(f, x, y);
    debug!("gradient {:?}", gradient.to_strings());

    let mut found: Vec<(f64, f64)> = Vec::new();
    let mut failed = 0;
    for seed in search.seeds() {
        match newton_on_gradient(&gradient, &hessian, &vars, seed, search)? {
            Some((a, b)) => {
                let point = (clean(a, search.dedup_tolerance), clean(b, search.dedup_tolerance));
                let known = found.iter().any(|p| {
                    (p.0 - point.0).abs() < search.dedup_tolerance
                        && (p.1 - point.1).abs() < search.dedup_tolerance
                });
                if !known {
                    found.push(point);
                }
            }
            None => failed += 1,
        }
    }
    if failed > 0 {
        warn!("Newton iterations did not converge from {} seed points", failed);
    }
    found.sort_by(|p, q| p.0.total_cmp(&q.0).then(p.1.total_cmp(&q.1)));
    info!("found {} critical points of {}", found.len(), f);
    Ok(found)
}

/// Every critical point together with its second derivative test outcome
pub fn analyse_critical_points(
    f: &Expr,
    x: &str,
    y: &str,
    search: &CriticalPointSearch,
) -> Result<Vec<((f64, f64), ExtremumKind)>, CalculusError> {
    critical_points(f, x, y, search)?
        .into_iter()
        .map(|(a, b)| Ok(((a, b), second_derivative_test(f, x, y, a, b)?)))
        .collect()
}

/// fxx > 0, fyy > 0 and D > 0 at (a, b)
pub fn is_local_minimum(f: &Expr, x: &str, y: &str, a: f64, b: f64) -> Result<bool, CalculusError> {
    let (fxx, fyy, _) = second_order_partial_derivatives(f, x, y);
    Ok(sgn_with_tolerance(fxx.eval_expression(&[x, y], &[a, b])?) > 0
        && sgn_with_tolerance(fyy.eval_expression(&[x, y], &[a, b])?) > 0
        && sgn_with_tolerance(evaluate_discriminant(f, x, y, a, b)?) > 0)
}

/// fxx < 0, fyy < 0 and D > 0 at (a, b)
pub fn is_local_maximum(f: &Expr, x: &str, y: &str, a: f64, b: f64) -> Result<bool, CalculusError> {
    let (fxx, fyy, _) = second_order_partial_derivatives(f, x, y);
    Ok(sgn_with_tolerance(fxx.eval_expression(&[x, y], &[a, b])?) < 0
        && sgn_with_tolerance(fyy.eval_expression(&[x, y], &[a, b])?) < 0
        && sgn_with_tolerance(evaluate_discriminant(f, x, y, a, b)?) > 0)
}

/// D < 0 at (a, b)
pub fn is_saddle_point(f: &Expr, x: &str, y: &str, a: f64, b: f64) -> Result<bool, CalculusError> {
    Ok(sgn_with_tolerance(evaluate_discriminant(f, x, y, a, b)?) < 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn parse(s: &str) -> Expr {
        Expr::parse_expression(s).unwrap()
    }

    #[test]
    fn test_sgn() {
        assert_eq!(sgn(5.0), 1);
        assert_eq!(sgn(-5.0), -1);
        assert_eq!(sgn(0.0), 0);
    }

    #[test]
    fn test_second_order_partials_and_discriminant() {
        let f = parse("4*x^2 + 9*y^2 + 8*x - 36*y + 24");
        let (fxx, fyy, fxy) = second_order_partial_derivatives(&f, "x", "y");
        assert_eq!(fxx, Expr::Const(8.0));
        assert_eq!(fyy, Expr::Const(18.0));
        assert!(fxy.is_zero());
        assert_eq!(discriminant(&f, "x", "y"), Expr::Const(144.0));

        let cubic = parse("x^3/3 + y^2 + 2*x*y - 6*x - 3*y + 4");
        let (fxx, _, fxy) = second_order_partial_derivatives(&cubic, "x", "y");
        assert!(fxx.is_equivalent(&parse("2*x")));
        assert_eq!(fxy, Expr::Const(2.0));
        assert!(discriminant(&cubic, "x", "y").is_equivalent(&parse("4*x - 4")));
        assert_relative_eq!(evaluate_discriminant(&cubic, "x", "y", -1.0, 2.5).unwrap(), -8.0);
        assert_relative_eq!(evaluate_discriminant(&cubic, "x", "y", 3.0, -1.5).unwrap(), 8.0);
    }

    #[test]
    fn test_second_derivative_test() {
        let f = parse("4*x^2 + 9*y^2 + 8*x - 36*y + 24");
        assert_eq!(
            second_derivative_test(&f, "x", "y", -1.0, 2.0).unwrap(),
            ExtremumKind::LOCAL_MINIMUM
        );
        let g = parse("-x^2 - y^2");
        assert_eq!(
            second_derivative_test(&g, "x", "y", 0.0, 0.0).unwrap(),
            ExtremumKind::LOCAL_MAXIMUM
        );
        let flat = parse("x^4 + y^4");
        assert_eq!(
            second_derivative_test(&flat, "x", "y", 0.0, 0.0).unwrap(),
            ExtremumKind::INCONCLUSIVE_EXTREMA
        );
        assert_eq!(ExtremumKind::SADDLEPOINT.to_string(), "SADDLEPOINT");
    }

    #[test]
    fn test_hessian() {
        let f = parse("x^2 + y^2");
        let h = hessian(&f, "x", "y");
        assert_eq!(h[(0, 0)], Expr::Const(2.0));
        assert!(h[(0, 1)].is_zero());
        assert!(h[(1, 0)].is_zero());
        assert_eq!(h[(1, 1)], Expr::Const(2.0));
    }

    #[test]
    fn test_critical_points_of_quadratics() {
        let search = CriticalPointSearch::default();
        let points = critical_points(&parse("x^2 + y^2"), "x", "y", &search).unwrap();
        assert_eq!(points, vec![(0.0, 0.0)]);

        let f = parse("x^2 + 2*x*y - 4*y^2 + 4*x - 6*y + 4");
        let points = critical_points(&f, "x", "y", &search).unwrap();
        assert_eq!(points.len(), 1);
        assert_relative_eq!(points[0].0, -1.0, epsilon = 1e-8);
        assert_relative_eq!(points[0].1, -1.0, epsilon = 1e-8);
        assert!(is_saddle_point(&f, "x", "y", -1.0, -1.0).unwrap());
    }

    #[test]
    fn test_critical_points_of_cubics() {
        let search = CriticalPointSearch::default();
        let f = parse("x^3 + 2*x*y - 2*x - 4*y");
        let points = critical_points(&f, "x", "y", &search).unwrap();
        assert_eq!(points.len(), 1);
        assert_relative_eq!(points[0].0, 2.0, epsilon = 1e-8);
        assert_relative_eq!(points[0].1, -5.0, epsilon = 1e-8);

        let cubic = parse("x^3/3 + y^2 + 2*x*y - 6*x - 3*y + 4");
        let analysed = analyse_critical_points(&cubic, "x", "y", &search).unwrap();
        assert_eq!(analysed.len(), 2);
        let ((a0, b0), kind0) = analysed[0];
        assert_relative_eq!(a0, -1.0, epsilon = 1e-8);
        assert_relative_eq!(b0, 2.5, epsilon = 1e-8);
        assert_eq!(kind0, ExtremumKind::SADDLEPOINT);
        let ((a1, b1), kind1) = analysed[1];
        assert_relative_eq!(a1, 3.0, epsilon = 1e-8);
        assert_relative_eq!(b1, -1.5, epsilon = 1e-8);
        assert_eq!(kind1, ExtremumKind::LOCAL_MINIMUM);
        assert!(is_local_minimum(&cubic, "x", "y", 3.0, -1.5).unwrap());
        assert!(!is_local_maximum(&cubic, "x", "y", 3.0, -1.5).unwrap());
    }

    #[test]
    fn test_critical_points_rejects_extra_variables() {
        let f = parse("x^2 + y^2 + z");
        let err = critical_points(&f, "x", "y", &CriticalPointSearch::default()).unwrap_err();
        assert!(matches!(
            err,
            CalculusError::Collaborator {
                stage: Stage::Evaluation,
                ..
            }
        ));
    }

    #[test]
    fn test_seed_grid() {
        let search = CriticalPointSearch {
            x_range: (0.0, 1.0),
            y_range: (-1.0, 1.0),
            grid_points: 3,
            ..CriticalPointSearch::default()
        };
        let seeds = search.seeds();
        assert_eq!(seeds.len(), 9);
        assert_eq!(seeds[0], (0.0, -1.0));
        assert_eq!(seeds[1], (0.0, 0.0));
        assert_eq!(seeds[8], (1.0, 1.0));
    }
}
