use crate::error::CalculusError;
use crate::symbolic::symbolic_engine::Expr;

use nalgebra::{DMatrix, DVector};
use std::ops::{Add, Index, Sub};
#[derive(Clone, Debug, PartialEq)]
/// Symbolic vector
pub struct ExprVector {
    pub data: Vec<Expr>,
}

impl ExprVector {
    /// Create new symbolic vector
    pub fn new(data: Vec<Expr>) -> Self {
        Self { data }
    }

    /// turn symbolic vector into vector of strings
    pub fn to_strings(&self) -> Vec<String> {
        self.data.iter().map(|expr| expr.to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Expr> {
        self.data.iter()
    }

    /// Dot product (symbolic, simplified)
    pub fn dot(&self, other: &ExprVector) -> Expr {
        assert_eq!(self.len(), other.len(), "Vector dimensions must match");

        let mut result = Expr::Const(0.0);
        for i in 0..self.len() {
            result = result + (self.data[i].clone() * other.data[i].clone());
        }
        result.simplify()
    }

    /// Cross product of two 3-component vectors
    pub fn cross(&self, other: &ExprVector) -> ExprVector {
        assert!(
            self.len() == 3 && other.len() == 3,
            "Cross product needs 3-component vectors"
        );
        let (a, b) = (&self.data, &other.data);
        let component = |i: usize, j: usize| {
            (a[i].clone() * b[j].clone() - a[j].clone() * b[i].clone()).simplify()
        };
        ExprVector::new(vec![component(1, 2), component(2, 0), component(0, 1)])
    }

    /// Euclidean length sqrt(v.v)
    pub fn magnitude(&self) -> Expr {
        self.dot(self).sqrt().simplify()
    }

    /// Scalar multiplication
    pub fn scale(&mut self, scalar: &Expr) {
        for expr in &mut self.data {
            *expr = (scalar.clone() * expr.clone()).simplify();
        }
    }

    /// Evaluate vector numerically
    pub fn evaluate(&self, vars: &[&str], values: &[f64]) -> Result<DVector<f64>, CalculusError> {
        let evaluated = self
            .data
            .iter()
            .map(|expr| expr.eval_expression(vars, values))
            .collect::<Result<Vec<f64>, CalculusError>>()?;
        Ok(DVector::from_vec(evaluated))
    }

    /// Simplify all expressions
    pub fn simplify(&self) -> ExprVector {
        ExprVector {
            data: self.data.iter().map(|expr| expr.simplify()).collect(),
        }
    }

    pub fn as_vec(&self) -> Vec<Expr> {
        self.data.clone()
    }
}

// Implement indexing
impl Index<usize> for ExprVector {
    type Output = Expr;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

// Vector addition
impl Add for ExprVector {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        assert_eq!(self.len(), other.len(), "Vector dimensions must match");

        let result: Vec<Expr> = self
            .data
            .into_iter()
            .zip(other.data)
            .map(|(a, b)| (a + b).simplify())
            .collect();

        ExprVector { data: result }
    }
}

// Vector subtraction
impl Sub for ExprVector {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        assert_eq!(self.len(), other.len(), "Vector dimensions must match");

        let result: Vec<Expr> = self
            .data
            .into_iter()
            .zip(other.data)
            .map(|(a, b)| (a - b).simplify())
            .collect();

        ExprVector { data: result }
    }
}

///////////////////////////////////////////////////////////////////////////
// Matrix
///////////////////////////////////////////////////////////////////////////
#[derive(Clone, Debug, PartialEq)]
pub struct ExprMatrix {
    pub data: Vec<Vec<Expr>>,
    pub nrows: usize,
    pub ncols: usize,
}

impl ExprMatrix {
    /// Create new symbolic matrix
    pub fn new(data: Vec<Vec<Expr>>) -> Self {
        let nrows = data.len();
        let ncols = if nrows > 0 { data[0].len() } else { 0 };

        for row in &data {
            assert_eq!(row.len(), ncols, "All rows must have the same length");
        }

        Self { data, nrows, ncols }
    }

    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Set column
    pub fn set_column(&mut self, j: usize, col: &ExprVector) {
        assert!(j < self.ncols, "Column index out of bounds");
        assert_eq!(
            col.len(),
            self.nrows,
            "Column length must match matrix rows"
        );
        for i in 0..self.nrows {
            self.data[i][j] = col[i].clone();
        }
    }

    /// Copy of the matrix with column j replaced (Cramer's rule)
    pub fn with_column(&self, j: usize, col: &ExprVector) -> ExprMatrix {
        let mut m = self.clone();
        m.set_column(j, col);
        m
    }

    /// Determinant by cofactor expansion along the first row, simplified
    pub fn determinant(&self) -> Expr {
        assert!(
            self.is_square(),
            "Matrix must be square to compute determinant"
        );
        self.cofactor_expansion().simplify()
    }

    fn cofactor_expansion(&self) -> Expr {
        match self.nrows {
            0 => Expr::Const(1.0),
            1 => self.data[0][0].clone(),
            2 => {
                let a = &self.data[0][0];
                let b = &self.data[0][1];
                let c = &self.data[1][0];
                let d = &self.data[1][1];
                a.clone() * d.clone() - b.clone() * c.clone()
            }
            n => {
                let mut det = Expr::Const(0.0);
                for j in 0..n {
                    if self.data[0][j].is_zero() {
                        continue;
                    }
                    let term = self.data[0][j].clone() * self.minor(0, j).cofactor_expansion();
                    det = if j % 2 == 0 { det + term } else { det - term };
                }
                det
            }
        }
    }

    /// Get minor matrix (remove row i and column j)
    pub fn minor(&self, row: usize, col: usize) -> ExprMatrix {
        assert!(row < self.nrows && col < self.ncols, "Index out of bounds");

        let data: Vec<Vec<Expr>> = self
            .data
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != row)
            .map(|(_, r)| {
                r.iter()
                    .enumerate()
                    .filter(|(j, _)| *j != col)
                    .map(|(_, e)| e.clone())
                    .collect()
            })
            .collect();

        ExprMatrix::new(data)
    }

    /// Evaluate matrix numerically
    pub fn evaluate(&self, vars: &[&str], values: &[f64]) -> Result<DMatrix<f64>, CalculusError> {
        let mut result = DMatrix::zeros(self.nrows, self.ncols);
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                result[(i, j)] = self.data[i][j].eval_expression(vars, values)?;
            }
        }
        Ok(result)
    }
}

impl Index<(usize, usize)> for ExprMatrix {
    type Output = Expr;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.data[index.0][index.1]
    }
}


#[cfg(test)]
mod tests_exprmatrix {
    use super::*;

    fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    #[test]
    fn test_determinant_2x2_and_3x3() {
        let m = ExprMatrix::new(vec![
            vec![var("a"), var("b")],
            vec![var("c"), var("d")],
        ]);
        assert_eq!(m.determinant(), (var("a") * var("d") - var("b") * var("c")).simplify());

        let m = ExprMatrix::new(vec![
            vec![Expr::Const(2.0), Expr::Const(0.0), Expr::Const(1.0)],
            vec![Expr::Const(1.0), Expr::Const(3.0), Expr::Const(2.0)],
            vec![Expr::Const(1.0), Expr::Const(1.0), Expr::Const(1.0)],
        ]);
        // 2*(3-2) - 0 + 1*(1-3) = 0
        assert_eq!(m.determinant(), Expr::Const(0.0));
    }

    #[test]
    fn test_determinant_4x4_diagonal() {
        let k = var("k");
        let zero = Expr::Const(0.0);
        let m = ExprMatrix::new(
            (0..4)
                .map(|i| (0..4).map(|j| if i == j { k.clone() } else { zero.clone() }).collect())
                .collect(),
        );
        assert_eq!(m.determinant(), k.pow(Expr::Const(4.0)));
    }

    #[test]
    fn test_polar_jacobian_determinant() {
        let r = var("r");
        let theta = var("theta");
        let x = r.clone() * Expr::cos(theta.clone().boxed());
        let y = r.clone() * Expr::sin(theta.clone().boxed());
        let jacobian = ExprMatrix::new(vec![
            vec![x.diff("r"), x.diff("theta")],
            vec![y.diff("r"), y.diff("theta")],
        ]);
        assert_eq!(jacobian.determinant(), r);
    }

    #[test]
    fn test_minor_and_cramer_column() {
        let m = ExprMatrix::new(vec![
            vec![var("a"), var("b"), var("c")],
            vec![var("d"), var("e"), var("f")],
            vec![var("g"), var("h"), var("i")],
        ]);
        let minor = m.minor(1, 1);
        assert_eq!(minor, ExprMatrix::new(vec![vec![var("a"), var("c")], vec![var("g"), var("i")]]));
        let column = ExprVector::new(vec![var("p"), var("q"), var("s")]);
        let replaced = m.with_column(2, &column);
        assert_eq!(replaced[(1, 2)], var("q"));
        assert_eq!(replaced[(1, 0)], var("d"));
        assert_eq!(m[(1, 2)], var("f"));
    }

    #[test]
    fn test_evaluate() {
        let m = ExprMatrix::new(vec![
            vec![var("x"), Expr::Const(1.0)],
            vec![Expr::Const(2.0), var("x") * var("x")],
        ]);
        let values = m.evaluate(&["x"], &[3.0]).unwrap();
        assert_eq!(values[(0, 0)], 3.0);
        assert_eq!(values[(1, 1)], 9.0);
        assert!(m.evaluate(&[], &[]).is_err());
    }

    #[test]
    #[should_panic(expected = "Matrix must be square to compute determinant")]
    fn test_determinant_of_non_square_matrix() {
        let m = ExprMatrix::new(vec![vec![Expr::Const(0.0); 3]; 2]);
        m.determinant();
    }
}
