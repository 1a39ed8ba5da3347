use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_simplify::SimplifySettings;
use std::fmt;

/// Symbolic equation `lhs = rhs`
#[derive(Clone, Debug, PartialEq)]
pub struct Equation {
    pub lhs: Expr,
    pub rhs: Expr,
}

/// Equation whose left side is a derivative and right side its chain rule expansion
pub type DerivativeEquation = Equation;

impl Equation {
    pub fn new(lhs: Expr, rhs: Expr) -> Self {
        Equation { lhs, rhs }
    }

    /// `lhs - rhs`, zero when the equation holds
    pub fn residual(&self) -> Expr {
        self.lhs.clone() - self.rhs.clone()
    }

    /// both sides simplified
    pub fn simplify(&self) -> Equation {
        Equation::new(self.lhs.simplify(), self.rhs.simplify())
    }

    pub fn simplify_with(&self, settings: &SimplifySettings) -> Equation {
        Equation::new(self.lhs.simplify_with(settings), self.rhs.simplify_with(settings))
    }

    /// true if both sides are equal after canonical simplification
    pub fn holds(&self) -> bool {
        self.lhs.is_equivalent(&self.rhs)
    }

    pub fn map<F>(&self, f: F) -> Equation
    where
        F: Fn(&Expr) -> Expr,
    {
        Equation::new(f(&self.lhs), f(&self.rhs))
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Eq({}, {})", self.lhs, self.rhs)
    }
}
