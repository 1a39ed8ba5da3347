//! Multivariable calculus on top of the symbolic engine.
/// ________________________________________________________________________________________________________________________________
/// # Generalised chain rule
/// partial derivatives of a function of intermediate variables with respect to the independent
/// variables, and the inverse problem of expressing the intermediate partials
/// # Example
/// ```
/// use RustedCalculus::calculus::chain_rule::{derivative_of_expression, parse_dependency_map};
/// use RustedCalculus::symbolic::symbolic_engine::Expr;
/// let w = Expr::parse_expression("x^2 + y^2").unwrap();
/// let curve = parse_dependency_map(&[("x", "sin(t)"), ("y", "cos(t)")]).unwrap();
/// let result = derivative_of_expression(&w, &curve, &["t"]).unwrap();
/// assert!(result[0].rhs.is_zero());
/// ```
pub mod chain_rule;
mod chain_rule_tests;
/// ________________________________________________________________________________________________________________________________
/// extrema and saddle points of functions of two variables
pub mod critical_points;
/// Kronecker delta, Levi-Civita symbol and their identities
pub mod kronecker;
/// vectors in named 3D reference frames, angles, lines and planes
pub mod vectors;
