#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedCalculus::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("x^2*sin(y) + exp(x)").unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// let value = parsed_expression.eval_expression(&["x", "y"], &[0.0, 1.0]).unwrap();
/// assert_eq!(value, 1.0);
///  ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// expression tree with undetermined functions and deferred derivatives, substitution,
/// differentiation and numeric evaluation
///# Example
/// ```
/// use RustedCalculus::symbolic::symbolic_engine::{Expr, FunctionSymbol};
/// let f = FunctionSymbol::new("f");
/// let w = f.call_symbols(&["x", "y"]);
/// let dw_dx = w.diff("x");
/// assert_eq!(dw_dx.to_string(), "Derivative(f(x, y), x)");
/// let body = Expr::parse_expression("x*y^2").unwrap();
/// let resolved = dw_dx.substitute_function_application("f", &["x", "y"], &body).doit();
/// assert!(resolved.is_equivalent(&Expr::parse_expression("y^2").unwrap()));
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
/// canonical sum-of-products simplifier
pub mod symbolic_simplify;
/// equations lhs = rhs
pub mod symbolic_equation;
/// symbolic vectors and matrices
pub mod symbolic_vectors;
/// linear systems in arbitrary unknown sub-expressions
pub mod symbolic_solve;
/// LaTeX output
pub mod symbolic_latex;
