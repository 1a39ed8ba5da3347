//! # Symbolic Engine Derivatives Module
//!
//! Differentiation, deferred-derivative resolution and numeric evaluation of `Expr`.
//!
//! ## Key Methods
//!
//! ### Differentiation
//! - `diff(var: &str)` - analytical partial derivative
//! - `diff_multi_args(vars)` - gradient over the given variables
//! - `doit()` - resolves every unevaluated `Diff` node
//!
//! ### Evaluation and parsing
//! - `eval_expression()` - direct evaluation with named variables
//! - `parse_expression()` - string to symbolic expression
//!
//! ## Interesting Code Features
//!
//! 1. **Undetermined functions**: differentiating `f(g(t), h(t))` produces the chain rule over the
//!    argument slots with `Derivative` nodes as the unknown partials
//! 2. **General power rule**: `a^b` with a variable exponent differentiates as `a^b*(b'*ln(a) + b*a'/a)`

use crate::error::{CalculusError, Stage};
use crate::symbolic::parse_expr::parse_expression_func;
use crate::symbolic::symbolic_engine::Expr;
use std::f64::consts::PI;

impl Expr {
    /// DIFFERENTIATION

    /// Computes the analytical derivative of the expression with respect to a variable.
    ///
    /// Implements the standard rules:
    /// - Power rule: d/dx(x^n) = n*x^(n-1)
    /// - Product rule: d/dx(f*g) = f'*g + f*g'
    /// - Quotient rule: d/dx(f/g) = (f'*g - f*g')/g^2
    /// - Chain rule: d/dx(f(g(x))) = f'(g(x))*g'(x)
    ///
    /// # Examples
    /// ```rust, ignore
    /// let x = Expr::Var("x".to_string());
    /// let f = x.clone().pow(Expr::Const(2.0)); // x^2
    /// let df_dx = f.diff("x"); // 2*x
    /// ```
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Mul(lhs, rhs) => Expr::Add(
                Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)))),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(Expr::Sub(
                    Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                    Box::new(Expr::Mul(Box::new(rhs.diff(var)), lhs.clone())),
                )),
                Box::new(Expr::Mul(rhs.clone(), rhs.clone())),
            ),
            Expr::Pow(base, exp) => {
                if !exp.contains_variable(var) {
                    Expr::Mul(
                        Box::new(Expr::Mul(
                            exp.clone(),
                            Box::new(Expr::Pow(
                                base.clone(),
                                Box::new(Expr::Sub(exp.clone(), Box::new(Expr::Const(1.0)))),
                            )),
                        )),
                        Box::new(base.diff(var)),
                    )
                } else {
                    // a^b * (b' ln(a) + b a'/a)
                    Expr::Mul(
                        Box::new(self.clone()),
                        Box::new(Expr::Add(
                            Box::new(Expr::Mul(Box::new(exp.diff(var)), Box::new(Expr::Ln(base.clone())))),
                            Box::new(Expr::Div(
                                Box::new(Expr::Mul(exp.clone(), Box::new(base.diff(var)))),
                                base.clone(),
                            )),
                        )),
                    )
                }
            }
            Expr::Exp(expr) => {
                Expr::Mul(Box::new(Expr::Exp(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::Ln(expr) => Expr::Div(Box::new(expr.diff(var)), expr.clone()),
            Expr::sin(expr) => {
                Expr::Mul(Box::new(Expr::cos(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::cos(expr) => Expr::Mul(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::sin(expr.clone())),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::tg(expr) => Expr::Mul(
                Box::new(Expr::Div(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(
                        Box::new(Expr::cos(expr.clone())),
                        Box::new(Expr::Const(2.0)),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::ctg(expr) => Expr::Mul(
                Box::new(Expr::Div(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::Pow(
                        Box::new(Expr::sin(expr.clone())),
                        Box::new(Expr::Const(2.0)),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::arcsin(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Pow(
                    Box::new(Expr::Sub(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )),
                    Box::new(Expr::Const(0.5)),
                )),
            ),
            Expr::arccos(expr) => Expr::Div(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(expr.diff(var)),
                )),
                Box::new(Expr::Pow(
                    Box::new(Expr::Sub(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )),
                    Box::new(Expr::Const(0.5)),
                )),
            ),
            Expr::arctg(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Add(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                )),
            ),
            Expr::arcctg(expr) => Expr::Div(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(expr.diff(var)),
                )),
                Box::new(Expr::Add(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                )),
            ),
            Expr::Func(name, args) => slot_chain_rule(name, args, &[], var),
            Expr::Derivative(name, args, slots) => slot_chain_rule(name, args, slots, var),
            Expr::Diff(_, _) => {
                if self.contains_variable(var) {
                    Expr::Diff(Box::new(self.clone()), var.to_string())
                } else {
                    Expr::Const(0.0)
                }
            }
        }
    } // end of diff

    /// Vector of partial derivatives with respect to each of the given variables
    pub fn diff_multi_args(&self, all_vars: &[&str]) -> Vec<Expr> {
        all_vars.iter().map(|var| self.diff(var)).collect()
    }

    /// Resolves unevaluated derivatives: every `Diff(expr, var)` is replaced by the
    /// derivative of its (already resolved) body. Deferred derivatives of undetermined
    /// functions stay as they are.
    pub fn doit(&self) -> Expr {
        match self {
            Expr::Diff(expr, var) => expr.doit().diff(var),
            _ => self.map_children(|c| c.doit()),
        }
    }

    /// DIRECT EXPRESSION EVALUATION

    /// Evaluates symbolic expression with given variable values.
    ///
    /// # Arguments
    /// * `vars` - Variable names in order matching values array
    /// * `values` - Numerical values for each variable
    ///
    /// # Errors
    /// A variable missing from `vars`, an undetermined function or an unresolved
    /// derivative cannot be evaluated.
    pub fn eval_expression(&self, vars: &[&str], values: &[f64]) -> Result<f64, CalculusError> {
        let value = match self {
            Expr::Var(name) => {
                let index = vars.iter().position(|&x| x == name).ok_or_else(|| {
                    CalculusError::collaborator(
                        Stage::Evaluation,
                        format!("no value given for variable {}", name),
                    )
                })?;
                *values.get(index).ok_or(CalculusError::IndexOutOfRange {
                    index,
                    len: values.len(),
                })?
            }
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => lhs.eval_expression(vars, values)? + rhs.eval_expression(vars, values)?,
            Expr::Sub(lhs, rhs) => lhs.eval_expression(vars, values)? - rhs.eval_expression(vars, values)?,
            Expr::Mul(lhs, rhs) => lhs.eval_expression(vars, values)? * rhs.eval_expression(vars, values)?,
            Expr::Div(lhs, rhs) => lhs.eval_expression(vars, values)? / rhs.eval_expression(vars, values)?,
            Expr::Pow(base, exp) => {
                let base_fn = base.eval_expression(vars, values)?;
                let exp_fn = exp.eval_expression(vars, values)?;
                base_fn.powf(exp_fn)
            }
            Expr::Exp(expr) => expr.eval_expression(vars, values)?.exp(),
            Expr::Ln(expr) => expr.eval_expression(vars, values)?.ln(),
            Expr::sin(expr) => expr.eval_expression(vars, values)?.sin(),
            Expr::cos(expr) => expr.eval_expression(vars, values)?.cos(),
            Expr::tg(expr) => expr.eval_expression(vars, values)?.tan(),
            Expr::ctg(expr) => 1.0 / expr.eval_expression(vars, values)?.tan(),
            Expr::arcsin(expr) => expr.eval_expression(vars, values)?.asin(),
            Expr::arccos(expr) => expr.eval_expression(vars, values)?.acos(),
            Expr::arctg(expr) => expr.eval_expression(vars, values)?.atan(),
            Expr::arcctg(expr) => PI / 2.0 - expr.eval_expression(vars, values)?.atan(),
            Expr::Func(..) | Expr::Derivative(..) | Expr::Diff(..) => {
                return Err(CalculusError::collaborator(
                    Stage::Evaluation,
                    format!("{} has no numeric value", self),
                ));
            }
        };
        Ok(value)
    } // end of eval_expression

    /// EXPRESSION PARSING FROM STRINGS

    /// Parses a mathematical expression from string representation.
    ///
    /// # Supported Syntax
    /// - Variables: x, y, var_name
    /// - Constants: 3.14, 2.5, 1e-6
    /// - Operators: +, -, *, /, ^
    /// - Functions: exp, ln (log), sin, cos, tg (tan), ctg (cot), arcsin, arccos, arctg, arcctg, sqrt
    /// - Any other `name(args)` is an undetermined function
    ///
    /// # Examples
    /// ```rust, ignore
    /// let expr = Expr::parse_expression("x^2 + 2*x + 1")?;
    /// ```
    pub fn parse_expression(input: &str) -> Result<Expr, CalculusError> {
        parse_expression_func(input)
    }
}

/// Chain rule through the argument slots of an undetermined function (or of one of its
/// deferred derivatives): Σ_i D_{slots+i}(name)(args) * d(args[i])/d(var).
///
/// Arguments that do not depend on `var` contribute nothing; an argument equal to `var`
/// contributes the deferred derivative alone.
fn slot_chain_rule(name: &str, args: &[Expr], slots: &[usize], var: &str) -> Expr {
    let mut terms: Vec<Expr> = Vec::new();
    for (i, arg) in args.iter().enumerate() {
        if !arg.contains_variable(var) {
            continue;
        }
        let mut new_slots = slots.to_vec();
        new_slots.push(i);
        new_slots.sort_unstable();
        let partial = Expr::Derivative(name.to_string(), args.to_vec(), new_slots);
        match arg {
            Expr::Var(v) if v == var => terms.push(partial),
            _ => terms.push(Expr::Mul(Box::new(partial), Box::new(arg.diff(var)))),
        }
    }
    terms
        .into_iter()
        .reduce(|acc, term| acc + term)
        .unwrap_or(Expr::Const(0.0))
}
