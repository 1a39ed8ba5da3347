//! # Symbolic Engine Module
//!
//! Expression tree used by every calculus routine of the crate: construction,
//! pretty printing, substitution and structural queries. Differentiation lives in
//! `symbolic_engine_derivatives`, canonical simplification in `symbolic_simplify`.
//!
//! ## Main Structures
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - symbolic variables like "x", "theta"
//! - **Constants**: `Const(f64)` - numerical constants
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow`
//! - **Functions**: `Exp`, `Ln`, `sin`, `cos`, `tg`, `ctg` and inverse trigonometric functions
//! - **Undetermined functions**: `Func(name, args)` - application `f(x, y)` of a function
//!   whose body is unknown
//! - **Deferred derivatives**: `Derivative(name, args, slots)` - partial derivative of an
//!   undetermined function with respect to its argument slots, evaluated at `args`
//! - **Unevaluated derivatives**: `Diff(expr, var)` - derivative of a concrete expression that
//!   is kept symbolic until `doit()` is called
//!
//! ### `FunctionSymbol`
//! Named undetermined function. `FunctionSymbol::new("f").call_symbols(&["x", "y"])` builds `f(x, y)`.
//!
//! ## Interesting Code Features
//!
//! 1. **Precedence aware printing**: `Display` only emits the parentheses required by operator
//!    precedence and prints `a + (-1)*b` as `a - b`
//! 2. **Ordered substitution**: `substitute_variables` replaces symbols one after another in the
//!    order of an `IndexMap`, so later replacements see the results of earlier ones
//! 3. **Function substitution**: `substitute_function_application` swaps an undetermined function
//!    for a concrete body and turns its deferred derivatives into `Diff` nodes

#![allow(non_camel_case_types)]

use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::f64;
use std::fmt;

/// Core symbolic expression enum representing mathematical expressions as an abstract syntax tree.
///
/// # Examples
/// ```rust, ignore
/// use RustedCalculus::symbolic::symbolic_engine::Expr;
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "x", "y", "theta")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm: ln(x)
    Ln(Box<Expr>),
    /// Sine function: sin(x)
    sin(Box<Expr>),
    /// Cosine function: cos(x)
    cos(Box<Expr>),
    /// Tangent function: tan(x) - uses mathematical notation 'tg'
    tg(Box<Expr>),
    /// Cotangent function: cot(x) - uses mathematical notation 'ctg'
    ctg(Box<Expr>),
    /// Arcsine function: arcsin(x)
    arcsin(Box<Expr>),
    /// Arccosine function: arccos(x)
    arccos(Box<Expr>),
    /// Arctangent function: arctan(x) - uses mathematical notation 'arctg'
    arctg(Box<Expr>),
    /// Arccotangent function: arccot(x) - uses mathematical notation 'arcctg'
    arcctg(Box<Expr>),
    /// Application of an undetermined function: f(x, y)
    Func(String, Vec<Expr>),
    /// Partial derivative of an undetermined function with respect to the argument
    /// slots (sorted, repeated for higher orders), evaluated at the given arguments
    Derivative(String, Vec<Expr>, Vec<usize>),
    /// Unevaluated derivative of an expression with respect to a variable
    Diff(Box<Expr>, String),
}

/// Named constants
pub const ZERO: Expr = Expr::Const(0.0);
pub const ONE: Expr = Expr::Const(1.0);
pub const HALF: Expr = Expr::Const(0.5);
pub const PI: Expr = Expr::Const(f64::consts::PI);
/// Euler's number
pub const E: Expr = Expr::Const(f64::consts::E);
pub const POSITIVE_INFINITY: Expr = Expr::Const(f64::INFINITY);
pub const NEGATIVE_INFINITY: Expr = Expr::Const(f64::NEG_INFINITY);

// binding strength used by Display
const PREC_SUM: u8 = 1;
const PREC_PRODUCT: u8 = 2;
const PREC_POWER: u8 = 3;
const PREC_ATOM: u8 = 4;

fn join_args(args: &[Expr]) -> String {
    args.iter()
        .map(|a| a.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(..) | Expr::Sub(..) => PREC_SUM,
            Expr::Mul(..) | Expr::Div(..) => PREC_PRODUCT,
            Expr::Const(c) if *c < 0.0 => PREC_PRODUCT,
            Expr::Pow(..) => PREC_POWER,
            _ => PREC_ATOM,
        }
    }

    /// If the expression prints with a leading minus sign returns its positive counterpart
    pub(crate) fn strip_negation(&self) -> Option<Expr> {
        match self {
            Expr::Const(c) if *c < 0.0 => Some(Expr::Const(-c)),
            Expr::Mul(lhs, rhs) => match lhs.as_ref() {
                Expr::Const(c) if *c == -1.0 => Some(rhs.as_ref().clone()),
                _ => lhs
                    .strip_negation()
                    .map(|positive| Expr::Mul(positive.boxed(), rhs.clone())),
            },
            Expr::Div(num, den) => num
                .strip_negation()
                .map(|positive| Expr::Div(positive.boxed(), den.clone())),
            _ => None,
        }
    }

    fn fmt_with(&self, f: &mut fmt::Formatter, min_prec: u8) -> fmt::Result {
        if self.precedence() < min_prec {
            write!(f, "(")?;
            self.fmt_bare(f)?;
            write!(f, ")")
        } else {
            self.fmt_bare(f)
        }
    }

    // right operand of a product or a difference
    fn fmt_factor(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.strip_negation().is_some() {
            write!(f, "(")?;
            self.fmt_bare(f)?;
            write!(f, ")")
        } else {
            self.fmt_with(f, PREC_PRODUCT)
        }
    }

    fn fmt_bare(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => {
                lhs.fmt_with(f, PREC_SUM)?;
                match rhs.strip_negation() {
                    Some(positive) => {
                        write!(f, " - ")?;
                        positive.fmt_with(f, PREC_PRODUCT)
                    }
                    None => {
                        write!(f, " + ")?;
                        rhs.fmt_with(f, PREC_SUM)
                    }
                }
            }
            Expr::Sub(lhs, rhs) => {
                lhs.fmt_with(f, PREC_SUM)?;
                write!(f, " - ")?;
                rhs.fmt_factor(f)
            }
            Expr::Mul(lhs, rhs) => {
                if let Expr::Const(c) = lhs.as_ref() {
                    if *c == -1.0 {
                        write!(f, "-")?;
                        return rhs.fmt_factor(f);
                    }
                }
                lhs.fmt_with(f, PREC_PRODUCT)?;
                write!(f, "*")?;
                rhs.fmt_factor(f)
            }
            Expr::Div(num, den) => {
                num.fmt_with(f, PREC_PRODUCT)?;
                write!(f, "/")?;
                den.fmt_with(f, PREC_POWER)
            }
            Expr::Pow(base, exp) => {
                base.fmt_with(f, PREC_ATOM)?;
                write!(f, "^")?;
                exp.fmt_with(f, PREC_ATOM)
            }
            Expr::Exp(expr) => write!(f, "exp({})", expr),
            Expr::Ln(expr) => write!(f, "ln({})", expr),
            Expr::sin(expr) => write!(f, "sin({})", expr),
            Expr::cos(expr) => write!(f, "cos({})", expr),
            Expr::tg(expr) => write!(f, "tg({})", expr),
            Expr::ctg(expr) => write!(f, "ctg({})", expr),
            Expr::arcsin(expr) => write!(f, "arcsin({})", expr),
            Expr::arccos(expr) => write!(f, "arccos({})", expr),
            Expr::arctg(expr) => write!(f, "arctg({})", expr),
            Expr::arcctg(expr) => write!(f, "arcctg({})", expr),
            Expr::Func(name, args) => write!(f, "{}({})", name, join_args(args)),
            Expr::Derivative(name, args, slots) => {
                if args_are_distinct_symbols(args) {
                    let wrt = slots
                        .iter()
                        .map(|s| args[*s].to_string())
                        .collect::<Vec<String>>()
                        .join(", ");
                    write!(f, "Derivative({}({}), {})", name, join_args(args), wrt)
                } else {
                    let idx = slots
                        .iter()
                        .map(|s| s.to_string())
                        .collect::<Vec<String>>()
                        .join(",");
                    write!(f, "D[{}]({})({})", idx, name, join_args(args))
                }
            }
            Expr::Diff(expr, var) => write!(f, "Derivative({}, {})", expr, var),
        }
    }
}

fn args_are_distinct_symbols(args: &[Expr]) -> bool {
    let mut seen: Vec<&str> = Vec::new();
    for arg in args {
        match arg {
            Expr::Var(name) if !seen.contains(&name.as_str()) => seen.push(name),
            _ => return false,
        }
    }
    true
}

/// Display implementation for pretty printing symbolic expressions.
///
/// Parentheses are emitted only where precedence requires them: `(x + 1)*y^2`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_bare(f)
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::AddAssign for Expr {
    fn add_assign(&mut self, rhs: Self) {
        *self = Expr::Add(Box::new(self.clone()), Box::new(rhs));
    }
}

impl std::ops::SubAssign for Expr {
    fn sub_assign(&mut self, rhs: Self) {
        *self = Expr::Sub(Box::new(self.clone()), Box::new(rhs));
    }
}

impl std::ops::MulAssign for Expr {
    fn mul_assign(&mut self, rhs: Self) {
        *self = Expr::Mul(Box::new(self.clone()), Box::new(rhs));
    }
}

impl std::ops::DivAssign for Expr {
    fn div_assign(&mut self, rhs: Self) {
        *self = Expr::Div(Box::new(self.clone()), Box::new(rhs));
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Const(value)
    }
}

impl Expr {
    /// BASIC FEATURES

    /// Creates multiple symbolic variables from a comma-separated string.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let vars = Expr::Symbols("x, y, z");
    /// assert_eq!(vars.len(), 3);
    /// ```
    pub fn Symbols(symbols: &str) -> Vec<Expr> {
        symbols
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| Expr::Var(s.to_string()))
            .collect()
    }

    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    pub fn exp(self) -> Expr {
        Expr::Exp(self.boxed())
    }

    pub fn ln(self) -> Expr {
        Expr::Ln(self.boxed())
    }

    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    pub fn sqrt(self) -> Expr {
        Expr::Pow(self.boxed(), HALF.boxed())
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(c) if *c == 0.0)
    }

    pub fn as_const(&self) -> Option<f64> {
        match self {
            Expr::Const(c) => Some(*c),
            _ => None,
        }
    }

    /// Rebuilds the node with every direct child transformed by `f`.
    ///
    /// `Func` and `Derivative` arguments count as children, the body of a `Diff` node too.
    pub fn map_children<F>(&self, f: F) -> Expr
    where
        F: Fn(&Expr) -> Expr,
    {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => Expr::Add(f(lhs).boxed(), f(rhs).boxed()),
            Expr::Sub(lhs, rhs) => Expr::Sub(f(lhs).boxed(), f(rhs).boxed()),
            Expr::Mul(lhs, rhs) => Expr::Mul(f(lhs).boxed(), f(rhs).boxed()),
            Expr::Div(lhs, rhs) => Expr::Div(f(lhs).boxed(), f(rhs).boxed()),
            Expr::Pow(base, exp) => Expr::Pow(f(base).boxed(), f(exp).boxed()),
            Expr::Exp(expr) => Expr::Exp(f(expr).boxed()),
            Expr::Ln(expr) => Expr::Ln(f(expr).boxed()),
            Expr::sin(expr) => Expr::sin(f(expr).boxed()),
            Expr::cos(expr) => Expr::cos(f(expr).boxed()),
            Expr::tg(expr) => Expr::tg(f(expr).boxed()),
            Expr::ctg(expr) => Expr::ctg(f(expr).boxed()),
            Expr::arcsin(expr) => Expr::arcsin(f(expr).boxed()),
            Expr::arccos(expr) => Expr::arccos(f(expr).boxed()),
            Expr::arctg(expr) => Expr::arctg(f(expr).boxed()),
            Expr::arcctg(expr) => Expr::arcctg(f(expr).boxed()),
            Expr::Func(name, args) => Expr::Func(name.clone(), args.iter().map(&f).collect()),
            Expr::Derivative(name, args, slots) => Expr::Derivative(
                name.clone(),
                args.iter().map(&f).collect(),
                slots.clone(),
            ),
            Expr::Diff(expr, var) => Expr::Diff(f(expr).boxed(), var.clone()),
        }
    }

    /// Direct children of the node in the same order `map_children` visits them
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Var(_) | Expr::Const(_) => Vec::new(),
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => vec![lhs.as_ref(), rhs.as_ref()],
            Expr::Exp(expr)
            | Expr::Ln(expr)
            | Expr::sin(expr)
            | Expr::cos(expr)
            | Expr::tg(expr)
            | Expr::ctg(expr)
            | Expr::arcsin(expr)
            | Expr::arccos(expr)
            | Expr::arctg(expr)
            | Expr::arcctg(expr)
            | Expr::Diff(expr, _) => vec![expr.as_ref()],
            Expr::Func(_, args) | Expr::Derivative(_, args, _) => args.iter().collect(),
        }
    }

    /// true if any node of the tree satisfies the predicate
    pub fn any_node<F>(&self, predicate: &F) -> bool
    where
        F: Fn(&Expr) -> bool,
    {
        predicate(self) || self.children().iter().any(|c| c.any_node(predicate))
    }

    /// SUBSTITUTION

    /// Substitutes a variable with a constant value throughout the expression.
    pub fn set_variable(&self, var: &str, value: f64) -> Expr {
        self.substitute_variable(var, &Expr::Const(value))
    }

    /// Replaces every occurrence of the variable `var` with `expr`.
    ///
    /// The differentiation variable of a `Diff` node is a binder and is never renamed.
    pub fn substitute_variable(&self, var: &str, expr: &Expr) -> Expr {
        match self {
            Expr::Var(name) if name == var => expr.clone(),
            _ => self.map_children(|c| c.substitute_variable(var, expr)),
        }
    }

    /// Substitutes symbols one after another in map order: the replacement of a later
    /// entry is applied to the result of the earlier ones.
    pub fn substitute_variables(&self, substitutions: &IndexMap<String, Expr>) -> Expr {
        substitutions
            .iter()
            .fold(self.clone(), |acc, (var, expr)| acc.substitute_variable(var, expr))
    }

    /// Replaces the undetermined function `name` by a concrete body.
    ///
    /// `params` are the formal parameter names of `body`. An application `name(a, b)` becomes
    /// `body` with `params` replaced by `a, b`; a deferred derivative of `name` becomes a `Diff`
    /// of that body with respect to the argument symbols of its slots. Deferred derivatives
    /// whose slot arguments are not plain symbols are left untouched.
    pub fn substitute_function_application(&self, name: &str, params: &[&str], body: &Expr) -> Expr {
        match self {
            Expr::Func(fname, args) if fname == name && args.len() == params.len() => {
                let args: Vec<Expr> = args
                    .iter()
                    .map(|a| a.substitute_function_application(name, params, body))
                    .collect();
                instantiate(params, body, &args)
            }
            Expr::Derivative(fname, args, slots) if fname == name && args.len() == params.len() => {
                let wrt: Option<Vec<String>> = slots
                    .iter()
                    .map(|s| match &args[*s] {
                        Expr::Var(v) => Some(v.clone()),
                        _ => None,
                    })
                    .collect();
                match wrt {
                    Some(wrt) if args_are_distinct_symbols(args) => {
                        let instantiated = instantiate(params, body, args);
                        wrt.into_iter()
                            .fold(instantiated, |acc, var| Expr::Diff(acc.boxed(), var))
                    }
                    _ => self.clone(),
                }
            }
            _ => self.map_children(|c| c.substitute_function_application(name, params, body)),
        }
    }

    /// Replaces every subtree structurally equal to `target` with `replacement`
    pub fn replace_subexpression(&self, target: &Expr, replacement: &Expr) -> Expr {
        if self == target {
            replacement.clone()
        } else {
            self.map_children(|c| c.replace_subexpression(target, replacement))
        }
    }

    /// QUERIES

    pub fn contains_variable(&self, var_name: &str) -> bool {
        self.any_node(&|e| matches!(e, Expr::Var(name) if name == var_name))
    }

    /// true if the expression applies or differentiates the undetermined function `name`
    pub fn contains_function(&self, name: &str) -> bool {
        self.any_node(&|e| match e {
            Expr::Func(fname, _) | Expr::Derivative(fname, _, _) => fname == name,
            _ => false,
        })
    }

    /// true if a `Derivative` or `Diff` node is still present
    pub fn contains_unresolved_derivative(&self) -> bool {
        self.any_node(&|e| matches!(e, Expr::Derivative(..) | Expr::Diff(..)))
    }

    /// Sorted list of the variable names occurring in the expression
    pub fn free_variables(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        self.collect_variables(&mut names);
        names.into_iter().collect()
    }

    fn collect_variables(&self, names: &mut BTreeSet<String>) {
        if let Expr::Var(name) = self {
            names.insert(name.clone());
        }
        for child in self.children() {
            child.collect_variables(names);
        }
    }
}

/// `body` with the formal parameters replaced by the actual arguments; parameters are first
/// renamed to placeholders so that an argument mentioning another parameter is not captured.
fn instantiate(params: &[&str], body: &Expr, args: &[Expr]) -> Expr {
    let placeholders: Vec<String> = (0..params.len()).map(|i| format!("__arg_{}", i)).collect();
    let renamed = params
        .iter()
        .zip(placeholders.iter())
        .fold(body.clone(), |acc, (p, ph)| {
            acc.substitute_variable(p, &Expr::Var(ph.clone()))
        });
    placeholders
        .iter()
        .zip(args.iter())
        .fold(renamed, |acc, (ph, arg)| acc.substitute_variable(ph, arg))
}

/// Named undetermined function
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionSymbol {
    name: String,
}

impl FunctionSymbol {
    pub fn new(name: &str) -> Self {
        FunctionSymbol {
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Application of the function to arbitrary argument expressions
    pub fn call(&self, args: Vec<Expr>) -> Expr {
        Expr::Func(self.name.clone(), args)
    }

    /// Application of the function to symbols
    pub fn call_symbols(&self, args: &[&str]) -> Expr {
        self.call(args.iter().map(|a| Expr::Var(a.to_string())).collect())
    }
}

impl fmt::Display for FunctionSymbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

//___________________________________MACROS____________________________________

/// Macro to create symbolic variables from a comma-separated list
/// Usage: symbols!(x, y, z) -> creates variables x, y, z
#[macro_export]
macro_rules! symbols {
    ($($var:ident),+ $(,)?) => {
        {
            ($(
                $crate::symbolic::symbolic_engine::Expr::Var(stringify!($var).to_string())
            ),+)
        }
    };
}
