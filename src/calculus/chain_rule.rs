//! # Generalised chain rule
//!
//! Let w = f(x1, ..., xm) and let every intermediate variable xi = xi(t1, ..., tn) depend on
//! the independent variables. Then
//!
//! ```text
//! ∂w/∂tj = Σi ∂w/∂xi · ∂xi/∂tj
//! ```
//!
//! The intermediate variables and their defining expressions are given as an ordered
//! `DependencyMap`; its order fixes the order of the sum and of every substitution.
//!
//! Operations:
//! - `term_for` - the j-th partial derivative as a sum of deferred partials of `f`
//! - `chain_rule` - one equation `∂f(t)/∂tj = term_for(j)` per independent variable
//! - `derivative_of_expression` - the same for a concrete expression of the intermediate
//!   variables, fully resolved in terms of the independent variables
//! - `solve_intermediate_differentials` - inverts the chain rule: the partials ∂f/∂xi in terms
//!   of the partials ∂f/∂tj
//!
//! # Example
//! ```rust, ignore
//! use RustedCalculus::calculus::chain_rule::{chain_rule, parse_dependency_map};
//! use RustedCalculus::symbolic::symbolic_engine::FunctionSymbol;
//! let f = FunctionSymbol::new("f");
//! let polar = parse_dependency_map(&[("x", "r*cos(theta)"), ("y", "r*sin(theta)")])?;
//! for eq in chain_rule(&f, &polar, &["r", "theta"])? {
//!     println!("{}", eq);
//! }
//! ```
use crate::error::{CalculusError, Stage};
use crate::symbolic::symbolic_engine::{Expr, FunctionSymbol};
use crate::symbolic::symbolic_equation::{DerivativeEquation, Equation};
use crate::symbolic::symbolic_simplify::SimplifySettings;
use crate::symbolic::symbolic_solve::solve_linear_system_with;
use indexmap::IndexMap;
use log::{debug, info};

/// Ordered map from intermediate variable name to its defining expression
pub type DependencyMap = IndexMap<String, Expr>;

/// Builds a dependency map from (name, expression string) pairs, keeping their order
pub fn parse_dependency_map(pairs: &[(&str, &str)]) -> Result<DependencyMap, CalculusError> {
    pairs
        .iter()
        .map(|(name, expr)| Ok((name.to_string(), Expr::parse_expression(expr)?)))
        .collect()
}

/// Partials ∂f/∂xi of the outer function with respect to the intermediate variables,
/// expressed through partials with respect to the independent variables
#[derive(Clone, Debug, PartialEq)]
pub struct SolvedDifferentials {
    // intermediate variable -> (∂f/∂xi, solution)
    entries: IndexMap<String, (Expr, Expr)>,
}

impl SolvedDifferentials {
    /// solution for the unknown partial derivative node
    pub fn get(&self, differential: &Expr) -> Option<&Expr> {
        self.entries
            .values()
            .find(|(unknown, _)| unknown == differential)
            .map(|(_, solution)| solution)
    }

    /// solution for ∂f/∂`variable`
    pub fn get_by_variable(&self, variable: &str) -> Option<&Expr> {
        self.entries.get(variable).map(|(_, solution)| solution)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Expr, &Expr)> {
        self.entries.values().map(|(unknown, solution)| (unknown, solution))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `∂f/∂xi = solution` for every intermediate variable in map order
    pub fn into_equations(self) -> Vec<Equation> {
        self.entries
            .into_values()
            .map(|(unknown, solution)| Equation::new(unknown, solution))
            .collect()
    }
}

/// Chain rule evaluation with configurable simplification
#[derive(Clone, Debug, Default)]
pub struct ChainRuleEngine {
    pub settings: SimplifySettings,
}

impl ChainRuleEngine {
    pub fn new(settings: SimplifySettings) -> Self {
        ChainRuleEngine { settings }
    }

    /// Σ over (xi, expri) in map order of ∂w(keys)/∂xi · ∂expri/∂args[j].
    ///
    /// Each ∂expri/∂args[j] is simplified; terms whose factor vanishes are left out and an
    /// empty sum is `Const(0)`.
    pub fn term_for(
        &self,
        j: usize,
        w: &FunctionSymbol,
        variables: &DependencyMap,
        args: &[&str],
    ) -> Result<Expr, CalculusError> {
        let tj = args.get(j).ok_or(CalculusError::IndexOutOfRange {
            index: j,
            len: args.len(),
        })?;
        let keys: Vec<&str> = variables.keys().map(|k| k.as_str()).collect();
        let outer = w.call_symbols(&keys);

        let mut terms: Vec<Expr> = Vec::with_capacity(variables.len());
        for (xi, expr) in variables {
            let inner = expr.diff(tj).simplify_with(&self.settings);
            if inner.is_zero() {
                continue;
            }
            let outer_partial = outer.diff(xi);
            debug!("∂{}/∂{} = {}, ∂{}/∂{} = {}", w, xi, outer_partial, xi, tj, inner);
            let term = match inner {
                Expr::Const(c) if c == 1.0 => outer_partial,
                _ => inner * outer_partial,
            };
            terms.push(term);
        }
        Ok(terms
            .into_iter()
            .reduce(|acc, term| acc + term)
            .unwrap_or(Expr::Const(0.0)))
    }

    /// One equation per independent variable: `∂w(args)/∂args[k] = term_for(k)`.
    /// The two sides are not checked against each other.
    pub fn chain_rule(
        &self,
        w: &FunctionSymbol,
        variables: &DependencyMap,
        args: &[&str],
    ) -> Result<Vec<DerivativeEquation>, CalculusError> {
        if args.is_empty() {
            return Err(CalculusError::EmptyIndependentVariables);
        }
        let composite = w.call_symbols(args);
        let mut equations = Vec::with_capacity(args.len());
        for (k, tk) in args.iter().enumerate() {
            let lhs = composite.diff(tk);
            let rhs = self.term_for(k, w, variables, args)?;
            equations.push(Equation::new(lhs, rhs));
        }
        debug!("chain rule for {} over {} independent variables", w, args.len());
        Ok(equations)
    }

    /// Derivatives of a concrete expression of the intermediate variables with respect to every
    /// independent variable.
    ///
    /// The chain rule is built with a placeholder outer function, the placeholder is replaced by
    /// `expr`, derivatives are resolved and only then the intermediate variables are substituted
    /// (in map order) before the final simplification.
    ///
    /// # Errors
    /// `Collaborator { stage: Differentiation }` if a derivative is left unresolved after `doit`,
    /// `Collaborator { stage: Substitution }` if the result still mentions an intermediate
    /// variable.
    pub fn derivative_of_expression(
        &self,
        expr: &Expr,
        variables: &DependencyMap,
        args: &[&str],
    ) -> Result<Vec<DerivativeEquation>, CalculusError> {
        let placeholder = placeholder_function(expr);
        let keys: Vec<&str> = variables.keys().map(|k| k.as_str()).collect();
        let equations = self.chain_rule(&placeholder, variables, args)?;

        let mut result = Vec::with_capacity(equations.len());
        for (eq, tk) in equations.into_iter().zip(args.iter()) {
            let substituted = eq
                .rhs
                .substitute_function_application(placeholder.name(), &keys, expr);
            let resolved = substituted.doit();
            debug!("∂/∂{}: resolved derivatives {}", tk, resolved);
            if resolved.contains_unresolved_derivative() {
                return Err(CalculusError::collaborator(
                    Stage::Differentiation,
                    format!("unresolved derivative remains in {}", resolved),
                ));
            }
            let rhs = resolved
                .substitute_variables(variables)
                .simplify_with(&self.settings);

            if let Some(leftover) = keys.iter().find(|k| rhs.contains_variable(k)) {
                return Err(CalculusError::collaborator(
                    Stage::Substitution,
                    format!("intermediate variable {} remains in {}", leftover, rhs),
                ));
            }
            result.push(Equation::new(eq.lhs, rhs));
        }
        info!("differentiated {} with respect to {}", expr, args.join(", "));
        Ok(result)
    }

    /// Solves the chain rule equations for the partials ∂w(keys)/∂xi.
    ///
    /// # Errors
    /// `UnsolvableSystem` when there are fewer independent than intermediate variables, the
    /// Jacobian of the dependency map is singular or an over-determined system is inconsistent.
    pub fn solve_intermediate_differentials(
        &self,
        w: &FunctionSymbol,
        variables: &DependencyMap,
        args: &[&str],
    ) -> Result<SolvedDifferentials, CalculusError> {
        let equations = self.chain_rule(w, variables, args)?;
        let keys: Vec<&str> = variables.keys().map(|k| k.as_str()).collect();
        let outer = w.call_symbols(&keys);
        let unknowns: Vec<Expr> = keys.iter().map(|xi| outer.diff(xi)).collect();

        let solutions = solve_linear_system_with(&equations, &unknowns, &self.settings)?;
        let entries: IndexMap<String, (Expr, Expr)> = keys
            .iter()
            .zip(unknowns.into_iter().zip(solutions))
            .map(|(xi, (unknown, solution))| (xi.to_string(), (unknown, solution)))
            .collect();
        info!("solved {} intermediate differentials of {}", entries.len(), w);
        Ok(SolvedDifferentials { entries })
    }
}

/// `f`, or `f1`, `f2`, ... when the expression already uses a function of that name
fn placeholder_function(expr: &Expr) -> FunctionSymbol {
    if !expr.contains_function("f") {
        return FunctionSymbol::new("f");
    }
    let mut i = 1;
    loop {
        let name = format!("f{}", i);
        if !expr.contains_function(&name) {
            return FunctionSymbol::new(&name);
        }
        i += 1;
    }
}

/// `ChainRuleEngine::term_for` with default settings
pub fn term_for(
    j: usize,
    w: &FunctionSymbol,
    variables: &DependencyMap,
    args: &[&str],
) -> Result<Expr, CalculusError> {
    ChainRuleEngine::default().term_for(j, w, variables, args)
}

/// `ChainRuleEngine::chain_rule` with default settings
pub fn chain_rule(
    w: &FunctionSymbol,
    variables: &DependencyMap,
    args: &[&str],
) -> Result<Vec<DerivativeEquation>, CalculusError> {
    ChainRuleEngine::default().chain_rule(w, variables, args)
}

/// `ChainRuleEngine::derivative_of_expression` with default settings
pub fn derivative_of_expression(
    expr: &Expr,
    variables: &DependencyMap,
    args: &[&str],
) -> Result<Vec<DerivativeEquation>, CalculusError> {
    ChainRuleEngine::default().derivative_of_expression(expr, variables, args)
}

/// `ChainRuleEngine::solve_intermediate_differentials` with default settings
pub fn solve_intermediate_differentials(
    w: &FunctionSymbol,
    variables: &DependencyMap,
    args: &[&str],
) -> Result<SolvedDifferentials, CalculusError> {
    ChainRuleEngine::default().solve_intermediate_differentials(w, variables, args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_avoids_existing_function() {
        let plain = Expr::parse_expression("x*y").unwrap();
        assert_eq!(placeholder_function(&plain).name(), "f");
        let uses_f = Expr::parse_expression("f(x) + f1(y)").unwrap();
        assert_eq!(placeholder_function(&uses_f).name(), "f2");
    }

    #[test]
    fn test_parse_dependency_map_keeps_order() {
        let map = parse_dependency_map(&[("y", "cos(t)"), ("x", "sin(t)")]).unwrap();
        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys, vec!["y", "x"]);
        assert!(parse_dependency_map(&[("x", "sin(")]).is_err());
    }
}
