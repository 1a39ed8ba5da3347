//! Solving systems of equations that are linear in a set of unknown expressions.
//!
//! Unknowns may be arbitrary sub-expressions (symbols, deferred derivatives,
//! `cos(theta)`, ...). Each unknown is swapped for a fresh symbol, the coefficient matrix is
//! read off by differentiation and the system is solved with Cramer's rule.
use crate::error::{CalculusError, Stage};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_equation::Equation;
use crate::symbolic::symbolic_simplify::SimplifySettings;
use crate::symbolic::symbolic_vectors::{ExprMatrix, ExprVector};
use itertools::Itertools;
use log::{debug, info};

fn unsolvable(unknowns: &[Expr], reason: String) -> CalculusError {
    CalculusError::UnsolvableSystem {
        unknowns: unknowns.iter().map(|u| u.to_string()).collect(),
        reason,
    }
}

/// Solves `equations` for `unknowns`, returning one simplified solution per unknown in order.
///
/// # Errors
/// `UnsolvableSystem` if there are fewer equations than unknowns, if an equation is not linear
/// in the unknowns, if the coefficient matrix is singular or if extra equations contradict the
/// solution. `Collaborator` with stage `Solve` if an unknown is a numeric constant.
pub fn solve_linear_system(equations: &[Equation], unknowns: &[Expr]) -> Result<Vec<Expr>, CalculusError> {
    solve_linear_system_with(equations, unknowns, &SimplifySettings::default())
}

pub fn solve_linear_system_with(
    equations: &[Equation],
    unknowns: &[Expr],
    settings: &SimplifySettings,
) -> Result<Vec<Expr>, CalculusError> {
    let n = unknowns.len();
    let m = equations.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    if let Some(constant) = unknowns.iter().find(|u| u.as_const().is_some()) {
        return Err(CalculusError::collaborator(
            Stage::Solve,
            format!("unknown {} is a numeric constant", constant),
        ));
    }
    if m < n {
        return Err(unsolvable(
            unknowns,
            format!("{} unknowns but only {} equations", n, m),
        ));
    }
    let placeholders: Vec<String> = (0..n).map(|i| format!("__unknown_{}", i)).collect();

    // residual lhs - rhs with every unknown replaced by its placeholder symbol
    let residuals: Vec<Expr> = equations
        .iter()
        .map(|eq| {
            unknowns
                .iter()
                .zip(placeholders.iter())
                .fold(eq.residual(), |acc, (unknown, ph)| {
                    acc.replace_subexpression(unknown, &Expr::Var(ph.clone()))
                })
        })
        .collect();

    let mut coefficients: Vec<Vec<Expr>> = Vec::with_capacity(m);
    let mut constants: Vec<Expr> = Vec::with_capacity(m);
    for residual in &residuals {
        let mut row = Vec::with_capacity(n);
        for ph in &placeholders {
            let coefficient = residual.diff(ph).simplify_with(settings);
            if placeholders.iter().any(|p| coefficient.contains_variable(p)) {
                return Err(unsolvable(
                    unknowns,
                    format!("equation {} = 0 is not linear in the unknowns", residual),
                ));
            }
            row.push(coefficient);
        }
        let at_zero = placeholders
            .iter()
            .fold(residual.clone(), |acc, ph| acc.set_variable(ph, 0.0));
        constants.push((-at_zero).simplify_with(settings));
        coefficients.push(row);
    }
    debug!("coefficient rows: {:?}", coefficients.iter().map(|r| r.iter().map(|e| e.to_string()).collect::<Vec<_>>()).collect::<Vec<_>>());

    let chosen: Vec<usize> = if m == n {
        (0..n).collect()
    } else {
        (0..m)
            .combinations(n)
            .find(|rows| {
                let a = ExprMatrix::new(rows.iter().map(|&r| coefficients[r].clone()).collect());
                !a.determinant().is_zero()
            })
            .ok_or_else(|| unsolvable(unknowns, "coefficient matrix has rank below the number of unknowns".to_string()))?
    };

    let a = ExprMatrix::new(chosen.iter().map(|&r| coefficients[r].clone()).collect());
    let b = ExprVector::new(chosen.iter().map(|&r| constants[r].clone()).collect());
    let det = a.determinant();
    if det.is_zero() {
        return Err(unsolvable(unknowns, "coefficient matrix is singular".to_string()));
    }

    let solutions: Vec<Expr> = (0..n)
        .map(|i| (a.with_column(i, &b).determinant() / det.clone()).simplify_with(settings))
        .collect();

    for (k, residual) in residuals.iter().enumerate() {
        if chosen.contains(&k) {
            continue;
        }
        let check = placeholders
            .iter()
            .zip(solutions.iter())
            .fold(residual.clone(), |acc, (ph, s)| acc.substitute_variable(ph, s))
            .simplify_with(settings);
        if !check.is_zero() {
            return Err(unsolvable(
                unknowns,
                format!("equation {} is inconsistent with the others", equations[k]),
            ));
        }
    }
    info!("solved linear system of {} equations for {} unknowns", m, n);
    Ok(solutions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols;

    #[test]
    fn test_solve_2x2_numeric() {
        let (x, y) = symbols!(x, y);
        // x + y = 3, x - y = 1
        let equations = vec![
            Equation::new(x.clone() + y.clone(), Expr::Const(3.0)),
            Equation::new(x.clone() - y.clone(), Expr::Const(1.0)),
        ];
        let solution = solve_linear_system(&equations, &[x, y]).unwrap();
        assert_eq!(solution, vec![Expr::Const(2.0), Expr::Const(1.0)]);
    }

    #[test]
    fn test_solve_for_subexpression() {
        let (a, theta) = symbols!(a, theta);
        let cos_theta = Expr::cos(theta.boxed());
        // 2 = 4 - 4*cos(theta)*a
        let equations = vec![Equation::new(
            Expr::Const(2.0),
            Expr::Const(4.0) - Expr::Const(4.0) * cos_theta.clone() * a.clone(),
        )];
        let solution = solve_linear_system(&equations, &[cos_theta]).unwrap();
        let expected = Expr::Const(0.5) / a;
        assert!(solution[0].is_equivalent(&expected));
    }

    #[test]
    fn test_overdetermined_consistent_and_inconsistent() {
        let (x, y) = symbols!(x, y);
        let mut equations = vec![
            Equation::new(x.clone(), Expr::Const(1.0)),
            Equation::new(x.clone() + y.clone(), Expr::Const(3.0)),
            Equation::new(y.clone(), Expr::Const(2.0)),
        ];
        let solution = solve_linear_system(&equations, &[x.clone(), y.clone()]).unwrap();
        assert_eq!(solution, vec![Expr::Const(1.0), Expr::Const(2.0)]);

        equations[2] = Equation::new(y.clone(), Expr::Const(5.0));
        let err = solve_linear_system(&equations, &[x, y]).unwrap_err();
        assert!(matches!(err, CalculusError::UnsolvableSystem { .. }));
    }

    #[test]
    fn test_underdetermined_singular_and_nonlinear() {
        let (x, y) = symbols!(x, y);
        let one = vec![Equation::new(x.clone() + y.clone(), Expr::Const(1.0))];
        assert!(matches!(
            solve_linear_system(&one, &[x.clone(), y.clone()]),
            Err(CalculusError::UnsolvableSystem { .. })
        ));

        let singular = vec![
            Equation::new(x.clone() + y.clone(), Expr::Const(1.0)),
            Equation::new(Expr::Const(2.0) * x.clone() + Expr::Const(2.0) * y.clone(), Expr::Const(2.0)),
        ];
        assert!(matches!(
            solve_linear_system(&singular, &[x.clone(), y.clone()]),
            Err(CalculusError::UnsolvableSystem { .. })
        ));

        let nonlinear = vec![Equation::new(x.clone() * x.clone(), Expr::Const(4.0))];
        assert!(matches!(
            solve_linear_system(&nonlinear, &[x]),
            Err(CalculusError::UnsolvableSystem { .. })
        ));
    }

    #[test]
    fn test_constant_unknown_rejected() {
        let x = Expr::Var("x".to_string());
        let equations = vec![Equation::new(x.clone() + Expr::Const(2.0), Expr::Const(3.0))];
        let err = solve_linear_system(&equations, &[x, Expr::Const(2.0)]).unwrap_err();
        assert!(matches!(
            err,
            CalculusError::Collaborator {
                stage: Stage::Solve,
                ..
            }
        ));
    }
}
