use crate::calculus::chain_rule::*;
use crate::error::{CalculusError, Stage};
use crate::symbolic::symbolic_engine::{Expr, FunctionSymbol};
//___________________________________TESTS____________________________________

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn polar() -> DependencyMap {
        parse_dependency_map(&[("x", "r*cos(theta)"), ("y", "r*sin(theta)")]).unwrap()
    }

    fn parse(s: &str) -> Expr {
        Expr::parse_expression(s).unwrap()
    }

    #[test]
    fn test_term_for_polar_coordinates() {
        let f = FunctionSymbol::new("f");
        let fxy = f.call_symbols(&["x", "y"]);
        let (d_x, d_y) = (fxy.diff("x"), fxy.diff("y"));

        let by_r = term_for(0, &f, &polar(), &["r", "theta"]).unwrap();
        let expected = parse("cos(theta)") * d_x.clone() + parse("sin(theta)") * d_y.clone();
        assert!(by_r.is_equivalent(&expected), "got {}", by_r);

        let by_theta = term_for(1, &f, &polar(), &["r", "theta"]).unwrap();
        let expected = parse("-r*sin(theta)") * d_x + parse("r*cos(theta)") * d_y;
        assert!(by_theta.is_equivalent(&expected), "got {}", by_theta);
    }

    #[test]
    fn test_term_for_skips_vanishing_factors() {
        let f = FunctionSymbol::new("f");
        let variables = parse_dependency_map(&[("x", "t"), ("y", "s^2")]).unwrap();
        let by_t = term_for(0, &f, &variables, &["t", "s"]).unwrap();
        // dx/dt = 1 and dy/dt = 0 leave the bare partial
        assert_eq!(by_t, f.call_symbols(&["x", "y"]).diff("x"));
    }

    #[test]
    fn test_term_for_empty_map_is_zero() {
        let f = FunctionSymbol::new("f");
        let empty = DependencyMap::new();
        assert_eq!(term_for(0, &f, &empty, &["t"]).unwrap(), Expr::Const(0.0));
    }

    #[test]
    fn test_term_for_index_out_of_range() {
        let f = FunctionSymbol::new("f");
        let err = term_for(2, &f, &polar(), &["r", "theta"]).unwrap_err();
        assert_eq!(err, CalculusError::IndexOutOfRange { index: 2, len: 2 });
    }

    #[test]
    fn test_chain_rule_one_equation_per_independent_variable() {
        let f = FunctionSymbol::new("f");
        let args = ["r", "theta"];
        let equations = chain_rule(&f, &polar(), &args).unwrap();
        assert_eq!(equations.len(), args.len());
        for (k, eq) in equations.iter().enumerate() {
            assert_eq!(eq.lhs, f.call_symbols(&args).diff(args[k]));
            assert_eq!(eq.rhs, term_for(k, &f, &polar(), &args).unwrap());
        }
    }

    #[test]
    fn test_chain_rule_single_parameter_curve() {
        let f = FunctionSymbol::new("f");
        let curve = parse_dependency_map(&[("x", "sin(t)"), ("y", "cos(t)")]).unwrap();
        let equations = chain_rule(&f, &curve, &["t"]).unwrap();
        assert_eq!(equations.len(), 1);
        assert_eq!(equations[0].lhs.to_string(), "Derivative(f(t), t)");
        let fxy = f.call_symbols(&["x", "y"]);
        let expected = parse("cos(t)") * fxy.diff("x") - parse("sin(t)") * fxy.diff("y");
        assert!(equations[0].rhs.is_equivalent(&expected));
    }

    #[test]
    fn test_chain_rule_requires_independent_variables() {
        let f = FunctionSymbol::new("f");
        assert_eq!(
            chain_rule(&f, &polar(), &[]).unwrap_err(),
            CalculusError::EmptyIndependentVariables
        );
    }

    #[test]
    fn test_derivative_of_expression_exponential_substitution() {
        let w = parse("3*x^2 - 2*x*y + 4*z^2");
        let variables = parse_dependency_map(&[
            ("x", "exp(u)*sin(v)"),
            ("y", "exp(u)*cos(v)"),
            ("z", "exp(u)"),
        ])
        .unwrap();
        let result = derivative_of_expression(&w, &variables, &["u", "v"]).unwrap();
        assert_eq!(result.len(), 2);

        let f = FunctionSymbol::new("f");
        assert_eq!(result[0].lhs, f.call_symbols(&["u", "v"]).diff("u"));
        assert_eq!(result[1].lhs, f.call_symbols(&["u", "v"]).diff("v"));

        let by_u = parse("2*(3*sin(v)^2 - sin(2*v) + 4)*exp(2*u)");
        let by_v = parse("(3*sin(2*v) - 2*cos(2*v))*exp(2*u)");
        assert!(result[0].rhs.is_equivalent(&by_u), "got {}", result[0].rhs);
        assert!(result[1].rhs.is_equivalent(&by_v), "got {}", result[1].rhs);
        for eq in &result {
            assert!(!eq.rhs.contains_unresolved_derivative());
            for v in ["x", "y", "z"] {
                assert!(!eq.rhs.contains_variable(v));
            }
        }
    }

    #[test]
    fn test_derivative_of_expression_constant_along_curve() {
        let curve = parse_dependency_map(&[("x", "sin(t)"), ("y", "cos(t)")]).unwrap();
        let result = derivative_of_expression(&parse("x^2 + y^2"), &curve, &["t"]).unwrap();
        assert_eq!(result.len(), 1);
        assert!(result[0].rhs.is_zero());
    }

    #[test]
    fn test_derivative_of_expression_matches_direct_differentiation() {
        let variables = parse_dependency_map(&[("x", "s*t"), ("y", "s + t")]).unwrap();
        let result = derivative_of_expression(&parse("x*y"), &variables, &["s", "t"]).unwrap();
        let composed = parse("s*t*(s + t)");
        assert!(result[0].rhs.is_equivalent(&composed.diff("s")));
        assert!(result[1].rhs.is_equivalent(&composed.diff("t")));
    }

    #[test]
    fn test_derivative_of_expression_intermediate_left_after_substitution() {
        // x is defined through y, which was already substituted
        let variables = parse_dependency_map(&[("y", "t"), ("x", "y")]).unwrap();
        let err = derivative_of_expression(&parse("x*y"), &variables, &["t"]).unwrap_err();
        assert!(matches!(
            err,
            CalculusError::Collaborator {
                stage: Stage::Substitution,
                ..
            }
        ));
    }

    #[test]
    fn test_derivative_of_expression_decimal_coefficient() {
        let variables = parse_dependency_map(&[("x", "t*2.5")]).unwrap();
        let result = derivative_of_expression(&parse("x^2"), &variables, &["t"]).unwrap();
        assert!(result[0].rhs.is_equivalent(&parse("12.5*t")), "got {}", result[0].rhs);
    }

    #[test]
    fn test_derivative_of_expression_square_root_keeps_sign() {
        let variables = parse_dependency_map(&[("x", "t")]).unwrap();
        let result = derivative_of_expression(&parse("sqrt(x^2)"), &variables, &["t"]).unwrap();
        let rhs = &result[0].rhs;
        assert_relative_eq!(rhs.eval_expression(&["t"], &[-2.0]).unwrap(), -1.0, epsilon = 1e-12);
        assert_relative_eq!(rhs.eval_expression(&["t"], &[3.0]).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_derivative_of_expression_undetermined_inner_function() {
        let variables = parse_dependency_map(&[("x", "t^2")]).unwrap();
        let err = derivative_of_expression(&parse("g(x)"), &variables, &["t"]).unwrap_err();
        assert!(matches!(
            err,
            CalculusError::Collaborator {
                stage: Stage::Differentiation,
                ..
            }
        ));
    }

    #[test]
    fn test_solve_polar_differentials() {
        let f = FunctionSymbol::new("f");
        let args = ["r", "theta"];
        let solved = solve_intermediate_differentials(&f, &polar(), &args).unwrap();
        assert_eq!(solved.len(), 2);

        let f_polar = f.call_symbols(&args);
        let (d_r, d_theta) = (f_polar.diff("r"), f_polar.diff("theta"));
        let expected_x = parse("cos(theta)") * d_r.clone() - parse("sin(theta)") * d_theta.clone() / parse("r");
        let expected_y = parse("sin(theta)") * d_r + parse("cos(theta)") * d_theta / parse("r");

        let solution_x = solved.get_by_variable("x").unwrap();
        assert!(solution_x.is_equivalent(&expected_x), "got {}", solution_x);
        let d_x = f.call_symbols(&["x", "y"]).diff("x");
        assert_eq!(solved.get(&d_x), Some(solution_x));
        let solution_y = solved.get_by_variable("y").unwrap();
        assert!(solution_y.is_equivalent(&expected_y), "got {}", solution_y);
    }

    #[test]
    fn test_solved_differentials_satisfy_chain_rule() {
        let f = FunctionSymbol::new("f");
        let args = ["r", "theta"];
        let equations = chain_rule(&f, &polar(), &args).unwrap();
        let solved = solve_intermediate_differentials(&f, &polar(), &args).unwrap();
        for eq in equations {
            let back = solved
                .iter()
                .fold(eq.rhs.clone(), |acc, (unknown, solution)| {
                    acc.replace_subexpression(unknown, solution)
                });
            assert!(back.is_equivalent(&eq.lhs), "got {}", back);
        }
        let as_equations = solved.into_equations();
        assert_eq!(as_equations.len(), 2);
        assert_eq!(as_equations[0].lhs, f.call_symbols(&["x", "y"]).diff("x"));
    }

    #[test]
    fn test_solve_fewer_independent_variables_fails() {
        let f = FunctionSymbol::new("f");
        let curve = parse_dependency_map(&[("x", "sin(t)"), ("y", "cos(t)")]).unwrap();
        assert!(matches!(
            solve_intermediate_differentials(&f, &curve, &["t"]),
            Err(CalculusError::UnsolvableSystem { .. })
        ));
    }

    #[test]
    fn test_solve_singular_dependency_fails() {
        let f = FunctionSymbol::new("f");
        let variables = parse_dependency_map(&[("x", "s + t"), ("y", "2*s + 2*t")]).unwrap();
        assert!(matches!(
            solve_intermediate_differentials(&f, &variables, &["s", "t"]),
            Err(CalculusError::UnsolvableSystem { .. })
        ));
    }
}
