// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_snake_case)]

use crate::Utils::config::CalculusConfig;
use crate::calculus::chain_rule::{
    ChainRuleEngine, chain_rule, derivative_of_expression, parse_dependency_map,
    solve_intermediate_differentials,
};
use crate::calculus::critical_points::{CriticalPointSearch, analyse_critical_points, discriminant, hessian};
use crate::calculus::kronecker::{kronecker_contraction_holds, kronecker_product, levi_civita_identity_holds};
use crate::calculus::vectors::{
    ReferenceFrame, angle_between_vectors, cosine_of_angle_between_vectors, laplacian, vector,
    vector_cos, vector_line_eqn, vector_plane,
};
use crate::error::CalculusError;
use crate::symbolic::symbolic_engine::{Expr, FunctionSymbol, PI};
use crate::symbolic::symbolic_latex::print_aligned_latex_equations;

pub fn calculus_examples(example: usize) -> Result<(), CalculusError> {
    match example {
        0 => {
            // CHAIN RULE IN POLAR COORDINATES
            let f = FunctionSymbol::new("f");
            let polar = parse_dependency_map(&[("x", "r*cos(theta)"), ("y", "r*sin(theta)")])?;
            let args = ["r", "theta"];
            for eq in chain_rule(&f, &polar, &args)? {
                println!("{}", eq);
            }
            // and back: partials with respect to x and y through the polar ones
            let solved = solve_intermediate_differentials(&f, &polar, &args)?;
            let lines: Vec<String> = solved
                .into_equations()
                .iter()
                .map(|eq| format!("{} &= {}", eq.lhs.to_latex(), eq.rhs.to_latex()))
                .collect();
            print_aligned_latex_equations(&lines);
        }
        1 => {
            // w = 3x^2 - 2xy + 4z^2 with x, y, z given through u and v
            let w = Expr::parse_expression("3*x^2 - 2*x*y + 4*z^2")?;
            let variables = parse_dependency_map(&[
                ("x", "exp(u)*sin(v)"),
                ("y", "exp(u)*cos(v)"),
                ("z", "exp(u)"),
            ])?;
            for eq in derivative_of_expression(&w, &variables, &["u", "v"])? {
                println!("{}", eq);
                println!("{}", eq.to_latex());
            }
        }
        2 => {
            // a curve x = sin(t), y = cos(t)
            let f = FunctionSymbol::new("f");
            let curve = parse_dependency_map(&[("x", "sin(t)"), ("y", "cos(t)")])?;
            let equations = chain_rule(&f, &curve, &["t"])?;
            println!("{}", equations[0]);
            let radius = Expr::parse_expression("x^2 + y^2")?;
            let along_curve = derivative_of_expression(&radius, &curve, &["t"])?;
            println!("d(x^2 + y^2)/dt along the circle: {}", along_curve[0].rhs);
        }
        3 => {
            // VECTORS
            let n = ReferenceFrame::new("N");
            let a = vector(&n, Expr::Const(5.0), Expr::Const(-2.0), Expr::Const(4.0));
            let b = vector(&n, Expr::Const(3.0), Expr::Const(1.0), Expr::Const(7.0));
            println!("a = {}, b = {}", a, b);
            println!("a x b = {}", a.cross(&b)?);
            println!("angle between a and b = {}", angle_between_vectors(&a, &b)?);

            let c = vector_cos(&n, Expr::Const(4.0), PI / Expr::Const(12.0), Expr::Const(5.0) * PI / Expr::Const(12.0), None);
            let d = vector_cos(&n, Expr::Const(8.0), PI / Expr::Const(4.0), PI / Expr::Const(4.0), None);
            println!("cos(alpha) from the cosine rule = {}", cosine_of_angle_between_vectors(&c, &d, "alpha")?);

            let line = vector_line_eqn(&a, &b, "lambda")?;
            println!("line through a and b: {}", line);
            let (plane, _) = vector_plane(
                &n,
                &vector(&n, Expr::Const(-1.0), Expr::Const(-1.0), Expr::Const(-1.0)),
                &vector(&n, Expr::Const(1.0), Expr::Const(1.0), Expr::Const(1.0)),
                &vector(&n, Expr::Const(1.0), Expr::Const(-1.0), Expr::Const(0.0)),
            )?;
            println!("plane: {}", plane);
            let field = Expr::parse_expression("x^2 + 3*y^2 + 2*x*y + 3*x + 5")?;
            println!("laplacian of {} = {}", field, laplacian(&field, &["x", "y", "z"]));
        }
        4 => {
            // KRONECKER DELTA AND LEVI-CIVITA SYMBOL
            let pairs: Vec<(i64, i64)> = kronecker_product(2).collect();
            println!("(delta_ik, delta_ij*delta_jk) for n = 2: {:?}", pairs);
            println!("contraction holds for n = 3: {}", kronecker_contraction_holds(3));
            println!("determinant identity holds: {}", levi_civita_identity_holds());
        }
        5 => {
            // CRITICAL POINTS
            let f = Expr::parse_expression("x^3/3 + y^2 + 2*x*y - 6*x - 3*y + 4")?;
            println!("hessian = {:?}", hessian(&f, "x", "y"));
            println!("discriminant = {}", discriminant(&f, "x", "y"));
            for ((a, b), kind) in analyse_critical_points(&f, "x", "y", &CriticalPointSearch::default())? {
                println!("({}, {}): {}", a, b, kind);
            }
        }
        6 => {
            // engine and search driven by a TOML configuration
            let config = CalculusConfig::from_toml_str(
                r#"
                [logging]
                loglevel = "info"

                [simplify]
                max_multiple_angle = 4

                [critical_points]
                x_range = [-3, 3]
                y_range = [-3, 3]
                grid_points = 5
                "#,
            )?;
            config.init_logger()?;
            let engine = ChainRuleEngine::new(config.simplify.clone());
            let variables = parse_dependency_map(&[("x", "s*t"), ("y", "s + t")])?;
            let w = Expr::parse_expression("x*y")?;
            for eq in engine.derivative_of_expression(&w, &variables, &["s", "t"])? {
                println!("{}", eq);
            }
            let g = Expr::parse_expression("x^2 + 2*x*y - 4*y^2 + 4*x - 6*y + 4")?;
            for ((a, b), kind) in analyse_critical_points(&g, "x", "y", &config.critical_points)? {
                println!("({}, {}): {}", a, b, kind);
            }
        }
        _ => {
            println!("example {} does not exist", example);
        }
    }
    Ok(())
}
