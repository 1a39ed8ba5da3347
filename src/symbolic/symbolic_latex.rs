//! LaTeX rendering of expressions and equations.
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_equation::Equation;

const GREEK: [&str; 24] = [
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lambda", "mu", "nu", "xi", "pi", "rho", "sigma", "tau", "upsilon", "phi", "chi", "psi",
    "omega", "Omega",
];

fn symbol_latex(name: &str) -> String {
    if GREEK.contains(&name) {
        format!("\\{}", name)
    } else {
        match name.split_once('_') {
            Some((head, tail)) if !head.is_empty() && !tail.is_empty() => {
                format!("{}_{{{}}}", symbol_latex(head), tail)
            }
            _ => name.to_string(),
        }
    }
}

fn function_latex(command: &str, arg: &Expr) -> String {
    format!("{}{{\\left({} \\right)}}", command, arg.to_latex())
}

fn args_latex(args: &[Expr]) -> String {
    args.iter()
        .map(|a| a.to_latex())
        .collect::<Vec<String>>()
        .join(", ")
}

fn needs_parens_in_product(expr: &Expr) -> bool {
    matches!(expr, Expr::Add(..) | Expr::Sub(..))
}

impl Expr {
    /// LaTeX form of the expression
    pub fn to_latex(&self) -> String {
        match self {
            Expr::Var(name) => symbol_latex(name),
            Expr::Const(c) => {
                if *c == std::f64::consts::PI {
                    "\\pi".to_string()
                } else if c.is_infinite() {
                    if *c > 0.0 { "\\infty".to_string() } else { "-\\infty".to_string() }
                } else {
                    c.to_string()
                }
            }
            Expr::Add(lhs, rhs) => match rhs.strip_negation() {
                Some(positive) => format!("{} - {}", lhs.to_latex(), wrap_sum(&positive)),
                None => format!("{} + {}", lhs.to_latex(), rhs.to_latex()),
            },
            Expr::Sub(lhs, rhs) => format!("{} - {}", lhs.to_latex(), wrap_sum(rhs)),
            Expr::Mul(lhs, rhs) => {
                if let Expr::Const(c) = lhs.as_ref() {
                    if *c == -1.0 {
                        return format!("- {}", wrap_sum(rhs));
                    }
                }
                let separator = if matches!(rhs.as_ref(), Expr::Const(_)) { " \\cdot " } else { " " };
                format!("{}{}{}", wrap_sum(lhs), separator, wrap_sum(rhs))
            }
            Expr::Div(num, den) => format!("\\frac{{{}}}{{{}}}", num.to_latex(), den.to_latex()),
            Expr::Pow(base, exp) => {
                if let Expr::Const(e) = exp.as_ref() {
                    if *e == 0.5 {
                        return format!("\\sqrt{{{}}}", base.to_latex());
                    }
                }
                let base_tex = match base.as_ref() {
                    Expr::Var(_) | Expr::Func(..) => base.to_latex(),
                    Expr::Const(c) if *c >= 0.0 => base.to_latex(),
                    _ => format!("\\left({}\\right)", base.to_latex()),
                };
                format!("{}^{{{}}}", base_tex, exp.to_latex())
            }
            Expr::Exp(arg) => format!("e^{{{}}}", arg.to_latex()),
            Expr::Ln(arg) => function_latex("\\ln", arg),
            Expr::sin(arg) => function_latex("\\sin", arg),
            Expr::cos(arg) => function_latex("\\cos", arg),
            Expr::tg(arg) => function_latex("\\tan", arg),
            Expr::ctg(arg) => function_latex("\\cot", arg),
            Expr::arcsin(arg) => function_latex("\\operatorname{asin}", arg),
            Expr::arccos(arg) => function_latex("\\operatorname{acos}", arg),
            Expr::arctg(arg) => function_latex("\\operatorname{atan}", arg),
            Expr::arcctg(arg) => function_latex("\\operatorname{acot}", arg),
            Expr::Func(name, args) => {
                format!("{}{{\\left({} \\right)}}", symbol_latex(name), args_latex(args))
            }
            Expr::Derivative(name, args, slots) => {
                let order = slots.len();
                let numerator = if order == 1 {
                    "\\partial".to_string()
                } else {
                    format!("\\partial^{{{}}}", order)
                };
                let wrt: String = slots
                    .iter()
                    .map(|s| format!("\\partial {}", args[*s].to_latex()))
                    .collect();
                format!(
                    "\\frac{{{}}}{{{}}} {}{{\\left({} \\right)}}",
                    numerator,
                    wrt,
                    symbol_latex(name),
                    args_latex(args)
                )
            }
            Expr::Diff(body, var) => format!(
                "\\frac{{\\partial}}{{\\partial {}}} \\left({}\\right)",
                symbol_latex(var),
                body.to_latex()
            ),
        }
    }
}

fn wrap_sum(expr: &Expr) -> String {
    if needs_parens_in_product(expr) {
        format!("\\left({}\\right)", expr.to_latex())
    } else {
        expr.to_latex()
    }
}

impl Equation {
    pub fn to_latex(&self) -> String {
        format!("{} = {}", self.lhs.to_latex(), self.rhs.to_latex())
    }
}

/// Wraps LaTeX lines in an unnumbered `split` block of an `equation` environment
pub fn aligned_latex_equations(lines: &[String]) -> String {
    let mut parts: Vec<&str> = vec![r"\begin{equation} ", r"\begin{split}"];
    parts.extend(lines.iter().map(|l| l.as_str()));
    parts.push(r"\nonumber\end{split}");
    parts.push(r"\end{equation}");
    parts.join(r"\\")
}

pub fn print_aligned_latex_equations(lines: &[String]) {
    println!("{}", aligned_latex_equations(lines));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_engine::FunctionSymbol;

    #[test]
    fn test_expression_latex() {
        let e = Expr::parse_expression("2*x^2 + sin(theta)/y").unwrap();
        assert_eq!(
            e.to_latex(),
            "2 x^{2} + \\frac{\\sin{\\left(\\theta \\right)}}{y}"
        );
        let e = Expr::parse_expression("sqrt(x - 1)").unwrap();
        assert_eq!(e.to_latex(), "\\sqrt{x - 1}");
    }

    #[test]
    fn test_derivative_latex() {
        let f = FunctionSymbol::new("f");
        let d = f.call_symbols(&["x", "y"]).diff("x");
        assert_eq!(
            d.to_latex(),
            "\\frac{\\partial}{\\partial x} f{\\left(x, y \\right)}"
        );
        let eq = Equation::new(d, Expr::Const(0.0));
        assert!(eq.to_latex().ends_with(" = 0"));
    }

    #[test]
    fn test_aligned_equations() {
        let lines = vec!["a &= b".to_string(), "c &= d".to_string()];
        assert_eq!(
            aligned_latex_equations(&lines),
            r"\begin{equation} \\\begin{split}\\a &= b\\c &= d\\\nonumber\end{split}\\\end{equation}"
        );
    }
}
