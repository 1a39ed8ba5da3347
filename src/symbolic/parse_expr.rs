//! Parser turning a string into a symbolic expression.
//!
//! Grammar (usual precedence, `^` right associative and binding tighter than unary minus):
//! ```text
//! sum     := product (('+' | '-') product)*
//! product := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := atom (('^' | '**') unary)?
//! atom    := name '(' [sum (',' sum)*] ')' | name | number | '(' sum ')'
//! ```
//! Known function names map to the elementary variants of `Expr`, `pi` is the constant,
//! any other `name(...)` is an application of an undetermined function.
use crate::error::CalculusError;
use crate::symbolic::symbolic_engine::{Expr, HALF, PI};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, multispace0, one_of},
    combinator::{map_res, not, opt, recognize},
    error::{Error, ErrorKind},
    multi::{many0, separated_list0},
    number::complete::recognize_float,
    sequence::{delimited, pair, preceded, terminated},
};

fn parse_identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

fn parse_number(input: &str) -> IResult<&str, Expr> {
    // signs belong to the unary rule
    let mantissa = preceded(not(one_of("+-")), recognize_float);
    map_res(mantissa, |s: &str| s.parse::<f64>().map(Expr::Const)).parse(input)
}

fn unary_function(name: &str, arg: Expr) -> Option<Expr> {
    let arg = arg.boxed();
    let expr = match name {
        "exp" => Expr::Exp(arg),
        "ln" | "log" => Expr::Ln(arg),
        "sin" => Expr::sin(arg),
        "cos" => Expr::cos(arg),
        "tg" | "tan" => Expr::tg(arg),
        "ctg" | "cot" => Expr::ctg(arg),
        "arcsin" | "asin" => Expr::arcsin(arg),
        "arccos" | "acos" => Expr::arccos(arg),
        "arctg" | "atan" => Expr::arctg(arg),
        "arcctg" | "acot" => Expr::arcctg(arg),
        "sqrt" => Expr::Pow(arg, HALF.boxed()),
        _ => return None,
    };
    Some(expr)
}

fn is_elementary(name: &str) -> bool {
    unary_function(name, Expr::Const(0.0)).is_some()
}

fn parse_function_call(input: &str) -> IResult<&str, Expr> {
    let (input, name) = parse_identifier(input)?;
    let (input, _) = multispace0(input)?;
    let (rest, mut args) = delimited(
        char('('),
        separated_list0(char(','), parse_sum),
        preceded(multispace0, char(')')),
    )
    .parse(input)?;
    if is_elementary(name) {
        if args.len() != 1 {
            return Err(nom::Err::Failure(Error::new(input, ErrorKind::Verify)));
        }
        let arg = args.remove(0);
        match unary_function(name, arg) {
            Some(expr) => Ok((rest, expr)),
            None => Err(nom::Err::Failure(Error::new(input, ErrorKind::Verify))),
        }
    } else {
        Ok((rest, Expr::Func(name.to_string(), args)))
    }
}

fn parse_symbol(input: &str) -> IResult<&str, Expr> {
    let (input, name) = parse_identifier(input)?;
    let expr = match name {
        "pi" => PI,
        _ => Expr::Var(name.to_string()),
    };
    Ok((input, expr))
}

fn parse_parenthesized(input: &str) -> IResult<&str, Expr> {
    delimited(char('('), parse_sum, preceded(multispace0, char(')'))).parse(input)
}

fn parse_atom(input: &str) -> IResult<&str, Expr> {
    let (input, _) = multispace0(input)?;
    let (input, atom) =
        alt((parse_function_call, parse_symbol, parse_number, parse_parenthesized)).parse(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, atom))
}

fn parse_power(input: &str) -> IResult<&str, Expr> {
    let (input, base) = parse_atom(input)?;
    let (input, exponent) = opt(preceded(alt((tag("^"), tag("**"))), parse_unary)).parse(input)?;
    match exponent {
        Some(exponent) => Ok((input, base.pow(exponent))),
        None => Ok((input, base)),
    }
}

fn parse_unary(input: &str) -> IResult<&str, Expr> {
    let (input, _) = multispace0(input)?;
    if let Ok((input, operand)) = preceded(char::<&str, Error<&str>>('-'), parse_unary).parse(input) {
        let negated = match operand {
            Expr::Const(c) => Expr::Const(-c),
            other => -other,
        };
        return Ok((input, negated));
    }
    if let Ok((input, operand)) = preceded(char::<&str, Error<&str>>('+'), parse_unary).parse(input) {
        return Ok((input, operand));
    }
    parse_power(input)
}

fn parse_product(input: &str) -> IResult<&str, Expr> {
    let (input, first) = parse_unary(input)?;
    let multiply = terminated(char('*'), not(char('*')));
    let (input, rest) = many0(pair(alt((multiply, char('/'))), parse_unary)).parse(input)?;
    let product = rest.into_iter().fold(first, |acc, (op, rhs)| match op {
        '*' => acc * rhs,
        _ => acc / rhs,
    });
    Ok((input, product))
}

fn parse_sum(input: &str) -> IResult<&str, Expr> {
    let (input, first) = parse_product(input)?;
    let (input, rest) = many0(pair(alt((char('+'), char('-'))), parse_product)).parse(input)?;
    let sum = rest.into_iter().fold(first, |acc, (op, rhs)| match op {
        '+' => acc + rhs,
        _ => acc - rhs,
    });
    Ok((input, sum))
}

/// Parses the whole input; trailing characters are an error
pub fn parse_expression_func(input: &str) -> Result<Expr, CalculusError> {
    match parse_sum(input) {
        Ok((rest, expr)) if rest.trim().is_empty() => Ok(expr),
        Ok((rest, _)) => Err(CalculusError::Parse(format!(
            "unexpected input '{}' in '{}'",
            rest, input
        ))),
        Err(err) => Err(CalculusError::Parse(format!("{} in '{}'", err, input))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("3.5"), Ok(("", Expr::Const(3.5))));
        assert_eq!(parse_number("1e-6"), Ok(("", Expr::Const(1e-6))));
        assert_eq!(parse_number(".25*x"), Ok(("*x", Expr::Const(0.25))));
        assert_eq!(parse_number("0.25"), Ok(("", Expr::Const(0.25))));
        assert_eq!(parse_number("2."), Ok(("", Expr::Const(2.0))));
        assert!(parse_number("-1.5").is_err());
    }

    #[test]
    fn test_trailing_decimal() {
        let parsed = parse_expression_func("x*2.5").unwrap();
        assert_eq!(parsed, var("x") * Expr::Const(2.5));
        let parsed = parse_expression_func("3.5").unwrap();
        assert_eq!(parsed, Expr::Const(3.5));
        let parsed = parse_expression_func("t^0.5").unwrap();
        assert_eq!(parsed, var("t").pow(Expr::Const(0.5)));
    }

    #[test]
    fn test_precedence() {
        let parsed = parse_expression_func("x + 2*y^2").unwrap();
        let expected = var("x") + Expr::Const(2.0) * var("y").pow(Expr::Const(2.0));
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_unary_minus_binds_weaker_than_power() {
        let parsed = parse_expression_func("-x^2").unwrap();
        assert_eq!(parsed, -(var("x").pow(Expr::Const(2.0))));
        let parsed = parse_expression_func("-2*x").unwrap();
        assert_eq!(parsed, Expr::Const(-2.0) * var("x"));
    }

    #[test]
    fn test_power_is_right_associative() {
        let parsed = parse_expression_func("x**y^2").unwrap();
        assert_eq!(parsed, var("x").pow(var("y").pow(Expr::Const(2.0))));
    }

    #[test]
    fn test_functions() {
        let parsed = parse_expression_func("exp(u) * sin( v )").unwrap();
        assert_eq!(
            parsed,
            Expr::Exp(var("u").boxed()) * Expr::sin(var("v").boxed())
        );
        let parsed = parse_expression_func("sqrt(x)").unwrap();
        assert_eq!(parsed, var("x").pow(Expr::Const(0.5)));
        let parsed = parse_expression_func("f(x, y + 1)").unwrap();
        assert_eq!(
            parsed,
            Expr::Func("f".to_string(), vec![var("x"), var("y") + Expr::Const(1.0)])
        );
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse_expression_func("x + "),
            Err(CalculusError::Parse(_))
        ));
        assert!(matches!(
            parse_expression_func("sin(x, y)"),
            Err(CalculusError::Parse(_))
        ));
        assert!(matches!(
            parse_expression_func("(x + 1"),
            Err(CalculusError::Parse(_))
        ));
    }
}
