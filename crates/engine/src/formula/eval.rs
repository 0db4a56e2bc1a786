// Formula evaluator - reduces a parsed expression to a number

use super::functions;
use super::parser::{self, Expr, Op};
use crate::error::EngineError;
use crate::format;

/// Parse and evaluate an expression string.
pub fn evaluate(input: &str) -> Result<f64, EngineError> {
    let expr = parser::parse(input)?;
    evaluate_expr(&expr)
}

/// Evaluate and format for display (currency at or above 1000, plain otherwise).
pub fn evaluate_formatted(input: &str) -> Result<String, EngineError> {
    evaluate(input).map(format::format_result)
}

pub fn evaluate_expr(expr: &Expr) -> Result<f64, EngineError> {
    let value = match expr {
        Expr::Number(n) => *n,
        // The builder substitutes every tag, so a name surviving to here was typed
        Expr::Variable(name) => return Err(EngineError::UnknownVariable(name.clone())),
        Expr::Neg(inner) => -evaluate_expr(inner)?,
        Expr::Function { name, args } => {
            let f = functions::lookup(name)
                .ok_or_else(|| EngineError::UnknownFunction(name.clone()))?;
            let values = args
                .iter()
                .map(evaluate_expr)
                .collect::<Result<Vec<_>, _>>()?;
            f(&values)?
        }
        Expr::BinaryOp { op, left, right } => {
            let l = evaluate_expr(left)?;
            let r = evaluate_expr(right)?;
            match op {
                Op::Add => l + r,
                Op::Sub => l - r,
                Op::Mul => l * r,
                Op::Div => {
                    if r == 0.0 {
                        return Err(EngineError::DivisionByZero);
                    }
                    l / r
                }
                Op::Pow => l.powf(r),
            }
        }
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::MathDomain(format!("result is {}", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        assert_eq!(evaluate("1+2*3").unwrap(), 7.0);
        assert_eq!(evaluate("(1+2)*3").unwrap(), 9.0);
        assert_eq!(evaluate("10-4-3").unwrap(), 3.0);
        assert_eq!(evaluate("8/4/2").unwrap(), 1.0);
        assert_eq!(evaluate("2^3^2").unwrap(), 512.0);
        assert_eq!(evaluate("-2^2").unwrap(), -4.0);
        assert_eq!(evaluate("2^-1").unwrap(), 0.5);
        assert_eq!(evaluate("--3").unwrap(), 3.0);
        assert_eq!(evaluate("0").unwrap(), 0.0);
    }

    #[test]
    fn test_substituted_salary_formula() {
        let value = evaluate("175000*(1+0.05)").unwrap();
        assert!((value - 183750.0).abs() < 1e-6);
        assert_eq!(evaluate_formatted("175000*(1+0.05)").unwrap(), "$183,750.00");
    }

    #[test]
    fn test_functions() {
        assert_eq!(evaluate("SUM(1, 2, 3) * 2").unwrap(), 12.0);
        assert_eq!(evaluate("average(2, 4)").unwrap(), 3.0);
        assert_eq!(evaluate("MAX(1, MIN(5, 3))").unwrap(), 3.0);
        assert_eq!(evaluate("COUNT(7, 8, 9)").unwrap(), 3.0);
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(evaluate("1/0").unwrap_err(), EngineError::DivisionByZero);
        assert_eq!(evaluate("5/(2-2)").unwrap_err(), EngineError::DivisionByZero);
        assert_eq!(evaluate("AVERAGE()").unwrap_err(), EngineError::DivisionByZero);
    }

    #[test]
    fn test_math_domain() {
        assert!(matches!(evaluate("(0-8)^0.5"), Err(EngineError::MathDomain(_))));
        assert!(matches!(evaluate("0^-1"), Err(EngineError::MathDomain(_))));
        assert!(matches!(evaluate("10^400"), Err(EngineError::MathDomain(_))));
    }

    #[test]
    fn test_unknown_names() {
        assert_eq!(
            evaluate("Revenue*2").unwrap_err(),
            EngineError::UnknownVariable("Revenue".into())
        );
        assert_eq!(
            evaluate("FORECAST(1)").unwrap_err(),
            EngineError::UnknownFunction("FORECAST".into())
        );
    }

    #[test]
    fn test_syntax_errors() {
        for bad in ["(1+2", "1+", "1 2", "*"] {
            assert!(matches!(evaluate(bad), Err(EngineError::Syntax(_))), "{}", bad);
        }
    }

    #[test]
    fn test_formatted_small_values_are_plain() {
        assert_eq!(evaluate_formatted("0").unwrap(), "0");
        assert_eq!(evaluate_formatted("1/4").unwrap(), "0.25");
        assert_eq!(evaluate_formatted("999").unwrap(), "999");
        assert_eq!(evaluate_formatted("500*2").unwrap(), "$1,000.00");
    }
}
