// Expression builder - linearizes a token sequence into evaluable text
//
// Tags are replaced by their registry value; text tokens are copied trimmed.
// Nothing is reordered and no operators are inserted between operands.

use crate::error::EngineError;
use crate::registry::VariableLookup;
use crate::sequence::{Token, TokenKind};

/// Build the expression string for `tokens`. An empty result is `"0"`.
pub fn build_expression(tokens: &[Token], vars: &impl VariableLookup) -> Result<String, EngineError> {
    let mut expr = String::new();

    for token in tokens {
        match token.kind() {
            TokenKind::Tag => {
                let value = vars
                    .value_of(token.value())
                    .ok_or_else(|| EngineError::UnknownVariable(token.value().to_string()))?;
                // Parenthesize negatives so "2^" followed by -1 stays 2^(-1)
                if value < 0.0 {
                    expr.push_str(&format!("({})", value));
                } else {
                    expr.push_str(&value.to_string());
                }
            }
            TokenKind::Text => expr.push_str(token.value().trim()),
        }
    }

    if expr.trim().is_empty() {
        return Ok("0".to_string());
    }
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_build_empty_is_zero() {
        assert_eq!(build_expression(&[], &vars(&[])).unwrap(), "0");
        let blanks = [Token::text(" "), Token::text("  ")];
        assert_eq!(build_expression(&blanks, &vars(&[])).unwrap(), "0");
    }

    #[test]
    fn test_build_substitutes_tags() {
        let tokens = [Token::tag("Base salary"), Token::text("*"), Token::text("(1+0.05)")];
        let expr = build_expression(&tokens, &vars(&[("Base salary", 175000.0)])).unwrap();
        assert_eq!(expr, "175000*(1+0.05)");
    }

    #[test]
    fn test_build_skips_whitespace_and_trims() {
        let tokens = [Token::text(" 2"), Token::text(" "), Token::text("+"), Token::text("3 ")];
        assert_eq!(build_expression(&tokens, &vars(&[])).unwrap(), "2+3");
    }

    #[test]
    fn test_build_no_implicit_operator() {
        let tokens = [Token::tag("A"), Token::tag("B")];
        assert_eq!(build_expression(&tokens, &vars(&[("A", 1.0), ("B", 2.0)])).unwrap(), "12");
    }

    #[test]
    fn test_build_negative_value_parenthesized() {
        let tokens = [Token::text("2"), Token::text("^"), Token::tag("N")];
        assert_eq!(build_expression(&tokens, &vars(&[("N", -1.0)])).unwrap(), "2^(-1)");
    }

    #[test]
    fn test_build_unknown_variable() {
        let tokens = [Token::tag("Nonexistent")];
        assert_eq!(
            build_expression(&tokens, &vars(&[])).unwrap_err(),
            EngineError::UnknownVariable("Nonexistent".into())
        );
    }
}
