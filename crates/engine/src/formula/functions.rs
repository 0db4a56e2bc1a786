// Built-in functions callable from typed formula text
// Names are matched case-insensitively; the parser upper-cases them.

use crate::error::EngineError;

pub type FunctionImpl = fn(&[f64]) -> Result<f64, EngineError>;

/// Whether the evaluator implements `name`. The suggestion catalog also
/// offers names it does not (FORECAST).
pub fn is_known_function(name: &str) -> bool {
    lookup(name).is_some()
}

pub fn lookup(name: &str) -> Option<FunctionImpl> {
    let f: FunctionImpl = match name.to_ascii_uppercase().as_str() {
        "SUM" => sum,
        "AVERAGE" => average,
        "MIN" => min,
        "MAX" => max,
        "COUNT" => count,
        _ => return None,
    };
    Some(f)
}

fn sum(args: &[f64]) -> Result<f64, EngineError> {
    Ok(args.iter().sum())
}

fn average(args: &[f64]) -> Result<f64, EngineError> {
    if args.is_empty() {
        return Err(EngineError::DivisionByZero);
    }
    Ok(args.iter().sum::<f64>() / args.len() as f64)
}

// MIN()/MAX() of nothing is 0, as spreadsheets do
fn min(args: &[f64]) -> Result<f64, EngineError> {
    Ok(args.iter().copied().reduce(f64::min).unwrap_or(0.0))
}

fn max(args: &[f64]) -> Result<f64, EngineError> {
    Ok(args.iter().copied().reduce(f64::max).unwrap_or(0.0))
}

fn count(args: &[f64]) -> Result<f64, EngineError> {
    Ok(args.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &[f64]) -> Result<f64, EngineError> {
        lookup(name).unwrap()(args)
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(is_known_function("sum"));
        assert!(is_known_function("Average"));
        assert!(!is_known_function("FORECAST"));
        for name in ["SUM", "AVERAGE", "MIN", "MAX", "COUNT"] {
            assert!(is_known_function(name), "{}", name);
        }
    }

    #[test]
    fn test_aggregates() {
        assert_eq!(call("SUM", &[1.0, 2.0, 3.5]).unwrap(), 6.5);
        assert_eq!(call("AVERAGE", &[2.0, 4.0]).unwrap(), 3.0);
        assert_eq!(call("MIN", &[3.0, -1.0, 2.0]).unwrap(), -1.0);
        assert_eq!(call("MAX", &[3.0, -1.0, 2.0]).unwrap(), 3.0);
        assert_eq!(call("COUNT", &[9.0, 9.0]).unwrap(), 2.0);
    }

    #[test]
    fn test_empty_args() {
        assert_eq!(call("SUM", &[]).unwrap(), 0.0);
        assert_eq!(call("MIN", &[]).unwrap(), 0.0);
        assert_eq!(call("COUNT", &[]).unwrap(), 0.0);
        assert_eq!(call("AVERAGE", &[]).unwrap_err(), EngineError::DivisionByZero);
    }
}
