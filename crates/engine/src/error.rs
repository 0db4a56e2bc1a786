use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A tag (or bare identifier) names a variable absent from the registry.
    UnknownVariable(String),
    /// Function call to a name the evaluator does not implement.
    UnknownFunction(String),
    /// Malformed expression text (mismatched parens, trailing operator, ...).
    Syntax(String),
    /// Division by zero.
    DivisionByZero,
    /// Result outside the real numbers (NaN, infinity).
    MathDomain(String),
    /// Archive save with a blank name.
    EmptyName,
}

impl EngineError {
    /// Short machine-readable kind, used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownVariable(_) => "unknown_variable",
            Self::UnknownFunction(_) => "unknown_function",
            Self::Syntax(_) => "syntax_error",
            Self::DivisionByZero => "division_by_zero",
            Self::MathDomain(_) => "math_domain_error",
            Self::EmptyName => "empty_name",
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownVariable(name) => write!(f, "unknown variable: {name}"),
            Self::UnknownFunction(name) => write!(f, "unknown function: {name}"),
            Self::Syntax(msg) => write!(f, "syntax error: {msg}"),
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::MathDomain(msg) => write!(f, "math domain error: {msg}"),
            Self::EmptyName => write!(f, "name cannot be empty"),
        }
    }
}

impl std::error::Error for EngineError {}
