// Formula building, parsing and evaluation

pub mod builder;
pub mod eval;
pub mod functions;
pub mod parser;

pub use builder::build_expression;
pub use eval::{evaluate, evaluate_formatted};
