/// Compile-time errors.
///
/// Defines all error types that can occur while lexing and parsing a formula.
/// Parse errors include unrecognized input, syntax mistakes, unknown
/// variables or functions, and invalid constructs detected before evaluation.
pub mod parse_error;

/// Run-time errors.
///
/// Contains all error types that can be raised while evaluating a compiled
/// formula, such as exceeding the loop iteration bound or routing a
/// positional argument into a constant.
pub mod eval_error;

pub use eval_error::EvalError;
pub use parse_error::ParseError;
