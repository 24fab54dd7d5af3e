#[derive(Debug)]
/// Represents all errors that can occur while evaluating a compiled formula.
pub enum EvalError {
    /// A loop passed the built-in iteration bound. Formulas run inside tight
    /// sample-generation loops and must never hang the caller.
    LoopIterationLimit {
        /// Byte offset of the loop keyword.
        position: usize,
    },
    /// A positional argument was routed into a name bound to a constant.
    AssignedToConstant {
        /// The name of the constant.
        name: String,
    },
    /// `evaluate` received more values than the formula declares parameters.
    TooManyArguments {
        /// Declared parameter count.
        expected: usize,
        /// Values supplied.
        found:    usize,
    },
    /// A `break` or `continue` escaped to the evaluation root. The parser
    /// rejects these at compile time, so reaching this is an interpreter bug
    /// surfaced as an error instead of a panic.
    MisplacedControl {
        /// `"break"` or `"continue"`.
        keyword: &'static str,
    },
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoopIterationLimit { position } => {
                write!(f, "Error at offset {position}: Loop exceeded 256 iterations.")
            },

            Self::AssignedToConstant { name } => {
                write!(f, "Tried to assign constant '{name}'.")
            },

            Self::TooManyArguments { expected, found } => write!(f,
                                                                 "Expected at most {expected} argument(s), found {found}."),

            Self::MisplacedControl { keyword } => {
                write!(f, "'{keyword}' escaped the formula being evaluated.")
            },
        }
    }
}

impl std::error::Error for EvalError {}
