#[derive(Debug)]
/// Represents all errors that can occur while lexing or parsing a formula.
///
/// Every variant carries the byte offset of the first offending source
/// character, so a caller can point at the exact location in its diagnostics.
pub enum ParseError {
    /// The lexer hit input it does not recognize.
    UnrecognizedToken {
        /// The offending source slice.
        text:     String,
        /// Byte offset where the slice starts.
        position: usize,
    },
    /// Found a well-formed token somewhere it cannot appear.
    UnexpectedToken {
        /// A rendering of the token encountered.
        token:    String,
        /// Byte offset of the token.
        position: usize,
    },
    /// Reached the end of input while a construct was still open.
    UnexpectedEndOfInput {
        /// Byte offset just past the last token.
        position: usize,
    },
    /// A specific token was required but something else was found.
    Expected {
        /// Description of what the parser required.
        expected: &'static str,
        /// A rendering of the token actually found.
        found:    String,
        /// Byte offset of the found token.
        position: usize,
    },
    /// Referenced a variable that is neither declared, a constant, nor being
    /// introduced by an assignment.
    UnknownVariable {
        /// The identifier as written.
        name:     String,
        /// Byte offset of the identifier.
        position: usize,
    },
    /// Called a function with a name and argument count that match no
    /// registered implementation.
    UnknownFunction {
        /// The function name as written.
        name:     String,
        /// The number of arguments supplied.
        arity:    usize,
        /// Byte offset of the function name.
        position: usize,
    },
    /// The left side of an assignment does not name a mutable variable.
    InvalidAssignmentTarget {
        /// Byte offset of the assignment operator.
        position: usize,
    },
    /// The loop variable of a ranged `for` is not a mutable variable.
    InvalidLoopVariable {
        /// The identifier as written.
        name:     String,
        /// Byte offset of the identifier.
        position: usize,
    },
    /// `break` or `continue` appeared outside anything that could intercept
    /// it.
    MisplacedKeyword {
        /// The keyword as written.
        keyword:  &'static str,
        /// Byte offset of the keyword.
        position: usize,
    },
    /// A `case` label did not fold to a constant value.
    CaseRequiresConstant {
        /// Byte offset of the label expression.
        position: usize,
    },
    /// Two `case` labels fold to the same value.
    DuplicateCase {
        /// The duplicated label value.
        value:    f64,
        /// Byte offset of the second label.
        position: usize,
    },
    /// An operand was required but none was present.
    MissingExpression {
        /// Byte offset where the operand was expected.
        position: usize,
    },
    /// Tokens remained after the formula was fully parsed.
    ExtraToken {
        /// A rendering of the first leftover token.
        token:    String,
        /// Byte offset of that token.
        position: usize,
    },
}

impl ParseError {
    /// Gets the source byte offset carried by this error.
    #[must_use]
    pub const fn position(&self) -> usize {
        match self {
            Self::UnrecognizedToken { position, .. }
            | Self::UnexpectedToken { position, .. }
            | Self::UnexpectedEndOfInput { position }
            | Self::Expected { position, .. }
            | Self::UnknownVariable { position, .. }
            | Self::UnknownFunction { position, .. }
            | Self::InvalidAssignmentTarget { position }
            | Self::InvalidLoopVariable { position, .. }
            | Self::MisplacedKeyword { position, .. }
            | Self::CaseRequiresConstant { position }
            | Self::DuplicateCase { position, .. }
            | Self::MissingExpression { position }
            | Self::ExtraToken { position, .. } => *position,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnrecognizedToken { text, position } => {
                write!(f, "Error at offset {position}: Unrecognized input '{text}'.")
            },

            Self::UnexpectedToken { token, position } => {
                write!(f, "Error at offset {position}: Unexpected token '{token}'.")
            },

            Self::UnexpectedEndOfInput { position } => {
                write!(f, "Error at offset {position}: Unexpected end of input.")
            },

            Self::Expected { expected,
                             found,
                             position, } => {
                write!(f, "Error at offset {position}: Expected {expected}, found '{found}'.")
            },

            Self::UnknownVariable { name, position } => {
                write!(f, "Error at offset {position}: Variable '{name}' not found.")
            },

            Self::UnknownFunction { name,
                                    arity,
                                    position, } => write!(f,
                                                          "Error at offset {position}: Function '{name}' with {arity} argument(s) not found."),

            Self::InvalidAssignmentTarget { position } => write!(f,
                                                                 "Error at offset {position}: Left side of an assignment must be a variable."),

            Self::InvalidLoopVariable { name, position } => write!(f,
                                                                   "Error at offset {position}: Loop variable '{name}' must be a mutable variable."),

            Self::MisplacedKeyword { keyword, position } => write!(f,
                                                                   "Error at offset {position}: '{keyword}' is not inside a construct that could intercept it."),

            Self::CaseRequiresConstant { position } => {
                write!(f, "Error at offset {position}: Case labels must be constant.")
            },

            Self::DuplicateCase { value, position } => {
                write!(f, "Error at offset {position}: Duplicate case label {value}.")
            },

            Self::MissingExpression { position } => {
                write!(f, "Error at offset {position}: Expression missing.")
            },

            Self::ExtraToken { token, position } => write!(f,
                                                           "Error at offset {position}: Extra token '{token}' after the end of the formula."),
        }
    }
}

impl std::error::Error for ParseError {}
