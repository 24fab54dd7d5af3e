use logos::Logos;

use crate::{ast::Op, error::ParseError};

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    /// Numeric literal tokens, such as `42`, `3.14`, `.5` or `2.1e-10`.
    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", parse_number)]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", parse_number)]
    Number(f64),
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `while`
    #[token("while")]
    While,
    /// `do`
    #[token("do")]
    Do,
    /// `for`
    #[token("for")]
    For,
    /// `break`
    #[token("break")]
    Break,
    /// `continue`
    #[token("continue")]
    Continue,
    /// `return`
    #[token("return")]
    Return,
    /// `switch`
    #[token("switch")]
    Switch,
    /// `case`
    #[token("case")]
    Case,
    /// `default`
    #[token("default")]
    Default,
    /// Identifier tokens; variable or function names such as `t` or `sin`.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// Operator tokens, recognized by maximal munch: `**` before `*`, `<=`
    /// before `<`, and so on.
    #[token("**", |_| Op::StarStar)]
    #[token("^=", |_| Op::PowAssign)]
    #[token("^", |_| Op::Caret)]
    #[token("*=", |_| Op::MulAssign)]
    #[token("*", |_| Op::Star)]
    #[token("/=", |_| Op::DivAssign)]
    #[token("/", |_| Op::Slash)]
    #[token("%=", |_| Op::ModAssign)]
    #[token("%", |_| Op::Percent)]
    #[token("++", |_| Op::PlusPlus)]
    #[token("+=", |_| Op::PlusAssign)]
    #[token("+", |_| Op::Plus)]
    #[token("--", |_| Op::MinusMinus)]
    #[token("-=", |_| Op::MinusAssign)]
    #[token("-", |_| Op::Minus)]
    #[token("<<", |_| Op::Shl)]
    #[token("<=", |_| Op::LessEqual)]
    #[token("<", |_| Op::Less)]
    #[token(">>", |_| Op::Shr)]
    #[token(">=", |_| Op::GreaterEqual)]
    #[token(">", |_| Op::Greater)]
    #[token("==", |_| Op::EqualEqual)]
    #[token("=", |_| Op::Assign)]
    #[token("!=", |_| Op::BangEqual)]
    #[token("!", |_| Op::Bang)]
    #[token("~=", |_| Op::TildeEqual)]
    #[token("~", |_| Op::Tilde)]
    #[token("&&", |_| Op::AndAnd)]
    #[token("||", |_| Op::OrOr)]
    Operator(Op),
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `,`
    #[token(",")]
    Comma,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `:`
    #[token(":")]
    Colon,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::If => write!(f, "if"),
            Self::Else => write!(f, "else"),
            Self::While => write!(f, "while"),
            Self::Do => write!(f, "do"),
            Self::For => write!(f, "for"),
            Self::Break => write!(f, "break"),
            Self::Continue => write!(f, "continue"),
            Self::Return => write!(f, "return"),
            Self::Switch => write!(f, "switch"),
            Self::Case => write!(f, "case"),
            Self::Default => write!(f, "default"),
            Self::Identifier(name) => write!(f, "{name}"),
            Self::Operator(op) => write!(f, "{op}"),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::LBrace => write!(f, "{{"),
            Self::RBrace => write!(f, "}}"),
            Self::Comma => write!(f, ","),
            Self::Semicolon => write!(f, ";"),
            Self::Colon => write!(f, ":"),
        }
    }
}

/// Parses a numeric literal from the current token slice.
///
/// # Parameters
/// - `lex`: Reference to the Logos lexer at the current token.
///
/// # Returns
/// - `Some(f64)`: The parsed value if successful.
/// - `None`: If the token slice is not a valid number.
fn parse_number(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Tokenizes a whole source string.
///
/// Each token is paired with the byte offset of its first character; offsets
/// are carried verbatim into every later error message.
///
/// # Parameters
/// - `source`: The formula text.
///
/// # Returns
/// The ordered token sequence.
///
/// # Errors
/// Returns [`ParseError::UnrecognizedToken`] naming the offending slice and
/// its offset when the input contains anything outside the token grammar.
pub fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(token) = lexer.next() {
        if let Ok(token) = token {
            tokens.push((token, lexer.span().start));
        } else {
            return Err(ParseError::UnrecognizedToken { text:     lexer.slice().to_string(),
                                                       position: lexer.span().start, });
        }
    }

    Ok(tokens)
}
