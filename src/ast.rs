use std::{cell::Cell, collections::HashMap, fmt, rc::Rc};

use ordered_float::OrderedFloat;

use crate::interpreter::functions::FunctionImpl;

/// A mutable variable slot shared between a compiled formula and its host.
///
/// The parser hands every reference to the same named variable a clone of one
/// handle, so assignments made while evaluating are visible to the host (and
/// host writes are visible to the next evaluation). Cloning a `Variable`
/// clones the handle, not the slot.
///
/// The slot is reference counted and not synchronized; a compiled formula is
/// single-threaded by construction.
///
/// ## Example
/// ```
/// use wavexpr::Variable;
///
/// let var = Variable::new(1.5);
/// let alias = var.clone();
///
/// alias.set(4.0);
/// assert_eq!(var.get(), 4.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Variable {
    cell: Rc<Cell<f64>>,
}

impl Variable {
    /// Creates a fresh slot holding `value`.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self { cell: Rc::new(Cell::new(value)), }
    }

    /// Returns the current value of the slot.
    #[must_use]
    pub fn get(&self) -> f64 {
        self.cell.get()
    }

    /// Overwrites the slot and returns the value written.
    pub fn set(&self, value: f64) -> f64 {
        self.cell.set(value);
        value
    }
}

/// An operator symbol as produced by the lexer.
///
/// `Op` only identifies the spelling of an operator token; whether it acts as
/// a binary or prefix operator is decided by the parser from its position,
/// and its meaning is resolved through the precedence tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `^`
    Caret,
    /// `**`
    StarStar,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `++`
    PlusPlus,
    /// `--`
    MinusMinus,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
    /// `==`
    EqualEqual,
    /// `!=`
    BangEqual,
    /// `~=`
    TildeEqual,
    /// `&&`
    AndAnd,
    /// `||`
    OrOr,
    /// `!`
    Bang,
    /// `~`
    Tilde,
    /// `=`
    Assign,
    /// `+=`
    PlusAssign,
    /// `-=`
    MinusAssign,
    /// `*=`
    MulAssign,
    /// `/=`
    DivAssign,
    /// `%=`
    ModAssign,
    /// `^=`
    PowAssign,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Caret => "^",
            Self::StarStar => "**",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::PlusPlus => "++",
            Self::MinusMinus => "--",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
            Self::TildeEqual => "~=",
            Self::AndAnd => "&&",
            Self::OrOr => "||",
            Self::Bang => "!",
            Self::Tilde => "~",
            Self::Assign => "=",
            Self::PlusAssign => "+=",
            Self::MinusAssign => "-=",
            Self::MulAssign => "*=",
            Self::DivAssign => "/=",
            Self::ModAssign => "%=",
            Self::PowAssign => "^=",
        };
        write!(f, "{symbol}")
    }
}

/// A resolved binary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Remainder (`%`)
    Mod,
    /// Exponentiation (`^`, `**`)
    Pow,
    /// Bitwise left shift on truncated operands (`<<`)
    Shl,
    /// Arithmetic right shift on truncated operands (`>>`)
    Shr,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal (`==`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Within a fixed ULP tolerance (`~=`)
    Near,
    /// Logical and; positive means true (`&&`)
    And,
    /// Logical or; positive means true (`||`)
    Or,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Near => "~=",
            Self::And => "&&",
            Self::Or => "||",
        };
        write!(f, "{symbol}")
    }
}

/// A resolved prefix operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation (`-x`).
    Neg,
    /// Logical not; positive input yields `0.0`, anything else `1.0` (`!x`).
    Not,
    /// Bitwise complement of the truncated operand (`~x`).
    Inv,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Neg => "-",
            Self::Not => "!",
            Self::Inv => "~",
        };
        write!(f, "{symbol}")
    }
}

/// An abstract syntax tree node of a compiled formula.
///
/// `Expr` is a closed sum over every construct of the language; the evaluator
/// and the optimizer traverse it with exhaustive matches, so adding a node
/// kind is a compiler-checked change. Each variant records the byte offset of
/// the source text it was parsed from.
#[derive(Debug, Clone)]
pub enum Expr {
    /// A numeric literal or folded constant subtree.
    Constant {
        /// The fixed value.
        value:    f64,
        /// Byte offset in the source.
        position: usize,
    },
    /// A reference to a mutable variable.
    Variable {
        /// Name of the variable, kept for rendering and diagnostics.
        name:     String,
        /// Shared slot holding the current value.
        variable: Variable,
        /// Byte offset in the source.
        position: usize,
    },
    /// A prefix operation.
    Unary {
        /// The operation to apply.
        op:       UnaryOp,
        /// The operand expression.
        operand:  Box<Self>,
        /// Byte offset in the source.
        position: usize,
    },
    /// A binary operation.
    Binary {
        /// The operation to apply.
        op:       BinaryOp,
        /// Left operand.
        lhs:      Box<Self>,
        /// Right operand.
        rhs:      Box<Self>,
        /// Byte offset in the source.
        position: usize,
    },
    /// Plain or compound assignment into a variable, including the desugared
    /// forms of `++x` and `--x`. Yields the value written.
    Assign {
        /// Name of the target variable.
        name:     String,
        /// Slot being written.
        variable: Variable,
        /// `None` for `=`, the combining operation for `+=` and friends.
        op:       Option<BinaryOp>,
        /// Right-hand side expression.
        value:    Box<Self>,
        /// Byte offset in the source.
        position: usize,
    },
    /// A call to a registered function, resolved by name and arity at parse
    /// time.
    Call {
        /// Registry name of the function.
        name:     &'static str,
        /// The implementation selected during parsing.
        function: FunctionImpl,
        /// Argument expressions, evaluated left to right.
        args:     Vec<Self>,
        /// Byte offset in the source.
        position: usize,
    },
    /// Statements executed in order; the value is that of the last one, or
    /// `0.0` when empty.
    Sequence {
        /// The statements, in source order.
        statements: Vec<Self>,
        /// Byte offset in the source.
        position:   usize,
    },
    /// An `if`/`else` statement. A positive condition selects the true path.
    Conditional {
        /// The condition expression.
        condition:    Box<Self>,
        /// Statement executed when the condition is positive.
        true_branch:  Box<Self>,
        /// Statement executed otherwise, if present.
        false_branch: Option<Box<Self>>,
        /// Byte offset in the source.
        position:     usize,
    },
    /// A `while` or `do`/`while` loop.
    While {
        /// The loop condition.
        condition: Box<Self>,
        /// The loop body.
        body:      Box<Self>,
        /// `true` for `do`/`while`: the body runs before the first test.
        post_test: bool,
        /// Byte offset in the source.
        position:  usize,
    },
    /// A classic three-clause `for` loop.
    For {
        /// Initializer, run once.
        init:      Box<Self>,
        /// Condition tested before each iteration.
        condition: Box<Self>,
        /// Increment, run after each iteration.
        increment: Box<Self>,
        /// The loop body.
        body:      Box<Self>,
        /// Byte offset in the source.
        position:  usize,
    },
    /// The ranged sugar `for (var = first, last) body`, stepping the variable
    /// from `first` to `last` inclusive by one.
    SimpleFor {
        /// Name of the loop variable.
        name:     String,
        /// Slot assigned on every iteration.
        variable: Variable,
        /// First value, inclusive.
        first:    Box<Self>,
        /// Last value, inclusive.
        last:     Box<Self>,
        /// The loop body.
        body:     Box<Self>,
        /// Byte offset in the source.
        position: usize,
    },
    /// A `switch` with C-style fallthrough.
    Switch {
        /// The selector expression, evaluated once.
        parameter: Box<Self>,
        /// Maps a case label value to the index of its first statement in
        /// `cases`.
        value_map: HashMap<OrderedFloat<f64>, usize>,
        /// Case statements in source order; execution falls through from the
        /// matched index to the end unless interrupted by `break`.
        cases:     Vec<Self>,
        /// The `default` clause, executed after the cases when present.
        default:   Option<Box<Self>>,
        /// Byte offset in the source.
        position:  usize,
    },
    /// A `break` or `continue` statement.
    Break {
        /// `true` for `continue`, `false` for `break`.
        is_continue: bool,
        /// Byte offset in the source.
        position:    usize,
    },
    /// A `return` statement carrying the formula's final result.
    Return {
        /// The result expression.
        value:    Box<Self>,
        /// Byte offset in the source.
        position: usize,
    },
}

impl Expr {
    /// Gets the source byte offset recorded on `self`.
    #[must_use]
    pub const fn position(&self) -> usize {
        match self {
            Self::Constant { position, .. }
            | Self::Variable { position, .. }
            | Self::Unary { position, .. }
            | Self::Binary { position, .. }
            | Self::Assign { position, .. }
            | Self::Call { position, .. }
            | Self::Sequence { position, .. }
            | Self::Conditional { position, .. }
            | Self::While { position, .. }
            | Self::For { position, .. }
            | Self::SimpleFor { position, .. }
            | Self::Switch { position, .. }
            | Self::Break { position, .. }
            | Self::Return { position, .. } => *position,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant { value, .. } => write!(f, "{value}"),
            Self::Variable { name, .. } => write!(f, "{name}"),
            Self::Unary { op, operand, .. } => write!(f, "{op}({operand})"),
            Self::Binary { op, lhs, rhs, .. } => write!(f, "({lhs} {op} {rhs})"),
            Self::Assign { name, op, value, .. } => match op {
                Some(op) => write!(f, "({name} {op}= {value})"),
                None => write!(f, "({name} = {value})"),
            },
            Self::Call { name, args, .. } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            },
            Self::Sequence { statements, .. } => {
                write!(f, "seq(")?;
                for (i, statement) in statements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{statement}")?;
                }
                write!(f, ")")
            },
            Self::Conditional { condition,
                                true_branch,
                                false_branch, .. } => match false_branch {
                Some(false_branch) => write!(f,
                                             "if ({condition}) {{ {true_branch} }} else {{ {false_branch} }}"),
                None => write!(f, "if ({condition}) {{ {true_branch} }}"),
            },
            Self::While { condition,
                          body,
                          post_test, .. } => {
                if *post_test {
                    write!(f, "do {{ {body} }} while ({condition})")
                } else {
                    write!(f, "while ({condition}) {{ {body} }}")
                }
            },
            Self::For { init,
                        condition,
                        increment,
                        body, .. } => {
                write!(f, "for ({init}; {condition}; {increment}) {{ {body} }}")
            },
            Self::SimpleFor { name,
                              first,
                              last,
                              body, .. } => {
                write!(f, "for ({name} = {first}, {last}) {{ {body} }}")
            },
            Self::Switch { parameter,
                           value_map,
                           cases,
                           default, .. } => {
                write!(f, "switch ({parameter}) {{ ")?;
                for (i, case) in cases.iter().enumerate() {
                    for (value, index) in value_map {
                        if *index == i {
                            write!(f, "case {value}: ")?;
                            break;
                        }
                    }
                    write!(f, "{case} ")?;
                }
                if let Some(default) = default {
                    write!(f, "default: {default} ")?;
                }
                write!(f, "}}")
            },
            Self::Break { is_continue, .. } => {
                write!(f, "{}", if *is_continue { "continue" } else { "break" })
            },
            Self::Return { value, .. } => write!(f, "return {value}"),
        }
    }
}
