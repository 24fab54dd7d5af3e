use crate::{
    ast::{BinaryOp, Expr, Op, UnaryOp},
    error::ParseError,
    interpreter::parser::core::{Element, ParseResult},
};

/// Left-associative binary operators, one table per precedence level,
/// tightest binding first.
const BINARY_LEVELS: &[&[(Op, BinaryOp)]] = &[
    &[(Op::Caret, BinaryOp::Pow), (Op::StarStar, BinaryOp::Pow)],
    &[(Op::Star, BinaryOp::Mul),
      (Op::Slash, BinaryOp::Div),
      (Op::Percent, BinaryOp::Mod)],
    &[(Op::Plus, BinaryOp::Add), (Op::Minus, BinaryOp::Sub)],
    &[(Op::Shl, BinaryOp::Shl), (Op::Shr, BinaryOp::Shr)],
    &[(Op::Less, BinaryOp::Less),
      (Op::Greater, BinaryOp::Greater),
      (Op::LessEqual, BinaryOp::LessEqual),
      (Op::GreaterEqual, BinaryOp::GreaterEqual)],
    &[(Op::EqualEqual, BinaryOp::Equal),
      (Op::BangEqual, BinaryOp::NotEqual),
      (Op::TildeEqual, BinaryOp::Near)],
    &[(Op::AndAnd, BinaryOp::And)],
    &[(Op::OrOr, BinaryOp::Or)],
];

/// The right-associative assignment operators, loosest binding of all.
/// `None` is plain assignment; `Some(op)` combines the old value first.
const ASSIGNMENT_OPS: &[(Op, Option<BinaryOp>)] = &[
    (Op::Assign, None),
    (Op::PlusAssign, Some(BinaryOp::Add)),
    (Op::MinusAssign, Some(BinaryOp::Sub)),
    (Op::MulAssign, Some(BinaryOp::Mul)),
    (Op::DivAssign, Some(BinaryOp::Div)),
    (Op::ModAssign, Some(BinaryOp::Mod)),
    (Op::PowAssign, Some(BinaryOp::Pow)),
];

/// Reduces a flat operand/operator list into one expression tree.
///
/// The list is split at the loosest-binding operator present — the leftmost
/// one for the right-associative assignment level, the rightmost one for
/// every left-associative level — and both halves are reduced recursively.
/// Below all binary levels the prefix operators fold right-to-left.
///
/// # Parameters
/// - `elements`: The collected list.
/// - `position`: Offset to blame when the list is empty.
///
/// # Returns
/// The reduced expression.
pub(crate) fn resolve(elements: Vec<Element>, position: usize) -> ParseResult<Expr> {
    fold_assignment(elements, position)
}

/// Reduces the right-associative assignment level.
///
/// Splits at the *leftmost* assignment operator so `x = y = 5` groups as
/// `x = (y = 5)`. The left half must reduce to a variable reference.
fn fold_assignment(elements: Vec<Element>, position: usize) -> ParseResult<Expr> {
    let mut split = None;
    for (index, element) in elements.iter().enumerate() {
        if let Element::Binary { op, position } = element
           && let Some((_, combine)) = ASSIGNMENT_OPS.iter().find(|(symbol, _)| symbol == op)
        {
            split = Some((index, *combine, *position));
            break;
        }
    }

    let Some((index, combine, op_position)) = split else {
        return fold_binary(elements, BINARY_LEVELS.len(), position);
    };

    let mut lhs = elements;
    let rhs = lhs.split_off(index + 1);
    lhs.pop(); // the operator itself

    let target = fold_binary(lhs, BINARY_LEVELS.len(), position)?;
    let value = fold_assignment(rhs, position)?;

    match target {
        Expr::Variable { name, variable, .. } => {
            Ok(Expr::Assign { name,
                              variable,
                              op: combine,
                              value: Box::new(value),
                              position: op_position })
        },
        _ => Err(ParseError::InvalidAssignmentTarget { position: op_position }),
    }
}

/// Reduces one left-associative binary level.
///
/// `level` counts the levels still to try, loosest first; `0` hands over to
/// the prefix fold. Splitting at the *rightmost* operator of the level keeps
/// chains like `a - b - c` grouped as `(a - b) - c`.
fn fold_binary(elements: Vec<Element>, level: usize, position: usize) -> ParseResult<Expr> {
    if level == 0 {
        return fold_unary(elements, position);
    }

    let table = BINARY_LEVELS[level - 1];

    let mut split = None;
    for (index, element) in elements.iter().enumerate().rev() {
        if let Element::Binary { op, position } = element
           && let Some((_, resolved)) = table.iter().find(|(symbol, _)| symbol == op)
        {
            split = Some((index, *resolved, *position));
            break;
        }
    }

    let Some((index, op, op_position)) = split else {
        return fold_binary(elements, level - 1, position);
    };

    let mut lhs = elements;
    let rhs = lhs.split_off(index + 1);
    lhs.pop(); // the operator itself

    let rhs = fold_binary(rhs, level - 1, position)?;
    let lhs = fold_binary(lhs, level, position)?;

    Ok(Expr::Binary { op,
                      lhs: Box::new(lhs),
                      rhs: Box::new(rhs),
                      position: op_position })
}

/// Folds the prefix operators onto the single remaining operand.
///
/// `+` is a no-op; `-`, `!` and `~` become unary nodes; `++` and `--`
/// desugar to compound assignment by one and therefore require a variable
/// operand.
fn fold_unary(mut elements: Vec<Element>, position: usize) -> ParseResult<Expr> {
    let Some(last) = elements.pop() else {
        return Err(ParseError::MissingExpression { position });
    };

    let mut ret = match last {
        Element::Operand(expr) => expr,
        Element::Binary { op, position } | Element::Prefix { op, position } => {
            return Err(ParseError::UnexpectedToken { token: op.to_string(),
                                                     position });
        },
    };

    while let Some(element) = elements.pop() {
        match element {
            Element::Prefix { op, position } => {
                ret = match op {
                    Op::Plus => ret,
                    Op::Minus => Expr::Unary { op:      UnaryOp::Neg,
                                               operand: Box::new(ret),
                                               position },
                    Op::Bang => Expr::Unary { op:      UnaryOp::Not,
                                              operand: Box::new(ret),
                                              position },
                    Op::Tilde => Expr::Unary { op:      UnaryOp::Inv,
                                               operand: Box::new(ret),
                                               position },
                    Op::PlusPlus => step_assignment(ret, BinaryOp::Add, position)?,
                    Op::MinusMinus => step_assignment(ret, BinaryOp::Sub, position)?,
                    _ => {
                        return Err(ParseError::UnexpectedToken { token: op.to_string(),
                                                                 position });
                    },
                };
            },

            Element::Binary { op, position } => {
                return Err(ParseError::UnexpectedToken { token: op.to_string(),
                                                         position });
            },

            Element::Operand(expr) => {
                let position = expr.position();
                return Err(ParseError::UnexpectedToken { token: expr.to_string(),
                                                         position });
            },
        }
    }

    Ok(ret)
}

/// Builds the desugared form of `++x` / `--x`: assign `x` its old value
/// combined with one, yielding the new value.
fn step_assignment(target: Expr, op: BinaryOp, position: usize) -> ParseResult<Expr> {
    match target {
        Expr::Variable { name, variable, .. } => {
            Ok(Expr::Assign { name,
                              variable,
                              op: Some(op),
                              value: Box::new(Expr::Constant { value: 1.0,
                                                               position }),
                              position })
        },
        _ => Err(ParseError::InvalidAssignmentTarget { position }),
    }
}
