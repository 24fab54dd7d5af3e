use std::collections::HashMap;

use ordered_float::OrderedFloat;

use crate::{
    ast::{BinaryOp, Expr},
    error::EvalError,
    interpreter::evaluator::{flow::Flow, loops, scalar},
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a [`Flow`] tag or an [`EvalError`]
/// describing the failure.
pub type EvalResult<T> = Result<T, EvalError>;

/// Unwraps a `Normal` evaluation result to its value, propagating any other
/// tag (and any error) out of the enclosing function unchanged.
macro_rules! value {
    ($flow:expr) => {
        match $flow? {
            $crate::interpreter::evaluator::flow::Flow::Normal(value) => value,
            other => return Ok(other),
        }
    };
}
pub(crate) use value;

/// Evaluates one AST node.
///
/// This is the main entry point for evaluation. The evaluator dispatches
/// over the closed node type; state lives entirely in the shared variable
/// slots, so evaluation needs no context of its own.
///
/// # Parameters
/// - `expr`: The node to evaluate.
///
/// # Returns
/// The resulting [`Flow`] tag — a value for ordinary expressions, or an
/// in-flight control transfer for `break`, `continue` and `return`.
pub fn evaluate(expr: &Expr) -> EvalResult<Flow> {
    match expr {
        Expr::Constant { value, .. } => Ok(Flow::Normal(*value)),

        Expr::Variable { variable, .. } => Ok(Flow::Normal(variable.get())),

        Expr::Unary { op, operand, .. } => {
            let operand = value!(evaluate(operand));
            Ok(Flow::Normal(scalar::apply_unary(*op, operand)))
        },

        Expr::Binary { op, lhs, rhs, .. } => evaluate_binary(*op, lhs, rhs),

        Expr::Assign { variable, op, value, .. } => {
            let rhs = value!(evaluate(value));
            let result = match op {
                Some(op) => scalar::apply_binary(*op, variable.get(), rhs),
                None => rhs,
            };
            Ok(Flow::Normal(variable.set(result)))
        },

        Expr::Call { function, args, .. } => {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(value!(evaluate(arg)));
            }
            Ok(Flow::Normal(function.apply(&values)))
        },

        Expr::Sequence { statements, .. } => {
            let mut ret = 0.0;
            for statement in statements {
                ret = value!(evaluate(statement));
            }
            Ok(Flow::Normal(ret))
        },

        Expr::Conditional { condition,
                            true_branch,
                            false_branch,
                            .. } => {
            if value!(evaluate(condition)) > 0.0 {
                evaluate(true_branch)
            } else {
                match false_branch {
                    Some(branch) => evaluate(branch),
                    None => Ok(Flow::Normal(0.0)),
                }
            }
        },

        Expr::While { condition,
                      body,
                      post_test,
                      position, } => loops::evaluate_while(condition, body, *post_test, *position),

        Expr::For { init,
                    condition,
                    increment,
                    body,
                    position, } => loops::evaluate_for(init, condition, increment, body, *position),

        Expr::SimpleFor { variable,
                          first,
                          last,
                          body,
                          position,
                          .. } => loops::evaluate_simple_for(variable, first, last, body, *position),

        Expr::Switch { parameter,
                       value_map,
                       cases,
                       default,
                       .. } => evaluate_switch(parameter, value_map, cases, default.as_deref()),

        Expr::Break { is_continue, .. } => {
            Ok(if *is_continue { Flow::Continue } else { Flow::Break })
        },

        Expr::Return { value, .. } => {
            let value = value!(evaluate(value));
            Ok(Flow::Return(value))
        },
    }
}

/// Evaluates a binary operation.
///
/// `&&` and `||` short-circuit: the right operand only runs when the left
/// one has not already decided the outcome. Everything else evaluates both
/// operands left-to-right and applies the scalar kernel.
fn evaluate_binary(op: BinaryOp, lhs: &Expr, rhs: &Expr) -> EvalResult<Flow> {
    match op {
        BinaryOp::And => {
            let lhs = value!(evaluate(lhs));
            if lhs > 0.0 {
                let rhs = value!(evaluate(rhs));
                Ok(Flow::Normal(if rhs > 0.0 { 1.0 } else { 0.0 }))
            } else {
                Ok(Flow::Normal(0.0))
            }
        },

        BinaryOp::Or => {
            let lhs = value!(evaluate(lhs));
            if lhs > 0.0 {
                Ok(Flow::Normal(1.0))
            } else {
                let rhs = value!(evaluate(rhs));
                Ok(Flow::Normal(if rhs > 0.0 { 1.0 } else { 0.0 }))
            }
        },

        _ => {
            let lhs = value!(evaluate(lhs));
            let rhs = value!(evaluate(rhs));
            Ok(Flow::Normal(scalar::apply_binary(op, lhs, rhs)))
        },
    }
}

/// Evaluates a `switch`.
///
/// The selector is evaluated once and looked up in the value→index map. On
/// a hit, the matched case and every case after it run in order (C-style
/// fallthrough); a `break` ends the whole switch with `0.0`. The `default`
/// clause, when present, always runs afterwards and supplies the result;
/// otherwise the result is the last case value executed.
fn evaluate_switch(parameter: &Expr,
                   value_map: &HashMap<OrderedFloat<f64>, usize>,
                   cases: &[Expr],
                   default: Option<&Expr>)
                   -> EvalResult<Flow> {
    let selector = value!(evaluate(parameter));

    let mut ret = 0.0;

    if let Some(&start) = value_map.get(&OrderedFloat(selector)) {
        for case in cases.iter().skip(start) {
            match evaluate(case)? {
                Flow::Normal(value) => ret = value,
                Flow::Break => return Ok(Flow::Normal(0.0)),
                other => return Ok(other),
            }
        }
    }

    match default {
        Some(default) => match evaluate(default)? {
            Flow::Normal(value) => Ok(Flow::Normal(value)),
            Flow::Break => Ok(Flow::Normal(0.0)),
            other => Ok(other),
        },
        None => Ok(Flow::Normal(ret)),
    }
}
