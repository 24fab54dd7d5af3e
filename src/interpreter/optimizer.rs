use std::collections::HashMap;

use ordered_float::OrderedFloat;

use crate::{ast::Expr, interpreter::evaluator::scalar};

/// Rewrites a tree into an equivalent, cheaper one.
///
/// Everything that does not depend on a variable is computed now instead of
/// on every evaluation: pure operations over constant operands fold to their
/// result, branches with a constant condition collapse to the taken side,
/// and sequences are flattened with their valueless constants dropped.
///
/// The rewrite is a fixpoint: applying it to its own output changes
/// nothing.
///
/// # Parameters
/// - `expr`: The tree to rewrite, consumed.
///
/// # Returns
/// The optimized tree.
#[must_use]
pub fn optimize(expr: Expr) -> Expr {
    match expr {
        Expr::Constant { .. } | Expr::Variable { .. } | Expr::Break { .. } => expr,

        Expr::Unary { op, operand, position } => match optimize(*operand) {
            Expr::Constant { value, .. } => Expr::Constant { value: scalar::apply_unary(op, value),
                                                             position },
            operand => Expr::Unary { op,
                                     operand: Box::new(operand),
                                     position },
        },

        Expr::Binary { op, lhs, rhs, position } => {
            match (optimize(*lhs), optimize(*rhs)) {
                (Expr::Constant { value: lhs, .. }, Expr::Constant { value: rhs, .. }) => {
                    Expr::Constant { value: scalar::apply_binary(op, lhs, rhs),
                                     position }
                },
                (lhs, rhs) => Expr::Binary { op,
                                             lhs: Box::new(lhs),
                                             rhs: Box::new(rhs),
                                             position },
            }
        },

        Expr::Assign { name,
                       variable,
                       op,
                       value,
                       position, } => Expr::Assign { name,
                                                     variable,
                                                     op,
                                                     value: Box::new(optimize(*value)),
                                                     position },

        Expr::Call { name,
                     function,
                     args,
                     position, } => {
            let args: Vec<Expr> = args.into_iter().map(optimize).collect();

            if args.iter().all(|arg| matches!(arg, Expr::Constant { .. })) {
                let values: Vec<f64> =
                    args.iter()
                        .filter_map(|arg| match arg {
                            Expr::Constant { value, .. } => Some(*value),
                            _ => None,
                        })
                        .collect();
                Expr::Constant { value: function.apply(&values),
                                 position }
            } else {
                Expr::Call { name,
                             function,
                             args,
                             position }
            }
        },

        Expr::Sequence { statements, position } => optimize_sequence(statements, position),

        Expr::Conditional { condition,
                            true_branch,
                            false_branch,
                            position, } => match optimize(*condition) {
            Expr::Constant { value, .. } => {
                if value > 0.0 {
                    optimize(*true_branch)
                } else {
                    match false_branch {
                        Some(branch) => optimize(*branch),
                        None => Expr::Constant { value: 0.0,
                                                 position },
                    }
                }
            },
            condition => {
                Expr::Conditional { condition: Box::new(condition),
                                    true_branch: Box::new(optimize(*true_branch)),
                                    false_branch:
                                        false_branch.map(|branch| Box::new(optimize(*branch))),
                                    position }
            },
        },

        Expr::While { condition,
                      body,
                      post_test,
                      position, } => Expr::While { condition: Box::new(optimize(*condition)),
                                                   body: Box::new(optimize(*body)),
                                                   post_test,
                                                   position },

        Expr::For { init,
                    condition,
                    increment,
                    body,
                    position, } => {
            let condition = optimize(*condition);

            if let Expr::Constant { value, .. } = &condition
               && *value <= 0.0
            {
                // the loop never runs; only the initializer is observable
                return optimize_sequence(vec![*init,
                                              Expr::Constant { value: 0.0,
                                                               position }],
                                         position);
            }

            Expr::For { init: Box::new(optimize(*init)),
                        condition: Box::new(condition),
                        increment: Box::new(optimize(*increment)),
                        body: Box::new(optimize(*body)),
                        position }
        },

        Expr::SimpleFor { name,
                          variable,
                          first,
                          last,
                          body,
                          position, } => Expr::SimpleFor { name,
                                                           variable,
                                                           first: Box::new(optimize(*first)),
                                                           last: Box::new(optimize(*last)),
                                                           body: Box::new(optimize(*body)),
                                                           position },

        Expr::Switch { parameter,
                       value_map,
                       cases,
                       default,
                       position, } => {
            let mut back_map: HashMap<usize, OrderedFloat<f64>> =
                value_map.into_iter()
                         .map(|(value, index)| (index, value))
                         .collect();

            let mut new_map = HashMap::new();
            let mut new_cases = Vec::new();

            for (index, case) in cases.into_iter().enumerate() {
                let case = optimize(case);

                if let Some(value) = back_map.remove(&index) {
                    new_map.insert(value, new_cases.len());
                }

                // a case body that optimized into a sequence is spliced in,
                // with the remaining labels shifted accordingly
                if let Expr::Sequence { statements, .. } = case {
                    new_cases.extend(statements);
                } else {
                    new_cases.push(case);
                }
            }

            Expr::Switch { parameter: Box::new(optimize(*parameter)),
                           value_map: new_map,
                           cases: new_cases,
                           default: default.map(|default| Box::new(optimize(*default))),
                           position }
        },

        Expr::Return { value, position } => Expr::Return { value: Box::new(optimize(*value)),
                                                           position },
    }
}

/// Optimizes a statement sequence.
///
/// Child statements are optimized individually; nested sequences are spliced
/// into the parent, interior constants are dropped (their value is unused
/// and they have no effect), a trailing constant is kept as the sequence's
/// value, a single survivor replaces the sequence, and an empty sequence
/// folds to the `0.0` it evaluates to.
fn optimize_sequence(statements: Vec<Expr>, position: usize) -> Expr {
    let mut flat = Vec::new();
    let mut dropped_last: Option<Expr> = None;

    for statement in statements {
        match optimize(statement) {
            Expr::Sequence { statements: inner, .. } => {
                for part in inner {
                    keep_or_hold(&mut flat, &mut dropped_last, part);
                }
            },
            statement => keep_or_hold(&mut flat, &mut dropped_last, statement),
        }
    }

    if let Some(constant) = dropped_last {
        flat.push(constant);
    }

    match flat.len() {
        0 => Expr::Constant { value: 0.0,
                              position },
        1 => flat.swap_remove(0),
        _ => Expr::Sequence { statements: flat,
                              position },
    }
}

/// A constant mid-sequence produces an unused value and no effect, so it is
/// held back and only re-appended when it turns out to be the final
/// element.
fn keep_or_hold(flat: &mut Vec<Expr>, dropped_last: &mut Option<Expr>, statement: Expr) {
    if matches!(statement, Expr::Constant { .. }) {
        *dropped_last = Some(statement);
    } else {
        *dropped_last = None;
        flat.push(statement);
    }
}
