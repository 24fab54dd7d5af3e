use crate::{
    ast::{Expr, Variable},
    error::EvalError,
    interpreter::evaluator::{
        core::{EvalResult, evaluate, value},
        flow::Flow,
    },
};

/// Upper bound on the iterations of any single loop.
///
/// Formulas run inside tight sample-generation loops; a formula that loops
/// forever must fail instead of hanging its caller. The bound is checked on
/// entering an iteration, so up to this many body runs complete before the
/// next entry fails.
pub const MAX_ITERATIONS: usize = 256;

/// Evaluates a `while` or `do`/`while` loop.
///
/// The condition is tested before each iteration, or after each iteration
/// when `post_test` is set (so the body runs at least once). `break` stops
/// the loop, `continue` skips ahead to the next test, `return` propagates.
/// The result is the value of the last completed body run, or `0.0` when the
/// body never ran.
pub(crate) fn evaluate_while(condition: &Expr,
                             body: &Expr,
                             post_test: bool,
                             position: usize)
                             -> EvalResult<Flow> {
    let mut iterations = 0;
    let mut ret = 0.0;

    if post_test {
        loop {
            if iterations > MAX_ITERATIONS {
                return Err(EvalError::LoopIterationLimit { position });
            }
            iterations += 1;

            match evaluate(body)? {
                Flow::Normal(value) => ret = value,
                Flow::Break => break,
                Flow::Continue => {},
                other @ Flow::Return(_) => return Ok(other),
            }

            // NaN conditions must terminate, hence the negated comparison
            if !(value!(evaluate(condition)) > 0.0) {
                break;
            }
        }
    } else {
        while value!(evaluate(condition)) > 0.0 {
            if iterations > MAX_ITERATIONS {
                return Err(EvalError::LoopIterationLimit { position });
            }
            iterations += 1;

            match evaluate(body)? {
                Flow::Normal(value) => ret = value,
                Flow::Break => break,
                Flow::Continue => continue,
                other @ Flow::Return(_) => return Ok(other),
            }
        }
    }

    Ok(Flow::Normal(ret))
}

/// Evaluates a classic three-clause `for` loop.
///
/// `continue` still runs the increment clause; `break` skips it along with
/// the rest of the loop. The result is the last completed body value, or
/// `0.0` when the body never ran.
pub(crate) fn evaluate_for(init: &Expr,
                           condition: &Expr,
                           increment: &Expr,
                           body: &Expr,
                           position: usize)
                           -> EvalResult<Flow> {
    value!(evaluate(init));

    let mut iterations = 0;
    let mut ret = 0.0;

    while value!(evaluate(condition)) > 0.0 {
        if iterations > MAX_ITERATIONS {
            return Err(EvalError::LoopIterationLimit { position });
        }
        iterations += 1;

        match evaluate(body)? {
            Flow::Normal(value) => ret = value,
            Flow::Break => break,
            Flow::Continue => {},
            other @ Flow::Return(_) => return Ok(other),
        }

        value!(evaluate(increment));
    }

    Ok(Flow::Normal(ret))
}

/// Evaluates the ranged sugar `for (var = first, last) body`.
///
/// The variable is assigned each iteration from a loop-internal counter
/// stepping by one, so body writes to it do not derail the iteration. Both
/// bounds are evaluated once, up front.
pub(crate) fn evaluate_simple_for(variable: &Variable,
                                  first: &Expr,
                                  last: &Expr,
                                  body: &Expr,
                                  position: usize)
                                  -> EvalResult<Flow> {
    let first = value!(evaluate(first));
    let last = value!(evaluate(last));

    let mut iterations = 0;
    let mut ret = 0.0;

    let mut counter = first;
    while counter <= last {
        if iterations > MAX_ITERATIONS {
            return Err(EvalError::LoopIterationLimit { position });
        }
        iterations += 1;

        variable.set(counter);

        match evaluate(body)? {
            Flow::Normal(value) => ret = value,
            Flow::Break => break,
            Flow::Continue => {},
            other @ Flow::Return(_) => return Ok(other),
        }

        counter += 1.0;
    }

    Ok(Flow::Normal(ret))
}
