/// The explicit result of evaluating one AST node.
///
/// Ordinary expressions produce `Normal`; `break`, `continue` and `return`
/// travel upward as tags until a loop, a switch or the outermost `evaluate`
/// call intercepts them. Carrying control transfers as data keeps every
/// interception point visible in the evaluator and leaves no way for a
/// signal to escape unnoticed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flow {
    /// A plain value; evaluation continues normally.
    Normal(f64),
    /// A `break` looking for the nearest enclosing loop or switch.
    Break,
    /// A `continue` looking for the nearest enclosing loop.
    Continue,
    /// A `return` carrying the formula's final result to the outermost
    /// `evaluate` call.
    Return(f64),
}
