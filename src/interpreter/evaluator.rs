/// The tree-walking evaluation core.
///
/// Dispatches over every AST node kind with one exhaustive match and routes
/// structured control transfers as explicit result tags.
pub mod core;
/// The evaluation result tag.
///
/// Distinguishes a normal value from an in-flight `break`, `continue` or
/// `return`, replacing unwinding-based control flow with plain data.
pub mod flow;
/// Loop evaluation.
///
/// The three loop forms, all sharing one iteration bound so a formula can
/// never hang the sample loop that hosts it.
pub mod loops;
/// Scalar numeric kernels.
///
/// The pure `f64` implementations behind every operator, shared verbatim by
/// the evaluator and the constant folder.
pub mod scalar;
