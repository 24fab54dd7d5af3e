//! # wavexpr
//!
//! wavexpr is a small embeddable expression language written in Rust.
//! It compiles short numeric formulas (for example waveform generators
//! evaluated once per audio sample) into an executable tree, optionally
//! constant-folds that tree, and re-evaluates it repeatedly with low
//! overhead.
//!
//! ```
//! use wavexpr::Expression;
//!
//! let mut expr = Expression::compile("sin(t / 10) * 100", &["t"]).unwrap();
//! expr.optimize();
//!
//! let sample = expr.evaluate(&[25.0]).unwrap();
//! assert!((sample - (2.5_f64).sin() * 100.0).abs() < 1e-12);
//! ```

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
)]
#![allow(clippy::missing_errors_doc)]

/// Defines the structure of compiled formulas.
///
/// This module declares the `Expr` enum and related types that represent the
/// syntactic structure of source code as a tree. The AST is built by the
/// parser, rewritten by the optimizer and traversed by the evaluator.
///
/// # Responsibilities
/// - Defines one closed node type over all language constructs.
/// - Attaches source offsets to every node for error reporting.
/// - Provides the shared mutable variable handle the host writes into.
pub mod ast;
/// Provides unified error types for compilation and evaluation.
///
/// This module defines all errors that can be raised while lexing, parsing or
/// evaluating a formula. Errors carry the byte offset of the offending source
/// character wherever one exists.
///
/// # Responsibilities
/// - Defines error enums for compile-time and run-time failure modes.
/// - Attaches source offsets and detailed messages for user feedback.
/// - Integrates with the standard error handling traits.
pub mod error;
/// The compiled-formula façade.
///
/// This module owns the `Expression` type: the symbol table, the declared
/// parameter list and the AST root, together with the public
/// compile/evaluate/optimize surface the host calls.
///
/// # Responsibilities
/// - Seeds the symbol table with constants and declared parameters.
/// - Routes positional evaluation arguments into variable cells.
/// - Exposes variable handles for host-side introspection.
pub mod expression;
/// Orchestrates the entire process of formula execution.
///
/// This module ties together lexing, parsing, the function registry, the
/// optimizer and the evaluator to provide a complete runtime for formula
/// evaluation.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, optimizer.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;

pub use crate::{
    ast::Variable,
    error::{EvalError, ParseError},
    expression::Expression,
};
