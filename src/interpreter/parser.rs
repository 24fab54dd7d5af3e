/// Core parsing machinery.
///
/// Holds the entry point, the operand/operator collection pass for the
/// expression grammar, and the shared parsing context (symbol table plus
/// nesting depths).
pub mod core;
/// Precedence resolution.
///
/// Reduces the flat operand/operator lists produced by the collection pass
/// into expression trees, driven by constant precedence tables.
pub mod precedence;
/// The statement grammar.
///
/// Parses statement sequences and every control construct: conditionals,
/// the three loop forms, `switch`, `break`/`continue` and `return`.
pub mod statement;
