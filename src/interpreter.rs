/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator traverses the AST, applies arithmetic and logical
/// operations, routes structured control flow (`break`, `continue`,
/// `return`) as explicit result tags, and produces the formula's value. It
/// is the core execution engine of the crate.
///
/// # Responsibilities
/// - Evaluates AST nodes, performing all supported operations.
/// - Bounds loop iteration so a formula can never hang its caller.
/// - Reports runtime errors with source offsets.
pub mod evaluator;
/// The function registry resolved against during parsing.
///
/// Maps a function name and argument count to a statically known numeric
/// implementation. Resolution happens once at compile time; evaluation calls
/// the stored function pointer directly.
///
/// # Responsibilities
/// - Declares every callable function with its arity.
/// - Resolves `(name, arity)` lookups for the parser.
pub mod functions;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the raw source text and produces a stream of tokens
/// paired with byte offsets, covering numbers, identifiers, keywords,
/// operators and punctuation. This is the first stage of compilation.
///
/// # Responsibilities
/// - Converts the input text into tokens with source offsets.
/// - Applies maximal munch to multi-character operators.
/// - Reports lexical errors for unrecognized input.
pub mod lexer;
/// The optimizer rewrites an AST into a cheaper equivalent.
///
/// A single explicit, idempotent pass that folds constant subtrees, prunes
/// statically dead branches and flattens statement sequences, amortizing the
/// cost of formulas that are evaluated tens of thousands of times.
///
/// # Responsibilities
/// - Constant-folds pure operations over constant operands.
/// - Eliminates branches whose condition is statically known.
/// - Flattens sequences and drops valueless constant statements.
pub mod optimizer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and
/// constructs an AST for the statement and expression grammars, resolving
/// operators through precedence tables and functions through the registry.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes.
/// - Validates grammar and reports errors with source offsets.
/// - Maintains the symbol table shared with the owning `Expression`.
pub mod parser;
