use std::iter::Peekable;

use crate::{
    ast::{Expr, Op},
    error::ParseError,
    expression::{Binding, SymbolTable},
    interpreter::{
        functions,
        lexer::Token,
        parser::{precedence, statement::parse_statements},
    },
};

/// Result type used throughout the parser.
pub type ParseResult<T> = Result<T, ParseError>;

/// State threaded through one parse.
///
/// The symbol table is shared with the `Expression` being compiled; the
/// depth counters let `break` and `continue` be rejected at compile time
/// when nothing could intercept them.
pub(crate) struct ParseContext<'s> {
    /// Name bindings of the formula under compilation.
    pub(crate) symbols:         &'s mut SymbolTable,
    /// How many loops enclose the current position.
    pub(crate) loop_depth:      usize,
    /// How many loops or switches enclose the current position.
    pub(crate) breakable_depth: usize,
}

/// Parses a whole token stream into one executable tree.
///
/// This is the entry point used by `Expression::compile`. The stream is
/// parsed as a statement sequence; any token left over afterwards is an
/// error.
///
/// # Parameters
/// - `tokens`: The `(Token, byte offset)` pairs produced by the lexer.
/// - `symbols`: The symbol table seeded with constants and parameters.
///
/// # Returns
/// The root node of the parsed formula.
pub(crate) fn parse(tokens: &[(Token, usize)], symbols: &mut SymbolTable) -> ParseResult<Expr> {
    let mut context = ParseContext { symbols,
                                     loop_depth: 0,
                                     breakable_depth: 0, };
    let mut iter = tokens.iter().peekable();

    let root = parse_statements(&mut iter, &mut context)?;

    if let Some((token, position)) = iter.peek() {
        return Err(ParseError::ExtraToken { token:    token.to_string(),
                                            position: *position, });
    }

    Ok(root)
}

/// One entry of the flat operand/operator list the collection pass builds.
///
/// An operator token in operand position (start of expression, or right
/// after another operator) is prefix; everywhere else it is binary. The
/// distinction is made here so the precedence folder never has to guess.
pub(crate) enum Element {
    /// A fully parsed operand.
    Operand(Expr),
    /// A binary operator occurrence.
    Binary {
        /// The operator symbol.
        op:       Op,
        /// Byte offset of the operator.
        position: usize,
    },
    /// A prefix operator occurrence.
    Prefix {
        /// The operator symbol.
        op:       Op,
        /// Byte offset of the operator.
        position: usize,
    },
}

/// Parses a full expression.
///
/// Collects operands and operators into a flat list, then reduces that list
/// through the precedence tables.
///
/// Grammar: `expr := operand (binop operand)*`, reduced by precedence.
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, offset)` pairs.
/// - `context`: Shared parsing state.
///
/// # Returns
/// The parsed expression node.
pub(crate) fn parse_expression<'a, I>(tokens: &mut Peekable<I>,
                                      context: &mut ParseContext<'_>)
                                      -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let position = tokens.peek().map_or(0, |(_, p)| *p);
    let elements = collect_elements(tokens, context)?;
    precedence::resolve(elements, position)
}

/// Collects the flat operand/operator list of one expression.
///
/// Numbers, identifiers (variables, constants, calls) and parenthesized
/// sub-expressions become operands; operator tokens become prefix or binary
/// elements depending on position. Collection stops at any token that cannot
/// continue an expression (`;`, `,`, `)`, `}`, `{`, `:` or a keyword).
///
/// An unknown identifier that is immediately followed by `=` is inserted
/// into the symbol table as a fresh temporary variable; any other unknown
/// identifier is an error naming it and its offset.
fn collect_elements<'a, I>(tokens: &mut Peekable<I>,
                           context: &mut ParseContext<'_>)
                           -> ParseResult<Vec<Element>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut elements = Vec::new();
    let mut expression_start = true;

    while let Some((token, position)) = tokens.peek() {
        let position = *position;

        match token {
            Token::Number(value) => {
                elements.push(Element::Operand(Expr::Constant { value: *value,
                                                                position }));
                tokens.next();
                expression_start = false;
            },

            Token::Identifier(_) => {
                let name = match tokens.next() {
                    Some((Token::Identifier(name), _)) => name.clone(),
                    _ => unreachable!(),
                };

                if let Some((Token::LParen, _)) = tokens.peek() {
                    elements.push(Element::Operand(parse_function_call(tokens,
                                                                       context,
                                                                       &name,
                                                                       position)?));
                } else {
                    elements.push(Element::Operand(resolve_identifier(tokens,
                                                                      context,
                                                                      name,
                                                                      position)?));
                }
                expression_start = false;
            },

            Token::LParen => {
                elements.push(Element::Operand(parse_paren(tokens, context)?));
                expression_start = false;
            },

            Token::Operator(op) => {
                let op = *op;
                elements.push(if expression_start {
                                  Element::Prefix { op, position }
                              } else {
                                  Element::Binary { op, position }
                              });
                tokens.next();
                expression_start = true;
            },

            _ => break,
        }
    }

    Ok(elements)
}

/// Resolves a bare identifier to a constant or variable operand.
///
/// Implements the lazy temporary rule: a name with no binding that is about
/// to be assigned (`name = …`) gets a fresh mutable variable, visible to the
/// rest of the formula.
fn resolve_identifier<'a, I>(tokens: &mut Peekable<I>,
                             context: &mut ParseContext<'_>,
                             name: String,
                             position: usize)
                             -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match context.symbols.lookup(&name) {
        Some(Binding::Constant(value)) => Ok(Expr::Constant { value: *value,
                                                              position }),
        Some(Binding::Variable(variable)) => {
            let variable = variable.clone();
            Ok(Expr::Variable { name,
                                variable,
                                position })
        },
        None => {
            if let Some((Token::Operator(Op::Assign), _)) = tokens.peek() {
                let variable = context.symbols.define_temporary(&name);
                Ok(Expr::Variable { name,
                                    variable,
                                    position })
            } else {
                Err(ParseError::UnknownVariable { name, position })
            }
        },
    }
}

/// Parses a call to a registered function.
///
/// The callee is resolved by name and argument count against the static
/// registry; the selected implementation is stored directly in the call
/// node, so evaluation never looks the name up again.
///
/// Grammar: `call := identifier "(" (expr ("," expr)*)? ")"`
fn parse_function_call<'a, I>(tokens: &mut Peekable<I>,
                              context: &mut ParseContext<'_>,
                              name: &str,
                              position: usize)
                              -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    tokens.next(); // consume '('

    let mut args = Vec::new();

    if let Some((Token::RParen, _)) = tokens.peek() {
        tokens.next();
    } else {
        loop {
            args.push(parse_expression(tokens, context)?);

            match tokens.next() {
                Some((Token::Comma, _)) => {},
                Some((Token::RParen, _)) => break,
                Some((token, pos)) => {
                    return Err(ParseError::Expected { expected: "',' or ')'",
                                                      found:    token.to_string(),
                                                      position: *pos, });
                },
                None => return Err(ParseError::UnexpectedEndOfInput { position: 0 }),
            }
        }
    }

    match functions::lookup(name, args.len()) {
        Some(spec) => Ok(Expr::Call { name: spec.name,
                                      function: spec.implementation,
                                      args,
                                      position }),
        None => Err(ParseError::UnknownFunction { name: name.to_string(),
                                                  arity: args.len(),
                                                  position }),
    }
}

/// Parses a parenthesized sub-expression.
fn parse_paren<'a, I>(tokens: &mut Peekable<I>,
                      context: &mut ParseContext<'_>)
                      -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    tokens.next(); // consume '('

    let inner = parse_expression(tokens, context)?;

    expect(tokens, &Token::RParen, "')'")?;
    Ok(inner)
}

/// Consumes the next token, which must equal `token`.
///
/// # Parameters
/// - `tokens`: Token iterator.
/// - `token`: The exact token required.
/// - `description`: How to name the requirement in an error.
///
/// # Returns
/// The byte offset of the consumed token.
pub(crate) fn expect<'a, I>(tokens: &mut Peekable<I>,
                            token: &Token,
                            description: &'static str)
                            -> ParseResult<usize>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((found, position)) if found == token => Ok(*position),
        Some((found, position)) => Err(ParseError::Expected { expected: description,
                                                              found:    found.to_string(),
                                                              position: *position, }),
        None => Err(ParseError::UnexpectedEndOfInput { position: 0 }),
    }
}
