use std::{collections::HashMap, iter::Peekable};

use ordered_float::OrderedFloat;

use crate::{
    ast::{Expr, Op},
    error::ParseError,
    expression::Binding,
    interpreter::{
        lexer::Token,
        optimizer,
        parser::core::{ParseContext, ParseResult, expect, parse_expression},
    },
};

/// Parses a statement sequence.
///
/// Statements are separated by `;`; brace blocks and control constructs
/// delimit themselves. Parsing stops at the end of input, at `}`, at `)` or
/// `,` (so a caller can report its own delimiter error), and at the `case` /
/// `default` labels of an enclosing switch. A `return` statement ends the
/// sequence where it stands.
///
/// Zero statements yield an empty `Sequence`, one statement collapses to
/// itself, several collapse into a `Sequence` preserving order.
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, offset)` pairs.
/// - `context`: Shared parsing state.
///
/// # Returns
/// The sequence node (or single collapsed statement).
pub(crate) fn parse_statements<'a, I>(tokens: &mut Peekable<I>,
                                      context: &mut ParseContext<'_>)
                                      -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let position = tokens.peek().map_or(0, |(_, p)| *p);
    let mut statements = Vec::new();

    loop {
        while let Some((Token::Semicolon, _)) = tokens.peek() {
            tokens.next();
        }

        if at_sequence_end(tokens) {
            break;
        }

        let (statement, delimited) = parse_statement(tokens, context)?;
        let is_return = matches!(statement, Expr::Return { .. });
        statements.push(statement);

        if is_return {
            break;
        }

        if !delimited && !at_sequence_end(tokens) {
            // between two undelimited statements only a separator is legal
            let (token, pos) = match tokens.peek() {
                Some((token, pos)) => (token.to_string(), *pos),
                None => break,
            };
            return Err(ParseError::Expected { expected: "';'",
                                              found:    token,
                                              position: pos, });
        }
    }

    if statements.len() == 1 {
        Ok(statements.swap_remove(0))
    } else {
        Ok(Expr::Sequence { statements, position })
    }
}

/// Whether the next token ends the current statement sequence.
fn at_sequence_end<'a, I>(tokens: &mut Peekable<I>) -> bool
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    matches!(tokens.peek(),
             None
             | Some((Token::RBrace
                     | Token::RParen
                     | Token::Comma
                     | Token::Case
                     | Token::Default,
                     _)))
}

/// Parses exactly one statement.
///
/// Returns the statement together with a flag saying whether it is already
/// delimited — either because it consumed a trailing `;` or because the
/// construct ends in a closing brace or parenthesis — so the sequence parser
/// knows whether to demand a separator.
fn parse_statement<'a, I>(tokens: &mut Peekable<I>,
                          context: &mut ParseContext<'_>)
                          -> ParseResult<(Expr, bool)>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.peek() {
        Some((Token::LBrace, _)) => Ok((parse_block(tokens, context)?, true)),

        Some((Token::If, _)) => parse_if(tokens, context),

        Some((Token::While, _)) => parse_while(tokens, context),

        Some((Token::Do, _)) => parse_do_while(tokens, context),

        Some((Token::For, _)) => parse_for(tokens, context),

        Some((Token::Switch, _)) => Ok((parse_switch(tokens, context)?, true)),

        Some((Token::Break, position)) => {
            let position = *position;
            tokens.next();
            if context.breakable_depth == 0 {
                return Err(ParseError::MisplacedKeyword { keyword: "break",
                                                          position });
            }
            Ok((Expr::Break { is_continue: false,
                              position },
                eat_semicolon(tokens)))
        },

        Some((Token::Continue, position)) => {
            let position = *position;
            tokens.next();
            if context.loop_depth == 0 {
                return Err(ParseError::MisplacedKeyword { keyword: "continue",
                                                          position });
            }
            Ok((Expr::Break { is_continue: true,
                              position },
                eat_semicolon(tokens)))
        },

        Some((Token::Return, position)) => {
            let position = *position;
            tokens.next();
            let value = parse_expression(tokens, context)?;
            Ok((Expr::Return { value: Box::new(value),
                               position },
                eat_semicolon(tokens)))
        },

        None => Err(ParseError::UnexpectedEndOfInput { position: 0 }),

        Some(_) => {
            let expr = parse_expression(tokens, context)?;
            Ok((expr, eat_semicolon(tokens)))
        },
    }
}

/// Consumes a `;` when one is next.
fn eat_semicolon<'a, I>(tokens: &mut Peekable<I>) -> bool
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    if let Some((Token::Semicolon, _)) = tokens.peek() {
        tokens.next();
        true
    } else {
        false
    }
}

/// Parses a brace-delimited block into its (collapsed) statement sequence.
///
/// Grammar: `block := "{" statements "}"`
fn parse_block<'a, I>(tokens: &mut Peekable<I>, context: &mut ParseContext<'_>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    tokens.next(); // consume '{'

    let body = parse_statements(tokens, context)?;

    expect(tokens, &Token::RBrace, "'}'")?;
    Ok(body)
}

/// Parses `if (cond) stmt [else stmt]`.
///
/// The `else` binds to the nearest open `if`. The delimited flag of the last
/// branch becomes the flag of the whole conditional.
fn parse_if<'a, I>(tokens: &mut Peekable<I>,
                   context: &mut ParseContext<'_>)
                   -> ParseResult<(Expr, bool)>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let position = consume_keyword(tokens);

    expect(tokens, &Token::LParen, "'('")?;
    let condition = parse_expression(tokens, context)?;
    expect(tokens, &Token::RParen, "')'")?;

    let (true_branch, mut delimited) = parse_statement(tokens, context)?;

    let false_branch = if let Some((Token::Else, _)) = tokens.peek() {
        tokens.next();
        let (branch, branch_delimited) = parse_statement(tokens, context)?;
        delimited = branch_delimited;
        Some(Box::new(branch))
    } else {
        None
    };

    Ok((Expr::Conditional { condition: Box::new(condition),
                            true_branch: Box::new(true_branch),
                            false_branch,
                            position },
        delimited))
}

/// Parses `while (cond) stmt`; the condition runs before each iteration.
fn parse_while<'a, I>(tokens: &mut Peekable<I>,
                      context: &mut ParseContext<'_>)
                      -> ParseResult<(Expr, bool)>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let position = consume_keyword(tokens);

    expect(tokens, &Token::LParen, "'('")?;
    let condition = parse_expression(tokens, context)?;
    expect(tokens, &Token::RParen, "')'")?;

    let (body, delimited) = parse_loop_body(tokens, context)?;

    Ok((Expr::While { condition: Box::new(condition),
                      body: Box::new(body),
                      post_test: false,
                      position },
        delimited))
}

/// Parses `do stmt while (cond)`; the body runs before the first test.
fn parse_do_while<'a, I>(tokens: &mut Peekable<I>,
                         context: &mut ParseContext<'_>)
                         -> ParseResult<(Expr, bool)>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let position = consume_keyword(tokens);

    let (body, _) = parse_loop_body(tokens, context)?;

    expect(tokens, &Token::While, "'while'")?;
    expect(tokens, &Token::LParen, "'('")?;
    let condition = parse_expression(tokens, context)?;
    expect(tokens, &Token::RParen, "')'")?;
    eat_semicolon(tokens);

    Ok((Expr::While { condition: Box::new(condition),
                      body: Box::new(body),
                      post_test: true,
                      position },
        true))
}

/// Parses the two `for` forms.
///
/// The head is first tried as the classic `init; cond; incr` triple; when
/// that fails the parser rewinds and reads the ranged sugar
/// `for (var = first, last)`, whose loop variable must already be a mutable
/// binding.
fn parse_for<'a, I>(tokens: &mut Peekable<I>,
                    context: &mut ParseContext<'_>)
                    -> ParseResult<(Expr, bool)>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let position = consume_keyword(tokens);

    expect(tokens, &Token::LParen, "'('")?;

    let saved = tokens.clone();
    if let Ok((init, condition, increment)) = try_classic_head(tokens, context) {
        let (body, delimited) = parse_loop_body(tokens, context)?;

        return Ok((Expr::For { init: Box::new(init),
                               condition: Box::new(condition),
                               increment: Box::new(increment),
                               body: Box::new(body),
                               position },
                   delimited));
    }
    *tokens = saved;

    let (name, name_position) = match tokens.next() {
        Some((Token::Identifier(name), pos)) => (name.clone(), *pos),
        Some((token, pos)) => {
            return Err(ParseError::Expected { expected: "a loop variable",
                                              found:    token.to_string(),
                                              position: *pos, });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { position: 0 }),
    };

    let variable = match context.symbols.lookup(&name) {
        Some(Binding::Variable(variable)) => variable.clone(),
        _ => {
            return Err(ParseError::InvalidLoopVariable { name,
                                                         position: name_position, });
        },
    };

    expect(tokens, &Token::Operator(Op::Assign), "'='")?;
    let first = parse_expression(tokens, context)?;
    expect(tokens, &Token::Comma, "','")?;
    let last = parse_expression(tokens, context)?;
    expect(tokens, &Token::RParen, "')'")?;

    let (body, delimited) = parse_loop_body(tokens, context)?;

    Ok((Expr::SimpleFor { name,
                          variable,
                          first: Box::new(first),
                          last: Box::new(last),
                          body: Box::new(body),
                          position },
        delimited))
}

/// Attempts to read a classic `init; cond; incr)` for-head.
///
/// Leaves the iterator wherever the failure happened; the caller rewinds
/// from its own saved copy.
fn try_classic_head<'a, I>(tokens: &mut Peekable<I>,
                           context: &mut ParseContext<'_>)
                           -> ParseResult<(Expr, Expr, Expr)>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let init = parse_expression(tokens, context)?;
    expect(tokens, &Token::Semicolon, "';'")?;
    let condition = parse_expression(tokens, context)?;
    expect(tokens, &Token::Semicolon, "';'")?;
    let increment = parse_expression(tokens, context)?;
    expect(tokens, &Token::RParen, "')'")?;

    Ok((init, condition, increment))
}

/// Parses a loop body with the nesting depths raised, so `break` and
/// `continue` inside it pass the placement check.
fn parse_loop_body<'a, I>(tokens: &mut Peekable<I>,
                          context: &mut ParseContext<'_>)
                          -> ParseResult<(Expr, bool)>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    context.loop_depth += 1;
    context.breakable_depth += 1;
    let body = parse_statement(tokens, context);
    context.loop_depth -= 1;
    context.breakable_depth -= 1;
    body
}

/// Parses `switch (sel) { case K: stmts … default: stmts }`.
///
/// Case labels may be any expression that folds to a constant; duplicates
/// are rejected, and the `default` clause must come last. Each clause body
/// runs with the breakable depth raised — `break` leaves the switch,
/// `continue` still needs an enclosing loop.
fn parse_switch<'a, I>(tokens: &mut Peekable<I>,
                       context: &mut ParseContext<'_>)
                       -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let position = consume_keyword(tokens);

    expect(tokens, &Token::LParen, "'('")?;
    let parameter = parse_expression(tokens, context)?;
    expect(tokens, &Token::RParen, "')'")?;
    expect(tokens, &Token::LBrace, "'{'")?;

    let mut value_map = HashMap::new();
    let mut cases = Vec::new();
    let mut default = None;

    loop {
        match tokens.next() {
            Some((Token::Case, case_position)) => {
                if default.is_some() {
                    return Err(ParseError::Expected { expected: "'}' after the default clause",
                                                      found:    "case".to_string(),
                                                      position: *case_position, });
                }

                let label = parse_expression(tokens, context)?;
                let label_position = label.position();
                let Expr::Constant { value, .. } = optimizer::optimize(label) else {
                    return Err(ParseError::CaseRequiresConstant { position: label_position });
                };

                expect(tokens, &Token::Colon, "':'")?;

                context.breakable_depth += 1;
                let body = parse_statements(tokens, context);
                context.breakable_depth -= 1;

                if value_map.insert(OrderedFloat(value), cases.len()).is_some() {
                    return Err(ParseError::DuplicateCase { value,
                                                          position: label_position, });
                }
                cases.push(body?);
            },

            Some((Token::Default, default_position)) => {
                if default.is_some() {
                    return Err(ParseError::UnexpectedToken { token:    "default".to_string(),
                                                             position: *default_position, });
                }

                expect(tokens, &Token::Colon, "':'")?;

                context.breakable_depth += 1;
                let body = parse_statements(tokens, context);
                context.breakable_depth -= 1;

                default = Some(Box::new(body?));
            },

            Some((Token::RBrace, _)) => break,

            Some((token, pos)) => {
                return Err(ParseError::Expected { expected: "'case', 'default' or '}'",
                                                  found:    token.to_string(),
                                                  position: *pos, });
            },

            None => return Err(ParseError::UnexpectedEndOfInput { position: 0 }),
        }
    }

    Ok(Expr::Switch { parameter: Box::new(parameter),
                      value_map,
                      cases,
                      default,
                      position })
}

/// Consumes the keyword token the caller already peeked and returns its
/// offset.
fn consume_keyword<'a, I>(tokens: &mut Peekable<I>) -> usize
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    tokens.next().map_or(0, |(_, position)| *position)
}
