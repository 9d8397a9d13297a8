use vidpipe_lexer::{Token, TokenKind};

use crate::ast::{Connection, Expr};
use crate::context::ParseContext;
use crate::error::ParseError;

const DEFAULT_BUFFER_CAPACITY: u32 = 10;

type Result<T> = std::result::Result<T, ParseError>;

fn peek_kind<C: ParseContext<Token>>(ctx: &C) -> Option<TokenKind> {
    ctx.peek().map(|t| t.kind)
}

fn advance_expecting<C: ParseContext<Token>>(ctx: &mut C, expected: TokenKind) -> Result<Token> {
    match ctx.peek() {
        Some(t) if t.kind == expected => Ok(ctx.advance().expect("peek just confirmed a token")),
        Some(t) if t.kind == TokenKind::Error => Err(ParseError::LexError {
            position: t.position,
        }),
        Some(t) => Err(ParseError::UnexpectedToken {
            found: t.kind,
            lexeme: t.lexeme.clone(),
            position: t.position,
        }),
        None => Err(ParseError::UnexpectedEof {
            position: ctx.position(),
        }),
    }
}

/// `function := identifier`
fn parse_function<C: ParseContext<Token>>(ctx: &mut C) -> Result<Expr> {
    let token = advance_expecting(ctx, TokenKind::Identifier)?;
    Ok(Expr::function(token.lexeme))
}

/// `loop_expr := "{" expression "}"`
fn parse_loop<C: ParseContext<Token>>(ctx: &mut C) -> Result<Expr> {
    advance_expecting(ctx, TokenKind::LoopOpen)?;
    let body = parse_expression(ctx)?;
    match peek_kind(ctx) {
        Some(TokenKind::LoopClose) => {
            ctx.advance();
            Ok(Expr::Loop(Box::new(body)))
        }
        _ => Err(ParseError::MissingClosing {
            expected: TokenKind::LoopClose,
            position: ctx.position(),
        }),
    }
}

/// `paren_expr := "(" expression ")"` — grouping only, no tree node of its
/// own.
fn parse_paren<C: ParseContext<Token>>(ctx: &mut C) -> Result<Expr> {
    advance_expecting(ctx, TokenKind::LParen)?;
    let inner = parse_expression(ctx)?;
    match peek_kind(ctx) {
        Some(TokenKind::RParen) => {
            ctx.advance();
            Ok(inner)
        }
        _ => Err(ParseError::MissingClosing {
            expected: TokenKind::RParen,
            position: ctx.position(),
        }),
    }
}

/// `branch_expr := function ( ("&>" function)+ | ("|" function)+ )?`
///
/// `&>` and `|` sit at the same precedence level but are non-associative
/// with each other: once a branch group starts with one operator, only that
/// operator continues the group.
fn parse_branch<C: ParseContext<Token>>(ctx: &mut C) -> Result<Expr> {
    let first = parse_function(ctx)?;
    match peek_kind(ctx) {
        Some(TokenKind::Parallel) => {
            let mut branches = vec![first];
            while peek_kind(ctx) == Some(TokenKind::Parallel) {
                ctx.advance();
                branches.push(parse_function(ctx)?);
            }
            Ok(Expr::Parallel(branches))
        }
        Some(TokenKind::Choice) => {
            let mut branches = vec![first];
            while peek_kind(ctx) == Some(TokenKind::Choice) {
                ctx.advance();
                branches.push(parse_function(ctx)?);
            }
            Ok(Expr::Choice(branches))
        }
        _ => Ok(first),
    }
}

/// `element := loop_expr | paren_expr | branch_expr`
fn parse_element<C: ParseContext<Token>>(ctx: &mut C) -> Result<Expr> {
    match peek_kind(ctx) {
        Some(TokenKind::LoopOpen) => parse_loop(ctx),
        Some(TokenKind::LParen) => parse_paren(ctx),
        Some(TokenKind::Identifier) => parse_branch(ctx),
        Some(TokenKind::Error) => Err(ParseError::LexError {
            position: ctx.position(),
        }),
        Some(TokenKind::Eof) | None => Err(ParseError::UnexpectedEof {
            position: ctx.position(),
        }),
        Some(kind) => Err(ParseError::UnexpectedToken {
            found: kind,
            lexeme: ctx.peek().map(|t| t.lexeme.clone()).unwrap_or_default(),
            position: ctx.position(),
        }),
    }
}

/// `merge_expr := element ( "+>" expression )?`
///
/// The right-hand side of `+>` recurses into the full expression grammar
/// (not just another `merge_expr`), so merge is the loosest-binding
/// connector and the whole chain to its right associates under it.
fn parse_merge<C: ParseContext<Token>>(ctx: &mut C) -> Result<Expr> {
    let left = parse_element(ctx)?;
    if peek_kind(ctx) == Some(TokenKind::Merge) {
        ctx.advance();
        let right = parse_expression(ctx)?;
        Ok(Expr::Merge(Box::new(left), Box::new(right)))
    } else {
        Ok(left)
    }
}

fn connector_can_start<C: ParseContext<Token>>(ctx: &C) -> bool {
    matches!(
        peek_kind(ctx),
        Some(TokenKind::Arrow)
            | Some(TokenKind::AsyncArrow)
            | Some(TokenKind::SyncArrow)
            | Some(TokenKind::BufferOpen)
    )
}

/// `connector := "->" | "~>" | "=>" | "[" number? "]" ( "->" | "~>" | "=>" )?`
///
/// `buffer_size` always comes from the bracket, independent of what
/// `Connection` the edge decodes to: a bracketed edge followed by a plain
/// `->` decodes to [`Connection::Buffered`], by `~>` to [`Connection::
/// Async`], by `=>` to [`Connection::Sync`], and by nothing at all falls
/// back to [`Connection::Sync`] while still keeping the parsed capacity —
/// matching the original implementation's `parse_connection_type`, which
/// only treats a bracket followed by a bare `->` as buffered and otherwise
/// falls through to its default. `Connection` carries no runtime meaning
/// of its own downstream (see `vidpipe-graph`); only the capacity matters.
fn parse_connector<C: ParseContext<Token>>(ctx: &mut C) -> Result<(Connection, u32)> {
    match peek_kind(ctx) {
        Some(TokenKind::Arrow) | Some(TokenKind::SyncArrow) => {
            ctx.advance();
            Ok((Connection::Sync, 0))
        }
        Some(TokenKind::AsyncArrow) => {
            ctx.advance();
            Ok((Connection::Async, 0))
        }
        Some(TokenKind::BufferOpen) => {
            ctx.advance();
            let capacity = if peek_kind(ctx) == Some(TokenKind::Number) {
                let token = ctx.advance().expect("peek just confirmed a number token");
                token
                    .lexeme
                    .parse()
                    .expect("NumberRule only ever lexes ascii digits")
            } else {
                DEFAULT_BUFFER_CAPACITY
            };
            match peek_kind(ctx) {
                Some(TokenKind::BufferClose) => {
                    ctx.advance();
                }
                _ => {
                    return Err(ParseError::MissingClosing {
                        expected: TokenKind::BufferClose,
                        position: ctx.position(),
                    })
                }
            }
            let connection = match peek_kind(ctx) {
                Some(TokenKind::Arrow) => {
                    ctx.advance();
                    Connection::Buffered
                }
                Some(TokenKind::AsyncArrow) => {
                    ctx.advance();
                    Connection::Async
                }
                Some(TokenKind::SyncArrow) => {
                    ctx.advance();
                    Connection::Sync
                }
                _ => Connection::Sync,
            };
            Ok((connection, capacity))
        }
        _ => unreachable!("callers only invoke parse_connector after connector_can_start"),
    }
}

/// `expression := pipeline_tail := merge_expr ( connector merge_expr )*`
///
/// The chain is right-associative: `a -> b -> c` parses as
/// `Pipeline(a, Pipeline(b, c))`.
pub fn parse_expression<C: ParseContext<Token>>(ctx: &mut C) -> Result<Expr> {
    let mut operands = vec![parse_merge(ctx)?];
    let mut connectors = Vec::new();

    while connector_can_start(ctx) {
        connectors.push(parse_connector(ctx)?);
        operands.push(parse_merge(ctx)?);
    }

    let mut result = operands.pop().expect("at least one operand was parsed");
    while let Some((connection, capacity)) = connectors.pop() {
        let left = operands.pop().expect("one fewer operand than connector");
        result = Expr::Pipeline(Box::new(left), Box::new(result), connection, capacity);
    }
    Ok(result)
}
