//! Turns a VidPipe token stream into an expression tree (spec §4.2).
//!
//! Grammar is recursive-descent, with an explicit operand/connector
//! accumulation step in [`grammar::parse_expression`] so the connector
//! chain can be folded right-associatively instead of the left-recursive
//! shape a plain loop would produce.

pub mod ast;
pub mod context;
mod grammar;

pub mod error;

pub use ast::{Connection, Expr};
pub use context::{DefaultContext, ParseContext, TokenLike};
pub use error::ParseError;

use vidpipe_lexer::Token;

/// Parses a complete token stream into an expression tree (spec §6:
/// `parse(tokens)`).
///
/// A successful parse must consume every token up to and including the
/// trailing end-of-input marker; anything left over is a
/// [`ParseError::TrailingTokens`].
pub fn parse(tokens: Vec<Token>) -> Result<Expr, ParseError> {
    let span = tracing::debug_span!("parse", tokens = tokens.len());
    let _guard = span.enter();

    let mut ctx = DefaultContext::new(tokens);
    let tree = grammar::parse_expression(&mut ctx)?;

    if !ctx.is_eof() {
        return Err(ParseError::TrailingTokens {
            position: ctx.position(),
        });
    }

    tracing::debug!("parse complete");
    Ok(tree)
}
