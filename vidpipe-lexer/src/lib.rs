//! Turns VidPipe source text into a token stream (spec §4.1).
//!
//! The scanning core is generic over a [`LexContext`] so rules can be
//! reused against any context implementation; [`DefaultContext`] is the
//! only one this crate ships, wrapping a single in-memory [`Cursor`].

pub mod context;
pub mod cursor;
pub mod lexer;
pub mod rules;
pub mod token;

pub use context::{DefaultContext, LexContext};
pub use cursor::Cursor;
pub use lexer::{lex, Lexer};
pub use rules::{default_rules, LexingRule};
pub use token::{Token, TokenKind};
