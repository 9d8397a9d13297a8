use vidpipe_common::Position;
use vidpipe_lexer::TokenKind;

/// Parse failures surfaced to the caller (spec §7, "Parse error").
///
/// The partial tree is never returned alongside an error: [`crate::parse`]
/// yields either a complete [`crate::Expr`] or one of these.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ParseError {
    #[error("{position}: unexpected token {found:?} ({lexeme:?})")]
    UnexpectedToken {
        found: TokenKind,
        lexeme: String,
        position: Position,
    },

    #[error("{position}: unexpected end of input")]
    UnexpectedEof { position: Position },

    #[error("{position}: missing closing {expected:?}")]
    MissingClosing {
        expected: TokenKind,
        position: Position,
    },

    #[error("{position}: trailing tokens after a complete expression")]
    TrailingTokens { position: Position },

    #[error("{position}: a lex error token cannot start an expression")]
    LexError { position: Position },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::UnexpectedToken { position, .. }
            | ParseError::UnexpectedEof { position }
            | ParseError::MissingClosing { position, .. }
            | ParseError::TrailingTokens { position }
            | ParseError::LexError { position } => *position,
        }
    }
}
