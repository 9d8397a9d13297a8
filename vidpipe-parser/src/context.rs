use vidpipe_common::{Checkpoint, Position};
use vidpipe_lexer::{Token, TokenKind};

/// A token type usable by [`ParseContext`]: something that can report its
/// own source position and whether it marks end-of-input.
///
/// The teacher this parser is modeled on left position extraction as an
/// unimplemented stub; tokens here always carry a real position, so the
/// context can report one without guessing.
pub trait TokenLike: Clone + std::fmt::Debug {
    fn position(&self) -> Position;
    fn is_eof_token(&self) -> bool;
}

impl TokenLike for Token {
    fn position(&self) -> Position {
        self.position
    }

    fn is_eof_token(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

/// Gives parsing rules access to the token stream without coupling them to
/// a single context implementation (spec §4.2: tokens → expression tree).
pub trait ParseContext<Tok: TokenLike> {
    fn peek(&self) -> Option<&Tok>;
    fn peek_at(&self, offset: usize) -> Option<&Tok>;
    fn advance(&mut self) -> Option<Tok>;
    fn position(&self) -> Position;
    fn is_eof(&self) -> bool;
    fn token_index(&self) -> usize;
    fn checkpoint(&self) -> Checkpoint;
    fn restore(&mut self, checkpoint: Checkpoint);
}

/// A context over a fully materialized token vector (the lexer always
/// produces one; nothing in this parser streams tokens lazily).
#[derive(Debug)]
pub struct DefaultContext<Tok: TokenLike> {
    tokens: Vec<Tok>,
    current: usize,
}

impl<Tok: TokenLike> DefaultContext<Tok> {
    pub fn new(tokens: Vec<Tok>) -> Self {
        Self { tokens, current: 0 }
    }
}

impl<Tok: TokenLike> ParseContext<Tok> for DefaultContext<Tok> {
    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.current)
    }

    fn peek_at(&self, offset: usize) -> Option<&Tok> {
        self.tokens.get(self.current + offset)
    }

    fn advance(&mut self) -> Option<Tok> {
        let token = self.tokens.get(self.current).cloned()?;
        self.current += 1;
        Some(token)
    }

    fn position(&self) -> Position {
        self.peek()
            .map(|t| t.position())
            .or_else(|| self.tokens.last().map(|t| t.position()))
            .unwrap_or_default()
    }

    fn is_eof(&self) -> bool {
        self.peek().map(|t| t.is_eof_token()).unwrap_or(true)
    }

    fn token_index(&self) -> usize {
        self.current
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint::new(self.current, self.position())
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.current = checkpoint.index();
    }
}
