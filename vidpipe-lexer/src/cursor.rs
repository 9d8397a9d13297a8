use std::sync::Arc;

use vidpipe_common::{Checkpoint, Position};

/// Traverses the source text one character at a time, tracking line/column
/// per spec §4.1 ("line/column counters update on each character, with
/// newline resetting column to 1").
///
/// Backed by an `Arc<str>` rather than a borrowed `&str` so the cursor (and
/// any context wrapping it) owns no lifetime parameter, matching the rest of
/// the workspace's move-oriented, thread-crossing types.
#[derive(Debug, Clone)]
pub struct Cursor {
    buffer: Arc<str>,
    offset: usize,
    position: Position,
}

impl Cursor {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            buffer: Arc::from(input.into()),
            offset: 0,
            position: Position::new(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_eof(&self) -> bool {
        self.offset >= self.buffer.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.buffer[self.offset..].chars().next()
    }

    /// Peeks `n` characters ahead of the current one without advancing.
    pub fn peek_at(&self, n: usize) -> Option<char> {
        self.buffer[self.offset..].chars().nth(n)
    }

    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        if ch == '\n' {
            self.position.line += 1;
            self.position.column = 1;
        } else {
            self.position.column += 1;
        }
        self.position.offset = self.offset;
        Some(ch)
    }

    /// Advances past `text` if the cursor is positioned exactly at it.
    /// Returns whether the match (and advance) happened.
    pub fn eat_str(&mut self, text: &str) -> bool {
        if self.buffer[self.offset..].starts_with(text) {
            for _ in 0..text.chars().count() {
                self.advance();
            }
            true
        } else {
            false
        }
    }

    pub fn consume_while<F>(&mut self, mut predicate: F) -> String
    where
        F: FnMut(char) -> bool,
    {
        let mut out = String::new();
        while let Some(ch) = self.peek() {
            if !predicate(ch) {
                break;
            }
            out.push(ch);
            self.advance();
        }
        out
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::new(self.offset, self.position)
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.offset = checkpoint.index();
        self.position = checkpoint.position();
    }
}
