use std::cmp::Reverse;

use crate::context::{DefaultContext, LexContext};
use crate::rules::LexingRule;
use crate::token::{Token, TokenKind};

/// Applies lexing rules in priority order to turn source text into tokens
/// (spec §4.1).
///
/// Whitespace and `#`-to-end-of-line comments are skipped before rule
/// dispatch and never produce tokens. An unrecognized character emits a
/// single [`TokenKind::Error`] token and scanning continues at the next
/// character, so `lex` always terminates with a sequence ending in
/// [`TokenKind::Eof`] (spec §7, §8).
pub struct Lexer<Ctx: LexContext> {
    context: Ctx,
    rules: Vec<Box<dyn LexingRule<Ctx>>>,
    done: bool,
}

impl<Ctx: LexContext> Lexer<Ctx> {
    pub fn new(context: Ctx, rules: Vec<Box<dyn LexingRule<Ctx>>>) -> Self {
        let mut sorted = rules;
        sorted.sort_by_key(|rule| Reverse(rule.priority()));
        Self {
            context,
            rules: sorted,
            done: false,
        }
    }

    pub fn context(&self) -> &Ctx {
        &self.context
    }

    fn skip_trivia(&mut self) {
        loop {
            let skipped_space = !self
                .context
                .consume_while(|c| c.is_whitespace())
                .is_empty();

            let mut skipped_comment = false;
            if self.context.peek() == Some('#') {
                self.context.consume_while(|c| c != '\n');
                skipped_comment = true;
            }

            if !skipped_space && !skipped_comment {
                break;
            }
        }
    }

    /// Produces the next token, or `None` once EOF has already been
    /// emitted.
    pub fn next_token(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }

        self.skip_trivia();

        if self.context.is_eof() {
            self.done = true;
            return Some(Token::new(TokenKind::Eof, "", self.context.position()));
        }

        let first = self.context.peek();
        for rule in &self.rules {
            if let Some(false) = rule.quick_check(first) {
                continue;
            }
            let checkpoint = self.context.checkpoint();
            if let Some(token) = rule.try_match(&mut self.context) {
                return Some(token);
            }
            self.context.restore(checkpoint);
        }

        // No rule matched: emit an error token and advance past the
        // offending character so scanning always makes progress.
        let position = self.context.position();
        let ch = self
            .context
            .advance()
            .map(|c| c.to_string())
            .unwrap_or_default();
        tracing::debug!(%position, lexeme = %ch, "unrecognized character");
        Some(Token::new(TokenKind::Error, ch, position))
    }

    /// Collects every remaining token, including the trailing EOF.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}

impl Lexer<DefaultContext> {
    pub fn from_str(input: impl Into<String>) -> Self {
        Self::new(DefaultContext::new(input), crate::rules::default_rules())
    }
}

/// Lexes `input` into a token sequence ending in [`TokenKind::Eof`]
/// (spec §6: `lex(text)`).
pub fn lex(input: &str) -> Vec<Token> {
    let span = tracing::debug_span!("lex", len = input.len());
    let _guard = span.enter();
    let tokens = Lexer::from_str(input).tokenize();
    tracing::debug!(tokens = tokens.len(), "lexing complete");
    tokens
}
