use crate::context::LexContext;
use crate::token::{Token, TokenKind};

/// A lexing rule that operates on a context.
///
/// Rules are generic over `Ctx` rather than hardwired to a concrete struct,
/// so the same rule set works against any future `LexContext` implementation
/// (e.g. a streaming one) without change.
pub trait LexingRule<Ctx: LexContext> {
    /// Attempts to match and consume a token starting at the cursor.
    /// Only advances the cursor when a token is actually matched.
    fn try_match(&self, ctx: &mut Ctx) -> Option<Token>;

    /// Higher-priority rules are tried first. Default is 0.
    fn priority(&self) -> i32 {
        0
    }

    /// Cheap pre-check against the next character; `Some(false)` lets the
    /// lexer skip a rule that cannot possibly match without attempting (and
    /// rolling back) a full checkpoint.
    fn quick_check(&self, _first: Option<char>) -> Option<bool> {
        None
    }
}

/// Longest-match multi-character operators: `->`, `~>`, `=>`, `&>`, `+>`
/// (spec §4.1: "recognized before single-character punctuation").
pub struct MultiCharOperatorRule;

const MULTI_CHAR_OPERATORS: &[(&str, TokenKind)] = &[
    ("->", TokenKind::Arrow),
    ("~>", TokenKind::AsyncArrow),
    ("=>", TokenKind::SyncArrow),
    ("&>", TokenKind::Parallel),
    ("+>", TokenKind::Merge),
];

impl<Ctx: LexContext> LexingRule<Ctx> for MultiCharOperatorRule {
    fn try_match(&self, ctx: &mut Ctx) -> Option<Token> {
        let position = ctx.position();
        for (text, kind) in MULTI_CHAR_OPERATORS {
            if ctx.eat_str(text) {
                return Some(Token::new(*kind, *text, position));
            }
        }
        None
    }

    fn priority(&self) -> i32 {
        20
    }

    fn quick_check(&self, first: Option<char>) -> Option<bool> {
        Some(matches!(first, Some('-') | Some('~') | Some('=') | Some('&') | Some('+')))
    }
}

/// The single-character punctuation tokens (spec §4.1).
pub struct SingleCharRule;

const SINGLE_CHAR_TOKENS: &[(char, TokenKind)] = &[
    ('|', TokenKind::Choice),
    ('[', TokenKind::BufferOpen),
    (']', TokenKind::BufferClose),
    ('{', TokenKind::LoopOpen),
    ('}', TokenKind::LoopClose),
    ('(', TokenKind::LParen),
    (')', TokenKind::RParen),
    (',', TokenKind::Comma),
];

impl<Ctx: LexContext> LexingRule<Ctx> for SingleCharRule {
    fn try_match(&self, ctx: &mut Ctx) -> Option<Token> {
        let ch = ctx.peek()?;
        let kind = SINGLE_CHAR_TOKENS
            .iter()
            .find(|(c, _)| *c == ch)
            .map(|(_, kind)| *kind)?;
        let position = ctx.position();
        ctx.advance();
        Some(Token::new(kind, ch.to_string(), position))
    }

    fn priority(&self) -> i32 {
        10
    }

    fn quick_check(&self, first: Option<char>) -> Option<bool> {
        Some(first.is_some_and(|c| SINGLE_CHAR_TOKENS.iter().any(|(t, _)| *t == c)))
    }
}

/// `[A-Za-z_][A-Za-z0-9_\-]*` (spec §4.1: hyphens permitted mid-identifier).
pub struct IdentifierRule;

impl<Ctx: LexContext> LexingRule<Ctx> for IdentifierRule {
    fn try_match(&self, ctx: &mut Ctx) -> Option<Token> {
        let first = ctx.peek()?;
        if !(first.is_ascii_alphabetic() || first == '_') {
            return None;
        }
        let position = ctx.position();
        let lexeme = ctx.consume_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        Some(Token::new(TokenKind::Identifier, lexeme, position))
    }

    fn priority(&self) -> i32 {
        10
    }

    fn quick_check(&self, first: Option<char>) -> Option<bool> {
        Some(first.is_some_and(|c| c.is_ascii_alphabetic() || c == '_'))
    }
}

/// `[0-9]+`, decimal integers only (spec §4.1).
pub struct NumberRule;

impl<Ctx: LexContext> LexingRule<Ctx> for NumberRule {
    fn try_match(&self, ctx: &mut Ctx) -> Option<Token> {
        let first = ctx.peek()?;
        if !first.is_ascii_digit() {
            return None;
        }
        let position = ctx.position();
        let lexeme = ctx.consume_while(|c| c.is_ascii_digit());
        Some(Token::new(TokenKind::Number, lexeme, position))
    }

    fn priority(&self) -> i32 {
        10
    }

    fn quick_check(&self, first: Option<char>) -> Option<bool> {
        Some(first.is_some_and(|c| c.is_ascii_digit()))
    }
}

/// The default rule set, sorted by priority by [`crate::Lexer::new`].
pub fn default_rules<Ctx: LexContext + 'static>() -> Vec<Box<dyn LexingRule<Ctx>>> {
    vec![
        Box::new(MultiCharOperatorRule),
        Box::new(SingleCharRule),
        Box::new(IdentifierRule),
        Box::new(NumberRule),
    ]
}
