//! Mutable state threaded through a parse pass
//!
//! [`ParseContext`] owns the token stream and tracks three things:
//! - the token cursor, which only moves backwards through [`ParseContext::reset`]
//! - the recursion depth, bounded by a fixed ceiling
//! - the known-type set used to tell `Point p;` (a declaration) from `f(x);`

use crate::parser::errors::{ParseError, ParseResult};
use crate::parser::lexer::{Token, TokenKind};
use rustc_hash::FxHashSet;

/// Saved cursor position for speculative parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    position: usize,
}

impl Mark {
    pub fn position(self) -> usize {
        self.position
    }
}

pub struct ParseContext {
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
    max_depth: usize,
    known_types: FxHashSet<String>,
}

impl ParseContext {
    pub fn new(mut tokens: Vec<Token>, max_depth: usize) -> Self {
        if !tokens.last().is_some_and(|t| t.is(TokenKind::Eof)) {
            let end = tokens.last().map_or(0, |t| t.offset + t.text.len());
            tokens.push(Token::new(TokenKind::Eof, "", end));
        }
        Self {
            tokens,
            position: 0,
            depth: 0,
            max_depth,
            known_types: FxHashSet::default(),
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Current token; the trailing `Eof` once the stream is exhausted.
    pub fn peek(&self) -> &Token {
        self.peek_ahead(0)
    }

    pub fn peek_ahead(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.position + n).min(last)]
    }

    pub fn previous(&self) -> Option<&Token> {
        self.position
            .checked_sub(1)
            .and_then(|idx| self.tokens.get(idx))
    }

    /// Move past the current token; never moves past `Eof`.
    pub fn advance(&mut self) -> &Token {
        let idx = self.position.min(self.tokens.len() - 1);
        if !self.is_at_end() {
            self.position += 1;
        }
        &self.tokens[idx]
    }

    pub fn is_at_end(&self) -> bool {
        self.peek().is(TokenKind::Eof)
    }

    pub fn mark(&self) -> Mark {
        Mark {
            position: self.position,
        }
    }

    pub fn reset(&mut self, mark: Mark) {
        self.position = mark.position;
    }

    /// Rewind to an earlier token index.
    pub fn reset_to(&mut self, position: usize) {
        self.position = position.min(self.position);
    }

    /// Enter a nested parse; fails once the ceiling is reached.
    pub fn enter(&mut self) -> ParseResult<()> {
        if self.depth >= self.max_depth {
            return Err(ParseError::DepthExceeded {
                limit: self.max_depth,
                offset: self.peek().offset,
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_known_type(&self, name: &str) -> bool {
        self.known_types.contains(name)
    }

    pub fn register_type(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !name.is_empty() {
            log::trace!("registering type name '{name}'");
            self.known_types.insert(name);
        }
    }

    pub fn known_types(&self) -> impl Iterator<Item = &str> {
        self.known_types.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::{tokenize, Dialect};

    fn context(source: &str) -> ParseContext {
        ParseContext::new(tokenize(source, Dialect::Cpp).tokens, 3)
    }

    #[test]
    fn test_mark_reset_is_exact() {
        let mut ctx = context("a b c d e");
        ctx.advance();
        let mark = ctx.mark();
        ctx.advance();
        ctx.advance();
        assert_eq!(ctx.peek().text, "d");
        ctx.reset(mark);
        assert_eq!(ctx.position(), 1);
        assert_eq!(ctx.peek().text, "b");
    }

    #[test]
    fn test_cursor_stops_at_eof() {
        let mut ctx = context("x");
        ctx.advance();
        ctx.advance();
        ctx.advance();
        assert!(ctx.is_at_end());
        assert_eq!(ctx.position(), 1);
        assert!(ctx.peek_ahead(10).is(TokenKind::Eof));
        assert_eq!(ctx.previous().map(|t| t.text.as_str()), Some("x"));
    }

    #[test]
    fn test_empty_stream_gets_eof() {
        let ctx = ParseContext::new(Vec::new(), 4);
        assert!(ctx.is_at_end());
        assert!(ctx.previous().is_none());
    }

    #[test]
    fn test_depth_ceiling() {
        let mut ctx = context("x");
        for _ in 0..3 {
            assert!(ctx.enter().is_ok());
        }
        match ctx.enter() {
            Err(ParseError::DepthExceeded { limit, .. }) => assert_eq!(limit, 3),
            _ => panic!("Expected depth error"),
        }
        ctx.exit();
        assert_eq!(ctx.depth(), 2);
        assert!(ctx.enter().is_ok());
    }

    #[test]
    fn test_known_types_grow() {
        let mut ctx = context("");
        assert!(!ctx.is_known_type("Point"));
        ctx.register_type("Point");
        ctx.register_type("");
        assert!(ctx.is_known_type("Point"));
        assert_eq!(ctx.known_types().count(), 1);
    }
}
