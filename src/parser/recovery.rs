//! Error recovery
//!
//! Failures inside one top-level item, class member or statement are
//! recorded and the cursor is moved to the next plausible boundary, so one
//! bad construct never hides the rest of the file.
//!
//! The boundary rule used by [`Parser::synchronize`]:
//! - a `;` at brace and paren depth zero is consumed and ends the skip
//! - a `}` that closes a brace opened during the skip is consumed, and the
//!   skip ends once depth returns to zero
//! - a `}` at depth zero is left for the enclosing body

use crate::parser::errors::{ParseError, ParseResult};
use crate::parser::lexer::TokenKind;
use crate::parser::parse::Parser;
use log::{debug, warn};

impl<'a> Parser<'a> {
    /// Record a diagnostic without moving the cursor.
    pub(crate) fn report(&mut self, err: &ParseError) {
        debug!("syntax error at byte {}: {err}", err.offset());
        self.errors.add_syntax_error(err);
    }

    /// Record `err`, rewind to the token index `start` where the failed
    /// construct began, and skip to the next boundary.
    pub(crate) fn recover(&mut self, start: usize, err: &ParseError) {
        self.report(err);
        self.ctx.reset_to(start);
        self.synchronize();
    }

    /// Skip tokens until a statement or declaration boundary.
    pub(crate) fn synchronize(&mut self) {
        let start = self.ctx.position();
        let mut braces = 0usize;
        let mut parens = 0usize;
        let mut bounded = false;

        for _ in 0..self.config.max_iterations {
            match self.peek_kind() {
                TokenKind::Eof => {
                    bounded = true;
                    break;
                }
                TokenKind::Semicolon if braces == 0 && parens == 0 => {
                    self.advance();
                    bounded = true;
                    break;
                }
                TokenKind::LBrace => braces += 1,
                TokenKind::RBrace => {
                    if braces == 0 {
                        bounded = true;
                        break;
                    }
                    braces -= 1;
                    if braces == 0 {
                        self.advance();
                        bounded = true;
                        break;
                    }
                }
                TokenKind::LParen => parens += 1,
                TokenKind::RParen => parens = parens.saturating_sub(1),
                _ => {}
            }
            self.advance();
        }

        if !bounded {
            self.report(&ParseError::IterationLimit {
                limit: self.config.max_iterations,
                context: "recovery",
                offset: self.peek().offset,
            });
        }

        let skipped = self.ctx.position() - start;
        if skipped > 0 {
            warn!(
                "skipped {skipped} tokens while recovering, resuming at {}",
                self.peek()
            );
        }
    }

    /// Guarantee forward motion: if a loop body consumed nothing since
    /// `start`, drop one token.
    pub(crate) fn ensure_progress(&mut self, start: usize) {
        if self.ctx.position() == start && !self.is_at_end() {
            let token = self.advance();
            warn!("no progress at {token}, skipping it");
        }
    }

    /// Drop the current token with a diagnostic.
    pub(crate) fn skip_token(&mut self, context: &str) {
        let err = self.unexpected(format!("Unexpected {} {context}", self.peek()));
        self.report(&err);
        let token = self.advance();
        warn!("skipped {token} {context}");
    }

    /// Skip a balanced `open ... close` group, cursor on `open`.
    pub(crate) fn skip_balanced(&mut self, open: TokenKind, close: TokenKind) -> ParseResult<()> {
        self.expect_token(open, "")?;
        let mut depth = 1usize;
        for _ in 0..self.config.max_iterations {
            let kind = self.peek_kind();
            if kind == TokenKind::Eof {
                return Err(self.expected(format!("{close}")));
            }
            self.advance();
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
        }
        Err(ParseError::IterationLimit {
            limit: self.config.max_iterations,
            context: "balanced group",
            offset: self.peek().offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;

    #[test]
    fn test_synchronize_stops_after_semicolon() {
        let mut parser = Parser::new("a b (c ; d) ; next");
        parser.synchronize();
        assert_eq!(parser.peek().text, "next");
    }

    #[test]
    fn test_synchronize_consumes_balanced_block() {
        let mut parser = Parser::new("junk { x; y; } after");
        parser.synchronize();
        assert_eq!(parser.peek().text, "after");
    }

    #[test]
    fn test_synchronize_leaves_enclosing_brace() {
        let mut parser = Parser::new("oops oops } tail");
        parser.synchronize();
        assert!(parser.check(TokenKind::RBrace));
    }

    #[test]
    fn test_synchronize_reports_iteration_limit() {
        let config = ParserConfig::default().with_max_iterations(5);
        let mut parser = Parser::with_config("a b c d e f g ; next", config);
        parser.synchronize();
        assert_eq!(parser.errors().len(), 1);
        assert_eq!(
            parser.errors()[0].message,
            "Iteration limit of 5 exceeded while parsing recovery"
        );
        assert_eq!(parser.peek().text, "f");

        let mut short = Parser::with_config("a b ; next", config);
        short.synchronize();
        assert!(short.errors().is_empty());
    }

    #[test]
    fn test_recovery_limit_inside_function_body() {
        let source = "void f() { int x = ; a b c d e f g h i j k l m n o p ; int y; }";
        let config = ParserConfig::default().with_max_iterations(5);
        let mut parser = Parser::with_config(source, config);
        parser.parse_program();
        assert!(parser
            .errors()
            .iter()
            .any(|e| e.message.contains("while parsing recovery")));
    }

    #[test]
    fn test_ensure_progress() {
        let mut parser = Parser::new("a b");
        parser.ensure_progress(0);
        assert_eq!(parser.peek().text, "b");
        parser.ensure_progress(0);
        assert_eq!(parser.peek().text, "b");
    }

    #[test]
    fn test_skip_balanced() {
        let mut parser = Parser::new("(a (b) c) d");
        assert!(parser.skip_balanced(TokenKind::LParen, TokenKind::RParen).is_ok());
        assert_eq!(parser.peek().text, "d");

        let mut open = Parser::new("{ a {");
        assert!(open.skip_balanced(TokenKind::LBrace, TokenKind::RBrace).is_err());
    }

    #[test]
    fn test_recover_rewinds_then_skips() {
        let mut parser = Parser::new("int x = ; int y;");
        parser.advance();
        parser.advance();
        parser.advance();
        let err = parser.expected("expression");
        parser.recover(0, &err);
        assert_eq!(parser.errors().len(), 1);
        assert_eq!(parser.peek().text, "int");
        assert_eq!(parser.ctx.position(), 4);
    }

    #[test]
    fn test_skip_token_records_error() {
        let mut parser = Parser::new(") x");
        parser.skip_token("at top level");
        assert_eq!(parser.errors().len(), 1);
        assert_eq!(parser.peek().text, "x");
    }
}
