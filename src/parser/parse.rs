//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct, its token helpers, the
//! speculation/nesting combinators, and the [`Parser::parse_program`] entry
//! point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `types`: type names, parameter lists and the declaration-vs-expression test
//! - `expressions`: expressions with precedence climbing
//! - `statements`: statements (if, while, for, switch, try, ...)
//! - `declarations`: the translation-unit ladder and named declarations
//! - `classes`: class/struct/union bodies and their members
//! - `recovery`: failure boundaries and skip strategies
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.
//!
//! Speculative attempts go through [`Parser::speculate`], which restores the
//! cursor and drops any diagnostics on failure. Ceiling violations
//! ([`ParseError::is_fatal`]) pass through speculation untouched.

use crate::config::ParserConfig;
use crate::parser::ast::Program;
use crate::parser::context::ParseContext;
use crate::parser::errors::{ErrorCollector, ParseError, ParseResult, ParserError};
use crate::parser::lexer::{Dialect, Lexer, Token, TokenKind};

/// Recursive descent parser for C and C++
pub struct Parser<'a> {
    pub(crate) source: &'a str,
    pub(crate) config: ParserConfig,
    pub(crate) ctx: ParseContext,
    pub(crate) errors: ErrorCollector<'a>,
    /// Accept any identifier as a type name (class bodies, template heads).
    pub(crate) lenient_types: bool,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_config(source, ParserConfig::default())
    }

    pub fn with_config(source: &'a str, config: ParserConfig) -> Self {
        let tokenized = Lexer::new(source, config.dialect).tokenize();
        let mut errors = ErrorCollector::new(source);
        for err in &tokenized.errors {
            errors.add_lexical_error(err);
        }
        Self {
            source,
            config,
            ctx: ParseContext::new(tokenized.tokens, config.max_depth),
            errors,
            lenient_types: false,
        }
    }

    /// Parse the entire translation unit. Always returns a program; problems
    /// are available through [`Parser::errors`].
    pub fn parse_program(&mut self) -> Program {
        self.parse_program_named("translation_unit")
    }

    pub fn parse_program_named(&mut self, name: &str) -> Program {
        let mut program = Program::new(name);
        program.body = self.parse_items(false);
        log::debug!(
            "parsed {} top-level items with {} diagnostics",
            program.body.len(),
            self.errors.len()
        );
        program
    }

    pub fn errors(&self) -> &[ParserError] {
        self.errors.errors()
    }

    pub fn into_errors(self) -> Vec<ParserError> {
        self.errors.into_errors()
    }

    pub fn context(&self) -> &ParseContext {
        &self.ctx
    }

    pub fn dialect(&self) -> Dialect {
        self.config.dialect
    }

    // ===== Combinators =====

    /// Run `f` speculatively. On failure the cursor and the diagnostic list are
    /// restored and `Ok(None)` is returned; fatal errors are propagated.
    pub(crate) fn speculate<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<Option<T>> {
        let mark = self.ctx.mark();
        let checkpoint = self.errors.len();
        match f(self) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                self.ctx.reset(mark);
                self.errors.truncate(checkpoint);
                if err.is_fatal() {
                    return Err(err);
                }
                log::trace!(
                    "abandoned speculative parse at token {}: {err}",
                    mark.position()
                );
                Ok(None)
            }
        }
    }

    /// Run `f` one recursion level deeper.
    pub(crate) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        self.ctx.enter()?;
        let result = f(self);
        self.ctx.exit();
        result
    }

    /// Run `f` with lenient type recognition switched on.
    pub(crate) fn leniently<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let saved = self.lenient_types;
        self.lenient_types = true;
        let result = f(self);
        self.lenient_types = saved;
        result
    }

    // ===== Helper methods =====

    pub(crate) fn is_cpp(&self) -> bool {
        self.config.dialect == Dialect::Cpp
    }

    pub(crate) fn peek(&self) -> &Token {
        self.ctx.peek()
    }

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.ctx.peek().kind
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> &Token {
        self.ctx.peek_ahead(n)
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.ctx.peek().is(kind)
    }

    pub(crate) fn check_ahead(&self, n: usize, kind: TokenKind) -> bool {
        self.ctx.peek_ahead(n).is(kind)
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.ctx.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn advance(&mut self) -> Token {
        self.ctx.advance().clone()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.ctx.is_at_end()
    }

    pub(crate) fn expected(&self, what: impl Into<String>) -> ParseError {
        ParseError::Expected {
            expected: what.into(),
            found: self.peek().to_string(),
            offset: self.peek().offset,
        }
    }

    pub(crate) fn unexpected(&self, message: impl Into<String>) -> ParseError {
        ParseError::Unexpected {
            message: message.into(),
            offset: self.peek().offset,
        }
    }

    pub(crate) fn expect_token(&mut self, kind: TokenKind, ctx: &str) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else if ctx.is_empty() {
            Err(self.expected(kind.to_string()))
        } else {
            Err(self.expected(format!("{kind} {ctx}")))
        }
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> ParseResult<()> {
        self.expect_token(TokenKind::LParen, ctx).map(|_| ())
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> ParseResult<()> {
        self.expect_token(TokenKind::RParen, ctx).map(|_| ())
    }

    pub(crate) fn expect_lbrace(&mut self, ctx: &str) -> ParseResult<()> {
        self.expect_token(TokenKind::LBrace, ctx).map(|_| ())
    }

    pub(crate) fn expect_semicolon(&mut self, ctx: &str) -> ParseResult<()> {
        self.expect_token(TokenKind::Semicolon, ctx).map(|_| ())
    }

    pub(crate) fn expect_identifier(&mut self, ctx: &str) -> ParseResult<String> {
        if self.check(TokenKind::Identifier) {
            Ok(self.advance().text)
        } else if ctx.is_empty() {
            Err(self.expected("identifier"))
        } else {
            Err(self.expected(format!("identifier {ctx}")))
        }
    }

    /// Close a brace-delimited body. Running out of input records the error
    /// and lets the caller keep what it already parsed.
    pub(crate) fn close_brace(&mut self, ctx: &str) -> ParseResult<()> {
        if self.match_token(TokenKind::RBrace) {
            return Ok(());
        }
        let err = self.expected(format!("'}}' {ctx}"));
        if self.is_at_end() {
            self.report(&err);
            Ok(())
        } else {
            Err(err)
        }
    }

    /// Source text spanned by tokens `[start, end)`, joined with normalized
    /// spacing (`std::vector<int>`, `const char*`, `unsigned long`).
    pub(crate) fn text_between(&self, start: usize, end: usize) -> String {
        let tokens = self.ctx.tokens();
        let end = end.min(tokens.len());
        let start = start.min(end);
        join_tokens(&tokens[start..end])
    }

    /// Exact source slice covering tokens `[start, end)`.
    pub(crate) fn source_between(&self, start: usize, end: usize) -> &'a str {
        let tokens = self.ctx.tokens();
        let end = end.min(tokens.len());
        if start >= end {
            return "";
        }
        let from = tokens[start].offset;
        let last = &tokens[end - 1];
        let to = last.offset + last.text.len();
        self.source.get(from..to).unwrap_or("")
    }
}

fn is_wordy(kind: TokenKind) -> bool {
    use TokenKind::*;
    kind.is_keyword()
        || matches!(
            kind,
            Identifier
                | IntLiteral
                | HexLiteral
                | OctalLiteral
                | FloatLiteral
                | StringLiteral
                | CharLiteral
        )
}

pub(crate) fn join_tokens(tokens: &[Token]) -> String {
    use TokenKind::*;
    let mut out = String::new();
    let mut prev: Option<TokenKind> = None;
    for token in tokens {
        if let Some(p) = prev {
            let spaced = if is_wordy(token.kind) {
                is_wordy(p) || matches!(p, Comma | Gt | Shr | Star | Amp | AndAnd | Ellipsis)
            } else {
                p == Comma
            };
            if spaced {
                out.push(' ');
            }
        }
        out.push_str(&token.text);
        prev = Some(token.kind);
    }
    out
}
