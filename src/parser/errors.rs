//! Parse failures and collected diagnostics
//!
//! [`ParseError`] is the internal failure value threaded through every parse
//! function as `Result<T, ParseError>`. It never leaves a parse pass: failure
//! boundaries hand it to the [`ErrorCollector`], which turns it into a
//! [`ParserError`] record with a 1-based line and column.

use crate::parser::lexer::LexError;
use serde::Serialize;
use std::fmt;

/// Internal parse failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Expected {expected}, found {found}")]
    Expected {
        expected: String,
        found: String,
        offset: usize,
    },

    #[error("{message}")]
    Unexpected { message: String, offset: usize },

    #[error("Maximum nesting depth of {limit} exceeded")]
    DepthExceeded { limit: usize, offset: usize },

    #[error("Iteration limit of {limit} exceeded while parsing {context}")]
    IterationLimit {
        limit: usize,
        context: &'static str,
        offset: usize,
    },

    #[error("Invalid literal '{text}'")]
    InvalidLiteral { text: String, offset: usize },
}

impl ParseError {
    pub fn offset(&self) -> usize {
        match self {
            ParseError::Expected { offset, .. }
            | ParseError::Unexpected { offset, .. }
            | ParseError::DepthExceeded { offset, .. }
            | ParseError::IterationLimit { offset, .. }
            | ParseError::InvalidLiteral { offset, .. } => *offset,
        }
    }

    /// Ceiling violations are never swallowed by speculative attempts.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ParseError::DepthExceeded { .. } | ParseError::IterationLimit { .. }
        )
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    Lexical,
    Syntax,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lexical => write!(f, "lexical"),
            ErrorKind::Syntax => write!(f, "syntax"),
        }
    }
}

/// A collected diagnostic, independent of the AST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParserError {
    pub position: usize,
    pub line: usize,
    pub column: usize,
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found: Option<String>,
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} error: {}",
            self.line, self.column, self.kind, self.message
        )
    }
}

/// 1-based line and column of a byte offset. Offsets past the end point just
/// after the last character.
pub fn line_column(source: &str, position: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for (idx, ch) in source.char_indices() {
        if idx >= position {
            break;
        }
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

/// Accumulates diagnostics for one parse pass.
#[derive(Debug, Clone)]
pub struct ErrorCollector<'a> {
    source: &'a str,
    errors: Vec<ParserError>,
}

impl<'a> ErrorCollector<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            errors: Vec::new(),
        }
    }

    pub fn add_lexical_error(&mut self, err: &LexError) {
        self.push(ErrorKind::Lexical, err.offset, err.message.clone(), None, None);
    }

    pub fn add_syntax_error(&mut self, err: &ParseError) {
        let (expected, found) = match err {
            ParseError::Expected {
                expected, found, ..
            } => (Some(expected.clone()), Some(found.clone())),
            _ => (None, None),
        };
        self.push(
            ErrorKind::Syntax,
            err.offset(),
            err.to_string(),
            expected,
            found,
        );
    }

    fn push(
        &mut self,
        kind: ErrorKind,
        position: usize,
        message: String,
        expected: Option<String>,
        found: Option<String>,
    ) {
        let (line, column) = line_column(self.source, position);
        self.errors.push(ParserError {
            position,
            line,
            column,
            kind,
            message,
            expected,
            found,
        });
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Drop diagnostics recorded after a checkpoint (speculation rollback).
    pub fn truncate(&mut self, len: usize) {
        self.errors.truncate(len);
    }

    pub fn errors(&self) -> &[ParserError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParserError> {
        self.errors
    }
}
