//! JSON projection of parse results
//!
//! The AST serializes through its derived `Serialize` impls; this module
//! only arranges the top-level documents:
//! - [`to_json`]: `{ "program": ..., "errors": [...] }`
//! - [`errors_to_json`]: diagnostics grouped as
//!   `{ "lexerErrors": [...], "parserErrors": [...] }`

use crate::parser::errors::{ErrorKind, ParserError};
use crate::ParseOutput;
use serde::Serialize;
use serde_json::Value;

/// Diagnostics split by the stage that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport<'a> {
    pub lexer_errors: Vec<&'a ParserError>,
    pub parser_errors: Vec<&'a ParserError>,
}

impl<'a> ErrorReport<'a> {
    pub fn new(errors: &'a [ParserError]) -> Self {
        let (lexer_errors, parser_errors): (Vec<_>, Vec<_>) = errors
            .iter()
            .partition(|err| err.kind == ErrorKind::Lexical);
        Self {
            lexer_errors,
            parser_errors,
        }
    }

    pub fn total(&self) -> usize {
        self.lexer_errors.len() + self.parser_errors.len()
    }
}

fn render<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

pub fn to_value(output: &ParseOutput) -> serde_json::Result<Value> {
    serde_json::to_value(output)
}

pub fn to_json(output: &ParseOutput, pretty: bool) -> serde_json::Result<String> {
    render(output, pretty)
}

pub fn errors_to_json(errors: &[ParserError], pretty: bool) -> serde_json::Result<String> {
    render(&ErrorReport::new(errors), pretty)
}
