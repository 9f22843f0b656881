//! # Introduction
//!
//! cfront turns C and C++ source text into an abstract syntax tree. It is
//! the front end half of a compiler: no preprocessing, no semantic analysis,
//! no code generation. Parsing never fails outright. Every call returns a
//! best-effort [`Program`](parser::ast::Program) together with the list of
//! lexical and syntax errors collected on the way.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → { Visitor, JSON, text tree }
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds the AST, recovering from
//!    errors at statement and member boundaries.
//! 2. [`visitor`]: double-dispatch traversal over the AST families.
//! 3. [`serialize`]: JSON projection of the AST and the diagnostics.
//! 4. [`visualize`]: indented text outline, built on the visitor.
//! 5. [`config`]: dialect selection and the resource ceilings.
//!
//! ## Example
//!
//! ```
//! use cfront::parser::ast::{Declaration, Statement};
//!
//! let output = cfront::parse("int add(int a, int b) { return a + b; }");
//! assert!(output.errors.is_empty());
//! match &output.program.body[0] {
//!     Statement::Decl(Declaration::FunctionDecl(f)) => assert_eq!(f.name, "add"),
//!     other => panic!("unexpected item {:?}", other),
//! }
//! ```

pub mod config;
pub mod parser;
pub mod serialize;
pub mod visitor;
pub mod visualize;

use config::ParserConfig;
use parser::ast::Program;
use parser::errors::ParserError;
use parser::Parser;
use serde::Serialize;

/// Result of one parse pass: the tree and everything that went wrong.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseOutput {
    pub program: Program,
    pub errors: Vec<ParserError>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parse C++ source with the default configuration.
pub fn parse(source: &str) -> ParseOutput {
    parse_with(source, ParserConfig::default(), "translation_unit")
}

/// Parse `source` as the translation unit `name`.
pub fn parse_with(source: &str, config: ParserConfig, name: &str) -> ParseOutput {
    let mut parser = Parser::with_config(source, config);
    let program = parser.parse_program_named(name);
    ParseOutput {
        program,
        errors: parser.into_errors(),
    }
}
