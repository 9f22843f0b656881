//! C and C++ source parser
//!
//! This module transforms source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: the [`Parser`] driver, split across the modules below
//! - [`ast`]: AST node definitions
//! - [`errors`]: parse failures and collected diagnostics
//! - [`context`]: token cursor, depth ceiling and known-type set
//!
//! # Supported language
//!
//! Two dialects share one parser:
//! - C: preprocessor lines, structs/unions/enums, typedefs (including
//!   function pointers), functions and the full statement set
//! - C++: additionally classes with access sections, constructors,
//!   destructors, operators, namespaces, `using`, shallow templates,
//!   lambdas, `new`/`delete` and named casts
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary operators.
//! Whether a name is a type is decided from the set of type names declared
//! so far, with speculative parsing and backtracking where that is not
//! enough. No external parser generator dependencies.

pub mod ast;
pub mod context;
pub mod errors;
pub mod lexer;
pub mod parse;

mod classes;
mod declarations;
mod expressions;
mod recovery;
mod statements;
mod types;

pub use parse::Parser;
