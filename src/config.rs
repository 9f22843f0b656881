//! Parser configuration: dialect selection and the resource ceilings that
//! bound recursion and recovery loops.

use crate::parser::lexer::Dialect;

/// Sized so the deepest recursion fits a 2 MiB thread stack in debug builds.
pub const DEFAULT_MAX_DEPTH: usize = 48;
pub const DEFAULT_MAX_ITERATIONS: usize = 100_000;
pub const DEFAULT_MAX_STATEMENTS: usize = 10_000;
pub const DEFAULT_MAX_LOOKAHEAD: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    pub dialect: Dialect,
    /// Recursion ceiling checked on every nested parse entry.
    pub max_depth: usize,
    /// Ceiling for any single item, member or recovery loop.
    pub max_iterations: usize,
    /// Ceiling on statements in one block.
    pub max_statements: usize,
    /// Tokens scanned when looking for the `)` that matches a `(`.
    pub max_lookahead: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_statements: DEFAULT_MAX_STATEMENTS,
            max_lookahead: DEFAULT_MAX_LOOKAHEAD,
        }
    }
}

impl ParserConfig {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_max_statements(mut self, max_statements: usize) -> Self {
        self.max_statements = max_statements;
        self
    }

    pub fn with_max_lookahead(mut self, max_lookahead: usize) -> Self {
        self.max_lookahead = max_lookahead;
        self
    }
}
