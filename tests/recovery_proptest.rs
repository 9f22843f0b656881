//! Property-based tests for parser termination and recovery
//!
//! Whatever the input, a parse pass must return, consume the whole token
//! stream, unwind every nesting level and report positions inside the
//! source.

use cfront::config::ParserConfig;
use cfront::parser::context::ParseContext;
use cfront::parser::errors::ErrorKind;
use cfront::parser::lexer::{tokenize, Dialect};
use cfront::parser::Parser;
use proptest::prelude::*;

const FRAGMENTS: &[&str] = &[
    "int", "char", "x", "y", "Point", "(", ")", "{", "}", "[", "]", ";", ",", "=", "+", "*",
    "&", "<", ">", "::", ":", "~", "...", "1", "2.5", "\"s\"", "'c'", "class", "struct",
    "enum", "union", "typedef", "template", "typename", "namespace", "using", "operator",
    "public", "virtual", "const", "static", "if", "else", "for", "while", "do", "switch",
    "case", "default", "break", "return", "try", "catch", "throw", "new", "delete", "sizeof",
    "#include <a.h>\n", "#define N 4\n", "//c\n", "/*c*/",
];

fn dialect_strategy() -> impl Strategy<Value = Dialect> {
    prop_oneof![Just(Dialect::C), Just(Dialect::Cpp)]
}

/// Token soup built from grammar fragments, so the parser reaches deep
/// into its productions before failing.
fn fragment_source() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..40).prop_map(|parts| parts.join(" "))
}

fn check_parse(source: &str, dialect: Dialect) -> Result<(), TestCaseError> {
    let token_count = tokenize(source, dialect).tokens.len();
    let mut parser = Parser::with_config(source, ParserConfig::new(dialect));
    let program = parser.parse_program();

    prop_assert!(parser.context().is_at_end(), "stopped early in {:?}", source);
    prop_assert_eq!(parser.context().depth(), 0);
    prop_assert!(program.body.len() <= token_count);

    for err in parser.errors() {
        prop_assert!(err.position <= source.len());
        prop_assert!(err.line >= 1 && err.column >= 1);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn test_fragments_always_terminate(source in fragment_source(), dialect in dialect_strategy()) {
        check_parse(&source, dialect)?;
    }

    #[test]
    fn test_arbitrary_text_always_terminates(source in "\\PC{0,120}", dialect in dialect_strategy()) {
        check_parse(&source, dialect)?;
    }

    #[test]
    fn test_reset_restores_exact_mark(
        source in fragment_source(),
        before in 0usize..20,
        after in 0usize..20,
    ) {
        let tokens = tokenize(&source, Dialect::Cpp).tokens;
        let mut ctx = ParseContext::new(tokens, 16);
        for _ in 0..before {
            ctx.advance();
        }
        let mark = ctx.mark();
        let token = ctx.peek().clone();
        for _ in 0..after {
            ctx.advance();
        }
        ctx.reset(mark);
        prop_assert_eq!(ctx.position(), mark.position());
        prop_assert_eq!(ctx.peek(), &token);
    }

    #[test]
    fn test_shallow_nesting_parses_cleanly(depth in 0usize..10) {
        let source = format!("int x = {}1{};", "(".repeat(depth), ")".repeat(depth));
        let mut parser = Parser::new(&source);
        parser.parse_program();
        prop_assert!(parser.errors().is_empty());
    }

    #[test]
    fn test_deep_nesting_reports_error(depth in 100usize..300) {
        let source = format!("int x = {}1{};", "(".repeat(depth), ")".repeat(depth));
        let config = ParserConfig::default().with_max_depth(32);
        let mut parser = Parser::with_config(&source, config);
        parser.parse_program();
        prop_assert!(parser.errors().iter().any(|e| e.kind == ErrorKind::Syntax));
        prop_assert_eq!(parser.context().depth(), 0);
    }

    #[test]
    fn test_garbage_between_items_is_skipped(junk in prop::sample::select(&[")", "]", "}", "?", "= =", ", ,"][..])) {
        let source = format!("int a;\n{junk};\nint b;");
        let mut parser = Parser::new(&source);
        let program = parser.parse_program();
        prop_assert!(!parser.errors().is_empty());
        prop_assert!(program.body.len() >= 2);
    }
}
