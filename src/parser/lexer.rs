//! Lexer (tokenizer) for C and C++ source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//!
//! Each [`Dialect`] owns a fixed, priority-ordered list of lexical rules. At every
//! offset the rules are tried in declaration order and the *first* one that
//! matches wins; this is deliberately not longest-match. Keywords are listed
//! before the generic identifier rule and multi-character operators before their
//! single-character prefixes, so `==` is tried before `=` and `->*` before `->`.
//!
//! String and character literals are scanned by hand so that an escaped quote
//! never terminates the literal. Comments and whitespace are skipped before the
//! rule table runs. A character that matches no rule is reported as a
//! [`LexError`] and skipped, so scanning always terminates.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Grammar selector: the base procedural grammar or the extended one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    C,
    #[default]
    Cpp,
}

impl Dialect {
    /// Picks a dialect from a file extension (`c`/`h` are C, everything else C++).
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "c" | "h" => Dialect::C,
            _ => Dialect::Cpp,
        }
    }
}

/// Closed set of token kinds shared by both dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Preprocessor
    Include,
    Define,
    Ifdef,
    Ifndef,
    Endif,
    Pragma,
    Directive,

    // Keywords
    StaticAssert,
    Constexpr,
    Decltype,
    Noexcept,
    Operator,
    Namespace,
    Typename,
    Template,
    Explicit,
    Mutable,
    Volatile,
    Register,
    Override,
    Virtual,
    Private,
    Public,
    Protected,
    Continue,
    Static,
    Extern,
    Inline,
    Sizeof,
    Typedef,
    Typeid,
    Delete,
    Friend,
    Return,
    Struct,
    Switch,
    Throw,
    Catch,
    Class,
    Const,
    Final,
    Using,
    While,
    Break,
    Case,
    Default,
    Else,
    Enum,
    Goto,
    Auto,
    Bool,
    Char,
    Double,
    Float,
    Long,
    Short,
    Union,
    Unsigned,
    Signed,
    Try,
    Void,
    This,
    New,
    Do,
    If,
    For,
    Int,

    // Multi-character operators
    ArrowStar,     // ->*
    DotStar,       // .*
    ShlAssign,     // <<=
    ShrAssign,     // >>=
    PlusAssign,    // +=
    MinusAssign,   // -=
    StarAssign,    // *=
    SlashAssign,   // /=
    PercentAssign, // %=
    AmpAssign,     // &=
    PipeAssign,    // |=
    CaretAssign,   // ^=
    PlusPlus,      // ++
    MinusMinus,    // --
    Arrow,         // ->
    Shl,           // <<
    Shr,           // >>
    Ellipsis,      // ...
    Spaceship,     // <=>
    Ge,            // >=
    Le,            // <=
    Ne,            // !=
    EqEq,          // ==
    AndAnd,        // &&
    OrOr,          // ||
    ColonColon,    // ::

    // Single-character operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Assign,
    Gt,
    Lt,
    Bang,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Question,
    Dot,

    // Separators
    Semicolon,
    Comma,
    Colon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    // Literals
    True,
    False,
    Nullptr,
    HexLiteral,
    OctalLiteral,
    FloatLiteral,
    IntLiteral,
    StringLiteral,
    CharLiteral,

    Identifier,
    Eof,
}

impl TokenKind {
    /// Fixed spelling of keyword, operator and separator kinds.
    pub fn text(self) -> Option<&'static str> {
        use TokenKind::*;
        let text = match self {
            Include => "#include",
            Define => "#define",
            Ifdef => "#ifdef",
            Ifndef => "#ifndef",
            Endif => "#endif",
            Pragma => "#pragma",
            StaticAssert => "static_assert",
            Constexpr => "constexpr",
            Decltype => "decltype",
            Noexcept => "noexcept",
            Operator => "operator",
            Namespace => "namespace",
            Typename => "typename",
            Template => "template",
            Explicit => "explicit",
            Mutable => "mutable",
            Volatile => "volatile",
            Register => "register",
            Override => "override",
            Virtual => "virtual",
            Private => "private",
            Public => "public",
            Protected => "protected",
            Continue => "continue",
            Static => "static",
            Extern => "extern",
            Inline => "inline",
            Sizeof => "sizeof",
            Typedef => "typedef",
            Typeid => "typeid",
            Delete => "delete",
            Friend => "friend",
            Return => "return",
            Struct => "struct",
            Switch => "switch",
            Throw => "throw",
            Catch => "catch",
            Class => "class",
            Const => "const",
            Final => "final",
            Using => "using",
            While => "while",
            Break => "break",
            Case => "case",
            Default => "default",
            Else => "else",
            Enum => "enum",
            Goto => "goto",
            Auto => "auto",
            Bool => "bool",
            Char => "char",
            Double => "double",
            Float => "float",
            Long => "long",
            Short => "short",
            Union => "union",
            Unsigned => "unsigned",
            Signed => "signed",
            Try => "try",
            Void => "void",
            This => "this",
            New => "new",
            Do => "do",
            If => "if",
            For => "for",
            Int => "int",
            ArrowStar => "->*",
            DotStar => ".*",
            ShlAssign => "<<=",
            ShrAssign => ">>=",
            PlusAssign => "+=",
            MinusAssign => "-=",
            StarAssign => "*=",
            SlashAssign => "/=",
            PercentAssign => "%=",
            AmpAssign => "&=",
            PipeAssign => "|=",
            CaretAssign => "^=",
            PlusPlus => "++",
            MinusMinus => "--",
            Arrow => "->",
            Shl => "<<",
            Shr => ">>",
            Ellipsis => "...",
            Spaceship => "<=>",
            Ge => ">=",
            Le => "<=",
            Ne => "!=",
            EqEq => "==",
            AndAnd => "&&",
            OrOr => "||",
            ColonColon => "::",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Percent => "%",
            Assign => "=",
            Gt => ">",
            Lt => "<",
            Bang => "!",
            Amp => "&",
            Pipe => "|",
            Caret => "^",
            Tilde => "~",
            Question => "?",
            Dot => ".",
            Semicolon => ";",
            Comma => ",",
            Colon => ":",
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            LBracket => "[",
            RBracket => "]",
            True => "true",
            False => "false",
            Nullptr => "nullptr",
            Directive | HexLiteral | OctalLiteral | FloatLiteral | IntLiteral
            | StringLiteral | CharLiteral | Identifier | Eof => return None,
        };
        Some(text)
    }

    /// Builtin type keywords that can start a type name.
    pub fn is_builtin_type(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Void | Int | Char | Short | Long | Float | Double | Signed | Unsigned | Bool | Auto
        )
    }

    pub fn is_directive(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Include | Define | Ifdef | Ifndef | Endif | Pragma | Directive
        )
    }

    /// Assignment operators, `=` included.
    pub fn is_assignment(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Assign
                | PlusAssign
                | MinusAssign
                | StarAssign
                | SlashAssign
                | PercentAssign
                | AmpAssign
                | PipeAssign
                | CaretAssign
                | ShlAssign
                | ShrAssign
        )
    }

    pub fn is_access_specifier(self) -> bool {
        matches!(
            self,
            TokenKind::Public | TokenKind::Private | TokenKind::Protected
        )
    }

    pub fn is_keyword(self) -> bool {
        self.text()
            .is_some_and(|t| t.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_'))
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Directive => write!(f, "preprocessor directive"),
            TokenKind::HexLiteral | TokenKind::OctalLiteral | TokenKind::IntLiteral => {
                write!(f, "integer literal")
            }
            TokenKind::FloatLiteral => write!(f, "floating literal"),
            TokenKind::StringLiteral => write!(f, "string literal"),
            TokenKind::CharLiteral => write!(f, "character literal"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Eof => write!(f, "end of file"),
            other => write!(f, "'{}'", other.text().unwrap_or_default()),
        }
    }
}

/// A classified lexical unit. `offset` is the byte position in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Identifier => write!(f, "identifier '{}'", self.text),
            TokenKind::HexLiteral
            | TokenKind::OctalLiteral
            | TokenKind::IntLiteral
            | TokenKind::FloatLiteral => write!(f, "{} {}", self.kind, self.text),
            TokenKind::StringLiteral | TokenKind::CharLiteral => {
                write!(f, "{} {}", self.kind, self.text)
            }
            TokenKind::Directive => write!(f, "directive '{}'", self.text),
            TokenKind::Eof => write!(f, "end of file"),
            _ => write!(f, "'{}'", self.text),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at offset {offset}")]
pub struct LexError {
    pub message: String,
    pub offset: usize,
}

/// One entry of a dialect's ordered rule table.
struct Rule {
    kind: TokenKind,
    pattern: Regex,
}

/// Rule source: either a kind whose fixed spelling is the pattern, or an
/// explicit regular expression.
enum RuleSpec {
    Fixed(TokenKind),
    Pattern(TokenKind, &'static str),
}

use RuleSpec::{Fixed, Pattern};

const IDENTIFIER_PATTERN: &str = r"[a-zA-Z_][a-zA-Z0-9_]*";
const INT_PATTERN: &str = r"[0-9]+[uUlL]*";
const HEX_PATTERN: &str = r"0[xX][0-9a-fA-F]+[uUlL]*";
const OCTAL_PATTERN: &str = r"0[0-7]+[uUlL]*";

static C_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    use TokenKind::*;
    compile_rules(&[
        Pattern(Include, r#"#include[ ]*<[^>\n]+>"#),
        Pattern(Include, r#"#include[ ]*"[^"\n]+""#),
        Pattern(Define, r"#define\b"),
        Pattern(Directive, r"#[a-zA-Z_][a-zA-Z0-9_]*"),
        Fixed(If),
        Fixed(Else),
        Fixed(While),
        Fixed(For),
        Fixed(Do),
        Fixed(Switch),
        Fixed(Case),
        Fixed(Default),
        Fixed(Break),
        Fixed(Continue),
        Fixed(Return),
        Fixed(Goto),
        Fixed(Void),
        Fixed(Int),
        Fixed(Float),
        Fixed(Double),
        Fixed(Char),
        Fixed(Short),
        Fixed(Long),
        Fixed(Signed),
        Fixed(Unsigned),
        Fixed(Const),
        Fixed(Volatile),
        Fixed(Static),
        Fixed(Extern),
        Fixed(Register),
        Fixed(Inline),
        Fixed(Auto),
        Fixed(Struct),
        Fixed(Union),
        Fixed(Enum),
        Fixed(Typedef),
        Fixed(Sizeof),
        Fixed(Arrow),
        Fixed(PlusPlus),
        Fixed(MinusMinus),
        Fixed(PlusAssign),
        Fixed(MinusAssign),
        Fixed(StarAssign),
        Fixed(SlashAssign),
        Fixed(PercentAssign),
        Fixed(AmpAssign),
        Fixed(PipeAssign),
        Fixed(CaretAssign),
        Fixed(ShlAssign),
        Fixed(ShrAssign),
        Fixed(Ge),
        Fixed(Le),
        Fixed(Ne),
        Fixed(EqEq),
        Fixed(AndAnd),
        Fixed(OrOr),
        Fixed(Shl),
        Fixed(Shr),
        Fixed(Ellipsis),
        Fixed(Question),
        Fixed(Plus),
        Fixed(Minus),
        Fixed(Star),
        Fixed(Slash),
        Fixed(Percent),
        Fixed(Assign),
        Fixed(Gt),
        Fixed(Lt),
        Fixed(Bang),
        Fixed(Amp),
        Fixed(Pipe),
        Fixed(Caret),
        Fixed(Tilde),
        Fixed(Semicolon),
        Fixed(Comma),
        Fixed(Colon),
        Fixed(LParen),
        Fixed(RParen),
        Fixed(LBrace),
        Fixed(RBrace),
        Fixed(LBracket),
        Fixed(RBracket),
        Fixed(Dot),
        Pattern(HexLiteral, HEX_PATTERN),
        Pattern(OctalLiteral, OCTAL_PATTERN),
        Pattern(FloatLiteral, r"[0-9]+\.[0-9]+[fF]?"),
        Pattern(IntLiteral, INT_PATTERN),
        Pattern(Identifier, IDENTIFIER_PATTERN),
    ])
});

static CPP_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    use TokenKind::*;
    compile_rules(&[
        Pattern(Include, r#"#include\s*<[^>\n]+>"#),
        Pattern(Include, r#"#include\s*"[^"\n]+""#),
        Pattern(Define, r"#define\b"),
        Pattern(Ifdef, r"#ifdef\b"),
        Pattern(Ifndef, r"#ifndef\b"),
        Pattern(Endif, r"#endif\b"),
        Pattern(Pragma, r"#pragma\b"),
        Pattern(Directive, r"#[a-zA-Z_][a-zA-Z0-9_]*"),
        Fixed(StaticAssert),
        Fixed(Constexpr),
        Fixed(Decltype),
        Fixed(Noexcept),
        Fixed(Operator),
        Fixed(Namespace),
        Fixed(Typename),
        Fixed(Template),
        Fixed(Explicit),
        Fixed(Mutable),
        Fixed(Volatile),
        Fixed(Register),
        Fixed(Override),
        Fixed(Virtual),
        Fixed(Private),
        Fixed(Public),
        Fixed(Protected),
        Fixed(Continue),
        Fixed(Static),
        Fixed(Extern),
        Fixed(Inline),
        Fixed(Sizeof),
        Fixed(Typedef),
        Fixed(Typeid),
        Fixed(Delete),
        Fixed(Friend),
        Fixed(Return),
        Fixed(Struct),
        Fixed(Switch),
        Fixed(Throw),
        Fixed(Catch),
        Fixed(Class),
        Fixed(Const),
        Fixed(Final),
        Fixed(Using),
        Fixed(While),
        Fixed(Break),
        Fixed(Case),
        Fixed(Default),
        Fixed(Else),
        Fixed(Enum),
        Fixed(Goto),
        Fixed(Auto),
        Fixed(Bool),
        Fixed(Char),
        Fixed(Double),
        Fixed(Float),
        Fixed(Long),
        Fixed(Short),
        Fixed(Union),
        Fixed(Unsigned),
        Fixed(Signed),
        Fixed(Try),
        Fixed(Void),
        Fixed(This),
        Fixed(New),
        Fixed(Do),
        Fixed(If),
        Fixed(For),
        Fixed(Int),
        Fixed(ArrowStar),
        Fixed(DotStar),
        Fixed(ShlAssign),
        Fixed(ShrAssign),
        Fixed(PlusAssign),
        Fixed(MinusAssign),
        Fixed(StarAssign),
        Fixed(SlashAssign),
        Fixed(PercentAssign),
        Fixed(AmpAssign),
        Fixed(PipeAssign),
        Fixed(CaretAssign),
        Fixed(PlusPlus),
        Fixed(MinusMinus),
        Fixed(Arrow),
        Fixed(Shl),
        Fixed(Shr),
        Fixed(Ellipsis),
        Fixed(Spaceship),
        Fixed(Ge),
        Fixed(Le),
        Fixed(Ne),
        Fixed(EqEq),
        Fixed(AndAnd),
        Fixed(OrOr),
        Fixed(ColonColon),
        Fixed(Plus),
        Fixed(Minus),
        Fixed(Star),
        Fixed(Slash),
        Fixed(Percent),
        Fixed(Assign),
        Fixed(Gt),
        Fixed(Lt),
        Fixed(Bang),
        Fixed(Amp),
        Fixed(Pipe),
        Fixed(Caret),
        Fixed(Tilde),
        Fixed(Question),
        Fixed(Dot),
        Fixed(Semicolon),
        Fixed(Comma),
        Fixed(Colon),
        Fixed(LParen),
        Fixed(RParen),
        Fixed(LBrace),
        Fixed(RBrace),
        Fixed(LBracket),
        Fixed(RBracket),
        Fixed(True),
        Fixed(False),
        Fixed(Nullptr),
        Pattern(HexLiteral, HEX_PATTERN),
        Pattern(OctalLiteral, OCTAL_PATTERN),
        Pattern(FloatLiteral, r"[0-9]*\.[0-9]+([eE][-+]?[0-9]+)?[fF]?"),
        Pattern(IntLiteral, INT_PATTERN),
        Pattern(Identifier, IDENTIFIER_PATTERN),
    ])
});

/// Anchors every pattern at the start of the remaining input. Keyword
/// spellings get a trailing word boundary so `integer` stays an identifier.
fn compile_rules(specs: &[RuleSpec]) -> Vec<Rule> {
    specs
        .iter()
        .filter_map(|spec| {
            let (kind, source) = match spec {
                Fixed(kind) => {
                    let text = kind.text().unwrap_or_default();
                    let escaped = regex::escape(text);
                    if kind.is_keyword() {
                        (*kind, format!(r"^{escaped}\b"))
                    } else {
                        (*kind, format!("^{escaped}"))
                    }
                }
                Pattern(kind, pattern) => (*kind, format!("^(?:{pattern})")),
            };
            match Regex::new(&source) {
                Ok(pattern) => Some(Rule { kind, pattern }),
                Err(err) => {
                    log::error!("dropping lexical rule for {kind:?}: {err}");
                    None
                }
            }
        })
        .collect()
}

fn rules_for(dialect: Dialect) -> &'static [Rule] {
    match dialect {
        Dialect::C => &C_RULES,
        Dialect::Cpp => &CPP_RULES,
    }
}

/// Output of a tokenization pass: the full token stream plus lexical errors.
#[derive(Debug, Clone, Default)]
pub struct Tokenized {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

/// Lexer for C and C++ source code
pub struct Lexer<'a> {
    source: &'a str,
    position: usize,
    dialect: Dialect,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source string.
    pub fn new(source: &'a str, dialect: Dialect) -> Self {
        Self {
            source,
            position: 0,
            dialect,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire input. Never fails; problems land in `errors`.
    pub fn tokenize(mut self) -> Tokenized {
        let rules = rules_for(self.dialect);

        loop {
            self.skip_whitespace_and_comments();

            let Some(ch) = self.peek() else {
                self.tokens
                    .push(Token::new(TokenKind::Eof, "", self.source.len()));
                break;
            };

            match ch {
                '"' => self.quoted_literal('"', TokenKind::StringLiteral),
                '\'' => self.quoted_literal('\'', TokenKind::CharLiteral),
                _ => {
                    if !self.match_rule(rules) {
                        self.unknown_character(ch);
                    }
                }
            }
        }

        Tokenized {
            tokens: self.tokens,
            errors: self.errors,
        }
    }

    /// Try the rule table in order; the first match wins.
    fn match_rule(&mut self, rules: &[Rule]) -> bool {
        let rest = &self.source[self.position..];
        for rule in rules {
            if let Some(m) = rule.pattern.find(rest) {
                if m.end() == 0 {
                    continue;
                }
                self.tokens
                    .push(Token::new(rule.kind, m.as_str(), self.position));
                self.position += m.end();
                return true;
            }
        }
        false
    }

    fn unknown_character(&mut self, ch: char) {
        log::warn!("skipping unknown character {ch:?} at offset {}", self.position);
        self.errors.push(LexError {
            message: format!("Unknown character: '{ch}'"),
            offset: self.position,
        });
        self.position += ch.len_utf8();
    }

    /// Scan a string or character literal, honouring backslash escapes.
    /// The token text keeps the quotes.
    fn quoted_literal(&mut self, quote: char, kind: TokenKind) {
        let start = self.position;
        self.advance(); // opening quote

        loop {
            match self.peek() {
                None | Some('\n') => {
                    let what = if kind == TokenKind::StringLiteral {
                        "string"
                    } else {
                        "character"
                    };
                    self.errors.push(LexError {
                        message: format!("Unterminated {what} literal"),
                        offset: start,
                    });
                    break;
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }

        let text = &self.source[start..self.position];
        self.tokens.push(Token::new(kind, text, start));
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') => match self.peek_ahead(1) {
                    Some('/') => self.skip_line_comment(),
                    Some('*') => self.skip_block_comment(),
                    _ => break,
                },
                _ => break,
            }
        }
    }

    /// Skip single-line comment (// ...)
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Skip multi-line comment (/* ... */)
    fn skip_block_comment(&mut self) {
        let start = self.position;
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return;
            }
            self.advance();
        }

        self.errors.push(LexError {
            message: "Unterminated block comment".to_string(),
            offset: start,
        });
    }

    fn peek(&self) -> Option<char> {
        self.source[self.position..].chars().next()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.source[self.position..].chars().nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }
}

/// Convenience wrapper around [`Lexer`].
pub fn tokenize(source: &str, dialect: Dialect) -> Tokenized {
    Lexer::new(source, dialect).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str, dialect: Dialect) -> Vec<TokenKind> {
        tokenize(source, dialect)
            .tokens
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_rule_tables_compile() {
        assert_eq!(C_RULES.len(), 88);
        assert_eq!(CPP_RULES.len(), 126);
    }

    #[test]
    fn test_simple_tokens() {
        let out = tokenize("int main() { return 0; }", Dialect::Cpp);
        assert!(out.errors.is_empty());

        let tokens = out.tokens;
        assert!(tokens[0].is(TokenKind::Int));
        assert!(tokens[1].is(TokenKind::Identifier) && tokens[1].text == "main");
        assert!(tokens[2].is(TokenKind::LParen));
        assert!(tokens[3].is(TokenKind::RParen));
        assert!(tokens[4].is(TokenKind::LBrace));
        assert!(tokens[5].is(TokenKind::Return));
        assert!(tokens[6].is(TokenKind::OctalLiteral) || tokens[6].is(TokenKind::IntLiteral));
        assert!(tokens[7].is(TokenKind::Semicolon));
        assert!(tokens[8].is(TokenKind::RBrace));
        assert!(tokens[9].is(TokenKind::Eof));
        assert_eq!(tokens[1].offset, 4);
    }

    #[test]
    fn test_multi_char_operators_win() {
        use TokenKind::*;
        assert_eq!(
            kinds("a == b = c ->* d -> e <=> f <<= g :: h", Dialect::Cpp),
            vec![
                Identifier, EqEq, Identifier, Assign, Identifier, ArrowStar, Identifier,
                Arrow, Identifier, Spaceship, Identifier, ShlAssign, Identifier,
                ColonColon, Identifier, Eof
            ]
        );
    }

    #[test]
    fn test_keyword_needs_word_boundary() {
        let out = tokenize("integer int doubled do", Dialect::Cpp);
        let kinds: Vec<_> = out.tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::Int,
                TokenKind::Identifier,
                TokenKind::Do,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_first_match_not_longest() {
        // The dot operator is listed before the float rule in the extended table.
        assert_eq!(
            kinds(".5", Dialect::Cpp),
            vec![TokenKind::Dot, TokenKind::IntLiteral, TokenKind::Eof]
        );
        assert_eq!(
            kinds("3.25f", Dialect::Cpp),
            vec![TokenKind::FloatLiteral, TokenKind::Eof]
        );
    }

    #[test]
    fn test_literal_classes() {
        use TokenKind::*;
        assert_eq!(
            kinds("0x1F 017 0 42 10u true nullptr", Dialect::Cpp),
            vec![
                HexLiteral, OctalLiteral, IntLiteral, IntLiteral, IntLiteral, True, Nullptr, Eof
            ]
        );
    }

    #[test]
    fn test_dialects_differ() {
        assert_eq!(
            kinds("class", Dialect::C),
            vec![TokenKind::Identifier, TokenKind::Eof]
        );
        assert_eq!(
            kinds("class", Dialect::Cpp),
            vec![TokenKind::Class, TokenKind::Eof]
        );
    }

    #[test]
    fn test_comments() {
        let out = tokenize("int x; // comment\nint y; /* block\ncomment */ int z;", Dialect::C);
        let idents: Vec<_> = out
            .tokens
            .iter()
            .filter(|t| t.is(TokenKind::Identifier))
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(idents, vec!["x", "y", "z"]);
        assert_eq!(out.tokens.len(), 10);
    }

    #[test]
    fn test_string_literal_with_escaped_quote() {
        let out = tokenize(r#"s = "say \"hi\"\n"; c = '\'';"#, Dialect::Cpp);
        assert!(out.errors.is_empty());
        assert!(out.tokens[2].is(TokenKind::StringLiteral));
        assert_eq!(out.tokens[2].text, r#""say \"hi\"\n""#);
        assert!(out.tokens[6].is(TokenKind::CharLiteral));
        assert_eq!(out.tokens[6].text, r"'\''");
    }

    #[test]
    fn test_unterminated_string_reported() {
        let out = tokenize("x = \"open\ny;", Dialect::Cpp);
        assert_eq!(out.errors.len(), 1);
        assert!(out.errors[0].message.contains("Unterminated string"));
        assert_eq!(out.errors[0].offset, 4);
        // Scanning continues on the next line.
        assert!(out.tokens.iter().any(|t| t.text == "y"));
    }

    #[test]
    fn test_unknown_character_skipped() {
        let out = tokenize("int @x$ = 1;", Dialect::Cpp);
        assert_eq!(out.errors.len(), 2);
        assert_eq!(out.errors[0].offset, 4);
        assert_eq!(out.errors[1].offset, 6);
        assert!(out.tokens.iter().any(|t| t.text == "x"));
        assert!(out.tokens.last().is_some_and(|t| t.is(TokenKind::Eof)));
    }

    #[test]
    fn test_non_ascii_is_skipped_by_char() {
        let out = tokenize("é x", Dialect::C);
        assert_eq!(out.errors.len(), 1);
        assert!(out.tokens[0].is(TokenKind::Identifier));
        assert_eq!(out.tokens[0].offset, 3);
    }

    #[test]
    fn test_preprocessor_tokens() {
        let out = tokenize("#include <stdio.h>\n#define N 10\n#ifdef X\n", Dialect::Cpp);
        assert!(out.tokens[0].is(TokenKind::Include));
        assert_eq!(out.tokens[0].text, "#include <stdio.h>");
        assert!(out.tokens[1].is(TokenKind::Define));
        assert!(out.tokens[4].is(TokenKind::Ifdef));

        let c = tokenize("#ifdef X\n", Dialect::C);
        assert!(c.tokens[0].is(TokenKind::Directive));
    }

    #[test]
    fn test_unterminated_block_comment() {
        let out = tokenize("int x; /* never closed", Dialect::C);
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.tokens.len(), 4);
    }

    #[test]
    fn test_token_display() {
        let out = tokenize("foo 42 +", Dialect::Cpp);
        assert_eq!(out.tokens[0].to_string(), "identifier 'foo'");
        assert_eq!(out.tokens[1].to_string(), "integer literal 42");
        assert_eq!(out.tokens[2].to_string(), "'+'");
        assert_eq!(out.tokens[3].to_string(), "end of file");
    }
}
