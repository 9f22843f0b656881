//! Type names, parameter lists and the declaration-vs-expression test
//!
//! Type names are returned as normalized text:
//!
//! ```text
//! type      := cv* core cv* ( '*' | '&' | '&&' | cv )*
//! core      := builtin+ | ('struct'|'class'|'union'|'enum') name
//!            | 'typename' name | 'decltype' '(' ... ')' | known-name
//! name      := '::'? IDENT template-args? ( '::' IDENT template-args? )*
//! ```
//!
//! A plain identifier only counts as a type when it is in the known-type set
//! (or, in C++, when it is `::`-qualified). Lenient mode, used for class
//! member heads and parameter lists that must be declarations, accepts any
//! identifier.

use crate::parser::ast::{Expression, Parameter};
use crate::parser::errors::ParseResult;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::Parser;

/// Declaration specifiers that precede a type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Specifiers {
    pub is_static: bool,
    pub is_extern: bool,
    pub is_register: bool,
    pub is_inline: bool,
    pub is_constexpr: bool,
    pub is_virtual: bool,
    pub is_explicit: bool,
    pub is_mutable: bool,
    pub is_thread_local: bool,
}

impl Specifiers {
    /// Storage class recorded on variable declarations.
    pub fn storage(&self) -> Option<String> {
        let storage = if self.is_static {
            "static"
        } else if self.is_extern {
            "extern"
        } else if self.is_register {
            "register"
        } else if self.is_mutable {
            "mutable"
        } else if self.is_thread_local {
            "thread_local"
        } else {
            return None;
        };
        Some(storage.to_string())
    }
}

/// Qualifiers that may follow a function's parameter list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct FunctionQualifiers {
    pub is_const: bool,
    pub is_override: bool,
    pub is_final: bool,
    pub is_noexcept: bool,
    pub is_pure: bool,
    pub is_defaulted: bool,
    pub is_deleted: bool,
    pub trailing_return: Option<String>,
}

/// Outcome of the three-way lookahead after a type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeclShape {
    Variable,
    Function,
    NotDeclaration,
}

impl<'a> Parser<'a> {
    /// Consume any run of declaration specifiers.
    pub(crate) fn parse_specifiers(&mut self) -> Specifiers {
        let mut specs = Specifiers::default();
        loop {
            match self.peek_kind() {
                TokenKind::Static => specs.is_static = true,
                TokenKind::Extern if !self.check_ahead(1, TokenKind::StringLiteral) => {
                    specs.is_extern = true
                }
                TokenKind::Register => specs.is_register = true,
                TokenKind::Inline => specs.is_inline = true,
                TokenKind::Constexpr => specs.is_constexpr = true,
                TokenKind::Virtual => specs.is_virtual = true,
                TokenKind::Explicit => specs.is_explicit = true,
                TokenKind::Mutable => specs.is_mutable = true,
                TokenKind::Identifier if self.peek().text == "thread_local" => {
                    specs.is_thread_local = true
                }
                _ => break,
            }
            self.advance();
        }
        specs
    }

    /// Cheap test: could a type name start at the current token?
    pub(crate) fn starts_type(&self) -> bool {
        self.starts_type_at(0)
    }

    pub(crate) fn starts_type_at(&self, offset: usize) -> bool {
        let mut n = offset;
        while matches!(
            self.peek_ahead(n).kind,
            TokenKind::Const | TokenKind::Volatile
        ) {
            n += 1;
        }
        let token = self.peek_ahead(n);
        match token.kind {
            kind if kind.is_builtin_type() => true,
            TokenKind::Struct
            | TokenKind::Class
            | TokenKind::Union
            | TokenKind::Enum
            | TokenKind::Typename
            | TokenKind::Decltype => true,
            TokenKind::Identifier => {
                self.lenient_types
                    || self.ctx.is_known_type(&token.text)
                    || (self.is_cpp() && self.check_ahead(n + 1, TokenKind::ColonColon))
            }
            TokenKind::ColonColon => self.is_cpp(),
            _ => false,
        }
    }

    /// Parse a type name and return its normalized text.
    pub(crate) fn parse_type(&mut self) -> ParseResult<String> {
        let start = self.ctx.position();
        self.parse_type_core()?;
        self.parse_type_suffix();
        Ok(self.text_between(start, self.ctx.position()))
    }

    fn parse_type_core(&mut self) -> ParseResult<()> {
        while self.match_token(TokenKind::Const) || self.match_token(TokenKind::Volatile) {}

        match self.peek_kind() {
            kind if kind.is_builtin_type() => {
                while self.peek_kind().is_builtin_type() {
                    self.advance();
                }
            }
            TokenKind::Struct | TokenKind::Class | TokenKind::Union | TokenKind::Enum => {
                self.advance();
                self.parse_type_name_path()?;
            }
            TokenKind::Typename => {
                self.advance();
                self.parse_type_name_path()?;
            }
            TokenKind::Decltype => {
                self.advance();
                self.skip_balanced(TokenKind::LParen, TokenKind::RParen)?;
            }
            TokenKind::Identifier | TokenKind::ColonColon => {
                let (first, plain) = self.parse_type_name_path()?;
                let accepted = self.lenient_types
                    || self.ctx.is_known_type(&plain)
                    || self.ctx.is_known_type(&first)
                    || (self.is_cpp() && plain.contains("::"));
                if !accepted {
                    return Err(self.unexpected(format!("'{plain}' is not a known type")));
                }
            }
            _ => return Err(self.expected("type name")),
        }

        while self.match_token(TokenKind::Const) || self.match_token(TokenKind::Volatile) {}
        Ok(())
    }

    /// Pointer, reference and cv suffixes.
    pub(crate) fn parse_type_suffix(&mut self) {
        while matches!(
            self.peek_kind(),
            TokenKind::Star
                | TokenKind::Amp
                | TokenKind::AndAnd
                | TokenKind::Const
                | TokenKind::Volatile
        ) {
            self.advance();
        }
    }

    /// `a::b<T>::c`; returns the first segment and the path without
    /// template arguments.
    fn parse_type_name_path(&mut self) -> ParseResult<(String, String)> {
        let mut plain = String::new();
        if self.match_token(TokenKind::ColonColon) {
            plain.push_str("::");
        }
        let first = self.expect_identifier("in type name")?;
        plain.push_str(&first);

        loop {
            if self.is_cpp() && self.check(TokenKind::Lt) {
                self.speculate(|p| p.scan_template_arguments())?;
            }
            if self.check(TokenKind::ColonColon) && self.check_ahead(1, TokenKind::Identifier) {
                self.advance();
                plain.push_str("::");
                plain.push_str(&self.advance().text);
            } else {
                break;
            }
        }
        Ok((first, plain))
    }

    /// `a::b::c`, optionally with a leading `::`.
    pub(crate) fn parse_qualified_name(&mut self) -> ParseResult<String> {
        let mut name = String::new();
        if self.is_cpp() && self.match_token(TokenKind::ColonColon) {
            name.push_str("::");
        }
        name.push_str(&self.expect_identifier("")?);
        while self.check(TokenKind::ColonColon) && self.check_ahead(1, TokenKind::Identifier) {
            self.advance();
            name.push_str("::");
            name.push_str(&self.advance().text);
        }
        Ok(name)
    }

    /// Scan `< ... >` at token level and return the argument texts. A `>>`
    /// closes two levels.
    pub(crate) fn scan_template_arguments(&mut self) -> ParseResult<Vec<String>> {
        self.expect_token(TokenKind::Lt, "to start template arguments")?;
        let mut args = Vec::new();
        let mut depth: i32 = 1;
        let mut parens = 0usize;
        let mut arg_start = self.ctx.position();

        loop {
            match self.peek_kind() {
                TokenKind::Lt if parens == 0 => depth += 1,
                TokenKind::Gt if parens == 0 => {
                    depth -= 1;
                    if depth == 0 {
                        args.push(self.text_between(arg_start, self.ctx.position()));
                        self.advance();
                        break;
                    }
                }
                TokenKind::Shr if parens == 0 => {
                    depth -= 2;
                    if depth <= 0 {
                        let mut text = self.text_between(arg_start, self.ctx.position());
                        if depth == 0 {
                            text.push('>');
                        }
                        args.push(text);
                        self.advance();
                        break;
                    }
                }
                TokenKind::LParen | TokenKind::LBracket => parens += 1,
                TokenKind::RParen | TokenKind::RBracket => {
                    if parens == 0 {
                        return Err(self.expected("'>' to close template arguments"));
                    }
                    parens -= 1;
                }
                TokenKind::Comma if parens == 0 && depth == 1 => {
                    args.push(self.text_between(arg_start, self.ctx.position()));
                    self.advance();
                    arg_start = self.ctx.position();
                    continue;
                }
                TokenKind::AndAnd | TokenKind::OrOr if parens == 0 => {
                    return Err(self.expected("'>' to close template arguments"));
                }
                TokenKind::Semicolon
                | TokenKind::LBrace
                | TokenKind::RBrace
                | TokenKind::Eof => {
                    return Err(self.expected("'>' to close template arguments"));
                }
                _ => {}
            }
            self.advance();
        }

        if args.len() == 1 && args[0].is_empty() {
            args.clear();
        }
        Ok(args)
    }

    /// Offset (relative to the cursor) of the `)` matching the `(` at
    /// `open`, scanning at most `max_lookahead` tokens.
    pub(crate) fn matching_paren(&self, open: usize) -> Option<usize> {
        if !self.check_ahead(open, TokenKind::LParen) {
            return None;
        }
        let mut depth = 0usize;
        for n in open..open + self.config.max_lookahead {
            match self.peek_ahead(n).kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(n);
                    }
                }
                TokenKind::Eof => return None,
                _ => {}
            }
        }
        None
    }

    /// Three-way lookahead after a type: with the cursor on the declarator
    /// name, decide between a variable, a function, or neither.
    pub(crate) fn declaration_shape(&self) -> DeclShape {
        if !self.check(TokenKind::Identifier) {
            return DeclShape::NotDeclaration;
        }
        let mut n = 1;
        if self.is_cpp() {
            while self.check_ahead(n, TokenKind::ColonColon)
                && self.check_ahead(n + 1, TokenKind::Identifier)
            {
                n += 2;
            }
        }
        if !self.check_ahead(n, TokenKind::LParen) {
            return DeclShape::Variable;
        }
        let Some(close) = self.matching_paren(n) else {
            return DeclShape::NotDeclaration;
        };

        let mut after = close + 1;
        if self.is_cpp() {
            while matches!(
                self.peek_ahead(after).kind,
                TokenKind::Const
                    | TokenKind::Volatile
                    | TokenKind::Override
                    | TokenKind::Final
                    | TokenKind::Noexcept
            ) {
                after += 1;
            }
        }
        match self.peek_ahead(after).kind {
            TokenKind::LBrace | TokenKind::Semicolon => DeclShape::Function,
            TokenKind::Arrow if self.is_cpp() => DeclShape::Function,
            TokenKind::Assign
                if self.is_cpp()
                    && matches!(
                        self.peek_ahead(after + 1).kind,
                        TokenKind::Default | TokenKind::Delete
                    ) =>
            {
                DeclShape::Function
            }
            _ => DeclShape::NotDeclaration,
        }
    }

    /// Parse `( params )`. `(void)` and `()` are both empty.
    pub(crate) fn parse_parameter_list(&mut self) -> ParseResult<Vec<Parameter>> {
        self.expect_lparen("to start parameter list")?;
        let mut params = Vec::new();
        if self.match_token(TokenKind::RParen) {
            return Ok(params);
        }
        if self.check(TokenKind::Void) && self.check_ahead(1, TokenKind::RParen) {
            self.advance();
            self.advance();
            return Ok(params);
        }

        loop {
            params.push(self.parse_parameter()?);
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        self.expect_rparen("after parameters")?;
        Ok(params)
    }

    fn parse_parameter(&mut self) -> ParseResult<Parameter> {
        if self.match_token(TokenKind::Ellipsis) {
            return Ok(Parameter {
                param_type: "...".to_string(),
                name: String::new(),
                default_value: None,
            });
        }

        self.parse_specifiers();
        let mut param_type = self.parse_type()?;
        if self.match_token(TokenKind::Ellipsis) {
            param_type.push_str("...");
        }

        let mut name = String::new();
        if self.check(TokenKind::LParen) && self.check_ahead(1, TokenKind::Star) {
            // function pointer: R (*name)(args)
            self.advance();
            self.advance();
            if self.check(TokenKind::Identifier) {
                name = self.advance().text;
            }
            self.expect_rparen("after function pointer name")?;
            let args_start = self.ctx.position();
            self.skip_balanced(TokenKind::LParen, TokenKind::RParen)?;
            let args = self.text_between(args_start, self.ctx.position());
            param_type = format!("{param_type} (*){args}");
        } else if self.check(TokenKind::Identifier) {
            name = self.advance().text;
        }

        while self.check(TokenKind::LBracket) {
            let start = self.ctx.position();
            self.skip_balanced(TokenKind::LBracket, TokenKind::RBracket)?;
            param_type.push_str(&self.text_between(start, self.ctx.position()));
        }

        let default_value = if self.match_token(TokenKind::Assign) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        Ok(Parameter {
            param_type,
            name,
            default_value,
        })
    }

    /// Trailing function qualifiers: cv, ref, `override`, `final`,
    /// `noexcept`, `-> T`, `= 0`, `= default`, `= delete`.
    pub(crate) fn parse_function_qualifiers(&mut self) -> ParseResult<FunctionQualifiers> {
        let mut quals = FunctionQualifiers::default();
        loop {
            match self.peek_kind() {
                TokenKind::Const => quals.is_const = true,
                TokenKind::Volatile | TokenKind::Amp | TokenKind::AndAnd => {}
                TokenKind::Override => quals.is_override = true,
                TokenKind::Final => quals.is_final = true,
                TokenKind::Noexcept | TokenKind::Throw => {
                    quals.is_noexcept = true;
                    self.advance();
                    if self.check(TokenKind::LParen) {
                        self.skip_balanced(TokenKind::LParen, TokenKind::RParen)?;
                    }
                    continue;
                }
                TokenKind::Arrow if self.is_cpp() => {
                    self.advance();
                    quals.trailing_return = Some(self.parse_type()?);
                    continue;
                }
                TokenKind::Assign => {
                    let next = self.peek_ahead(1);
                    match next.kind {
                        TokenKind::IntLiteral if next.text == "0" => quals.is_pure = true,
                        TokenKind::Default => quals.is_defaulted = true,
                        TokenKind::Delete => quals.is_deleted = true,
                        _ => break,
                    }
                    self.advance();
                }
                _ => break,
            }
            self.advance();
        }
        Ok(quals)
    }

    /// Zero or more `[size]` suffixes; `[]` yields `None`.
    pub(crate) fn parse_array_suffixes(&mut self) -> ParseResult<Vec<Option<Expression>>> {
        let mut dims = Vec::new();
        while self.match_token(TokenKind::LBracket) {
            if self.match_token(TokenKind::RBracket) {
                dims.push(None);
                continue;
            }
            let size = self.parse_expression()?;
            self.expect_token(TokenKind::RBracket, "after array size")?;
            dims.push(Some(size));
        }
        Ok(dims)
    }
}

/// Element type for later declarators in `int *a, b;`.
pub(crate) fn declarator_base(first_type: &str) -> String {
    first_type
        .trim_end_matches(|c: char| c == '*' || c == '&' || c == ' ')
        .to_string()
}
