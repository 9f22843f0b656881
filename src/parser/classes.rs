//! Class, struct and union bodies
//!
//! A class body is parsed by a member loop that tracks the current access
//! (private for `class`, public for `struct` and `union`). Each member is
//! tried against a fixed priority ladder:
//!
//! 1. access specifier, stray `;`, preprocessor directive
//! 2. nested class/enum/typedef/using/template/static_assert
//! 3. `friend`
//! 4. constructor, destructor, operator, method, field (each speculative)
//!
//! When no rung matches, one token is skipped with a diagnostic so the loop
//! always reaches the closing brace.

use crate::parser::ast::*;
use crate::parser::declarations::tagged_type_name;
use crate::parser::errors::{ParseError, ParseResult};
use crate::parser::lexer::TokenKind;
use crate::parser::parse::Parser;
use crate::parser::types::{declarator_base, Specifiers};

fn access_of(kind: TokenKind) -> Option<Access> {
    match kind {
        TokenKind::Public => Some(Access::Public),
        TokenKind::Private => Some(Access::Private),
        TokenKind::Protected => Some(Access::Protected),
        _ => None,
    }
}

/// Name without template arguments: `Base<T>` -> `Base`.
fn plain_name(name: &str) -> &str {
    name.split('<').next().unwrap_or(name).trim()
}

/// Tokens allowed right after a member function's parameter list.
fn ends_function_head(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        Const | Volatile | Override | Final | Noexcept | Throw | Arrow | Assign | LBrace
            | Semicolon | Amp | AndAnd | Colon
    )
}

/// What a member's leading tokens turned out to be.
enum MemberHead {
    Constructor {
        specs: Specifiers,
        parameters: Vec<Parameter>,
    },
    Destructor {
        specs: Specifiers,
    },
    Operator {
        return_type: String,
        symbol: String,
        parameters: Vec<Parameter>,
    },
    Method {
        specs: Specifiers,
        return_type: String,
        name: String,
        parameters: Vec<Parameter>,
    },
    Field {
        specs: Specifiers,
        type_name: String,
        name: String,
    },
}

type HeadAttempt<'a> = fn(&mut Parser<'a>, &str) -> ParseResult<MemberHead>;

impl<'a> Parser<'a> {
    /// `class|struct|union` followed by a body, a base clause, `final`
    /// or `;`.
    pub(crate) fn at_class_definition(&self) -> bool {
        if !matches!(
            self.peek_kind(),
            TokenKind::Class | TokenKind::Struct | TokenKind::Union
        ) {
            return false;
        }
        match self.peek_ahead(1).kind {
            TokenKind::LBrace => true,
            TokenKind::Identifier => {
                let mut n = 2;
                if self.check_ahead(n, TokenKind::Lt) {
                    // specialization arguments
                    let mut depth = 0usize;
                    while n < self.config.max_lookahead {
                        match self.peek_ahead(n).kind {
                            TokenKind::Lt => depth += 1,
                            TokenKind::Gt => depth -= 1,
                            TokenKind::Shr => depth = depth.saturating_sub(2),
                            TokenKind::Semicolon | TokenKind::Eof => return false,
                            _ => {}
                        }
                        n += 1;
                        if depth == 0 {
                            break;
                        }
                    }
                }
                matches!(
                    self.peek_ahead(n).kind,
                    TokenKind::LBrace | TokenKind::Colon | TokenKind::Semicolon | TokenKind::Final
                )
            }
            _ => false,
        }
    }

    /// Parse a class head and body. The name is registered as a type
    /// before the body so members can refer to it.
    pub(crate) fn parse_class_specifier(&mut self) -> ParseResult<ClassDecl> {
        let keyword = self.advance();
        let is_class = keyword.is(TokenKind::Class);

        let mut name = String::new();
        if self.check(TokenKind::Identifier) {
            name = self.advance().text;
            self.ctx.register_type(name.clone());
            self.ctx.register_type(format!("{} {name}", keyword.text));
            if self.is_cpp() && self.check(TokenKind::Lt) {
                let args = self.scan_template_arguments()?;
                name = format!("{name}<{}>", args.join(", "));
            }
        }
        self.match_token(TokenKind::Final);

        let mut decl = ClassDecl {
            name,
            bases: Vec::new(),
            members: Vec::new(),
            is_struct: keyword.is(TokenKind::Struct),
            is_union: keyword.is(TokenKind::Union),
            is_forward: false,
        };

        if !self.check(TokenKind::LBrace) && !self.check(TokenKind::Colon) {
            decl.is_forward = true;
            return Ok(decl);
        }

        if self.match_token(TokenKind::Colon) {
            decl.bases = self.parse_base_list(is_class)?;
        }

        self.expect_lbrace("to start class body")?;
        let default_access = if is_class {
            Access::Private
        } else {
            Access::Public
        };
        let class_name = plain_name(&decl.name).to_string();
        decl.members =
            self.nested(|p| p.parse_class_members(&class_name, &decl.bases, default_access))?;
        self.close_brace("to close class body")?;

        Ok(decl)
    }

    /// `public Base, virtual protected Other<T>`
    pub(crate) fn parse_base_list(&mut self, is_class: bool) -> ParseResult<Vec<BaseSpecifier>> {
        let mut bases = Vec::new();
        loop {
            let mut access = if is_class {
                Access::Private
            } else {
                Access::Public
            };
            let mut is_virtual = false;
            loop {
                if let Some(a) = access_of(self.peek_kind()) {
                    access = a;
                } else if self.check(TokenKind::Virtual) {
                    is_virtual = true;
                } else {
                    break;
                }
                self.advance();
            }

            let name = self.leniently(|p| p.parse_type())?;
            self.match_token(TokenKind::Ellipsis);
            bases.push(BaseSpecifier {
                name,
                access,
                is_virtual,
            });

            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        Ok(bases)
    }

    fn parse_class_members(
        &mut self,
        class_name: &str,
        bases: &[BaseSpecifier],
        default_access: Access,
    ) -> ParseResult<Vec<Declaration>> {
        let mut access = default_access;
        let mut members = Vec::new();
        let mut iterations = 0usize;

        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            iterations += 1;
            if iterations > self.config.max_iterations {
                return Err(ParseError::IterationLimit {
                    limit: self.config.max_iterations,
                    context: "class body",
                    offset: self.peek().offset,
                });
            }

            let start = self.ctx.position();
            match self.parse_member(class_name, bases, &mut access) {
                Ok(Some(decls)) => members.extend(decls),
                Ok(None) => self.skip_token("in class body"),
                Err(err) => self.recover(start, &err),
            }
            self.ensure_progress(start);
        }

        Ok(members)
    }

    /// One member. `None` means no rung of the ladder matched.
    fn parse_member(
        &mut self,
        class_name: &str,
        bases: &[BaseSpecifier],
        access: &mut Access,
    ) -> ParseResult<Option<Vec<Declaration>>> {
        let kind = self.peek_kind();

        if let Some(new_access) = access_of(kind) {
            if self.check_ahead(1, TokenKind::Colon) {
                self.advance();
                self.advance();
                *access = new_access;
                return Ok(Some(Vec::new()));
            }
        }

        let decls = match kind {
            TokenKind::Semicolon => {
                self.advance();
                Vec::new()
            }
            _ if kind.is_directive() => vec![self.parse_preprocessor()?],
            TokenKind::Class | TokenKind::Struct | TokenKind::Union
                if self.at_class_definition() =>
            {
                let keyword = self.peek().text.clone();
                let decl = self.parse_class_specifier()?;
                let type_text = tagged_type_name(&keyword, &decl.name);
                self.finish_nested_type(Declaration::ClassDecl(decl), type_text, *access)?
            }
            TokenKind::Enum if self.at_enum_definition() => {
                let decl = self.parse_enum_specifier()?;
                let type_text = tagged_type_name("enum", &decl.name);
                self.finish_nested_type(Declaration::EnumDecl(decl), type_text, *access)?
            }
            TokenKind::Typedef => self.parse_typedef()?,
            TokenKind::Using => vec![self.parse_using()?],
            TokenKind::Template => vec![self.parse_template()?],
            TokenKind::StaticAssert => vec![self.parse_static_assert()?],
            TokenKind::Friend => vec![self.parse_friend()?],
            _ => match self.parse_member_head(class_name)? {
                Some(head) => self.finish_member(head, class_name, bases, *access)?,
                None => return Ok(None),
            },
        };
        Ok(Some(decls))
    }

    /// After a nested type definition: `;` or field declarators.
    fn finish_nested_type(
        &mut self,
        decl: Declaration,
        type_text: String,
        access: Access,
    ) -> ParseResult<Vec<Declaration>> {
        if self.match_token(TokenKind::Semicolon) {
            return Ok(vec![decl]);
        }
        let mut first_type = type_text;
        while matches!(self.peek_kind(), TokenKind::Star | TokenKind::Amp) {
            first_type.push_str(&self.advance().text);
        }
        let name = self.expect_identifier("after type definition")?;
        let mut decls = vec![decl];
        decls.extend(self.finish_fields(Specifiers::default(), first_type, name, access)?);
        Ok(decls)
    }

    /// `friend class X;` or `friend R f(...) { ... }`, kept as text.
    fn parse_friend(&mut self) -> ParseResult<Declaration> {
        self.advance();
        let start = self.ctx.position();
        let mut parens = 0usize;
        while !self.is_at_end() {
            match self.peek_kind() {
                TokenKind::LParen => parens += 1,
                TokenKind::RParen => parens = parens.saturating_sub(1),
                TokenKind::Semicolon | TokenKind::LBrace if parens == 0 => break,
                _ => {}
            }
            self.advance();
        }
        let declaration = self.text_between(start, self.ctx.position());
        if self.check(TokenKind::LBrace) {
            self.skip_balanced(TokenKind::LBrace, TokenKind::RBrace)?;
        } else {
            self.expect_semicolon("after friend declaration")?;
        }
        Ok(Declaration::FriendDecl(FriendDecl { declaration }))
    }

    /// Try each member form in priority order; every attempt is
    /// speculative and lenient about type names.
    fn parse_member_head(&mut self, class_name: &str) -> ParseResult<Option<MemberHead>> {
        let attempts: [HeadAttempt<'a>; 5] = [
            Self::constructor_head,
            Self::destructor_head,
            Self::operator_head,
            Self::method_head,
            Self::field_head,
        ];
        for attempt in attempts {
            if let Some(head) = self.speculate(|p| p.leniently(|p| attempt(p, class_name)))? {
                return Ok(Some(head));
            }
        }
        Ok(None)
    }

    fn constructor_head(&mut self, class_name: &str) -> ParseResult<MemberHead> {
        let specs = self.parse_specifiers();
        let name = self.expect_identifier("")?;
        if name != class_name || !self.check(TokenKind::LParen) {
            return Err(self.unexpected("not a constructor"));
        }
        let parameters = self.parse_parameter_list()?;
        if !ends_function_head(self.peek_kind()) {
            return Err(self.unexpected("not a constructor"));
        }
        Ok(MemberHead::Constructor { specs, parameters })
    }

    fn destructor_head(&mut self, class_name: &str) -> ParseResult<MemberHead> {
        let specs = self.parse_specifiers();
        self.expect_token(TokenKind::Tilde, "")?;
        let name = self.expect_identifier("after '~'")?;
        if name != class_name {
            return Err(self.unexpected("destructor name does not match class"));
        }
        if !self.check(TokenKind::LParen) {
            return Err(self.expected("'(' after destructor name"));
        }
        Ok(MemberHead::Destructor { specs })
    }

    fn operator_head(&mut self, _class_name: &str) -> ParseResult<MemberHead> {
        self.parse_specifiers();
        let return_type = if self.check(TokenKind::Operator) {
            String::new()
        } else {
            self.parse_type()?
        };
        self.expect_token(TokenKind::Operator, "")?;
        let symbol = self.parse_operator_symbol()?;
        let parameters = self.parse_parameter_list()?;
        let return_type = if return_type.is_empty() {
            symbol.clone()
        } else {
            return_type
        };
        Ok(MemberHead::Operator {
            return_type,
            symbol,
            parameters,
        })
    }

    fn method_head(&mut self, _class_name: &str) -> ParseResult<MemberHead> {
        let specs = self.parse_specifiers();
        let return_type = self.parse_type()?;
        let name = self.expect_identifier("")?;
        if !self.check(TokenKind::LParen) {
            return Err(self.unexpected("not a method"));
        }
        let parameters = self.parse_parameter_list()?;
        if !ends_function_head(self.peek_kind()) {
            return Err(self.unexpected("not a method"));
        }
        Ok(MemberHead::Method {
            specs,
            return_type,
            name,
            parameters,
        })
    }

    fn field_head(&mut self, _class_name: &str) -> ParseResult<MemberHead> {
        let specs = self.parse_specifiers();
        let mut type_name = self.parse_type()?;

        let name = if self.check(TokenKind::LParen) && self.check_ahead(1, TokenKind::Star) {
            // function pointer member: R (*name)(args)
            self.advance();
            self.advance();
            let name = self.expect_identifier("in function pointer member")?;
            self.expect_rparen("after function pointer name")?;
            let start = self.ctx.position();
            self.skip_balanced(TokenKind::LParen, TokenKind::RParen)?;
            type_name = format!("{type_name} (*){}", self.text_between(start, self.ctx.position()));
            name
        } else {
            self.expect_identifier("in member declaration")?
        };

        if !matches!(
            self.peek_kind(),
            TokenKind::Semicolon
                | TokenKind::Assign
                | TokenKind::LBrace
                | TokenKind::LBracket
                | TokenKind::Comma
                | TokenKind::Colon
        ) {
            return Err(self.unexpected("not a field"));
        }
        Ok(MemberHead::Field {
            specs,
            type_name,
            name,
        })
    }

    /// Commit to a recognized member form and parse the rest of it.
    fn finish_member(
        &mut self,
        head: MemberHead,
        class_name: &str,
        bases: &[BaseSpecifier],
        access: Access,
    ) -> ParseResult<Vec<Declaration>> {
        let decl = match head {
            MemberHead::Constructor { specs, parameters } => self.parse_constructor_rest(
                class_name.to_string(),
                access,
                specs.is_explicit,
                parameters,
                bases,
            )?,
            MemberHead::Destructor { specs } => {
                self.parse_destructor_rest(format!("~{class_name}"), access, specs.is_virtual)?
            }
            MemberHead::Operator {
                return_type,
                symbol,
                parameters,
            } => {
                let quals = self.parse_function_qualifiers()?;
                let body = self.parse_function_body()?;
                Declaration::OperatorDecl(OperatorDecl {
                    return_type,
                    operator_symbol: symbol,
                    access,
                    is_const: quals.is_const,
                    parameters,
                    body,
                })
            }
            MemberHead::Method {
                specs,
                return_type,
                name,
                parameters,
            } => {
                let quals = self.parse_function_qualifiers()?;
                let return_type = match quals.trailing_return {
                    Some(trailing) if return_type == "auto" => trailing,
                    _ => return_type,
                };
                let body = self.parse_function_body()?;
                Declaration::MethodDecl(MethodDecl {
                    return_type,
                    name,
                    access,
                    parameters,
                    body,
                    is_virtual: specs.is_virtual,
                    is_override: quals.is_override,
                    is_const: quals.is_const,
                    is_static: specs.is_static,
                    is_pure_virtual: quals.is_pure,
                })
            }
            MemberHead::Field {
                specs,
                type_name,
                name,
            } => return self.finish_fields(specs, type_name, name, access),
        };
        Ok(vec![decl])
    }

    /// Array suffix, bit width and initializer of a field, then any further
    /// declarators up to the `;`.
    fn finish_fields(
        &mut self,
        specs: Specifiers,
        first_type: String,
        first_name: String,
        access: Access,
    ) -> ParseResult<Vec<Declaration>> {
        let base = declarator_base(&first_type);
        let mut type_name = first_type;
        let mut name = first_name;
        let mut fields = Vec::new();

        loop {
            let dimensions = self.parse_array_suffixes()?;
            let bit_width = if self.match_token(TokenKind::Colon) {
                Some(self.parse_conditional()?)
            } else {
                None
            };
            let initializer = if self.match_token(TokenKind::Assign) {
                Some(self.parse_initializer_value()?)
            } else if self.check(TokenKind::LBrace) {
                Some(self.parse_braced_list()?)
            } else {
                None
            };

            let is_const = specs.is_constexpr || type_name.starts_with("const ");
            fields.push(Declaration::FieldDecl(FieldDecl {
                type_name,
                name,
                access,
                is_mutable: specs.is_mutable,
                is_static: specs.is_static,
                is_const,
                initializer,
                dimensions,
                bit_width,
            }));

            if !self.match_token(TokenKind::Comma) {
                break;
            }
            type_name = base.clone();
            while matches!(self.peek_kind(), TokenKind::Star | TokenKind::Amp) {
                type_name.push_str(&self.advance().text);
            }
            name = self.expect_identifier("in member declaration")?;
        }

        self.expect_semicolon("after member declaration")?;
        Ok(fields)
    }

    /// Qualifiers, member initializer list and body of a constructor whose
    /// parameters are already parsed.
    pub(crate) fn parse_constructor_rest(
        &mut self,
        name: String,
        access: Access,
        is_explicit: bool,
        parameters: Vec<Parameter>,
        bases: &[BaseSpecifier],
    ) -> ParseResult<Declaration> {
        self.parse_function_qualifiers()?;
        let initializers = if self.match_token(TokenKind::Colon) {
            self.parse_member_initializers(bases)?
        } else {
            Vec::new()
        };
        let body = self.parse_function_body()?;
        Ok(Declaration::ConstructorDecl(ConstructorDecl {
            name,
            access,
            is_explicit,
            parameters,
            initializers,
            body,
        }))
    }

    /// Parameters, qualifiers and body of a destructor.
    pub(crate) fn parse_destructor_rest(
        &mut self,
        name: String,
        access: Access,
        is_virtual: bool,
    ) -> ParseResult<Declaration> {
        self.parse_parameter_list()?;
        self.parse_function_qualifiers()?;
        let body = self.parse_function_body()?;
        Ok(Declaration::DestructorDecl(DestructorDecl {
            name,
            access,
            is_virtual,
            body,
        }))
    }

    /// `: Base(args), member(args), other{args}`
    fn parse_member_initializers(&mut self, bases: &[BaseSpecifier]) -> ParseResult<Vec<MemberInit>> {
        let mut initializers = Vec::new();
        loop {
            let mut member_name = self.parse_qualified_name()?;
            if self.check(TokenKind::Lt) {
                let args = self.scan_template_arguments()?;
                member_name = format!("{member_name}<{}>", args.join(", "));
            }

            let arguments = if self.match_token(TokenKind::LParen) {
                self.parse_arguments(TokenKind::RParen)?
            } else if self.check(TokenKind::LBrace) {
                self.parse_initializer_list()?
            } else {
                return Err(self.expected("'(' or '{' in member initializer"));
            };
            self.match_token(TokenKind::Ellipsis);

            let plain = plain_name(&member_name);
            let is_base_class = bases.iter().any(|b| plain_name(&b.name) == plain)
                || self.ctx.is_known_type(plain)
                || plain.contains("::");
            initializers.push(MemberInit {
                member_name,
                is_base_class,
                arguments,
            });

            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        Ok(initializers)
    }

    /// The symbol after `operator`: `+`, `()`, `[]`, `new[]`, `==`, or a
    /// conversion type such as `bool`.
    pub(crate) fn parse_operator_symbol(&mut self) -> ParseResult<String> {
        let kind = self.peek_kind();
        match kind {
            TokenKind::LParen if self.check_ahead(1, TokenKind::RParen) => {
                self.advance();
                self.advance();
                Ok("()".to_string())
            }
            TokenKind::LBracket if self.check_ahead(1, TokenKind::RBracket) => {
                self.advance();
                self.advance();
                Ok("[]".to_string())
            }
            TokenKind::New | TokenKind::Delete => {
                let mut symbol = self.advance().text;
                if self.check(TokenKind::LBracket) && self.check_ahead(1, TokenKind::RBracket) {
                    self.advance();
                    self.advance();
                    symbol.push_str("[]");
                }
                Ok(symbol)
            }
            TokenKind::StringLiteral if self.check_ahead(1, TokenKind::Identifier) => {
                // user-defined literal: operator"" _suffix
                self.advance();
                Ok(format!("\"\"{}", self.advance().text))
            }
            _ if kind.text().is_some()
                && !kind.is_keyword()
                && !matches!(
                    kind,
                    TokenKind::LParen
                        | TokenKind::RParen
                        | TokenKind::LBrace
                        | TokenKind::RBrace
                        | TokenKind::LBracket
                        | TokenKind::RBracket
                        | TokenKind::Semicolon
                        | TokenKind::ColonColon
                ) =>
            {
                Ok(self.advance().text)
            }
            _ => self.leniently(|p| p.parse_type()),
        }
    }
}
