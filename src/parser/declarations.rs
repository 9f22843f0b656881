//! Top-level and named declaration parsing
//!
//! The translation unit (and every namespace body) is parsed by one
//! priority ladder:
//!
//! ```text
//! item ::= directive | namespace | template | class-definition
//!        | enum-definition | typedef | using | extern "C" | static_assert
//!        | out-of-class constructor/destructor
//!        | variable | function | statement
//! ```
//!
//! Every item is a recovery boundary: a failing item is recorded and the
//! cursor moves to the next `;` or balanced `}`.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::errors::{ParseError, ParseResult};
use crate::parser::expressions::literal_body;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::Parser;
use crate::parser::types::{declarator_base, DeclShape, Specifiers};
use log::debug;

/// One declaration as a statement, several as a block.
pub(crate) fn declarations_statement(mut decls: Vec<Declaration>) -> Statement {
    if decls.len() == 1 {
        if let Some(decl) = decls.pop() {
            return decl.into();
        }
    }
    Statement::block(decls.into_iter().map(Statement::from).collect())
}

/// Placeholder for the body of an unnamed struct, union or enum.
const ANONYMOUS_BODY: &str = "{...}";

/// `struct Tag`, or `struct {...}` when the definition has no tag.
pub(crate) fn tagged_type_name(keyword: &str, name: &str) -> String {
    if name.is_empty() {
        format!("{keyword} {ANONYMOUS_BODY}")
    } else {
        format!("{keyword} {name}")
    }
}

impl<'a> Parser<'a> {
    /// Parse items until end of input, or until `}` inside a namespace.
    pub(crate) fn parse_items(&mut self, in_namespace: bool) -> Vec<Statement> {
        let mut items = Vec::new();
        let mut iterations = 0usize;

        while !self.is_at_end() {
            if self.check(TokenKind::RBrace) {
                if in_namespace {
                    break;
                }
                self.skip_token("at top level");
                continue;
            }

            iterations += 1;
            if iterations > self.config.max_iterations {
                let err = ParseError::IterationLimit {
                    limit: self.config.max_iterations,
                    context: "translation unit",
                    offset: self.peek().offset,
                };
                self.report(&err);
                break;
            }

            let start = self.ctx.position();
            match self.parse_item() {
                Ok(Some(item)) => {
                    debug!("parsed item ending at token {}", self.ctx.position());
                    items.push(item);
                }
                Ok(None) => {}
                Err(err) => self.recover(start, &err),
            }
            self.ensure_progress(start);
        }

        items
    }

    fn parse_item(&mut self) -> ParseResult<Option<Statement>> {
        if let Some(stmt) = self.parse_named_declaration()? {
            return Ok(Some(stmt));
        }
        if self.is_cpp() {
            if let Some(decl) = self.try_out_of_class_special()? {
                return Ok(Some(decl.into()));
            }
        }
        if let Some(stmt) = self.try_declaration()? {
            return Ok(Some(stmt));
        }
        self.parse_statement()
    }

    /// Declarations introduced by their own keyword. Returns `None` without
    /// consuming anything when the current token starts none of them.
    pub(crate) fn parse_named_declaration(&mut self) -> ParseResult<Option<Statement>> {
        let kind = self.peek_kind();
        let stmt = match kind {
            _ if kind.is_directive() => self.parse_preprocessor()?.into(),
            TokenKind::Namespace => self.parse_namespace()?,
            TokenKind::Inline if self.check_ahead(1, TokenKind::Namespace) => {
                self.advance();
                self.parse_namespace()?
            }
            TokenKind::Template => self.parse_template()?.into(),
            TokenKind::Class | TokenKind::Struct | TokenKind::Union
                if self.at_class_definition() =>
            {
                self.parse_class_definition()?
            }
            TokenKind::Enum if self.at_enum_definition() => {
                let decl = self.parse_enum_specifier()?;
                let type_text = tagged_type_name("enum", &decl.name);
                self.finish_type_definition(Declaration::EnumDecl(decl), &type_text)?
            }
            TokenKind::Typedef => declarations_statement(self.parse_typedef()?),
            TokenKind::Using => self.parse_using()?.into(),
            TokenKind::Extern if self.check_ahead(1, TokenKind::StringLiteral) => {
                self.parse_linkage_specification()?
            }
            TokenKind::StaticAssert => self.parse_static_assert()?.into(),
            _ => return Ok(None),
        };
        Ok(Some(stmt))
    }

    /// `struct S { ... };` or `struct S { ... } a, *b;`
    fn parse_class_definition(&mut self) -> ParseResult<Statement> {
        let keyword = self.peek().text.clone();
        let decl = self.parse_class_specifier()?;
        let type_text = tagged_type_name(&keyword, &decl.name);
        self.finish_type_definition(Declaration::ClassDecl(decl), &type_text)
    }

    /// After a type definition: `;`, or declarators of that type.
    fn finish_type_definition(&mut self, decl: Declaration, type_text: &str) -> ParseResult<Statement> {
        if self.match_token(TokenKind::Semicolon) {
            return Ok(decl.into());
        }
        if self.is_at_end() {
            let err = self.expected("';' after type definition");
            self.report(&err);
            return Ok(decl.into());
        }

        let mut first_type = type_text.to_string();
        while matches!(
            self.peek_kind(),
            TokenKind::Star | TokenKind::Amp | TokenKind::Const
        ) {
            let token = self.advance();
            if token.is(TokenKind::Const) {
                first_type.push(' ');
            }
            first_type.push_str(&token.text);
        }
        let vars = self.parse_variable_declarators(Specifiers::default(), first_type)?;

        let mut statements = vec![Statement::from(decl)];
        match vars {
            Statement::Block(block) => statements.extend(block.statements),
            single => statements.push(single),
        }
        Ok(Statement::block(statements))
    }

    /// Speculative variable/function declaration after the three-way
    /// lookahead. Returns `None` (cursor untouched) when the tokens do not
    /// start a declaration.
    pub(crate) fn try_declaration(&mut self) -> ParseResult<Option<Statement>> {
        let head = self.speculate(|p| {
            let specs = p.parse_specifiers();
            if !p.starts_type() {
                return Err(p.expected("type name"));
            }
            let ty = p.parse_type()?;
            if p.is_cpp() && p.at_operator_name() {
                return Ok((specs, ty, None));
            }
            match p.declaration_shape() {
                DeclShape::NotDeclaration => Err(p.unexpected("not a declaration")),
                shape => Ok((specs, ty, Some(shape))),
            }
        })?;

        let Some((specs, ty, shape)) = head else {
            return Ok(None);
        };
        let stmt = match shape {
            None => self.parse_free_operator(ty)?.into(),
            Some(DeclShape::Function) => self.parse_function_or_direct_init(specs, ty)?,
            Some(_) => self.parse_variable_declarators(specs, ty)?,
        };
        Ok(Some(stmt))
    }

    /// `operator` or `Owner::operator` at the cursor.
    fn at_operator_name(&self) -> bool {
        let mut n = 0;
        while self.check_ahead(n, TokenKind::Identifier) && self.check_ahead(n + 1, TokenKind::ColonColon) {
            n += 2;
        }
        self.check_ahead(n, TokenKind::Operator)
    }

    /// `T operator+(...)` outside a class body.
    fn parse_free_operator(&mut self, return_type: String) -> ParseResult<Declaration> {
        while self.check(TokenKind::Identifier) {
            self.advance();
            self.advance();
        }
        self.expect_token(TokenKind::Operator, "")?;
        let operator_symbol = self.parse_operator_symbol()?;
        let parameters = self.leniently(|p| p.parse_parameter_list())?;
        let quals = self.parse_function_qualifiers()?;
        let body = self.parse_function_body()?;
        Ok(Declaration::OperatorDecl(OperatorDecl {
            return_type,
            operator_symbol,
            access: Access::Public,
            is_const: quals.is_const,
            parameters,
            body,
        }))
    }

    /// `T a = 1, *b, c[4];`
    pub(crate) fn parse_variable_declarators(
        &mut self,
        specs: Specifiers,
        first_type: String,
    ) -> ParseResult<Statement> {
        let base = declarator_base(&first_type);
        let storage = specs.storage();
        let mut var_type = first_type;
        let mut decls = Vec::new();

        loop {
            let name = self.parse_qualified_name()?;
            let dimensions = self.parse_array_suffixes()?;
            let initializer = if self.match_token(TokenKind::Assign) {
                Some(self.parse_initializer_value()?)
            } else if self.is_cpp() && self.check(TokenKind::LBrace) {
                Some(self.parse_braced_list()?)
            } else if self.match_token(TokenKind::LParen) {
                let arguments = self.parse_arguments(TokenKind::RParen)?;
                Some(Expression::call(
                    Expression::identifier(declarator_base(&var_type)),
                    arguments,
                ))
            } else {
                None
            };

            decls.push(VarDecl {
                var_type,
                name,
                initializer,
                storage: storage.clone(),
                dimensions,
            });

            if !self.match_token(TokenKind::Comma) {
                break;
            }
            var_type = base.clone();
            while matches!(
                self.peek_kind(),
                TokenKind::Star | TokenKind::Amp | TokenKind::AndAnd
            ) {
                var_type.push_str(&self.advance().text);
            }
        }

        self.expect_semicolon("after declaration")?;

        if decls.len() == 1 {
            if let Some(decl) = decls.pop() {
                return Ok(Statement::VarDecl(decl));
            }
        }
        Ok(Statement::block(decls.into_iter().map(Statement::VarDecl).collect()))
    }

    /// Right-hand side of `=` in a declaration.
    pub(crate) fn parse_initializer_value(&mut self) -> ParseResult<Expression> {
        if self.check(TokenKind::LBrace) {
            self.parse_braced_list()
        } else {
            self.parse_expression()
        }
    }

    /// `T name(...)`: a function when the parentheses hold parameters,
    /// a direct-initialized variable when they hold arguments.
    fn parse_function_or_direct_init(
        &mut self,
        specs: Specifiers,
        return_type: String,
    ) -> ParseResult<Statement> {
        let name = self.parse_qualified_name()?;

        let strict = self.speculate(|p| {
            let saved = p.lenient_types;
            p.lenient_types = false;
            let params = p.parse_parameter_list();
            p.lenient_types = saved;
            params
        })?;
        if let Some(parameters) = strict {
            return self.finish_function(specs, return_type, name, parameters);
        }

        let direct = self.speculate(|p| {
            p.expect_lparen("")?;
            let args = p.parse_arguments(TokenKind::RParen)?;
            p.expect_semicolon("after declaration")?;
            Ok(args)
        })?;
        if let Some(arguments) = direct {
            let callee = Expression::identifier(declarator_base(&return_type));
            return Ok(Statement::VarDecl(VarDecl {
                var_type: return_type,
                name,
                initializer: Some(Expression::call(callee, arguments)),
                storage: specs.storage(),
                dimensions: Vec::new(),
            }));
        }

        let parameters = self.leniently(|p| p.parse_parameter_list())?;
        self.finish_function(specs, return_type, name, parameters)
    }

    fn finish_function(
        &mut self,
        specs: Specifiers,
        return_type: String,
        name: String,
        parameters: Vec<Parameter>,
    ) -> ParseResult<Statement> {
        let quals = self.parse_function_qualifiers()?;
        let return_type = match quals.trailing_return {
            Some(trailing) if return_type == "auto" => trailing,
            _ => return_type,
        };
        let body = self.parse_function_body()?;

        Ok(Declaration::FunctionDecl(FunctionDecl {
            return_type,
            name,
            parameters,
            body,
            is_static: specs.is_static,
            is_inline: specs.is_inline,
            is_virtual: specs.is_virtual,
            is_override: quals.is_override,
            is_const: quals.is_const,
        })
        .into())
    }

    /// A `{ ... }` body, or `;` for a bare declaration.
    pub(crate) fn parse_function_body(&mut self) -> ParseResult<Option<Vec<Statement>>> {
        if self.check(TokenKind::LBrace) {
            return self.parse_block_body().map(Some);
        }
        self.expect_semicolon("after function declaration")?;
        Ok(None)
    }

    /// `Owner::Owner(...)` and `Owner::~Owner()` outside the class body.
    fn try_out_of_class_special(&mut self) -> ParseResult<Option<Declaration>> {
        if !(self.check(TokenKind::Identifier) && self.check_ahead(1, TokenKind::ColonColon))
            && !matches!(self.peek_kind(), TokenKind::Inline | TokenKind::Explicit)
        {
            return Ok(None);
        }

        let head = self.speculate(|p| {
            p.parse_specifiers();
            let mut segments = vec![p.expect_identifier("")?];
            let mut is_destructor = false;
            while p.match_token(TokenKind::ColonColon) {
                if p.match_token(TokenKind::Tilde) {
                    is_destructor = true;
                    segments.push(format!("~{}", p.expect_identifier("after '~'")?));
                    break;
                }
                segments.push(p.expect_identifier("")?);
            }

            let special = match segments.as_slice() {
                [.., owner, last] if !is_destructor && owner == last => true,
                [.., owner, last] if is_destructor && last.strip_prefix('~') == Some(owner.as_str()) => true,
                _ => false,
            };
            if !special || !p.check(TokenKind::LParen) {
                return Err(p.unexpected("not a constructor or destructor"));
            }
            Ok((segments.join("::"), is_destructor))
        })?;

        let Some((name, is_destructor)) = head else {
            return Ok(None);
        };
        let decl = if is_destructor {
            self.parse_destructor_rest(name, Access::Public, false)?
        } else {
            let parameters = self.leniently(|p| p.parse_parameter_list())?;
            self.parse_constructor_rest(name, Access::Public, false, parameters, &[])?
        };
        Ok(Some(decl))
    }

    /// `#include`, `#define` and the other directives. The value is the
    /// rest of the directive's line.
    pub(crate) fn parse_preprocessor(&mut self) -> ParseResult<Declaration> {
        let token = self.advance();

        if token.is(TokenKind::Include) {
            let path = token.text.trim_start_matches("#include").trim();
            let value = path
                .strip_prefix('<')
                .and_then(|p| p.strip_suffix('>'))
                .map(str::to_string)
                .unwrap_or_else(|| literal_body(path).to_string());
            return Ok(Declaration::PreprocessorDirective(PreprocessorDirective {
                directive: "include".to_string(),
                value,
            }));
        }

        let line_end = self.directive_line_end(token.offset);
        let start = self.ctx.position();
        while !self.is_at_end() && self.peek().offset < line_end {
            self.advance();
        }
        let value = self.source_between(start, self.ctx.position()).to_string();

        Ok(Declaration::PreprocessorDirective(PreprocessorDirective {
            directive: token.text.trim_start_matches('#').to_string(),
            value,
        }))
    }

    /// Byte offset of the newline ending the directive at `offset`,
    /// following `\` line continuations.
    fn directive_line_end(&self, offset: usize) -> usize {
        let mut from = offset;
        while let Some(idx) = self.source.get(from..).and_then(|rest| rest.find('\n')) {
            let newline = from + idx;
            let line = self.source[..newline].trim_end_matches('\r');
            if !line.ends_with('\\') {
                return newline;
            }
            from = newline + 1;
        }
        self.source.len()
    }

    /// `namespace A::B { ... }`, `namespace { ... }`, `namespace X = Y;`
    fn parse_namespace(&mut self) -> ParseResult<Statement> {
        self.advance();
        let name = if self.check(TokenKind::Identifier) {
            self.parse_qualified_name()?
        } else {
            String::new()
        };

        if self.match_token(TokenKind::Assign) {
            let type_name = self.parse_qualified_name()?;
            self.expect_semicolon("after namespace alias")?;
            return Ok(Declaration::UsingAliasDecl(UsingAliasDecl {
                type_name,
                alias: name,
            })
            .into());
        }

        self.expect_lbrace("to start namespace body")?;
        let body = self.nested(|p| Ok(p.parse_items(true)))?;
        self.close_brace("to close namespace")?;

        Ok(Declaration::NamespaceDecl(NamespaceDecl { name, body }).into())
    }

    /// `extern "C" { ... }` or `extern "C" decl`
    fn parse_linkage_specification(&mut self) -> ParseResult<Statement> {
        self.advance();
        self.advance();
        if self.match_token(TokenKind::LBrace) {
            let body = self.nested(|p| Ok(p.parse_items(true)))?;
            self.close_brace("to close linkage block")?;
            return Ok(Statement::block(body));
        }
        Ok(self
            .nested(|p| p.parse_item())?
            .unwrap_or_else(|| Statement::block(Vec::new())))
    }

    /// `template <params> head { body }`. Parameters are parsed softly, the
    /// head is kept as text with a shallow declaration, and the body is
    /// skipped by brace balance.
    pub(crate) fn parse_template(&mut self) -> ParseResult<Declaration> {
        self.advance();

        let template_parameters = if self.check(TokenKind::Lt) {
            match self.speculate(|p| p.parse_template_parameters())? {
                Some(params) => params,
                None => self
                    .scan_template_arguments()?
                    .into_iter()
                    .map(|text| TemplateParameter {
                        kind: "unparsed".to_string(),
                        name: text,
                        default_type: None,
                        default_value: None,
                        is_pack: false,
                    })
                    .collect(),
            }
        } else {
            Vec::new()
        };

        let head_start = self.ctx.position();
        let mut parens = 0usize;
        let mut bounded = false;
        for _ in 0..self.config.max_iterations {
            match self.peek_kind() {
                TokenKind::LParen => parens += 1,
                TokenKind::RParen => parens = parens.saturating_sub(1),
                TokenKind::LBrace | TokenKind::Semicolon if parens == 0 => {
                    bounded = true;
                    break;
                }
                TokenKind::Eof => {
                    bounded = true;
                    break;
                }
                _ => {}
            }
            self.advance();
        }
        if !bounded {
            return Err(ParseError::IterationLimit {
                limit: self.config.max_iterations,
                context: "template head",
                offset: self.peek().offset,
            });
        }
        let head = self.text_between(head_start, self.ctx.position());
        let head_end = self.ctx.mark();

        self.ctx.reset_to(head_start);
        let declaration = self
            .speculate(|p| p.leniently(|p| p.parse_template_head_declaration()))?
            .map(Box::new);
        self.ctx.reset(head_end);

        if self.check(TokenKind::LBrace) {
            self.skip_balanced(TokenKind::LBrace, TokenKind::RBrace)?;
            self.match_token(TokenKind::Semicolon);
        } else {
            self.expect_semicolon("after template declaration")?;
        }

        Ok(Declaration::TemplateDecl(TemplateDecl {
            template_parameters,
            head,
            declaration,
        }))
    }

    fn parse_template_parameters(&mut self) -> ParseResult<Vec<TemplateParameter>> {
        self.expect_token(TokenKind::Lt, "after 'template'")?;
        let mut params = Vec::new();
        if self.match_token(TokenKind::Gt) {
            return Ok(params);
        }

        loop {
            params.push(self.parse_template_parameter()?);
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        self.expect_token(TokenKind::Gt, "to close template parameters")?;
        Ok(params)
    }

    fn parse_template_parameter(&mut self) -> ParseResult<TemplateParameter> {
        let kind = match self.peek_kind() {
            TokenKind::Typename | TokenKind::Class => self.advance().text,
            TokenKind::Template => {
                self.advance();
                self.scan_template_arguments()?;
                if !matches!(self.peek_kind(), TokenKind::Class | TokenKind::Typename) {
                    return Err(self.expected("'class' in template template parameter"));
                }
                self.advance();
                "template".to_string()
            }
            _ => self.leniently(|p| p.parse_type())?,
        };
        let is_type = matches!(kind.as_str(), "typename" | "class" | "template");

        let is_pack = self.match_token(TokenKind::Ellipsis);
        let name = if self.check(TokenKind::Identifier) {
            self.advance().text
        } else {
            String::new()
        };

        let mut param = TemplateParameter {
            kind,
            name,
            default_type: None,
            default_value: None,
            is_pack,
        };
        if self.match_token(TokenKind::Assign) {
            let text = self.scan_default_argument()?;
            if is_type {
                param.default_type = Some(text);
            } else {
                param.default_value = Some(text);
            }
        }
        Ok(param)
    }

    /// Text of a template parameter default, up to `,` or `>` at depth zero.
    fn scan_default_argument(&mut self) -> ParseResult<String> {
        let start = self.ctx.position();
        let mut angles = 0usize;
        let mut parens = 0usize;
        loop {
            match self.peek_kind() {
                TokenKind::Comma | TokenKind::Gt if angles == 0 && parens == 0 => break,
                TokenKind::Lt => angles += 1,
                TokenKind::Gt => angles = angles.saturating_sub(1),
                TokenKind::Shr if angles >= 2 => angles -= 2,
                TokenKind::LParen => parens += 1,
                TokenKind::RParen if parens > 0 => parens -= 1,
                TokenKind::Shr
                | TokenKind::RParen
                | TokenKind::Semicolon
                | TokenKind::LBrace
                | TokenKind::RBrace
                | TokenKind::Eof => return Err(self.expected("template parameter default")),
                _ => {}
            }
            self.advance();
        }
        if start == self.ctx.position() {
            return Err(self.expected("template parameter default"));
        }
        Ok(self.text_between(start, self.ctx.position()))
    }

    /// Shallow view of the declaration a template introduces.
    fn parse_template_head_declaration(&mut self) -> ParseResult<Declaration> {
        match self.peek_kind() {
            TokenKind::Class | TokenKind::Struct | TokenKind::Union => {
                let keyword = self.advance();
                let name = self.expect_identifier("in class template")?;
                self.ctx.register_type(name.clone());
                if self.check(TokenKind::Lt) {
                    self.scan_template_arguments()?;
                }
                let is_forward = self.check(TokenKind::Semicolon);
                let bases = if self.match_token(TokenKind::Colon) {
                    self.parse_base_list(keyword.is(TokenKind::Class))?
                } else {
                    Vec::new()
                };
                Ok(Declaration::ClassDecl(ClassDecl {
                    name,
                    bases,
                    members: Vec::new(),
                    is_struct: keyword.is(TokenKind::Struct),
                    is_union: keyword.is(TokenKind::Union),
                    is_forward,
                }))
            }
            TokenKind::Using => {
                self.advance();
                let alias = self.expect_identifier("after 'using'")?;
                self.expect_token(TokenKind::Assign, "in alias template")?;
                let start = self.ctx.position();
                while !self.check(TokenKind::Semicolon) && !self.is_at_end() {
                    self.advance();
                }
                self.ctx.register_type(alias.clone());
                Ok(Declaration::UsingAliasDecl(UsingAliasDecl {
                    type_name: self.text_between(start, self.ctx.position()),
                    alias,
                }))
            }
            _ => {
                let specs = self.parse_specifiers();
                let return_type = self.parse_type()?;
                let name = self.parse_qualified_name()?;
                let parameters = self.parse_parameter_list()?;
                let quals = self.parse_function_qualifiers()?;
                let return_type = match quals.trailing_return {
                    Some(trailing) if return_type == "auto" => trailing,
                    _ => return_type,
                };
                Ok(Declaration::FunctionDecl(FunctionDecl {
                    return_type,
                    name,
                    parameters,
                    body: None,
                    is_static: specs.is_static,
                    is_inline: specs.is_inline,
                    is_virtual: specs.is_virtual,
                    is_override: quals.is_override,
                    is_const: quals.is_const,
                }))
            }
        }
    }

    /// `enum [class] Name [: T] { A, B = 2, }`
    pub(crate) fn at_enum_definition(&self) -> bool {
        if !self.check(TokenKind::Enum) {
            return false;
        }
        let mut n = 1;
        if matches!(self.peek_ahead(n).kind, TokenKind::Class | TokenKind::Struct) {
            n += 1;
        }
        if self.check_ahead(n, TokenKind::Identifier) {
            n += 1;
        }
        matches!(self.peek_ahead(n).kind, TokenKind::LBrace | TokenKind::Colon)
    }

    pub(crate) fn parse_enum_specifier(&mut self) -> ParseResult<EnumDecl> {
        self.expect_token(TokenKind::Enum, "")?;
        let is_scoped = self.match_token(TokenKind::Class) || self.match_token(TokenKind::Struct);
        let name = if self.check(TokenKind::Identifier) {
            self.advance().text
        } else {
            String::new()
        };
        if !name.is_empty() {
            self.ctx.register_type(name.clone());
            self.ctx.register_type(format!("enum {name}"));
        }

        let underlying_type = if self.match_token(TokenKind::Colon) {
            Some(self.leniently(|p| p.parse_type())?)
        } else {
            None
        };

        let mut enumerators = Vec::new();
        if self.match_token(TokenKind::LBrace) {
            while !self.check(TokenKind::RBrace) && !self.is_at_end() {
                let name = self.expect_identifier("in enumerator list")?;
                let value = if self.match_token(TokenKind::Assign) {
                    Some(self.parse_expression()?)
                } else {
                    None
                };
                enumerators.push(Enumerator { name, value });
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
            self.close_brace("to close enumerator list")?;
        }

        Ok(EnumDecl {
            name,
            is_scoped,
            underlying_type,
            enumerators,
        })
    }

    /// `typedef T A, *B;`, `typedef struct [Tag] {...} A;`,
    /// `typedef R (*Fn)(params);`
    pub(crate) fn parse_typedef(&mut self) -> ParseResult<Vec<Declaration>> {
        self.expect_token(TokenKind::Typedef, "")?;

        let (base_type, mut definition) = match self.peek_kind() {
            TokenKind::Class | TokenKind::Struct | TokenKind::Union
                if self.at_class_definition() =>
            {
                let keyword = self.peek().text.clone();
                let decl = self.parse_class_specifier()?;
                let text = tagged_type_name(&keyword, &decl.name);
                (text, Some(Box::new(Declaration::ClassDecl(decl))))
            }
            TokenKind::Enum if self.at_enum_definition() => {
                let decl = self.parse_enum_specifier()?;
                let text = tagged_type_name("enum", &decl.name);
                (text, Some(Box::new(Declaration::EnumDecl(decl))))
            }
            _ => {
                let ty = self.leniently(|p| {
                    p.parse_specifiers();
                    p.parse_type()
                })?;
                (ty, None)
            }
        };

        // An anonymous definition takes its name from the first plain alias.
        let mut anonymous = base_type.ends_with(ANONYMOUS_BODY);
        let mut base = declarator_base(&base_type);
        let mut type_name = base_type;
        let mut decls = Vec::new();
        loop {
            let mut pointers = String::new();
            while matches!(self.peek_kind(), TokenKind::Star | TokenKind::Amp) {
                pointers.push_str(&self.advance().text);
            }

            let alias;
            let mut suffix = String::new();
            if self.check(TokenKind::LParen) && self.check_ahead(1, TokenKind::Star) {
                self.advance();
                self.advance();
                alias = self.expect_identifier("in function pointer typedef")?;
                self.expect_rparen("after function pointer name")?;
                let start = self.ctx.position();
                self.skip_balanced(TokenKind::LParen, TokenKind::RParen)?;
                suffix = format!(" (*){}", self.text_between(start, self.ctx.position()));
            } else {
                alias = self.expect_identifier("in typedef")?;
                while self.check(TokenKind::LBracket) {
                    let start = self.ctx.position();
                    self.skip_balanced(TokenKind::LBracket, TokenKind::RBracket)?;
                    suffix.push_str(&self.text_between(start, self.ctx.position()));
                }
            }

            if anonymous && pointers.is_empty() && suffix.is_empty() {
                let keyword = type_name.trim_end_matches(ANONYMOUS_BODY).trim_end();
                type_name = format!("{keyword} {alias}");
                base = type_name.clone();
            }
            anonymous = false;
            type_name.push_str(&pointers);
            type_name.push_str(&suffix);

            self.ctx.register_type(alias.clone());
            decls.push(Declaration::TypedefDecl(TypedefDecl {
                type_name,
                alias,
                definition: definition.take(),
            }));

            if !self.match_token(TokenKind::Comma) {
                break;
            }
            type_name = base.clone();
        }

        self.expect_semicolon("after typedef")?;
        Ok(decls)
    }

    /// `using namespace N;`, `using A = T;`, `using N::name;`
    pub(crate) fn parse_using(&mut self) -> ParseResult<Declaration> {
        self.expect_token(TokenKind::Using, "")?;

        if self.match_token(TokenKind::Namespace) {
            let target = self.parse_qualified_name()?;
            self.expect_semicolon("after using directive")?;
            return Ok(Declaration::UsingNamespaceDecl(UsingNamespaceDecl { target }));
        }

        if self.check(TokenKind::Identifier) && self.check_ahead(1, TokenKind::Assign) {
            let alias = self.advance().text;
            self.advance();
            let type_name = self.leniently(|p| p.parse_type())?;
            self.expect_semicolon("after alias declaration")?;
            self.ctx.register_type(alias.clone());
            return Ok(Declaration::UsingAliasDecl(UsingAliasDecl { type_name, alias }));
        }

        self.match_token(TokenKind::Typename);
        let name = self.parse_qualified_name()?;
        self.expect_semicolon("after using declaration")?;
        Ok(Declaration::UsingDecl(UsingDecl { name }))
    }

    /// `static_assert(cond, "message");`
    pub(crate) fn parse_static_assert(&mut self) -> ParseResult<Declaration> {
        self.expect_token(TokenKind::StaticAssert, "")?;
        self.expect_lparen("after 'static_assert'")?;
        let condition = self.parse_expression()?;
        let message = if self.match_token(TokenKind::Comma) {
            let token = self.expect_token(TokenKind::StringLiteral, "as static_assert message")?;
            Some(literal_body(&token.text).to_string())
        } else {
            None
        };
        self.expect_rparen("after static_assert")?;
        self.expect_semicolon("after static_assert")?;
        Ok(Declaration::StaticAssertDecl(StaticAssertDecl { condition, message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;
    use crate::parser::lexer::Dialect;

    fn parse(source: &str) -> (Program, usize) {
        let mut parser = Parser::new(source);
        let program = parser.parse_program();
        let errors = parser.errors().len();
        (program, errors)
    }

    fn parse_c(source: &str) -> (Program, usize) {
        let mut parser = Parser::with_config(source, ParserConfig::new(Dialect::C));
        let program = parser.parse_program();
        let errors = parser.errors().len();
        (program, errors)
    }

    #[test]
    fn test_global_variables() {
        let (program, errors) = parse("static int count = 0, *ptr, table[4][2];");
        assert_eq!(errors, 0);
        match &program.body[0] {
            Statement::Block(block) => {
                assert_eq!(block.statements.len(), 3);
                match &block.statements[1] {
                    Statement::VarDecl(decl) => {
                        assert_eq!(decl.var_type, "int*");
                        assert_eq!(decl.storage.as_deref(), Some("static"));
                    }
                    other => panic!("Expected variable, got {other:?}"),
                }
                match &block.statements[2] {
                    Statement::VarDecl(decl) => assert_eq!(decl.dimensions.len(), 2),
                    other => panic!("Expected variable, got {other:?}"),
                }
            }
            other => panic!("Expected block, got {other:?}"),
        }
    }

    #[test]
    fn test_struct_registers_type() {
        let (program, errors) = parse_c("struct Point { int x; int y; };\nPoint p;\nstruct Point q;");
        assert_eq!(errors, 0);
        assert_eq!(program.body.len(), 3);
        match &program.body[1] {
            Statement::VarDecl(decl) => assert_eq!(decl.var_type, "Point"),
            other => panic!("Expected variable, got {other:?}"),
        }
        match &program.body[2] {
            Statement::VarDecl(decl) => assert_eq!(decl.var_type, "struct Point"),
            other => panic!("Expected variable, got {other:?}"),
        }
    }

    #[test]
    fn test_struct_with_declarators() {
        let (program, errors) = parse_c("struct Node { int v; } head, *tail;");
        assert_eq!(errors, 0);
        match &program.body[0] {
            Statement::Block(block) => {
                assert!(matches!(block.statements[0], Statement::Decl(Declaration::ClassDecl(_))));
                match &block.statements[2] {
                    Statement::VarDecl(decl) => assert_eq!(decl.var_type, "struct Node*"),
                    other => panic!("Expected variable, got {other:?}"),
                }
            }
            other => panic!("Expected block, got {other:?}"),
        }
    }

    #[test]
    fn test_function_prototype_and_definition() {
        let (program, errors) = parse("int add(int a, int b);\nint add(int a, int b) { return a + b; }");
        assert_eq!(errors, 0);
        match (&program.body[0], &program.body[1]) {
            (
                Statement::Decl(Declaration::FunctionDecl(proto)),
                Statement::Decl(Declaration::FunctionDecl(def)),
            ) => {
                assert!(proto.body.is_none());
                assert_eq!(def.parameters.len(), 2);
                assert_eq!(def.body.as_ref().map(Vec::len), Some(1));
            }
            other => panic!("Expected two functions, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_parameter_types_parse_leniently() {
        let (program, errors) = parse("void draw(Canvas c, Color col) { }");
        assert_eq!(errors, 0);
        match &program.body[0] {
            Statement::Decl(Declaration::FunctionDecl(func)) => {
                assert_eq!(func.parameters[0].param_type, "Canvas");
                assert_eq!(func.parameters[1].name, "col");
            }
            other => panic!("Expected function, got {other:?}"),
        }
    }

    #[test]
    fn test_direct_initialization() {
        let (program, errors) = parse("struct Point { int x; int y; };\nPoint p(1, 2);");
        assert_eq!(errors, 0);
        match &program.body[1] {
            Statement::VarDecl(decl) => match &decl.initializer {
                Some(Expression::Call(call)) => {
                    assert!(matches!(&*call.callee, Expression::Identifier(id) if id.name == "Point"));
                    assert_eq!(call.arguments.len(), 2);
                }
                other => panic!("Expected call initializer, got {other:?}"),
            },
            other => panic!("Expected variable, got {other:?}"),
        }
    }

    #[test]
    fn test_trailing_return_type() {
        let (program, _) = parse("auto twice(int x) -> long { return 2 * x; }");
        match &program.body[0] {
            Statement::Decl(Declaration::FunctionDecl(func)) => assert_eq!(func.return_type, "long"),
            other => panic!("Expected function, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_class_members() {
        let source = "class Point { public: Point(); ~Point(); int len() const; };\n\
                      Point::Point() : x(0) {}\n\
                      Point::~Point() {}\n\
                      int Point::len() const { return x; }";
        let (program, errors) = parse(source);
        assert_eq!(errors, 0);
        assert!(matches!(
            &program.body[1],
            Statement::Decl(Declaration::ConstructorDecl(c)) if c.name == "Point::Point" && c.initializers.len() == 1
        ));
        assert!(matches!(
            &program.body[2],
            Statement::Decl(Declaration::DestructorDecl(d)) if d.name == "Point::~Point"
        ));
        assert!(matches!(
            &program.body[3],
            Statement::Decl(Declaration::FunctionDecl(f)) if f.name == "Point::len" && f.is_const
        ));
    }

    #[test]
    fn test_preprocessor_directives() {
        let (program, errors) = parse("#include <stdio.h>\n#include \"util.h\"\n#define MAX(a, b) ((a) > (b))\nint x;");
        assert_eq!(errors, 0);
        let directives: Vec<(&str, &str)> = program
            .body
            .iter()
            .filter_map(|s| match s {
                Statement::Decl(Declaration::PreprocessorDirective(d)) => {
                    Some((d.directive.as_str(), d.value.as_str()))
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            directives,
            vec![
                ("include", "stdio.h"),
                ("include", "util.h"),
                ("define", "MAX(a, b) ((a) > (b))"),
            ]
        );
        assert!(matches!(program.body[3], Statement::VarDecl(_)));
    }

    #[test]
    fn test_namespaces() {
        let (program, errors) = parse("namespace a::b { int x; namespace { int y; } }\nnamespace fs = std::filesystem;");
        assert_eq!(errors, 0);
        match &program.body[0] {
            Statement::Decl(Declaration::NamespaceDecl(ns)) => {
                assert_eq!(ns.name, "a::b");
                assert_eq!(ns.body.len(), 2);
            }
            other => panic!("Expected namespace, got {other:?}"),
        }
        assert!(matches!(
            &program.body[1],
            Statement::Decl(Declaration::UsingAliasDecl(u)) if u.alias == "fs" && u.type_name == "std::filesystem"
        ));
    }

    #[test]
    fn test_template_class_is_shallow_and_registered() {
        let source = "template <typename T, int N = 4>\nclass Box { T items[N]; };\nBox<int> b;";
        let (program, errors) = parse(source);
        assert_eq!(errors, 0);
        match &program.body[0] {
            Statement::Decl(Declaration::TemplateDecl(t)) => {
                assert_eq!(t.template_parameters.len(), 2);
                assert_eq!(t.template_parameters[1].default_value.as_deref(), Some("4"));
                assert_eq!(t.head, "class Box");
                match t.declaration.as_deref() {
                    Some(Declaration::ClassDecl(c)) => {
                        assert_eq!(c.name, "Box");
                        assert!(c.members.is_empty());
                    }
                    other => panic!("Expected class, got {other:?}"),
                }
            }
            other => panic!("Expected template, got {other:?}"),
        }
        match &program.body[1] {
            Statement::VarDecl(decl) => assert_eq!(decl.var_type, "Box<int>"),
            other => panic!("Expected variable, got {other:?}"),
        }
    }

    #[test]
    fn test_template_head_scan_is_bounded() {
        let source = "template <typename T> a b c d e f g h i j;";
        let config = ParserConfig::default().with_max_iterations(5);
        let mut parser = Parser::with_config(source, config);
        parser.parse_program();
        assert!(parser
            .errors()
            .iter()
            .any(|e| e.message == "Iteration limit of 5 exceeded while parsing template head"));
    }

    #[test]
    fn test_template_function() {
        let (program, errors) = parse("template <class T> T max(T a, T b) { return a > b ? a : b; }");
        assert_eq!(errors, 0);
        match &program.body[0] {
            Statement::Decl(Declaration::TemplateDecl(t)) => {
                assert!(matches!(t.declaration.as_deref(), Some(Declaration::FunctionDecl(f)) if f.name == "max"));
            }
            other => panic!("Expected template, got {other:?}"),
        }
    }

    #[test]
    fn test_enums() {
        let (program, errors) = parse("enum class Color : unsigned char { Red, Green = 3, };\nColor c = Color::Red;");
        assert_eq!(errors, 0);
        match &program.body[0] {
            Statement::Decl(Declaration::EnumDecl(e)) => {
                assert!(e.is_scoped);
                assert_eq!(e.underlying_type.as_deref(), Some("unsigned char"));
                assert_eq!(e.enumerators.len(), 2);
                assert!(e.enumerators[1].value.is_some());
            }
            other => panic!("Expected enum, got {other:?}"),
        }
        assert!(matches!(program.body[1], Statement::VarDecl(_)));
    }

    #[test]
    fn test_typedefs() {
        let source = "typedef unsigned long size;\n\
                      typedef struct { int x; } Vec, *VecPtr;\n\
                      typedef int (*Compare)(const void*, const void*);\n\
                      size n; VecPtr v; Compare cmp;";
        let (program, errors) = parse_c(source);
        assert_eq!(errors, 0);
        match &program.body[1] {
            Statement::Block(block) => {
                match &block.statements[0] {
                    Statement::Decl(Declaration::TypedefDecl(t)) => {
                        assert_eq!(t.alias, "Vec");
                        assert_eq!(t.type_name, "struct Vec");
                        assert!(t.definition.is_some());
                    }
                    other => panic!("Expected typedef, got {other:?}"),
                }
                match &block.statements[1] {
                    Statement::Decl(Declaration::TypedefDecl(t)) => {
                        assert_eq!(t.type_name, "struct Vec*");
                        assert!(t.definition.is_none());
                    }
                    other => panic!("Expected typedef, got {other:?}"),
                }
            }
            other => panic!("Expected block, got {other:?}"),
        }
        match &program.body[2] {
            Statement::Decl(Declaration::TypedefDecl(t)) => {
                assert_eq!(t.alias, "Compare");
                assert_eq!(t.type_name, "int (*)(const void*, const void*)");
            }
            other => panic!("Expected typedef, got {other:?}"),
        }
        assert_eq!(program.body.len(), 6);
        assert!(program.body[3..].iter().all(|s| matches!(s, Statement::VarDecl(_))));
    }

    #[test]
    fn test_anonymous_typedef_names() {
        let source = "typedef struct { int x; } Point;\n\
                      typedef enum { RED, GREEN } Color;\n\
                      typedef struct Node { int v; } NodeT;\n\
                      typedef union { int i; } *Handle;";
        let (program, errors) = parse_c(source);
        assert_eq!(errors, 0);
        let names: Vec<&str> = program
            .body
            .iter()
            .filter_map(|s| match s {
                Statement::Decl(Declaration::TypedefDecl(t)) => Some(t.type_name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            names,
            vec!["struct Point", "enum Color", "struct Node", "union {...}*"]
        );
    }

    #[test]
    fn test_using_forms() {
        let (program, errors) = parse("using namespace std;\nusing Id = unsigned int;\nusing std::cout;\nId x;");
        assert_eq!(errors, 0);
        assert!(matches!(&program.body[0], Statement::Decl(Declaration::UsingNamespaceDecl(u)) if u.target == "std"));
        assert!(matches!(&program.body[1], Statement::Decl(Declaration::UsingAliasDecl(u)) if u.type_name == "unsigned int"));
        assert!(matches!(&program.body[2], Statement::Decl(Declaration::UsingDecl(u)) if u.name == "std::cout"));
        assert!(matches!(program.body[3], Statement::VarDecl(_)));
    }

    #[test]
    fn test_static_assert_and_linkage() {
        let (program, errors) = parse("static_assert(sizeof(int) == 4, \"int size\");\nextern \"C\" { int puts(const char* s); }");
        assert_eq!(errors, 0);
        assert!(matches!(
            &program.body[0],
            Statement::Decl(Declaration::StaticAssertDecl(s)) if s.message.as_deref() == Some("int size")
        ));
        assert!(matches!(&program.body[1], Statement::Block(b) if b.statements.len() == 1));
    }

    #[test]
    fn test_free_operator() {
        let (program, errors) = parse("struct V { int x; };\nbool operator==(const V& a, const V& b) { return a.x == b.x; }");
        assert_eq!(errors, 0);
        assert!(matches!(
            &program.body[1],
            Statement::Decl(Declaration::OperatorDecl(op)) if op.operator_symbol == "==" && op.parameters.len() == 2
        ));
    }

    #[test]
    fn test_top_level_statement_fallback() {
        let (program, errors) = parse("init();");
        assert_eq!(errors, 0);
        assert!(matches!(program.body[0], Statement::ExprStmt(_)));
    }

    #[test]
    fn test_recovery_between_items() {
        let (program, errors) = parse("int a = ;\nint b = 2;\n}\nint c;");
        assert_eq!(errors, 2);
        assert_eq!(program.body.len(), 2);
    }
}
