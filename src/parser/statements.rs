//! Statement parsing implementation
//!
//! This module handles parsing of all statement types:
//!
//! - Local declarations: `int x = 42;`, `Point p;`, `struct S { ... };`
//! - Control flow: `if`, `while`, `for`, range `for`, `do-while`, `switch`
//! - Jump statements: `return`, `break`, `continue`, `goto`, labels
//! - Exceptions: `try`/`catch`, `throw`
//! - Compound statements: `{ ... }`
//! - Expression statements: function calls, assignments
//!
//! # Grammar
//!
//! ```text
//! statement ::= ';' | block | if_stmt | while_stmt | do_while_stmt
//!             | for_stmt | switch_stmt | return_stmt | break_stmt
//!             | continue_stmt | goto_stmt | label | try_stmt | throw_stmt
//!             | declaration | expr_stmt
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::errors::{ParseError, ParseResult};
use crate::parser::lexer::TokenKind;
use crate::parser::parse::Parser;

impl<'a> Parser<'a> {
    /// Parse `{ statements }`, recovering inside the braces.
    pub(crate) fn parse_block_body(&mut self) -> ParseResult<Vec<Statement>> {
        self.expect_lbrace("to start block")?;
        let saved = self.lenient_types;
        self.lenient_types = false;
        let statements = self.parse_statement_sequence(&[TokenKind::RBrace]);
        self.lenient_types = saved;
        let statements = statements?;
        self.close_brace("to close block")?;
        Ok(statements)
    }

    /// Parse statements until one of `stop` (or end of input). A failing
    /// statement is reported and skipped; parsing continues after it.
    pub(crate) fn parse_statement_sequence(
        &mut self,
        stop: &[TokenKind],
    ) -> ParseResult<Vec<Statement>> {
        let mut statements = Vec::new();

        while !self.is_at_end() && !stop.contains(&self.peek_kind()) {
            if statements.len() >= self.config.max_statements {
                return Err(ParseError::IterationLimit {
                    limit: self.config.max_statements,
                    context: "block",
                    offset: self.peek().offset,
                });
            }
            let start = self.ctx.position();
            match self.parse_statement() {
                Ok(Some(stmt)) => statements.push(stmt),
                Ok(None) => {}
                Err(err) => self.recover(start, &err),
            }
            self.ensure_progress(start);
        }

        Ok(statements)
    }

    /// Parse a statement. A bare `;` yields `None`.
    pub(crate) fn parse_statement(&mut self) -> ParseResult<Option<Statement>> {
        self.nested(|p| p.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> ParseResult<Option<Statement>> {
        let stmt = match self.peek_kind() {
            TokenKind::Semicolon => {
                self.advance();
                return Ok(None);
            }
            TokenKind::LBrace => Statement::block(self.parse_block_body()?),
            TokenKind::If => self.parse_if_statement()?,
            TokenKind::While => self.parse_while_statement()?,
            TokenKind::Do => self.parse_do_while_statement()?,
            TokenKind::For => self.parse_for_statement()?,
            TokenKind::Switch => self.parse_switch_statement()?,
            TokenKind::Return => {
                self.advance();
                let value = self.parse_optional_value()?;
                self.expect_semicolon("after return value")?;
                Statement::Return(Return { value })
            }
            TokenKind::Break => {
                self.advance();
                self.expect_semicolon("after 'break'")?;
                Statement::Break
            }
            TokenKind::Continue => {
                self.advance();
                self.expect_semicolon("after 'continue'")?;
                Statement::Continue
            }
            TokenKind::Goto => {
                self.advance();
                let label = self.expect_identifier("after 'goto'")?;
                self.expect_semicolon("after 'goto'")?;
                Statement::Goto(Goto { label })
            }
            TokenKind::Try => self.parse_try_statement()?,
            TokenKind::Throw => {
                self.advance();
                let value = self.parse_optional_value()?;
                self.expect_semicolon("after throw")?;
                Statement::Throw(Throw { value })
            }
            TokenKind::Case | TokenKind::Default => {
                return Err(self.unexpected(format!(
                    "{} label outside of a switch",
                    self.peek_kind()
                )));
            }
            // Check for label: identifier followed by colon
            TokenKind::Identifier if self.check_ahead(1, TokenKind::Colon) => {
                let name = self.advance().text;
                self.advance();
                Statement::Label(Label { name })
            }
            _ => return self.parse_declaration_or_expression().map(Some),
        };
        Ok(Some(stmt))
    }

    /// Local declaration when the lookahead says so, expression otherwise.
    fn parse_declaration_or_expression(&mut self) -> ParseResult<Statement> {
        if let Some(stmt) = self.parse_named_declaration()? {
            return Ok(stmt);
        }
        if let Some(stmt) = self.try_declaration()? {
            return Ok(stmt);
        }
        self.parse_expression_statement()
    }

    pub(crate) fn parse_expression_statement(&mut self) -> ParseResult<Statement> {
        let expression = self.parse_comma_expression()?;
        self.expect_semicolon("after expression")?;
        Ok(expression_statement(expression))
    }

    fn parse_optional_value(&mut self) -> ParseResult<Option<Expression>> {
        if self.check(TokenKind::Semicolon) {
            Ok(None)
        } else {
            self.parse_comma_expression().map(Some)
        }
    }

    /// `( expr )` after `if`, `while` and `switch`.
    fn parse_condition(&mut self, keyword: &str) -> ParseResult<Expression> {
        self.expect_lparen(&format!("after '{keyword}'"))?;
        let condition = self.parse_comma_expression()?;
        self.expect_rparen(&format!("after {keyword} condition"))?;
        Ok(condition)
    }

    /// Body of a control statement; an empty `;` body is an empty block.
    fn parse_branch(&mut self) -> ParseResult<Box<Statement>> {
        let stmt = self.parse_statement()?;
        Ok(Box::new(stmt.unwrap_or_else(|| Statement::block(Vec::new()))))
    }

    fn parse_if_statement(&mut self) -> ParseResult<Statement> {
        self.advance();
        self.match_token(TokenKind::Constexpr);
        let condition = self.parse_condition("if")?;
        let then_branch = self.parse_branch()?;
        let else_branch = if self.match_token(TokenKind::Else) {
            Some(self.parse_branch()?)
        } else {
            None
        };

        Ok(Statement::If(If {
            condition,
            then_branch,
            else_branch,
        }))
    }

    fn parse_while_statement(&mut self) -> ParseResult<Statement> {
        self.advance();
        let condition = self.parse_condition("while")?;
        let body = self.parse_branch()?;
        Ok(Statement::While(While { condition, body }))
    }

    fn parse_do_while_statement(&mut self) -> ParseResult<Statement> {
        self.advance();
        let body = self.parse_branch()?;
        self.expect_token(TokenKind::While, "after do body")?;
        let condition = self.parse_condition("while")?;
        self.expect_semicolon("after do-while")?;
        Ok(Statement::DoWhile(DoWhile { body, condition }))
    }

    fn parse_for_statement(&mut self) -> ParseResult<Statement> {
        self.advance();
        self.expect_lparen("after 'for'")?;

        if self.is_cpp() {
            if let Some(init) = self.speculate(|p| p.parse_range_for_head())? {
                let range = self.parse_expression()?;
                self.expect_rparen("after range expression")?;
                let body = self.parse_branch()?;
                return Ok(Statement::RangeFor(RangeFor {
                    init: Box::new(init),
                    range,
                    body,
                }));
            }
        }

        let init = if self.match_token(TokenKind::Semicolon) {
            None
        } else if let Some(decl) = self.try_declaration()? {
            Some(Box::new(decl))
        } else {
            Some(Box::new(self.parse_expression_statement()?))
        };

        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_comma_expression()?)
        };
        self.expect_semicolon("after for condition")?;

        let increment = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(self.parse_comma_expression()?)
        };
        self.expect_rparen("after for clauses")?;

        let body = self.parse_branch()?;
        Ok(Statement::For(For {
            init,
            condition,
            increment,
            body,
        }))
    }

    /// `T name :` or `auto [a, b] :` at the start of a range-for.
    fn parse_range_for_head(&mut self) -> ParseResult<Statement> {
        self.leniently(|p| {
            let specs = p.parse_specifiers();
            let var_type = p.parse_type()?;
            let name = if p.check(TokenKind::LBracket) {
                let start = p.ctx.position();
                p.skip_balanced(TokenKind::LBracket, TokenKind::RBracket)?;
                p.text_between(start, p.ctx.position())
            } else {
                p.expect_identifier("in range-for declaration")?
            };
            p.expect_token(TokenKind::Colon, "in range-for")?;
            Ok(Statement::VarDecl(VarDecl {
                var_type,
                name,
                initializer: None,
                storage: specs.storage(),
                dimensions: Vec::new(),
            }))
        })
    }

    /// `switch (x) { case 1: ... default: ... }` as a flat list of arms.
    fn parse_switch_statement(&mut self) -> ParseResult<Statement> {
        self.advance();
        let condition = self.parse_condition("switch")?;
        self.expect_lbrace("to start switch body")?;

        let arm_end = [TokenKind::Case, TokenKind::Default, TokenKind::RBrace];
        let mut cases = Vec::new();

        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            let start = self.ctx.position();
            let arm = match self.peek_kind() {
                TokenKind::Case => self.parse_case_head().and_then(|value| {
                    let body = self.parse_statement_sequence(&arm_end)?;
                    Ok(SwitchArm::Case(CaseArm { value, body }))
                }),
                TokenKind::Default => self
                    .parse_default_head()
                    .and_then(|()| self.parse_statement_sequence(&arm_end))
                    .map(|body| SwitchArm::Default(DefaultArm { body })),
                _ => Err(self.expected("'case' or 'default'")),
            };
            match arm {
                Ok(arm) => cases.push(arm),
                Err(err) => self.recover(start, &err),
            }
            self.ensure_progress(start);
        }

        self.close_brace("to close switch body")?;
        Ok(Statement::Switch(Switch { condition, cases }))
    }

    fn parse_case_head(&mut self) -> ParseResult<Expression> {
        self.advance();
        let value = self.parse_conditional()?;
        self.expect_token(TokenKind::Colon, "after case value")?;
        Ok(value)
    }

    fn parse_default_head(&mut self) -> ParseResult<()> {
        self.advance();
        self.expect_token(TokenKind::Colon, "after 'default'")?;
        Ok(())
    }

    fn parse_try_statement(&mut self) -> ParseResult<Statement> {
        self.advance();
        let try_block = self.parse_block_body()?;

        let mut handlers = Vec::new();
        while self.match_token(TokenKind::Catch) {
            self.expect_lparen("after 'catch'")?;
            let (exception_type, exception_name) = if self.match_token(TokenKind::Ellipsis) {
                ("...".to_string(), String::new())
            } else {
                self.leniently(|p| {
                    p.parse_specifiers();
                    let ty = p.parse_type()?;
                    let name = if p.check(TokenKind::Identifier) {
                        p.advance().text
                    } else {
                        String::new()
                    };
                    Ok((ty, name))
                })?
            };
            self.expect_rparen("after catch declaration")?;
            let body = self.parse_block_body()?;
            handlers.push(CatchClause {
                exception_type,
                exception_name,
                body,
            });
        }

        if handlers.is_empty() {
            return Err(self.expected("'catch' after try block"));
        }
        Ok(Statement::Try(Try {
            try_block,
            handlers,
        }))
    }
}

/// Assignments at statement level become `AssignStmt`.
pub(crate) fn expression_statement(expression: Expression) -> Statement {
    match expression {
        Expression::BinaryOp(BinaryOp {
            operator,
            left,
            right,
        }) if operator.is_assignment() => Statement::Assign(Assign {
            target: *left,
            operator,
            value: *right,
        }),
        other => Statement::expression(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;

    fn statement(source: &str) -> Statement {
        let mut parser = Parser::new(source);
        match parser.parse_statement() {
            Ok(Some(stmt)) => {
                assert!(parser.errors().is_empty(), "errors: {:?}", parser.errors());
                stmt
            }
            other => panic!("failed to parse {source:?}: {other:?}"),
        }
    }

    #[test]
    fn test_empty_statement() {
        let mut parser = Parser::new(";");
        assert!(matches!(parser.parse_statement(), Ok(None)));
    }

    #[test]
    fn test_if_else_chain() {
        match statement("if (a) x = 1; else if (b) ; else { y(); }") {
            Statement::If(stmt) => {
                assert!(matches!(*stmt.then_branch, Statement::Assign(_)));
                match stmt.else_branch.as_deref() {
                    Some(Statement::If(inner)) => {
                        assert!(matches!(&*inner.then_branch, Statement::Block(b) if b.statements.is_empty()));
                        assert!(inner.else_branch.is_some());
                    }
                    other => panic!("Expected nested if, got {other:?}"),
                }
            }
            other => panic!("Expected if, got {other:?}"),
        }
    }

    #[test]
    fn test_classic_for() {
        match statement("for (int i = 0; i < n; i++) sum += i;") {
            Statement::For(stmt) => {
                assert!(matches!(stmt.init.as_deref(), Some(Statement::VarDecl(_))));
                assert!(stmt.condition.is_some());
                assert!(stmt.increment.is_some());
                assert!(matches!(*stmt.body, Statement::Assign(_)));
            }
            other => panic!("Expected for, got {other:?}"),
        }
        match statement("for (;;) {}") {
            Statement::For(stmt) => {
                assert!(stmt.init.is_none() && stmt.condition.is_none() && stmt.increment.is_none());
            }
            other => panic!("Expected for, got {other:?}"),
        }
    }

    #[test]
    fn test_range_for() {
        match statement("for (const auto& item : items) use(item);") {
            Statement::RangeFor(stmt) => match *stmt.init {
                Statement::VarDecl(ref decl) => {
                    assert_eq!(decl.var_type, "const auto&");
                    assert_eq!(decl.name, "item");
                }
                ref other => panic!("Expected declaration, got {other:?}"),
            },
            other => panic!("Expected range for, got {other:?}"),
        }
    }

    #[test]
    fn test_switch_arms_are_flat() {
        let source = "switch (c) { case 1: a(); case 2: b(); break; default: c(); }";
        match statement(source) {
            Statement::Switch(stmt) => {
                assert_eq!(stmt.cases.len(), 3);
                match &stmt.cases[1] {
                    SwitchArm::Case(arm) => assert_eq!(arm.body.len(), 2),
                    other => panic!("Expected case, got {other:?}"),
                }
                assert!(matches!(stmt.cases[2], SwitchArm::Default(_)));
            }
            other => panic!("Expected switch, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_switch_inside_arm() {
        let source = "switch (a) { case 1: switch (b) { case 2: break; } break; }";
        match statement(source) {
            Statement::Switch(stmt) => match &stmt.cases[0] {
                SwitchArm::Case(arm) => {
                    assert!(matches!(arm.body[0], Statement::Switch(_)));
                    assert!(matches!(arm.body[1], Statement::Break));
                }
                other => panic!("Expected case, got {other:?}"),
            },
            other => panic!("Expected switch, got {other:?}"),
        }
    }

    #[test]
    fn test_do_while() {
        assert!(matches!(
            statement("do { i--; } while (i > 0);"),
            Statement::DoWhile(_)
        ));
    }

    #[test]
    fn test_try_catch() {
        match statement("try { f(); } catch (const std::exception& e) { } catch (...) { throw; }") {
            Statement::Try(stmt) => {
                assert_eq!(stmt.handlers.len(), 2);
                assert_eq!(stmt.handlers[0].exception_type, "const std::exception&");
                assert_eq!(stmt.handlers[0].exception_name, "e");
                assert_eq!(stmt.handlers[1].exception_type, "...");
            }
            other => panic!("Expected try, got {other:?}"),
        }
    }

    #[test]
    fn test_label_and_goto() {
        assert!(matches!(statement("done:"), Statement::Label(ref l) if l.name == "done"));
        assert!(matches!(statement("goto done;"), Statement::Goto(ref g) if g.label == "done"));
    }

    #[test]
    fn test_known_type_declares_variable() {
        let mut parser = Parser::new("Point p;");
        parser.ctx.register_type("Point");
        match parser.parse_statement() {
            Ok(Some(Statement::VarDecl(decl))) => {
                assert_eq!(decl.var_type, "Point");
                assert_eq!(decl.name, "p");
            }
            other => panic!("Expected declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_name_call_is_expression() {
        match statement("Foo(x);") {
            Statement::ExprStmt(stmt) => assert!(matches!(stmt.expression, Expression::Call(_))),
            other => panic!("Expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_compound_assignment_statement() {
        match statement("total += price * qty;") {
            Statement::Assign(stmt) => {
                assert_eq!(stmt.operator, BinaryOperator::AddAssign);
                assert!(matches!(stmt.value, Expression::BinaryOp(_)));
            }
            other => panic!("Expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn test_case_outside_switch_is_error() {
        let mut parser = Parser::new("case 1: x();");
        assert!(parser.parse_statement().is_err());
    }

    #[test]
    fn test_block_recovers_after_bad_statement() {
        let mut parser = Parser::new("{ int x = ; y = 2; }");
        let body = parser.parse_block_body().unwrap_or_default();
        assert_eq!(parser.errors().len(), 1);
        assert_eq!(body.len(), 1);
        assert!(matches!(body[0], Statement::Assign(_)));
    }

    #[test]
    fn test_statement_ceiling() {
        let config = ParserConfig::default().with_max_statements(2);
        let mut parser = Parser::with_config("{ a; b; c; }", config);
        assert!(matches!(
            parser.parse_block_body(),
            Err(ParseError::IterationLimit { context: "block", .. })
        ));
    }
}
