//! Expression parsing implementation
//!
//! This module handles parsing of C and C++ expressions using precedence
//! climbing for binary operators and recursive descent for other expression
//! forms.
//!
//! # Precedence (lowest to highest)
//!
//! ```text
//! assignment   = += -= *= /= %= &= |= ^= <<= >>=   (right-assoc)
//! ternary      ? :                                  (right-assoc)
//!  1 ||    2 &&    3 |    4 ^    5 &
//!  6 == !=         7 < > <= >= <=>
//!  8 << >>         9 + -          10 * / %
//! unary        ++ -- * & - + ! ~ sizeof (type)cast
//! postfix      () [] . -> .* ->* ++ --
//! primary      literals, names, (expr), this, new, delete, lambdas, casts
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::errors::{ParseError, ParseResult};
use crate::parser::lexer::TokenKind;
use crate::parser::parse::Parser;
use std::num::IntErrorKind;

fn binary_operator(kind: TokenKind) -> Option<(BinaryOperator, u8)> {
    use BinaryOperator as Op;
    let entry = match kind {
        TokenKind::OrOr => (Op::Or, 1),
        TokenKind::AndAnd => (Op::And, 2),
        TokenKind::Pipe => (Op::BitOr, 3),
        TokenKind::Caret => (Op::BitXor, 4),
        TokenKind::Amp => (Op::BitAnd, 5),
        TokenKind::EqEq => (Op::Eq, 6),
        TokenKind::Ne => (Op::Ne, 6),
        TokenKind::Lt => (Op::Lt, 7),
        TokenKind::Gt => (Op::Gt, 7),
        TokenKind::Le => (Op::Le, 7),
        TokenKind::Ge => (Op::Ge, 7),
        TokenKind::Spaceship => (Op::ThreeWay, 7),
        TokenKind::Shl => (Op::Shl, 8),
        TokenKind::Shr => (Op::Shr, 8),
        TokenKind::Plus => (Op::Add, 9),
        TokenKind::Minus => (Op::Sub, 9),
        TokenKind::Star => (Op::Mul, 10),
        TokenKind::Slash => (Op::Div, 10),
        TokenKind::Percent => (Op::Mod, 10),
        _ => return None,
    };
    Some(entry)
}

fn assignment_operator(kind: TokenKind) -> Option<BinaryOperator> {
    use BinaryOperator as Op;
    let op = match kind {
        TokenKind::Assign => Op::Assign,
        TokenKind::PlusAssign => Op::AddAssign,
        TokenKind::MinusAssign => Op::SubAssign,
        TokenKind::StarAssign => Op::MulAssign,
        TokenKind::SlashAssign => Op::DivAssign,
        TokenKind::PercentAssign => Op::ModAssign,
        TokenKind::AmpAssign => Op::AndAssign,
        TokenKind::PipeAssign => Op::OrAssign,
        TokenKind::CaretAssign => Op::XorAssign,
        TokenKind::ShlAssign => Op::ShlAssign,
        TokenKind::ShrAssign => Op::ShrAssign,
        _ => return None,
    };
    Some(op)
}

fn prefix_operator(kind: TokenKind) -> Option<UnaryOperator> {
    let op = match kind {
        TokenKind::PlusPlus => UnaryOperator::Inc,
        TokenKind::MinusMinus => UnaryOperator::Dec,
        TokenKind::Minus => UnaryOperator::Neg,
        TokenKind::Plus => UnaryOperator::Plus,
        TokenKind::Bang => UnaryOperator::Not,
        TokenKind::Tilde => UnaryOperator::BitNot,
        TokenKind::Star => UnaryOperator::Deref,
        TokenKind::Amp => UnaryOperator::AddrOf,
        _ => return None,
    };
    Some(op)
}

/// Tokens that can begin the operand of a C-style cast.
fn starts_operand(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        Identifier
            | IntLiteral
            | HexLiteral
            | OctalLiteral
            | FloatLiteral
            | StringLiteral
            | CharLiteral
            | True
            | False
            | Nullptr
            | This
            | LParen
            | LBrace
            | Bang
            | Tilde
            | Minus
            | Plus
            | Star
            | Amp
            | PlusPlus
            | MinusMinus
            | Sizeof
            | New
            | ColonColon
    )
}

/// Value of an integer literal lexeme (decimal, octal or hex, with
/// `u`/`l` suffixes). Values above `i64::MAX` wrap; values past `u64::MAX`
/// fail with `IntErrorKind::PosOverflow`.
pub(crate) fn parse_int_literal(text: &str) -> Result<i64, IntErrorKind> {
    let digits = text.trim_end_matches(|c: char| matches!(c, 'u' | 'U' | 'l' | 'L'));
    let parsed = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16)
    } else if digits.len() > 1 && digits.starts_with('0') {
        u64::from_str_radix(&digits[1..], 8)
    } else {
        digits.parse::<u64>()
    };
    parsed.map(|value| value as i64).map_err(|err| err.kind().clone())
}

/// Text between the quotes of a string or character token, escapes kept.
pub(crate) fn literal_body(text: &str) -> &str {
    let mut chars = text.chars();
    let Some(quote) = chars.next() else {
        return "";
    };
    let inner = chars.as_str();
    inner.strip_suffix(quote).unwrap_or(inner)
}

impl<'a> Parser<'a> {
    /// Parse expression (top-level entry point, assignment level)
    pub(crate) fn parse_expression(&mut self) -> ParseResult<Expression> {
        let saved = self.lenient_types;
        self.lenient_types = false;
        let result = self.nested(|p| p.parse_assignment());
        self.lenient_types = saved;
        result
    }

    /// Comma-separated expressions folded with the comma operator.
    pub(crate) fn parse_comma_expression(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_expression()?;
        while self.match_token(TokenKind::Comma) {
            let rhs = self.parse_expression()?;
            expr = Expression::binary(BinaryOperator::Comma, expr, rhs);
        }
        Ok(expr)
    }

    /// Conditional expression without assignment (bit-field widths, case labels).
    pub(crate) fn parse_conditional(&mut self) -> ParseResult<Expression> {
        self.nested(|p| p.parse_ternary())
    }

    /// Parse assignment or ternary (right-associative)
    fn parse_assignment(&mut self) -> ParseResult<Expression> {
        let target = self.parse_ternary()?;

        if let Some(op) = assignment_operator(self.peek_kind()) {
            self.advance();
            let value = if self.check(TokenKind::LBrace) {
                self.parse_braced_list()?
            } else {
                self.nested(|p| p.parse_assignment())?
            };
            return Ok(Expression::binary(op, target, value));
        }

        Ok(target)
    }

    /// Parse ternary conditional (? :)
    fn parse_ternary(&mut self) -> ParseResult<Expression> {
        let condition = self.parse_binary(1)?;

        if !self.match_token(TokenKind::Question) {
            return Ok(condition);
        }
        let then_expr = self.parse_comma_expression()?;
        self.expect_token(TokenKind::Colon, "in conditional expression")?;
        let else_expr = self.nested(|p| p.parse_assignment())?;

        Ok(Expression::TernaryOp(TernaryOp {
            condition: Box::new(condition),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        }))
    }

    /// Precedence climbing over the binary operator table.
    fn parse_binary(&mut self, min_prec: u8) -> ParseResult<Expression> {
        let mut left = self.parse_unary()?;

        while let Some((op, prec)) = binary_operator(self.peek_kind()) {
            if prec < min_prec {
                break;
            }
            self.advance();
            let right = self.parse_binary(prec + 1)?;
            left = Expression::binary(op, left, right);
        }

        Ok(left)
    }

    /// Parse unary expression
    fn parse_unary(&mut self) -> ParseResult<Expression> {
        if let Some(op) = prefix_operator(self.peek_kind()) {
            self.advance();
            let operand = self.nested(|p| p.parse_unary())?;
            return Ok(Expression::unary(op, operand, false));
        }

        match self.peek_kind() {
            TokenKind::Sizeof => return self.parse_sizeof(),
            TokenKind::LParen => {
                if let Some(cast) = self.try_c_style_cast()? {
                    return Ok(cast);
                }
            }
            _ => {}
        }

        self.parse_postfix()
    }

    /// `(type) operand`, recognized only for builtin and known types.
    fn try_c_style_cast(&mut self) -> ParseResult<Option<Expression>> {
        let saved = self.lenient_types;
        self.lenient_types = false;
        let target = if self.starts_type_at(1) {
            self.speculate(|p| {
                p.advance();
                let ty = p.parse_type()?;
                p.expect_rparen("after cast type")?;
                if starts_operand(p.peek_kind()) {
                    Ok(ty)
                } else {
                    Err(p.unexpected("not a cast"))
                }
            })
        } else {
            Ok(None)
        };
        self.lenient_types = saved;

        let Some(target_type) = target? else {
            return Ok(None);
        };
        let expression = if self.check(TokenKind::LBrace) {
            self.parse_braced_list()?
        } else {
            self.nested(|p| p.parse_unary())?
        };
        Ok(Some(Expression::Cast(Cast {
            cast_kind: CastKind::CStyle,
            target_type,
            expression: Box::new(expression),
        })))
    }

    /// `sizeof expr`, `sizeof(type)`, `sizeof...(pack)`
    fn parse_sizeof(&mut self) -> ParseResult<Expression> {
        self.advance();
        if self.match_token(TokenKind::Ellipsis) {
            self.expect_lparen("after 'sizeof...'")?;
            let pack = self.expect_identifier("in 'sizeof...'")?;
            self.expect_rparen("after 'sizeof...' pack")?;
            return Ok(Expression::Sizeof(TypeQuery {
                is_type: true,
                type_name: Some(format!("{pack}...")),
                expression: None,
            }));
        }

        if let Some(type_name) = self.parenthesized_type()? {
            return Ok(Expression::Sizeof(TypeQuery {
                is_type: true,
                type_name: Some(type_name),
                expression: None,
            }));
        }

        let operand = self.nested(|p| p.parse_unary())?;
        Ok(Expression::Sizeof(TypeQuery {
            is_type: false,
            type_name: None,
            expression: Some(Box::new(operand)),
        }))
    }

    /// `( type )` when the parenthesized tokens form exactly a type.
    fn parenthesized_type(&mut self) -> ParseResult<Option<String>> {
        if !self.check(TokenKind::LParen) || !self.starts_type_at(1) {
            return Ok(None);
        }
        self.speculate(|p| {
            p.advance();
            let ty = p.parse_type()?;
            p.expect_rparen("after type")?;
            Ok(ty)
        })
    }

    /// Parse postfix expression
    fn parse_postfix(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.peek_kind() {
                TokenKind::LParen => {
                    self.advance();
                    let arguments = self.parse_arguments(TokenKind::RParen)?;
                    expr = Expression::call(expr, arguments);
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_comma_expression()?;
                    self.expect_token(TokenKind::RBracket, "after array index")?;
                    expr = Expression::ArrayAccess(ArrayAccess {
                        array: Box::new(expr),
                        index: Box::new(index),
                    });
                }
                TokenKind::Dot | TokenKind::Arrow => {
                    let is_pointer_access = self.advance().is(TokenKind::Arrow);
                    let member = self.parse_member_name()?;
                    expr = Expression::MemberAccess(MemberAccess {
                        object: Box::new(expr),
                        member,
                        is_pointer_access,
                    });
                }
                TokenKind::DotStar | TokenKind::ArrowStar => {
                    let is_arrow = self.advance().is(TokenKind::ArrowStar);
                    let member = self.nested(|p| p.parse_unary())?;
                    expr = Expression::PointerToMember(PointerToMember {
                        object: Box::new(expr),
                        member: Box::new(member),
                        is_arrow,
                    });
                }
                TokenKind::PlusPlus => {
                    self.advance();
                    expr = Expression::unary(UnaryOperator::Inc, expr, true);
                }
                TokenKind::MinusMinus => {
                    self.advance();
                    expr = Expression::unary(UnaryOperator::Dec, expr, true);
                }
                TokenKind::LBrace if self.is_cpp() && self.is_brace_constructible(&expr) => {
                    let arguments = self.parse_initializer_list()?;
                    expr = Expression::call(expr, arguments);
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    /// `Type{...}` functional construction
    fn is_brace_constructible(&self, expr: &Expression) -> bool {
        match expr {
            Expression::Identifier(id) => self.ctx.is_known_type(&id.name),
            Expression::TemplateId(_) => true,
            _ => false,
        }
    }

    fn parse_member_name(&mut self) -> ParseResult<String> {
        if self.match_token(TokenKind::Tilde) {
            let name = self.expect_identifier("after '~'")?;
            return Ok(format!("~{name}"));
        }
        self.match_token(TokenKind::Template);
        if self.is_cpp() {
            self.parse_qualified_name()
        } else {
            self.expect_identifier("after member access")
        }
    }

    /// Comma-separated arguments up to `close`; the opener is already consumed.
    pub(crate) fn parse_arguments(&mut self, close: TokenKind) -> ParseResult<Vec<Expression>> {
        let mut arguments = Vec::new();
        if self.match_token(close) {
            return Ok(arguments);
        }
        loop {
            let arg = if self.check(TokenKind::LBrace) {
                self.parse_braced_list()?
            } else {
                self.parse_expression()?
            };
            self.match_token(TokenKind::Ellipsis);
            arguments.push(arg);
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        self.expect_token(close, "after arguments")?;
        Ok(arguments)
    }

    /// `{ a, b, .x = c, { nested } }` as a node
    pub(crate) fn parse_braced_list(&mut self) -> ParseResult<Expression> {
        let elements = self.parse_initializer_list()?;
        Ok(Expression::InitializerList(InitializerList { elements }))
    }

    /// `{ ... }` elements; a trailing comma is allowed.
    pub(crate) fn parse_initializer_list(&mut self) -> ParseResult<Vec<Expression>> {
        self.expect_lbrace("to start initializer list")?;
        self.nested(|p| {
            let mut elements = Vec::new();
            while !p.check(TokenKind::RBrace) && !p.is_at_end() {
                let element = if p.check(TokenKind::LBrace) {
                    p.parse_braced_list()?
                } else if p.check(TokenKind::Dot)
                    && p.check_ahead(1, TokenKind::Identifier)
                    && p.check_ahead(2, TokenKind::Assign)
                {
                    // designated initializer
                    p.advance();
                    let field = p.advance().text;
                    p.advance();
                    let value = if p.check(TokenKind::LBrace) {
                        p.parse_braced_list()?
                    } else {
                        p.parse_expression()?
                    };
                    Expression::binary(
                        BinaryOperator::Assign,
                        Expression::identifier(format!(".{field}")),
                        value,
                    )
                } else {
                    p.parse_expression()?
                };
                elements.push(element);
                if !p.match_token(TokenKind::Comma) {
                    break;
                }
            }
            p.expect_token(TokenKind::RBrace, "to close initializer list")?;
            Ok(elements)
        })
    }

    /// Parse primary expression
    fn parse_primary(&mut self) -> ParseResult<Expression> {
        let token = self.peek().clone();

        match token.kind {
            TokenKind::IntLiteral | TokenKind::HexLiteral | TokenKind::OctalLiteral => {
                self.advance();
                // a bad literal is reported but keeps its place in the tree
                let value = parse_int_literal(&token.text).unwrap_or_else(|kind| {
                    self.report(&ParseError::InvalidLiteral {
                        text: token.text.clone(),
                        offset: token.offset,
                    });
                    if kind == IntErrorKind::PosOverflow {
                        i64::MAX
                    } else {
                        0
                    }
                });
                Ok(Expression::IntLiteral(IntLiteral { value }))
            }
            TokenKind::FloatLiteral => {
                self.advance();
                let value = token
                    .text
                    .trim_end_matches(['f', 'F', 'l', 'L'])
                    .parse::<f64>()
                    .map_err(|_| ParseError::InvalidLiteral {
                        text: token.text.clone(),
                        offset: token.offset,
                    })?;
                Ok(Expression::RealLiteral(RealLiteral { value }))
            }
            TokenKind::StringLiteral => {
                // adjacent literals concatenate
                let mut value = String::new();
                while self.check(TokenKind::StringLiteral) {
                    let piece = self.advance();
                    value.push_str(literal_body(&piece.text));
                }
                Ok(Expression::StringLiteral(TextLiteral { value }))
            }
            TokenKind::CharLiteral => {
                self.advance();
                Ok(Expression::CharLiteral(TextLiteral {
                    value: literal_body(&token.text).to_string(),
                }))
            }
            TokenKind::True | TokenKind::False => {
                self.advance();
                Ok(Expression::BoolLiteral(BoolLiteral {
                    value: token.is(TokenKind::True),
                }))
            }
            TokenKind::Nullptr => {
                self.advance();
                Ok(Expression::NullLiteral)
            }
            TokenKind::This => {
                self.advance();
                Ok(Expression::This)
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_comma_expression()?;
                self.expect_rparen("after expression")?;
                Ok(expr)
            }
            TokenKind::LBrace => self.parse_braced_list(),
            TokenKind::LBracket if self.is_cpp() => self.parse_lambda(),
            TokenKind::New => self.parse_new(),
            TokenKind::Delete => self.parse_delete(),
            TokenKind::Typeid => self.parse_typeid(),
            TokenKind::Identifier | TokenKind::ColonColon => self.parse_name_expression(),
            kind if kind.is_builtin_type() && self.check_ahead(1, TokenKind::LParen) => {
                // functional cast: int(x)
                self.advance();
                Ok(Expression::identifier(token.text))
            }
            _ => Err(self.expected("expression")),
        }
    }

    /// Names, qualified names, template-ids and named casts.
    fn parse_name_expression(&mut self) -> ParseResult<Expression> {
        let name = self.parse_qualified_name()?;

        if name == "NULL" {
            return Ok(Expression::NullLiteral);
        }

        if let Some(cast_kind) = CastKind::from_keyword(&name) {
            if self.check(TokenKind::Lt) {
                let target_type = self.scan_template_arguments()?.join(", ");
                self.expect_lparen("after cast type")?;
                let expression = self.parse_expression()?;
                self.expect_rparen("after cast operand")?;
                return Ok(Expression::Cast(Cast {
                    cast_kind,
                    target_type,
                    expression: Box::new(expression),
                }));
            }
        }

        if self.is_cpp() && self.check(TokenKind::Lt) {
            let args = self.speculate(|p| {
                let args = p.scan_template_arguments()?;
                if matches!(
                    p.peek_kind(),
                    TokenKind::LParen | TokenKind::ColonColon | TokenKind::LBrace
                ) {
                    Ok(args)
                } else {
                    Err(p.unexpected("not a template argument list"))
                }
            })?;

            if let Some(template_arguments) = args {
                if self.check(TokenKind::ColonColon) && self.check_ahead(1, TokenKind::Identifier) {
                    self.advance();
                    let rest = self.parse_qualified_name()?;
                    return Ok(Expression::identifier(format!(
                        "{name}<{}>::{rest}",
                        template_arguments.join(", ")
                    )));
                }
                return Ok(Expression::TemplateId(TemplateId {
                    template_name: name,
                    template_arguments,
                }));
            }
        }

        Ok(Expression::identifier(name))
    }

    fn parse_typeid(&mut self) -> ParseResult<Expression> {
        self.advance();
        if let Some(type_name) = self.parenthesized_type()? {
            return Ok(Expression::Typeid(TypeQuery {
                is_type: true,
                type_name: Some(type_name),
                expression: None,
            }));
        }
        self.expect_lparen("after 'typeid'")?;
        let expression = self.parse_expression()?;
        self.expect_rparen("after typeid operand")?;
        Ok(Expression::Typeid(TypeQuery {
            is_type: false,
            type_name: None,
            expression: Some(Box::new(expression)),
        }))
    }

    /// `new T`, `new T(args)`, `new T{...}`, `new T[n]`, `new (place) T`
    fn parse_new(&mut self) -> ParseResult<Expression> {
        self.advance();
        if self.match_token(TokenKind::LParen) {
            self.parse_arguments(TokenKind::RParen)?;
        }

        let type_name = self.leniently(|p| p.parse_type())?;
        let mut new = New {
            type_name,
            arguments: Vec::new(),
            array_size: None,
            is_array: false,
        };

        if self.match_token(TokenKind::LBracket) {
            let size = self.parse_expression()?;
            self.expect_token(TokenKind::RBracket, "after array size")?;
            new.array_size = Some(Box::new(size));
            new.is_array = true;
        }
        if self.match_token(TokenKind::LParen) {
            new.arguments = self.parse_arguments(TokenKind::RParen)?;
        } else if self.check(TokenKind::LBrace) {
            new.arguments = self.parse_initializer_list()?;
        }

        Ok(Expression::New(new))
    }

    fn parse_delete(&mut self) -> ParseResult<Expression> {
        self.advance();
        let is_array = self.check(TokenKind::LBracket) && self.check_ahead(1, TokenKind::RBracket);
        if is_array {
            self.advance();
            self.advance();
        }
        let operand = self.nested(|p| p.parse_unary())?;
        Ok(Expression::Delete(Delete {
            operand: Box::new(operand),
            is_array,
        }))
    }

    /// `[captures](params) mutable -> ret { body }`
    fn parse_lambda(&mut self) -> ParseResult<Expression> {
        self.advance();
        let mut captures = Vec::new();
        while !self.check(TokenKind::RBracket) {
            captures.push(self.parse_capture()?);
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        self.expect_token(TokenKind::RBracket, "to close lambda captures")?;

        let parameters = if self.check(TokenKind::LParen) {
            self.leniently(|p| p.parse_parameter_list())?
        } else {
            Vec::new()
        };

        let mut is_mutable = false;
        let mut return_type = None;
        loop {
            match self.peek_kind() {
                TokenKind::Mutable => {
                    self.advance();
                    is_mutable = true;
                }
                TokenKind::Constexpr => {
                    self.advance();
                }
                TokenKind::Noexcept => {
                    self.advance();
                    if self.check(TokenKind::LParen) {
                        self.skip_balanced(TokenKind::LParen, TokenKind::RParen)?;
                    }
                }
                TokenKind::Arrow => {
                    self.advance();
                    return_type = Some(self.leniently(|p| p.parse_type())?);
                }
                _ => break,
            }
        }

        let body = self.parse_block_body()?;
        Ok(Expression::Lambda(Lambda {
            captures,
            parameters,
            return_type,
            body,
            is_mutable,
        }))
    }

    fn parse_capture(&mut self) -> ParseResult<Capture> {
        let capture = |name: &str, by_reference: bool, is_this: bool| Capture {
            name: name.to_string(),
            by_reference,
            is_this,
            init: None,
        };

        match self.peek_kind() {
            TokenKind::Assign => {
                self.advance();
                Ok(capture("=", false, false))
            }
            TokenKind::Amp => {
                self.advance();
                if self.check(TokenKind::Identifier) {
                    let name = self.advance().text;
                    self.match_token(TokenKind::Ellipsis);
                    Ok(capture(&name, true, false))
                } else {
                    Ok(capture("&", true, false))
                }
            }
            TokenKind::This => {
                self.advance();
                Ok(capture("this", false, true))
            }
            TokenKind::Star if self.check_ahead(1, TokenKind::This) => {
                self.advance();
                self.advance();
                Ok(capture("*this", false, true))
            }
            TokenKind::Identifier => {
                let name = self.advance().text;
                self.match_token(TokenKind::Ellipsis);
                let mut result = capture(&name, false, false);
                if self.match_token(TokenKind::Assign) {
                    result.init = Some(self.parse_expression()?);
                }
                Ok(result)
            }
            _ => Err(self.expected("lambda capture")),
        }
    }
}
