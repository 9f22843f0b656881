//! Visitor trait for traversing the AST
//!
//! Implement [`Visitor`] to walk a parsed [`Program`]. There is one
//! `visit_*` method per concrete node kind; the default implementations
//! descend into the node's children through the matching `walk_*`
//! function, so a visitor only overrides the kinds it cares about.
//!
//! The family dispatchers (`visit_expression`, `visit_statement`,
//! `visit_declaration`) route a family enum to its concrete method and can
//! be overridden to observe every node of a family.
//!
//! # Example
//!
//! ```
//! use cfront::parser::ast::Call;
//! use cfront::visitor::{walk_call, Visitor};
//!
//! #[derive(Default)]
//! struct CallCounter(usize);
//!
//! impl Visitor for CallCounter {
//!     fn visit_call(&mut self, call: &Call) {
//!         self.0 += 1;
//!         walk_call(self, call);
//!     }
//! }
//!
//! let output = cfront::parse("int main() { f(g(1)); }");
//! let mut counter = CallCounter::default();
//! output.program.accept(&mut counter);
//! assert_eq!(counter.0, 2);
//! ```

use crate::parser::ast::*;

pub trait Visitor: Sized {
    // ===== Family dispatchers =====

    fn visit_program(&mut self, program: &Program) {
        walk_program(self, program);
    }

    fn visit_statement(&mut self, stmt: &Statement) {
        walk_statement(self, stmt);
    }

    fn visit_expression(&mut self, expr: &Expression) {
        walk_expression(self, expr);
    }

    fn visit_declaration(&mut self, decl: &Declaration) {
        walk_declaration(self, decl);
    }

    // ===== Expressions =====

    fn visit_identifier(&mut self, _id: &Identifier) {}
    fn visit_string_literal(&mut self, _lit: &TextLiteral) {}
    fn visit_char_literal(&mut self, _lit: &TextLiteral) {}
    fn visit_int_literal(&mut self, _lit: &IntLiteral) {}
    fn visit_real_literal(&mut self, _lit: &RealLiteral) {}
    fn visit_bool_literal(&mut self, _lit: &BoolLiteral) {}
    fn visit_null_literal(&mut self) {}
    fn visit_this(&mut self) {}

    fn visit_unary_op(&mut self, op: &UnaryOp) {
        self.visit_expression(&op.operand);
    }

    fn visit_binary_op(&mut self, op: &BinaryOp) {
        self.visit_expression(&op.left);
        self.visit_expression(&op.right);
    }

    fn visit_ternary_op(&mut self, op: &TernaryOp) {
        self.visit_expression(&op.condition);
        self.visit_expression(&op.then_expr);
        self.visit_expression(&op.else_expr);
    }

    fn visit_call(&mut self, call: &Call) {
        walk_call(self, call);
    }

    fn visit_array_access(&mut self, access: &ArrayAccess) {
        self.visit_expression(&access.array);
        self.visit_expression(&access.index);
    }

    fn visit_member_access(&mut self, access: &MemberAccess) {
        self.visit_expression(&access.object);
    }

    fn visit_pointer_to_member(&mut self, access: &PointerToMember) {
        self.visit_expression(&access.object);
        self.visit_expression(&access.member);
    }

    fn visit_new(&mut self, new: &New) {
        if let Some(size) = &new.array_size {
            self.visit_expression(size);
        }
        walk_expressions(self, &new.arguments);
    }

    fn visit_delete(&mut self, delete: &Delete) {
        self.visit_expression(&delete.operand);
    }

    fn visit_sizeof(&mut self, query: &TypeQuery) {
        walk_type_query(self, query);
    }

    fn visit_typeid(&mut self, query: &TypeQuery) {
        walk_type_query(self, query);
    }

    fn visit_template_id(&mut self, _id: &TemplateId) {}

    fn visit_lambda(&mut self, lambda: &Lambda) {
        for capture in &lambda.captures {
            if let Some(init) = &capture.init {
                self.visit_expression(init);
            }
        }
        for param in &lambda.parameters {
            self.visit_parameter(param);
        }
        walk_statements(self, &lambda.body);
    }

    fn visit_cast(&mut self, cast: &Cast) {
        self.visit_expression(&cast.expression);
    }

    fn visit_initializer_list(&mut self, list: &InitializerList) {
        walk_expressions(self, &list.elements);
    }

    // ===== Statements =====

    fn visit_expr_stmt(&mut self, stmt: &ExprStmt) {
        self.visit_expression(&stmt.expression);
    }

    fn visit_block(&mut self, block: &Block) {
        walk_statements(self, &block.statements);
    }

    fn visit_return(&mut self, ret: &Return) {
        if let Some(value) = &ret.value {
            self.visit_expression(value);
        }
    }

    fn visit_break(&mut self) {}
    fn visit_continue(&mut self) {}

    fn visit_if(&mut self, stmt: &If) {
        self.visit_expression(&stmt.condition);
        self.visit_statement(&stmt.then_branch);
        if let Some(else_branch) = &stmt.else_branch {
            self.visit_statement(else_branch);
        }
    }

    fn visit_while(&mut self, stmt: &While) {
        self.visit_expression(&stmt.condition);
        self.visit_statement(&stmt.body);
    }

    fn visit_do_while(&mut self, stmt: &DoWhile) {
        self.visit_statement(&stmt.body);
        self.visit_expression(&stmt.condition);
    }

    fn visit_for(&mut self, stmt: &For) {
        if let Some(init) = &stmt.init {
            self.visit_statement(init);
        }
        if let Some(condition) = &stmt.condition {
            self.visit_expression(condition);
        }
        if let Some(increment) = &stmt.increment {
            self.visit_expression(increment);
        }
        self.visit_statement(&stmt.body);
    }

    fn visit_range_for(&mut self, stmt: &RangeFor) {
        self.visit_statement(&stmt.init);
        self.visit_expression(&stmt.range);
        self.visit_statement(&stmt.body);
    }

    fn visit_switch(&mut self, stmt: &Switch) {
        self.visit_expression(&stmt.condition);
        for arm in &stmt.cases {
            self.visit_switch_arm(arm);
        }
    }

    fn visit_switch_arm(&mut self, arm: &SwitchArm) {
        match arm {
            SwitchArm::Case(case) => {
                self.visit_expression(&case.value);
                walk_statements(self, &case.body);
            }
            SwitchArm::Default(default) => walk_statements(self, &default.body),
        }
    }

    fn visit_try(&mut self, stmt: &Try) {
        walk_statements(self, &stmt.try_block);
        for handler in &stmt.handlers {
            self.visit_catch(handler);
        }
    }

    fn visit_catch(&mut self, clause: &CatchClause) {
        walk_statements(self, &clause.body);
    }

    fn visit_throw(&mut self, stmt: &Throw) {
        if let Some(value) = &stmt.value {
            self.visit_expression(value);
        }
    }

    fn visit_goto(&mut self, _stmt: &Goto) {}
    fn visit_label(&mut self, _stmt: &Label) {}

    fn visit_var_decl(&mut self, decl: &VarDecl) {
        for size in decl.dimensions.iter().flatten() {
            self.visit_expression(size);
        }
        if let Some(init) = &decl.initializer {
            self.visit_expression(init);
        }
    }

    fn visit_assign(&mut self, stmt: &Assign) {
        self.visit_expression(&stmt.target);
        self.visit_expression(&stmt.value);
    }

    // ===== Declarations =====

    fn visit_parameter(&mut self, param: &Parameter) {
        if let Some(default) = &param.default_value {
            self.visit_expression(default);
        }
    }

    fn visit_function(&mut self, func: &FunctionDecl) {
        walk_parameters(self, &func.parameters);
        if let Some(body) = &func.body {
            walk_statements(self, body);
        }
    }

    fn visit_method(&mut self, method: &MethodDecl) {
        walk_parameters(self, &method.parameters);
        if let Some(body) = &method.body {
            walk_statements(self, body);
        }
    }

    fn visit_constructor(&mut self, ctor: &ConstructorDecl) {
        walk_parameters(self, &ctor.parameters);
        for init in &ctor.initializers {
            walk_expressions(self, &init.arguments);
        }
        if let Some(body) = &ctor.body {
            walk_statements(self, body);
        }
    }

    fn visit_destructor(&mut self, dtor: &DestructorDecl) {
        if let Some(body) = &dtor.body {
            walk_statements(self, body);
        }
    }

    fn visit_operator(&mut self, op: &OperatorDecl) {
        walk_parameters(self, &op.parameters);
        if let Some(body) = &op.body {
            walk_statements(self, body);
        }
    }

    fn visit_field(&mut self, field: &FieldDecl) {
        for size in field.dimensions.iter().flatten() {
            self.visit_expression(size);
        }
        if let Some(width) = &field.bit_width {
            self.visit_expression(width);
        }
        if let Some(init) = &field.initializer {
            self.visit_expression(init);
        }
    }

    fn visit_class(&mut self, class: &ClassDecl) {
        for member in &class.members {
            self.visit_declaration(member);
        }
    }

    fn visit_friend(&mut self, _decl: &FriendDecl) {}

    fn visit_namespace(&mut self, ns: &NamespaceDecl) {
        walk_statements(self, &ns.body);
    }

    fn visit_enum(&mut self, decl: &EnumDecl) {
        for enumerator in &decl.enumerators {
            if let Some(value) = &enumerator.value {
                self.visit_expression(value);
            }
        }
    }

    fn visit_typedef(&mut self, decl: &TypedefDecl) {
        if let Some(definition) = &decl.definition {
            self.visit_declaration(definition);
        }
    }

    fn visit_using_alias(&mut self, _decl: &UsingAliasDecl) {}
    fn visit_using(&mut self, _decl: &UsingDecl) {}
    fn visit_using_namespace(&mut self, _decl: &UsingNamespaceDecl) {}

    fn visit_template(&mut self, decl: &TemplateDecl) {
        if let Some(inner) = &decl.declaration {
            self.visit_declaration(inner);
        }
    }

    fn visit_static_assert(&mut self, decl: &StaticAssertDecl) {
        self.visit_expression(&decl.condition);
    }

    fn visit_preprocessor(&mut self, _decl: &PreprocessorDirective) {}
}

pub fn walk_program<V: Visitor>(visitor: &mut V, program: &Program) {
    walk_statements(visitor, &program.body);
}

pub fn walk_statements<V: Visitor>(visitor: &mut V, statements: &[Statement]) {
    for stmt in statements {
        visitor.visit_statement(stmt);
    }
}

pub fn walk_expressions<V: Visitor>(visitor: &mut V, expressions: &[Expression]) {
    for expr in expressions {
        visitor.visit_expression(expr);
    }
}

pub fn walk_parameters<V: Visitor>(visitor: &mut V, parameters: &[Parameter]) {
    for param in parameters {
        visitor.visit_parameter(param);
    }
}

pub fn walk_call<V: Visitor>(visitor: &mut V, call: &Call) {
    visitor.visit_expression(&call.callee);
    walk_expressions(visitor, &call.arguments);
}

fn walk_type_query<V: Visitor>(visitor: &mut V, query: &TypeQuery) {
    if let Some(expr) = &query.expression {
        visitor.visit_expression(expr);
    }
}

/// Route an expression to its concrete `visit_*` method.
pub fn walk_expression<V: Visitor>(visitor: &mut V, expr: &Expression) {
    match expr {
        Expression::Identifier(id) => visitor.visit_identifier(id),
        Expression::StringLiteral(lit) => visitor.visit_string_literal(lit),
        Expression::CharLiteral(lit) => visitor.visit_char_literal(lit),
        Expression::IntLiteral(lit) => visitor.visit_int_literal(lit),
        Expression::RealLiteral(lit) => visitor.visit_real_literal(lit),
        Expression::BoolLiteral(lit) => visitor.visit_bool_literal(lit),
        Expression::NullLiteral => visitor.visit_null_literal(),
        Expression::UnaryOp(op) => visitor.visit_unary_op(op),
        Expression::BinaryOp(op) => visitor.visit_binary_op(op),
        Expression::TernaryOp(op) => visitor.visit_ternary_op(op),
        Expression::Call(call) => visitor.visit_call(call),
        Expression::ArrayAccess(access) => visitor.visit_array_access(access),
        Expression::MemberAccess(access) => visitor.visit_member_access(access),
        Expression::PointerToMember(access) => visitor.visit_pointer_to_member(access),
        Expression::New(new) => visitor.visit_new(new),
        Expression::Delete(delete) => visitor.visit_delete(delete),
        Expression::This => visitor.visit_this(),
        Expression::Sizeof(query) => visitor.visit_sizeof(query),
        Expression::Typeid(query) => visitor.visit_typeid(query),
        Expression::TemplateId(id) => visitor.visit_template_id(id),
        Expression::Lambda(lambda) => visitor.visit_lambda(lambda),
        Expression::Cast(cast) => visitor.visit_cast(cast),
        Expression::InitializerList(list) => visitor.visit_initializer_list(list),
    }
}

/// Route a statement to its concrete `visit_*` method.
pub fn walk_statement<V: Visitor>(visitor: &mut V, stmt: &Statement) {
    match stmt {
        Statement::ExprStmt(s) => visitor.visit_expr_stmt(s),
        Statement::Block(s) => visitor.visit_block(s),
        Statement::Return(s) => visitor.visit_return(s),
        Statement::Break => visitor.visit_break(),
        Statement::Continue => visitor.visit_continue(),
        Statement::If(s) => visitor.visit_if(s),
        Statement::While(s) => visitor.visit_while(s),
        Statement::DoWhile(s) => visitor.visit_do_while(s),
        Statement::For(s) => visitor.visit_for(s),
        Statement::RangeFor(s) => visitor.visit_range_for(s),
        Statement::Switch(s) => visitor.visit_switch(s),
        Statement::Try(s) => visitor.visit_try(s),
        Statement::Throw(s) => visitor.visit_throw(s),
        Statement::Goto(s) => visitor.visit_goto(s),
        Statement::Label(s) => visitor.visit_label(s),
        Statement::VarDecl(s) => visitor.visit_var_decl(s),
        Statement::Assign(s) => visitor.visit_assign(s),
        Statement::Decl(decl) => visitor.visit_declaration(decl),
    }
}

/// Route a declaration to its concrete `visit_*` method.
pub fn walk_declaration<V: Visitor>(visitor: &mut V, decl: &Declaration) {
    match decl {
        Declaration::FunctionDecl(d) => visitor.visit_function(d),
        Declaration::MethodDecl(d) => visitor.visit_method(d),
        Declaration::ConstructorDecl(d) => visitor.visit_constructor(d),
        Declaration::DestructorDecl(d) => visitor.visit_destructor(d),
        Declaration::OperatorDecl(d) => visitor.visit_operator(d),
        Declaration::FieldDecl(d) => visitor.visit_field(d),
        Declaration::ClassDecl(d) => visitor.visit_class(d),
        Declaration::FriendDecl(d) => visitor.visit_friend(d),
        Declaration::NamespaceDecl(d) => visitor.visit_namespace(d),
        Declaration::EnumDecl(d) => visitor.visit_enum(d),
        Declaration::TypedefDecl(d) => visitor.visit_typedef(d),
        Declaration::UsingAliasDecl(d) => visitor.visit_using_alias(d),
        Declaration::UsingDecl(d) => visitor.visit_using(d),
        Declaration::UsingNamespaceDecl(d) => visitor.visit_using_namespace(d),
        Declaration::TemplateDecl(d) => visitor.visit_template(d),
        Declaration::StaticAssertDecl(d) => visitor.visit_static_assert(d),
        Declaration::PreprocessorDirective(d) => visitor.visit_preprocessor(d),
    }
}

impl Program {
    /// Accept a visitor for traversing this node and its children
    pub fn accept<V: Visitor>(&self, visitor: &mut V) {
        visitor.visit_program(self);
    }
}

impl Statement {
    pub fn accept<V: Visitor>(&self, visitor: &mut V) {
        visitor.visit_statement(self);
    }
}

impl Expression {
    pub fn accept<V: Visitor>(&self, visitor: &mut V) {
        visitor.visit_expression(self);
    }
}

impl Declaration {
    pub fn accept<V: Visitor>(&self, visitor: &mut V) {
        visitor.visit_declaration(self);
    }
}
