//! Indented text rendering of a parsed program
//!
//! One node per line, `Kind [detail]`, children indented by two spaces.
//! Used by the `--format tree` output of the command line tool.

use crate::parser::ast::*;
use crate::visitor::{walk_declaration, walk_expression, walk_program, walk_statement, Visitor};
use std::fmt::Write;

#[derive(Debug, Default)]
pub struct TreePrinter {
    out: String,
    depth: usize,
}

impl TreePrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a whole program.
    pub fn render(program: &Program) -> String {
        let mut printer = TreePrinter::new();
        program.accept(&mut printer);
        printer.finish()
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, kind: &str, detail: &str) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(kind);
        if !detail.is_empty() {
            // Writing into a String cannot fail
            let _ = write!(self.out, " [{}]", detail);
        }
        self.out.push('\n');
    }

    fn nest(&mut self, kind: &str, detail: &str, children: impl FnOnce(&mut Self)) {
        self.line(kind, detail);
        self.depth += 1;
        children(self);
        self.depth -= 1;
    }
}

fn expression_label(expr: &Expression) -> (&'static str, String) {
    match expr {
        Expression::Identifier(id) => ("Identifier", id.name.clone()),
        Expression::StringLiteral(lit) => ("StringLiteral", format!("\"{}\"", lit.value)),
        Expression::CharLiteral(lit) => ("CharLiteral", format!("'{}'", lit.value)),
        Expression::IntLiteral(lit) => ("IntLiteral", lit.value.to_string()),
        Expression::RealLiteral(lit) => ("RealLiteral", lit.value.to_string()),
        Expression::BoolLiteral(lit) => ("BoolLiteral", lit.value.to_string()),
        Expression::NullLiteral => ("NullLiteral", String::new()),
        Expression::UnaryOp(op) => {
            let fix = if op.postfix { "postfix" } else { "prefix" };
            ("UnaryOp", format!("{} {}", fix, op.operator.symbol()))
        }
        Expression::BinaryOp(op) => ("BinaryOp", op.operator.symbol().to_string()),
        Expression::TernaryOp(_) => ("TernaryOp", String::new()),
        Expression::Call(call) => ("CallExpr", format!("{} args", call.arguments.len())),
        Expression::ArrayAccess(_) => ("ArrayAccessExpr", String::new()),
        Expression::MemberAccess(access) => {
            let op = if access.is_pointer_access { "->" } else { "." };
            ("MemberAccessExpr", format!("{}{}", op, access.member))
        }
        Expression::PointerToMember(access) => {
            let op = if access.is_arrow { "->*" } else { ".*" };
            ("PointerToMemberExpr", op.to_string())
        }
        Expression::New(new) => {
            let detail = if new.is_array {
                format!("{}[]", new.type_name)
            } else {
                new.type_name.clone()
            };
            ("NewExpr", detail)
        }
        Expression::Delete(delete) => {
            let detail = if delete.is_array { "[]" } else { "" };
            ("DeleteExpr", detail.to_string())
        }
        Expression::This => ("ThisExpr", String::new()),
        Expression::Sizeof(query) => ("SizeofExpr", query.type_name.clone().unwrap_or_default()),
        Expression::Typeid(query) => ("TypeidExpr", query.type_name.clone().unwrap_or_default()),
        Expression::TemplateId(id) => (
            "TemplateIdExpr",
            format!("{}<{}>", id.template_name, id.template_arguments.join(", ")),
        ),
        Expression::Lambda(lambda) => (
            "LambdaExpr",
            lambda.return_type.clone().unwrap_or_default(),
        ),
        Expression::Cast(cast) => {
            let kind = match cast.cast_kind {
                CastKind::StaticCast => "static_cast",
                CastKind::DynamicCast => "dynamic_cast",
                CastKind::ConstCast => "const_cast",
                CastKind::ReinterpretCast => "reinterpret_cast",
                CastKind::CStyle => "c_style",
            };
            ("CastExpr", format!("{} {}", kind, cast.target_type))
        }
        Expression::InitializerList(list) => {
            ("InitializerList", format!("{} elements", list.elements.len()))
        }
    }
}

fn statement_label(stmt: &Statement) -> (&'static str, String) {
    match stmt {
        Statement::ExprStmt(_) => ("ExprStmt", String::new()),
        Statement::Block(_) => ("Block", String::new()),
        Statement::Return(_) => ("ReturnStmt", String::new()),
        Statement::Break => ("BreakStmt", String::new()),
        Statement::Continue => ("ContinueStmt", String::new()),
        Statement::If(_) => ("IfStmt", String::new()),
        Statement::While(_) => ("WhileStmt", String::new()),
        Statement::DoWhile(_) => ("DoWhileStmt", String::new()),
        Statement::For(_) => ("ForStmt", String::new()),
        Statement::RangeFor(_) => ("RangeForStmt", String::new()),
        Statement::Switch(s) => ("SwitchStmt", format!("{} arms", s.cases.len())),
        Statement::Try(_) => ("TryStmt", String::new()),
        Statement::Throw(_) => ("ThrowStmt", String::new()),
        Statement::Goto(s) => ("GotoStmt", s.label.clone()),
        Statement::Label(s) => ("LabelStmt", s.name.clone()),
        Statement::VarDecl(v) => {
            let mut detail = format!("{} {}", v.var_type, v.name);
            if let Some(storage) = &v.storage {
                detail.insert_str(0, &format!("{} ", storage));
            }
            ("VarDeclStmt", detail)
        }
        Statement::Assign(a) => ("AssignStmt", a.operator.symbol().to_string()),
        // Routed through the declaration dispatcher instead
        Statement::Decl(_) => ("", String::new()),
    }
}

fn declaration_label(decl: &Declaration) -> (&'static str, String) {
    match decl {
        Declaration::FunctionDecl(f) => {
            ("FunctionDecl", format!("{} {}", f.return_type, f.name))
        }
        Declaration::MethodDecl(m) => (
            "MethodDecl",
            format!("{} {} {}", m.access.as_str(), m.return_type, m.name),
        ),
        Declaration::ConstructorDecl(c) => {
            ("ConstructorDecl", format!("{} {}", c.access.as_str(), c.name))
        }
        Declaration::DestructorDecl(d) => {
            ("DestructorDecl", format!("{} ~{}", d.access.as_str(), d.name))
        }
        Declaration::OperatorDecl(o) => (
            "OperatorDecl",
            format!("{} operator{}", o.access.as_str(), o.operator_symbol),
        ),
        Declaration::FieldDecl(f) => (
            "FieldDecl",
            format!("{} {} {}", f.access.as_str(), f.type_name, f.name),
        ),
        Declaration::ClassDecl(c) => {
            let keyword = if c.is_union {
                "union"
            } else if c.is_struct {
                "struct"
            } else {
                "class"
            };
            let mut detail = format!("{} {}", keyword, c.name);
            if !c.bases.is_empty() {
                let bases: Vec<&str> = c.bases.iter().map(|b| b.name.as_str()).collect();
                let _ = write!(detail, " : {}", bases.join(", "));
            }
            if c.is_forward {
                detail.push_str(" (forward)");
            }
            ("ClassDecl", detail)
        }
        Declaration::FriendDecl(f) => ("FriendDecl", f.declaration.clone()),
        Declaration::NamespaceDecl(n) => ("NamespaceDecl", n.name.clone()),
        Declaration::EnumDecl(e) => {
            let detail = if e.is_scoped {
                format!("class {}", e.name)
            } else {
                e.name.clone()
            };
            ("EnumDecl", detail)
        }
        Declaration::TypedefDecl(t) => ("TypedefDecl", format!("{} = {}", t.alias, t.type_name)),
        Declaration::UsingAliasDecl(u) => {
            ("UsingAliasDecl", format!("{} = {}", u.alias, u.type_name))
        }
        Declaration::UsingDecl(u) => ("UsingDecl", u.name.clone()),
        Declaration::UsingNamespaceDecl(u) => ("UsingNamespaceDecl", u.target.clone()),
        Declaration::TemplateDecl(t) => {
            let params: Vec<&str> = t
                .template_parameters
                .iter()
                .map(|p| p.name.as_str())
                .collect();
            ("TemplateDecl", format!("<{}> {}", params.join(", "), t.head))
        }
        Declaration::StaticAssertDecl(s) => {
            ("StaticAssertDecl", s.message.clone().unwrap_or_default())
        }
        Declaration::PreprocessorDirective(p) => {
            ("PreprocessorDirective", format!("{} {}", p.directive, p.value))
        }
    }
}

impl Visitor for TreePrinter {
    fn visit_program(&mut self, program: &Program) {
        self.nest("Program", &program.name, |p| walk_program(p, program));
    }

    fn visit_expression(&mut self, expr: &Expression) {
        let (kind, detail) = expression_label(expr);
        self.nest(kind, &detail, |p| walk_expression(p, expr));
    }

    fn visit_statement(&mut self, stmt: &Statement) {
        if let Statement::Decl(decl) = stmt {
            self.visit_declaration(decl);
            return;
        }
        let (kind, detail) = statement_label(stmt);
        self.nest(kind, &detail, |p| walk_statement(p, stmt));
    }

    fn visit_declaration(&mut self, decl: &Declaration) {
        let (kind, detail) = declaration_label(decl);
        self.nest(kind, &detail, |p| walk_declaration(p, decl));
    }

    fn visit_parameter(&mut self, param: &Parameter) {
        let detail = format!("{} {}", param.param_type, param.name);
        self.nest("Parameter", detail.trim_end(), |p| {
            if let Some(default) = &param.default_value {
                p.visit_expression(default);
            }
        });
    }

    fn visit_switch_arm(&mut self, arm: &SwitchArm) {
        match arm {
            SwitchArm::Case(case) => self.nest("CaseStmt", "", |p| {
                p.visit_expression(&case.value);
                for stmt in &case.body {
                    p.visit_statement(stmt);
                }
            }),
            SwitchArm::Default(default) => self.nest("DefaultStmt", "", |p| {
                for stmt in &default.body {
                    p.visit_statement(stmt);
                }
            }),
        }
    }

    fn visit_catch(&mut self, clause: &CatchClause) {
        let detail = format!("{} {}", clause.exception_type, clause.exception_name);
        self.nest("CatchStmt", detail.trim_end(), |p| {
            for stmt in &clause.body {
                p.visit_statement(stmt);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_render_function() {
        let output = parse("int add(int a, int b) { return a + b; }");
        let text = TreePrinter::render(&output.program);
        let expected = "\
Program [translation_unit]
  FunctionDecl [int add]
    Parameter [int a]
    Parameter [int b]
    ReturnStmt
      BinaryOp [+]
        Identifier [a]
        Identifier [b]
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_class_and_switch() {
        let source = "class A : public B { int x; };\nvoid f(int v) { switch (v) { case 1: break; default: g(); } }";
        let text = TreePrinter::render(&parse(source).program);
        assert!(text.contains("  ClassDecl [class A : B]\n    FieldDecl [private int x]\n"));
        assert!(text.contains("      CaseStmt\n        IntLiteral [1]\n        BreakStmt\n"));
        assert!(text.contains("      DefaultStmt\n        ExprStmt\n          CallExpr [0 args]\n"));
    }
}
