// Integration tests for the extended (C++) grammar

use cfront::config::DEFAULT_MAX_DEPTH;
use cfront::parser::ast::*;
use cfront::{parse, ParseOutput};

fn items(source: &str) -> Vec<Statement> {
    let output = parse(source);
    assert!(output.errors.is_empty(), "errors: {:?}", output.errors);
    output.program.body
}

fn class_named<'a>(body: &'a [Statement], name: &str) -> &'a ClassDecl {
    body.iter()
        .find_map(|stmt| match stmt {
            Statement::Decl(Declaration::ClassDecl(c)) if c.name == name => Some(c),
            Statement::Decl(Declaration::NamespaceDecl(ns)) => Some(class_named(&ns.body, name)),
            _ => None,
        })
        .unwrap_or_else(|| panic!("class {name} not found"))
}

const SHAPES: &str = r#"
#include <iostream>
#include <vector>

namespace geo {

class Shape {
public:
    virtual ~Shape() {}
    virtual double area() const = 0;
};

class Circle : public Shape {
public:
    explicit Circle(double r) : Shape(), radius(r) {}
    double area() const override { return 3.14 * radius * radius; }
private:
    double radius;
};

}

int main() {
    std::vector<int> values = {1, 2, 3};
    int total = 0;
    for (const auto& v : values) {
        total += v;
    }
    auto square = [&total](int x) -> int { return x * x + total; };
    geo::Circle* c = new geo::Circle(2.0);
    try {
        total = square(static_cast<int>(c->area()));
    } catch (const std::exception& e) {
        std::cout << e.what() << std::endl;
    }
    delete c;
    return total;
}
"#;

#[test]
fn test_program_structure() {
    let body = items(SHAPES);
    assert_eq!(body.len(), 4);
    assert!(matches!(
        &body[0],
        Statement::Decl(Declaration::PreprocessorDirective(d)) if d.directive == "include" && d.value == "iostream"
    ));
    match &body[2] {
        Statement::Decl(Declaration::NamespaceDecl(ns)) => {
            assert_eq!(ns.name, "geo");
            assert_eq!(ns.body.len(), 2);
        }
        other => panic!("Expected namespace, got {other:?}"),
    }
    assert!(matches!(&body[3], Statement::Decl(Declaration::FunctionDecl(f)) if f.name == "main"));
}

#[test]
fn test_class_hierarchy() {
    let body = items(SHAPES);

    let shape = class_named(&body, "Shape");
    assert!(matches!(&shape.members[0], Declaration::DestructorDecl(d) if d.is_virtual && d.access == Access::Public));
    assert!(matches!(&shape.members[1], Declaration::MethodDecl(m) if m.is_pure_virtual && m.is_const));

    let circle = class_named(&body, "Circle");
    assert_eq!(circle.bases.len(), 1);
    assert_eq!(circle.bases[0].name, "Shape");
    assert_eq!(circle.bases[0].access, Access::Public);
    match &circle.members[0] {
        Declaration::ConstructorDecl(ctor) => {
            assert!(ctor.is_explicit);
            assert_eq!(ctor.parameters[0].param_type, "double");
            let inits: Vec<(&str, bool)> = ctor
                .initializers
                .iter()
                .map(|i| (i.member_name.as_str(), i.is_base_class))
                .collect();
            assert_eq!(inits, vec![("Shape", true), ("radius", false)]);
        }
        other => panic!("Expected constructor, got {other:?}"),
    }
    assert!(matches!(&circle.members[1], Declaration::MethodDecl(m) if m.is_override && m.is_const && m.body.is_some()));
    assert!(matches!(&circle.members[2], Declaration::FieldDecl(f) if f.access == Access::Private && f.type_name == "double"));
}

#[test]
fn test_function_body_constructs() {
    let body = items(SHAPES);
    let main = match &body[3] {
        Statement::Decl(Declaration::FunctionDecl(f)) => f.body.as_deref().unwrap_or_default(),
        other => panic!("Expected function, got {other:?}"),
    };
    assert_eq!(main.len(), 8);

    match &main[0] {
        Statement::VarDecl(decl) => {
            assert_eq!(decl.var_type, "std::vector<int>");
            assert!(matches!(&decl.initializer, Some(Expression::InitializerList(l)) if l.elements.len() == 3));
        }
        other => panic!("Expected vector declaration, got {other:?}"),
    }
    assert!(matches!(&main[2], Statement::RangeFor(r) if matches!(&*r.init, Statement::VarDecl(d) if d.name == "v")));

    match &main[3] {
        Statement::VarDecl(decl) => match &decl.initializer {
            Some(Expression::Lambda(lambda)) => {
                assert_eq!(lambda.captures.len(), 1);
                assert!(lambda.captures[0].by_reference);
                assert_eq!(lambda.parameters.len(), 1);
                assert_eq!(lambda.return_type.as_deref(), Some("int"));
            }
            other => panic!("Expected lambda, got {other:?}"),
        },
        other => panic!("Expected lambda variable, got {other:?}"),
    }

    match &main[4] {
        Statement::VarDecl(decl) => {
            assert_eq!(decl.var_type, "geo::Circle*");
            assert!(matches!(&decl.initializer, Some(Expression::New(n)) if n.type_name == "geo::Circle" && n.arguments.len() == 1));
        }
        other => panic!("Expected pointer declaration, got {other:?}"),
    }

    match &main[5] {
        Statement::Try(stmt) => {
            assert_eq!(stmt.handlers.len(), 1);
            assert_eq!(stmt.handlers[0].exception_type, "const std::exception&");
            match &stmt.try_block[0] {
                Statement::Assign(assign) => match &assign.value {
                    Expression::Call(call) => {
                        assert!(matches!(&call.arguments[0], Expression::Cast(c) if c.cast_kind == CastKind::StaticCast && c.target_type == "int"));
                    }
                    other => panic!("Expected call, got {other:?}"),
                },
                other => panic!("Expected assignment, got {other:?}"),
            }
        }
        other => panic!("Expected try, got {other:?}"),
    }
    assert!(matches!(&main[6], Statement::ExprStmt(s) if matches!(&s.expression, Expression::Delete(d) if !d.is_array)));
}

#[test]
fn test_default_access_by_keyword() {
    let body = items("class C { int x; };\nstruct S { int x; };");
    let c = class_named(&body, "C");
    let s = class_named(&body, "S");
    assert!(matches!(&c.members[0], Declaration::FieldDecl(f) if f.access == Access::Private));
    assert!(matches!(&s.members[0], Declaration::FieldDecl(f) if f.access == Access::Public));
}

#[test]
fn test_const_operator() {
    let source = "class C {\npublic:\n  C operator+(const C& other) const { return other; }\n};";
    let body = items(source);
    let c = class_named(&body, "C");
    match &c.members[0] {
        Declaration::OperatorDecl(op) => {
            assert_eq!(op.operator_symbol, "+");
            assert!(op.is_const);
            assert_eq!(op.return_type, "C");
            assert_eq!(op.parameters[0].param_type, "const C&");
            assert_eq!(op.parameters[0].name, "other");
        }
        other => panic!("Expected operator, got {other:?}"),
    }
}

#[test]
fn test_template_then_use() {
    let source = "template <typename T>\nclass Stack {\n  T items[16];\npublic:\n  void push(T v) { }\n};\nStack<int> s;";
    let body = items(source);
    match &body[0] {
        Statement::Decl(Declaration::TemplateDecl(t)) => {
            assert_eq!(t.template_parameters[0].kind, "typename");
            assert_eq!(t.template_parameters[0].name, "T");
            assert!(matches!(t.declaration.as_deref(), Some(Declaration::ClassDecl(c)) if c.name == "Stack"));
        }
        other => panic!("Expected template, got {other:?}"),
    }
    assert!(matches!(&body[1], Statement::VarDecl(d) if d.var_type == "Stack<int>" && d.name == "s"));
}

#[test]
fn test_out_of_class_definitions() {
    let source = "class Counter { public: Counter(); ~Counter(); int get() const; private: int n; };\n\
                  Counter::Counter() : n(0) {}\n\
                  Counter::~Counter() {}\n\
                  int Counter::get() const { return n; }";
    let body = items(source);
    assert!(matches!(&body[1], Statement::Decl(Declaration::ConstructorDecl(c)) if c.name == "Counter::Counter"));
    assert!(matches!(&body[2], Statement::Decl(Declaration::DestructorDecl(d)) if d.name == "Counter::~Counter"));
    assert!(matches!(&body[3], Statement::Decl(Declaration::FunctionDecl(f)) if f.name == "Counter::get" && f.is_const));
}

#[test]
fn test_enum_class_and_qualified_value() {
    let body = items("enum class Mode : int { Read, Write = 2 };\nMode m = Mode::Write;");
    assert!(matches!(&body[0], Statement::Decl(Declaration::EnumDecl(e)) if e.is_scoped && e.enumerators.len() == 2));
    match &body[1] {
        Statement::VarDecl(decl) => {
            assert_eq!(decl.var_type, "Mode");
            assert!(matches!(&decl.initializer, Some(Expression::Identifier(id)) if id.name == "Mode::Write"));
        }
        other => panic!("Expected variable, got {other:?}"),
    }
}

#[test]
fn test_c_style_cast_and_sizeof() {
    let body = items("int main() { int n = (int)3.5 + sizeof(long); return n; }");
    let main = match &body[0] {
        Statement::Decl(Declaration::FunctionDecl(f)) => f.body.as_deref().unwrap_or_default(),
        other => panic!("Expected function, got {other:?}"),
    };
    match &main[0] {
        Statement::VarDecl(decl) => match &decl.initializer {
            Some(Expression::BinaryOp(op)) => {
                assert!(matches!(&*op.left, Expression::Cast(c) if c.cast_kind == CastKind::CStyle));
                assert!(matches!(&*op.right, Expression::Sizeof(q) if q.is_type && q.type_name.as_deref() == Some("long")));
            }
            other => panic!("Expected binary op, got {other:?}"),
        },
        other => panic!("Expected variable, got {other:?}"),
    }
}

#[test]
fn test_using_directives_and_stream_expression() {
    let body = items("using namespace std;\nint main() { cout << \"hi\" << endl; return 0; }");
    assert!(matches!(&body[0], Statement::Decl(Declaration::UsingNamespaceDecl(u)) if u.target == "std"));
    match &body[1] {
        Statement::Decl(Declaration::FunctionDecl(f)) => {
            let stmts = f.body.as_deref().unwrap_or_default();
            assert!(matches!(
                &stmts[0],
                Statement::ExprStmt(s) if matches!(&s.expression, Expression::BinaryOp(op) if op.operator == BinaryOperator::Shl)
            ));
        }
        other => panic!("Expected function, got {other:?}"),
    }
}

/// Default-config parse on a thread with the usual 2 MiB test stack.
fn parse_on_small_stack(source: String) -> ParseOutput {
    std::thread::Builder::new()
        .stack_size(2 << 20)
        .spawn(move || parse(&source))
        .expect("failed to spawn parser thread")
        .join()
        .expect("parser thread panicked")
}

#[test]
fn test_default_depth_limit_fits_small_stack() {
    let depth = 2 * DEFAULT_MAX_DEPTH + 8;
    let limit_message = format!("Maximum nesting depth of {DEFAULT_MAX_DEPTH} exceeded");
    let sources = [
        format!("int x = {}1{};", "(".repeat(depth), ")".repeat(depth)),
        format!("{}int x;{}", "namespace a { ".repeat(depth), "}".repeat(depth)),
        format!("int x = {}0;", "[](){ return ".repeat(depth)),
    ];
    for source in sources {
        let output = parse_on_small_stack(source);
        assert!(
            output.errors.iter().any(|e| e.message == limit_message),
            "errors: {:?}",
            output.errors
        );
    }
}

#[test]
fn test_nesting_below_default_limit_is_clean() {
    let depth = DEFAULT_MAX_DEPTH / 2;
    let output = parse_on_small_stack(format!("int x = {}1{};", "(".repeat(depth), ")".repeat(depth)));
    assert!(output.errors.is_empty(), "errors: {:?}", output.errors);
}
