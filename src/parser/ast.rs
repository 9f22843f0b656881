//! AST (Abstract Syntax Tree) definitions for the C/C++ front end
//!
//! The tree is split into three closed families:
//! - [`Expression`]: values and operators
//! - [`Statement`]: control flow, local declarations and blocks
//! - [`Declaration`]: functions, classes and the other named entities
//!
//! Every composite node owns its children (`Box`/`Vec`), so a parsed
//! [`Program`] is a strict tree that is dropped in one step.
//!
//! The serde attributes on this module *are* the serialized format: each node
//! is a record with a `"type"` discriminator naming the concrete node kind,
//! camelCase field names, and absent optional children omitted.

use serde::{Serialize, Serializer};

/// Member access level inside a class body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Public,
    Private,
    Protected,
}

impl Access {
    pub fn as_str(self) -> &'static str {
        match self {
            Access::Public => "public",
            Access::Private => "private",
            Access::Protected => "protected",
        }
    }
}

/// Binary operators, assignment forms and the comma operator included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Shl,
    Shr,
    Lt,
    Gt,
    Le,
    Ge,
    ThreeWay,
    Eq,
    Ne,
    BitAnd,
    BitXor,
    BitOr,
    And,
    Or,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    ShlAssign,
    ShrAssign,
    Comma,
}

impl BinaryOperator {
    /// Source spelling, which is also the serialized form.
    pub fn symbol(self) -> &'static str {
        use BinaryOperator::*;
        match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Shl => "<<",
            Shr => ">>",
            Lt => "<",
            Gt => ">",
            Le => "<=",
            Ge => ">=",
            ThreeWay => "<=>",
            Eq => "==",
            Ne => "!=",
            BitAnd => "&",
            BitXor => "^",
            BitOr => "|",
            And => "&&",
            Or => "||",
            Assign => "=",
            AddAssign => "+=",
            SubAssign => "-=",
            MulAssign => "*=",
            DivAssign => "/=",
            ModAssign => "%=",
            AndAssign => "&=",
            OrAssign => "|=",
            XorAssign => "^=",
            ShlAssign => "<<=",
            ShrAssign => ">>=",
            Comma => ",",
        }
    }

    pub fn is_assignment(self) -> bool {
        use BinaryOperator::*;
        matches!(
            self,
            Assign
                | AddAssign
                | SubAssign
                | MulAssign
                | DivAssign
                | ModAssign
                | AndAssign
                | OrAssign
                | XorAssign
                | ShlAssign
                | ShrAssign
        )
    }
}

impl Serialize for BinaryOperator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

/// Prefix and postfix unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Neg,
    Plus,
    Not,
    BitNot,
    Deref,
    AddrOf,
    Inc,
    Dec,
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Neg => "-",
            UnaryOperator::Plus => "+",
            UnaryOperator::Not => "!",
            UnaryOperator::BitNot => "~",
            UnaryOperator::Deref => "*",
            UnaryOperator::AddrOf => "&",
            UnaryOperator::Inc => "++",
            UnaryOperator::Dec => "--",
        }
    }
}

impl Serialize for UnaryOperator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CastKind {
    StaticCast,
    DynamicCast,
    ConstCast,
    ReinterpretCast,
    CStyle,
}

impl CastKind {
    pub fn from_keyword(name: &str) -> Option<Self> {
        match name {
            "static_cast" => Some(CastKind::StaticCast),
            "dynamic_cast" => Some(CastKind::DynamicCast),
            "const_cast" => Some(CastKind::ConstCast),
            "reinterpret_cast" => Some(CastKind::ReinterpretCast),
            _ => None,
        }
    }
}

// ===== Expressions =====

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identifier {
    pub name: String,
}

/// String or character literal; `value` keeps escapes verbatim, without quotes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLiteral {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntLiteral {
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RealLiteral {
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoolLiteral {
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnaryOp {
    pub operator: UnaryOperator,
    pub postfix: bool,
    pub operand: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryOp {
    pub operator: BinaryOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TernaryOp {
    pub condition: Box<Expression>,
    pub then_expr: Box<Expression>,
    pub else_expr: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Call {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayAccess {
    pub array: Box<Expression>,
    pub index: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberAccess {
    pub object: Box<Expression>,
    pub member: String,
    pub is_pointer_access: bool,
}

/// `obj.*pm` or `ptr->*pm`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerToMember {
    pub object: Box<Expression>,
    pub member: Box<Expression>,
    pub is_arrow: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct New {
    pub type_name: String,
    pub arguments: Vec<Expression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_size: Option<Box<Expression>>,
    pub is_array: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Delete {
    pub operand: Box<Expression>,
    pub is_array: bool,
}

/// Operand of `sizeof` / `typeid`: either a type name or an expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeQuery {
    pub is_type: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<Box<Expression>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateId {
    pub template_name: String,
    pub template_arguments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capture {
    pub name: String,
    pub by_reference: bool,
    pub is_this: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lambda {
    pub captures: Vec<Capture>,
    pub parameters: Vec<Parameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    pub body: Vec<Statement>,
    pub is_mutable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cast {
    pub cast_kind: CastKind,
    pub target_type: String,
    pub expression: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitializerList {
    pub elements: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Expression {
    Identifier(Identifier),
    StringLiteral(TextLiteral),
    CharLiteral(TextLiteral),
    IntLiteral(IntLiteral),
    RealLiteral(RealLiteral),
    BoolLiteral(BoolLiteral),
    NullLiteral,
    UnaryOp(UnaryOp),
    BinaryOp(BinaryOp),
    TernaryOp(TernaryOp),
    #[serde(rename = "CallExpr")]
    Call(Call),
    #[serde(rename = "ArrayAccessExpr")]
    ArrayAccess(ArrayAccess),
    #[serde(rename = "MemberAccessExpr")]
    MemberAccess(MemberAccess),
    #[serde(rename = "PointerToMemberExpr")]
    PointerToMember(PointerToMember),
    #[serde(rename = "NewExpr")]
    New(New),
    #[serde(rename = "DeleteExpr")]
    Delete(Delete),
    #[serde(rename = "ThisExpr")]
    This,
    #[serde(rename = "SizeofExpr")]
    Sizeof(TypeQuery),
    #[serde(rename = "TypeidExpr")]
    Typeid(TypeQuery),
    #[serde(rename = "TemplateIdExpr")]
    TemplateId(TemplateId),
    #[serde(rename = "LambdaExpr")]
    Lambda(Lambda),
    #[serde(rename = "CastExpr")]
    Cast(Cast),
    InitializerList(InitializerList),
}

impl Expression {
    pub fn identifier(name: impl Into<String>) -> Self {
        Expression::Identifier(Identifier { name: name.into() })
    }

    pub fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::BinaryOp(BinaryOp {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn unary(operator: UnaryOperator, operand: Expression, postfix: bool) -> Self {
        Expression::UnaryOp(UnaryOp {
            operator,
            postfix,
            operand: Box::new(operand),
        })
    }

    pub fn call(callee: Expression, arguments: Vec<Expression>) -> Self {
        Expression::Call(Call {
            callee: Box::new(callee),
            arguments,
        })
    }
}

// ===== Statements =====

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExprStmt {
    pub expression: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Return {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct If {
    pub condition: Expression,
    pub then_branch: Box<Statement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub else_branch: Option<Box<Statement>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct While {
    pub condition: Expression,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoWhile {
    pub body: Box<Statement>,
    pub condition: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct For {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init: Option<Box<Statement>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Expression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub increment: Option<Expression>,
    pub body: Box<Statement>,
}

/// `for (decl : range) body`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeFor {
    pub init: Box<Statement>,
    pub range: Expression,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseArm {
    pub value: Expression,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefaultArm {
    pub body: Vec<Statement>,
}

/// One `case`/`default` arm of a switch; arms are flat, in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum SwitchArm {
    #[serde(rename = "CaseStmt")]
    Case(CaseArm),
    #[serde(rename = "DefaultStmt")]
    Default(DefaultArm),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Switch {
    pub condition: Expression,
    pub cases: Vec<SwitchArm>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "CatchStmt", rename_all = "camelCase")]
pub struct CatchClause {
    /// `...` for a catch-all handler
    pub exception_type: String,
    pub exception_name: String,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Try {
    pub try_block: Vec<Statement>,
    pub handlers: Vec<CatchClause>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Throw {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Goto {
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VarDecl {
    pub var_type: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initializer: Option<Expression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    /// Array suffixes in order; `None` for an unsized `[]`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<Option<Expression>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assign {
    pub target: Expression,
    pub operator: BinaryOperator,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Statement {
    ExprStmt(ExprStmt),
    Block(Block),
    #[serde(rename = "ReturnStmt")]
    Return(Return),
    #[serde(rename = "BreakStmt")]
    Break,
    #[serde(rename = "ContinueStmt")]
    Continue,
    #[serde(rename = "IfStmt")]
    If(If),
    #[serde(rename = "WhileStmt")]
    While(While),
    #[serde(rename = "DoWhileStmt")]
    DoWhile(DoWhile),
    #[serde(rename = "ForStmt")]
    For(For),
    #[serde(rename = "RangeForStmt")]
    RangeFor(RangeFor),
    #[serde(rename = "SwitchStmt")]
    Switch(Switch),
    #[serde(rename = "TryStmt")]
    Try(Try),
    #[serde(rename = "ThrowStmt")]
    Throw(Throw),
    #[serde(rename = "GotoStmt")]
    Goto(Goto),
    #[serde(rename = "LabelStmt")]
    Label(Label),
    #[serde(rename = "VarDeclStmt")]
    VarDecl(VarDecl),
    #[serde(rename = "AssignStmt")]
    Assign(Assign),
    /// Declarations carry their own discriminator.
    #[serde(untagged)]
    Decl(Declaration),
}

impl Statement {
    pub fn expression(expression: Expression) -> Self {
        Statement::ExprStmt(ExprStmt { expression })
    }

    pub fn block(statements: Vec<Statement>) -> Self {
        Statement::Block(Block { statements })
    }
}

// ===== Declarations =====

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    #[serde(rename = "type")]
    pub param_type: String,
    /// Empty for an unnamed parameter.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDecl {
    pub return_type: String,
    pub name: String,
    pub parameters: Vec<Parameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Vec<Statement>>,
    pub is_static: bool,
    pub is_inline: bool,
    pub is_virtual: bool,
    pub is_override: bool,
    pub is_const: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDecl {
    pub return_type: String,
    pub name: String,
    pub access: Access,
    pub parameters: Vec<Parameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Vec<Statement>>,
    pub is_virtual: bool,
    pub is_override: bool,
    pub is_const: bool,
    pub is_static: bool,
    pub is_pure_virtual: bool,
}

/// One entry of a constructor's `: a(x), Base(y)` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInit {
    pub member_name: String,
    pub is_base_class: bool,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructorDecl {
    pub name: String,
    pub access: Access,
    pub is_explicit: bool,
    pub parameters: Vec<Parameter>,
    pub initializers: Vec<MemberInit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Vec<Statement>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestructorDecl {
    pub name: String,
    pub access: Access,
    pub is_virtual: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Vec<Statement>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorDecl {
    pub return_type: String,
    /// Symbol without the `operator` keyword (`+`, `[]`, `()`, or a conversion type).
    pub operator_symbol: String,
    pub access: Access,
    pub is_const: bool,
    pub parameters: Vec<Parameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Vec<Statement>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDecl {
    pub type_name: String,
    pub name: String,
    pub access: Access,
    pub is_mutable: bool,
    pub is_static: bool,
    pub is_const: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initializer: Option<Expression>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<Option<Expression>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bit_width: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseSpecifier {
    pub name: String,
    pub access: Access,
    pub is_virtual: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDecl {
    pub name: String,
    pub bases: Vec<BaseSpecifier>,
    pub members: Vec<Declaration>,
    pub is_struct: bool,
    pub is_union: bool,
    pub is_forward: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FriendDecl {
    pub declaration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamespaceDecl {
    /// Empty for an anonymous namespace.
    pub name: String,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enumerator {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDecl {
    pub name: String,
    pub is_scoped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underlying_type: Option<String>,
    pub enumerators: Vec<Enumerator>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedefDecl {
    pub type_name: String,
    pub alias: String,
    /// Inline `struct {...}` / `enum {...}` body, when the typedef defines one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<Box<Declaration>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsingAliasDecl {
    pub type_name: String,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsingDecl {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsingNamespaceDecl {
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateParameter {
    /// `typename`, `class`, or the type of a non-type parameter.
    pub kind: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    pub is_pack: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDecl {
    pub template_parameters: Vec<TemplateParameter>,
    /// Declaration text up to the skipped body.
    pub head: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declaration: Option<Box<Declaration>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticAssertDecl {
    pub condition: Expression,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreprocessorDirective {
    pub directive: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Declaration {
    FunctionDecl(FunctionDecl),
    MethodDecl(MethodDecl),
    ConstructorDecl(ConstructorDecl),
    DestructorDecl(DestructorDecl),
    OperatorDecl(OperatorDecl),
    FieldDecl(FieldDecl),
    ClassDecl(ClassDecl),
    FriendDecl(FriendDecl),
    NamespaceDecl(NamespaceDecl),
    EnumDecl(EnumDecl),
    TypedefDecl(TypedefDecl),
    UsingAliasDecl(UsingAliasDecl),
    UsingDecl(UsingDecl),
    UsingNamespaceDecl(UsingNamespaceDecl),
    TemplateDecl(TemplateDecl),
    StaticAssertDecl(StaticAssertDecl),
    PreprocessorDirective(PreprocessorDirective),
}

impl From<Declaration> for Statement {
    fn from(decl: Declaration) -> Self {
        Statement::Decl(decl)
    }
}

/// Root of a parsed translation unit
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Program {
    pub name: String,
    pub body: Vec<Statement>,
}

impl Program {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_symbols() {
        assert_eq!(BinaryOperator::Add.symbol(), "+");
        assert_eq!(BinaryOperator::ShrAssign.symbol(), ">>=");
        assert!(BinaryOperator::ShrAssign.is_assignment());
        assert!(!BinaryOperator::Le.is_assignment());
        assert_eq!(UnaryOperator::AddrOf.symbol(), "&");
    }

    #[test]
    fn test_cast_kind_keywords() {
        assert_eq!(
            CastKind::from_keyword("dynamic_cast"),
            Some(CastKind::DynamicCast)
        );
        assert_eq!(CastKind::from_keyword("cast"), None);
    }

    #[test]
    fn test_statement_from_declaration() {
        let decl = Declaration::UsingDecl(UsingDecl {
            name: "std::cout".to_string(),
        });
        match Statement::from(decl) {
            Statement::Decl(Declaration::UsingDecl(u)) => assert_eq!(u.name, "std::cout"),
            _ => panic!("Expected using declaration"),
        }
    }
}
