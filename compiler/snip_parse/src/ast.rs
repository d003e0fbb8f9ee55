//! Syntax tree for one compilation unit.
//!
//! Declarations and statements are owned trees; expressions live in a flat
//! [`ExprArena`] and are referenced by [`ExprId`].

use bitflags::bitflags;
use snip_ir::Span;
use std::fmt;

/// An identifier with its location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Ident {
            name: name.into(),
            span,
        }
    }
}

/// A parsed compilation unit.
#[derive(Clone, Debug, Default)]
pub struct CompilationUnit {
    pub usings: Vec<UsingDirective>,
    pub classes: Vec<ClassDecl>,
    pub arena: ExprArena,
}

impl CompilationUnit {
    /// Whether a `using` directive imports the namespace spelled `path`.
    pub fn imports(&self, path: &str) -> bool {
        self.usings.iter().any(|u| u.path_string() == path)
    }
}

/// `using A.B;`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UsingDirective {
    pub path: Vec<Ident>,
    pub span: Span,
}

impl UsingDirective {
    /// Dotted namespace path.
    pub fn path_string(&self) -> String {
        let parts: Vec<&str> = self.path.iter().map(|i| i.name.as_str()).collect();
        parts.join(".")
    }
}

bitflags! {
    /// Declaration modifiers.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const PUBLIC = 1 << 0;
        const PRIVATE = 1 << 1;
        const INTERNAL = 1 << 2;
        const PROTECTED = 1 << 3;
        const STATIC = 1 << 4;
    }
}

#[derive(Clone, Debug)]
pub struct ClassDecl {
    pub modifiers: Modifiers,
    pub name: Ident,
    pub methods: Vec<MethodDecl>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct MethodDecl {
    pub modifiers: Modifiers,
    pub return_type: TypeRef,
    pub name: Ident,
    pub params: Vec<Param>,
    pub body: Block,
    pub span: Span,
}

impl MethodDecl {
    #[inline]
    pub fn is_public(&self) -> bool {
        self.modifiers.contains(Modifiers::PUBLIC)
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(Modifiers::STATIC)
    }
}

#[derive(Clone, Debug)]
pub struct Param {
    pub ty: TypeRef,
    pub name: Ident,
}

/// Built-in type keywords.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PredefinedType {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
    String,
    Object,
}

impl PredefinedType {
    pub fn keyword(self) -> &'static str {
        match self {
            PredefinedType::Bool => "bool",
            PredefinedType::Byte => "byte",
            PredefinedType::Short => "short",
            PredefinedType::Int => "int",
            PredefinedType::Long => "long",
            PredefinedType::Float => "float",
            PredefinedType::Double => "double",
            PredefinedType::Char => "char",
            PredefinedType::String => "string",
            PredefinedType::Object => "object",
        }
    }
}

/// A type as written in source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeRef {
    pub kind: TypeRefKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeRefKind {
    Void,
    Predefined(PredefinedType),
    /// A possibly qualified name: `Exception`, `System.Int32`.
    Named(Vec<Ident>),
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeRefKind::Void => f.write_str("void"),
            TypeRefKind::Predefined(p) => f.write_str(p.keyword()),
            TypeRefKind::Named(parts) => {
                let parts: Vec<&str> = parts.iter().map(|i| i.name.as_str()).collect();
                f.write_str(&parts.join("."))
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum StmtKind {
    Block(Block),
    Empty,
    Local(LocalDecl),
    Expr(ExprId),
    If {
        cond: ExprId,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: ExprId,
        body: Box<Stmt>,
    },
    DoWhile {
        body: Box<Stmt>,
        cond: ExprId,
    },
    For {
        init: Option<ForInit>,
        cond: Option<ExprId>,
        step: Vec<ExprId>,
        body: Box<Stmt>,
    },
    Return(Option<ExprId>),
    Throw(ExprId),
    Break,
    Continue,
}

/// `int a = 1, b;` or `var x = ...;`
#[derive(Clone, Debug)]
pub struct LocalDecl {
    /// `None` for `var`.
    pub ty: Option<TypeRef>,
    pub declarators: Vec<Declarator>,
}

#[derive(Clone, Debug)]
pub struct Declarator {
    pub name: Ident,
    pub init: Option<ExprId>,
}

#[derive(Clone, Debug)]
pub enum ForInit {
    Local(LocalDecl),
    Exprs(Vec<ExprId>),
}

/// Index into an [`ExprArena`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Flat storage for expressions.
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    exprs: Vec<Expr>,
}

impl ExprArena {
    pub fn new() -> Self {
        ExprArena::default()
    }

    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId(u32::try_from(self.exprs.len()).unwrap_or(u32::MAX));
        self.exprs.push(expr);
        id
    }

    #[inline]
    pub fn get_expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Int { value: u64, long: bool },
    Real { value: f64, single: bool },
    Str(String),
    Char(char),
    Bool(bool),
    Null,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    /// A simple name: local, parameter, method or type.
    Name(String),
    /// A predefined type used as an expression receiver (`int.Parse`).
    TypeKeyword(PredefinedType),
    Member {
        receiver: ExprId,
        name: Ident,
    },
    Call {
        callee: ExprId,
        args: Vec<ExprId>,
    },
    Index {
        receiver: ExprId,
        index: ExprId,
    },
    New {
        ty: TypeRef,
        args: Vec<ExprId>,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    /// `target = value`, or a compound form when `op` is set.
    Assign {
        op: Option<BinaryOp>,
        target: ExprId,
        value: ExprId,
    },
    IncDec {
        target: ExprId,
        increment: bool,
        prefix: bool,
    },
    Conditional {
        cond: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
    },
    Cast {
        ty: TypeRef,
        operand: ExprId,
    },
    /// Placeholder after a reported syntax error.
    Error,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
    BitNot,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Eq,
    NotEq,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Lt
                | BinaryOp::LtEq
                | BinaryOp::Gt
                | BinaryOp::GtEq
                | BinaryOp::Eq
                | BinaryOp::NotEq
        )
    }
}
