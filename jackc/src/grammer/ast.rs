use crate::symbols::Scope;
use std::fmt;
use strum::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub line: usize,
}

impl Ident {
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Ident {
            name: name.into(),
            line,
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Primitive(Primitive), // "int" | "char" | "boolean" | "void"
    Class(String),        // ident
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Primitive {
    Int,
    Char,
    Boolean,
    Void,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(prim) => write!(f, "{}", prim),
            Type::Class(name) => write!(f, "{}", name),
        }
    }
}

// ----------------------------------------------------------------------------
// Declarations
// ----------------------------------------------------------------------------

/// "class" ident "{" { class-var-dec | subroutine-dec } "}"
#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: Ident,
    pub vars: Vec<ClassVarDecl>,
    pub subs: Vec<SubroutineDecl>,
    pub scope: Scope,
}

/// ( "static" | "field" ) type ident { "," ident } ";"
#[derive(Debug, Clone, PartialEq)]
pub struct ClassVarDecl {
    pub is_static: bool,
    pub ty: Type,
    pub names: Vec<Ident>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SubroutineKind {
    Constructor,
    Function,
    Method,
}

/// kind type ident "(" params ")" "{" { var-dec } { stmt } "}"
#[derive(Debug, Clone)]
pub struct SubroutineDecl {
    pub kind: SubroutineKind,
    pub ret: Type,
    pub name: Ident,
    pub params: Vec<VarDecl>,
    pub locals: Vec<VarDecl>,
    pub body: Vec<Stmt>,
    pub scope: Scope,
}

/// "var" type ident { "," ident } ";"  (a parameter is a single-name VarDecl)
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub ty: Type,
    pub names: Vec<Ident>,
}

/// Anything that declares typed names into a scope.
pub trait Declaration {
    fn ty(&self) -> &Type;
    fn names(&self) -> &[Ident];
}

impl Declaration for ClassVarDecl {
    fn ty(&self) -> &Type {
        &self.ty
    }
    fn names(&self) -> &[Ident] {
        &self.names
    }
}

impl Declaration for VarDecl {
    fn ty(&self) -> &Type {
        &self.ty
    }
    fn names(&self) -> &[Ident] {
        &self.names
    }
}

// ----------------------------------------------------------------------------
// Statements
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Let(Target, Expr), // "let" target "=" expr ";"
    If {
        line: usize,
        cond: Expr,
        then: Vec<Stmt>,
        otherwise: Option<Vec<Stmt>>,
    }, // "if" "(" expr ")" block [ "else" block ]
    While {
        line: usize,
        cond: Expr,
        body: Vec<Stmt>,
    }, // "while" "(" expr ")" block
    Do(Call),             // "do" call ";"
    Return(Option<Expr>), // "return" [ expr ] ";"
}

#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Var(Ident),              // ident
    Index(Ident, Box<Expr>), // ident "[" expr "]"
}

// ----------------------------------------------------------------------------
// Expressions
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    IntConst(u32),                         // int-const
    StringConst(String),                   // string-const
    BoolConst(bool),                       // "true" | "false"
    NullConst,                             // "null"
    ThisConst,                             // "this"
    VarRef(Ident),                         // ident
    ArrayIndex(Ident, Box<Expr>),          // ident "[" expr "]"
    BinOp(Box<Expr>, BinaryOp, Box<Expr>), // term op term
    UnOp(UnaryOp, Box<Expr>),              // ( "-" | "~" ) term
    Call(Call),                            // call
}

/// [ ident "." ] ident "(" [ expr { "," expr } ] ")"
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub target: Option<Ident>,
    pub name: Ident,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add, // "+"
    Sub, // "-"
    Mul, // "*"
    Div, // "/"
    And, // "&"
    Or,  // "|"
    Lt,  // "<"
    Gt,  // ">"
    Eq,  // "="
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg, // "-"
    Not, // "~"
}
