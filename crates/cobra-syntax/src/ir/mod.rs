//! Syntax tree produced by the reader and consumed by the writer.
//!
//! The tree is strict: every node owns its children. Number and string
//! literals keep their source text verbatim so the writer never reformats
//! them.

mod structure_eq;

pub use structure_eq::StructureEq;

use serde::Serialize;

/// A whole compilation unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub body: Vec<Stmt>,
}

impl Program {
    pub fn new(body: Vec<Stmt>) -> Self {
        Self { body }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stmt {
    /// `target = value`
    Assign {
        target: String,
        value: Expr,
    },
    /// `a = b = ... = value`, kept as one chain.
    MultiAssign {
        targets: Vec<String>,
        value: Expr,
    },
    Function(Function),
    Return {
        value: Option<Expr>,
    },
    If(IfChain),
    Expr {
        expr: Expr,
    },
}

impl Stmt {
    pub fn assign(target: impl Into<String>, value: Expr) -> Self {
        Stmt::Assign {
            target: target.into(),
            value,
        }
    }

    pub fn multi_assign(targets: Vec<String>, value: Expr) -> Self {
        Stmt::MultiAssign { targets, value }
    }

    pub fn return_stmt(value: Option<Expr>) -> Self {
        Stmt::Return { value }
    }

    pub fn expr(expr: Expr) -> Self {
        Stmt::Expr { expr }
    }
}

/// `def name(params): body`
///
/// The name is bound in the enclosing scope, not in `body`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
}

impl Function {
    pub fn new(name: impl Into<String>, params: Vec<String>, body: Vec<Stmt>) -> Self {
        Self {
            name: name.into(),
            params,
            body,
        }
    }
}

/// An `if` followed by any number of `elif` branches and an optional `else`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfChain {
    /// Never empty; the first entry is the `if` itself.
    pub branches: Vec<Branch>,
    pub orelse: Option<Vec<Stmt>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Branch {
    pub test: Expr,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    Ident {
        name: String,
    },
    /// Source text of the literal, e.g. `2.2`.
    Number {
        text: String,
    },
    /// Source text of the literal including its quotes.
    String {
        text: String,
    },
    None,
    Bool {
        value: bool,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Attribute {
        object: Box<Expr>,
        name: String,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Lambda {
        params: Vec<String>,
        body: Box<Expr>,
    },
    List {
        items: Vec<Expr>,
    },
    Dict {
        entries: Vec<(Expr, Expr)>,
    },
    /// One explicit pair of source parentheses.
    Grouped {
        inner: Box<Expr>,
    },
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident { name: name.into() }
    }

    pub fn number(text: impl Into<String>) -> Self {
        Expr::Number { text: text.into() }
    }

    pub fn string(text: impl Into<String>) -> Self {
        Expr::String { text: text.into() }
    }

    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn attribute(object: Expr, name: impl Into<String>) -> Self {
        Expr::Attribute {
            object: Box::new(object),
            name: name.into(),
        }
    }

    pub fn grouped(inner: Expr) -> Self {
        Expr::Grouped {
            inner: Box::new(inner),
        }
    }

    pub fn lambda(params: Vec<String>, body: Expr) -> Self {
        Expr::Lambda {
            params,
            body: Box::new(body),
        }
    }

    /// Strip any number of `Grouped` wrappers.
    pub fn ungrouped(&self) -> &Expr {
        let mut expr = self;
        while let Expr::Grouped { inner } = expr {
            expr = inner;
        }
        expr
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    /// `is`
    Is,
    /// `is not`
    IsNot,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Neg,
    Not,
}
