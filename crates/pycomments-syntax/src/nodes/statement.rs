// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use serde::Serialize;

use super::expression::{Arguments, Expr, Keyword};
use super::op::Operator;
use super::traits::{Comment, CommentSlot, Node};

/// A statement with its span.
pub type Stmt = Node<StmtKind>;

/// An entry of a `try` statement's handler list.
pub type Handler = Node<HandlerKind>;

/// A parsed source file.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Module {
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StmtKind {
    FunctionDef(FunctionDef),
    ClassDef(ClassDef),
    Return {
        value: Option<Expr>,
    },
    Delete {
        targets: Vec<Expr>,
    },
    Assign {
        targets: Vec<Expr>,
        value: Expr,
    },
    AugAssign {
        target: Expr,
        op: Operator,
        value: Expr,
    },
    AnnAssign {
        target: Expr,
        annotation: Expr,
        value: Option<Expr>,
        /// The target is a bare name, not parenthesized.
        simple: bool,
    },
    For(For),
    While(While),
    If(If),
    With(With),
    Raise {
        exc: Option<Expr>,
        cause: Option<Expr>,
    },
    Try(Try),
    Assert {
        test: Expr,
        msg: Option<Expr>,
    },
    Import {
        names: Vec<Alias>,
    },
    ImportFrom {
        module: Option<String>,
        names: Vec<Alias>,
        level: u32,
    },
    Global {
        names: Vec<String>,
    },
    Nonlocal {
        names: Vec<String>,
    },
    Expr {
        value: Expr,
    },
    Pass,
    Break,
    Continue,
    Comment(Comment),
}

impl CommentSlot for StmtKind {
    fn from_comment(comment: Comment) -> Self {
        StmtKind::Comment(comment)
    }

    fn as_comment(&self) -> Option<&Comment> {
        match self {
            StmtKind::Comment(c) => Some(c),
            _ => None,
        }
    }

    fn as_comment_mut(&mut self) -> Option<&mut Comment> {
        match self {
            StmtKind::Comment(c) => Some(c),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum HandlerKind {
    ExceptHandler(ExceptHandler),
    Comment(Comment),
}

impl CommentSlot for HandlerKind {
    fn from_comment(comment: Comment) -> Self {
        HandlerKind::Comment(comment)
    }

    fn as_comment(&self) -> Option<&Comment> {
        match self {
            HandlerKind::Comment(c) => Some(c),
            _ => None,
        }
    }

    fn as_comment_mut(&mut self) -> Option<&mut Comment> {
        match self {
            HandlerKind::Comment(c) => Some(c),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDef {
    pub name: String,
    pub args: Arguments,
    pub body: Vec<Stmt>,
    pub decorator_list: Vec<Expr>,
    pub returns: Option<Expr>,
    pub is_async: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDef {
    pub name: String,
    pub bases: Vec<Expr>,
    pub keywords: Vec<Keyword>,
    pub body: Vec<Stmt>,
    pub decorator_list: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct For {
    pub target: Expr,
    pub iter: Expr,
    pub body: Vec<Stmt>,
    pub orelse: Vec<Stmt>,
    pub is_async: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct While {
    pub test: Expr,
    pub body: Vec<Stmt>,
    pub orelse: Vec<Stmt>,
}

/// An `if` statement. `elif` branches are nested `If`s in `orelse`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct If {
    pub test: Expr,
    pub body: Vec<Stmt>,
    pub orelse: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct With {
    pub items: Vec<WithItem>,
    pub body: Vec<Stmt>,
    pub is_async: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithItem {
    pub context_expr: Expr,
    pub optional_vars: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Try {
    pub body: Vec<Stmt>,
    pub handlers: Vec<Handler>,
    pub orelse: Vec<Stmt>,
    pub finalbody: Vec<Stmt>,
    /// `except*` clauses.
    pub is_star: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExceptHandler {
    #[serde(rename = "type")]
    pub type_: Option<Expr>,
    pub name: Option<String>,
    pub body: Vec<Stmt>,
}

/// `name [as asname]` in an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alias {
    pub name: String,
    pub asname: Option<String>,
}
