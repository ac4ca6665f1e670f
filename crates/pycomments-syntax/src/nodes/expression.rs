// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Expression nodes.
//!
//! Expressions carry no positions: comment placement works on statement
//! lines only. Literals keep their source text so regenerated code spells
//! them the same way.

use serde::Serialize;

use super::op::{BoolOp, CmpOp, Operator, UnaryOp};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    BoolOp {
        op: BoolOp,
        values: Vec<Expr>,
    },
    NamedExpr {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    BinOp {
        left: Box<Expr>,
        op: Operator,
        right: Box<Expr>,
    },
    UnaryOp {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Lambda {
        args: Box<Arguments>,
        body: Box<Expr>,
    },
    IfExp {
        test: Box<Expr>,
        body: Box<Expr>,
        orelse: Box<Expr>,
    },
    Dict {
        /// `None` marks a `**mapping` entry.
        keys: Vec<Option<Expr>>,
        values: Vec<Expr>,
    },
    Set(Vec<Expr>),
    ListComp {
        elt: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    SetComp {
        elt: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    DictComp {
        key: Box<Expr>,
        value: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    GeneratorExp {
        elt: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    Await(Box<Expr>),
    Yield(Option<Box<Expr>>),
    YieldFrom(Box<Expr>),
    Compare {
        left: Box<Expr>,
        ops: Vec<CmpOp>,
        comparators: Vec<Expr>,
    },
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        keywords: Vec<Keyword>,
    },
    Constant(Constant),
    Attribute {
        value: Box<Expr>,
        attr: String,
    },
    Subscript {
        value: Box<Expr>,
        slice: Box<Expr>,
    },
    Starred(Box<Expr>),
    Name(String),
    List(Vec<Expr>),
    Tuple(Vec<Expr>),
    Slice {
        lower: Option<Box<Expr>>,
        upper: Option<Box<Expr>>,
        step: Option<Box<Expr>>,
    },
}

impl Expr {
    pub fn name(id: impl Into<String>) -> Self {
        Expr::Name(id.into())
    }

    /// Whether this expression may appear as an assignment target.
    pub fn is_assignable(&self) -> bool {
        match self {
            Expr::Name(_) | Expr::Attribute { .. } | Expr::Subscript { .. } => true,
            Expr::Starred(inner) => inner.is_assignable(),
            Expr::Tuple(elts) | Expr::List(elts) => elts.iter().all(Expr::is_assignable),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Constant {
    None,
    True,
    False,
    Ellipsis,
    /// Numeric literal as written.
    Num(String),
    /// String literal pieces as written, prefix and quotes included.
    /// Adjacent literals are implicitly concatenated.
    Str(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comprehension {
    pub target: Expr,
    pub iter: Expr,
    pub ifs: Vec<Expr>,
    pub is_async: bool,
}

/// A keyword argument in a call or class definition; `arg` is `None` for
/// `**kwargs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyword {
    pub arg: Option<String>,
    pub value: Expr,
}

/// A parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arg {
    pub arg: String,
    pub annotation: Option<Expr>,
}

impl Arg {
    pub fn new(arg: impl Into<String>) -> Self {
        Arg {
            arg: arg.into(),
            annotation: None,
        }
    }
}

/// A parameter list.
///
/// `defaults` belong to the trailing parameters of `posonlyargs + args`;
/// `kw_defaults` is parallel to `kwonlyargs`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Arguments {
    pub posonlyargs: Vec<Arg>,
    pub args: Vec<Arg>,
    pub vararg: Option<Arg>,
    pub kwonlyargs: Vec<Arg>,
    pub kw_defaults: Vec<Option<Expr>>,
    pub kwarg: Option<Arg>,
    pub defaults: Vec<Expr>,
}

impl Arguments {
    pub fn is_empty(&self) -> bool {
        self.posonlyargs.is_empty()
            && self.args.is_empty()
            && self.vararg.is_none()
            && self.kwonlyargs.is_empty()
            && self.kwarg.is_none()
    }
}
