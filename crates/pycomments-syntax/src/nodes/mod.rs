// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The typed syntax tree.

pub mod expression;
pub mod op;
pub mod statement;
pub mod traits;

pub use expression::{Arg, Arguments, Comprehension, Constant, Expr, Keyword};
pub use op::{BoolOp, CmpOp, Operator, Precedence, UnaryOp};
pub use statement::{
    Alias, ClassDef, ExceptHandler, For, FunctionDef, Handler, HandlerKind, If, Module, Stmt,
    StmtKind, Try, While, With, WithItem,
};
pub use traits::{
    Comment, CommentSlot, ContainerAttr, ContainerMut, ContainerOwner, ContainerRef, Node, NodeId,
    NodeIdGenerator, Span,
};
