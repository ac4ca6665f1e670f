// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Core traits and types for tree nodes.
//!
//! # Node Identity
//!
//! [`NodeId`] identifies a container-owning node (the module, every statement
//! and every exception handler) by its position in a pre-order walk over
//! container attributes. Identity is stable as long as the statement lists are
//! not modified, which lets a pass compute decisions read-only and apply them
//! in a second, mutating pass.
//!
//! ```text
//! Given code:
//!     if a:
//!         b
//!     else:
//!         c
//! NodeId assignment order:
//!   NodeId(0) -> Module
//!   NodeId(1) -> If
//!   NodeId(2) -> Expr "b"
//!   NodeId(3) -> Expr "c"
//! ```
//!
//! # Containers
//!
//! Statement lists a node owns are addressed by [`ContainerAttr`]. Every node
//! kind declares its attributes through [`ContainerOwner::container_attrs`], a
//! fixed dispatch table, so generic passes never look fields up by name.

use std::fmt;

use serde::Serialize;

use super::statement::{Handler, HandlerKind, Module, Stmt, StmtKind};

// ============================================================================
// Node Identity
// ============================================================================

/// A stable identifier for a container-owning node, assigned in pre-order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId with the given value.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Generator for assigning sequential [`NodeId`]s.
#[derive(Debug, Default)]
pub struct NodeIdGenerator {
    next_id: u32,
}

impl NodeIdGenerator {
    /// Create a new generator starting from NodeId(0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the next NodeId.
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Get the current count of generated NodeIds.
    pub fn count(&self) -> u32 {
        self.next_id
    }
}

// ============================================================================
// Spans
// ============================================================================

/// Source extent of a statement-like node.
///
/// Lines are 1-indexed, columns are 0-indexed byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    pub lineno: u32,
    pub col_offset: u32,
    pub end_lineno: u32,
    pub end_col_offset: u32,
}

impl Span {
    pub fn new(lineno: u32, col_offset: u32, end_lineno: u32, end_col_offset: u32) -> Self {
        Span {
            lineno,
            col_offset,
            end_lineno,
            end_col_offset,
        }
    }

    /// Whether `line` falls within `lineno..=end_lineno`.
    pub fn contains_line(&self, line: u32) -> bool {
        self.lineno <= line && line <= self.end_lineno
    }
}

// ============================================================================
// Nodes and Comments
// ============================================================================

/// A comment token turned into a tree node.
///
/// `value` is the raw comment text including the leading `#`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub value: String,
    /// Code precedes the comment on its line.
    pub inline: bool,
}

impl Comment {
    pub fn new(value: impl Into<String>, inline: bool) -> Self {
        Comment {
            value: value.into(),
            inline,
        }
    }
}

/// A node kind that can hold a [`Comment`] in place of a regular node.
///
/// Both statement lists and handler lists accept comments, which is what
/// lets comment placement treat every container uniformly.
pub trait CommentSlot: Sized {
    fn from_comment(comment: Comment) -> Self;
    fn as_comment(&self) -> Option<&Comment>;
    fn as_comment_mut(&mut self) -> Option<&mut Comment>;
}

/// A positioned node: a kind plus its span and attached comment texts.
///
/// `comments` is only populated by attached-mode parsing; it is empty
/// otherwise and then omitted from serialized output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node<K> {
    pub kind: K,
    pub span: Span,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
}

impl<K> Node<K> {
    pub fn new(kind: K, span: Span) -> Self {
        Node {
            kind,
            span,
            comments: Vec::new(),
        }
    }
}

impl<K: CommentSlot> Node<K> {
    /// Build a comment node spanning the comment token.
    pub fn comment(comment: Comment, span: Span) -> Self {
        Node::new(K::from_comment(comment), span)
    }

    pub fn is_comment(&self) -> bool {
        self.kind.as_comment().is_some()
    }

    pub fn as_comment(&self) -> Option<&Comment> {
        self.kind.as_comment()
    }

    pub fn as_comment_mut(&mut self) -> Option<&mut Comment> {
        self.kind.as_comment_mut()
    }
}

// ============================================================================
// Containers
// ============================================================================

/// Names of the statement-list attributes a node may own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerAttr {
    Body,
    Handlers,
    Orelse,
    Finalbody,
}

impl ContainerAttr {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerAttr::Body => "body",
            ContainerAttr::Handlers => "handlers",
            ContainerAttr::Orelse => "orelse",
            ContainerAttr::Finalbody => "finalbody",
        }
    }
}

impl fmt::Display for ContainerAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared view of one container.
#[derive(Debug, Clone, Copy)]
pub enum ContainerRef<'a> {
    Stmts(&'a [Stmt]),
    Handlers(&'a [Handler]),
}

impl ContainerRef<'_> {
    pub fn len(&self) -> usize {
        match self {
            ContainerRef::Stmts(items) => items.len(),
            ContainerRef::Handlers(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Spans of the items, in list order.
    pub fn spans(&self) -> Vec<Span> {
        match self {
            ContainerRef::Stmts(items) => items.iter().map(|s| s.span).collect(),
            ContainerRef::Handlers(items) => items.iter().map(|h| h.span).collect(),
        }
    }
}

/// Exclusive view of one container.
#[derive(Debug)]
pub enum ContainerMut<'a> {
    Stmts(&'a mut Vec<Stmt>),
    Handlers(&'a mut Vec<Handler>),
}

impl ContainerMut<'_> {
    /// The items as mutable container owners, in list order.
    pub fn owners_mut(&mut self) -> Vec<&mut dyn ContainerOwner> {
        match self {
            ContainerMut::Stmts(items) => items
                .iter_mut()
                .map(|s| s as &mut dyn ContainerOwner)
                .collect(),
            ContainerMut::Handlers(items) => items
                .iter_mut()
                .map(|h| h as &mut dyn ContainerOwner)
                .collect(),
        }
    }

    /// Append a comment node.
    pub fn push_comment(&mut self, comment: Comment, span: Span) {
        match self {
            ContainerMut::Stmts(items) => items.push(Stmt::comment(comment, span)),
            ContainerMut::Handlers(items) => items.push(Handler::comment(comment, span)),
        }
    }

    /// Stable-sort by `(end_lineno, is_comment)` so a comment sorts after code
    /// ending on the same line.
    pub fn sort_by_end_line(&mut self) {
        match self {
            ContainerMut::Stmts(items) => {
                items.sort_by_key(|s| (s.span.end_lineno, s.is_comment()))
            }
            ContainerMut::Handlers(items) => {
                items.sort_by_key(|h| (h.span.end_lineno, h.is_comment()))
            }
        }
    }

    /// Of two adjacent comments, the later one is never inline.
    pub fn repair_inline_adjacency(&mut self) {
        fn repair<K: CommentSlot>(items: &mut [Node<K>]) {
            for i in 1..items.len() {
                if items[i - 1].is_comment() {
                    if let Some(comment) = items[i].as_comment_mut() {
                        comment.inline = false;
                    }
                }
            }
        }
        match self {
            ContainerMut::Stmts(items) => repair(items),
            ContainerMut::Handlers(items) => repair(items),
        }
    }

    /// Drop every comment node.
    pub fn retain_code(&mut self) {
        match self {
            ContainerMut::Stmts(items) => items.retain(|s| !s.is_comment()),
            ContainerMut::Handlers(items) => items.retain(|h| !h.is_comment()),
        }
    }
}

/// A node that owns statement lists.
pub trait ContainerOwner {
    /// The container attributes this node kind declares, in fixed order.
    fn container_attrs(&self) -> &'static [ContainerAttr];

    fn container(&self, attr: ContainerAttr) -> Option<ContainerRef<'_>>;

    fn container_mut(&mut self, attr: ContainerAttr) -> Option<ContainerMut<'_>>;

    /// The node's own span; `None` for the module.
    fn span(&self) -> Option<Span>;

    /// Widen the node's line range. Columns are left alone.
    fn set_lines(&mut self, lineno: u32, end_lineno: u32);

    /// Comment texts attached in attached mode.
    fn attached_comments_mut(&mut self) -> Option<&mut Vec<String>>;
}

const NO_ATTRS: &[ContainerAttr] = &[];
const BODY: &[ContainerAttr] = &[ContainerAttr::Body];
const BODY_ORELSE: &[ContainerAttr] = &[ContainerAttr::Body, ContainerAttr::Orelse];
const TRY_ATTRS: &[ContainerAttr] = &[
    ContainerAttr::Body,
    ContainerAttr::Handlers,
    ContainerAttr::Orelse,
    ContainerAttr::Finalbody,
];

impl ContainerOwner for Module {
    fn container_attrs(&self) -> &'static [ContainerAttr] {
        BODY
    }

    fn container(&self, attr: ContainerAttr) -> Option<ContainerRef<'_>> {
        match attr {
            ContainerAttr::Body => Some(ContainerRef::Stmts(&self.body)),
            _ => None,
        }
    }

    fn container_mut(&mut self, attr: ContainerAttr) -> Option<ContainerMut<'_>> {
        match attr {
            ContainerAttr::Body => Some(ContainerMut::Stmts(&mut self.body)),
            _ => None,
        }
    }

    fn span(&self) -> Option<Span> {
        None
    }

    fn set_lines(&mut self, _lineno: u32, _end_lineno: u32) {}

    fn attached_comments_mut(&mut self) -> Option<&mut Vec<String>> {
        None
    }
}

impl ContainerOwner for Stmt {
    fn container_attrs(&self) -> &'static [ContainerAttr] {
        match &self.kind {
            StmtKind::FunctionDef(_) | StmtKind::ClassDef(_) | StmtKind::With(_) => BODY,
            StmtKind::For(_) | StmtKind::While(_) | StmtKind::If(_) => BODY_ORELSE,
            StmtKind::Try(_) => TRY_ATTRS,
            _ => NO_ATTRS,
        }
    }

    fn container(&self, attr: ContainerAttr) -> Option<ContainerRef<'_>> {
        use ContainerAttr::*;
        let stmts = match (&self.kind, attr) {
            (StmtKind::FunctionDef(f), Body) => &f.body,
            (StmtKind::ClassDef(c), Body) => &c.body,
            (StmtKind::With(w), Body) => &w.body,
            (StmtKind::For(f), Body) => &f.body,
            (StmtKind::For(f), Orelse) => &f.orelse,
            (StmtKind::While(w), Body) => &w.body,
            (StmtKind::While(w), Orelse) => &w.orelse,
            (StmtKind::If(i), Body) => &i.body,
            (StmtKind::If(i), Orelse) => &i.orelse,
            (StmtKind::Try(t), Body) => &t.body,
            (StmtKind::Try(t), Handlers) => return Some(ContainerRef::Handlers(&t.handlers)),
            (StmtKind::Try(t), Orelse) => &t.orelse,
            (StmtKind::Try(t), Finalbody) => &t.finalbody,
            _ => return None,
        };
        Some(ContainerRef::Stmts(stmts))
    }

    fn container_mut(&mut self, attr: ContainerAttr) -> Option<ContainerMut<'_>> {
        use ContainerAttr::*;
        let stmts = match (&mut self.kind, attr) {
            (StmtKind::FunctionDef(f), Body) => &mut f.body,
            (StmtKind::ClassDef(c), Body) => &mut c.body,
            (StmtKind::With(w), Body) => &mut w.body,
            (StmtKind::For(f), Body) => &mut f.body,
            (StmtKind::For(f), Orelse) => &mut f.orelse,
            (StmtKind::While(w), Body) => &mut w.body,
            (StmtKind::While(w), Orelse) => &mut w.orelse,
            (StmtKind::If(i), Body) => &mut i.body,
            (StmtKind::If(i), Orelse) => &mut i.orelse,
            (StmtKind::Try(t), Body) => &mut t.body,
            (StmtKind::Try(t), Handlers) => {
                return Some(ContainerMut::Handlers(&mut t.handlers))
            }
            (StmtKind::Try(t), Orelse) => &mut t.orelse,
            (StmtKind::Try(t), Finalbody) => &mut t.finalbody,
            _ => return None,
        };
        Some(ContainerMut::Stmts(stmts))
    }

    fn span(&self) -> Option<Span> {
        Some(self.span)
    }

    fn set_lines(&mut self, lineno: u32, end_lineno: u32) {
        self.span.lineno = lineno;
        self.span.end_lineno = end_lineno;
    }

    fn attached_comments_mut(&mut self) -> Option<&mut Vec<String>> {
        Some(&mut self.comments)
    }
}

impl ContainerOwner for Handler {
    fn container_attrs(&self) -> &'static [ContainerAttr] {
        match &self.kind {
            HandlerKind::ExceptHandler(_) => BODY,
            HandlerKind::Comment(_) => NO_ATTRS,
        }
    }

    fn container(&self, attr: ContainerAttr) -> Option<ContainerRef<'_>> {
        match (&self.kind, attr) {
            (HandlerKind::ExceptHandler(h), ContainerAttr::Body) => {
                Some(ContainerRef::Stmts(&h.body))
            }
            _ => None,
        }
    }

    fn container_mut(&mut self, attr: ContainerAttr) -> Option<ContainerMut<'_>> {
        match (&mut self.kind, attr) {
            (HandlerKind::ExceptHandler(h), ContainerAttr::Body) => {
                Some(ContainerMut::Stmts(&mut h.body))
            }
            _ => None,
        }
    }

    fn span(&self) -> Option<Span> {
        Some(self.span)
    }

    fn set_lines(&mut self, lineno: u32, end_lineno: u32) {
        self.span.lineno = lineno;
        self.span.end_lineno = end_lineno;
    }

    fn attached_comments_mut(&mut self) -> Option<&mut Vec<String>> {
        Some(&mut self.comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{Expr, If};

    fn stmt(kind: StmtKind, line: u32) -> Stmt {
        Stmt::new(kind, Span::new(line, 0, line, 4))
    }

    #[test]
    fn container_attrs_follow_node_kind() {
        let pass = stmt(StmtKind::Pass, 1);
        assert!(pass.container_attrs().is_empty());

        let if_stmt = stmt(
            StmtKind::If(If {
                test: Expr::Name("a".to_string()),
                body: vec![stmt(StmtKind::Pass, 2)],
                orelse: vec![],
            }),
            1,
        );
        assert_eq!(
            if_stmt.container_attrs(),
            &[ContainerAttr::Body, ContainerAttr::Orelse]
        );
        assert_eq!(if_stmt.container(ContainerAttr::Body).map(|c| c.len()), Some(1));
        assert!(if_stmt.container(ContainerAttr::Handlers).is_none());
    }

    #[test]
    fn sort_places_comments_after_code_on_same_line() {
        let mut body = vec![stmt(StmtKind::Pass, 1), stmt(StmtKind::Break, 3)];
        let mut container = ContainerMut::Stmts(&mut body);
        container.push_comment(Comment::new("# two", false), Span::new(2, 0, 2, 5));
        container.push_comment(Comment::new("# one", true), Span::new(1, 6, 1, 11));
        container.sort_by_end_line();

        let lines: Vec<_> = body.iter().map(|s| (s.span.lineno, s.is_comment())).collect();
        assert_eq!(lines, vec![(1, false), (1, true), (2, true), (3, false)]);
    }

    #[test]
    fn adjacent_comments_lose_inline_flag() {
        let mut body = vec![
            Stmt::comment(Comment::new("# a", true), Span::new(1, 0, 1, 3)),
            Stmt::comment(Comment::new("# b", true), Span::new(1, 0, 1, 3)),
            stmt(StmtKind::Pass, 2),
            Stmt::comment(Comment::new("# c", true), Span::new(2, 6, 2, 9)),
        ];
        ContainerMut::Stmts(&mut body).repair_inline_adjacency();
        let flags: Vec<_> = body
            .iter()
            .filter_map(|s| s.as_comment().map(|c| c.inline))
            .collect();
        assert_eq!(flags, vec![true, false, true]);
    }

    #[test]
    fn node_id_generator_counts_up() {
        let mut ids = NodeIdGenerator::new();
        assert_eq!(ids.next_id(), NodeId(0));
        assert_eq!(ids.next_id(), NodeId(1));
        assert_eq!(ids.count(), 2);
        assert_eq!(NodeId::new(7).to_string(), "NodeId(7)");
    }
}
