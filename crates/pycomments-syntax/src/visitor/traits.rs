// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor and transformer trait definitions for tree traversal.

use crate::nodes::{Arguments, Comment, Comprehension, Expr, Handler, Module, Stmt};

/// Result of visiting a node - controls traversal behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitResult {
    /// Continue traversal into children.
    ///
    /// After visiting children, `leave_*` will be called for this node.
    #[default]
    Continue,

    /// Skip children, continue with siblings.
    ///
    /// `leave_*` is still called for this node.
    SkipChildren,

    /// Stop traversal entirely.
    ///
    /// No further `visit_*` or `leave_*` methods will be called.
    Stop,
}

/// Transform result for list contexts.
///
/// Statements and handlers live in lists, so a transformer can drop them or
/// splice in several replacements.
#[derive(Debug, Clone)]
pub enum Transform<T> {
    /// Keep the transformed node.
    Keep(T),
    /// Remove the node from the list.
    Remove,
    /// Replace the node with multiple nodes.
    Flatten(Vec<T>),
}

impl<T> Transform<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep(_))
    }

    pub fn is_remove(&self) -> bool {
        matches!(self, Self::Remove)
    }

    /// Maps the inner value using the provided function.
    pub fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> Transform<U> {
        match self {
            Transform::Keep(t) => Transform::Keep(f(t)),
            Transform::Remove => Transform::Remove,
            Transform::Flatten(v) => Transform::Flatten(v.into_iter().map(f).collect()),
        }
    }
}

impl<T> From<T> for Transform<T> {
    fn from(value: T) -> Self {
        Transform::Keep(value)
    }
}

/// Generates `visit_*` / `leave_*` pairs with default implementations.
macro_rules! visitor_methods {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident : $node_type:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Visit a [`", stringify!($node_type), "`] node.")]
                #[doc = ""]
                #[doc = "Called before descending into children."]
                #[allow(unused_variables)]
                fn [<visit_ $base_name>](&mut self, node: &$node_type) -> VisitResult {
                    VisitResult::Continue
                }

                $(#[$meta])*
                #[doc = concat!("Leave a [`", stringify!($node_type), "`] node.")]
                #[doc = ""]
                #[doc = "Called after children, even if `SkipChildren` was returned."]
                #[allow(unused_variables)]
                fn [<leave_ $base_name>](&mut self, node: &$node_type) {}
            )*
        }
    };
}

/// Generates `transform_*` methods returning [`Transform`] for list contexts.
macro_rules! transformer_list_methods {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident : $node_type:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Transform a [`", stringify!($node_type), "`] node in a list context.")]
                #[doc = ""]
                #[doc = "Called after the node's own lists were transformed."]
                #[allow(unused_variables)]
                fn [<transform_ $base_name>](&mut self, node: $node_type) -> Transform<$node_type> {
                    Transform::Keep(node)
                }
            )*
        }
    };
}

/// Read-only traversal.
///
/// - `visit_*` is called in pre-order (before children)
/// - `leave_*` is called in post-order (after children)
/// - Children are visited in source order
///
/// Comment nodes reach both `visit_stmt`/`visit_handler` and
/// `visit_comment`.
///
/// # Example
///
/// ```
/// use pycomments_syntax::visitor::{walk_module, VisitResult, Visitor};
/// use pycomments_syntax::{parse_module, Expr};
///
/// struct NameCounter {
///     count: usize,
/// }
///
/// impl Visitor for NameCounter {
///     fn visit_expr(&mut self, node: &Expr) -> VisitResult {
///         if matches!(node, Expr::Name(_)) {
///             self.count += 1;
///         }
///         VisitResult::Continue
///     }
/// }
///
/// let module = parse_module("x = y + z").unwrap();
/// let mut counter = NameCounter { count: 0 };
/// walk_module(&mut counter, &module);
/// assert_eq!(counter.count, 3);
/// ```
pub trait Visitor {
    visitor_methods! {
        module: Module,
        stmt: Stmt,
        handler: Handler,
        comment: Comment,
        expr: Expr,
        arguments: Arguments,
        comprehension: Comprehension,
    }
}

/// Structural transformation of statement lists.
///
/// The walk is bottom-up: a node's own lists are transformed before the node
/// is offered to `transform_stmt` or `transform_handler`.
pub trait Transformer {
    transformer_list_methods! {
        stmt: Stmt,
        handler: Handler,
    }

    /// Transform the module after its body was transformed.
    fn transform_module(&mut self, node: Module) -> Module {
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_map() {
        assert!(Transform::Keep(1).map(|x| x + 1).is_keep());
        assert!(Transform::<i32>::Remove.map(|x| x + 1).is_remove());
        match Transform::Flatten(vec![1, 2]).map(|x| x * 10) {
            Transform::Flatten(v) => assert_eq!(v, vec![10, 20]),
            other => panic!("unexpected {:?}", other),
        }
        assert!(Transform::from(3).is_keep());
    }

    #[test]
    fn test_visit_result_default() {
        assert_eq!(VisitResult::default(), VisitResult::Continue);
    }
}
