// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Pre-order spans of statement-like nodes.
//!
//! [`SpanCollector`] records every statement and exception handler that is
//! not a comment, in pre-order, with its nesting depth. The index of an entry
//! is stable across a second pre-order walk over the same tree, which lets
//! callers decide on the collected spans and apply results by index.

use super::dispatch::walk_module;
use super::traits::{VisitResult, Visitor};
use crate::nodes::{Handler, Module, Span, Stmt};

/// A statement-like node's span and nesting depth (0 for module level).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementSpan {
    pub span: Span,
    pub depth: u32,
}

#[derive(Debug, Default)]
pub struct SpanCollector {
    spans: Vec<StatementSpan>,
    depth: u32,
}

impl SpanCollector {
    pub fn collect(module: &Module) -> Vec<StatementSpan> {
        let mut collector = SpanCollector::default();
        walk_module(&mut collector, module);
        collector.spans
    }

    fn enter(&mut self, span: Span) {
        self.spans.push(StatementSpan {
            span,
            depth: self.depth,
        });
        self.depth += 1;
    }
}

impl Visitor for SpanCollector {
    fn visit_stmt(&mut self, node: &Stmt) -> VisitResult {
        if node.is_comment() {
            return VisitResult::SkipChildren;
        }
        self.enter(node.span);
        VisitResult::Continue
    }

    fn leave_stmt(&mut self, node: &Stmt) {
        if !node.is_comment() {
            self.depth -= 1;
        }
    }

    fn visit_handler(&mut self, node: &Handler) -> VisitResult {
        if node.is_comment() {
            return VisitResult::SkipChildren;
        }
        self.enter(node.span);
        VisitResult::Continue
    }

    fn leave_handler(&mut self, node: &Handler) {
        if !node.is_comment() {
            self.depth -= 1;
        }
    }

    fn visit_expr(&mut self, _node: &crate::nodes::Expr) -> VisitResult {
        VisitResult::SkipChildren
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_module;

    #[test]
    fn test_pre_order_with_depth() {
        let module =
            parse_module("def f():\n    if a:\n        b\n    c\ntry:\n    d\nexcept:\n    e")
                .expect("parse error");
        let entries: Vec<(u32, u32)> = SpanCollector::collect(&module)
            .iter()
            .map(|s| (s.span.lineno, s.depth))
            .collect();
        assert_eq!(
            entries,
            vec![(1, 0), (2, 1), (3, 2), (4, 1), (5, 0), (6, 1), (7, 1), (8, 2)]
        );
    }
}
