// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Collects comment nodes from a tree in traversal order.

use serde::Serialize;

use super::dispatch::walk_module;
use super::traits::{VisitResult, Visitor};
use crate::nodes::{Handler, Module, Stmt};

/// A comment node found in a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentInfo {
    pub value: String,
    pub inline: bool,
    pub line: u32,
}

#[derive(Debug, Default)]
pub struct CommentCollector {
    comments: Vec<CommentInfo>,
}

impl CommentCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// All comment nodes of `module`, in traversal order.
    pub fn collect(module: &Module) -> Vec<CommentInfo> {
        let mut collector = CommentCollector::new();
        walk_module(&mut collector, module);
        collector.comments
    }

    fn record(&mut self, comment: Option<&crate::nodes::Comment>, line: u32) {
        if let Some(comment) = comment {
            self.comments.push(CommentInfo {
                value: comment.value.clone(),
                inline: comment.inline,
                line,
            });
        }
    }
}

impl Visitor for CommentCollector {
    fn visit_stmt(&mut self, node: &Stmt) -> VisitResult {
        self.record(node.as_comment(), node.span.lineno);
        VisitResult::Continue
    }

    fn visit_handler(&mut self, node: &Handler) -> VisitResult {
        self.record(node.as_comment(), node.span.lineno);
        VisitResult::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{Comment, Span};

    #[test]
    fn test_collects_nested_comments() {
        let module = Module {
            body: vec![
                Stmt::comment(Comment::new("# a", false), Span::new(1, 0, 1, 3)),
                Stmt::new(crate::nodes::StmtKind::Pass, Span::new(2, 0, 2, 4)),
                Stmt::comment(Comment::new("# b", true), Span::new(2, 6, 2, 9)),
            ],
        };
        let comments = CommentCollector::collect(&module);
        assert_eq!(
            comments,
            vec![
                CommentInfo {
                    value: "# a".to_string(),
                    inline: false,
                    line: 1
                },
                CommentInfo {
                    value: "# b".to_string(),
                    inline: true,
                    line: 2
                },
            ]
        );
    }
}
