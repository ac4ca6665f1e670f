//! Positional placement: comment nodes inserted into statement lists.
//!
//! Targets are resolved against the [`IntervalIndex`] first. A second
//! pre-order walk then inserts every comment into its container, matching
//! owners by [`NodeId`].

use std::collections::HashMap;

use pycomments_syntax::{
    ContainerAttr, ContainerMut, ContainerOwner, Module, NodeId, NodeIdGenerator,
};
use tracing::debug;

use super::extract::CommentRecord;
use super::intervals::IntervalIndex;

/// The container a comment goes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    pub owner: NodeId,
    pub attr: ContainerAttr,
}

impl Target {
    /// The module body. The module is always the first node of the walk.
    pub const MODULE_BODY: Target = Target {
        owner: NodeId(0),
        attr: ContainerAttr::Body,
    };
}

/// Find the container for a comment on `line`.
pub fn resolve_target(index: &IntervalIndex, line: u32) -> Target {
    let Some((_, entry)) = index.innermost(line) else {
        return Target::MODULE_BODY;
    };
    let sub = entry
        .attrs
        .iter()
        .find(|sub| sub.contains(line))
        .or_else(|| entry.attrs.iter().find(|sub| sub.low > line))
        .or_else(|| entry.attrs.last());
    match sub {
        Some(sub) => Target {
            owner: entry.owner,
            attr: sub.attr,
        },
        None => Target::MODULE_BODY,
    }
}

/// Insert `comments` into the containers the index assigns them to.
///
/// Each touched container is re-sorted by end line, with a comment after
/// code ending on the same line, and a comment directly following another
/// comment loses its inline flag.
pub fn place_comments(module: &mut Module, comments: &[CommentRecord], index: &IntervalIndex) {
    let mut pending: HashMap<NodeId, Vec<(ContainerAttr, &CommentRecord)>> = HashMap::new();
    for comment in comments {
        let target = resolve_target(index, comment.line());
        debug!(
            line = comment.line(),
            owner = %target.owner,
            attr = %target.attr,
            inline = comment.inline,
            "placing comment"
        );
        pending
            .entry(target.owner)
            .or_default()
            .push((target.attr, comment));
    }

    let mut ids = NodeIdGenerator::new();
    let mut orphans = Vec::new();
    insert_pending(module, &mut ids, &mut pending, &mut orphans);

    if !orphans.is_empty() {
        debug!(count = orphans.len(), "container missing, using module body");
        let mut body = ContainerMut::Stmts(&mut module.body);
        for comment in orphans {
            body.push_comment(comment.to_comment(), comment.span);
        }
        body.sort_by_end_line();
        body.repair_inline_adjacency();
    }
}

fn insert_pending<'c>(
    node: &mut dyn ContainerOwner,
    ids: &mut NodeIdGenerator,
    pending: &mut HashMap<NodeId, Vec<(ContainerAttr, &'c CommentRecord)>>,
    orphans: &mut Vec<&'c CommentRecord>,
) {
    let id = ids.next_id();

    // Children first, so they get the ids they had while indexing.
    for &attr in node.container_attrs() {
        if let Some(mut container) = node.container_mut(attr) {
            for child in container.owners_mut() {
                insert_pending(child, ids, pending, orphans);
            }
        }
    }

    let Some(items) = pending.remove(&id) else {
        return;
    };
    for &attr in node.container_attrs() {
        let mut group = items.iter().filter(|(a, _)| *a == attr).peekable();
        if group.peek().is_none() {
            continue;
        }
        if let Some(mut container) = node.container_mut(attr) {
            for (_, comment) in group {
                container.push_comment(comment.to_comment(), comment.span);
            }
            container.sort_by_end_line();
            container.repair_inline_adjacency();
        }
    }
    orphans.extend(
        items
            .iter()
            .filter(|(attr, _)| !node.container_attrs().contains(attr))
            .map(|(_, comment)| *comment),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::extract::extract_comments;
    use pycomments_core::text::SourceLines;
    use pycomments_syntax::parse_module;

    fn targets(source: &str) -> Vec<(u32, Target)> {
        let mut module = parse_module(source).expect("parse error");
        let index = IntervalIndex::build(&mut module, &SourceLines::new(source));
        extract_comments(source)
            .expect("tokenize error")
            .iter()
            .map(|c| (c.line(), resolve_target(&index, c.line())))
            .collect()
    }

    fn target(owner: u32, attr: ContainerAttr) -> Target {
        Target {
            owner: NodeId(owner),
            attr,
        }
    }

    #[test]
    fn unindexed_comment_goes_to_module_body() {
        assert_eq!(targets("# only"), vec![(1, Target::MODULE_BODY)]);
    }

    #[test]
    fn comment_before_block_targets_that_block() {
        let source = "for i in x:  # header\n    a\nelse:  # else header\n    b";
        // module 0, for 1
        assert_eq!(
            targets(source),
            vec![
                (1, target(1, ContainerAttr::Body)),
                (3, target(1, ContainerAttr::Orelse)),
            ]
        );
    }

    #[test]
    fn comment_between_try_clauses() {
        let source = "try:\n    a\n# before handlers\nexcept E:\n    b\n# before finally\nfinally:\n    c";
        // module 0, try 1, a 2, handler 3
        assert_eq!(
            targets(source),
            vec![
                (3, target(1, ContainerAttr::Handlers)),
                (6, target(1, ContainerAttr::Finalbody)),
            ]
        );
    }

    #[test]
    fn indented_trailing_comment_stays_in_block() {
        let source = "if a:\n    b\n\n    # deep trailing\n";
        assert_eq!(targets(source), vec![(4, target(1, ContainerAttr::Body))]);
    }

    #[test]
    fn placement_sorts_and_repairs_adjacency() {
        let source = "x = 1  # one\n# two\ny = 2";
        let mut module = parse_module(source).expect("parse error");
        let index = IntervalIndex::build(&mut module, &SourceLines::new(source));
        let comments = extract_comments(source).expect("tokenize error");
        place_comments(&mut module, &comments, &index);

        let shape: Vec<(u32, Option<bool>)> = module
            .body
            .iter()
            .map(|s| (s.span.lineno, s.as_comment().map(|c| c.inline)))
            .collect();
        assert_eq!(
            shape,
            vec![(1, None), (1, Some(true)), (2, Some(false)), (3, None)]
        );
    }
}
