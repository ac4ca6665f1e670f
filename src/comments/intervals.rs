//! Interval index over container-owning nodes.
//!
//! Parser spans stop at the last token of a block, so comments trailing a
//! block or sitting between a block and the next clause header fall outside
//! every span. The index recovers the block boundaries a reader sees from
//! indentation:
//!
//! ```text
//! 1 if a:
//! 2     b
//! 3     # still in the body (indented like it)
//! 4
//! 5 # before the else clause
//! 6 else:
//! 7     c
//! ```
//!
//! The body's raw interval `(2, 2)` is extended to `(2, 4)`; the `else`
//! block stays `(7, 7)`. Line 5 is inside the `if` node's interval `(1, 7)`
//! but in neither block, so it precedes `orelse`.
//!
//! Building the index widens node spans in place (`lineno`/`end_lineno`
//! only). Entries are keyed by the widened node span and hold the owner's
//! pre-order [`NodeId`], so nothing borrows the tree after the build.

use std::collections::BTreeMap;

use pycomments_core::text::SourceLines;
use pycomments_syntax::{ContainerAttr, ContainerOwner, Module, NodeId, NodeIdGenerator};
use tracing::trace;

/// Extended line range of one container attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubInterval {
    pub low: u32,
    pub high: u32,
    pub attr: ContainerAttr,
}

impl SubInterval {
    pub fn contains(&self, line: u32) -> bool {
        self.low <= line && line <= self.high
    }
}

/// A container-owning node and its attribute intervals, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub owner: NodeId,
    pub depth: u32,
    pub attrs: Vec<SubInterval>,
}

/// Map from a node's widened `(lineno, end_lineno)` to its entry.
#[derive(Debug, Default)]
pub struct IntervalIndex {
    entries: BTreeMap<(u32, u32), IndexEntry>,
}

impl IntervalIndex {
    /// Walk `module` in pre-order, widening spans and recording every node
    /// with at least one non-empty container.
    pub fn build(module: &mut Module, lines: &SourceLines<'_>) -> Self {
        let mut builder = IndexBuilder {
            lines,
            ids: NodeIdGenerator::new(),
            index: IntervalIndex::default(),
        };
        builder.visit(module, 0);
        builder.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, low: u32, high: u32) -> Option<&IndexEntry> {
        self.entries.get(&(low, high))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(u32, u32), &IndexEntry)> {
        self.entries.iter()
    }

    /// The entry whose interval most tightly encloses `line`: largest low
    /// bound first, then smallest high bound.
    pub fn innermost(&self, line: u32) -> Option<(&(u32, u32), &IndexEntry)> {
        self.entries
            .iter()
            .filter(|((low, high), _)| *low <= line && line <= *high)
            .max_by(|((a_low, a_high), _), ((b_low, b_high), _)| {
                a_low.cmp(b_low).then(b_high.cmp(a_high))
            })
    }

    fn insert(&mut self, key: (u32, u32), entry: IndexEntry) {
        match self.entries.get(&key) {
            // Same interval at a shallower depth: the nested node is the
            // more specific owner.
            Some(existing) if existing.depth > entry.depth => {}
            _ => {
                self.entries.insert(key, entry);
            }
        }
    }
}

struct IndexBuilder<'s, 'a> {
    lines: &'s SourceLines<'a>,
    ids: NodeIdGenerator,
    index: IntervalIndex,
}

impl IndexBuilder<'_, '_> {
    fn visit(&mut self, node: &mut dyn ContainerOwner, depth: u32) {
        let owner = self.ids.next_id();
        let header = node
            .span()
            .map(|span| self.lines.indentation(span.lineno));

        let mut attrs = Vec::new();
        for &attr in node.container_attrs() {
            let Some(container) = node.container(attr) else {
                continue;
            };
            let spans = container.spans();
            let Some(low) = spans.iter().map(|s| s.lineno).min() else {
                continue;
            };
            let high = spans.iter().map(|s| s.end_lineno).max().unwrap_or(low);
            let (low, high) = extend_interval(self.lines, low, high, header);
            attrs.push(SubInterval { low, high, attr });
        }

        if let (Some(low), Some(high)) = (
            attrs.iter().map(|a| a.low).min(),
            attrs.iter().map(|a| a.high).max(),
        ) {
            // The node's own range extends too, so a comment trailing a
            // nested block's last clause stays inside the node.
            let (low, high) = match node.span() {
                Some(span) => {
                    let (own_low, own_high) =
                        extend_interval(self.lines, span.lineno, span.end_lineno, header);
                    (own_low.min(low), own_high.max(high))
                }
                None => (low, high),
            };
            node.set_lines(low, high);
            trace!(%owner, low, high, ?attrs, "interval");
            self.index.insert(
                (low, high),
                IndexEntry {
                    owner,
                    depth,
                    attrs,
                },
            );
        }

        for &attr in node.container_attrs() {
            if let Some(mut container) = node.container_mut(attr) {
                for child in container.owners_mut() {
                    self.visit(child, depth + 1);
                }
            }
        }
    }
}

/// Extend a container's raw line range to the block a reader would see.
///
/// `header` is the indentation of the owning node's first line; a block
/// that is not indented past it (a suite on the header line) keeps its raw
/// range.
pub fn extend_interval(
    lines: &SourceLines<'_>,
    low: u32,
    high: u32,
    header: Option<usize>,
) -> (u32, u32) {
    let (level, extend_up) = if low == high {
        (lines.indentation(low), true)
    } else {
        let first = lines.indentation(low);
        let next = lines
            .next_code_line(low)
            .map_or(0, |line| lines.indentation(line));
        (first.max(next), next <= first)
    };

    if header.is_some_and(|header| level <= header) {
        return (low, high);
    }

    let mut low = low;
    if extend_up {
        while low > 1 {
            let prev = low - 1;
            if lines.is_comment(prev) || lines.is_blank(prev) || lines.indentation(prev) >= level {
                low = prev;
            } else {
                break;
            }
        }
    }

    let mut high = high;
    while high < lines.last_line() {
        let next = high + 1;
        if lines.is_blank(next) || lines.indentation(next) >= level {
            high = next;
        } else {
            break;
        }
    }

    (low, high)
}
