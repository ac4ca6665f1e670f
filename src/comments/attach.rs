//! Attached placement: comment texts stored on the statements they describe.
//!
//! No nodes are inserted. An inline comment belongs to the statement on its
//! line; a standalone comment belongs to the next statement that starts
//! after it. A comment with nothing after it is dropped.

use pycomments_syntax::{ContainerOwner, Module, SpanCollector, StatementSpan};
use tracing::debug;

use super::extract::CommentRecord;

/// Pre-order index of the statement that owns `comment`, if any.
pub fn owner_of(spans: &[StatementSpan], comment: &CommentRecord) -> Option<usize> {
    let line = comment.line();
    if comment.inline {
        // Innermost first, then the statement starting last on the line.
        let on_line = spans
            .iter()
            .enumerate()
            .filter(|(_, s)| s.span.contains_line(line))
            .max_by_key(|(_, s)| (s.depth, s.span.lineno, s.span.col_offset));
        if let Some((index, _)) = on_line {
            return Some(index);
        }
    }
    // The first minimum in pre-order is the outermost statement on its line.
    spans
        .iter()
        .enumerate()
        .filter(|(_, s)| s.span.lineno > line)
        .min_by_key(|(_, s)| s.span.lineno)
        .map(|(index, _)| index)
}

/// Store every comment's text on its owning statement, in source order.
///
/// `module` must not hold comment nodes.
pub fn attach_comments(module: &mut Module, comments: &[CommentRecord]) {
    let spans = SpanCollector::collect(module);
    let mut assigned: Vec<Vec<String>> = vec![Vec::new(); spans.len()];
    for comment in comments {
        match owner_of(&spans, comment) {
            Some(index) => {
                debug!(
                    line = comment.line(),
                    owner_line = spans[index].span.lineno,
                    "attaching comment"
                );
                assigned[index].push(comment.text().to_string());
            }
            None => debug!(line = comment.line(), "dropping trailing comment"),
        }
    }

    let mut assigned = assigned.into_iter();
    for &attr in module.container_attrs() {
        if let Some(mut container) = module.container_mut(attr) {
            for child in container.owners_mut() {
                distribute(child, &mut assigned);
            }
        }
    }
}

/// Hand out `assigned` in the same pre-order the spans were collected in.
fn distribute(node: &mut dyn ContainerOwner, assigned: &mut impl Iterator<Item = Vec<String>>) {
    let Some(comments) = node.attached_comments_mut() else {
        return;
    };
    if let Some(texts) = assigned.next() {
        comments.extend(texts);
    }
    for &attr in node.container_attrs() {
        if let Some(mut container) = node.container_mut(attr) {
            for child in container.owners_mut() {
                distribute(child, assigned);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::extract::extract_comments;
    use pycomments_syntax::parse_module;

    fn owners(source: &str) -> Vec<Option<u32>> {
        let module = parse_module(source).expect("parse error");
        let spans = SpanCollector::collect(&module);
        extract_comments(source)
            .expect("tokenize error")
            .iter()
            .map(|c| owner_of(&spans, c).map(|i| spans[i].span.lineno))
            .collect()
    }

    #[test]
    fn inline_goes_to_last_statement_on_line() {
        let module = parse_module("a = 1; b = 2  # hello").expect("parse error");
        let spans = SpanCollector::collect(&module);
        let comments = extract_comments("a = 1; b = 2  # hello").expect("tokenize error");
        assert_eq!(owner_of(&spans, &comments[0]), Some(1));
    }

    #[test]
    fn inline_prefers_innermost() {
        // Both the `if` and `b` contain line 1.
        let source = "if a: b  # on b";
        let module = parse_module(source).expect("parse error");
        let spans = SpanCollector::collect(&module);
        let comments = extract_comments(source).expect("tokenize error");
        assert_eq!(owner_of(&spans, &comments[0]), Some(1));
    }

    #[test]
    fn standalone_goes_to_next_statement_outermost_first() {
        // The decorated def starts at `def`, not at `@dec`.
        let source = "# about f\n@dec\ndef f():\n    pass\n# nothing follows\n";
        assert_eq!(owners(source), vec![Some(3), None]);
    }

    #[test]
    fn header_inline_comment_goes_to_compound_statement() {
        assert_eq!(owners("for i in x:  # loop\n    pass"), vec![Some(1)]);
    }

    #[test]
    fn texts_are_distributed_in_pre_order() {
        let source = "# c1\nclass A:\n    x = 1  # c2\n    # c3\n    def f(self):\n        pass\n";
        let mut module = parse_module(source).expect("parse error");
        let comments = extract_comments(source).expect("tokenize error");
        attach_comments(&mut module, &comments);

        assert_eq!(module.body[0].comments, vec!["c1"]);
        let pycomments_syntax::StmtKind::ClassDef(class) = &module.body[0].kind else {
            panic!("expected class");
        };
        assert_eq!(class.body[0].comments, vec!["c2"]);
        assert_eq!(class.body[1].comments, vec!["c3"]);
        assert!(class.body.iter().all(|s| !s.is_comment()));
    }
}
