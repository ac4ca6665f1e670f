//! Comment recovery for parsed modules.
//!
//! The parser drops comments. [`enrich`] tokenizes the source a second time
//! to find them and puts them back into the tree:
//!
//! - [`CommentMode::Positional`]: comment nodes are inserted into statement
//!   lists, placed by the [`intervals`] index.
//! - [`CommentMode::Attached`]: comment texts are stored on the statements
//!   they belong to; the tree shape does not change.

pub mod attach;
pub mod extract;
pub mod intervals;
pub mod placement;

pub use attach::attach_comments;
pub use extract::{extract_comments, CommentRecord};
pub use intervals::{extend_interval, IndexEntry, IntervalIndex, SubInterval};
pub use placement::{place_comments, resolve_target, Target};

use pycomments_core::text::SourceLines;
use pycomments_syntax::{Module, ParserError};
use tracing::debug;

use crate::config::CommentMode;

/// Add the comments of `source` to `module`, which must be its parse tree.
///
/// Returns the number of comments found.
pub fn enrich(module: &mut Module, source: &str, mode: CommentMode) -> Result<usize, ParserError> {
    let comments = extract_comments(source)?;
    debug!(count = comments.len(), %mode, "extracted comments");
    if comments.is_empty() {
        return Ok(0);
    }

    match mode {
        CommentMode::Positional => {
            let index = IntervalIndex::build(module, &SourceLines::new(source));
            debug!(entries = index.len(), "built interval index");
            place_comments(module, &comments, &index);
        }
        CommentMode::Attached => attach_comments(module, &comments),
    }
    Ok(comments.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pycomments_syntax::{dump, parse_module};

    #[test]
    fn no_comments_leaves_tree_untouched() {
        let source = "if a:\n    b\n\nc = 1\n";
        let mut module = parse_module(source).expect("parse error");
        let before = module.clone();
        let count = enrich(&mut module, source, CommentMode::Positional).expect("enrich");
        assert_eq!(count, 0);
        assert_eq!(module, before);
    }

    #[test]
    fn attached_mode_keeps_tree_shape() {
        let source = "# lead\nx = 1  # x\n";
        let mut module = parse_module(source).expect("parse error");
        enrich(&mut module, source, CommentMode::Attached).expect("enrich");
        assert_eq!(module.body.len(), 1);
        assert_eq!(module.body[0].comments, vec!["lead", "x"]);
        assert_eq!(
            dump(&module),
            "Module(body=[Assign(targets=[Name(id='x')], value=Constant(value=1), comments=['lead', 'x'])])"
        );
    }

    #[test]
    fn positional_mode_inserts_nodes() {
        let source = "# lead\nx = 1  # x\n";
        let mut module = parse_module(source).expect("parse error");
        let count = enrich(&mut module, source, CommentMode::Positional).expect("enrich");
        assert_eq!(count, 2);
        assert_eq!(module.body.len(), 3);
        assert!(module.body[0].is_comment());
        assert!(module.body[2].is_comment());
    }
}
