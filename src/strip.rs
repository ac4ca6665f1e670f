//! Removal of comment nodes.

use pycomments_syntax::visitor::{transform_module, Transform, Transformer};
use pycomments_syntax::{Handler, Module, Stmt};

/// Drops every comment node from every statement and handler list.
#[derive(Debug, Default)]
struct CommentStripper {
    removed: usize,
}

impl Transformer for CommentStripper {
    fn transform_stmt(&mut self, node: Stmt) -> Transform<Stmt> {
        if node.is_comment() {
            self.removed += 1;
            Transform::Remove
        } else {
            Transform::Keep(node)
        }
    }

    fn transform_handler(&mut self, node: Handler) -> Transform<Handler> {
        if node.is_comment() {
            self.removed += 1;
            Transform::Remove
        } else {
            Transform::Keep(node)
        }
    }
}

/// Return `module` without comment nodes. Attached comment texts are kept.
pub fn strip_comments(module: Module) -> Module {
    let mut stripper = CommentStripper::default();
    let module = transform_module(&mut stripper, module);
    tracing::debug!(removed = stripper.removed, "stripped comments");
    module
}
