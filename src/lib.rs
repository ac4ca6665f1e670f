//! pycomments: comment-preserving parse and unparse for Python syntax trees.
//!
//! The parser in [`pycomments_syntax`] drops comments like any other Python
//! parser. [`parse`] puts them back, either as comment nodes in statement
//! lists or as texts attached to statements (see [`CommentMode`]).
//! [`unparse`] writes the tree back out with the comments in place.
//!
//! ```
//! let source = "x = 1  # one\n# two\ny = 2";
//! let module = pycomments::parse(source).unwrap();
//! assert_eq!(module.body.len(), 4);
//! assert_eq!(pycomments::unparse(&module).unwrap(), source);
//! ```

// Core infrastructure - re-exported from pycomments-core
pub use pycomments_core::error;
pub use pycomments_core::output;
pub use pycomments_core::text;

pub mod check;
pub mod comments;
pub mod config;
pub mod files;
pub mod source;
pub mod strip;

pub use config::{CommentMode, ParseConfig};
pub use error::PyCommentsError;
pub use pycomments_syntax::{dump, Module, ParseOptions, PythonVersion};
pub use source::Source;
pub use strip::strip_comments;

use pycomments_syntax::visitor::{walk_module, VisitResult, Visitor};
use pycomments_syntax::{parse_module_with_options, unparse_module, Handler, Stmt};
use tracing::debug;

/// Parse `source` and recover its comments as comment nodes.
///
/// A [`Source::Tree`] is returned unchanged.
pub fn parse<'a>(source: impl Into<Source<'a>>) -> Result<Module, PyCommentsError> {
    parse_with_config(source, &ParseConfig::default())
}

/// Parse `source` for a target version and comment mode.
pub fn parse_with_config<'a>(
    source: impl Into<Source<'a>>,
    config: &ParseConfig,
) -> Result<Module, PyCommentsError> {
    let text = match source.into() {
        Source::Tree(module) => {
            debug!("tree input returned unchanged");
            return Ok(module);
        }
        Source::Text(text) => text,
        Source::Bytes(bytes) => std::str::from_utf8(bytes)?,
    };
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut module = parse_module_with_options(text, &config.options)?;
    comments::enrich(&mut module, text, config.mode)?;
    Ok(module)
}

/// Render `module` as source, comments included.
pub fn unparse(module: &Module) -> Result<String, PyCommentsError> {
    unparse_with_options(module, &ParseOptions::default())
}

/// Render `module` as source for a target version.
///
/// Fails with [`PyCommentsError::UnparseUnavailable`] for targets before
/// Python 3.9.
pub fn unparse_with_options(
    module: &Module,
    options: &ParseOptions,
) -> Result<String, PyCommentsError> {
    if !options.version.has_unparse() {
        return Err(PyCommentsError::UnparseUnavailable {
            version: options.version.to_string(),
        });
    }
    Ok(unparse_module(module))
}

/// Comment nodes plus attached comment texts in `module`.
pub fn count_comments(module: &Module) -> usize {
    let mut counter = CommentCounter::default();
    walk_module(&mut counter, module);
    counter.count
}

#[derive(Default)]
struct CommentCounter {
    count: usize,
}

impl Visitor for CommentCounter {
    fn visit_stmt(&mut self, node: &Stmt) -> VisitResult {
        self.count += if node.is_comment() { 1 } else { node.comments.len() };
        VisitResult::Continue
    }

    fn visit_handler(&mut self, node: &Handler) -> VisitResult {
        self.count += if node.is_comment() { 1 } else { node.comments.len() };
        VisitResult::Continue
    }
}
