//! Parse configuration.

use std::fmt;

use pycomments_syntax::{ParseOptions, PythonVersion};
use serde::Serialize;

/// How recovered comments are represented in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CommentMode {
    /// Comment nodes inserted as siblings in statement lists.
    #[default]
    Positional,
    /// Comment texts stored on the statement they belong to.
    Attached,
}

impl fmt::Display for CommentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommentMode::Positional => write!(f, "positional"),
            CommentMode::Attached => write!(f, "attached"),
        }
    }
}

/// Options for [`crate::parse_with_config`].
///
/// ```
/// use pycomments::{CommentMode, ParseConfig};
/// use pycomments_syntax::PythonVersion;
///
/// let config = ParseConfig::default()
///     .with_mode(CommentMode::Attached)
///     .with_version(PythonVersion::V3_12);
/// assert_eq!(config.mode, CommentMode::Attached);
/// assert_eq!(config.options.version, PythonVersion::V3_12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseConfig {
    pub options: ParseOptions,
    pub mode: CommentMode,
}

impl ParseConfig {
    #[must_use]
    pub fn with_mode(mut self, mode: CommentMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: PythonVersion) -> Self {
        self.options = ParseOptions::new(version);
        self
    }
}
