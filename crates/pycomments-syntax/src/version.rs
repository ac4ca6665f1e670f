// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Python version abstraction for version-aware parsing and rendering.
//!
//! The target version gates a handful of syntax forms in the parser and the
//! availability of tree-to-text rendering. [`PythonVersion::Permissive`]
//! accepts everything the grammar supports.

use std::str::FromStr;

/// Target Python language version for parsing and rendering.
///
/// # Example
///
/// ```
/// use pycomments_syntax::{PythonVersion, ParseOptions, parse_module_with_options};
///
/// // The walrus operator needs 3.8
/// let options = ParseOptions::new(PythonVersion::V3_7);
/// assert!(parse_module_with_options("(x := 1)", &options).is_err());
///
/// let options = ParseOptions::new(PythonVersion::V3_8);
/// assert!(parse_module_with_options("(x := 1)", &options).is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PythonVersion {
    /// Accept all syntax the grammar handles; no version validation.
    #[default]
    Permissive,

    /// A specific target language version (e.g., 3.10).
    V {
        /// Major version number (always 3 for supported versions).
        major: u8,
        /// Minor version number.
        minor: u8,
    },
}

impl PythonVersion {
    /// Python 3.7 - last version without the walrus operator.
    pub const V3_7: Self = Self::V { major: 3, minor: 7 };

    /// Python 3.8 - walrus operator, positional-only parameters.
    pub const V3_8: Self = Self::V { major: 3, minor: 8 };

    /// Python 3.9 - generic tree-to-text rendering.
    pub const V3_9: Self = Self::V { major: 3, minor: 9 };

    /// Python 3.10 - match statements (not supported by this parser).
    pub const V3_10: Self = Self::V {
        major: 3,
        minor: 10,
    };

    /// Python 3.11 - exception groups.
    pub const V3_11: Self = Self::V {
        major: 3,
        minor: 11,
    };

    /// Python 3.12 - f-string improvements.
    pub const V3_12: Self = Self::V {
        major: 3,
        minor: 12,
    };

    /// Python 3.13.
    pub const V3_13: Self = Self::V {
        major: 3,
        minor: 13,
    };

    fn at_least(self, wanted: u8) -> bool {
        match self {
            Self::Permissive => true,
            Self::V { major: 3, minor } => minor >= wanted,
            Self::V { major, .. } => major > 3,
        }
    }

    /// Returns whether the walrus operator (`:=`) is available.
    #[must_use]
    pub fn has_walrus(self) -> bool {
        self.at_least(8)
    }

    /// Returns whether positional-only parameters (`/`) are available.
    #[must_use]
    pub fn has_positional_only_params(self) -> bool {
        self.at_least(8)
    }

    /// Returns whether a tree can be rendered back to text.
    ///
    /// Generic tree-to-text rendering exists from Python 3.9 on; older
    /// targets have no `unparse` entry point.
    #[must_use]
    pub fn has_unparse(self) -> bool {
        self.at_least(9)
    }

    /// Returns whether exception groups (`except*`) are supported.
    #[must_use]
    pub fn has_exception_groups(self) -> bool {
        self.at_least(11)
    }

    /// Returns whether this is the permissive mode.
    #[must_use]
    pub fn is_permissive(self) -> bool {
        matches!(self, Self::Permissive)
    }

    /// Returns the major and minor version numbers, if this is a specific version.
    #[must_use]
    pub fn version_tuple(self) -> Option<(u8, u8)> {
        match self {
            Self::Permissive => None,
            Self::V { major, minor } => Some((major, minor)),
        }
    }
}

impl std::fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Permissive => write!(f, "permissive"),
            Self::V { major, minor } => write!(f, "{}.{}", major, minor),
        }
    }
}

impl FromStr for PythonVersion {
    type Err = String;

    /// Parses `"permissive"` or a `"<major>.<minor>"` pair.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("permissive") {
            return Ok(Self::Permissive);
        }
        let (major, minor) = s
            .split_once('.')
            .ok_or_else(|| format!("invalid Python version '{}', expected e.g. '3.10'", s))?;
        let major = major
            .parse::<u8>()
            .map_err(|_| format!("invalid major version in '{}'", s))?;
        let minor = minor
            .parse::<u8>()
            .map_err(|_| format!("invalid minor version in '{}'", s))?;
        if major != 3 {
            return Err(format!("unsupported Python major version {}", major));
        }
        Ok(Self::V { major, minor })
    }
}

/// Configuration options for parsing Python source code.
///
/// # Example
///
/// ```
/// use pycomments_syntax::{ParseOptions, PythonVersion};
///
/// let options = ParseOptions::default();
/// assert_eq!(options.version, PythonVersion::Permissive);
///
/// let options = ParseOptions::new(PythonVersion::V3_10);
/// assert_eq!(options.version, PythonVersion::V3_10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    /// Target Python version for parsing and rendering.
    pub version: PythonVersion,
}

impl ParseOptions {
    /// Creates parse options targeting a specific Python version.
    #[must_use]
    pub fn new(version: PythonVersion) -> Self {
        Self { version }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constants_exist() {
        assert_eq!(PythonVersion::V3_7.version_tuple(), Some((3, 7)));
        assert_eq!(PythonVersion::V3_8.version_tuple(), Some((3, 8)));
        assert_eq!(PythonVersion::V3_9.version_tuple(), Some((3, 9)));
        assert_eq!(PythonVersion::V3_10.version_tuple(), Some((3, 10)));
        assert_eq!(PythonVersion::V3_11.version_tuple(), Some((3, 11)));
        assert_eq!(PythonVersion::V3_12.version_tuple(), Some((3, 12)));
        assert_eq!(PythonVersion::V3_13.version_tuple(), Some((3, 13)));
    }

    #[test]
    fn test_permissive_accepts_everything() {
        let v = PythonVersion::Permissive;
        assert!(v.is_permissive());
        assert!(v.has_walrus());
        assert!(v.has_positional_only_params());
        assert!(v.has_unparse());
        assert!(v.has_exception_groups());
        assert_eq!(v.version_tuple(), None);
    }

    #[test]
    fn test_version_feature_queries() {
        assert!(!PythonVersion::V3_7.has_walrus());
        assert!(PythonVersion::V3_8.has_walrus());
        assert!(!PythonVersion::V3_8.has_unparse());
        assert!(PythonVersion::V3_9.has_unparse());
        assert!(!PythonVersion::V3_10.has_exception_groups());
        assert!(PythonVersion::V3_11.has_exception_groups());
    }

    #[test]
    fn test_version_display() {
        assert_eq!(PythonVersion::Permissive.to_string(), "permissive");
        assert_eq!(PythonVersion::V3_8.to_string(), "3.8");
        assert_eq!(PythonVersion::V3_10.to_string(), "3.10");
    }

    #[test]
    fn test_version_from_str() {
        assert_eq!("3.10".parse(), Ok(PythonVersion::V3_10));
        assert_eq!("Permissive".parse(), Ok(PythonVersion::Permissive));
        assert!("2.7".parse::<PythonVersion>().is_err());
        assert!("three".parse::<PythonVersion>().is_err());
    }

    #[test]
    fn test_parse_options_default() {
        let options = ParseOptions::default();
        assert_eq!(options.version, PythonVersion::Permissive);
    }
}
