//! JSON output types and serialization for CLI responses.
//!
//! ## Design Principles
//!
//! 1. **Structured JSON:** All structured CLI output is valid JSON; `unparse`
//!    prints plain source by default (with an optional JSON envelope)
//! 2. **Status first:** Every response has `status` as first field
//! 3. **Deterministic:** Same input -> same output (field order, array ordering)
//! 4. **Versioned:** Schema version in response enables forward compatibility

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::error::{OutputErrorCode, PyCommentsError};

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

/// A position in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// File path as given on the command line.
    pub file: String,
    /// 1-indexed line.
    pub line: u32,
    /// 0-indexed byte column.
    pub col: u32,
}

impl Location {
    /// Create a new location.
    pub fn new(file: impl Into<String>, line: u32, col: u32) -> Self {
        Location {
            file: file.into(),
            line,
            col,
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Response for `pycomments parse`.
#[derive(Debug, Clone, Serialize)]
pub struct ParseResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// File that was parsed.
    pub file: String,
    /// Comment mode used ("positional" or "attached").
    pub mode: String,
    /// Number of comments found in the source.
    pub comment_count: usize,
    /// The enriched tree.
    pub tree: serde_json::Value,
}

impl ParseResponse {
    /// Create a parse response.
    pub fn new(
        file: impl Into<String>,
        mode: impl Into<String>,
        comment_count: usize,
        tree: serde_json::Value,
    ) -> Self {
        ParseResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            file: file.into(),
            mode: mode.into(),
            comment_count,
            tree,
        }
    }
}

/// Response for `pycomments unparse --json`.
#[derive(Debug, Clone, Serialize)]
pub struct UnparseResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// File that was regenerated.
    pub file: String,
    /// Regenerated source text.
    pub source: String,
}

impl UnparseResponse {
    /// Create an unparse response.
    pub fn new(file: impl Into<String>, source: impl Into<String>) -> Self {
        UnparseResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            file: file.into(),
            source: source.into(),
        }
    }
}

/// Outcome of a round-trip check on one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// parse -> unparse -> parse reproduced the tree.
    Passed,
    /// The regenerated tree differs.
    Failed,
    /// The file could not be parsed in the first place.
    Error,
}

/// Round-trip result for one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// File that was checked.
    pub file: String,
    /// Outcome.
    pub status: CheckStatus,
    /// Number of comments in the file.
    pub comment_count: usize,
    /// Failure message, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response for `pycomments check`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResponse {
    /// Status: "ok" when every file passed, "failed" otherwise.
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Per-file results in path order.
    pub results: Vec<CheckResult>,
    /// Number of files that passed.
    pub passed: usize,
    /// Number of files that failed or errored.
    pub failed: usize,
}

impl CheckResponse {
    /// Build a response, counting outcomes.
    pub fn new(results: Vec<CheckResult>) -> Self {
        let passed = results
            .iter()
            .filter(|r| r.status == CheckStatus::Passed)
            .count();
        let failed = results.len() - passed;
        CheckResponse {
            status: if failed == 0 { "ok" } else { "failed" }.to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            results,
            passed,
            failed,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error details in an error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code.
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Where the error occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl ErrorInfo {
    /// Create from a PyCommentsError, attributing positions to `file`.
    pub fn from_error(err: &PyCommentsError, file: Option<&str>) -> Self {
        let location = match (err.position(), file) {
            (Some((line, col)), Some(file)) => Some(Location::new(file, line, col)),
            _ => None,
        };
        ErrorInfo {
            code: OutputErrorCode::from(err).code(),
            message: err.to_string(),
            location,
        }
    }
}

/// Response emitted when a command fails.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Error information.
    pub error: ErrorInfo,
}

impl ErrorResponse {
    /// Create an error response from a PyCommentsError.
    pub fn from_error(err: &PyCommentsError, file: Option<&str>) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err, file),
        }
    }
}

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}
