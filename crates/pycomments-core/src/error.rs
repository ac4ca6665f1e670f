//! Error types and error code constants for pycomments.
//!
//! This module provides a unified error type (`PyCommentsError`) that bridges
//! domain-specific errors from the syntax front end and the comment engine
//! into a common format suitable for JSON output.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad input from caller)
//! - `3`: Source errors (syntax error, undecodable bytes, file not found)
//! - `5`: Verification failed (round-trip mismatch)
//! - `10`: Internal errors (bugs, unexpected state)
//!
//! ## Design
//!
//! - **Unified type**: `PyCommentsError` is the single error type for CLI output
//! - **Bridging**: `impl From<X> for PyCommentsError` bridges domain errors
//! - **Code mapping**: `OutputErrorCode` provides stable integer codes for JSON

use std::fmt;

use thiserror::Error;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output.
///
/// These codes map to CLI exit codes and appear in JSON error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad flag value, unsupported target).
    InvalidArguments = 2,
    /// The source could not be read, decoded or parsed.
    SourceError = 3,
    /// Round-trip verification failed.
    VerificationFailed = 5,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for library callers and CLI output.
///
/// Syntax errors are carried through unchanged from the parser; the comment
/// placement engine itself never fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PyCommentsError {
    /// The source failed to tokenize or parse.
    #[error("syntax error at {line}:{col}: {message}")]
    Syntax {
        message: String,
        line: u32,
        col: u32,
    },

    /// Source bytes were not valid UTF-8.
    #[error("invalid source encoding: {message}")]
    Decode { message: String },

    /// Tree-to-text rendering is not available for the target version.
    #[error("unparse is not available when targeting Python {version}")]
    UnparseUnavailable { version: String },

    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// parse -> unparse -> parse produced a different tree.
    #[error("round-trip mismatch in {path}")]
    RoundTripMismatch { path: String, expected: String, actual: String },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    Internal { message: String },
}

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&PyCommentsError> for OutputErrorCode {
    fn from(err: &PyCommentsError) -> Self {
        match err {
            PyCommentsError::Syntax { .. } => OutputErrorCode::SourceError,
            PyCommentsError::Decode { .. } => OutputErrorCode::SourceError,
            PyCommentsError::FileNotFound { .. } => OutputErrorCode::SourceError,
            PyCommentsError::UnparseUnavailable { .. } => OutputErrorCode::InvalidArguments,
            PyCommentsError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            PyCommentsError::RoundTripMismatch { .. } => OutputErrorCode::VerificationFailed,
            PyCommentsError::Internal { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<PyCommentsError> for OutputErrorCode {
    fn from(err: PyCommentsError) -> Self {
        OutputErrorCode::from(&err)
    }
}

impl From<std::str::Utf8Error> for PyCommentsError {
    fn from(err: std::str::Utf8Error) -> Self {
        PyCommentsError::Decode {
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl PyCommentsError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        PyCommentsError::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        PyCommentsError::Internal {
            message: message.into(),
        }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        PyCommentsError::FileNotFound { path: path.into() }
    }

    /// Source position of the error, when it has one.
    pub fn position(&self) -> Option<(u32, u32)> {
        match self {
            PyCommentsError::Syntax { line, col, .. } => Some((*line, *col)),
            _ => None,
        }
    }
}
