//! Compile-only test to verify public API surface.
//!
//! This file serves as a compile-time contract for the public API.
//! If this file fails to compile, the public API has regressed.
//!
//! Run with: cargo test -- api_surface

// Allow unused imports - this test is about compile-time verification, not runtime usage
#![allow(unused_imports)]

// ============================================================================
// Entry points
// ============================================================================

use pycomments::{
    count_comments, dump, parse, parse_with_config, strip_comments, unparse,
    unparse_with_options, CommentMode, Module, ParseConfig, ParseOptions, PyCommentsError,
    PythonVersion, Source,
};

// ============================================================================
// Comment engine
// ============================================================================

use pycomments::comments::{
    attach_comments, enrich, extend_interval, extract_comments, place_comments, resolve_target,
    CommentRecord, IndexEntry, IntervalIndex, SubInterval, Target,
};

// ============================================================================
// Core Infrastructure Types
// ============================================================================

// error module - error types and codes
use pycomments::error::OutputErrorCode;

// output module - JSON output types
use pycomments::output::{
    CheckResponse, CheckResult, CheckStatus, ErrorInfo, ErrorResponse, Location, ParseResponse,
    UnparseResponse, SCHEMA_VERSION,
};

// text module - source line utilities
use pycomments::text::SourceLines;

// check and files modules - round-trip verification
use pycomments::check::{check_file, verify_round_trip};
use pycomments::files::{collect_python_files, read_source, FileError};

// ============================================================================
// Test
// ============================================================================

#[test]
fn api_surface_compiles() {
    // The imports above form the public API contract.
    // Any change that breaks these imports is a breaking change.
    let _ = std::any::type_name::<Module>();
    let _ = std::any::type_name::<Source>();
    let _ = std::any::type_name::<IntervalIndex>();
    let _ = std::any::type_name::<PyCommentsError>();
    let _ = std::any::type_name::<Location>();
    let _ = std::any::type_name::<FileError>();
}

#[test]
fn schema_version_is_stable() {
    // The schema version is part of the public API contract
    assert_eq!(SCHEMA_VERSION, "1");
}
