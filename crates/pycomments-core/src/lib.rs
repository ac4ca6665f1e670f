//! Core infrastructure for pycomments.
//!
//! This crate provides language-agnostic infrastructure:
//! - Error types and error codes
//! - JSON output types for CLI responses
//! - Source text utilities (line access, indentation levels)

pub mod error;
pub mod output;
pub mod text;
