//! Round-trip verification.
//!
//! A file passes when:
//! - removing the recovered comments gives back the plain parse tree, and
//! - parsing the regenerated source gives back the enriched tree.

use pycomments_core::error::PyCommentsError;
use pycomments_core::output::{CheckResult, CheckStatus};
use pycomments_syntax::{dump, parse_module_with_options};
use tracing::{debug, warn};

use crate::config::ParseConfig;
use crate::source::Source;
use crate::strip::strip_comments;
use crate::{count_comments, parse_with_config, unparse_with_options};

/// Verify the round trip of one source.
///
/// Returns `RoundTripMismatch` when a tree differs.
pub fn verify_round_trip(
    path: &str,
    source: &[u8],
    config: &ParseConfig,
) -> Result<usize, PyCommentsError> {
    let text = std::str::from_utf8(source)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let enriched = parse_with_config(Source::Text(text), config)?;
    let comment_count = count_comments(&enriched);

    let plain = parse_module_with_options(text, &config.options)?;
    let expected = dump(&plain);
    let actual = dump(&strip_comments(enriched.clone()));
    if expected != actual {
        return Err(PyCommentsError::RoundTripMismatch {
            path: path.to_string(),
            expected,
            actual,
        });
    }

    let regenerated = unparse_with_options(&enriched, &config.options)?;
    let reparsed = parse_with_config(Source::Text(&regenerated), config)?;
    let expected = dump(&enriched);
    let actual = dump(&reparsed);
    if expected != actual {
        return Err(PyCommentsError::RoundTripMismatch {
            path: path.to_string(),
            expected,
            actual,
        });
    }
    Ok(comment_count)
}

/// Verify one file and report the outcome instead of failing.
pub fn check_file(path: &str, source: &[u8], config: &ParseConfig) -> CheckResult {
    let (status, comment_count, message) = match verify_round_trip(path, source, config) {
        Ok(count) => {
            debug!(path, comments = count, "round trip passed");
            (CheckStatus::Passed, count, None)
        }
        Err(err @ PyCommentsError::RoundTripMismatch { .. }) => {
            warn!(path, "round trip mismatch");
            (CheckStatus::Failed, 0, Some(err.to_string()))
        }
        Err(err) => {
            warn!(path, error = %err, "check failed");
            (CheckStatus::Error, 0, Some(err.to_string()))
        }
    };
    CheckResult {
        file: path.to_string(),
        status,
        comment_count,
        message,
    }
}
