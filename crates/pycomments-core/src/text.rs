//! Source text utilities: line access, indentation and line offsets.
//!
//! ## Coordinate Conventions
//!
//! - Lines are **1-indexed** (matching parser spans)
//! - Columns are **0-indexed byte offsets** within their line
//! - Byte offsets are **0-indexed**
//!
//! Indentation follows the tokenizer: a space advances one column, a tab
//! advances to the next multiple of [`TAB_SIZE`], and a form feed resets the
//! count.

use std::sync::LazyLock;

use regex::Regex;

/// Tab stop used when measuring indentation.
pub const TAB_SIZE: usize = 8;

static COMMENT_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ \t\x0c]*#").unwrap());

// ============================================================================
// Line Classification
// ============================================================================

/// Measure the indentation of a physical line.
///
/// Whitespace-only lines report the width of their whitespace, which callers
/// should treat as meaningless (see [`is_blank_line`]).
pub fn indentation_level(line: &str) -> usize {
    let mut col = 0usize;
    for ch in line.chars() {
        match ch {
            ' ' => col += 1,
            '\t' => col = (col / TAB_SIZE + 1) * TAB_SIZE,
            '\x0c' => col = 0,
            _ => break,
        }
    }
    col
}

/// Whether the line holds only whitespace.
pub fn is_blank_line(line: &str) -> bool {
    line.trim().is_empty()
}

/// Whether the first non-whitespace character of the line is `#`.
pub fn is_comment_line(line: &str) -> bool {
    COMMENT_LINE.is_match(line)
}

// ============================================================================
// SourceLines
// ============================================================================

/// 1-indexed view over the physical lines of a source text.
///
/// Line terminators (`\n`, `\r\n`, `\r`) are not part of the returned lines.
/// A trailing newline yields a final empty line, so `len()` counts the line
/// the cursor would be on after the last terminator.
#[derive(Debug, Clone)]
pub struct SourceLines<'a> {
    lines: Vec<&'a str>,
}

impl<'a> SourceLines<'a> {
    /// Split a source text into physical lines.
    pub fn new(source: &'a str) -> Self {
        let bytes = source.as_bytes();
        let mut lines = Vec::new();
        let mut start = 0usize;
        let mut i = 0usize;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    lines.push(&source[start..i]);
                    start = i + 1;
                }
                b'\r' => {
                    lines.push(&source[start..i]);
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    start = i + 1;
                }
                _ => {}
            }
            i += 1;
        }
        lines.push(&source[start..]);
        SourceLines { lines }
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether there are no lines at all (never true for a constructed view).
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get line `n` (1-indexed). Out-of-range lines read as empty.
    pub fn line(&self, n: u32) -> &'a str {
        if n == 0 {
            return "";
        }
        self.lines.get(n as usize - 1).copied().unwrap_or("")
    }

    /// Indentation of line `n`.
    pub fn indentation(&self, n: u32) -> usize {
        indentation_level(self.line(n))
    }

    /// Whether line `n` is blank.
    pub fn is_blank(&self, n: u32) -> bool {
        is_blank_line(self.line(n))
    }

    /// Whether line `n` is a comment-only line.
    pub fn is_comment(&self, n: u32) -> bool {
        is_comment_line(self.line(n))
    }

    /// Last valid line number.
    pub fn last_line(&self) -> u32 {
        self.lines.len() as u32
    }

    /// First line after `n` holding code, skipping blank and comment-only
    /// lines.
    pub fn next_code_line(&self, n: u32) -> Option<u32> {
        ((n + 1)..=self.last_line()).find(|&l| !self.is_blank(l) && !self.is_comment(l))
    }
}

// ============================================================================
// Line Offsets
// ============================================================================

/// Byte offset of the first character of line `line` (1-indexed).
///
/// Lines past the end return the content length.
pub fn line_start_offset(content: &str, line: u32) -> usize {
    if line <= 1 {
        return 0;
    }
    content
        .match_indices('\n')
        .nth(line as usize - 2)
        .map(|(index, _)| index + 1)
        .unwrap_or(content.len())
}
