// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use pycomments_core::error::PyCommentsError;
use thiserror::Error;

use super::grammar::ParseLoc;
use crate::tokenizer::TokError;

#[allow(clippy::enum_variant_names)]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParserError {
    #[error("tokenizer error: {error}")]
    TokenizerError { error: TokError, line: u32, col: u32 },
    #[error("parser error: {message}")]
    ParserError { message: String, line: u32, col: u32 },
}

impl ParserError {
    /// 1-indexed line and 0-indexed byte column of the error.
    pub fn position(&self) -> (u32, u32) {
        match self {
            ParserError::TokenizerError { line, col, .. }
            | ParserError::ParserError { line, col, .. } => (*line, *col),
        }
    }

    /// The error message without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            ParserError::TokenizerError { error, .. } => error.to_string(),
            ParserError::ParserError { message, .. } => message.clone(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ParserError>;

impl From<peg::error::ParseError<ParseLoc>> for ParserError {
    fn from(err: peg::error::ParseError<ParseLoc>) -> Self {
        let ParseLoc { position, at_end } = err.location;
        let message = if at_end {
            format!("expected {} at end of input", err.expected)
        } else {
            format!("expected {}", err.expected)
        };
        ParserError::ParserError {
            message,
            line: position.line,
            col: position.col,
        }
    }
}

impl From<ParserError> for PyCommentsError {
    fn from(err: ParserError) -> Self {
        let (line, col) = err.position();
        PyCommentsError::Syntax {
            message: err.message(),
            line,
            col,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_syntax_error() {
        let err = ParserError::TokenizerError {
            error: TokError::UnterminatedString,
            line: 2,
            col: 4,
        };
        let converted: PyCommentsError = err.into();
        assert_eq!(
            converted,
            PyCommentsError::Syntax {
                message: "unterminated string literal".to_string(),
                line: 2,
                col: 4,
            }
        );
    }
}
