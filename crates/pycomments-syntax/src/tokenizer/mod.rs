// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Python tokenizer.
//!
//! [`TokenIterator`] wraps the [`TokState`] machine and yields owned-position
//! [`Token`]s that borrow their text from the source.

pub mod core;


pub use self::core::{TextPosition, TokConfig, TokError, TokState, TokType};

/// A single token with its text, positions and the physical line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub r#type: TokType,
    pub string: &'a str,
    pub start_pos: TextPosition,
    pub end_pos: TextPosition,
    /// The physical line containing `start_pos`, without its terminator.
    pub line: &'a str,
}

impl Token<'_> {
    /// Whether the token is an operator or keyword with exactly this text.
    pub fn is(&self, text: &str) -> bool {
        matches!(self.r#type, TokType::Op | TokType::Name) && self.string == text
    }
}

pub struct TokenIterator<'a> {
    state: TokState<'a>,
}

impl<'a> TokenIterator<'a> {
    pub fn new(text: &'a str, config: &TokConfig) -> Self {
        TokenIterator {
            state: TokState::new(text, config),
        }
    }

    /// Start position of the most recent token, or of the failing token after
    /// an error.
    pub fn position(&self) -> TextPosition {
        self.state.start_pos
    }
}

impl<'a> Iterator for TokenIterator<'a> {
    type Item = Result<Token<'a>, TokError>;

    fn next(&mut self) -> Option<Self::Item> {
        let tok_type = match self.state.next()? {
            Ok(tok_type) => tok_type,
            Err(err) => return Some(Err(err)),
        };
        Some(Ok(Token {
            r#type: tok_type,
            string: self.state.current_text(),
            start_pos: self.state.start_pos,
            end_pos: self.state.current_pos(),
            line: self.state.current_line(),
        }))
    }
}
