// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Parsing of the significant token stream into a [`Module`].
//!
//! The grammar lives in `grammar.rs`. Every statement gets a span from its
//! first token to the last significant token it consumed.

mod errors;
mod grammar;

pub use errors::{ParserError, Result};

use crate::nodes::Module;
use crate::tokenizer::Token;
use crate::version::ParseOptions;
use grammar::{python, TokVec};

/// Parse a full module from tokens produced without trivia.
pub fn parse_tokens(tokens: Vec<Token<'_>>, options: &ParseOptions) -> Result<Module> {
    let tokens = TokVec::from(tokens);
    python::file(&tokens, &tokens, options).map_err(ParserError::from)
}

/// The syntax error in `tokens`, a prefix of a module cut short by a
/// tokenizer error, if the grammar fails before running out of tokens.
pub fn prefix_error(tokens: Vec<Token<'_>>, options: &ParseOptions) -> Option<ParserError> {
    let tokens = TokVec::from(tokens);
    match python::file(&tokens, &tokens, options) {
        Err(err) if !err.location.at_end => Some(err.into()),
        _ => None,
    }
}
