// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The tokenizer state machine.
//!
//! [`TokState`] is an iterator over [`TokType`]s. After each item the text of
//! the token is available through [`TokState::current_text`] and its position
//! through [`TokState::start_pos`] and [`TokState::current_pos`].
//!
//! Indentation is measured twice, once with 8-column tab stops and once with
//! tabs counting as a single column. The two measures must order lines the
//! same way, otherwise the source mixes tabs and spaces inconsistently.

use thiserror::Error;

use pycomments_core::text::TAB_SIZE;

const ALT_TAB_SIZE: usize = 1;

/// Operators, longest first so the first prefix match wins.
const OPERATORS: &[&str] = &[
    "**=", "//=", ">>=", "<<=", "...", "!=", "%=", "&=", "**", "*=", "+=", "-=", "->", "//", "/=",
    ":=", "<<", "<=", "==", ">=", ">>", "@=", "^=", "|=", "%", "&", "(", ")", "*", "+", ",", "-",
    ".", "/", ":", ";", "<", "=", ">", "@", "[", "]", "^", "{", "|", "}", "~",
];

/// String prefixes accepted in front of a quote (compared case-insensitively).
const STRING_PREFIXES: &[&str] = &["r", "u", "b", "f", "br", "rb", "fr", "rf"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokType {
    String,
    Name,
    Number,
    Op,
    /// A `#` comment up to (not including) the line terminator.
    Comment,
    /// A line break that does not end a logical line.
    NL,
    Newline,
    Indent,
    Dedent,
    EndMarker,
}

impl TokType {
    /// Tokens that carry no syntax: comments and non-logical line breaks.
    pub fn is_trivia(self) -> bool {
        matches!(self, TokType::Comment | TokType::NL)
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokError {
    #[error("inconsistent mixing of tabs and spaces")]
    TabSpace,
    #[error("unindent does not match any outer indentation level")]
    Dedent,
    #[error("unexpected EOF in multi-line statement")]
    Eof,
    #[error("unexpected character after line continuation character")]
    LineContinuation,
    #[error("invalid character {0:?} in source")]
    BadCharacter(char),
    #[error("unmatched {0:?}")]
    UnmatchedClosingParen(char),
    #[error("closing parenthesis {1:?} does not match opening parenthesis {0:?}")]
    MismatchedClosingParen(char, char),
    #[error("invalid decimal literal")]
    BadDecimal,
    #[error(
        "leading zeros in decimal integer literals are not permitted; use an 0o prefix for octal integers"
    )]
    BadDecimalLeadingZeros,
    #[error("invalid hexadecimal literal")]
    BadHexadecimal,
    #[error("invalid octal literal")]
    BadOctal,
    #[error("invalid digit {0:?} in octal literal")]
    BadOctalDigit(char),
    #[error("invalid binary literal")]
    BadBinary,
    #[error("invalid digit {0:?} in binary literal")]
    BadBinaryDigit(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated triple-quoted string literal")]
    UnterminatedTripleQuotedString,
}

/// A position in the source text.
///
/// `line` is 1-indexed, `col` is the 0-indexed byte offset within the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextPosition {
    pub byte_idx: usize,
    pub line: u32,
    pub col: u32,
}

#[derive(Debug, Clone, Default)]
pub struct TokConfig {
    /// Emit [`TokType::Comment`] and [`TokType::NL`] tokens. The parser runs
    /// without them; the comment extractor needs them.
    pub keep_trivia: bool,
}

pub struct TokState<'t> {
    text: &'t str,
    config: TokConfig,

    pos: usize,
    line: u32,
    line_start: usize,

    /// Start of the most recently produced token.
    pub start_pos: TextPosition,
    start_line_start: usize,

    indent_stack: Vec<usize>,
    alt_indent_stack: Vec<usize>,
    pending_indent: bool,
    pending_dedents: usize,

    parens: Vec<char>,
    at_bol: bool,
    /// Whether the current logical line has produced a significant token.
    line_has_content: bool,
    finished: bool,
}

impl<'t> TokState<'t> {
    pub fn new(text: &'t str, config: &TokConfig) -> Self {
        TokState {
            text,
            config: config.clone(),
            pos: 0,
            line: 1,
            line_start: 0,
            start_pos: TextPosition {
                byte_idx: 0,
                line: 1,
                col: 0,
            },
            start_line_start: 0,
            indent_stack: vec![0],
            alt_indent_stack: vec![0],
            pending_indent: false,
            pending_dedents: 0,
            parens: Vec::new(),
            at_bol: true,
            line_has_content: false,
            finished: false,
        }
    }

    /// Text of the most recently produced token.
    pub fn current_text(&self) -> &'t str {
        &self.text[self.start_pos.byte_idx..self.pos]
    }

    /// The physical line the most recently produced token starts on,
    /// without its terminator.
    pub fn current_line(&self) -> &'t str {
        let rest = &self.text[self.start_line_start..];
        match memchr::memchr2(b'\n', b'\r', rest.as_bytes()) {
            Some(end) => &rest[..end],
            None => rest,
        }
    }

    pub fn current_pos(&self) -> TextPosition {
        TextPosition {
            byte_idx: self.pos,
            line: self.line,
            col: (self.pos - self.line_start) as u32,
        }
    }

    fn mark_start(&mut self) {
        self.start_pos = self.current_pos();
        self.start_line_start = self.line_start;
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.text[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        match c {
            '\n' => self.new_line(),
            '\r' if self.peek() != Some('\n') => self.new_line(),
            _ => {}
        }
        Some(c)
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }

    fn new_line(&mut self) {
        self.line += 1;
        self.line_start = self.pos;
    }

    fn significant(&mut self, tok: TokType) -> Result<Option<TokType>, TokError> {
        self.line_has_content = true;
        Ok(Some(tok))
    }

    fn next_token(&mut self) -> Result<Option<TokType>, TokError> {
        loop {
            if self.finished {
                return Ok(None);
            }
            if self.pending_indent {
                self.pending_indent = false;
                self.mark_start();
                return Ok(Some(TokType::Indent));
            }
            if self.pending_dedents > 0 {
                self.pending_dedents -= 1;
                self.mark_start();
                return Ok(Some(TokType::Dedent));
            }
            if self.at_bol {
                self.at_bol = false;
                self.process_indentation()?;
                continue;
            }

            self.bump_while(|c| matches!(c, ' ' | '\t' | '\x0c'));
            self.mark_start();

            let Some(c) = self.peek() else {
                return self.end_of_input();
            };
            match c {
                '#' => {
                    let rest = &self.text.as_bytes()[self.pos..];
                    self.pos += memchr::memchr2(b'\n', b'\r', rest).unwrap_or(rest.len());
                    if self.config.keep_trivia {
                        return Ok(Some(TokType::Comment));
                    }
                }
                '\n' | '\r' => {
                    self.bump();
                    if c == '\r' && self.peek() == Some('\n') {
                        self.bump();
                    }
                    self.at_bol = true;
                    if !self.parens.is_empty() || !self.line_has_content {
                        if self.config.keep_trivia {
                            return Ok(Some(TokType::NL));
                        }
                    } else {
                        self.line_has_content = false;
                        return Ok(Some(TokType::Newline));
                    }
                }
                '\\' => {
                    self.bump();
                    match self.peek() {
                        Some('\n') => {
                            self.bump();
                        }
                        Some('\r') => {
                            self.bump();
                            if self.peek() == Some('\n') {
                                self.bump();
                            }
                        }
                        None => return Err(TokError::Eof),
                        Some(_) => return Err(TokError::LineContinuation),
                    }
                }
                '\'' | '"' => {
                    self.consume_string()?;
                    return self.significant(TokType::String);
                }
                '.' if self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                    self.consume_number()?;
                    return self.significant(TokType::Number);
                }
                c if c.is_ascii_digit() => {
                    self.consume_number()?;
                    return self.significant(TokType::Number);
                }
                c if is_identifier_start(c) => {
                    self.bump_while(is_identifier_continue);
                    let ident = &self.text[self.start_pos.byte_idx..self.pos];
                    if matches!(self.peek(), Some('\'' | '"')) && is_string_prefix(ident) {
                        self.consume_string()?;
                        return self.significant(TokType::String);
                    }
                    return self.significant(TokType::Name);
                }
                _ => {
                    self.consume_operator(c)?;
                    return self.significant(TokType::Op);
                }
            }
        }
    }

    fn end_of_input(&mut self) -> Result<Option<TokType>, TokError> {
        if !self.parens.is_empty() {
            return Err(TokError::Eof);
        }
        if self.line_has_content {
            // Fake newline so the last logical line is always terminated.
            self.line_has_content = false;
            return Ok(Some(TokType::Newline));
        }
        if self.indent_stack.len() > 1 {
            self.pending_dedents = self.indent_stack.len() - 2;
            self.indent_stack.truncate(1);
            self.alt_indent_stack.truncate(1);
            return Ok(Some(TokType::Dedent));
        }
        self.finished = true;
        Ok(Some(TokType::EndMarker))
    }

    fn process_indentation(&mut self) -> Result<(), TokError> {
        let mut col = 0usize;
        let mut altcol = 0usize;
        loop {
            match self.peek() {
                Some(' ') => {
                    col += 1;
                    altcol += 1;
                }
                Some('\t') => {
                    col = (col / TAB_SIZE + 1) * TAB_SIZE;
                    altcol = (altcol / ALT_TAB_SIZE + 1) * ALT_TAB_SIZE;
                }
                Some('\x0c') => {
                    col = 0;
                    altcol = 0;
                }
                _ => break,
            }
            self.bump();
        }

        // Blank lines, comment-only lines and continuation lines inside
        // brackets leave the indentation untouched.
        if matches!(self.peek(), None | Some('#' | '\n' | '\r')) || !self.parens.is_empty() {
            return Ok(());
        }

        let top = self.indent_stack.last().copied().unwrap_or(0);
        let alt_top = self.alt_indent_stack.last().copied().unwrap_or(0);
        if col == top {
            if altcol != alt_top {
                return Err(TokError::TabSpace);
            }
        } else if col > top {
            if altcol <= alt_top {
                return Err(TokError::TabSpace);
            }
            self.indent_stack.push(col);
            self.alt_indent_stack.push(altcol);
            self.pending_indent = true;
        } else {
            while self.indent_stack.len() > 1
                && col < self.indent_stack.last().copied().unwrap_or(0)
            {
                self.indent_stack.pop();
                self.alt_indent_stack.pop();
                self.pending_dedents += 1;
            }
            if col != self.indent_stack.last().copied().unwrap_or(0) {
                return Err(TokError::Dedent);
            }
            if altcol != self.alt_indent_stack.last().copied().unwrap_or(0) {
                return Err(TokError::TabSpace);
            }
        }
        Ok(())
    }

    fn consume_operator(&mut self, c: char) -> Result<(), TokError> {
        let rest = &self.text[self.pos..];
        let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) else {
            return Err(TokError::BadCharacter(c));
        };
        match c {
            '(' | '[' | '{' => self.parens.push(c),
            ')' | ']' | '}' => match self.parens.pop() {
                None => return Err(TokError::UnmatchedClosingParen(c)),
                Some(open) if closing_for(open) != c => {
                    return Err(TokError::MismatchedClosingParen(open, c))
                }
                Some(_) => {}
            },
            _ => {}
        }
        self.pos += op.len();
        Ok(())
    }

    fn consume_string(&mut self) -> Result<(), TokError> {
        let Some(quote) = self.bump() else {
            return Err(TokError::UnterminatedString);
        };
        let triple = self.peek() == Some(quote) && self.peek_nth(1) == Some(quote);
        if triple {
            self.bump();
            self.bump();
        }
        let unterminated = if triple {
            TokError::UnterminatedTripleQuotedString
        } else {
            TokError::UnterminatedString
        };
        loop {
            match self.bump() {
                None => return Err(unterminated),
                Some('\\') => match self.bump() {
                    None => return Err(unterminated),
                    Some('\r') if self.peek() == Some('\n') => {
                        self.bump();
                    }
                    Some(_) => {}
                },
                Some('\n' | '\r') if !triple => return Err(TokError::UnterminatedString),
                Some(c) if c == quote => {
                    if !triple {
                        return Ok(());
                    }
                    if self.peek() == Some(quote) && self.peek_nth(1) == Some(quote) {
                        self.bump();
                        self.bump();
                        return Ok(());
                    }
                }
                Some(_) => {}
            }
        }
    }

    fn consume_number(&mut self) -> Result<(), TokError> {
        match self.peek() {
            Some('.') => {
                self.bump();
                self.consume_decimal_digits()?;
                return self.consume_exponent_and_imaginary();
            }
            Some('0') => {
                self.bump();
                match self.peek() {
                    Some('x' | 'X') => {
                        self.bump();
                        return self.consume_radix_digits(
                            |c| c.is_ascii_hexdigit(),
                            TokError::BadHexadecimal,
                            None,
                        );
                    }
                    Some('o' | 'O') => {
                        self.bump();
                        return self.consume_radix_digits(
                            |c| ('0'..='7').contains(&c),
                            TokError::BadOctal,
                            Some(TokError::BadOctalDigit),
                        );
                    }
                    Some('b' | 'B') => {
                        self.bump();
                        return self.consume_radix_digits(
                            |c| c == '0' || c == '1',
                            TokError::BadBinary,
                            Some(TokError::BadBinaryDigit),
                        );
                    }
                    _ => {}
                }
                // Zeros, optionally separated by underscores.
                let mut nonzero = false;
                loop {
                    self.bump_while(|c| c == '0');
                    if self.peek() != Some('_') {
                        break;
                    }
                    self.bump();
                    if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                        return Err(TokError::BadDecimal);
                    }
                }
                if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    nonzero = true;
                    self.consume_decimal_digits()?;
                }
                match self.peek() {
                    Some('.' | 'e' | 'E' | 'j' | 'J') => {}
                    _ if nonzero => return Err(TokError::BadDecimalLeadingZeros),
                    _ => return Ok(()),
                }
            }
            _ => self.consume_decimal_digits()?,
        }
        if self.peek() == Some('.') {
            self.bump();
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.consume_decimal_digits()?;
            }
        }
        self.consume_exponent_and_imaginary()
    }

    /// Digits with single underscores between them. The first digit must be
    /// present.
    fn consume_decimal_digits(&mut self) -> Result<(), TokError> {
        loop {
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(TokError::BadDecimal);
            }
            self.bump_while(|c| c.is_ascii_digit());
            if self.peek() != Some('_') {
                return Ok(());
            }
            self.bump();
        }
    }

    fn consume_exponent_and_imaginary(&mut self) -> Result<(), TokError> {
        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            self.consume_decimal_digits()?;
        }
        if matches!(self.peek(), Some('j' | 'J')) {
            self.bump();
        }
        Ok(())
    }

    fn consume_radix_digits(
        &mut self,
        is_digit: impl Fn(char) -> bool,
        invalid: TokError,
        bad_digit: Option<fn(char) -> TokError>,
    ) -> Result<(), TokError> {
        loop {
            if self.peek() == Some('_') {
                self.bump();
            }
            match self.peek() {
                Some(c) if is_digit(c) => self.bump_while(&is_digit),
                Some(c) if c.is_ascii_digit() => {
                    return Err(bad_digit.map_or(invalid, |f| f(c)));
                }
                _ => return Err(invalid),
            }
            if self.peek() != Some('_') {
                break;
            }
        }
        match (self.peek(), bad_digit) {
            (Some(c), Some(f)) if c.is_ascii_digit() => Err(f(c)),
            _ => Ok(()),
        }
    }
}

impl Iterator for TokState<'_> {
    type Item = Result<TokType, TokError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(tok) => tok.map(Ok),
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

fn closing_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

fn is_identifier_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_identifier_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn is_string_prefix(ident: &str) -> bool {
    STRING_PREFIXES
        .iter()
        .any(|prefix| prefix.eq_ignore_ascii_case(ident))
}
