//! Comment records from the token stream.

use pycomments_syntax::tokenizer::TokType;
use pycomments_syntax::{tokenize_with_trivia, Comment, ParserError, Span};

/// A comment token and where it sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    /// Raw text, leading `#` included.
    pub value: String,
    /// Single-line span of the comment token.
    pub span: Span,
    /// Code precedes the comment on its physical line.
    pub inline: bool,
}

impl CommentRecord {
    pub fn line(&self) -> u32 {
        self.span.lineno
    }

    pub fn to_comment(&self) -> Comment {
        Comment::new(self.value.clone(), self.inline)
    }

    /// The text with the marker and surrounding whitespace removed.
    pub fn text(&self) -> &str {
        self.value.strip_prefix('#').unwrap_or(&self.value).trim()
    }
}

/// Every comment in `source`, in source order.
///
/// Tokenizer failures are returned as they are.
pub fn extract_comments(source: &str) -> Result<Vec<CommentRecord>, ParserError> {
    let tokens = tokenize_with_trivia(source)?;
    let comments = tokens
        .iter()
        .filter(|token| token.r#type == TokType::Comment)
        .map(|token| {
            let value = token.string.trim_end_matches('\r');
            let start = token.start_pos;
            let inline = token
                .line
                .get(..start.col as usize)
                .is_some_and(|before| !before.trim().is_empty());
            CommentRecord {
                value: value.to_string(),
                span: Span::new(
                    start.line,
                    start.col,
                    start.line,
                    start.col + value.len() as u32,
                ),
                inline,
            }
        })
        .collect();
    Ok(comments)
}
