// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! A Python tokenizer, parser and code generator whose statement lists can
//! hold comment nodes.
//!
//! # Overview
//!
//! - **Tokenizing**: [`tokenize`] produces the significant tokens the parser
//!   consumes; [`tokenize_with_trivia`] also keeps comments and blank-line
//!   markers.
//! - **Parsing**: [`parse_module`] or [`parse_module_with_options`] for
//!   version-aware parsing. Every statement carries a line/column [`Span`].
//! - **Code Generation**: [`unparse_module`], or the [`Codegen`] trait with a
//!   [`CodegenState`].
//! - **Inspection**: [`dump`] renders a tree without spans; the [`visitor`]
//!   module walks and rebuilds trees.
//!
//! # Quick Start
//!
//! ```
//! use pycomments_syntax::{parse_module, unparse_module};
//!
//! let source = "def hello():\n    print('world')";
//! let module = parse_module(source).expect("parse error");
//! assert_eq!(unparse_module(&module), source);
//! ```
//!
//! # Version-Aware Parsing
//!
//! ```
//! use pycomments_syntax::{parse_module_with_options, ParseOptions, PythonVersion};
//!
//! let options = ParseOptions::new(PythonVersion::V3_7);
//! assert!(parse_module_with_options("if (n := 1): pass", &options).is_err());
//! ```

// ============================================================================
// Public modules and re-exports
// ============================================================================

/// Python version abstraction for version-aware parsing.
pub mod version;
pub use version::{ParseOptions, PythonVersion};

/// Visitor and transformer infrastructure for tree traversal.
pub mod visitor;
pub use visitor::{
    transform_module, walk_module, CommentCollector, CommentInfo, SpanCollector, StatementSpan,
    Transform, Transformer, VisitResult, Visitor,
};

/// Tokenizer for Python source code.
pub mod tokenizer;
use tokenizer::{TokConfig, Token, TokenIterator};

mod nodes;
pub use nodes::*;

mod codegen;
pub use codegen::{Codegen, CodegenState};

mod dump;
pub use dump::dump;

mod parser;
pub use parser::{ParserError, Result};

use pycomments_core::text::line_start_offset;

// ============================================================================
// Tokenizing and parsing
// ============================================================================

/// Tokens up to the first tokenizer error, and that error.
fn tokenize_prefix<'a>(text: &'a str, config: &TokConfig) -> (Vec<Token<'a>>, Option<ParserError>) {
    let mut iter = TokenIterator::new(text, config);
    let mut tokens = Vec::new();
    loop {
        match iter.next() {
            Some(Ok(token)) => tokens.push(token),
            Some(Err(error)) => {
                let pos = iter.position();
                let error = ParserError::TokenizerError {
                    error,
                    line: pos.line,
                    col: pos.col,
                };
                return (tokens, Some(error));
            }
            None => return (tokens, None),
        }
    }
}

fn tokenize_with_config<'a>(text: &'a str, config: &TokConfig) -> Result<Vec<Token<'a>>> {
    match tokenize_prefix(text, config) {
        (tokens, None) => Ok(tokens),
        (_, Some(error)) => Err(error),
    }
}

/// Tokenizes Python source code into the significant tokens.
///
/// Comments and non-logical newlines are dropped.
///
/// # Example
///
/// ```
/// use pycomments_syntax::tokenize;
///
/// let tokens = tokenize("x = 1  # one").expect("tokenize error");
/// assert!(tokens.iter().all(|t| !t.string.starts_with('#')));
/// ```
pub fn tokenize(text: &str) -> Result<Vec<Token<'_>>> {
    tokenize_with_config(text, &TokConfig { keep_trivia: false })
}

/// Tokenizes Python source code keeping `Comment` and `NL` tokens.
pub fn tokenize_with_trivia(text: &str) -> Result<Vec<Token<'_>>> {
    tokenize_with_config(text, &TokConfig { keep_trivia: true })
}

/// Parses a Python module with the specified options.
///
/// A leading UTF-8 byte order mark is ignored. When the tokenizer fails, a
/// syntax error in the tokens before the failure is reported instead.
///
/// # Example
///
/// ```
/// use pycomments_syntax::{parse_module_with_options, ParseOptions, PythonVersion};
///
/// let options = ParseOptions::new(PythonVersion::V3_10);
/// let module = parse_module_with_options("x = 1", &options).expect("parse error");
/// assert_eq!(module.body.len(), 1);
/// ```
pub fn parse_module_with_options(module_text: &str, options: &ParseOptions) -> Result<Module> {
    let module_text = module_text.strip_prefix('\u{feff}').unwrap_or(module_text);
    let (tokens, tokenizer_error) = tokenize_prefix(module_text, &TokConfig { keep_trivia: false });
    match tokenizer_error {
        None => parser::parse_tokens(tokens, options),
        Some(error) => Err(parser::prefix_error(tokens, options).unwrap_or(error)),
    }
}

/// Parses a Python module in permissive mode.
///
/// # Example
///
/// ```
/// use pycomments_syntax::parse_module;
///
/// let module = parse_module("x = 1").expect("parse error");
/// ```
pub fn parse_module(module_text: &str) -> Result<Module> {
    parse_module_with_options(module_text, &ParseOptions::default())
}

/// Regenerates source text from a tree. The output has no trailing newline.
pub fn unparse_module(module: &Module) -> String {
    let mut state = CodegenState::new();
    module.codegen(&mut state);
    state.into_string()
}

// ============================================================================
// Error formatting
// ============================================================================

/// Formats a parser error with the surrounding source lines.
///
/// # Example
///
/// ```
/// use pycomments_syntax::{parse_module, prettify_error};
///
/// let source = "def f(:\n    pass";
/// let err = parse_module(source).unwrap_err();
/// let formatted = prettify_error(&err, source, "example.py");
/// assert!(formatted.contains("example.py"));
/// ```
pub fn prettify_error(err: &ParserError, module_text: &str, label: &str) -> String {
    use annotate_snippets::{Level, Renderer, Snippet};

    let (line, col) = err.position();
    let context = 1;
    let line_start = line.saturating_sub(context).max(1);
    let start_offset = line_start_offset(module_text, line_start);
    let end_offset = line_start_offset(module_text, line + context + 1);
    let error_offset = (line_start_offset(module_text, line) + col as usize).min(end_offset);
    let source = module_text[start_offset..end_offset].trim_end_matches(['\n', '\r']);
    let start = (error_offset - start_offset).min(source.len());
    let end = (start + 1).min(source.len()).max(start);
    let message = format!("{} at {}:{}", err.message(), line, col);

    let renderer = Renderer::plain();
    let annotation = Level::Error.span(start..end).label(&message);
    let snippet = Snippet::source(source)
        .line_start(line_start as usize)
        .fold(false)
        .annotations(vec![annotation]);
    let report = Level::Error.title(label).snippet(snippet);
    let rendered = renderer.render(report).to_string();
    rendered
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod test {
    use super::*;
    use tokenizer::TokError;

    #[test]
    fn test_simple() {
        let n = parse_module("1_");
        assert_eq!(
            n.err(),
            Some(ParserError::TokenizerError {
                error: TokError::BadDecimal,
                line: 1,
                col: 0,
            })
        );
    }

    #[test]
    fn test_bare_minimum_funcdef() {
        parse_module("def f(): ...").expect("parse error");
    }

    #[test]
    fn test_funcdef_params() {
        parse_module("def g(a, b): ...").expect("parse error");
    }

    #[test]
    fn test_single_statement_with_no_newline() {
        for src in &[
            "(\n \\\n)",
            "(\n    '''\n''')",
            "del _",
            "if _:\n    '''\n)'''",
            "if _:\n    ('''\n''')",
            "if _:\n     '''\n  '''",
            "if _:\n        '''\n    ''' ",
        ] {
            parse_module(src).unwrap_or_else(|e| panic!("'{}' doesn't parse: {}", src, e));
        }
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let module = parse_module("\u{feff}x = 1").expect("parse error");
        assert_eq!(module.body[0].span, Span::new(1, 0, 1, 5));
    }

    #[test]
    fn test_statement_spans() {
        let module = parse_module("@dec\ndef f():\n    x = (1,\n         2)\ny = 3").expect("parse error");
        // Decorators sit before the span, which starts at `def`.
        assert_eq!(module.body[0].span, Span::new(2, 0, 4, 11));
        assert_eq!(module.body[1].span, Span::new(5, 0, 5, 5));
    }

    #[test]
    fn test_elif_is_nested_if() {
        let module = parse_module("if a:\n    b\nelif c:\n    d\nelse:\n    e").expect("parse error");
        let StmtKind::If(outer) = &module.body[0].kind else {
            panic!("expected if");
        };
        assert_eq!(outer.orelse.len(), 1);
        assert_eq!(outer.orelse[0].span, Span::new(3, 0, 6, 5));
        assert!(matches!(outer.orelse[0].kind, StmtKind::If(_)));
    }

    #[test]
    fn test_multiple_statements_on_one_line() {
        let module = parse_module("a = 1; b = 2;\nc").expect("parse error");
        assert_eq!(module.body.len(), 3);
        assert_eq!(module.body[1].span, Span::new(1, 7, 1, 12));
    }

    #[test]
    fn test_parser_errors() {
        for src in &[
            "def f(:\n    pass",
            "x = = 1",
            "if a\n    pass",
            "f() = 1",
            "def f(a=1, b): pass",
            "try:\n    pass",
            "import",
            "x +",
        ] {
            let err = parse_module(src).expect_err(src);
            assert!(matches!(err, ParserError::ParserError { .. }), "{}: {:?}", src, err);
        }
    }

    #[test]
    fn test_syntax_error_before_unclosed_bracket() {
        let err = parse_module("def f(:\n    pass").expect_err("should fail");
        assert!(matches!(err, ParserError::ParserError { .. }), "{:?}", err);
        assert_eq!(err.position(), (1, 6));

        // A valid prefix keeps the tokenizer's error.
        let err = parse_module("x = (1,\n").expect_err("should fail");
        assert!(
            matches!(err, ParserError::TokenizerError { error: TokError::Eof, .. }),
            "{:?}",
            err
        );
    }

    #[test]
    fn test_version_gates() {
        let v37 = ParseOptions::new(PythonVersion::V3_7);
        let v310 = ParseOptions::new(PythonVersion::V3_10);
        assert!(parse_module_with_options("(x := 1)", &v37).is_err());
        assert!(parse_module_with_options("def f(a, /): pass", &v37).is_err());
        assert!(parse_module_with_options("(x := 1)", &v310).is_ok());
        assert!(parse_module_with_options("try:\n    a\nexcept* E:\n    b", &v310).is_err());
        assert!(parse_module("try:\n    a\nexcept* E:\n    b").is_ok());
    }

    #[test]
    fn test_version_independent_parsing() {
        let source = "x = 1\ny = 2";
        let permissive = parse_module(source).expect("parse error");
        let v38 = parse_module_with_options(source, &ParseOptions::new(PythonVersion::V3_8))
            .expect("parse error");
        assert_eq!(permissive, v38);
        assert_eq!(unparse_module(&permissive), source);
    }

    #[test]
    fn test_tokenize_with_trivia_keeps_comments() {
        let tokens = tokenize_with_trivia("x = 1  # one\n").expect("tokenize error");
        let comment = tokens
            .iter()
            .find(|t| t.r#type == tokenizer::TokType::Comment)
            .expect("comment token");
        assert_eq!(comment.string, "# one");
        assert_eq!((comment.start_pos.line, comment.start_pos.col), (1, 7));
    }

    #[test]
    fn test_prettify_error_points_at_location() {
        let source = "x = 1\ndef f(:\n    pass\n";
        let err = parse_module(source).expect_err("should fail");
        assert_eq!(err.position(), (2, 6));
        let formatted = prettify_error(&err, source, "bad.py");
        assert!(formatted.contains("bad.py"));
        assert!(formatted.contains("def f(:"));
        assert!(formatted.contains("at 2:6"));
    }
}
