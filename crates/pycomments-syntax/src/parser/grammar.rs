// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! PEG grammar over the significant token stream.
//!
//! Rules follow the layout of the CPython grammar. No two alternatives of a
//! rule share a parsed prefix longer than a token or two, so nested brackets
//! and suites never parse twice.

use std::fmt;
use std::iter;

use peg::{Parse, ParseElem, RuleResult};

use crate::nodes::{
    Alias, Arg, Arguments, BoolOp, ClassDef, CmpOp, Comprehension, Constant, ExceptHandler, Expr,
    For, FunctionDef, Handler, HandlerKind, If, Keyword, Module, Operator, Span, Stmt, StmtKind,
    Try, UnaryOp, While, With, WithItem,
};
use crate::tokenizer::{TextPosition, TokType, Token};
use crate::version::ParseOptions;

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

fn is_keyword(text: &str) -> bool {
    KEYWORDS.contains(&text)
}

// ============================================================================
// Token input
// ============================================================================

/// Where a parse failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLoc {
    pub position: TextPosition,
    /// The parser ran past the last token.
    pub at_end: bool,
}

impl fmt::Display for ParseLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.position.line, self.position.col)
    }
}

#[derive(Debug)]
pub struct TokVec<'a>(Vec<Token<'a>>);

impl<'a> From<Vec<Token<'a>>> for TokVec<'a> {
    fn from(tokens: Vec<Token<'a>>) -> Self {
        TokVec(tokens)
    }
}

impl TokVec<'_> {
    /// Span from the token at `start` to the last significant token before
    /// `end`, so `NEWLINE`, `INDENT` and `DEDENT` never widen a span.
    fn span(&self, start: usize, end: usize) -> Span {
        let tokens = self.0.get(start..end).unwrap_or_default();
        let first = tokens.first().map(|t| t.start_pos).unwrap_or_default();
        let last = tokens
            .iter()
            .rev()
            .find(|t| {
                matches!(
                    t.r#type,
                    TokType::Name | TokType::Number | TokType::String | TokType::Op
                )
            })
            .map_or(first, |t| t.end_pos);
        Span::new(first.line, first.col, last.line, last.col)
    }
}

impl Parse for TokVec<'_> {
    type PositionRepr = ParseLoc;

    fn start(&self) -> usize {
        0
    }

    fn is_eof(&self, pos: usize) -> bool {
        pos >= self.0.len()
    }

    fn position_repr(&self, pos: usize) -> ParseLoc {
        match self.0.get(pos) {
            Some(tok) => ParseLoc {
                position: tok.start_pos,
                at_end: false,
            },
            None => ParseLoc {
                position: self.0.last().map(|t| t.end_pos).unwrap_or_default(),
                at_end: true,
            },
        }
    }
}

impl<'input, 'a: 'input> ParseElem<'input> for TokVec<'a> {
    type Element = &'input Token<'a>;

    fn parse_elem(&'input self, pos: usize) -> RuleResult<Self::Element> {
        match self.0.get(pos) {
            Some(tok) => RuleResult::Matched(pos + 1, tok),
            None => RuleResult::Failed,
        }
    }
}

// ============================================================================
// Rule results
// ============================================================================

enum AssignRest {
    Annotated {
        annotation: Expr,
        value: Option<Expr>,
    },
    Augmented {
        op: Operator,
        value: Expr,
    },
    Assign(Vec<Expr>),
}

enum ParamItem {
    Slash,
    Star(Option<Arg>),
    DoubleStar(Arg),
    Plain(Arg, Option<Expr>),
}

enum CallArgument {
    Positional(Expr),
    Keyword(Keyword),
}

enum Trailer {
    Attribute(String),
    Call(Vec<CallArgument>),
    Subscript(Expr),
}

enum SequenceTail {
    Comprehension(Vec<Comprehension>),
    Elements(Vec<Expr>, bool),
}

enum DictTail {
    Comprehension(Vec<Comprehension>),
    Entries(Vec<(Option<Expr>, Expr)>),
}

enum BraceTail {
    Dict(Expr, DictTail),
    Set(SequenceTail),
}

type TryRest = (Vec<(Handler, bool)>, Vec<Stmt>, Vec<Stmt>);

// ============================================================================
// Grammar
// ============================================================================

peg::parser! {
    pub grammar python<'a>(tokens: &TokVec<'a>, options: &ParseOptions) for TokVec<'a> {

        pub rule file() -> Module
            = lines:file_line()* tok(TokType::EndMarker, "end of input") {
                Module { body: lines.into_iter().flatten().collect() }
            }

        rule file_line() -> Vec<Stmt>
            = tok(TokType::Newline, "NEWLINE") { Vec::new() }
            / statement()

        rule statement() -> Vec<Stmt>
            = s:compound_stmt() { vec![s] }
            / simple_stmts()

        rule simple_stmts() -> Vec<Stmt>
            = stmts:simple_stmt() ++ lit(";") lit(";")? tok(TokType::Newline, "NEWLINE") { stmts }

        rule block() -> Vec<Stmt>
            = tok(TokType::Newline, "NEWLINE") tok(TokType::Indent, "INDENT")
              lines:statement()+ tok(TokType::Dedent, "DEDENT") {
                lines.into_iter().flatten().collect()
            }
            / simple_stmts()

        rule suite() -> Vec<Stmt>
            = lit(":") b:block() { b }

        // --------------------------------------------------------------
        // Simple statements
        // --------------------------------------------------------------

        rule simple_stmt() -> Stmt
            = s:position!() kind:simple_kind() e:position!() { Stmt::new(kind, tokens.span(s, e)) }

        rule simple_kind() -> StmtKind
            = lit("pass") { StmtKind::Pass }
            / lit("break") { StmtKind::Break }
            / lit("continue") { StmtKind::Continue }
            / lit("return") value:star_expressions()? { StmtKind::Return { value } }
            / lit("del") targets:del_target() ++ lit(",") lit(",")? { StmtKind::Delete { targets } }
            / import_name()
            / import_from()
            / lit("global") names:name() ++ lit(",") { StmtKind::Global { names } }
            / lit("nonlocal") names:name() ++ lit(",") { StmtKind::Nonlocal { names } }
            / lit("raise") args:raise_args()? {
                let (exc, cause) = match args {
                    Some((exc, cause)) => (Some(exc), cause),
                    None => (None, None),
                };
                StmtKind::Raise { exc, cause }
            }
            / lit("assert") test:expression() msg:(lit(",") m:expression() { m })? {
                StmtKind::Assert { test, msg }
            }
            / expression_stmt()

        rule raise_args() -> (Expr, Option<Expr>)
            = exc:expression() cause:(lit("from") c:expression() { c })? { (exc, cause) }

        rule del_target() -> Expr
            = t:bitwise_or() {? target(t) }

        rule expression_stmt() -> StmtKind
            = paren:paren_start()? first:star_expressions_or_yield() rest:assignment_rest()? {?
                expression_statement(first, rest, paren.is_some())
            }

        rule paren_start() -> ()
            = &lit("(") { () }

        rule assignment_rest() -> AssignRest
            = lit(":") annotation:expression() value:(lit("=") v:star_expressions_or_yield() { v })? {
                AssignRest::Annotated { annotation, value }
            }
            / op:augassign() value:star_expressions_or_yield() { AssignRest::Augmented { op, value } }
            / values:(lit("=") v:star_expressions_or_yield() { v })+ { AssignRest::Assign(values) }

        rule augassign() -> Operator
            = [t] {?
                match t.r#type {
                    TokType::Op => Operator::from_augassign(t.string).ok_or("augmented assignment"),
                    _ => Err("augmented assignment"),
                }
            }

        rule import_name() -> StmtKind
            = lit("import") names:dotted_as_name() ++ lit(",") { StmtKind::Import { names } }

        rule dotted_as_name() -> Alias
            = name:dotted_name() asname:(lit("as") n:name() { n })? { Alias { name, asname } }

        rule dotted_name() -> String
            = parts:name() ++ lit(".") { parts.join(".") }

        rule import_from() -> StmtKind
            = lit("from") dots:import_dot()* module:dotted_name()? lit("import") names:import_targets() {?
                let level: u32 = dots.iter().sum();
                if level == 0 && module.is_none() {
                    Err("module name")
                } else {
                    Ok(StmtKind::ImportFrom { module, names, level })
                }
            }

        rule import_dot() -> u32
            = lit(".") { 1 }
            / lit("...") { 3 }

        rule import_targets() -> Vec<Alias>
            = lit("(") names:import_as_name() ++ lit(",") lit(",")? lit(")") { names }
            / lit("*") { vec![Alias { name: "*".to_string(), asname: None }] }
            / import_as_name() ++ lit(",")

        rule import_as_name() -> Alias
            = name:name() asname:(lit("as") n:name() { n })? { Alias { name, asname } }

        // --------------------------------------------------------------
        // Compound statements
        // --------------------------------------------------------------

        rule compound_stmt() -> Stmt
            = decorator_list:decorator()* s:position!() kind:definition() e:position!() {
                Stmt::new(decorate(kind, decorator_list), tokens.span(s, e))
            }
            / s:position!() kind:compound_kind() e:position!() { Stmt::new(kind, tokens.span(s, e)) }

        rule decorator() -> Expr
            = lit("@") e:named_expression() tok(TokType::Newline, "NEWLINE") { e }

        rule definition() -> StmtKind
            = f:function_def() { StmtKind::FunctionDef(f) }
            / c:class_def() { StmtKind::ClassDef(c) }

        rule compound_kind() -> StmtKind
            = i:if_stmt() { StmtKind::If(i) }
            / w:while_stmt() { StmtKind::While(w) }
            / f:for_stmt() { StmtKind::For(f) }
            / t:try_stmt() { StmtKind::Try(t) }
            / w:with_stmt() { StmtKind::With(w) }

        rule function_def() -> FunctionDef
            = is_async:lit("async")? lit("def") name:name() lit("(") args:parameters()? lit(")")
              returns:(lit("->") r:expression() { r })? body:suite() {
                FunctionDef {
                    name,
                    args: args.unwrap_or_default(),
                    body,
                    decorator_list: Vec::new(),
                    returns,
                    is_async: is_async.is_some(),
                }
            }

        rule parameters() -> Arguments
            = items:param_item() ++ lit(",") lit(",")? {? build_arguments(items, options) }

        rule param_item() -> ParamItem
            = lit("/") { ParamItem::Slash }
            / lit("**") a:param() { ParamItem::DoubleStar(a) }
            / lit("*") a:param()? { ParamItem::Star(a) }
            / a:param() d:param_default()? { ParamItem::Plain(a, d) }

        rule param() -> Arg
            = arg:name() annotation:(lit(":") e:expression() { e })? { Arg { arg, annotation } }

        rule param_default() -> Expr
            = lit("=") e:expression() { e }

        rule lambda_parameters() -> Arguments
            = items:lambda_param_item() ++ lit(",") lit(",")? {? build_arguments(items, options) }

        rule lambda_param_item() -> ParamItem
            = lit("/") { ParamItem::Slash }
            / lit("**") a:lambda_param() { ParamItem::DoubleStar(a) }
            / lit("*") a:lambda_param()? { ParamItem::Star(a) }
            / a:lambda_param() d:param_default()? { ParamItem::Plain(a, d) }

        rule lambda_param() -> Arg
            = arg:name() { Arg::new(arg) }

        rule class_def() -> ClassDef
            = lit("class") name:name() args:(lit("(") a:call_arguments()? lit(")") { a })? body:suite() {
                let (bases, keywords) = split_arguments(args.flatten().unwrap_or_default());
                ClassDef { name, bases, keywords, body, decorator_list: Vec::new() }
            }

        rule if_stmt() -> If
            = lit("if") test:named_expression() body:suite() orelse:if_tail()? {
                If { test, body, orelse: orelse.unwrap_or_default() }
            }

        // `elif` becomes a nested `If` spanning to the end of the chain.
        rule if_tail() -> Vec<Stmt>
            = s:position!() lit("elif") test:named_expression() body:suite() orelse:if_tail()? e:position!() {
                let nested = If { test, body, orelse: orelse.unwrap_or_default() };
                vec![Stmt::new(StmtKind::If(nested), tokens.span(s, e))]
            }
            / else_block()

        rule else_block() -> Vec<Stmt>
            = lit("else") b:suite() { b }

        rule while_stmt() -> While
            = lit("while") test:named_expression() body:suite() orelse:else_block()? {
                While { test, body, orelse: orelse.unwrap_or_default() }
            }

        rule for_stmt() -> For
            = is_async:lit("async")? lit("for") target:target_list() lit("in") iter:star_expressions()
              body:suite() orelse:else_block()? {
                For { target, iter, body, orelse: orelse.unwrap_or_default(), is_async: is_async.is_some() }
            }

        rule with_stmt() -> With
            = is_async:lit("async")? lit("with") items:with_items() body:suite() {
                With { items, body, is_async: is_async.is_some() }
            }

        rule with_items() -> Vec<WithItem>
            = lit("(") items:with_item() ++ lit(",") lit(",")? lit(")") &lit(":") { items }
            / with_item() ++ lit(",")

        rule with_item() -> WithItem
            = context_expr:expression() optional_vars:(lit("as") t:star_target() {? target(t) })? {
                WithItem { context_expr, optional_vars }
            }

        rule try_stmt() -> Try
            = lit("try") body:suite() rest:try_rest() {?
                let (handlers, orelse, finalbody) = rest;
                let is_star = handlers.first().is_some_and(|(_, star)| *star);
                if handlers.iter().any(|(_, star)| *star != is_star) {
                    Err("'except' or 'except*' throughout")
                } else {
                    let handlers = handlers.into_iter().map(|(handler, _)| handler).collect();
                    Ok(Try { body, handlers, orelse, finalbody, is_star })
                }
            }

        rule try_rest() -> TryRest
            = handlers:except_block()+ orelse:else_block()? finalbody:finally_block()? {
                (handlers, orelse.unwrap_or_default(), finalbody.unwrap_or_default())
            }
            / finalbody:finally_block() { (Vec::new(), Vec::new(), finalbody) }

        rule finally_block() -> Vec<Stmt>
            = lit("finally") b:suite() { b }

        rule except_block() -> (Handler, bool)
            = s:position!() lit("except") star:lit("*")? clause:except_clause()? body:suite() e:position!() {?
                except_handler(star.is_some(), clause, body, tokens.span(s, e), options)
            }

        rule except_clause() -> (Expr, Option<String>)
            = type_:expression() name:(lit("as") n:name() { n })? { (type_, name) }

        // --------------------------------------------------------------
        // Expressions
        // --------------------------------------------------------------

        rule star_expressions_or_yield() -> Expr
            = yield_expr()
            / star_expressions()

        rule star_expressions() -> Expr
            = first:star_expression() rest:(lit(",") e:star_expression() { e })* trailing:lit(",")? {
                sequence(first, rest, trailing.is_some())
            }

        rule star_expression() -> Expr
            = lit("*") e:bitwise_or() { Expr::Starred(Box::new(e)) }
            / expression()

        rule star_named_expression() -> Expr
            = lit("*") e:bitwise_or() { Expr::Starred(Box::new(e)) }
            / named_expression()

        rule star_target() -> Expr
            = lit("*") e:bitwise_or() { Expr::Starred(Box::new(e)) }
            / bitwise_or()

        // Targets of a `for` loop or comprehension, stopping before `in`.
        rule target_list() -> Expr
            = first:star_target() rest:(lit(",") t:star_target() { t })* trailing:lit(",")? {?
                target(sequence(first, rest, trailing.is_some()))
            }

        rule yield_expr() -> Expr
            = lit("yield") lit("from") e:expression() { Expr::YieldFrom(Box::new(e)) }
            / lit("yield") value:star_expressions()? { Expr::Yield(value.map(Box::new)) }

        rule named_expression() -> Expr
            = target:name() lit(":=") value:expression() {?
                if options.version.has_walrus() {
                    Ok(Expr::NamedExpr {
                        target: Box::new(Expr::Name(target)),
                        value: Box::new(value),
                    })
                } else {
                    Err("assignment expressions need Python 3.8")
                }
            }
            / expression()

        rule expression() -> Expr
            = lambda()
            / body:disjunction() branch:(lit("if") t:disjunction() lit("else") o:expression() { (t, o) })? {
                match branch {
                    Some((test, orelse)) => Expr::IfExp {
                        test: Box::new(test),
                        body: Box::new(body),
                        orelse: Box::new(orelse),
                    },
                    None => body,
                }
            }

        rule lambda() -> Expr
            = lit("lambda") args:lambda_parameters()? lit(":") body:expression() {
                Expr::Lambda { args: Box::new(args.unwrap_or_default()), body: Box::new(body) }
            }

        rule disjunction() -> Expr
            = values:conjunction() ++ lit("or") { bool_op(BoolOp::Or, values) }

        rule conjunction() -> Expr
            = values:inversion() ++ lit("and") { bool_op(BoolOp::And, values) }

        rule inversion() -> Expr
            = lit("not") operand:inversion() { unary(UnaryOp::Not, operand) }
            / comparison()

        rule comparison() -> Expr
            = left:bitwise_or() pairs:(op:comparison_op() right:bitwise_or() { (op, right) })* {
                if pairs.is_empty() {
                    left
                } else {
                    let (ops, comparators) = pairs.into_iter().unzip();
                    Expr::Compare { left: Box::new(left), ops, comparators }
                }
            }

        rule comparison_op() -> CmpOp
            = lit("==") { CmpOp::Eq }
            / lit("!=") { CmpOp::NotEq }
            / lit("<=") { CmpOp::LtE }
            / lit("<") { CmpOp::Lt }
            / lit(">=") { CmpOp::GtE }
            / lit(">") { CmpOp::Gt }
            / lit("not") lit("in") { CmpOp::NotIn }
            / lit("is") lit("not") { CmpOp::IsNot }
            / lit("is") { CmpOp::Is }
            / lit("in") { CmpOp::In }

        rule bitwise_or() -> Expr = precedence! {
            l:(@) lit("|") r:@ { binary(l, Operator::BitOr, r) }
            --
            l:(@) lit("^") r:@ { binary(l, Operator::BitXor, r) }
            --
            l:(@) lit("&") r:@ { binary(l, Operator::BitAnd, r) }
            --
            l:(@) lit("<<") r:@ { binary(l, Operator::LShift, r) }
            l:(@) lit(">>") r:@ { binary(l, Operator::RShift, r) }
            --
            l:(@) lit("+") r:@ { binary(l, Operator::Add, r) }
            l:(@) lit("-") r:@ { binary(l, Operator::Sub, r) }
            --
            l:(@) lit("*") r:@ { binary(l, Operator::Mult, r) }
            l:(@) lit("/") r:@ { binary(l, Operator::Div, r) }
            l:(@) lit("//") r:@ { binary(l, Operator::FloorDiv, r) }
            l:(@) lit("%") r:@ { binary(l, Operator::Mod, r) }
            l:(@) lit("@") r:@ { binary(l, Operator::MatMult, r) }
            --
            f:factor() { f }
        }

        rule factor() -> Expr
            = lit("+") f:factor() { unary(UnaryOp::UAdd, f) }
            / lit("-") f:factor() { unary(UnaryOp::USub, f) }
            / lit("~") f:factor() { unary(UnaryOp::Invert, f) }
            / power()

        rule power() -> Expr
            = left:await_primary() right:(lit("**") f:factor() { f })? {
                match right {
                    Some(right) => binary(left, Operator::Pow, right),
                    None => left,
                }
            }

        rule await_primary() -> Expr
            = lit("await") p:primary() { Expr::Await(Box::new(p)) }
            / primary()

        rule primary() -> Expr
            = a:atom() trailers:trailer()* { trailers.into_iter().fold(a, apply_trailer) }

        rule trailer() -> Trailer
            = lit(".") attr:name() { Trailer::Attribute(attr) }
            / lit("(") args:call_arguments()? lit(")") { Trailer::Call(args.unwrap_or_default()) }
            / lit("[") slice:slices() lit("]") { Trailer::Subscript(slice) }

        rule slices() -> Expr
            = first:slice() rest:(lit(",") s:slice() { s })* trailing:lit(",")? {
                sequence(first, rest, trailing.is_some())
            }

        rule slice() -> Expr
            = lit("*") e:bitwise_or() { Expr::Starred(Box::new(e)) }
            / lower:named_expression()? bounds:slice_bounds()? {? slice(lower, bounds) }

        rule slice_bounds() -> (Option<Expr>, Option<Expr>)
            = lit(":") upper:expression()? step:(lit(":") s:expression()? { s })? { (upper, step.flatten()) }

        rule call_arguments() -> Vec<CallArgument>
            = items:call_argument() ++ lit(",") lit(",")? { items }

        rule call_argument() -> CallArgument
            = lit("*") e:expression() { CallArgument::Positional(Expr::Starred(Box::new(e))) }
            / lit("**") e:expression() { CallArgument::Keyword(Keyword { arg: None, value: e }) }
            / arg:name() lit("=") value:expression() { CallArgument::Keyword(Keyword { arg: Some(arg), value }) }
            / value:named_expression() generators:for_if_clauses()? {
                CallArgument::Positional(match generators {
                    Some(generators) => Expr::GeneratorExp { elt: Box::new(value), generators },
                    None => value,
                })
            }

        rule for_if_clauses() -> Vec<Comprehension>
            = for_if_clause()+

        rule for_if_clause() -> Comprehension
            = is_async:lit("async")? lit("for") target:target_list() lit("in") iter:disjunction()
              ifs:(lit("if") c:disjunction() { c })* {
                Comprehension { target, iter, ifs, is_async: is_async.is_some() }
            }

        // --------------------------------------------------------------
        // Atoms
        // --------------------------------------------------------------

        rule atom() -> Expr
            = lit("None") { Expr::Constant(Constant::None) }
            / lit("True") { Expr::Constant(Constant::True) }
            / lit("False") { Expr::Constant(Constant::False) }
            / lit("...") { Expr::Constant(Constant::Ellipsis) }
            / n:number() { Expr::Constant(Constant::Num(n)) }
            / pieces:string()+ { Expr::Constant(Constant::Str(pieces)) }
            / id:name() { Expr::Name(id) }
            / lit("(") inner:paren_inner()? lit(")") { inner.unwrap_or(Expr::Tuple(Vec::new())) }
            / lit("[") inner:list_inner()? lit("]") { inner.unwrap_or(Expr::List(Vec::new())) }
            / lit("{") inner:brace_inner()? lit("}") {
                inner.unwrap_or(Expr::Dict { keys: Vec::new(), values: Vec::new() })
            }

        rule paren_inner() -> Expr
            = yield_expr()
            / first:star_named_expression() tail:sequence_tail() {
                match tail {
                    SequenceTail::Comprehension(generators) => {
                        Expr::GeneratorExp { elt: Box::new(first), generators }
                    }
                    SequenceTail::Elements(rest, trailing) => sequence(first, rest, trailing),
                }
            }

        rule list_inner() -> Expr
            = first:star_named_expression() tail:sequence_tail() {
                match tail {
                    SequenceTail::Comprehension(generators) => {
                        Expr::ListComp { elt: Box::new(first), generators }
                    }
                    SequenceTail::Elements(rest, _) => {
                        Expr::List(iter::once(first).chain(rest).collect())
                    }
                }
            }

        rule sequence_tail() -> SequenceTail
            = generators:for_if_clauses() { SequenceTail::Comprehension(generators) }
            / rest:(lit(",") e:star_named_expression() { e })* trailing:lit(",")? {
                SequenceTail::Elements(rest, trailing.is_some())
            }

        rule brace_inner() -> Expr
            = lit("**") value:bitwise_or() rest:dict_entries() {
                dict(iter::once((None, value)).chain(rest).collect())
            }
            / first:star_named_expression() tail:brace_tail() {? brace_display(first, tail) }

        rule brace_tail() -> BraceTail
            = lit(":") value:expression() tail:dict_tail() { BraceTail::Dict(value, tail) }
            / tail:sequence_tail() { BraceTail::Set(tail) }

        rule dict_tail() -> DictTail
            = generators:for_if_clauses() { DictTail::Comprehension(generators) }
            / rest:dict_entries() { DictTail::Entries(rest) }

        rule dict_entries() -> Vec<(Option<Expr>, Expr)>
            = rest:(lit(",") e:dict_entry() { e })* lit(",")? { rest }

        rule dict_entry() -> (Option<Expr>, Expr)
            = lit("**") value:bitwise_or() { (None, value) }
            / key:expression() lit(":") value:expression() { (Some(key), value) }

        // --------------------------------------------------------------
        // Tokens
        // --------------------------------------------------------------

        rule name() -> String
            = [t] {?
                if t.r#type == TokType::Name && !is_keyword(t.string) {
                    Ok(t.string.to_string())
                } else {
                    Err("NAME")
                }
            }

        rule number() -> String
            = t:tok(TokType::Number, "NUMBER") { t.string.to_string() }

        rule string() -> String
            = t:tok(TokType::String, "STRING") { t.string.to_string() }

        rule tok(ty: TokType, expected: &'static str) -> &'input Token<'a>
            = [t] {? if t.r#type == ty { Ok(t) } else { Err(expected) } }

        rule lit(lit: &'static str) -> &'input Token<'a>
            = [t] {? if t.is(lit) { Ok(t) } else { Err(lit) } }
    }
}

// ============================================================================
// Action helpers
// ============================================================================

fn target(expr: Expr) -> Result<Expr, &'static str> {
    if expr.is_assignable() {
        Ok(expr)
    } else {
        Err("assignment target")
    }
}

fn single_target(expr: &Expr) -> Result<(), &'static str> {
    match expr {
        Expr::Name(_) | Expr::Attribute { .. } | Expr::Subscript { .. } => Ok(()),
        _ => Err("single assignment target"),
    }
}

fn expression_statement(
    first: Expr,
    rest: Option<AssignRest>,
    parenthesized: bool,
) -> Result<StmtKind, &'static str> {
    match rest {
        None => Ok(StmtKind::Expr { value: first }),
        Some(AssignRest::Annotated { annotation, value }) => {
            single_target(&first)?;
            let simple = matches!(first, Expr::Name(_)) && !parenthesized;
            Ok(StmtKind::AnnAssign {
                target: first,
                annotation,
                value,
                simple,
            })
        }
        Some(AssignRest::Augmented { op, value }) => {
            single_target(&first)?;
            Ok(StmtKind::AugAssign {
                target: first,
                op,
                value,
            })
        }
        Some(AssignRest::Assign(mut values)) => {
            let value = values.pop().ok_or("assignment value")?;
            let targets: Vec<Expr> = iter::once(first).chain(values).collect();
            if targets.iter().all(Expr::is_assignable) {
                Ok(StmtKind::Assign { targets, value })
            } else {
                Err("assignment target")
            }
        }
    }
}

fn decorate(kind: StmtKind, decorator_list: Vec<Expr>) -> StmtKind {
    match kind {
        StmtKind::FunctionDef(def) => StmtKind::FunctionDef(FunctionDef {
            decorator_list,
            ..def
        }),
        StmtKind::ClassDef(def) => StmtKind::ClassDef(ClassDef {
            decorator_list,
            ..def
        }),
        other => other,
    }
}

fn build_arguments(
    items: Vec<ParamItem>,
    options: &ParseOptions,
) -> Result<Arguments, &'static str> {
    let mut arguments = Arguments::default();
    let mut seen_star = false;
    let mut seen_slash = false;
    let count = items.len();

    for (index, item) in items.into_iter().enumerate() {
        match item {
            ParamItem::Slash => {
                if !options.version.has_positional_only_params() {
                    return Err("positional-only parameters need Python 3.8");
                }
                if seen_slash || seen_star || arguments.args.is_empty() {
                    return Err("parameter before a single '/'");
                }
                seen_slash = true;
                arguments.posonlyargs = std::mem::take(&mut arguments.args);
            }
            ParamItem::DoubleStar(arg) => {
                if index + 1 != count {
                    return Err("'**' parameter last");
                }
                arguments.kwarg = Some(arg);
            }
            ParamItem::Star(arg) => {
                if seen_star {
                    return Err("a single '*'");
                }
                seen_star = true;
                arguments.vararg = arg;
            }
            ParamItem::Plain(arg, default) => {
                if seen_star {
                    arguments.kwonlyargs.push(arg);
                    arguments.kw_defaults.push(default);
                } else {
                    match default {
                        Some(default) => arguments.defaults.push(default),
                        None if !arguments.defaults.is_empty() => {
                            return Err("default value after a defaulted parameter");
                        }
                        None => {}
                    }
                    arguments.args.push(arg);
                }
            }
        }
    }

    if seen_star && arguments.vararg.is_none() && arguments.kwonlyargs.is_empty() {
        return Err("named parameter after bare '*'");
    }
    Ok(arguments)
}

fn except_handler(
    star: bool,
    clause: Option<(Expr, Option<String>)>,
    body: Vec<Stmt>,
    span: Span,
    options: &ParseOptions,
) -> Result<(Handler, bool), &'static str> {
    if star && !options.version.has_exception_groups() {
        return Err("exception groups need Python 3.11");
    }
    let (type_, name) = match clause {
        Some((type_, name)) => (Some(type_), name),
        None if star => return Err("exception type after 'except*'"),
        None => (None, None),
    };
    let handler = Handler::new(
        HandlerKind::ExceptHandler(ExceptHandler { type_, name, body }),
        span,
    );
    Ok((handler, star))
}

fn sequence(first: Expr, rest: Vec<Expr>, trailing_comma: bool) -> Expr {
    if rest.is_empty() && !trailing_comma {
        first
    } else {
        Expr::Tuple(iter::once(first).chain(rest).collect())
    }
}

fn bool_op(op: BoolOp, mut values: Vec<Expr>) -> Expr {
    if values.len() == 1 {
        values.remove(0)
    } else {
        Expr::BoolOp { op, values }
    }
}

fn unary(op: UnaryOp, operand: Expr) -> Expr {
    Expr::UnaryOp {
        op,
        operand: Box::new(operand),
    }
}

fn binary(left: Expr, op: Operator, right: Expr) -> Expr {
    Expr::BinOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

fn split_arguments(items: Vec<CallArgument>) -> (Vec<Expr>, Vec<Keyword>) {
    let mut args = Vec::new();
    let mut keywords = Vec::new();
    for item in items {
        match item {
            CallArgument::Positional(expr) => args.push(expr),
            CallArgument::Keyword(keyword) => keywords.push(keyword),
        }
    }
    (args, keywords)
}

fn apply_trailer(value: Expr, trailer: Trailer) -> Expr {
    let value = Box::new(value);
    match trailer {
        Trailer::Attribute(attr) => Expr::Attribute { value, attr },
        Trailer::Call(items) => {
            let (args, keywords) = split_arguments(items);
            Expr::Call {
                func: value,
                args,
                keywords,
            }
        }
        Trailer::Subscript(slice) => Expr::Subscript {
            value,
            slice: Box::new(slice),
        },
    }
}

fn slice(
    lower: Option<Expr>,
    bounds: Option<(Option<Expr>, Option<Expr>)>,
) -> Result<Expr, &'static str> {
    match (lower, bounds) {
        (Some(index), None) => Ok(index),
        (lower, Some((upper, step))) => Ok(Expr::Slice {
            lower: lower.map(Box::new),
            upper: upper.map(Box::new),
            step: step.map(Box::new),
        }),
        (None, None) => Err("subscript"),
    }
}

fn dict(entries: Vec<(Option<Expr>, Expr)>) -> Expr {
    let (keys, values) = entries.into_iter().unzip();
    Expr::Dict { keys, values }
}

fn brace_display(first: Expr, tail: BraceTail) -> Result<Expr, &'static str> {
    match tail {
        BraceTail::Dict(_, _) if matches!(first, Expr::Starred(_)) => Err("dictionary key"),
        BraceTail::Dict(value, DictTail::Comprehension(generators)) => Ok(Expr::DictComp {
            key: Box::new(first),
            value: Box::new(value),
            generators,
        }),
        BraceTail::Dict(value, DictTail::Entries(rest)) => Ok(dict(
            iter::once((Some(first), value)).chain(rest).collect(),
        )),
        BraceTail::Set(SequenceTail::Comprehension(generators)) => Ok(Expr::SetComp {
            elt: Box::new(first),
            generators,
        }),
        BraceTail::Set(SequenceTail::Elements(rest, _)) => {
            Ok(Expr::Set(iter::once(first).chain(rest).collect()))
        }
    }
}
