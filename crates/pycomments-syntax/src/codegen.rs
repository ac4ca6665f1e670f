// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Source generation from the tree.
//!
//! Output is built line by line: [`CodegenState::fill`] starts a new line at
//! the current indentation and [`CodegenState::suite`] writes an indented
//! block. Expressions are parenthesized from their [`Precedence`] relative to
//! the context they are written in, so the output parses back to the same
//! tree.

use crate::nodes::{
    Alias, Arg, Arguments, ClassDef, Comment, Comprehension, Constant, ExceptHandler, Expr, For,
    FunctionDef, Handler, HandlerKind, If, Keyword, Module, Precedence, Stmt, StmtKind, Try,
    While, With, WithItem,
};

const INDENT: &str = "    ";

#[derive(Debug, Default)]
pub struct CodegenState {
    out: String,
    indent: usize,
}

impl CodegenState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// Start a new line at the current indentation and write `text`.
    pub fn fill(&mut self, text: &str) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
    }

    /// A blank line, unless nothing has been written yet.
    fn blank_line(&mut self) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
    }

    /// Write `:` and the indented statements of a block. A block without
    /// code gets a `pass`.
    pub fn suite(&mut self, body: &[Stmt]) {
        self.write(":");
        self.indent += 1;
        for stmt in body {
            stmt.codegen(self);
        }
        if body.iter().all(|stmt| stmt.is_comment()) {
            self.fill("pass");
        }
        self.indent -= 1;
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

pub trait Codegen {
    fn codegen(&self, state: &mut CodegenState);
}

impl Codegen for Module {
    fn codegen(&self, state: &mut CodegenState) {
        for stmt in &self.body {
            stmt.codegen(state);
        }
    }
}

impl Codegen for Comment {
    fn codegen(&self, state: &mut CodegenState) {
        if self.inline && !state.is_empty() {
            state.write("  ");
            state.write(&self.value);
        } else {
            state.fill(&self.value);
        }
    }
}

impl Codegen for Stmt {
    fn codegen(&self, state: &mut CodegenState) {
        match &self.kind {
            StmtKind::FunctionDef(f) => f.codegen(state),
            StmtKind::ClassDef(c) => c.codegen(state),
            StmtKind::Return { value } => {
                state.fill("return");
                if let Some(value) = value {
                    state.write(" ");
                    // `return` takes no bare yield.
                    let ctx = match value {
                        Expr::Yield(_) | Expr::YieldFrom(_) => Precedence::Test,
                        _ => Precedence::Tuple,
                    };
                    expr(state, value, ctx);
                }
            }
            StmtKind::Delete { targets } => {
                state.fill("del ");
                interleave(state, targets, |state, target| {
                    expr(state, target, Precedence::Test)
                });
            }
            StmtKind::Assign { targets, value } => {
                state.fill("");
                for target in targets {
                    expr(state, target, Precedence::Tuple);
                    state.write(" = ");
                }
                expr(state, value, Precedence::Tuple);
            }
            StmtKind::AugAssign { target, op, value } => {
                state.fill("");
                expr(state, target, Precedence::Test);
                state.write(" ");
                state.write(op.as_str());
                state.write("= ");
                expr(state, value, Precedence::Tuple);
            }
            StmtKind::AnnAssign {
                target,
                annotation,
                value,
                simple,
            } => {
                state.fill("");
                if !simple && matches!(target, Expr::Name(_)) {
                    state.write("(");
                    expr(state, target, Precedence::Test);
                    state.write(")");
                } else {
                    expr(state, target, Precedence::Test);
                }
                state.write(": ");
                expr(state, annotation, Precedence::Test);
                if let Some(value) = value {
                    state.write(" = ");
                    expr(state, value, Precedence::Tuple);
                }
            }
            StmtKind::For(f) => f.codegen(state),
            StmtKind::While(w) => w.codegen(state),
            StmtKind::If(i) => i.codegen(state),
            StmtKind::With(w) => w.codegen(state),
            StmtKind::Raise { exc, cause } => {
                state.fill("raise");
                if let Some(exc) = exc {
                    state.write(" ");
                    expr(state, exc, Precedence::Test);
                }
                if let Some(cause) = cause {
                    state.write(" from ");
                    expr(state, cause, Precedence::Test);
                }
            }
            StmtKind::Try(t) => t.codegen(state),
            StmtKind::Assert { test, msg } => {
                state.fill("assert ");
                expr(state, test, Precedence::Test);
                if let Some(msg) = msg {
                    state.write(", ");
                    expr(state, msg, Precedence::Test);
                }
            }
            StmtKind::Import { names } => {
                state.fill("import ");
                interleave(state, names, |state, alias| alias.codegen(state));
            }
            StmtKind::ImportFrom {
                module,
                names,
                level,
            } => {
                state.fill("from ");
                state.write(&".".repeat(*level as usize));
                if let Some(module) = module {
                    state.write(module);
                }
                state.write(" import ");
                interleave(state, names, |state, alias| alias.codegen(state));
            }
            StmtKind::Global { names } => {
                state.fill("global ");
                state.write(&names.join(", "));
            }
            StmtKind::Nonlocal { names } => {
                state.fill("nonlocal ");
                state.write(&names.join(", "));
            }
            StmtKind::Expr { value } => {
                state.fill("");
                expr(state, value, Precedence::Yield);
            }
            StmtKind::Pass => state.fill("pass"),
            StmtKind::Break => state.fill("break"),
            StmtKind::Continue => state.fill("continue"),
            StmtKind::Comment(c) => c.codegen(state),
        }
    }
}

impl Codegen for FunctionDef {
    fn codegen(&self, state: &mut CodegenState) {
        state.blank_line();
        decorators(state, &self.decorator_list);
        state.fill(if self.is_async { "async def " } else { "def " });
        state.write(&self.name);
        state.write("(");
        self.args.codegen(state);
        state.write(")");
        if let Some(returns) = &self.returns {
            state.write(" -> ");
            expr(state, returns, Precedence::Test);
        }
        state.suite(&self.body);
    }
}

impl Codegen for ClassDef {
    fn codegen(&self, state: &mut CodegenState) {
        state.blank_line();
        decorators(state, &self.decorator_list);
        state.fill("class ");
        state.write(&self.name);
        if !self.bases.is_empty() || !self.keywords.is_empty() {
            state.write("(");
            call_arguments(state, &self.bases, &self.keywords);
            state.write(")");
        }
        state.suite(&self.body);
    }
}

fn decorators(state: &mut CodegenState, decorator_list: &[Expr]) {
    for decorator in decorator_list {
        state.fill("@");
        expr(state, decorator, Precedence::Test);
    }
}

impl Codegen for For {
    fn codegen(&self, state: &mut CodegenState) {
        state.fill(if self.is_async { "async for " } else { "for " });
        expr(state, &self.target, Precedence::Tuple);
        state.write(" in ");
        expr(state, &self.iter, Precedence::Test);
        state.suite(&self.body);
        else_suite(state, &self.orelse);
    }
}

impl Codegen for While {
    fn codegen(&self, state: &mut CodegenState) {
        state.fill("while ");
        expr(state, &self.test, Precedence::Test);
        state.suite(&self.body);
        else_suite(state, &self.orelse);
    }
}

fn else_suite(state: &mut CodegenState, orelse: &[Stmt]) {
    if !orelse.is_empty() {
        state.fill("else");
        state.suite(orelse);
    }
}

impl Codegen for If {
    fn codegen(&self, state: &mut CodegenState) {
        state.fill("if ");
        expr(state, &self.test, Precedence::Test);
        state.suite(&self.body);

        let mut orelse = self.orelse.as_slice();
        while let Some((leading, nested)) = elif_parts(orelse) {
            for stmt in leading {
                stmt.codegen(state);
            }
            state.fill("elif ");
            expr(state, &nested.test, Precedence::Test);
            state.suite(&nested.body);
            orelse = &nested.orelse;
        }
        else_suite(state, orelse);
    }
}

/// Split an `else` block into leading standalone comments and a single
/// nested `if` that can be written as `elif`.
fn elif_parts(orelse: &[Stmt]) -> Option<(&[Stmt], &If)> {
    let (last, leading) = orelse.split_last()?;
    let StmtKind::If(nested) = &last.kind else {
        return None;
    };
    let standalone_comments = leading
        .iter()
        .all(|stmt| matches!(stmt.as_comment(), Some(comment) if !comment.inline));
    standalone_comments.then_some((leading, nested))
}

impl Codegen for With {
    fn codegen(&self, state: &mut CodegenState) {
        state.fill(if self.is_async { "async with " } else { "with " });
        interleave(state, &self.items, |state, item| item.codegen(state));
        state.suite(&self.body);
    }
}

impl Codegen for WithItem {
    fn codegen(&self, state: &mut CodegenState) {
        expr(state, &self.context_expr, Precedence::Test);
        if let Some(vars) = &self.optional_vars {
            state.write(" as ");
            expr(state, vars, Precedence::Test);
        }
    }
}

impl Codegen for Try {
    fn codegen(&self, state: &mut CodegenState) {
        state.fill("try");
        state.suite(&self.body);
        for handler in &self.handlers {
            handler_codegen(handler, self.is_star, state);
        }
        else_suite(state, &self.orelse);
        if !self.finalbody.is_empty() {
            state.fill("finally");
            state.suite(&self.finalbody);
        }
    }
}

impl Codegen for Handler {
    fn codegen(&self, state: &mut CodegenState) {
        handler_codegen(self, false, state);
    }
}

fn handler_codegen(handler: &Handler, is_star: bool, state: &mut CodegenState) {
    match &handler.kind {
        HandlerKind::ExceptHandler(ExceptHandler { type_, name, body }) => {
            state.fill(if is_star { "except*" } else { "except" });
            if let Some(type_) = type_ {
                state.write(" ");
                expr(state, type_, Precedence::Test);
            }
            if let Some(name) = name {
                state.write(" as ");
                state.write(name);
            }
            state.suite(body);
        }
        HandlerKind::Comment(c) => c.codegen(state),
    }
}

impl Codegen for Alias {
    fn codegen(&self, state: &mut CodegenState) {
        state.write(&self.name);
        if let Some(asname) = &self.asname {
            state.write(" as ");
            state.write(asname);
        }
    }
}

impl Codegen for Arg {
    fn codegen(&self, state: &mut CodegenState) {
        state.write(&self.arg);
        if let Some(annotation) = &self.annotation {
            state.write(": ");
            expr(state, annotation, Precedence::Test);
        }
    }
}

impl Codegen for Arguments {
    fn codegen(&self, state: &mut CodegenState) {
        let mut first = true;
        let mut comma = |state: &mut CodegenState| {
            if first {
                first = false;
            } else {
                state.write(", ");
            }
        };

        let positional = self.posonlyargs.len() + self.args.len();
        let first_default = positional.saturating_sub(self.defaults.len());
        for (index, arg) in self.posonlyargs.iter().chain(&self.args).enumerate() {
            comma(state);
            arg.codegen(state);
            if index >= first_default {
                if let Some(default) = self.defaults.get(index - first_default) {
                    state.write("=");
                    expr(state, default, Precedence::Test);
                }
            }
            if index + 1 == self.posonlyargs.len() {
                state.write(", /");
            }
        }

        if self.vararg.is_some() || !self.kwonlyargs.is_empty() {
            comma(state);
            state.write("*");
            if let Some(vararg) = &self.vararg {
                vararg.codegen(state);
            }
        }

        for (index, arg) in self.kwonlyargs.iter().enumerate() {
            comma(state);
            arg.codegen(state);
            if let Some(Some(default)) = self.kw_defaults.get(index) {
                state.write("=");
                expr(state, default, Precedence::Test);
            }
        }

        if let Some(kwarg) = &self.kwarg {
            comma(state);
            state.write("**");
            kwarg.codegen(state);
        }
    }
}

impl Codegen for Keyword {
    fn codegen(&self, state: &mut CodegenState) {
        match &self.arg {
            Some(arg) => {
                state.write(arg);
                state.write("=");
            }
            None => state.write("**"),
        }
        expr(state, &self.value, Precedence::Test);
    }
}

impl Codegen for Comprehension {
    fn codegen(&self, state: &mut CodegenState) {
        state.write(if self.is_async { " async for " } else { " for " });
        expr(state, &self.target, Precedence::Tuple);
        state.write(" in ");
        expr(state, &self.iter, Precedence::Test.next());
        for test in &self.ifs {
            state.write(" if ");
            expr(state, test, Precedence::Test.next());
        }
    }
}

impl Codegen for Expr {
    fn codegen(&self, state: &mut CodegenState) {
        expr(state, self, Precedence::Test);
    }
}

// ============================================================================
// Expressions
// ============================================================================

fn interleave<T>(state: &mut CodegenState, items: &[T], mut f: impl FnMut(&mut CodegenState, &T)) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            state.write(", ");
        }
        f(state, item);
    }
}

/// Elements of a tuple; a single element keeps its trailing comma.
fn items_view(state: &mut CodegenState, elts: &[Expr]) {
    if let [only] = elts {
        expr(state, only, Precedence::Test);
        state.write(",");
    } else {
        interleave(state, elts, |state, elt| expr(state, elt, Precedence::Test));
    }
}

/// Write `f` wrapped in parentheses when `condition` holds.
fn delimit_if(state: &mut CodegenState, condition: bool, f: impl FnOnce(&mut CodegenState)) {
    if condition {
        state.write("(");
    }
    f(state);
    if condition {
        state.write(")");
    }
}

fn call_arguments(state: &mut CodegenState, args: &[Expr], keywords: &[Keyword]) {
    let mut first = true;
    for arg in args {
        if !first {
            state.write(", ");
        }
        first = false;
        expr(state, arg, Precedence::Test);
    }
    for keyword in keywords {
        if !first {
            state.write(", ");
        }
        first = false;
        keyword.codegen(state);
    }
}

fn comprehension(
    state: &mut CodegenState,
    open: &str,
    close: &str,
    generators: &[Comprehension],
    elt: impl FnOnce(&mut CodegenState),
) {
    state.write(open);
    elt(state);
    for generator in generators {
        generator.codegen(state);
    }
    state.write(close);
}

fn constant(state: &mut CodegenState, value: &Constant) {
    match value {
        Constant::None => state.write("None"),
        Constant::True => state.write("True"),
        Constant::False => state.write("False"),
        Constant::Ellipsis => state.write("..."),
        Constant::Num(text) => state.write(text),
        Constant::Str(pieces) => state.write(&pieces.join(" ")),
    }
}

/// A decimal integer literal, which needs a space before `.attr`.
fn is_plain_integer(value: &Expr) -> bool {
    match value {
        Expr::Constant(Constant::Num(text)) => {
            text.chars().all(|c| c.is_ascii_digit() || c == '_')
        }
        _ => false,
    }
}

/// Write `e` in a context of precedence `ctx`.
fn expr(state: &mut CodegenState, e: &Expr, ctx: Precedence) {
    match e {
        Expr::BoolOp { op, values } => {
            let prec = op.precedence();
            delimit_if(state, ctx > prec, |state| {
                let separator = format!(" {} ", op.as_str());
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        state.write(&separator);
                    }
                    expr(state, value, prec.next());
                }
            });
        }
        Expr::NamedExpr { target, value } => {
            delimit_if(state, ctx > Precedence::NamedExpr, |state| {
                expr(state, target, Precedence::Atom);
                state.write(" := ");
                expr(state, value, Precedence::Test);
            });
        }
        Expr::BinOp { left, op, right } => {
            let prec = op.precedence();
            delimit_if(state, ctx > prec, |state| {
                let (left_prec, right_prec) = if prec == Precedence::Power {
                    (prec.next(), prec)
                } else {
                    (prec, prec.next())
                };
                expr(state, left, left_prec);
                state.write(" ");
                state.write(op.as_str());
                state.write(" ");
                expr(state, right, right_prec);
            });
        }
        Expr::UnaryOp { op, operand } => {
            let prec = op.precedence();
            delimit_if(state, ctx > prec, |state| {
                state.write(op.as_str());
                if prec != Precedence::Factor {
                    state.write(" ");
                }
                expr(state, operand, prec);
            });
        }
        Expr::Lambda { args, body } => {
            delimit_if(state, ctx > Precedence::Test, |state| {
                state.write("lambda");
                if !args.is_empty() {
                    state.write(" ");
                    args.codegen(state);
                }
                state.write(": ");
                expr(state, body, Precedence::Test);
            });
        }
        Expr::IfExp { test, body, orelse } => {
            delimit_if(state, ctx > Precedence::Test, |state| {
                expr(state, body, Precedence::Test.next());
                state.write(" if ");
                expr(state, test, Precedence::Test.next());
                state.write(" else ");
                expr(state, orelse, Precedence::Test);
            });
        }
        Expr::Dict { keys, values } => {
            state.write("{");
            for (i, (key, value)) in keys.iter().zip(values).enumerate() {
                if i > 0 {
                    state.write(", ");
                }
                match key {
                    Some(key) => {
                        expr(state, key, Precedence::Test);
                        state.write(": ");
                        expr(state, value, Precedence::Test);
                    }
                    None => {
                        state.write("**");
                        expr(state, value, Precedence::BOr);
                    }
                }
            }
            state.write("}");
        }
        Expr::Set(elts) => {
            if elts.is_empty() {
                state.write("{*()}");
            } else {
                state.write("{");
                interleave(state, elts, |state, elt| expr(state, elt, Precedence::Test));
                state.write("}");
            }
        }
        Expr::ListComp { elt, generators } => {
            comprehension(state, "[", "]", generators, |state| {
                expr(state, elt, Precedence::Test)
            });
        }
        Expr::SetComp { elt, generators } => {
            comprehension(state, "{", "}", generators, |state| {
                expr(state, elt, Precedence::Test)
            });
        }
        Expr::GeneratorExp { elt, generators } => {
            comprehension(state, "(", ")", generators, |state| {
                expr(state, elt, Precedence::Test)
            });
        }
        Expr::DictComp {
            key,
            value,
            generators,
        } => {
            comprehension(state, "{", "}", generators, |state| {
                expr(state, key, Precedence::Test);
                state.write(": ");
                expr(state, value, Precedence::Test);
            });
        }
        Expr::Await(value) => {
            delimit_if(state, ctx > Precedence::Await, |state| {
                state.write("await ");
                expr(state, value, Precedence::Atom);
            });
        }
        Expr::Yield(value) => {
            delimit_if(state, ctx > Precedence::Yield, |state| {
                state.write("yield");
                if let Some(value) = value {
                    state.write(" ");
                    expr(state, value, Precedence::Yield);
                }
            });
        }
        Expr::YieldFrom(value) => {
            delimit_if(state, ctx > Precedence::Yield, |state| {
                state.write("yield from ");
                expr(state, value, Precedence::Yield);
            });
        }
        Expr::Compare {
            left,
            ops,
            comparators,
        } => {
            delimit_if(state, ctx > Precedence::Cmp, |state| {
                expr(state, left, Precedence::Cmp.next());
                for (op, comparator) in ops.iter().zip(comparators) {
                    state.write(" ");
                    state.write(op.as_str());
                    state.write(" ");
                    expr(state, comparator, Precedence::Cmp.next());
                }
            });
        }
        Expr::Call {
            func,
            args,
            keywords,
        } => {
            expr(state, func, Precedence::Atom);
            match (args.as_slice(), keywords.is_empty()) {
                // A lone generator argument supplies the call's parentheses.
                ([genexp @ Expr::GeneratorExp { .. }], true) => {
                    expr(state, genexp, Precedence::Test)
                }
                _ => {
                    state.write("(");
                    call_arguments(state, args, keywords);
                    state.write(")");
                }
            }
        }
        Expr::Constant(value) => constant(state, value),
        Expr::Attribute { value, attr } => {
            expr(state, value, Precedence::Atom);
            if is_plain_integer(value) {
                state.write(" ");
            }
            state.write(".");
            state.write(attr);
        }
        Expr::Subscript { value, slice } => {
            expr(state, value, Precedence::Atom);
            state.write("[");
            match slice.as_ref() {
                Expr::Tuple(elts) if !elts.is_empty() => items_view(state, elts),
                slice => expr(state, slice, Precedence::Test),
            }
            state.write("]");
        }
        Expr::Starred(value) => {
            state.write("*");
            expr(state, value, Precedence::BOr);
        }
        Expr::Name(id) => state.write(id),
        Expr::List(elts) => {
            state.write("[");
            interleave(state, elts, |state, elt| expr(state, elt, Precedence::Test));
            state.write("]");
        }
        Expr::Tuple(elts) => {
            delimit_if(state, elts.is_empty() || ctx > Precedence::Tuple, |state| {
                items_view(state, elts)
            });
        }
        Expr::Slice { lower, upper, step } => {
            if let Some(lower) = lower {
                expr(state, lower, Precedence::Test);
            }
            state.write(":");
            if let Some(upper) = upper {
                expr(state, upper, Precedence::Test);
            }
            if let Some(step) = step {
                state.write(":");
                expr(state, step, Precedence::Test);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_module;

    fn regenerate(source: &str) -> String {
        let module = parse_module(source).expect("parse error");
        let mut state = CodegenState::new();
        module.codegen(&mut state);
        state.into_string()
    }

    fn assert_unchanged(source: &str) {
        assert_eq!(regenerate(source), source);
    }

    #[test]
    fn test_simple_statements() {
        assert_unchanged("x = 1\ny += 2\ndel a, b\npass");
        assert_unchanged("from . import a as b, c\nimport os.path");
        assert_unchanged("global a, b\nassert x, 'msg'\nraise E from e");
    }

    #[test]
    fn test_function_gets_blank_line() {
        assert_eq!(
            regenerate("x = 1\ndef f(a, b=2, *args, c, d=4, **kw) -> int:\n    return a"),
            "x = 1\n\ndef f(a, b=2, *args, c, d=4, **kw) -> int:\n    return a"
        );
    }

    #[test]
    fn test_decorated_class() {
        assert_eq!(
            regenerate("@dec\nclass A(B, metaclass=M):\n    pass"),
            "@dec\nclass A(B, metaclass=M):\n    pass"
        );
    }

    #[test]
    fn test_elif_chain() {
        assert_unchanged("if a:\n    x\nelif b:\n    y\nelse:\n    z");
    }

    #[test]
    fn test_try_handlers() {
        assert_unchanged(
            "try:\n    a\nexcept ValueError as e:\n    b\nexcept:\n    c\nelse:\n    d\nfinally:\n    e",
        );
    }

    #[test]
    fn test_precedence() {
        assert_unchanged("x = (a + b) * c");
        assert_unchanged("x = a + b * c");
        assert_unchanged("x = a ** b ** c");
        assert_unchanged("x = (a ** b) ** c");
        assert_unchanged("x = (-1) ** 2");
        assert_unchanged("x = not a and b or c");
        assert_unchanged("x = (a or b) and c");
        assert_unchanged("x = a if b else c");
        assert_unchanged("f(lambda x: x + 1)");
        assert_unchanged("x = 1 .real");
        assert_unchanged("x = (a, b)[0]");
    }

    #[test]
    fn test_tuples() {
        assert_unchanged("x = a, b");
        assert_unchanged("x = a,");
        assert_unchanged("x = ()");
        assert_unchanged("(a, b)");
        assert_unchanged("for a, b in c:\n    pass");
        assert_unchanged("y = x[1:2, ::3]");
    }

    #[test]
    fn test_displays_and_comprehensions() {
        assert_unchanged("x = [1, 2]\ny = {1: 2, **z}\nz = {*()}");
        assert_unchanged("x = [a for a in b if a]");
        assert_unchanged("x = {k: v for k, v in items}");
        assert_unchanged("x = sum(a for a in b)");
    }

    #[test]
    fn test_walrus_is_parenthesized() {
        assert_unchanged("if (n := len(a)) > 10:\n    pass");
        assert_unchanged("(x := 1)");
    }

    #[test]
    fn test_comment_nodes() {
        let mut state = CodegenState::new();
        Comment::new("# first", true).codegen(&mut state);
        state.fill("x");
        Comment::new("# second", true).codegen(&mut state);
        Comment::new("# third", false).codegen(&mut state);
        assert_eq!(state.into_string(), "# first\nx  # second\n# third");
    }

    #[test]
    fn test_empty_block_gets_pass() {
        let mut state = CodegenState::new();
        state.fill("if a");
        state.suite(&[]);
        assert_eq!(state.into_string(), "if a:\n    pass");
    }
}
