// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Structural rendering of a tree, without spans.
//!
//! The format follows Python's `ast.dump`: `Kind(field=value, ...)` with
//! lists in brackets and names quoted. Two trees with the same dump have the
//! same structure, which is what round-trip checks compare.

use crate::nodes::{
    Alias, Arg, Arguments, Comment, Comprehension, Constant, ExceptHandler, Expr, Handler,
    HandlerKind, Keyword, Module, Stmt, StmtKind, WithItem,
};

/// Render `module` in `ast.dump` style.
pub fn dump(module: &Module) -> String {
    NodeWriter::new("Module")
        .field("body", list(&module.body, dump_stmt))
        .finish()
}

/// Builder for one `Kind(field=value, ...)` entry.
struct NodeWriter {
    out: String,
    has_fields: bool,
}

impl NodeWriter {
    fn new(kind: &str) -> Self {
        let mut out = String::from(kind);
        out.push('(');
        NodeWriter {
            out,
            has_fields: false,
        }
    }

    fn field(mut self, name: &str, value: String) -> Self {
        if self.has_fields {
            self.out.push_str(", ");
        }
        self.has_fields = true;
        self.out.push_str(name);
        self.out.push('=');
        self.out.push_str(&value);
        self
    }

    fn finish(mut self) -> String {
        self.out.push(')');
        self.out
    }
}

fn list<T>(items: &[T], f: impl Fn(&T) -> String) -> String {
    let parts: Vec<String> = items.iter().map(f).collect();
    format!("[{}]", parts.join(", "))
}

fn optional<T>(item: Option<&T>, f: impl Fn(&T) -> String) -> String {
    item.map_or_else(|| "None".to_string(), f)
}

fn py_bool(value: bool) -> String {
    let text = if value { "True" } else { "False" };
    text.to_string()
}

/// Python `repr` of a string.
pub(crate) fn repr(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn dump_comment(comment: &Comment) -> String {
    NodeWriter::new("Comment")
        .field("value", repr(&comment.value))
        .field("inline", py_bool(comment.inline))
        .finish()
}

fn with_attached(writer: NodeWriter, comments: &[String]) -> String {
    if comments.is_empty() {
        writer.finish()
    } else {
        writer
            .field("comments", list(comments, |c| repr(c)))
            .finish()
    }
}

fn dump_stmt(stmt: &Stmt) -> String {
    let writer = match &stmt.kind {
        StmtKind::FunctionDef(f) => NodeWriter::new(if f.is_async {
            "AsyncFunctionDef"
        } else {
            "FunctionDef"
        })
        .field("name", repr(&f.name))
        .field("args", dump_arguments(&f.args))
        .field("body", list(&f.body, dump_stmt))
        .field("decorator_list", list(&f.decorator_list, dump_expr))
        .field("returns", optional(f.returns.as_ref(), dump_expr)),
        StmtKind::ClassDef(c) => NodeWriter::new("ClassDef")
            .field("name", repr(&c.name))
            .field("bases", list(&c.bases, dump_expr))
            .field("keywords", list(&c.keywords, dump_keyword))
            .field("body", list(&c.body, dump_stmt))
            .field("decorator_list", list(&c.decorator_list, dump_expr)),
        StmtKind::Return { value } => {
            NodeWriter::new("Return").field("value", optional(value.as_ref(), dump_expr))
        }
        StmtKind::Delete { targets } => {
            NodeWriter::new("Delete").field("targets", list(targets, dump_expr))
        }
        StmtKind::Assign { targets, value } => NodeWriter::new("Assign")
            .field("targets", list(targets, dump_expr))
            .field("value", dump_expr(value)),
        StmtKind::AugAssign { target, op, value } => NodeWriter::new("AugAssign")
            .field("target", dump_expr(target))
            .field("op", format!("{:?}()", op))
            .field("value", dump_expr(value)),
        StmtKind::AnnAssign {
            target,
            annotation,
            value,
            simple,
        } => NodeWriter::new("AnnAssign")
            .field("target", dump_expr(target))
            .field("annotation", dump_expr(annotation))
            .field("value", optional(value.as_ref(), dump_expr))
            .field("simple", u8::from(*simple).to_string()),
        StmtKind::For(f) => NodeWriter::new(if f.is_async { "AsyncFor" } else { "For" })
            .field("target", dump_expr(&f.target))
            .field("iter", dump_expr(&f.iter))
            .field("body", list(&f.body, dump_stmt))
            .field("orelse", list(&f.orelse, dump_stmt)),
        StmtKind::While(w) => NodeWriter::new("While")
            .field("test", dump_expr(&w.test))
            .field("body", list(&w.body, dump_stmt))
            .field("orelse", list(&w.orelse, dump_stmt)),
        StmtKind::If(i) => NodeWriter::new("If")
            .field("test", dump_expr(&i.test))
            .field("body", list(&i.body, dump_stmt))
            .field("orelse", list(&i.orelse, dump_stmt)),
        StmtKind::With(w) => NodeWriter::new(if w.is_async { "AsyncWith" } else { "With" })
            .field("items", list(&w.items, dump_withitem))
            .field("body", list(&w.body, dump_stmt)),
        StmtKind::Raise { exc, cause } => NodeWriter::new("Raise")
            .field("exc", optional(exc.as_ref(), dump_expr))
            .field("cause", optional(cause.as_ref(), dump_expr)),
        StmtKind::Try(t) => NodeWriter::new(if t.is_star { "TryStar" } else { "Try" })
            .field("body", list(&t.body, dump_stmt))
            .field("handlers", list(&t.handlers, dump_handler))
            .field("orelse", list(&t.orelse, dump_stmt))
            .field("finalbody", list(&t.finalbody, dump_stmt)),
        StmtKind::Assert { test, msg } => NodeWriter::new("Assert")
            .field("test", dump_expr(test))
            .field("msg", optional(msg.as_ref(), dump_expr)),
        StmtKind::Import { names } => {
            NodeWriter::new("Import").field("names", list(names, dump_alias))
        }
        StmtKind::ImportFrom {
            module,
            names,
            level,
        } => NodeWriter::new("ImportFrom")
            .field("module", optional(module.as_ref(), |m| repr(m)))
            .field("names", list(names, dump_alias))
            .field("level", level.to_string()),
        StmtKind::Global { names } => {
            NodeWriter::new("Global").field("names", list(names, |n| repr(n)))
        }
        StmtKind::Nonlocal { names } => {
            NodeWriter::new("Nonlocal").field("names", list(names, |n| repr(n)))
        }
        StmtKind::Expr { value } => NodeWriter::new("Expr").field("value", dump_expr(value)),
        StmtKind::Pass => NodeWriter::new("Pass"),
        StmtKind::Break => NodeWriter::new("Break"),
        StmtKind::Continue => NodeWriter::new("Continue"),
        StmtKind::Comment(c) => return dump_comment(c),
    };
    with_attached(writer, &stmt.comments)
}

fn dump_handler(handler: &Handler) -> String {
    match &handler.kind {
        HandlerKind::ExceptHandler(ExceptHandler { type_, name, body }) => {
            let writer = NodeWriter::new("ExceptHandler")
                .field("type", optional(type_.as_ref(), dump_expr))
                .field("name", optional(name.as_ref(), |n| repr(n)))
                .field("body", list(body, dump_stmt));
            with_attached(writer, &handler.comments)
        }
        HandlerKind::Comment(c) => dump_comment(c),
    }
}

fn dump_alias(alias: &Alias) -> String {
    NodeWriter::new("alias")
        .field("name", repr(&alias.name))
        .field("asname", optional(alias.asname.as_ref(), |n| repr(n)))
        .finish()
}

fn dump_withitem(item: &WithItem) -> String {
    NodeWriter::new("withitem")
        .field("context_expr", dump_expr(&item.context_expr))
        .field(
            "optional_vars",
            optional(item.optional_vars.as_ref(), dump_expr),
        )
        .finish()
}

fn dump_arg(arg: &Arg) -> String {
    NodeWriter::new("arg")
        .field("arg", repr(&arg.arg))
        .field("annotation", optional(arg.annotation.as_ref(), dump_expr))
        .finish()
}

fn dump_arguments(args: &Arguments) -> String {
    NodeWriter::new("arguments")
        .field("posonlyargs", list(&args.posonlyargs, dump_arg))
        .field("args", list(&args.args, dump_arg))
        .field("vararg", optional(args.vararg.as_ref(), dump_arg))
        .field("kwonlyargs", list(&args.kwonlyargs, dump_arg))
        .field(
            "kw_defaults",
            list(&args.kw_defaults, |d| optional(d.as_ref(), dump_expr)),
        )
        .field("kwarg", optional(args.kwarg.as_ref(), dump_arg))
        .field("defaults", list(&args.defaults, dump_expr))
        .finish()
}

fn dump_keyword(keyword: &Keyword) -> String {
    NodeWriter::new("keyword")
        .field("arg", optional(keyword.arg.as_ref(), |a| repr(a)))
        .field("value", dump_expr(&keyword.value))
        .finish()
}

fn dump_comprehension(comp: &Comprehension) -> String {
    NodeWriter::new("comprehension")
        .field("target", dump_expr(&comp.target))
        .field("iter", dump_expr(&comp.iter))
        .field("ifs", list(&comp.ifs, dump_expr))
        .field("is_async", u8::from(comp.is_async).to_string())
        .finish()
}

fn dump_constant(value: &Constant) -> String {
    let value = match value {
        Constant::None => "None".to_string(),
        Constant::True => "True".to_string(),
        Constant::False => "False".to_string(),
        Constant::Ellipsis => "Ellipsis".to_string(),
        Constant::Num(text) => text.clone(),
        Constant::Str(pieces) => pieces.join(" "),
    };
    NodeWriter::new("Constant").field("value", value).finish()
}

fn boxed(expr: &Option<Box<Expr>>) -> String {
    optional(expr.as_deref(), dump_expr)
}

pub(crate) fn dump_expr(expr: &Expr) -> String {
    let writer = match expr {
        Expr::BoolOp { op, values } => NodeWriter::new("BoolOp")
            .field("op", format!("{:?}()", op))
            .field("values", list(values, dump_expr)),
        Expr::NamedExpr { target, value } => NodeWriter::new("NamedExpr")
            .field("target", dump_expr(target))
            .field("value", dump_expr(value)),
        Expr::BinOp { left, op, right } => NodeWriter::new("BinOp")
            .field("left", dump_expr(left))
            .field("op", format!("{:?}()", op))
            .field("right", dump_expr(right)),
        Expr::UnaryOp { op, operand } => NodeWriter::new("UnaryOp")
            .field("op", format!("{:?}()", op))
            .field("operand", dump_expr(operand)),
        Expr::Lambda { args, body } => NodeWriter::new("Lambda")
            .field("args", dump_arguments(args))
            .field("body", dump_expr(body)),
        Expr::IfExp { test, body, orelse } => NodeWriter::new("IfExp")
            .field("test", dump_expr(test))
            .field("body", dump_expr(body))
            .field("orelse", dump_expr(orelse)),
        Expr::Dict { keys, values } => NodeWriter::new("Dict")
            .field("keys", list(keys, |k| optional(k.as_ref(), dump_expr)))
            .field("values", list(values, dump_expr)),
        Expr::Set(elts) => NodeWriter::new("Set").field("elts", list(elts, dump_expr)),
        Expr::ListComp { elt, generators } => NodeWriter::new("ListComp")
            .field("elt", dump_expr(elt))
            .field("generators", list(generators, dump_comprehension)),
        Expr::SetComp { elt, generators } => NodeWriter::new("SetComp")
            .field("elt", dump_expr(elt))
            .field("generators", list(generators, dump_comprehension)),
        Expr::DictComp {
            key,
            value,
            generators,
        } => NodeWriter::new("DictComp")
            .field("key", dump_expr(key))
            .field("value", dump_expr(value))
            .field("generators", list(generators, dump_comprehension)),
        Expr::GeneratorExp { elt, generators } => NodeWriter::new("GeneratorExp")
            .field("elt", dump_expr(elt))
            .field("generators", list(generators, dump_comprehension)),
        Expr::Await(value) => NodeWriter::new("Await").field("value", dump_expr(value)),
        Expr::Yield(value) => NodeWriter::new("Yield").field("value", boxed(value)),
        Expr::YieldFrom(value) => NodeWriter::new("YieldFrom").field("value", dump_expr(value)),
        Expr::Compare {
            left,
            ops,
            comparators,
        } => NodeWriter::new("Compare")
            .field("left", dump_expr(left))
            .field("ops", list(ops, |op| format!("{:?}()", op)))
            .field("comparators", list(comparators, dump_expr)),
        Expr::Call {
            func,
            args,
            keywords,
        } => NodeWriter::new("Call")
            .field("func", dump_expr(func))
            .field("args", list(args, dump_expr))
            .field("keywords", list(keywords, dump_keyword)),
        Expr::Constant(value) => return dump_constant(value),
        Expr::Attribute { value, attr } => NodeWriter::new("Attribute")
            .field("value", dump_expr(value))
            .field("attr", repr(attr)),
        Expr::Subscript { value, slice } => NodeWriter::new("Subscript")
            .field("value", dump_expr(value))
            .field("slice", dump_expr(slice)),
        Expr::Starred(value) => NodeWriter::new("Starred").field("value", dump_expr(value)),
        Expr::Name(id) => NodeWriter::new("Name").field("id", repr(id)),
        Expr::List(elts) => NodeWriter::new("List").field("elts", list(elts, dump_expr)),
        Expr::Tuple(elts) => NodeWriter::new("Tuple").field("elts", list(elts, dump_expr)),
        Expr::Slice { lower, upper, step } => NodeWriter::new("Slice")
            .field("lower", boxed(lower))
            .field("upper", boxed(upper))
            .field("step", boxed(step)),
    };
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::Span;
    use crate::parse_module;

    #[test]
    fn test_dump_assignment() {
        let module = parse_module("x = 1").expect("parse error");
        assert_eq!(
            dump(&module),
            "Module(body=[Assign(targets=[Name(id='x')], value=Constant(value=1))])"
        );
    }

    #[test]
    fn test_dump_ignores_spans() {
        let a = parse_module("if a:\n    b").expect("parse error");
        let b = parse_module("if a:\n\n\n    b").expect("parse error");
        assert_ne!(a, b);
        assert_eq!(dump(&a), dump(&b));
    }

    #[test]
    fn test_dump_comment_and_attached_comments() {
        let mut stmt = Stmt::new(StmtKind::Pass, Span::new(1, 0, 1, 4));
        stmt.comments.push("note".to_string());
        let module = Module {
            body: vec![
                Stmt::comment(Comment::new("# it's", false), Span::new(1, 0, 1, 6)),
                stmt,
            ],
        };
        assert_eq!(
            dump(&module),
            "Module(body=[Comment(value=\"# it's\", inline=False), Pass(comments=['note'])])"
        );
    }

    #[test]
    fn test_repr_escapes() {
        assert_eq!(repr("a"), "'a'");
        assert_eq!(repr("a'b\"c"), "'a\\'b\"c'");
        assert_eq!(repr("tab\there"), "'tab\\there'");
    }
}
