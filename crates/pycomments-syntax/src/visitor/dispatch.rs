// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Walk functions driving [`Visitor`] and [`Transformer`] implementations.

use std::ops::ControlFlow;

use super::traits::{Transform, Transformer, VisitResult, Visitor};
use crate::nodes::{
    Arguments, Comprehension, Expr, Handler, HandlerKind, Keyword, Module, Stmt, StmtKind,
};

type Flow = ControlFlow<()>;

/// Run `visit`, then `children` unless skipped, then `leave`.
fn enter<V: Visitor + ?Sized>(
    visitor: &mut V,
    visit: impl FnOnce(&mut V) -> VisitResult,
    children: impl FnOnce(&mut V) -> Flow,
    leave: impl FnOnce(&mut V),
) -> Flow {
    match visit(visitor) {
        VisitResult::Stop => return ControlFlow::Break(()),
        VisitResult::SkipChildren => {}
        VisitResult::Continue => children(visitor)?,
    }
    leave(visitor);
    ControlFlow::Continue(())
}

/// Walk a module with a visitor.
pub fn walk_module<V: Visitor + ?Sized>(visitor: &mut V, module: &Module) {
    let _ = enter(
        visitor,
        |v| v.visit_module(module),
        |v| walk_stmts(v, &module.body),
        |v| v.leave_module(module),
    );
}

/// Walk a single statement with a visitor.
pub fn walk_stmt<V: Visitor + ?Sized>(visitor: &mut V, stmt: &Stmt) {
    let _ = stmt_flow(visitor, stmt);
}

/// Walk a single expression with a visitor.
pub fn walk_expr<V: Visitor + ?Sized>(visitor: &mut V, expr: &Expr) {
    let _ = expr_flow(visitor, expr);
}

fn walk_stmts<V: Visitor + ?Sized>(visitor: &mut V, stmts: &[Stmt]) -> Flow {
    for stmt in stmts {
        stmt_flow(visitor, stmt)?;
    }
    ControlFlow::Continue(())
}

fn walk_exprs<'e, V: Visitor + ?Sized>(
    visitor: &mut V,
    exprs: impl IntoIterator<Item = &'e Expr>,
) -> Flow {
    for expr in exprs {
        expr_flow(visitor, expr)?;
    }
    ControlFlow::Continue(())
}

fn walk_keywords<V: Visitor + ?Sized>(visitor: &mut V, keywords: &[Keyword]) -> Flow {
    walk_exprs(visitor, keywords.iter().map(|k| &k.value))
}

fn stmt_flow<V: Visitor + ?Sized>(visitor: &mut V, stmt: &Stmt) -> Flow {
    enter(
        visitor,
        |v| v.visit_stmt(stmt),
        |v| stmt_children(v, stmt),
        |v| v.leave_stmt(stmt),
    )
}

fn stmt_children<V: Visitor + ?Sized>(v: &mut V, stmt: &Stmt) -> Flow {
    match &stmt.kind {
        StmtKind::FunctionDef(f) => {
            walk_exprs(v, &f.decorator_list)?;
            arguments_flow(v, &f.args)?;
            walk_exprs(v, &f.returns)?;
            walk_stmts(v, &f.body)
        }
        StmtKind::ClassDef(c) => {
            walk_exprs(v, &c.decorator_list)?;
            walk_exprs(v, &c.bases)?;
            walk_keywords(v, &c.keywords)?;
            walk_stmts(v, &c.body)
        }
        StmtKind::Return { value } => walk_exprs(v, value),
        StmtKind::Delete { targets } => walk_exprs(v, targets),
        StmtKind::Assign { targets, value } => {
            walk_exprs(v, targets)?;
            expr_flow(v, value)
        }
        StmtKind::AugAssign { target, value, .. } => {
            expr_flow(v, target)?;
            expr_flow(v, value)
        }
        StmtKind::AnnAssign {
            target,
            annotation,
            value,
            ..
        } => {
            expr_flow(v, target)?;
            expr_flow(v, annotation)?;
            walk_exprs(v, value)
        }
        StmtKind::For(f) => {
            expr_flow(v, &f.target)?;
            expr_flow(v, &f.iter)?;
            walk_stmts(v, &f.body)?;
            walk_stmts(v, &f.orelse)
        }
        StmtKind::While(w) => {
            expr_flow(v, &w.test)?;
            walk_stmts(v, &w.body)?;
            walk_stmts(v, &w.orelse)
        }
        StmtKind::If(i) => {
            expr_flow(v, &i.test)?;
            walk_stmts(v, &i.body)?;
            walk_stmts(v, &i.orelse)
        }
        StmtKind::With(w) => {
            for item in &w.items {
                expr_flow(v, &item.context_expr)?;
                walk_exprs(v, &item.optional_vars)?;
            }
            walk_stmts(v, &w.body)
        }
        StmtKind::Raise { exc, cause } => {
            walk_exprs(v, exc)?;
            walk_exprs(v, cause)
        }
        StmtKind::Try(t) => {
            walk_stmts(v, &t.body)?;
            for handler in &t.handlers {
                handler_flow(v, handler)?;
            }
            walk_stmts(v, &t.orelse)?;
            walk_stmts(v, &t.finalbody)
        }
        StmtKind::Assert { test, msg } => {
            expr_flow(v, test)?;
            walk_exprs(v, msg)
        }
        StmtKind::Expr { value } => expr_flow(v, value),
        StmtKind::Comment(c) => enter(
            v,
            |v| v.visit_comment(c),
            |_| ControlFlow::Continue(()),
            |v| v.leave_comment(c),
        ),
        StmtKind::Import { .. }
        | StmtKind::ImportFrom { .. }
        | StmtKind::Global { .. }
        | StmtKind::Nonlocal { .. }
        | StmtKind::Pass
        | StmtKind::Break
        | StmtKind::Continue => ControlFlow::Continue(()),
    }
}

fn handler_flow<V: Visitor + ?Sized>(visitor: &mut V, handler: &Handler) -> Flow {
    enter(
        visitor,
        |v| v.visit_handler(handler),
        |v| match &handler.kind {
            HandlerKind::ExceptHandler(h) => {
                walk_exprs(v, &h.type_)?;
                walk_stmts(v, &h.body)
            }
            HandlerKind::Comment(c) => enter(
                v,
                |v| v.visit_comment(c),
                |_| ControlFlow::Continue(()),
                |v| v.leave_comment(c),
            ),
        },
        |v| v.leave_handler(handler),
    )
}

fn arguments_flow<V: Visitor + ?Sized>(visitor: &mut V, args: &Arguments) -> Flow {
    enter(
        visitor,
        |v| v.visit_arguments(args),
        |v| {
            let params = args
                .posonlyargs
                .iter()
                .chain(&args.args)
                .chain(&args.vararg)
                .chain(&args.kwonlyargs)
                .chain(&args.kwarg);
            walk_exprs(v, params.filter_map(|a| a.annotation.as_ref()))?;
            walk_exprs(v, &args.defaults)?;
            walk_exprs(v, args.kw_defaults.iter().flatten())
        },
        |v| v.leave_arguments(args),
    )
}

fn comprehension_flow<V: Visitor + ?Sized>(visitor: &mut V, comp: &Comprehension) -> Flow {
    enter(
        visitor,
        |v| v.visit_comprehension(comp),
        |v| {
            expr_flow(v, &comp.target)?;
            expr_flow(v, &comp.iter)?;
            walk_exprs(v, &comp.ifs)
        },
        |v| v.leave_comprehension(comp),
    )
}

fn generators_flow<V: Visitor + ?Sized>(v: &mut V, generators: &[Comprehension]) -> Flow {
    for comp in generators {
        comprehension_flow(v, comp)?;
    }
    ControlFlow::Continue(())
}

fn expr_flow<V: Visitor + ?Sized>(visitor: &mut V, expr: &Expr) -> Flow {
    enter(
        visitor,
        |v| v.visit_expr(expr),
        |v| expr_children(v, expr),
        |v| v.leave_expr(expr),
    )
}

fn expr_children<V: Visitor + ?Sized>(v: &mut V, expr: &Expr) -> Flow {
    match expr {
        Expr::BoolOp { values, .. } => walk_exprs(v, values),
        Expr::NamedExpr { target, value } => {
            expr_flow(v, target)?;
            expr_flow(v, value)
        }
        Expr::BinOp { left, right, .. } => {
            expr_flow(v, left)?;
            expr_flow(v, right)
        }
        Expr::UnaryOp { operand, .. } => expr_flow(v, operand),
        Expr::Lambda { args, body } => {
            arguments_flow(v, args)?;
            expr_flow(v, body)
        }
        Expr::IfExp { test, body, orelse } => {
            expr_flow(v, body)?;
            expr_flow(v, test)?;
            expr_flow(v, orelse)
        }
        Expr::Dict { keys, values } => {
            for (key, value) in keys.iter().zip(values) {
                walk_exprs(v, key)?;
                expr_flow(v, value)?;
            }
            ControlFlow::Continue(())
        }
        Expr::Set(elts) | Expr::List(elts) | Expr::Tuple(elts) => walk_exprs(v, elts),
        Expr::ListComp { elt, generators }
        | Expr::SetComp { elt, generators }
        | Expr::GeneratorExp { elt, generators } => {
            expr_flow(v, elt)?;
            generators_flow(v, generators)
        }
        Expr::DictComp {
            key,
            value,
            generators,
        } => {
            expr_flow(v, key)?;
            expr_flow(v, value)?;
            generators_flow(v, generators)
        }
        Expr::Await(value) | Expr::YieldFrom(value) | Expr::Starred(value) => expr_flow(v, value),
        Expr::Yield(value) => walk_exprs(v, value.as_deref()),
        Expr::Compare {
            left, comparators, ..
        } => {
            expr_flow(v, left)?;
            walk_exprs(v, comparators)
        }
        Expr::Call {
            func,
            args,
            keywords,
        } => {
            expr_flow(v, func)?;
            walk_exprs(v, args)?;
            walk_keywords(v, keywords)
        }
        Expr::Attribute { value, .. } => expr_flow(v, value),
        Expr::Subscript { value, slice } => {
            expr_flow(v, value)?;
            expr_flow(v, slice)
        }
        Expr::Slice { lower, upper, step } => {
            walk_exprs(v, lower.as_deref())?;
            walk_exprs(v, upper.as_deref())?;
            walk_exprs(v, step.as_deref())
        }
        Expr::Constant(_) | Expr::Name(_) => ControlFlow::Continue(()),
    }
}

// ============================================================================
// Transformer
// ============================================================================

/// Transform a module bottom-up.
pub fn transform_module<T: Transformer + ?Sized>(transformer: &mut T, module: Module) -> Module {
    let body = transform_stmts(transformer, module.body);
    transformer.transform_module(Module { body })
}

fn transform_stmts<T: Transformer + ?Sized>(transformer: &mut T, stmts: Vec<Stmt>) -> Vec<Stmt> {
    let mut out = Vec::with_capacity(stmts.len());
    for stmt in stmts {
        let stmt = transform_stmt_lists(transformer, stmt);
        splice(&mut out, transformer.transform_stmt(stmt));
    }
    out
}

fn transform_handlers<T: Transformer + ?Sized>(
    transformer: &mut T,
    handlers: Vec<Handler>,
) -> Vec<Handler> {
    let mut out = Vec::with_capacity(handlers.len());
    for mut handler in handlers {
        if let HandlerKind::ExceptHandler(h) = &mut handler.kind {
            h.body = transform_stmts(transformer, std::mem::take(&mut h.body));
        }
        splice(&mut out, transformer.transform_handler(handler));
    }
    out
}

fn splice<N>(out: &mut Vec<N>, result: Transform<N>) {
    match result {
        Transform::Keep(node) => out.push(node),
        Transform::Remove => {}
        Transform::Flatten(nodes) => out.extend(nodes),
    }
}

/// Transform the statement lists a statement owns.
fn transform_stmt_lists<T: Transformer + ?Sized>(transformer: &mut T, mut stmt: Stmt) -> Stmt {
    let mut list = |stmts: &mut Vec<Stmt>| {
        *stmts = transform_stmts(transformer, std::mem::take(stmts));
    };
    match &mut stmt.kind {
        StmtKind::FunctionDef(f) => list(&mut f.body),
        StmtKind::ClassDef(c) => list(&mut c.body),
        StmtKind::With(w) => list(&mut w.body),
        StmtKind::For(f) => {
            list(&mut f.body);
            list(&mut f.orelse);
        }
        StmtKind::While(w) => {
            list(&mut w.body);
            list(&mut w.orelse);
        }
        StmtKind::If(i) => {
            list(&mut i.body);
            list(&mut i.orelse);
        }
        StmtKind::Try(t) => {
            list(&mut t.body);
            list(&mut t.orelse);
            list(&mut t.finalbody);
            t.handlers = transform_handlers(transformer, std::mem::take(&mut t.handlers));
        }
        _ => {}
    }
    stmt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::Comment;
    use crate::parse_module;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        stop_at: Option<&'static str>,
    }

    impl Visitor for Recorder {
        fn visit_stmt(&mut self, node: &Stmt) -> VisitResult {
            self.events.push(format!("stmt@{}", node.span.lineno));
            VisitResult::Continue
        }

        fn leave_stmt(&mut self, node: &Stmt) {
            self.events.push(format!("/stmt@{}", node.span.lineno));
        }

        fn visit_expr(&mut self, node: &Expr) -> VisitResult {
            if let Expr::Name(id) = node {
                self.events.push(id.clone());
                if self.stop_at == Some(id.as_str()) {
                    return VisitResult::Stop;
                }
            }
            VisitResult::SkipChildren
        }
    }

    #[test]
    fn test_visit_order() {
        let module = parse_module("if a:\n    b\nc").expect("parse error");
        let mut recorder = Recorder::default();
        walk_module(&mut recorder, &module);
        assert_eq!(
            recorder.events,
            vec!["stmt@1", "a", "stmt@2", "b", "/stmt@2", "/stmt@1", "stmt@3", "c", "/stmt@3"]
        );
    }

    #[test]
    fn test_stop_halts_traversal() {
        let module = parse_module("if a:\n    b\nc").expect("parse error");
        let mut recorder = Recorder {
            stop_at: Some("b"),
            ..Recorder::default()
        };
        walk_module(&mut recorder, &module);
        assert_eq!(recorder.events, vec!["stmt@1", "a", "stmt@2", "b"]);
    }

    struct DropPass;

    impl Transformer for DropPass {
        fn transform_stmt(&mut self, node: Stmt) -> Transform<Stmt> {
            match node.kind {
                StmtKind::Pass => Transform::Remove,
                _ => Transform::Keep(node),
            }
        }
    }

    #[test]
    fn test_transformer_removes_nested_statements() {
        let module = parse_module("pass\ntry:\n    pass\n    x\nexcept E:\n    pass\n    y")
            .expect("parse error");
        let module = transform_module(&mut DropPass, module);
        assert_eq!(module.body.len(), 1);
        let StmtKind::Try(t) = &module.body[0].kind else {
            panic!("expected try");
        };
        assert_eq!(t.body.len(), 1);
        let HandlerKind::ExceptHandler(h) = &t.handlers[0].kind else {
            panic!("expected handler");
        };
        assert_eq!(h.body.len(), 1);
    }

    #[derive(Default)]
    struct CommentCounter(usize);

    impl Visitor for CommentCounter {
        fn visit_comment(&mut self, _node: &Comment) -> VisitResult {
            self.0 += 1;
            VisitResult::Continue
        }
    }

    #[test]
    fn test_comments_in_handler_lists_are_visited() {
        let mut module = parse_module("try:\n    a\nexcept:\n    b").expect("parse error");
        let StmtKind::Try(t) = &mut module.body[0].kind else {
            panic!("expected try");
        };
        t.handlers.push(Handler::comment(
            Comment::new("# tail", false),
            crate::nodes::Span::new(5, 0, 5, 6),
        ));
        t.body.push(Stmt::comment(
            Comment::new("# body", true),
            crate::nodes::Span::new(2, 6, 2, 12),
        ));
        let mut counter = CommentCounter::default();
        walk_module(&mut counter, &module);
        assert_eq!(counter.0, 2);
    }
}
