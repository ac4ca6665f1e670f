//! Comment placement in positional mode.
//!
//! Each test parses a small program and checks where the comment nodes
//! ended up in the statement lists.

use pycomments::{parse, Module};
use pycomments_syntax::{CommentCollector, Handler, HandlerKind, Stmt, StmtKind};

fn parse_ok(source: &str) -> Module {
    parse(source).expect("parse should succeed")
}

/// `(value, inline)` of a comment node, `None` for anything else.
fn comment(stmt: &Stmt) -> Option<(&str, bool)> {
    stmt.as_comment().map(|c| (c.value.as_str(), c.inline))
}

/// Shape of a statement list: `Some((value, inline))` per comment, `None`
/// per other statement.
fn shape(stmts: &[Stmt]) -> Vec<Option<(&str, bool)>> {
    stmts.iter().map(comment).collect()
}

fn body(stmt: &Stmt) -> &[Stmt] {
    match &stmt.kind {
        StmtKind::FunctionDef(f) => &f.body,
        StmtKind::ClassDef(c) => &c.body,
        StmtKind::For(f) => &f.body,
        StmtKind::While(w) => &w.body,
        StmtKind::If(i) => &i.body,
        StmtKind::With(w) => &w.body,
        StmtKind::Try(t) => &t.body,
        other => panic!("no body on {:?}", other),
    }
}

fn orelse(stmt: &Stmt) -> &[Stmt] {
    match &stmt.kind {
        StmtKind::For(f) => &f.orelse,
        StmtKind::While(w) => &w.orelse,
        StmtKind::If(i) => &i.orelse,
        StmtKind::Try(t) => &t.orelse,
        other => panic!("no orelse on {:?}", other),
    }
}

fn handler_body(handler: &Handler) -> &[Stmt] {
    match &handler.kind {
        HandlerKind::ExceptHandler(h) => &h.body,
        HandlerKind::Comment(c) => panic!("comment handler {:?}", c),
    }
}

// ============================================================================
// Module level
// ============================================================================

#[test]
fn comment_only_file() {
    let module = parse_ok("# comment");
    assert_eq!(shape(&module.body), vec![Some(("# comment", false))]);
}

#[test]
fn trailing_space_does_not_make_a_comment_inline() {
    let module = parse_ok("# comment ");
    assert_eq!(shape(&module.body), vec![Some(("# comment ", false))]);
}

#[test]
fn inline_comment_follows_its_statement() {
    let module = parse_ok("hello = 'hello' # comment to hello");
    assert_eq!(
        shape(&module.body),
        vec![None, Some(("# comment to hello", true))]
    );
}

#[test]
fn standalone_comments_precede_their_statement() {
    let module = parse_ok("\n# comment to hello 1\n# comment to hello 2\nhello = 'hello'\n");
    assert_eq!(
        shape(&module.body),
        vec![
            Some(("# comment to hello 1", false)),
            Some(("# comment to hello 2", false)),
            None,
        ]
    );
}

#[test]
fn blank_line_between_comments_and_inline_comment() {
    let source = "\n# comment to hello 1\n# comment to hello 2\n\nhello = 'hello' # comment to hello 3\n";
    let module = parse_ok(source);
    assert_eq!(
        shape(&module.body),
        vec![
            Some(("# comment to hello 1", false)),
            Some(("# comment to hello 2", false)),
            None,
            Some(("# comment to hello 3", true)),
        ]
    );
}

#[test]
fn unrelated_comment_after_last_statement() {
    let module = parse_ok("\nhello = 'hello'\n# unrelated comment\n\n");
    assert_eq!(
        shape(&module.body),
        vec![None, Some(("# unrelated comment", false))]
    );
}

#[test]
fn comment_after_several_statements_on_one_line() {
    let module = parse_ok("a=1; b=2 # hello");
    assert_eq!(shape(&module.body), vec![None, None, Some(("# hello", true))]);
}

#[test]
fn several_statements_on_one_line() {
    let module = parse_ok("hello = 'hello'; hello += ' world?'");
    assert_eq!(module.body.len(), 2);
}

// ============================================================================
// Definitions
// ============================================================================

#[test]
fn comments_to_function() {
    let source = "\n# comment to function 'foo'\ndef foo(*args, **kwargs):\n    print(args, kwargs) # comment to print\n";
    let module = parse_ok(source);
    assert_eq!(
        shape(&module.body),
        vec![Some(("# comment to function 'foo'", false)), None]
    );
    assert_eq!(
        shape(body(&module.body[1])),
        vec![None, Some(("# comment to print", true))]
    );
}

#[test]
fn comments_to_class() {
    let source = r#"
# comment to class 'Foo'
class Foo:
    var = "Foo var"    # comment to 'Foo.var'

    # comment to method 'foo'
    def foo(self):
        ...
"#;
    let module = parse_ok(source);
    assert_eq!(
        shape(&module.body),
        vec![Some(("# comment to class 'Foo'", false)), None]
    );
    let class_body = body(&module.body[1]);
    assert_eq!(
        shape(class_body),
        vec![
            None,
            Some(("# comment to 'Foo.var'", true)),
            Some(("# comment to method 'foo'", false)),
            None,
        ]
    );
    assert!(matches!(class_body[3].kind, StmtKind::FunctionDef(_)));
}

#[test]
fn comment_at_start_of_block() {
    let module = parse_ok("\ndef test():\n    # Comment at start of block\n    hello = 'hello'\n");
    assert!(body(&module.body[0])[0].is_comment());
}

#[test]
fn misindented_comment_at_start_of_block_stays_inside() {
    let module = parse_ok("\ndef test():\n# Comment at start of block\n    hello = 'hello'\n");
    assert_eq!(module.body.len(), 1);
    assert!(body(&module.body[0])[0].is_comment());
}

#[test]
fn comment_at_end_of_block() {
    let module = parse_ok("\ndef test():\n    hello = 'hello'\n    # Comment at end of block\n");
    assert_eq!(
        shape(body(&module.body[0])),
        vec![None, Some(("# Comment at end of block", false))]
    );
}

/// A standalone comment before a statement and an inline comment on the
/// only statement of a function body.
#[test]
fn function_with_leading_and_inline_comments() {
    let module = parse_ok("def f():\n    # first\n    return 1  # one\n");
    assert_eq!(
        shape(body(&module.body[0])),
        vec![Some(("# first", false)), None, Some(("# one", true))]
    );
}

// ============================================================================
// Compound statements
// ============================================================================

#[test]
fn comments_to_if_elif_else() {
    let source = r#"
if a > b: # if comment
    print('bigger')
elif a == b: # elif comment
    print('equal')
else: # else comment
    print('less')
"#;
    let module = parse_ok(source);
    assert_eq!(module.body.len(), 1);
    let if_stmt = &module.body[0];
    assert_eq!(
        shape(body(if_stmt)),
        vec![Some(("# if comment", true)), None]
    );

    let orelse = orelse(if_stmt);
    assert_eq!(orelse.len(), 1, "elif is a nested if");
    assert_eq!(
        shape(body(&orelse[0])),
        vec![Some(("# elif comment", true)), None]
    );
    assert_eq!(
        shape(self::orelse(&orelse[0])),
        vec![Some(("# else comment", true)), None]
    );
}

#[test]
fn comment_before_else_at_if_indentation_goes_to_orelse() {
    let source = "\nif 1 == 1:\n    hello = 'hello'\n# Comment at end of block\nelse:\n    hello = 'hello'\n";
    let module = parse_ok(source);
    let if_stmt = &module.body[0];
    assert_eq!(shape(body(if_stmt)), vec![None]);
    assert_eq!(
        shape(orelse(if_stmt)),
        vec![Some(("# Comment at end of block", false)), None]
    );
}

#[test]
fn comments_to_for_else() {
    let source = r#"
for i in range(10): # for comment
    continue    # continue comment
else:   # else comment
    pass    # pass comment
"#;
    let module = parse_ok(source);
    assert_eq!(module.body.len(), 1);
    let for_stmt = &module.body[0];
    assert_eq!(
        shape(body(for_stmt)),
        vec![
            Some(("# for comment", true)),
            None,
            Some(("# continue comment", true)),
        ]
    );
    assert_eq!(
        shape(orelse(for_stmt)),
        vec![
            Some(("# else comment", true)),
            None,
            Some(("# pass comment", true)),
        ]
    );
}

#[test]
fn comments_to_try_clauses() {
    let source = r#"
try:    # try comment
    1 / 0   # expr comment
except ValueError:  # except ValueError comment
    pass    # pass comment
except KeyError:    # except KeyError
    pass    # pass comment
else:   # else comment
    print() # print comment
finally:    # finally comment
    print() # print comment
"#;
    let module = parse_ok(source);
    assert_eq!(module.body.len(), 1);
    let StmtKind::Try(try_stmt) = &module.body[0].kind else {
        panic!("expected try");
    };

    fn kinds(stmts: &[Stmt]) -> Vec<bool> {
        stmts.iter().map(|s| s.is_comment()).collect()
    }
    assert_eq!(kinds(&try_stmt.body), vec![true, false, true]);
    assert_eq!(try_stmt.handlers.len(), 2);
    for handler in &try_stmt.handlers {
        assert_eq!(kinds(handler_body(handler)), vec![true, false, true]);
    }
    assert_eq!(kinds(&try_stmt.orelse), vec![true, false, true]);
    assert_eq!(kinds(&try_stmt.finalbody), vec![true, false, true]);
}

#[test]
fn comment_between_handlers_becomes_a_handler_entry() {
    let source = "try:\n    a\nexcept A:\n    b\n# about B\nexcept B:\n    c\n";
    let module = parse_ok(source);
    let StmtKind::Try(try_stmt) = &module.body[0].kind else {
        panic!("expected try");
    };
    let entries: Vec<bool> = try_stmt.handlers.iter().map(|h| h.is_comment()).collect();
    assert_eq!(entries, vec![false, true, false]);
}

#[test]
fn comment_after_multiline_expression() {
    let module = parse_ok("\nif a:\n    (b if b >=\n        0 else 1)    # some comment\n");
    assert_eq!(
        shape(body(&module.body[0])),
        vec![None, Some(("# some comment", true))]
    );
}

#[test]
fn comment_after_nested_try_stays_in_outer_block() {
    let source = "if a:\n    try:\n        b\n    except E:\n        pass\n    # trailing in if body\nx = 1";
    let module = parse_ok(source);
    assert_eq!(shape(&module.body), vec![None, None]);
    assert_eq!(
        shape(body(&module.body[0])),
        vec![None, Some(("# trailing in if body", false))]
    );
}

#[test]
fn comment_after_handler_block_stays_in_handler() {
    let source = "try:\n    pass\nexcept:\n    if r:\n        raise\n    #else, swallow\n\n#module\nimport atexit";
    let module = parse_ok(source);
    assert_eq!(
        shape(&module.body),
        vec![None, Some(("#module", false)), None]
    );
    let StmtKind::Try(try_stmt) = &module.body[0].kind else {
        panic!("expected try");
    };
    assert_eq!(
        shape(handler_body(&try_stmt.handlers[0])),
        vec![None, Some(("#else, swallow", false))]
    );
}

#[test]
fn blank_line_does_not_move_header_comment() {
    let module = parse_ok("\n# comment 1\nif a:  # comment 2\n\n    pass\n");
    assert_eq!(
        shape(&module.body),
        vec![Some(("# comment 1", false)), None]
    );
    assert_eq!(
        shape(body(&module.body[1])),
        vec![Some(("# comment 2", true)), None]
    );
}

// ============================================================================
// Invariants
// ============================================================================

/// Every container is ordered by end line, and two adjacent comments are
/// never both inline.
#[test]
fn containers_are_ordered_and_adjacency_is_repaired() {
    let source = r#"
import os  # os
# lead
class A:  # a
    x = 1  # x
    # y
    def f(self):  # f
        if x:
            pass  # p
        # end if
        return 2
# tail
"#;
    let module = parse_ok(source);

    fn check(stmts: &[Stmt]) {
        for pair in stmts.windows(2) {
            assert!(pair[0].span.end_lineno <= pair[1].span.end_lineno);
            if let (Some(a), Some(b)) = (pair[0].as_comment(), pair[1].as_comment()) {
                assert!(!(a.inline && b.inline), "adjacent inline comments {:?} {:?}", a, b);
            }
        }
        for stmt in stmts {
            match &stmt.kind {
                StmtKind::ClassDef(c) => check(&c.body),
                StmtKind::FunctionDef(f) => check(&f.body),
                StmtKind::If(i) => {
                    check(&i.body);
                    check(&i.orelse);
                }
                _ => {}
            }
        }
    }
    check(&module.body);

    let values: Vec<String> = CommentCollector::collect(&module)
        .into_iter()
        .map(|c| c.value)
        .collect();
    let mut sorted = values.clone();
    sorted.sort();
    let mut expected = vec!["# os", "# lead", "# a", "# x", "# y", "# f", "# p", "# end if", "# tail"];
    expected.sort();
    assert_eq!(sorted, expected);
}

#[test]
fn inline_flag_follows_the_physical_line() {
    let source = "x = 1  # inline\n    # indented standalone\ny = [\n    1,\n]  # after bracket\n";
    let module = parse_ok(source);
    let flags: Vec<(String, bool)> = CommentCollector::collect(&module)
        .into_iter()
        .map(|c| (c.value, c.inline))
        .collect();
    assert_eq!(
        flags,
        vec![
            ("# inline".to_string(), true),
            ("# indented standalone".to_string(), false),
            ("# after bracket".to_string(), true),
        ]
    );
}
