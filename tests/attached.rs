//! Comment attachment in attached mode.

use pycomments::{parse, parse_with_config, CommentMode, Module, ParseConfig};
use pycomments_syntax::{dump, StmtKind};

fn parse_attached(source: &str) -> Module {
    let config = ParseConfig::default().with_mode(CommentMode::Attached);
    parse_with_config(source, &config).expect("parse should succeed")
}

#[test]
fn statements_start_without_comments() {
    let module = parse_attached("hello = 'hello'");
    assert!(module.body[0].comments.is_empty());
}

#[test]
fn inline_comment() {
    let module = parse_attached("hello = 'hello' # comment to hello");
    assert_eq!(module.body.len(), 1);
    assert_eq!(module.body[0].comments, vec!["comment to hello"]);
}

#[test]
fn comment_on_the_line_before() {
    let module = parse_attached("\n# comment to hello\nhello = 'hello'\n");
    assert_eq!(module.body[0].comments, vec!["comment to hello"]);
}

#[test]
fn several_comments_in_source_order() {
    let source = "\n# comment to hello 1\n# comment to hello 2\n\nhello = 'hello' # comment to hello 3\n";
    let module = parse_attached(source);
    assert_eq!(
        module.body[0].comments,
        vec!["comment to hello 1", "comment to hello 2", "comment to hello 3"]
    );
}

#[test]
fn unrelated_comment_is_dropped() {
    let module = parse_attached("\nhello = 'hello'\n# unrelated comment\n");
    assert_eq!(module.body.len(), 1);
    assert!(module.body[0].comments.is_empty());
}

#[test]
fn comments_to_function_and_body() {
    let source = "\n# comment to function 'foo'\ndef foo(*args, **kwargs):\n    print(args, kwargs) # comment to print\n";
    let module = parse_attached(source);
    let function = &module.body[0];
    assert_eq!(function.comments, vec!["comment to function 'foo'"]);
    let StmtKind::FunctionDef(def) = &function.kind else {
        panic!("expected function");
    };
    assert_eq!(def.body[0].comments, vec!["comment to print"]);
}

#[test]
fn comments_to_class_members() {
    let source = r#"
# comment to class 'Foo'
class Foo:
    var = "Foo var"    # comment to 'Foo.var'

    # comment to method 'foo'
    def foo(self):
        ...
"#;
    let module = parse_attached(source);
    let class = &module.body[0];
    assert_eq!(class.comments, vec!["comment to class 'Foo'"]);
    let StmtKind::ClassDef(def) = &class.kind else {
        panic!("expected class");
    };
    let [var, method] = def.body.as_slice() else {
        panic!("expected two members, got {}", def.body.len());
    };
    assert_eq!(var.comments, vec!["comment to 'Foo.var'"]);
    assert_eq!(method.comments, vec!["comment to method 'foo'"]);
}

#[test]
fn handler_header_comment_goes_to_the_handler() {
    let source = "try:\n    a\nexcept E:  # on E\n    b\n";
    let module = parse_attached(source);
    let StmtKind::Try(try_stmt) = &module.body[0].kind else {
        panic!("expected try");
    };
    assert_eq!(try_stmt.handlers[0].comments, vec!["on E"]);
}

/// Attached mode never inserts nodes, so removing the texts gives back the
/// positional tree with its comments stripped.
#[test]
fn tree_shape_matches_plain_parse() {
    let source = "# a\nif x:  # b\n    y = 1\n# c\nelse:\n    z = 2  # d\n";
    let mut attached = parse_attached(source);
    clear(&mut attached);
    let positional = pycomments::strip_comments(parse(source).expect("parse"));
    assert_eq!(dump(&attached), dump(&positional));
}

fn clear(module: &mut Module) {
    use pycomments_syntax::ContainerOwner;

    fn clear_node(node: &mut dyn ContainerOwner) {
        if let Some(comments) = node.attached_comments_mut() {
            comments.clear();
        }
        for &attr in node.container_attrs() {
            if let Some(mut container) = node.container_mut(attr) {
                for child in container.owners_mut() {
                    clear_node(child);
                }
            }
        }
    }
    clear_node(module);
}
