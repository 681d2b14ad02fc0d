// tests/diagnostic_tests.rs

mod common;

use bxast::ast::walk::count_nodes;
use bxast::export;
use bxast::syntax::comments::CommentKind;
use bxast::{ComponentRegistry, ComponentSet, DialectKind, Parser};
use common::{assert_spans_cover_text, class, expression, messages, script};
use std::sync::Arc;

const SCRIPT: &str = r#"// setup
var items = [1, 2, 3];
final var lookup = { "a": 1, b = items[1], c.d: -x };
total = 0;

/* sum the items */
for (var item in items) {
    total += item * 2 ?: 0;
}

outer: while (total > 0 && !done) {
    total--;
    if (total mod 2 == 0) continue outer;
    break;
}

result = obj?.child.method(1, 2).other()[idx].last;
name = "Hello #user.first & ' ' & user.last#!";
fn = (required a, b = 1) => a + b;
short = x -> x ^ 2;
cls = java.lang.Math::max(1, 2);
inst = new models.User@core(id = 1);

switch (total) {
    case 1:
        message = 'one';
        break;
    default:
        message = 'many';
}

try {
    risky();
} catch (custom.Error | other e) {
    rethrow;
} finally {
    cleanup();
}

lock name="guard" timeout=5 {
    shared.count++;
}
param String mode="fast";
"#;

const CLASS: &str = r#"import java.util.List;

/**
 * Stores things.
 */
@singleton
class accessors=true {
    property String name;

    function add(required numeric n) n.hint="amount" {
        return variables.items.append(n);
    }

    static {
        instances = 0;
    }
}
"#;

#[test]
fn every_span_selects_its_text_in_a_script() {
    let result = script(DialectKind::BoxScript, SCRIPT);
    assert!(result.is_correct(), "{:?}", result.issues);
    assert_spans_cover_text(SCRIPT, &result);
}

#[test]
fn every_span_selects_its_text_in_a_class() {
    let result = class(DialectKind::BoxScript, CLASS);
    assert!(result.is_correct(), "{:?}", result.issues);
    assert_spans_cover_text(CLASS, &result);
}

#[test]
fn spans_hold_for_trees_with_issues() {
    let input = "x = -true;\ny = f(1, b=2);\n@@@;\nz = 5.foo;";
    let result = script(DialectKind::Cf, input);
    assert_eq!(result.issues.len(), 4);
    assert_spans_cover_text(input, &result);
}

#[test]
fn rebuilding_is_deterministic() {
    let parser = Parser::new(DialectKind::BoxScript);
    let first = parser.parse_script(SCRIPT).unwrap();
    let second = parser.parse_script(SCRIPT).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        export::to_json(&first).unwrap(),
        export::to_json(&second).unwrap()
    );
}

#[test]
fn parses_do_not_share_issues() {
    let parser = Parser::new(DialectKind::BoxScript);
    let bad = parser.parse_expression("1abc").unwrap();
    let good = parser.parse_expression("abc").unwrap();
    assert_eq!(bad.issues.len(), 1);
    assert!(good.issues.is_empty());
}

#[test]
fn issues_are_reported_in_source_order() {
    let result = script(DialectKind::Cf, "a = 1abc;\nb = -null;\nc = d !== e;");
    assert_eq!(
        messages(&result),
        vec![
            "Identifier name cannot start with a number [1abc]",
            "Minus operator cannot be applied to literal [null]",
            "Operator [!==] is not supported in the CF dialect",
        ]
    );
    let lines: Vec<_> = result
        .issues
        .iter()
        .map(|i| i.position.as_ref().unwrap().start.line)
        .collect();
    assert_eq!(lines, vec![1, 2, 3]);
}

#[test]
fn a_tree_is_always_produced() {
    for input in ["", "}}}", "if (", "x = = ;", "```unterminated"] {
        let result = script(DialectKind::BoxScript, input);
        assert!(result.root.is_some(), "{input:?}");
    }
    let result = script(DialectKind::BoxScript, "");
    assert!(result.is_correct());
}

#[test]
fn comments_are_collected_alongside_the_tree() {
    let result = script(DialectKind::BoxScript, SCRIPT);
    let kinds: Vec<_> = result.comments.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, vec![CommentKind::Line, CommentKind::Block]);
    assert_eq!(result.comments[0].content, "setup");
    assert_eq!(result.comments[1].content, "sum the items");

    let result = class(DialectKind::BoxScript, CLASS);
    assert!(result.comments[0].is_documentation());
    assert_eq!(result.comments[0].content, "Stores things.");
}

#[test]
fn injected_registry_decides_components() {
    let mut names = ComponentSet::empty();
    names.register("widget");
    let registry: Arc<dyn ComponentRegistry> = Arc::new(names);
    let parser = Parser::new(DialectKind::BoxScript).with_components(registry);

    let result = parser.parse_script("widget size=3;").unwrap();
    assert!(result.is_correct(), "{:?}", result.issues);

    let result = parser.parse_script("lock name=\"x\" { }").unwrap();
    assert_eq!(messages(&result), vec!["Unknown component [lock]"]);
}

#[test]
fn node_counts_are_stable() {
    let result = expression(DialectKind::BoxScript, "a.b(1) + c");
    let root = result.root.as_ref().unwrap();
    // BinaryOperation, MethodInvocation, b, a, Argument, 1, c
    assert_eq!(count_nodes(root), 7);
}

#[test]
fn exported_json_is_tagged_by_kind() {
    let result = expression(DialectKind::BoxScript, "x?.y");
    let value = export::to_json_value(&result).unwrap();
    let root = &value["root"];
    assert_eq!(root["kind"], "DotAccess");
    assert_eq!(root["safe"], true);
    assert_eq!(root["text"], "?.y");
    assert_eq!(root["context"]["kind"], "Identifier");
    assert_eq!(root["span"]["start"]["line"], 1);
    assert_eq!(root["span"]["start"]["column"], 1);
}
