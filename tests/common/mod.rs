//! Shared helpers for the integration suites.
#![allow(dead_code)]

use bxast::ast::walk::{for_each_node, NodeRef};
use bxast::ast::{Expr, ExprNode, Root, Stmt, StmtNode};
use bxast::{DialectKind, Parser, ParsingResult};

pub fn expression(dialect: DialectKind, input: &str) -> ParsingResult {
    Parser::new(dialect).parse_expression(input).unwrap()
}

pub fn script(dialect: DialectKind, input: &str) -> ParsingResult {
    Parser::new(dialect).parse_script(input).unwrap()
}

pub fn class(dialect: DialectKind, input: &str) -> ParsingResult {
    Parser::new(dialect).parse_class(input).unwrap()
}

/// The root of an expression parse.
pub fn expr(result: &ParsingResult) -> &ExprNode {
    result
        .root
        .as_ref()
        .and_then(Root::as_expression)
        .expect("expression root")
}

/// The top-level statements of a script parse.
pub fn statements(result: &ParsingResult) -> &[StmtNode] {
    match result.root.as_ref().and_then(Root::as_statement) {
        Some(StmtNode {
            value: Stmt::Script { statements },
            ..
        }) => statements,
        other => panic!("expected a script root, got {:?}", other),
    }
}

/// The expression of the `index`th top-level expression statement.
pub fn statement_expr(result: &ParsingResult, index: usize) -> &ExprNode {
    match &statements(result)[index].value {
        Stmt::ExpressionStatement { expression } => expression,
        other => panic!("expected an expression statement, got {:?}", other),
    }
}

pub fn messages(result: &ParsingResult) -> Vec<&str> {
    result.issues.iter().map(|i| i.message.as_str()).collect()
}

pub fn name(node: &ExprNode) -> &str {
    match &node.value {
        Expr::Identifier { name } | Expr::Scope { name } => name,
        Expr::Fqn { value } | Expr::StringLiteral { value } => value,
        other => panic!("expected a name, got {:?}", other),
    }
}

/// Every spanned node's span selects exactly its stored text in `input`.
pub fn assert_spans_cover_text(input: &str, result: &ParsingResult) {
    let root = result.root.as_ref().expect("root");
    let mut checked = 0;
    for_each_node(root, &mut |node: NodeRef<'_>| {
        let Some(span) = node.span() else {
            return;
        };
        let range = span
            .byte_range(input)
            .unwrap_or_else(|| panic!("{} span {} is outside the input", node.kind_name(), span));
        assert_eq!(
            &input[range],
            node.text(),
            "{} at {} does not cover its text",
            node.kind_name(),
            span
        );
        checked += 1;
    });
    assert!(checked > 0);
}
