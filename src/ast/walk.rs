//! Generic pre-order traversal over every spanned node of a tree.

use super::*;

/// A borrowed reference to any spanned node kind.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Expr(&'a ExprNode),
    Stmt(&'a StmtNode),
    Annotation(&'a WithSpan<Annotation>),
    Parameter(&'a WithSpan<ArgumentDeclaration>),
    ReturnType(&'a WithSpan<ReturnType>),
    SwitchCase(&'a WithSpan<SwitchCase>),
    Catch(&'a WithSpan<TryCatch>),
}

impl<'a> NodeRef<'a> {
    pub fn span(&self) -> Option<&'a Position> {
        match self {
            NodeRef::Expr(n) => n.span.as_ref(),
            NodeRef::Stmt(n) => n.span.as_ref(),
            NodeRef::Annotation(n) => n.span.as_ref(),
            NodeRef::Parameter(n) => n.span.as_ref(),
            NodeRef::ReturnType(n) => n.span.as_ref(),
            NodeRef::SwitchCase(n) => n.span.as_ref(),
            NodeRef::Catch(n) => n.span.as_ref(),
        }
    }

    pub fn text(&self) -> &'a str {
        match self {
            NodeRef::Expr(n) => &n.text,
            NodeRef::Stmt(n) => &n.text,
            NodeRef::Annotation(n) => &n.text,
            NodeRef::Parameter(n) => &n.text,
            NodeRef::ReturnType(n) => &n.text,
            NodeRef::SwitchCase(n) => &n.text,
            NodeRef::Catch(n) => &n.text,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeRef::Expr(n) => n.value.kind_name(),
            NodeRef::Stmt(n) => n.value.kind_name(),
            NodeRef::Annotation(_) => "Annotation",
            NodeRef::Parameter(_) => "ArgumentDeclaration",
            NodeRef::ReturnType(_) => "ReturnType",
            NodeRef::SwitchCase(_) => "SwitchCase",
            NodeRef::Catch(_) => "TryCatch",
        }
    }
}

/// Visits `root` and all of its descendants, parents before children.
pub fn for_each_node<'a>(root: &'a Root, visit: &mut dyn FnMut(NodeRef<'a>)) {
    match root {
        Root::Statement(stmt) => walk_stmt(stmt, visit),
        Root::Expression(expr) => walk_expr(expr, visit),
    }
}

/// Counts every node reachable from `root`, the root included.
pub fn count_nodes(root: &Root) -> usize {
    let mut count = 0;
    for_each_node(root, &mut |_| count += 1);
    count
}

pub fn walk_stmt<'a>(node: &'a StmtNode, visit: &mut dyn FnMut(NodeRef<'a>)) {
    visit(NodeRef::Stmt(node));
    match &node.value {
        Stmt::Script { statements: body }
        | Stmt::Block { body }
        | Stmt::StaticInitializer { body } => walk_stmts(body, visit),
        Stmt::ExpressionStatement { expression } | Stmt::Assert { expression } => {
            walk_expr(expression, visit)
        }
        Stmt::IfElse {
            condition,
            then_body,
            else_body,
        } => {
            walk_expr(condition, visit);
            walk_stmt(then_body, visit);
            if let Some(else_body) = else_body {
                walk_stmt(else_body, visit);
            }
        }
        Stmt::While {
            condition, body, ..
        }
        | Stmt::Do {
            condition, body, ..
        } => {
            walk_expr(condition, visit);
            walk_stmt(body, visit);
        }
        Stmt::ForIndex {
            initializer,
            condition,
            step,
            body,
            ..
        } => {
            for expr in [initializer, condition, step].into_iter().flatten() {
                walk_expr(expr, visit);
            }
            walk_stmt(body, visit);
        }
        Stmt::ForIn {
            variable,
            collection,
            body,
            ..
        } => {
            walk_expr(variable, visit);
            walk_expr(collection, visit);
            walk_stmt(body, visit);
        }
        Stmt::Switch { condition, cases } => {
            walk_expr(condition, visit);
            for case in cases {
                visit(NodeRef::SwitchCase(case));
                if let Some(condition) = &case.value.condition {
                    walk_expr(condition, visit);
                }
                walk_stmts(&case.value.body, visit);
            }
        }
        Stmt::Try {
            body,
            catches,
            finally,
        } => {
            walk_stmts(body, visit);
            for catch in catches {
                visit(NodeRef::Catch(catch));
                walk_exprs(&catch.value.types, visit);
                walk_expr(&catch.value.exception, visit);
                walk_stmts(&catch.value.body, visit);
            }
            walk_stmts(finally, visit);
        }
        Stmt::Throw { expression } | Stmt::Return { expression } => {
            if let Some(expression) = expression {
                walk_expr(expression, visit);
            }
        }
        Stmt::FunctionDeclaration {
            return_type,
            parameters,
            annotations,
            body,
            ..
        } => {
            if let Some(return_type) = return_type {
                visit(NodeRef::ReturnType(return_type));
            }
            walk_parameters(parameters, visit);
            walk_annotations(annotations, visit);
            if let Some(body) = body {
                walk_stmts(body, visit);
            }
        }
        Stmt::Property { annotations } => walk_annotations(annotations, visit),
        Stmt::Import { target, alias } => {
            walk_expr(target, visit);
            if let Some(alias) = alias {
                walk_expr(alias, visit);
            }
        }
        Stmt::Class {
            imports,
            body,
            annotations,
            documentation,
            properties,
        } => {
            walk_stmts(imports, visit);
            walk_annotations(annotations, visit);
            walk_annotations(documentation, visit);
            walk_stmts(properties, visit);
            walk_stmts(body, visit);
        }
        Stmt::Interface {
            imports,
            body,
            annotations,
            documentation,
        } => {
            walk_stmts(imports, visit);
            walk_annotations(annotations, visit);
            walk_annotations(documentation, visit);
            walk_stmts(body, visit);
        }
        Stmt::Component {
            attributes, body, ..
        } => {
            walk_annotations(attributes, visit);
            if let Some(body) = body {
                walk_stmts(body, visit);
            }
        }
        Stmt::Rethrow
        | Stmt::Break { .. }
        | Stmt::Continue { .. }
        | Stmt::TemplateIsland { .. }
        | Stmt::StatementError => {}
    }
}

pub fn walk_expr<'a>(node: &'a ExprNode, visit: &mut dyn FnMut(NodeRef<'a>)) {
    visit(NodeRef::Expr(node));
    match &node.value {
        Expr::StringInterpolation { parts } | Expr::StringConcat { parts } => {
            walk_exprs(parts, visit)
        }
        Expr::Parenthesis { expression } | Expr::UnaryOperation { expression, .. } => {
            walk_expr(expression, visit)
        }
        Expr::BinaryOperation { left, right, .. } | Expr::ComparisonOperation { left, right, .. } => {
            walk_expr(left, visit);
            walk_expr(right, visit);
        }
        Expr::TernaryOperation {
            condition,
            when_true,
            when_false,
        } => {
            walk_expr(condition, visit);
            walk_expr(when_true, visit);
            walk_expr(when_false, visit);
        }
        Expr::Assignment { left, right, .. } => {
            walk_expr(left, visit);
            if let Some(right) = right {
                walk_expr(right, visit);
            }
        }
        Expr::DotAccess {
            context, access, ..
        }
        | Expr::StaticAccess { context, access }
        | Expr::ArrayAccess {
            context, access, ..
        } => {
            walk_expr(context, visit);
            walk_expr(access, visit);
        }
        Expr::ArrayLiteral { values } => walk_exprs(values, visit),
        Expr::StructLiteral { members, .. } => {
            for member in members {
                walk_expr(&member.key, visit);
                walk_expr(&member.value, visit);
            }
        }
        Expr::Argument { name, value } => {
            if let Some(name) = name {
                walk_expr(name, visit);
            }
            walk_expr(value, visit);
        }
        Expr::FunctionInvocation { arguments, .. } => walk_exprs(arguments, visit),
        Expr::MethodInvocation {
            name,
            receiver,
            arguments,
            ..
        }
        | Expr::StaticMethodInvocation {
            name,
            receiver,
            arguments,
        } => {
            walk_expr(receiver, visit);
            walk_expr(name, visit);
            walk_exprs(arguments, visit);
        }
        Expr::ExpressionInvocation { callee, arguments } => {
            walk_expr(callee, visit);
            walk_exprs(arguments, visit);
        }
        Expr::New {
            prefix,
            target,
            arguments,
        } => {
            if let Some(prefix) = prefix {
                walk_expr(prefix, visit);
            }
            walk_expr(target, visit);
            walk_exprs(arguments, visit);
        }
        Expr::Closure {
            parameters,
            annotations,
            body,
        }
        | Expr::Lambda {
            parameters,
            annotations,
            body,
        } => {
            walk_parameters(parameters, visit);
            walk_annotations(annotations, visit);
            walk_stmt(body, visit);
        }
        Expr::FunctionalMemberAccess { arguments, .. } => {
            if let Some(arguments) = arguments {
                walk_exprs(arguments, visit);
            }
        }
        Expr::Null
        | Expr::BooleanLiteral { .. }
        | Expr::IntegerLiteral { .. }
        | Expr::DecimalLiteral { .. }
        | Expr::StringLiteral { .. }
        | Expr::Identifier { .. }
        | Expr::Scope { .. }
        | Expr::Fqn { .. }
        | Expr::FunctionalBifAccess { .. }
        | Expr::ExpressionError => {}
    }
}

fn walk_stmts<'a>(nodes: &'a [StmtNode], visit: &mut dyn FnMut(NodeRef<'a>)) {
    for node in nodes {
        walk_stmt(node, visit);
    }
}

fn walk_exprs<'a>(nodes: &'a [ExprNode], visit: &mut dyn FnMut(NodeRef<'a>)) {
    for node in nodes {
        walk_expr(node, visit);
    }
}

fn walk_annotations<'a>(nodes: &'a [WithSpan<Annotation>], visit: &mut dyn FnMut(NodeRef<'a>)) {
    for node in nodes {
        visit(NodeRef::Annotation(node));
        walk_expr(&node.value.key, visit);
        if let Some(value) = &node.value.value {
            walk_expr(value, visit);
        }
    }
}

fn walk_parameters<'a>(
    nodes: &'a [WithSpan<ArgumentDeclaration>],
    visit: &mut dyn FnMut(NodeRef<'a>),
) {
    for node in nodes {
        visit(NodeRef::Parameter(node));
        if let Some(default) = &node.value.default_value {
            walk_expr(default, visit);
        }
        walk_annotations(&node.value.annotations, visit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_nested_expression_nodes() {
        let one = WithSpan::synthetic(Expr::IntegerLiteral { value: "1".into() });
        let two = WithSpan::synthetic(Expr::IntegerLiteral { value: "2".into() });
        let sum = WithSpan::synthetic(Expr::BinaryOperation {
            left: Box::new(one),
            operator: BinaryOperator::Plus,
            right: Box::new(two),
        });
        assert_eq!(count_nodes(&Root::Expression(sum)), 3);
    }
}
