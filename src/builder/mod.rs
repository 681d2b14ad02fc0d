//! Parse tree to AST transformation.
//!
//! One [`AstBuilder`] is created per parse. It owns the issue sink and the
//! position resolver for that parse and is consumed when the parse ends, so no
//! state leaks between invocations.
//!
//! The walk is a plain post-order recursion over pest pairs. The one place that
//! needs more context than a single pair provides is the postfix access chain,
//! which the grammar produces flat and [`chain`] folds left to right.

use pest::iterators::Pairs;

use crate::ast::{ExprNode, Position, Root, Stmt, StmtNode, WithSpan};
use crate::components::ComponentRegistry;
use crate::diagnostics::{BxError, Diagnostics};
use crate::dialect::Dialect;
use crate::err_pos;
use crate::syntax::comments::Comment;
use crate::syntax::position::{text_between, text_of};
use crate::syntax::{Pair, PositionResolver, Rule};

mod chain;
mod component;
mod decl;
mod expr;
mod stmt;
mod strings;

pub type BuildResult<T> = Result<T, BxError>;

pub struct AstBuilder<'a> {
    dialect: &'static dyn Dialect,
    components: &'a dyn ComponentRegistry,
    resolver: PositionResolver,
    comments: &'a [Comment],
    diagnostics: Diagnostics,
}

impl<'a> AstBuilder<'a> {
    pub fn new(
        dialect: &'static dyn Dialect,
        components: &'a dyn ComponentRegistry,
        resolver: PositionResolver,
        comments: &'a [Comment],
    ) -> Self {
        Self {
            dialect,
            components,
            resolver,
            comments,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    // ========================================================================
    // ENTRY POINTS
    // ========================================================================

    /// Builds the root of a `script` parse.
    pub fn build_script(&mut self, pair: Pair<'_>) -> BuildResult<Root> {
        let position = self.resolver.span_of(&pair);
        let text = text_of(&pair).to_string();
        let mut statements = Vec::new();
        for child in pair.into_inner() {
            match child.as_rule() {
                Rule::EOI => {}
                Rule::stray_close => statements.push(self.error_statement(child)),
                _ => statements.extend(self.guarded_statement(child)?),
            }
        }
        Ok(Root::Statement(WithSpan::new(
            Stmt::Script { statements },
            position,
            text,
        )))
    }

    /// Builds the root of a `class_file` parse.
    pub fn build_class_file(&mut self, pair: Pair<'_>) -> BuildResult<Root> {
        let mut imports = Vec::new();
        let mut declaration = None;
        let mut after = None;
        for child in pair.into_inner() {
            match child.as_rule() {
                Rule::import_statement => {
                    after = Some(self.resolver.span_of(&child).end);
                    imports.extend(self.guarded_statement(child)?);
                }
                Rule::class_declaration => {
                    declaration = Some(self.class_declaration(child, after)?)
                }
                Rule::interface_declaration => {
                    declaration = Some(self.interface_declaration(child, after)?)
                }
                Rule::EOI => {}
                _ => return Err(self.unexpected(&child)),
            }
        }
        let mut declaration = declaration
            .ok_or_else(|| crate::err_msg!(Syntax, "Class file has no class or interface"))?;
        match &mut declaration.value {
            Stmt::Class { imports: slot, .. } | Stmt::Interface { imports: slot, .. } => {
                *slot = imports;
            }
            _ => {}
        }
        Ok(Root::Statement(declaration))
    }

    /// Builds the root of a `standalone_expression` parse.
    pub fn build_standalone(&mut self, pair: Pair<'_>) -> BuildResult<Root> {
        let mut inner = pair.clone().into_inner();
        let expression = self.expect(&mut inner, "expression", &pair)?;
        Ok(Root::Expression(self.expression(expression)?))
    }

    // ========================================================================
    // STATEMENT WRAPPER AND ERROR NODES
    // ========================================================================

    /// Builds one statement. A recoverable construction failure becomes an
    /// error statement plus one issue; internal errors propagate.
    fn guarded_statement(&mut self, pair: Pair<'_>) -> BuildResult<Option<StmtNode>> {
        let position = self.resolver.span_of(&pair);
        let text = text_of(&pair).to_string();
        match self.statement(pair) {
            Ok(stmt) => Ok(stmt),
            Err(BxError::Syntax { message, ctx, .. }) => {
                let at = ctx.position.unwrap_or_else(|| position.clone());
                self.issue(message, Some(at));
                Ok(Some(WithSpan::new(Stmt::StatementError, position, text)))
            }
            Err(other) => Err(other),
        }
    }

    fn guarded_statements(&mut self, pairs: Pairs<'_, Rule>) -> BuildResult<Vec<StmtNode>> {
        let mut statements = Vec::new();
        for pair in pairs {
            statements.extend(self.guarded_statement(pair)?);
        }
        Ok(statements)
    }

    fn error_expression(&mut self, pair: Pair<'_>) -> ExprNode {
        let node = self.node(crate::ast::Expr::ExpressionError, &pair);
        self.issue(
            format!("Invalid expression error: {}", node.text),
            node.span.clone(),
        );
        node
    }

    fn missing_expression(&mut self, pair: Pair<'_>) -> ExprNode {
        let node = self.node(crate::ast::Expr::ExpressionError, &pair);
        self.issue("Missing expression", node.span.clone());
        node
    }

    fn error_statement(&mut self, pair: Pair<'_>) -> StmtNode {
        let node = self.node(Stmt::StatementError, &pair);
        self.issue(
            format!("Invalid statement error: {}", node.text),
            node.span.clone(),
        );
        node
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn node<T>(&self, value: T, pair: &Pair<'_>) -> WithSpan<T> {
        WithSpan::new(value, self.resolver.span_of(pair), text_of(pair))
    }

    fn node_between<T>(&self, value: T, first: &Pair<'_>, last: &Pair<'_>) -> WithSpan<T> {
        WithSpan::new(
            value,
            self.resolver.span_between(first, last),
            text_between(first, last),
        )
    }

    fn issue(&mut self, message: impl Into<String>, position: Option<Position>) {
        self.diagnostics.issue(message, position);
    }

    fn expect<'i>(
        &self,
        pairs: &mut Pairs<'i, Rule>,
        expected: &str,
        parent: &Pair<'i>,
    ) -> BuildResult<Pair<'i>> {
        pairs.next().ok_or_else(|| {
            err_pos!(
                Syntax,
                format!("Expected {} in [{}]", expected, parent.as_str()),
                self.resolver.span_of(parent)
            )
        })
    }

    fn unexpected(&self, pair: &Pair<'_>) -> BxError {
        err_pos!(
            Syntax,
            format!("Unexpected {:?} [{}]", pair.as_rule(), pair.as_str()),
            self.resolver.span_of(pair)
        )
    }
}
