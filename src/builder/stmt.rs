//! Control flow, simple statements and imports.

use crate::ast::*;
use crate::syntax::position::text_of;
use crate::syntax::{Pair, Rule};

use super::{AstBuilder, BuildResult};

impl<'a> AstBuilder<'a> {
    /// Builds one statement. `None` for an empty `;`.
    pub(super) fn statement(&mut self, pair: Pair<'_>) -> BuildResult<Option<StmtNode>> {
        let stmt = match pair.as_rule() {
            Rule::statement => {
                let mut inner = pair.clone().into_inner();
                let child = self.expect(&mut inner, "statement", &pair)?;
                return self.statement(child);
            }
            Rule::empty_statement => return Ok(None),
            Rule::import_statement => self.import(pair)?,
            Rule::if_statement => self.if_else(pair)?,
            Rule::while_statement => self.while_loop(pair)?,
            Rule::do_statement => self.do_loop(pair)?,
            Rule::for_statement => self.for_loop(pair)?,
            Rule::switch_statement => self.switch(pair)?,
            Rule::try_statement => self.try_catch(pair)?,
            Rule::throw_statement => {
                let expression = self.optional_expression(&pair)?;
                self.node(Stmt::Throw { expression }, &pair)
            }
            Rule::rethrow_statement => self.node(Stmt::Rethrow, &pair),
            Rule::return_statement => {
                let expression = self.optional_expression(&pair)?;
                self.node(Stmt::Return { expression }, &pair)
            }
            Rule::break_statement => {
                let label = label_of(&pair);
                self.node(Stmt::Break { label }, &pair)
            }
            Rule::continue_statement => {
                let label = label_of(&pair);
                self.node(Stmt::Continue { label }, &pair)
            }
            Rule::assert_statement => {
                let mut inner = pair.clone().into_inner().skip(1);
                let expression = match inner.next() {
                    Some(expression) => self.expression(expression)?,
                    None => return Err(self.unexpected(&pair)),
                };
                self.node(Stmt::Assert { expression }, &pair)
            }
            Rule::include_statement => self.include(pair)?,
            Rule::function_declaration => self.function_declaration(pair)?,
            Rule::property_declaration => self.property(pair)?,
            Rule::static_initializer => self.static_initializer(pair)?,
            Rule::template_island => self.template_island(pair)?,
            Rule::block => self.block(pair)?,
            Rule::component_statement => self.component_statement(pair)?,
            Rule::prefixed_component => self.prefixed_component(pair)?,
            Rule::expression_statement => self.expression_statement(pair)?,
            Rule::error_statement => self.error_statement(pair),
            _ => return Err(self.unexpected(&pair)),
        };
        Ok(Some(stmt))
    }

    pub(super) fn block(&mut self, pair: Pair<'_>) -> BuildResult<StmtNode> {
        let body = self.guarded_statements(pair.clone().into_inner())?;
        Ok(self.node(Stmt::Block { body }, &pair))
    }

    /// The statements of a `{ ... }` block, without the block node itself.
    pub(super) fn block_body(&mut self, pair: Pair<'_>) -> BuildResult<Vec<StmtNode>> {
        self.guarded_statements(pair.into_inner())
    }

    /// A nested statement that must exist, e.g. a loop body.
    fn required_statement(&mut self, pair: Pair<'_>) -> BuildResult<StmtNode> {
        match self.guarded_statement(pair.clone())? {
            Some(stmt) => Ok(stmt),
            // `while (x);` loops over an empty body
            None => Ok(self.node(Stmt::Block { body: Vec::new() }, &pair)),
        }
    }

    fn optional_expression(&mut self, pair: &Pair<'_>) -> BuildResult<Option<ExprNode>> {
        match pair
            .clone()
            .into_inner()
            .find(|child| child.as_rule() == Rule::expression)
        {
            Some(expression) => Ok(Some(self.expression(expression)?)),
            None => Ok(None),
        }
    }

    fn expression_statement(&mut self, pair: Pair<'_>) -> BuildResult<StmtNode> {
        let mut inner = pair.clone().into_inner();
        let expression = self.expect(&mut inner, "expression", &pair)?;
        let expression = self.expression(expression)?;
        if let Expr::Identifier { name } = &expression.value {
            if self.components.is_component(name) {
                return Ok(self.node(
                    Stmt::Component {
                        name: name.clone(),
                        attributes: Vec::new(),
                        body: None,
                    },
                    &pair,
                ));
            }
        }
        Ok(self.node(Stmt::ExpressionStatement { expression }, &pair))
    }

    // ========================================================================
    // IMPORTS
    // ========================================================================

    fn import(&mut self, pair: Pair<'_>) -> BuildResult<StmtNode> {
        let mut target = None;
        let mut alias = None;
        for child in pair.clone().into_inner() {
            match child.as_rule() {
                Rule::kw_import | Rule::kw_as => {}
                Rule::import_target => target = Some(self.import_target(child)?),
                Rule::identifier => {
                    let name = child.as_str().to_string();
                    alias = Some(self.node(Expr::Identifier { name }, &child));
                }
                _ => return Err(self.unexpected(&child)),
            }
        }
        let Some(target) = target else {
            return Err(self.unexpected(&pair));
        };
        Ok(self.node(Stmt::Import { target, alias }, &pair))
    }

    fn import_target(&mut self, pair: Pair<'_>) -> BuildResult<ExprNode> {
        let mut inner = pair.clone().into_inner();
        let target = self.expect(&mut inner, "import target", &pair)?;
        match target.as_rule() {
            Rule::qualified_import => Ok(self.node(
                Expr::Fqn {
                    value: target.as_str().to_string(),
                },
                &target,
            )),
            Rule::string_literal if self.dialect.strips_import_quotes() => {
                let value = target.as_str().trim_matches(['"', '\'']).to_string();
                Ok(self.node(Expr::Fqn { value }, &target))
            }
            Rule::string_literal => self.string_literal(target),
            _ => Err(self.unexpected(&target)),
        }
    }

    // ========================================================================
    // CONTROL FLOW
    // ========================================================================

    fn if_else(&mut self, pair: Pair<'_>) -> BuildResult<StmtNode> {
        let mut condition = None;
        let mut branches = Vec::new();
        for child in pair.clone().into_inner() {
            match child.as_rule() {
                Rule::kw_if | Rule::kw_else => {}
                Rule::expression => condition = Some(self.expression(child)?),
                _ => branches.push(self.required_statement(child)?),
            }
        }
        let mut branches = branches.into_iter();
        let (Some(condition), Some(then_body)) = (condition, branches.next()) else {
            return Err(self.unexpected(&pair));
        };
        Ok(self.node(
            Stmt::IfElse {
                condition,
                then_body: Box::new(then_body),
                else_body: branches.next().map(Box::new),
            },
            &pair,
        ))
    }

    fn while_loop(&mut self, pair: Pair<'_>) -> BuildResult<StmtNode> {
        let (label, condition, body) = self.loop_parts(&pair)?;
        Ok(self.node(
            Stmt::While {
                label,
                condition,
                body: Box::new(body),
            },
            &pair,
        ))
    }

    fn do_loop(&mut self, pair: Pair<'_>) -> BuildResult<StmtNode> {
        let (label, condition, body) = self.loop_parts(&pair)?;
        Ok(self.node(
            Stmt::Do {
                label,
                condition,
                body: Box::new(body),
            },
            &pair,
        ))
    }

    /// Label, condition and body of a `while` or `do` loop.
    fn loop_parts(&mut self, pair: &Pair<'_>) -> BuildResult<(Option<String>, ExprNode, StmtNode)> {
        let mut label = None;
        let mut condition = None;
        let mut body = None;
        for child in pair.clone().into_inner() {
            match child.as_rule() {
                Rule::kw_while | Rule::kw_do => {}
                Rule::label => label = label_of(&child),
                Rule::expression => condition = Some(self.expression(child)?),
                _ => body = Some(self.required_statement(child)?),
            }
        }
        match (condition, body) {
            (Some(condition), Some(body)) => Ok((label, condition, body)),
            _ => Err(self.unexpected(pair)),
        }
    }

    fn for_loop(&mut self, pair: Pair<'_>) -> BuildResult<StmtNode> {
        let mut label = None;
        let mut header = None;
        let mut body = None;
        for child in pair.clone().into_inner() {
            match child.as_rule() {
                Rule::kw_for => {}
                Rule::label => label = label_of(&child),
                Rule::for_in_header | Rule::for_index_header => header = Some(child),
                _ => body = Some(self.required_statement(child)?),
            }
        }
        let (Some(header), Some(body)) = (header, body) else {
            return Err(self.unexpected(&pair));
        };
        let body = Box::new(body);
        let value = if header.as_rule() == Rule::for_in_header {
            let mut has_var = false;
            let mut operands = Vec::new();
            for child in header.clone().into_inner() {
                match child.as_rule() {
                    Rule::kw_var => has_var = true,
                    Rule::kw_in => {}
                    _ => operands.push(self.expression(child)?),
                }
            }
            let mut operands = operands.into_iter();
            let (Some(variable), Some(collection)) = (operands.next(), operands.next()) else {
                return Err(self.unexpected(&header));
            };
            Stmt::ForIn {
                label,
                variable,
                collection,
                body,
                has_var,
            }
        } else {
            let mut initializer = None;
            let mut condition = None;
            let mut step = None;
            for child in header.clone().into_inner() {
                let rule = child.as_rule();
                let mut inner = child.clone().into_inner();
                let expression = self.expect(&mut inner, "expression", &child)?;
                let expression = Some(self.expression(expression)?);
                match rule {
                    Rule::for_init => initializer = expression,
                    Rule::for_condition => condition = expression,
                    _ => step = expression,
                }
            }
            Stmt::ForIndex {
                label,
                initializer,
                condition,
                step,
                body,
            }
        };
        Ok(self.node(value, &pair))
    }

    fn switch(&mut self, pair: Pair<'_>) -> BuildResult<StmtNode> {
        let mut condition = None;
        let mut cases = Vec::new();
        for child in pair.clone().into_inner() {
            match child.as_rule() {
                Rule::kw_switch => {}
                Rule::expression => condition = Some(self.expression(child)?),
                Rule::switch_case => cases.push(self.switch_case(child)?),
                _ => return Err(self.unexpected(&child)),
            }
        }
        let Some(condition) = condition else {
            return Err(self.unexpected(&pair));
        };
        Ok(self.node(Stmt::Switch { condition, cases }, &pair))
    }

    fn switch_case(&mut self, pair: Pair<'_>) -> BuildResult<WithSpan<SwitchCase>> {
        let mut condition = None;
        let mut body = Vec::new();
        for child in pair.clone().into_inner() {
            match child.as_rule() {
                Rule::kw_case | Rule::kw_default => {}
                Rule::expression => condition = Some(self.expression(child)?),
                Rule::case_body => body = self.guarded_statements(child.into_inner())?,
                _ => return Err(self.unexpected(&child)),
            }
        }
        Ok(self.node(SwitchCase { condition, body }, &pair))
    }

    fn try_catch(&mut self, pair: Pair<'_>) -> BuildResult<StmtNode> {
        let mut body = Vec::new();
        let mut catches = Vec::new();
        let mut finally = Vec::new();
        for child in pair.clone().into_inner() {
            match child.as_rule() {
                Rule::kw_try => {}
                Rule::block => body = self.block_body(child)?,
                Rule::catch_clause => catches.push(self.catch_clause(child)?),
                Rule::finally_clause => {
                    if let Some(block) = child.into_inner().find(|c| c.as_rule() == Rule::block) {
                        finally = self.block_body(block)?;
                    }
                }
                _ => return Err(self.unexpected(&child)),
            }
        }
        Ok(self.node(
            Stmt::Try {
                body,
                catches,
                finally,
            },
            &pair,
        ))
    }

    fn catch_clause(&mut self, pair: Pair<'_>) -> BuildResult<WithSpan<TryCatch>> {
        let mut types = Vec::new();
        let mut exception = None;
        let mut body = Vec::new();
        for child in pair.clone().into_inner() {
            match child.as_rule() {
                Rule::kw_catch => {}
                Rule::catch_types => {
                    for type_pair in child.into_inner() {
                        let node = self.expression(type_pair.clone())?;
                        types.push(self.exception_type(node, &type_pair));
                    }
                }
                Rule::catch_variable => {
                    let mut inner = child.clone().into_inner();
                    let name = self.expect(&mut inner, "exception variable", &child)?;
                    exception = Some(self.node(
                        Expr::Identifier {
                            name: name.as_str().to_string(),
                        },
                        &name,
                    ));
                }
                Rule::block => body = self.block_body(child)?,
                _ => return Err(self.unexpected(&child)),
            }
        }
        if types.is_empty() {
            types.push(WithSpan::synthetic(Expr::Fqn {
                value: "any".to_string(),
            }));
        }
        let Some(exception) = exception else {
            return Err(self.unexpected(&pair));
        };
        Ok(self.node(
            TryCatch {
                types,
                exception,
                body,
            },
            &pair,
        ))
    }

    /// Catch types are names: `Foo` and `a.b.Foo` become qualified names,
    /// quoted types stay strings.
    fn exception_type(&self, node: ExprNode, pair: &Pair<'_>) -> ExprNode {
        match node.value {
            Expr::Identifier { name } | Expr::Scope { name } => {
                self.node(Expr::Fqn { value: name }, pair)
            }
            Expr::DotAccess { .. } | Expr::StaticAccess { .. } => {
                let value = text_of(pair).to_string();
                self.node(Expr::Fqn { value }, pair)
            }
            _ => node,
        }
    }

    // ========================================================================
    // INCLUDE AND TEMPLATE ISLANDS
    // ========================================================================

    fn include(&mut self, pair: Pair<'_>) -> BuildResult<StmtNode> {
        let Some(target) = pair
            .clone()
            .into_inner()
            .find(|child| child.as_rule() == Rule::expression)
        else {
            return Err(self.unexpected(&pair));
        };
        let value = self.expression(target.clone())?;
        let key = WithSpan::synthetic(Expr::Fqn {
            value: "template".to_string(),
        });
        let attribute = self.node(
            Annotation {
                key,
                value: Some(value),
            },
            &target,
        );
        Ok(self.node(
            Stmt::Component {
                name: "include".to_string(),
                attributes: vec![attribute],
                body: None,
            },
            &pair,
        ))
    }

    fn template_island(&mut self, pair: Pair<'_>) -> BuildResult<StmtNode> {
        if !self.dialect.allows_template_islands() {
            self.issue(
                format!(
                    "Template islands are not supported in the {} dialect",
                    self.dialect.kind().name()
                ),
                Some(self.resolver.span_of(&pair)),
            );
        }
        let template = pair
            .clone()
            .into_inner()
            .next()
            .map(|body| body.as_str().to_string())
            .unwrap_or_default();
        Ok(self.node(Stmt::TemplateIsland { template }, &pair))
    }
}

/// The label of a loop, or the target of `break`/`continue`.
fn label_of(pair: &Pair<'_>) -> Option<String> {
    pair.clone()
        .into_inner()
        .find(|child| child.as_rule() == Rule::label_name)
        .map(|label| label.as_str().to_string())
}
