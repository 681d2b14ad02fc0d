//! Tag-style components written in script syntax.

use pest::Parser;

use crate::ast::*;
use crate::syntax::position::text_of;
use crate::syntax::{BoxGrammar, Pair, PositionResolver, Rule};

use super::decl::rename_to_value;
use super::{AstBuilder, BuildResult};

impl<'a> AstBuilder<'a> {
    /// `lock name="x" timeout=5 { ... }` and `param name="x";`.
    pub(super) fn component_statement(&mut self, pair: Pair<'_>) -> BuildResult<StmtNode> {
        let mut name = String::new();
        let mut attributes = Vec::new();
        let mut body = None;
        for child in pair.clone().into_inner() {
            match child.as_rule() {
                Rule::component_head => {
                    name = child.as_str().to_string();
                    if !self.components.is_component(&name) {
                        self.issue(
                            format!("Unknown component [{}]", name),
                            Some(self.resolver.span_of(&child)),
                        );
                    }
                }
                Rule::component_attribute => attributes.push(self.component_attribute(child)?),
                Rule::block => body = Some(self.block_body(child)?),
                _ => return Err(self.unexpected(&child)),
            }
        }
        let attributes = self.component_attributes(&name, attributes)?;
        Ok(self.node(
            Stmt::Component {
                name,
                attributes,
                body,
            },
            &pair,
        ))
    }

    /// `cfhttp(url="x") { ... }`. The prefix is dropped when the name is a
    /// known component; otherwise a body-less form is an ordinary call.
    pub(super) fn prefixed_component(&mut self, pair: Pair<'_>) -> BuildResult<StmtNode> {
        let mut inner = pair.clone().into_inner();
        let name_pair = self.expect(&mut inner, "component name", &pair)?;
        let full_name = name_pair.as_str().to_string();
        let name = full_name.get(2..).unwrap_or_default().to_string();

        let mut attribute_pairs = Vec::new();
        let mut body = None;
        for child in inner {
            match child.as_rule() {
                Rule::component_attribute => attribute_pairs.push(child),
                Rule::block => body = Some(child),
                _ => return Err(self.unexpected(&child)),
            }
        }

        let known = self.dialect.allows_prefixed_components() && self.components.is_component(&name);
        if known || body.is_some() {
            if !known {
                self.issue(
                    format!("Unknown component [{}]", name),
                    Some(self.resolver.span_of(&name_pair)),
                );
            }
            let mut attributes = Vec::new();
            for attribute in attribute_pairs {
                attributes.push(self.component_attribute(attribute)?);
            }
            let attributes = self.component_attributes(&name, attributes)?;
            let body = match body {
                Some(block) => Some(self.block_body(block)?),
                None => None,
            };
            return Ok(self.node(
                Stmt::Component {
                    name,
                    attributes,
                    body,
                },
                &pair,
            ));
        }

        let mut arguments = Vec::new();
        for attribute in attribute_pairs {
            arguments.push(self.attribute_argument(attribute)?);
        }
        let statement_text = text_of(&pair);
        let call_text = statement_text.trim_end_matches(';').trim_end();
        let start = pair.as_span().start();
        let call_position = self
            .resolver
            .span_of_offsets(pair.get_input(), start, start + call_text.len())
            .unwrap_or_else(|| self.resolver.span_of(&pair));
        let expression = WithSpan::new(
            Expr::FunctionInvocation {
                name: full_name,
                arguments,
            },
            call_position,
            call_text,
        );
        Ok(self.node(Stmt::ExpressionStatement { expression }, &pair))
    }

    fn component_attribute(&mut self, pair: Pair<'_>) -> BuildResult<WithSpan<Annotation>> {
        let mut inner = pair.clone().into_inner();
        let key_pair = self.expect(&mut inner, "attribute name", &pair)?;
        let key = self.node(
            Expr::Fqn {
                value: key_pair.as_str().to_string(),
            },
            &key_pair,
        );
        let value = match inner.next() {
            Some(value) => Some(self.expression(value)?),
            None => None,
        };
        Ok(self.node(Annotation { key, value }, &pair))
    }

    /// A `cfname(...)` attribute read back as a call argument.
    fn attribute_argument(&mut self, pair: Pair<'_>) -> BuildResult<ExprNode> {
        let mut inner = pair.clone().into_inner();
        let key_pair = self.expect(&mut inner, "attribute name", &pair)?;
        let key = self.node(
            Expr::Identifier {
                name: key_pair.as_str().to_string(),
            },
            &key_pair,
        );
        let argument = match inner.next() {
            Some(value) => Expr::Argument {
                name: Some(Box::new(key)),
                value: Box::new(self.expression(value)?),
            },
            None => Expr::Argument {
                name: None,
                value: Box::new(key),
            },
        };
        Ok(self.node(argument, &pair))
    }

    /// Per-component attribute rewrites: `param` shorthand and `loop`
    /// conditions.
    fn component_attributes(
        &mut self,
        name: &str,
        attributes: Vec<WithSpan<Annotation>>,
    ) -> BuildResult<Vec<WithSpan<Annotation>>> {
        if name.eq_ignore_ascii_case("param") {
            return Ok(param_shorthand(attributes));
        }
        if name.eq_ignore_ascii_case("loop") {
            return attributes
                .into_iter()
                .map(|attribute| self.loop_condition(attribute))
                .collect();
        }
        Ok(attributes)
    }

    /// A string `condition` on `loop` is an expression evaluated each pass;
    /// it is parsed in place and wrapped in a closure returning it.
    fn loop_condition(
        &mut self,
        attribute: WithSpan<Annotation>,
    ) -> BuildResult<WithSpan<Annotation>> {
        if !attribute.value.name().eq_ignore_ascii_case("condition") {
            return Ok(attribute);
        }
        let Some(WithSpan {
            value: Expr::StringLiteral { value: source },
            span: Some(literal_span),
            ..
        }) = &attribute.value.value
        else {
            return Ok(attribute);
        };
        let source = source.clone();
        let literal_span = literal_span.clone();

        let resolver = PositionResolver::new(
            literal_span.start.line.saturating_sub(1),
            literal_span.start.column + 1,
            self.resolver.source().cloned(),
        );
        let mut pairs = match BoxGrammar::parse(Rule::standalone_expression, &source) {
            Ok(pairs) => pairs,
            Err(err) => {
                self.issue(
                    format!("Invalid loop condition [{}]: {}", source, err.variant.message()),
                    Some(literal_span),
                );
                return Ok(attribute);
            }
        };
        let Some(standalone) = pairs.next() else {
            return Ok(attribute);
        };
        let saved = std::mem::replace(&mut self.resolver, resolver);
        let condition = self.build_standalone(standalone);
        self.resolver = saved;
        let condition = match condition? {
            Root::Expression(expression) => expression,
            Root::Statement(_) => return Ok(attribute),
        };

        let closure = WithSpan {
            value: Expr::Closure {
                parameters: Vec::new(),
                annotations: Vec::new(),
                body: Box::new(WithSpan::synthetic(Stmt::Block {
                    body: vec![WithSpan::synthetic(Stmt::Return {
                        expression: Some(condition),
                    })],
                })),
            },
            span: Some(literal_span),
            text: attribute
                .value
                .value
                .as_ref()
                .map(|value| value.text.clone())
                .unwrap_or_default(),
        };
        Ok(attribute.map(|Annotation { key, .. }| Annotation {
            key,
            value: Some(closure),
        }))
    }
}

/// `param foo="x"`, `param foo` and `param String foo="x"`, unless a `name`
/// attribute is already present.
fn param_shorthand(attributes: Vec<WithSpan<Annotation>>) -> Vec<WithSpan<Annotation>> {
    if attributes
        .iter()
        .any(|a| a.value.name().eq_ignore_ascii_case("name"))
    {
        return attributes;
    }
    match attributes.len() {
        1 => {
            let mut attributes = attributes.into_iter();
            let Some(attribute) = attributes.next() else {
                return Vec::new();
            };
            if attribute.value.value.is_none() {
                return vec![rename_to_value(attribute, "name")];
            }
            split_default(attribute)
        }
        2 if attributes[0].value.value.is_none() => {
            let mut attributes = attributes.into_iter();
            let (Some(first), Some(second)) = (attributes.next(), attributes.next()) else {
                return Vec::new();
            };
            let mut rewritten = vec![rename_to_value(first, "type")];
            if second.value.value.is_none() {
                rewritten.push(rename_to_value(second, "name"));
            } else {
                rewritten.extend(split_default(second));
            }
            rewritten
        }
        _ => attributes,
    }
}

/// `foo="x"` becomes `name="foo"` plus `default="x"`.
fn split_default(attribute: WithSpan<Annotation>) -> Vec<WithSpan<Annotation>> {
    let WithSpan { value, span, text } = attribute;
    let Annotation { key, value: default } = value;
    let name = WithSpan {
        value: Annotation { key, value: None },
        span: span.clone(),
        text: text.clone(),
    };
    let default = WithSpan {
        value: Annotation {
            key: WithSpan::synthetic(Expr::Fqn {
                value: "default".to_string(),
            }),
            value: default,
        },
        span,
        text,
    };
    vec![rename_to_value(name, "name"), default]
}
