//! Expression precedence ladder, literals and function-valued primaries.

use crate::ast::*;
use crate::dialect::IdentifierClass;
use crate::err_pos;
use crate::operators;
use crate::syntax::position::text_of;
use crate::syntax::{Pair, Rule};

use super::{AstBuilder, BuildResult};

impl<'a> AstBuilder<'a> {
    pub(super) fn expression(&mut self, pair: Pair<'_>) -> BuildResult<ExprNode> {
        match pair.as_rule() {
            Rule::expression => self.assignment(pair),
            Rule::var_declaration => self.var_declaration(pair),
            Rule::ternary => self.ternary(pair),
            Rule::elvis => self.elvis(pair),
            Rule::comparison => self.comparison(pair),
            Rule::concatenation => self.concatenation(pair),
            Rule::equivalence
            | Rule::disjunction
            | Rule::exclusive
            | Rule::conjunction
            | Rule::bit_or
            | Rule::bit_xor
            | Rule::bit_and
            | Rule::shift
            | Rule::additive
            | Rule::multiplicative
            | Rule::power => self.binary_level(pair),
            Rule::unary => self.unary(pair),
            Rule::postfix => self.postfix(pair),
            Rule::access_expression => self.access_chain(pair),
            Rule::error_expression => Ok(self.error_expression(pair)),
            Rule::missing_expression => Ok(self.missing_expression(pair)),
            _ => self.primary(pair),
        }
    }

    // ========================================================================
    // PRECEDENCE LADDER
    // ========================================================================

    fn assignment(&mut self, pair: Pair<'_>) -> BuildResult<ExprNode> {
        let mut inner = pair.clone().into_inner();
        let first = self.expect(&mut inner, "expression", &pair)?;
        let Some(op) = inner.next() else {
            return self.expression(first);
        };
        let value_pair = self.expect(&mut inner, "assigned value", &pair)?;
        let left = self.expression(first)?;
        let operator = operators::assignment(op.as_str())?;
        let right = self.expression(value_pair)?;
        Ok(self.node(
            Expr::Assignment {
                left: Box::new(left),
                operator: Some(operator),
                right: Some(Box::new(right)),
                modifiers: Vec::new(),
            },
            &pair,
        ))
    }

    /// `var x = 1`, `final var x`, `var x`: attach the modifiers to the
    /// assignment, synthesizing a valueless one when nothing was assigned.
    fn var_declaration(&mut self, pair: Pair<'_>) -> BuildResult<ExprNode> {
        let mut modifiers = Vec::new();
        let mut target = None;
        for child in pair.clone().into_inner() {
            match child.as_rule() {
                Rule::assignment_modifier => {
                    modifiers.push(match child.as_str().to_ascii_lowercase().as_str() {
                        "var" => AssignmentModifier::Var,
                        "final" => AssignmentModifier::Final,
                        _ => AssignmentModifier::Static,
                    })
                }
                _ => target = Some(child),
            }
        }
        let target = match target {
            Some(target) => self.expression(target)?,
            None => return Err(self.unexpected(&pair)),
        };
        let position = self.resolver.span_of(&pair);
        match target.value {
            Expr::Assignment { .. } => Ok(WithSpan::new(
                attach_modifiers(target.value, modifiers),
                position,
                text_of(&pair),
            )),
            Expr::Identifier { .. }
            | Expr::Scope { .. }
            | Expr::DotAccess { .. }
            | Expr::ArrayAccess { .. } => Ok(WithSpan::new(
                Expr::Assignment {
                    left: Box::new(target),
                    operator: None,
                    right: None,
                    modifiers,
                },
                position,
                text_of(&pair),
            )),
            ref other => Err(err_pos!(
                Syntax,
                format!("{} cannot be declared as a variable", other.kind_name()),
                position
            )),
        }
    }

    fn ternary(&mut self, pair: Pair<'_>) -> BuildResult<ExprNode> {
        let mut inner = pair.clone().into_inner();
        let first = self.expect(&mut inner, "condition", &pair)?;
        let Some(when_true) = inner.next() else {
            return self.expression(first);
        };
        let when_false = self.expect(&mut inner, "else branch", &pair)?;
        let condition = self.expression(first)?;
        let when_true = self.expression(when_true)?;
        let when_false = self.expression(when_false)?;
        Ok(self.node(
            Expr::TernaryOperation {
                condition: Box::new(condition),
                when_true: Box::new(when_true),
                when_false: Box::new(when_false),
            },
            &pair,
        ))
    }

    fn elvis(&mut self, pair: Pair<'_>) -> BuildResult<ExprNode> {
        let mut inner = pair.clone().into_inner();
        let first = self.expect(&mut inner, "operand", &pair)?;
        let Some(op) = inner.next() else {
            return self.expression(first);
        };
        let fallback = self.expect(&mut inner, "fallback", &pair)?;
        let left = self.expression(first)?;
        let operator = operators::binary(op.as_str())?;
        let right = self.expression(fallback)?;
        Ok(self.node(
            Expr::BinaryOperation {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            },
            &pair,
        ))
    }

    /// Left-associative `operand (op operand)*` levels.
    fn binary_level(&mut self, pair: Pair<'_>) -> BuildResult<ExprNode> {
        let mut inner = pair.clone().into_inner();
        let first = self.expect(&mut inner, "operand", &pair)?;
        let mut left = self.expression(first.clone())?;
        while let Some(op) = inner.next() {
            let operand = self.expect(&mut inner, "operand", &pair)?;
            let operator = operators::binary(op.as_str())?;
            let right = self.expression(operand.clone())?;
            left = self.node_between(
                Expr::BinaryOperation {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                },
                &first,
                &operand,
            );
        }
        Ok(left)
    }

    fn comparison(&mut self, pair: Pair<'_>) -> BuildResult<ExprNode> {
        let mut inner = pair.clone().into_inner();
        let first = self.expect(&mut inner, "operand", &pair)?;
        let mut left = self.expression(first.clone())?;
        while let Some(op) = inner.next() {
            let operand = self.expect(&mut inner, "operand", &pair)?;
            let right = self.expression(operand.clone())?;
            let value = match op.as_rule() {
                Rule::comparison_op => {
                    if op.as_str() == "!==" && !self.dialect.allows_strict_inequality() {
                        self.issue(
                            format!(
                                "Operator [!==] is not supported in the {} dialect",
                                self.dialect.kind().name()
                            ),
                            Some(self.resolver.span_of(&op)),
                        );
                    }
                    Expr::ComparisonOperation {
                        left: Box::new(left),
                        operator: operators::comparison(op.as_str())?,
                        right: Box::new(right),
                    }
                }
                _ => Expr::BinaryOperation {
                    left: Box::new(left),
                    operator: operators::binary(op.as_str())?,
                    right: Box::new(right),
                },
            };
            left = self.node_between(value, &first, &operand);
        }
        Ok(left)
    }

    /// `a & b & c` builds one flat concatenation rather than a nested pair.
    fn concatenation(&mut self, pair: Pair<'_>) -> BuildResult<ExprNode> {
        let mut inner = pair.clone().into_inner();
        let first = self.expect(&mut inner, "operand", &pair)?;
        let mut left = self.expression(first.clone())?;
        while inner.next().is_some() {
            let operand = self.expect(&mut inner, "operand", &pair)?;
            let right = self.expression(operand.clone())?;
            let parts = match left.value {
                Expr::StringConcat { mut parts } => {
                    parts.push(right);
                    parts
                }
                value => vec![
                    WithSpan {
                        value,
                        span: left.span,
                        text: left.text,
                    },
                    right,
                ],
            };
            left = self.node_between(Expr::StringConcat { parts }, &first, &operand);
        }
        Ok(left)
    }

    fn unary(&mut self, pair: Pair<'_>) -> BuildResult<ExprNode> {
        let mut children: Vec<_> = pair.clone().into_inner().collect();
        let operand_pair = match children.pop() {
            Some(last) => last,
            None => return Err(self.unexpected(&pair)),
        };
        let mut operand = self.expression(operand_pair.clone())?;
        for op in children.iter().rev() {
            let operator = operators::prefix(op.as_str())?;
            if operator == UnaryOperator::Minus
                && matches!(operand.value, Expr::BooleanLiteral { .. } | Expr::Null)
            {
                self.issue(
                    format!(
                        "Minus operator cannot be applied to literal [{}]",
                        operand.text
                    ),
                    operand.span.clone(),
                );
            }
            operand = self.node_between(
                Expr::UnaryOperation {
                    operator,
                    expression: Box::new(operand),
                },
                op,
                &operand_pair,
            );
        }
        Ok(operand)
    }

    fn postfix(&mut self, pair: Pair<'_>) -> BuildResult<ExprNode> {
        let mut inner = pair.clone().into_inner();
        let first = self.expect(&mut inner, "operand", &pair)?;
        let Some(op) = inner.next() else {
            return self.expression(first);
        };
        let operand = self.expression(first)?;
        Ok(self.node(
            Expr::UnaryOperation {
                operator: operators::postfix(op.as_str())?,
                expression: Box::new(operand),
            },
            &pair,
        ))
    }

    // ========================================================================
    // PRIMARIES
    // ========================================================================

    pub(super) fn primary(&mut self, pair: Pair<'_>) -> BuildResult<ExprNode> {
        match pair.as_rule() {
            Rule::identifier => Ok(self.identifier(&pair)),
            Rule::illegal_identifier => {
                let node = self.node(
                    Expr::Identifier {
                        name: pair.as_str().to_string(),
                    },
                    &pair,
                );
                self.issue(
                    format!("Identifier name cannot start with a number [{}]", node.text),
                    node.span.clone(),
                );
                Ok(node)
            }
            Rule::null_literal => Ok(self.node(Expr::Null, &pair)),
            Rule::true_literal => Ok(self.node(Expr::BooleanLiteral { value: true }, &pair)),
            Rule::false_literal => Ok(self.node(Expr::BooleanLiteral { value: false }, &pair)),
            Rule::integer_literal => Ok(self.node(
                Expr::IntegerLiteral {
                    value: pair.as_str().to_string(),
                },
                &pair,
            )),
            Rule::decimal_literal => Ok(self.node(
                Expr::DecimalLiteral {
                    value: pair.as_str().to_string(),
                },
                &pair,
            )),
            Rule::string_literal => self.string_literal(pair),
            Rule::parenthesis => {
                let mut inner = pair.clone().into_inner();
                let expression = self.expect(&mut inner, "expression", &pair)?;
                let expression = self.expression(expression)?;
                Ok(self.node(
                    Expr::Parenthesis {
                        expression: Box::new(expression),
                    },
                    &pair,
                ))
            }
            Rule::array_literal => {
                let values = pair
                    .clone()
                    .into_inner()
                    .map(|child| self.expression(child))
                    .collect::<BuildResult<Vec<_>>>()?;
                Ok(self.node(Expr::ArrayLiteral { values }, &pair))
            }
            Rule::struct_literal => self.struct_literal(pair, StructType::Unordered),
            Rule::ordered_struct => self.struct_literal(pair, StructType::Ordered),
            Rule::new_expression => self.new_expression(pair),
            Rule::closure_function => self.closure_function(pair),
            Rule::parenthesized_lambda => self.parenthesized_lambda(pair),
            Rule::simple_lambda => self.simple_lambda(pair),
            Rule::functional_bif => {
                let name = pair.as_str().trim_start_matches("::").trim().to_string();
                Ok(self.node(Expr::FunctionalBifAccess { name }, &pair))
            }
            Rule::functional_member => {
                let mut inner = pair.clone().into_inner();
                let name_pair = self.expect(&mut inner, "member name", &pair)?;
                let name = name_pair.as_str().trim_start_matches('.').to_string();
                let arguments = match inner.next() {
                    Some(invocation) => Some(self.arguments(invocation)?),
                    None => None,
                };
                Ok(self.node(Expr::FunctionalMemberAccess { name, arguments }, &pair))
            }
            Rule::error_expression => Ok(self.error_expression(pair)),
            _ => Err(self.unexpected(&pair)),
        }
    }

    /// A bare name, classified as a scope or a plain identifier.
    pub(super) fn identifier(&self, pair: &Pair<'_>) -> ExprNode {
        let name = pair.as_str().to_string();
        let value = match self.dialect.classify(&name) {
            IdentifierClass::Scope => Expr::Scope { name },
            IdentifierClass::Plain => Expr::Identifier { name },
        };
        self.node(value, pair)
    }

    fn struct_literal(&mut self, pair: Pair<'_>, struct_type: StructType) -> BuildResult<ExprNode> {
        let mut members = Vec::new();
        for member in pair.clone().into_inner() {
            let mut inner = member.clone().into_inner();
            let key_pair = self.expect(&mut inner, "struct key", &member)?;
            let value_pair = self.expect(&mut inner, "struct value", &member)?;
            let key = self.struct_key(key_pair)?;
            let value = self.expression(value_pair)?;
            members.push(StructMember { key, value });
        }
        Ok(self.node(
            Expr::StructLiteral {
                struct_type,
                members,
            },
            &pair,
        ))
    }

    /// Keys are names first: `{ true: 1 }` keys on the identifier `true`.
    fn struct_key(&mut self, pair: Pair<'_>) -> BuildResult<ExprNode> {
        let text = pair.as_str().to_string();
        match pair.as_rule() {
            Rule::string_literal => self.string_literal(pair),
            Rule::qualified_key => Ok(self.node(Expr::Fqn { value: text }, &pair)),
            _ if text.chars().all(|c| c.is_ascii_digit()) => {
                Ok(self.node(Expr::IntegerLiteral { value: text }, &pair))
            }
            _ => Ok(self.node(Expr::Identifier { name: text }, &pair)),
        }
    }

    fn new_expression(&mut self, pair: Pair<'_>) -> BuildResult<ExprNode> {
        let mut prefix = None;
        let mut target: Option<(ExprNode, Pair<'_>)> = None;
        let mut arguments = Vec::new();
        for child in pair.clone().into_inner() {
            match child.as_rule() {
                Rule::kw_new => {}
                Rule::new_prefix => {
                    let name = child.as_str().trim_end_matches(':').to_string();
                    prefix = Some(Box::new(self.node(Expr::Identifier { name }, &child)));
                }
                Rule::new_class_name => {
                    let value = child.as_str().to_string();
                    target = Some((self.node(Expr::Fqn { value }, &child), child));
                }
                Rule::string_literal => {
                    target = Some((self.string_literal(child.clone())?, child));
                }
                Rule::module_suffix => {
                    let Some((base, base_pair)) = target.take() else {
                        return Err(self.unexpected(&child));
                    };
                    let name = match &base.value {
                        Expr::Fqn { value } | Expr::StringLiteral { value } => value.clone(),
                        _ => base.text.clone(),
                    };
                    let module = child.as_str().trim_start_matches('@');
                    let value = format!("{}@{}", name, module);
                    let node = self.node_between(Expr::StringLiteral { value }, &base_pair, &child);
                    target = Some((node, base_pair));
                }
                Rule::invocation => arguments = self.arguments(child)?,
                _ => return Err(self.unexpected(&child)),
            }
        }
        let Some((target, _)) = target else {
            return Err(self.unexpected(&pair));
        };
        Ok(self.node(
            Expr::New {
                prefix,
                target: Box::new(target),
                arguments,
            },
            &pair,
        ))
    }

    // ========================================================================
    // ARGUMENTS
    // ========================================================================

    /// Builds the arguments of an `invocation` pair, reporting mixed styles.
    pub(super) fn arguments(&mut self, invocation: Pair<'_>) -> BuildResult<Vec<ExprNode>> {
        let Some(list) = invocation.clone().into_inner().next() else {
            return Ok(Vec::new());
        };
        let mut arguments = Vec::new();
        for argument in list.into_inner() {
            arguments.push(self.argument(argument)?);
        }
        let named = arguments.iter().filter(|a| a.value.is_named_argument()).count();
        let positional = arguments
            .iter()
            .filter(|a| matches!(a.value, Expr::Argument { name: None, .. }))
            .count();
        if named > 0 && positional > 0 {
            self.issue(
                "cannot mix named and positional arguments",
                Some(self.resolver.span_of(&invocation)),
            );
        }
        Ok(arguments)
    }

    fn argument(&mut self, pair: Pair<'_>) -> BuildResult<ExprNode> {
        match pair.as_rule() {
            Rule::named_argument => {
                let mut inner = pair.clone().into_inner();
                let name_pair = self.expect(&mut inner, "argument name", &pair)?;
                let value_pair = self.expect(&mut inner, "argument value", &pair)?;
                let name = match name_pair.as_rule() {
                    Rule::string_literal => self.string_literal(name_pair)?,
                    _ => self.node(
                        Expr::Identifier {
                            name: name_pair.as_str().to_string(),
                        },
                        &name_pair,
                    ),
                };
                let value = self.expression(value_pair)?;
                Ok(self.node(
                    Expr::Argument {
                        name: Some(Box::new(name)),
                        value: Box::new(value),
                    },
                    &pair,
                ))
            }
            Rule::positional_argument => {
                let mut inner = pair.clone().into_inner();
                let value_pair = self.expect(&mut inner, "argument value", &pair)?;
                let value = self.expression(value_pair)?;
                Ok(self.node(
                    Expr::Argument {
                        name: None,
                        value: Box::new(value),
                    },
                    &pair,
                ))
            }
            Rule::error_expression | Rule::missing_expression => {
                let value = self.expression(pair.clone())?;
                Ok(self.node(
                    Expr::Argument {
                        name: None,
                        value: Box::new(value),
                    },
                    &pair,
                ))
            }
            _ => Err(self.unexpected(&pair)),
        }
    }

    // ========================================================================
    // CLOSURES AND LAMBDAS
    // ========================================================================

    fn closure_function(&mut self, pair: Pair<'_>) -> BuildResult<ExprNode> {
        let mut parameters = Vec::new();
        let mut annotations = Vec::new();
        let mut body = None;
        for child in pair.clone().into_inner() {
            match child.as_rule() {
                Rule::kw_function => {}
                Rule::function_params => parameters = self.function_params(child)?,
                Rule::post_annotation => annotations.push(self.post_annotation(child)?),
                Rule::block => body = Some(self.block(child)?),
                _ => return Err(self.unexpected(&child)),
            }
        }
        let Some(body) = body else {
            return Err(self.unexpected(&pair));
        };
        Ok(self.node(
            Expr::Closure {
                parameters,
                annotations,
                body: Box::new(body),
            },
            &pair,
        ))
    }

    fn parenthesized_lambda(&mut self, pair: Pair<'_>) -> BuildResult<ExprNode> {
        let mut parameters = Vec::new();
        let mut annotations = Vec::new();
        let mut arrow = "=>";
        let mut body = None;
        for child in pair.clone().into_inner() {
            match child.as_rule() {
                Rule::lambda_parameters => {
                    if let Some(params) = child.into_inner().next() {
                        parameters = self.function_params(params)?;
                    }
                }
                Rule::post_annotation => annotations.push(self.post_annotation(child)?),
                Rule::lambda_arrow => arrow = child.as_str(),
                _ => body = Some(self.lambda_body(child)?),
            }
        }
        let Some(body) = body else {
            return Err(self.unexpected(&pair));
        };
        Ok(self.node(function_value(arrow, parameters, annotations, body), &pair))
    }

    /// `x => x * 2`: the lone parameter is optional and typed `Any`.
    fn simple_lambda(&mut self, pair: Pair<'_>) -> BuildResult<ExprNode> {
        let mut inner = pair.clone().into_inner();
        let name = self.expect(&mut inner, "parameter", &pair)?;
        let arrow = self.expect(&mut inner, "arrow", &pair)?;
        let body = self.expect(&mut inner, "lambda body", &pair)?;
        let parameter = self.node(
            ArgumentDeclaration {
                required: false,
                type_name: "Any".to_string(),
                name: name.as_str().to_string(),
                default_value: None,
                annotations: Vec::new(),
            },
            &name,
        );
        let body = self.lambda_body(body)?;
        Ok(self.node(
            function_value(arrow.as_str(), vec![parameter], Vec::new(), body),
            &pair,
        ))
    }

    fn lambda_body(&mut self, pair: Pair<'_>) -> BuildResult<StmtNode> {
        if pair.as_rule() == Rule::block {
            return self.block(pair);
        }
        let expression = self.expression(pair.clone())?;
        Ok(self.node(Stmt::ExpressionStatement { expression }, &pair))
    }
}

fn attach_modifiers(value: Expr, mut modifiers: Vec<AssignmentModifier>) -> Expr {
    match value {
        Expr::Assignment {
            left,
            operator,
            right,
            modifiers: existing,
        } => {
            modifiers.extend(existing);
            Expr::Assignment {
                left,
                operator,
                right,
                modifiers,
            }
        }
        other => other,
    }
}

/// `=>` builds a closure, `->` a lambda.
fn function_value(
    arrow: &str,
    parameters: Vec<WithSpan<ArgumentDeclaration>>,
    annotations: Vec<WithSpan<Annotation>>,
    body: StmtNode,
) -> Expr {
    let body = Box::new(body);
    if arrow == "->" {
        Expr::Lambda {
            parameters,
            annotations,
            body,
        }
    } else {
        Expr::Closure {
            parameters,
            annotations,
            body,
        }
    }
}
