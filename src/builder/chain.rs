//! Postfix access chains.
//!
//! The grammar yields `primary segment*` flat; the fold walks the segments
//! left to right, looking one segment ahead so a member followed by a call
//! becomes a single method invocation.

use crate::ast::{Expr, ExprNode, WithSpan};
use crate::syntax::position::text_between;
use crate::syntax::{Pair, Rule};

use super::{AstBuilder, BuildResult};

#[derive(Clone, Copy)]
enum AccessKind {
    Dot,
    Static,
    Array,
}

impl AccessKind {
    fn label(self) -> &'static str {
        match self {
            AccessKind::Dot => "dot access",
            AccessKind::Static => "static access",
            AccessKind::Array => "array access",
        }
    }

    fn accepts(self, left: &Expr) -> bool {
        match self {
            AccessKind::Dot | AccessKind::Static => matches!(
                left,
                Expr::FunctionInvocation { .. }
                    | Expr::ArrayAccess { .. }
                    | Expr::Identifier { .. }
                    | Expr::DotAccess { .. }
                    | Expr::StringLiteral { .. }
                    | Expr::BooleanLiteral { .. }
                    | Expr::ArrayLiteral { .. }
                    | Expr::Scope { .. }
                    | Expr::MethodInvocation { .. }
                    | Expr::StructLiteral { .. }
                    | Expr::New { .. }
                    | Expr::DecimalLiteral { .. }
                    | Expr::Parenthesis { .. }
                    | Expr::StaticMethodInvocation { .. }
                    | Expr::StaticAccess { .. }
                    | Expr::Fqn { .. }
                    | Expr::ExpressionInvocation { .. }
                    | Expr::StringInterpolation { .. }
                    | Expr::ExpressionError
            ),
            AccessKind::Array => matches!(
                left,
                Expr::Identifier { .. }
                    | Expr::ArrayAccess { .. }
                    | Expr::DotAccess { .. }
                    | Expr::StringLiteral { .. }
                    | Expr::ArrayLiteral { .. }
                    | Expr::FunctionInvocation { .. }
                    | Expr::New { .. }
                    | Expr::DecimalLiteral { .. }
                    | Expr::BooleanLiteral { .. }
                    | Expr::Null
                    | Expr::StructLiteral { .. }
                    | Expr::Scope { .. }
                    | Expr::IntegerLiteral { .. }
                    | Expr::MethodInvocation { .. }
                    | Expr::Parenthesis { .. }
                    | Expr::ExpressionInvocation { .. }
                    | Expr::StaticAccess { .. }
                    | Expr::StaticMethodInvocation { .. }
                    | Expr::StringInterpolation { .. }
                    | Expr::ExpressionError
            ),
        }
    }
}

impl<'a> AstBuilder<'a> {
    pub(super) fn access_chain(&mut self, pair: Pair<'_>) -> BuildResult<ExprNode> {
        let mut inner = pair.clone().into_inner();
        let first = self.expect(&mut inner, "primary", &pair)?;
        let segments: Vec<Pair<'_>> = inner.collect();
        let mut current = self.primary(first.clone())?;

        let mut i = 0;
        while i < segments.len() {
            let segment = &segments[i];
            let call = segments
                .get(i + 1)
                .filter(|next| next.as_rule() == Rule::invocation);
            current = match segment.as_rule() {
                Rule::invocation => self.invoke(current, &first, segment)?,
                Rule::dot_access => {
                    let (safe, member) = self.dot_parts(segment)?;
                    let receiver = Box::new(normalize_left(current));
                    self.check_left(&receiver, AccessKind::Dot);
                    match call {
                        Some(call) => {
                            i += 1;
                            let arguments = self.arguments(call.clone())?;
                            self.node_between(
                                Expr::MethodInvocation {
                                    name: Box::new(member),
                                    receiver,
                                    arguments,
                                    safe,
                                    uses_dot_access: true,
                                },
                                segment,
                                call,
                            )
                        }
                        None => self.node(
                            Expr::DotAccess {
                                context: receiver,
                                safe,
                                access: Box::new(member),
                            },
                            segment,
                        ),
                    }
                }
                Rule::dot_index => {
                    let mut parts = segment.clone().into_inner();
                    let op = self.expect(&mut parts, "dot", segment)?;
                    let index = self.expect(&mut parts, "index", segment)?;
                    self.check_left(&current, AccessKind::Array);
                    let access = self.expression(index)?;
                    self.node_between(
                        Expr::ArrayAccess {
                            context: Box::new(current),
                            safe: op.as_str() == "?.",
                            access: Box::new(access),
                        },
                        &first,
                        segment,
                    )
                }
                Rule::static_member => {
                    let mut parts = segment.clone().into_inner();
                    let member_pair = self.expect(&mut parts, "member", segment)?;
                    let member = self.member(&member_pair);
                    // `java.lang.System::out` names a class, not a property chain.
                    if matches!(current.value, Expr::DotAccess { .. }) && i > 0 {
                        let value = text_between(&first, &segments[i - 1]);
                        current = self.node_between(
                            Expr::Fqn {
                                value: value.to_string(),
                            },
                            &first,
                            &segments[i - 1],
                        );
                    }
                    let receiver = Box::new(normalize_left(current));
                    self.check_left(&receiver, AccessKind::Static);
                    match call {
                        Some(call) => {
                            i += 1;
                            let arguments = self.arguments(call.clone())?;
                            self.node_between(
                                Expr::StaticMethodInvocation {
                                    name: Box::new(member),
                                    receiver,
                                    arguments,
                                },
                                segment,
                                call,
                            )
                        }
                        None => self.node(
                            Expr::StaticAccess {
                                context: receiver,
                                access: Box::new(member),
                            },
                            segment,
                        ),
                    }
                }
                Rule::index_access => {
                    let mut parts = segment.clone().into_inner();
                    let index = self.expect(&mut parts, "index", segment)?;
                    self.check_left(&current, AccessKind::Array);
                    let access = self.expression(index)?;
                    self.node_between(
                        Expr::ArrayAccess {
                            context: Box::new(current),
                            safe: false,
                            access: Box::new(access),
                        },
                        &first,
                        segment,
                    )
                }
                _ => return Err(self.unexpected(segment)),
            };
            i += 1;
        }
        Ok(current)
    }

    /// A call segment applied to whatever the chain has built so far.
    fn invoke(
        &mut self,
        current: ExprNode,
        first: &Pair<'_>,
        segment: &Pair<'_>,
    ) -> BuildResult<ExprNode> {
        let arguments = self.arguments(segment.clone())?;
        let value = match current.value {
            Expr::Identifier { .. }
            | Expr::Scope { .. }
            | Expr::BooleanLiteral { .. }
            | Expr::Null => Expr::FunctionInvocation {
                name: current.text,
                arguments,
            },
            // `obj["method"]()` calls the member the index names.
            Expr::ArrayAccess {
                context, access, ..
            } => Expr::MethodInvocation {
                name: access,
                receiver: context,
                arguments,
                safe: false,
                uses_dot_access: false,
            },
            value => Expr::ExpressionInvocation {
                callee: Box::new(WithSpan {
                    value,
                    span: current.span,
                    text: current.text,
                }),
                arguments,
            },
        };
        Ok(self.node_between(value, first, segment))
    }

    fn dot_parts(&self, segment: &Pair<'_>) -> BuildResult<(bool, ExprNode)> {
        let mut parts = segment.clone().into_inner();
        let op = self.expect(&mut parts, "dot", segment)?;
        let member = self.expect(&mut parts, "member", segment)?;
        Ok((op.as_str() == "?.", self.member(&member)))
    }

    /// Member names are never scopes; all-digit members index numerically.
    fn member(&self, pair: &Pair<'_>) -> ExprNode {
        let text = pair.as_str().to_string();
        if text.chars().all(|c| c.is_ascii_digit()) {
            self.node(Expr::IntegerLiteral { value: text }, pair)
        } else {
            self.node(Expr::Identifier { name: text }, pair)
        }
    }

    /// Records an issue for a left side that cannot be accessed; the node
    /// is still built.
    fn check_left(&mut self, left: &ExprNode, kind: AccessKind) {
        if kind.accepts(&left.value) {
            return;
        }
        self.issue(
            format!(
                "{} is not a valid construct for {}",
                left.value.kind_name(),
                kind.label()
            ),
            left.span.clone(),
        );
    }
}

/// `true.foo` and `null.foo` read the keyword as a plain name.
fn normalize_left(node: ExprNode) -> ExprNode {
    match node.value {
        Expr::BooleanLiteral { .. } | Expr::Null => WithSpan {
            value: Expr::Identifier {
                name: node.text.clone(),
            },
            span: node.span,
            text: node.text,
        },
        _ => node,
    }
}

