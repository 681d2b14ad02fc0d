//! Classes, interfaces, functions, properties and annotations.

use crate::ast::*;
use crate::syntax::{Pair, Rule};

use super::{AstBuilder, BuildResult};

impl<'a> AstBuilder<'a> {
    // ========================================================================
    // CLASSES AND INTERFACES
    // ========================================================================

    /// Builds a class. `after` is where the preceding imports end; only a doc
    /// comment between there and the class documents it.
    pub(super) fn class_declaration(
        &mut self,
        pair: Pair<'_>,
        after: Option<Point>,
    ) -> BuildResult<StmtNode> {
        let mut annotations = Vec::new();
        let mut body = Vec::new();
        let mut properties = Vec::new();
        for child in pair.clone().into_inner() {
            match child.as_rule() {
                Rule::pre_annotation => annotations.push(self.pre_annotation(child)?),
                Rule::post_annotation => annotations.push(self.post_annotation(child)?),
                Rule::class_modifier => {
                    let key = self.node(
                        Expr::Fqn {
                            value: child.as_str().to_ascii_lowercase(),
                        },
                        &child,
                    );
                    annotations.push(self.node(Annotation { key, value: None }, &child));
                }
                Rule::kw_class => self.check_class_keyword(&child),
                Rule::property_declaration => properties.extend(self.guarded_statement(child)?),
                _ => body.extend(self.guarded_statement(child)?),
            }
        }
        let documentation = self.documentation(&pair, after);
        Ok(self.node(
            Stmt::Class {
                imports: Vec::new(),
                body,
                annotations,
                documentation,
                properties,
            },
            &pair,
        ))
    }

    pub(super) fn interface_declaration(
        &mut self,
        pair: Pair<'_>,
        after: Option<Point>,
    ) -> BuildResult<StmtNode> {
        let mut annotations = Vec::new();
        let mut body = Vec::new();
        for child in pair.clone().into_inner() {
            match child.as_rule() {
                Rule::pre_annotation => annotations.push(self.pre_annotation(child)?),
                Rule::post_annotation => annotations.push(self.post_annotation(child)?),
                Rule::kw_interface => {}
                _ => body.extend(self.guarded_statement(child)?),
            }
        }
        let documentation = self.documentation(&pair, after);
        Ok(self.node(
            Stmt::Interface {
                imports: Vec::new(),
                body,
                annotations,
                documentation,
            },
            &pair,
        ))
    }

    fn check_class_keyword(&mut self, keyword: &Pair<'_>) {
        let expected = self.dialect.class_keyword();
        if !keyword.as_str().eq_ignore_ascii_case(expected) {
            self.issue(
                format!(
                    "Keyword [{}] is not supported in the {} dialect",
                    keyword.as_str(),
                    self.dialect.kind().name()
                ),
                Some(self.resolver.span_of(keyword)),
            );
        }
    }

    /// Annotations read from the doc comment directly above a declaration: the
    /// free text becomes `hint`, each `@tag text` line its own entry.
    fn documentation(&self, pair: &Pair<'_>, after: Option<Point>) -> Vec<WithSpan<Annotation>> {
        let start = self.resolver.span_of(pair).start;
        let Some(comment) = self
            .comments
            .iter()
            .filter(|c| c.is_documentation())
            .filter(|c| c.position.end <= start)
            .filter(|c| after.map_or(true, |after| c.position.start >= after))
            .last()
        else {
            return Vec::new();
        };

        let mut entries: Vec<(String, String)> = Vec::new();
        let mut hint = Vec::new();
        for line in comment.content.lines().map(str::trim) {
            if let Some(tagged) = line.strip_prefix('@') {
                let (tag, text) = tagged.split_once(char::is_whitespace).unwrap_or((tagged, ""));
                entries.push((tag.to_string(), text.trim().to_string()));
            } else if let Some((_, text)) = entries.last_mut() {
                if !line.is_empty() {
                    text.push(' ');
                    text.push_str(line);
                }
            } else if !line.is_empty() {
                hint.push(line);
            }
        }
        if !hint.is_empty() {
            entries.insert(0, ("hint".to_string(), hint.join(" ")));
        }
        entries
            .into_iter()
            .map(|(tag, text)| {
                WithSpan::synthetic(Annotation {
                    key: WithSpan::synthetic(Expr::Fqn { value: tag }),
                    value: Some(WithSpan::synthetic(Expr::StringLiteral {
                        value: text.trim().to_string(),
                    })),
                })
            })
            .collect()
    }

    pub(super) fn static_initializer(&mut self, pair: Pair<'_>) -> BuildResult<StmtNode> {
        let mut inner = pair.clone().into_inner();
        let _keyword = self.expect(&mut inner, "static", &pair)?;
        let block = self.expect(&mut inner, "block", &pair)?;
        let body = self.block_body(block)?;
        Ok(self.node(Stmt::StaticInitializer { body }, &pair))
    }

    // ========================================================================
    // PROPERTIES
    // ========================================================================

    /// `property String name;` is shorthand for `property type="String"
    /// name="name";`.
    pub(super) fn property(&mut self, pair: Pair<'_>) -> BuildResult<StmtNode> {
        let mut annotations = Vec::new();
        let mut attributes = Vec::new();
        for child in pair.clone().into_inner() {
            match child.as_rule() {
                Rule::pre_annotation => annotations.push(self.pre_annotation(child)?),
                Rule::post_annotation => attributes.push(self.post_annotation(child)?),
                Rule::kw_property => {}
                _ => return Err(self.unexpected(&child)),
            }
        }
        let named = attributes
            .iter()
            .any(|a| a.value.name().eq_ignore_ascii_case("name") && a.value.value.is_some());
        if !named {
            attributes = property_shorthand(attributes);
        }
        annotations.extend(attributes);
        Ok(self.node(Stmt::Property { annotations }, &pair))
    }

    // ========================================================================
    // FUNCTIONS
    // ========================================================================

    pub(super) fn function_declaration(&mut self, pair: Pair<'_>) -> BuildResult<StmtNode> {
        let mut access = None;
        let mut modifiers = Vec::new();
        let mut return_type = None;
        let mut name = String::new();
        let mut parameters = Vec::new();
        let mut annotations = Vec::new();
        let mut body = None;
        for child in pair.clone().into_inner() {
            match child.as_rule() {
                Rule::pre_annotation => annotations.push(self.pre_annotation(child)?),
                Rule::post_annotation => annotations.push(self.post_annotation(child)?),
                Rule::function_modifier => match child.as_str().to_ascii_lowercase().as_str() {
                    "public" => access = Some(AccessModifier::Public),
                    "private" => access = Some(AccessModifier::Private),
                    "remote" => access = Some(AccessModifier::Remote),
                    "package" => access = Some(AccessModifier::Package),
                    "static" => modifiers.push(MethodModifier::Static),
                    "final" => modifiers.push(MethodModifier::Final),
                    "abstract" => modifiers.push(MethodModifier::Abstract),
                    _ => modifiers.push(MethodModifier::Default),
                },
                Rule::return_type => {
                    let name = child.as_str().to_string();
                    return_type = Some(self.node(ReturnType { name }, &child));
                }
                Rule::kw_function => {}
                Rule::function_name => name = child.as_str().to_string(),
                Rule::function_params => parameters = self.function_params(child)?,
                Rule::block => body = Some(self.block_body(child)?),
                _ => return Err(self.unexpected(&child)),
            }
        }
        let annotations = hoist_parameter_annotations(annotations, &mut parameters);
        Ok(self.node(
            Stmt::FunctionDeclaration {
                access,
                modifiers,
                name,
                return_type,
                parameters,
                annotations,
                body,
            },
            &pair,
        ))
    }

    pub(super) fn function_params(
        &mut self,
        pair: Pair<'_>,
    ) -> BuildResult<Vec<WithSpan<ArgumentDeclaration>>> {
        pair.into_inner()
            .map(|param| self.function_param(param))
            .collect()
    }

    fn function_param(&mut self, pair: Pair<'_>) -> BuildResult<WithSpan<ArgumentDeclaration>> {
        let mut declaration = ArgumentDeclaration {
            required: false,
            type_name: "Any".to_string(),
            name: String::new(),
            default_value: None,
            annotations: Vec::new(),
        };
        for child in pair.clone().into_inner() {
            match child.as_rule() {
                Rule::kw_required => declaration.required = true,
                Rule::param_type => declaration.type_name = child.as_str().to_string(),
                Rule::param_name => declaration.name = child.as_str().to_string(),
                Rule::param_default => {
                    let mut inner = child.clone().into_inner();
                    let value = self.expect(&mut inner, "default value", &child)?;
                    declaration.default_value = Some(self.expression(value)?);
                }
                Rule::post_annotation => {
                    declaration.annotations.push(self.post_annotation(child)?)
                }
                _ => return Err(self.unexpected(&child)),
            }
        }
        Ok(self.node(declaration, &pair))
    }

    // ========================================================================
    // ANNOTATIONS
    // ========================================================================

    /// `@key`, `@key value`, `@key v1 v2` (values collected into an array).
    pub(super) fn pre_annotation(&mut self, pair: Pair<'_>) -> BuildResult<WithSpan<Annotation>> {
        let mut inner = pair.clone().into_inner();
        let key_pair = self.expect(&mut inner, "annotation name", &pair)?;
        let key = self.node(
            Expr::Fqn {
                value: key_pair.as_str().to_string(),
            },
            &key_pair,
        );
        let values: Vec<Pair<'_>> = inner.collect();
        let value = match values.as_slice() {
            [] => None,
            [single] => Some(self.expression(single.clone())?),
            [first, .., last] => {
                let items = values
                    .iter()
                    .map(|value| self.expression(value.clone()))
                    .collect::<BuildResult<Vec<_>>>()?;
                Some(self.node_between(Expr::ArrayLiteral { values: items }, first, last))
            }
        };
        Ok(self.node(Annotation { key, value }, &pair))
    }

    /// `key` or `key=value` after a declaration keyword.
    pub(super) fn post_annotation(&mut self, pair: Pair<'_>) -> BuildResult<WithSpan<Annotation>> {
        let mut inner = pair.clone().into_inner();
        let key_pair = self.expect(&mut inner, "annotation name", &pair)?;
        let key = self.node(
            Expr::Fqn {
                value: key_pair.as_str().to_string(),
            },
            &key_pair,
        );
        let value = match inner.next() {
            Some(attribute) => Some(self.attribute_value(attribute)?),
            None => None,
        };
        Ok(self.node(Annotation { key, value }, &pair))
    }

    fn attribute_value(&mut self, pair: Pair<'_>) -> BuildResult<ExprNode> {
        let mut inner = pair.clone().into_inner();
        let value = self.expect(&mut inner, "attribute value", &pair)?;
        match value.as_rule() {
            Rule::bare_value => Ok(self.node(
                Expr::StringLiteral {
                    value: value.as_str().to_string(),
                },
                &value,
            )),
            _ => self.expression(value),
        }
    }
}

/// Moves `arg.subkey` function annotations onto the parameter named `arg`.
fn hoist_parameter_annotations(
    annotations: Vec<WithSpan<Annotation>>,
    parameters: &mut [WithSpan<ArgumentDeclaration>],
) -> Vec<WithSpan<Annotation>> {
    let mut kept = Vec::new();
    'annotations: for mut annotation in annotations {
        for parameter in parameters.iter_mut() {
            let Some(subkey) = parameter_subkey(annotation.value.name(), &parameter.value.name)
                .map(str::to_string)
            else {
                continue;
            };
            let key = &annotation.value.key;
            annotation.value.key = WithSpan {
                value: Expr::Fqn { value: subkey },
                span: key.span.clone(),
                text: key.text.clone(),
            };
            parameter.value.annotations.push(annotation);
            continue 'annotations;
        }
        kept.push(annotation);
    }
    kept
}

/// `subkey` when `key` is `param.subkey` (case-insensitive on `param`).
fn parameter_subkey<'k>(key: &'k str, param: &str) -> Option<&'k str> {
    let (head, subkey) = key.split_once('.')?;
    (head.eq_ignore_ascii_case(param) && !subkey.is_empty()).then_some(subkey)
}

/// Rewrites leading valueless attributes: `name` alone, or `type name`.
fn property_shorthand(annotations: Vec<WithSpan<Annotation>>) -> Vec<WithSpan<Annotation>> {
    let bare = annotations
        .iter()
        .take_while(|a| a.value.value.is_none())
        .count()
        .min(2);
    if bare == 0 {
        return annotations;
    }
    let keys: &[&str] = if bare == 1 { &["name"] } else { &["type", "name"] };
    annotations
        .into_iter()
        .enumerate()
        .map(|(index, annotation)| match keys.get(index) {
            Some(key) => rename_to_value(annotation, key),
            None => annotation,
        })
        .collect()
}

/// `foo` (valueless) becomes `key="foo"`, keeping the original position.
pub(super) fn rename_to_value(annotation: WithSpan<Annotation>, key: &str) -> WithSpan<Annotation> {
    annotation.map(|Annotation { key: old, .. }| {
        let value = match &old.value {
            Expr::Fqn { value } => value.clone(),
            _ => old.text.clone(),
        };
        Annotation {
            key: WithSpan::synthetic(Expr::Fqn {
                value: key.to_string(),
            }),
            value: Some(old.map(|_| Expr::StringLiteral { value })),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_subkeys_match_case_insensitively() {
        assert_eq!(parameter_subkey("Arg.hint", "arg"), Some("hint"));
        assert_eq!(parameter_subkey("argument.hint", "arg"), None);
        assert_eq!(parameter_subkey("arg", "arg"), None);
    }
}
