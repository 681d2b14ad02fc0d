//! Parser facade
//!
//! Runs the pest grammar, harvests comments and drives one fresh
//! [`AstBuilder`] per call. A call never fails because the input is broken:
//! unrecognisable input becomes an error node plus an Issue. Only internal
//! inconsistencies and I/O surface as `Err`.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use pest::error::InputLocation;
use pest::Parser as _;
use serde::{Deserialize, Serialize};

use crate::ast::{Expr, Root, SourceRef, Stmt, WithSpan};
use crate::builder::AstBuilder;
use crate::components::{ComponentRegistry, ComponentSet};
use crate::config::ParseOptions;
use crate::diagnostics::{BxError, Issue};
use crate::dialect::{infer_from_path, DialectKind, SourceKind};
use crate::syntax::comments::{self, Comment};
use crate::syntax::{BoxGrammar, PositionResolver, Rule};

// ============================================================================
// RESULT
// ============================================================================

/// Everything one parse produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsingResult {
    pub root: Option<Root>,
    pub issues: Vec<Issue>,
    pub comments: Vec<Comment>,
}

impl ParsingResult {
    /// True when a tree was built and nothing was reported.
    pub fn is_correct(&self) -> bool {
        self.root.is_some() && self.issues.is_empty()
    }
}

// ============================================================================
// PARSER
// ============================================================================

/// What to parse `input` as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Script,
    Class,
    Expression,
}

impl Entry {
    fn rule(self) -> Rule {
        match self {
            Entry::Script => Rule::script,
            Entry::Class => Rule::class_file,
            Entry::Expression => Rule::standalone_expression,
        }
    }
}

impl From<SourceKind> for Entry {
    fn from(kind: SourceKind) -> Self {
        match kind {
            SourceKind::Script => Entry::Script,
            SourceKind::Class => Entry::Class,
        }
    }
}

/// A configured front end. Cheap to clone; holds no per-parse state.
///
/// # Examples
///
/// ```rust
/// use bxast::{DialectKind, Parser};
/// let result = Parser::new(DialectKind::BoxScript).parse_expression("a.b()").unwrap();
/// assert!(result.is_correct());
/// assert_eq!(result.root.unwrap().kind_name(), "MethodInvocation");
/// ```
#[derive(Clone)]
pub struct Parser {
    dialect: DialectKind,
    options: ParseOptions,
    components: Arc<dyn ComponentRegistry>,
    extra_components: ComponentSet,
}

impl Parser {
    /// A parser for `dialect` with the built-in component registry.
    pub fn new(dialect: DialectKind) -> Self {
        Self {
            dialect,
            options: ParseOptions::default(),
            components: Arc::new(ComponentSet::builtin()),
            extra_components: ComponentSet::empty(),
        }
    }

    /// Applies options. A dialect named in the options replaces this
    /// parser's; extra component names are layered over the registry.
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        if let Some(dialect) = options.dialect {
            self.dialect = dialect;
        }
        self.extra_components = ComponentSet::empty();
        self.extra_components
            .extend(options.components.iter().map(String::as_str));
        self.options = options;
        self
    }

    pub fn with_components(mut self, components: Arc<dyn ComponentRegistry>) -> Self {
        self.components = components;
        self
    }

    pub fn dialect(&self) -> DialectKind {
        self.dialect
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn parse_script(&self, input: &str) -> Result<ParsingResult, BxError> {
        self.run(input, Entry::Script, self.named_source())
    }

    pub fn parse_class(&self, input: &str) -> Result<ParsingResult, BxError> {
        self.run(input, Entry::Class, self.named_source())
    }

    pub fn parse_expression(&self, input: &str) -> Result<ParsingResult, BxError> {
        self.run(input, Entry::Expression, self.named_source())
    }

    pub fn parse(&self, input: &str, kind: SourceKind) -> Result<ParsingResult, BxError> {
        self.run(input, kind.into(), self.named_source())
    }

    /// Reads and parses a file. Unless the options name a dialect, dialect
    /// and source kind follow the file extension.
    pub fn parse_file(&self, path: &Path) -> Result<ParsingResult, BxError> {
        let input = fs::read_to_string(path).map_err(|err| BxError::io(path, err))?;
        self.parse_file_contents(path, &input)
    }

    /// Parses `input` as if read from `path`.
    pub fn parse_file_contents(&self, path: &Path, input: &str) -> Result<ParsingResult, BxError> {
        let (dialect, kind) = self.file_settings(path);
        let source = self.named_source().or_else(|| {
            Some(Arc::new(SourceRef::File {
                path: path.to_path_buf(),
            }))
        });
        let parser = Self {
            dialect,
            ..self.clone()
        };
        parser.run(input, kind.into(), source)
    }

    /// The dialect and source kind `parse_file` would use for `path`.
    pub fn file_settings(&self, path: &Path) -> (DialectKind, SourceKind) {
        let inferred = infer_from_path(path);
        let dialect = self
            .options
            .dialect
            .or(inferred.map(|(dialect, _)| dialect))
            .unwrap_or(self.dialect);
        let kind = inferred.map_or(SourceKind::Script, |(_, kind)| kind);
        (dialect, kind)
    }

    fn named_source(&self) -> Option<Arc<SourceRef>> {
        self.options
            .source_name
            .as_ref()
            .map(|name| Arc::new(SourceRef::Named { name: name.clone() }))
    }

    fn run(
        &self,
        input: &str,
        entry: Entry,
        source: Option<Arc<SourceRef>>,
    ) -> Result<ParsingResult, BxError> {
        let resolver = PositionResolver::new(
            self.options.line_offset,
            self.options.column_offset,
            source,
        );
        let comments = comments::harvest(input, &resolver);
        let registry = LayeredRegistry {
            base: self.components.as_ref(),
            extra: &self.extra_components,
        };
        let mut builder = AstBuilder::new(
            self.dialect.adapter(),
            &registry,
            resolver.clone(),
            &comments,
        );

        let built = match BoxGrammar::parse(entry.rule(), input) {
            Ok(mut pairs) => match pairs.next() {
                Some(pair) => match entry {
                    Entry::Script => builder.build_script(pair),
                    Entry::Class => builder.build_class_file(pair),
                    Entry::Expression => builder.build_standalone(pair),
                },
                None => Err(crate::err_msg!(Internal, "Grammar produced no root")),
            },
            Err(err) => {
                let offset = match err.location {
                    InputLocation::Pos(offset) => offset,
                    InputLocation::Span((start, _)) => start,
                };
                let at = resolver.span_of_offsets(input, offset, offset);
                let message = match &at {
                    Some(at) => format!("Syntax error at {}: {}", at.start, err.variant.message()),
                    None => format!("Syntax error: {}", err.variant.message()),
                };
                Err(BxError::Syntax {
                    message,
                    ctx: crate::diagnostics::ErrorContext {
                        position: at,
                        ..Default::default()
                    },
                    source: Some(Box::new(err)),
                })
            }
        };

        let (root, recovered) = match built {
            Ok(root) => (root, None),
            Err(BxError::Syntax { message, ctx, .. }) => {
                (error_root(input, entry, &resolver), Some(Issue::new(message, ctx.position)))
            }
            Err(other) => return Err(other),
        };

        let mut diagnostics = builder.into_diagnostics();
        if let Some(issue) = recovered {
            diagnostics.push(issue);
        }
        diagnostics.add_comments(comments);
        let (issues, comments) = diagnostics.into_parts();
        Ok(ParsingResult {
            root: Some(root),
            issues,
            comments,
        })
    }
}

/// The whole input as one error node.
fn error_root(input: &str, entry: Entry, resolver: &PositionResolver) -> Root {
    let position = resolver.span_of_offsets(input, 0, input.len());
    let text = input.to_string();
    match (entry, position) {
        (Entry::Expression, Some(position)) => {
            Root::Expression(WithSpan::new(Expr::ExpressionError, position, text))
        }
        (Entry::Expression, None) => Root::Expression(WithSpan::synthetic(Expr::ExpressionError)),
        (_, Some(position)) => Root::Statement(WithSpan::new(Stmt::StatementError, position, text)),
        (_, None) => Root::Statement(WithSpan::synthetic(Stmt::StatementError)),
    }
}

/// The injected registry plus names added through options.
struct LayeredRegistry<'a> {
    base: &'a dyn ComponentRegistry,
    extra: &'a ComponentSet,
}

impl ComponentRegistry for LayeredRegistry<'_> {
    fn is_component(&self, name: &str) -> bool {
        self.extra.is_component(name) || self.base.is_component(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparseable_class_becomes_one_error_node() {
        let result = Parser::new(DialectKind::BoxScript)
            .parse_class("class { } trailing")
            .unwrap();
        assert!(matches!(
            result.root,
            Some(Root::Statement(WithSpan {
                value: Stmt::StatementError,
                ..
            }))
        ));
        assert_eq!(result.issues.len(), 1);
        assert!(result.issues[0].message.starts_with("Syntax error at 1:"));
    }

    #[test]
    fn options_layer_extra_components() {
        let options = ParseOptions::from_yaml_str("components: [frobnicate]").unwrap();
        let parser = Parser::new(DialectKind::BoxScript).with_options(options);
        let result = parser.parse_script("frobnicate;").unwrap();
        let root = result.root.unwrap();
        let script = root.as_statement().unwrap();
        let body = script.value.body().unwrap();
        assert!(matches!(body[0].value, Stmt::Component { .. }));
    }

    #[test]
    fn file_settings_follow_the_extension_unless_overridden() {
        let parser = Parser::new(DialectKind::BoxScript);
        assert_eq!(
            parser.file_settings(Path::new("Widget.cfc")),
            (DialectKind::Cf, SourceKind::Class)
        );
        let parser = parser.with_options(ParseOptions {
            dialect: Some(DialectKind::BoxScript),
            ..Default::default()
        });
        assert_eq!(
            parser.file_settings(Path::new("Widget.cfc")),
            (DialectKind::BoxScript, SourceKind::Class)
        );
    }
}
