//! Diagnostics for the bxast front end
//!
//! # Overview
//!
//! Two tiers of problems exist:
//!
//! - **Issues** are recoverable. They are plain data (`message`, `position`),
//!   accumulated in a per-parse [`Diagnostics`] sink and never thrown.
//! - **Errors** ([`BxError`]) abort an operation. `Internal` marks a
//!   grammar/builder mismatch and always propagates. `Syntax` is raised by a
//!   construction step and caught by the statement wrapper, which turns it into
//!   an error node plus one Issue.
//!
//! Both convert to `miette` diagnostics for terminal rendering.
//!
//! # Error Construction Macros
//!
//! - `err_msg!(Internal, "Unknown operator [{}]", text)` for message-only errors.
//! - `err_pos!(Syntax, "Unexpected token", position)` for errors tied to a node.

use std::fmt;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode, SourceSpan};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ast::Position;
use crate::syntax::comments::Comment;

pub type SourceArc = Arc<NamedSource<String>>;

// ============================================================================
// ISSUES
// ============================================================================

/// A recoverable diagnostic collected during a parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub message: String,
    pub position: Option<Position>,
}

impl Issue {
    pub fn new(message: impl Into<String>, position: Option<Position>) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }

    /// Builds a renderable report against the text the issue was found in.
    pub fn to_report(&self, name: &str, input: &str) -> IssueReport {
        let span = self
            .position
            .as_ref()
            .and_then(|pos| source_span(pos, input));
        IssueReport {
            message: self.message.clone(),
            src: Arc::new(NamedSource::new(name, input.to_string())),
            span,
        }
    }
}

/// Byte span of `position` in `input`; an empty range widens to one byte so
/// the label stays visible.
fn source_span(position: &Position, input: &str) -> Option<SourceSpan> {
    let range = position.byte_range(input)?;
    let end = if range.end > range.start {
        range.end
    } else {
        (range.start + 1).min(input.len())
    };
    Some(SourceSpan::from(range.start..end))
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.position {
            Some(pos) => write!(f, "{} ({})", self.message, pos),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Per-parse, append-only sink of issues and harvested comments.
#[derive(Debug, Default)]
pub struct Diagnostics {
    issues: Vec<Issue>,
    comments: Vec<Comment>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, message: impl Into<String>, position: Option<Position>) {
        self.issues.push(Issue::new(message, position));
    }

    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn add_comments(&mut self, comments: impl IntoIterator<Item = Comment>) {
        self.comments.extend(comments);
    }

    pub fn into_parts(self) -> (Vec<Issue>, Vec<Comment>) {
        (self.issues, self.comments)
    }
}

/// An [`Issue`] bound to its source text for `miette` rendering.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct IssueReport {
    message: String,
    src: SourceArc,
    span: Option<SourceSpan>,
}

impl Diagnostic for IssueReport {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("bxast::issue"))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(self.src.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span?;
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(self.message.clone()),
            span,
        ))))
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Type-safe classification of [`BxError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// Grammar/builder mismatch; a bug, never a user condition
    Internal,
    /// A construction step could not build a node
    Syntax,
    /// Reading input failed
    Io,
    /// Options could not be loaded
    Config,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Internal => "Internal",
            ErrorType::Syntax => "Syntax",
            ErrorType::Io => "Io",
            ErrorType::Config => "Config",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Minimal, composable error context.
#[derive(Debug, Default)]
pub struct ErrorContext {
    /// Source text the error points into, if known.
    pub source: Option<SourceArc>,
    /// Byte span within `source`.
    pub span: Option<SourceSpan>,
    /// AST position of the offending node.
    pub position: Option<Position>,
    pub help: Option<String>,
}

impl ErrorContext {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_position(position: Position) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }
}

#[derive(Debug, Error)]
pub enum BxError {
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Syntax error: {message}")]
    Syntax {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("I/O error: {message}")]
    Io {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
}

impl BxError {
    fn get_ctx(&self) -> &ErrorContext {
        match self {
            BxError::Internal { ctx, .. }
            | BxError::Syntax { ctx, .. }
            | BxError::Io { ctx, .. }
            | BxError::Config { ctx, .. } => ctx,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            BxError::Internal { message, .. }
            | BxError::Syntax { message, .. }
            | BxError::Io { message, .. }
            | BxError::Config { message, .. } => message,
        }
    }

    pub fn error_type(&self) -> ErrorType {
        match self {
            BxError::Internal { .. } => ErrorType::Internal,
            BxError::Syntax { .. } => ErrorType::Syntax,
            BxError::Io { .. } => ErrorType::Io,
            BxError::Config { .. } => ErrorType::Config,
        }
    }

    pub fn position(&self) -> Option<&Position> {
        self.get_ctx().position.as_ref()
    }

    /// Attaches the source text so `miette` can render a snippet.
    pub fn with_source(mut self, name: &str, input: &str) -> Self {
        let span = self
            .position()
            .and_then(|pos| source_span(pos, input));
        let ctx = match &mut self {
            BxError::Internal { ctx, .. }
            | BxError::Syntax { ctx, .. }
            | BxError::Io { ctx, .. }
            | BxError::Config { ctx, .. } => ctx,
        };
        ctx.source = Some(Arc::new(NamedSource::new(name, input.to_string())));
        if ctx.span.is_none() {
            ctx.span = span;
        }
        self
    }

    pub fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        BxError::Io {
            message: format!("cannot read {}", path.display()),
            ctx: ErrorContext::none(),
            source: Some(Box::new(err)),
        }
    }
}

impl Diagnostic for BxError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.error_type() {
            ErrorType::Internal => "bxast::internal",
            ErrorType::Syntax => "bxast::syntax",
            ErrorType::Io => "bxast::io",
            ErrorType::Config => "bxast::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.get_ctx()
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.get_ctx()
            .source
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let ctx = self.get_ctx();
        ctx.source.as_ref()?;
        let span = ctx.span?;
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(self.message().to_string()),
            span,
        ))))
    }
}

/// Constructs a `BxError` variant with a formatted message and no context.
#[macro_export]
macro_rules! err_msg {
    ($variant:ident, $msg:expr, $($arg:expr),+ $(,)?) => {
        $crate::diagnostics::BxError::$variant {
            message: format!($msg, $($arg),+),
            ctx: $crate::diagnostics::ErrorContext::none(),
            source: None,
        }
    };
    ($variant:ident, $msg:expr) => {
        $crate::diagnostics::BxError::$variant {
            message: format!("{}", $msg),
            ctx: $crate::diagnostics::ErrorContext::none(),
            source: None,
        }
    };
}

/// Constructs a `BxError` variant tied to an AST position.
#[macro_export]
macro_rules! err_pos {
    ($variant:ident, $msg:expr, $pos:expr) => {
        $crate::diagnostics::BxError::$variant {
            message: $msg.to_string(),
            ctx: $crate::diagnostics::ErrorContext::with_position($pos),
            source: None,
        }
    };
}

#[cfg(test)]
mod tests {
    use miette::Report;

    use super::*;
    use crate::ast::Point;

    #[test]
    fn issue_report_points_at_the_issue() {
        let pos = Position::new(Point::new(1, 4), Point::new(1, 8), None);
        let issue = Issue::new("Identifier name cannot start with a number [1abc]", Some(pos));
        let report = Report::new(issue.to_report("test.bxs", "x = 1abc;"));
        let output = format!("{report:?}");
        assert!(output.contains("cannot start with a number"));
        assert!(output.contains("test.bxs"));
    }

    #[test]
    fn sink_keeps_issues_and_comments_in_order() {
        let mut sink = Diagnostics::new();
        sink.issue("first", None);
        sink.push(Issue::new("second", None));
        let harvested = crate::syntax::comments::harvest(
            "// a\n/* b */",
            &crate::syntax::PositionResolver::default(),
        );
        sink.add_comments(harvested);
        let (issues, comments) = sink.into_parts();
        let messages: Vec<_> = issues.iter().map(|i| i.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
        let contents: Vec<_> = comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "b"]);
    }

    #[test]
    fn issue_report_has_no_cause() {
        let issue = Issue::new("bad", None);
        let report = issue.to_report("test.bxs", "x");
        assert!(std::error::Error::source(&report).is_none());
        assert!(report.source_code().is_some());
        assert!(report.labels().is_none());
    }

    #[test]
    fn empty_range_widens_to_one_byte() {
        let pos = Position::new(Point::new(1, 4), Point::new(1, 4), None);
        let report = Issue::new("here", Some(pos.clone())).to_report("t.bxs", "x = 1;");
        let label = report.labels().and_then(|mut l| l.next()).unwrap();
        assert_eq!((label.offset(), label.len()), (4, 1));

        let err = err_pos!(Syntax, "here", pos).with_source("t.bxs", "x = 1;");
        let label = err.labels().and_then(|mut l| l.next()).unwrap();
        assert_eq!((label.offset(), label.len()), (4, 1));
    }

    #[test]
    fn error_macros_classify_variants() {
        let err = err_msg!(Internal, "Unknown operator [{}]", "~~");
        assert_eq!(err.error_type(), ErrorType::Internal);
        assert_eq!(err.message(), "Unknown operator [~~]");

        let pos = Position::new(Point::new(2, 0), Point::new(2, 3), None);
        let err = err_pos!(Syntax, "bad", pos.clone());
        assert_eq!(err.position(), Some(&pos));
    }

    #[test]
    fn with_source_renders_label() {
        let pos = Position::new(Point::new(1, 0), Point::new(1, 3), None);
        let err = err_pos!(Syntax, "bad thing", pos).with_source("x.bxs", "foo bar");
        let output = format!("{:?}", Report::new(err));
        assert!(output.contains("bad thing"));
        assert!(output.contains("bxast::syntax"));
    }
}
