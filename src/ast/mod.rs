//! AST module for the BoxLang/CFML front end
//!
//! This module provides the canonical, dialect-independent Abstract Syntax Tree
//! types. Every node carries the position it was built from and the verbatim
//! source text of that position.

// ============================================================================
// IMPORTS
// ============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::path::PathBuf;
use std::sync::Arc;

pub mod expr;
pub mod stmt;
pub mod walk;

pub use expr::*;
pub use stmt::*;

// ============================================================================
// SOURCE POSITIONS
// ============================================================================

/// A point in the source: 1-based line, 0-based column (in characters).
///
/// # Examples
///
/// ```rust
/// use bxast::ast::Point;
/// let point = Point::new(1, 0);
/// assert_eq!(point.to_string(), "1:0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    pub line: usize,
    pub column: usize,
}

impl Point {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Where a parsed buffer came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SourceRef {
    File { path: PathBuf },
    Named { name: String },
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRef::File { path } => write!(f, "{}", path.display()),
            SourceRef::Named { name } => write!(f, "{}", name),
        }
    }
}

/// A source span: start point (inclusive), end point (exclusive) and the buffer
/// it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub start: Point,
    pub end: Point,
    pub source: Option<Arc<SourceRef>>,
}

impl Position {
    pub fn new(start: Point, end: Point, source: Option<Arc<SourceRef>>) -> Self {
        Self { start, end, source }
    }

    /// Maps this position back onto byte offsets of `input`.
    ///
    /// Only meaningful for positions computed without a line/column offset.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bxast::ast::{Point, Position};
    /// let pos = Position::new(Point::new(2, 1), Point::new(2, 3), None);
    /// assert_eq!(pos.byte_range("ab\ncde"), Some(4..6));
    /// ```
    pub fn byte_range(&self, input: &str) -> Option<Range<usize>> {
        let start = byte_offset(input, self.start)?;
        let end = byte_offset(input, self.end)?;
        (start <= end).then_some(start..end)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}:{}-{}", source, self.start, self.end),
            None => write!(f, "{}-{}", self.start, self.end),
        }
    }
}

fn byte_offset(input: &str, point: Point) -> Option<usize> {
    let mut line = 1;
    let mut column = 0;
    for (offset, ch) in input.char_indices() {
        if line == point.line && column == point.column {
            return Some(offset);
        }
        if ch == '\n' {
            line += 1;
            column = 0;
        } else {
            column += 1;
        }
    }
    (line == point.line && column == point.column).then_some(input.len())
}

// ============================================================================
// NODE WRAPPER
// ============================================================================

/// Wrapper carrying position and verbatim source text with any node value.
///
/// `span` is `None` only for synthesized nodes that have no source text of
/// their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithSpan<T> {
    #[serde(flatten)]
    pub value: T,
    pub span: Option<Position>,
    pub text: String,
}

impl<T> WithSpan<T> {
    pub fn new(value: T, span: Position, text: impl Into<String>) -> Self {
        Self {
            value,
            span: Some(span),
            text: text.into(),
        }
    }

    /// A node manufactured by the builder rather than read from the source.
    pub fn synthetic(value: T) -> Self {
        Self {
            value,
            span: None,
            text: String::new(),
        }
    }

    /// Rewraps a new value in this node's position and text.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> WithSpan<U> {
        WithSpan {
            value: f(self.value),
            span: self.span,
            text: self.text,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.span.is_none()
    }
}

/// Canonical expression node.
pub type ExprNode = WithSpan<Expr>;

/// Canonical statement node.
pub type StmtNode = WithSpan<Stmt>;

/// The root of one parse: a script/class statement or a standalone expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Root {
    Statement(StmtNode),
    Expression(ExprNode),
}

impl Root {
    pub fn as_statement(&self) -> Option<&StmtNode> {
        match self {
            Root::Statement(stmt) => Some(stmt),
            Root::Expression(_) => None,
        }
    }

    pub fn as_expression(&self) -> Option<&ExprNode> {
        match self {
            Root::Expression(expr) => Some(expr),
            Root::Statement(_) => None,
        }
    }

    /// A short name for the root node kind, e.g. `Script` or `MethodInvocation`.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Root::Statement(stmt) => stmt.value.kind_name(),
            Root::Expression(expr) => expr.value.kind_name(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_range_handles_end_of_input() {
        let pos = Position::new(Point::new(1, 2), Point::new(1, 5), None);
        assert_eq!(pos.byte_range("a = 1"), Some(2..5));
    }

    #[test]
    fn byte_range_rejects_points_past_the_input() {
        let pos = Position::new(Point::new(3, 0), Point::new(3, 1), None);
        assert_eq!(pos.byte_range("one line"), None);
    }

    #[test]
    fn synthetic_nodes_have_no_span() {
        let node = WithSpan::synthetic(Expr::Null);
        assert!(node.is_synthetic());
        assert!(node.text.is_empty());
    }
}
