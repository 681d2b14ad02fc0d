//! Query-of-query validation.
//!
//! Only the statement structure is checked: a query must hold exactly one
//! top-level `SELECT`. Clauses are not interpreted.

use pest::error::InputLocation;
use pest::Parser;
use serde::{Deserialize, Serialize};

use crate::ast::Position;
use crate::diagnostics::Issue;
use crate::syntax::comments::{Comment, CommentKind};
use crate::syntax::sql::{Rule, SqlGrammar};
use crate::syntax::PositionResolver;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "keyword")]
pub enum SqlStatementKind {
    Select,
    /// Any other statement, by its leading keyword (upper-cased).
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlStatement {
    pub kind: SqlStatementKind,
    pub text: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlParsingResult {
    /// The query's statement when it has exactly one.
    pub statement: Option<SqlStatement>,
    pub issues: Vec<Issue>,
    pub comments: Vec<Comment>,
}

impl SqlParsingResult {
    pub fn is_correct(&self) -> bool {
        self.statement.is_some() && self.issues.is_empty()
    }
}

/// Validates `input` as a query of query.
///
/// # Examples
///
/// ```rust
/// use bxast::sql::{validate_query, SqlStatementKind};
/// use bxast::syntax::PositionResolver;
/// let result = validate_query("SELECT * FROM users", &PositionResolver::default());
/// assert!(result.is_correct());
/// assert_eq!(result.statement.unwrap().kind, SqlStatementKind::Select);
/// ```
pub fn validate_query(input: &str, resolver: &PositionResolver) -> SqlParsingResult {
    let mut issues = Vec::new();
    let comments = harvest_comments(input, resolver);

    let parsed_len = match SqlGrammar::parse(Rule::sql_script, input) {
        Ok(_) => input.len(),
        Err(err) => {
            let offset = match err.location {
                InputLocation::Pos(offset) => offset,
                InputLocation::Span((start, _)) => start,
            };
            let at = resolver.span_of_offsets(input, offset, input.len());
            match unclosed_parenthesis(input) {
                Some(paren) => {
                    let position = resolver.span_of_offsets(input, paren, paren + 1);
                    let line = position.as_ref().map_or_else(
                        || input[..paren].matches('\n').count() + 1,
                        |position| position.start.line,
                    );
                    issues.push(Issue::new(
                        format!("Unclosed parenthesis [(] on line {}", line),
                        position,
                    ))
                }
                None => issues.push(Issue::new(
                    format!(
                        "Extra char(s) [{}] at the end of parsing.",
                        input.get(offset..).unwrap_or_default().trim()
                    ),
                    at,
                )),
            }
            offset
        }
    };

    let statements = statements(input.get(..parsed_len).unwrap_or_default(), resolver);
    let statement = match statements.len() {
        0 => {
            if issues.is_empty() {
                issues.push(Issue::new(
                    "No SQL statements found in query of query.",
                    resolver.span_of_offsets(input, 0, input.len()),
                ));
            }
            None
        }
        1 => statements.into_iter().next(),
        _ => {
            issues.push(Issue::new(
                "Only one SQL statement is allowed per query of query.",
                statements.get(1).map(|s| s.position.clone()),
            ));
            None
        }
    };
    if let Some(statement) = &statement {
        if statement.kind != SqlStatementKind::Select {
            issues.push(Issue::new(
                "Only SELECT statements are allowed in query of query.",
                Some(statement.position.clone()),
            ));
        }
    }
    SqlParsingResult {
        statement,
        issues,
        comments,
    }
}

/// Top-level statements of a prefix known to parse, or none.
fn statements(input: &str, resolver: &PositionResolver) -> Vec<SqlStatement> {
    let Ok(mut pairs) = SqlGrammar::parse(Rule::sql_script, input) else {
        return Vec::new();
    };
    let Some(script) = pairs.next() else {
        return Vec::new();
    };
    script
        .into_inner()
        .filter(|pair| pair.as_rule() == Rule::sql_statement)
        .filter_map(|statement| {
            let inner = statement.clone().into_inner().next()?;
            let kind = match inner.as_rule() {
                Rule::select_statement => SqlStatementKind::Select,
                _ => {
                    let keyword = inner.into_inner().next()?;
                    SqlStatementKind::Other(keyword.as_str().to_ascii_uppercase())
                }
            };
            let span = statement.as_span();
            let text = span.as_str().trim_end();
            let position =
                resolver.span_of_offsets(input, span.start(), span.start() + text.len())?;
            Some(SqlStatement {
                kind,
                text: text.to_string(),
                position,
            })
        })
        .collect()
}

/// Byte offset of the first `(` never closed, outside quotes and comments.
fn unclosed_parenthesis(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    let mut open = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'(' => open.push(i),
            b')' => {
                open.pop();
            }
            quote @ (b'\'' | b'"') => {
                i += 1;
                while i < bytes.len() {
                    if bytes[i] == quote {
                        if bytes.get(i + 1) != Some(&quote) {
                            break;
                        }
                        i += 1;
                    }
                    i += 1;
                }
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    open.first().copied()
}

fn harvest_comments(input: &str, resolver: &PositionResolver) -> Vec<Comment> {
    let Ok(mut pairs) = SqlGrammar::parse(Rule::sql_comment_scan, input) else {
        return Vec::new();
    };
    let Some(scan) = pairs.next() else {
        return Vec::new();
    };
    scan.into_inner()
        .filter_map(|pair| {
            let text = pair.as_str();
            let (kind, content) = match pair.as_rule() {
                Rule::sql_block_comment => (
                    CommentKind::Block,
                    text.get(2..text.len() - 2).unwrap_or_default().trim(),
                ),
                Rule::sql_line_comment => {
                    (CommentKind::Line, text.get(2..).unwrap_or_default().trim())
                }
                _ => return None,
            };
            Some(Comment {
                kind,
                content: content.to_string(),
                text: text.to_string(),
                position: resolver.span_of_pest(pair.as_span()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(input: &str) -> Vec<String> {
        validate_query(input, &PositionResolver::default())
            .issues
            .into_iter()
            .map(|issue| issue.message)
            .collect()
    }

    #[test]
    fn single_select_is_accepted() {
        let result = validate_query(
            "SELECT name FROM q WHERE id IN (1, 2) -- trailing",
            &PositionResolver::default(),
        );
        assert!(result.is_correct());
        assert_eq!(result.comments.len(), 1);
        assert_eq!(result.comments[0].content, "trailing");
    }

    #[test]
    fn empty_query_has_no_statement() {
        assert_eq!(
            messages("  -- nothing\n"),
            vec!["No SQL statements found in query of query."]
        );
    }

    #[test]
    fn one_statement_only() {
        assert_eq!(
            messages("SELECT 1; SELECT 2"),
            vec!["Only one SQL statement is allowed per query of query."]
        );
    }

    #[test]
    fn only_select_is_allowed() {
        assert_eq!(
            messages("DELETE FROM q"),
            vec!["Only SELECT statements are allowed in query of query."]
        );
    }

    #[test]
    fn unclosed_parenthesis_reports_its_line() {
        assert_eq!(
            messages("SELECT *\nFROM q\nWHERE (a = ')'"),
            vec!["Unclosed parenthesis [(] on line 3"]
        );
    }

    #[test]
    fn stray_close_is_extra_text() {
        assert_eq!(
            messages("SELECT a FROM q ) x"),
            vec!["Extra char(s) [) x] at the end of parsing."]
        );
    }
}
