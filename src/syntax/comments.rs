//! Comment harvesting.
//!
//! Comments are skipped by the main grammar, so they are collected in a second
//! pass over the same input with the `comment_scan` rule, which steps over
//! quoted strings.

use once_cell::sync::Lazy;
use pest::Parser;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ast::Position;
use crate::syntax::{BoxGrammar, PositionResolver, Rule};

static DOC_GUTTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*\*[ \t]?").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentKind {
    Line,
    Block,
    Documentation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub kind: CommentKind,
    /// Comment body without delimiters, trimmed.
    pub content: String,
    /// Verbatim source text including delimiters.
    pub text: String,
    pub position: Position,
}

impl Comment {
    pub fn is_documentation(&self) -> bool {
        self.kind == CommentKind::Documentation
    }
}

/// Collects every comment in `input`, in source order.
pub fn harvest(input: &str, resolver: &PositionResolver) -> Vec<Comment> {
    let Ok(mut pairs) = BoxGrammar::parse(Rule::comment_scan, input) else {
        return Vec::new();
    };
    let Some(scan) = pairs.next() else {
        return Vec::new();
    };
    scan.into_inner()
        .filter_map(|pair| {
            let text = pair.as_str();
            let (kind, content) = match pair.as_rule() {
                Rule::doc_comment => (
                    CommentKind::Documentation,
                    clean_documentation(&text[3..text.len() - 2]),
                ),
                Rule::block_comment => (
                    CommentKind::Block,
                    text[2..text.len() - 2].trim().to_string(),
                ),
                Rule::line_comment => (CommentKind::Line, text[2..].trim().to_string()),
                _ => return None,
            };
            Some(Comment {
                kind,
                content,
                text: text.to_string(),
                position: resolver.span_of(&pair),
            })
        })
        .collect()
}

/// Strips the leading `*` gutter from every line of a doc comment body.
pub fn clean_documentation(body: &str) -> String {
    DOC_GUTTER.replace_all(body, "").trim().to_string()
}
