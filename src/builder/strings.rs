use crate::ast::{Expr, ExprNode};
use crate::syntax::{Pair, Rule};

use super::{AstBuilder, BuildResult};

impl<'a> AstBuilder<'a> {
    /// A quoted string. Without `#expr#` islands this is a plain literal;
    /// with them, an interpolation whose parts alternate text and expressions.
    pub(super) fn string_literal(&mut self, pair: Pair<'_>) -> BuildResult<ExprNode> {
        let quote = pair.as_str().chars().next().unwrap_or('"');
        let mut parts = Vec::new();
        let mut interpolated = false;
        for child in pair.clone().into_inner() {
            match child.as_rule() {
                Rule::dq_text | Rule::sq_text => {
                    let value = unescape(child.as_str(), quote);
                    parts.push(self.node(Expr::StringLiteral { value }, &child));
                }
                Rule::interpolation => {
                    interpolated = true;
                    let mut inner = child.clone().into_inner();
                    let expression = self.expect(&mut inner, "interpolated expression", &child)?;
                    parts.push(self.expression(expression)?);
                }
                _ => return Err(self.unexpected(&child)),
            }
        }
        if interpolated {
            return Ok(self.node(Expr::StringInterpolation { parts }, &pair));
        }
        let value = parts
            .into_iter()
            .filter_map(|part| match part.value {
                Expr::StringLiteral { value } => Some(value),
                _ => None,
            })
            .collect();
        Ok(self.node(Expr::StringLiteral { value }, &pair))
    }
}

/// Collapses `##` and a doubled delimiter to a single character.
///
/// ```text
/// "say ""hi"" ##1"  ->  say "hi" #1
/// ```
pub(super) fn unescape(text: &str, quote: char) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if (ch == '#' || ch == quote) && chars.peek() == Some(&ch) {
            chars.next();
        }
        out.push(ch);
    }
    out
}
