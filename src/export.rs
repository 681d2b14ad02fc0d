//! JSON export of trees and whole parse results.

use serde::Serialize;
use serde_json::Value;

use crate::diagnostics::BxError;

/// Pretty-printed JSON for a [`Root`](crate::ast::Root), a
/// [`ParsingResult`](crate::ParsingResult) or any part of either.
///
/// # Examples
///
/// ```rust
/// use bxast::{export, DialectKind, Parser};
/// let result = Parser::new(DialectKind::BoxScript).parse_expression("1 + 2").unwrap();
/// let json = export::to_json(&result.root).unwrap();
/// assert!(json.contains("\"kind\": \"BinaryOperation\""));
/// ```
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, BxError> {
    serde_json::to_string_pretty(value).map_err(export_error)
}

pub fn to_json_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, BxError> {
    serde_json::to_value(value).map_err(export_error)
}

fn export_error(err: serde_json::Error) -> BxError {
    crate::err_msg!(Internal, format!("JSON export failed: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DialectKind, Parser};

    #[test]
    fn result_export_carries_issues_and_comments() {
        let result = Parser::new(DialectKind::BoxScript)
            .parse_script("// note\nx = 1abc;")
            .unwrap();
        let value = to_json_value(&result).unwrap();
        assert_eq!(value["comments"][0]["content"], "note");
        assert!(value["issues"].as_array().is_some_and(|issues| !issues.is_empty()));
        assert_eq!(value["root"]["kind"], "Script");
    }

    #[test]
    fn exported_tree_reads_back() {
        let result = Parser::new(DialectKind::Cf)
            .parse_script("a.b(c, 'd').e[1] = 2;")
            .unwrap();
        let json = to_json(&result).unwrap();
        let back: crate::ParsingResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
