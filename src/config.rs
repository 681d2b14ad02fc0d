//! Parse options, loadable from YAML.
//!
//! ```yaml
//! dialect: cf
//! line_offset: 12
//! column_offset: 4
//! source_name: views/home.cfm
//! components: [customTag]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{BxError, ErrorContext};
use crate::dialect::DialectKind;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseOptions {
    /// Overrides extension-based inference when set.
    pub dialect: Option<DialectKind>,
    /// Lines preceding the fragment in its host document.
    pub line_offset: usize,
    /// Columns preceding the fragment on its first line.
    pub column_offset: usize,
    /// Recorded as the source of every position.
    pub source_name: Option<String>,
    /// Extra tag-style component names.
    pub components: Vec<String>,
}

impl ParseOptions {
    pub fn from_yaml_str(text: &str) -> Result<Self, BxError> {
        serde_yaml::from_str(text).map_err(|err| BxError::Config {
            message: err.to_string(),
            ctx: ErrorContext::none(),
            source: Some(Box::new(err)),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, BxError> {
        let text = fs::read_to_string(path).map_err(|err| BxError::io(path, err))?;
        Self::from_yaml_str(&text)
    }

    pub fn with_offsets(mut self, line_offset: usize, column_offset: usize) -> Self {
        self.line_offset = line_offset;
        self.column_offset = column_offset;
        self
    }

    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorType;

    #[test]
    fn missing_fields_take_defaults() {
        let options = ParseOptions::from_yaml_str("line_offset: 3").unwrap();
        assert_eq!(options.line_offset, 3);
        assert_eq!(options.column_offset, 0);
        assert_eq!(options.dialect, None);
        assert!(options.components.is_empty());
    }

    #[test]
    fn dialect_accepts_short_names() {
        let options = ParseOptions::from_yaml_str("dialect: bx\ncomponents: [widget]").unwrap();
        assert_eq!(options.dialect, Some(DialectKind::BoxScript));
        assert_eq!(options.components, vec!["widget".to_string()]);
        let options = ParseOptions::from_yaml_str("dialect: cf").unwrap();
        assert_eq!(options.dialect, Some(DialectKind::Cf));
    }

    #[test]
    fn unknown_keys_are_config_errors() {
        let err = ParseOptions::from_yaml_str("colour: blue").unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
    }
}
