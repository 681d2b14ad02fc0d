//! Dialect adapter.
//!
//! Both dialects share one grammar and one builder. The handful of places
//! where they differ are answered by a [`Dialect`] implementation.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// The two surface dialects.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    /// Modern BoxLang script
    #[default]
    #[value(name = "bx")]
    #[serde(alias = "bx")]
    BoxScript,
    /// Legacy CFML script
    #[value(name = "cf")]
    Cf,
}

impl DialectKind {
    pub fn adapter(&self) -> &'static dyn Dialect {
        match self {
            DialectKind::BoxScript => &BoxScript,
            DialectKind::Cf => &CfScript,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DialectKind::BoxScript => "BoxScript",
            DialectKind::Cf => "CF",
        }
    }
}

/// Whether a source file holds a class/interface or free-standing script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    Script,
    Class,
}

/// Extensions the front end understands.
pub const SOURCE_EXTENSIONS: &[&str] = &["bx", "bxs", "bxm", "cfc", "cfs", "cfm"];

/// Infers dialect and source kind from a file extension.
///
/// # Examples
///
/// ```rust
/// use bxast::dialect::{infer_from_path, DialectKind, SourceKind};
/// assert_eq!(
///     infer_from_path(std::path::Path::new("Widget.cfc")),
///     Some((DialectKind::Cf, SourceKind::Class))
/// );
/// ```
pub fn infer_from_path(path: &Path) -> Option<(DialectKind, SourceKind)> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if !SOURCE_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    let dialect = if ext.starts_with("cf") {
        DialectKind::Cf
    } else {
        DialectKind::BoxScript
    };
    let kind = if ext == "bx" || ext == "cfc" {
        SourceKind::Class
    } else {
        SourceKind::Script
    };
    Some((dialect, kind))
}

/// How a bare name should be represented in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierClass {
    Scope,
    Plain,
}

const BOX_SCOPES: &[&str] = &[
    "application",
    "arguments",
    "cgi",
    "cookie",
    "form",
    "local",
    "request",
    "server",
    "session",
    "this",
    "thread",
    "url",
    "variables",
];

const CF_SCOPES: &[&str] = &[
    "application",
    "arguments",
    "cgi",
    "client",
    "cookie",
    "form",
    "local",
    "request",
    "server",
    "session",
    "this",
    "thread",
    "url",
    "variables",
];

pub trait Dialect: Send + Sync {
    fn kind(&self) -> DialectKind;

    /// Reserved scope names, lower-case.
    fn scopes(&self) -> &'static [&'static str];

    /// The keyword that introduces a class declaration.
    fn class_keyword(&self) -> &'static str;

    fn allows_template_islands(&self) -> bool;

    fn allows_prefixed_components(&self) -> bool;

    fn allows_strict_inequality(&self) -> bool;

    /// Legacy quoted imports carry their quotes into the source text.
    fn strips_import_quotes(&self) -> bool;

    fn classify(&self, name: &str) -> IdentifierClass {
        let lower = name.to_ascii_lowercase();
        if self.scopes().contains(&lower.as_str()) {
            IdentifierClass::Scope
        } else {
            IdentifierClass::Plain
        }
    }
}

pub struct BoxScript;

impl Dialect for BoxScript {
    fn kind(&self) -> DialectKind {
        DialectKind::BoxScript
    }

    fn scopes(&self) -> &'static [&'static str] {
        BOX_SCOPES
    }

    fn class_keyword(&self) -> &'static str {
        "class"
    }

    fn allows_template_islands(&self) -> bool {
        true
    }

    fn allows_prefixed_components(&self) -> bool {
        false
    }

    fn allows_strict_inequality(&self) -> bool {
        true
    }

    fn strips_import_quotes(&self) -> bool {
        false
    }
}

pub struct CfScript;

impl Dialect for CfScript {
    fn kind(&self) -> DialectKind {
        DialectKind::Cf
    }

    fn scopes(&self) -> &'static [&'static str] {
        CF_SCOPES
    }

    fn class_keyword(&self) -> &'static str {
        "component"
    }

    fn allows_template_islands(&self) -> bool {
        false
    }

    fn allows_prefixed_components(&self) -> bool {
        true
    }

    fn allows_strict_inequality(&self) -> bool {
        false
    }

    fn strips_import_quotes(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_scope_is_legacy_only() {
        assert_eq!(CfScript.classify("CLIENT"), IdentifierClass::Scope);
        assert_eq!(BoxScript.classify("client"), IdentifierClass::Plain);
        assert_eq!(BoxScript.classify("Variables"), IdentifierClass::Scope);
    }

    #[test]
    fn extension_inference() {
        assert_eq!(
            infer_from_path(Path::new("a/b/Foo.bx")),
            Some((DialectKind::BoxScript, SourceKind::Class))
        );
        assert_eq!(
            infer_from_path(Path::new("run.cfs")),
            Some((DialectKind::Cf, SourceKind::Script))
        );
        assert_eq!(infer_from_path(Path::new("notes.txt")), None);
    }
}
