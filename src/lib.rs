//! bxast: a dual-dialect BoxLang/CFML script front end.
//!
//! Source text is parsed with a pest grammar shared by both dialects, then
//! folded into one canonical, serialisable AST. Problems in the input never
//! abort a parse; they are collected as [`Issue`]s next to the tree.
//!
//! ```rust
//! use bxast::{DialectKind, Parser};
//! let result = Parser::new(DialectKind::Cf).parse_script("x = a?.b ?: 1;").unwrap();
//! assert!(result.is_correct());
//! ```

pub use crate::components::{ComponentRegistry, ComponentSet};
pub use crate::config::ParseOptions;
pub use crate::diagnostics::{BxError, Issue};
pub use crate::dialect::{DialectKind, SourceKind};
pub use crate::parser::{Parser, ParsingResult};

pub mod ast;
pub mod builder;
pub mod cli;
pub mod components;
pub mod config;
pub mod diagnostics;
pub mod dialect;
pub mod export;
pub mod operators;
pub mod parser;
pub mod sql;
pub mod syntax;
