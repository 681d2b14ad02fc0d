//! Command-line arguments and subcommands for the `bxast` binary.
//!
//! Uses `clap` with its "derive" feature.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::dialect::DialectKind;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "bxast",
    version,
    about = "Parses BoxLang and CFML script into a canonical AST."
)]
pub struct BxastArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the JSON AST of a source file.
    Ast {
        /// The source file to parse.
        #[arg(required = true)]
        file: PathBuf,
        /// Dialect to use instead of the one implied by the extension.
        #[arg(long, value_enum)]
        dialect: Option<DialectKind>,
        /// Parse the file as one standalone expression.
        #[arg(long)]
        expression: bool,
        /// YAML parse options.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Parse every source file under a path and report Issues.
    Check {
        /// A source file or a directory to walk.
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Dialect to use instead of the one implied by each extension.
        #[arg(long, value_enum)]
        dialect: Option<DialectKind>,
    },
    /// List the comments of a source file.
    Comments {
        /// The source file to scan.
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Validate a query-of-query SQL file.
    Sql {
        /// The SQL file to validate.
        #[arg(required = true)]
        file: PathBuf,
    },
}
