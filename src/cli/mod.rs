//! The bxast command-line interface.
//!
//! Every subcommand exits with status 1 when it reported any Issue or error.

use std::fs;
use std::path::Path;
use std::process;
use std::sync::Arc;

use clap::Parser as _;
use walkdir::WalkDir;

use crate::ast::SourceRef;
use crate::cli::args::{BxastArgs, Command};
use crate::config::ParseOptions;
use crate::diagnostics::BxError;
use crate::dialect::{infer_from_path, DialectKind};
use crate::syntax::PositionResolver;
use crate::{export, sql, Parser};

pub mod args;
pub mod output;

/// Whether a subcommand found nothing to report.
type Outcome = Result<bool, BxError>;

/// The main entry point for the CLI.
pub fn run() {
    let args = BxastArgs::parse();

    let result = match args.command {
        Command::Ast {
            file,
            dialect,
            expression,
            config,
        } => handle_ast(&file, dialect, expression, config.as_deref()),
        Command::Check { path, dialect } => handle_check(&path, dialect),
        Command::Comments { file } => handle_comments(&file),
        Command::Sql { file } => handle_sql(&file),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            output::print_error(&e);
            process::exit(1);
        }
    }
}

fn read(path: &Path) -> Result<String, BxError> {
    fs::read_to_string(path).map_err(|err| BxError::io(path, err))
}

fn parser_for(dialect: Option<DialectKind>, config: Option<&Path>) -> Result<Parser, BxError> {
    let mut options = match config {
        Some(config) => ParseOptions::from_file(config)?,
        None => ParseOptions::default(),
    };
    if dialect.is_some() {
        options.dialect = dialect;
    }
    Ok(Parser::new(DialectKind::default()).with_options(options))
}

/// Handles the `ast` subcommand.
fn handle_ast(
    path: &Path,
    dialect: Option<DialectKind>,
    expression: bool,
    config: Option<&Path>,
) -> Outcome {
    let input = read(path)?;
    let parser = parser_for(dialect, config)?;
    let result = if expression {
        let (dialect, _) = parser.file_settings(path);
        let options = parser.options().clone();
        let options = match options.source_name {
            Some(_) => options,
            None => options.with_source_name(path.display().to_string()),
        };
        Parser::new(dialect)
            .with_options(options)
            .parse_expression(&input)
    } else {
        parser.parse_file_contents(path, &input)
    }
    .map_err(|e| e.with_source(&path.display().to_string(), &input))?;

    println!("{}", export::to_json(&result.root)?);
    output::print_issues(&path.display().to_string(), &input, &result.issues);
    Ok(result.issues.is_empty())
}

/// Handles the `check` subcommand.
fn handle_check(path: &Path, dialect: Option<DialectKind>) -> Outcome {
    let parser = parser_for(dialect, None)?;
    let (mut files, mut failed, mut total) = (0, 0, 0);
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.map_err(|err| BxError::Io {
            message: err.to_string(),
            ctx: Default::default(),
            source: Some(Box::new(err)),
        })?;
        if !entry.file_type().is_file() || infer_from_path(entry.path()).is_none() {
            continue;
        }
        let name = entry.path().display().to_string();
        let input = read(entry.path())?;
        let result = parser
            .parse_file_contents(entry.path(), &input)
            .map_err(|e| e.with_source(&name, &input))?;
        files += 1;
        total += result.issues.len();
        if !result.issues.is_empty() {
            failed += 1;
            output::print_issues(&name, &input, &result.issues);
        }
        output::print_file_status(&name, result.issues.len());
    }
    output::print_summary(files, failed, total);
    Ok(failed == 0)
}

/// Handles the `comments` subcommand.
fn handle_comments(path: &Path) -> Outcome {
    let input = read(path)?;
    let result = Parser::new(DialectKind::default())
        .parse_file_contents(path, &input)
        .map_err(|e| e.with_source(&path.display().to_string(), &input))?;
    output::print_comments(&result.comments);
    Ok(true)
}

/// Handles the `sql` subcommand.
fn handle_sql(path: &Path) -> Outcome {
    let input = read(path)?;
    let resolver = PositionResolver::new(
        0,
        0,
        Some(Arc::new(SourceRef::File {
            path: path.to_path_buf(),
        })),
    );
    let result = sql::validate_query(&input, &resolver);
    output::print_sql(&result);
    output::print_issues(&path.display().to_string(), &input, &result.issues);
    Ok(result.issues.is_empty())
}
