//! Handles all user-facing output for the CLI.
//!
//! Issues and errors are rendered as `miette` reports on stderr; summaries
//! are coloured with `termcolor`, only when stderr is a terminal.

use std::io::Write;

use miette::{GraphicalReportHandler, GraphicalTheme};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::diagnostics::{BxError, Issue};
use crate::sql::SqlParsingResult;
use crate::syntax::comments::Comment;

// ============================================================================
// STREAMS
// ============================================================================

fn color_choice() -> ColorChoice {
    if atty::is(atty::Stream::Stderr) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

fn stderr() -> StandardStream {
    StandardStream::stderr(color_choice())
}

fn report_handler() -> GraphicalReportHandler {
    let theme = if atty::is(atty::Stream::Stderr) {
        GraphicalTheme::unicode()
    } else {
        GraphicalTheme::unicode_nocolor()
    };
    GraphicalReportHandler::new_themed(theme)
}

// ============================================================================
// REPORTS
// ============================================================================

/// Renders each Issue with a snippet of `input`.
pub fn print_issues(name: &str, input: &str, issues: &[Issue]) {
    let handler = report_handler();
    for issue in issues {
        let report = issue.to_report(name, input);
        let mut rendered = String::new();
        match handler.render_report(&mut rendered, &report) {
            Ok(()) => eprint!("{}", rendered),
            Err(_) => eprintln!("{}: {}", name, issue.message),
        }
    }
}

/// Renders a fatal error.
pub fn print_error(error: &BxError) {
    let handler = report_handler();
    let mut rendered = String::new();
    match handler.render_report(&mut rendered, error) {
        Ok(()) => eprint!("{}", rendered),
        Err(_) => eprintln!("Error: {}", error),
    }
}

// ============================================================================
// SUMMARIES
// ============================================================================

/// One `check` line: the file and its Issue count.
pub fn print_file_status(name: &str, issues: usize) {
    let mut out = stderr();
    let (label, color) = if issues == 0 {
        ("ok", Color::Green)
    } else {
        ("FAIL", Color::Red)
    };
    let _ = out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = write!(out, "{:>4}", label);
    let _ = out.reset();
    if issues == 0 {
        let _ = writeln!(out, " {}", name);
    } else {
        let _ = writeln!(out, " {} ({} issue{})", name, issues, plural(issues));
    }
}

pub fn print_summary(files: usize, failed: usize, issues: usize) {
    let mut out = stderr();
    let color = if failed == 0 { Color::Green } else { Color::Red };
    let _ = out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = writeln!(
        out,
        "--- {} file{} checked, {} with issues, {} issue{} total ---",
        files,
        plural(files),
        failed,
        issues,
        plural(issues)
    );
    let _ = out.reset();
}

/// Comments as `position kind content`, one per line, on stdout.
pub fn print_comments(comments: &[Comment]) {
    let mut out = StandardStream::stdout(ColorChoice::Never);
    for comment in comments {
        let _ = writeln!(
            out,
            "{} {:?} {}",
            comment.position,
            comment.kind,
            comment.content.replace('\n', "\\n")
        );
    }
}

pub fn print_sql(result: &SqlParsingResult) {
    let mut out = StandardStream::stdout(ColorChoice::Never);
    if let Some(statement) = &result.statement {
        let _ = writeln!(out, "{:?} at {}", statement.kind, statement.position);
    }
    for comment in &result.comments {
        let _ = writeln!(out, "comment {}: {}", comment.position, comment.content);
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
