//! Output formatting for comparison results.
//!
//! The plain format is the report text exactly as the comparison produced it.
//! The terminal format prints the same lines with colors, and the JSON format
//! exposes the individual difference lines for tooling.
//!
//! # Examples
//!
//! ```no_run
//! use fdiff_rs::{compare_files, format_comparison, CancellationToken, CompareConfig, OutputFormat};
//! use std::path::Path;
//!
//! let comparison = compare_files(
//!     Path::new("old.txt"),
//!     Path::new("new.txt"),
//!     &CompareConfig::default(),
//!     &CancellationToken::new(),
//! );
//! let output = format_comparison(&comparison, &OutputFormat::Json).unwrap();
//! println!("{}", output);
//! ```

use crate::compare::{BothWays, Comparison};
use crate::error::OutputError;
use crate::report::EXACT_MATCH;
use colored::*;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Colored terminal output with ANSI escape codes
    Terminal,
    /// JSON representation of the comparison
    Json,
    /// The report text, no colors (suitable for piping)
    Plain,
}

/// Formats a comparison according to the specified format.
pub fn format_comparison(
    comparison: &Comparison,
    format: &OutputFormat,
) -> Result<String, OutputError> {
    match format {
        OutputFormat::Terminal => Ok(format_terminal(comparison)),
        OutputFormat::Json => format_json(comparison),
        OutputFormat::Plain => Ok(comparison.render()),
    }
}

/// Formats the report for a terminal.
///
/// Color scheme:
/// - Field differences: yellow
/// - Missing lines, field-count mismatches and parse failures: red
/// - Truncation notice and cancellation: bold red
/// - Exact match: bold green
/// - Difference total: bold
fn format_terminal(comparison: &Comparison) -> String {
    if !comparison.has_summary() {
        return comparison.render().bright_red().bold().to_string();
    }

    let mut output = String::new();
    for line in comparison.render().lines() {
        output.push_str(&color_line(line));
        output.push('\n');
    }

    output
}

fn color_line(line: &str) -> String {
    if line.is_empty() {
        String::new()
    } else if line == EXACT_MATCH {
        line.bright_green().bold().to_string()
    } else if line.ends_with(" difference(s) found") {
        line.bold().to_string()
    } else if line.starts_with("There are more than") {
        line.bright_red().bold().to_string()
    } else if line.starts_with("Problem while parsing")
        || line.ends_with("Not present in file 2")
        || line.ends_with("has not the same number of fields in both files")
    {
        line.red().to_string()
    } else {
        line.yellow().to_string()
    }
}

/// Formats both directions of a two-way comparison.
///
/// Text formats print each report under a `=== first -> second ===` header;
/// JSON yields an array with one object per direction.
pub fn format_both_ways(both: &BothWays, format: &OutputFormat) -> Result<String, OutputError> {
    let runs: Vec<&Comparison> = std::iter::once(&both.forward)
        .chain(both.backward.as_ref())
        .collect();

    if *format == OutputFormat::Json {
        let values: Vec<serde_json::Value> = runs.into_iter().map(comparison_json).collect();
        return serde_json::to_string_pretty(&values)
            .map_err(|e| OutputError::JsonSerializationError { source: e });
    }

    let mut output = String::new();
    for (position, run) in runs.into_iter().enumerate() {
        if position > 0 {
            output.push('\n');
        }
        let header = format!(
            "=== {} -> {} ===",
            run.first.display(),
            run.second.display()
        );
        if *format == OutputFormat::Terminal {
            output.push_str(&header.cyan().bold().to_string());
        } else {
            output.push_str(&header);
        }
        output.push('\n');
        output.push_str(&format_comparison(run, format)?);
    }

    Ok(output)
}

/// Formats a comparison as JSON.
fn format_json(comparison: &Comparison) -> Result<String, OutputError> {
    serde_json::to_string_pretty(&comparison_json(comparison))
        .map_err(|e| OutputError::JsonSerializationError { source: e })
}

/// `summary` is `null` for cancelled runs and invalid input, whose `message`
/// explains what happened instead.
fn comparison_json(comparison: &Comparison) -> serde_json::Value {
    use serde_json::json;

    let differences: Vec<&str> = comparison.report.lines().collect();
    let summary = comparison
        .has_summary()
        .then(|| comparison.report.summary());
    let message = (!comparison.has_summary()).then(|| comparison.render());

    json!({
        "first": comparison.first.to_string_lossy(),
        "second": comparison.second.to_string_lossy(),
        "status": comparison.status,
        "differences": differences,
        "difference_count": comparison.report.difference_count(),
        "summary": summary,
        "message": message,
    })
}
