//! Top-level comparison runs.
//!
//! A run validates the two paths, parses both files concurrently, matches
//! their lines with the configured strategy and returns a [`Comparison`].
//! Nothing here fails with an error: unreadable files, bad dates, too many
//! differences and cancellation all end up as text in the rendered report.
//!
//! # Examples
//!
//! ```no_run
//! use fdiff_rs::{compare_files, CancellationToken, CompareConfig};
//! use std::path::Path;
//!
//! let comparison = compare_files(
//!     Path::new("old.txt"),
//!     Path::new("new.txt"),
//!     &CompareConfig::default(),
//!     &CancellationToken::new(),
//! );
//! println!("{}", comparison.render());
//! ```

use crate::cancel::CancellationToken;
use crate::config::CompareConfig;
use crate::error::ParseError;
use crate::matcher::{MatchEngine, MatchOutcome};
use crate::parser::parse_pair;
use crate::record::FileIndex;
use crate::report::DiffReport;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const CANCELLED_MESSAGE: &str = "Comparison cancelled by the user";
pub const INVALID_INPUT_MESSAGE: &str = "Two valid files must be specified";

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonStatus {
    /// All lines of the first file were examined
    Completed,
    /// Stopped after exceeding the difference limit
    Truncated,
    /// Stopped by the cancellation token
    Cancelled,
    /// One of the paths is empty or not an existing file
    InvalidInput,
}

/// The result of comparing one file against another.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub first: PathBuf,
    pub second: PathBuf,
    pub status: ComparisonStatus,
    pub report: DiffReport,
}

impl Comparison {
    fn without_report(first: &Path, second: &Path, status: ComparisonStatus) -> Self {
        Self {
            first: first.to_path_buf(),
            second: second.to_path_buf(),
            status,
            report: DiffReport::new(),
        }
    }

    /// True if the run finished and found nothing to report.
    pub fn is_match(&self) -> bool {
        self.status == ComparisonStatus::Completed && self.report.difference_count() == 0
    }

    /// True if the run got far enough to produce a difference summary.
    pub fn has_summary(&self) -> bool {
        matches!(
            self.status,
            ComparisonStatus::Completed | ComparisonStatus::Truncated
        )
    }

    /// The final report text.
    pub fn render(&self) -> String {
        match self.status {
            ComparisonStatus::Cancelled => CANCELLED_MESSAGE.to_string(),
            ComparisonStatus::InvalidInput => INVALID_INPUT_MESSAGE.to_string(),
            ComparisonStatus::Completed | ComparisonStatus::Truncated => self.report.render(),
        }
    }
}

fn is_valid_input(path: &Path) -> bool {
    !path.as_os_str().is_empty() && path.is_file()
}

/// Keeps a parsed index, or records why the file could not be parsed and
/// carries on with nothing.
fn accept(path: &Path, parsed: Result<FileIndex, ParseError>, report: &mut DiffReport) -> FileIndex {
    match parsed {
        Ok(index) => index,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "problem while parsing file");
            report.parse_failure(path.display(), &e);
            FileIndex::new()
        }
    }
}

/// Compares `first` against `second`.
///
/// With the unordered strategy the comparison is one-sided: lines that only
/// exist in `second` go unnoticed. See [`compare_both_ways`].
pub fn compare_files(
    first: &Path,
    second: &Path,
    config: &CompareConfig,
    cancel: &CancellationToken,
) -> Comparison {
    info!(
        first = %first.display(),
        second = %second.display(),
        strategy = ?config.strategy,
        "comparing files"
    );

    if !is_valid_input(first) || !is_valid_input(second) {
        info!("comparison skipped: invalid input files");
        return Comparison::without_report(first, second, ComparisonStatus::InvalidInput);
    }

    let classifier = config.classifier();
    let Some((first_parsed, second_parsed)) =
        parse_pair(first, second, &config.separator, &classifier, cancel)
    else {
        return Comparison::without_report(first, second, ComparisonStatus::Cancelled);
    };

    let mut report = DiffReport::new();
    let first_index = accept(first, first_parsed, &mut report);
    let second_index = accept(second, second_parsed, &mut report);

    // A worker that saw the token returned an empty index, not an error.
    if cancel.is_cancelled() {
        info!("comparison cancelled after parsing the files");
        return Comparison::without_report(first, second, ComparisonStatus::Cancelled);
    }

    let engine = MatchEngine::new(config.strategy, cancel);
    let status = match engine.run(&first_index, &second_index, &mut report) {
        MatchOutcome::Completed => ComparisonStatus::Completed,
        MatchOutcome::Truncated => ComparisonStatus::Truncated,
        MatchOutcome::Cancelled => {
            return Comparison::without_report(first, second, ComparisonStatus::Cancelled);
        }
    };

    info!(
        differences = report.difference_count(),
        "end of comparison"
    );

    Comparison {
        first: first.to_path_buf(),
        second: second.to_path_buf(),
        status,
        report,
    }
}

/// Convenience wrapper returning only the rendered report.
pub fn compare(
    first: &Path,
    second: &Path,
    config: &CompareConfig,
    cancel: &CancellationToken,
) -> String {
    compare_files(first, second, config, cancel).render()
}

/// A comparison in both directions.
#[derive(Debug, Clone)]
pub struct BothWays {
    pub forward: Comparison,
    /// Absent when the forward run was cancelled or had invalid input
    pub backward: Option<Comparison>,
}

impl BothWays {
    pub fn is_match(&self) -> bool {
        self.forward.is_match() && self.backward.as_ref().is_some_and(Comparison::is_match)
    }
}

/// Compares `first` against `second`, then `second` against `first`.
pub fn compare_both_ways(
    first: &Path,
    second: &Path,
    config: &CompareConfig,
    cancel: &CancellationToken,
) -> BothWays {
    let forward = compare_files(first, second, config, cancel);

    let backward = if forward.has_summary() {
        Some(compare_files(second, first, config, cancel))
    } else {
        None
    };

    BothWays { forward, backward }
}
