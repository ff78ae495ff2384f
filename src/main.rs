//! FDIFF command-line interface.
//!
//! This is the main entry point for the fdiff CLI tool. It uses clap for
//! argument parsing, merges the flags over an optional TOML profile and
//! prints the comparison report on stdout.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use fdiff_rs::{
    compare_both_ways, compare_files, format_both_ways, format_comparison, preview_columns,
    CancellationToken, CompareConfig, Comparison, ComparisonStatus, MatchStrategy, OutputFormat,
};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

const EXIT_MATCH: i32 = 0;
const EXIT_DIFFERENCES: i32 = 1;
const EXIT_ERROR: i32 = 2;

/// FDIFF - Type-aware diff tool for delimited text files
///
/// Compares two files field by field, reading dates and numbers by value so
/// that formatting differences are not reported.
#[derive(Parser)]
#[command(name = "fdiff-rs")]
#[command(version)]
#[command(about = "Type-aware diff tool for delimited text files", long_about = None)]
#[command(author = "FDIFF Contributors")]
struct Cli {
    /// First file to compare
    #[arg(value_name = "FILE1")]
    file1: PathBuf,

    /// Second file to compare
    #[arg(value_name = "FILE2", required_unless_present = "list_columns")]
    file2: Option<PathBuf>,

    /// Field separator
    #[arg(short, long)]
    separator: Option<String>,

    /// Columns to read as dates (1-based, comma-separated)
    #[arg(short, long, value_delimiter = ',', value_name = "COLS")]
    dates: Vec<usize>,

    /// Columns to read as numbers (1-based, comma-separated)
    #[arg(short, long, value_delimiter = ',', value_name = "COLS")]
    numbers: Vec<usize>,

    /// Pair lines by position instead of by content
    #[arg(short, long)]
    ordered: bool,

    /// TOML profile with default settings
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "terminal")]
    format: OutputFormatArg,

    /// Also compare FILE2 against FILE1
    #[arg(short, long)]
    both_ways: bool,

    /// Print the columns of FILE1 and exit
    #[arg(short, long)]
    list_columns: bool,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (no output, exit code only)
    #[arg(short, long)]
    quiet: bool,
}

/// Output format argument for clap
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormatArg {
    /// Colored terminal output
    Terminal,
    /// JSON representation
    Json,
    /// Plain text (no colors)
    Plain,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Terminal => OutputFormat::Terminal,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Plain => OutputFormat::Plain,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(EXIT_ERROR);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Builds the run settings: the profile if one is given, then the flags.
fn build_config(cli: &Cli) -> Result<CompareConfig> {
    let mut config = match &cli.config {
        Some(path) => CompareConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => CompareConfig::default(),
    };

    if let Some(separator) = &cli.separator {
        config.separator = separator.clone();
    }
    if !cli.dates.is_empty() {
        config.date_columns = cli.dates.iter().copied().collect::<BTreeSet<_>>();
    }
    if !cli.numbers.is_empty() {
        config.number_columns = cli.numbers.iter().copied().collect::<BTreeSet<_>>();
    }
    if cli.ordered {
        config.strategy = MatchStrategy::Ordered;
    }

    config.validate().context("Invalid settings")?;
    Ok(config)
}

/// The binary never signals its token, so a cancelled run only comes from
/// library callers and is reported as an error.
fn exit_code(comparison: &Comparison) -> i32 {
    match comparison.status {
        ComparisonStatus::Cancelled | ComparisonStatus::InvalidInput => EXIT_ERROR,
        _ if comparison.is_match() => EXIT_MATCH,
        _ => EXIT_DIFFERENCES,
    }
}

fn list_columns(path: &Path, separator: &str, quiet: bool) -> Result<i32> {
    let columns = preview_columns(path, separator)
        .with_context(|| format!("Failed to read columns of {}", path.display()))?;

    if !quiet {
        for (index, column) in columns.iter().enumerate() {
            println!("{}: {}", index + 1, column);
        }
    }

    Ok(EXIT_MATCH)
}

fn run(cli: Cli) -> Result<i32> {
    let config = build_config(&cli)?;
    let output_format: OutputFormat = cli.format.into();

    if cli.list_columns {
        return list_columns(&cli.file1, &config.separator, cli.quiet);
    }

    // clap enforces FILE2 unless --list-columns was given
    let file2 = cli.file2.clone().unwrap_or_default();
    let cancel = CancellationToken::new();

    let (output, code) = if cli.both_ways {
        let both = compare_both_ways(&cli.file1, &file2, &config, &cancel);
        let output =
            format_both_ways(&both, &output_format).context("Failed to format comparison output")?;

        let code = match &both.backward {
            _ if both.is_match() => EXIT_MATCH,
            None => exit_code(&both.forward),
            Some(backward) if backward.status == ComparisonStatus::Cancelled => EXIT_ERROR,
            Some(_) => EXIT_DIFFERENCES,
        };
        (output, code)
    } else {
        let comparison = compare_files(&cli.file1, &file2, &config, &cancel);
        let output = format_comparison(&comparison, &output_format)
            .context("Failed to format comparison output")?;
        (output, exit_code(&comparison))
    };

    if !cli.quiet {
        print!("{}", output);
        if !output.ends_with('\n') {
            println!();
        }
    }

    Ok(code)
}
