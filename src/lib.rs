//! FDIFF - Type-aware diff tool for delimited text files.
//!
//! This library compares two line-oriented files whose lines are split into
//! fields by a literal separator. Fields are read as dates, numbers or strings,
//! so `24/03/2013` equals `20130324` and ` 1000 ` equals `1000`. Lines are
//! paired either by position or by content, in which case reordered and
//! slightly edited lines are still found.
//!
//! # Example
//!
//! ```no_run
//! use fdiff_rs::{compare_files, CancellationToken, CompareConfig, MatchStrategy};
//! use std::path::Path;
//!
//! let config = CompareConfig {
//!     separator: "|".to_string(),
//!     strategy: MatchStrategy::Unordered,
//!     ..Default::default()
//! };
//!
//! let comparison = compare_files(
//!     Path::new("old.txt"),
//!     Path::new("new.txt"),
//!     &config,
//!     &CancellationToken::new(),
//! );
//! println!("{}", comparison.render());
//! ```

pub mod cancel;
pub mod comparator;
pub mod compare;
pub mod config;
pub mod error;
pub mod field;
pub mod matcher;
pub mod output;
pub mod parser;
pub mod record;
pub mod report;
pub mod tokenizer;

// Re-export commonly used types for convenience
pub use cancel::CancellationToken;
pub use comparator::{tokens_equal, FieldComparator};
pub use compare::{
    compare, compare_both_ways, compare_files, BothWays, Comparison, ComparisonStatus,
};
pub use config::CompareConfig;
pub use error::{ConfigError, FdiffError, FieldError, OutputError, ParseError};
pub use field::{Field, FieldClassifier};
pub use matcher::{MatchEngine, MatchOutcome, MatchStrategy};
pub use output::{format_both_ways, format_comparison, OutputFormat};
pub use parser::{parse_content, parse_file, parse_pair, preview_columns};
pub use record::{FileIndex, Record};
pub use report::DiffReport;
pub use tokenizer::tokenize;
