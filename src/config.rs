//! Comparison settings and their TOML profile.
//!
//! A profile file holds any subset of these keys:
//!
//! ```toml
//! separator = "|"
//! date_columns = [2]
//! number_columns = [3, 4]
//! ordered = true
//! ```

use crate::error::ConfigError;
use crate::field::FieldClassifier;
use crate::matcher::MatchStrategy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

pub const DEFAULT_SEPARATOR: &str = ";";

/// Everything a comparison run needs besides the two files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Literal string between two fields
    pub separator: String,
    /// 1-based columns read as dates; empty means auto-detect
    pub date_columns: BTreeSet<usize>,
    /// 1-based columns read as numbers; empty means auto-detect
    pub number_columns: BTreeSet<usize>,
    /// Line pairing strategy
    #[serde(
        rename = "ordered",
        serialize_with = "serialize_ordered",
        deserialize_with = "deserialize_ordered"
    )]
    pub strategy: MatchStrategy,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            date_columns: BTreeSet::new(),
            number_columns: BTreeSet::new(),
            strategy: MatchStrategy::Unordered,
        }
    }
}

fn serialize_ordered<S: serde::Serializer>(
    strategy: &MatchStrategy,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_bool(*strategy == MatchStrategy::Ordered)
}

fn deserialize_ordered<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> Result<MatchStrategy, D::Error> {
    bool::deserialize(deserializer).map(MatchStrategy::from_ordered)
}

impl CompareConfig {
    /// Parses a TOML profile. `source` names it in error messages.
    pub fn from_toml_str(content: &str, source: &str) -> Result<Self, ConfigError> {
        let config: CompareConfig =
            toml::from_str(content).map_err(|e| ConfigError::toml_error(source, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML profile from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let name = path.to_string_lossy().to_string();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(&name, e))?;
        Self::from_toml_str(&content, &name)
    }

    /// Checks that column indices are 1-based and that no column is declared
    /// both a date and a number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.date_columns.contains(&0) || self.number_columns.contains(&0) {
            return Err(ConfigError::invalid("columns are numbered from 1"));
        }

        if let Some(column) = self.date_columns.intersection(&self.number_columns).next() {
            return Err(ConfigError::invalid(format!(
                "column {} cannot be both a date and a number",
                column
            )));
        }

        Ok(())
    }

    pub fn classifier(&self) -> FieldClassifier {
        FieldClassifier::new(
            self.date_columns.iter().copied(),
            self.number_columns.iter().copied(),
        )
    }
}
