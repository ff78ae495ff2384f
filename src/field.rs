//! Typed field values and the rules that classify raw tokens.
//!
//! Every field of a line is read as a date, a number or a plain string. Dates
//! and numbers are rewritten to a canonical text so that `" 1000 "` and
//! `"1000"`, or `"24/03/2013"` and `"20130324"`, produce the same canonical
//! line.
//!
//! # Examples
//!
//! ```
//! use fdiff_rs::field::{Field, FieldClassifier};
//!
//! let classifier = FieldClassifier::default();
//! let canonical = classifier.canonicalize("24/03/2013; 1000 ;abc", ";").unwrap();
//! assert_eq!(canonical, "2013-03-24T00:00:00;1000;abc");
//!
//! assert!(matches!(classifier.classify(1, "20130324"), Ok(Field::Date(_))));
//! ```

use crate::error::FieldError;
use crate::tokenizer::fields;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// Textual form every parsed date is rewritten to.
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A classified field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    String(String),
    Number(f64),
    Date(NaiveDateTime),
}

impl Field {
    pub fn type_name(&self) -> &str {
        match self {
            Field::String(_) => "string",
            Field::Number(_) => "number",
            Field::Date(_) => "date",
        }
    }

    /// Returns the canonical text of the value.
    pub fn canonical(&self) -> String {
        match self {
            Field::String(s) => s.clone(),
            Field::Number(n) => n.to_string(),
            Field::Date(d) => d.format(CANONICAL_DATE_FORMAT).to_string(),
        }
    }
}

/// The accepted date layouts, tried in declaration order.
///
/// Month and day names use English abbreviations (`Mar`, `Sun`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePattern {
    /// `dd/MM/yyyy`, e.g. `24/03/2013`
    DayMonthYear,
    /// `yyyyMMdd`, e.g. `20130324`
    CompactYearMonthDay,
    /// `MMM dd yyyy hh:mma`, e.g. `Mar 24 2013 10:30PM`
    MonthDayYearClock,
    /// `EEE MMM dd HH:mm:ss z yyyy`, e.g. `Sun Mar 24 22:30:00 CET 2013`
    Timestamp,
}

impl DatePattern {
    pub const ALL: [DatePattern; 4] = [
        DatePattern::DayMonthYear,
        DatePattern::CompactYearMonthDay,
        DatePattern::MonthDayYearClock,
        DatePattern::Timestamp,
    ];

    /// Parses the whole token with this pattern.
    pub fn parse(&self, token: &str) -> Option<NaiveDateTime> {
        match self {
            DatePattern::DayMonthYear => parse_day(token, "%d/%m/%Y"),
            DatePattern::CompactYearMonthDay => {
                if token.len() != 8 || !token.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                parse_day(token, "%Y%m%d")
            }
            DatePattern::MonthDayYearClock => {
                NaiveDateTime::parse_from_str(token, "%b %d %Y %I:%M%p").ok()
            }
            DatePattern::Timestamp => parse_timestamp(token),
        }
    }
}

fn parse_day(token: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(token, format)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// The zone abbreviation is checked for shape and then ignored: the instant is
/// the wall-clock time as written.
fn parse_timestamp(token: &str) -> Option<NaiveDateTime> {
    let parts: Vec<&str> = token.split(' ').collect();
    if parts.len() != 6 {
        return None;
    }

    let zone = parts[4];
    if zone.is_empty() || !zone.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let without_zone = format!(
        "{} {} {} {} {}",
        parts[0], parts[1], parts[2], parts[3], parts[5]
    );
    NaiveDateTime::parse_from_str(&without_zone, "%a %b %d %H:%M:%S %Y").ok()
}

/// Parses a token with the first [`DatePattern`] that accepts it.
pub fn parse_date(token: &str) -> Option<NaiveDateTime> {
    DatePattern::ALL
        .iter()
        .find_map(|pattern| pattern.parse(token))
}

/// Returns true if at least one [`DatePattern`] parses the whole token.
pub fn is_date(token: &str) -> bool {
    parse_date(token).is_some()
}

/// Removes every whitespace character, non-breaking spaces included.
pub fn strip_whitespace(token: &str) -> String {
    token
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .collect()
}

/// Parses a token as a finite decimal number once whitespace is stripped.
///
/// Only digits, signs, a decimal point and an exponent marker are accepted,
/// so words such as `inf` or `NaN` stay strings.
pub fn parse_number(token: &str) -> Option<f64> {
    let stripped = strip_whitespace(token);

    if !stripped.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    if !stripped
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }

    stripped.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Decides how each field of a line is interpreted.
///
/// Column sets are 1-based. An empty set means "detect automatically": with no
/// date columns every token that parses as a date is a date, with no number
/// columns every token that parses as a number is a number. A non-empty set
/// restricts the type to the listed columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldClassifier {
    date_columns: BTreeSet<usize>,
    number_columns: BTreeSet<usize>,
}

impl FieldClassifier {
    pub fn new(
        date_columns: impl IntoIterator<Item = usize>,
        number_columns: impl IntoIterator<Item = usize>,
    ) -> Self {
        Self {
            date_columns: date_columns.into_iter().collect(),
            number_columns: number_columns.into_iter().collect(),
        }
    }

    pub fn date_columns(&self) -> &BTreeSet<usize> {
        &self.date_columns
    }

    pub fn number_columns(&self) -> &BTreeSet<usize> {
        &self.number_columns
    }

    /// Classifies the token found at 1-based position `column`.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::InvalidDate` when `column` is declared as a date
    /// column and the token matches no date pattern.
    pub fn classify(&self, column: usize, token: &str) -> Result<Field, FieldError> {
        if self.date_columns.is_empty() {
            if let Some(date) = parse_date(token) {
                return Ok(Field::Date(date));
            }
        } else if self.date_columns.contains(&column) {
            return parse_date(token)
                .map(Field::Date)
                .ok_or_else(|| FieldError::InvalidDate {
                    column,
                    token: token.to_string(),
                });
        }

        let declared = !self.number_columns.is_empty();
        if !declared || self.number_columns.contains(&column) {
            if let Some(number) = parse_number(token) {
                return Ok(Field::Number(number));
            }
            if declared {
                debug!(column, token, "declared number column holds non-numeric text");
            }
        }

        Ok(Field::String(token.to_string()))
    }

    /// Rewrites every field of `line` to its canonical text.
    ///
    /// Canonical dates may contain the separator, so callers that need the
    /// fields again keep this list instead of splitting the joined line.
    pub fn canonical_fields(&self, line: &str, separator: &str) -> Result<Vec<String>, FieldError> {
        let tokens = fields(line, separator);
        let mut canonical = Vec::with_capacity(tokens.len());

        for (index, token) in tokens.iter().enumerate() {
            let field = self.classify(index + 1, token)?;
            trace!(column = index + 1, kind = field.type_name(), "classified field");
            canonical.push(field.canonical());
        }

        Ok(canonical)
    }

    /// Canonical fields joined back with `separator`.
    pub fn canonicalize(&self, line: &str, separator: &str) -> Result<String, FieldError> {
        Ok(self.canonical_fields(line, separator)?.join(separator))
    }
}
