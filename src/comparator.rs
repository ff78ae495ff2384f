//! Field-by-field comparison of two paired lines.

use crate::field::{parse_date, parse_number};
use crate::record::Record;
use crate::report::DiffReport;
use tracing::trace;

/// Returns true if two tokens found at the same position denote the same value.
///
/// Identical text is equal. Otherwise two numbers are compared by value, then
/// two dates by instant. Anything else is a plain string mismatch.
///
/// # Examples
///
/// ```
/// use fdiff_rs::comparator::tokens_equal;
///
/// assert!(tokens_equal("1000", " 1000 "));
/// assert!(tokens_equal("24/03/2013", "20130324"));
/// assert!(!tokens_equal("abc", "abd"));
/// ```
pub fn tokens_equal(first: &str, second: &str) -> bool {
    if first == second {
        return true;
    }

    if let (Some(a), Some(b)) = (parse_number(first), parse_number(second)) {
        return a == b;
    }

    if let (Some(a), Some(b)) = (parse_date(first), parse_date(second)) {
        return a == b;
    }

    false
}

/// Compares paired lines field by field.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldComparator;

impl FieldComparator {
    pub fn new() -> Self {
        Self
    }

    /// Reports the differing canonical fields of two paired records under
    /// `line`.
    pub fn compare_records(
        &self,
        line: usize,
        first: &Record,
        second: &Record,
        report: &mut DiffReport,
    ) {
        self.compare_fields(line, first.fields(), second.fields(), report);
    }

    /// Reports every position where the two field lists disagree.
    ///
    /// Lists of different lengths yield a single field-count message instead.
    pub fn compare_fields(
        &self,
        line: usize,
        first: &[String],
        second: &[String],
        report: &mut DiffReport,
    ) {
        trace!(line, "comparing line field by field");

        if first.len() != second.len() {
            report.field_count_mismatch(line);
            return;
        }

        for (index, (a, b)) in first.iter().zip(second).enumerate() {
            if !tokens_equal(a, b) {
                report.field_difference(line, index + 1, a, b);
            }
        }
    }
}
