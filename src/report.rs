//! Accumulation and rendering of difference messages.
//!
//! The number of differences is the number of line breaks in the accumulated
//! text. Every message, including the truncation notice and per-file parse
//! failures, therefore counts once it is appended.
//!
//! # Examples
//!
//! ```
//! use fdiff_rs::DiffReport;
//!
//! let mut report = DiffReport::new();
//! report.field_difference(3, 2, "abc", "abd");
//!
//! assert_eq!(report.difference_count(), 1);
//! assert_eq!(
//!     report.render(),
//!     "Line 3, field 2 : abc → abd\n\n1 difference(s) found\n"
//! );
//! ```

use std::fmt::Display;

/// Past this many differences a run stops examining further lines.
pub const MAX_DIFFERENCES: usize = 1000;

/// Glyph printed between the two values of a field difference.
pub const DIVIDER: &str = "→";

pub const EXACT_MATCH: &str = "Files exactly match";

/// The difference messages of one comparison run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffReport {
    text: String,
    line_breaks: usize,
}

impl DiffReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends raw text. Each `\n` in it counts as one difference.
    pub fn append(&mut self, text: &str) {
        self.line_breaks += text.matches('\n').count();
        self.text.push_str(text);
    }

    pub fn difference_count(&self) -> usize {
        self.line_breaks
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// True once more than [`MAX_DIFFERENCES`] have been accumulated.
    pub fn over_limit(&self) -> bool {
        self.difference_count() > MAX_DIFFERENCES
    }

    /// The accumulated messages, without summary.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    pub fn field_difference(
        &mut self,
        line: usize,
        field: usize,
        first: impl Display,
        second: impl Display,
    ) {
        self.append(&format!(
            "Line {}, field {} : {} {} {}\n",
            line, field, first, DIVIDER, second
        ));
    }

    pub fn field_count_mismatch(&mut self, line: usize) {
        self.append(&format!(
            "Line {} has not the same number of fields in both files\n",
            line
        ));
    }

    pub fn missing_line(&mut self, line: usize) {
        self.append(&format!("Line {} : Not present in file 2\n", line));
    }

    pub fn parse_failure(&mut self, path: impl Display, error: impl Display) {
        self.append(&format!("Problem while parsing file {}: {}\n", path, error));
    }

    /// Appends the notice that further lines will not be examined.
    pub fn truncation(&mut self) {
        let shown = self.difference_count();
        self.append(&format!(
            "There are more than {} differences. Only the first {} are displayed.\n",
            MAX_DIFFERENCES, shown
        ));
    }

    /// The closing line: the exact-match notice or the difference total.
    pub fn summary(&self) -> String {
        match self.difference_count() {
            0 => EXACT_MATCH.to_string(),
            n => format!("{} difference(s) found", n),
        }
    }

    /// Renders the messages followed by the summary.
    pub fn render(&self) -> String {
        let mut rendered = self.text.clone();

        if self.difference_count() == 0 {
            rendered.push_str(EXACT_MATCH);
            rendered.push('\n');
        } else {
            rendered.push('\n');
            rendered.push_str(&self.summary());
            rendered.push('\n');
        }

        rendered
    }
}
