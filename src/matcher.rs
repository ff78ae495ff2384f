//! Pairing of the lines of two files.
//!
//! Two strategies are available:
//!
//! - [`MatchStrategy::Unordered`] pairs lines by content, wherever they sit in
//!   the second file. For each line of the first file, in order, it takes the
//!   first still-unpaired line of the second file that is identical, then the
//!   first that is textually equal or within 10% edit distance, and finally,
//!   if nothing qualifies, simply the first unpaired line. Pairings are greedy
//!   and never revisited.
//! - [`MatchStrategy::Ordered`] pairs lines by line number.
//!
//! Paired lines whose canonical text differs are compared field by field.
//!
//! # Examples
//!
//! ```
//! use fdiff_rs::parser::parse_content;
//! use fdiff_rs::{CancellationToken, DiffReport, FieldClassifier, MatchEngine, MatchStrategy};
//!
//! let cancel = CancellationToken::new();
//! let classifier = FieldClassifier::default();
//! let first = parse_content("a;1\nb;2\n", ";", &classifier, &cancel).unwrap();
//! let second = parse_content("b;2\na;1\n", ";", &classifier, &cancel).unwrap();
//!
//! let mut report = DiffReport::new();
//! MatchEngine::new(MatchStrategy::Unordered, &cancel).run(&first, &second, &mut report);
//! assert_eq!(report.difference_count(), 0);
//! ```

use crate::cancel::CancellationToken;
use crate::comparator::FieldComparator;
use crate::record::{FileIndex, Record};
use crate::report::DiffReport;
use tracing::{debug, info};

/// How lines of the first file find their counterpart in the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchStrategy {
    /// Content-based, position-agnostic pairing
    #[default]
    Unordered,
    /// Same line number in both files
    Ordered,
}

impl MatchStrategy {
    pub fn from_ordered(ordered: bool) -> Self {
        if ordered {
            MatchStrategy::Ordered
        } else {
            MatchStrategy::Unordered
        }
    }
}

/// How a matching pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Every line of the first file was examined
    Completed,
    /// The difference limit was exceeded and a notice appended
    Truncated,
    /// The run's cancellation token was signalled
    Cancelled,
}

/// A candidate accepted by the similarity scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Candidate {
    /// Same canonical text, different occurrence
    Textual(usize),
    /// Within the edit-distance threshold
    Fuzzy(usize),
}

enum Scan {
    Found(Candidate),
    NotFound,
    Cancelled,
}

/// Runs one matching pass and feeds the differences into a [`DiffReport`].
pub struct MatchEngine<'a> {
    strategy: MatchStrategy,
    comparator: FieldComparator,
    cancel: &'a CancellationToken,
}

impl<'a> MatchEngine<'a> {
    pub fn new(strategy: MatchStrategy, cancel: &'a CancellationToken) -> Self {
        Self {
            strategy,
            comparator: FieldComparator::new(),
            cancel,
        }
    }

    /// Matches the lines of `first` against those of `second`.
    pub fn run(&self, first: &FileIndex, second: &FileIndex, report: &mut DiffReport) -> MatchOutcome {
        match self.strategy {
            MatchStrategy::Unordered => self.match_unordered(first, second, report),
            MatchStrategy::Ordered => self.match_ordered(first, second, report),
        }
    }

    /// Checks done before each line of the first file.
    fn should_stop(&self, report: &mut DiffReport) -> Option<MatchOutcome> {
        if self.cancel.is_cancelled() {
            info!("comparison cancelled while matching lines");
            return Some(MatchOutcome::Cancelled);
        }

        if report.over_limit() {
            info!(
                differences = report.difference_count(),
                "difference limit exceeded"
            );
            report.truncation();
            return Some(MatchOutcome::Truncated);
        }

        None
    }

    fn match_unordered(
        &self,
        first: &FileIndex,
        second: &FileIndex,
        report: &mut DiffReport,
    ) -> MatchOutcome {
        info!(
            lines = first.len(),
            candidates = second.len(),
            "matching lines, order ignored"
        );

        let mut pool = second.clone();

        for (key, record) in first.iter() {
            if let Some(outcome) = self.should_stop(report) {
                return outcome;
            }

            if let Some(line) = pool.line_of(record) {
                debug!(line = key, candidate = line, "exact match");
                pool.remove(line);
                continue;
            }

            let paired = match self.scan(record, &pool) {
                Scan::Cancelled => {
                    info!("comparison cancelled while matching lines");
                    return MatchOutcome::Cancelled;
                }
                Scan::Found(Candidate::Textual(line)) => {
                    debug!(line = key, candidate = line, "textual match");
                    pool.remove(line);
                    continue;
                }
                Scan::Found(Candidate::Fuzzy(line)) => {
                    debug!(line = key, candidate = line, "fuzzy match");
                    Some(line)
                }
                Scan::NotFound => {
                    let fallback = pool.first().map(|(line, _)| line);
                    match fallback {
                        Some(line) => debug!(line = key, candidate = line, "fallback match"),
                        None => debug!(line = key, "no candidate left"),
                    }
                    fallback
                }
            };

            if let Some(line) = paired {
                if let Some(candidate) = pool.remove(line) {
                    self.comparator
                        .compare_records(line, record, &candidate, report);
                }
            }
        }

        MatchOutcome::Completed
    }

    /// Looks for the first candidate, in line order, that has the same
    /// canonical text as `record` or lies within its edit-distance threshold.
    fn scan(&self, record: &Record, pool: &FileIndex) -> Scan {
        let needle = record.canonical();
        let needle_len = needle.chars().count();
        let threshold = fuzzy_threshold(needle);

        for (line, candidate) in pool.iter() {
            if self.cancel.is_cancelled() {
                return Scan::Cancelled;
            }

            let text = candidate.canonical();
            if text == needle {
                return Scan::Found(Candidate::Textual(line));
            }

            // The length gap is a lower bound of the edit distance.
            if text.chars().count().abs_diff(needle_len) > threshold {
                continue;
            }

            if strsim::levenshtein(needle, text) <= threshold {
                return Scan::Found(Candidate::Fuzzy(line));
            }
        }

        Scan::NotFound
    }

    fn match_ordered(
        &self,
        first: &FileIndex,
        second: &FileIndex,
        report: &mut DiffReport,
    ) -> MatchOutcome {
        info!(
            lines = first.len(),
            candidates = second.len(),
            "matching lines in order"
        );

        for (key, record) in first.iter() {
            if let Some(outcome) = self.should_stop(report) {
                return outcome;
            }

            match second.get(key) {
                None => report.missing_line(key),
                Some(other) if other.fields() != record.fields() => {
                    self.comparator.compare_records(key, record, other, report);
                }
                Some(_) => {}
            }
        }

        MatchOutcome::Completed
    }
}

/// Largest edit distance at which a candidate still counts as similar to
/// `needle`: a tenth of its length, rounded down.
pub fn fuzzy_threshold(needle: &str) -> usize {
    needle.chars().count() / 10
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldClassifier;
    use crate::parser::parse_content;

    fn index(content: &str) -> FileIndex {
        parse_content(
            content,
            ";",
            &FieldClassifier::default(),
            &CancellationToken::new(),
        )
        .unwrap()
    }

    fn run(strategy: MatchStrategy, first: &str, second: &str) -> (MatchOutcome, DiffReport) {
        let cancel = CancellationToken::new();
        let mut report = DiffReport::new();
        let outcome = MatchEngine::new(strategy, &cancel).run(
            &index(first),
            &index(second),
            &mut report,
        );
        (outcome, report)
    }

    const SAMPLE: &str = "abcdefghijklmnopqrst";

    #[test]
    fn test_strategy_from_ordered() {
        assert_eq!(MatchStrategy::from_ordered(true), MatchStrategy::Ordered);
        assert_eq!(MatchStrategy::from_ordered(false), MatchStrategy::Unordered);
        assert_eq!(MatchStrategy::default(), MatchStrategy::Unordered);
    }

    #[test]
    fn test_fuzzy_threshold() {
        assert_eq!(fuzzy_threshold(""), 0);
        assert_eq!(fuzzy_threshold("123456789"), 0);
        assert_eq!(fuzzy_threshold(SAMPLE), 2);
    }

    #[test]
    fn test_identical_files_both_strategies() {
        let content = "a;1;x\nb;2;y\nb;2;y\n";
        for strategy in [MatchStrategy::Unordered, MatchStrategy::Ordered] {
            let (outcome, report) = run(strategy, content, content);
            assert_eq!(outcome, MatchOutcome::Completed);
            assert!(report.is_empty());
        }
    }

    #[test]
    fn test_unordered_ignores_line_order() {
        let (_, report) = run(MatchStrategy::Unordered, "a\nb\nc\n", "c\na\nb\n");
        assert!(report.is_empty());
    }

    #[test]
    fn test_unordered_pairs_duplicates_by_occurrence() {
        let (_, report) = run(MatchStrategy::Unordered, "X\nX\nX\n", "X\nX\nX\n");
        assert!(report.is_empty());
    }

    #[test]
    fn test_unordered_single_field_change() {
        let (_, report) = run(
            MatchStrategy::Unordered,
            "alpha;beta;gamma;delta\nsecond;line;of;text\n",
            "alpha;beta;gamma;delta\nsecond;lime;of;text\n",
        );
        assert_eq!(report.text(), "Line 2, field 2 : line → lime\n");
    }

    #[test]
    fn test_unordered_reports_candidate_line_number() {
        let (_, report) = run(
            MatchStrategy::Unordered,
            "first;row;value;1000\n",
            "other;stuff;entirely;here\nfirst;row;value;1001\n",
        );
        assert_eq!(report.text(), "Line 2, field 4 : 1000 → 1001\n");
    }

    #[test]
    fn test_fuzzy_match_at_threshold() {
        // Distance 2 from a 20-character line: accepted, skipping line 1.
        let (_, report) = run(
            MatchStrategy::Unordered,
            &format!("{}\n", SAMPLE),
            "zzzzzzzzzzzzzzzzzzzz\nabcdefghijklmnopqrXY\n",
        );
        assert_eq!(
            report.text(),
            "Line 2, field 1 : abcdefghijklmnopqrst → abcdefghijklmnopqrXY\n"
        );
    }

    #[test]
    fn test_beyond_threshold_falls_back_to_first_candidate() {
        // Distance 3: not similar, so the first remaining line is taken.
        let (_, report) = run(
            MatchStrategy::Unordered,
            &format!("{}\n", SAMPLE),
            "zzzzzzzzzzzzzzzzzzzz\nabcdefghijklmnopqXYZ\n",
        );
        assert_eq!(
            report.text(),
            "Line 1, field 1 : abcdefghijklmnopqrst → zzzzzzzzzzzzzzzzzzzz\n"
        );
    }

    #[test]
    fn test_textual_match_despite_occurrence() {
        let record = |text: &str| Record::parse(text, ";", &FieldClassifier::default()).unwrap();

        let mut first = FileIndex::new();
        first.push(record("x"));

        let mut second = FileIndex::new();
        second.push(record("y"));
        second.push(record("x").with_occurrence(2));

        let cancel = CancellationToken::new();
        let mut report = DiffReport::new();
        let outcome =
            MatchEngine::new(MatchStrategy::Unordered, &cancel).run(&first, &second, &mut report);

        assert_eq!(outcome, MatchOutcome::Completed);
        assert!(report.is_empty());
    }

    #[test]
    fn test_candidates_are_consumed_once() {
        // The second "x" has nothing left to pair with but "y".
        let (_, report) = run(MatchStrategy::Unordered, "x\nx\n", "x\ny\n");
        assert_eq!(report.text(), "Line 2, field 1 : x → y\n");
    }

    #[test]
    fn test_exhausted_pool_skips_remaining_lines() {
        let (outcome, report) = run(MatchStrategy::Unordered, "a\nb\nc\n", "a\n");
        assert_eq!(outcome, MatchOutcome::Completed);
        assert!(report.is_empty());
    }

    #[test]
    fn test_unordered_is_asymmetric() {
        let (_, report) = run(MatchStrategy::Unordered, "a\n", "a\nb\n");
        assert!(report.is_empty());
    }

    #[test]
    fn test_unordered_field_count_mismatch() {
        let (_, report) = run(MatchStrategy::Unordered, "a;b\n", "c;d;e\n");
        assert_eq!(
            report.text(),
            "Line 1 has not the same number of fields in both files\n"
        );
    }

    #[test]
    fn test_ordered_single_field_change() {
        let (_, report) = run(MatchStrategy::Ordered, "a;1\nb;2\n", "a;1\nb;3\n");
        assert_eq!(report.text(), "Line 2, field 2 : 2 → 3\n");
    }

    #[test]
    fn test_ordered_is_position_based() {
        let (_, report) = run(MatchStrategy::Ordered, "a\nb\n", "b\na\n");
        assert_eq!(
            report.text(),
            "Line 1, field 1 : a → b\nLine 2, field 1 : b → a\n"
        );
    }

    #[test]
    fn test_ordered_missing_lines() {
        let (_, report) = run(MatchStrategy::Ordered, "a\nb\nc\n", "a\n");
        assert_eq!(
            report.text(),
            "Line 2 : Not present in file 2\nLine 3 : Not present in file 2\n"
        );
    }

    #[test]
    fn test_ordered_equal_canonical_text_is_not_compared() {
        let (_, report) = run(MatchStrategy::Ordered, "x;24/03/2013\n", "x;20130324\n");
        assert!(report.is_empty());
    }

    #[test]
    fn test_difference_limit_truncates() {
        let first: String = (1..=1005).map(|i| format!("a{}\n", i)).collect();
        let second: String = (1..=1005).map(|i| format!("b{}\n", i)).collect();

        let (outcome, report) = run(MatchStrategy::Ordered, &first, &second);

        assert_eq!(outcome, MatchOutcome::Truncated);
        assert_eq!(report.difference_count(), 1002);
        assert!(report.text().contains("Line 1001, field 1"));
        assert!(!report.text().contains("Line 1002, field 1"));
        assert!(report
            .text()
            .ends_with("Only the first 1001 are displayed.\n"));
    }

    #[test]
    fn test_unordered_difference_limit_truncates() {
        // Nothing is similar, so every line falls back to the first candidate
        // left, which is the line with the same number.
        let first: String = (1..=1005).map(|i| format!("a{}\n", i)).collect();
        let second: String = (1..=1005).map(|i| format!("b{}\n", i)).collect();

        let (outcome, report) = run(MatchStrategy::Unordered, &first, &second);

        assert_eq!(outcome, MatchOutcome::Truncated);
        assert_eq!(report.difference_count(), 1002);
        assert!(report.text().contains("Line 1001, field 1 : a1001 → b1001\n"));
        assert!(!report.text().contains("Line 1002, field 1"));
        assert!(report
            .text()
            .ends_with("Only the first 1001 are displayed.\n"));
    }

    #[test]
    fn test_cancelled_while_matching() {
        // Every line scans the whole pool, far longer than the delay below.
        let first: String = (0..20_000).map(|i| format!("a{:08}\n", i)).collect();
        let second: String = (0..20_000).map(|i| format!("b{:08}\n", i)).collect();
        let (first, second) = (index(&first), index(&second));

        let cancel = CancellationToken::new();
        let canceller = cancel.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(50));
            canceller.cancel();
        });

        let mut report = DiffReport::new();
        let outcome =
            MatchEngine::new(MatchStrategy::Unordered, &cancel).run(&first, &second, &mut report);
        handle.join().unwrap();

        assert_eq!(outcome, MatchOutcome::Cancelled);
        assert!(!report.text().contains("Only the first"));
    }

    #[test]
    fn test_cancelled_before_matching() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        for strategy in [MatchStrategy::Unordered, MatchStrategy::Ordered] {
            let mut report = DiffReport::new();
            let outcome = MatchEngine::new(strategy, &cancel).run(
                &index("a\n"),
                &index("b\n"),
                &mut report,
            );
            assert_eq!(outcome, MatchOutcome::Cancelled);
            assert!(report.is_empty());
        }
    }
}
