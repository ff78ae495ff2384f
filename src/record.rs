//! Lines and the per-file index that holds them.
//!
//! A [`Record`] is identified by its canonical text and its occurrence number,
//! never by its raw text or its position. When the same canonical line appears
//! several times in one file, the copies get occurrences 1, 2, 3... so that the
//! k-th copy in one file pairs with the k-th copy in the other.

use crate::error::FieldError;
use crate::field::FieldClassifier;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};

/// One line of a file.
#[derive(Debug, Clone)]
pub struct Record {
    raw: String,
    canonical: String,
    fields: Vec<String>,
    occurrence: usize,
}

impl Record {
    /// Builds the first occurrence of `raw`, canonicalized with `classifier`.
    pub fn parse(
        raw: impl Into<String>,
        separator: &str,
        classifier: &FieldClassifier,
    ) -> Result<Self, FieldError> {
        let raw = raw.into();
        let fields = classifier.canonical_fields(&raw, separator)?;

        Ok(Self {
            canonical: fields.join(separator),
            raw,
            fields,
            occurrence: 1,
        })
    }

    pub fn with_occurrence(mut self, occurrence: usize) -> Self {
        self.occurrence = occurrence;
        self
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// The canonical fields, as split from the raw line.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn occurrence(&self) -> usize {
        self.occurrence
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.occurrence == other.occurrence && self.canonical == other.canonical
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
        self.occurrence.hash(state);
    }
}

impl PartialOrd for Record {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Record {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical
            .cmp(&other.canonical)
            .then(self.occurrence.cmp(&other.occurrence))
    }
}

/// The records of one file, keyed by 1-based line number.
///
/// Besides the ordered `line -> record` map, a secondary `record -> line`
/// index answers "is this record present?" in constant time. Records are
/// unique within an index, so the secondary index is a plain map. The
/// highest occurrence pushed per canonical text is tracked as well.
#[derive(Debug, Clone, Default)]
pub struct FileIndex {
    lines: BTreeMap<usize, Record>,
    positions: HashMap<Record, usize>,
    occurrences: HashMap<String, usize>,
    next_line: usize,
}

impl FileIndex {
    pub fn new() -> Self {
        Self {
            next_line: 1,
            ..Self::default()
        }
    }

    /// Appends `record` under the next line number and returns that number.
    ///
    /// The caller is responsible for occurrence disambiguation, see
    /// [`FileIndex::next_occurrence`]. Pushing a record equal to one already
    /// present returns `None` and leaves the index unchanged.
    pub fn push(&mut self, record: Record) -> Option<usize> {
        if self.positions.contains_key(&record) {
            return None;
        }

        let line = self.next_line.max(1);
        self.next_line = line + 1;

        let highest = self
            .occurrences
            .entry(record.canonical.clone())
            .or_insert(0);
        *highest = (*highest).max(record.occurrence);

        self.positions.insert(record.clone(), line);
        self.lines.insert(line, record);

        Some(line)
    }

    /// The occurrence a new line with this canonical text must take: one past
    /// the highest pushed so far, or 1.
    pub fn next_occurrence(&self, canonical: &str) -> usize {
        self.occurrences.get(canonical).map_or(1, |highest| highest + 1)
    }

    pub fn get(&self, line: usize) -> Option<&Record> {
        self.lines.get(&line)
    }

    pub fn contains(&self, record: &Record) -> bool {
        self.positions.contains_key(record)
    }

    /// Returns the line number holding a record equal to `record`.
    pub fn line_of(&self, record: &Record) -> Option<usize> {
        self.positions.get(record).copied()
    }

    pub fn remove(&mut self, line: usize) -> Option<Record> {
        let record = self.lines.remove(&line)?;
        self.positions.remove(&record);
        Some(record)
    }

    /// Iterates in ascending line-number order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Record)> {
        self.lines.iter().map(|(line, record)| (*line, record))
    }

    pub fn first(&self) -> Option<(usize, &Record)> {
        self.lines.first_key_value().map(|(line, record)| (*line, record))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
