//! Reading delimited files into [`FileIndex`]es.
//!
//! Each physical line becomes a [`Record`] under a 1-based line number. Lines
//! that canonicalize identically receive increasing occurrence numbers. The two
//! files of a comparison are parsed on two worker threads that share nothing
//! but the run's [`CancellationToken`].
//!
//! # Examples
//!
//! ```
//! use fdiff_rs::parser::parse_content;
//! use fdiff_rs::{CancellationToken, FieldClassifier};
//!
//! let index = parse_content(
//!     "a;1\na;1\n",
//!     ";",
//!     &FieldClassifier::default(),
//!     &CancellationToken::new(),
//! )
//! .unwrap();
//!
//! assert_eq!(index.get(1).unwrap().occurrence(), 1);
//! assert_eq!(index.get(2).unwrap().occurrence(), 2);
//! ```

use crate::cancel::CancellationToken;
use crate::error::ParseError;
use crate::field::FieldClassifier;
use crate::record::{FileIndex, Record};
use crate::tokenizer::tokenize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// How long the waiting caller sleeps between two cancellation checks.
pub const POLL_INTERVAL: Duration = Duration::from_millis(2);

/// Parses a file into a [`FileIndex`].
///
/// If `cancel` is signalled while the file is being read, the whole result is
/// discarded and an empty index is returned.
///
/// # Errors
///
/// This function will return an error if:
/// - The file does not exist (`ParseError::FileNotFound`)
/// - The file cannot be read (`ParseError::ReadError`)
/// - A declared date column holds something else (`ParseError::InvalidField`)
pub fn parse_file(
    path: &Path,
    separator: &str,
    classifier: &FieldClassifier,
    cancel: &CancellationToken,
) -> Result<FileIndex, ParseError> {
    let name = path.to_string_lossy().to_string();

    if !path.exists() {
        return Err(ParseError::file_not_found(name));
    }

    info!(path = %name, "parsing file");

    let file = File::open(path).map_err(|e| ParseError::read_error(&name, e))?;
    let index = parse_reader(BufReader::new(file), &name, separator, classifier, cancel)?;

    info!(path = %name, lines = index.len(), "parsed file");

    Ok(index)
}

/// Parses in-memory text, mostly useful for tests and callers that already
/// hold the content.
pub fn parse_content(
    content: &str,
    separator: &str,
    classifier: &FieldClassifier,
    cancel: &CancellationToken,
) -> Result<FileIndex, ParseError> {
    parse_reader(content.as_bytes(), "<memory>", separator, classifier, cancel)
}

/// Reads the next physical line without its `\n` or `\r\n` terminator.
///
/// Bytes that are not valid UTF-8 (Latin-1 exports, for instance) are
/// replaced rather than failing the whole file.
fn read_line<R: BufRead>(reader: &mut R, buffer: &mut Vec<u8>) -> std::io::Result<Option<String>> {
    buffer.clear();
    if reader.read_until(b'\n', buffer)? == 0 {
        return Ok(None);
    }

    if buffer.last() == Some(&b'\n') {
        buffer.pop();
        if buffer.last() == Some(&b'\r') {
            buffer.pop();
        }
    }

    Ok(Some(String::from_utf8_lossy(buffer).into_owned()))
}

/// Parses line-oriented input read from `reader`. `source` names the input
/// in error messages.
pub fn parse_reader<R: BufRead>(
    mut reader: R,
    source: &str,
    separator: &str,
    classifier: &FieldClassifier,
    cancel: &CancellationToken,
) -> Result<FileIndex, ParseError> {
    let mut index = FileIndex::new();
    let mut buffer = Vec::new();
    let mut line_number = 0;

    loop {
        if cancel.is_cancelled() {
            debug!(source, "parsing cancelled");
            return Ok(FileIndex::new());
        }

        let Some(line) =
            read_line(&mut reader, &mut buffer).map_err(|e| ParseError::read_error(source, e))?
        else {
            break;
        };
        line_number += 1;

        let record = Record::parse(line, separator, classifier)
            .map_err(|e| ParseError::invalid_field(source, line_number, e))?;

        let occurrence = index.next_occurrence(record.canonical());
        let record = if occurrence > 1 {
            if cancel.is_cancelled() {
                debug!(source, "parsing cancelled");
                return Ok(FileIndex::new());
            }
            record.with_occurrence(occurrence)
        } else {
            record
        };

        index.push(record);
    }

    Ok(index)
}

/// Returns the fields of the first line of `path` that contains `separator`,
/// or nothing if no line does. Helps picking date and number columns.
pub fn preview_columns(path: &Path, separator: &str) -> Result<Vec<String>, ParseError> {
    let name = path.to_string_lossy().to_string();

    if !path.exists() {
        return Err(ParseError::file_not_found(name));
    }
    if separator.is_empty() {
        return Ok(Vec::new());
    }

    let file = File::open(path).map_err(|e| ParseError::read_error(&name, e))?;
    let mut reader = BufReader::new(file);
    let mut buffer = Vec::new();

    while let Some(line) =
        read_line(&mut reader, &mut buffer).map_err(|e| ParseError::read_error(&name, e))?
    {
        if line.contains(separator) {
            return Ok(tokenize(&line, separator));
        }
    }

    Ok(Vec::new())
}

/// Outcome of parsing both files of a run.
pub type ParsedPair = (
    Result<FileIndex, ParseError>,
    Result<FileIndex, ParseError>,
);

/// Parses both files concurrently, one worker thread per file.
///
/// The caller blocks until both workers are done, checking `cancel` while it
/// waits. Returns `None` as soon as cancellation is observed; the workers see
/// the same token and stop at their next line.
pub fn parse_pair(
    first: &Path,
    second: &Path,
    separator: &str,
    classifier: &FieldClassifier,
    cancel: &CancellationToken,
) -> Option<ParsedPair> {
    let first = Worker::spawn("fdiff-parse-1", first, separator, classifier, cancel);
    let second = Worker::spawn("fdiff-parse-2", second, separator, classifier, cancel);

    loop {
        if cancel.is_cancelled() {
            info!("comparison cancelled while parsing the files");
            return None;
        }
        if first.is_finished() && second.is_finished() {
            break;
        }
        thread::sleep(POLL_INTERVAL);
    }

    Some((first.join(), second.join()))
}

enum Worker {
    Running {
        path: PathBuf,
        handle: JoinHandle<Result<FileIndex, ParseError>>,
    },
    Done(Result<FileIndex, ParseError>),
}

impl Worker {
    fn spawn(
        name: &str,
        path: &Path,
        separator: &str,
        classifier: &FieldClassifier,
        cancel: &CancellationToken,
    ) -> Self {
        let worker_path = path.to_path_buf();
        let worker_separator = separator.to_string();
        let worker_classifier = classifier.clone();
        let worker_cancel = cancel.clone();

        let spawned = thread::Builder::new().name(name.to_string()).spawn(move || {
            parse_file(
                &worker_path,
                &worker_separator,
                &worker_classifier,
                &worker_cancel,
            )
        });

        match spawned {
            Ok(handle) => Worker::Running {
                path: path.to_path_buf(),
                handle,
            },
            Err(e) => {
                // Without a thread the file is parsed on the caller's.
                warn!(worker = name, error = %e, "could not spawn parse worker");
                Worker::Done(parse_file(path, separator, classifier, cancel))
            }
        }
    }

    fn is_finished(&self) -> bool {
        match self {
            Worker::Running { handle, .. } => handle.is_finished(),
            Worker::Done(_) => true,
        }
    }

    fn join(self) -> Result<FileIndex, ParseError> {
        match self {
            Worker::Running { path, handle } => handle
                .join()
                .unwrap_or_else(|_| Err(ParseError::worker_panicked(path.to_string_lossy()))),
            Worker::Done(result) => result,
        }
    }
}
