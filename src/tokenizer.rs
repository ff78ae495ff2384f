//! Splitting of delimited lines into fields.
//!
//! Separators are literal strings, never patterns: `"||"` splits on the two
//! characters `||` only. Empty fields are always preserved so that field
//! positions stay aligned between two lines.
//!
//! # Examples
//!
//! ```
//! use fdiff_rs::tokenizer::tokenize;
//!
//! assert_eq!(tokenize("a;;b", ";"), vec!["a", "", "b"]);
//! assert!(tokenize("", ";").is_empty());
//! ```

/// Splits `line` on the whole `separator` string, keeping empty fields at the
/// start, in the middle and at the end.
///
/// An empty `line` or an empty `separator` yields no fields at all.
pub fn tokenize(line: &str, separator: &str) -> Vec<String> {
    if line.is_empty() || separator.is_empty() {
        return Vec::new();
    }

    line.split(separator).map(str::to_string).collect()
}

/// Splits a line the way the comparison engine sees it.
///
/// Same as [`tokenize`], except that a non-empty line read with an empty
/// separator is one single field. This keeps files without any field
/// structure comparable line by line.
pub fn fields(line: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() && !line.is_empty() {
        return vec![line.to_string()];
    }

    tokenize(line, separator)
}
