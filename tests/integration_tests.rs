//! Integration tests for the FDIFF CLI tool.
//!
//! These tests verify the complete end-to-end behavior of the CLI,
//! including argument parsing, configuration profiles, file processing,
//! output formatting and exit codes.

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to create a Command for the fdiff-rs binary
fn fdiff() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("fdiff-rs"))
}

#[test]
fn test_identical_files_exit_0() {
    fdiff()
        .arg("tests/fixtures/people_old.txt")
        .arg("tests/fixtures/people_old.txt")
        .args(["--format", "plain"])
        .assert()
        .success()
        .code(0)
        .stdout("Files exactly match\n");
}

#[test]
fn test_reformatted_dates_and_numbers_match() {
    fdiff()
        .arg("tests/fixtures/people_old.txt")
        .arg("tests/fixtures/people_reformatted.txt")
        .args(["--format", "plain"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Files exactly match"));
}

#[test]
fn test_explicit_date_column_still_matches() {
    fdiff()
        .arg("tests/fixtures/pipe_old.txt")
        .arg("tests/fixtures/pipe_new.txt")
        .args(["-s", "|", "--dates", "2", "--numbers", "3", "--format", "plain"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Files exactly match"));
}

#[test]
fn test_one_changed_field_exit_1() {
    fdiff()
        .arg("tests/fixtures/people_old.txt")
        .arg("tests/fixtures/people_changed.txt")
        .args(["--format", "plain"])
        .assert()
        .code(1)
        .stdout("Line 4, field 4 : 300 → 310\n\n1 difference(s) found\n");
}

#[test]
fn test_shuffled_lines_match_when_unordered() {
    fdiff()
        .arg("tests/fixtures/people_old.txt")
        .arg("tests/fixtures/people_shuffled.txt")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Files exactly match"));
}

#[test]
fn test_shuffled_lines_differ_when_ordered() {
    fdiff()
        .arg("tests/fixtures/people_old.txt")
        .arg("tests/fixtures/people_shuffled.txt")
        .args(["--ordered", "--format", "plain"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Line 2, field 2 : Alice → Carol"))
        .stdout(predicate::str::contains("difference(s) found"));
}

#[test]
fn test_missing_line_when_ordered() {
    fdiff()
        .arg("tests/fixtures/people_old.txt")
        .arg("tests/fixtures/people_short.txt")
        .args(["-o", "-f", "plain"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Line 3 : Not present in file 2"))
        .stdout(predicate::str::contains("Line 4 : Not present in file 2"))
        .stdout(predicate::str::contains("2 difference(s) found"));
}

#[test]
fn test_bad_date_column_is_reported() {
    fdiff()
        .arg("tests/fixtures/people_old.txt")
        .arg("tests/fixtures/people_old.txt")
        .args(["--dates", "2", "--format", "plain"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Problem while parsing file"))
        .stdout(predicate::str::contains("2 difference(s) found"));
}

#[test]
fn test_file_not_found_exit_2() {
    fdiff()
        .arg("tests/fixtures/nonexistent.txt")
        .arg("tests/fixtures/people_old.txt")
        .assert()
        .failure()
        .code(2)
        .stdout(predicate::str::contains("Two valid files must be specified"));
}

#[test]
fn test_missing_second_file_argument() {
    fdiff()
        .arg("tests/fixtures/people_old.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("FILE2"));
}

#[test]
fn test_json_output() {
    fdiff()
        .arg("tests/fixtures/people_old.txt")
        .arg("tests/fixtures/people_changed.txt")
        .args(["--format", "json"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"status\": \"completed\""))
        .stdout(predicate::str::contains("\"difference_count\": 1"))
        .stdout(predicate::str::contains("Line 4, field 4 : 300 → 310"));
}

#[test]
fn test_quiet_prints_nothing() {
    fdiff()
        .arg("tests/fixtures/people_old.txt")
        .arg("tests/fixtures/people_changed.txt")
        .arg("--quiet")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_both_ways_finds_extra_lines() {
    fdiff()
        .arg("tests/fixtures/people_short.txt")
        .arg("tests/fixtures/people_old.txt")
        .args(["--both-ways", "--ordered", "--format", "plain"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "=== tests/fixtures/people_short.txt -> tests/fixtures/people_old.txt ===\nFiles exactly match",
        ))
        .stdout(predicate::str::contains(
            "=== tests/fixtures/people_old.txt -> tests/fixtures/people_short.txt ===",
        ))
        .stdout(predicate::str::contains("Line 3 : Not present in file 2"));
}

#[test]
fn test_both_ways_identical_exit_0() {
    fdiff()
        .arg("tests/fixtures/people_old.txt")
        .arg("tests/fixtures/people_shuffled.txt")
        .args(["--both-ways", "--format", "json"])
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with("["));
}

#[test]
fn test_list_columns() {
    fdiff()
        .arg("tests/fixtures/people_old.txt")
        .arg("--list-columns")
        .assert()
        .code(0)
        .stdout("1: id\n2: name\n3: born\n4: salary\n");
}

#[test]
fn test_list_columns_with_separator() {
    fdiff()
        .arg("tests/fixtures/pipe_old.txt")
        .args(["--list-columns", "--separator", "|"])
        .assert()
        .code(0)
        .stdout("1: a\n2: Mar 24 2013 10:30PM\n3: 1.50\n");
}

#[test]
fn test_config_profile() {
    fdiff()
        .arg("tests/fixtures/pipe_old.txt")
        .arg("tests/fixtures/pipe_new.txt")
        .args(["--config", "tests/fixtures/pipe.toml", "--format", "plain"])
        .assert()
        .code(0)
        .stdout("Files exactly match\n");
}

#[test]
fn test_flags_override_config_profile() {
    fdiff()
        .arg("tests/fixtures/pipe_old.txt")
        .arg("tests/fixtures/pipe_new.txt")
        .args(["--config", "tests/fixtures/pipe.toml", "--separator", ";"])
        .args(["--format", "plain"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Line 1, field 1 : a|Mar 24 2013 10:30PM|1.50"))
        .stdout(predicate::str::contains("2 difference(s) found"));
}

#[test]
fn test_invalid_config_exit_2() {
    fdiff()
        .arg("tests/fixtures/people_old.txt")
        .arg("tests/fixtures/people_old.txt")
        .args(["--config", "tests/fixtures/invalid.toml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("numbered from 1"));
}

#[test]
fn test_missing_config_exit_2() {
    fdiff()
        .arg("tests/fixtures/people_old.txt")
        .arg("tests/fixtures/people_old.txt")
        .args(["--config", "tests/fixtures/nonexistent.toml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn test_overlapping_columns_exit_2() {
    fdiff()
        .arg("tests/fixtures/people_old.txt")
        .arg("tests/fixtures/people_old.txt")
        .args(["--dates", "3", "--numbers", "3"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("column 3"));
}

#[test]
fn test_help() {
    fdiff()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Type-aware diff tool"));
}

#[test]
fn test_version() {
    fdiff()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fdiff-rs"));
}
