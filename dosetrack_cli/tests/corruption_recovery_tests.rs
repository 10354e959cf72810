//! Corruption recovery tests for dosetrack.
//!
//! These tests verify the system can handle:
//! - Corrupted journal lines, including bytes that are not UTF-8
//! - Hand-edited invalid doses
//! - Invalid and out-of-range config files
//! - Repeated concurrent appends

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::thread;
use tempfile::TempDir;

fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dosetrack"));
    cmd.arg("--data-dir")
        .arg(dir)
        .arg("--config")
        .arg(dir.join("config.toml"));
    cmd
}

fn setup_test_dir() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("config.toml"), "").expect("Failed to write config");
    temp_dir
}

#[test]
fn test_corrupted_journal_lines_ignored() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["log", "--dose", "5", "--at", "2025-01-01T00:00:00Z"])
        .assert()
        .success();

    let journal_path = data_dir.join("doses.jsonl");
    let mut contents = fs::read_to_string(&journal_path).unwrap();
    contents.push_str("{ \"dose_mg\": 5.0, truncated\n");
    fs::write(&journal_path, contents).unwrap();

    cli(data_dir)
        .args(["level", "--at", "2025-01-06T00:00:00Z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Estimated level: 2.500 mg"));
}

#[test]
fn test_non_utf8_journal_line_ignored() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["log", "--dose", "5", "--at", "2025-01-01T00:00:00Z"])
        .assert()
        .success();

    let journal_path = data_dir.join("doses.jsonl");
    let mut contents = fs::read(&journal_path).unwrap();
    contents.extend_from_slice(&[0xff, 0xfe, b'\n']);
    fs::write(&journal_path, contents).unwrap();

    cli(data_dir)
        .args(["log", "--dose", "5", "--at", "2025-01-06T00:00:00Z"])
        .assert()
        .success();

    cli(data_dir)
        .args(["level", "--at", "2025-01-06T00:00:00Z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Estimated level: 7.500 mg"))
        .stdout(predicate::str::contains("2 doses"));
}

#[test]
fn test_invalid_dose_in_journal_skipped() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    // Hand-edited record with a negative dose
    fs::write(
        data_dir.join("doses.jsonl"),
        concat!(
            r#"{"id":"6f1c1f4e-1d2b-4b8e-9f55-0a6f2e0c9a11","medication":"tirzepatide","dose_mg":-5.0,"administered_at":"2025-01-01T00:00:00Z"}"#,
            "\n",
            r#"{"id":"0b8e4c59-7f7e-4e86-a0a3-5b7c1d2e3f40","medication":"tirzepatide","dose_mg":5.0,"administered_at":"2025-01-01T00:00:00Z"}"#,
            "\n",
        ),
    )
    .unwrap();

    cli(data_dir)
        .args(["level", "--at", "2025-01-06T00:00:00Z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Estimated level: 2.500 mg"))
        .stdout(predicate::str::contains("1 doses"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    fs::write(data_dir.join("config.toml"), "[regimen]\ninterval_days = 0\n").unwrap();

    cli(data_dir)
        .arg("next")
        .assert()
        .failure()
        .stderr(predicate::str::contains("interval_days"));
}

#[test]
fn test_out_of_range_config_is_rejected() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    cli(data_dir)
        .args(["log", "--dose", "5", "--at", "2025-01-01T00:00:00Z"])
        .assert()
        .success();

    fs::write(
        data_dir.join("config.toml"),
        "[regimen]\ninterval_days = 4294967295\n",
    )
    .unwrap();
    cli(data_dir)
        .arg("next")
        .assert()
        .failure()
        .stderr(predicate::str::contains("interval_days"));

    fs::write(
        data_dir.join("config.toml"),
        "[chart]\nprojection_days = 4294967295\n",
    )
    .unwrap();
    cli(data_dir)
        .args(["curve", "--period", "week"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("projection_days"));
}

#[test]
fn test_unparseable_config_is_rejected() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    fs::write(data_dir.join("config.toml"), "[regimen\nmedication = ").unwrap();

    cli(data_dir).arg("level").assert().failure();
}

#[test]
fn test_concurrent_logging() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    let handles: Vec<_> = (0..5)
        .map(|i| {
            let dir = data_dir.clone();
            thread::spawn(move || {
                cli(&dir)
                    .args(["log", "--dose", "2.5", "--at"])
                    .arg(format!("2025-01-0{}T00:00:00Z", i + 1))
                    .assert()
                    .success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("logging thread panicked");
    }

    let journal = fs::read_to_string(data_dir.join("doses.jsonl")).expect("Failed to read journal");
    assert_eq!(journal.lines().count(), 5);
    for line in journal.lines() {
        let parsed: serde_json::Value = serde_json::from_str(line).expect("torn journal line");
        assert_eq!(parsed["dose_mg"], 2.5);
    }
}
