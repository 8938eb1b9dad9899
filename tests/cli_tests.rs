//! Binary-level tests that need no network access.

mod common;

use assert_cmd::Command;
use common::{SAMPLE_ROWS, write_reviews};
use predicates::prelude::*;
use tempfile::TempDir;

/// Runs the binary in `dir` with a clean provider environment.
fn cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pizza-review-agent").unwrap_or_else(|_| unreachable!());
    cmd.current_dir(dir.path())
        .env_remove("OPENAI_API_KEY")
        .env_remove("PIZZA_REVIEWS_PATH")
        .env_remove("PIZZA_INDEX_DIR")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help() {
    let dir = TempDir::new().unwrap_or_else(|_| unreachable!());
    cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--stats"))
        .stdout(predicate::str::contains("--top-k"));
}

#[test]
fn test_missing_api_key_fails_with_remedy() {
    let dir = TempDir::new().unwrap_or_else(|_| unreachable!());
    write_reviews(&dir, &SAMPLE_ROWS);
    cmd(&dir)
        .args(["--data", "reviews.csv", "Which pizza is best?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY"))
        .stderr(predicate::str::contains(".env.example"));
}

#[test]
fn test_missing_dataset_fails_with_remedy() {
    let dir = TempDir::new().unwrap_or_else(|_| unreachable!());
    cmd(&dir)
        .args(["--stats", "--data", "nope.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("dataset not found"))
        .stderr(predicate::str::contains("--data"));
}

#[test]
fn test_stats_without_api_key() {
    let dir = TempDir::new().unwrap_or_else(|_| unreachable!());
    write_reviews(&dir, &["1,Ann,Margherita,5,Loved it,2024-01-01,NYC"]);
    cmd(&dir)
        .args(["--stats", "--data", "reviews.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Reviews:  1"))
        .stdout(predicate::str::contains("Average Rating: 5.00/5"))
        .stdout(predicate::str::contains("Review #1: Customer Ann ordered Margherita"));
}

#[test]
fn test_stats_json() {
    let dir = TempDir::new().unwrap_or_else(|_| unreachable!());
    write_reviews(&dir, &SAMPLE_ROWS);
    let output = cmd(&dir)
        .args(["--stats", "--format", "json", "--data", "reviews.csv"])
        .output()
        .unwrap_or_else(|_| unreachable!());
    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).unwrap_or_else(|_| unreachable!());
    assert_eq!(json["statistics"]["total_reviews"], 4);
    assert_eq!(json["statistics"]["locations"][0], "NYC");
}

#[test]
fn test_invalid_dataset_reports_line() {
    let dir = TempDir::new().unwrap_or_else(|_| unreachable!());
    write_reviews(&dir, &["1,Ann,Margherita,9,Too good,2024-01-01,NYC"]);
    cmd(&dir)
        .args(["--stats", "--data", "reviews.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("rating"));
}

#[test]
fn test_bundled_dataset_stats() {
    let dir = TempDir::new().unwrap_or_else(|_| unreachable!());
    let data = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/pizza_reviews.csv");
    cmd(&dir)
        .arg("--stats")
        .arg("--data")
        .arg(data)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Reviews:  30"));
}
