// tests/cli_test.rs
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::{NamedTempFile, TempDir};

/// Run the binary against an explicit empty config so no user-level
/// `verbeat/config.toml` can change the results
fn verbeat(config: &NamedTempFile) -> Command {
    let mut cmd = Command::cargo_bin("verbeat").unwrap();
    cmd.arg("--config").arg(config.path());
    cmd
}

fn empty_config() -> NamedTempFile {
    NamedTempFile::new().unwrap()
}

fn project(ledger: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("verbeat.version"), ledger).unwrap();
    dir
}

#[test]
fn test_help() {
    let config = empty_config();
    verbeat(&config)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("verbeat"))
        .stdout(predicate::str::contains("milestone ledger"));
}

#[test]
fn test_version_for_date() {
    let dir = project("1 # Initial release\n");
    let config = empty_config();
    verbeat(&config)
        .args(["version", "--date", "2025-07-15", "--project"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout("1.2507.0\n");
}

#[test]
fn test_components_output() {
    let dir = project("2\n");
    let config = empty_config();
    verbeat(&config)
        .args(["components", "--date", "2024-01-31", "--project"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout("Manual: 2\nDate: 2401\nCommits: 0\n");
}

#[test]
fn test_bump_prints_new_milestone() {
    let dir = project("2 # two\n");
    let config = empty_config();
    verbeat(&config)
        .args(["bump", "New", "feature", "--project"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout("3\n");

    let content = fs::read_to_string(dir.path().join("verbeat.version")).unwrap();
    assert_eq!(content, "2 # two\n3 # New feature\n");
}

#[test]
fn test_history_lists_entries() {
    let dir = project("2 # two\n1 # one\n");
    let config = empty_config();
    verbeat(&config)
        .args(["history", "--project"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("one"))
        .stdout(predicate::str::contains("two"));
}

#[test]
fn test_project_discovered_from_subdirectory() {
    let dir = project("5\n");
    let nested = dir.path().join("src").join("deep");
    fs::create_dir_all(&nested).unwrap();

    let config = empty_config();
    verbeat(&config)
        .current_dir(&nested)
        .args(["version", "--date", "2025-02-02"])
        .assert()
        .success()
        .stdout("5.2502.0\n");
}

#[test]
fn test_missing_ledger_exits_one() {
    let dir = TempDir::new().unwrap();
    let config = empty_config();
    verbeat(&config)
        .args(["version", "--project"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Version ledger not found"));
}

#[test]
fn test_parse_error_exits_one() {
    let dir = project("1\nabc # bad\n");
    let config = empty_config();
    verbeat(&config)
        .args(["components", "--project"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid milestone 'abc'"));
}

#[test]
fn test_invalid_date_exits_one() {
    let dir = project("1\n");
    let config = empty_config();
    verbeat(&config)
        .args(["version", "--date", "15/07/2025", "--project"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid date format"));
}

#[test]
fn test_fallback_replaces_ledger_error() {
    let dir = TempDir::new().unwrap();
    let config = empty_config();
    verbeat(&config)
        .args(["version", "--fallback", "1.0000.0", "--project"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout("1.0000.0\n");
}

#[test]
fn test_bump_without_ledger_does_not_create_it() {
    let dir = TempDir::new().unwrap();
    let config = empty_config();
    verbeat(&config)
        .args(["bump", "first", "--project"])
        .arg(dir.path())
        .assert()
        .code(1);
    assert!(!dir.path().join("verbeat.version").exists());
}

#[test]
fn test_explicit_config_overrides_project_config() {
    let dir = project("3\n");
    fs::write(
        dir.path().join("verbeat.toml"),
        "[vcs]\nbackend = \"svn\"\n",
    )
    .unwrap();

    let config = empty_config();
    verbeat(&config)
        .args(["version", "--date", "2025-07-15", "--project"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout("3.2507.0\n");
}
