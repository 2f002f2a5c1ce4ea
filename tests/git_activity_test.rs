// tests/git_activity_test.rs
//
// These tests drive a real `git` executable and return early when none is
// installed.
use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;
use verbeat::activity::ActivityCounter;
use verbeat::ledger::LEDGER_FILE_NAME;
use verbeat::vcs::{Git2Repository, GitCommand, VersionControl};
use verbeat::Verbeat;

fn git_installed() -> bool {
    GitCommand::new().is_available()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn git(root: &Path, args: &[&str], when: Option<&str>) {
    let mut cmd = Command::new("git");
    cmd.args(args)
        .current_dir(root)
        .env("GIT_AUTHOR_NAME", "Verbeat Test")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "Verbeat Test")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .env("GIT_CONFIG_NOSYSTEM", "1");
    if let Some(when) = when {
        cmd.env("GIT_AUTHOR_DATE", when).env("GIT_COMMITTER_DATE", when);
    }
    let status = cmd.output().expect("failed to run git").status;
    assert!(status.success(), "git {:?} failed", args);
}

fn init_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(LEDGER_FILE_NAME), "1 # Initial release\n").unwrap();
    git(dir.path(), &["init", "--quiet"], None);
    dir
}

fn commit(root: &Path, when: &str) {
    git(
        root,
        &["commit", "--quiet", "--allow-empty", "-m", when],
        Some(when),
    );
}

#[test]
fn test_no_repository_counts_zero() {
    let dir = TempDir::new().unwrap();
    let counter = ActivityCounter::new(GitCommand::new());
    assert_eq!(counter.commits_in_month(dir.path(), date(2025, 7, 15)), 0);
}

#[test]
fn test_missing_executable_counts_zero() {
    // A `.git` directory is enough to get past the repository check
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join(".git")).unwrap();

    let counter = ActivityCounter::new(GitCommand::with_program("verbeat-test-no-such-vcs-binary"));
    assert_eq!(counter.commits_in_month(dir.path(), date(2025, 7, 15)), 0);
}

#[test]
fn test_corrupt_repository_counts_zero() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join(".git")).unwrap();
    fs::write(dir.path().join(".git").join("HEAD"), "garbage").unwrap();

    assert_eq!(
        ActivityCounter::new(GitCommand::new()).commits_in_month(dir.path(), date(2025, 7, 15)),
        0
    );
    assert_eq!(
        ActivityCounter::new(Git2Repository::new()).commits_in_month(dir.path(), date(2025, 7, 15)),
        0
    );
}

#[test]
fn test_empty_repository_counts_zero() {
    if !git_installed() {
        return;
    }
    let dir = init_project();

    let verbeat = Verbeat::new(dir.path());
    assert_eq!(verbeat.version(Some(date(2025, 7, 15))).unwrap(), "1.2507.0");

    let libgit = ActivityCounter::new(Git2Repository::new());
    assert_eq!(libgit.commits_in_month(dir.path(), date(2025, 7, 15)), 0);
}

#[test]
fn test_commits_outside_month_count_zero() {
    if !git_installed() {
        return;
    }
    let dir = init_project();
    commit(dir.path(), "2020-01-15T12:00:00");
    commit(dir.path(), "2020-02-03T12:00:00");

    let verbeat = Verbeat::new(dir.path());
    assert_eq!(verbeat.version(Some(date(2025, 7, 15))).unwrap(), "1.2507.0");
}

#[test]
fn test_counts_commits_in_month_with_both_backends() {
    if !git_installed() {
        return;
    }
    let dir = init_project();
    commit(dir.path(), "2024-11-30T12:00:00");
    commit(dir.path(), "2024-12-01T12:00:00");
    commit(dir.path(), "2024-12-15T12:00:00");
    commit(dir.path(), "2024-12-31T12:00:00");
    commit(dir.path(), "2025-01-01T12:00:00");

    let reference = date(2024, 12, 20);

    let cli = Verbeat::new(dir.path());
    assert_eq!(cli.version(Some(reference)).unwrap(), "1.2412.3");

    let libgit = Verbeat::with_vcs(dir.path(), Git2Repository::new());
    assert_eq!(libgit.version(Some(reference)).unwrap(), "1.2412.3");

    assert_eq!(cli.version(Some(date(2025, 1, 9))).unwrap(), "1.2501.1");
    assert_eq!(libgit.version(Some(date(2024, 11, 1))).unwrap(), "1.2411.1");
}

#[test]
fn test_nested_directory_is_not_tracked() {
    if !git_installed() {
        return;
    }
    let dir = init_project();
    commit(dir.path(), "2025-07-02T12:00:00");

    // Only a .git directly under the project root counts
    let nested = dir.path().join("sub");
    fs::create_dir(&nested).unwrap();
    fs::write(nested.join(LEDGER_FILE_NAME), "4\n").unwrap();

    let verbeat = Verbeat::new(&nested);
    assert_eq!(verbeat.version(Some(date(2025, 7, 15))).unwrap(), "4.2507.0");
}

#[test]
fn test_last_representable_date_counts_zero() {
    if !git_installed() {
        return;
    }
    let dir = init_project();
    commit(dir.path(), "2025-07-02T12:00:00");

    let counter = ActivityCounter::new(GitCommand::new());
    assert_eq!(counter.commits_in_month(dir.path(), NaiveDate::MAX), 0);

    let verbeat = Verbeat::new(dir.path());
    let version = verbeat.version(Some(NaiveDate::MAX)).unwrap();
    assert!(version.ends_with(".0"), "unexpected version: {}", version);
}
