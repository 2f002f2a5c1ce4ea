use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local, NaiveDate};
use tracing::info;

use crate::activity::ActivityCounter;
use crate::error::{Result, VerbeatError};
use crate::ledger::{self, LedgerEntry, LEDGER_FILE_NAME};
use crate::vcs::{GitCommand, VersionControl};

/// The three parts of a verbeat version: `milestone.calendar_tag.commit_count`.
///
/// Computed fresh on every request and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionComponents {
    /// Highest milestone in the ledger
    pub milestone: u64,
    /// Two-digit year followed by two-digit month, e.g. `2507`
    pub calendar_tag: String,
    /// Commits made during the calendar month
    pub commit_count: u64,
}

impl fmt::Display for VersionComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            self.milestone, self.calendar_tag, self.commit_count
        )
    }
}

/// Formats `date` as `YYMM`.
///
/// The year is truncated to its last two digits with no century handling,
/// so 1999 and 2099 both map to `99`.
///
/// # Example
/// ```
/// # use chrono::NaiveDate;
/// # use verbeat::version::calendar_tag;
/// let date = NaiveDate::from_ymd_opt(2025, 7, 15).unwrap();
/// assert_eq!(calendar_tag(date), "2507");
/// ```
pub fn calendar_tag(date: NaiveDate) -> String {
    format!("{:02}{:02}", date.year().rem_euclid(100), date.month())
}

/// Version composer for a single project
///
/// Holds the project root, the ledger file name and the version control
/// backend used for activity counts. Every call re-reads the ledger and
/// re-queries the version control system.
pub struct Verbeat<V> {
    root: PathBuf,
    ledger_file: String,
    counter: ActivityCounter<V>,
}

impl Verbeat<GitCommand> {
    /// Composer for `root` using the `git` executable
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Verbeat::with_vcs(root, GitCommand::new())
    }
}

impl<V: VersionControl> Verbeat<V> {
    /// Composer for `root` using a specific version control backend
    pub fn with_vcs(root: impl Into<PathBuf>, vcs: V) -> Self {
        Verbeat {
            root: root.into(),
            ledger_file: LEDGER_FILE_NAME.to_string(),
            counter: ActivityCounter::new(vcs),
        }
    }

    /// Use a ledger file name other than `verbeat.version`
    pub fn with_ledger_file(mut self, file_name: impl Into<String>) -> Self {
        self.ledger_file = file_name.into();
        self
    }

    /// Full path of the ledger file
    pub fn ledger_path(&self) -> PathBuf {
        self.root.join(&self.ledger_file)
    }

    /// Compute the version components for `date`, or today when `None`.
    ///
    /// # Returns
    /// * `Ok(VersionComponents)` - The milestone, calendar tag and commit count
    /// * `Err` - Ledger errors only; activity counting never fails
    pub fn components(&self, date: Option<NaiveDate>) -> Result<VersionComponents> {
        let milestone = ledger::active_milestone(&self.ledger_path())?;
        let date = date.unwrap_or_else(|| Local::now().date_naive());
        let commit_count = self.counter.commits_in_month(&self.root, date);

        Ok(VersionComponents {
            milestone,
            calendar_tag: calendar_tag(date),
            commit_count,
        })
    }

    /// Compute the version string `M.YYMM.C` for `date`, or today when `None`.
    pub fn version(&self, date: Option<NaiveDate>) -> Result<String> {
        Ok(self.components(date)?.to_string())
    }

    /// Append the next milestone to the ledger and return it.
    ///
    /// Fails if the ledger has no active milestone yet.
    pub fn bump_milestone(&self, comment: &str) -> Result<u64> {
        let path = self.ledger_path();
        let current = ledger::active_milestone(&path)?;
        let next = current
            .checked_add(1)
            .ok_or(VerbeatError::MilestoneOverflow(current))?;

        ledger::append(&path, next, comment)?;
        info!(from = current, to = next, "bumped milestone");
        Ok(next)
    }

    /// Ledger entries in ascending milestone order.
    pub fn history(&self) -> Result<Vec<LedgerEntry>> {
        ledger::load(&self.ledger_path())
    }
}

/// Version components for the project at `root`, using the `git` executable.
pub fn get_components(root: &Path, date: Option<NaiveDate>) -> Result<VersionComponents> {
    Verbeat::new(root).components(date)
}

/// Version string `M.YYMM.C` for the project at `root`, using the `git` executable.
pub fn get_version(root: &Path, date: Option<NaiveDate>) -> Result<String> {
    Verbeat::new(root).version(date)
}

/// Bump the milestone of the project at `root`, returning the new milestone.
pub fn bump_milestone(root: &Path, comment: &str) -> Result<u64> {
    Verbeat::new(root).bump_milestone(comment)
}

/// Ledger history of the project at `root`, ascending by milestone.
pub fn get_history(root: &Path) -> Result<Vec<LedgerEntry>> {
    Verbeat::new(root).history()
}
