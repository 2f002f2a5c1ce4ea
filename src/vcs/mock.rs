use std::path::Path;

use chrono::NaiveDateTime;

use crate::activity::DateWindow;
use crate::error::{Result, VerbeatError};
use crate::vcs::VersionControl;

/// Mock version control system for testing without a real repository
pub struct MockVcs {
    tracked: bool,
    available: bool,
    commits: Vec<NaiveDateTime>,
    fail_total: bool,
    fail_range: bool,
}

impl MockVcs {
    /// Create a tracked, available repository with no commits
    pub fn new() -> Self {
        MockVcs {
            tracked: true,
            available: true,
            commits: Vec::new(),
            fail_total: false,
            fail_range: false,
        }
    }

    /// Report the project as not under version control
    pub fn untracked(mut self) -> Self {
        self.tracked = false;
        self
    }

    /// Report the tool as missing from the search path
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Make the total commit probe fail
    pub fn failing_total(mut self) -> Self {
        self.fail_total = true;
        self
    }

    /// Make the windowed count query fail
    pub fn failing_range(mut self) -> Self {
        self.fail_range = true;
        self
    }

    /// Add a commit made at `time` (local time)
    pub fn add_commit(&mut self, time: NaiveDateTime) {
        self.commits.push(time);
    }

    /// Builder form of [MockVcs::add_commit]
    pub fn with_commit(mut self, time: NaiveDateTime) -> Self {
        self.add_commit(time);
        self
    }
}

impl Default for MockVcs {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionControl for MockVcs {
    fn is_tracked(&self, _root: &Path) -> bool {
        self.tracked
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn count_commits(&self, _root: &Path) -> Result<u64> {
        if self.fail_total {
            return Err(VerbeatError::command("mock: rev-list failed"));
        }
        Ok(self.commits.len() as u64)
    }

    fn count_commits_between(&self, _root: &Path, window: &DateWindow) -> Result<u64> {
        if self.fail_range {
            return Err(VerbeatError::command("mock: ranged rev-list failed"));
        }
        Ok(self
            .commits
            .iter()
            .filter(|time| window.contains(**time))
            .count() as u64)
    }
}
