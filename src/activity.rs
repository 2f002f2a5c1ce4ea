//! Monthly commit activity
//!
//! [ActivityCounter] answers one question: how many commits landed in the
//! calendar month containing a given date. It never fails. Any problem with
//! the version control system (no repository, no tool, empty history, a
//! failing query) is logged at debug level and reported as zero commits, so
//! a version can always be computed.

use std::path::Path;

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use tracing::debug;

use crate::vcs::VersionControl;

/// Half-open range of calendar days, `[start, end)`, in local time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// The calendar month containing `date`
    ///
    /// Runs from the first of that month up to the first of the next month,
    /// rolling the year over in December. Returns `None` when the next month
    /// lies past the last date chrono can represent.
    pub fn for_month(date: NaiveDate) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?;
        let end = if date.month() == 12 {
            NaiveDate::from_ymd_opt(date.year().checked_add(1)?, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)?
        };

        Some(DateWindow { start, end })
    }

    /// Midnight at the start of the window
    pub fn start_of_window(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// The last whole second still inside the window
    pub fn last_second(&self) -> NaiveDateTime {
        self.end
            .and_time(NaiveTime::MIN)
            .checked_sub_signed(Duration::seconds(1))
            .unwrap_or_else(|| self.start_of_window())
    }

    pub fn contains(&self, time: NaiveDateTime) -> bool {
        time >= self.start_of_window() && time < self.end.and_time(NaiveTime::MIN)
    }

    /// Unix timestamps of the window bounds at local midnight
    pub fn local_timestamps(&self) -> (i64, i64) {
        (local_midnight(self.start), local_midnight(self.end))
    }
}

fn local_midnight(date: NaiveDate) -> i64 {
    first_valid_instant(date.and_time(NaiveTime::MIN), |naive| {
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|time| time.timestamp())
    })
}

/// Resolve a local wall-clock time to a timestamp.
///
/// When `naive` falls in a DST gap, the first instant after the gap is used.
/// Only if that also fails is the wall-clock time read as UTC.
fn first_valid_instant(
    naive: NaiveDateTime,
    resolve: impl Fn(NaiveDateTime) -> Option<i64>,
) -> i64 {
    resolve(naive)
        .or_else(|| {
            naive
                .checked_add_signed(Duration::hours(1))
                .and_then(&resolve)
        })
        .unwrap_or_else(|| naive.and_utc().timestamp())
}

/// Counts commits per calendar month, swallowing every version control failure
pub struct ActivityCounter<V> {
    vcs: V,
}

impl<V: VersionControl> ActivityCounter<V> {
    pub fn new(vcs: V) -> Self {
        ActivityCounter { vcs }
    }

    /// Number of commits in the month containing `date` for the repository at `root`
    ///
    /// Returns 0 when `root` is not a repository, the tool is unavailable,
    /// the history is empty, or any query fails.
    pub fn commits_in_month(&self, root: &Path, date: NaiveDate) -> u64 {
        if !self.vcs.is_tracked(root) {
            debug!(root = %root.display(), "not under version control, counting 0 commits");
            return 0;
        }

        if !self.vcs.is_available() {
            debug!("version control tool unavailable, counting 0 commits");
            return 0;
        }

        match self.vcs.count_commits(root) {
            Ok(0) => {
                debug!(root = %root.display(), "repository has no commits");
                return 0;
            }
            Ok(_) => {}
            Err(e) => {
                debug!(error = %e, "total commit probe failed, counting 0 commits");
                return 0;
            }
        }

        let Some(window) = DateWindow::for_month(date) else {
            debug!(%date, "no month window for date, counting 0 commits");
            return 0;
        };
        match self.vcs.count_commits_between(root, &window) {
            Ok(count) => {
                debug!(start = %window.start, end = %window.end, count, "counted monthly commits");
                count
            }
            Err(e) => {
                debug!(error = %e, "monthly commit query failed, counting 0 commits");
                0
            }
        }
    }
}
