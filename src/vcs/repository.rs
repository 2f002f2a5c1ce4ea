use std::path::Path;

use git2::Repository as Git2Repo;
use tracing::debug;

use crate::activity::DateWindow;
use crate::error::Result;
use crate::vcs::VersionControl;

/// Version control backend using libgit2 through the `git2` crate
///
/// Needs no `git` executable. The repository is opened fresh for every
/// query, so nothing is cached between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct Git2Repository;

impl Git2Repository {
    pub fn new() -> Self {
        Git2Repository
    }

    /// Open the repository rooted exactly at `root`
    ///
    /// Unlike `git2::Repository::discover`, parent directories are not searched.
    fn open(root: &Path) -> Result<Git2Repo> {
        Ok(Git2Repo::open(root)?)
    }

    /// Walk every commit reachable from `HEAD`, yielding committer timestamps
    fn for_each_commit_time(root: &Path, mut visit: impl FnMut(i64)) -> Result<()> {
        let repo = Self::open(root)?;
        let mut revwalk = repo.revwalk()?;
        revwalk.push_head()?;

        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = repo.find_commit(oid)?;
            visit(commit.time().seconds());
        }

        Ok(())
    }
}

impl VersionControl for Git2Repository {
    fn is_available(&self) -> bool {
        // libgit2 is linked in
        true
    }

    fn count_commits(&self, root: &Path) -> Result<u64> {
        let mut count = 0u64;
        Self::for_each_commit_time(root, |_| count += 1)?;
        Ok(count)
    }

    fn count_commits_between(&self, root: &Path, window: &DateWindow) -> Result<u64> {
        let (start, end) = window.local_timestamps();
        debug!(root = %root.display(), start, end, "walking history with libgit2");

        let mut count = 0u64;
        Self::for_each_commit_time(root, |seconds| {
            if seconds >= start && seconds < end {
                count += 1;
            }
        })?;
        Ok(count)
    }
}
