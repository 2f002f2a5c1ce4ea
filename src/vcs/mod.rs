//! Version control abstraction layer
//!
//! The activity counter only needs four capabilities from a version control
//! system, captured by the [VersionControl] trait:
//!
//! - detect whether a directory is under version control
//! - detect whether the tool can be used at all
//! - count every commit reachable from `HEAD`
//! - count commits reachable from `HEAD` inside a date window
//!
//! Implementations:
//!
//! - [command::GitCommand]: runs the `git` executable (the default)
//! - [repository::Git2Repository]: in-process queries through `git2`
//! - [mock::MockVcs]: an in-memory fake for tests
//!
//! Implementations report failures through [crate::error::Result]; the
//! decision to turn those failures into a zero count belongs to
//! [crate::activity::ActivityCounter], not to the backends.

pub mod command;
pub mod mock;
pub mod repository;

pub use command::GitCommand;
pub use mock::MockVcs;
pub use repository::Git2Repository;

use std::path::Path;

use crate::activity::DateWindow;
use crate::error::Result;

/// Name of the metadata directory marking a git working tree root
pub const GIT_DIR: &str = ".git";

/// Capability interface over a version control system
///
/// All implementors must be `Send + Sync`.
pub trait VersionControl: Send + Sync {
    /// Whether `root` is the top of a version-controlled working tree
    ///
    /// Only the metadata directory directly under `root` counts; parent
    /// repositories are ignored.
    fn is_tracked(&self, root: &Path) -> bool {
        root.join(GIT_DIR).exists()
    }

    /// Whether the tool can be invoked at all
    fn is_available(&self) -> bool;

    /// Count all commits reachable from `HEAD`
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of reachable commits
    /// * `Err` - If the repository cannot be read or has no `HEAD`
    fn count_commits(&self, root: &Path) -> Result<u64>;

    /// Count commits reachable from `HEAD` with a commit time in `window`
    ///
    /// The window is half-open: commits at local midnight of `window.start`
    /// are included, commits at local midnight of `window.end` are not.
    fn count_commits_between(&self, root: &Path, window: &DateWindow) -> Result<u64>;
}

impl<V: VersionControl + ?Sized> VersionControl for Box<V> {
    fn is_tracked(&self, root: &Path) -> bool {
        (**self).is_tracked(root)
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn count_commits(&self, root: &Path) -> Result<u64> {
        (**self).count_commits(root)
    }

    fn count_commits_between(&self, root: &Path, window: &DateWindow) -> Result<u64> {
        (**self).count_commits_between(root, window)
    }
}

/// Version control backend selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Shell out to the git executable
    Command,
    /// Use libgit2 in-process
    Libgit2,
}

impl Backend {
    /// Parse a backend name as written in `verbeat.toml`
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "git" | "command" | "cli" => Some(Backend::Command),
            "libgit2" | "git2" => Some(Backend::Libgit2),
            _ => None,
        }
    }

    /// Build the backend, using `program` as the executable for [Backend::Command]
    pub fn build(self, program: &str) -> Box<dyn VersionControl> {
        match self {
            Backend::Command => Box::new(GitCommand::with_program(program)),
            Backend::Libgit2 => Box::new(Git2Repository::new()),
        }
    }
}
