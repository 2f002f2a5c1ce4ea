use std::path::{Path, PathBuf};
use thiserror::Error;

/// Unified error type for verbeat operations
#[derive(Error, Debug)]
pub enum VerbeatError {
    #[error(
        "Version ledger not found: {}. Create it with at least one milestone (e.g. '1 # Initial release')",
        .path.display()
    )]
    MissingLedger { path: PathBuf },

    #[error(
        "No valid milestones found in {}. Add at least one milestone (e.g. '1 # Initial release')",
        .path.display()
    )]
    EmptyLedger { path: PathBuf },

    #[error("Invalid milestone '{segment}' on line {line}")]
    LedgerParse { segment: String, line: usize },

    #[error("Cannot read version ledger {}: {source}", .path.display())]
    LedgerRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write to version ledger {}: {source}", .path.display())]
    LedgerWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Milestone {0} cannot be bumped any further")]
    MilestoneOverflow(u64),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Version control command failed: {0}")]
    Command(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in verbeat
pub type Result<T> = std::result::Result<T, VerbeatError>;

impl VerbeatError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        VerbeatError::Config(msg.into())
    }

    /// Create a version control command error with context
    pub fn command(msg: impl Into<String>) -> Self {
        VerbeatError::Command(msg.into())
    }

    pub(crate) fn read(path: &Path, source: std::io::Error) -> Self {
        VerbeatError::LedgerRead {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn write(path: &Path, source: std::io::Error) -> Self {
        VerbeatError::LedgerWrite {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Whether the error originates from the version ledger itself
    ///
    /// The CLI treats these as user-facing failures (exit code 1) and
    /// `--fallback` only replaces output for this class of error.
    pub fn is_ledger_error(&self) -> bool {
        matches!(
            self,
            VerbeatError::MissingLedger { .. }
                | VerbeatError::EmptyLedger { .. }
                | VerbeatError::LedgerParse { .. }
                | VerbeatError::LedgerRead { .. }
                | VerbeatError::LedgerWrite { .. }
                | VerbeatError::MilestoneOverflow(_)
        )
    }
}
