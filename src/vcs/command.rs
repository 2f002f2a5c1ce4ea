use std::path::Path;
use std::process::{Command, Output};

use tracing::debug;

use crate::activity::DateWindow;
use crate::error::{Result, VerbeatError};
use crate::vcs::VersionControl;

const DEFAULT_PROGRAM: &str = "git";

/// Version control backend that shells out to the `git` executable
///
/// Each query is a blocking subprocess call without a timeout.
#[derive(Debug, Clone)]
pub struct GitCommand {
    program: String,
}

impl GitCommand {
    /// Use `git` from the search path
    pub fn new() -> Self {
        Self::with_program(DEFAULT_PROGRAM)
    }

    /// Use a specific executable name or path instead of `git`
    pub fn with_program(program: impl Into<String>) -> Self {
        GitCommand {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, root: &Path, args: &[&str]) -> Result<Output> {
        debug!(program = %self.program, ?args, root = %root.display(), "running version control command");

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(root)
            .output()
            .map_err(|e| {
                VerbeatError::command(format!("Failed to execute {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VerbeatError::command(format!(
                "{} {} failed with exit code {}: {}",
                self.program,
                args.join(" "),
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        Ok(output)
    }

    fn run_count(&self, root: &Path, args: &[&str]) -> Result<u64> {
        let output = self.run(root, args)?;
        parse_count(&String::from_utf8_lossy(&output.stdout))
    }
}

impl Default for GitCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionControl for GitCommand {
    fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    fn count_commits(&self, root: &Path) -> Result<u64> {
        self.run_count(root, &["rev-list", "--count", "HEAD"])
    }

    fn count_commits_between(&self, root: &Path, window: &DateWindow) -> Result<u64> {
        // --until is inclusive, so stop one second before the next window starts
        let since = format!("--since={}", window.start_of_window().format("%Y-%m-%d %H:%M:%S"));
        let until = format!("--until={}", window.last_second().format("%Y-%m-%d %H:%M:%S"));

        self.run_count(root, &["rev-list", "--count", since.as_str(), until.as_str(), "HEAD"])
    }
}

/// Parse the textual count printed by `git rev-list --count`
fn parse_count(stdout: &str) -> Result<u64> {
    let trimmed = stdout.trim();
    trimmed
        .parse::<u64>()
        .map_err(|_| VerbeatError::command(format!("Unexpected commit count output: '{}'", trimmed)))
}
