//! Version ledger storage
//!
//! The ledger is a flat text file holding one milestone per line, optionally
//! followed by a `#` comment:
//!
//! ```text
//! # verbeat milestones
//! 1 # Initial release
//! 2 # New storage engine
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Any other line whose
//! number fails to parse invalidates the whole ledger.
//!
//! Writes are plain appends without locking. Two processes bumping at the
//! same time may both append the same milestone.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, VerbeatError};

/// Default ledger file name, relative to the project root
pub const LEDGER_FILE_NAME: &str = "verbeat.version";

const COMMENT_MARKER: char = '#';

/// A single milestone line of the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub milestone: u64,
    pub comment: String,
}

impl LedgerEntry {
    pub fn new(milestone: u64, comment: impl Into<String>) -> Self {
        LedgerEntry {
            milestone,
            comment: comment.into(),
        }
    }

    /// Parse one ledger line
    ///
    /// Returns `Ok(None)` for blank and comment-only lines.
    fn parse_line(raw: &str, line: usize) -> Result<Option<Self>> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER) {
            return Ok(None);
        }

        let (number, comment) = match trimmed.split_once(COMMENT_MARKER) {
            Some((number, comment)) => (number.trim(), comment.trim()),
            None => (trimmed, ""),
        };

        let milestone = number
            .parse::<u64>()
            .map_err(|_| VerbeatError::LedgerParse {
                segment: number.to_string(),
                line,
            })?;

        Ok(Some(LedgerEntry::new(milestone, comment)))
    }
}

/// Formats the entry exactly as it is stored on disk (without line terminator)
impl fmt::Display for LedgerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.comment.is_empty() {
            write!(f, "{}", self.milestone)
        } else {
            write!(f, "{} {} {}", self.milestone, COMMENT_MARKER, self.comment)
        }
    }
}

/// Parses ledger text into entries sorted by milestone.
///
/// Sorting is stable, so entries sharing a milestone keep their file order.
pub fn parse(content: &str) -> Result<Vec<LedgerEntry>> {
    let mut entries = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        if let Some(entry) = LedgerEntry::parse_line(raw, index + 1)? {
            entries.push(entry);
        }
    }

    entries.sort_by_key(|entry| entry.milestone);
    Ok(entries)
}

/// Loads the ledger at `path`.
///
/// A missing file is not an error here and yields an empty history.
///
/// # Returns
/// * `Ok(Vec<LedgerEntry>)` - Entries in ascending milestone order
/// * `Err(LedgerParse)` - If any non-comment line has an invalid milestone
/// * `Err(LedgerRead)` - If the file exists but cannot be read
pub fn load(path: &Path) -> Result<Vec<LedgerEntry>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "version ledger not present");
            return Ok(Vec::new());
        }
        Err(e) => return Err(VerbeatError::read(path, e)),
    };

    let entries = parse(&content)?;
    debug!(path = %path.display(), entries = entries.len(), "loaded version ledger");
    Ok(entries)
}

/// Returns the highest milestone recorded in the ledger.
///
/// # Returns
/// * `Ok(u64)` - The active milestone
/// * `Err(MissingLedger)` - If the file does not exist
/// * `Err(EmptyLedger)` - If the file holds no milestone lines
pub fn active_milestone(path: &Path) -> Result<u64> {
    if !path.exists() {
        return Err(VerbeatError::MissingLedger {
            path: path.to_path_buf(),
        });
    }

    load(path)?
        .iter()
        .map(|entry| entry.milestone)
        .max()
        .ok_or_else(|| VerbeatError::EmptyLedger {
            path: path.to_path_buf(),
        })
}

/// Appends a milestone line to the ledger, creating the file if needed.
///
/// Line breaks inside `comment` are folded into spaces so the entry stays on
/// one line. If the file does not end with a newline one is written first.
pub fn append(path: &Path, milestone: u64, comment: &str) -> Result<()> {
    let comment = comment.lines().map(str::trim).collect::<Vec<_>>().join(" ");
    let entry = LedgerEntry::new(milestone, comment.trim());

    let needs_separator = ends_without_newline(path).map_err(|e| VerbeatError::write(path, e))?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| VerbeatError::write(path, e))?;

    let mut line = String::new();
    if needs_separator {
        line.push('\n');
    }
    line.push_str(&entry.to_string());
    line.push('\n');

    file.write_all(line.as_bytes())
        .map_err(|e| VerbeatError::write(path, e))?;

    debug!(path = %path.display(), milestone, "appended milestone to ledger");
    Ok(())
}

/// Searches `start` and its ancestors for a directory containing `file_name`.
pub fn discover(start: &Path, file_name: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(file_name).is_file())
        .map(Path::to_path_buf)
}

fn ends_without_newline(path: &Path) -> io::Result<bool> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    if file.metadata()?.len() == 0 {
        return Ok(false);
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}
