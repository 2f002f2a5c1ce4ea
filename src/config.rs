use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, VerbeatError};
use crate::ledger::LEDGER_FILE_NAME;
use crate::vcs::{Backend, VersionControl};
use crate::version::Verbeat;

/// Project-level configuration file name, looked up in the project root
pub const CONFIG_FILE_NAME: &str = "verbeat.toml";

/// Represents the complete configuration for verbeat.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub ledger: LedgerConfig,

    #[serde(default)]
    pub vcs: VcsConfig,
}

fn default_ledger_file() -> String {
    LEDGER_FILE_NAME.to_string()
}

fn default_backend() -> String {
    "git".to_string()
}

fn default_program() -> String {
    "git".to_string()
}

/// Where the milestone ledger lives, relative to the project root.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LedgerConfig {
    #[serde(default = "default_ledger_file")]
    pub file: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            file: default_ledger_file(),
        }
    }
}

/// How commit activity is queried.
///
/// `backend` is either `git` (run the executable named by `program`) or
/// `libgit2` (query the repository in-process; `program` is ignored).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VcsConfig {
    #[serde(default = "default_backend")]
    pub backend: String,

    #[serde(default = "default_program")]
    pub program: String,
}

impl Default for VcsConfig {
    fn default() -> Self {
        VcsConfig {
            backend: default_backend(),
            program: default_program(),
        }
    }
}

impl Config {
    /// Resolve the configured version control backend
    pub fn backend(&self) -> Result<Backend> {
        Backend::parse(&self.vcs.backend).ok_or_else(|| {
            VerbeatError::config(format!(
                "unknown vcs backend '{}' (expected 'git' or 'libgit2')",
                self.vcs.backend
            ))
        })
    }

    /// Build a composer for `root` from this configuration
    pub fn composer(&self, root: impl Into<PathBuf>) -> Result<Verbeat<Box<dyn VersionControl>>> {
        let vcs = self.backend()?.build(&self.vcs.program);
        Ok(Verbeat::with_vcs(root, vcs).with_ledger_file(self.ledger.file.clone()))
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `verbeat.toml` in the project root
/// 3. `verbeat/config.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, project_root: &Path) -> Result<Config> {
    let path = if let Some(path) = config_path {
        path.to_path_buf()
    } else if project_root.join(CONFIG_FILE_NAME).exists() {
        project_root.join(CONFIG_FILE_NAME)
    } else if let Some(config_dir) = dirs::config_dir() {
        let user_config = config_dir.join("verbeat").join("config.toml");
        if user_config.exists() {
            user_config
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        VerbeatError::config(format!("cannot read {}: {}", path.display(), e))
    })?;

    toml::from_str(&config_str)
        .map_err(|e| VerbeatError::config(format!("invalid {}: {}", path.display(), e)))
}
