pub mod activity;
pub mod config;
pub mod error;
pub mod ledger;
pub mod ui;
pub mod vcs;
pub mod version;

pub use error::{Result, VerbeatError};
pub use ledger::LedgerEntry;
pub use version::{
    bump_milestone, get_components, get_history, get_version, Verbeat, VersionComponents,
};
