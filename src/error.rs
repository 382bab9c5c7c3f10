//! Error types
//!
//! `LoadError` is fatal: a roster or encounter directory that fails to load
//! stops the process instead of serving partial data.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while scanning or parsing roster sources
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read directory {}: {source}", path.display())]
    DirectoryRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot read {}: {source}", path.display())]
    SourceRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed record in {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("{}:{record}: expected name and modifier", path.display())]
    MissingField { path: PathBuf, record: u64 },

    #[error("{}:{record}: combatant name is empty", path.display())]
    EmptyName { path: PathBuf, record: u64 },

    #[error("{}:{record}: invalid modifier {value:?}", path.display())]
    InvalidModifier {
        path: PathBuf,
        record: u64,
        value: String,
    },
}

/// Page rendering failure
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Failure to start watching a directory
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("cannot watch {}: {source}", path.display())]
    Notify {
        path: PathBuf,
        source: notify::Error,
    },
}
