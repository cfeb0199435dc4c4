//! Error types for the glossary migration.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a migration run.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// An error propagated from the core data layer.
    #[error("database error: {0}")]
    Database(#[from] termbase_core::Error),

    /// A file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A TBX file could not be written or parsed.
    #[error("TBX error in {path}: {message}")]
    Tbx { path: PathBuf, message: String },

    /// A version control command failed.
    #[error("VCS command `{command}` failed: {message}")]
    Vcs { command: String, message: String },

    /// Another writer holds the repository lock.
    #[error("repository is locked: {path}")]
    Locked { path: PathBuf },

    /// The language has no default plural rule.
    #[error("no default plural rule for language {language}")]
    MissingPlural { language: String },
}

impl MigrateError {
    pub(crate) fn tbx(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Tbx {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Convenience alias for migration results.
pub type MigrateResult<T> = std::result::Result<T, MigrateError>;
