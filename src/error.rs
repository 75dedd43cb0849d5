//! Error taxonomy for bookbits
//!
//! Every failure is terminal and maps to one process exit code.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced to the user
#[derive(Error, Debug)]
pub enum Error {
    /// The store holds no highlights or notes
    #[error("No highlights found")]
    NoHighlights,

    /// A database file is missing or cannot be opened
    #[error("Apple Books database unavailable: {0}")]
    StoreUnavailable(String),

    /// A database file does not have the expected tables or columns
    #[error("Apple Books database has an unexpected layout: {0}")]
    StoreCorrupt(String),

    /// The user backed out of a menu
    #[error("Selection cancelled")]
    UserCancelled,

    /// The export file could not be written
    #[error("Failed to write {}: {source}", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The terminal could not be driven for the menus
    #[error("Terminal error: {0}")]
    Terminal(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::NoHighlights => 1,
            Error::StoreUnavailable(_) | Error::StoreCorrupt(_) => 2,
            Error::UserCancelled | Error::Terminal(_) => 3,
            Error::WriteError { .. } => 4,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::WriteError {
            path: path.into(),
            source,
        }
    }
}

impl From<rusqlite::Error> for Error {
    /// Sort SQLite failures into "can't reach the file" and "file isn't what we expect"
    fn from(err: rusqlite::Error) -> Self {
        use rusqlite::ErrorCode;

        match err.sqlite_error_code() {
            Some(
                ErrorCode::CannotOpen
                | ErrorCode::PermissionDenied
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::SystemIoFailure,
            ) => Error::StoreUnavailable(err.to_string()),
            _ => Error::StoreCorrupt(err.to_string()),
        }
    }
}
