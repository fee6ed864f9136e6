use std::path::PathBuf;

use thiserror::Error;

/// Roster import failures. The previous roster is left untouched.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("failed to open spreadsheet {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    #[error("spreadsheet {path} has no worksheets")]
    NoWorksheet { path: PathBuf },

    #[error("header row is missing")]
    MissingHeader,

    #[error("no '{expected}' column in header row")]
    MissingColumn { expected: &'static str },

    #[error("row {row} has no name")]
    MissingName { row: usize },
}

/// Award configuration rejected at the edit boundary. The ledger keeps its
/// previous configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("award '{title}' already has {winners} winners; quota cannot drop to {requested}")]
    QuotaBelowWinners {
        title: String,
        winners: usize,
        requested: u32,
    },

    #[error("award '{title}' already has winners and cannot be removed")]
    RemovesDrawnAward { title: String },

    #[error("award '{title}' already has winners and cannot be renamed")]
    TitleLocked { title: String },

    #[error("award '{title}' must have a quota of at least 1")]
    ZeroQuota { title: String },

    #[error("award id {id} appears more than once")]
    DuplicateId { id: String },

    #[error("no award with id {id}")]
    UnknownAward { id: String },
}

/// Guard conditions of a spin. Callers treat these as a no-op.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DrawError {
    #[error("no eligible participants left")]
    NoEligibleParticipants,

    #[error("award '{title}' is already complete")]
    AwardAlreadyComplete { title: String },

    #[error("a draw is already in progress")]
    DrawAlreadyInProgress,

    #[error("no award is configured")]
    NoCurrentAward,

    #[error("session was reset while the draw was running")]
    SessionReset,
}

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("storage I/O failed for key {key}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("persisted session is corrupt")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to build workbook")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("failed to create output directory {path}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("wrong username or password")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] PersistError),
}
