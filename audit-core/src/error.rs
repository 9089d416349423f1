//! src/error.rs
//! ============================================================================
//! # Errors: Taxonomy for the Audit Checklist Core
//!
//! Each engine returns its own narrow error type so callers can match on the
//! exact failure: moves fail with [`InvalidMove`], imports with
//! [`ImportError`], interactive store edits with [`StoreError`]. None of these
//! are fatal; the engine that produced them leaves state untouched.
//! [`AppError`] is the umbrella used at the storage/config/CLI boundary.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Why a drag/drop or explicit move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidMove {
    #[error("move source or target is missing")]
    MissingTarget,

    #[error("cannot drop an item onto itself")]
    SelfDrop,

    #[error("cannot move a folder into itself or one of its subfolders")]
    CircularMove,

    #[error("drop target is not a folder")]
    NotAFolder,

    /// The rewritten path would land on a path another record already owns.
    #[error("destination already contains an item with the same path")]
    PathCollision,

    #[error("move would leave a record with an empty path")]
    EmptyPath,

    #[error("move would duplicate a record id")]
    DuplicateId,
}

/// Why an import left the record collection untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("import is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("unrecognized import shape: {0}")]
    UnrecognizedShape(String),

    #[error("import contained no records")]
    EmptyResult,
}

/// Rejections from interactive record-store edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("a record with path '{0}' already exists")]
    DuplicatePath(String),

    #[error("a record with id '{0}' already exists")]
    DuplicateId(String),

    #[error("record path must not be empty")]
    EmptyPath,
}

impl From<StoreError> for InvalidMove {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicatePath(_) => Self::PathCollision,
            StoreError::DuplicateId(_) => Self::DuplicateId,
            StoreError::EmptyPath => Self::EmptyPath,
        }
    }
}

/// Unified error type for the storage, configuration and CLI boundary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Standard IO error, auto-converted from `io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Storage file I/O error with path.
    #[error("Storage I/O failed on {path:?}: {source}")]
    StorageIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Invalid storage key (keys become file names).
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    /// TOML config parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// TOML config serialization error.
    #[error("Config serialize error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    /// Platform config/data directory could not be determined.
    #[error("Could not determine {0} directory")]
    NoProjectDir(&'static str),

    /// JSON (de)serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Record store error: {0}")]
    Store(#[from] StoreError),

    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    #[error("Move rejected: {0}")]
    Move(#[from] InvalidMove),

    /// Input validation errors
    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },
}

impl AppError {
    /// Create an input validation error
    pub fn invalid_input<S1: Into<String>, S2: Into<String>>(field: S1, message: S2) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a storage I/O error bound to a path
    pub fn storage_io<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::StorageIo {
            path: path.into(),
            source,
        }
    }

    /// True for failures that leave in-memory state untouched and can be
    /// reported as warnings.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Store(_) | Self::Import(_) | Self::Move(_) | Self::InvalidInput { .. }
        )
    }
}
