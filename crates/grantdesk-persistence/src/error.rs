//! Store errors.

use std::path::PathBuf;
use thiserror::Error;

/// Failures from the JSON file store.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record failed to encode, or a stored file failed to decode.
    #[error("malformed record json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A no-clobber write lost to a file already at `path`.
    #[error("path already exists: {0}")]
    PathExists(PathBuf),

    /// The record's slot is taken: a proposal id, an assignment, or a
    /// reviewer's single review for a proposal.
    #[error("{kind} already exists: {id}")]
    AlreadyExists { kind: String, id: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    /// An id that cannot be used as a file name, so it names no record.
    #[error("{0}")]
    InvalidId(String),
}

pub type Result<T> = std::result::Result<T, PersistenceError>;
