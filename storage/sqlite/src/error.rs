//! Error types for the SQLite layer

use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqliteError {
    #[error("SQLite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),

    /// The statement failed to prepare. Every execution of the request reports the same error.
    #[error("Failed to compile `{sql}`: {source}")]
    Compile { sql: String, source: Arc<rusqlite::Error> },

    #[error("Invalid table name: {0:?}")]
    InvalidTableName(String),

    #[error("Connection worker stopped before the request completed")]
    WorkerGone,

    #[error("No prepared statement is held for `{0}`")]
    Released(String),
}
