use std::io;
use thiserror::Error;

/// Errors surfaced by the hotel store and its operations.
#[derive(Debug, Error)]
pub enum HotelError {
    /// Connection string missing or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any failure talking to or committing to the database
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Writing the report failed
    #[error("{0}")]
    Io(#[from] io::Error),
}

impl HotelError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

pub type Result<T, E = HotelError> = std::result::Result<T, E>;
