//! Crate-wide error type.
//!
//! The algorithmic core never fails; only the ambient layers (config loading,
//! file I/O in the CLI, JSON decoding) return these.

use thiserror::Error;

/// Errors raised outside the pure graph / pivot core.
#[derive(Debug, Error)]
pub enum PivotGraphError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<serde_yaml::Error> for PivotGraphError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PivotGraphError>;
