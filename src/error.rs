use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TiercfgError {
    #[error("Malformed line {line} in {path}: \"{content}\", should be key = value")]
    Format {
        path: PathBuf,
        line: usize,
        content: String,
    },

    #[error("Include cycle detected at {path}")]
    IncludeCycle { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config path {0} is a directory, expected a file")]
    NotAFile(PathBuf),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Failed to decode config entries: {0}")]
    Json(#[from] serde_json::Error),
}

impl TiercfgError {
    /// True for the "absent" outcome, as opposed to malformed data.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TiercfgError::KeyNotFound(_))
    }
}
