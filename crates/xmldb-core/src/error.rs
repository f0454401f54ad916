use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    BadInvocation(String),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Invalid xpath '{xpath}': {reason}")]
    InvalidXPath { xpath: String, reason: String },

    #[error("Malformed source {}: {reason}", path.display())]
    MalformedSource { path: PathBuf, reason: String },

    #[error("Extraction of field '{field}' from {} failed: {reason}", path.display())]
    ExtractionFailed {
        field: String,
        path: PathBuf,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
