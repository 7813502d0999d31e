use std::path::PathBuf;

use tabnorm_ingest::IngestError;
use thiserror::Error;

/// Request-level failures. Attempt failures never surface here; they are
/// part of the outcome.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The input file could not be profiled.
    #[error("input could not be read: {0}")]
    Input(#[from] IngestError),

    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    /// The generation service cannot be used at all.
    #[error("code generator unavailable: {message}")]
    GeneratorUnavailable { message: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl NormalizeError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}
