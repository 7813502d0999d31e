//! Infrastructure failures of the executor.

use std::path::PathBuf;

use thiserror::Error;

/// Failures that prevent a program from being run at all.
///
/// A program that runs and fails is not an error here; that outcome is part
/// of the [`ExecutionReport`](crate::ExecutionReport).
#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("failed to create scratch directory: {source}")]
    ScratchDir {
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write program to {path}: {source}")]
    WriteProgram {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to resolve path {path}: {source}")]
    ResolvePath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start interpreter `{interpreter}`: {source}")]
    Spawn {
        interpreter: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for interpreter: {source}")]
    Wait {
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SandboxError>;
