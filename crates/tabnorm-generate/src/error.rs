use std::time::Duration;

use thiserror::Error;

/// Failures of a single generation call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// No response within the per-call timeout.
    #[error("generation timed out after {}s", .after.as_secs_f64())]
    Timeout { after: Duration },

    /// The service answered with an error or an unusable response.
    #[error("generation service error: {message}")]
    Service { message: String },

    /// The service cannot be used at all (missing credentials, rejected
    /// authentication, client setup failure).
    #[error("generation service unavailable: {message}")]
    Unavailable { message: String },
}

impl GenerationError {
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}
