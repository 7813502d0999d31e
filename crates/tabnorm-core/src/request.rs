use std::path::PathBuf;
use std::time::Duration;

use tabnorm_model::TargetSchema;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_EXECUTION_TIMEOUT: Duration = Duration::from_secs(60);

/// One normalization job: where to read, where to write, what to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationRequest {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub schema: TargetSchema,
    /// Upper bound on attempts, at least 1.
    pub max_attempts: u32,
    /// Per generation call.
    pub generation_timeout: Duration,
    /// Per program execution.
    pub execution_timeout: Duration,
}

impl NormalizationRequest {
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        schema: TargetSchema,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            schema,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
            execution_timeout: DEFAULT_EXECUTION_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    #[must_use]
    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_execution_timeout(mut self, timeout: Duration) -> Self {
        self.execution_timeout = timeout;
        self
    }
}
