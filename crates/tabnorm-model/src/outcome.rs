//! Per-attempt audit records and the terminal request outcome.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::diagnostics::AttemptFailure;
use crate::program::GeneratedProgram;

/// Record of one traversal of generate → check → execute → validate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptResult {
    /// 1-based attempt number.
    pub attempt_number: u32,
    /// Program produced by the generator; `None` when generation failed.
    pub program: Option<GeneratedProgram>,
    /// Failure diagnostics; `None` exactly when `success` is true.
    pub failure: Option<AttemptFailure>,
    /// Truncated stdout of the program, empty when it never ran.
    pub stdout_excerpt: String,
    pub success: bool,
}

impl AttemptResult {
    pub fn succeeded(attempt_number: u32, program: GeneratedProgram, stdout_excerpt: String) -> Self {
        Self {
            attempt_number,
            program: Some(program),
            failure: None,
            stdout_excerpt,
            success: true,
        }
    }

    pub fn failed(
        attempt_number: u32,
        program: Option<GeneratedProgram>,
        failure: AttemptFailure,
        stdout_excerpt: String,
    ) -> Self {
        Self {
            attempt_number,
            program,
            failure: Some(failure),
            stdout_excerpt,
            success: false,
        }
    }

    /// Diagnostic messages of this attempt (empty on success).
    pub fn diagnostics(&self) -> &[String] {
        self.failure
            .as_ref()
            .map(AttemptFailure::messages)
            .unwrap_or_default()
    }
}

/// Terminal value of one normalization request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NormalizationOutcome {
    Success {
        attempts_used: u32,
        final_program: GeneratedProgram,
        output_path: PathBuf,
    },
    Failure {
        attempts_used: u32,
        last_diagnostics: Vec<String>,
        last_program: Option<GeneratedProgram>,
    },
}

impl NormalizationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn attempts_used(&self) -> u32 {
        match self {
            Self::Success { attempts_used, .. } | Self::Failure { attempts_used, .. } => {
                *attempts_used
            }
        }
    }
}
