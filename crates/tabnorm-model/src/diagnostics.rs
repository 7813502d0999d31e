//! Failure diagnostics fed back into program generation.
//!
//! Exactly one variant is produced per failed attempt. Its messages are the
//! only feedback carried into the next repair prompt.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Loop stage an attempt failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Generate,
    StaticCheck,
    Execute,
    Validate,
}

impl FailureStage {
    pub fn label(self) -> &'static str {
        match self {
            Self::Generate => "generation",
            Self::StaticCheck => "contract check",
            Self::Execute => "execution",
            Self::Validate => "output validation",
        }
    }
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Diagnostics of one failed attempt, tagged by failure kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "messages", rename_all = "snake_case")]
pub enum AttemptFailure {
    /// The generation service timed out or returned an error.
    Generation(Vec<String>),
    /// The program broke the structural contract or hit the denylist.
    ContractViolation(Vec<String>),
    /// The program ran longer than the execution timeout and was killed.
    ExecutionTimeout(Vec<String>),
    /// The program exited non-zero or could not be started.
    ExecutionError(Vec<String>),
    /// The produced file does not satisfy the target schema.
    Validation(Vec<String>),
}

impl AttemptFailure {
    pub fn stage(&self) -> FailureStage {
        match self {
            Self::Generation(_) => FailureStage::Generate,
            Self::ContractViolation(_) => FailureStage::StaticCheck,
            Self::ExecutionTimeout(_) | Self::ExecutionError(_) => FailureStage::Execute,
            Self::Validation(_) => FailureStage::Validate,
        }
    }

    pub fn messages(&self) -> &[String] {
        match self {
            Self::Generation(messages)
            | Self::ContractViolation(messages)
            | Self::ExecutionTimeout(messages)
            | Self::ExecutionError(messages)
            | Self::Validation(messages) => messages,
        }
    }

    /// Short kind name, as used in logs and tables.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Generation(_) => "generation",
            Self::ContractViolation(_) => "contract_violation",
            Self::ExecutionTimeout(_) => "execution_timeout",
            Self::ExecutionError(_) => "execution_error",
            Self::Validation(_) => "validation",
        }
    }

    /// One-line headline placed above the message list in repair prompts.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::Generation(_) => "The previous generation request failed before a program was produced.",
            Self::ContractViolation(_) => {
                "Generated code does not satisfy the required structure or safety rules."
            }
            Self::ExecutionTimeout(_) => "Program execution exceeded the time limit and was killed.",
            Self::ExecutionError(_) => "Runtime error: the program exited unsuccessfully.",
            Self::Validation(_) => {
                "Validation failed: the output file does not conform to the target schema."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execution_variants_share_a_stage() {
        let timeout = AttemptFailure::ExecutionTimeout(vec!["killed".to_string()]);
        let error = AttemptFailure::ExecutionError(vec!["exit 1".to_string()]);
        assert_eq!(timeout.stage(), FailureStage::Execute);
        assert_eq!(error.stage(), FailureStage::Execute);
        assert_ne!(timeout.kind(), error.kind());
    }
}
