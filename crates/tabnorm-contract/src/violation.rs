use std::fmt;

use serde::{Deserialize, Serialize};

use crate::policy::DenyCategory;

/// A single broken contract rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ContractViolation {
    EmptyProgram,
    TooLarge {
        bytes: usize,
        max_bytes: usize,
    },
    MissingEntryRoutine {
        signature: String,
    },
    EntryArity {
        found: usize,
    },
    MissingGuard,
    MissingGuardInvocation {
        expected: String,
    },
    ForbiddenToken {
        token: String,
        category: DenyCategory,
    },
}

impl ContractViolation {
    /// Stable rule identifier, used in logs.
    pub fn rule(&self) -> &'static str {
        match self {
            Self::EmptyProgram => "empty_program",
            Self::TooLarge { .. } => "too_large",
            Self::MissingEntryRoutine { .. } => "missing_entry_routine",
            Self::EntryArity { .. } => "entry_arity",
            Self::MissingGuard => "missing_guard",
            Self::MissingGuardInvocation { .. } => "missing_guard_invocation",
            Self::ForbiddenToken { .. } => "forbidden_token",
        }
    }
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyProgram => f.write_str("Program is empty."),
            Self::TooLarge { bytes, max_bytes } => {
                write!(f, "Program is {bytes} bytes; the limit is {max_bytes} bytes.")
            }
            Self::MissingEntryRoutine { signature } => {
                write!(f, "Missing entry routine; expected `{signature}`.")
            }
            Self::EntryArity { found } => write!(
                f,
                "Entry routine `transform` must take exactly two parameters (input_path, output_path); found {found}."
            ),
            Self::MissingGuard => f.write_str("Missing direct-execution guard."),
            Self::MissingGuardInvocation { expected } => write!(
                f,
                "Direct-execution guard must call `{expected}` with the two command-line arguments."
            ),
            Self::ForbiddenToken { token, category } => {
                write!(f, "Forbidden pattern `{}` ({category}).", token.trim())
            }
        }
    }
}
