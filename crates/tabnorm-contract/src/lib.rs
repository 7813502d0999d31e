//! Static contract checker for generated programs.
//!
//! The checker is purely textual: it never executes anything, so it stays
//! cheap and side-effect free even for hostile input. All rules run
//! independently and every violation is reported in one pass.
//!
//! Rules:
//! - size ceiling on the UTF-8 encoded program
//! - entry routine `transform` with two parameters
//! - direct-execution guard that calls `transform` with the two
//!   command-line arguments
//! - denylist of process, network, dynamic-evaluation and destructive
//!   filesystem tokens

mod checker;
mod patterns;
mod policy;
mod violation;

pub use checker::ContractChecker;
pub use policy::{ContractPolicy, DEFAULT_MAX_PROGRAM_BYTES, DenyCategory, DenyRule};
pub use violation::ContractViolation;
