//! Output validation.
//!
//! Checks a produced CSV file against the target schema and collects every
//! finding in a [`ValidationReport`]. An empty report means the output is
//! accepted; the messages of a non-empty report are fed back to generation.

mod checks;
mod issue;
mod report;
mod validator;

pub use issue::Issue;
pub use report::ValidationReport;
pub use validator::{ValidateOptions, validate, validate_frame};
