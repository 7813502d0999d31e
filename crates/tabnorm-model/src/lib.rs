//! Domain types shared by the tabnorm crates.
//!
//! Everything in here is request scoped: a [`TargetSchema`] and a
//! [`TabularProfile`] are built once per normalization request, each attempt
//! yields one [`AttemptResult`], and the request ends with exactly one
//! [`NormalizationOutcome`].

pub mod diagnostics;
pub mod dialect;
pub mod error;
pub mod outcome;
pub mod profile;
pub mod program;
pub mod schema;

pub use diagnostics::{AttemptFailure, FailureStage};
pub use dialect::ScriptDialect;
pub use error::{Result, SchemaError};
pub use outcome::{AttemptResult, NormalizationOutcome};
pub use profile::{ColumnProfile, TabularProfile};
pub use program::GeneratedProgram;
pub use schema::{FieldKind, SchemaField, TargetSchema};
