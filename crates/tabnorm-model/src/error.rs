use thiserror::Error;

/// Errors raised while building a [`crate::TargetSchema`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("target schema must contain at least one field")]
    Empty,
    #[error("column name at position {position} is empty")]
    EmptyColumnName { position: usize },
    #[error("duplicate column name in target schema: {name}")]
    DuplicateColumn { name: String },
}

pub type Result<T> = std::result::Result<T, SchemaError>;
