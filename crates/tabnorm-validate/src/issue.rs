//! Validation issue types.
//!
//! Each variant carries only the data its message needs.

use std::fmt;

use serde::{Deserialize, Serialize};
use tabnorm_model::FieldKind;

/// One conformance finding about a produced output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum Issue {
    // File checks
    /// The program did not create the output file.
    FileMissing { path: String },
    /// The output exists but is not readable tabular data.
    Unreadable { message: String },

    // Shape checks
    /// A schema column is absent from the output.
    MissingColumn {
        column: String,
        closest: Option<String>,
    },
    /// The output has a column the schema does not name (strict mode only).
    UnexpectedColumn { column: String },
    /// The output header repeats a column name.
    DuplicateColumn { column: String, occurrences: usize },
    /// The output has a header but no data rows.
    NoRows,

    // Content checks
    /// Identifier or date column with null or blank values.
    MissingValues {
        column: String,
        kind: FieldKind,
        missing_count: u64,
    },
    /// Date column with values that do not parse as a date.
    InvalidDate {
        column: String,
        invalid_count: u64,
        samples: Vec<String>,
    },
    /// Numeric column with values that do not parse as numbers.
    NonNumeric {
        column: String,
        invalid_count: u64,
        samples: Vec<String>,
    },
    /// Non-negative column with negative values.
    NegativeValue {
        column: String,
        negative_count: u64,
        samples: Vec<String>,
    },
}

impl Issue {
    /// Column the issue is about, if any.
    pub fn column(&self) -> Option<&str> {
        match self {
            Issue::FileMissing { .. } | Issue::Unreadable { .. } | Issue::NoRows => None,
            Issue::MissingColumn { column, .. }
            | Issue::UnexpectedColumn { column }
            | Issue::DuplicateColumn { column, .. }
            | Issue::MissingValues { column, .. }
            | Issue::InvalidDate { column, .. }
            | Issue::NonNumeric { column, .. }
            | Issue::NegativeValue { column, .. } => Some(column),
        }
    }

    /// Number of offending values (if applicable).
    pub fn count(&self) -> Option<u64> {
        match self {
            Issue::MissingValues { missing_count, .. } => Some(*missing_count),
            Issue::InvalidDate { invalid_count, .. } | Issue::NonNumeric { invalid_count, .. } => {
                Some(*invalid_count)
            }
            Issue::NegativeValue { negative_count, .. } => Some(*negative_count),
            _ => None,
        }
    }

    /// Whether later checks could not run because of this issue.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Issue::FileMissing { .. } | Issue::Unreadable { .. })
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::FileMissing { path } => {
                write!(f, "Output file was not created: {path}")
            }
            Issue::Unreadable { message } => {
                write!(f, "Output file could not be read as CSV: {message}")
            }
            Issue::MissingColumn { column, closest } => {
                write!(f, "Missing required column '{column}'")?;
                if let Some(closest) = closest {
                    write!(f, " (closest produced column: '{closest}')")?;
                }
                Ok(())
            }
            Issue::UnexpectedColumn { column } => {
                write!(f, "Unexpected column '{column}' is not part of the target schema")
            }
            Issue::DuplicateColumn {
                column,
                occurrences,
            } => write!(f, "Column '{column}' appears {occurrences} times in the output header"),
            Issue::NoRows => f.write_str("Output CSV has no rows"),
            Issue::MissingValues {
                column,
                kind,
                missing_count,
            } => write!(
                f,
                "{} column '{column}' has {missing_count} missing value(s)",
                capitalize(kind.label())
            ),
            Issue::InvalidDate {
                column,
                invalid_count,
                samples,
            } => write!(
                f,
                "Date column '{column}' has {invalid_count} unparseable value(s){}",
                format_samples(samples)
            ),
            Issue::NonNumeric {
                column,
                invalid_count,
                samples,
            } => write!(
                f,
                "Numeric column '{column}' has {invalid_count} non-numeric value(s){}",
                format_samples(samples)
            ),
            Issue::NegativeValue {
                column,
                negative_count,
                samples,
            } => write!(
                f,
                "Column '{column}' must be non-negative but has {negative_count} negative value(s){}",
                format_samples(samples)
            ),
        }
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn format_samples(samples: &[String]) -> String {
    if samples.is_empty() {
        return String::new();
    }
    let quoted: Vec<String> = samples.iter().map(|s| format!("'{s}'")).collect();
    format!(", e.g. {}", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_column_and_samples() {
        let issue = Issue::InvalidDate {
            column: "event_date".to_string(),
            invalid_count: 2,
            samples: vec!["yesterday".to_string(), "13/45/2024".to_string()],
        };
        assert_eq!(
            issue.to_string(),
            "Date column 'event_date' has 2 unparseable value(s), e.g. 'yesterday', '13/45/2024'"
        );

        let missing = Issue::MissingValues {
            column: "customer_id".to_string(),
            kind: FieldKind::Identifier,
            missing_count: 1,
        };
        assert_eq!(
            missing.to_string(),
            "Identifier column 'customer_id' has 1 missing value(s)"
        );
    }

    #[test]
    fn missing_column_mentions_closest_match() {
        let issue = Issue::MissingColumn {
            column: "customer_id".to_string(),
            closest: Some("cust_id".to_string()),
        };
        assert_eq!(
            issue.to_string(),
            "Missing required column 'customer_id' (closest produced column: 'cust_id')"
        );
    }
}
