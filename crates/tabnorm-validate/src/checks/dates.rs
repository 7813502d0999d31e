//! Date columns must be populated and parseable.
//!
//! Accepts ISO 8601 dates and datetimes plus a few common regional layouts.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::DataFrame;
use tabnorm_model::{FieldKind, TargetSchema};

use super::{MAX_SAMPLES, cell_strings, is_missing_value};
use crate::issue::Issue;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

pub(crate) fn check(schema: &TargetSchema, df: &DataFrame, columns: &HashSet<&str>) -> Vec<Issue> {
    let mut issues = Vec::new();

    for field in schema.fields() {
        if field.kind() != FieldKind::Date {
            continue;
        }
        let column = field.column_name.as_str();
        if !columns.contains(column) {
            continue;
        }

        let mut missing_count = 0u64;
        let mut invalid_count = 0u64;
        let mut samples = Vec::new();
        for value in cell_strings(df, column) {
            if is_missing_value(&value) {
                missing_count += 1;
            } else if !is_parseable_date(&value) {
                invalid_count += 1;
                if samples.len() < MAX_SAMPLES {
                    samples.push(value);
                }
            }
        }

        if missing_count > 0 {
            issues.push(Issue::MissingValues {
                column: field.column_name.clone(),
                kind: FieldKind::Date,
                missing_count,
            });
        }
        if invalid_count > 0 {
            issues.push(Issue::InvalidDate {
                column: field.column_name.clone(),
                invalid_count,
                samples,
            });
        }
    }

    issues
}

/// Whether `value` reads as a calendar date or a date with time.
pub(crate) fn is_parseable_date(value: &str) -> bool {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .any(|format| NaiveDate::parse_from_str(value, format).is_ok())
        || DATETIME_FORMATS
            .iter()
            .any(|format| NaiveDateTime::parse_from_str(value, format).is_ok())
        || DateTime::parse_from_rfc3339(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_layouts() {
        for value in [
            "2024-01-05",
            "2024/01/05",
            "01/05/2024",
            "05.01.2024",
            "2024-01-05 13:45:00",
            "2024-01-05T13:45:00.123",
            "2024-01-05T13:45:00Z",
            "2024-01-05T13:45:00+02:00",
        ] {
            assert!(is_parseable_date(value), "{value}");
        }
    }

    #[test]
    fn rejects_impossible_and_free_text_dates() {
        for value in ["2024-02-30", "yesterday", "13/45/2024", "2024-13-01"] {
            assert!(!is_parseable_date(value), "{value}");
        }
    }
}
