//! Validation check modules.
//!
//! Each module performs one kind of check and returns its issues; the
//! checks never depend on each other's results.

mod columns;
mod dates;
mod identifiers;
mod numeric;

use std::collections::HashSet;

use polars::prelude::{AnyValue, DataFrame};
use tabnorm_ingest::any_to_string;
use tabnorm_model::TargetSchema;

use crate::issue::Issue;
use crate::report::ValidationReport;

pub(crate) use columns::duplicate_columns;

/// Samples kept per content issue.
const MAX_SAMPLES: usize = 5;

/// Placeholder spellings read as missing values.
const MISSING_TOKENS: &[&str] = &["na", "n/a", "nan", "null", "none"];

/// Run all frame-level checks.
pub(crate) fn run_all(schema: &TargetSchema, df: &DataFrame, strict_columns: bool) -> ValidationReport {
    let column_lookup = build_column_lookup(df);
    let mut report = ValidationReport::new();

    // 1. Required columns present, extra columns under strict mode
    report.extend(columns::check(schema, df, &column_lookup, strict_columns));

    // 2. At least one data row
    if df.height() == 0 {
        report.add(Issue::NoRows);
    }

    // 3. Identifier columns fully populated
    report.extend(identifiers::check(schema, df, &column_lookup));

    // 4. Date columns populated and parseable
    report.extend(dates::check(schema, df, &column_lookup));

    // 5. Numeric columns parse, non-negative where required
    report.extend(numeric::check(schema, df, &column_lookup));

    report
}

/// Produced column names. Matching against the schema is exact.
fn build_column_lookup(df: &DataFrame) -> HashSet<&str> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.as_str())
        .collect()
}

/// Cell values of `column` as trimmed strings, nulls as empty strings.
fn cell_strings(df: &DataFrame, column: &str) -> Vec<String> {
    let Ok(series) = df.column(column) else {
        return Vec::new();
    };
    (0..df.height())
        .map(|idx| {
            let value = series.get(idx).unwrap_or(AnyValue::Null);
            any_to_string(value).trim().to_string()
        })
        .collect()
}

fn is_missing_value(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || MISSING_TOKENS
            .iter()
            .any(|token| trimmed.eq_ignore_ascii_case(token))
}
