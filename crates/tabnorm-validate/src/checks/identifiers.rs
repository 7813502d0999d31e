//! Identifier columns must be populated on every row.

use std::collections::HashSet;

use polars::prelude::DataFrame;
use tabnorm_model::{FieldKind, TargetSchema};

use super::{cell_strings, is_missing_value};
use crate::issue::Issue;

pub(crate) fn check(schema: &TargetSchema, df: &DataFrame, columns: &HashSet<&str>) -> Vec<Issue> {
    let mut issues = Vec::new();

    for field in schema.fields() {
        if field.kind() != FieldKind::Identifier {
            continue;
        }
        let column = field.column_name.as_str();
        if !columns.contains(column) {
            continue;
        }

        let missing_count = cell_strings(df, column)
            .iter()
            .filter(|value| is_missing_value(value))
            .count() as u64;
        if missing_count > 0 {
            issues.push(Issue::MissingValues {
                column: field.column_name.clone(),
                kind: FieldKind::Identifier,
                missing_count,
            });
        }
    }

    issues
}
