//! Numeric columns must parse; non-negative columns must not go below zero.

use std::collections::HashSet;

use polars::prelude::{AnyValue, DataFrame};
use tabnorm_ingest::{any_to_f64, any_to_string};
use tabnorm_model::{FieldKind, TargetSchema};

use super::{MAX_SAMPLES, is_missing_value};
use crate::issue::Issue;

pub(crate) fn check(schema: &TargetSchema, df: &DataFrame, columns: &HashSet<&str>) -> Vec<Issue> {
    let mut issues = Vec::new();

    for field in schema.fields() {
        if field.kind() != FieldKind::Numeric {
            continue;
        }
        let column = field.column_name.as_str();
        if !columns.contains(column) {
            continue;
        }
        let Ok(series) = df.column(column) else {
            continue;
        };
        let non_negative = field.requires_non_negative();

        let mut invalid_count = 0u64;
        let mut invalid_samples = Vec::new();
        let mut negative_count = 0u64;
        let mut negative_samples = Vec::new();

        for idx in 0..df.height() {
            let value = series.get(idx).unwrap_or(AnyValue::Null);
            let text = any_to_string(value.clone());
            if is_missing_value(&text) {
                continue; // missing measures are allowed
            }
            match any_to_f64(value) {
                None => {
                    invalid_count += 1;
                    if invalid_samples.len() < MAX_SAMPLES {
                        invalid_samples.push(text.trim().to_string());
                    }
                }
                Some(number) if non_negative && number < 0.0 => {
                    negative_count += 1;
                    if negative_samples.len() < MAX_SAMPLES {
                        negative_samples.push(text.trim().to_string());
                    }
                }
                Some(_) => {}
            }
        }

        if invalid_count > 0 {
            issues.push(Issue::NonNumeric {
                column: field.column_name.clone(),
                invalid_count,
                samples: invalid_samples,
            });
        }
        if negative_count > 0 {
            issues.push(Issue::NegativeValue {
                column: field.column_name.clone(),
                negative_count,
                samples: negative_samples,
            });
        }
    }

    issues
}
