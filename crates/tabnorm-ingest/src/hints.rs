//! Column hints: inferred type labels and value statistics.

use std::collections::BTreeSet;

use polars::prelude::*;

use crate::polars_utils::any_to_string;

/// Statistics for one input column, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnHint {
    pub name: String,
    /// Type label from the dtype, or from the values of text columns.
    pub type_label: &'static str,
    /// Ratio of null or blank values (0.0 to 1.0).
    pub null_ratio: f64,
    /// Ratio of unique values among non-null values (0.0 to 1.0).
    pub unique_ratio: f64,
}

/// Share of numeric values above which a text column with a few stray
/// entries is labelled `mixed` rather than `string`.
const MOSTLY_NUMERIC_RATIO: f64 = 0.9;

/// Maps a polars dtype onto the short labels used in prompts.
pub fn type_label(dtype: &DataType) -> &'static str {
    match dtype {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => "int",
        DataType::Float32 | DataType::Float64 => "float",
        DataType::Boolean => "bool",
        DataType::String => "string",
        DataType::Date => "date",
        DataType::Datetime(_, _) => "datetime",
        DataType::Time => "time",
        DataType::Null => "null",
        _ => "other",
    }
}

/// Builds column hints from a DataFrame, preserving column order.
pub fn build_column_hints(df: &DataFrame) -> Vec<ColumnHint> {
    df.get_columns().iter().map(analyze_column).collect()
}

/// Label for a text column from the values it holds.
///
/// `int` and `float` need every non-blank value to parse; a column that is
/// mostly numeric with a few stray entries is `mixed`.
fn text_type_label(non_null: usize, int_count: usize, float_count: usize, bool_count: usize) -> &'static str {
    if non_null == 0 {
        return "null";
    }
    if int_count == non_null {
        "int"
    } else if float_count == non_null {
        "float"
    } else if bool_count == non_null {
        "bool"
    } else if float_count as f64 / non_null as f64 > MOSTLY_NUMERIC_RATIO {
        "mixed"
    } else {
        "string"
    }
}

fn analyze_column(col: &Column) -> ColumnHint {
    let name = col.name().to_string();
    let total = col.len();
    if total == 0 {
        return ColumnHint {
            name,
            type_label: type_label(col.dtype()),
            null_ratio: 1.0,
            unique_ratio: 0.0,
        };
    }

    let mut null_count = 0usize;
    let mut int_count = 0usize;
    let mut float_count = 0usize;
    let mut bool_count = 0usize;
    let mut unique_values: BTreeSet<String> = BTreeSet::new();

    for idx in 0..total {
        let value = col.get(idx).map(any_to_string).unwrap_or_default();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            null_count += 1;
            continue;
        }
        if trimmed.parse::<i64>().is_ok() {
            int_count += 1;
        }
        if trimmed.parse::<f64>().is_ok() {
            float_count += 1;
        }
        if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("false") {
            bool_count += 1;
        }
        unique_values.insert(trimmed.to_string());
    }

    let non_null = total - null_count;
    let unique_ratio = if non_null > 0 {
        unique_values.len() as f64 / non_null as f64
    } else {
        0.0
    };

    let type_label = if col.dtype() == &DataType::String {
        text_type_label(non_null, int_count, float_count, bool_count)
    } else {
        type_label(col.dtype())
    };

    ColumnHint {
        name,
        type_label,
        null_ratio: null_count as f64 / total as f64,
        unique_ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_follow_column_order() {
        let df = DataFrame::new(vec![
            Series::new("b".into(), vec![Some("x"), None, Some("x")]).into(),
            Series::new("a".into(), vec![1i64, 2, 3]).into(),
        ])
        .unwrap();

        let hints = build_column_hints(&df);

        assert_eq!(hints[0].name, "b");
        assert_eq!(hints[0].type_label, "string");
        assert!((hints[0].null_ratio - 1.0 / 3.0).abs() < 1e-9);
        assert!((hints[0].unique_ratio - 0.5).abs() < 1e-9);

        assert_eq!(hints[1].name, "a");
        assert_eq!(hints[1].type_label, "int");
        assert!((hints[1].unique_ratio - 1.0).abs() < 1e-9);
    }

    #[test]
    fn text_columns_are_labelled_from_their_values() {
        let mut amounts: Vec<&str> = vec!["1"; 19];
        amounts.push("n/a");
        let df = DataFrame::new(vec![
            Series::new("id".into(), vec!["1", "2", "3"]).into(),
            Series::new("amt".into(), vec![Some("1.5"), None, Some("2")]).into(),
            Series::new("flag".into(), vec!["true", "False", "TRUE"]).into(),
            Series::new("name".into(), vec!["ann", "bob", "cy"]).into(),
        ])
        .unwrap();
        let mixed = DataFrame::new(vec![Series::new("qty".into(), amounts).into()]).unwrap();

        let labels: Vec<&str> = build_column_hints(&df)
            .iter()
            .map(|hint| hint.type_label)
            .collect();

        assert_eq!(labels, vec!["int", "float", "bool", "string"]);
        assert_eq!(build_column_hints(&mixed)[0].type_label, "mixed");
    }
}
