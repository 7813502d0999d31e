//! Tabular summarizer: raw input file to [`TabularProfile`].

use std::path::Path;

use polars::prelude::*;
use tabnorm_model::{ColumnProfile, TabularProfile};
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::hints::build_column_hints;
use crate::polars_utils::any_to_string;
use crate::reader::{ReadOptions, read_csv_frame};

/// Sample rows embedded in prompts when the caller does not choose.
pub const DEFAULT_SAMPLE_ROWS: usize = 5;

/// Summarize an input file with default read options.
pub fn summarize(path: &Path, max_sample_rows: usize) -> Result<TabularProfile> {
    summarize_with_options(path, max_sample_rows, &ReadOptions::default())
}

/// Summarize an input file: column names, inferred types, column hints and
/// the first `max_sample_rows` rows as CSV text.
///
/// Fails when the file cannot be parsed as a table or holds no data rows.
pub fn summarize_with_options(
    path: &Path,
    max_sample_rows: usize,
    options: &ReadOptions,
) -> Result<TabularProfile> {
    let df = read_csv_frame(path, options)?;
    if df.height() == 0 {
        return Err(IngestError::EmptyDataFrame {
            path: path.to_path_buf(),
        });
    }

    let columns: Vec<ColumnProfile> = build_column_hints(&df)
        .into_iter()
        .map(|hint| ColumnProfile {
            name: hint.name,
            type_label: hint.type_label.to_string(),
            null_ratio: hint.null_ratio,
            unique_ratio: hint.unique_ratio,
        })
        .collect();

    let sample_rows = df.height().min(max_sample_rows);
    let sample_csv = sample_rows_csv(&df, sample_rows).map_err(|message| {
        IngestError::SampleSerialize {
            path: path.to_path_buf(),
            message,
        }
    })?;

    debug!(
        path = %path.display(),
        columns = columns.len(),
        rows = df.height(),
        sample_rows,
        "input profiled"
    );

    Ok(TabularProfile {
        columns,
        row_count: df.height(),
        sample_rows,
        sample_csv,
    })
}

/// Serialize the header and the first `rows` rows as CSV text.
fn sample_rows_csv(df: &DataFrame, rows: usize) -> std::result::Result<String, String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let header: Vec<&str> = df
        .get_column_names()
        .into_iter()
        .map(PlSmallStr::as_str)
        .collect();
    writer.write_record(&header).map_err(|e| e.to_string())?;

    let columns = df.get_columns();
    for idx in 0..rows {
        let record: Vec<String> = columns
            .iter()
            .map(|col| col.get(idx).map(any_to_string).unwrap_or_default())
            .collect();
        writer.write_record(&record).map_err(|e| e.to_string())?;
    }

    let bytes = writer.into_inner().map_err(|e| e.to_string())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
