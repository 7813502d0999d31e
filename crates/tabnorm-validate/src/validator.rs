use std::path::Path;

use polars::prelude::DataFrame;
use tabnorm_ingest::{ReadOptions, read_csv_frame};
use tabnorm_model::TargetSchema;
use tracing::debug;

use crate::checks::{self, duplicate_columns};
use crate::issue::Issue;
use crate::report::ValidationReport;

/// Options for [`validate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateOptions {
    /// Also reject columns the schema does not name.
    pub strict_columns: bool,
    pub read: ReadOptions,
}

/// Validate the file at `path` against `schema`.
///
/// A missing or unreadable file is reported alone, since nothing else can
/// be checked. Otherwise every check runs and all issues are returned
/// together. Never fails: problems with the file are issues, not errors.
pub fn validate(path: &Path, schema: &TargetSchema, options: &ValidateOptions) -> ValidationReport {
    if !path.is_file() {
        return Issue::FileMissing {
            path: path.display().to_string(),
        }
        .into();
    }

    let header = match read_header(path) {
        Ok(header) => header,
        Err(message) => return Issue::Unreadable { message }.into(),
    };
    let duplicates = duplicate_columns(&header);

    let df = match read_csv_frame(path, &options.read) {
        Ok(df) => df,
        Err(error) if duplicates.is_empty() => {
            return Issue::Unreadable {
                message: error.to_string(),
            }
            .into();
        }
        // The reader rejects repeated header names; the duplicates explain why.
        Err(_) => {
            return ValidationReport {
                issues: duplicates,
            };
        }
    };

    let mut report = ValidationReport::new();
    report.extend(duplicates);
    report.extend(validate_frame(&df, schema, options).issues);

    debug!(
        path = %path.display(),
        rows = df.height(),
        issues = report.len(),
        "output validated"
    );
    report
}

/// Validate an already loaded frame.
pub fn validate_frame(df: &DataFrame, schema: &TargetSchema, options: &ValidateOptions) -> ValidationReport {
    checks::run_all(schema, df, options.strict_columns)
}

fn read_header(path: &Path) -> Result<Vec<String>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| e.to_string())?;
    let header = reader.headers().map_err(|e| e.to_string())?;
    if header.is_empty() || header.iter().all(|name| name.trim().is_empty()) {
        return Err("file is empty or has no header row".to_string());
    }
    Ok(header.iter().map(ToString::to_string).collect())
}
