//! Input loading and profiling.
//!
//! This crate turns a raw tabular file into a [`TabularProfile`]: column
//! names, inferred element types, column statistics and a handful of sample
//! rows, all rendered compactly enough to embed in a generation prompt. The
//! same CSV reader is reused by output validation.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use tabnorm_ingest::summarize;
//!
//! let profile = summarize(Path::new("raw/customers.csv"), 5)?;
//! println!("{}", profile.render());
//! ```
//!
//! [`TabularProfile`]: tabnorm_model::TabularProfile

mod error;
mod hints;
mod polars_utils;
mod reader;
mod summary;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use reader::{
    MAX_CSV_FILE_SIZE, ReadOptions, check_file_size_with_limit, read_csv_frame, validate_encoding,
};

// === Profiling ===
pub use hints::{ColumnHint, build_column_hints, type_label};
pub use summary::{DEFAULT_SAMPLE_ROWS, summarize, summarize_with_options};

// === Polars helpers ===
pub use polars_utils::{any_to_f64, any_to_string, format_numeric, parse_f64};
