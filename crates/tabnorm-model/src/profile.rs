//! Compact textual profile of an input table.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

/// Per-column summary derived from the input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    /// Best-effort element type label (`int`, `float`, `string`, ...).
    pub type_label: String,
    /// Ratio of null or blank values (0.0 to 1.0).
    pub null_ratio: f64,
    /// Ratio of distinct values among non-null values (0.0 to 1.0).
    pub unique_ratio: f64,
}

/// Read-only summary of the input table embedded in generation prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabularProfile {
    pub columns: Vec<ColumnProfile>,
    /// Total number of data rows in the input.
    pub row_count: usize,
    /// Number of rows contained in `sample_csv`.
    pub sample_rows: usize,
    /// Header plus the first rows, serialized as CSV.
    pub sample_csv: String,
}

impl TabularProfile {
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    /// Deterministic text rendering used in prompts.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("COLUMNS:\n");
        let parts: Vec<String> = self
            .columns
            .iter()
            .map(|column| format!("{} ({})", column.name, column.type_label))
            .collect();
        out.push_str(&parts.join(", "));
        out.push_str("\n\nCOLUMN_HINTS:\n");
        for column in &self.columns {
            let _ = writeln!(
                out,
                "- {}: null {:.1}%, unique {:.1}%",
                column.name,
                column.null_ratio * 100.0,
                column.unique_ratio * 100.0
            );
        }
        let _ = writeln!(out, "\nROW_COUNT: {}", self.row_count);
        out.push_str("\nSAMPLE_ROWS_CSV:\n");
        out.push_str(self.sample_csv.trim_end());
        out
    }
}
