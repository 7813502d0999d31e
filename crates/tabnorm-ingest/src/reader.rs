//! CSV file reading with pre-flight checks.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use polars::prelude::*;

use crate::error::{IngestError, Result};

/// Maximum file size for CSV loading (500 MB default).
pub const MAX_CSV_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Options for [`read_csv_frame`].
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    /// Reject files larger than this many bytes.
    pub max_file_size: u64,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            max_file_size: MAX_CSV_FILE_SIZE,
        }
    }
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| IngestError::open(path, e))?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Detect encoding and validate it's supported (UTF-8 only).
///
/// Checks for UTF-16 BOM markers which are not supported.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| IngestError::open(path, e))?;

    let mut buffer = [0u8; 4];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if bytes_read >= 2 {
        // UTF-16 LE BOM
        if buffer[0..2] == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        // UTF-16 BE BOM
        if buffer[0..2] == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }

    Ok(())
}

/// Reads a CSV file (first row = header) into a Polars DataFrame.
///
/// Every column is read as text, so no cell can fail the read because of its
/// type; callers parse values themselves. A file with a header and no data
/// rows yields an empty frame; callers decide whether that is an error.
pub fn read_csv_frame(path: &Path, options: &ReadOptions) -> Result<DataFrame> {
    check_file_size_with_limit(path, options.max_file_size)?;
    validate_encoding(path)?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if df.width() == 0 {
        return Err(IngestError::NoColumns {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "csv loaded"
    );

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_read_csv_frame_basic() {
        let file = create_temp_csv(b"A,B,C\n1,2,3\n4,5,6\n");
        let df = read_csv_frame(file.path(), &ReadOptions::default()).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
    }

    #[test]
    fn test_read_csv_frame_header_only() {
        let file = create_temp_csv(b"A,B\n");
        let df = read_csv_frame(file.path(), &ReadOptions::default()).unwrap();

        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn test_late_off_type_value_does_not_fail_the_read() {
        let mut content = String::from("id,amt\n");
        for idx in 1..=150 {
            content.push_str(&format!("{idx},{idx}\n"));
        }
        content.push_str("151,n/a\n");
        let file = create_temp_csv(content.as_bytes());

        let df = read_csv_frame(file.path(), &ReadOptions::default()).unwrap();

        assert_eq!(df.height(), 151);
        assert_eq!(df.column("amt").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_rejects_utf16() {
        let file = create_temp_csv(&[0xFF, 0xFE, b'A', 0x00]);
        let result = read_csv_frame(file.path(), &ReadOptions::default());

        assert!(matches!(
            result,
            Err(IngestError::UnsupportedEncoding {
                encoding: "UTF-16 LE",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_oversized_file() {
        let file = create_temp_csv(b"A,B\n1,2\n");
        let options = ReadOptions {
            max_file_size: 4,
            ..ReadOptions::default()
        };
        let result = read_csv_frame(file.path(), &options);

        assert!(matches!(result, Err(IngestError::FileTooLarge { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = read_csv_frame(Path::new("/nonexistent/input.csv"), &ReadOptions::default());

        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
