//! Error types for dataset operations.

use fretwise_analysis::AnalysisError;
use fretwise_synth::SynthError;
use std::path::PathBuf;
use thiserror::Error;

/// What is wrong with a note table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedReason {
    /// The table has no rows.
    #[error("table has no rows")]
    Empty,

    /// A required column is absent from the header.
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    /// A row has a different number of fields than the header.
    #[error("row {row}: expected {expected} fields, found {found}")]
    FieldCount {
        /// 1-based data row.
        row: usize,
        /// Header field count.
        expected: usize,
        /// Row field count.
        found: usize,
    },

    /// A value could not be parsed.
    #[error("row {row}: cannot parse {column} value '{value}'")]
    InvalidValue {
        /// 1-based data row.
        row: usize,
        /// Column name.
        column: &'static str,
        /// Raw text.
        value: String,
    },

    /// A value parsed but lies outside its valid range.
    #[error("row {row}: {column} value {value} is out of range")]
    OutOfRange {
        /// 1-based data row.
        row: usize,
        /// Column name.
        column: &'static str,
        /// Offending value, formatted.
        value: String,
    },

    /// A quoted field is never closed on its line.
    #[error("row {row}: unterminated quoted field")]
    UnterminatedQuote {
        /// 1-based data row, 0 for the header.
        row: usize,
    },

    /// The rows do not form a complete fretboard layout.
    #[error("layout check failed: {0}")]
    Layout(String),
}

/// Errors that can occur while loading inputs or producing a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The note table is structurally invalid.
    #[error("malformed note table: {0}")]
    MalformedNoteTable(#[from] MalformedReason),

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// I/O error on a caller-provided reader or writer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Failed to read or write JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An accepted record lacks a field only rejected records may omit.
    #[error("record {index}: accepted sample is missing '{field}'")]
    IncompleteRecord {
        /// 0-based position in the input.
        index: usize,
        /// Missing field name.
        field: &'static str,
    },

    /// Configuration values are unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Synthesis failed.
    #[error(transparent)]
    Synth(#[from] SynthError),

    /// Analysis failed outside of per-sample processing.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl DatasetError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DatasetError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DatasetError::WriteFile {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn missing_column_display() {
        let err = DatasetError::from(MalformedReason::MissingColumn("frequency"));
        assert_eq!(
            err.to_string(),
            "malformed note table: missing required column 'frequency'"
        );
    }

    #[test]
    fn invalid_value_display() {
        let reason = MalformedReason::InvalidValue {
            row: 3,
            column: "fret",
            value: "x".to_string(),
        };
        assert_eq!(reason.to_string(), "row 3: cannot parse fret value 'x'");
    }

    #[test]
    fn read_file_display_and_source() {
        let err = DatasetError::read_file("/a/notes.csv", mock_io_err());
        let msg = err.to_string();
        assert!(msg.contains("failed to read file"), "got: {msg}");
        assert!(msg.contains("/a/notes.csv"), "got: {msg}");
        assert!(err.source().is_some());
    }

    #[test]
    fn write_file_factory_produces_correct_variant() {
        let err = DatasetError::write_file("/out/data.json", mock_io_err());
        assert!(
            matches!(err, DatasetError::WriteFile { ref path, .. } if path == std::path::Path::new("/out/data.json"))
        );
    }

    #[test]
    fn analysis_error_is_transparent() {
        let err = DatasetError::from(AnalysisError::EmptySignal);
        assert_eq!(err.to_string(), AnalysisError::EmptySignal.to_string());
    }
}
