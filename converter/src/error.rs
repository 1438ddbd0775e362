//! Error types for the conversion pipeline.
//!
//! One enum per stage:
//!
//! - [`ConfigError`] - settings file and folder resolution errors
//! - [`CsvError`] - decoding and parsing of a single export file
//! - [`LoadError`] - folder scanning and merging
//! - [`OutputError`] - writing the converted file
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while reading the settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Settings file does not exist.
    #[error("Settings file not found: {0}")]
    FileNotFound(PathBuf),

    /// Settings file exists but is not valid INI.
    #[error("Invalid settings file {path}: {message}")]
    Invalid { path: PathBuf, message: String },

    /// Section missing from the settings file.
    #[error("Missing section [{0}] in settings file")]
    MissingSection(String),

    /// Key missing from its section.
    #[error("Missing key '{key}' in section [{section}]")]
    MissingKey { section: String, key: String },

    /// Key present but blank.
    #[error("Key '{0}' is empty")]
    EmptyValue(String),
}

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors while decoding or parsing one export file.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bytes could not be decoded with the detected encoding.
    #[error("Failed to decode {path} as {encoding}")]
    Encoding { path: PathBuf, encoding: String },

    /// File has no header row.
    #[error("CSV file is empty: {0}")]
    EmptyFile(PathBuf),

    /// A column the converter reads is not in the header.
    #[error("Missing column '{column}' in {path}")]
    MissingColumn { path: PathBuf, column: String },

    /// A row could not be read or deserialized.
    #[error("Malformed row in {path} at line {line}: {message}")]
    MalformedRow {
        path: PathBuf,
        line: u64,
        message: String,
    },
}

// =============================================================================
// Loader Errors
// =============================================================================

/// Errors while scanning the export folder and merging its files.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Folder does not exist.
    #[error("CSV folder not found: {0}")]
    FolderNotFound(PathBuf),

    /// Folder could not be listed.
    #[error("Cannot read CSV folder {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No `*.csv` file in the folder.
    #[error("No CSV files found in {0}")]
    NoCsvFiles(PathBuf),

    /// One of the files failed to parse.
    #[error(transparent)]
    Csv(#[from] CsvError),
}

// =============================================================================
// Output Errors
// =============================================================================

/// Errors while writing the converted file.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Output directory could not be created.
    #[error("Cannot create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output file could not be written.
    #[error("Cannot write {path}: {message}")]
    Write { path: PathBuf, message: String },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the error type returned by [`crate::transform::pipeline::run`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Loading error.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Output error.
    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

impl From<CsvError> for PipelineError {
    fn from(err: CsvError) -> Self {
        PipelineError::Load(LoadError::Csv(err))
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for loading.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for output.
pub type OutputResult<T> = Result<T, OutputError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // CsvError -> PipelineError
        let csv_err = CsvError::EmptyFile(PathBuf::from("a.csv"));
        let pipeline_err: PipelineError = csv_err.into();
        assert!(matches!(pipeline_err, PipelineError::Load(LoadError::Csv(_))));
        assert!(pipeline_err.to_string().contains("empty"));

        // ConfigError -> PipelineError
        let config_err = ConfigError::MissingKey {
            section: "DEFAULT".into(),
            key: "CSV_FOLDER_PATH".into(),
        };
        let pipeline_err: PipelineError = config_err.into();
        assert!(pipeline_err.to_string().contains("CSV_FOLDER_PATH"));
    }

    #[test]
    fn test_missing_column_format() {
        let err = CsvError::MissingColumn {
            path: PathBuf::from("opensea.csv"),
            column: "Bulk".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("opensea.csv"));
        assert!(msg.contains("'Bulk'"));
    }

    #[test]
    fn test_load_error_is_transparent_over_csv() {
        let err: LoadError = CsvError::MalformedRow {
            path: PathBuf::from("x.csv"),
            line: 7,
            message: "found record with 3 fields".into(),
        }
        .into();
        assert!(err.to_string().starts_with("Malformed row in x.csv at line 7"));
    }
}
