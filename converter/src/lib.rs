//! # kakuteishinkoku - NFT transaction exports to Cryptact custom file
//!
//! Merges every transaction-export CSV in a folder into one table sorted by
//! time and contract address, then remaps the columns to the Cryptact
//! custom-file format used for the annual tax return.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌───────────────┐
//! │ *.csv files │────▶│   Loader    │────▶│  Transform  │────▶│ converted.csv │
//! │ (UTF8/SJIS) │     │ (merge+sort)│     │ (row rules) │     │  (Cryptact)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └───────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use kakuteishinkoku::{run, RunOptions, Settings};
//!
//! let settings = Settings::from_ini_file("../env/config.ini".as_ref())?;
//! let result = run(&settings, &RunOptions::default())?;
//! println!("Converted {} rows", result.converted.len());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per stage
//! - [`models`] - Input and output rows
//! - [`config`] - Settings file and folder resolution
//! - [`parser`] - CSV parsing with encoding/delimiter detection
//! - [`loader`] - Folder scan, merge and sort
//! - [`transform`] - Column rules and pipeline
//! - [`output`] - CSV writers and previews
//! - [`logs`] - Progress logging

// Core modules
pub mod error;
pub mod models;

// Configuration
pub mod config;

// Parsing and loading
pub mod loader;
pub mod parser;

// Transformation
pub mod transform;

// Output
pub mod output;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ConfigError, CsvError, LoadError, OutputError, PipelineError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    Action, Chain, OutputRecord, TransactionRecord, Volume, OUTPUT_COLUMNS, REQUIRED_COLUMNS,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::Settings;

// =============================================================================
// Re-exports - Parsing and loading
// =============================================================================

pub use loader::{list_csv_files, merge_csv_files, MergedTable};
pub use parser::{detect_delimiter, detect_encoding, parse_csv_file, ParsedFile};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{
    classify_action, convert_record, convert_table, derive_base, derive_volume, run,
    select_price, ConversionResult, ConvertedTable, RunOptions, RunStats,
};

// =============================================================================
// Re-exports - Output
// =============================================================================

pub use output::{
    preview_actions, preview_converted, preview_merged, write_converted, write_merged,
};
