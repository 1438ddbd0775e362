//! High-level pipeline API: export folder → Cryptact custom file.
//!
//! Combines all steps: folder scan, parsing, merging, conversion and writing.
//!
//! # Example
//!
//! ```rust,ignore
//! use kakuteishinkoku::{run, RunOptions, Settings};
//!
//! let settings = Settings::new("/home/me/nft-exports");
//! let result = run(&settings, &RunOptions::default())?;
//! println!("Wrote {} rows to {}", result.converted.len(), result.converted_path.display());
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use super::convert::{convert_table, ConvertedTable};
use crate::config::Settings;
use crate::error::PipelineResult;
use crate::loader::{merge_csv_files, MergedTable};
use crate::logs::{log_info, log_success, log_success_indent, log_warning};
use crate::models::{Action, Chain};
use crate::output::{write_converted, write_merged};

/// Options for one run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Also dump the merged table to `<folder>/output/merged.csv`
    pub write_merged: bool,
}

/// Row counts for the run summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub files: usize,
    pub rows: usize,
    pub ethereum_rows: usize,
    pub polygon_rows: usize,
    /// Rows whose event type matched no rule
    pub unclassified_rows: usize,
    pub actions: BTreeMap<String, usize>,
}

impl RunStats {
    pub fn collect(merged: &MergedTable, converted: &ConvertedTable) -> Self {
        let ethereum_rows = merged
            .records
            .iter()
            .filter(|r| r.chain() == Chain::Ethereum)
            .count();
        let unclassified_rows = converted
            .records
            .iter()
            .filter(|r| matches!(r.action, Action::Other(_)))
            .count();

        Self {
            files: merged.files.len(),
            rows: merged.len(),
            ethereum_rows,
            polygon_rows: merged.len() - ethereum_rows,
            unclassified_rows,
            actions: converted.action_counts(),
        }
    }
}

/// Result of a complete run
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// Sorted input rows
    pub merged: MergedTable,
    /// Output rows, same order as `merged`
    pub converted: ConvertedTable,
    /// Where the Cryptact file was written
    pub converted_path: PathBuf,
    /// Where the merged dump was written, if requested
    pub merged_path: Option<PathBuf>,
    pub stats: RunStats,
}

/// Run the whole conversion for the configured folder.
///
/// Nothing is written unless every file loaded and every row converted.
pub fn run(settings: &Settings, options: &RunOptions) -> PipelineResult<ConversionResult> {
    // Step 1: Load and merge
    log_info(format!(
        "📖 Loading exports from {}",
        settings.csv_folder_path.display()
    ));
    let merged = merge_csv_files(&settings.csv_folder_path)?;
    if merged.is_empty() {
        log_warning("CSV files contain no rows; writing header only");
    }

    // Step 2: Convert
    log_info("🔄 Converting to Cryptact custom format...");
    let converted = convert_table(&merged);
    let stats = RunStats::collect(&merged, &converted);

    log_success(format!(
        "{} rows ({} Ethereum, {} Polygon)",
        stats.rows, stats.ethereum_rows, stats.polygon_rows
    ));
    for (action, count) in &stats.actions {
        log_success_indent(format!("{}: {}", action, count), 1);
    }
    if stats.unclassified_rows > 0 {
        log_warning(format!(
            "{} rows kept their event type as Action",
            stats.unclassified_rows
        ));
    }

    // Step 3: Write
    let converted_path = settings.converted_path();
    write_converted(&converted, &converted_path)?;
    log_success(format!("💾 Written to {}", converted_path.display()));

    let merged_path = if options.write_merged {
        let path = settings.merged_path();
        write_merged(&merged, &path)?;
        log_success(format!("💾 Merged table written to {}", path.display()));
        Some(path)
    } else {
        None
    };

    Ok(ConversionResult {
        merged,
        converted,
        converted_path,
        merged_path,
        stats,
    })
}
