//! kakuteishinkoku CLI - Merge NFT transaction exports into a Cryptact custom file
//!
//! # Main Commands
//!
//! ```bash
//! kakuteishinkoku                           # Same as `convert` with defaults
//! kakuteishinkoku convert --folder ./csv    # Merge, convert, write output/converted.csv
//! kakuteishinkoku merge --output merged.csv # Only merge and sort the exports
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! kakuteishinkoku parse export.csv          # Parse one export and show its first rows
//! ```

use clap::{Args, Parser, Subcommand};
use kakuteishinkoku::config::DEFAULT_CONFIG_PATH;
use kakuteishinkoku::logs::init_tracing;
use kakuteishinkoku::{
    merge_csv_files, parse_csv_file, preview_actions, preview_converted, preview_merged, run,
    write_merged, MergedTable, RunOptions, Settings,
};
use std::path::{Path, PathBuf};

/// Rows shown in each preview by default
const DEFAULT_PREVIEW_ROWS: usize = 5;

#[derive(Parser)]
#[command(name = "kakuteishinkoku")]
#[command(about = "Convert NFT transaction exports to the Cryptact custom-file format", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Where the export folder comes from
#[derive(Args, Clone)]
struct SourceArgs {
    /// INI settings file with [DEFAULT] CSV_FOLDER_PATH
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Export folder (overrides CSV_FOLDER_PATH and the settings file)
    #[arg(short, long)]
    folder: Option<PathBuf>,
}

impl Default for SourceArgs {
    fn default() -> Self {
        Self {
            config: PathBuf::from(DEFAULT_CONFIG_PATH),
            folder: None,
        }
    }
}

impl SourceArgs {
    fn settings(&self) -> Result<Settings, Box<dyn std::error::Error>> {
        Ok(Settings::resolve(self.folder.as_deref(), &self.config)?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Merge all exports and write output/converted.csv
    Convert {
        #[command(flatten)]
        source: SourceArgs,

        /// Rows shown in each preview
        #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
        preview_rows: usize,

        /// Also write output/merged.csv
        #[arg(long)]
        write_merged: bool,
    },

    /// Merge and sort all exports without converting
    Merge {
        #[command(flatten)]
        source: SourceArgs,

        /// Rows shown in the preview
        #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
        preview_rows: usize,

        /// Write the merged table to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse a single export file and show its first rows
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Rows shown in the preview
        #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
        preview_rows: usize,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Convert {
            source: SourceArgs::default(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            write_merged: false,
        }
    }
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command.unwrap_or_default() {
        Commands::Convert {
            source,
            preview_rows,
            write_merged,
        } => cmd_convert(&source, preview_rows, write_merged),

        Commands::Merge {
            source,
            preview_rows,
            output,
        } => cmd_merge(&source, preview_rows, output.as_deref()),

        Commands::Parse {
            input,
            preview_rows,
        } => cmd_parse(&input, preview_rows),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_convert(
    source: &SourceArgs,
    preview_rows: usize,
    write_merged: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = source.settings()?;
    let result = run(&settings, &RunOptions { write_merged })?;

    println!("{}", preview_merged(&result.merged, preview_rows));
    println!();
    println!("{}", preview_converted(&result.converted, preview_rows));
    println!();
    println!("{}", preview_actions(&result.converted, preview_rows));

    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_merge(
    source: &SourceArgs,
    preview_rows: usize,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = source.settings()?;
    let merged = merge_csv_files(&settings.csv_folder_path)?;

    println!("{}", preview_merged(&merged, preview_rows));

    if let Some(path) = output {
        write_merged(&merged, path)?;
        eprintln!("💾 Output written to: {}", path.display());
    }

    Ok(())
}

fn cmd_parse(input: &Path, preview_rows: usize) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let parsed = parse_csv_file(input)?;

    eprintln!("   Encoding: {}", parsed.encoding);
    eprintln!(
        "   Delimiter: '{}'",
        match parsed.delimiter {
            '\t' => "\\t".to_string(),
            c => c.to_string(),
        }
    );
    eprintln!("   Columns: {}", parsed.headers.join(", "));
    eprintln!("✅ Parsed {} records", parsed.records.len());

    let table = MergedTable {
        files: vec![parsed.path],
        records: parsed.records,
    };
    println!("{}", preview_merged(&table, preview_rows));

    Ok(())
}
