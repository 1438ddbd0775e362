//! Run settings.
//!
//! The export folder comes from, in order of precedence: the `--folder`
//! flag, the `CSV_FOLDER_PATH` environment variable (a `.env` file is loaded
//! by the binary), or the `CSV_FOLDER_PATH` key of the `[DEFAULT]` section
//! of an INI settings file:
//!
//! ```ini
//! [DEFAULT]
//! CSV_FOLDER_PATH = /home/me/nft-exports
//! ```

use ini::{Ini, ParseOption};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};

/// Settings file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "../env/config.ini";

/// INI section holding the folder key.
pub const SECTION: &str = "DEFAULT";

/// Key (and environment variable) naming the export folder.
pub const FOLDER_KEY: &str = "CSV_FOLDER_PATH";

/// Sub-directory of the export folder receiving the results.
pub const OUTPUT_DIR: &str = "output";

pub const CONVERTED_FILE: &str = "converted.csv";
pub const MERGED_FILE: &str = "merged.csv";

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Folder holding the `*.csv` exports. Also the output root.
    pub csv_folder_path: PathBuf,
}

impl Settings {
    pub fn new(csv_folder_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_folder_path: csv_folder_path.into(),
        }
    }

    /// Read the folder from an INI settings file.
    pub fn from_ini_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound(path.to_path_buf()),
            _ => ConfigError::Invalid {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        })?;
        Self::from_ini_str(&content, path)
    }

    /// Read the folder from INI text. `path` is only used for error context.
    ///
    /// Key lookup ignores ASCII case. Backslashes are kept literally so that
    /// Windows paths survive.
    pub fn from_ini_str(content: &str, path: &Path) -> ConfigResult<Self> {
        let options = ParseOption {
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(content, options).map_err(|e| ConfigError::Invalid {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let section = ini
            .section(Some(SECTION))
            .ok_or_else(|| ConfigError::MissingSection(SECTION.to_string()))?;

        let value = section
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(FOLDER_KEY))
            .map(|(_, value)| value.trim())
            .ok_or_else(|| ConfigError::MissingKey {
                section: SECTION.to_string(),
                key: FOLDER_KEY.to_string(),
            })?;

        if value.is_empty() {
            return Err(ConfigError::EmptyValue(FOLDER_KEY.to_string()));
        }

        Ok(Self::new(value))
    }

    /// Folder from the `CSV_FOLDER_PATH` environment variable, if set.
    pub fn from_env() -> Option<Self> {
        std::env::var(FOLDER_KEY)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| Self::new(v.trim()))
    }

    /// Resolve settings: explicit folder, then environment, then INI file.
    pub fn resolve(folder: Option<&Path>, config_path: &Path) -> ConfigResult<Self> {
        if let Some(folder) = folder {
            return Ok(Self::new(folder));
        }
        if let Some(settings) = Self::from_env() {
            return Ok(settings);
        }
        Self::from_ini_file(config_path)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.csv_folder_path.join(OUTPUT_DIR)
    }

    /// `<folder>/output/converted.csv`
    pub fn converted_path(&self) -> PathBuf {
        self.output_dir().join(CONVERTED_FILE)
    }

    /// `<folder>/output/merged.csv`
    pub fn merged_path(&self) -> PathBuf {
        self.output_dir().join(MERGED_FILE)
    }
}
