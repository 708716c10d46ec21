// Ingestion settings
// Loaded from ~/.config/ruckstats/ingest.toml (or an explicit --config path)

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use ruckstats_core::layout::{CLUBS_SHEET, MATCHES_SHEET};
use ruckstats_core::Group;
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    Io { path: PathBuf, message: String },
    /// TOML parse / deserialization error.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "cannot read {}: {message}", path.display()),
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Where the source workbook lives and which sheets to read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbookSettings {
    pub path: PathBuf,
    pub clubs_sheet: String,
    pub matches_sheet: String,
}

impl Default for WorkbookSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data").join("report.xlsx"),
            clubs_sheet: CLUBS_SHEET.to_string(),
            matches_sheet: MATCHES_SHEET.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// SQLite database file.
    pub path: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self { path: PathBuf::from("data").join("ruckstats.db") }
    }
}

/// Group assignments on top of the built-in championship table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupSettings {
    /// Group for teams found in neither table.
    pub default: Group,
    /// Per-team overrides, e.g. `"Benfica" = "B"`.
    pub teams: BTreeMap<String, Group>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    pub workbook: WorkbookSettings,
    pub store: StoreSettings,
    pub groups: GroupSettings,
}

impl IngestSettings {
    /// Default config location.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ruckstats")
            .join("ingest.toml")
    }

    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&contents)
    }

    /// Load an explicit config file, or the default location if present.
    ///
    /// A missing explicit file is an error; a missing default file yields
    /// the built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::config_path();
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
