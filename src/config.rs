use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::models::{FreelancerProfile, DEFAULT_CURRENCY, DEFAULT_NAME};
use crate::store::RecordStore;

const APP_NAME: &str = "timecard";
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the data file location.
pub const DATA_FILE_ENV: &str = "TIMECARD_DATA_FILE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name given to a freshly created profile
    pub default_name: String,
    /// Currency code given to a freshly created profile
    pub default_currency: String,
    /// Number of sessions shown when no count is given
    pub default_recent_count: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_name: DEFAULT_NAME.to_string(),
            default_currency: DEFAULT_CURRENCY.to_string(),
            default_recent_count: 5,
        }
    }
}

impl Settings {
    /// Load settings from the user's config directory.
    /// Returns defaults if the file doesn't exist or fails to parse.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to load settings, using defaults: {:#}", e);
                Self::default()
            }
        }
    }

    fn try_load() -> Result<Self> {
        let config_path = get_config_path()?;
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).context("Failed to read config file")?;

        let settings = serde_json::from_str(&content).context("Failed to parse config file")?;

        Ok(settings)
    }

    /// The profile used when no data file exists yet.
    pub fn fresh_profile(&self) -> FreelancerProfile {
        FreelancerProfile::new(&self.default_name, &self.default_currency)
    }
}

/// Pick the data file: an explicit path, then `TIMECARD_DATA_FILE`, then the
/// platform data directory.
pub fn resolve_store(explicit: Option<PathBuf>) -> Result<RecordStore> {
    if let Some(path) = explicit {
        return Ok(RecordStore::new(path));
    }
    if let Some(path) = std::env::var_os(DATA_FILE_ENV).filter(|p| !p.is_empty()) {
        return Ok(RecordStore::new(PathBuf::from(path)));
    }
    RecordStore::open_default()
}

fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}
