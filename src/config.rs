// src/config.rs

//! Settings record
//!
//! A small JSON file in the working directory holding the mods directory
//! path and the catalog API base URL. A missing file means defaults; a
//! malformed file is a hard error so the operator fixes it rather than
//! silently updating the wrong directory.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file name, resolved against the working directory
pub const CONFIG_FILE: &str = "modsync.config.json";

/// Default mods directory
pub const DEFAULT_MODS_PATH: &str = "/opt/vintagestory/server/Mods";

/// Default catalog API base URL
pub const DEFAULT_API_BASE: &str = "https://mods.vintagestory.at";

/// Runtime settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding the mod archives
    #[serde(default = "default_mods_path")]
    pub mods_path: PathBuf,
    /// Catalog API base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mods_path: default_mods_path(),
            api_base: default_api_base(),
        }
    }
}

fn default_mods_path() -> PathBuf {
    PathBuf::from(DEFAULT_MODS_PATH)
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

/// Path of the config file under `cwd`
pub fn config_path(cwd: &Path) -> PathBuf {
    cwd.join(CONFIG_FILE)
}

/// Load the config from `cwd`, falling back to defaults when absent.
///
/// Fields missing from the file keep their defaults.
pub fn load(cwd: &Path) -> Result<Config> {
    let path = config_path(cwd);
    if !path.exists() {
        return Ok(Config::default());
    }
    let raw = fs::read_to_string(&path)?;
    serde_json::from_str(&raw)
        .map_err(|_| Error::Parse(format!("Invalid {}. Fix JSON syntax.", CONFIG_FILE)))
}

/// Persist the config to `cwd` as pretty-printed JSON
pub fn save(cwd: &Path, config: &Config) -> Result<()> {
    let path = config_path(cwd);
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| Error::Parse(format!("Failed to serialize config: {e}")))?;
    fs::write(&path, format!("{json}\n"))?;
    Ok(())
}
