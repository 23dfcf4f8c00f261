//! Configuration loading from file system
//!
//! Reads the JSON config file. A missing file means defaults; a file that
//! exists but cannot be read is an error; a file that does not parse is
//! logged and replaced by defaults.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use super::defaults::DEFAULT_CONFIG_PATH;
use super::types::Config;
use crate::error::{LauncherError, Result};

/// `~/.tool-launcher/config.json` with the home directory expanded
pub fn default_config_path() -> PathBuf {
    PathBuf::from(shellexpand::tilde(DEFAULT_CONFIG_PATH).as_ref())
}

/// Load configuration from the default location
pub fn load_config() -> Result<Config> {
    load_config_from(&default_config_path())
}

/// Load configuration from `path`, falling back to defaults on parse errors.
#[instrument(name = "load_config")]
pub fn load_config_from(path: &Path) -> Result<Config> {
    match try_load_config(path) {
        Ok(config) => Ok(config),
        Err(LauncherError::ConfigParse(e)) => {
            let hint = if e.is_data() {
                "\n\nHint: check field names (camelCase) and value types, e.g. \
                 {\"viewMode\": \"list\", \"extensions\": [\".exe\"]}"
            } else {
                ""
            };
            warn!(
                error = %e,
                path = %path.display(),
                hint = %hint,
                "Failed to parse config JSON, using defaults"
            );
            Ok(Config::default())
        }
        Err(e) => Err(e),
    }
}

/// Strict load: parse errors are returned instead of replaced by defaults.
pub fn try_load_config(path: &Path) -> Result<Config> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Config::default());
        }
        Err(source) => {
            return Err(LauncherError::Config {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config: Config = serde_json::from_str(contents.trim())?;
    info!(path = %path.display(), "Successfully loaded config");
    Ok(config)
}
