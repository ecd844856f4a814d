use crate::APP_NAME;
use histmerge_types::{ErrorPolicy, MergeError, MergeResult, ValidationMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE: &str = "config.toml";

/// Settings read from `$XDG_CONFIG_HOME/histmerge/config.toml`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub validation: ValidationMode,
    pub error_policy: ErrorPolicy,
    pub repair_marker: Option<char>,
}

impl Config {
    /// Load the config file.
    ///
    /// An explicit path must exist. Without one the XDG config file is used
    /// when present, and defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> MergeResult<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_file() {
                Some(path) => path,
                None => {
                    debug!("no config file found, using defaults");
                    return Ok(Config::default());
                }
            },
        };
        Config::read_file(&path)
    }

    fn read_file(path: &Path) -> MergeResult<Self> {
        debug!("reading config from {}", path.display());
        let toml_str = std::fs::read_to_string(path).map_err(|err| {
            MergeError::Config(format!("failed to read {}: {err}", path.display()))
        })?;
        Config::from_toml(&toml_str)
            .map_err(|err| MergeError::Config(format!("{}: {err}", path.display())))
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

fn default_config_file() -> Option<PathBuf> {
    let xdg_dir = xdg::BaseDirectories::with_prefix(APP_NAME).ok()?;
    xdg_dir.find_config_file(CONFIG_FILE)
}
