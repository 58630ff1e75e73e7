//! `wperf-studio.toml` loading.

use crate::utils::config::{DEFAULT_RECENT_EVENTS_CAPACITY, DEFAULT_WPERF_PATH};
use crate::utils::error::ConfigError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "wperf-studio.toml";

/// Studio settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StudioConfig {
    /// wperf executable
    pub wperf_path: PathBuf,

    /// Refuse to record with an unsupported wperf
    pub version_check: bool,

    /// Size of the recent events list
    pub recent_events_capacity: usize,

    /// Where recent events and the last record options are kept
    pub state_file: PathBuf,

    /// Default directory for samples
    pub output_dir: PathBuf,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            wperf_path: PathBuf::from(DEFAULT_WPERF_PATH),
            version_check: true,
            recent_events_capacity: DEFAULT_RECENT_EVENTS_CAPACITY,
            state_file: PathBuf::from(".wperf-studio/state.json"),
            output_dir: PathBuf::from("artifacts"),
        }
    }
}

/// Load settings from TOML
///
/// An explicit `path` must exist. Without one, `wperf-studio.toml` is used when
/// present and defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<StudioConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.exists() {
                debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                return Ok(StudioConfig::default());
            }
            default
        }
    };

    debug!("Loading config from: {}", path.display());
    let content = fs::read_to_string(&path)?;
    Ok(toml::from_str(&content)?)
}
