use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pipeline::{DEFAULT_CPU_THRESHOLD, DEFAULT_MEM_THRESHOLD};

pub const CONFIG_ENV: &str = "PROCSNAP_CONFIG";
pub const DEFAULT_REFRESH_INTERVAL: f64 = 5.0;

/// Flat settings shared by every shell.
///
/// Unknown keys are ignored and missing keys take their defaults. Values are
/// only type-checked here; range checks belong to the shell boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seconds between polls.
    pub refresh_interval: f64,
    pub cpu_threshold: f64,
    pub mem_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            cpu_threshold: DEFAULT_CPU_THRESHOLD,
            mem_threshold: DEFAULT_MEM_THRESHOLD,
        }
    }
}

impl Config {
    /// Poll interval, or the default when the configured value is not a
    /// positive finite number of seconds.
    pub fn refresh_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.refresh_interval)
            .ok()
            .filter(|d| !d.is_zero())
            .unwrap_or(Duration::from_secs_f64(DEFAULT_REFRESH_INTERVAL))
    }
}

/// `$PROCSNAP_CONFIG` when set, otherwise `<config dir>/procsnap/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    env_config_path().or_else(default_config_path)
}

fn env_config_path() -> Option<PathBuf> {
    std::env::var_os(CONFIG_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("procsnap").join("config.toml"))
}

/// Loads from the environment override, or from the default location if a
/// file exists there. Falls back to defaults when neither applies.
pub fn load_config() -> Result<Config> {
    if let Some(path) = env_config_path() {
        return load_config_from_path(&path);
    }
    match default_config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Ok(Config::default()),
    }
}

/// Parses `path` as JSON when it has a `.json` extension, TOML otherwise.
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path).map_err(|source| Error::ConfigUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(path, &contents)
}

fn parse_config(path: &Path, contents: &str) -> Result<Config> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let parsed = if is_json {
        // Derived `Deserialize` also accepts a sequence; only an object is a config.
        serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(contents)
            .and_then(|map| serde_json::from_value::<Config>(serde_json::Value::Object(map)))
            .map_err(|e| e.to_string())
    } else {
        toml::from_str(contents).map_err(|e| e.to_string())
    };

    parsed.map_err(|message| Error::ConfigMalformed {
        path: path.to_path_buf(),
        message,
    })
}
