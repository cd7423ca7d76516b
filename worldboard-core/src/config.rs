//! Global worldboard configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DARK_STYLE, DEFAULT_SATELLITE_STYLE};
use crate::error::{WorldboardError, WorldboardResult};

static DEFAULT_DATA_PATH: &str = "~/worldboard/data";
static DEFAULT_STORE_PATH: &str = "~/worldboard/store";

const DEFAULT_LOADING_TIMEOUT_SECS: u64 = 8;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;
const DEFAULT_PORT: u16 = 4097;

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_PATH)
}

fn default_store_dir() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_PATH)
}

fn default_dark_style() -> String {
    DEFAULT_DARK_STYLE.to_string()
}

fn default_satellite_style() -> String {
    DEFAULT_SATELLITE_STYLE.to_string()
}

fn default_loading_timeout_secs() -> u64 {
    DEFAULT_LOADING_TIMEOUT_SECS
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Global configuration at ~/.config/worldboard/config.toml
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WorldboardConfig {
    /// Directory holding the static JSON datasets.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// HTTP base URL for the datasets. Takes precedence over `data_dir`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,

    /// Directory holding persisted key-value entries.
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,

    #[serde(default = "default_dark_style")]
    pub dark_style: String,

    #[serde(default = "default_satellite_style")]
    pub satellite_style: String,

    #[serde(default = "default_loading_timeout_secs")]
    pub loading_timeout_secs: u64,

    /// Upper bound on a single dataset request over HTTP.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for WorldboardConfig {
    fn default() -> Self {
        WorldboardConfig {
            data_dir: default_data_dir(),
            data_url: None,
            store_dir: default_store_dir(),
            dark_style: default_dark_style(),
            satellite_style: default_satellite_style(),
            loading_timeout_secs: default_loading_timeout_secs(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            port: default_port(),
        }
    }
}

impl WorldboardConfig {
    pub fn config_path() -> WorldboardResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| WorldboardError::Config("Could not determine config directory".into()))?
            .join("worldboard");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, writing a commented-out default file first if none exists.
    pub fn load() -> WorldboardResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> WorldboardResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .build()
            .map_err(|e| WorldboardError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| WorldboardError::Config(e.to_string()))
    }

    /// Save the current config to ~/.config/worldboard/config.toml
    pub fn save(&self) -> WorldboardResult<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> WorldboardResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| WorldboardError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| WorldboardError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> WorldboardResult<()> {
        let contents = format!(
            "\
# worldboard configuration

# Where the static datasets (ports.json, country-info.json, ...) live:
# data_dir = \"{}\"

# Fetch datasets over HTTP instead:
# data_url = \"https://example.org/worldboard/Data\"

# Where projects, calendar events and settings are persisted:
# store_dir = \"{}\"

# Map styles:
# dark_style = \"{}\"
# satellite_style = \"{}\"

# Seconds before the loading overlay is dismissed regardless of map state:
# loading_timeout_secs = {}

# Seconds before an HTTP dataset request is abandoned:
# fetch_timeout_secs = {}

# worldboard-server port:
# port = {}
",
            DEFAULT_DATA_PATH,
            DEFAULT_STORE_PATH,
            DEFAULT_DARK_STYLE,
            DEFAULT_SATELLITE_STYLE,
            DEFAULT_LOADING_TIMEOUT_SECS,
            DEFAULT_FETCH_TIMEOUT_SECS,
            DEFAULT_PORT,
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                WorldboardError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| WorldboardError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    pub fn data_path(&self) -> PathBuf {
        expand(&self.data_dir)
    }

    pub fn store_path(&self) -> PathBuf {
        expand(&self.store_dir)
    }

    pub fn loading_timeout(&self) -> Duration {
        Duration::from_secs(self.loading_timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commented_default_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        WorldboardConfig::create_default_config(&path).unwrap();
        let config = WorldboardConfig::load_from(&path).unwrap();

        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_PATH));
        assert_eq!(config.dark_style, DEFAULT_DARK_STYLE);
        assert_eq!(config.loading_timeout(), Duration::from_secs(8));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(20));
        assert!(config.data_url.is_none());
    }

    #[test]
    fn saved_values_round_trip_through_config_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = WorldboardConfig {
            data_url: Some("http://localhost:8000/Data".into()),
            port: 5000,
            ..WorldboardConfig::default()
        };
        config.save_to(&path).unwrap();

        let loaded = WorldboardConfig::load_from(&path).unwrap();
        assert_eq!(loaded.data_url.as_deref(), Some("http://localhost:8000/Data"));
        assert_eq!(loaded.port, 5000);
    }
}
