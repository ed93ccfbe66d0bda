//! Configuration file support for secretctl

use crate::output::{DEFAULT_LS_FORMAT, JSON_FORMAT};
use crate::secrets::DEFAULT_DRIVER;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub storage: Storage,

    #[serde(default)]
    pub output: Output,
}

/// Default values for secret creation
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Defaults {
    #[serde(default = "default_driver")]
    pub driver: String,
}

/// Where the registry keeps its state
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Storage {
    /// Optional path of the JSON state file.
    /// If not set, `<data dir>/secretctl/secrets.json` is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_file: Option<String>,
}

/// Default output formats
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Output {
    #[serde(default = "default_ls_format")]
    pub ls_format: String,

    #[serde(default = "default_inspect_format")]
    pub inspect_format: String,
}

// Default value functions
fn default_driver() -> String {
    DEFAULT_DRIVER.to_string()
}

fn default_ls_format() -> String {
    DEFAULT_LS_FORMAT.to_string()
}

fn default_inspect_format() -> String {
    JSON_FORMAT.to_string()
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            driver: default_driver(),
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self {
            ls_format: default_ls_format(),
            inspect_format: default_inspect_format(),
        }
    }
}

impl Settings {
    /// Load settings from file or return defaults
    pub fn load() -> Self {
        match Self::find_config_file() {
            Some(path) => Self::load_from_file(&path).unwrap_or_else(|e| {
                crate::log_warn!("Ignoring config file: {:#}", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Load settings from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        crate::log_debug!("Loaded config from {}", path.display());
        Ok(settings)
    }

    /// Find config file in standard locations
    /// Priority:
    /// 1. .secretctl.toml in current directory
    /// 2. ~/.config/secretctl/config.toml (XDG config directory)
    fn find_config_file() -> Option<PathBuf> {
        let local_config = PathBuf::from(".secretctl.toml");
        if local_config.exists() {
            return Some(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("secretctl").join("config.toml");
            if xdg_config.exists() {
                return Some(xdg_config);
            }
        }

        None
    }

    /// Resolve the state file: explicit override, then config, then data dir
    pub fn state_file(&self, cli_override: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = cli_override {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = &self.storage.state_file {
            return Ok(PathBuf::from(path));
        }
        let data_dir = dirs::data_dir().ok_or_else(|| {
            anyhow::anyhow!(
                "Could not determine a data directory.\n\
                 Set state_file under [storage] in your configuration or pass --state-file"
            )
        })?;
        Ok(data_dir.join("secretctl").join("secrets.json"))
    }

    /// Generate example config file content
    pub fn example_config() -> Result<String> {
        let header = "# secretctl configuration file\n\
                      # Place this file at ~/.config/secretctl/config.toml or .secretctl.toml in your project\n\n";
        let body =
            toml::to_string_pretty(&Settings::default()).context("Failed to serialize settings")?;
        Ok(format!("{}{}", header, body))
    }
}
