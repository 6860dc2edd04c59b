//! Configuration loaded from `.gitauth.toml` at the repository root.
//!
//! Config values seed flag and prompt defaults; explicit flags always win.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// File name looked up in the repository root.
pub const CONFIG_FILE: &str = ".gitauth.toml";

/// gitauth configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Defaults for the `arrange` command.
    #[serde(default)]
    pub arrange: ArrangeConfig,
}

impl Config {
    /// Load config from a TOML file; a missing file yields defaults.
    ///
    /// # Errors
    /// Returns error if the file exists but can't be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from `.gitauth.toml` under the given repository root.
    ///
    /// # Errors
    /// Returns error if the file exists but can't be read or parsed.
    pub fn load_from_repo(workdir: impl AsRef<Path>) -> Result<Self> {
        Self::load(workdir.as_ref().join(CONFIG_FILE))
    }

    /// Save config to a TOML file.
    ///
    /// # Errors
    /// Returns error if serialization or write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| std::io::Error::other(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// General gitauth settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default remote for `push`.
    #[serde(default = "default_remote")]
    pub default_remote: String,

    /// Default backup archive format.
    #[serde(default = "default_backup_format")]
    pub backup_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_remote: default_remote(),
            backup_format: default_backup_format(),
        }
    }
}

fn default_remote() -> String {
    "origin".into()
}

fn default_backup_format() -> String {
    "tar.gz".into()
}

/// Defaults for the `arrange` command's prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrangeConfig {
    /// Daily window start (`HH:MM`).
    #[serde(default = "default_start_time")]
    pub start_time: String,

    /// Daily window end (`HH:MM`).
    #[serde(default = "default_end_time")]
    pub end_time: String,

    /// Whether weekends are skipped.
    #[serde(default = "default_skip_weekends")]
    pub skip_weekends: bool,

    /// Timezone ("" for local, "UTC", a fixed offset, or an IANA name).
    #[serde(default)]
    pub timezone: String,
}

impl Default for ArrangeConfig {
    fn default() -> Self {
        Self {
            start_time: default_start_time(),
            end_time: default_end_time(),
            skip_weekends: default_skip_weekends(),
            timezone: String::new(),
        }
    }
}

fn default_start_time() -> String {
    "09:00".into()
}

fn default_end_time() -> String {
    "17:00".into()
}

const fn default_skip_weekends() -> bool {
    true
}
