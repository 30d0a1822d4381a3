//! Configuration with saved layout profiles
//!
//! A profile is a named list of `MonitorSettings` that can be turned into a
//! single xrandr call. Global settings choose which xrandr binary to run and
//! the locale pinned for it. Stored as pretty JSON under the user config dir.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::constants::{config, locale, xrandr};
use crate::types::{MonitorSettings, Position};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub global: GlobalSettings,
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

/// Settings for running xrandr
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    #[serde(default = "default_xrandr_program")]
    pub xrandr_program: String,
    /// Value exported as LC_ALL to the xrandr process
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Named monitor layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub outputs: Vec<MonitorSettings>,
}

fn default_xrandr_program() -> String {
    xrandr::PROGRAM.to_string()
}

fn default_locale() -> String {
    locale::DEFAULT.to_string()
}

fn default_log_level() -> String {
    config::DEFAULT_LOG_LEVEL.to_string()
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            xrandr_program: default_xrandr_program(),
            locale: default_locale(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(config::APP_DIR);
        path.push(config::FILENAME);
        path
    }

    /// Load from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    /// Load and validate the config at `path`
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::read_from(path)?;
        config.validate();
        info!("Loaded config with {} profile(s)", config.profiles.len());
        Ok(config)
    }

    /// Parse `path` without correcting any values, defaults when it does not exist
    ///
    /// Does not log, so it can run before the subscriber is installed; call
    /// `validate` afterwards.
    pub fn read_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        serde_json::from_str(&contents).with_context(|| format!("Failed to parse JSON from {:?}", path))
    }

    /// Save to `path`, creating the parent directory if needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        fs::write(path, json).with_context(|| format!("Failed to write config to {:?}", path))?;

        info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Correct values that would produce a broken xrandr call
    pub fn validate(&mut self) {
        if self.global.xrandr_program.trim().is_empty() {
            warn!(using = xrandr::PROGRAM, "xrandr_program is empty, using default");
            self.global.xrandr_program = default_xrandr_program();
        }

        for profile in &mut self.profiles {
            for output in &mut profile.outputs {
                if output.position != Position::None && output.position_relative_to.is_empty() {
                    warn!(
                        profile = %profile.name,
                        output = %output.name,
                        position = ?output.position,
                        "position has no relative output, clearing it"
                    );
                    output.position = Position::None;
                }
            }
        }
    }

    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Insert `profile`, replacing one with the same name in place
    pub fn upsert_profile(&mut self, profile: Profile) {
        match self.profiles.iter_mut().find(|p| p.name == profile.name) {
            Some(existing) => *existing = profile,
            None => self.profiles.push(profile),
        }
    }

    /// Remove the profile called `name`, returning whether it existed
    pub fn remove_profile(&mut self, name: &str) -> bool {
        let before = self.profiles.len();
        self.profiles.retain(|p| p.name != name);
        self.profiles.len() != before
    }
}
