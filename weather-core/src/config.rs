use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::projector::ProjectionSettings;

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// request_timeout_secs = 10
/// forecast_spacing_hours = 3
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,

    /// Provider root; tests point this at a local mock server.
    pub base_url: String,

    pub request_timeout_secs: u64,

    /// Hours each forecast point is assumed to span.
    pub forecast_spacing_hours: u32,

    pub forecast_horizon_hours: u32,

    pub short_forecast_len: usize,

    /// First gradient stop for conditions without a dedicated theme.
    pub theme_color: String,
}

impl Default for Config {
    fn default() -> Self {
        let projection = ProjectionSettings::default();
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 10,
            forecast_spacing_hours: projection.spacing_hours,
            forecast_horizon_hours: projection.horizon_hours,
            short_forecast_len: projection.short_len,
            theme_color: "#1e3a8a".to_string(),
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherly", "weatherly")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// API key from the environment, falling back to the stored one.
    pub fn api_key(&self) -> Result<String> {
        let from_env = std::env::var(API_KEY_ENV).ok();
        self.resolve_api_key(from_env)
    }

    fn resolve_api_key(&self, from_env: Option<String>) -> Result<String> {
        from_env
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `weatherly configure` or set {API_KEY_ENV}."
                )
            })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn projection(&self) -> ProjectionSettings {
        ProjectionSettings {
            short_len: self.short_forecast_len,
            spacing_hours: self.forecast_spacing_hours,
            horizon_hours: self.forecast_horizon_hours,
        }
    }

    /// Reject values that parse but cannot work: a zero timeout fails every
    /// request, a zero spacing or horizon empties the extended forecast.
    pub fn validate(&self) -> Result<()> {
        let zero_fields = [
            ("request_timeout_secs", self.request_timeout_secs == 0),
            ("forecast_spacing_hours", self.forecast_spacing_hours == 0),
            ("forecast_horizon_hours", self.forecast_horizon_hours == 0),
        ];
        if let Some((field, _)) = zero_fields.iter().find(|(_, is_zero)| *is_zero) {
            anyhow::bail!("{field} must be greater than zero");
        }
        Ok(())
    }
}
