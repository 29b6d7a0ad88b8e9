use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::{Path, PathBuf}};

/// Default OpenWeather API root; override via config file or
/// `OPENWEATHER_BASE_URL` (tests point this at a local stub).
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const DEFAULT_BIND: &str = "0.0.0.0:3000";

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Settings for the upstream weather provider (credential, endpoint root).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self { api_key: String::new(), base_url: default_base_url() }
    }
}

/// Top-level configuration.
///
/// Loaded from an optional TOML file, then overridden by environment
/// variables (`OPENWEATHER_API_KEY`, `OPENWEATHER_BASE_URL`, `WEATHER_BIND`,
/// `PORT`). Example TOML:
///
/// ```toml
/// bind = "0.0.0.0:3000"
///
/// [provider]
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default)]
    pub provider: ProviderSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self { bind: default_bind(), provider: ProviderSettings::default() }
    }
}

impl Config {
    /// Load config from `path` (or the platform config dir when `None`),
    /// then apply environment overrides. A missing file is not an error:
    /// defaults plus environment are enough to run.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_file_path()?,
        };

        let mut cfg = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        cfg.apply_env_overrides();
        Ok(cfg)
    }

    /// Environment takes precedence over the file; `WEATHER_BIND` takes
    /// precedence over the bare `PORT`.
    fn apply_env_overrides(&mut self) {
        if let Ok(key) = env::var("OPENWEATHER_API_KEY") {
            if !key.is_empty() {
                self.provider.api_key = key;
            }
        }
        if let Ok(url) = env::var("OPENWEATHER_BASE_URL") {
            if !url.is_empty() {
                self.provider.base_url = url;
            }
        }
        if let Ok(bind) = env::var("WEATHER_BIND") {
            if !bind.is_empty() {
                self.bind = bind;
            }
        } else if let Ok(port) = env::var("PORT") {
            if !port.is_empty() {
                self.bind = format!("0.0.0.0:{port}");
            }
        }
    }

    /// Fail startup when no provider credential is configured.
    pub fn ensure_credential(&self) -> Result<()> {
        if self.provider.api_key.trim().is_empty() {
            return Err(anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: set the OPENWEATHER_API_KEY environment variable, or add\n\
                 `api_key` under [provider] in the config file."
            ));
        }
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-service", "weather-server")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
