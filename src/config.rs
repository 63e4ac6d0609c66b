//! Configuration loader and validator for the Oompa Loompa client.
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Environment variable that overrides `api.base_url`.
pub const BASE_URL_ENV: &str = "OOMPA_API_BASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub api: Api,
}

/// Remote API settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Api {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub user_agent: String,
    #[serde(default)]
    pub log_requests: bool,
}

impl Api {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: Api {
                base_url: DEFAULT_BASE_URL.to_string(),
                connect_timeout_secs: 30,
                read_timeout_secs: 30,
                user_agent: "oompa-loompas/0.1".to_string(),
                log_requests: false,
            },
        }
    }
}

const DEFAULT_BASE_URL: &str = "https://2q2woep105.execute-api.eu-west-1.amazonaws.com/napptilus/";

impl Config {
    /// Replace `api.base_url` with the value of [`BASE_URL_ENV`] when it is set
    /// and non-empty, then re-validate.
    pub fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                self.api.base_url = url.trim().to_string();
            }
        }
        validate(&self)?;
        Ok(self)
    }
}

/// Load configuration from a YAML file and validate it.
/// - If `path` is None, uses `config.yaml` in the current working directory.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    let base = cfg.api.base_url.trim();
    if base.is_empty() {
        return Err(ConfigError::Invalid("api.base_url must be non-empty"));
    }
    let url = Url::parse(base).map_err(|_| ConfigError::Invalid("api.base_url must be a valid URL"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Invalid("api.base_url must use http or https"));
    }
    // Relative joins drop the last path segment unless it ends with a slash.
    if !url.path().ends_with('/') {
        return Err(ConfigError::Invalid("api.base_url must end with '/'"));
    }

    if cfg.api.connect_timeout_secs == 0 {
        return Err(ConfigError::Invalid("api.connect_timeout_secs must be > 0"));
    }
    if cfg.api.read_timeout_secs == 0 {
        return Err(ConfigError::Invalid("api.read_timeout_secs must be > 0"));
    }
    if cfg.api.user_agent.trim().is_empty() {
        return Err(ConfigError::Invalid("api.user_agent must be non-empty"));
    }

    Ok(())
}

/// Returns the example YAML document, matching [`Config::default`].
pub fn example() -> &'static str {
    r#"api:
  base_url: "https://2q2woep105.execute-api.eu-west-1.amazonaws.com/napptilus/"
  connect_timeout_secs: 30
  read_timeout_secs: 30
  user_agent: "oompa-loompas/0.1"
  log_requests: false
"#
}
