use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::constants::{
    DEFAULT_ANALYSIS_TIMEOUT_SECS, DEFAULT_BASE_URL, DEFAULT_POOL_SIZE, ENV_API_KEY, ENV_BASE_URL,
    ENV_POOL_SIZE, ENV_TIMEOUT_SECS,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no API key configured (use --api-key or SMILEY_API_KEY)")]
    MissingApiKey,
    #[error("invalid base URL '{url}': {reason}")]
    BaseUrl { url: String, reason: String },
    #[error("invalid value '{value}' for {key}")]
    Invalid { key: &'static str, value: String },
    #[error("failed to read settings from {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Connection settings for the remote face service.
///
/// Built once and shared read-only by every request.
#[derive(Clone)]
pub struct FaceApiConfig {
    api_key: String,
    base_url: Url,
    request_timeout: Duration,
}

impl FaceApiConfig {
    /// The base URL always ends up with a trailing slash so endpoint names
    /// can be joined onto it.
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        request_timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized).map_err(|e| ConfigError::BaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::BaseUrl {
                url: base_url.to_string(),
                reason: "not a hierarchical URL".to_string(),
            });
        }
        Ok(Self {
            api_key,
            base_url,
            request_timeout,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

impl fmt::Debug for FaceApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaceApiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Per-batch execution limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub pool_size: usize,
    pub analysis_timeout: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            analysis_timeout: Duration::from_secs(DEFAULT_ANALYSIS_TIMEOUT_SECS),
        }
    }
}

/// Persisted settings, stored as JSON in the user's config directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsFile {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub pool_size: Option<usize>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl SettingsFile {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("Smiley").join("settings.json"))
    }

    /// Loads the default settings file. A missing file yields empty settings.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Values given explicitly on the command line. These win over everything else.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub pool_size: Option<usize>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub face_api: FaceApiConfig,
    pub pipeline: PipelineSettings,
}

impl Config {
    /// Resolves configuration from overrides, the process environment,
    /// the settings file, then built-in defaults.
    pub fn resolve(overrides: &ConfigOverrides, settings: &SettingsFile) -> Result<Self, ConfigError> {
        Self::resolve_with(overrides, settings, |key| std::env::var(key).ok())
    }

    pub fn resolve_with<F>(
        overrides: &ConfigOverrides,
        settings: &SettingsFile,
        env: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = overrides
            .api_key
            .clone()
            .or_else(|| env(ENV_API_KEY))
            .or_else(|| settings.api_key.clone())
            .ok_or(ConfigError::MissingApiKey)?;

        let base_url = overrides
            .base_url
            .clone()
            .or_else(|| env(ENV_BASE_URL))
            .or_else(|| settings.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let pool_size = match overrides.pool_size {
            Some(n) => n,
            None => match env(ENV_POOL_SIZE) {
                Some(raw) => parse_env(ENV_POOL_SIZE, &raw)?,
                None => settings.pool_size.unwrap_or(DEFAULT_POOL_SIZE),
            },
        };
        if pool_size == 0 {
            return Err(ConfigError::Invalid {
                key: ENV_POOL_SIZE,
                value: pool_size.to_string(),
            });
        }

        let timeout_secs = match overrides.timeout_secs {
            Some(n) => n,
            None => match env(ENV_TIMEOUT_SECS) {
                Some(raw) => parse_env(ENV_TIMEOUT_SECS, &raw)?,
                None => settings.timeout_secs.unwrap_or(DEFAULT_ANALYSIS_TIMEOUT_SECS),
            },
        };
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: ENV_TIMEOUT_SECS,
                value: timeout_secs.to_string(),
            });
        }
        let timeout = Duration::from_secs(timeout_secs);

        Ok(Self {
            face_api: FaceApiConfig::new(api_key, &base_url, timeout)?,
            pipeline: PipelineSettings {
                pool_size,
                analysis_timeout: timeout,
            },
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}
