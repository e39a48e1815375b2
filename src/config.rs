//! Configuration resolution for the upstream clients.
//!
//! Values come from three layers, highest precedence first:
//! 1. command-line flags / environment variables (see [`crate::cli::Cli`])
//! 2. an optional YAML config file
//! 3. built-in defaults
//!
//! Credentials are carried as `Option`s here and validated by each client's
//! constructor, so a subcommand only fails on the keys it actually needs.

use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_NEWS_BASE_URL: &str = "https://newsapi.org/v2";
pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_CITY: &str = "New Delhi";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;

/// Shape of the optional `config.yaml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub news_api_key: Option<String>,
    pub weather_api_key: Option<String>,
    pub news_base_url: Option<String>,
    pub weather_base_url: Option<String>,
    pub default_city: Option<String>,
    pub poll_interval_secs: Option<u64>,
}

impl FileConfig {
    /// Read and parse a YAML config file.
    ///
    /// # Arguments
    ///
    /// * `path` - Location of the YAML file
    ///
    /// # Returns
    ///
    /// The parsed file, or [`ConfigError::Read`] / [`ConfigError::Parse`]
    /// naming the path.
    #[instrument(level = "info")]
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(Path::new(path)).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        let parsed = Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        info!(path, "Loaded configuration file");
        Ok(parsed)
    }

    /// Parse YAML text; blank input yields an all-default config.
    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub news_api_key: Option<String>,
    pub weather_api_key: Option<String>,
    pub news_base_url: Option<String>,
    pub weather_base_url: Option<String>,
}

/// Settings consumed by [`crate::clients::HeadlinesClient`].
#[derive(Clone)]
pub struct NewsSettings {
    pub api_key: Option<String>,
    pub base_url: String,
}

/// Settings consumed by [`crate::clients::WeatherClient`].
#[derive(Clone)]
pub struct WeatherSettings {
    pub api_key: Option<String>,
    pub base_url: String,
}

// Hand-written so credentials never reach logs.
impl std::fmt::Debug for NewsSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl std::fmt::Debug for WeatherSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Fully resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub news: NewsSettings,
    pub weather: WeatherSettings,
    pub default_city: String,
    pub poll_interval_secs: u64,
}

impl AppConfig {
    /// Merge overrides over the file config over defaults.
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self, ConfigError> {
        let news_base_url = validate_base_url(
            overrides
                .news_base_url
                .or(file.news_base_url)
                .unwrap_or_else(|| DEFAULT_NEWS_BASE_URL.to_string()),
        )?;
        let weather_base_url = validate_base_url(
            overrides
                .weather_base_url
                .or(file.weather_base_url)
                .unwrap_or_else(|| DEFAULT_WEATHER_BASE_URL.to_string()),
        )?;

        let config = Self {
            news: NewsSettings {
                api_key: non_blank(overrides.news_api_key).or_else(|| non_blank(file.news_api_key)),
                base_url: news_base_url,
            },
            weather: WeatherSettings {
                api_key: non_blank(overrides.weather_api_key)
                    .or_else(|| non_blank(file.weather_api_key)),
                base_url: weather_base_url,
            },
            default_city: file.default_city.unwrap_or_else(|| DEFAULT_CITY.to_string()),
            poll_interval_secs: file
                .poll_interval_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
        };
        debug!(?config, "Resolved configuration");
        Ok(config)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse the base URL and return it without a trailing slash.
fn validate_base_url(raw: String) -> Result<String, ConfigError> {
    match Url::parse(&raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            Ok(raw.trim_end_matches('/').to_string())
        }
        _ => Err(ConfigError::InvalidBaseUrl(raw)),
    }
}
