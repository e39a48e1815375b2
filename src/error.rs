//! Error types for configuration and the two upstream clients.
//!
//! The headline and search operations never hand a [`NewsError`] to their
//! callers; it only exists so failures can be logged with a classification.
//! [`WeatherError`] is surfaced, since the weather view renders distinct
//! states for each kind.

use thiserror::Error;

/// Problems resolving configuration before any request is made.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} is not configured. Pass it on the command line, set the environment variable or add it to the config file.")]
    MissingCredential { name: &'static str },

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid base URL {0}")]
    InvalidBaseUrl(String),
}

/// Failure classification for the news aggregation API.
#[derive(Error, Debug)]
pub enum NewsError {
    #[error("Invalid API key. Please check your News API configuration.")]
    InvalidCredential,

    #[error("API rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("News API reported an error: {0}")]
    Upstream(String),

    #[error("API request failed: {0}")]
    Request(String),

    #[error("Malformed News API response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl NewsError {
    /// Short label used as a structured logging field.
    pub fn label(&self) -> &'static str {
        match self {
            NewsError::InvalidCredential => "invalid_credential",
            NewsError::RateLimited => "rate_limited",
            NewsError::Upstream(_) => "upstream",
            NewsError::Request(_) => "request",
            NewsError::Decode(_) => "decode",
        }
    }
}

/// Failures surfaced by the weather client.
#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Invalid API key. Please check your OpenWeatherMap API key.")]
    InvalidCredential,

    #[error("Location not found. Please check the city name or coordinates.")]
    LocationNotFound,

    #[error("Weather API error: {0}")]
    Upstream(String),

    #[error("Failed to fetch weather data: {0}")]
    Fetch(String),
}

/// Coarse kind of a [`WeatherError`], for callers that only branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherErrorKind {
    Credential,
    NotFound,
    Generic,
}

impl WeatherError {
    /// Coarse kind, used to pick the message variant shown to the user.
    pub fn kind(&self) -> WeatherErrorKind {
        match self {
            WeatherError::InvalidCredential => WeatherErrorKind::Credential,
            WeatherError::LocationNotFound => WeatherErrorKind::NotFound,
            WeatherError::Upstream(_) | WeatherError::Fetch(_) => WeatherErrorKind::Generic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_names_the_key() {
        let err = ConfigError::MissingCredential {
            name: "NEWS_API_KEY",
        };
        assert!(err.to_string().starts_with("NEWS_API_KEY is not configured"));
    }

    #[test]
    fn test_weather_error_kinds() {
        assert_eq!(
            WeatherError::InvalidCredential.kind(),
            WeatherErrorKind::Credential
        );
        assert_eq!(
            WeatherError::LocationNotFound.kind(),
            WeatherErrorKind::NotFound
        );
        assert_eq!(
            WeatherError::Fetch("boom".into()).kind(),
            WeatherErrorKind::Generic
        );
    }

    #[test]
    fn test_news_error_labels() {
        assert_eq!(NewsError::RateLimited.label(), "rate_limited");
        assert_eq!(NewsError::Upstream("x".into()).label(), "upstream");
    }
}
