//! Data models for articles, categories and weather snapshots.
//!
//! - [`Article`] and [`NewsApiResponse`] mirror the news aggregation API's JSON
//!   (camelCase on the wire).
//! - [`Category`] is the closed set of topical filters for top headlines.
//! - [`Locator`] selects how a weather lookup is addressed.
//! - [`WeatherSnapshot`] is the validated current-conditions reading built
//!   from a [`WeatherResponse`].
//! - [`Brief`] bundles one run of the home view: headlines plus weather.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::utils::is_recent_article;

/// Shown when an article has no usable image.
pub const FALLBACK_IMAGE_URL: &str = "https://images.unsplash.com/photo-1585829365295-ab7cd400c167?ixlib=rb-1.2.1&auto=format&fit=crop&w=1350&q=80";

/// Byline used when neither an author nor a source name is present.
pub const DEFAULT_BYLINE: &str = "NewsDaily Staff";

/// Upstream appends `[+N chars]` to truncated content.
const TRUNCATION_MARKER: &str = "[+";

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// The outlet an article was published by.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Source {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
}

/// One news story as returned by the headlines and search endpoints.
///
/// The canonical `url` is the article's identity; no local id is assigned.
/// Articles are built fresh from every response and never mutated.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    #[serde(default)]
    pub url_to_image: Option<String>,
    /// ISO 8601 timestamp exactly as sent upstream.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub published_at: String,
    #[serde(default)]
    pub author: Option<String>,
    pub source: Source,
}

impl Article {
    /// Parsed publish time, or `None` when upstream sent something unparseable.
    pub fn published_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.published_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Whether the article was published within the last 24 hours.
    pub fn is_recent(&self) -> bool {
        self.published_at_utc()
            .is_some_and(|published| is_recent_article(&published))
    }

    /// Author, falling back to the source name and then a house byline.
    pub fn byline(&self) -> &str {
        self.author
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .or_else(|| Some(self.source.name.as_str()).filter(|n| !n.trim().is_empty()))
            .unwrap_or(DEFAULT_BYLINE)
    }

    /// Content with the upstream truncation suffix stripped.
    pub fn content_preview(&self) -> &str {
        match self.content.find(TRUNCATION_MARKER) {
            Some(idx) => self.content[..idx].trim_end(),
            None => self.content.trim_end(),
        }
    }

    /// The article image, or the stock placeholder when upstream has none.
    pub fn image_url_or_fallback(&self) -> &str {
        self.url_to_image
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(FALLBACK_IMAGE_URL)
    }
}

/// Envelope returned by both news endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsApiResponse {
    pub status: NewsApiStatus,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub articles: Option<Vec<Article>>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsApiStatus {
    Ok,
    Error,
}

/// Topical filter for top headlines. "All" is expressed by passing no category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Politics,
    Business,
    Sports,
    Entertainment,
    Technology,
}

impl Category {
    /// Wire value of the `category` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Politics => "politics",
            Category::Business => "business",
            Category::Sports => "sports",
            Category::Entertainment => "entertainment",
            Category::Technology => "technology",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a weather lookup addresses its location. Exactly one mode per call.
#[derive(Debug, Clone, PartialEq)]
pub enum Locator {
    Coordinates { lat: f64, lon: f64 },
    City(String),
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Coordinates { lat, lon } => write!(f, "{lat:.4},{lon:.4}"),
            Locator::City(name) => f.write_str(name),
        }
    }
}

/// Raw current-weather body.
#[derive(Debug, Deserialize)]
pub struct WeatherResponse {
    pub main: WeatherMain,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct WeatherMain {
    pub temp: f64,
}

#[derive(Debug, Deserialize)]
pub struct WeatherCondition {
    pub main: String,
    #[serde(default)]
    pub description: String,
}

/// Current conditions at one location. Replaced wholesale on every poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    pub location: String,
    /// Degrees Celsius; the request always asks for metric units.
    pub temperature_c: f64,
    /// Short category such as "Clear" or "Rain".
    pub condition: String,
    pub description: String,
}

/// Icon-level grouping of a condition code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConditionKind {
    Clear,
    Rain,
    Cloud,
}

impl WeatherSnapshot {
    /// Temperature rounded to the nearest whole degree Celsius.
    pub fn rounded_temperature(&self) -> i64 {
        self.temperature_c.round() as i64
    }

    /// Group the condition for icon selection: `Clear`, `Rain`/`Drizzle`,
    /// and everything else as cloud.
    pub fn condition_kind(&self) -> ConditionKind {
        match self.condition.to_lowercase().as_str() {
            "clear" => ConditionKind::Clear,
            "rain" | "drizzle" => ConditionKind::Rain,
            _ => ConditionKind::Cloud,
        }
    }
}

/// Headlines and weather fetched together for the home view.
///
/// A weather failure does not prevent the headlines from rendering; it is
/// carried as a message instead.
#[derive(Debug, Serialize)]
pub struct Brief {
    /// RFC 3339 UTC time the brief was assembled.
    pub generated_at: String,
    pub articles: Vec<Article>,
    pub weather: Option<WeatherSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_error: Option<String>,
}
