//! Client for the current-weather API.
//!
//! Unlike the headlines client, failures here are returned to the caller as a
//! [`WeatherError`]: the weather view needs to tell "no data" apart from
//! "still loading" and from a bad credential.

use tracing::{debug, info, instrument, warn};

use crate::api::{HttpGet, HttpResponse, QueryParams};
use crate::config::WeatherSettings;
use crate::error::{ConfigError, WeatherError};
use crate::models::{Locator, WeatherResponse, WeatherSnapshot};
use crate::utils::truncate_for_log;

const UNITS: &str = "metric";

/// Fetches current conditions for a single location.
pub struct WeatherClient<T> {
    transport: T,
    api_key: String,
    base_url: String,
}

impl<T> std::fmt::Debug for WeatherClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl<T: HttpGet> WeatherClient<T> {
    /// Build a client, failing before any request if the credential is missing.
    pub fn new(settings: &WeatherSettings, transport: T) -> Result<Self, ConfigError> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingCredential {
                name: "WEATHER_API_KEY",
            })?;

        Ok(Self {
            transport,
            api_key,
            base_url: settings.base_url.clone(),
        })
    }

    /// Current conditions at `locator`, in Celsius.
    #[instrument(level = "info", skip(self, locator), fields(locator = %locator))]
    pub async fn fetch_current_weather(
        &self,
        locator: &Locator,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let mut query: QueryParams = match locator {
            Locator::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
            Locator::City(name) => vec![("q", name.clone())],
        };
        query.push(("appid", self.api_key.clone()));
        query.push(("units", UNITS.to_string()));

        let url = format!("{}/weather", self.base_url);
        let resp = self.transport.get(&url, &query).await.map_err(|e| {
            warn!(error = %e, "Weather request failed");
            WeatherError::Fetch(e.to_string())
        })?;

        let snapshot = snapshot_from_response(resp)?;
        info!(
            location = %snapshot.location,
            temperature_c = snapshot.temperature_c,
            condition = %snapshot.condition,
            "Fetched current weather"
        );
        Ok(snapshot)
    }
}

fn snapshot_from_response(resp: HttpResponse) -> Result<WeatherSnapshot, WeatherError> {
    match resp.status {
        401 => return Err(WeatherError::InvalidCredential),
        404 => return Err(WeatherError::LocationNotFound),
        status if !resp.is_success() => {
            let message = upstream_message(&resp.body).unwrap_or_else(|| format!("HTTP {status}"));
            return Err(WeatherError::Upstream(message));
        }
        _ => {}
    }

    if resp.body.trim().is_empty() {
        return Err(WeatherError::Fetch(
            "No data received from weather API".to_string(),
        ));
    }

    let body: WeatherResponse = serde_json::from_str(&resp.body).map_err(|e| {
        debug!(body = %truncate_for_log(&resp.body, 300), "Undecodable weather body");
        WeatherError::Fetch(format!("Malformed weather response: {e}"))
    })?;

    let condition = body.weather.into_iter().next().ok_or_else(|| {
        WeatherError::Fetch("Weather response carried no conditions".to_string())
    })?;

    Ok(WeatherSnapshot {
        location: body.name,
        temperature_c: body.main.temp,
        condition: condition.main,
        description: condition.description,
    })
}

/// OpenWeatherMap error bodies look like `{"cod":"500","message":"..."}`.
fn upstream_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
