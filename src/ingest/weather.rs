/// WeatherAPI.com current-conditions client.
///
/// Retrieves precipitation and wind speed at a river's coordinates for the
/// DRI rainfall and wind factors.
///
/// API documentation: https://www.weatherapi.com/docs/
/// Current conditions: http://api.weatherapi.com/v1/current.json?key=..&q=lat,lon
///
/// Callers that score rivers use `lookup_weather`, which never fails: any
/// problem is logged and reported as `None` so scoring falls back to
/// synthetic rainfall and wind.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ServiceConfig;
use crate::model::{RiverProfile, WeatherObservation};

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("no weather API key configured")]
    NotConfigured,
    #[error("weather API returned HTTP {0}")]
    Http(u16),
    #[error("weather request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("weather response could not be parsed: {0}")]
    Parse(String),
    #[error("weather response has no current conditions")]
    MissingCurrent,
}

// ============================================================================
// API Response Structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    current: Option<CurrentConditions>,
}

/// Only the fields the index uses. Missing or null readings count as 0.
#[derive(Debug, Deserialize)]
struct CurrentConditions {
    #[serde(default)]
    precip_mm: Option<f64>,
    #[serde(default)]
    wind_kph: Option<f64>,
}

// ============================================================================
// URL construction and parsing
// ============================================================================

/// Builds a current-conditions URL. Air-quality data is not requested.
pub fn build_current_url(base_url: &str, api_key: &str, latitude: f64, longitude: f64) -> String {
    let query = format!("{},{}", latitude, longitude);
    format!(
        "{}?key={}&q={}&aqi=no",
        base_url,
        urlencoding::encode(api_key),
        urlencoding::encode(&query)
    )
}

/// Parses a current-conditions response body.
pub fn parse_current_response(body: &str) -> Result<WeatherObservation, WeatherError> {
    let response: CurrentResponse =
        serde_json::from_str(body).map_err(|e| WeatherError::Parse(e.to_string()))?;

    let current = response.current.ok_or(WeatherError::MissingCurrent)?;

    Ok(WeatherObservation::new(
        current.precip_mm.unwrap_or(0.0),
        current.wind_kph.unwrap_or(0.0),
    ))
}

// ============================================================================
// API Client Functions
// ============================================================================

/// Fetches current conditions at the given coordinates.
pub fn fetch_current(
    client: &reqwest::blocking::Client,
    config: &ServiceConfig,
    latitude: f64,
    longitude: f64,
) -> Result<WeatherObservation, WeatherError> {
    let api_key = config.weather_api_key.as_deref().ok_or(WeatherError::NotConfigured)?;
    let url = build_current_url(&config.weather_api_url, api_key, latitude, longitude);

    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .timeout(config.weather_timeout)
        .send()?;

    if !response.status().is_success() {
        return Err(WeatherError::Http(response.status().as_u16()));
    }

    let body = response.text()?;
    parse_current_response(&body)
}

/// Current conditions for a river, or `None` when the lookup is not
/// configured or fails for any reason.
pub fn lookup_weather(
    client: &reqwest::blocking::Client,
    config: &ServiceConfig,
    river: &RiverProfile,
) -> Option<WeatherObservation> {
    match fetch_current(client, config, river.latitude, river.longitude) {
        Ok(obs) => {
            debug!(
                river_id = river.id,
                precipitation_mm = obs.precipitation_mm,
                wind_speed_kph = obs.wind_speed_kph,
                "weather lookup succeeded"
            );
            Some(obs)
        }
        Err(WeatherError::NotConfigured) => {
            debug!(river_id = river.id, "no weather API key; using synthetic weather");
            None
        }
        Err(e) => {
            warn!(river_id = river.id, error = %e, "weather lookup failed; using synthetic weather");
            None
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
