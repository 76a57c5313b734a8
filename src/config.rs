/// Service configuration: the river registry (rivers.toml) and runtime
/// settings read from the environment.
///
/// The registry keeps river metadata out of code so rivers can be added or
/// reclassified without recompiling. It is the river lookup of last resort
/// when no database is configured.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::model::{DebrisProfile, RiverProfile};

pub const DEFAULT_REGISTRY_PATH: &str = "rivers.toml";
pub const DEFAULT_WEATHER_API_URL: &str = "http://api.weatherapi.com/v1/current.json";
pub const DEFAULT_WEATHER_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_ENDPOINT_PORT: u16 = 5000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("duplicate river id {0} in registry")]
    DuplicateRiver(i32),
    #[error("invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
}

// ---------------------------------------------------------------------------
// River registry
// ---------------------------------------------------------------------------

/// River metadata as written in rivers.toml.
#[derive(Debug, Clone, Deserialize)]
pub struct RiverConfig {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,

    // Geographic location, used for the weather lookup
    pub latitude: f64,
    pub longitude: f64,

    // Administrative area (optional)
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub district: Option<String>,

    /// "urban", "industrial", "rural", "coastal" or "mixed"
    #[serde(default)]
    pub land_use: Option<String>,

    /// Surveyed composition overriding the land-use default
    #[serde(default)]
    pub debris_profile: Option<DebrisProfile>,
}

#[derive(Debug, Deserialize)]
struct RiverRegistry {
    #[serde(default)]
    river: Vec<RiverConfig>,
}

impl From<&RiverConfig> for RiverProfile {
    fn from(config: &RiverConfig) -> Self {
        RiverProfile {
            id: config.id,
            name: config.name.clone(),
            latitude: config.latitude,
            longitude: config.longitude,
            description: config.description.clone(),
            land_use: config.land_use.clone(),
            debris_profile: config.debris_profile,
        }
    }
}

/// Parses a registry document. River ids must be unique.
pub fn parse_registry(contents: &str, path: &str) -> Result<Vec<RiverConfig>, ConfigError> {
    let registry: RiverRegistry = toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })?;

    let mut seen = HashSet::new();
    for river in &registry.river {
        if !seen.insert(river.id) {
            return Err(ConfigError::DuplicateRiver(river.id));
        }
    }

    Ok(registry.river)
}

/// Loads the river registry from a TOML file.
pub fn load_registry<P: AsRef<Path>>(path: P) -> Result<Vec<RiverConfig>, ConfigError> {
    let display = path.as_ref().display().to_string();
    let contents = fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Read {
        path: display.clone(),
        source,
    })?;
    parse_registry(&contents, &display)
}

/// Registry as scoring profiles keyed by river id.
pub fn registry_profiles(rivers: &[RiverConfig]) -> HashMap<i32, RiverProfile> {
    rivers.iter().map(|r| (r.id, RiverProfile::from(r))).collect()
}

// ---------------------------------------------------------------------------
// Runtime settings
// ---------------------------------------------------------------------------

/// Runtime settings. `Default` needs no environment: no database, no
/// weather key (every scoring takes the synthetic path).
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub database_url: Option<String>,
    pub weather_api_key: Option<String>,
    pub weather_api_url: String,
    pub weather_timeout: Duration,
    pub registry_path: String,
    /// Look-back window for history queries and single-river exports.
    pub history_days: i64,
    /// Look-back window for multi-river exports.
    pub watchlist_export_days: i64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            weather_api_key: None,
            weather_api_url: DEFAULT_WEATHER_API_URL.to_string(),
            weather_timeout: Duration::from_secs(DEFAULT_WEATHER_TIMEOUT_SECS),
            registry_path: DEFAULT_REGISTRY_PATH.to_string(),
            history_days: 30,
            watchlist_export_days: 7,
        }
    }
}

impl ServiceConfig {
    /// Reads settings from the environment, loading `.env` first if present.
    ///
    /// Recognised: DATABASE_URL, WEATHER_API_KEY, WEATHER_API_URL,
    /// WEATHER_TIMEOUT_SECS, RIVER_REGISTRY.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable lookup. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = ServiceConfig::default();

        config.database_url = get("DATABASE_URL");
        config.weather_api_key = get("WEATHER_API_KEY");
        if let Some(url) = get("WEATHER_API_URL") {
            config.weather_api_url = url;
        }
        if let Some(secs) = get("WEATHER_TIMEOUT_SECS") {
            let parsed: u64 = secs.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: "WEATHER_TIMEOUT_SECS",
                value: secs.clone(),
            })?;
            config.weather_timeout = Duration::from_secs(parsed);
        }
        if let Some(path) = get("RIVER_REGISTRY") {
            config.registry_path = path;
        }

        Ok(config)
    }
}
