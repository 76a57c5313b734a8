/// Core data types for the river debris risk service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no I/O and no scoring logic, only types and the small
/// conversions that belong to them (land-use resolution, risk labels).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Land use
// ---------------------------------------------------------------------------

/// Coarse classification of a river's surrounding environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LandUse {
    Urban,
    Industrial,
    Rural,
    Coastal,
    Mixed,
}

impl LandUse {
    pub const ALL: [LandUse; 5] = [
        LandUse::Urban,
        LandUse::Industrial,
        LandUse::Rural,
        LandUse::Coastal,
        LandUse::Mixed,
    ];

    /// Resolves a stored land-use tag. Missing, empty or unrecognised tags
    /// resolve to `Urban`. Matching is exact, tags are stored lowercase.
    pub fn resolve(tag: Option<&str>) -> Self {
        match tag {
            Some("urban") => LandUse::Urban,
            Some("industrial") => LandUse::Industrial,
            Some("rural") => LandUse::Rural,
            Some("coastal") => LandUse::Coastal,
            Some("mixed") => LandUse::Mixed,
            _ => LandUse::Urban,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LandUse::Urban => "urban",
            LandUse::Industrial => "industrial",
            LandUse::Rural => "rural",
            LandUse::Coastal => "coastal",
            LandUse::Mixed => "mixed",
        }
    }
}

// ---------------------------------------------------------------------------
// Debris composition
// ---------------------------------------------------------------------------

/// Debris categories tracked in a composition profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebrisType {
    Plastic,
    Organic,
    Household,
    Industrial,
    Others,
}

impl DebrisType {
    pub const ALL: [DebrisType; 5] = [
        DebrisType::Plastic,
        DebrisType::Organic,
        DebrisType::Household,
        DebrisType::Industrial,
        DebrisType::Others,
    ];
}

/// Percentage breakdown of expected debris across the five categories.
///
/// Every category is always present. Missing keys in a stored profile
/// deserialize as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DebrisProfile {
    #[serde(default)]
    pub plastic: i32,
    #[serde(default)]
    pub organic: i32,
    #[serde(default)]
    pub household: i32,
    #[serde(default)]
    pub industrial: i32,
    #[serde(default)]
    pub others: i32,
}

impl DebrisProfile {
    pub const fn new(plastic: i32, organic: i32, household: i32, industrial: i32, others: i32) -> Self {
        Self { plastic, organic, household, industrial, others }
    }

    pub fn get(&self, debris_type: DebrisType) -> i32 {
        match debris_type {
            DebrisType::Plastic => self.plastic,
            DebrisType::Organic => self.organic,
            DebrisType::Household => self.household,
            DebrisType::Industrial => self.industrial,
            DebrisType::Others => self.others,
        }
    }

    pub fn set(&mut self, debris_type: DebrisType, value: i32) {
        match debris_type {
            DebrisType::Plastic => self.plastic = value,
            DebrisType::Organic => self.organic = value,
            DebrisType::Household => self.household = value,
            DebrisType::Industrial => self.industrial = value,
            DebrisType::Others => self.others = value,
        }
    }

    pub fn total(&self) -> i32 {
        DebrisType::ALL.iter().map(|t| self.get(*t)).sum()
    }
}

// ---------------------------------------------------------------------------
// Scoring inputs
// ---------------------------------------------------------------------------

/// Static attributes of a monitored river, as supplied by the river registry
/// or the `debris.rivers` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiverProfile {
    pub id: i32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub description: Option<String>,
    /// Free-form tag; see `LandUse::resolve`.
    #[serde(default)]
    pub land_use: Option<String>,
    /// Explicit composition overriding the land-use default.
    #[serde(default)]
    pub debris_profile: Option<DebrisProfile>,
}

impl RiverProfile {
    pub fn resolved_land_use(&self) -> LandUse {
        LandUse::resolve(self.land_use.as_deref())
    }

    /// Land-use tag as reported back to callers: the stored tag, or
    /// `"urban"` when none is stored.
    pub fn land_use_tag(&self) -> String {
        match self.land_use.as_deref() {
            Some(tag) if !tag.is_empty() => tag.to_string(),
            _ => LandUse::Urban.as_str().to_string(),
        }
    }
}

/// Current conditions at a river's coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub precipitation_mm: f64,
    pub wind_speed_kph: f64,
}

impl WeatherObservation {
    /// Builds an observation, clamping negative or NaN readings to zero.
    pub fn new(precipitation_mm: f64, wind_speed_kph: f64) -> Self {
        Self {
            precipitation_mm: precipitation_mm.max(0.0),
            wind_speed_kph: wind_speed_kph.max(0.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Scoring output
// ---------------------------------------------------------------------------

/// Risk tiers, in ascending order of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "Very Low",
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }

    /// Display color used by the dashboard.
    pub fn color(&self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "#28a745",
            RiskLevel::Low => "#90EE90",
            RiskLevel::Medium => "#ffc107",
            RiskLevel::High => "#fd7e14",
            RiskLevel::Critical => "#dc3545",
        }
    }

    /// Parses a stored label (as written by `label`).
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Very Low" => Some(RiskLevel::VeryLow),
            "Low" => Some(RiskLevel::Low),
            "Medium" => Some(RiskLevel::Medium),
            "High" => Some(RiskLevel::High),
            "Critical" => Some(RiskLevel::Critical),
            _ => None,
        }
    }
}

/// One scoring factor as reported: raw value, 0–100 normalized value and
/// its weight rendered as a percentage string (e.g. `"40%"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorReading {
    pub value: f64,
    pub normalized: f64,
    pub weight: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorBreakdown {
    pub rainfall: FactorReading,
    pub wind_speed: FactorReading,
    pub tide_level: FactorReading,
    pub water_flow: FactorReading,
}

/// Result of one DRI scoring. Returned verbatim by the HTTP endpoint and
/// stored as a `debris.dri_readings` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub river_id: i32,
    pub river_name: String,
    pub dri_score: f64,
    pub risk_level: RiskLevel,
    pub risk_color: String,
    pub debris_estimate_kg: f64,
    pub land_use: String,
    pub debris_types: DebrisProfile,
    pub factors: FactorBreakdown,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// A stored historical DRI reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriReading {
    pub id: i64,
    pub river_id: i32,
    pub dri_score: f64,
    pub risk_level: String,
    pub rainfall: f64,
    pub wind_speed: f64,
    pub tide_level: f64,
    pub water_flow: f64,
    pub estimated_debris_kg: f64,
    pub recorded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_land_use_resolves_known_tags() {
        for land_use in LandUse::ALL {
            assert_eq!(LandUse::resolve(Some(land_use.as_str())), land_use);
        }
    }

    #[test]
    fn test_land_use_unknown_or_missing_is_urban() {
        assert_eq!(LandUse::resolve(None), LandUse::Urban);
        assert_eq!(LandUse::resolve(Some("")), LandUse::Urban);
        assert_eq!(LandUse::resolve(Some("wetland")), LandUse::Urban);
        assert_eq!(LandUse::resolve(Some("Rural")), LandUse::Urban);
    }

    #[test]
    fn test_land_use_tag_keeps_stored_value() {
        let mut river = RiverProfile {
            id: 1,
            name: "Sungai Klang".to_string(),
            latitude: 3.1,
            longitude: 101.6,
            description: None,
            land_use: Some("wetland".to_string()),
            debris_profile: None,
        };
        assert_eq!(river.land_use_tag(), "wetland");
        assert_eq!(river.resolved_land_use(), LandUse::Urban);

        river.land_use = Some(String::new());
        assert_eq!(river.land_use_tag(), "urban");
    }

    #[test]
    fn test_risk_level_serializes_as_label() {
        let json = serde_json::to_string(&RiskLevel::VeryLow).unwrap();
        assert_eq!(json, "\"Very Low\"");
        for level in [RiskLevel::VeryLow, RiskLevel::Low, RiskLevel::Medium, RiskLevel::High, RiskLevel::Critical] {
            assert_eq!(RiskLevel::from_label(level.label()), Some(level));
        }
        assert_eq!(RiskLevel::from_label("Severe"), None);
    }

    #[test]
    fn test_partial_debris_profile_defaults_missing_to_zero() {
        let profile: DebrisProfile = serde_json::from_str(r#"{"plastic": 70, "organic": 30}"#).unwrap();
        assert_eq!(profile, DebrisProfile::new(70, 30, 0, 0, 0));
        assert_eq!(profile.total(), 100);
    }

    #[test]
    fn test_weather_observation_clamps_negative() {
        let obs = WeatherObservation::new(-2.0, f64::NAN);
        assert_eq!(obs.precipitation_mm, 0.0);
        assert_eq!(obs.wind_speed_kph, 0.0);
    }
}
