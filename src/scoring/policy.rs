/// Scoring policy tables for the Debris Risk Index.
///
/// Every constant the engine uses lives here so the policy can be audited
/// and tested apart from the arithmetic in `dri` and `debris`. The
/// normalization references and the 11 600 kg / 70 mass calibration are
/// empirically tuned values; keep them literal.

use crate::model::{DebrisProfile, DebrisType, LandUse, RiskLevel};

// ---------------------------------------------------------------------------
// Factors
// ---------------------------------------------------------------------------

/// The four inputs blended into the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Factor {
    Rainfall,
    WindSpeed,
    TideLevel,
    WaterFlow,
}

/// Normalization reference and aggregation weight for one factor.
///
/// Synthetic draws for a factor span `[0, max_reference]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorPolicy {
    pub max_reference: f64,
    pub weight: f64,
}

pub const RAINFALL: FactorPolicy = FactorPolicy { max_reference: 50.0, weight: 0.40 };   // mm
pub const WIND_SPEED: FactorPolicy = FactorPolicy { max_reference: 40.0, weight: 0.25 }; // kph
pub const TIDE_LEVEL: FactorPolicy = FactorPolicy { max_reference: 3.0, weight: 0.20 };  // m
pub const WATER_FLOW: FactorPolicy = FactorPolicy { max_reference: 100.0, weight: 0.15 }; // m³/s

impl Factor {
    pub const ALL: [Factor; 4] = [
        Factor::Rainfall,
        Factor::WindSpeed,
        Factor::TideLevel,
        Factor::WaterFlow,
    ];

    pub fn policy(&self) -> FactorPolicy {
        match self {
            Factor::Rainfall => RAINFALL,
            Factor::WindSpeed => WIND_SPEED,
            Factor::TideLevel => TIDE_LEVEL,
            Factor::WaterFlow => WATER_FLOW,
        }
    }

    /// Weight as shown in reports, e.g. `"40%"`.
    pub fn weight_label(&self) -> String {
        format!("{}%", (self.policy().weight * 100.0).round() as i64)
    }
}

// ---------------------------------------------------------------------------
// Risk tiers
// ---------------------------------------------------------------------------

/// Exclusive upper bounds, checked in order. Scores at or above the last
/// bound are `Critical`.
pub const RISK_TIERS: [(f64, RiskLevel); 4] = [
    (30.0, RiskLevel::VeryLow),
    (50.0, RiskLevel::Low),
    (70.0, RiskLevel::Medium),
    (85.0, RiskLevel::High),
];

// ---------------------------------------------------------------------------
// Debris mass calibration
// ---------------------------------------------------------------------------

pub const DEBRIS_REFERENCE_KG: f64 = 11_600.0;
pub const DEBRIS_REFERENCE_SCORE: f64 = 70.0;

// ---------------------------------------------------------------------------
// Land-use debris profiles
// ---------------------------------------------------------------------------

pub const URBAN_PROFILE: DebrisProfile = DebrisProfile::new(55, 20, 15, 5, 5);
pub const INDUSTRIAL_PROFILE: DebrisProfile = DebrisProfile::new(35, 10, 10, 35, 10);
pub const RURAL_PROFILE: DebrisProfile = DebrisProfile::new(25, 45, 15, 5, 10);
/// `others` includes fishing gear and marine debris.
pub const COASTAL_PROFILE: DebrisProfile = DebrisProfile::new(40, 20, 10, 10, 20);
pub const MIXED_PROFILE: DebrisProfile = DebrisProfile::new(45, 25, 15, 10, 5);

pub fn land_use_profile(land_use: LandUse) -> DebrisProfile {
    match land_use {
        LandUse::Urban => URBAN_PROFILE,
        LandUse::Industrial => INDUSTRIAL_PROFILE,
        LandUse::Rural => RURAL_PROFILE,
        LandUse::Coastal => COASTAL_PROFILE,
        LandUse::Mixed => MIXED_PROFILE,
    }
}

// ---------------------------------------------------------------------------
// Weather adjustments
// ---------------------------------------------------------------------------

/// A weather-driven shift between two debris categories.
///
/// Fires when the observed value is strictly above `threshold`: `boosted`
/// gains `boost` (capped at `boost_cap`) and `reduced` loses `reduction`
/// (floored at `reduction_floor`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherAdjustment {
    pub factor: Factor,
    pub threshold: f64,
    pub boosted: DebrisType,
    pub boost: i32,
    pub boost_cap: i32,
    pub reduced: DebrisType,
    pub reduction: i32,
    pub reduction_floor: i32,
}

/// Heavy rain washes organic material off the land.
pub const HEAVY_RAIN: WeatherAdjustment = WeatherAdjustment {
    factor: Factor::Rainfall,
    threshold: 30.0,
    boosted: DebrisType::Organic,
    boost: 10,
    boost_cap: 60,
    reduced: DebrisType::Plastic,
    reduction: 5,
    reduction_floor: 10,
};

/// High wind carries lightweight plastics and styrofoam.
pub const HIGH_WIND: WeatherAdjustment = WeatherAdjustment {
    factor: Factor::WindSpeed,
    threshold: 25.0,
    boosted: DebrisType::Plastic,
    boost: 8,
    boost_cap: 70,
    reduced: DebrisType::Organic,
    reduction: 5,
    reduction_floor: 5,
};

/// Applied in this order on the same working copy.
pub const WEATHER_ADJUSTMENTS: [WeatherAdjustment; 2] = [HEAVY_RAIN, HIGH_WIND];

/// Category that absorbs the rounding residual after renormalization.
pub const RESIDUAL_SINK: DebrisType = DebrisType::Plastic;
