/// Debris Risk Index computation.
///
/// `score` is the whole engine: draw or read the four factors, normalize
/// each to 0–100, blend with the policy weights, map to a tier, estimate
/// debris mass and adjust the composition for the weather. It does no I/O
/// and cannot fail.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::model::{
    FactorBreakdown, FactorReading, RiskLevel, RiverProfile, ScoreReport, WeatherObservation,
};

use super::debris::{adjust_debris_profile, base_profile};
use super::factors::FactorSource;
use super::policy::{self, Factor, DEBRIS_REFERENCE_KG, DEBRIS_REFERENCE_SCORE, RISK_TIERS};

// ---------------------------------------------------------------------------
// Factor values
// ---------------------------------------------------------------------------

/// Raw factor values for one scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorValues {
    pub rainfall: f64,
    pub wind_speed: f64,
    pub tide_level: f64,
    pub water_flow: f64,
}

impl FactorValues {
    /// Weather readings when available, draws otherwise. Tide and flow are
    /// always drawn. Rainfall and wind are drawn before tide and flow so a
    /// seeded source yields the same sequence either way.
    pub fn collect<S: FactorSource>(weather: Option<&WeatherObservation>, source: &mut S) -> Self {
        let (rainfall, wind_speed) = match weather {
            Some(obs) => (obs.precipitation_mm, obs.wind_speed_kph),
            None => (
                source.draw(Factor::Rainfall, policy::RAINFALL.max_reference),
                source.draw(Factor::WindSpeed, policy::WIND_SPEED.max_reference),
            ),
        };
        let tide_level = source.draw(Factor::TideLevel, policy::TIDE_LEVEL.max_reference);
        let water_flow = source.draw(Factor::WaterFlow, policy::WATER_FLOW.max_reference);

        Self { rainfall, wind_speed, tide_level, water_flow }
    }

    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Rainfall => self.rainfall,
            Factor::WindSpeed => self.wind_speed,
            Factor::TideLevel => self.tide_level,
            Factor::WaterFlow => self.water_flow,
        }
    }
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

/// Scales a raw value to 0–100 against its reference maximum.
pub fn normalize(value: f64, max_reference: f64) -> f64 {
    (value.max(0.0) / max_reference).min(1.0) * 100.0
}

/// Weighted blend of the normalized factors.
pub fn aggregate(values: &FactorValues) -> f64 {
    Factor::ALL
        .iter()
        .map(|factor| {
            let policy = factor.policy();
            normalize(values.get(*factor), policy.max_reference) * policy.weight
        })
        .sum()
}

pub fn risk_level_for(dri_score: f64) -> RiskLevel {
    RISK_TIERS
        .iter()
        .find(|(upper, _)| dri_score < *upper)
        .map(|(_, level)| *level)
        .unwrap_or(RiskLevel::Critical)
}

/// Estimated debris mass in kg. Scores above the reference score give more
/// than the reference mass.
pub fn estimate_debris_kg(dri_score: f64) -> f64 {
    (dri_score / DEBRIS_REFERENCE_SCORE) * DEBRIS_REFERENCE_KG
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Scores a river, stamping the report with the current time.
pub fn score<S: FactorSource>(
    river: &RiverProfile,
    weather: Option<&WeatherObservation>,
    source: &mut S,
) -> ScoreReport {
    score_at(river, weather, source, Utc::now())
}

/// Scores a river with an explicit report timestamp.
pub fn score_at<S: FactorSource>(
    river: &RiverProfile,
    weather: Option<&WeatherObservation>,
    source: &mut S,
    timestamp: DateTime<Utc>,
) -> ScoreReport {
    let values = FactorValues::collect(weather, source);
    let report = build_report(river, &values, timestamp);

    debug!(
        river_id = river.id,
        live_weather = weather.is_some(),
        dri_score = report.dri_score,
        risk_level = report.risk_level.label(),
        "scored river"
    );

    report
}

/// Assembles a report from already collected factor values.
///
/// The tier is taken from the unrounded score; only the reported
/// `dri_score` is rounded to 2 decimals. A raw 29.996 therefore reads as
/// `30.0` with level "Very Low".
pub fn build_report(river: &RiverProfile, values: &FactorValues, timestamp: DateTime<Utc>) -> ScoreReport {
    let dri_score = aggregate(values);
    let risk_level = risk_level_for(dri_score);
    let debris_types = adjust_debris_profile(base_profile(river), values.rainfall, values.wind_speed);

    let reading = |factor: Factor| {
        let raw = values.get(factor);
        FactorReading {
            value: round2(raw),
            normalized: round2(normalize(raw, factor.policy().max_reference)),
            weight: factor.weight_label(),
        }
    };

    ScoreReport {
        river_id: river.id,
        river_name: river.name.clone(),
        dri_score: round2(dri_score),
        risk_level,
        risk_color: risk_level.color().to_string(),
        debris_estimate_kg: round2(estimate_debris_kg(dri_score)),
        land_use: river.land_use_tag(),
        debris_types,
        factors: FactorBreakdown {
            rainfall: reading(Factor::Rainfall),
            wind_speed: reading(Factor::WindSpeed),
            tide_level: reading(Factor::TideLevel),
            water_flow: reading(Factor::WaterFlow),
        },
        timestamp,
    }
}
