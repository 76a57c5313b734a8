/// Debris composition: base profile selection and weather adjustment.

use crate::model::{DebrisProfile, DebrisType, RiverProfile};

use super::policy::{self, Factor, RESIDUAL_SINK, WEATHER_ADJUSTMENTS};

/// The river's explicit profile if it has a non-empty one, otherwise the
/// land-use default (urban for unknown land use).
pub fn base_profile(river: &RiverProfile) -> DebrisProfile {
    river
        .debris_profile
        .filter(|profile| profile.total() > 0)
        .unwrap_or_else(|| policy::land_use_profile(river.resolved_land_use()))
}

/// Shifts the composition for current weather, then renormalizes to 100.
pub fn adjust_debris_profile(base: DebrisProfile, rainfall: f64, wind_speed: f64) -> DebrisProfile {
    let mut adjusted = base;

    for adjustment in WEATHER_ADJUSTMENTS {
        let observed = match adjustment.factor {
            Factor::Rainfall => rainfall,
            Factor::WindSpeed => wind_speed,
            Factor::TideLevel | Factor::WaterFlow => continue,
        };
        if observed <= adjustment.threshold {
            continue;
        }

        let boosted = adjusted.get(adjustment.boosted) + adjustment.boost;
        adjusted.set(adjustment.boosted, boosted.min(adjustment.boost_cap));

        let reduced = adjusted.get(adjustment.reduced) - adjustment.reduction;
        adjusted.set(adjustment.reduced, reduced.max(adjustment.reduction_floor));
    }

    renormalize(adjusted)
}

/// Scales a profile so its categories sum to exactly 100.
///
/// Each category is scaled by `100 / total` and rounded half-to-even; the
/// residual left by rounding goes to `RESIDUAL_SINK`. A profile already
/// summing to 100 is returned unchanged. A profile with a non-positive total
/// has nothing to scale, so the whole 100 lands in the sink.
pub fn renormalize(profile: DebrisProfile) -> DebrisProfile {
    let total = profile.total();
    if total == 100 {
        return profile;
    }

    let mut scaled = DebrisProfile::default();
    if total > 0 {
        let factor = 100.0 / total as f64;
        for debris_type in DebrisType::ALL {
            let value = (profile.get(debris_type) as f64 * factor).round_ties_even() as i32;
            scaled.set(debris_type, value);
        }
    }

    let residual = 100 - scaled.total();
    scaled.set(RESIDUAL_SINK, scaled.get(RESIDUAL_SINK) + residual);
    scaled
}
