/// Debris Risk Index scoring engine.
///
/// Submodules:
/// - `policy`  — constant tables: references, weights, tiers, profiles, adjustments
/// - `factors` — injected randomness for tide, flow and missing weather
/// - `debris`  — base composition and weather adjustment
/// - `dri`     — normalization, aggregation, tiering and report assembly

pub mod debris;
pub mod dri;
pub mod factors;
pub mod policy;

pub use dri::{score, score_at};
pub use factors::{FactorSource, FixedFactors, RandomFactors};
