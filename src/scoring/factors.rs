/// Sources for the randomly drawn scoring factors.
///
/// Tide level and water flow have no live feed and are always drawn.
/// Rainfall and wind speed are drawn only when no weather observation is
/// available. The engine takes the source as an argument so tests can pin
/// every draw.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

use super::policy::Factor;

pub trait FactorSource {
    /// Returns a value for `factor` in `[0, max]`.
    fn draw(&mut self, factor: Factor, max: f64) -> f64;
}

impl<S: FactorSource + ?Sized> FactorSource for &mut S {
    fn draw(&mut self, factor: Factor, max: f64) -> f64 {
        (**self).draw(factor, max)
    }
}

/// Uniform draws from a `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomFactors<R> {
    rng: R,
}

impl<R: Rng> RandomFactors<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomFactors<ThreadRng> {
    /// Backed by the calling thread's generator.
    pub fn thread_local() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl RandomFactors<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> FactorSource for RandomFactors<R> {
    fn draw(&mut self, _factor: Factor, max: f64) -> f64 {
        if max <= 0.0 {
            return 0.0;
        }
        self.rng.gen_range(0.0..=max)
    }
}

/// Returns the same value for a factor on every draw, ignoring `max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedFactors {
    pub rainfall: f64,
    pub wind_speed: f64,
    pub tide_level: f64,
    pub water_flow: f64,
}

impl FactorSource for FixedFactors {
    fn draw(&mut self, factor: Factor, _max: f64) -> f64 {
        match factor {
            Factor::Rainfall => self.rainfall,
            Factor::WindSpeed => self.wind_speed,
            Factor::TideLevel => self.tide_level,
            Factor::WaterFlow => self.water_flow,
        }
    }
}
