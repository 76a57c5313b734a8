/// External data sources.
///
/// - `weather`  — WeatherAPI.com current conditions (rainfall, wind)
/// - `fixtures` (test only) — representative API response payloads
///
/// Tide level and water flow have no live source yet; see `scoring::factors`.

pub mod weather;

#[cfg(test)]
pub(crate) mod fixtures;
