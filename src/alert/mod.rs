/// Alerting on scored rivers.
///
/// Submodules:
/// - `watchlist` — High/Critical alerts for NGOs watching a river

pub mod watchlist;
