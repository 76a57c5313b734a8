/// debris_service: river Debris Risk Index (DRI) scoring service.
///
/// # Module structure
///
/// ```text
/// debris_service
/// ├── model       — shared data types (RiverProfile, ScoreReport, DriReading, …)
/// ├── config      — river registry (rivers.toml) and environment settings
/// ├── logging     — tracing subscriber setup for the binaries
/// ├── scoring
/// │   ├── policy  — reference maxima, weights, tiers, land-use profiles
/// │   ├── factors — random and fixed factor sources
/// │   ├── debris  — composition adjustment and renormalization
/// │   └── dri     — the scoring engine
/// ├── ingest
/// │   ├── weather — WeatherAPI.com current conditions
/// │   └── fixtures (test only) — representative API response payloads
/// ├── db          — PostgreSQL validation and queries (debris schema)
/// ├── analysis
/// │   └── history — history windows, grouping and summaries
/// ├── alert
/// │   └── watchlist — High/Critical alerts for river watchers
/// ├── export      — CSV export of stored readings
/// ├── service     — assess/history/export pipeline
/// └── endpoint    — HTTP API
/// ```

/// Public modules
pub mod alert;
pub mod analysis;
pub mod config;
pub mod db;
pub mod endpoint;
pub mod export;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod scoring;
pub mod service;
