/// Debris risk service: the scoring pipeline behind every surface.
///
/// `DriService::assess` runs one request end to end:
/// 1. Look up the river (database first, then the `rivers.toml` registry)
/// 2. Fetch current weather, degrading to synthetic draws on any failure
/// 3. Score with a thread-local random source for tide and flow
/// 4. Record the reading (logged, never fatal)
/// 5. Raise watchlist alerts for High/Critical scores (logged, never fatal)
///
/// Without a database the service still scores rivers from the registry;
/// history and export then answer `DatabaseUnavailable`.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use postgres::Client;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::alert::watchlist::{alerts_for_report, DEFAULT_ALERT_COOLDOWN_HOURS};
use crate::analysis::history::{group_by_river, summarize, HistoryWindow, RiverHistorySummary};
use crate::config::{self, ConfigError, ServiceConfig};
use crate::db::{self, DbConfigError};
use crate::export::{readings_to_csv, ExportError, river_export_filename, WATCHLIST_EXPORT_FILENAME};
use crate::ingest::weather::lookup_weather;
use crate::model::{DriReading, RiverProfile, ScoreReport};
use crate::scoring::{score, FactorSource, RandomFactors};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("river {0} not found")]
    RiverNotFound(i32),
    #[error("days out of range: {0}")]
    InvalidDays(i64),
    #[error("no database configured; DRI history is unavailable")]
    DatabaseUnavailable,
    #[error("database error: {0}")]
    Database(#[from] postgres::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    DbConfig(#[from] DbConfigError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// History for one river over a window.
#[derive(Debug, Clone, Serialize)]
pub struct RiverHistory {
    pub river_id: i32,
    pub river_name: String,
    pub window: HistoryWindow,
    pub summary: RiverHistorySummary,
    pub readings: Vec<DriReading>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiverSummary {
    pub river_id: i32,
    pub river_name: String,
    pub summary: RiverHistorySummary,
}

/// A rendered CSV attachment.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub filename: String,
    pub body: String,
}

// ---------------------------------------------------------------------------
// Service state
// ---------------------------------------------------------------------------

pub struct DriService {
    config: ServiceConfig,
    registry: HashMap<i32, RiverProfile>,
    client: Option<Client>,
    http: reqwest::blocking::Client,
    alert_cooldown: Duration,
}

impl DriService {
    /// Service with no rivers and no database. Call `initialize` to load both.
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_registry(config, HashMap::new())
    }

    /// Registry-only service; no database is opened.
    pub fn with_registry(config: ServiceConfig, registry: HashMap<i32, RiverProfile>) -> Self {
        Self {
            config,
            registry,
            client: None,
            http: reqwest::blocking::Client::new(),
            alert_cooldown: Duration::hours(DEFAULT_ALERT_COOLDOWN_HOURS),
        }
    }

    /// Load the river registry and, when DATABASE_URL is set, connect and
    /// verify the `debris` schema.
    pub fn initialize(&mut self) -> Result<(), ServiceError> {
        let rivers = config::load_registry(&self.config.registry_path)?;
        self.registry = config::registry_profiles(&rivers);
        info!(
            path = %self.config.registry_path,
            rivers = self.registry.len(),
            "loaded river registry"
        );

        match self.config.database_url.clone() {
            Some(url) => {
                let client = db::connect_and_verify(&url, db::REQUIRED_SCHEMAS)?;
                self.client = Some(client);
            }
            None => {
                warn!("DATABASE_URL not set; readings will not be recorded");
            }
        }

        if self.config.weather_api_key.is_none() {
            warn!("WEATHER_API_KEY not set; rainfall and wind will be synthetic");
        }

        Ok(())
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn has_database(&self) -> bool {
        self.client.is_some()
    }

    /// Monitored rivers, ordered by id.
    pub fn rivers(&mut self) -> Result<Vec<RiverProfile>, ServiceError> {
        if let Some(client) = self.client.as_mut() {
            let rivers = db::load_active_rivers(client)?;
            if !rivers.is_empty() {
                return Ok(rivers);
            }
        }

        let mut rivers: Vec<RiverProfile> = self.registry.values().cloned().collect();
        rivers.sort_by_key(|r| r.id);
        Ok(rivers)
    }

    pub fn find_river(&mut self, river_id: i32) -> Result<RiverProfile, ServiceError> {
        if let Some(client) = self.client.as_mut() {
            if let Some(river) = db::find_river(client, river_id)? {
                return Ok(river);
            }
        }

        self.registry
            .get(&river_id)
            .cloned()
            .ok_or(ServiceError::RiverNotFound(river_id))
    }

    // -----------------------------------------------------------------------
    // Scoring
    // -----------------------------------------------------------------------

    /// Score a river with live weather and thread-local randomness.
    pub fn assess(&mut self, river_id: i32) -> Result<ScoreReport, ServiceError> {
        self.assess_with(river_id, &mut RandomFactors::thread_local())
    }

    /// Score a river drawing missing factors from `source`.
    pub fn assess_with<S: FactorSource>(
        &mut self,
        river_id: i32,
        source: &mut S,
    ) -> Result<ScoreReport, ServiceError> {
        let river = self.find_river(river_id)?;
        let weather = lookup_weather(&self.http, &self.config, &river);
        let report = score(&river, weather.as_ref(), source);

        info!(
            river_id = report.river_id,
            dri_score = report.dri_score,
            risk_level = report.risk_level.label(),
            "assessed river"
        );

        self.record(&report);
        self.notify_watchers(&report);

        Ok(report)
    }

    fn record(&mut self, report: &ScoreReport) {
        let Some(client) = self.client.as_mut() else {
            return;
        };

        if let Err(e) = db::record_reading(client, report) {
            error!(river_id = report.river_id, error = %e, "failed to record DRI reading");
        }
    }

    fn notify_watchers(&mut self, report: &ScoreReport) {
        let Some(client) = self.client.as_mut() else {
            return;
        };

        let watches = match db::watchers_for_river(client, report.river_id) {
            Ok(watches) => watches,
            Err(e) => {
                error!(river_id = report.river_id, error = %e, "failed to load watchlist");
                return;
            }
        };

        let now = Utc::now();
        for alert in alerts_for_report(report, &watches, now, self.alert_cooldown) {
            match db::insert_alert(client, &alert, now) {
                Ok(()) => info!(
                    river_id = alert.river_id,
                    user_id = alert.user_id,
                    alert_type = alert.kind.alert_type(),
                    "raised DRI alert"
                ),
                Err(e) => error!(
                    river_id = alert.river_id,
                    user_id = alert.user_id,
                    error = %e,
                    "failed to store DRI alert"
                ),
            }
        }
    }

    // -----------------------------------------------------------------------
    // History and export
    // -----------------------------------------------------------------------

    fn window(&self, days: Option<i64>, default_days: i64) -> Result<HistoryWindow, ServiceError> {
        HistoryWindow::last_days(days, default_days)
            .ok_or(ServiceError::InvalidDays(days.unwrap_or(default_days)))
    }

    pub fn history(&mut self, river_id: i32, days: Option<i64>) -> Result<RiverHistory, ServiceError> {
        let river = self.find_river(river_id)?;
        let window = self.window(days, self.config.history_days)?;
        let client = self.client.as_mut().ok_or(ServiceError::DatabaseUnavailable)?;

        let readings = db::fetch_history(client, river_id, &window)?;
        let summary = summarize(&readings);

        Ok(RiverHistory {
            river_id,
            river_name: river.name,
            window,
            summary,
            readings,
        })
    }

    /// Per-river summaries for a set of rivers, e.g. an NGO's watchlist.
    /// Rivers with no readings in the window get an empty summary.
    pub fn summaries(&mut self, river_ids: &[i32], days: Option<i64>) -> Result<Vec<RiverSummary>, ServiceError> {
        let mut rivers = Vec::with_capacity(river_ids.len());
        for id in river_ids {
            rivers.push(self.find_river(*id)?);
        }

        let window = self.window(days, self.config.watchlist_export_days)?;
        let client = self.client.as_mut().ok_or(ServiceError::DatabaseUnavailable)?;

        let mut grouped = group_by_river(db::fetch_history_for_rivers(client, river_ids, &window)?);
        Ok(rivers
            .into_iter()
            .map(|river| {
                let readings = grouped.remove(&river.id).unwrap_or_default();
                RiverSummary {
                    river_id: river.id,
                    river_name: river.name,
                    summary: summarize(&readings),
                }
            })
            .collect())
    }

    /// One river's readings as CSV, oldest first.
    pub fn export_river(&mut self, river_id: i32, days: Option<i64>) -> Result<CsvExport, ServiceError> {
        let river = self.find_river(river_id)?;
        let window = self.window(days, self.config.history_days)?;
        let client = self.client.as_mut().ok_or(ServiceError::DatabaseUnavailable)?;

        let readings = db::fetch_history(client, river_id, &window)?;
        let body = readings_to_csv(&readings, |_| Some(river.name.clone()))?;

        Ok(CsvExport {
            filename: river_export_filename(&river.name),
            body,
        })
    }

    /// Several rivers' readings as one CSV, newest first.
    pub fn export_rivers(&mut self, river_ids: &[i32], days: Option<i64>) -> Result<CsvExport, ServiceError> {
        let mut names = HashMap::new();
        for id in river_ids {
            let river = self.find_river(*id)?;
            names.insert(river.id, river.name);
        }

        let window = self.window(days, self.config.watchlist_export_days)?;
        let client = self.client.as_mut().ok_or(ServiceError::DatabaseUnavailable)?;

        let readings = db::fetch_history_for_rivers(client, river_ids, &window)?;
        let body = readings_to_csv(&readings, |id| names.get(&id).cloned())?;

        Ok(CsvExport {
            filename: WATCHLIST_EXPORT_FILENAME.to_string(),
            body,
        })
    }
}
