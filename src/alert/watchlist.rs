//! Watchlist alerts for elevated debris risk.
//!
//! After a river is scored, every NGO watching it may get an in-app alert:
//! High scores notify watches with `alert_on_high`, Critical scores notify
//! watches with `alert_on_critical`. Lower tiers never alert.
//!
//! A watch that was alerted within the cooldown window is skipped, so
//! repeated dashboard refreshes on a risky river do not flood the inbox.

use chrono::{DateTime, Duration, Utc};

use crate::model::{RiskLevel, ScoreReport};
use crate::scoring::policy::RISK_TIERS;

pub const DEFAULT_ALERT_COOLDOWN_HOURS: i64 = 6;

/// One NGO's watch on a river, with its alert preferences.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchEntry {
    pub id: i32,
    pub user_id: i32,
    pub river_id: i32,
    pub alert_on_high: bool,
    pub alert_on_critical: bool,
    pub email_alerts: bool,
    pub last_alert_sent: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriAlertKind {
    High,
    Critical,
}

impl DriAlertKind {
    /// Value stored in `alerts.alert_type`.
    pub fn alert_type(&self) -> &'static str {
        match self {
            DriAlertKind::High => "dri_high",
            DriAlertKind::Critical => "dri_critical",
        }
    }
}

/// An alert ready to be stored for one watcher.
#[derive(Debug, Clone, PartialEq)]
pub struct DriAlert {
    pub watch_id: i32,
    pub user_id: i32,
    pub river_id: i32,
    pub kind: DriAlertKind,
    pub title: String,
    pub message: String,
}

/// Lower bound of a tier, from the tier table.
fn tier_floor(level: RiskLevel) -> f64 {
    let mut floor = 0.0;
    for (upper, tier) in RISK_TIERS {
        if tier == level {
            return floor;
        }
        floor = upper;
    }
    floor
}

/// Checks a report against one watch. Returns `None` when the tier is below
/// High, the watch opted out of this tier, or the watch is cooling down.
pub fn check_watch(
    report: &ScoreReport,
    watch: &WatchEntry,
    now: DateTime<Utc>,
    cooldown: Duration,
) -> Option<DriAlert> {
    if watch.river_id != report.river_id {
        return None;
    }

    let kind = match report.risk_level {
        RiskLevel::Critical if watch.alert_on_critical => DriAlertKind::Critical,
        RiskLevel::High if watch.alert_on_high => DriAlertKind::High,
        _ => return None,
    };

    if let Some(last) = watch.last_alert_sent {
        if now - last < cooldown {
            return None;
        }
    }

    let (title, message) = match kind {
        DriAlertKind::Critical => (
            format!("Critical debris risk: {}", report.river_name),
            format!(
                "CRITICAL debris risk at {}: DRI {:.2} (critical threshold: {:.0}). Estimated debris load {:.0} kg.",
                report.river_name,
                report.dri_score,
                tier_floor(RiskLevel::Critical),
                report.debris_estimate_kg
            ),
        ),
        DriAlertKind::High => (
            format!("High debris risk: {}", report.river_name),
            format!(
                "High debris risk at {}: DRI {:.2} (high threshold: {:.0}). Estimated debris load {:.0} kg.",
                report.river_name,
                report.dri_score,
                tier_floor(RiskLevel::High),
                report.debris_estimate_kg
            ),
        ),
    };

    Some(DriAlert {
        watch_id: watch.id,
        user_id: watch.user_id,
        river_id: report.river_id,
        kind,
        title,
        message,
    })
}

/// Alerts owed to the watchers of a freshly scored river.
pub fn alerts_for_report(
    report: &ScoreReport,
    watches: &[WatchEntry],
    now: DateTime<Utc>,
    cooldown: Duration,
) -> Vec<DriAlert> {
    watches
        .iter()
        .filter_map(|watch| check_watch(report, watch, now, cooldown))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RiverProfile, WeatherObservation};
    use crate::scoring::{score, FixedFactors};

    fn report_with(rainfall: f64, wind: f64, tide: f64, flow: f64) -> ScoreReport {
        let river = RiverProfile {
            id: 4,
            name: "Sungai Melaka".to_string(),
            latitude: 2.196,
            longitude: 102.248,
            description: None,
            land_use: Some("coastal".to_string()),
            debris_profile: None,
        };
        let weather = WeatherObservation::new(rainfall, wind);
        let mut source = FixedFactors { rainfall: 0.0, wind_speed: 0.0, tide_level: tide, water_flow: flow };
        score(&river, Some(&weather), &mut source)
    }

    fn watch(alert_on_high: bool, alert_on_critical: bool) -> WatchEntry {
        WatchEntry {
            id: 11,
            user_id: 3,
            river_id: 4,
            alert_on_high,
            alert_on_critical,
            email_alerts: false,
            last_alert_sent: None,
        }
    }

    fn cooldown() -> Duration {
        Duration::hours(DEFAULT_ALERT_COOLDOWN_HOURS)
    }

    #[test]
    fn test_tier_floors() {
        assert_eq!(tier_floor(RiskLevel::VeryLow), 0.0);
        assert_eq!(tier_floor(RiskLevel::High), 70.0);
        assert_eq!(tier_floor(RiskLevel::Critical), 85.0);
    }

    #[test]
    fn test_critical_report_alerts_critical_watch() {
        let report = report_with(50.0, 40.0, 3.0, 100.0);
        assert_eq!(report.risk_level, RiskLevel::Critical);

        let alert = check_watch(&report, &watch(true, true), Utc::now(), cooldown())
            .expect("critical score should alert");
        assert_eq!(alert.kind, DriAlertKind::Critical);
        assert_eq!(alert.kind.alert_type(), "dri_critical");
        assert!(alert.title.contains("Sungai Melaka"));
        assert!(alert.message.contains("CRITICAL"));
        assert!(alert.message.contains("100.00"));
    }

    #[test]
    fn test_high_report_respects_opt_out() {
        // 40mm/40kph/1.5m/50 -> 32 + 25 + 10 + 7.5 = 74.5, High
        let report = report_with(40.0, 40.0, 1.5, 50.0);
        assert_eq!(report.risk_level, RiskLevel::High);

        assert!(check_watch(&report, &watch(false, true), Utc::now(), cooldown()).is_none());
        let alert = check_watch(&report, &watch(true, false), Utc::now(), cooldown())
            .expect("high score should alert a high-opted watch");
        assert_eq!(alert.kind, DriAlertKind::High);
        assert_eq!(alert.kind.alert_type(), "dri_high");
    }

    #[test]
    fn test_medium_report_never_alerts() {
        let report = report_with(40.0, 20.0, 1.5, 50.0);
        assert_eq!(report.risk_level, RiskLevel::Medium);
        assert!(check_watch(&report, &watch(true, true), Utc::now(), cooldown()).is_none());
    }

    #[test]
    fn test_cooldown_suppresses_repeat_alerts() {
        let report = report_with(50.0, 40.0, 3.0, 100.0);
        let now = Utc::now();

        let mut recent = watch(true, true);
        recent.last_alert_sent = Some(now - Duration::hours(1));
        assert!(check_watch(&report, &recent, now, cooldown()).is_none());

        let mut stale = watch(true, true);
        stale.last_alert_sent = Some(now - Duration::hours(7));
        assert!(check_watch(&report, &stale, now, cooldown()).is_some());
    }

    #[test]
    fn test_alerts_for_report_filters_watches() {
        let report = report_with(50.0, 40.0, 3.0, 100.0);
        let mut other_river = watch(true, true);
        other_river.river_id = 9;
        let watches = vec![watch(true, true), watch(true, false), other_river];

        let alerts = alerts_for_report(&report, &watches, Utc::now(), cooldown());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].user_id, 3);
    }
}
