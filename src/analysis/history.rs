/// DRI history windows and summaries.
///
/// `HistoryWindow` turns a `?days=N` request into a concrete time range for
/// the reading queries in `db`. `group_by_river` and `summarize` organize the
/// flat list of `DriReading`s those queries return, so the history endpoint
/// can answer "how risky has the Klang been this month?" in one pass.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::model::{DriReading, RiskLevel};

// ---------------------------------------------------------------------------
// Windows
// ---------------------------------------------------------------------------

/// A closed time range of `days` days ending at `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub days: i64,
}

impl HistoryWindow {
    /// Window of `days` days ending at `end`. A missing or non-positive
    /// `days` falls back to `default_days`. Returns `None` when the start
    /// would fall outside the representable date range.
    pub fn ending_at(end: DateTime<Utc>, days: Option<i64>, default_days: i64) -> Option<Self> {
        let days = match days {
            Some(d) if d > 0 => d,
            _ => default_days.max(1),
        };
        let start = end.checked_sub_signed(Duration::try_days(days)?)?;
        Some(Self { start, end, days })
    }

    pub fn last_days(days: Option<i64>, default_days: i64) -> Option<Self> {
        Self::ending_at(Utc::now(), days, default_days)
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Groups readings by river id. Each river's readings stay in input order.
pub fn group_by_river(readings: Vec<DriReading>) -> HashMap<i32, Vec<DriReading>> {
    let mut grouped: HashMap<i32, Vec<DriReading>> = HashMap::new();

    for reading in readings {
        grouped.entry(reading.river_id).or_default().push(reading);
    }

    grouped
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiverHistorySummary {
    pub reading_count: usize,
    pub latest: Option<DriReading>,
    pub peak: Option<DriReading>,
    pub mean_dri: Option<f64>,
    /// Readings rated High or Critical.
    pub elevated_count: usize,
}

/// Summarizes one river's readings. Order of the input does not matter.
pub fn summarize(readings: &[DriReading]) -> RiverHistorySummary {
    let latest = readings.iter().max_by_key(|r| r.recorded_at).cloned();
    let peak = readings
        .iter()
        .max_by(|a, b| a.dri_score.total_cmp(&b.dri_score))
        .cloned();

    let mean_dri = if readings.is_empty() {
        None
    } else {
        let total: f64 = readings.iter().map(|r| r.dri_score).sum();
        Some(((total / readings.len() as f64) * 100.0).round() / 100.0)
    };

    let elevated_count = readings
        .iter()
        .filter(|r| {
            matches!(
                RiskLevel::from_label(&r.risk_level),
                Some(RiskLevel::High) | Some(RiskLevel::Critical)
            )
        })
        .count();

    RiverHistorySummary {
        reading_count: readings.len(),
        latest,
        peak,
        mean_dri,
        elevated_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reading(id: i64, river_id: i32, dri: f64, level: &str, hour: u32) -> DriReading {
        DriReading {
            id,
            river_id,
            dri_score: dri,
            risk_level: level.to_string(),
            rainfall: 10.0,
            wind_speed: 5.0,
            tide_level: 1.0,
            water_flow: 40.0,
            estimated_debris_kg: dri / 70.0 * 11_600.0,
            recorded_at: Utc.with_ymd_and_hms(2024, 11, 20, hour, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_window_uses_requested_days() {
        let end = Utc.with_ymd_and_hms(2024, 11, 30, 12, 0, 0).unwrap();
        let window = HistoryWindow::ending_at(end, Some(7), 30).unwrap();
        assert_eq!(window.days, 7);
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 11, 23, 12, 0, 0).unwrap());
        assert!(window.contains(end));
        assert!(!window.contains(end - Duration::days(8)));
    }

    #[test]
    fn test_window_falls_back_on_bad_days() {
        let end = Utc::now();
        assert_eq!(HistoryWindow::ending_at(end, None, 30).unwrap().days, 30);
        assert_eq!(HistoryWindow::ending_at(end, Some(0), 30).unwrap().days, 30);
        assert_eq!(HistoryWindow::ending_at(end, Some(-5), 7).unwrap().days, 7);
    }

    #[test]
    fn test_window_out_of_range_days() {
        let end = Utc.with_ymd_and_hms(2024, 11, 30, 12, 0, 0).unwrap();
        assert!(HistoryWindow::ending_at(end, Some(9_999_999_999_999), 30).is_none());
        assert!(HistoryWindow::ending_at(end, Some(i64::MAX), 30).is_none());
        // Past chrono's earliest date but still a valid duration
        assert!(HistoryWindow::ending_at(end, Some(200_000_000), 30).is_none());
        assert!(HistoryWindow::ending_at(end, Some(36_500), 30).is_some());
    }

    #[test]
    fn test_group_by_river() {
        let grouped = group_by_river(vec![
            reading(1, 1, 40.0, "Medium", 1),
            reading(2, 2, 20.0, "Very Low", 2),
            reading(3, 1, 72.0, "High", 3),
        ]);
        assert_eq!(grouped.len(), 2);
        let klang = &grouped[&1];
        assert_eq!(klang.len(), 2);
        assert_eq!(klang[0].id, 1);
        assert_eq!(klang[1].id, 3);
    }

    #[test]
    fn test_group_by_river_empty_input() {
        assert!(group_by_river(Vec::new()).is_empty());
    }

    #[test]
    fn test_summarize() {
        let readings = vec![
            reading(1, 1, 40.0, "Medium", 1),
            reading(2, 1, 88.5, "Critical", 2),
            reading(3, 1, 72.0, "High", 4),
            reading(4, 1, 25.0, "Very Low", 3),
        ];
        let summary = summarize(&readings);
        assert_eq!(summary.reading_count, 4);
        assert_eq!(summary.latest.as_ref().map(|r| r.id), Some(3));
        assert_eq!(summary.peak.as_ref().map(|r| r.id), Some(2));
        // (40 + 88.5 + 72 + 25) / 4 = 56.375
        assert_eq!(summary.mean_dri, Some(56.38));
        assert_eq!(summary.elevated_count, 2);
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary.reading_count, 0);
        assert!(summary.latest.is_none());
        assert!(summary.peak.is_none());
        assert!(summary.mean_dri.is_none());
    }
}
