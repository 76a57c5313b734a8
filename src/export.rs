/// CSV export of stored DRI readings.
///
/// One row per reading, in the order given. The river name column is
/// resolved through a caller-supplied lookup so the same writer serves both
/// single-river and watchlist exports.

use crate::model::DriReading;

pub const CSV_HEADER: [&str; 9] = [
    "River Name",
    "Date/Time",
    "DRI Score",
    "Risk Level",
    "Rainfall (mm)",
    "Wind Speed (kph)",
    "Tide Level (m)",
    "Water Flow (m³/s)",
    "Estimated Debris (kg)",
];

pub const WATCHLIST_EXPORT_FILENAME: &str = "watchlist_dri_data.csv";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Attachment filename for a single river's export.
pub fn river_export_filename(river_name: &str) -> String {
    format!("{}_dri_data.csv", river_name)
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV output was not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Renders readings as CSV with a header row. Readings whose river the
/// lookup cannot name get an empty name column.
pub fn readings_to_csv<F>(readings: &[DriReading], river_name: F) -> Result<String, ExportError>
where
    F: Fn(i32) -> Option<String>,
{
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for reading in readings {
        writer.write_record([
            river_name(reading.river_id).unwrap_or_default(),
            reading.recorded_at.format(DATE_FORMAT).to_string(),
            format!("{:?}", reading.dri_score),
            reading.risk_level.clone(),
            format!("{:?}", reading.rainfall),
            format!("{:?}", reading.wind_speed),
            format!("{:?}", reading.tide_level),
            format!("{:?}", reading.water_flow),
            format!("{:?}", reading.estimated_debris_kg),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn reading(river_id: i32) -> DriReading {
        DriReading {
            id: 1,
            river_id,
            dri_score: 62.0,
            risk_level: "Medium".to_string(),
            rainfall: 35.0,
            wind_speed: 20.0,
            tide_level: 1.5,
            water_flow: 50.0,
            estimated_debris_kg: 10274.29,
            recorded_at: Utc.with_ymd_and_hms(2024, 11, 20, 16, 45, 12).unwrap(),
        }
    }

    #[test]
    fn test_header_row() {
        let csv = readings_to_csv(&[], |_| None).unwrap();
        assert_eq!(
            csv,
            "River Name,Date/Time,DRI Score,Risk Level,Rainfall (mm),Wind Speed (kph),\
             Tide Level (m),Water Flow (m³/s),Estimated Debris (kg)\r\n"
        );
    }

    #[test]
    fn test_reading_row() {
        let csv = readings_to_csv(&[reading(1)], |_| Some("Sungai Klang".to_string())).unwrap();
        let rows: Vec<&str> = csv.split("\r\n").collect();
        assert_eq!(
            rows[1],
            "Sungai Klang,2024-11-20 16:45,62.0,Medium,35.0,20.0,1.5,50.0,10274.29"
        );
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2], "");
    }

    #[test]
    fn test_names_with_commas_are_quoted() {
        let csv = readings_to_csv(&[reading(2)], |_| Some("Sungai \"Besar\", Selangor".to_string())).unwrap();
        assert!(csv.contains("\"Sungai \"\"Besar\"\", Selangor\",2024-11-20 16:45"));
    }

    #[test]
    fn test_unknown_river_has_empty_name() {
        let csv = readings_to_csv(&[reading(99)], |_| None).unwrap();
        assert!(csv.lines().nth(1).unwrap().starts_with(",2024-11-20"));
    }

    #[test]
    fn test_filenames() {
        assert_eq!(river_export_filename("Sungai Klang"), "Sungai Klang_dri_data.csv");
        assert_eq!(WATCHLIST_EXPORT_FILENAME, "watchlist_dri_data.csv");
    }
}
