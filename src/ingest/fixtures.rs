/// Test fixtures: representative JSON payloads from the WeatherAPI.com
/// current-conditions endpoint.
///
/// These are trimmed to the envelope plus a handful of fields. Response
/// shape:
///   location.{name, region, country, lat, lon, localtime}
///   current.{last_updated, temp_c, wind_kph, wind_dir, precip_mm, humidity, condition}
///
/// On failure the API answers with a non-2xx status and an `error` object
/// instead of `current`.

/// Moderate rain over Kuala Lumpur. Below both adjustment thresholds.
#[cfg(test)]
pub(crate) fn fixture_kuala_lumpur_json() -> &'static str {
    r#"{
      "location": {
        "name": "Kuala Lumpur",
        "region": "Kuala Lumpur",
        "country": "Malaysia",
        "lat": 3.14,
        "lon": 101.69,
        "tz_id": "Asia/Kuala_Lumpur",
        "localtime": "2024-11-20 16:45"
      },
      "current": {
        "last_updated": "2024-11-20 16:45",
        "temp_c": 27.3,
        "is_day": 1,
        "condition": { "text": "Moderate rain", "code": 1189 },
        "wind_kph": 15.1,
        "wind_dir": "WSW",
        "pressure_mb": 1008.0,
        "precip_mm": 12.4,
        "humidity": 89,
        "cloud": 75
      }
    }"#
}

/// Northeast monsoon storm on the east coast. Above both thresholds.
#[cfg(test)]
pub(crate) fn fixture_monsoon_storm_json() -> &'static str {
    r#"{
      "location": {
        "name": "Kuantan",
        "region": "Pahang",
        "country": "Malaysia",
        "lat": 3.83,
        "lon": 103.33
      },
      "current": {
        "last_updated": "2024-12-02 03:15",
        "temp_c": 23.9,
        "condition": { "text": "Heavy rain", "code": 1195 },
        "wind_kph": 38.9,
        "precip_mm": 41.7,
        "humidity": 97
      }
    }"#
}

/// Station reporting wind but no precipitation field.
#[cfg(test)]
pub(crate) fn fixture_sparse_current_json() -> &'static str {
    r#"{
      "location": { "name": "Pekan", "lat": 3.49, "lon": 103.39 },
      "current": { "wind_kph": 4.0, "precip_mm": null }
    }"#
}

/// Error body, as returned with HTTP 400 for an unresolvable location.
#[cfg(test)]
pub(crate) fn fixture_error_json() -> &'static str {
    r#"{
      "error": { "code": 1006, "message": "No matching location found." }
    }"#
}
