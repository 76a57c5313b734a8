/// HTTP endpoint for river debris risk
///
/// Provides a small REST API for the dashboard and NGO tooling.
///
/// Endpoints:
/// - GET /health - Service health check
/// - GET /api/rivers - Monitored rivers
/// - GET /api/river/{id}/dri - Score a river now
/// - GET /api/river/{id}/history?days=N - Stored readings and summary
/// - GET /api/river/{id}/export?days=N - Stored readings as CSV
/// - GET /api/export?rivers=1,2,3&days=N - Several rivers as one CSV
/// - GET /api/summary?rivers=1,2,3&days=N - Per-river history summaries
///
/// Routing is plain prefix matching; `dispatch` maps a request URL to a
/// `Reply` without touching the network so it can be tested directly.

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::service::{DriService, ServiceError};

pub const AVAILABLE_ENDPOINTS: [&str; 7] = [
    "/health",
    "/api/rivers",
    "/api/river/{id}/dri",
    "/api/river/{id}/history?days=N",
    "/api/river/{id}/export?days=N",
    "/api/export?rivers=1,2&days=N",
    "/api/summary?rivers=1,2&days=N",
];

// ---------------------------------------------------------------------------
// Replies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ReplyBody {
    Json(Value),
    Csv { filename: String, body: String },
}

/// Status plus body, independent of the HTTP library.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: ReplyBody,
}

impl Reply {
    fn json(status: u16, value: Value) -> Self {
        Self { status, body: ReplyBody::Json(value) }
    }

    fn ok<T: Serialize>(data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => Self::json(200, value),
            Err(e) => Self::error(500, &format!("failed to serialize response: {}", e)),
        }
    }

    fn error(status: u16, message: &str) -> Self {
        Self::json(status, json!({ "error": message }))
    }

    fn not_found() -> Self {
        Self::json(
            404,
            json!({
                "error": "Not found",
                "available_endpoints": AVAILABLE_ENDPOINTS,
            }),
        )
    }
}

fn service_error_reply(e: &ServiceError) -> Reply {
    match e {
        ServiceError::RiverNotFound(_) => Reply::error(404, &e.to_string()),
        ServiceError::InvalidDays(_) => Reply::error(400, &e.to_string()),
        ServiceError::DatabaseUnavailable => Reply::error(503, &e.to_string()),
        _ => {
            error!(error = %e, "request failed");
            Reply::error(500, &e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Splits a request URL into path and query string.
fn split_url(url: &str) -> (&str, &str) {
    match url.split_once('?') {
        Some((path, query)) => (path, query),
        None => (url, ""),
    }
}

/// First value of `name` in a query string, URL-decoded.
fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .map(|value| value.into_owned())
}

/// `days` query parameter. Absent is `Ok(None)`; unparseable is an error.
fn parse_days(query: &str) -> Result<Option<i64>, Reply> {
    match query_param(query, "days") {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| Reply::error(400, &format!("invalid days: {}", raw))),
    }
}

fn parse_river_id(raw: &str) -> Result<i32, Reply> {
    raw.parse::<i32>()
        .map_err(|_| Reply::error(400, &format!("invalid river id: {}", raw)))
}

fn parse_river_ids(query: &str) -> Result<Vec<i32>, Reply> {
    let raw = query_param(query, "rivers")
        .ok_or_else(|| Reply::error(400, "missing rivers parameter"))?;

    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_river_id)
        .collect::<Result<Vec<_>, _>>()?;

    if ids.is_empty() {
        return Err(Reply::error(400, "missing rivers parameter"));
    }
    Ok(ids)
}

/// Routes one GET request.
pub fn dispatch(service: &mut DriService, url: &str) -> Reply {
    let (path, query) = split_url(url);

    if path == "/health" {
        return handle_health(service);
    }
    if path == "/api/rivers" {
        return match service.rivers() {
            Ok(rivers) => Reply::ok(&rivers),
            Err(e) => service_error_reply(&e),
        };
    }
    if path == "/api/export" {
        return handle_multi_export(service, query);
    }
    if path == "/api/summary" {
        return handle_summary(service, query);
    }
    if let Some(rest) = path.strip_prefix("/api/river/") {
        let Some((raw_id, action)) = rest.split_once('/') else {
            return Reply::not_found();
        };
        let river_id = match parse_river_id(raw_id) {
            Ok(id) => id,
            Err(reply) => return reply,
        };
        return match action {
            "dri" => handle_dri(service, river_id),
            "history" => handle_history(service, river_id, query),
            "export" => handle_export(service, river_id, query),
            _ => Reply::not_found(),
        };
    }

    Reply::not_found()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn handle_health(service: &DriService) -> Reply {
    Reply::json(
        200,
        json!({
            "status": "ok",
            "service": "debris_service",
            "version": env!("CARGO_PKG_VERSION"),
            "database": service.has_database(),
            "live_weather": service.config().weather_api_key.is_some(),
        }),
    )
}

fn handle_dri(service: &mut DriService, river_id: i32) -> Reply {
    match service.assess(river_id) {
        Ok(report) => Reply::ok(&report),
        Err(e) => service_error_reply(&e),
    }
}

fn handle_history(service: &mut DriService, river_id: i32, query: &str) -> Reply {
    let days = match parse_days(query) {
        Ok(days) => days,
        Err(reply) => return reply,
    };
    match service.history(river_id, days) {
        Ok(history) => Reply::ok(&history),
        Err(e) => service_error_reply(&e),
    }
}

fn handle_export(service: &mut DriService, river_id: i32, query: &str) -> Reply {
    let days = match parse_days(query) {
        Ok(days) => days,
        Err(reply) => return reply,
    };
    match service.export_river(river_id, days) {
        Ok(export) => Reply {
            status: 200,
            body: ReplyBody::Csv { filename: export.filename, body: export.body },
        },
        Err(e) => service_error_reply(&e),
    }
}

fn handle_multi_export(service: &mut DriService, query: &str) -> Reply {
    let ids = match parse_river_ids(query) {
        Ok(ids) => ids,
        Err(reply) => return reply,
    };
    let days = match parse_days(query) {
        Ok(days) => days,
        Err(reply) => return reply,
    };
    match service.export_rivers(&ids, days) {
        Ok(export) => Reply {
            status: 200,
            body: ReplyBody::Csv { filename: export.filename, body: export.body },
        },
        Err(e) => service_error_reply(&e),
    }
}

fn handle_summary(service: &mut DriService, query: &str) -> Reply {
    let ids = match parse_river_ids(query) {
        Ok(ids) => ids,
        Err(reply) => return reply,
    };
    let days = match parse_days(query) {
        Ok(days) => days,
        Err(reply) => return reply,
    };
    match service.summaries(&ids, days) {
        Ok(summaries) => Reply::ok(&summaries),
        Err(e) => service_error_reply(&e),
    }
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

type HttpResponse = tiny_http::Response<std::io::Cursor<Vec<u8>>>;

fn header(name: &str, value: &str) -> Option<tiny_http::Header> {
    tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}

/// Converts a `Reply` into a tiny_http response.
fn into_response(reply: Reply) -> HttpResponse {
    let (bytes, headers) = match reply.body {
        ReplyBody::Json(value) => {
            let body = serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string());
            (body.into_bytes(), vec![header("Content-Type", "application/json")])
        }
        ReplyBody::Csv { filename, body } => (
            body.into_bytes(),
            vec![
                header("Content-Type", "text/csv; charset=utf-8"),
                header(
                    "Content-Disposition",
                    &format!("attachment; filename=\"{}\"", filename.replace('"', "")),
                ),
            ],
        ),
    };

    let mut response = tiny_http::Response::from_data(bytes)
        .with_status_code(tiny_http::StatusCode::from(reply.status));
    for h in headers.into_iter().flatten() {
        response.add_header(h);
    }
    response
}

/// Start HTTP endpoint server on the specified port
pub fn start_endpoint_server(port: u16, mut service: DriService) -> Result<(), String> {
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    println!("📡 HTTP endpoint listening on http://0.0.0.0:{}", port);
    for endpoint in AVAILABLE_ENDPOINTS {
        println!("   GET {}", endpoint);
    }
    println!();
    info!(port, "endpoint server started");

    for request in server.incoming_requests() {
        let url = request.url().to_string();

        let reply = if *request.method() == tiny_http::Method::Get {
            dispatch(&mut service, &url)
        } else {
            Reply::error(405, "only GET is supported")
        };

        info!(method = %request.method(), url = %url, status = reply.status, "request");

        if let Err(e) = request.respond(into_response(reply)) {
            warn!(error = %e, "failed to send response");
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{self, ServiceConfig};

    fn service() -> DriService {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/rivers.toml");
        let rivers = config::load_registry(path).expect("bundled registry should load");
        DriService::with_registry(ServiceConfig::default(), config::registry_profiles(&rivers))
    }

    fn json_body(reply: &Reply) -> &Value {
        match &reply.body {
            ReplyBody::Json(value) => value,
            other => panic!("expected JSON, got {:?}", other),
        }
    }

    #[test]
    fn test_query_helpers() {
        assert_eq!(split_url("/api/river/1/history?days=7"), ("/api/river/1/history", "days=7"));
        assert_eq!(split_url("/health"), ("/health", ""));
        assert_eq!(query_param("a=1&days=14", "days").as_deref(), Some("14"));
        assert_eq!(query_param("rivers=1%2C2", "rivers").as_deref(), Some("1,2"));
        assert_eq!(query_param("", "days"), None);
    }

    #[test]
    fn test_health() {
        let reply = dispatch(&mut service(), "/health");
        assert_eq!(reply.status, 200);
        let body = json_body(&reply);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"], false);
    }

    #[test]
    fn test_rivers_listing() {
        let reply = dispatch(&mut service(), "/api/rivers");
        assert_eq!(reply.status, 200);
        let rivers = json_body(&reply).as_array().expect("array of rivers");
        assert!(!rivers.is_empty());
        assert_eq!(rivers[0]["id"], 1);
    }

    #[test]
    fn test_dri_report_shape() {
        let reply = dispatch(&mut service(), "/api/river/1/dri");
        assert_eq!(reply.status, 200);
        let body = json_body(&reply);
        assert_eq!(body["river_id"], 1);
        for key in ["dri_score", "risk_level", "risk_color", "debris_estimate_kg", "land_use", "debris_types", "factors", "timestamp"] {
            assert!(body.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(body["factors"]["rainfall"]["weight"], "40%");
    }

    #[test]
    fn test_bad_and_unknown_river_ids() {
        let mut service = service();
        assert_eq!(dispatch(&mut service, "/api/river/abc/dri").status, 400);
        let reply = dispatch(&mut service, "/api/river/9999/dri");
        assert_eq!(reply.status, 404);
        assert_eq!(json_body(&reply)["error"], "river 9999 not found");
    }

    #[test]
    fn test_history_without_database() {
        let mut service = service();
        assert_eq!(dispatch(&mut service, "/api/river/1/history?days=7").status, 503);
        assert_eq!(dispatch(&mut service, "/api/river/1/history?days=week").status, 400);
        assert_eq!(dispatch(&mut service, "/api/river/1/export").status, 503);
    }

    #[test]
    fn test_out_of_range_days_is_bad_request() {
        let mut service = service();
        for url in [
            "/api/river/1/history?days=9999999999999",
            "/api/river/1/export?days=9999999999999",
            "/api/export?rivers=1,2&days=9223372036854775807",
            "/api/summary?rivers=1&days=200000000",
        ] {
            let reply = dispatch(&mut service, url);
            assert_eq!(reply.status, 400, "{}", url);
            assert!(json_body(&reply)["error"].as_str().unwrap().starts_with("days out of range"));
        }
        // The server keeps answering afterwards
        assert_eq!(dispatch(&mut service, "/health").status, 200);
    }

    #[test]
    fn test_multi_export_validation() {
        let mut service = service();
        assert_eq!(dispatch(&mut service, "/api/export").status, 400);
        assert_eq!(dispatch(&mut service, "/api/export?rivers=1,x").status, 400);
        assert_eq!(dispatch(&mut service, "/api/export?rivers=1,404").status, 404);
        assert_eq!(dispatch(&mut service, "/api/export?rivers=1,2&days=7").status, 503);
        assert_eq!(dispatch(&mut service, "/api/summary?rivers=3").status, 503);
        assert_eq!(dispatch(&mut service, "/api/summary?rivers=").status, 400);
    }

    #[test]
    fn test_unknown_path_lists_endpoints() {
        let reply = dispatch(&mut service(), "/site/05568500");
        assert_eq!(reply.status, 404);
        assert_eq!(json_body(&reply)["available_endpoints"][0], "/health");
        assert_eq!(dispatch(&mut service(), "/api/river/1/forecast").status, 404);
    }
}
