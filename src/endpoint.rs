/// HTTP endpoint for the valet dashboard
///
/// Serves the last written snapshots. Files are re-read on every request,
/// so a new collection run is picked up without restarting the server.
///
/// Endpoints:
/// - GET /events - The events.json snapshot
/// - GET /weather - The weather.json snapshot
/// - GET /board/{YYYY-MM-DD|today} - Day board with live lane scores
/// - GET /health - Service health check

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::analysis::live_traffic::{day_board, peak_live_score, BoardEntry, TrafficLevel};
use crate::ingest::hotel::load_hotel_traffic;
use crate::sink::{load_events, load_forecast};

// ---------------------------------------------------------------------------
// Response Types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub date: NaiveDate,
    pub generated_at: NaiveDateTime,
    pub peak_score: f64,
    pub peak_level: TrafficLevel,
    pub hotel_arrivals: Option<u32>,
    pub hotel_departures: Option<u32>,
    pub entries: Vec<BoardEntry>,
}

/// Where the endpoint finds its data.
#[derive(Debug, Clone)]
pub struct SnapshotPaths {
    pub events_path: PathBuf,
    pub weather_path: PathBuf,
    pub hotel_traffic_path: PathBuf,
    pub hotel_name: String,
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

fn not_found(url: &str) -> (u16, serde_json::Value) {
    (
        404,
        serde_json::json!({
            "error": "Not found",
            "path": url,
            "available_endpoints": ["/health", "/events", "/weather", "/board/{YYYY-MM-DD}"]
        }),
    )
}

fn server_error(e: impl std::fmt::Display) -> (u16, serde_json::Value) {
    (500, serde_json::json!({ "error": e.to_string() }))
}

fn to_json<T: Serialize>(value: &T) -> (u16, serde_json::Value) {
    match serde_json::to_value(value) {
        Ok(json) => (200, json),
        Err(e) => server_error(e),
    }
}

/// Build the board for `date` as seen at `now`.
pub fn board_for(paths: &SnapshotPaths, date: NaiveDate, now: NaiveDateTime) -> Result<BoardResponse, String> {
    let events = load_events(&paths.events_path).map_err(|e| e.to_string())?;
    let hotel = load_hotel_traffic(&paths.hotel_traffic_path).map_err(|e| e.to_string())?;
    let hotel_day = hotel.get(&date);

    let entries = day_board(&events, date, hotel_day, &paths.hotel_name, now);
    let peak_score = peak_live_score(&entries);

    Ok(BoardResponse {
        date,
        generated_at: now,
        peak_score,
        peak_level: TrafficLevel::from_score(peak_score),
        hotel_arrivals: hotel_day.map(|h| h.arrivals),
        hotel_departures: hotel_day.map(|h| h.departures),
        entries,
    })
}

/// Resolve a request path to a status code and JSON body.
pub fn route(url: &str, paths: &SnapshotPaths, now: NaiveDateTime) -> (u16, serde_json::Value) {
    let path = url.split('?').next().unwrap_or(url);

    match path {
        "/health" => (
            200,
            serde_json::json!({
                "status": "ok",
                "service": "valetops_service",
                "version": env!("CARGO_PKG_VERSION")
            }),
        ),
        "/events" => match load_events(&paths.events_path) {
            Ok(events) => to_json(&events),
            Err(e) => server_error(e),
        },
        "/weather" => match load_forecast(&paths.weather_path) {
            Ok(forecast) => to_json(&forecast),
            Err(e) => server_error(e),
        },
        _ if path.starts_with("/board/") => {
            let requested = path.trim_start_matches("/board/");
            let date = if requested == "today" {
                Some(now.date())
            } else {
                NaiveDate::parse_from_str(requested, "%Y-%m-%d").ok()
            };
            match date {
                Some(date) => match board_for(paths, date, now) {
                    Ok(board) => to_json(&board),
                    Err(e) => server_error(e),
                },
                None => (
                    400,
                    serde_json::json!({ "error": "Expected /board/YYYY-MM-DD or /board/today", "date": requested }),
                ),
            }
        }
        _ => not_found(path),
    }
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start HTTP endpoint server on the specified port (blocks)
pub fn start_endpoint_server(port: u16, paths: SnapshotPaths) -> Result<(), String> {
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    info!(port, "📡 HTTP endpoint listening");

    for request in server.incoming_requests() {
        let (status, body) = route(request.url(), &paths, Local::now().naive_local());

        if let Err(e) = request.respond(create_response(status, &body)) {
            warn!(error = %e, "failed to send response");
        }
    }

    Ok(())
}

/// Create HTTP response with JSON body
fn create_response(status_code: u16, json: &serde_json::Value) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let body = serde_json::to_string_pretty(json).unwrap_or_else(|_| "{}".to_string());
    let mut response = tiny_http::Response::from_data(body.into_bytes())
        .with_status_code(tiny_http::StatusCode::from(status_code));

    if let Ok(header) = tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        response = response.with_header(header);
    }
    response
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
