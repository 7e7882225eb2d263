/// NWS (National Weather Service) Forecast API Client
///
/// Retrieves the 12-hour period forecast for a gridpoint from
/// api.weather.gov and reduces it to (start time, short forecast) pairs
/// for the weather correlator.
///
/// API Documentation: https://www.weather.gov/documentation/services-web-api
/// Forecast endpoint: https://api.weather.gov/gridpoints/{office}/{x},{y}/forecast
///
/// The API rejects requests without a User-Agent identifying the caller.

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::model::{ForecastPeriod, ValetError};

// ============================================================================
// NWS API Response Structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties {
    periods: Vec<NwsPeriod>,
}

#[derive(Debug, Deserialize)]
struct NwsPeriod {
    #[serde(rename = "startTime")]
    start_time: String,
    #[serde(rename = "shortForecast")]
    short_forecast: String,
}

// ============================================================================
// Forecast Sources
// ============================================================================

pub trait ForecastSource: Send + Sync {
    fn periods(&self) -> Result<Vec<ForecastPeriod>, ValetError>;
}

/// Parse an NWS gridpoint forecast document.
pub fn parse_forecast(json: &str) -> Result<Vec<ForecastPeriod>, ValetError> {
    let response: ForecastResponse = serde_json::from_str(json)?;

    Ok(response
        .properties
        .periods
        .into_iter()
        .map(|p| ForecastPeriod {
            start_time: p.start_time,
            short_forecast: p.short_forecast,
        })
        .collect())
}

/// Live forecast over HTTP.
pub struct NwsForecastClient {
    client: reqwest::blocking::Client,
    url: String,
}

impl NwsForecastClient {
    pub fn new(url: impl Into<String>, user_agent: &str) -> Result<Self, ValetError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self { client, url: url.into() })
    }
}

impl ForecastSource for NwsForecastClient {
    fn periods(&self) -> Result<Vec<ForecastPeriod>, ValetError> {
        debug!(url = %self.url, "fetching NWS forecast");

        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/geo+json")
            .send()?;

        if !response.status().is_success() {
            return Err(ValetError::Forecast(format!("NWS API error: {}", response.status())));
        }

        let text = response.text()?;
        parse_forecast(&text)
    }
}

/// Saved copy of an NWS forecast response.
#[derive(Debug, Clone)]
pub struct ForecastFile {
    pub path: PathBuf,
}

impl ForecastFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ForecastSource for ForecastFile {
    fn periods(&self) -> Result<Vec<ForecastPeriod>, ValetError> {
        let content = fs::read_to_string(&self.path)?;
        parse_forecast(&content)
    }
}

/// Source that always reports no periods, for runs without weather.
pub struct NoForecast;

impl ForecastSource for NoForecast {
    fn periods(&self) -> Result<Vec<ForecastPeriod>, ValetError> {
        Ok(Vec::new())
    }
}

// ============================================================================
// Tests
// ============================================================================
