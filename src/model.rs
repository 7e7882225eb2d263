/// Shared data types for the valet-lane impact service.
///
/// Everything here is plain data: records flowing out of collectors, the
/// impact profile and timeline derived from them, and the weather table.
/// The JSON shapes of `EventRecord` and `DailyForecast` are the on-disk
/// output format and are read back by the dashboard.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Marker stored in the error form of an `ImpactTimeline`.
pub const TIME_TBA: &str = "Time TBA";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ValetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid impact rules: {0}")]
    InvalidRules(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("collector '{name}' failed: {message}")]
    Collector { name: String, message: String },

    #[error("forecast unavailable: {0}")]
    Forecast(String),
}

// ---------------------------------------------------------------------------
// Collector output
// ---------------------------------------------------------------------------

/// Identifies which listing site a record came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Source {
    Vbc,
    HuntsvilleOrg,
    Other(String),
}

impl From<String> for Source {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "VBC" => Source::Vbc,
            "Huntsville.org" => Source::HuntsvilleOrg,
            _ => Source::Other(tag),
        }
    }
}

impl From<Source> for String {
    fn from(source: Source) -> Self {
        source.to_string()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Vbc => f.write_str("VBC"),
            Source::HuntsvilleOrg => f.write_str("Huntsville.org"),
            Source::Other(tag) => f.write_str(tag),
        }
    }
}

/// One listing as produced by a collector. Never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEventRecord {
    pub title: String,
    pub venue: String,
    /// Source-formatted date text, passed through untouched
    pub date: String,
    /// Advertised start time text; may be "TBA" or missing entirely
    pub raw_start_time: Option<String>,
    pub source: Source,
}

// ---------------------------------------------------------------------------
// Impact model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

/// Clock time as matched from listing text.
///
/// Values are kept exactly as matched; `"13:75 PM"` is representable and
/// resolves by rolling forward rather than being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedTime {
    pub hour: u32,
    pub minute: u32,
    pub meridiem: Meridiem,
}

impl ParsedTime {
    /// Minutes after midnight on a 24-hour clock, before wrapping.
    pub fn minutes_from_midnight(&self) -> u32 {
        let hour = match self.meridiem {
            Meridiem::Am => self.hour % 12,
            Meridiem::Pm => self.hour % 12 + 12,
        };
        hour * 60 + self.minute
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactProfile {
    /// 1-10 congestion score before windowing
    pub base_severity: u8,
    pub duration_hours: f64,
}

/// A labeled time span with its own severity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImpactWindow {
    pub window: String,
    pub impact: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImpactTimeline {
    Windowed {
        arrival_rush: ImpactWindow,
        during_event: ImpactWindow,
        departure_rush: ImpactWindow,
    },
    Unscheduled {
        error: String,
        static_impact: u8,
    },
}

impl ImpactTimeline {
    /// Error form used when no start time could be parsed.
    pub fn time_tba(static_impact: u8) -> Self {
        ImpactTimeline::Unscheduled {
            error: TIME_TBA.to_string(),
            static_impact,
        }
    }

    pub fn is_tba(&self) -> bool {
        matches!(self, ImpactTimeline::Unscheduled { .. })
    }
}

/// Output unit written to `events.json`.
///
/// Field order matches the published file layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventRecord {
    pub title: String,
    pub date: String,
    pub time: String,
    pub venue: String,
    pub impact_timeline: ImpactTimeline,
    pub source: Source,
}

// ---------------------------------------------------------------------------
// Weather
// ---------------------------------------------------------------------------

/// A single forecast period (day or night half) from the forecast feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastPeriod {
    /// ISO 8601 with offset, e.g. "2026-10-14T06:00:00-05:00"
    pub start_time: String,
    pub short_forecast: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub condition: String,
    pub is_raining: bool,
    /// Always implies `is_raining`
    pub is_storming: bool,
}

/// Per-day forecast flags keyed by calendar date; serializes with ISO date keys.
pub type ForecastTable = BTreeMap<NaiveDate, DailyForecast>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
