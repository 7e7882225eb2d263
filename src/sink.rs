/// Output sinks for the two snapshot artifacts.
///
/// `events.json` is an array of `EventRecord`; `weather.json` is an object
/// keyed by ISO date. Files are pretty-printed with a 4-space indent and
/// written through a temporary file so a reader never sees half a snapshot.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::model::{EventRecord, ForecastTable, ValetError};

pub trait EventSink: Send + Sync {
    fn write_events(&self, events: &[EventRecord]) -> Result<(), ValetError>;
    fn write_forecast(&self, forecast: &ForecastTable) -> Result<(), ValetError>;
}

// ---------------------------------------------------------------------------
// JSON files
// ---------------------------------------------------------------------------

fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, ValetError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

fn write_snapshot<T: Serialize>(path: &Path, value: &T) -> Result<(), ValetError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, to_pretty_json(value)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn read_snapshot<T: DeserializeOwned + Default>(path: &Path) -> Result<T, ValetError> {
    if !path.exists() {
        return Ok(T::default());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(T::default());
    }
    Ok(serde_json::from_str(&content)?)
}

/// Read back an `events.json` snapshot; a missing file is an empty list.
pub fn load_events<P: AsRef<Path>>(path: P) -> Result<Vec<EventRecord>, ValetError> {
    read_snapshot(path.as_ref())
}

/// Read back a `weather.json` snapshot; a missing file is an empty table.
pub fn load_forecast<P: AsRef<Path>>(path: P) -> Result<ForecastTable, ValetError> {
    read_snapshot(path.as_ref())
}

#[derive(Debug, Clone)]
pub struct JsonFileSink {
    pub events_path: PathBuf,
    pub weather_path: PathBuf,
}

impl JsonFileSink {
    pub fn new(events_path: impl Into<PathBuf>, weather_path: impl Into<PathBuf>) -> Self {
        Self {
            events_path: events_path.into(),
            weather_path: weather_path.into(),
        }
    }
}

impl EventSink for JsonFileSink {
    fn write_events(&self, events: &[EventRecord]) -> Result<(), ValetError> {
        write_snapshot(&self.events_path, &events)?;
        info!(count = events.len(), path = %self.events_path.display(), "saved events");
        Ok(())
    }

    fn write_forecast(&self, forecast: &ForecastTable) -> Result<(), ValetError> {
        write_snapshot(&self.weather_path, forecast)?;
        info!(days = forecast.len(), path = %self.weather_path.display(), "saved forecast");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Keeps the last snapshot; clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Option<Vec<EventRecord>>>>,
    forecast: Arc<Mutex<Option<ForecastTable>>>,
}

impl MemorySink {
    pub fn events(&self) -> Option<Vec<EventRecord>> {
        self.events.lock().ok().and_then(|guard| guard.clone())
    }

    pub fn forecast(&self) -> Option<ForecastTable> {
        self.forecast.lock().ok().and_then(|guard| guard.clone())
    }
}

impl EventSink for MemorySink {
    fn write_events(&self, events: &[EventRecord]) -> Result<(), ValetError> {
        let mut guard = self
            .events
            .lock()
            .map_err(|_| ValetError::Config("memory sink lock poisoned".to_string()))?;
        *guard = Some(events.to_vec());
        Ok(())
    }

    fn write_forecast(&self, forecast: &ForecastTable) -> Result<(), ValetError> {
        let mut guard = self
            .forecast
            .lock()
            .map_err(|_| ValetError::Config("memory sink lock poisoned".to_string()))?;
        *guard = Some(forecast.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
