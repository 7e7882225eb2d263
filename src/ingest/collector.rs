/// Event collectors.
///
/// A collector yields the raw listings of one source. The scraping itself
/// (browser automation, pagination, markup selection) happens in external
/// tools that write their results as a JSON array:
///
/// ```json
/// [
///   { "title": "Downtown Parade", "venue": "Main Street",
///     "date": "December 5, 2026", "time": "5:00 PM" }
/// ]
/// ```
///
/// Missing fields fall back to the same placeholders the scrapers use.

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::model::{RawEventRecord, Source, ValetError};

pub trait Collector: Send + Sync {
    /// Name used in logs and the run summary
    fn name(&self) -> &str;

    fn collect(&self) -> Result<Vec<RawEventRecord>, ValetError>;
}

// ---------------------------------------------------------------------------
// JSON dump
// ---------------------------------------------------------------------------

pub const UNKNOWN_VENUE: &str = "Unknown Venue";

fn unknown_event() -> String {
    "Unknown Event".to_string()
}

fn unknown_date() -> String {
    "Unknown Date".to_string()
}

/// One listing as written by an external scraper.
#[derive(Debug, Deserialize)]
struct ListingEntry {
    #[serde(default = "unknown_event")]
    title: String,
    #[serde(default)]
    venue: Option<String>,
    #[serde(default = "unknown_date")]
    date: String,
    #[serde(default)]
    time: Option<String>,
}

/// Parse a scraper dump, stamping every record with `source`.
pub fn parse_listings(json: &str, source: &Source) -> Result<Vec<RawEventRecord>, ValetError> {
    parse_listings_with_venue(json, source, UNKNOWN_VENUE)
}

/// As `parse_listings`, with `default_venue` for entries that carry none.
pub fn parse_listings_with_venue(
    json: &str,
    source: &Source,
    default_venue: &str,
) -> Result<Vec<RawEventRecord>, ValetError> {
    let entries: Vec<ListingEntry> = serde_json::from_str(json)?;

    Ok(entries
        .into_iter()
        .map(|entry| RawEventRecord {
            title: entry.title.trim().to_string(),
            venue: entry
                .venue
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default_venue.to_string()),
            date: entry.date.trim().to_string(),
            raw_start_time: entry.time.map(|t| t.trim().to_string()),
            source: source.clone(),
        })
        .collect())
}

/// True when any keyword occurs in the title or venue (case-insensitive).
/// An empty keyword list keeps everything.
pub fn keep_listing(record: &RawEventRecord, keep_any: &[String]) -> bool {
    if keep_any.is_empty() {
        return true;
    }
    let title = record.title.to_lowercase();
    let venue = record.venue.to_lowercase();
    keep_any.iter().any(|kw| {
        let kw = kw.to_lowercase();
        title.contains(&kw) || venue.contains(&kw)
    })
}

#[derive(Debug, Clone)]
pub struct JsonFileCollector {
    pub name: String,
    pub path: PathBuf,
    pub source: Source,
    pub default_venue: String,
    /// Listings matching none of these keywords are dropped; empty keeps all
    pub keep_any: Vec<String>,
}

impl JsonFileCollector {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, source: Source) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            source,
            default_venue: UNKNOWN_VENUE.to_string(),
            keep_any: Vec::new(),
        }
    }

    pub fn with_default_venue(mut self, venue: impl Into<String>) -> Self {
        self.default_venue = venue.into();
        self
    }

    pub fn with_keep_any(mut self, keywords: Vec<String>) -> Self {
        self.keep_any = keywords;
        self
    }
}

impl Collector for JsonFileCollector {
    fn name(&self) -> &str {
        &self.name
    }

    fn collect(&self) -> Result<Vec<RawEventRecord>, ValetError> {
        let content = fs::read_to_string(&self.path).map_err(|e| ValetError::Collector {
            name: self.name.clone(),
            message: format!("cannot read {}: {}", self.path.display(), e),
        })?;
        let records = parse_listings_with_venue(&content, &self.source, &self.default_venue)?;
        let total = records.len();
        let kept: Vec<RawEventRecord> = records
            .into_iter()
            .filter(|r| keep_listing(r, &self.keep_any))
            .collect();
        if kept.len() < total {
            debug!(collector = %self.name, dropped = total - kept.len(), "listings outside keep filter");
        }
        Ok(kept)
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Serves a fixed set of records.
#[derive(Debug, Clone)]
pub struct StaticCollector {
    pub name: String,
    pub records: Vec<RawEventRecord>,
}

impl StaticCollector {
    pub fn new(name: impl Into<String>, records: Vec<RawEventRecord>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }
}

impl Collector for StaticCollector {
    fn name(&self) -> &str {
        &self.name
    }

    fn collect(&self) -> Result<Vec<RawEventRecord>, ValetError> {
        Ok(self.records.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::{fixture_huntsville_listings_json, fixture_vbc_listings_json};

    #[test]
    fn test_parse_listings_stamps_source() {
        let records = parse_listings(fixture_vbc_listings_json(), &Source::Vbc)
            .expect("fixture should parse");
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.source == Source::Vbc));
        assert_eq!(records[0].title, "Broadway Tour: Hamilton");
        assert_eq!(records[0].raw_start_time.as_deref(), Some("7:30 PM"));
    }

    #[test]
    fn test_missing_fields_get_placeholders() {
        let records = parse_listings(fixture_huntsville_listings_json(), &Source::HuntsvilleOrg)
            .expect("fixture should parse");
        let sparse = records.last().expect("fixture has records");
        assert_eq!(sparse.title, "Unknown Event");
        assert_eq!(sparse.venue, "Unknown Venue");
        assert_eq!(sparse.date, "Unknown Date");
        assert_eq!(sparse.raw_start_time, None);
    }

    #[test]
    fn test_whitespace_trimmed() {
        let json = r#"[{ "title": "  Fall Expo \n", "venue": " Convention Hall", "date": "October 18, 2026 ", "time": " TBA " }]"#;
        let records = parse_listings(json, &Source::Vbc).unwrap();
        assert_eq!(records[0].title, "Fall Expo");
        assert_eq!(records[0].venue, "Convention Hall");
        assert_eq!(records[0].raw_start_time.as_deref(), Some("TBA"));
    }

    #[test]
    fn test_collector_fallback_venue() {
        let json = r#"[{ "title": "Symphony Night", "date": "October 14, 2026" },
                       { "title": "Ballet", "venue": "  ", "date": "October 15, 2026" }]"#;
        let records = parse_listings_with_venue(json, &Source::Vbc, "Von Braun Center").unwrap();
        assert_eq!(records[0].venue, "Von Braun Center");
        assert_eq!(records[1].venue, "Von Braun Center");
    }

    #[test]
    fn test_keep_filter_drops_unlisted_venues() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("city.json");
        fs::write(&path, fixture_huntsville_listings_json()).unwrap();

        let keep = ["big spring", "downtown", "parade", "panoply"].iter().map(|k| k.to_string()).collect();
        let collector = JsonFileCollector::new("huntsville_org", &path, Source::HuntsvilleOrg).with_keep_any(keep);
        let titles: Vec<String> = collector.collect().unwrap().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["Downtown Holiday Parade", "Panoply Arts Festival"]);
    }

    #[test]
    fn test_empty_keep_filter_keeps_everything() {
        let records = parse_listings(fixture_huntsville_listings_json(), &Source::HuntsvilleOrg).unwrap();
        assert!(records.iter().all(|r| keep_listing(r, &[])));
    }

    #[test]
    fn test_malformed_dump_is_an_error() {
        assert!(matches!(
            parse_listings("{ not json", &Source::Vbc),
            Err(ValetError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file_reports_collector_name() {
        let collector = JsonFileCollector::new("vbc", "/nonexistent/vbc.json", Source::Vbc);
        let err = collector.collect().unwrap_err();
        assert!(err.to_string().contains("vbc"), "got: {}", err);
    }

    #[test]
    fn test_static_collector_returns_its_records() {
        let record = RawEventRecord {
            title: "Downtown Parade".to_string(),
            venue: "Main Street".to_string(),
            date: "December 5, 2026".to_string(),
            raw_start_time: Some("5:00 PM".to_string()),
            source: Source::HuntsvilleOrg,
        };
        let collector = StaticCollector::new("static", vec![record.clone()]);
        assert_eq!(collector.collect().unwrap(), vec![record]);
        assert_eq!(collector.name(), "static");
    }
}
