/// Hotel arrivals/departures loader - parses hotel_traffic.json
///
/// The front desk records expected car counts per date:
///
/// ```json
/// { "2026-10-14": { "arrivals": 42, "departures": 18 } }
/// ```
///
/// The admin form writes blank fields as `null` and sometimes stores counts
/// as strings; anything that is not a non-negative count reads as 0.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::model::ValetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HotelDay {
    #[serde(default, deserialize_with = "lenient_count")]
    pub arrivals: u32,
    #[serde(default, deserialize_with = "lenient_count")]
    pub departures: u32,
}

/// Leading digits of a string ("12 cars" -> 12), like the form's parseInt.
fn leading_count(text: &str) -> u32 {
    let digits: String = text.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => match (n.as_u64(), n.as_f64()) {
            (Some(v), _) => u32::try_from(v).unwrap_or(u32::MAX),
            (None, Some(f)) if f.is_finite() && f > 0.0 => f.trunc().min(f64::from(u32::MAX)) as u32,
            _ => 0,
        },
        serde_json::Value::String(text) => leading_count(&text),
        _ => 0,
    })
}

pub type HotelTraffic = BTreeMap<NaiveDate, HotelDay>;

pub fn parse_hotel_traffic(json: &str) -> Result<HotelTraffic, ValetError> {
    if json.trim().is_empty() {
        return Ok(HotelTraffic::new());
    }
    Ok(serde_json::from_str(json)?)
}

/// Missing file means no hotel data yet.
pub fn load_hotel_traffic<P: AsRef<Path>>(path: P) -> Result<HotelTraffic, ValetError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(HotelTraffic::new());
    }
    parse_hotel_traffic(&fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::fixture_hotel_traffic_json;

    #[test]
    fn test_parse_hotel_traffic() {
        let traffic = parse_hotel_traffic(fixture_hotel_traffic_json()).unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        assert_eq!(traffic[&day], HotelDay { arrivals: 42, departures: 18 });
        assert_eq!(traffic.len(), 2);
    }

    #[test]
    fn test_missing_counts_default_to_zero() {
        let traffic = parse_hotel_traffic(r#"{ "2026-10-20": { "arrivals": 12 } }"#).unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
        assert_eq!(traffic[&day].departures, 0);
    }

    #[test]
    fn test_blank_and_malformed_counts_read_as_zero() {
        let json = r#"{
          "2026-10-14": { "arrivals": null, "departures": 12 },
          "2026-10-15": { "arrivals": "18", "departures": "abc" },
          "2026-10-16": { "arrivals": -4, "departures": 7.9 }
        }"#;
        let traffic = parse_hotel_traffic(json).unwrap();
        let day = |d| NaiveDate::from_ymd_opt(2026, 10, d).unwrap();
        assert_eq!(traffic[&day(14)], HotelDay { arrivals: 0, departures: 12 });
        assert_eq!(traffic[&day(15)], HotelDay { arrivals: 18, departures: 0 });
        assert_eq!(traffic[&day(16)], HotelDay { arrivals: 0, departures: 7 });
    }

    #[test]
    fn test_empty_file_is_empty_table() {
        assert!(parse_hotel_traffic("  \n").unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_is_empty_table() {
        assert!(load_hotel_traffic("/nonexistent/hotel_traffic.json").unwrap().is_empty());
    }
}
