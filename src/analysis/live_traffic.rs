/// Live lane-impact scoring for the valet dashboard.
///
/// Output records only carry window text and a source-formatted date. This
/// module pins them to real datetimes and scores a given moment:
///
/// - **Arrival** (90 min before start): cubic growth, `max × x³`, with a
///   0.5 floor so an approaching rush is never shown as empty
/// - **During**: 0.0, guests are inside and the lanes are clear
/// - **Departure** (60 min after end): starts at `max` and decays as
///   `max × (1 − y)⁴`
///
/// A day's board mixes scheduled events with synthetic hotel check-in and
/// check-out blocks, ordered by peak impact then start time.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::cmp::Ordering;

use crate::ingest::hotel::HotelDay;
use crate::model::{EventRecord, ImpactTimeline};

const ARRIVAL_WINDOW_MINUTES: i64 = 90;
const DEPARTURE_WINDOW_MINUTES: i64 = 60;
const ARRIVAL_FLOOR: f64 = 0.5;

const DATE_FORMATS: [&str; 6] = [
    "%B %d, %Y",
    "%A, %B %d, %Y",
    "%a, %b %d, %Y",
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%B %d %Y",
];

// ---------------------------------------------------------------------------
// Traffic levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLevel {
    Low,
    Medium,
    High,
}

impl TrafficLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 7.5 {
            TrafficLevel::High
        } else if score >= 4.0 {
            TrafficLevel::Medium
        } else {
            TrafficLevel::Low
        }
    }
}

// ---------------------------------------------------------------------------
// Date resolution
// ---------------------------------------------------------------------------

fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Resolve a listing's date text to a calendar day.
///
/// Multi-day listings ("Dates vary between March 5, 2026 - March 8, 2026"
/// or "Oct 18, 2026 - Oct 20, 2026") resolve to their first day.
pub fn resolve_date(text: &str) -> Option<NaiveDate> {
    let text = match text.split_once("between") {
        Some((_, rest)) => rest,
        None => text,
    };
    parse_date(text).or_else(|| {
        let (first, _) = text.split_once(" - ")?;
        parse_date(first)
    })
}

fn parse_window(window: &str) -> Option<(NaiveTime, NaiveTime)> {
    let (from, to) = window.split_once(" - ")?;
    let from = NaiveTime::parse_from_str(from.trim(), "%I:%M %p").ok()?;
    let to = NaiveTime::parse_from_str(to.trim(), "%I:%M %p").ok()?;
    Some((from, to))
}

// ---------------------------------------------------------------------------
// Scheduled events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledEvent {
    pub title: String,
    pub venue: String,
    pub time_display: String,
    pub date_display: String,
    pub day: Option<NaiveDate>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub max_impact: u8,
    pub is_tba: bool,
}

impl ScheduledEvent {
    /// Pin an output record to concrete datetimes.
    ///
    /// Anything that cannot be resolved (TBA timeline, unknown date format,
    /// malformed window text) yields a TBA entry carrying whatever impact
    /// the record states.
    pub fn from_record(record: &EventRecord) -> Self {
        let day = resolve_date(&record.date);
        let mut event = ScheduledEvent {
            title: record.title.clone(),
            venue: record.venue.clone(),
            time_display: record.time.clone(),
            date_display: record.date.clone(),
            day,
            start: None,
            end: None,
            max_impact: 1,
            is_tba: true,
        };

        match &record.impact_timeline {
            ImpactTimeline::Unscheduled { static_impact, .. } => {
                event.max_impact = *static_impact;
            }
            ImpactTimeline::Windowed { arrival_rush, during_event, departure_rush } => {
                event.max_impact = arrival_rush.impact.max(departure_rush.impact);
                if let (Some(day), Some((from, to))) = (day, parse_window(&during_event.window)) {
                    let start = day.and_time(from);
                    let mut end = day.and_time(to);
                    if end < start {
                        end += Duration::days(1);
                    }
                    event.start = Some(start);
                    event.end = Some(end);
                    event.is_tba = false;
                }
            }
        }

        event
    }

    fn synthetic(title: String, venue: &str, day: NaiveDate, from: NaiveTime, to: NaiveTime, max_impact: u8) -> Self {
        ScheduledEvent {
            title,
            venue: venue.to_string(),
            time_display: format!("{} - {}", from.format("%I:%M %p"), to.format("%I:%M %p")),
            date_display: day.format("%Y-%m-%d").to_string(),
            day: Some(day),
            start: Some(day.and_time(from)),
            end: Some(day.and_time(to)),
            max_impact,
            is_tba: false,
        }
    }

    /// Only events with a pinned start belong on a day board; TBA entries
    /// keep `day` for calendar views.
    fn occurs_on(&self, day: NaiveDate) -> bool {
        self.start.is_some_and(|start| start.date() == day)
    }
}

/// Instantaneous lane impact for `event` at `now`, on the 0-10 scale.
pub fn live_score(now: NaiveDateTime, event: &ScheduledEvent) -> f64 {
    let (Some(start), Some(end)) = (event.start, event.end) else {
        return 0.0;
    };
    if event.is_tba {
        return 0.0;
    }

    let max = f64::from(event.max_impact);
    let arrival_window = Duration::minutes(ARRIVAL_WINDOW_MINUTES);
    let departure_window = Duration::minutes(DEPARTURE_WINDOW_MINUTES);

    if now >= start - arrival_window && now < start {
        let x = fraction(now - (start - arrival_window), arrival_window);
        return (max * x.powi(3)).max(ARRIVAL_FLOOR);
    }
    if now >= start && now <= end {
        return 0.0;
    }
    if now > end && now <= end + departure_window {
        let y = fraction(now - end, departure_window);
        return (max * (1.0 - y).powi(4)).max(0.0);
    }

    0.0
}

fn fraction(elapsed: Duration, window: Duration) -> f64 {
    elapsed.num_milliseconds() as f64 / window.num_milliseconds() as f64
}

// ---------------------------------------------------------------------------
// Hotel blocks
// ---------------------------------------------------------------------------

fn hotel_impact(cars: u32) -> u8 {
    cars.div_ceil(10).min(10) as u8
}

/// Synthetic check-out (06:00-13:00) and check-in (15:00-20:30) blocks.
pub fn hotel_events(day: NaiveDate, traffic: &HotelDay, hotel_name: &str) -> Vec<ScheduledEvent> {
    let clock = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default();
    let mut events = Vec::new();

    if traffic.departures > 0 {
        events.push(ScheduledEvent::synthetic(
            format!("Hotel Check-outs ({} cars)", traffic.departures),
            hotel_name,
            day,
            clock(6, 0),
            clock(13, 0),
            hotel_impact(traffic.departures),
        ));
    }
    if traffic.arrivals > 0 {
        events.push(ScheduledEvent::synthetic(
            format!("Hotel Check-ins ({} cars)", traffic.arrivals),
            hotel_name,
            day,
            clock(15, 0),
            clock(20, 30),
            hotel_impact(traffic.arrivals),
        ));
    }

    events
}

// ---------------------------------------------------------------------------
// Day board
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct BoardEntry {
    #[serde(flatten)]
    pub event: ScheduledEvent,
    pub live_score: f64,
    pub level: TrafficLevel,
}

fn board_order(a: &ScheduledEvent, b: &ScheduledEvent) -> Ordering {
    b.max_impact.cmp(&a.max_impact).then_with(|| match (a.start, b.start) {
        (Some(x), Some(y)) => x.time().cmp(&y.time()),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    })
}

/// Events on `day` plus hotel blocks, scored at `now`.
pub fn day_board(
    records: &[EventRecord],
    day: NaiveDate,
    hotel: Option<&HotelDay>,
    hotel_name: &str,
    now: NaiveDateTime,
) -> Vec<BoardEntry> {
    let mut events: Vec<ScheduledEvent> = records
        .iter()
        .map(ScheduledEvent::from_record)
        .filter(|event| event.occurs_on(day))
        .collect();
    if let Some(traffic) = hotel {
        events.extend(hotel_events(day, traffic, hotel_name));
    }
    events.sort_by(board_order);

    events
        .into_iter()
        .map(|event| {
            let live_score = live_score(now, &event);
            BoardEntry {
                level: TrafficLevel::from_score(live_score),
                live_score,
                event,
            }
        })
        .collect()
}

/// Headline score for the dashboard badge; never below 1.0.
pub fn peak_live_score(board: &[BoardEntry]) -> f64 {
    board
        .iter()
        .map(|entry| entry.live_score)
        .fold(1.0, f64::max)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImpactWindow, Source};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(day: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        day.and_hms_opt(h, m, 0).unwrap()
    }

    fn windowed(title: &str, date: &str, during: &str, arrival: u8, departure: u8) -> EventRecord {
        EventRecord {
            title: title.to_string(),
            date: date.to_string(),
            time: "7:00 PM".to_string(),
            venue: "Propst Arena".to_string(),
            impact_timeline: ImpactTimeline::Windowed {
                arrival_rush: ImpactWindow { window: "unused".to_string(), impact: arrival },
                during_event: ImpactWindow { window: during.to_string(), impact: 2 },
                departure_rush: ImpactWindow { window: "unused".to_string(), impact: departure },
            },
            source: Source::Vbc,
        }
    }

    #[test]
    fn test_resolve_date_formats() {
        let expected = Some(date(2026, 3, 5));
        assert_eq!(resolve_date("March 5, 2026"), expected);
        assert_eq!(resolve_date("Mar 5, 2026"), expected);
        assert_eq!(resolve_date("Thursday, March 5, 2026"), expected);
        assert_eq!(resolve_date("2026-03-05"), expected);
        assert_eq!(resolve_date("03/05/2026"), expected);
        assert_eq!(resolve_date("Dates vary between March 5, 2026 - March 8, 2026"), expected);
        assert_eq!(resolve_date("Mar 5, 2026 - Mar 8, 2026"), expected);
        assert_eq!(resolve_date("Unknown Date"), None);
    }

    #[test]
    fn test_from_record_pins_during_window() {
        let record = windowed("Concert", "March 5, 2026", "07:00 PM - 10:00 PM", 5, 7);
        let event = ScheduledEvent::from_record(&record);
        assert!(!event.is_tba);
        assert_eq!(event.start, Some(at(date(2026, 3, 5), 19, 0)));
        assert_eq!(event.end, Some(at(date(2026, 3, 5), 22, 0)));
        assert_eq!(event.max_impact, 7);
    }

    #[test]
    fn test_from_record_rolls_end_past_midnight() {
        let record = windowed("Late Show", "March 5, 2026", "10:00 PM - 12:30 AM", 8, 10);
        let event = ScheduledEvent::from_record(&record);
        assert_eq!(event.end, Some(at(date(2026, 3, 6), 0, 30)));
    }

    #[test]
    fn test_from_record_tba_carries_static_impact() {
        let record = EventRecord {
            impact_timeline: ImpactTimeline::time_tba(4),
            ..windowed("Fall Expo", "October 18, 2026", "", 0, 0)
        };
        let event = ScheduledEvent::from_record(&record);
        assert!(event.is_tba);
        assert_eq!(event.max_impact, 4);
        assert_eq!(event.day, Some(date(2026, 10, 18)));
    }

    #[test]
    fn test_unknown_date_degrades_to_tba() {
        let record = windowed("Concert", "Unknown Date", "07:00 PM - 10:00 PM", 5, 7);
        let event = ScheduledEvent::from_record(&record);
        assert!(event.is_tba);
        assert_eq!(event.max_impact, 7);
    }

    #[test]
    fn test_live_score_phases() {
        let day = date(2026, 3, 5);
        let event = ScheduledEvent::from_record(&windowed("Concert", "March 5, 2026", "07:00 PM - 10:00 PM", 8, 10));

        assert_eq!(live_score(at(day, 17, 0), &event), 0.0, "before arrival window");
        assert_eq!(live_score(at(day, 17, 30), &event), 0.5, "arrival floor at window start");
        let mid_arrival = live_score(at(day, 18, 15), &event);
        assert!((mid_arrival - 10.0 * 0.125).abs() < 1e-9, "got {}", mid_arrival);
        assert_eq!(live_score(at(day, 19, 0), &event), 0.0, "event in progress");
        assert_eq!(live_score(at(day, 22, 0), &event), 0.0, "end instant is still during");
        let just_after = live_score(at(day, 22, 0) + Duration::seconds(1), &event);
        assert!(just_after > 9.9, "departure starts near max, got {}", just_after);
        let mid_departure = live_score(at(day, 22, 30), &event);
        assert!((mid_departure - 10.0 * 0.0625).abs() < 1e-9, "got {}", mid_departure);
        assert_eq!(live_score(at(day, 23, 30), &event), 0.0, "after departure window");
    }

    #[test]
    fn test_traffic_levels() {
        assert_eq!(TrafficLevel::from_score(9.0), TrafficLevel::High);
        assert_eq!(TrafficLevel::from_score(7.5), TrafficLevel::High);
        assert_eq!(TrafficLevel::from_score(4.0), TrafficLevel::Medium);
        assert_eq!(TrafficLevel::from_score(3.9), TrafficLevel::Low);
    }

    #[test]
    fn test_hotel_events_scale_with_car_count() {
        let traffic = HotelDay { arrivals: 42, departures: 150 };
        let events = hotel_events(date(2026, 3, 5), &traffic, "Trilogy Hotel");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Hotel Check-outs (150 cars)");
        assert_eq!(events[0].max_impact, 10);
        assert_eq!(events[1].title, "Hotel Check-ins (42 cars)");
        assert_eq!(events[1].max_impact, 5);
        assert_eq!(events[1].end, Some(at(date(2026, 3, 5), 20, 30)));
    }

    #[test]
    fn test_hotel_events_skip_zero_counts() {
        let traffic = HotelDay { arrivals: 0, departures: 0 };
        assert!(hotel_events(date(2026, 3, 5), &traffic, "Trilogy Hotel").is_empty());
    }

    #[test]
    fn test_day_board_orders_by_impact_then_start() {
        let day = date(2026, 3, 5);
        let records = vec![
            windowed("Evening Show", "March 5, 2026", "08:00 PM - 10:00 PM", 5, 7),
            windowed("Matinee", "March 5, 2026", "02:00 PM - 04:00 PM", 5, 7),
            windowed("Parade", "March 5, 2026", "05:00 PM - 07:00 PM", 8, 10),
            windowed("Tomorrow", "March 6, 2026", "05:00 PM - 07:00 PM", 8, 10),
            EventRecord {
                impact_timeline: ImpactTimeline::time_tba(7),
                ..windowed("Pending", "March 5, 2026", "", 0, 0)
            },
        ];
        let board = day_board(&records, day, None, "Trilogy Hotel", at(day, 9, 0));
        let titles: Vec<&str> = board.iter().map(|e| e.event.title.as_str()).collect();
        assert_eq!(titles, vec!["Parade", "Matinee", "Evening Show"]);
        assert!(board.iter().all(|e| e.live_score == 0.0));
        assert_eq!(peak_live_score(&board), 1.0);
    }

    #[test]
    fn test_day_board_leaves_out_tba_events() {
        let day = date(2026, 3, 5);
        let record = EventRecord {
            impact_timeline: ImpactTimeline::time_tba(10),
            ..windowed("Pending", "March 5, 2026", "", 0, 0)
        };
        assert_eq!(ScheduledEvent::from_record(&record).day, Some(day));
        assert!(day_board(&[record], day, None, "Trilogy Hotel", at(day, 9, 0)).is_empty());
    }

    #[test]
    fn test_day_board_includes_hotel_blocks() {
        let day = date(2026, 3, 5);
        let traffic = HotelDay { arrivals: 0, departures: 35 };
        let board = day_board(&[], day, Some(&traffic), "Trilogy Hotel", at(day, 13, 30));
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].event.venue, "Trilogy Hotel");
        assert!(board[0].live_score > 0.0);
    }
}
