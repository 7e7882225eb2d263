/// Arrival / during / departure window construction.
///
/// Times are naive clock values with no calendar date attached: a late
/// show whose departure rush crosses midnight simply wraps to "12:30 AM".
///
/// `assess` is the per-record entry point used by the pipeline: it parses
/// the advertised start, classifies the event, and builds the timeline.

use chrono::{Duration, NaiveTime};

use crate::analysis::classifier::classify;
use crate::analysis::time_parse::parse_time;
use crate::model::{
    EventRecord, ImpactProfile, ImpactTimeline, ImpactWindow, ParsedTime, RawEventRecord, TIME_TBA,
};
use crate::rules::{ImpactRules, MAX_RULE_HOURS};

const WINDOW_TIME_FORMAT: &str = "%I:%M %p";

/// Clamped to the rule table's bounds; NaN becomes zero.
fn hours(h: f64) -> Duration {
    let h = if h.is_nan() { 0.0 } else { h.clamp(0.0, MAX_RULE_HOURS) };
    Duration::seconds((h * 3600.0).round() as i64)
}

fn to_clock(time: ParsedTime) -> NaiveTime {
    let (clock, _) = NaiveTime::MIN
        .overflowing_add_signed(Duration::minutes(i64::from(time.minutes_from_midnight())));
    clock
}

fn shift(time: NaiveTime, by: Duration) -> NaiveTime {
    time.overflowing_add_signed(by).0
}

fn window(from: NaiveTime, to: NaiveTime, impact: u8) -> ImpactWindow {
    ImpactWindow {
        window: format!(
            "{} - {}",
            from.format(WINDOW_TIME_FORMAT),
            to.format(WINDOW_TIME_FORMAT)
        ),
        impact,
    }
}

/// Severity scaled by a window factor, truncated toward zero.
fn scaled(base: u8, factor: f64) -> u8 {
    (f64::from(base) * factor).floor() as u8
}

/// Build the three-window timeline, or the TBA error form when there is no
/// start time.
pub fn build_timeline(
    rules: &ImpactRules,
    profile: &ImpactProfile,
    start: Option<ParsedTime>,
) -> ImpactTimeline {
    let Some(start) = start else {
        return ImpactTimeline::time_tba(profile.base_severity);
    };

    let start = to_clock(start);
    let arrival_start = shift(start, -hours(rules.windows.arrival_lead_hours));
    let event_end = shift(start, hours(profile.duration_hours));
    let departure_end = shift(event_end, hours(rules.windows.departure_tail_hours));

    let base = profile.base_severity;
    ImpactTimeline::Windowed {
        arrival_rush: window(arrival_start, start, scaled(base, rules.factors.arrival)),
        during_event: window(start, event_end, scaled(base, rules.factors.during).max(1)),
        departure_rush: window(event_end, departure_end, base),
    }
}

/// Turn one collector record into an output record.
pub fn assess(rules: &ImpactRules, raw: RawEventRecord) -> EventRecord {
    let profile = classify(rules, &raw.title, &raw.venue);
    let start = parse_time(raw.raw_start_time.as_deref());
    let impact_timeline = build_timeline(rules, &profile, start);

    EventRecord {
        title: raw.title,
        date: raw.date,
        time: raw.raw_start_time.unwrap_or_else(|| TIME_TBA.to_string()),
        venue: raw.venue,
        impact_timeline,
        source: raw.source,
    }
}
