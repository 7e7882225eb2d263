/// Start-time extraction from free-text listing fields.
///
/// Listing sites put anything in their time slot: "7:30 PM", "Doors 6:30pm",
/// "Time TBA", "All Day", or nothing. A missing time is an expected state,
/// so `parse_time` returns `None` instead of an error and never panics.

use regex::Regex;
use std::sync::LazyLock;

use crate::model::{Meridiem, ParsedTime};

static CLOCK_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,2}):(\d{2})\s*(AM|PM)").expect("clock time pattern is valid")
});

/// Returns the first `H:MM AM/PM` time found in `text`.
///
/// Anything containing "TBA" (any case) is treated as unknown even when a
/// time is also present. Hours and minutes are not range-checked.
pub fn parse_time(text: Option<&str>) -> Option<ParsedTime> {
    let text = text?;
    if text.trim().is_empty() || text.to_uppercase().contains("TBA") {
        return None;
    }

    let caps = CLOCK_TIME.captures(text)?;
    let hour = caps[1].parse().ok()?;
    let minute = caps[2].parse().ok()?;
    let meridiem = match caps[3].to_uppercase().as_str() {
        "AM" => Meridiem::Am,
        _ => Meridiem::Pm,
    };

    Some(ParsedTime { hour, minute, meridiem })
}
