/// Forecast periods folded into one rain/storm flag set per calendar day.
///
/// Forecast feeds split each day into day and night periods. The first
/// period seen for a date seeds its `condition`; later periods for the same
/// date can only raise the rain and storm flags.

use chrono::{DateTime, NaiveDate};
use std::collections::btree_map::Entry;
use tracing::warn;

use crate::model::{DailyForecast, ForecastPeriod, ForecastTable};

const RAIN_KEYWORDS: [&str; 4] = ["rain", "shower", "drizzle", "precip"];
const STORM_KEYWORDS: [&str; 3] = ["thunder", "storm", "t-storm"];

/// Rain and storm flags for one condition description.
pub fn condition_flags(condition: &str) -> (bool, bool) {
    let lower = condition.to_lowercase();
    let is_storming = STORM_KEYWORDS.iter().any(|kw| lower.contains(kw));
    let is_raining = is_storming || RAIN_KEYWORDS.iter().any(|kw| lower.contains(kw));
    (is_raining, is_storming)
}

/// Calendar date of a period start, in the timestamp's own offset.
fn period_date(start_time: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(start_time)
        .ok()
        .map(|dt| dt.date_naive())
}

pub fn correlate<'a, I>(periods: I) -> ForecastTable
where
    I: IntoIterator<Item = &'a ForecastPeriod>,
{
    let mut days = ForecastTable::new();

    for period in periods {
        let Some(date) = period_date(&period.start_time) else {
            warn!(start_time = %period.start_time, "skipping forecast period with unparseable start time");
            continue;
        };
        let (is_raining, is_storming) = condition_flags(&period.short_forecast);

        match days.entry(date) {
            Entry::Vacant(slot) => {
                slot.insert(DailyForecast {
                    condition: period.short_forecast.clone(),
                    is_raining,
                    is_storming,
                });
            }
            Entry::Occupied(mut slot) => {
                let day = slot.get_mut();
                day.is_raining |= is_raining;
                day.is_storming |= is_storming;
            }
        }
    }

    days
}
