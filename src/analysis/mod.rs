/// Event impact analysis.
///
/// Submodules:
/// - `time_parse` - pulls a clock time out of listing text.
/// - `classifier` - maps title/venue keywords to severity and duration.
/// - `timeline` - turns a profile and start time into rush windows.
/// - `aggregate` - merges collector batches, dropping exact duplicates.
/// - `weather` - folds forecast periods into one entry per day.
/// - `live_traffic` - scores lane impact at a given moment.

pub mod aggregate;
pub mod classifier;
pub mod live_traffic;
pub mod time_parse;
pub mod timeline;
pub mod weather;
