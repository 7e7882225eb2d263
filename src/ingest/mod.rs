/// Input adapters.
///
/// Listing scrapers live outside this crate and hand over JSON dumps; the
/// forecast comes from the NWS API (or a saved copy of its response).
///
/// - `collector` - `Collector` trait, JSON-dump and in-memory collectors
/// - `nws`       - NWS gridpoint forecast client + parser
/// - `hotel`     - per-date hotel arrivals/departures file
/// - `fixtures` (test only) - representative payloads

pub mod collector;
pub mod hotel;
pub mod nws;

#[cfg(test)]
pub(crate) mod fixtures;
