/// valetops_service: event-driven valet traffic forecasting for a downtown hotel.
///
/// # Module structure
///
/// ```text
/// valetops_service
/// ├── model       - shared data types (RawEventRecord, EventRecord, ImpactTimeline, ValetError, ...)
/// ├── rules       - versioned impact rule table (impact_rules.toml)
/// ├── config      - service configuration loader (valetops.toml)
/// ├── pipeline    - one collection run: collect, assess, aggregate, correlate, write
/// ├── sink        - events.json / weather.json snapshot writers
/// ├── endpoint    - HTTP API over the written snapshots
/// ├── ingest
/// │   ├── collector - listing collectors (scraper JSON dumps)
/// │   ├── nws       - api.weather.gov forecast client + parsing
/// │   ├── hotel     - projected hotel arrivals/departures per day
/// │   └── fixtures (test only) - representative listing and forecast payloads
/// └── analysis
///     ├── time_parse   - start-time extraction from free text
///     ├── classifier   - keyword severity and duration rules
///     ├── timeline     - arrival/during/departure windows
///     ├── aggregate    - cross-source merge with exact-duplicate removal
///     ├── weather      - per-day forecast correlation
///     └── live_traffic - live lane scores and the day board
/// ```

pub mod analysis;
pub mod config;
pub mod endpoint;
pub mod ingest;
pub mod model;
pub mod pipeline;
pub mod rules;
pub mod sink;
