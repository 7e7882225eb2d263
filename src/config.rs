/// Service configuration loader - parses valetops.toml
///
/// Keeps collector inputs, output paths, the rule table location and the
/// weather source out of code, so adding a listing source or switching to
/// a saved forecast is a config edit.
///
/// # File Location
/// `valetops.toml` in the current working directory, unless the
/// `VALETOPS_CONFIG` environment variable (or `--config`) points elsewhere.
/// Relative paths inside the file are resolved against the working directory.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::ingest::collector::{Collector, JsonFileCollector};
use crate::ingest::nws::{ForecastFile, ForecastSource, NoForecast, NwsForecastClient};
use crate::model::{Source, ValetError};
use crate::rules::ImpactRules;

pub const DEFAULT_CONFIG_PATH: &str = "valetops.toml";
pub const CONFIG_ENV_VAR: &str = "VALETOPS_CONFIG";

/// Root configuration structure for TOML parsing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub pipeline: PipelineSettings,
    #[serde(default, rename = "collector")]
    pub collectors: Vec<CollectorConfig>,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub hotel: HotelConfig,
    #[serde(default)]
    pub endpoint: EndpointConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_events_path")]
    pub events_path: PathBuf,
    #[serde(default = "default_weather_path")]
    pub weather_path: PathBuf,
}

/// Rule table location; built-in defaults are used when `path` is unset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulesConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    /// Thread pool size for collector runs
    #[serde(default = "default_workers")]
    pub workers: usize,
}

/// One listing source. Order in the file is collector priority: when two
/// sources emit identical records, the earlier collector's copy is kept.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectorConfig {
    pub name: String,
    pub path: PathBuf,
    pub source: String,
    /// Venue for listings the scraper found none for
    pub default_venue: Option<String>,
    /// Keep only listings whose title or venue contains one of these
    #[serde(default)]
    pub keep_any: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    /// api.weather.gov gridpoint forecast URL
    pub forecast_url: Option<String>,
    /// Saved NWS forecast response, used instead of the URL when set
    pub forecast_file: Option<PathBuf>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HotelConfig {
    #[serde(default = "default_hotel_name")]
    pub name: String,
    #[serde(default = "default_hotel_traffic_path")]
    pub traffic_path: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EndpointConfig {
    pub port: Option<u16>,
}

fn default_events_path() -> PathBuf {
    PathBuf::from("events.json")
}

fn default_weather_path() -> PathBuf {
    PathBuf::from("weather.json")
}

fn default_workers() -> usize {
    4
}

fn default_user_agent() -> String {
    "valetops_service/0.1 (valet-ops@example.com)".to_string()
}

fn default_hotel_name() -> String {
    "Trilogy Hotel".to_string()
}

fn default_hotel_traffic_path() -> PathBuf {
    PathBuf::from("hotel_traffic.json")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            events_path: default_events_path(),
            weather_path: default_weather_path(),
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self { workers: default_workers() }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            forecast_url: None,
            forecast_file: None,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for HotelConfig {
    fn default() -> Self {
        Self {
            name: default_hotel_name(),
            traffic_path: default_hotel_traffic_path(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Config path from `VALETOPS_CONFIG`, falling back to `valetops.toml`.
pub fn config_path() -> PathBuf {
    std::env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

pub fn parse_config(content: &str) -> Result<ServiceConfig, ValetError> {
    let config: ServiceConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ServiceConfig, ValetError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| ValetError::Config(format!("failed to read {}: {}", path.display(), e)))?;
    parse_config(&content)
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<(), ValetError> {
        if self.pipeline.workers == 0 {
            return Err(ValetError::Config("pipeline.workers must be at least 1".to_string()));
        }

        let mut names = HashSet::new();
        for collector in &self.collectors {
            if collector.name.trim().is_empty() {
                return Err(ValetError::Config("collector name must not be empty".to_string()));
            }
            if !names.insert(collector.name.as_str()) {
                return Err(ValetError::Config(format!("duplicate collector name '{}'", collector.name)));
            }
        }

        Ok(())
    }

    /// Rule table from `rules.path`, or the built-in defaults.
    pub fn load_rules(&self) -> Result<ImpactRules, ValetError> {
        match &self.rules.path {
            Some(path) => ImpactRules::load(path),
            None => Ok(ImpactRules::default()),
        }
    }

    /// Collectors in file order.
    pub fn build_collectors(&self) -> Vec<Arc<dyn Collector>> {
        self.collectors
            .iter()
            .map(|c| {
                let mut collector = JsonFileCollector::new(&c.name, &c.path, Source::from(c.source.clone()))
                    .with_keep_any(c.keep_any.clone());
                if let Some(venue) = &c.default_venue {
                    collector = collector.with_default_venue(venue);
                }
                Arc::new(collector) as Arc<dyn Collector>
            })
            .collect()
    }

    /// Saved forecast file, live NWS client, or nothing, in that preference.
    pub fn build_forecast_source(&self) -> Result<Box<dyn ForecastSource>, ValetError> {
        if let Some(path) = &self.weather.forecast_file {
            return Ok(Box::new(ForecastFile::new(path)));
        }
        match &self.weather.forecast_url {
            Some(url) => Ok(Box::new(NwsForecastClient::new(url.clone(), &self.weather.user_agent)?)),
            None => Ok(Box::new(NoForecast)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [output]
        events_path = "public/events.json"

        [pipeline]
        workers = 2

        [[collector]]
        name = "vbc"
        path = "scraped/vbc.json"
        source = "VBC"
        default_venue = "Von Braun Center"

        [[collector]]
        name = "huntsville"
        path = "scraped/huntsville.json"
        source = "Huntsville.org"

        [weather]
        forecast_file = "scraped/forecast.json"

        [endpoint]
        port = 8080
    "#;

    #[test]
    fn test_parse_sample_config() {
        let config = parse_config(SAMPLE).expect("sample should parse");
        assert_eq!(config.output.events_path, PathBuf::from("public/events.json"));
        assert_eq!(config.output.weather_path, PathBuf::from("weather.json"));
        assert_eq!(config.pipeline.workers, 2);
        assert_eq!(config.collectors.len(), 2);
        assert_eq!(config.collectors[1].source, "Huntsville.org");
        assert_eq!(config.collectors[0].default_venue.as_deref(), Some("Von Braun Center"));
        assert!(config.collectors[1].keep_any.is_empty());
        assert_eq!(config.endpoint.port, Some(8080));
        assert_eq!(config.hotel.name, "Trilogy Hotel");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert!(config.collectors.is_empty());
        assert_eq!(config.pipeline.workers, 4);
        assert!(config.rules.path.is_none());
        assert_eq!(config.load_rules().unwrap(), ImpactRules::default());
    }

    #[test]
    fn test_collectors_built_in_file_order() {
        let config = parse_config(SAMPLE).unwrap();
        let names: Vec<String> = config.build_collectors().iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["vbc", "huntsville"]);
    }

    #[test]
    fn test_duplicate_collector_names_rejected() {
        let dup = SAMPLE.replace("name = \"huntsville\"", "name = \"vbc\"");
        let err = parse_config(&dup).unwrap_err();
        assert!(err.to_string().contains("duplicate collector name"), "got: {}", err);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let bad = SAMPLE.replace("workers = 2", "workers = 0");
        assert!(matches!(parse_config(&bad), Err(ValetError::Config(_))));
    }

    #[test]
    fn test_shipped_config_parses() {
        let config = load_config(DEFAULT_CONFIG_PATH).expect("valetops.toml should parse");
        assert!(!config.collectors.is_empty());
        assert!(config.load_rules().is_ok());
    }
}
