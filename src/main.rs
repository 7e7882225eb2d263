//! Valet Operations Service - Collection Run
//!
//! Runs one collection pass and exits:
//! 1. Loads listing dumps from every configured collector (in parallel)
//! 2. Classifies each event and builds its arrival/during/departure timeline
//! 3. Merges sources, dropping exact duplicates
//! 4. Fetches the NWS forecast and folds it into one entry per day
//! 5. Writes events.json and weather.json
//!
//! With `--endpoint PORT` (or `[endpoint] port` in the config) it then keeps
//! serving the snapshots and the live day board over HTTP.
//!
//! Usage:
//!   cargo run --release                          # One run with ./valetops.toml
//!   cargo run --release -- --config other.toml   # Alternate configuration
//!   cargo run --release -- --endpoint 8080       # Run, then serve on port 8080
//!
//! Environment:
//!   VALETOPS_CONFIG - configuration path (overridden by --config)
//!   RUST_LOG        - log filter (default: info)

use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use valetops_service::config::{self, ServiceConfig};
use valetops_service::endpoint::{self, SnapshotPaths};
use valetops_service::pipeline::{Pipeline, RunSummary};
use valetops_service::sink::JsonFileSink;

fn print_usage(program: &str) {
    eprintln!("Usage: {} [--config PATH] [--endpoint PORT]", program);
}

fn build_pipeline(config: &ServiceConfig) -> Result<Pipeline, Box<dyn std::error::Error>> {
    let rules = config.load_rules()?;
    let forecast = config.build_forecast_source()?;
    let sink = JsonFileSink::new(&config.output.events_path, &config.output.weather_path);

    Ok(Pipeline::new(rules, config.build_collectors(), forecast, Box::new(sink))
        .with_workers(config.pipeline.workers))
}

fn print_summary(summary: &RunSummary) {
    println!("📋 Collectors:");
    for report in &summary.collectors {
        match &report.error {
            None => println!("   ✓ {} - {} listings", report.name, report.records),
            Some(e) => println!("   ✗ {} - {}", report.name, e),
        }
    }
    println!();
    println!("✓ Wrote {} events ({} duplicates dropped)", summary.events_written, summary.duplicates_dropped);
    match &summary.forecast_error {
        None => println!("✓ Wrote forecast for {} days", summary.forecast_days),
        Some(e) => println!("✗ Forecast unavailable: {}", e),
    }
    println!("   Rules version: {}\n", summary.rules_version);
}

fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("🚗 Valet Operations Service");
    println!("============================\n");

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<PathBuf> = None;
    let mut endpoint_port: Option<u16> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                } else {
                    eprintln!("Error: --config requires a path");
                    std::process::exit(1);
                }
            }
            "--endpoint" => {
                if i + 1 < args.len() {
                    match args[i + 1].parse() {
                        Ok(port) => endpoint_port = Some(port),
                        Err(_) => {
                            eprintln!("Error: invalid port '{}'", args[i + 1]);
                            std::process::exit(1);
                        }
                    }
                    i += 2;
                } else {
                    eprintln!("Error: --endpoint requires a port number");
                    std::process::exit(1);
                }
            }
            "--help" | "-h" => {
                print_usage(&args[0]);
                return;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage(&args[0]);
                std::process::exit(1);
            }
        }
    }

    let config_path = config_path.unwrap_or_else(config::config_path);
    println!("📊 Loading configuration from {}...", config_path.display());
    let config = match config::load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Configuration error: {}\n", e);
            std::process::exit(1);
        }
    };
    println!("✓ {} collectors configured\n", config.collectors.len());

    let pipeline = match build_pipeline(&config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("\n❌ Startup failed: {}\n", e);
            std::process::exit(1);
        }
    };

    println!("🔄 Running collection (rules {})...\n", pipeline.rules().version);
    match pipeline.run() {
        Ok(summary) => print_summary(&summary),
        Err(e) => {
            eprintln!("\n❌ Run failed: {}", e);
            std::process::exit(1);
        }
    }

    // Serve snapshots if requested
    if let Some(port) = endpoint_port.or(config.endpoint.port) {
        println!("🚀 Starting HTTP endpoint server...");
        println!("   Endpoint running on http://0.0.0.0:{}\n", port);

        let paths = SnapshotPaths {
            events_path: config.output.events_path.clone(),
            weather_path: config.output.weather_path.clone(),
            hotel_traffic_path: config.hotel.traffic_path.clone(),
            hotel_name: config.hotel.name.clone(),
        };
        if let Err(e) = endpoint::start_endpoint_server(port, paths) {
            eprintln!("❌ Endpoint server error: {}", e);
            std::process::exit(1);
        }
    }
}
