/// One collection run, from collector output to written snapshots.
///
/// This module wires the injected pieces together:
/// 1. Runs every collector on a thread pool
/// 2. Reassembles their output in collector order
/// 3. Assesses each record (time parse, classify, build timeline)
/// 4. Merges and deduplicates across collectors
/// 5. Correlates the forecast into a per-day table
/// 6. Writes both snapshots through the sink
///
/// A collector that fails (or panics) contributes no records and is
/// reported in the summary; the run carries on with the rest. The same
/// holds for the forecast source.

use serde::Serialize;
use std::sync::Arc;
use std::sync::mpsc;
use threadpool::ThreadPool;
use tracing::{info, warn};

use crate::analysis::aggregate::aggregate;
use crate::analysis::timeline::assess;
use crate::analysis::weather::correlate;
use crate::ingest::collector::Collector;
use crate::ingest::nws::ForecastSource;
use crate::model::{EventRecord, RawEventRecord, ValetError};
use crate::rules::ImpactRules;
use crate::sink::EventSink;

// ---------------------------------------------------------------------------
// Run Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectorReport {
    pub name: String,
    pub records: usize,
    /// Set when the collector failed and contributed nothing
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub rules_version: String,
    pub collectors: Vec<CollectorReport>,
    pub events_written: usize,
    pub duplicates_dropped: usize,
    pub forecast_days: usize,
    pub forecast_error: Option<String>,
}

impl RunSummary {
    pub fn failed_collectors(&self) -> usize {
        self.collectors.iter().filter(|c| c.error.is_some()).count()
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

pub struct Pipeline {
    rules: ImpactRules,
    collectors: Vec<Arc<dyn Collector>>,
    forecast: Box<dyn ForecastSource>,
    sink: Box<dyn EventSink>,
    workers: usize,
}

impl Pipeline {
    pub fn new(
        rules: ImpactRules,
        collectors: Vec<Arc<dyn Collector>>,
        forecast: Box<dyn ForecastSource>,
        sink: Box<dyn EventSink>,
    ) -> Self {
        Self {
            rules,
            collectors,
            forecast,
            sink,
            workers: 4,
        }
    }

    /// Thread pool size for collector runs (at least 1)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn rules(&self) -> &ImpactRules {
        &self.rules
    }

    /// Run every collector, returning outcomes in collector order.
    pub fn collect_all(&self) -> Vec<(String, Result<Vec<RawEventRecord>, ValetError>)> {
        let count = self.collectors.len();
        if count == 0 {
            return Vec::new();
        }

        let pool = ThreadPool::new(self.workers.min(count));
        let (tx, rx) = mpsc::channel();

        for (index, collector) in self.collectors.iter().enumerate() {
            let tx = tx.clone();
            let collector = Arc::clone(collector);
            pool.execute(move || {
                let result = collector.collect();
                let _ = tx.send((index, result));
            });
        }
        drop(tx);

        let mut slots: Vec<Option<Result<Vec<RawEventRecord>, ValetError>>> =
            (0..count).map(|_| None).collect();
        for (index, result) in rx {
            slots[index] = Some(result);
        }

        self.collectors
            .iter()
            .zip(slots)
            .map(|(collector, slot)| {
                let name = collector.name().to_string();
                let result = slot.unwrap_or_else(|| {
                    Err(ValetError::Collector {
                        name: name.clone(),
                        message: "collector panicked".to_string(),
                    })
                });
                (name, result)
            })
            .collect()
    }

    /// Collect and assess without writing anything.
    pub fn assemble(&self) -> (Vec<EventRecord>, Vec<CollectorReport>, usize) {
        let mut reports = Vec::new();
        let mut batches = Vec::new();

        for (name, result) in self.collect_all() {
            match result {
                Ok(raw) => {
                    info!(collector = %name, records = raw.len(), "collector finished");
                    reports.push(CollectorReport { name, records: raw.len(), error: None });
                    batches.push(raw.into_iter().map(|r| assess(&self.rules, r)).collect::<Vec<_>>());
                }
                Err(e) => {
                    warn!(collector = %name, error = %e, "collector failed; continuing without it");
                    reports.push(CollectorReport { name, records: 0, error: Some(e.to_string()) });
                }
            }
        }

        let total: usize = batches.iter().map(Vec::len).sum();
        let events = aggregate(batches);
        let dropped = total - events.len();
        (events, reports, dropped)
    }

    /// Full run: collect, assess, aggregate, correlate, write.
    pub fn run(&self) -> Result<RunSummary, ValetError> {
        info!(
            rules_version = %self.rules.version,
            collectors = self.collectors.len(),
            "starting collection run"
        );

        let (events, collectors, duplicates_dropped) = self.assemble();
        self.sink.write_events(&events)?;

        let (forecast, forecast_error) = match self.forecast.periods() {
            Ok(periods) => (correlate(&periods), None),
            Err(e) => {
                warn!(error = %e, "forecast unavailable; writing empty weather table");
                (Default::default(), Some(e.to_string()))
            }
        };
        self.sink.write_forecast(&forecast)?;

        Ok(RunSummary {
            rules_version: self.rules.version.clone(),
            collectors,
            events_written: events.len(),
            duplicates_dropped,
            forecast_days: forecast.len(),
            forecast_error,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
