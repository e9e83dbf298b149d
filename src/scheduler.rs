//! Poll scheduler and cycle driver
//!
//! One cycle is fetch → reduce → evaluate → alert → render. Cycles never
//! overlap, and the next one starts `poll_interval` after the previous one
//! *finished*, so a slow fetch delays the schedule instead of compressing it.
//!
//! Every cycle ends in a [`CycleOutcome`]. Failures are logged to the sink and
//! the loop keeps going; nothing here terminates the process.

use {
    crate::{
        airports,
        alert::AlertDispatcher,
        error::{EmptyObservationError, ScrapeError},
        fares::{CycleReport, FareEngine, PricePoint},
        query::{format_interval, TripQuery},
        sink::PresentationSink,
        source::FareSource,
    },
    std::{sync::Arc, time::Duration},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Between cycles
    Idle,
    /// A cycle is in flight
    Running,
}

/// Tagged result of one cycle
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Valid reading; alerts dispatched and history advanced
    Completed(CycleReport),
    /// Reading rejected by the validity check; history unchanged
    Invalid(CycleReport),
    ScrapeFailed(ScrapeError),
    EmptyObservation(EmptyObservationError),
}

impl CycleOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CycleOutcome::Completed(_))
    }
}

pub struct Scheduler {
    query: Arc<TripQuery>,
    engine: FareEngine,
    source: Arc<dyn FareSource>,
    dispatcher: Arc<dyn AlertDispatcher>,
    sink: Arc<dyn PresentationSink>,
    interval: Duration,
    fetch_timeout: Option<Duration>,
    state: SchedulerState,
    cycles: u64,
}

impl Scheduler {
    pub fn new(
        query: Arc<TripQuery>,
        source: Arc<dyn FareSource>,
        dispatcher: Arc<dyn AlertDispatcher>,
        sink: Arc<dyn PresentationSink>,
    ) -> Self {
        let engine = FareEngine::new(query.thresholds());
        let interval = query.poll_interval();
        Self {
            query,
            engine,
            source,
            dispatcher,
            sink,
            interval,
            fetch_timeout: None,
            state: SchedulerState::Idle,
            cycles: 0,
        }
    }

    /// Bound each fetch; `None` waits indefinitely
    pub fn with_fetch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_engine(mut self, engine: FareEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn engine(&self) -> &FareEngine {
        &self.engine
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Push the static settings panel and map markers to the sink
    pub async fn announce(&self) {
        self.sink.settings(self.query.settings_lines()).await;
        for marker in airports::trip_waypoints(&self.query.origin, &self.query.destination) {
            self.sink.waypoint(marker).await;
        }
    }

    /// Run cycles forever, cooling down `interval` after each one completes
    pub async fn run(&mut self) {
        log::info!(
            "⏰ Starting fare poller {} → {} (interval: {})",
            self.query.origin,
            self.query.destination,
            format_interval(self.interval)
        );

        loop {
            let outcome = self.run_cycle().await;
            log::debug!(
                "Cycle {} finished ({}), next check in {}",
                self.cycles,
                if outcome.is_success() { "ok" } else { "skipped" },
                format_interval(self.interval)
            );
            tokio::time::sleep(self.interval).await;
        }
    }

    /// One fetch → evaluate → publish pass
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        self.state = SchedulerState::Running;
        self.cycles += 1;
        log::info!("🔎 Checking fares (cycle {})", self.cycles);

        let outcome = match self.fetch().await {
            Err(e) => {
                log::warn!("⚠️  {}", e);
                self.sink
                    .log(vec![format!("Fare check failed, will retry next interval: {}", e)])
                    .await;
                CycleOutcome::ScrapeFailed(e)
            }
            Ok(observation) => match self.engine.process(&observation) {
                Err(e) => {
                    log::warn!("⚠️  {}", e);
                    self.sink
                        .log(vec![format!("Fare check skipped: {}", e)])
                        .await;
                    CycleOutcome::EmptyObservation(e)
                }
                Ok(report) if !report.evaluation.is_valid() => {
                    self.sink
                        .log(vec![format!(
                            "Fare reading looks invalid (outbound ${}, return ${}); keeping previous prices",
                            report.summary.lowest_outbound, report.summary.lowest_return
                        )])
                        .await;
                    CycleOutcome::Invalid(report)
                }
                Ok(report) => {
                    self.publish(&report).await;
                    CycleOutcome::Completed(report)
                }
            },
        };

        self.state = SchedulerState::Idle;
        outcome
    }

    async fn fetch(&self) -> Result<crate::fares::FareObservation, ScrapeError> {
        let fetch = self.source.fetch_fares(&self.query);
        match self.fetch_timeout {
            None => fetch.await,
            Some(limit) => match tokio::time::timeout(limit, fetch).await {
                Ok(result) => result,
                Err(_) => Err(ScrapeError::Navigation(Some(format!(
                    "no response within {}",
                    format_interval(limit)
                )))),
            },
        }
    }

    async fn publish(&self, report: &CycleReport) {
        for alert in &report.evaluation.alerts {
            let message = alert.message();
            log::info!("🎉 {}", message);
            self.sink.log(vec![message.clone()]).await;

            let delivery = self.dispatcher.dispatch(&message).await;
            if let Some(line) = delivery.log_line() {
                self.sink.log(vec![line]).await;
            }
        }

        self.sink.log(report.fare_lines()).await;
        self.sink.plot(PricePoint::from(&report.summary)).await;
    }
}
