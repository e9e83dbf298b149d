//! Integration tests for the poll scheduler
//!
//! A scripted fare source, a recording sink and a recording dispatcher stand
//! in for the website, the dashboard and Twilio.
//!
//! Key behaviours tested:
//! - Scrape failures are logged and the next cycle recovers
//! - Alerts are logged, dispatched, then followed by the fare lines
//! - Empty observations skip the cycle without touching history
//! - Cycle spacing is measured from the end of the previous cycle
//! - The optional fetch timeout turns a hung fetch into a scrape failure

#[cfg(test)]
mod scheduler_tests {
    use {
        async_trait::async_trait,
        chrono::{Local, NaiveDate, TimeZone},
        farewatch::{
            alert::{AlertDispatcher, DeliveryResult},
            error::{DeliveryError, ScrapeError},
            fares::{FareEngine, FareObservation, PricePoint},
            query::{AlertThresholds, TimeOfDay, TripQuery},
            scheduler::{CycleOutcome, Scheduler, SchedulerState},
            sink::{MarkerColor, PresentationSink, Waypoint},
            source::FareSource,
        },
        std::{
            collections::VecDeque,
            sync::{Arc, Mutex},
            time::Duration,
        },
        tokio::time::Instant,
    };

    fn trip(one_way: Option<u32>, roundtrip: Option<u32>, interval_minutes: f64) -> Arc<TripQuery> {
        Arc::new(TripQuery {
            origin: "MDW".to_string(),
            destination: "DEN".to_string(),
            departure_date: NaiveDate::from_ymd_opt(2026, 11, 20).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2026, 11, 27).unwrap(),
            passengers: 1,
            departure_time_of_day: TimeOfDay::AllDay,
            return_time_of_day: TimeOfDay::AllDay,
            deal_price_threshold: one_way,
            deal_price_threshold_roundtrip: roundtrip,
            poll_interval_minutes: interval_minutes,
            sms: None,
        })
    }

    /// Replays scripted results, then keeps returning 100 / 80
    struct ScriptedSource {
        script: Mutex<VecDeque<Result<FareObservation, ScrapeError>>>,
        delay: Duration,
        starts: Mutex<Vec<Instant>>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<FareObservation, ScrapeError>>) -> Self {
            Self::with_delay(script, Duration::ZERO)
        }

        fn with_delay(script: Vec<Result<FareObservation, ScrapeError>>, delay: Duration) -> Self {
            Self {
                script: Mutex::new(script.into()),
                delay,
                starts: Mutex::new(Vec::new()),
            }
        }

        fn starts(&self) -> Vec<Instant> {
            self.starts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FareSource for ScriptedSource {
        async fn fetch_fares(&self, _query: &TripQuery) -> Result<FareObservation, ScrapeError> {
            self.starts.lock().unwrap().push(Instant::now());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let next = self.script.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Ok(FareObservation::new(vec![100], vec![80])))
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum SinkEvent {
        Log(String),
        Plot(PricePoint),
        Waypoint(Waypoint),
        Settings(Vec<String>),
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<SinkEvent>>,
    }

    impl RecordingSink {
        fn events(&self) -> Vec<SinkEvent> {
            self.events.lock().unwrap().clone()
        }

        fn logs(&self) -> Vec<String> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    SinkEvent::Log(line) => Some(line),
                    _ => None,
                })
                .collect()
        }

        fn plots(&self) -> usize {
            self.events()
                .iter()
                .filter(|e| matches!(e, SinkEvent::Plot(_)))
                .count()
        }
    }

    #[async_trait]
    impl PresentationSink for RecordingSink {
        async fn log(&self, lines: Vec<String>) {
            let mut events = self.events.lock().unwrap();
            events.extend(lines.into_iter().map(SinkEvent::Log));
        }

        async fn plot(&self, point: PricePoint) {
            self.events.lock().unwrap().push(SinkEvent::Plot(point));
        }

        async fn waypoint(&self, marker: Waypoint) {
            self.events.lock().unwrap().push(SinkEvent::Waypoint(marker));
        }

        async fn settings(&self, lines: Vec<String>) {
            self.events.lock().unwrap().push(SinkEvent::Settings(lines));
        }
    }

    struct RecordingDispatcher {
        sent: Mutex<Vec<String>>,
        result: DeliveryResult,
    }

    impl RecordingDispatcher {
        fn returning(result: DeliveryResult) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                result,
            }
        }

        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AlertDispatcher for RecordingDispatcher {
        async fn dispatch(&self, message: &str) -> DeliveryResult {
            self.sent.lock().unwrap().push(message.to_string());
            self.result.clone()
        }
    }

    fn scheduler(
        query: Arc<TripQuery>,
        source: Arc<ScriptedSource>,
        dispatcher: Arc<RecordingDispatcher>,
        sink: Arc<RecordingSink>,
    ) -> Scheduler {
        Scheduler::new(query, source, dispatcher, sink)
    }

    #[tokio::test]
    async fn test_completed_cycle_publishes_fares() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(FareObservation::new(
            vec![100, 150],
            vec![80, 120],
        ))]));
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = Arc::new(RecordingDispatcher::returning(DeliveryResult::NotConfigured));
        let mut scheduler = scheduler(trip(None, None, 30.0), source, dispatcher.clone(), sink.clone());

        assert_eq!(scheduler.state(), SchedulerState::Idle);
        let outcome = scheduler.run_cycle().await;

        assert!(outcome.is_success());
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(scheduler.cycles(), 1);
        assert!(dispatcher.sent().is_empty());
        assert_eq!(
            sink.logs(),
            vec![
                "Lowest fare for an outbound flight is currently $100 (no change)".to_string(),
                "Lowest fare for a return flight is currently $80 (no change)".to_string(),
                "Lowest fare for roundtrip is currently $180 (no change)".to_string(),
            ]
        );
        assert_eq!(
            sink.events().last(),
            Some(&SinkEvent::Plot(PricePoint {
                outbound: 100.0,
                inbound: 80.0,
                roundtrip: 180.0
            }))
        );
    }

    #[tokio::test]
    async fn test_injected_engine_drives_cycles() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(FareObservation::new(vec![60], vec![70]))]));
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = Arc::new(RecordingDispatcher::returning(DeliveryResult::NotConfigured));
        let checked_at = Local.with_ymd_and_hms(2026, 10, 18, 7, 45, 0).unwrap();
        // Query has no thresholds; the injected engine brings its own
        let engine = FareEngine::new_with_clock(
            AlertThresholds {
                one_way: None,
                roundtrip: Some(150),
            },
            Box::new(move || checked_at),
        );
        let mut scheduler = scheduler(trip(None, None, 30.0), source, dispatcher.clone(), sink)
            .with_engine(engine);

        match scheduler.run_cycle().await {
            CycleOutcome::Completed(report) => {
                assert_eq!(report.summary.timestamp, checked_at);
                assert_eq!(report.summary.lowest_roundtrip, 130.0);
            }
            other => panic!("expected a completed cycle, got {:?}", other),
        }
        assert_eq!(
            dispatcher.sent(),
            vec!["Roundtrip deal alert! Lowest fare has hit $130".to_string()]
        );
    }

    #[tokio::test]
    async fn test_scrape_failure_then_recovery() {
        let source = Arc::new(ScriptedSource::new(vec![
            Err(ScrapeError::Navigation(Some("HTTP 503".to_string()))),
            Ok(FareObservation::new(vec![120], vec![90])),
        ]));
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = Arc::new(RecordingDispatcher::returning(DeliveryResult::NotConfigured));
        let mut scheduler = scheduler(trip(None, None, 30.0), source, dispatcher, sink.clone());

        let outcome = scheduler.run_cycle().await;
        assert!(matches!(outcome, CycleOutcome::ScrapeFailed(ScrapeError::Navigation(_))));
        assert!(scheduler.engine().history().is_empty());
        assert_eq!(sink.plots(), 0);
        assert_eq!(sink.logs().len(), 1);
        assert!(sink.logs()[0].starts_with("Fare check failed, will retry next interval"));

        let outcome = scheduler.run_cycle().await;
        assert!(outcome.is_success());
        assert_eq!(scheduler.engine().history().previous_lowest_outbound, Some(120.0));
        assert_eq!(sink.plots(), 1);
        assert_eq!(scheduler.cycles(), 2);
    }

    #[tokio::test]
    async fn test_alerts_are_logged_dispatched_then_fares_follow() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(FareObservation::new(vec![90], vec![80]))]));
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = Arc::new(RecordingDispatcher::returning(DeliveryResult::Sent {
            to: "+15550002222".to_string(),
            from: "+15550001111".to_string(),
        }));
        let mut scheduler = scheduler(trip(Some(95), Some(200), 30.0), source, dispatcher.clone(), sink.clone());

        let outcome = scheduler.run_cycle().await;
        assert!(outcome.is_success());

        let one_way = "Deal alert! Lowest fare has hit $90 (outbound) and $80 (return)".to_string();
        let roundtrip = "Roundtrip deal alert! Lowest fare has hit $170".to_string();
        assert_eq!(dispatcher.sent(), vec![one_way.clone(), roundtrip.clone()]);

        let sent_line = "Successfully sent SMS to +15550002222 from +15550001111".to_string();
        let logs = sink.logs();
        assert_eq!(&logs[..4], &[one_way, sent_line.clone(), roundtrip, sent_line]);
        assert!(logs[4].starts_with("Lowest fare for an outbound flight"));
        assert_eq!(logs.len(), 7);
    }

    #[tokio::test]
    async fn test_failed_delivery_is_logged_not_fatal() {
        let source = Arc::new(ScriptedSource::new(vec![]));
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = Arc::new(RecordingDispatcher::returning(DeliveryResult::Failed(DeliveryError {
            to: "+15550002222".to_string(),
            from: "+15550001111".to_string(),
            reason: "authentication failed".to_string(),
        })));
        let mut scheduler = scheduler(trip(Some(100), None, 30.0), source, dispatcher, sink.clone());

        let outcome = scheduler.run_cycle().await;
        assert!(outcome.is_success());
        assert!(sink
            .logs()
            .contains(&"Error: failed to send SMS to +15550002222 from +15550001111".to_string()));
        assert_eq!(sink.plots(), 1);
    }

    #[tokio::test]
    async fn test_empty_observation_skips_cycle() {
        let source = Arc::new(ScriptedSource::new(vec![
            Ok(FareObservation::new(vec![100], vec![80])),
            Ok(FareObservation::new(vec![], vec![60])),
        ]));
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = Arc::new(RecordingDispatcher::returning(DeliveryResult::NotConfigured));
        let mut scheduler = scheduler(trip(Some(500), None, 30.0), source, dispatcher.clone(), sink.clone());

        scheduler.run_cycle().await;
        let before = *scheduler.engine().history();
        let dispatched = dispatcher.sent().len();

        let outcome = scheduler.run_cycle().await;
        assert!(matches!(outcome, CycleOutcome::EmptyObservation(e) if e.leg == "outbound"));
        assert_eq!(*scheduler.engine().history(), before);
        assert_eq!(dispatcher.sent().len(), dispatched);
        assert_eq!(sink.plots(), 1);
        assert!(sink.logs().last().unwrap().starts_with("Fare check skipped"));
    }

    #[tokio::test]
    async fn test_announce_sends_settings_and_markers() {
        let source = Arc::new(ScriptedSource::new(vec![]));
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = Arc::new(RecordingDispatcher::returning(DeliveryResult::NotConfigured));
        let scheduler = scheduler(trip(None, None, 30.0), source, dispatcher, sink.clone());

        scheduler.announce().await;
        let events = sink.events();

        match &events[0] {
            SinkEvent::Settings(lines) => {
                assert!(lines.contains(&"Origin airport: MDW".to_string()));
                assert!(lines.contains(&"Interval: 30m".to_string()));
            }
            other => panic!("expected settings first, got {:?}", other),
        }
        let markers: Vec<(String, MarkerColor)> = events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Waypoint(w) => Some((w.label.clone(), w.color)),
                _ => None,
            })
            .collect();
        assert_eq!(
            markers,
            vec![
                ("MDW".to_string(), MarkerColor::Red),
                ("DEN".to_string(), MarkerColor::Yellow),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_cycle_waits_interval_after_completion() {
        // Each fetch takes 5 minutes; cycles should start 35 minutes apart
        let source = Arc::new(ScriptedSource::with_delay(vec![], Duration::from_secs(5 * 60)));
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = Arc::new(RecordingDispatcher::returning(DeliveryResult::NotConfigured));
        let mut scheduler = scheduler(trip(None, None, 30.0), source.clone(), dispatcher, sink.clone());

        let started = Instant::now();
        let handle = tokio::spawn(async move { scheduler.run().await });

        tokio::time::sleep(Duration::from_secs(106 * 60)).await;
        handle.abort();

        let offsets: Vec<Duration> = source.starts().iter().map(|t| *t - started).collect();
        assert_eq!(
            offsets,
            vec![
                Duration::ZERO,
                Duration::from_secs(35 * 60),
                Duration::from_secs(70 * 60),
                Duration::from_secs(105 * 60),
            ]
        );
        // The fourth fetch is still in flight
        assert_eq!(sink.plots(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_timeout_becomes_scrape_failure() {
        let source = Arc::new(ScriptedSource::with_delay(vec![], Duration::from_secs(600)));
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = Arc::new(RecordingDispatcher::returning(DeliveryResult::NotConfigured));
        let mut scheduler = scheduler(trip(None, None, 30.0), source, dispatcher, sink.clone())
            .with_fetch_timeout(Some(Duration::from_secs(60)));

        let outcome = scheduler.run_cycle().await;
        match outcome {
            CycleOutcome::ScrapeFailed(e) => {
                assert!(e.diagnostic().unwrap_or_default().contains("no response within"));
            }
            other => panic!("expected scrape failure, got {:?}", other),
        }
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(sink.plots(), 0);
    }
}
