//! End-to-end fare engine scenarios through the public API
//!
//! Covers the reference two-cycle walk-through (reduce, deltas, one-way alert)
//! plus the history rules around empty and invalid readings.

#[cfg(test)]
mod engine_scenarios {
    use {
        chrono::{Local, TimeZone},
        farewatch::{
            error::EmptyObservationError,
            fares::{evaluate, reduce, DealAlert, FareEngine, FareHistory, FareObservation, FareSummary, Trend},
            query::AlertThresholds,
        },
    };

    fn fixed_clock() -> Box<dyn Fn() -> chrono::DateTime<Local> + Send + Sync> {
        Box::new(|| Local.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap())
    }

    fn engine(one_way: Option<u32>, roundtrip: Option<u32>) -> FareEngine {
        FareEngine::new_with_clock(AlertThresholds { one_way, roundtrip }, fixed_clock())
    }

    #[test]
    fn test_two_cycle_walkthrough() {
        let mut engine = engine(Some(95), None);

        // Cycle 1: minima 100 / 80, nothing to compare against yet
        let first = engine
            .process(&FareObservation::new(vec![100, 150], vec![80, 120]))
            .unwrap();
        assert_eq!(first.summary.lowest_outbound, 100.0);
        assert_eq!(first.summary.lowest_return, 80.0);
        assert_eq!(first.summary.lowest_roundtrip, 180.0);
        assert_eq!(first.evaluation.deltas.outbound.trend, Trend::Unchanged);
        assert_eq!(first.evaluation.deltas.inbound.trend, Trend::Unchanged);
        assert_eq!(first.evaluation.deltas.roundtrip.trend, Trend::Unchanged);
        // 80 on the return leg is already under 95
        assert_eq!(first.evaluation.alerts.len(), 1);

        // Cycle 2: outbound drops to 90
        let second = engine
            .process(&FareObservation::new(vec![90], vec![80]))
            .unwrap();
        let deltas = second.evaluation.deltas;
        assert_eq!(deltas.outbound.amount, 10.0);
        assert_eq!(deltas.outbound.trend.describe(), "decreased by 10");
        assert_eq!(deltas.inbound.trend.describe(), "no change");
        assert_eq!(deltas.roundtrip.trend.describe(), "decreased by 10");

        assert_eq!(
            second.evaluation.alerts,
            vec![DealAlert::OneWay {
                outbound: 90.0,
                inbound: 80.0,
                threshold: 95
            }]
        );
        let message = second.evaluation.alerts[0].message();
        assert!(message.contains("$90"));
        assert!(message.contains("$80"));

        assert_eq!(
            second.fare_lines(),
            vec![
                "Lowest fare for an outbound flight is currently $90 (down $10)".to_string(),
                "Lowest fare for a return flight is currently $80 (no change)".to_string(),
                "Lowest fare for roundtrip is currently $170 (down $10)".to_string(),
            ]
        );
        assert_eq!(engine.history().previous_lowest_roundtrip, Some(170.0));
    }

    #[test]
    fn test_price_increase_is_classified() {
        let mut engine = engine(None, None);
        engine.process(&FareObservation::new(vec![100], vec![80])).unwrap();
        let report = engine.process(&FareObservation::new(vec![125], vec![80])).unwrap();

        assert_eq!(report.evaluation.deltas.outbound.trend, Trend::Increased(25.0));
        assert_eq!(report.evaluation.deltas.roundtrip.trend, Trend::Increased(25.0));
        assert!(report.evaluation.alerts.is_empty());
    }

    #[test]
    fn test_empty_leg_leaves_history_alone() {
        let mut engine = engine(Some(500), Some(500));
        engine.process(&FareObservation::new(vec![100], vec![80])).unwrap();
        let before = *engine.history();

        let err = engine
            .process(&FareObservation::new(vec![], vec![70]))
            .unwrap_err();
        assert_eq!(err, EmptyObservationError { leg: "outbound" });

        let err = engine
            .process(&FareObservation::new(vec![60], vec![]))
            .unwrap_err();
        assert_eq!(err, EmptyObservationError { leg: "return" });

        assert_eq!(*engine.history(), before);
    }

    #[test]
    fn test_invalid_reading_skips_history_and_alerts() {
        let mut engine = engine(Some(1_000), Some(1_000));
        engine.process(&FareObservation::new(vec![100], vec![80])).unwrap();
        let before = *engine.history();

        let at = Local.with_ymd_and_hms(2026, 10, 18, 10, 0, 0).unwrap();
        let report = engine.apply(FareSummary::new(f64::INFINITY, 80.0, at));

        assert!(!report.evaluation.is_valid());
        assert!(report.evaluation.alerts.is_empty());
        assert_eq!(*engine.history(), before);

        // The next good reading is compared against the pre-invalid history
        let next = engine.process(&FareObservation::new(vec![95], vec![80])).unwrap();
        assert_eq!(next.evaluation.deltas.outbound.amount, 5.0);
    }

    #[test]
    fn test_alert_boundaries() {
        let at = Local.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap();
        let history = FareHistory::default();

        let at_threshold = reduce(&FareObservation::new(vec![95], vec![200]), at).unwrap();
        let one_way = AlertThresholds { one_way: Some(95), roundtrip: None };
        assert_eq!(evaluate(&at_threshold, &history, &one_way).alerts.len(), 1);

        let just_above = reduce(&FareObservation::new(vec![96], vec![200]), at).unwrap();
        assert!(evaluate(&just_above, &history, &one_way).alerts.is_empty());

        // Only the roundtrip threshold is crossed
        let both = AlertThresholds { one_way: Some(50), roundtrip: Some(300) };
        let alerts = evaluate(&just_above, &history, &both).alerts;
        assert_eq!(alerts, vec![DealAlert::Roundtrip { total: 296.0, threshold: 300 }]);
    }
}
