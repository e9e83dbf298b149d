//! Fare engine: reduction, delta evaluation and history advancement
//!
//! ```text
//! FareObservation
//!     ↓ reduce()
//! FareSummary
//!     ↓ evaluate(summary, history, thresholds)
//! Evaluation { deltas, alerts, validity }
//!     ↓ (valid only)
//! FareHistory replaced with the summary's minima
//! ```
//!
//! The engine never renders or sends anything. The cycle driver in
//! `scheduler` turns a [`CycleReport`] into sink and dispatcher calls.

use super::delta::{DealAlert, Evaluation, FareDelta, FareDeltas, Validity};
use super::types::{FareHistory, FareObservation, FareSummary};
use crate::error::EmptyObservationError;
use crate::query::AlertThresholds;
use chrono::{DateTime, Local};

/// Reduce each leg to its minimum
///
/// Fails if either leg has no fares, which a well-behaved source never returns.
pub fn reduce(
    observation: &FareObservation,
    timestamp: DateTime<Local>,
) -> Result<FareSummary, EmptyObservationError> {
    let lowest_outbound = observation
        .outbound
        .iter()
        .min()
        .ok_or(EmptyObservationError { leg: "outbound" })?;
    let lowest_return = observation
        .inbound
        .iter()
        .min()
        .ok_or(EmptyObservationError { leg: "return" })?;

    Ok(FareSummary::new(
        f64::from(*lowest_outbound),
        f64::from(*lowest_return),
        timestamp,
    ))
}

/// Compare a summary with the previous good reading and decide alerts
///
/// Pure: neither input is modified.
pub fn evaluate(
    summary: &FareSummary,
    history: &FareHistory,
    thresholds: &AlertThresholds,
) -> Evaluation {
    let deltas = FareDeltas {
        outbound: FareDelta::between(history.previous_lowest_outbound, summary.lowest_outbound),
        inbound: FareDelta::between(history.previous_lowest_return, summary.lowest_return),
        roundtrip: FareDelta::between(history.previous_lowest_roundtrip, summary.lowest_roundtrip),
    };

    let validity = if deltas.outbound.amount.is_finite() && deltas.inbound.amount.is_finite() {
        Validity::Valid
    } else {
        Validity::Invalid
    };

    let mut alerts = Vec::new();
    if validity == Validity::Valid {
        if let Some(threshold) = thresholds.one_way {
            let limit = f64::from(threshold);
            if summary.lowest_outbound <= limit || summary.lowest_return <= limit {
                alerts.push(DealAlert::OneWay {
                    outbound: summary.lowest_outbound,
                    inbound: summary.lowest_return,
                    threshold,
                });
            }
        }
        if let Some(threshold) = thresholds.roundtrip {
            if summary.lowest_roundtrip <= f64::from(threshold) {
                alerts.push(DealAlert::Roundtrip {
                    total: summary.lowest_roundtrip,
                    threshold,
                });
            }
        }
    }

    Evaluation {
        deltas,
        alerts,
        validity,
    }
}

/// Result of one processed cycle
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub summary: FareSummary,
    pub evaluation: Evaluation,
}

impl CycleReport {
    /// The three "lowest fare" log lines with change tags
    pub fn fare_lines(&self) -> Vec<String> {
        let line = |label: &str, amount: f64, delta: &FareDelta| match delta.trend.tag() {
            Some(tag) => format!("Lowest fare for {} is currently ${} {}", label, amount, tag),
            None => format!("Lowest fare for {} is currently ${}", label, amount),
        };
        let deltas = &self.evaluation.deltas;

        vec![
            line("an outbound flight", self.summary.lowest_outbound, &deltas.outbound),
            line("a return flight", self.summary.lowest_return, &deltas.inbound),
            line("roundtrip", self.summary.lowest_roundtrip, &deltas.roundtrip),
        ]
    }
}

/// Owns the fare history and the alert thresholds
pub struct FareEngine {
    thresholds: AlertThresholds,
    history: FareHistory,

    /// Timestamp source (swappable for deterministic tests)
    now_fn: Box<dyn Fn() -> DateTime<Local> + Send + Sync>,
}

impl FareEngine {
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self::new_with_clock(thresholds, Box::new(Local::now))
    }

    pub fn new_with_clock(
        thresholds: AlertThresholds,
        now_fn: Box<dyn Fn() -> DateTime<Local> + Send + Sync>,
    ) -> Self {
        Self {
            thresholds,
            history: FareHistory::default(),
            now_fn,
        }
    }

    pub fn history(&self) -> &FareHistory {
        &self.history
    }

    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }

    /// Reduce, evaluate, and advance history if the cycle is valid
    ///
    /// An empty leg aborts before anything is evaluated or recorded.
    pub fn process(
        &mut self,
        observation: &FareObservation,
    ) -> Result<CycleReport, EmptyObservationError> {
        let summary = reduce(observation, (self.now_fn)())?;
        Ok(self.apply(summary))
    }

    /// Evaluate an already reduced summary and advance history if valid
    pub fn apply(&mut self, summary: FareSummary) -> CycleReport {
        let evaluation = evaluate(&summary, &self.history, &self.thresholds);

        if evaluation.is_valid() {
            self.history.record(&summary);
        } else {
            log::warn!(
                "⚠️  Fare reading rejected (outbound Δ={}, return Δ={}); history not advanced",
                evaluation.deltas.outbound.amount,
                evaluation.deltas.inbound.amount
            );
        }

        CycleReport {
            summary,
            evaluation,
        }
    }
}
