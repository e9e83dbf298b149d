//! Fare data carried through one polling cycle

use chrono::{DateTime, Local};

/// Raw fare amounts scraped in one cycle, one entry per fare class
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FareObservation {
    pub outbound: Vec<u32>,
    pub inbound: Vec<u32>,
}

impl FareObservation {
    pub fn new(outbound: Vec<u32>, inbound: Vec<u32>) -> Self {
        Self { outbound, inbound }
    }
}

/// Lowest fares of one cycle
///
/// Amounts are whole dollars held as `f64` so a non-finite reading can be
/// represented and rejected by the validity check instead of panicking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FareSummary {
    pub lowest_outbound: f64,
    pub lowest_return: f64,
    /// Always `lowest_outbound + lowest_return`
    pub lowest_roundtrip: f64,
    pub timestamp: DateTime<Local>,
}

impl FareSummary {
    pub fn new(lowest_outbound: f64, lowest_return: f64, timestamp: DateTime<Local>) -> Self {
        Self {
            lowest_outbound,
            lowest_return,
            lowest_roundtrip: lowest_outbound + lowest_return,
            timestamp,
        }
    }
}

/// Last known-good minima, the only state carried between cycles
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FareHistory {
    pub previous_lowest_outbound: Option<f64>,
    pub previous_lowest_return: Option<f64>,
    pub previous_lowest_roundtrip: Option<f64>,
}

impl FareHistory {
    pub fn is_empty(&self) -> bool {
        self.previous_lowest_outbound.is_none()
            && self.previous_lowest_return.is_none()
            && self.previous_lowest_roundtrip.is_none()
    }

    /// Replace all three readings with the summary's minima
    pub fn record(&mut self, summary: &FareSummary) {
        self.previous_lowest_outbound = Some(summary.lowest_outbound);
        self.previous_lowest_return = Some(summary.lowest_return);
        self.previous_lowest_roundtrip = Some(summary.lowest_roundtrip);
    }
}

/// One point per series for the price graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub outbound: f64,
    pub inbound: f64,
    pub roundtrip: f64,
}

impl From<&FareSummary> for PricePoint {
    fn from(summary: &FareSummary) -> Self {
        Self {
            outbound: summary.lowest_outbound,
            inbound: summary.lowest_return,
            roundtrip: summary.lowest_roundtrip,
        }
    }
}
