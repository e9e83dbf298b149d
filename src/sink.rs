//! Presentation sink: where cycle results go to be seen
//!
//! The poller only ever talks to this trait. The terminal dashboard and the
//! headless log writer are the two implementations.

use {
    crate::fares::PricePoint,
    async_trait::async_trait,
    chrono::{DateTime, Local},
};

/// Map marker colours used by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerColor {
    Red,
    Yellow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub lat: f64,
    pub lon: f64,
    pub color: MarkerColor,
    pub label: String,
}

#[async_trait]
pub trait PresentationSink: Send + Sync {
    /// Append timestamped lines to the log panel
    async fn log(&self, lines: Vec<String>);
    /// Append one point to each price series
    async fn plot(&self, point: PricePoint);
    /// Register a map marker
    async fn waypoint(&self, marker: Waypoint);
    /// Replace the static settings summary
    async fn settings(&self, lines: Vec<String>);
}

/// `MM/DD/YY-HH:MM:SS: line`
pub fn stamp(now: DateTime<Local>, line: &str) -> String {
    format!("{}: {}", now.format("%m/%d/%y-%H:%M:%S"), line)
}

/// Headless sink: everything goes to the `log` facade
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl PresentationSink for LogSink {
    async fn log(&self, lines: Vec<String>) {
        for line in lines {
            log::info!("{}", line);
        }
    }

    async fn plot(&self, point: PricePoint) {
        log::debug!(
            "📈 outbound=${} return=${} roundtrip=${}",
            point.outbound,
            point.inbound,
            point.roundtrip
        );
    }

    async fn waypoint(&self, marker: Waypoint) {
        log::debug!(
            "📍 {} at ({:.4}, {:.4})",
            marker.label,
            marker.lat,
            marker.lon
        );
    }

    async fn settings(&self, lines: Vec<String>) {
        log::info!("📊 Settings:");
        for line in lines {
            log::info!("   {}", line);
        }
    }
}
