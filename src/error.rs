//! Error types for the fare watcher.
//!
//! Only `ConfigError` is fatal (at startup). Everything else is recovered
//! inside the polling loop and surfaces as a log line.

use std::fmt;

/// Invalid or missing trip parameter. Names the offending field.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    MissingField(&'static str),
    InvalidValue { field: &'static str, reason: String },
    Source(String),
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }

    /// Field this error refers to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ConfigError::MissingField(field) => Some(field),
            ConfigError::InvalidValue { field, .. } => Some(field),
            ConfigError::Source(_) => None,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingField(field) => write!(f, "Missing trip setting: {}", field),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for {}: {}", field, reason)
            }
            ConfigError::Source(msg) => write!(f, "Could not read settings: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// The fare source could not produce both fare lists.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeError {
    /// Request failed, timed out or returned a non-success status
    Navigation(Option<String>),
    /// An expected page element was not found
    MissingElement(Option<String>),
    /// A fare element held text that is not an amount
    UnparseableAmount(Option<String>),
}

impl ScrapeError {
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            ScrapeError::Navigation(d)
            | ScrapeError::MissingElement(d)
            | ScrapeError::UnparseableAmount(d) => d.as_deref(),
        }
    }
}

impl fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            ScrapeError::Navigation(_) => "navigation failed",
            ScrapeError::MissingElement(_) => "expected page element not found",
            ScrapeError::UnparseableAmount(_) => "fare amount could not be parsed",
        };
        match self.diagnostic() {
            Some(detail) => write!(f, "Scrape error: {} ({})", kind, detail),
            None => write!(f, "Scrape error: {}", kind),
        }
    }
}

impl std::error::Error for ScrapeError {}

/// A leg's fare set was empty when the engine tried to reduce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyObservationError {
    pub leg: &'static str,
}

impl fmt::Display for EmptyObservationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No fares observed for the {} leg", self.leg)
    }
}

impl std::error::Error for EmptyObservationError {}

/// SMS delivery failure. Logged by the cycle driver, never escalated.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryError {
    pub to: String,
    pub from: String,
    pub reason: String,
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to send SMS to {} from {}: {}",
            self.to, self.from, self.reason
        )
    }
}

impl std::error::Error for DeliveryError {}
