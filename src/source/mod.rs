//! Fare sources
//!
//! A fare source turns a trip query into two unordered fare lists. It never
//! retries; the scheduler owns retry policy (wait for the next cycle).

pub mod html;
pub mod southwest;

use {
    crate::{error::ScrapeError, fares::FareObservation, query::TripQuery},
    async_trait::async_trait,
};

pub use southwest::SouthwestFareSource;

/// Anything that can observe current fares for a trip
///
/// # Returns
/// * `Ok(FareObservation)` - Fares for both legs
/// * `Err(ScrapeError)` - Either list could not be obtained
#[async_trait]
pub trait FareSource: Send + Sync {
    async fn fetch_fares(&self, query: &TripQuery) -> Result<FareObservation, ScrapeError>;
}
