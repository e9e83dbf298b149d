//! Fare aggregation and price-delta engine
//!
//! - `types` - Observation, summary, history and plot point records
//! - `delta` - Trend classification and deal alerts
//! - `engine` - `reduce`, `evaluate` and the stateful `FareEngine`

pub mod delta;
pub mod engine;
pub mod types;

pub use delta::{DealAlert, Evaluation, FareDelta, FareDeltas, Trend, Validity};
pub use engine::{evaluate, reduce, CycleReport, FareEngine};
pub use types::{FareHistory, FareObservation, FareSummary, PricePoint};
