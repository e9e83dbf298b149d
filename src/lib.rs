//! farewatch: polls airline fares for one roundtrip, tracks price movement
//! between checks, and raises deal alerts when thresholds are crossed.

pub mod airports;
pub mod alert;
pub mod config;
pub mod error;
pub mod fares;
pub mod query;
pub mod scheduler;
pub mod settings;
pub mod sink;
pub mod source;
pub mod ui;
