//! Terminal dashboard: US map with trip markers, price chart, log and settings

pub mod dashboard;
pub mod layout;
pub mod renderer;
pub mod terminal;

pub use {
    dashboard::{Dashboard, DashboardState},
    terminal::run_ui,
};
