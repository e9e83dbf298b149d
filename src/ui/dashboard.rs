use {
    crate::{
        fares::PricePoint,
        sink::{stamp, PresentationSink, Waypoint},
    },
    async_trait::async_trait,
    chrono::{DateTime, Local},
    std::{collections::VecDeque, sync::Arc},
    tokio::sync::RwLock,
};

/// Log lines kept for the log panel
const MAX_LOG_LINES: usize = 500;
/// Price points kept for the chart; about ten days at the default interval
const MAX_PRICE_POINTS: usize = 500;

/// Everything the dashboard renders
#[derive(Debug, Default)]
pub struct DashboardState {
    log_lines: VecDeque<String>,
    prices: Vec<(DateTime<Local>, PricePoint)>,
    markers: Vec<Waypoint>,
    settings: Vec<String>,
}

impl DashboardState {
    pub fn push_log(&mut self, line: String) {
        self.log_lines.push_back(line);
        while self.log_lines.len() > MAX_LOG_LINES {
            self.log_lines.pop_front();
        }
    }

    pub fn log_lines(&self) -> &VecDeque<String> {
        &self.log_lines
    }

    pub fn push_price(&mut self, at: DateTime<Local>, point: PricePoint) {
        self.prices.push((at, point));
        if self.prices.len() > MAX_PRICE_POINTS {
            let excess = self.prices.len() - MAX_PRICE_POINTS;
            self.prices.drain(..excess);
        }
    }

    pub fn prices(&self) -> &[(DateTime<Local>, PricePoint)] {
        &self.prices
    }

    pub fn add_marker(&mut self, marker: Waypoint) {
        self.markers.push(marker);
    }

    pub fn markers(&self) -> &[Waypoint] {
        &self.markers
    }

    pub fn set_settings(&mut self, lines: Vec<String>) {
        self.settings = lines;
    }

    pub fn settings(&self) -> &[String] {
        &self.settings
    }
}

/// Sink half of the terminal dashboard; the UI task reads the same state
#[derive(Clone, Default)]
pub struct Dashboard {
    state: Arc<RwLock<DashboardState>>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Arc<RwLock<DashboardState>> {
        self.state.clone()
    }
}

#[async_trait]
impl PresentationSink for Dashboard {
    async fn log(&self, lines: Vec<String>) {
        let now = Local::now();
        let mut state = self.state.write().await;
        for line in lines {
            state.push_log(stamp(now, &line));
        }
    }

    async fn plot(&self, point: PricePoint) {
        self.state.write().await.push_price(Local::now(), point);
    }

    async fn waypoint(&self, marker: Waypoint) {
        self.state.write().await.add_marker(marker);
    }

    async fn settings(&self, lines: Vec<String>) {
        self.state.write().await.set_settings(lines);
    }
}
