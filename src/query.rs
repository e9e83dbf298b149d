//! Trip query: the immutable per-run configuration consumed by the poller.

use {
    crate::error::ConfigError,
    chrono::NaiveDate,
    std::{fmt, str::FromStr, time::Duration},
};

/// Poll interval applied when the settings leave it blank
pub const DEFAULT_INTERVAL_MINUTES: f64 = 30.0;

/// Shortest cool-down accepted between two fare checks
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Time-of-day filter for a leg's departure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeOfDay {
    #[default]
    AllDay,
    BeforeNoon,
    NoonToSix,
    AfterSix,
}

impl TimeOfDay {
    /// Value the booking site expects in its query string
    pub fn as_query_value(&self) -> &'static str {
        match self {
            TimeOfDay::AllDay => "ALL_DAY",
            TimeOfDay::BeforeNoon => "BEFORE_NOON",
            TimeOfDay::NoonToSix => "NOON_TO_6PM",
            TimeOfDay::AfterSix => "AFTER_6PM",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeOfDay::AllDay => "All day",
            TimeOfDay::BeforeNoon => "Before noon",
            TimeOfDay::NoonToSix => "Noon - 6pm",
            TimeOfDay::AfterSix => "After 6pm",
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "" | "ALL_DAY" | "ANYTIME" => Ok(TimeOfDay::AllDay),
            "BEFORE_NOON" => Ok(TimeOfDay::BeforeNoon),
            "NOON_TO_SIX" | "NOON_TO_6PM" => Ok(TimeOfDay::NoonToSix),
            "AFTER_SIX" | "AFTER_6PM" => Ok(TimeOfDay::AfterSix),
            other => Err(format!(
                "'{}' is not one of ALL_DAY, BEFORE_NOON, NOON_TO_SIX, AFTER_SIX",
                other
            )),
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Twilio credentials and phone numbers for deal alerts
#[derive(Clone, PartialEq)]
pub struct SmsConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from: String,
    pub to: String,
}

impl SmsConfig {
    /// Returns `Some` only when all four fields are non-empty
    pub fn from_parts(account_sid: &str, auth_token: &str, from: &str, to: &str) -> Option<Self> {
        let parts = [account_sid, auth_token, from, to].map(str::trim);
        if parts.iter().any(|p| p.is_empty()) {
            return None;
        }
        Some(Self {
            account_sid: parts[0].to_string(),
            auth_token: parts[1].to_string(),
            from: parts[2].to_string(),
            to: parts[3].to_string(),
        })
    }
}

// Keeps the auth token out of logs
impl fmt::Debug for SmsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmsConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"***")
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}

/// One roundtrip search, fixed for the lifetime of the process
#[derive(Debug, Clone, PartialEq)]
pub struct TripQuery {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub passengers: u32,
    pub departure_time_of_day: TimeOfDay,
    pub return_time_of_day: TimeOfDay,
    pub deal_price_threshold: Option<u32>,
    pub deal_price_threshold_roundtrip: Option<u32>,
    pub poll_interval_minutes: f64,
    pub sms: Option<SmsConfig>,
}

impl TripQuery {
    /// Cool-down between cycles
    ///
    /// Out-of-range values (rejected by `validate`) fall back to the default
    /// rather than panicking.
    pub fn poll_interval(&self) -> Duration {
        interval_from_minutes(self.poll_interval_minutes).unwrap_or_else(|| {
            Duration::from_secs_f64(DEFAULT_INTERVAL_MINUTES * 60.0)
        })
    }

    pub fn thresholds(&self) -> AlertThresholds {
        AlertThresholds {
            one_way: self.deal_price_threshold,
            roundtrip: self.deal_price_threshold_roundtrip,
        }
    }

    /// Check invariants that the individual field parsers cannot see
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.origin.is_empty() {
            return Err(ConfigError::MissingField("from"));
        }
        if self.destination.is_empty() {
            return Err(ConfigError::MissingField("to"));
        }
        if self.passengers == 0 {
            return Err(ConfigError::invalid("passengers", "must be at least 1"));
        }
        if self.return_date < self.departure_date {
            return Err(ConfigError::invalid(
                "returnDate",
                format!(
                    "{} is before the departure date {}",
                    self.return_date, self.departure_date
                ),
            ));
        }
        match interval_from_minutes(self.poll_interval_minutes) {
            None => {
                return Err(ConfigError::invalid(
                    "interval",
                    format!("{} is not a usable number of minutes", self.poll_interval_minutes),
                ))
            }
            Some(interval) if interval < MIN_POLL_INTERVAL => {
                return Err(ConfigError::invalid(
                    "interval",
                    format!("must be at least {}", format_interval(MIN_POLL_INTERVAL)),
                ))
            }
            Some(_) => {}
        }
        Ok(())
    }

    /// Lines for the dashboard's settings panel
    pub fn settings_lines(&self) -> Vec<String> {
        let deal = |threshold: Option<u32>| match threshold {
            Some(price) => format!("<= ${}", price),
            None => "disabled".to_string(),
        };

        vec![
            format!("Origin airport: {}", self.origin),
            format!("Destination airport: {}", self.destination),
            format!("Outbound date: {}", self.departure_date.format("%m/%d")),
            format!("Outbound time: {}", self.departure_time_of_day),
            format!("Return date: {}", self.return_date.format("%m/%d")),
            format!("Return time: {}", self.return_time_of_day),
            format!("Passengers: {}", self.passengers),
            format!("Interval: {}", format_interval(self.poll_interval())),
            format!("Deal price: {}", deal(self.deal_price_threshold)),
            format!("Roundtrip deal price: {}", deal(self.deal_price_threshold_roundtrip)),
            format!(
                "SMS alerts: {}",
                self.sms.as_ref().map(|s| s.to.as_str()).unwrap_or("disabled")
            ),
        ]
    }
}

/// `None` for NaN, negative or too large to represent
fn interval_from_minutes(minutes: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(minutes * 60.0).ok()
}

/// Deal thresholds in whole dollars
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertThresholds {
    pub one_way: Option<u32>,
    pub roundtrip: Option<u32>,
}

/// Compact human duration: `30m`, `3h`, `1h 30m`, `45s`
pub fn format_interval(interval: Duration) -> String {
    let total = interval.as_secs();
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);

    let parts: Vec<String> = [(h, "h"), (m, "m"), (s, "s")]
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{}{}", value, unit))
        .collect();

    if parts.is_empty() {
        format!("{}ms", interval.as_millis())
    } else {
        parts.join(" ")
    }
}

#[cfg(test)]
pub(crate) fn sample_query() -> TripQuery {
    TripQuery {
        origin: "MDW".to_string(),
        destination: "DEN".to_string(),
        departure_date: NaiveDate::from_ymd_opt(2026, 11, 20).unwrap(),
        return_date: NaiveDate::from_ymd_opt(2026, 11, 27).unwrap(),
        passengers: 2,
        departure_time_of_day: TimeOfDay::AllDay,
        return_time_of_day: TimeOfDay::AfterSix,
        deal_price_threshold: None,
        deal_price_threshold_roundtrip: None,
        poll_interval_minutes: DEFAULT_INTERVAL_MINUTES,
        sms: None,
    }
}
