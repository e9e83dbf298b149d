//! Trip settings sources
//!
//! Two strategies produce the same all-string [`RawSettings`] record:
//! - [`StaticSettings`]: a JSON settings file or `FAREWATCH_*` environment variables
//! - [`InteractivePrompt`]: sequential questions on a terminal
//!
//! [`resolve`] turns either one into a validated [`TripQuery`].
//! An empty string always means "unset".

use {
    crate::{
        error::ConfigError,
        query::{SmsConfig, TimeOfDay, TripQuery, DEFAULT_INTERVAL_MINUTES},
    },
    chrono::NaiveDate,
    serde::Deserialize,
    std::{
        env, fs,
        io::{BufRead, Write},
        path::Path,
    },
};

/// Settings as entered, before any parsing
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSettings {
    pub from: String,
    pub to: String,
    pub leave_date: String,
    pub return_date: String,
    pub passengers: String,
    pub deal_price_threshold: String,
    pub deal_price_threshold_roundtrip: String,
    pub interval: String,
    pub departure_time_of_day: String,
    pub return_time_of_day: String,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_phone_from: String,
    pub twilio_phone_to: String,
}

/// A strategy that yields raw trip settings
pub trait SettingsSource {
    fn load(&mut self) -> Result<RawSettings, ConfigError>;
}

/// Load settings from `source` and validate them into a [`TripQuery`]
pub fn resolve(source: &mut dyn SettingsSource) -> Result<TripQuery, ConfigError> {
    let raw = source.load()?;
    parse_settings(&raw)
}

/// Parse and validate a raw settings record
pub fn parse_settings(raw: &RawSettings) -> Result<TripQuery, ConfigError> {
    let origin = required(&raw.from, "from")?.to_ascii_uppercase();
    let destination = required(&raw.to, "to")?.to_ascii_uppercase();
    let departure_date = parse_date(&raw.leave_date, "leaveDate")?;
    let return_date = parse_date(&raw.return_date, "returnDate")?;

    let passengers = required(&raw.passengers, "passengers")?
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ConfigError::invalid("passengers", "must be a positive integer"))?;

    let deal_price_threshold = parse_price(&raw.deal_price_threshold, "dealPriceThreshold")?;
    let deal_price_threshold_roundtrip =
        parse_price(&raw.deal_price_threshold_roundtrip, "dealPriceThresholdRoundtrip")?;

    let poll_interval_minutes = match raw.interval.trim() {
        "" => DEFAULT_INTERVAL_MINUTES,
        value => value
            .parse::<f64>()
            .ok()
            .filter(|m| m.is_finite() && *m > 0.0)
            .ok_or_else(|| ConfigError::invalid("interval", "must be a positive number of minutes"))?,
    };

    let departure_time_of_day = raw
        .departure_time_of_day
        .parse::<TimeOfDay>()
        .map_err(|reason| ConfigError::invalid("departureTimeOfDay", reason))?;
    let return_time_of_day = raw
        .return_time_of_day
        .parse::<TimeOfDay>()
        .map_err(|reason| ConfigError::invalid("returnTimeOfDay", reason))?;

    let sms = SmsConfig::from_parts(
        &raw.twilio_account_sid,
        &raw.twilio_auth_token,
        &raw.twilio_phone_from,
        &raw.twilio_phone_to,
    );
    if sms.is_none() && has_any_sms_field(raw) {
        log::warn!("⚠️  SMS settings are incomplete (need account SID, auth token, from and to); SMS alerts disabled");
    }

    let query = TripQuery {
        origin,
        destination,
        departure_date,
        return_date,
        passengers,
        departure_time_of_day,
        return_time_of_day,
        deal_price_threshold,
        deal_price_threshold_roundtrip,
        poll_interval_minutes,
        sms,
    };
    query.validate()?;
    Ok(query)
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ConfigError> {
    match value.trim() {
        "" => Err(ConfigError::MissingField(field)),
        v => Ok(v),
    }
}

fn parse_date(value: &str, field: &'static str) -> Result<NaiveDate, ConfigError> {
    let value = required(value, field)?;
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| ConfigError::invalid(field, format!("'{}' is not a YYYY-MM-DD date ({})", value, e)))
}

/// Whole-dollar price; a leading `$` is accepted and cents are truncated
fn parse_price(value: &str, field: &'static str) -> Result<Option<u32>, ConfigError> {
    let value = value.trim().trim_start_matches('$');
    if value.is_empty() {
        return Ok(None);
    }
    let price = value
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 1.0 && *p <= u32::MAX as f64)
        .ok_or_else(|| ConfigError::invalid(field, format!("'{}' is not a positive price", value)))?;
    Ok(Some(price.trunc() as u32))
}

fn has_any_sms_field(raw: &RawSettings) -> bool {
    [
        &raw.twilio_account_sid,
        &raw.twilio_auth_token,
        &raw.twilio_phone_from,
        &raw.twilio_phone_to,
    ]
    .iter()
    .any(|v| !v.trim().is_empty())
}

/// Predefined settings, read once
pub struct StaticSettings {
    raw: RawSettings,
}

impl StaticSettings {
    pub fn new(raw: RawSettings) -> Self {
        Self { raw }
    }

    /// Read a JSON settings file. Missing keys count as unset.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| ConfigError::Source(format!("{}: {}", path.display(), e)))?;
        let raw: RawSettings = serde_json::from_str(&json)
            .map_err(|e| ConfigError::Source(format!("{}: {}", path.display(), e)))?;
        Ok(Self { raw })
    }

    /// Read settings from environment variables
    ///
    /// Environment variables:
    /// - `FAREWATCH_FROM`, `FAREWATCH_TO`
    /// - `FAREWATCH_LEAVE_DATE`, `FAREWATCH_RETURN_DATE` (YYYY-MM-DD)
    /// - `FAREWATCH_PASSENGERS`
    /// - `FAREWATCH_DEAL_PRICE_THRESHOLD`, `FAREWATCH_DEAL_PRICE_THRESHOLD_ROUNDTRIP`
    /// - `FAREWATCH_INTERVAL` (minutes, default 30)
    /// - `FAREWATCH_DEPARTURE_TIME_OF_DAY`, `FAREWATCH_RETURN_TIME_OF_DAY`
    /// - `TWILIO_ACCOUNT_SID`, `TWILIO_AUTH_TOKEN`, `TWILIO_PHONE_FROM`, `TWILIO_PHONE_TO`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).unwrap_or_default();
        Self {
            raw: RawSettings {
                from: get("FAREWATCH_FROM"),
                to: get("FAREWATCH_TO"),
                leave_date: get("FAREWATCH_LEAVE_DATE"),
                return_date: get("FAREWATCH_RETURN_DATE"),
                passengers: get("FAREWATCH_PASSENGERS"),
                deal_price_threshold: get("FAREWATCH_DEAL_PRICE_THRESHOLD"),
                deal_price_threshold_roundtrip: get("FAREWATCH_DEAL_PRICE_THRESHOLD_ROUNDTRIP"),
                interval: get("FAREWATCH_INTERVAL"),
                departure_time_of_day: get("FAREWATCH_DEPARTURE_TIME_OF_DAY"),
                return_time_of_day: get("FAREWATCH_RETURN_TIME_OF_DAY"),
                twilio_account_sid: get("TWILIO_ACCOUNT_SID"),
                twilio_auth_token: get("TWILIO_AUTH_TOKEN"),
                twilio_phone_from: get("TWILIO_PHONE_FROM"),
                twilio_phone_to: get("TWILIO_PHONE_TO"),
            },
        }
    }
}

impl SettingsSource for StaticSettings {
    fn load(&mut self) -> Result<RawSettings, ConfigError> {
        Ok(self.raw.clone())
    }
}

/// Question/answer collection over any reader and writer
pub struct InteractivePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InteractivePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str) -> Result<String, ConfigError> {
        write!(self.output, "{} ", question)
            .and_then(|_| self.output.flush())
            .map_err(|e| ConfigError::Source(e.to_string()))?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| ConfigError::Source(e.to_string()))?;
        if read == 0 {
            return Err(ConfigError::Source(format!(
                "input ended before answering '{}'",
                question
            )));
        }
        Ok(line.trim().to_string())
    }

    fn confirm(&mut self, question: &str) -> Result<bool, ConfigError> {
        let answer = self.ask(question)?.to_ascii_lowercase();
        Ok(matches!(answer.as_str(), "y" | "yes"))
    }
}

impl<R: BufRead, W: Write> SettingsSource for InteractivePrompt<R, W> {
    fn load(&mut self) -> Result<RawSettings, ConfigError> {
        let mut raw = RawSettings {
            from: self.ask("Origin airport code (e.g. MDW):")?,
            to: self.ask("Destination airport code (e.g. DEN):")?,
            leave_date: self.ask("Departure date (YYYY-MM-DD):")?,
            return_date: self.ask("Return date (YYYY-MM-DD):")?,
            passengers: self.ask("Number of passengers:")?,
            deal_price_threshold: self.ask("One-way deal price in USD (blank to disable):")?,
            deal_price_threshold_roundtrip: self
                .ask("Roundtrip deal price in USD (blank to disable):")?,
            departure_time_of_day: self.ask(
                "Departure time of day [ALL_DAY, BEFORE_NOON, NOON_TO_SIX, AFTER_SIX] (blank for ALL_DAY):",
            )?,
            return_time_of_day: self.ask(
                "Return time of day [ALL_DAY, BEFORE_NOON, NOON_TO_SIX, AFTER_SIX] (blank for ALL_DAY):",
            )?,
            interval: self.ask("Check interval in minutes (blank for 30):")?,
            ..RawSettings::default()
        };

        if self.confirm("Set up SMS deal alerts via Twilio? (y/N):")? {
            raw.twilio_account_sid = self.ask("Twilio account SID:")?;
            raw.twilio_auth_token = self.ask("Twilio auth token:")?;
            raw.twilio_phone_from = self.ask("Twilio phone number to send from:")?;
            raw.twilio_phone_to = self.ask("Phone number to send alerts to:")?;
        }

        Ok(raw)
    }
}
