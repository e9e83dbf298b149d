//! Southwest select-flight page fare source
//!
//! Requests the roundtrip results page for a [`TripQuery`] and reads every
//! fare button total from the outbound and return result lists.
//!
//! ## Page shape
//!
//! ```text
//! <div id="air-booking-product-0"> ... outbound flights ...
//!     <span class="fare-button--value-total">129</span>
//! <div id="air-booking-product-1"> ... return flights ...
//!     <span class="fare-button--value-total">97</span>
//! ```

use {
    super::{html, FareSource},
    crate::{error::ScrapeError, fares::FareObservation, query::TripQuery},
    async_trait::async_trait,
};

pub const DEFAULT_BASE_URL: &str = "https://www.southwest.com";

const SELECT_PATH: &str = "/air/booking/select.html";
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_14_5) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/76.0.3809.100 Safari/537.36";

const OUTBOUND_SECTION: &str = "air-booking-product-0";
const RETURN_SECTION: &str = "air-booking-product-1";
const FARE_VALUE_CLASS: &str = "fare-button--value-total";

pub struct SouthwestFareSource {
    client: reqwest::Client,
    base_url: String,
}

impl SouthwestFareSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ScrapeError::Navigation(Some(e.to_string())))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn select_url(&self) -> String {
        format!("{}{}", self.base_url, SELECT_PATH)
    }
}

/// Query string for a roundtrip search
pub fn search_params(query: &TripQuery) -> Vec<(&'static str, String)> {
    vec![
        ("adultPassengersCount", query.passengers.to_string()),
        ("departureDate", query.departure_date.format("%Y-%m-%d").to_string()),
        ("departureTimeOfDay", query.departure_time_of_day.as_query_value().to_string()),
        ("destinationAirportCode", query.destination.clone()),
        ("fareType", "USD".to_string()),
        ("originationAirportCode", query.origin.clone()),
        ("passengerType", "ADULT".to_string()),
        ("returnDate", query.return_date.format("%Y-%m-%d").to_string()),
        ("returnTimeOfDay", query.return_time_of_day.as_query_value().to_string()),
        ("tripType", "roundtrip".to_string()),
    ]
}

#[async_trait]
impl FareSource for SouthwestFareSource {
    async fn fetch_fares(&self, query: &TripQuery) -> Result<FareObservation, ScrapeError> {
        let url = self.select_url();
        log::debug!("Fetching fares {} → {} from {}", query.origin, query.destination, url);

        let response = self
            .client
            .get(&url)
            .query(&search_params(query))
            .send()
            .await
            .map_err(|e| ScrapeError::Navigation(Some(e.to_string())))?;

        if !response.status().is_success() {
            return Err(ScrapeError::Navigation(Some(format!(
                "HTTP {} from {}",
                response.status(),
                url
            ))));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScrapeError::Navigation(Some(e.to_string())))?;

        extract_fares(&body)
    }
}

/// Pull both legs' fare lists out of a results page
pub fn extract_fares(page: &str) -> Result<FareObservation, ScrapeError> {
    let outbound = leg_fares(page, OUTBOUND_SECTION, &[RETURN_SECTION], "outbound")?;
    let inbound = leg_fares(page, RETURN_SECTION, &[OUTBOUND_SECTION], "return")?;
    Ok(FareObservation::new(outbound, inbound))
}

fn leg_fares(
    page: &str,
    section_id: &str,
    stop_ids: &[&str],
    leg: &str,
) -> Result<Vec<u32>, ScrapeError> {
    let section = html::section_from_id(page, section_id, stop_ids).ok_or_else(|| {
        ScrapeError::MissingElement(Some(format!("{} results (#{})", leg, section_id)))
    })?;

    let texts = html::texts_with_class(section, FARE_VALUE_CLASS);
    if texts.is_empty() {
        return Err(ScrapeError::MissingElement(Some(format!(
            "no .{} in {} results",
            FARE_VALUE_CLASS, leg
        ))));
    }

    texts.iter().map(|text| parse_amount(text)).collect()
}

/// Whole-dollar amount from fare button text such as `$1,029` or `Dollars 129`.
/// Cents are truncated.
pub fn parse_amount(text: &str) -> Result<u32, ScrapeError> {
    let unparseable = || ScrapeError::UnparseableAmount(Some(format!("'{}'", text)));

    let start = text.find(|c: char| c.is_ascii_digit()).ok_or_else(unparseable)?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',')
        .filter(|c| *c != ',')
        .collect();

    digits
        .parse::<u32>()
        .ok()
        .filter(|amount| *amount > 0)
        .ok_or_else(unparseable)
}
