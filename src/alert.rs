//! Deal alert delivery over SMS
//!
//! The dispatcher is a no-op when SMS is not configured. Delivery failures
//! come back as values; callers log them and carry on.

use {
    crate::{error::DeliveryError, query::SmsConfig},
    async_trait::async_trait,
    serde::Deserialize,
};

pub const TWILIO_API_BASE: &str = "https://api.twilio.com";

/// Outcome of one dispatch attempt
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryResult {
    Sent { to: String, from: String },
    /// No SMS settings; nothing was sent
    NotConfigured,
    Failed(DeliveryError),
}

impl DeliveryResult {
    pub fn is_success(&self) -> bool {
        !matches!(self, DeliveryResult::Failed(_))
    }

    pub fn error(&self) -> Option<&DeliveryError> {
        match self {
            DeliveryResult::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Dashboard log line, if the attempt is worth showing
    pub fn log_line(&self) -> Option<String> {
        match self {
            DeliveryResult::Sent { to, from } => {
                Some(format!("Successfully sent SMS to {} from {}", to, from))
            }
            DeliveryResult::Failed(e) => {
                Some(format!("Error: failed to send SMS to {} from {}", e.to, e.from))
            }
            DeliveryResult::NotConfigured => None,
        }
    }
}

#[async_trait]
pub trait AlertDispatcher: Send + Sync {
    async fn dispatch(&self, message: &str) -> DeliveryResult;
}

/// Raw text message delivery
#[async_trait]
pub trait SmsTransport: Send + Sync {
    async fn send(&self, message: &str, to: &str, from: &str) -> Result<(), String>;
}

/// Twilio Programmable Messaging REST API
pub struct TwilioTransport {
    client: reqwest::Client,
    api_base: String,
    account_sid: String,
    auth_token: String,
}

#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    code: Option<i64>,
    message: Option<String>,
}

impl TwilioTransport {
    pub fn new(sms: &SmsConfig) -> Self {
        Self::with_api_base(sms, TWILIO_API_BASE)
    }

    pub fn with_api_base(sms: &SmsConfig, api_base: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            account_sid: sms.account_sid.clone(),
            auth_token: sms.auth_token.clone(),
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base, self.account_sid
        )
    }
}

#[async_trait]
impl SmsTransport for TwilioTransport {
    async fn send(&self, message: &str, to: &str, from: &str) -> Result<(), String> {
        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", to), ("From", from), ("Body", message)])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<TwilioErrorBody>(&body)
            .ok()
            .and_then(|b| match (b.code, b.message) {
                (Some(code), Some(msg)) => Some(format!("{} (code {})", msg, code)),
                (None, Some(msg)) => Some(msg),
                _ => None,
            })
            .unwrap_or(body);

        Err(format!("Twilio API error {}: {}", status, detail))
    }
}

/// Sends alerts to the configured recipient, or does nothing
pub struct SmsDispatcher {
    sms: Option<SmsConfig>,
    transport: Option<Box<dyn SmsTransport>>,
}

impl SmsDispatcher {
    /// Twilio-backed dispatcher; inert when `sms` is `None`
    pub fn twilio(sms: Option<SmsConfig>) -> Self {
        let transport = sms
            .as_ref()
            .map(|cfg| Box::new(TwilioTransport::new(cfg)) as Box<dyn SmsTransport>);
        Self { sms, transport }
    }

    pub fn with_transport(sms: Option<SmsConfig>, transport: Box<dyn SmsTransport>) -> Self {
        Self {
            sms,
            transport: Some(transport),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.sms.is_some()
    }
}

#[async_trait]
impl AlertDispatcher for SmsDispatcher {
    async fn dispatch(&self, message: &str) -> DeliveryResult {
        let (Some(sms), Some(transport)) = (&self.sms, &self.transport) else {
            return DeliveryResult::NotConfigured;
        };

        match transport.send(message, &sms.to, &sms.from).await {
            Ok(()) => {
                log::info!("📱 SMS sent to {}", sms.to);
                DeliveryResult::Sent {
                    to: sms.to.clone(),
                    from: sms.from.clone(),
                }
            }
            Err(reason) => {
                log::warn!("⚠️  SMS to {} failed: {}", sms.to, reason);
                DeliveryResult::Failed(DeliveryError {
                    to: sms.to.clone(),
                    from: sms.from.clone(),
                    reason,
                })
            }
        }
    }
}
