//! relance-mailer
//!
//! Transactional email delivery. A thin client over the provider's JSON
//! HTTP API plus the fixed templates the sweeps and dispatchers send.
//! Throughput limits are the caller's concern — the sweeps pace their own
//! sends.

pub mod error;
pub mod memory;
pub mod templates;

use std::env;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::MailerError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One outbound email, ready to hand to the provider.
#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Delivery seam. Production uses [`MailerClient`]; tests use
/// [`memory::RecordingMailer`].
pub trait Mailer: Send + Sync {
    /// Send one email. Returns the provider-assigned delivery id.
    fn send(&self, message: EmailMessage) -> BoxFuture<'_, Result<String, MailerError>>;
}

/// HTTP client for the transactional email provider.
pub struct MailerClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    from: String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct SendResponse {
    id: String,
}

impl MailerClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        from: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            from: from.into(),
        }
    }

    /// Build a client from `MAILER_BASE_URL`, `MAILER_API_KEY`, and
    /// `MAILER_FROM`.
    pub fn from_env() -> Result<Self, MailerError> {
        let base_url = required_env("MAILER_BASE_URL")?;
        let api_key = required_env("MAILER_API_KEY")?;
        let from = required_env("MAILER_FROM")?;
        Ok(Self::new(base_url, api_key, from))
    }
}

fn required_env(name: &'static str) -> Result<String, MailerError> {
    env::var(name).map_err(|_| MailerError::MissingConfig(name))
}

impl Mailer for MailerClient {
    fn send(&self, message: EmailMessage) -> BoxFuture<'_, Result<String, MailerError>> {
        Box::pin(async move {
            let url = format!("{}/v1/send", self.base_url);
            let resp = self
                .http
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&SendRequest {
                    from: &self.from,
                    to: &message.to,
                    subject: &message.subject,
                    html: &message.html,
                    text: &message.text,
                })
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(MailerError::Provider {
                    status: status.as_u16(),
                    body,
                });
            }

            let parsed: SendResponse = resp.json().await?;
            tracing::debug!(delivery_id = %parsed.id, "email accepted by provider");
            Ok(parsed.id)
        })
    }
}
