//! Resend provider client
//!
//! Sends email through the Resend HTTP API and probes API keys with a
//! read-only domain listing.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::emails::{EmailMessage, MailProvider, ProviderError};

/// Resend API base URL
const RESEND_API_BASE: &str = "https://api.resend.com";

/// Resend API client
#[derive(Clone, Debug)]
pub struct ResendClient {
    base_url: String,
    http: Client,
}

impl ResendClient {
    /// Create a client against the production Resend API
    pub fn new() -> Self {
        Self::with_base_url(RESEND_API_BASE)
    }

    /// Create a client against a different base URL, for staging or tests
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
        }
    }
}

impl Default for ResendClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Send request payload
#[derive(Debug, Serialize)]
struct SendEmailPayload<'a> {
    from: String,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
}

impl<'a> SendEmailPayload<'a> {
    fn for_message(email: &'a EmailMessage) -> Self {
        Self {
            from: format!("{} <{}>", email.from_name.trim(), email.from_email.trim()),
            to: &email.recipients,
            subject: &email.subject,
            html: &email.html_body,
        }
    }
}

/// Send response body
#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}

#[async_trait]
impl MailProvider for ResendClient {
    async fn send(&self, api_key: &str, email: &EmailMessage) -> Result<String, ProviderError> {
        let payload = SendEmailPayload::for_message(email);

        debug!(
            subject = %email.subject,
            recipients = email.recipients.len(),
            "sending email via Resend"
        );

        let response = self
            .http
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| ProviderError::Transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let body: SendEmailResponse = response
                .json()
                .await
                .map_err(|err| ProviderError::Transport(err.to_string()))?;

            debug!(id = %body.id, "Resend acknowledged the send");

            Ok(body.id)
        } else {
            let message = response.text().await.unwrap_or_default();

            Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn verify_key(&self, api_key: &str) -> Result<(), ProviderError> {
        let response = self
            .http
            .get(format!("{}/domains", self.base_url))
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(|err| ProviderError::Transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_default();

            Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
