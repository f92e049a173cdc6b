//! Provider seam

use async_trait::async_trait;
use thiserror::Error;

#[cfg(test)]
use mockall::mock;

use crate::domain::emails::EmailMessage;

/// Errors returned by the transactional-email provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider rejected the request; the message is preserved verbatim
    /// for user display
    #[error("provider rejected the request ({status}): {message}")]
    Api {
        /// HTTP status code returned by the provider
        status: u16,

        /// Response body, verbatim
        message: String,
    },

    /// The request never reached the provider
    #[error("transport error: {0}")]
    Transport(String),
}

/// The transactional-email provider boundary.
///
/// The API key is passed per call so that verification can probe a candidate
/// key and so a key changed in settings takes effect on the next send
/// without rebuilding the client.
#[async_trait]
pub trait MailProvider: Clone + Send + Sync + 'static {
    /// Send one email.
    ///
    /// # Arguments
    /// * `api_key` - The provider API key to authenticate with.
    /// * `email` - The message to send; the sender is formatted as
    ///   `"Name <address>"` on the wire.
    ///
    /// # Returns
    /// A [`Result`] with the provider-assigned email id on success, or a
    /// [`ProviderError`] on rejection or transport failure.
    async fn send(&self, api_key: &str, email: &EmailMessage) -> Result<String, ProviderError>;

    /// Probe whether an API key is valid with a lightweight read-only call.
    async fn verify_key(&self, api_key: &str) -> Result<(), ProviderError>;
}

#[cfg(test)]
mock! {
    pub MailProvider {}

    impl Clone for MailProvider {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl MailProvider for MailProvider {
        async fn send(&self, api_key: &str, email: &EmailMessage) -> Result<String, ProviderError>;
        async fn verify_key(&self, api_key: &str) -> Result<(), ProviderError>;
    }
}
