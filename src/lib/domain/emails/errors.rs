//! Error types for the send pipeline

use thiserror::Error;

/// Errors that can occur before a send request is dispatched.
///
/// All of these are raised synchronously by pre-flight validation; none of
/// them means the network or the record store was touched.
#[derive(Debug, Error)]
pub enum SendEmailError {
    /// No API key is configured
    #[error("no API key is configured")]
    MissingApiKey,

    /// The sender address is not a valid email address
    #[error("invalid sender address: {0}")]
    InvalidSender(String),

    /// A recipient address is not a valid email address
    #[error("invalid recipient address: {0}")]
    InvalidRecipient(String),

    /// The recipient list is empty
    #[error("at least one recipient is required")]
    NoRecipients,

    /// The subject is empty
    #[error("subject must not be empty")]
    EmptySubject,

    /// The body is empty or still the editor's empty document
    #[error("message body must not be empty")]
    EmptyBody,
}

/// Errors that can occur when saving a draft
#[derive(Debug, Error)]
pub enum SaveDraftError {
    /// Sender name or address is missing
    #[error("sender name and address are required")]
    MissingSender,
}
