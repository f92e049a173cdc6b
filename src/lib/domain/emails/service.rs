//! Send coordinator
//!
//! Validates send requests on the caller's thread, performs the provider
//! call on a spawned task, drives each message through its lifecycle,
//! persists the outcome, and publishes progress on the event bus.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[cfg(test)]
use mockall::mock;

use crate::domain::{
    emails::{
        errors::{SaveDraftError, SendEmailError},
        DeliveryStatus, EmailAddress, EmailMessage, MailProvider, SendRequest,
    },
    events::{Event, EventBus},
    records::{errors::StoreError, RecordStore},
    settings::{keys, SettingsStore},
};

/// The HTML an empty rich-text editor document serializes to; a body equal
/// to this is treated as empty.
const EMPTY_EDITOR_HTML: &str =
    r#"<html dir="ltr"><head></head><body contenteditable="true"></body></html>"#;

/// Subject recorded for drafts saved without one
const NO_SUBJECT: &str = "(no subject)";

/// Send coordinator
#[async_trait]
pub trait MailService: Clone + Send + Sync + 'static {
    /// Dispatch a send request.
    ///
    /// Pre-flight validation runs synchronously on the caller's thread; any
    /// validation or configuration failure returns [`Err`] before the
    /// network or the record store is touched. On success the provider call
    /// runs on a spawned task and the returned handle resolves to the
    /// message in its terminal state; the caller may await it or ignore it
    /// and observe the outcome through the event bus instead.
    ///
    /// Must be called from within a Tokio runtime.
    fn send_email(&self, request: SendRequest) -> Result<JoinHandle<EmailMessage>, SendEmailError>;

    /// Check an API key against the provider on a spawned task.
    ///
    /// Resolves to `false` on any provider error; the error itself is
    /// logged for diagnostics.
    ///
    /// Must be called from within a Tokio runtime.
    fn verify_api_key(&self, api_key: &str) -> JoinHandle<bool>;

    /// Save a draft through the record store. Never touches the network.
    ///
    /// Sender name and address are required; a store failure is logged and
    /// surfaced as an error status event rather than returned.
    async fn save_draft(&self, request: SendRequest) -> Result<(), SaveDraftError>;

    /// Load the send history, most recent first
    async fn list_history(&self) -> Result<Vec<EmailMessage>, StoreError>;

    /// Load all saved drafts
    async fn list_drafts(&self) -> Result<Vec<EmailMessage>, StoreError>;

    /// Delete every history record. Idempotent.
    async fn clear_history(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mock! {
    pub MailService {}

    impl Clone for MailService {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl MailService for MailService {
        fn send_email(&self, request: SendRequest) -> Result<JoinHandle<EmailMessage>, SendEmailError>;
        fn verify_api_key(&self, api_key: &str) -> JoinHandle<bool>;
        async fn save_draft(&self, request: SendRequest) -> Result<(), SaveDraftError>;
        async fn list_history(&self) -> Result<Vec<EmailMessage>, StoreError>;
        async fn list_drafts(&self) -> Result<Vec<EmailMessage>, StoreError>;
        async fn clear_history(&self) -> Result<(), StoreError>;
    }
}

/// Send coordinator implementation
#[derive(Clone)]
pub struct MailServiceImpl<P, R, S>
where
    P: MailProvider,
    R: RecordStore,
    S: SettingsStore,
{
    provider: Arc<P>,
    store: Arc<R>,
    settings: Arc<S>,
    bus: Arc<EventBus>,
}

impl<P, R, S> MailServiceImpl<P, R, S>
where
    P: MailProvider,
    R: RecordStore,
    S: SettingsStore,
{
    /// Create a new send coordinator
    pub fn new(provider: Arc<P>, store: Arc<R>, settings: Arc<S>, bus: Arc<EventBus>) -> Self {
        Self {
            provider,
            store,
            settings,
            bus,
        }
    }

    fn validate(&self, request: &SendRequest) -> Result<(String, Vec<String>), SendEmailError> {
        let api_key = self.settings.get(keys::API_KEY);
        if api_key.trim().is_empty() {
            return Err(SendEmailError::MissingApiKey);
        }

        EmailAddress::new(&request.from_email)
            .map_err(|_| SendEmailError::InvalidSender(request.from_email.clone()))?;

        let recipients = request.recipient_list();
        if recipients.is_empty() {
            return Err(SendEmailError::NoRecipients);
        }
        for recipient in &recipients {
            EmailAddress::new(recipient)
                .map_err(|_| SendEmailError::InvalidRecipient(recipient.clone()))?;
        }

        if request.subject.trim().is_empty() {
            return Err(SendEmailError::EmptySubject);
        }

        let body = request.html_body.trim();
        if body.is_empty() || body == EMPTY_EDITOR_HTML {
            return Err(SendEmailError::EmptyBody);
        }

        Ok((api_key, recipients))
    }
}

#[async_trait]
impl<P, R, S> MailService for MailServiceImpl<P, R, S>
where
    P: MailProvider,
    R: RecordStore,
    S: SettingsStore,
{
    fn send_email(&self, request: SendRequest) -> Result<JoinHandle<EmailMessage>, SendEmailError> {
        let (api_key, recipients) = self.validate(&request)?;

        let mut message = EmailMessage::new(
            request.from_name,
            request.from_email,
            recipients,
            request.subject,
            request.html_body,
        );
        message.status = DeliveryStatus::Sending;

        let provider = Arc::clone(&self.provider);
        let store = Arc::clone(&self.store);
        let bus = Arc::clone(&self.bus);

        Ok(tokio::spawn(async move {
            bus.publish(&Event::StatusUpdate {
                message: format!("Sending email: {}", message.subject),
                is_error: false,
            });

            match provider.send(&api_key, &message).await {
                Ok(id) => {
                    info!(id = %id, subject = %message.subject, "email sent");

                    message.id = Some(id);
                    message.status = DeliveryStatus::Sent;
                    message.sent_at = Utc::now();

                    // A failed history write does not undo the send.
                    if let Err(err) = store.save_email(&message).await {
                        error!("failed to record sent email: {err}");
                    }

                    bus.publish(&Event::EmailSent {
                        message: message.clone(),
                        success: true,
                    });
                    bus.publish(&Event::StatusUpdate {
                        message: format!("Email sent: {}", message.subject),
                        is_error: false,
                    });
                }
                Err(err) => {
                    let detail = err.to_string();
                    error!(subject = %message.subject, "email send failed: {detail}");

                    message.status = DeliveryStatus::Failed;
                    message.error = Some(detail.clone());

                    // Failed sends are persisted too; history is the only
                    // audit trail.
                    if let Err(err) = store.save_email(&message).await {
                        error!("failed to record failed email: {err}");
                    }

                    bus.publish(&Event::EmailSent {
                        message: message.clone(),
                        success: false,
                    });
                    bus.publish(&Event::StatusUpdate {
                        message: format!("Email send failed: {detail}"),
                        is_error: true,
                    });
                }
            }

            message
        }))
    }

    fn verify_api_key(&self, api_key: &str) -> JoinHandle<bool> {
        let api_key = api_key.to_string();
        let provider = Arc::clone(&self.provider);

        tokio::spawn(async move {
            match provider.verify_key(&api_key).await {
                Ok(()) => true,
                Err(err) => {
                    error!("API key verification failed: {err}");
                    false
                }
            }
        })
    }

    async fn save_draft(&self, request: SendRequest) -> Result<(), SaveDraftError> {
        if request.from_name.trim().is_empty() || request.from_email.trim().is_empty() {
            return Err(SaveDraftError::MissingSender);
        }

        let recipients = request.recipient_list();
        let subject = if request.subject.trim().is_empty() {
            NO_SUBJECT.to_string()
        } else {
            request.subject
        };

        let draft = EmailMessage::new(
            request.from_name,
            request.from_email,
            recipients,
            subject,
            request.html_body,
        );

        match self.store.save_draft(&draft).await {
            Ok(_) => {
                info!(subject = %draft.subject, "draft saved");
                self.bus.publish(&Event::StatusUpdate {
                    message: "Draft saved".to_string(),
                    is_error: false,
                });
            }
            Err(err) => {
                error!("failed to save draft: {err}");
                self.bus.publish(&Event::StatusUpdate {
                    message: format!("Failed to save draft: {err}"),
                    is_error: true,
                });
            }
        }

        Ok(())
    }

    async fn list_history(&self) -> Result<Vec<EmailMessage>, StoreError> {
        self.store.load_history().await
    }

    async fn list_drafts(&self) -> Result<Vec<EmailMessage>, StoreError> {
        self.store.load_drafts().await
    }

    async fn clear_history(&self) -> Result<(), StoreError> {
        self.store.clear_history().await
    }
}

impl<P, R, S> fmt::Debug for MailServiceImpl<P, R, S>
where
    P: MailProvider,
    R: RecordStore,
    S: SettingsStore,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailServiceImpl")
            .field("provider", &"MailProvider")
            .field("store", &"RecordStore")
            .field("settings", &"SettingsStore")
            .finish()
    }
}
