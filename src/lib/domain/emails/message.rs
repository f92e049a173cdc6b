//! Email message model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of an email message.
///
/// `Sent` and `Failed` are terminal; no further transition occurs for a
/// message once it reaches either of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    /// Composed but not yet handed to the provider
    Draft,

    /// Provider call in flight
    Sending,

    /// Acknowledged by the provider
    Sent,

    /// Rejected by the provider or failed in transport
    Failed,
}

impl DeliveryStatus {
    /// Whether the status is terminal
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Sent | Self::Failed)
    }
}

/// An email message as it moves through the send pipeline and the history
/// store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    /// Provider-assigned id, set once the provider acknowledges the send
    pub id: Option<String>,

    /// Sender display name
    pub from_name: String,

    /// Sender address
    pub from_email: String,

    /// Recipient addresses, order preserved
    pub recipients: Vec<String>,

    /// Subject line
    pub subject: String,

    /// HTML body
    pub html_body: String,

    /// Creation time until acknowledged, then the send time
    pub sent_at: DateTime<Utc>,

    /// Lifecycle state
    pub status: DeliveryStatus,

    /// Failure detail, verbatim provider or transport text
    pub error: Option<String>,
}

impl EmailMessage {
    /// Create a new message in `Draft` state
    pub fn new(
        from_name: String,
        from_email: String,
        recipients: Vec<String>,
        subject: String,
        html_body: String,
    ) -> Self {
        Self {
            id: None,
            from_name,
            from_email,
            recipients,
            subject,
            html_body,
            sent_at: Utc::now(),
            status: DeliveryStatus::Draft,
            error: None,
        }
    }

    /// Recipients joined with `"; "`, for display
    pub fn formatted_recipients(&self) -> String {
        self.recipients.join("; ")
    }
}

/// A send request as the presenter supplies it: recipients arrive as one
/// `;`-delimited string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendRequest {
    /// Sender display name
    pub from_name: String,

    /// Sender address
    pub from_email: String,

    /// Recipient addresses, `;`-delimited
    pub recipients: String,

    /// Subject line
    pub subject: String,

    /// HTML body
    pub html_body: String,
}

impl SendRequest {
    /// Split the raw recipient string on `;`, trimming each segment and
    /// discarding empty ones.
    pub fn recipient_list(&self) -> Vec<String> {
        self.recipients
            .split(';')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_recipients(recipients: &str) -> SendRequest {
        SendRequest {
            from_name: "MyApp".to_string(),
            from_email: "no-reply@example.com".to_string(),
            recipients: recipients.to_string(),
            subject: "Hi".to_string(),
            html_body: "<p>x</p>".to_string(),
        }
    }

    #[test]
    fn test_new_message_is_a_draft_without_id() {
        let message = EmailMessage::new(
            "MyApp".to_string(),
            "no-reply@example.com".to_string(),
            vec!["a@b.com".to_string()],
            "Hi".to_string(),
            "<p>x</p>".to_string(),
        );

        assert_eq!(message.status, DeliveryStatus::Draft);
        assert!(message.id.is_none());
        assert!(message.error.is_none());
    }

    #[test]
    fn test_sent_and_failed_are_terminal() {
        assert!(DeliveryStatus::Sent.is_terminal());
        assert!(DeliveryStatus::Failed.is_terminal());
        assert!(!DeliveryStatus::Draft.is_terminal());
        assert!(!DeliveryStatus::Sending.is_terminal());
    }

    #[test]
    fn test_recipient_list_preserves_order() {
        let request = request_with_recipients("a@b.com;b@c.com");

        assert_eq!(request.recipient_list(), vec!["a@b.com", "b@c.com"]);
    }

    #[test]
    fn test_recipient_list_trims_and_drops_empty_segments() {
        let request = request_with_recipients(" a@b.com ; ;; b@c.com ;");

        assert_eq!(request.recipient_list(), vec!["a@b.com", "b@c.com"]);
    }

    #[test]
    fn test_recipient_list_of_empty_string_is_empty() {
        let request = request_with_recipients("");

        assert!(request.recipient_list().is_empty());
    }

    #[test]
    fn test_formatted_recipients() {
        let message = EmailMessage::new(
            "MyApp".to_string(),
            "no-reply@example.com".to_string(),
            vec!["a@b.com".to_string(), "b@c.com".to_string()],
            "Hi".to_string(),
            "<p>x</p>".to_string(),
        );

        assert_eq!(message.formatted_recipients(), "a@b.com; b@c.com");
    }
}
