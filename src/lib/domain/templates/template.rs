//! Email template model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A reusable email template
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailTemplate {
    /// Stable identity; also the record's file name on disk
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Subject line applied when the template is used
    pub subject: String,

    /// HTML body
    pub html_body: String,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Refreshed on every re-save; always ≥ `created_at`
    pub updated_at: DateTime<Utc>,
}

impl EmailTemplate {
    /// Create a new template with a fresh id
    pub fn new(name: String, subject: String, html_body: String) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::now_v7(),
            name,
            subject,
            html_body,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_template_timestamps_start_equal() {
        let template = EmailTemplate::new(
            "Welcome".to_string(),
            "Welcome aboard".to_string(),
            "<h1>Welcome</h1>".to_string(),
        );

        assert_eq!(template.created_at, template.updated_at);
    }

    #[test]
    fn test_new_templates_get_distinct_ids() {
        let a = EmailTemplate::new("a".to_string(), "s".to_string(), "<p>b</p>".to_string());
        let b = EmailTemplate::new("b".to_string(), "s".to_string(), "<p>b</p>".to_string());

        assert_ne!(a.id, b.id);
    }
}
