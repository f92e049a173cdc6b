//! Record store seam

use async_trait::async_trait;
use uuid::Uuid;

#[cfg(test)]
use mockall::mock;

use crate::domain::{emails::EmailMessage, records::errors::StoreError, templates::EmailTemplate};

/// File-per-record persistence over three independent collections: send
/// history, drafts, and templates.
///
/// `load_*` skips corrupt or unreadable records rather than aborting the
/// whole listing; `delete_*` treats absence as success.
#[async_trait]
pub trait RecordStore: Clone + Send + Sync + 'static {
    /// Append a sent or failed message to the history collection.
    ///
    /// # Returns
    /// A [`Result`] with the generated record id (the file stem), usable
    /// with [`RecordStore::delete_email`].
    async fn save_email(&self, message: &EmailMessage) -> Result<String, StoreError>;

    /// Load the history collection, sorted by send time descending
    async fn load_history(&self) -> Result<Vec<EmailMessage>, StoreError>;

    /// Delete one history record by its file stem
    async fn delete_email(&self, id: &str) -> Result<(), StoreError>;

    /// Delete every history record; per-file failures are logged and
    /// deletion continues
    async fn clear_history(&self) -> Result<(), StoreError>;

    /// Write a draft record, returning the generated record id
    async fn save_draft(&self, message: &EmailMessage) -> Result<String, StoreError>;

    /// Load all drafts, in filesystem listing order
    async fn load_drafts(&self) -> Result<Vec<EmailMessage>, StoreError>;

    /// Delete one draft by its file stem
    async fn delete_draft(&self, id: &str) -> Result<(), StoreError>;

    /// Write a template record, overwriting any record with the same id
    async fn save_template(&self, template: &EmailTemplate) -> Result<(), StoreError>;

    /// Load all templates, in filesystem listing order
    async fn load_templates(&self) -> Result<Vec<EmailTemplate>, StoreError>;

    /// Delete one template by id
    async fn delete_template(&self, id: &Uuid) -> Result<(), StoreError>;
}

#[cfg(test)]
mock! {
    pub RecordStore {}

    impl Clone for RecordStore {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl RecordStore for RecordStore {
        async fn save_email(&self, message: &EmailMessage) -> Result<String, StoreError>;
        async fn load_history(&self) -> Result<Vec<EmailMessage>, StoreError>;
        async fn delete_email(&self, id: &str) -> Result<(), StoreError>;
        async fn clear_history(&self) -> Result<(), StoreError>;
        async fn save_draft(&self, message: &EmailMessage) -> Result<String, StoreError>;
        async fn load_drafts(&self) -> Result<Vec<EmailMessage>, StoreError>;
        async fn delete_draft(&self, id: &str) -> Result<(), StoreError>;
        async fn save_template(&self, template: &EmailTemplate) -> Result<(), StoreError>;
        async fn load_templates(&self) -> Result<Vec<EmailTemplate>, StoreError>;
        async fn delete_template(&self, id: &Uuid) -> Result<(), StoreError>;
    }
}
