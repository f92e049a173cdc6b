//! JSON file-per-record store
//!
//! A base directory holds one subdirectory per collection (`history/`,
//! `drafts/`, `templates/`), each containing one pretty-printed JSON file
//! per record. History and draft files are named by timestamp plus a v7
//! Uuid so concurrent saves never collide; template files are named by the
//! template's id, which makes a re-save an overwrite.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    emails::EmailMessage,
    records::{errors::StoreError, RecordStore},
    templates::EmailTemplate,
};

/// JSON file-per-record store
#[derive(Clone, Debug)]
pub struct JsonRecordStore {
    history_dir: PathBuf,
    drafts_dir: PathBuf,
    templates_dir: PathBuf,
}

impl JsonRecordStore {
    /// Open a store rooted at `base_dir`, creating the collection
    /// directories if they do not exist.
    pub async fn open(base_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let base_dir = base_dir.as_ref();

        let store = Self {
            history_dir: base_dir.join("history"),
            drafts_dir: base_dir.join("drafts"),
            templates_dir: base_dir.join("templates"),
        };

        fs::create_dir_all(&store.history_dir).await?;
        fs::create_dir_all(&store.drafts_dir).await?;
        fs::create_dir_all(&store.templates_dir).await?;

        Ok(store)
    }

    fn timestamped_stem(prefix: &str) -> String {
        format!(
            "{prefix}_{}_{}",
            Utc::now().format("%Y-%m-%d_%H-%M-%S"),
            Uuid::now_v7()
        )
    }

    async fn write_record<T: Serialize>(path: &Path, record: &T) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(record)?;
        fs::write(path, json).await?;

        Ok(())
    }

    /// Deserialize every `.json` file in `dir`; corrupt or unreadable
    /// records are skipped and logged, never fatal to the listing.
    async fn load_all<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>, StoreError> {
        let mut records = Vec::new();
        let mut entries = fs::read_dir(dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            match fs::read(&path).await {
                Ok(bytes) => match serde_json::from_slice(&bytes) {
                    Ok(record) => records.push(record),
                    Err(err) => {
                        warn!("skipping corrupt record {}: {err}", path.display());
                    }
                },
                Err(err) => {
                    warn!("skipping unreadable record {}: {err}", path.display());
                }
            }
        }

        Ok(records)
    }

    async fn remove_if_present(path: &Path) -> Result<(), StoreError> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl RecordStore for JsonRecordStore {
    async fn save_email(&self, message: &EmailMessage) -> Result<String, StoreError> {
        let stem = Self::timestamped_stem("email");
        let path = self.history_dir.join(format!("{stem}.json"));

        Self::write_record(&path, message).await?;
        info!("history record written: {}", path.display());

        Ok(stem)
    }

    async fn load_history(&self) -> Result<Vec<EmailMessage>, StoreError> {
        let mut history: Vec<EmailMessage> = Self::load_all(&self.history_dir).await?;
        history.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));

        Ok(history)
    }

    async fn delete_email(&self, id: &str) -> Result<(), StoreError> {
        Self::remove_if_present(&self.history_dir.join(format!("{id}.json"))).await
    }

    async fn clear_history(&self) -> Result<(), StoreError> {
        let mut entries = fs::read_dir(&self.history_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            if let Err(err) = fs::remove_file(&path).await {
                error!("failed to delete history record {}: {err}", path.display());
            }
        }

        info!("history cleared");

        Ok(())
    }

    async fn save_draft(&self, message: &EmailMessage) -> Result<String, StoreError> {
        let stem = Self::timestamped_stem("draft");
        let path = self.drafts_dir.join(format!("{stem}.json"));

        Self::write_record(&path, message).await?;
        info!("draft written: {}", path.display());

        Ok(stem)
    }

    async fn load_drafts(&self) -> Result<Vec<EmailMessage>, StoreError> {
        Self::load_all(&self.drafts_dir).await
    }

    async fn delete_draft(&self, id: &str) -> Result<(), StoreError> {
        Self::remove_if_present(&self.drafts_dir.join(format!("{id}.json"))).await
    }

    async fn save_template(&self, template: &EmailTemplate) -> Result<(), StoreError> {
        let path = self.templates_dir.join(format!("{}.json", template.id));

        Self::write_record(&path, template).await?;
        info!(name = %template.name, "template written: {}", path.display());

        Ok(())
    }

    async fn load_templates(&self) -> Result<Vec<EmailTemplate>, StoreError> {
        Self::load_all(&self.templates_dir).await
    }

    async fn delete_template(&self, id: &Uuid) -> Result<(), StoreError> {
        Self::remove_if_present(&self.templates_dir.join(format!("{id}.json"))).await
    }
}
