//! Default production wiring
//!
//! Builds the file-backed stores, the shared event bus, and the Resend
//! client so a presenter can embed the core with one call.

use std::path::Path;
use std::sync::Arc;

use crate::domain::{
    emails::MailServiceImpl, events::EventBus, records::errors::StoreError,
    templates::TemplateServiceImpl,
};
use crate::infrastructure::{
    email::resend::ResendClient, settings::file::FileSettingsStore, storage::json::JsonRecordStore,
};

/// The wired application core
#[derive(Debug)]
pub struct App {
    /// Event bus shared by the services and the presenter's subscribers
    pub bus: Arc<EventBus>,

    /// Application settings
    pub settings: Arc<FileSettingsStore>,

    /// Send coordinator
    pub mail: MailServiceImpl<ResendClient, JsonRecordStore, FileSettingsStore>,

    /// Template management
    pub templates: TemplateServiceImpl<JsonRecordStore>,
}

impl App {
    /// Open the application core rooted at `base_dir`.
    ///
    /// Creates `history/`, `drafts/`, and `templates/` under `base_dir`
    /// and a `settings.json` beside them on first use.
    pub async fn open(base_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let base_dir = base_dir.as_ref();

        let bus = Arc::new(EventBus::new());
        let settings = Arc::new(FileSettingsStore::open(base_dir.join("settings.json")));
        let store = Arc::new(JsonRecordStore::open(base_dir).await?);
        let provider = Arc::new(ResendClient::new());

        let mail = MailServiceImpl::new(
            provider,
            Arc::clone(&store),
            Arc::clone(&settings),
            Arc::clone(&bus),
        );
        let templates = TemplateServiceImpl::new(store, Arc::clone(&bus));

        Ok(Self {
            bus,
            settings,
            mail,
            templates,
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use testresult::TestResult;

    use crate::domain::settings::{keys, SettingsStore};

    use super::*;

    #[tokio::test]
    async fn test_open_lays_out_the_data_directory() -> TestResult {
        let dir = TempDir::new()?;

        let app = App::open(dir.path()).await?;

        assert!(dir.path().join("settings.json").exists());
        assert!(dir.path().join("history").is_dir());
        assert!(dir.path().join("drafts").is_dir());
        assert!(dir.path().join("templates").is_dir());
        assert_eq!(app.settings.get(keys::SENDER_NAME), "MyApp");

        Ok(())
    }
}
