//! Template service

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

#[cfg(test)]
use mockall::mock;

use crate::domain::{
    events::{Event, EventBus},
    records::{errors::StoreError, RecordStore},
    templates::{errors::SaveTemplateError, EmailTemplate},
};

/// Template management
#[async_trait]
pub trait TemplateService: Clone + Send + Sync + 'static {
    /// Save a template, refreshing its `updated_at`.
    ///
    /// Re-saving a template with an existing id overwrites it. Name and
    /// body are required; a store failure is logged and surfaced as an
    /// error status event rather than returned.
    ///
    /// # Returns
    /// A [`Result`] with the template as persisted, or a
    /// [`SaveTemplateError`] when validation fails.
    async fn save_template(
        &self,
        template: EmailTemplate,
    ) -> Result<EmailTemplate, SaveTemplateError>;

    /// Load all templates
    async fn list_templates(&self) -> Result<Vec<EmailTemplate>, StoreError>;

    /// Load one template by id, publishing [`Event::TemplateLoaded`] when
    /// it exists so observer panels can react to the selection
    async fn load_template(&self, id: &Uuid) -> Result<Option<EmailTemplate>, StoreError>;

    /// Delete a template; absence is not an error
    async fn delete_template(&self, id: &Uuid) -> Result<(), StoreError>;
}

#[cfg(test)]
mock! {
    pub TemplateService {}

    impl Clone for TemplateService {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl TemplateService for TemplateService {
        async fn save_template(&self, template: EmailTemplate) -> Result<EmailTemplate, SaveTemplateError>;
        async fn list_templates(&self) -> Result<Vec<EmailTemplate>, StoreError>;
        async fn load_template(&self, id: &Uuid) -> Result<Option<EmailTemplate>, StoreError>;
        async fn delete_template(&self, id: &Uuid) -> Result<(), StoreError>;
    }
}

/// Template service implementation
#[derive(Clone)]
pub struct TemplateServiceImpl<R>
where
    R: RecordStore,
{
    store: Arc<R>,
    bus: Arc<EventBus>,
}

impl<R> TemplateServiceImpl<R>
where
    R: RecordStore,
{
    /// Create a new template service
    pub fn new(store: Arc<R>, bus: Arc<EventBus>) -> Self {
        Self { store, bus }
    }
}

#[async_trait]
impl<R> TemplateService for TemplateServiceImpl<R>
where
    R: RecordStore,
{
    async fn save_template(
        &self,
        mut template: EmailTemplate,
    ) -> Result<EmailTemplate, SaveTemplateError> {
        if template.name.trim().is_empty() {
            return Err(SaveTemplateError::EmptyName);
        }
        if template.html_body.trim().is_empty() {
            return Err(SaveTemplateError::EmptyBody);
        }

        template.updated_at = Utc::now();

        match self.store.save_template(&template).await {
            Ok(()) => {
                info!(name = %template.name, "template saved");
                self.bus.publish(&Event::StatusUpdate {
                    message: format!("Template saved: {}", template.name),
                    is_error: false,
                });
            }
            Err(err) => {
                error!(name = %template.name, "failed to save template: {err}");
                self.bus.publish(&Event::StatusUpdate {
                    message: format!("Failed to save template: {err}"),
                    is_error: true,
                });
            }
        }

        Ok(template)
    }

    async fn list_templates(&self) -> Result<Vec<EmailTemplate>, StoreError> {
        self.store.load_templates().await
    }

    async fn load_template(&self, id: &Uuid) -> Result<Option<EmailTemplate>, StoreError> {
        let template = self
            .store
            .load_templates()
            .await?
            .into_iter()
            .find(|template| template.id == *id);

        if let Some(template) = &template {
            self.bus.publish(&Event::TemplateLoaded(template.clone()));
        }

        Ok(template)
    }

    async fn delete_template(&self, id: &Uuid) -> Result<(), StoreError> {
        self.store.delete_template(id).await?;

        info!(%id, "template deleted");
        self.bus.publish(&Event::StatusUpdate {
            message: "Template deleted".to_string(),
            is_error: false,
        });

        Ok(())
    }
}

impl<R> fmt::Debug for TemplateServiceImpl<R>
where
    R: RecordStore,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateServiceImpl")
            .field("store", &"RecordStore")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use testresult::TestResult;

    use crate::domain::{events::EventKind, records::tests::MockRecordStore};

    use super::*;

    fn template() -> EmailTemplate {
        EmailTemplate::new(
            "Welcome".to_string(),
            "Welcome aboard".to_string(),
            "<h1>Welcome</h1>".to_string(),
        )
    }

    fn capture(bus: &EventBus, kind: EventKind) -> Arc<Mutex<Vec<Event>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);

        bus.subscribe(kind, move |event| {
            sink.lock().unwrap().push(event.clone());
            Ok(())
        });

        events
    }

    #[tokio::test]
    async fn test_save_template_refreshes_updated_at_and_publishes_status() -> TestResult {
        let template = template();
        let created_at = template.created_at;

        let mut store = MockRecordStore::new();
        store
            .expect_save_template()
            .times(1)
            .withf(|saved| saved.name == "Welcome")
            .returning(|_| Ok(()));

        let bus = Arc::new(EventBus::new());
        let events = capture(&bus, EventKind::StatusUpdate);

        let service = TemplateServiceImpl::new(Arc::new(store), bus);

        let saved = service.save_template(template).await?;

        assert!(saved.updated_at >= created_at);
        assert_eq!(saved.created_at, created_at);

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            Event::StatusUpdate { is_error: false, .. }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_save_template_requires_name() {
        let mut store = MockRecordStore::new();
        store.expect_save_template().times(0);

        let bus = Arc::new(EventBus::new());
        let service = TemplateServiceImpl::new(Arc::new(store), bus);

        let result = service
            .save_template(EmailTemplate::new(
                "  ".to_string(),
                "s".to_string(),
                "<p>b</p>".to_string(),
            ))
            .await;

        assert!(matches!(result, Err(SaveTemplateError::EmptyName)));
    }

    #[tokio::test]
    async fn test_save_template_requires_body() {
        let bus = Arc::new(EventBus::new());
        let service = TemplateServiceImpl::new(Arc::new(MockRecordStore::new()), bus);

        let result = service
            .save_template(EmailTemplate::new(
                "Welcome".to_string(),
                "s".to_string(),
                "".to_string(),
            ))
            .await;

        assert!(matches!(result, Err(SaveTemplateError::EmptyBody)));
    }

    #[tokio::test]
    async fn test_save_template_store_failure_becomes_error_status() -> TestResult {
        let mut store = MockRecordStore::new();
        store
            .expect_save_template()
            .times(1)
            .returning(|_| Err(StoreError::Io(std::io::Error::other("disk full"))));

        let bus = Arc::new(EventBus::new());
        let events = capture(&bus, EventKind::StatusUpdate);

        let service = TemplateServiceImpl::new(Arc::new(store), bus);

        service.save_template(template()).await?;

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            Event::StatusUpdate { is_error: true, .. }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_load_template_publishes_template_loaded() -> TestResult {
        let template = template();
        let id = template.id;
        let stored = template.clone();

        let mut store = MockRecordStore::new();
        store
            .expect_load_templates()
            .times(1)
            .returning(move || Ok(vec![stored.clone()]));

        let bus = Arc::new(EventBus::new());
        let events = capture(&bus, EventKind::TemplateLoaded);

        let service = TemplateServiceImpl::new(Arc::new(store), bus);

        let loaded = service.load_template(&id).await?;

        assert_eq!(loaded, Some(template.clone()));
        assert_eq!(
            *events.lock().unwrap(),
            vec![Event::TemplateLoaded(template)]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_load_template_missing_yields_none_and_no_event() -> TestResult {
        let mut store = MockRecordStore::new();
        store
            .expect_load_templates()
            .times(1)
            .returning(|| Ok(Vec::new()));

        let bus = Arc::new(EventBus::new());
        let events = capture(&bus, EventKind::TemplateLoaded);

        let service = TemplateServiceImpl::new(Arc::new(store), bus);

        let loaded = service.load_template(&Uuid::now_v7()).await?;

        assert!(loaded.is_none());
        assert!(events.lock().unwrap().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_template_delegates_and_publishes_status() -> TestResult {
        let id = Uuid::now_v7();

        let mut store = MockRecordStore::new();
        store
            .expect_delete_template()
            .times(1)
            .withf(move |deleted| *deleted == id)
            .returning(|_| Ok(()));

        let bus = Arc::new(EventBus::new());
        let events = capture(&bus, EventKind::StatusUpdate);

        let service = TemplateServiceImpl::new(Arc::new(store), bus);

        service.delete_template(&id).await?;

        assert_eq!(events.lock().unwrap().len(), 1);

        Ok(())
    }
}
