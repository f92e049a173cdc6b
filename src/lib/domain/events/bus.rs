//! In-process publish/subscribe broadcaster

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, error};

use super::{Event, EventKind};

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe
pub type SubscriberId = u64;

type Handler = Arc<dyn Fn(&Event) -> anyhow::Result<()> + Send + Sync>;

/// In-process publish/subscribe broadcaster.
///
/// Dispatch is synchronous on the publishing thread: `publish` invokes every
/// handler registered for the event's kind, in registration order. A handler
/// error is logged and never stops the remaining handlers or reaches the
/// publisher. The handler list is snapshotted at publish time, so handlers
/// registered during a dispatch do not see the in-flight event.
pub struct EventBus {
    subscribers: RwLock<HashMap<EventKind, Vec<(SubscriberId, Handler)>>>,
    next_id: AtomicU64,
}

impl EventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Register a handler for one event kind.
    ///
    /// Handlers run on whichever thread publishes; a subscriber that must
    /// update single-threaded UI state is responsible for hopping back to
    /// its own context.
    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> SubscriberId
    where
        F: Fn(&Event) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(kind)
            .or_default()
            .push((id, Arc::new(handler)));

        debug!(?kind, id, "subscriber registered");

        id
    }

    /// Remove a previously registered handler; unknown ids are ignored
    pub fn unsubscribe(&self, kind: EventKind, id: SubscriberId) {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(handlers) = subscribers.get_mut(&kind) {
            handlers.retain(|(handler_id, _)| *handler_id != id);
        }

        debug!(?kind, id, "subscriber removed");
    }

    /// Deliver an event to every handler currently registered for its kind
    pub fn publish(&self, event: &Event) {
        let handlers: Vec<Handler> = {
            let subscribers = self
                .subscribers
                .read()
                .unwrap_or_else(PoisonError::into_inner);

            subscribers
                .get(&event.kind())
                .map(|handlers| handlers.iter().map(|(_, h)| Arc::clone(h)).collect())
                .unwrap_or_default()
        };

        debug!(kind = ?event.kind(), handlers = handlers.len(), "publishing event");

        for handler in handlers {
            if let Err(err) = handler(event) {
                error!(kind = ?event.kind(), "event handler failed: {err:#}");
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subscribers = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let count: usize = subscribers.values().map(Vec::len).sum();

        f.debug_struct("EventBus")
            .field("subscribers", &count)
            .finish()
    }
}
