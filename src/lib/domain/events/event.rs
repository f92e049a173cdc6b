//! Event types
//!
//! A closed union: one variant per event type, dispatched by [`EventKind`].
//! Events are immutable value objects; subscribers receive them by
//! reference and clone what they keep.

use crate::domain::{emails::EmailMessage, templates::EmailTemplate};

/// An event broadcast over the [`EventBus`](super::EventBus)
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A human-readable progress or error line for the status bar
    StatusUpdate {
        /// Display text
        message: String,

        /// Whether the update reports a failure
        is_error: bool,
    },

    /// Terminal outcome of a send; failure detail rides in `message.error`
    EmailSent {
        /// The message in its terminal state
        message: EmailMessage,

        /// Whether the provider acknowledged the send
        success: bool,
    },

    /// A template was loaded for editing or application
    TemplateLoaded(EmailTemplate),
}

impl Event {
    /// The dispatch key for this event
    pub fn kind(&self) -> EventKind {
        match self {
            Event::StatusUpdate { .. } => EventKind::StatusUpdate,
            Event::EmailSent { .. } => EventKind::EmailSent,
            Event::TemplateLoaded(_) => EventKind::TemplateLoaded,
        }
    }
}

/// Dispatch key: one per [`Event`] variant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// [`Event::StatusUpdate`]
    StatusUpdate,

    /// [`Event::EmailSent`]
    EmailSent,

    /// [`Event::TemplateLoaded`]
    TemplateLoaded,
}
