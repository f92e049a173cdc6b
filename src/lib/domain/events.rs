//! Typed publish/subscribe event fabric

mod bus;
mod event;

pub use bus::{EventBus, SubscriberId};
pub use event::{Event, EventKind};
