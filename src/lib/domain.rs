//! Domain layer: models, services, and the seams they depend on

pub mod emails;
pub mod events;
pub mod records;
pub mod settings;
pub mod templates;
