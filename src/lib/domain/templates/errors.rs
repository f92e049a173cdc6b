//! Error types for template management

use thiserror::Error;

/// Errors that can occur when saving a template
#[derive(Debug, Error)]
pub enum SaveTemplateError {
    /// The template name is empty
    #[error("template name must not be empty")]
    EmptyName,

    /// The template body is empty
    #[error("template body must not be empty")]
    EmptyBody,
}
