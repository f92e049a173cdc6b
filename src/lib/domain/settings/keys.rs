//! Well-known settings keys

/// Provider API key
pub const API_KEY: &str = "api.key";

/// Default sender display name
pub const SENDER_NAME: &str = "sender.name";

/// Default sender address
pub const SENDER_EMAIL: &str = "sender.email";

/// Default recipient prefilled into a new message
pub const DEFAULT_RECIPIENT: &str = "default.recipient";
