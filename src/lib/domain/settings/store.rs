//! Settings store seam

#[cfg(test)]
use mockall::mock;

/// Durable string-to-string settings, cached in memory and flushed to disk
/// on every write.
///
/// Reads never fail: an absent key, a missing backing file, or an
/// unreadable one all yield the empty string, and the absence surfaces
/// later as a validation error (for example at send time, when the API key
/// turns out to be empty). A failed flush is logged and the in-memory value
/// stays applied for the rest of the session.
pub trait SettingsStore: Clone + Send + Sync + 'static {
    /// The value for `key`, or the empty string when absent
    fn get(&self, key: &str) -> String;

    /// Set `key` and flush the whole map to disk
    fn set(&self, key: &str, value: &str);

    /// Remove `key` and flush
    fn remove(&self, key: &str);

    /// Drop every key and flush
    fn clear(&self);
}

#[cfg(test)]
mock! {
    pub SettingsStore {}

    impl Clone for SettingsStore {
        fn clone(&self) -> Self;
    }

    impl SettingsStore for SettingsStore {
        fn get(&self, key: &str) -> String;
        fn set(&self, key: &str, value: &str);
        fn remove(&self, key: &str);
        fn clear(&self);
    }
}
