//! File-backed settings store
//!
//! A single JSON file holding the flat key/value map, cached in memory and
//! flushed in full on every write. The application stays usable without it:
//! an unreadable file degrades to an empty map and the missing API key
//! surfaces later as a send-time validation error.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{error, info, warn};

use crate::domain::settings::{keys, SettingsStore};

/// File-backed settings store
#[derive(Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
    cache: Arc<RwLock<HashMap<String, String>>>,
}

impl FileSettingsStore {
    /// Open the store at `path`, loading the backing file into the cache.
    ///
    /// A missing file is created with the default keys; an unreadable one
    /// is logged and treated as no configuration.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let cache = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(map) => map,
                Err(err) => {
                    warn!("settings file {} is unreadable: {err}", path.display());
                    HashMap::new()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                let defaults = Self::defaults();
                Self::flush(&path, &defaults);
                info!("created settings file {}", path.display());
                defaults
            }
            Err(err) => {
                warn!("settings file {} is unreadable: {err}", path.display());
                HashMap::new()
            }
        };

        Self {
            path,
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    fn defaults() -> HashMap<String, String> {
        HashMap::from([
            (keys::API_KEY.to_string(), String::new()),
            (keys::SENDER_NAME.to_string(), "MyApp".to_string()),
            (
                keys::SENDER_EMAIL.to_string(),
                "no-reply@example.com".to_string(),
            ),
            (keys::DEFAULT_RECIPIENT.to_string(), String::new()),
        ])
    }

    /// Write the whole map; a failure is logged and the cached values stay
    /// applied for the rest of the session.
    fn flush(path: &Path, map: &HashMap<String, String>) {
        let json = match serde_json::to_vec_pretty(map) {
            Ok(json) => json,
            Err(err) => {
                error!("failed to serialize settings: {err}");
                return;
            }
        };

        if let Err(err) = fs::write(path, json) {
            error!("failed to persist settings to {}: {err}", path.display());
        }
    }
}

impl SettingsStore for FileSettingsStore {
    fn get(&self, key: &str) -> String {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    fn set(&self, key: &str, value: &str) {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);

        cache.insert(key.to_string(), value.to_string());
        Self::flush(&self.path, &cache);
    }

    fn remove(&self, key: &str) {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);

        cache.remove(key);
        Self::flush(&self.path, &cache);
    }

    fn clear(&self) {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);

        cache.clear();
        Self::flush(&self.path, &cache);
    }
}

impl fmt::Debug for FileSettingsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSettingsStore")
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_open_creates_backing_file_with_defaults() -> TestResult {
        let dir = TempDir::new()?;
        let path = dir.path().join("settings.json");

        let store = FileSettingsStore::open(&path);

        assert!(path.exists());
        assert_eq!(store.get(keys::SENDER_NAME), "MyApp");
        assert_eq!(store.get(keys::SENDER_EMAIL), "no-reply@example.com");
        assert_eq!(store.get(keys::API_KEY), "");

        Ok(())
    }

    #[test]
    fn test_set_persists_across_reopen() -> TestResult {
        let dir = TempDir::new()?;
        let path = dir.path().join("settings.json");

        FileSettingsStore::open(&path).set(keys::API_KEY, "re_123");

        let reopened = FileSettingsStore::open(&path);

        assert_eq!(reopened.get(keys::API_KEY), "re_123");

        Ok(())
    }

    #[test]
    fn test_unreadable_file_degrades_to_empty_configuration() -> TestResult {
        let dir = TempDir::new()?;
        let path = dir.path().join("settings.json");

        fs::write(&path, "{{{ not json")?;

        let store = FileSettingsStore::open(&path);

        assert_eq!(store.get(keys::SENDER_NAME), "");

        Ok(())
    }

    #[test]
    fn test_get_unknown_key_is_empty() -> TestResult {
        let dir = TempDir::new()?;
        let store = FileSettingsStore::open(dir.path().join("settings.json"));

        assert_eq!(store.get("no.such.key"), "");

        Ok(())
    }

    #[test]
    fn test_remove_deletes_key() -> TestResult {
        let dir = TempDir::new()?;
        let store = FileSettingsStore::open(dir.path().join("settings.json"));

        store.set(keys::API_KEY, "re_123");
        store.remove(keys::API_KEY);

        assert_eq!(store.get(keys::API_KEY), "");

        Ok(())
    }

    #[test]
    fn test_clear_empties_store_and_file() -> TestResult {
        let dir = TempDir::new()?;
        let path = dir.path().join("settings.json");

        let store = FileSettingsStore::open(&path);
        store.clear();

        assert_eq!(store.get(keys::SENDER_NAME), "");

        let reopened = FileSettingsStore::open(&path);
        assert_eq!(reopened.get(keys::SENDER_NAME), "");

        Ok(())
    }
}
