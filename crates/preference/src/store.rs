//! Persistence of the syntax preference.
//!
//! `PreferenceStore` is the only place that talks to a storage backend, and
//! the only place that deals with the backend failing. Callers always get a
//! usable `Preference` back and never see a `StorageError`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::StorageError;
use crate::preference::{Preference, PreferenceConfig};

/// Key/value storage facility, e.g. `window.localStorage`.
pub trait StorageBackend: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Process-local storage. Used for server-side rendering and tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self
            .items
            .lock()
            .map_err(|e| StorageError::Read(e.to_string()))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self
            .items
            .lock()
            .map_err(|e| StorageError::Write(e.to_string()))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Backend for environments without persistent storage (private browsing,
/// disabled storage APIs). Every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStorage;

impl StorageBackend for UnavailableStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

#[derive(Clone)]
pub struct PreferenceStore {
    backend: Arc<dyn StorageBackend>,
    config: PreferenceConfig,
}

impl PreferenceStore {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self::with_config(backend, PreferenceConfig::default())
    }

    pub fn with_config(backend: impl StorageBackend + 'static, config: PreferenceConfig) -> Self {
        Self {
            backend: Arc::new(backend),
            config,
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.config.storage_key
    }

    pub fn default_preference(&self) -> Preference {
        self.config.default
    }

    /// Read the persisted preference. Missing, unreadable or unrecognised
    /// values all yield the configured default.
    pub fn get(&self) -> Preference {
        match self.backend.get_item(&self.config.storage_key) {
            Ok(Some(raw)) => self.parse_or_default(&raw),
            Ok(None) => self.config.default,
            Err(e) => {
                log::warn!("Reading syntax preference failed, using default: {}", e);
                self.config.default
            }
        }
    }

    /// Persist `value`. Returns whether it was actually written; a failure is
    /// logged and otherwise ignored.
    pub fn set(&self, value: Preference) -> bool {
        match self
            .backend
            .set_item(&self.config.storage_key, value.as_str())
        {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Persisting syntax preference {} skipped: {}", value, e);
                false
            }
        }
    }

    /// Parse a raw stored value, e.g. one delivered by a storage event.
    pub fn parse_or_default(&self, raw: &str) -> Preference {
        raw.parse().unwrap_or_else(|e| {
            log::warn!("Ignoring stored syntax preference: {}", e);
            self.config.default
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Backend that can be told to fail reads and/or writes.
    #[derive(Default)]
    pub(crate) struct FlakyStorage {
        pub inner: MemoryStorage,
        pub fail_reads: bool,
        pub fail_writes: bool,
    }

    impl StorageBackend for FlakyStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            if self.fail_reads {
                return Err(StorageError::Read("SecurityError".to_string()));
            }
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.fail_writes {
                return Err(StorageError::Write("QuotaExceededError".to_string()));
            }
            self.inner.set_item(key, value)
        }
    }

    #[test]
    fn test_empty_store_returns_default() {
        let store = PreferenceStore::new(MemoryStorage::new());
        assert_eq!(store.get(), Preference::Es6);
    }

    #[test]
    fn test_set_then_get() {
        let store = PreferenceStore::new(MemoryStorage::new());
        assert!(store.set(Preference::EsNext));
        assert_eq!(store.get(), Preference::EsNext);
    }

    #[test]
    fn test_writes_literal_under_configured_key() {
        let backend = Arc::new(MemoryStorage::new());
        let store = PreferenceStore {
            backend: backend.clone(),
            config: PreferenceConfig::default(),
        };
        store.set(Preference::Es5);
        assert_eq!(backend.get_item("language").unwrap().as_deref(), Some("ES5"));
    }

    #[test]
    fn test_unavailable_storage_is_absorbed() {
        let store = PreferenceStore::new(UnavailableStorage);
        assert_eq!(store.get(), Preference::Es6);
        assert!(!store.set(Preference::Es5));
        assert_eq!(store.get(), Preference::Es6);
    }

    #[test]
    fn test_read_failure_returns_default() {
        let store = PreferenceStore::new(FlakyStorage {
            fail_reads: true,
            ..Default::default()
        });
        assert!(store.set(Preference::EsNext));
        assert_eq!(store.get(), Preference::Es6);
    }

    #[test]
    fn test_garbage_value_returns_default() {
        let backend = MemoryStorage::new();
        backend.set_item("language", "CoffeeScript").unwrap();
        let store = PreferenceStore::new(backend);
        assert_eq!(store.get(), Preference::Es6);
    }

    #[test]
    fn test_custom_default() {
        let store = PreferenceStore::with_config(
            MemoryStorage::new(),
            PreferenceConfig {
                storage_key: "syntax".to_string(),
                default: Preference::Es5,
            },
        );
        assert_eq!(store.get(), Preference::Es5);
        assert_eq!(store.storage_key(), "syntax");
    }
}
