//! `window.localStorage` as a preference backend.
//!
//! Every call looks the storage object up again: it can be missing (server
//! side, sandboxed iframes) or throw (private browsing, disabled cookies), and
//! both cases are reported as `StorageError` for `PreferenceStore` to absorb.

use preference::{Preference, PreferenceStore, StorageBackend, StorageError};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::SyntaxContext;

#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStorage;

fn js_error_message(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}

fn local_storage() -> Result<web_sys::Storage, StorageError> {
    let window = web_sys::window().ok_or(StorageError::Unavailable)?;
    match window.local_storage() {
        Ok(Some(storage)) => Ok(storage),
        Ok(None) => Err(StorageError::Unavailable),
        Err(e) => Err(StorageError::Read(js_error_message(&e))),
    }
}

impl StorageBackend for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        local_storage()?
            .get_item(key)
            .map_err(|e| StorageError::Read(js_error_message(&e)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        local_storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Write(js_error_message(&e)))
    }
}

/// Preference carried by a `storage` event, or `None` when the event is about
/// another key.
///
/// The browser has already persisted the value, so nothing is written back.
/// A cleared storage (`key == null`) or a removed key resets to the default;
/// garbage falls back to the default the same way `PreferenceStore::get` does.
pub fn storage_event_value(
    store: &PreferenceStore,
    key: Option<&str>,
    new_value: Option<&str>,
) -> Option<Preference> {
    match key {
        Some(key) if key == store.storage_key() => Some(
            new_value
                .map(|raw| store.parse_or_default(raw))
                .unwrap_or_else(|| store.default_preference()),
        ),
        Some(_) => None,
        None => Some(store.default_preference()),
    }
}

/// Republish preference changes made in other tabs of the same site.
///
/// The browser fires `storage` on every other document sharing the origin, so
/// the value only needs broadcasting locally.
pub fn listen_cross_document_changes(context: &SyntaxContext) {
    let Some(window) = web_sys::window() else {
        return;
    };

    let store = context.store.clone();
    let broadcaster = context.broadcaster.clone();

    let closure = Closure::wrap(Box::new(move |event: web_sys::StorageEvent| {
        let key = event.key();
        let new_value = event.new_value();
        let Some(value) = storage_event_value(&store, key.as_deref(), new_value.as_deref())
        else {
            return;
        };

        log::debug!("Syntax preference changed in another tab: {}", value);
        broadcaster.publish(value);
    }) as Box<dyn FnMut(_)>);

    if let Err(e) =
        window.add_event_listener_with_callback("storage", closure.as_ref().unchecked_ref())
    {
        log::warn!("Cross-tab syntax sync disabled: {}", js_error_message(&e));
    }
    // Lives as long as the page.
    closure.forget();
}

#[cfg(test)]
mod tests {
    use super::*;
    use preference::{MemoryStorage, PreferenceConfig};
    use std::sync::{Arc, Mutex};

    /// Counts writes so the tests can check events are never stored again.
    struct WriteCounter {
        inner: MemoryStorage,
        writes: Arc<Mutex<usize>>,
    }

    impl StorageBackend for WriteCounter {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            *self.writes.lock().unwrap() += 1;
            self.inner.set_item(key, value)
        }
    }

    fn counted_store() -> (PreferenceStore, Arc<Mutex<usize>>) {
        let writes = Arc::new(Mutex::new(0));
        let backend = WriteCounter {
            inner: MemoryStorage::new(),
            writes: Arc::clone(&writes),
        };
        (PreferenceStore::new(backend), writes)
    }

    #[test]
    fn test_matching_key_with_valid_value() {
        let (store, writes) = counted_store();
        assert_eq!(
            storage_event_value(&store, Some("language"), Some("ESNext")),
            Some(Preference::EsNext)
        );
        assert_eq!(*writes.lock().unwrap(), 0);
    }

    #[test]
    fn test_matching_key_with_garbage_uses_default() {
        let (store, writes) = counted_store();
        assert_eq!(
            storage_event_value(&store, Some("language"), Some("CoffeeScript")),
            Some(Preference::Es6)
        );
        assert_eq!(*writes.lock().unwrap(), 0);
    }

    #[test]
    fn test_removed_key_resets_to_default() {
        let (store, writes) = counted_store();
        assert_eq!(
            storage_event_value(&store, Some("language"), None),
            Some(Preference::Es6)
        );
        assert_eq!(*writes.lock().unwrap(), 0);
    }

    #[test]
    fn test_other_key_is_ignored() {
        let (store, writes) = counted_store();
        assert_eq!(storage_event_value(&store, Some("theme"), Some("ES5")), None);
        assert_eq!(*writes.lock().unwrap(), 0);
    }

    #[test]
    fn test_cleared_storage_resets_to_default() {
        let (store, writes) = counted_store();
        assert_eq!(storage_event_value(&store, None, None), Some(Preference::Es6));
        assert_eq!(*writes.lock().unwrap(), 0);
    }

    #[test]
    fn test_custom_key_and_default() {
        let store = PreferenceStore::with_config(
            MemoryStorage::new(),
            PreferenceConfig {
                storage_key: "syntax".to_string(),
                default: Preference::Es5,
            },
        );
        assert_eq!(storage_event_value(&store, Some("language"), Some("ESNext")), None);
        assert_eq!(
            storage_event_value(&store, Some("syntax"), Some("ESNext")),
            Some(Preference::EsNext)
        );
        assert_eq!(storage_event_value(&store, None, None), Some(Preference::Es5));
    }
}
