//! Syntax preference synchronization
//!
//! Keeps every code example on a page showing the same JavaScript syntax
//! variant (ES5 / ES6 / ESNext). The preference is persisted through a
//! `PreferenceStore`, changed through a `PreferencePanel` and fanned out to
//! every mounted `TabGroup` by a `PreferenceBroadcaster`.
//!
//! Framework-free so it runs on the server, in tests and in the WASM
//! frontend alike.

mod broadcaster;
mod error;
mod panel;
mod preference;
mod store;
mod tab_group;
mod variant;


pub use broadcaster::{PreferenceBroadcaster, Subscription};
pub use error::{PreferenceError, StorageError};
pub use panel::PreferencePanel;
pub use preference::{Preference, PreferenceConfig, DEFAULT_STORAGE_KEY};
pub use store::{MemoryStorage, PreferenceStore, StorageBackend, UnavailableStorage};
pub use tab_group::{current_preference, TabGroup, TabGroupState};
pub use variant::{resolve_index, CodeSample, Variant};

pub type Result<T> = std::result::Result<T, PreferenceError>;
