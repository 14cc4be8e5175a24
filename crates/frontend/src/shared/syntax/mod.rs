//! Syntax preference for code examples.
//!
//! Provides one `PreferenceStore` + `PreferenceBroadcaster` pair per page via
//! context. Code examples (`CodeTabs`) can be mounted anywhere below the
//! provider, in any number, and all follow the choice made in a
//! `SyntaxSelector`. The choice is persisted in localStorage.

mod code_tabs;
mod selector;
mod storage;

pub use code_tabs::CodeTabs;
pub use selector::SyntaxSelector;
pub use storage::BrowserStorage;

use leptos::prelude::*;
use preference::{
    current_preference, Preference, PreferenceBroadcaster, PreferenceConfig, PreferenceStore,
};

/// Syntax context type.
#[derive(Clone)]
pub struct SyntaxContext {
    pub store: PreferenceStore,
    pub broadcaster: PreferenceBroadcaster,
}

impl SyntaxContext {
    pub fn new(store: PreferenceStore, broadcaster: PreferenceBroadcaster) -> Self {
        Self { store, broadcaster }
    }

    /// Context backed by `window.localStorage`.
    pub fn browser(config: PreferenceConfig) -> Self {
        Self::new(
            PreferenceStore::with_config(BrowserStorage, config),
            PreferenceBroadcaster::new(),
        )
    }

    /// Preference a newly mounted example should start with.
    pub fn current(&self) -> Preference {
        current_preference(&self.store, &self.broadcaster)
    }
}

/// Provides syntax context to children components.
#[component]
pub fn SyntaxProvider(
    /// Storage key and default variant
    #[prop(optional)]
    config: Option<PreferenceConfig>,
    children: Children,
) -> impl IntoView {
    let context = SyntaxContext::browser(config.unwrap_or_default());
    log::debug!(
        "Syntax preference '{}' starts as {}",
        context.store.storage_key(),
        context.current()
    );

    storage::listen_cross_document_changes(&context);
    provide_context(context);

    children()
}

/// Hook to use the syntax context.
pub fn use_syntax() -> SyntaxContext {
    use_context::<SyntaxContext>()
        .expect("SyntaxContext not found. Wrap the page with SyntaxProvider.")
}
