//! Selector model behind the three-way syntax switch.

use std::sync::{Arc, Mutex};

use crate::broadcaster::{PreferenceBroadcaster, Subscription};
use crate::preference::Preference;
use crate::store::PreferenceStore;

/// The selected option follows every broadcast on its page, so a choice made
/// by another selector or another browser tab shows up here as well.
pub struct PreferencePanel {
    store: PreferenceStore,
    broadcaster: PreferenceBroadcaster,
    selected: Arc<Mutex<Preference>>,
    _follow: Subscription,
}

impl PreferencePanel {
    /// Seed the selection from storage. A value already broadcast in this
    /// session wins over storage, which may have failed to persist it.
    pub fn new(store: PreferenceStore, broadcaster: PreferenceBroadcaster) -> Self {
        let stored = store.get();
        let selected = Arc::new(Mutex::new(broadcaster.latest().unwrap_or(stored)));

        let follow = {
            let selected = Arc::clone(&selected);
            broadcaster.subscribe(move |value| *lock_selected(&selected) = value)
        };

        Self {
            store,
            broadcaster,
            selected,
            _follow: follow,
        }
    }

    pub fn selected(&self) -> Preference {
        *lock_selected(&self.selected)
    }

    pub fn options(&self) -> [Preference; 3] {
        Preference::all()
    }

    /// Persist and broadcast the user's choice. The broadcast happens even
    /// when persisting fails so the current page still follows the choice.
    pub fn select_variant(&self, value: Preference) {
        *lock_selected(&self.selected) = value;

        if !self.store.set(value) {
            log::info!("Syntax preference {} applies to this session only", value);
        }

        self.broadcaster.publish(value);
    }
}

fn lock_selected(selected: &Mutex<Preference>) -> std::sync::MutexGuard<'_, Preference> {
    selected.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
