//! One code example with several syntax renditions.
//!
//! Lifecycle:
//! ```text
//! Uninitialized
//!   ↓ mount (subscribe)
//! Subscribed
//!   ↓ unmount (unsubscribe)
//! Unsubscribed
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::broadcaster::{PreferenceBroadcaster, Subscription};
use crate::error::PreferenceError;
use crate::preference::Preference;
use crate::store::PreferenceStore;
use crate::variant::{resolve_index, Variant};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabGroupState {
    /// Built but not listening yet
    Uninitialized,
    /// Listening to the broadcaster
    Subscribed,
    /// Torn down; terminal
    Unsubscribed,
}

impl TabGroupState {
    pub fn can_transition_to(&self, target: TabGroupState) -> bool {
        matches!(
            (self, target),
            (TabGroupState::Uninitialized, TabGroupState::Subscribed)
                | (TabGroupState::Uninitialized, TabGroupState::Unsubscribed)
                | (TabGroupState::Subscribed, TabGroupState::Unsubscribed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TabGroupState::Uninitialized => "uninitialized",
            TabGroupState::Subscribed => "subscribed",
            TabGroupState::Unsubscribed => "unsubscribed",
        }
    }
}

impl std::fmt::Display for TabGroupState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current global preference: the last value broadcast in this session, or
/// the persisted one before anything was broadcast.
pub fn current_preference(store: &PreferenceStore, broadcaster: &PreferenceBroadcaster) -> Preference {
    broadcaster.latest().unwrap_or_else(|| store.get())
}

pub struct TabGroup {
    variants: Arc<[Variant]>,
    active: Arc<AtomicUsize>,
    state: TabGroupState,
    subscription: Option<Subscription>,
}

impl TabGroup {
    /// Build a group. At least one variant is required.
    pub fn new(variants: Vec<Variant>) -> Result<Self> {
        if variants.is_empty() {
            return Err(PreferenceError::EmptyTabGroup);
        }

        Ok(Self {
            variants: variants.into(),
            active: Arc::new(AtomicUsize::new(0)),
            state: TabGroupState::Uninitialized,
            subscription: None,
        })
    }

    fn transition_to(&mut self, target: TabGroupState) -> Result<()> {
        if !self.state.can_transition_to(target) {
            return Err(PreferenceError::InvalidTransition {
                from: self.state.to_string(),
                to: target.to_string(),
            });
        }
        log::trace!("Tab group transition {} -> {}", self.state, target);
        self.state = target;
        Ok(())
    }

    pub fn mount(&mut self, broadcaster: &PreferenceBroadcaster, current: Preference) -> Result<()> {
        self.mount_with_observer(broadcaster, current, |_| {})
    }

    /// Select the variant for `current` and start following broadcasts.
    /// `observer` receives the active index after every recomputation.
    pub fn mount_with_observer<F>(
        &mut self,
        broadcaster: &PreferenceBroadcaster,
        current: Preference,
        observer: F,
    ) -> Result<()>
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.transition_to(TabGroupState::Subscribed)?;

        self.active
            .store(resolve_index(&self.variants, current), Ordering::Release);

        let variants = Arc::clone(&self.variants);
        let active = Arc::clone(&self.active);
        self.subscription = Some(broadcaster.subscribe(move |preference| {
            let index = resolve_index(&variants, preference);
            active.store(index, Ordering::Release);
            observer(index);
        }));

        Ok(())
    }

    /// Stop following broadcasts. Safe to call more than once.
    pub fn unmount(&mut self) {
        if self.state == TabGroupState::Unsubscribed {
            return;
        }
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.state = TabGroupState::Unsubscribed;
    }

    pub fn state(&self) -> TabGroupState {
        self.state
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn labels(&self) -> Vec<Preference> {
        self.variants.iter().map(|v| v.label).collect()
    }

    pub fn active_index(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    pub fn active_variant(&self) -> &Variant {
        &self.variants[self.active_index()]
    }

    pub fn active_label(&self) -> Preference {
        self.active_variant().label
    }
}

impl Drop for TabGroup {
    fn drop(&mut self) {
        self.unmount();
    }
}
