//! In-process publish/subscribe hub for preference changes.
//!
//! Every publish is delivered synchronously, in registration order, to the
//! listeners registered when the publish started. A listener whose
//! subscription is released before its turn (even by another listener of the
//! same publish) is skipped. The registry lock is never held while a listener
//! runs, so listeners may subscribe, unsubscribe or publish themselves.
//!
//! Only registry access is serialized. A delivery already past its liveness
//! check on one thread still runs if another thread unsubscribes meanwhile;
//! "never called after unsubscribe" holds for publishes that start after
//! `unsubscribe` returns, which on a single thread is every later one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use crate::preference::Preference;

type Listener = Arc<dyn Fn(Preference) + Send + Sync>;

struct Entry {
    id: u64,
    live: Arc<AtomicBool>,
    listener: Listener,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<Entry>,
    latest: Option<Preference>,
}

/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct PreferenceBroadcaster {
    registry: Arc<Mutex<Registry>>,
}

impl PreferenceBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        lock_registry(&self.registry)
    }

    /// Register `listener`. It stays registered until the returned
    /// `Subscription` is unsubscribed or dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(Preference) + Send + Sync + 'static,
    {
        let mut registry = self.lock();
        let id = registry.next_id;
        registry.next_id += 1;

        let live = Arc::new(AtomicBool::new(true));
        registry.entries.push(Entry {
            id,
            live: Arc::clone(&live),
            listener: Arc::new(listener),
        });

        log::trace!("Syntax listener {} subscribed ({} live)", id, registry.entries.len());

        Subscription {
            id,
            live,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Deliver `value` to every listener registered right now.
    pub fn publish(&self, value: Preference) {
        let snapshot: Vec<(Arc<AtomicBool>, Listener)> = {
            let mut registry = self.lock();
            registry.latest = Some(value);
            registry
                .entries
                .iter()
                .map(|e| (Arc::clone(&e.live), Arc::clone(&e.listener)))
                .collect()
        };

        log::debug!("Publishing syntax preference {} to {} listeners", value, snapshot.len());

        for (live, listener) in snapshot {
            if live.load(Ordering::Acquire) {
                listener(value);
            }
        }
    }

    /// Last value published in this session, if any.
    pub fn latest(&self) -> Option<Preference> {
        self.lock().latest
    }

    pub fn listener_count(&self) -> usize {
        self.lock().entries.len()
    }
}

fn lock_registry(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    // Listeners never run under the lock, so a poisoned guard still holds a
    // consistent registry.
    registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Handle to one registered listener. Releasing it (explicitly or on drop)
/// removes exactly that listener.
#[must_use = "dropping a Subscription unsubscribes its listener"]
pub struct Subscription {
    id: u64,
    live: Arc<AtomicBool>,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Remove the listener. Calling it again has no effect.
    pub fn unsubscribe(&self) {
        if !self.live.swap(false, Ordering::AcqRel) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = lock_registry(&registry);
            registry.entries.retain(|e| e.id != self.id);
            log::trace!("Syntax listener {} unsubscribed ({} live)", self.id, registry.entries.len());
        }
    }

    pub fn is_active(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn recorder() -> (Arc<Mutex<Vec<(&'static str, Preference)>>>, impl Fn(&'static str) -> Box<dyn Fn(Preference) + Send + Sync>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_for_make = Arc::clone(&log);
        let make = move |name: &'static str| {
            let log = Arc::clone(&log_for_make);
            Box::new(move |p: Preference| log.lock().unwrap().push((name, p)))
                as Box<dyn Fn(Preference) + Send + Sync>
        };
        (log, make)
    }

    #[test]
    fn test_publish_in_registration_order() {
        let broadcaster = PreferenceBroadcaster::new();
        let (log, make) = recorder();
        let _a = broadcaster.subscribe(make("a"));
        let _b = broadcaster.subscribe(make("b"));
        let _c = broadcaster.subscribe(make("c"));

        broadcaster.publish(Preference::Es5);

        assert_eq!(
            *log.lock().unwrap(),
            vec![("a", Preference::Es5), ("b", Preference::Es5), ("c", Preference::Es5)]
        );
    }

    #[test]
    fn test_no_deduplication() {
        let broadcaster = PreferenceBroadcaster::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _sub = broadcaster.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        broadcaster.publish(Preference::EsNext);
        broadcaster.publish(Preference::EsNext);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unsubscribe_is_idempotent_and_exact() {
        let broadcaster = PreferenceBroadcaster::new();
        let (log, make) = recorder();
        let a = broadcaster.subscribe(make("a"));
        let _b = broadcaster.subscribe(make("b"));

        a.unsubscribe();
        a.unsubscribe();
        assert!(!a.is_active());
        assert_eq!(broadcaster.listener_count(), 1);

        broadcaster.publish(Preference::Es6);
        assert_eq!(*log.lock().unwrap(), vec![("b", Preference::Es6)]);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let broadcaster = PreferenceBroadcaster::new();
        let (log, make) = recorder();
        {
            let _scoped = broadcaster.subscribe(make("scoped"));
            assert_eq!(broadcaster.listener_count(), 1);
        }
        assert_eq!(broadcaster.listener_count(), 0);
        broadcaster.publish(Preference::Es5);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_removed_during_publish_is_skipped() {
        let broadcaster = PreferenceBroadcaster::new();
        let (log, make) = recorder();

        let victim: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let victim_for_killer = Arc::clone(&victim);
        let _killer = broadcaster.subscribe(move |_| {
            if let Some(sub) = victim_for_killer.lock().unwrap().take() {
                sub.unsubscribe();
            }
        });
        *victim.lock().unwrap() = Some(broadcaster.subscribe(make("victim")));

        broadcaster.publish(Preference::EsNext);

        assert!(log.lock().unwrap().is_empty());
        assert_eq!(broadcaster.listener_count(), 1);
    }

    #[test]
    fn test_added_during_publish_waits_for_next() {
        let broadcaster = PreferenceBroadcaster::new();
        let (log, make) = recorder();
        let late: Arc<Mutex<Vec<Subscription>>> = Arc::new(Mutex::new(Vec::new()));

        let hub = broadcaster.clone();
        let late_for_adder = Arc::clone(&late);
        let make = Arc::new(make);
        let make_for_adder = Arc::clone(&make);
        let _adder = broadcaster.subscribe(move |_| {
            let mut late = late_for_adder.lock().unwrap();
            if late.is_empty() {
                late.push(hub.subscribe(make_for_adder("late")));
            }
        });

        broadcaster.publish(Preference::Es5);
        assert!(log.lock().unwrap().is_empty());

        broadcaster.publish(Preference::Es6);
        assert_eq!(*log.lock().unwrap(), vec![("late", Preference::Es6)]);
    }

    #[test]
    fn test_latest_tracks_last_publish() {
        let broadcaster = PreferenceBroadcaster::new();
        assert_eq!(broadcaster.latest(), None);
        broadcaster.publish(Preference::Es5);
        broadcaster.clone().publish(Preference::EsNext);
        assert_eq!(broadcaster.latest(), Some(Preference::EsNext));
    }

    #[test]
    fn test_subscription_outlives_broadcaster() {
        let broadcaster = PreferenceBroadcaster::new();
        let sub = broadcaster.subscribe(|_| {});
        drop(broadcaster);
        sub.unsubscribe();
        assert!(!sub.is_active());
    }

    #[test]
    fn test_unsubscribe_on_other_thread_stops_later_publishes() {
        let broadcaster = PreferenceBroadcaster::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let sub = broadcaster.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        broadcaster.publish(Preference::Es5);
        std::thread::spawn(move || sub.unsubscribe())
            .join()
            .unwrap();
        broadcaster.publish(Preference::Es6);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(broadcaster.listener_count(), 0);
    }
}
