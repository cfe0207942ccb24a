//! Reactive store for persisted user state.
//!
//! [`Store`] is an explicit context object created once at application start
//! and handed to every consumer. It owns the [`PersistedState`] (recent
//! searches and settings), persists it through a [`StorageBackend`] on every
//! mutation and notifies subscribers synchronously.
//!
//! Subscriptions are [`Subscription`] guards: dropping the guard unregisters
//! the callback, so a page that owns its guard cannot leak its listener.
//!
//! # Modules
//!
//! - `backend`: Storage trait and the in-memory backend
//! - `json`: File-per-key JSON backend with atomic writes
//! - `models`: Persisted state, settings and the merge patch
//!
//! # Example
//!
//! ```rust
//! use search_shell::store::{MemoryStorage, Store};
//!
//! let store = Store::load(Box::new(MemoryStorage::new()));
//! store.record_search("weather London");
//! assert_eq!(store.get().recent_searches, vec!["weather London"]);
//! ```

pub mod backend;
pub mod json;
pub mod models;

pub use backend::{MemoryStorage, StorageBackend};
pub use json::JsonFileStorage;
pub use models::{
    record_into, ColorScheme, PersistedState, Settings, StatePatch, MAX_RECENT_SEARCHES,
    STORAGE_KEY,
};

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Callback = Rc<RefCell<dyn FnMut(&PersistedState)>>;

struct Inner {
    state: PersistedState,
    backend: Box<dyn StorageBackend>,
    subscribers: Vec<(u64, Callback)>,
    next_id: u64,
}

/// Shared handle to the application state. Clones refer to the same store.
#[derive(Clone)]
pub struct Store {
    inner: Rc<RefCell<Inner>>,
}

impl Store {
    /// Loads the persisted state from `backend`.
    ///
    /// A missing blob, a read error or a blob that fails to parse all yield
    /// the default state; partial recovery is never attempted.
    #[must_use]
    pub fn load(backend: Box<dyn StorageBackend>) -> Self {
        let _span = tracing::debug_span!("store_load").entered();

        let state = match backend.read(STORAGE_KEY) {
            Ok(Some(blob)) => match serde_json::from_str::<PersistedState>(&blob) {
                Ok(mut state) => {
                    state.normalize();
                    tracing::debug!(
                        recent_count = state.recent_searches.len(),
                        "restored persisted state"
                    );
                    state
                }
                Err(e) => {
                    tracing::warn!(error = %e, "persisted state is corrupt, using defaults");
                    PersistedState::default()
                }
            },
            Ok(None) => {
                tracing::debug!("no persisted state, using defaults");
                PersistedState::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read persisted state, using defaults");
                PersistedState::default()
            }
        };

        Self {
            inner: Rc::new(RefCell::new(Inner {
                state,
                backend,
                subscribers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Store backed by a fresh [`MemoryStorage`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::load(Box::new(MemoryStorage::new()))
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn get(&self) -> PersistedState {
        self.inner.borrow().state.clone()
    }

    /// Runs `f` against the current state without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&PersistedState) -> R) -> R {
        f(&self.inner.borrow().state)
    }

    /// Merges `patch`, persists, then notifies every subscriber with the new
    /// full state.
    ///
    /// Persistence is best effort: a failed write is logged and otherwise
    /// ignored, the in-memory state is updated regardless.
    pub fn set(&self, patch: StatePatch) {
        let (snapshot, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            inner.state.merge(patch);
            let snapshot = inner.state.clone();

            match serde_json::to_string(&snapshot) {
                Ok(blob) => {
                    if let Err(e) = inner.backend.write(STORAGE_KEY, &blob) {
                        tracing::warn!(error = %e, "failed to persist state");
                    }
                }
                Err(e) => tracing::warn!(error = %e, "failed to serialize state"),
            }

            let callbacks: Vec<Callback> = inner
                .subscribers
                .iter()
                .map(|(_, cb)| Rc::clone(cb))
                .collect();
            (snapshot, callbacks)
        };

        tracing::trace!(subscribers = callbacks.len(), "notifying subscribers");
        for callback in callbacks {
            // A callback that re-enters `set` is not notified recursively.
            if let Ok(mut callback) = callback.try_borrow_mut() {
                (*callback)(&snapshot);
            } else {
                tracing::debug!("skipping re-entrant subscriber notification");
            }
        }
    }

    /// Registers `callback` for change notifications.
    ///
    /// The callback stays registered as long as the returned guard lives.
    pub fn subscribe(&self, callback: impl FnMut(&PersistedState) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let callback: Callback = Rc::new(RefCell::new(callback));
        inner.subscribers.push((id, callback));
        tracing::trace!(id, "subscriber registered");

        Subscription {
            id,
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Records a submitted query at the front of the recent searches.
    pub fn record_search(&self, query: &str) {
        let list = self.with(|s| record_into(&s.recent_searches, query, MAX_RECENT_SEARCHES));
        self.set(StatePatch::recent_searches(list));
    }

    /// Removes one recent search (exact match).
    pub fn remove_search(&self, query: &str) {
        let list = self.with(|s| {
            s.recent_searches
                .iter()
                .filter(|q| q.as_str() != query)
                .cloned()
                .collect()
        });
        self.set(StatePatch::recent_searches(list));
    }

    /// Clears the recent searches.
    pub fn clear_searches(&self) {
        self.set(StatePatch::recent_searches(Vec::new()));
    }

    /// Replaces the settings.
    pub fn update_settings(&self, settings: Settings) {
        self.set(StatePatch::settings(settings));
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Store")
            .field("state", &inner.state)
            .field("subscribers", &inner.subscribers.len())
            .finish_non_exhaustive()
    }
}

/// Registration guard returned by [`Store::subscribe`].
///
/// Unsubscribes when dropped.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    inner: Weak<RefCell<Inner>>,
}

impl Subscription {
    /// Unsubscribes now. Equivalent to dropping the guard.
    pub fn dispose(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        if let Ok(mut inner) = inner.try_borrow_mut() {
            inner.subscribers.retain(|(id, _)| *id != self.id);
            tracing::trace!(id = self.id, "subscriber removed");
        } else {
            tracing::warn!(id = self.id, "store busy, subscriber not removed");
        };
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::{Result, ShellError};
    use std::cell::Cell;

    struct FailingStorage;

    impl StorageBackend for FailingStorage {
        fn read(&self, _key: &str) -> Result<Option<String>> {
            Err(ShellError::Storage("disabled".into()))
        }

        fn write(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(ShellError::Storage("quota exceeded".into()))
        }
    }

    #[test]
    fn set_merges_and_persists() {
        let backend = MemoryStorage::new();
        let store = Store::load(Box::new(backend.clone()));

        let mut settings = Settings::default();
        settings.region = "fr".into();
        store.set(StatePatch::settings(settings.clone()));

        assert_eq!(store.get().settings, settings);
        let blob = backend.get(STORAGE_KEY).unwrap_or_default();
        let restored: PersistedState = serde_json::from_str(&blob).unwrap();
        assert_eq!(restored.settings, settings);

        let reloaded = Store::load(Box::new(backend));
        assert_eq!(reloaded.get().settings.region, "fr");
    }

    #[test]
    fn patch_leaves_other_fields_untouched() {
        let store = Store::in_memory();
        store.record_search("kept");
        store.update_settings(Settings {
            show_thumbnails: false,
            ..Settings::default()
        });
        assert_eq!(store.get().recent_searches, vec!["kept"]);
        assert!(!store.get().settings.show_thumbnails);
    }

    #[test]
    fn corrupt_blob_loads_defaults() {
        let backend = MemoryStorage::with_entry(STORAGE_KEY, "{not json");
        let store = Store::load(Box::new(backend));
        assert_eq!(store.get(), PersistedState::default());

        let wrong_shape = MemoryStorage::with_entry(STORAGE_KEY, r#"{"recentSearches":"oops"}"#);
        assert_eq!(Store::load(Box::new(wrong_shape)).get(), PersistedState::default());
    }

    #[test]
    fn storage_failures_are_not_fatal() {
        let store = Store::load(Box::new(FailingStorage));
        store.record_search("still works");
        assert_eq!(store.get().recent_searches, vec!["still works"]);
    }

    #[test]
    fn subscribers_receive_full_state_until_dropped() {
        let store = Store::in_memory();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let sub = store.subscribe(move |state| sink.borrow_mut().push(state.recent_searches.clone()));
        assert_eq!(store.subscriber_count(), 1);

        store.record_search("a");
        store.record_search("b");
        assert_eq!(
            *seen.borrow(),
            vec![vec!["a".to_string()], vec!["b".to_string(), "a".to_string()]]
        );

        sub.dispose();
        assert_eq!(store.subscriber_count(), 0);
        store.record_search("c");
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn guard_going_out_of_scope_unsubscribes() {
        let store = Store::in_memory();
        let count = Rc::new(Cell::new(0));
        {
            let c = Rc::clone(&count);
            let _sub = store.subscribe(move |_| c.set(c.get() + 1));
            store.record_search("a");
            assert_eq!(store.subscriber_count(), 1);
        }
        assert_eq!(store.subscriber_count(), 0);
        store.record_search("b");
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn subscriber_may_read_store_during_notification() {
        let store = Store::in_memory();
        let reader = store.clone();
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let _sub = store.subscribe(move |_| c.set(reader.get().recent_searches.len()));
        store.record_search("x");
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn recording_keeps_invariants() {
        let store = Store::in_memory();
        for i in 0..25 {
            store.record_search(&format!("q{i}"));
        }
        store.record_search("q10");
        let recent = store.get().recent_searches;
        assert_eq!(recent.len(), MAX_RECENT_SEARCHES);
        assert_eq!(recent[0], "q10");
        assert_eq!(recent.iter().filter(|q| *q == "q10").count(), 1);

        store.remove_search("q10");
        assert!(!store.get().recent_searches.contains(&"q10".to_string()));
        store.clear_searches();
        assert!(store.get().recent_searches.is_empty());
    }

    #[test]
    fn guard_outliving_store_is_harmless() {
        let store = Store::in_memory();
        let sub = store.subscribe(|_| {});
        drop(store);
        drop(sub);
    }
}
