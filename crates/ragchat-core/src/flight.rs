//! Single-flight guards.
//!
//! A key is "in flight" while an [`InFlightGuard`] for it is alive. Acquiring
//! is atomic, so at most one guard per key exists at any time; dropping the
//! guard releases the key on every exit path.

use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashSet;

/// Set of keys with an operation currently in flight.
pub struct SingleFlight<K: Eq + Hash> {
    keys: Arc<DashSet<K>>,
}

impl<K: Eq + Hash + Clone> SingleFlight<K> {
    pub fn new() -> Self {
        Self {
            keys: Arc::new(DashSet::new()),
        }
    }

    /// Claim `key`, or `None` if an operation for it is already running.
    pub fn try_acquire(&self, key: K) -> Option<InFlightGuard<K>> {
        if self.keys.insert(key.clone()) {
            Some(InFlightGuard {
                keys: Arc::clone(&self.keys),
                key,
            })
        } else {
            None
        }
    }

    pub fn is_in_flight(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<K: Eq + Hash + Clone> Default for SingleFlight<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash> Clone for SingleFlight<K> {
    fn clone(&self) -> Self {
        Self {
            keys: Arc::clone(&self.keys),
        }
    }
}

/// Proof that a key is in flight. Releases the key on drop.
pub struct InFlightGuard<K: Eq + Hash> {
    keys: Arc<DashSet<K>>,
    key: K,
}

impl<K: Eq + Hash> InFlightGuard<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

impl<K: Eq + Hash> Drop for InFlightGuard<K> {
    fn drop(&mut self) {
        self.keys.remove(&self.key);
    }
}
