//! Pending-proposal registries
//!
//! Provides [`Registry`] for proposals awaiting approval and [`Proposals`],
//! the pair of independent registries the bot runs with.

use crate::record::Record;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Records awaiting approval, keyed by normalized name
///
/// Every operation takes the single lock for the duration of one map
/// operation. Values are cloned out, so callers never hold a live reference
/// into the registry.
#[derive(Debug, Default)]
pub struct Registry {
    inner: Mutex<HashMap<String, Record>>,
}

impl Registry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the proposal at `key`
    pub fn add(&self, key: impl Into<String>, record: Record) {
        let key = key.into();
        if self.inner.lock().insert(key.clone(), record).is_some() {
            tracing::debug!(%key, "replaced pending proposal");
        }
    }

    /// Get the proposal at `key` without removing it
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Record> {
        self.inner.lock().get(key).cloned()
    }

    /// Remove the proposal at `key`, returning it if present
    pub fn remove(&self, key: &str) -> Option<Record> {
        self.inner.lock().remove(key)
    }

    /// Remove the proposal at `key` only if it still equals `expected`
    ///
    /// Returns `false` and leaves the entry in place when it was replaced
    /// since `expected` was read.
    pub fn remove_if_unchanged(&self, key: &str, expected: &Record) -> bool {
        let mut inner = self.inner.lock();
        if inner.get(key) == Some(expected) {
            inner.remove(key);
            true
        } else {
            false
        }
    }

    /// Snapshot of all pending proposals, in no particular order
    #[must_use]
    pub fn list(&self) -> Vec<Record> {
        self.inner.lock().values().cloned().collect()
    }

    /// Number of pending proposals
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if nothing is pending
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

/// The two proposal registries
///
/// New-record proposals and variation proposals have disjoint key spaces and
/// separate locks. Created once at startup and shared by `Arc`.
#[derive(Debug, Default)]
pub struct Proposals {
    /// Brand-new record proposals
    pub records: Registry,
    /// Variation proposals, keyed by the target record's normalized name
    pub variations: Registry,
}

impl Proposals {
    /// Create empty registries
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
