//! Time-boxed cache of admin status lookups
//!
//! Permission checks run on every moderation action; this cache keeps the
//! result of the last role lookup per identity for five minutes so repeated
//! checks do not hit the store. Entries are replaced whole (last fetch
//! wins) and the cache is advisory only, never a source of truth.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use parlor_common::Clock;

/// Freshness window for cached admin status
pub const STATUS_TTL_MILLIS: i64 = 300_000;

/// Cached admin classification for one identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdminStatus {
    pub is_admin: bool,
    pub is_super_admin: bool,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    status: AdminStatus,
    fetched_at_millis: i64,
}

/// Per-identity admin status cache with a fixed freshness window.
///
/// Explicitly owned and injected (never a hidden singleton) so tests can
/// substitute a manual clock. Concurrent refetches on a stale key resolve
/// last-write-wins, which is sound because refetching is idempotent.
pub struct StatusCache {
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<String, Entry>>,
}

impl StatusCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the cached status iff it is still fresh
    pub fn get(&self, identity: &str) -> Option<AdminStatus> {
        let now = self.clock.now_millis();
        let entries = self.entries.read().ok()?;
        let entry = entries.get(identity)?;
        if now - entry.fetched_at_millis < STATUS_TTL_MILLIS {
            Some(entry.status)
        } else {
            None
        }
    }

    /// Record a fresh lookup, replacing any prior entry
    pub fn insert(&self, identity: &str, status: AdminStatus) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                identity.to_string(),
                Entry {
                    status,
                    fetched_at_millis: self.clock.now_millis(),
                },
            );
        }
    }

    /// Drop one identity, forcing a refetch on the next check.
    /// Called after a grant or revoke so the change is observed immediately.
    pub fn invalidate(&self, identity: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(identity);
        }
    }

    /// Drop every entry. Must be called on logout to prevent a stale
    /// identity's elevated status leaking across sessions.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}
