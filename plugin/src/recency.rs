use std::collections::HashMap;

use clansort_shared::normalize_identity;

/// Timestamp reported for players that never spoke this session.
pub const NEVER: i64 = 0;

/// Last clan-chat activity per player, keyed by canonical identity.
///
/// Entries are overwritten, never evicted; the whole map is dropped on shutdown.
#[derive(Debug, Default)]
pub struct RecencyCache {
    last_seen: HashMap<String, i64>,
}

impl RecencyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_activity(&mut self, raw_identity: &str, timestamp_ms: i64) {
        self.last_seen
            .insert(normalize_identity(raw_identity), timestamp_ms);
    }

    pub fn lookup(&self, identity: &str) -> i64 {
        self.last_seen
            .get(&normalize_identity(identity))
            .copied()
            .unwrap_or(NEVER)
    }

    pub fn len(&self) -> usize {
        self.last_seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_seen.is_empty()
    }

    pub fn clear(&mut self) {
        self.last_seen.clear();
    }
}
