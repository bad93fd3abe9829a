// ===============================
// src/cache.rs
// ===============================
use ahash::AHashMap as HashMap;
use chrono::{DateTime, Utc};

use crate::domain::InventorySnapshot;

/// Keyed store of fetch results. Keys are the exact trimmed input string
/// (trimming happens in the service before the key is used); lookups are
/// case-sensitive. One snapshot per key, replaced in place on refresh.
///
/// There is no expiry task and no eviction: the TTL only gates reuse, and
/// the map lives for one interactive session keyed by what a user typed.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    map: HashMap<String, InventorySnapshot>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&InventorySnapshot> {
        self.map.get(key)
    }

    /// Unconditional replace.
    pub fn put(&mut self, key: impl Into<String>, snap: InventorySnapshot) {
        self.map.insert(key.into(), snap);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Staleness is evaluated lazily at read time; a snapshot exactly `ttl_secs`
/// old still counts as fresh.
pub fn is_fresh(snap: &InventorySnapshot, ttl_secs: i64, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(snap.fetched_at).num_seconds() <= ttl_secs
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn snap_at(input: &str, fetched_at: DateTime<Utc>) -> InventorySnapshot {
        InventorySnapshot {
            input: input.into(),
            fetched_at,
            rows: Vec::new(),
        }
    }

    #[test]
    fn get_misses_on_unknown_key() {
        let cache = SnapshotCache::new();
        assert!(cache.get("ST01").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn put_replaces_existing_entry() {
        let mut cache = SnapshotCache::new();
        let t0 = Utc::now();
        cache.put("ST01", snap_at("ST01", t0));
        let t1 = t0 + Duration::seconds(5);
        cache.put("ST01", snap_at("ST01", t1));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("ST01").unwrap().fetched_at, t1);
    }

    #[test]
    fn keys_are_case_sensitive() {
        let mut cache = SnapshotCache::new();
        cache.put("st01", snap_at("st01", Utc::now()));
        assert!(cache.get("ST01").is_none());
    }

    #[test]
    fn freshness_boundary_is_inclusive() {
        let now = Utc::now();
        let snap = snap_at("ST01", now - Duration::seconds(300));
        assert!(is_fresh(&snap, 300, now));
        let snap = snap_at("ST01", now - Duration::seconds(301));
        assert!(!is_fresh(&snap, 300, now));
    }
}
