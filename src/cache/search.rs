use super::is_fresh;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};

pub const SEARCH_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Default)]
struct SearchState {
    entries: HashMap<String, Bytes>,
    // one timestamp for the whole map, bumped by every insert
    populated_at: Option<Instant>,
}

/// Keyed cache of serialized search responses.
///
/// Freshness is tracked for the map as a whole, not per entry: a lookup hits
/// only while the most recent insert is younger than the TTL. Every insert thus
/// extends the life of every older entry, and once the map goes stale all keys
/// miss together. The stale map is dropped by the next insert.
pub struct SearchCache {
    ttl: Duration,
    state: RwLock<SearchState>,
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::new(SEARCH_TTL)
    }
}

impl SearchCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            state: RwLock::new(SearchState::default()),
        }
    }

    pub fn key(query: &str, category: &str) -> String {
        format!("{query}:{category}")
    }

    pub fn get(&self, key: &str, now: Instant) -> Option<Bytes> {
        let state = self.state.read();
        let populated_at = state.populated_at?;
        if !is_fresh(populated_at, now, self.ttl) {
            return None;
        }
        state.entries.get(key).cloned()
    }

    pub fn put(&self, key: String, body: Bytes, now: Instant) {
        let mut state = self.state.write();
        let stale = state
            .populated_at
            .map_or(true, |at| !is_fresh(at, now, self.ttl));
        if stale {
            state.entries.clear();
        }
        state.entries.insert(key, body);
        state.populated_at = Some(now);
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: Duration = Duration::from_secs(60);

    fn body(s: &'static str) -> Bytes {
        Bytes::from_static(s.as_bytes())
    }

    #[test]
    fn key_joins_query_and_category() {
        assert_eq!(SearchCache::key("nike", ""), "nike:");
        assert_eq!(SearchCache::key("", "watches"), ":watches");
    }

    #[test]
    fn hit_within_ttl_miss_after() {
        let cache = SearchCache::default();
        let t0 = Instant::now();
        cache.put("nike:".into(), body("a"), t0);

        assert_eq!(cache.get("nike:", t0 + 4 * MIN), Some(body("a")));
        assert_eq!(cache.get("other:", t0 + MIN), None);
        assert_eq!(cache.get("nike:", t0 + 5 * MIN), None);
    }

    #[test]
    fn newer_insert_keeps_older_entries_alive() {
        let cache = SearchCache::default();
        let t0 = Instant::now();
        cache.put("k:".into(), body("k"), t0);
        cache.put("k2:".into(), body("k2"), t0 + 4 * MIN);

        // k is 6 minutes old, but the shared clock was bumped 2 minutes ago
        assert_eq!(cache.get("k:", t0 + 6 * MIN), Some(body("k")));
    }

    #[test]
    fn all_entries_expire_together() {
        let cache = SearchCache::default();
        let t0 = Instant::now();
        cache.put("k:".into(), body("k"), t0);
        let t1 = t0 + 4 * MIN;
        cache.put("k2:".into(), body("k2"), t1);

        // the shared clock is exactly one TTL old: every key misses
        assert_eq!(cache.get("k:", t1 + 5 * MIN), None);
        assert_eq!(cache.get("k2:", t1 + 5 * MIN), None);
    }

    #[test]
    fn stale_map_is_discarded_on_next_insert() {
        let cache = SearchCache::default();
        let t0 = Instant::now();
        cache.put("a:".into(), body("a"), t0);
        cache.put("b:".into(), body("b"), t0 + MIN);
        assert_eq!(cache.len(), 2);

        let later = t0 + 7 * MIN;
        cache.put("c:".into(), body("c"), later);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a:", later), None);
        assert_eq!(cache.get("c:", later), Some(body("c")));
    }
}
