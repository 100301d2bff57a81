use super::CacheEntry;
use bytes::Bytes;
use parking_lot::RwLock;
use std::time::{Duration, Instant};

pub const MENU_TTL: Duration = Duration::from_secs(10 * 60);

/// Single-slot cache for the serialized menu payload.
///
/// The lock is held only for the slot access. Builds happen outside it, so two
/// concurrent misses may both rebuild; the last `put` wins.
pub struct MenuCache {
    ttl: Duration,
    slot: RwLock<Option<CacheEntry<Bytes>>>,
}

impl Default for MenuCache {
    fn default() -> Self {
        Self::new(MENU_TTL)
    }
}

impl MenuCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    pub fn get(&self, now: Instant) -> Option<Bytes> {
        self.slot
            .read()
            .as_ref()
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .map(|entry| entry.value.clone())
    }

    pub fn put(&self, payload: Bytes, now: Instant) {
        *self.slot.write() = Some(CacheEntry::new(payload, now));
    }
}
