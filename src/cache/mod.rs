// Time-bounded caches for the menu payload and search results.
// Expiry is lazy: freshness is checked on every read and nothing sweeps in the
// background.

pub mod menu;
pub mod search;

pub use menu::{MenuCache, MENU_TTL};
pub use search::{SearchCache, SEARCH_TTL};

use std::time::{Duration, Instant};

/// A cached value and the moment it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub created_at: Instant,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T, created_at: Instant) -> Self {
        Self { value, created_at }
    }

    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        is_fresh(self.created_at, now, ttl)
    }
}

/// `now - created_at < ttl`; a clock that went backwards counts as age zero.
pub(crate) fn is_fresh(created_at: Instant, now: Instant, ttl: Duration) -> bool {
    now.saturating_duration_since(created_at) < ttl
}
