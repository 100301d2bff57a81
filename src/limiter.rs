//! Per-client sliding-window request limiter.
//!
//! Every decision runs prune, check and append under one write lock covering
//! all clients, so two requests from the same client can never both take the
//! last slot. State lives in memory only and resets on restart.

use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

pub const RATE_WINDOW: Duration = Duration::from_secs(60);
pub const RATE_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    Throttled,
}

#[derive(Default)]
struct LimiterState {
    clients: HashMap<String, VecDeque<Instant>>,
    last_sweep: Option<Instant>,
}

pub struct RateLimiter {
    limit: usize,
    window: Duration,
    state: RwLock<LimiterState>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RATE_LIMIT, RATE_WINDOW)
    }
}

impl RateLimiter {
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            state: RwLock::new(LimiterState::default()),
        }
    }

    /// Admit or reject one request from `client` arriving at `now`.
    /// Rejected requests are not recorded.
    pub fn check(&self, client: &str, now: Instant) -> Admission {
        let mut state = self.state.write();
        self.sweep_idle(&mut state, now);

        let history = state.clients.entry(client.to_string()).or_default();
        while let Some(&oldest) = history.front() {
            if now.saturating_duration_since(oldest) < self.window {
                break;
            }
            history.pop_front();
        }

        if history.len() >= self.limit {
            return Admission::Throttled;
        }
        history.push_back(now);
        Admission::Admitted
    }

    /// At most once per window, forget clients whose newest request has aged
    /// out. Their pruned history would be empty anyway.
    fn sweep_idle(&self, state: &mut LimiterState, now: Instant) {
        let due = state
            .last_sweep
            .map_or(true, |at| now.saturating_duration_since(at) >= self.window);
        if !due {
            return;
        }
        let window = self.window;
        state.clients.retain(|_, history| {
            history
                .back()
                .is_some_and(|&newest| now.saturating_duration_since(newest) < window)
        });
        state.last_sweep = Some(now);
    }

    /// Requests currently counted against `client`, as of its last check.
    pub fn tracked(&self, client: &str) -> usize {
        self.state
            .read()
            .clients
            .get(client)
            .map_or(0, VecDeque::len)
    }

    /// Number of clients with remembered history.
    pub fn client_count(&self) -> usize {
        self.state.read().clients.len()
    }
}

/// Client identity: the forwarding header when present and non-empty, else the
/// peer address. The header is trusted as-is.
pub fn client_identity(forwarded_for: Option<&str>, peer: Option<&str>) -> String {
    match forwarded_for {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => peer.unwrap_or_default().to_string(),
    }
}
