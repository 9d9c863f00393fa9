//! Per-client request governor for the search operation
//!
//! Counts requests per client in fixed windows. A window starts at the
//! client's first request; once the count passes the cap every request is
//! denied until the window has fully elapsed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Configuration for the governor
#[derive(Debug, Clone)]
pub struct GovernorConfig {
    /// Requests allowed per client per window (default: 10)
    pub max_requests: u32,
    /// Window length (default: 1 hour)
    pub window: Duration,
    /// Maximum number of tracked clients before eviction (default: 10 000)
    pub max_clients: usize,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60 * 60),
            max_clients: 10_000,
        }
    }
}

/// Counter state for one client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateWindowEntry {
    pub count: u32,
    pub window_start: DateTime<Utc>,
}

/// Outcome of an admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny {
        /// Whole seconds until the window resets, at least 1
        retry_after_seconds: u64,
        /// When the client's window ends
        reset_at: DateTime<Utc>,
    },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Bounded map of client windows
///
/// Shared across requests; every access goes through one lock.
#[derive(Debug)]
pub struct RateStore {
    entries: Mutex<HashMap<String, RateWindowEntry>>,
    max_clients: usize,
}

impl RateStore {
    pub fn new(max_clients: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_clients: max_clients.max(1),
        }
    }

    /// Number of tracked clients
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of one client's window
    pub fn get(&self, client_id: &str) -> Option<RateWindowEntry> {
        self.lock().get(client_id).copied()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, RateWindowEntry>> {
        // A poisoned map still holds valid counters
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Gatekeeper for the search operation
pub struct RateGovernor {
    max_requests: u32,
    window: TimeDelta,
    store: RateStore,
    clock: Arc<dyn Clock>,
}

impl RateGovernor {
    /// Create a governor with an empty store and the system clock
    pub fn new(config: GovernorConfig) -> Self {
        let store = RateStore::new(config.max_clients);
        Self::with_parts(config, store, Arc::new(SystemClock))
    }

    /// Create a governor over an explicit store and clock
    pub fn with_parts(config: GovernorConfig, store: RateStore, clock: Arc<dyn Clock>) -> Self {
        let window = TimeDelta::from_std(config.window).unwrap_or(TimeDelta::hours(1));
        Self {
            max_requests: config.max_requests,
            window,
            store,
            clock,
        }
    }

    /// Records a request from `client_id` and decides whether it may proceed
    ///
    /// The check and the increment happen under one lock, so concurrent
    /// requests from the same client are never undercounted.
    pub fn admit(&self, client_id: &str) -> Decision {
        let now = self.clock.now();
        let mut entries = self.store.lock();

        if !entries.contains_key(client_id) && entries.len() >= self.store.max_clients {
            self.evict(&mut entries, now);
        }

        let entry = entries
            .entry(client_id.to_string())
            .or_insert(RateWindowEntry {
                count: 0,
                window_start: now,
            });

        if now - entry.window_start >= self.window {
            *entry = RateWindowEntry {
                count: 0,
                window_start: now,
            };
        }

        entry.count = entry.count.saturating_add(1);

        if entry.count <= self.max_requests {
            return Decision::Allow;
        }

        let reset_at = entry.window_start + self.window;
        let remaining_ms = (reset_at - now).num_milliseconds().max(0) as u64;
        let retry_after_seconds = remaining_ms.div_ceil(1000).max(1);

        tracing::debug!(
            client = client_id,
            count = entry.count,
            retry_after_seconds,
            "request denied by rate governor"
        );

        Decision::Deny {
            retry_after_seconds,
            reset_at,
        }
    }

    /// Configured cap per window
    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Configured window length
    pub fn window(&self) -> Duration {
        self.window.to_std().unwrap_or_default()
    }

    pub fn store(&self) -> &RateStore {
        &self.store
    }

    /// Frees room for a new client: drop expired windows, then the oldest one
    ///
    /// Clients still under the cap go first, so a blocked client keeps its
    /// block unless every tracked client is blocked.
    fn evict(&self, entries: &mut HashMap<String, RateWindowEntry>, now: DateTime<Utc>) {
        let before = entries.len();
        entries.retain(|_, entry| now - entry.window_start < self.window);

        if entries.len() >= self.store.max_clients {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| (entry.count > self.max_requests, entry.window_start))
                .map(|(key, _)| key.clone());
            if let Some(key) = oldest {
                entries.remove(&key);
            }
        }

        tracing::debug!(evicted = before - entries.len(), "rate store eviction");
    }
}
