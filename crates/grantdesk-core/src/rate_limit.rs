//! Request rate limiting.
//!
//! The limiter is a capability so a shared-store implementation can replace
//! the process-local one when several instances run behind a balancer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Decides whether a keyed request may proceed.
pub trait RateLimiter: Send + Sync {
    /// Records one hit for `key` and returns true if it stays within `limit`
    /// hits per `window`.
    fn try_acquire(&self, key: &str, limit: u32, window: Duration) -> bool;
}

/// Process-local fixed-window limiter.
///
/// Counts are kept per (key, window bucket). A new bucket starts from zero,
/// so counters reset implicitly when the window rolls over. Nothing is
/// persisted and counts are not shared across processes.
#[derive(Debug, Clone, Default)]
pub struct FixedWindowLimiter {
    buckets: Arc<Mutex<HashMap<String, (u64, u32)>>>,
}

impl FixedWindowLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    fn bucket_index(now: Duration, window: Duration) -> u64 {
        let window_ms = window.as_millis().max(1);
        (now.as_millis() / window_ms) as u64
    }

    /// Same as [`RateLimiter::try_acquire`] but at an explicit instant.
    pub fn try_acquire_at(&self, key: &str, limit: u32, window: Duration, now: Duration) -> bool {
        let bucket = Self::bucket_index(now, window);

        let mut buckets = match self.buckets.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        // Drop counters from earlier windows
        buckets.retain(|_, (b, _)| *b >= bucket);

        let entry = buckets.entry(key.to_string()).or_insert((bucket, 0));
        if entry.0 != bucket {
            *entry = (bucket, 0);
        }

        if entry.1 >= limit {
            return false;
        }
        entry.1 += 1;
        true
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.buckets.lock().map(|b| b.len()).unwrap_or(0)
    }
}

impl RateLimiter for FixedWindowLimiter {
    fn try_acquire(&self, key: &str, limit: u32, window: Duration) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        self.try_acquire_at(key, limit, window, now)
    }
}
