//! Per-object exponential backoff for requeues while waiting on the DBaaS API

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// First requeue delay
pub const BACKOFF_BASE: Duration = Duration::from_secs(30);
/// Longest requeue delay
pub const BACKOFF_MAX: Duration = Duration::from_secs(30 * 60);

/// Delay doubles with every consecutive requeue of the same key
pub struct RequeueBackoff {
    base: Duration,
    max: Duration,
    failures: Mutex<HashMap<String, u32>>,
}

impl Default for RequeueBackoff {
    fn default() -> Self {
        Self::new(BACKOFF_BASE, BACKOFF_MAX)
    }
}

impl RequeueBackoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max,
            failures: Mutex::new(HashMap::new()),
        }
    }

    /// Record a requeue of `key` and return how long to wait
    pub fn next_delay(&self, key: &str) -> Duration {
        let mut failures = self.failures.lock().unwrap_or_else(PoisonError::into_inner);
        let attempts = failures.entry(key.to_string()).or_insert(0);
        let delay = self.delay_for(*attempts);
        *attempts = attempts.saturating_add(1);
        delay
    }

    /// Forget the requeue history of `key`
    pub fn reset(&self, key: &str) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    fn delay_for(&self, attempts: u32) -> Duration {
        2u32.checked_pow(attempts)
            .and_then(|factor| self.base.checked_mul(factor))
            .map_or(self.max, |delay| delay.min(self.max))
    }
}
