// Fixed-window request limiter
//
// Approximate by design: counting happens in non-overlapping windows, so
// bursts are possible at window boundaries. Good enough for coarse abuse
// prevention on the analyze endpoint.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

pub const DEFAULT_WINDOW: Duration = Duration::from_millis(60_000);
pub const DEFAULT_MAX_REQUESTS: u32 = 10;

/// Map size that triggers a sweep of expired records, keeping the
/// process-lifetime map bounded.
const SWEEP_THRESHOLD: usize = 1024;

struct RateLimitRecord {
    count: u32,
    reset_at: Instant,
}

pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    records: Mutex<HashMap<String, RateLimitRecord>>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            records: Mutex::new(HashMap::new()),
        }
    }

    /// First request from a key, or any request after the window expired,
    /// resets the counter to 1; otherwise increment while under the limit.
    pub fn allow(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut records = self.records.lock();

        if records.len() >= SWEEP_THRESHOLD {
            records.retain(|_, record| now <= record.reset_at);
        }

        match records.get_mut(key) {
            Some(record) if now <= record.reset_at => {
                if record.count >= self.max_requests {
                    return false;
                }
                record.count += 1;
                true
            }
            _ => {
                records.insert(
                    key.to_string(),
                    RateLimitRecord {
                        count: 1,
                        reset_at: now + self.window,
                    },
                );
                true
            }
        }
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.records.lock().len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, DEFAULT_MAX_REQUESTS)
    }
}
