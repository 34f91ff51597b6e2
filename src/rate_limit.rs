//! Per-caller request limiting in fixed one-minute buckets.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

const BUCKET_MILLIS: u64 = 60_000;

#[derive(Debug, Clone, Copy)]
struct Bucket {
    minute: u64,
    count: usize,
}

/// Accepts at most `limit` requests per caller within each wall-clock minute.
///
/// Buckets are aligned to `floor(now_ms / 60000)`, so a burst straddling a
/// minute boundary can see up to twice the limit.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    limit: usize,
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl FixedWindowLimiter {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Records a request from `caller` at the current time.
    pub fn check(&self, caller: &str) -> bool {
        self.check_at(caller, now_millis())
    }

    /// Records a request from `caller` at `now_ms`. Returns `false` when the
    /// caller is over the limit; rejected requests are not counted.
    pub fn check_at(&self, caller: &str, now_ms: u64) -> bool {
        let minute = now_ms / BUCKET_MILLIS;
        let mut buckets = match self.buckets.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        // Drop buckets from earlier minutes so idle callers don't accumulate.
        buckets.retain(|_, bucket| bucket.minute >= minute);

        let bucket = buckets
            .entry(caller.to_string())
            .or_insert(Bucket { minute, count: 0 });
        if bucket.minute != minute {
            *bucket = Bucket { minute, count: 0 };
        }
        if bucket.count >= self.limit {
            return false;
        }
        bucket.count += 1;
        true
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
