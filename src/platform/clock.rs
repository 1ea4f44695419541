//! Wall-clock capability.

use chrono::{DateTime, Utc};

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system clock on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Wall-clock time derived from a fixed anchor plus tokio's monotonic clock.
///
/// Follows `tokio::time` pausing and advancing, so countdowns driven by it are
/// deterministic under `#[tokio::test(start_paused = true)]`. Must be created
/// inside a tokio runtime.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    anchor: DateTime<Utc>,
    started: tokio::time::Instant,
}

impl MonotonicClock {
    /// Anchor at the current system time.
    pub fn new() -> Self {
        Self::anchored_at(Utc::now())
    }

    pub fn anchored_at(anchor: DateTime<Utc>) -> Self {
        Self {
            anchor,
            started: tokio::time::Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = self.started.elapsed();
        chrono::Duration::from_std(elapsed)
            .ok()
            .and_then(|d| self.anchor.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}
