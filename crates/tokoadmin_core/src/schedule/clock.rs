//! Millisecond clocks.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Source of the current time in Unix epoch milliseconds.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Wall clock backed by `chrono::Utc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Virtual clock advanced explicitly.
///
/// Clones share the same instant, so a test can keep one handle while a
/// component owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now_ms: Arc::new(AtomicI64::new(start_ms)),
        }
    }

    /// Moves time forward by `delta_ms` and returns the new instant.
    ///
    /// Negative deltas are ignored; virtual time never runs backwards.
    pub fn advance(&self, delta_ms: i64) -> i64 {
        let delta = delta_ms.max(0);
        self.now_ms.fetch_add(delta, Ordering::SeqCst) + delta
    }

    /// Jumps to `instant_ms` if it is later than the current instant.
    pub fn set(&self, instant_ms: i64) {
        self.now_ms.fetch_max(instant_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, ManualClock, SystemClock};

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(1_000);
        let observer = clock.clone();
        assert_eq!(clock.advance(250), 1_250);
        assert_eq!(observer.now_ms(), 1_250);
    }

    #[test]
    fn manual_clock_never_moves_backwards() {
        let clock = ManualClock::new(5_000);
        clock.advance(-100);
        clock.set(4_000);
        assert_eq!(clock.now_ms(), 5_000);
        clock.set(6_000);
        assert_eq!(clock.now_ms(), 6_000);
    }

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }
}
