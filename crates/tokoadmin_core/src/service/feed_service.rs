//! Simulated real-time order feed.
//!
//! # Responsibility
//! - Synthesize one order event per interval while running.
//! - Retain the most recent events, newest first.
//!
//! # Invariants
//! - At most one repeating timer exists; `start` while running is a no-op.
//! - `events().len() <= retention` after every tick; index 0 is the newest.
//! - Eviction past the retention bound is the only deletion path.
//! - One `advance` synthesizes at most `retention` events.

use crate::model::order_event::{OrderEvent, OrderStatus};
use crate::schedule::timer_queue::{TaskHandle, TimerQueue};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

pub const DEFAULT_FEED_INTERVAL_MS: i64 = 3_000;
pub const DEFAULT_FEED_RETENTION: usize = 20;

const CUSTOMER_NUMBER_RANGE: std::ops::Range<u32> = 0..1_000;
const ORDER_TOTAL_RANGE: std::ops::Range<u32> = 50..550;

/// Feed timing and retention settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedConfig {
    pub interval_ms: i64,
    pub retention: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_FEED_INTERVAL_MS,
            retention: DEFAULT_FEED_RETENTION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    Stopped,
    Running,
}

/// Timer-driven mock order generator.
pub struct FeedSimulator {
    config: FeedConfig,
    events: VecDeque<OrderEvent>,
    timers: TimerQueue<()>,
    tick_handle: Option<TaskHandle>,
    rng: StdRng,
    last_event_id: i64,
}

impl FeedSimulator {
    pub fn new(config: FeedConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Creates a simulator with a fixed seed (for reproducible testing).
    pub fn with_seed(config: FeedConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: FeedConfig, rng: StdRng) -> Self {
        let config = FeedConfig {
            interval_ms: config.interval_ms.max(1),
            retention: config.retention.max(1),
        };
        Self {
            config,
            events: VecDeque::with_capacity(config.retention + 1),
            timers: TimerQueue::new(),
            tick_handle: None,
            rng,
            last_event_id: 0,
        }
    }

    pub fn config(&self) -> FeedConfig {
        self.config
    }

    pub fn state(&self) -> FeedState {
        if self.tick_handle.is_some() {
            FeedState::Running
        } else {
            FeedState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == FeedState::Running
    }

    /// Retained events, newest first.
    pub fn events(&self) -> impl ExactSizeIterator<Item = &OrderEvent> {
        self.events.iter()
    }

    pub fn latest(&self) -> Option<&OrderEvent> {
        self.events.front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Stopped -> Running. The first event is due one interval after `now_ms`.
    ///
    /// Returns `false` when already running.
    pub fn start(&mut self, now_ms: i64) -> bool {
        if self.tick_handle.is_some() {
            debug!("event=feed_start module=feed status=skip reason=already_running");
            return false;
        }
        let handle = self
            .timers
            .schedule_repeating(now_ms, self.config.interval_ms, ());
        self.tick_handle = Some(handle);
        info!(
            "event=feed_start module=feed status=ok interval_ms={} retention={}",
            self.config.interval_ms, self.config.retention
        );
        true
    }

    /// Running -> Stopped. Retained events are kept.
    ///
    /// Returns `false` when already stopped.
    pub fn stop(&mut self) -> bool {
        let Some(handle) = self.tick_handle.take() else {
            return false;
        };
        self.timers.cancel(handle);
        info!(
            "event=feed_stop module=feed status=ok retained={}",
            self.events.len()
        );
        true
    }

    /// Fires the ticks due up to `now_ms` and returns how many events were added.
    ///
    /// After a long clock jump only the most recent `retention` ticks fire.
    pub fn advance(&mut self, now_ms: i64) -> usize {
        let fired = self.timers.drain_due_capped(now_ms, self.config.retention);
        let count = fired.len();
        for tick in fired {
            let event = self.synthesize(tick.due_at_ms);
            self.events.push_front(event);
            self.events.truncate(self.config.retention);
        }
        if let Some(handle) = self.tick_handle {
            if !self.timers.is_scheduled(handle) {
                self.tick_handle = None;
                warn!("event=feed_stop module=feed status=skip reason=clock_range_exhausted");
            }
        }
        if count > 0 {
            debug!(
                "event=feed_tick module=feed status=ok generated={} retained={}",
                count,
                self.events.len()
            );
        }
        count
    }

    fn synthesize(&mut self, created_at_ms: i64) -> OrderEvent {
        let id = created_at_ms.max(self.last_event_id.saturating_add(1));
        self.last_event_id = id;

        let customer_number = self.rng.random_range(CUSTOMER_NUMBER_RANGE);
        let total = self.rng.random_range(ORDER_TOTAL_RANGE);
        let status = OrderStatus::ALL[self.rng.random_range(0..OrderStatus::ALL.len())];
        OrderEvent {
            id,
            customer: format!("Customer {customer_number}"),
            total,
            status,
            created_at_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FeedConfig, FeedSimulator, FeedState};

    #[test]
    fn start_twice_keeps_single_timer() {
        let mut feed = FeedSimulator::with_seed(FeedConfig::default(), 7);
        assert!(feed.start(0));
        assert!(!feed.start(1_000));
        assert_eq!(feed.advance(3_000), 1);
        assert_eq!(feed.state(), FeedState::Running);
    }

    #[test]
    fn ids_stay_monotonic_when_ticks_share_a_timestamp() {
        let mut feed = FeedSimulator::with_seed(
            FeedConfig {
                interval_ms: 1,
                retention: 5,
            },
            1,
        );
        feed.start(0);
        feed.advance(3);
        let ids: Vec<i64> = feed.events().map(|event| event.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn long_clock_jump_only_synthesizes_retained_ticks() {
        let mut feed = FeedSimulator::with_seed(
            FeedConfig {
                interval_ms: 1,
                retention: 20,
            },
            11,
        );
        feed.start(0);
        assert_eq!(feed.advance(86_400_000), 20);
        assert_eq!(feed.latest().map(|event| event.created_at_ms), Some(86_400_000));
        assert_eq!(
            feed.events().last().map(|event| event.created_at_ms),
            Some(86_399_981)
        );
        assert!(feed.is_running());
    }

    #[test]
    fn feed_stops_when_the_clock_range_is_exhausted() {
        let mut feed = FeedSimulator::with_seed(FeedConfig::default(), 13);
        feed.start(i64::MAX - 1_000);
        assert_eq!(feed.advance(i64::MAX), 1);
        assert_eq!(feed.state(), FeedState::Stopped);
        assert_eq!(feed.advance(i64::MAX), 0);
        assert!(feed.start(i64::MAX));
    }

    #[test]
    fn zero_config_values_are_raised() {
        let feed = FeedSimulator::with_seed(
            FeedConfig {
                interval_ms: 0,
                retention: 0,
            },
            3,
        );
        assert_eq!(feed.config().interval_ms, 1);
        assert_eq!(feed.config().retention, 1);
    }
}
