//! Deterministic scheduled-task queue.
//!
//! # Responsibility
//! - Hand out cancellable handles for one-shot and repeating tasks.
//! - Return every firing that became due up to a caller-supplied instant.
//!
//! # Invariants
//! - A cancelled handle never fires afterwards.
//! - A repeating task keeps its phase: the n-th firing is due at
//!   `scheduled_at + n * period`, even when a drain catches up several periods.
//! - Every drain terminates; a repeating task never re-arms at or before the
//!   instant it just fired.

use std::collections::BTreeMap;

/// Handle returned for every scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskHandle(u64);

impl TaskHandle {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// One firing returned by [`TimerQueue::drain_due`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredTask<T> {
    pub handle: TaskHandle,
    /// Instant the task was due at (not the drain instant).
    pub due_at_ms: i64,
    pub payload: T,
}

#[derive(Debug, Clone)]
struct ScheduledTask<T> {
    due_at_ms: i64,
    period_ms: Option<i64>,
    payload: T,
}

/// Queue of pending tasks keyed by handle.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    next_handle: u64,
    tasks: BTreeMap<TaskHandle, ScheduledTask<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_handle: 1,
            tasks: BTreeMap::new(),
        }
    }
}

impl<T: Clone> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `payload` to fire once, `delay_ms` after `now_ms`.
    pub fn schedule_once(&mut self, now_ms: i64, delay_ms: i64, payload: T) -> TaskHandle {
        self.insert(now_ms.saturating_add(delay_ms.max(0)), None, payload)
    }

    /// Schedules `payload` to fire every `period_ms`, first at `now_ms + period_ms`.
    ///
    /// Periods below 1 ms are raised to 1 ms.
    pub fn schedule_repeating(&mut self, now_ms: i64, period_ms: i64, payload: T) -> TaskHandle {
        let period = period_ms.max(1);
        self.insert(now_ms.saturating_add(period), Some(period), payload)
    }

    /// Cancels a pending task. Returns `false` when the handle is unknown,
    /// already fired (one-shot) or already cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        self.tasks.remove(&handle).is_some()
    }

    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.tasks.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Earliest pending due instant.
    pub fn next_due_ms(&self) -> Option<i64> {
        self.tasks.values().map(|task| task.due_at_ms).min()
    }

    /// Removes and returns every firing with `due_at <= now_ms`.
    ///
    /// Repeating tasks are re-armed by their period and can appear several
    /// times in one result when `now_ms` jumped past multiple periods.
    pub fn drain_due(&mut self, now_ms: i64) -> Vec<FiredTask<T>> {
        self.drain_due_capped(now_ms, usize::MAX)
    }

    /// Like [`TimerQueue::drain_due`], but each repeating task fires at most
    /// `max_catch_up` times (its most recent due instants, in phase).
    ///
    /// A repeating task whose next due instant would overflow `i64` is
    /// retired after its last firing.
    pub fn drain_due_capped(&mut self, now_ms: i64, max_catch_up: usize) -> Vec<FiredTask<T>> {
        self.skip_missed_periods(now_ms, max_catch_up.max(1));

        let mut fired = Vec::new();
        while let Some(handle) = self.earliest_due(now_ms) {
            let Some(task) = self.tasks.get_mut(&handle) else {
                break;
            };
            fired.push(FiredTask {
                handle,
                due_at_ms: task.due_at_ms,
                payload: task.payload.clone(),
            });
            if let Some(next_due) = task
                .period_ms
                .and_then(|period| task.due_at_ms.checked_add(period))
            {
                task.due_at_ms = next_due;
                continue;
            }
            self.tasks.remove(&handle);
        }
        fired
    }

    /// Moves every overdue repeating task forward by whole periods so that at
    /// most `max_catch_up` firings remain due at `now_ms`.
    fn skip_missed_periods(&mut self, now_ms: i64, max_catch_up: usize) {
        let max_catch_up = i128::try_from(max_catch_up).unwrap_or(i128::MAX);
        for task in self.tasks.values_mut() {
            let Some(period) = task.period_ms else {
                continue;
            };
            if task.due_at_ms > now_ms {
                continue;
            }
            let period = i128::from(period);
            let due = i128::from(task.due_at_ms);
            let missed = (i128::from(now_ms) - due) / period + 1;
            if missed <= max_catch_up {
                continue;
            }
            let skipped = due + (missed - max_catch_up) * period;
            if let Ok(skipped) = i64::try_from(skipped) {
                task.due_at_ms = skipped;
            }
        }
    }

    fn insert(&mut self, due_at_ms: i64, period_ms: Option<i64>, payload: T) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.tasks.insert(
            handle,
            ScheduledTask {
                due_at_ms,
                period_ms,
                payload,
            },
        );
        handle
    }

    fn earliest_due(&self, now_ms: i64) -> Option<TaskHandle> {
        self.tasks
            .iter()
            .filter(|(_, task)| task.due_at_ms <= now_ms)
            .min_by_key(|(handle, task)| (task.due_at_ms, **handle))
            .map(|(handle, _)| *handle)
    }
}
