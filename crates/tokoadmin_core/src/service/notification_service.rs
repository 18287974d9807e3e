//! Auto-expiring notification center.
//!
//! # Responsibility
//! - Keep transient notifications in insertion order.
//! - Expire each entry exactly `ttl_ms` after creation unless removed first.
//!
//! # Invariants
//! - Explicit removal and expiry share one idempotent `remove`.
//! - A removed entry never keeps a pending expiry timer.
//! - Ids are creation-time-derived and strictly increasing.

use crate::model::notification::{Notification, NotificationId, NotificationPayload};
use crate::schedule::timer_queue::{TaskHandle, TimerQueue};
use log::{debug, info};
use std::collections::HashMap;

pub const DEFAULT_NOTIFICATION_TTL_MS: i64 = 5_000;

/// Retained notifications plus their expiry timers.
#[derive(Debug)]
pub struct NotificationCenter {
    ttl_ms: i64,
    entries: Vec<Notification>,
    timers: TimerQueue<NotificationId>,
    expiry_handles: HashMap<NotificationId, TaskHandle>,
    last_id: NotificationId,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TTL_MS)
    }
}

impl NotificationCenter {
    /// Creates a center whose entries live `ttl_ms` (at least 1 ms).
    pub fn new(ttl_ms: i64) -> Self {
        Self {
            ttl_ms: ttl_ms.max(1),
            entries: Vec::new(),
            timers: TimerQueue::new(),
            expiry_handles: HashMap::new(),
            last_id: 0,
        }
    }

    pub fn ttl_ms(&self) -> i64 {
        self.ttl_ms
    }

    /// Retained entries, oldest first.
    pub fn notifications(&self) -> &[Notification] {
        &self.entries
    }

    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends a notification created at `now_ms` and schedules its expiry.
    pub fn add(&mut self, payload: NotificationPayload, now_ms: i64) -> NotificationId {
        let id = now_ms.max(self.last_id.saturating_add(1));
        self.last_id = id;

        let kind = payload.kind;
        self.entries.push(Notification {
            id,
            payload,
            created_at_ms: now_ms,
            ttl_ms: self.ttl_ms,
        });
        let handle = self.timers.schedule_once(now_ms, self.ttl_ms, id);
        self.expiry_handles.insert(id, handle);
        debug!(
            "event=notification_add module=notifications status=ok id={} kind={:?} retained={}",
            id,
            kind,
            self.entries.len()
        );
        id
    }

    /// Removes the entry with `id` and cancels its expiry.
    ///
    /// Missing ids are a no-op. Returns whether an entry was removed.
    pub fn remove(&mut self, id: NotificationId) -> bool {
        if let Some(handle) = self.expiry_handles.remove(&id) {
            self.timers.cancel(handle);
        }
        let Some(index) = self.entries.iter().position(|entry| entry.id == id) else {
            return false;
        };
        self.entries.remove(index);
        true
    }

    /// Removes every entry whose ttl elapsed by `now_ms`. Returns their ids.
    pub fn advance(&mut self, now_ms: i64) -> Vec<NotificationId> {
        let mut expired = Vec::new();
        for fired in self.timers.drain_due(now_ms) {
            self.expiry_handles.remove(&fired.payload);
            if self.remove(fired.payload) {
                expired.push(fired.payload);
            }
        }
        if !expired.is_empty() {
            info!(
                "event=notification_expire module=notifications status=ok expired={} retained={}",
                expired.len(),
                self.entries.len()
            );
        }
        expired
    }

    /// Removes every entry and cancels all pending expiries.
    pub fn clear(&mut self) {
        for (_, handle) in self.expiry_handles.drain() {
            self.timers.cancel(handle);
        }
        self.entries.clear();
    }
}
