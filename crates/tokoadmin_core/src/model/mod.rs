//! Domain model for dashboard collections, feed events and notifications.
//!
//! # Responsibility
//! - Define the record shape consumed by list queries.
//! - Define the transient shapes produced by timers (feed events, notifications).
//!
//! # Invariants
//! - Every record carries a stable integer `id` that is never rewritten.
//! - Feed events and notifications are value snapshots; components own their lifecycle.

pub mod notification;
pub mod order_event;
pub mod record;
