//! Timer-driven dashboard services.
//!
//! # Responsibility
//! - Host the components whose state changes on their own schedule.
//! - Keep scheduling explicit: every service owns a `TimerQueue` and is
//!   advanced by its owner with the current clock instant.

pub mod feed_service;
pub mod notification_service;
