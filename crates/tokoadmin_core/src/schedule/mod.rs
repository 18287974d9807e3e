//! Explicit time and scheduled-task primitives.
//!
//! # Responsibility
//! - Abstract "now" behind [`clock::Clock`] so tests drive time with [`clock::ManualClock`].
//! - Provide [`timer_queue::TimerQueue`], a deterministic one-shot/repeating task queue.
//!
//! # Invariants
//! - Nothing in this module spawns threads or sleeps; firings are pulled by callers.
//! - Firings are delivered in `(due_at, handle)` order.

pub mod clock;
pub mod timer_queue;
