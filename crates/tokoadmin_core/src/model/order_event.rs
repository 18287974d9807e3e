//! Real-time order feed event model.
//!
//! # Invariants
//! - `id` is strictly increasing across events of one feed.
//! - `created_at_ms` is the scheduled tick time, not the wall time of delivery.

use serde::{Deserialize, Serialize};

/// Status labels a synthesized order can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
}

impl OrderStatus {
    /// Every status, in declaration order. Synthesis draws uniformly from this set.
    pub const ALL: [OrderStatus; 3] = [Self::Pending, Self::Processing, Self::Shipped];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
        }
    }
}

/// One synthesized order observed by the real-time feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderEvent {
    /// Time-derived, monotonic identifier.
    pub id: i64,
    pub customer: String,
    /// Order total in whole currency units.
    pub total: u32,
    pub status: OrderStatus,
    /// Unix epoch milliseconds.
    pub created_at_ms: i64,
}
