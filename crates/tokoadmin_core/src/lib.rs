//! Client-side state core for the TokoAdmin dashboard.
//! This crate owns list queries, the real-time order feed and notifications;
//! rendering is left to the presentation layer.

pub mod config;
pub mod dashboard;
pub mod logging;
pub mod model;
pub mod provider;
pub mod query;
pub mod schedule;
pub mod service;
pub mod shell;

pub use config::{ConfigError, DashboardConfig};
pub use dashboard::{Collection, Dashboard, PumpReport};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::notification::{Notification, NotificationId, NotificationKind, NotificationPayload};
pub use model::order_event::{OrderEvent, OrderStatus};
pub use model::record::{
    FieldKind, FieldValue, Record, RecordId, RecordSchema, RecordValidationError, ORDER_SCHEMA,
    PRODUCT_SCHEMA,
};
pub use provider::{DataProvider, JsonFileProvider, ProviderError, ProviderResult, StaticProvider};
pub use query::engine::{DerivedView, LoadError, QueryEngine, QueryState};
pub use query::pipeline::SortDirection;
pub use schedule::clock::{Clock, ManualClock, SystemClock};
pub use schedule::timer_queue::{FiredTask, TaskHandle, TimerQueue};
pub use service::feed_service::{FeedConfig, FeedSimulator, FeedState};
pub use service::notification_service::NotificationCenter;
pub use shell::routes::{Navigator, ResolvedRoute, RouteDef, RouteError, RouteTable};
pub use shell::state::{ShellState, Theme};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
