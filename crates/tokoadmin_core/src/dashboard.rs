//! Dashboard composition root.
//!
//! # Responsibility
//! - Own one instance of every component plus the data provider and clock.
//! - Translate provider failures into logged errors and error notifications.
//! - Deliver timer firings (feed ticks, notification expiries) on `pump`.
//!
//! # Invariants
//! - Components are mutated only through `&mut self`, so a timer firing never
//!   interleaves with a recompute.
//! - A failed load leaves the affected collection and its view untouched.
//! - The loading flag is cleared on every exit path of a load.

use crate::config::DashboardConfig;
use crate::model::notification::{NotificationId, NotificationPayload};
use crate::model::record::{Record, ORDER_SCHEMA, PRODUCT_SCHEMA};
use crate::provider::{DataProvider, ProviderResult};
use crate::query::engine::{LoadError, QueryEngine};
use crate::query::pipeline::SortDirection;
use crate::schedule::clock::Clock;
use crate::service::feed_service::FeedSimulator;
use crate::service::notification_service::NotificationCenter;
use crate::shell::routes::{Navigator, ResolvedRoute, RouteError, RouteTable};
use crate::shell::state::ShellState;
use log::{error, warn};

/// Collections the dashboard loads from its provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Products,
    Orders,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Orders => "orders",
        }
    }
}

/// What one `pump` delivered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PumpReport {
    pub now_ms: i64,
    /// Feed events generated by due ticks.
    pub feed_events: usize,
    /// Notifications removed because their ttl elapsed.
    pub expired_notifications: Vec<NotificationId>,
}

/// Client-side state of the admin dashboard.
pub struct Dashboard<P: DataProvider, C: Clock> {
    config: DashboardConfig,
    provider: P,
    clock: C,
    products: QueryEngine,
    orders: QueryEngine,
    feed: FeedSimulator,
    notifications: NotificationCenter,
    shell: ShellState,
    navigator: Navigator,
}

impl<P: DataProvider, C: Clock> Dashboard<P, C> {
    pub fn new(config: DashboardConfig, provider: P, clock: C) -> Self {
        let products = QueryEngine::new(&PRODUCT_SCHEMA)
            .with_page_size(config.page_size)
            .with_sort(&config.default_sort_field, config.default_sort_direction);
        let orders = QueryEngine::new(&ORDER_SCHEMA)
            .with_page_size(config.page_size)
            .with_sort(ORDER_SCHEMA.default_sort, SortDirection::Descending);
        let feed = FeedSimulator::new(config.feed_config());
        let notifications = NotificationCenter::new(config.notification_ttl_ms);
        let shell = ShellState::new(config.theme);
        let navigator = Navigator::new(RouteTable::dashboard(config.app_title.clone()));

        Self {
            config,
            provider,
            clock,
            products,
            orders,
            feed,
            notifications,
            shell,
            navigator,
        }
    }

    /// Replaces the feed generator with a seeded one (for reproducible runs).
    pub fn with_feed_seed(mut self, seed: u64) -> Self {
        self.feed = FeedSimulator::with_seed(self.config.feed_config(), seed);
        self
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn products(&self) -> &QueryEngine {
        &self.products
    }

    pub fn products_mut(&mut self) -> &mut QueryEngine {
        &mut self.products
    }

    pub fn orders(&self) -> &QueryEngine {
        &self.orders
    }

    pub fn orders_mut(&mut self) -> &mut QueryEngine {
        &mut self.orders
    }

    pub fn feed(&self) -> &FeedSimulator {
        &self.feed
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn shell(&self) -> &ShellState {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut ShellState {
        &mut self.shell
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Fetches products from the provider and replaces the catalog.
    pub fn load_products(&mut self) -> Result<usize, LoadError> {
        self.load(Collection::Products)
    }

    /// Fetches orders from the provider and replaces the order list.
    pub fn load_orders(&mut self) -> Result<usize, LoadError> {
        self.load(Collection::Orders)
    }

    fn load(&mut self, collection: Collection) -> Result<usize, LoadError> {
        self.shell.set_loading(true);
        let fetched: ProviderResult<Vec<Record>> = match collection {
            Collection::Products => self.provider.fetch_products(),
            Collection::Orders => self.provider.fetch_orders(),
        };
        let engine = match collection {
            Collection::Products => &mut self.products,
            Collection::Orders => &mut self.orders,
        };
        let result = fetched
            .map_err(LoadError::from)
            .and_then(|records| engine.load(records));
        self.shell.set_loading(false);

        if let Err(err) = &result {
            error!(
                "event=collection_load module=dashboard status=error provider={} collection={} error={}",
                self.provider.provider_id(),
                collection.as_str(),
                err
            );
            let now_ms = self.clock.now_ms();
            self.notifications.add(
                NotificationPayload::error(
                    format!("Failed to load {}", collection.as_str()),
                    err.to_string(),
                ),
                now_ms,
            );
        }
        result
    }

    /// Starts the real-time order feed. Returns `false` when already running.
    pub fn start_feed(&mut self) -> bool {
        let now_ms = self.clock.now_ms();
        self.feed.start(now_ms)
    }

    /// Stops the real-time order feed. Returns `false` when already stopped.
    pub fn stop_feed(&mut self) -> bool {
        self.feed.stop()
    }

    /// Shows a notification that expires after the configured ttl.
    pub fn notify(&mut self, payload: NotificationPayload) -> NotificationId {
        let now_ms = self.clock.now_ms();
        self.notifications.add(payload, now_ms)
    }

    /// Dismisses a notification. Unknown or expired ids are a no-op.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        self.notifications.remove(id)
    }

    /// Delivers every timer firing due at the clock's current instant.
    pub fn pump(&mut self) -> PumpReport {
        let now_ms = self.clock.now_ms();
        PumpReport {
            now_ms,
            feed_events: self.feed.advance(now_ms),
            expired_notifications: self.notifications.advance(now_ms),
        }
    }

    /// Resolves `path` and starts timing the navigation.
    pub fn navigate(&mut self, path: &str) -> Result<ResolvedRoute, RouteError> {
        let now_ms = self.clock.now_ms();
        self.navigator.begin(path, now_ms).inspect_err(|err| {
            warn!(
                "event=navigation_start module=dashboard status=error error={}",
                err
            );
        })
    }

    /// Completes the pending navigation; returns its duration in milliseconds.
    pub fn finish_navigation(&mut self) -> Option<i64> {
        let now_ms = self.clock.now_ms();
        self.navigator.complete(now_ms)
    }
}
