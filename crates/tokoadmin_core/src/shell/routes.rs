//! Route table, document titles and navigation timing.
//!
//! # Responsibility
//! - Map dashboard paths to named pages, following redirects.
//! - Derive the document title shown for a page.
//! - Measure how long a navigation took and log it.
//!
//! # Invariants
//! - Redirect chains are bounded; a cycle resolves to `RouteError::RedirectLoop`.
//! - At most one navigation is pending; a new `begin` replaces it.

use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MAX_REDIRECTS: usize = 8;

/// One named page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDef {
    pub path: &'static str,
    pub name: &'static str,
    pub title: Option<&'static str>,
}

const fn page(path: &'static str, name: &'static str, title: &'static str) -> RouteDef {
    RouteDef {
        path,
        name,
        title: Some(title),
    }
}

const DASHBOARD_ROUTES: &[RouteDef] = &[
    page("/dashboard", "Dashboard", "Dasbor"),
    page("/products", "Products", "Manajemen Produk"),
    page("/orders", "Orders", "Manajemen Pesanan"),
    page("/customers", "Customers", "Database Pelanggan"),
    page("/analytics", "Analytics", "Analitik & Laporan"),
    page("/inventory", "Inventory", "Manajemen Inventori"),
    page("/settings", "Settings", "Pengaturan Sistem"),
];

const DASHBOARD_REDIRECTS: &[(&str, &str)] = &[("/", "/dashboard")];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    NotFound(String),
    RedirectLoop(String),
}

impl Display for RouteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "no route for `{path}`"),
            Self::RedirectLoop(path) => write!(f, "redirect loop starting at `{path}`"),
        }
    }
}

impl Error for RouteError {}

/// Result of resolving a requested path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub requested: String,
    pub route: RouteDef,
    /// Formatted `"{title} - {app}"`, or the bare app title.
    pub document_title: String,
}

/// Static routing table.
#[derive(Debug, Clone)]
pub struct RouteTable {
    app_title: String,
    routes: Vec<RouteDef>,
    redirects: Vec<(&'static str, &'static str)>,
}

impl RouteTable {
    pub fn new(
        app_title: impl Into<String>,
        routes: Vec<RouteDef>,
        redirects: Vec<(&'static str, &'static str)>,
    ) -> Self {
        Self {
            app_title: app_title.into(),
            routes,
            redirects,
        }
    }

    /// Admin dashboard pages with `/` redirecting to `/dashboard`.
    pub fn dashboard(app_title: impl Into<String>) -> Self {
        Self::new(
            app_title,
            DASHBOARD_ROUTES.to_vec(),
            DASHBOARD_REDIRECTS.to_vec(),
        )
    }

    pub fn routes(&self) -> &[RouteDef] {
        &self.routes
    }

    pub fn app_title(&self) -> &str {
        &self.app_title
    }

    /// Resolves `path` (trailing slashes ignored) to a page.
    pub fn resolve(&self, path: &str) -> Result<ResolvedRoute, RouteError> {
        let requested = normalize_path(path);
        let mut current = requested.as_str();
        for _ in 0..=MAX_REDIRECTS {
            if let Some(route) = self.routes.iter().find(|route| route.path == current) {
                return Ok(ResolvedRoute {
                    requested: requested.clone(),
                    route: *route,
                    document_title: self.document_title(route),
                });
            }
            match self.redirects.iter().find(|(from, _)| *from == current) {
                Some((_, to)) => current = *to,
                None => return Err(RouteError::NotFound(requested)),
            }
        }
        Err(RouteError::RedirectLoop(requested))
    }

    pub fn document_title(&self, route: &RouteDef) -> String {
        match route.title {
            Some(title) => format!("{title} - {}", self.app_title),
            None => self.app_title.clone(),
        }
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Tracks the current page and times navigations.
#[derive(Debug, Clone)]
pub struct Navigator {
    table: RouteTable,
    current: Option<ResolvedRoute>,
    pending: Option<(ResolvedRoute, i64)>,
    last_duration_ms: Option<i64>,
}

impl Navigator {
    pub fn new(table: RouteTable) -> Self {
        Self {
            table,
            current: None,
            pending: None,
            last_duration_ms: None,
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn current(&self) -> Option<&ResolvedRoute> {
        self.current.as_ref()
    }

    pub fn last_duration_ms(&self) -> Option<i64> {
        self.last_duration_ms
    }

    /// Resolves `path` and records the navigation start time.
    pub fn begin(&mut self, path: &str, now_ms: i64) -> Result<ResolvedRoute, RouteError> {
        let resolved = self.table.resolve(path)?;
        debug!(
            "event=navigation_start module=routes status=ok route={}",
            resolved.route.name
        );
        self.pending = Some((resolved.clone(), now_ms));
        Ok(resolved)
    }

    /// Commits the pending navigation. Returns its duration in milliseconds,
    /// or `None` when nothing was pending.
    pub fn complete(&mut self, now_ms: i64) -> Option<i64> {
        let (resolved, started_ms) = self.pending.take()?;
        let duration_ms = now_ms.saturating_sub(started_ms).max(0);
        info!(
            "event=navigation_complete module=routes status=ok route={} duration_ms={}",
            resolved.route.name, duration_ms
        );
        self.current = Some(resolved);
        self.last_duration_ms = Some(duration_ms);
        Some(duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::{Navigator, RouteDef, RouteError, RouteTable};

    #[test]
    fn root_redirects_to_dashboard() {
        let table = RouteTable::dashboard("TokoAdmin Pro");
        let resolved = table.resolve("/").expect("root should resolve");
        assert_eq!(resolved.route.name, "Dashboard");
        assert_eq!(resolved.document_title, "Dasbor - TokoAdmin Pro");
    }

    #[test]
    fn trailing_slash_and_missing_leading_slash_are_normalized() {
        let table = RouteTable::dashboard("TokoAdmin Pro");
        assert_eq!(
            table.resolve("products/").expect("products").route.name,
            "Products"
        );
    }

    #[test]
    fn unknown_path_and_loops_are_errors() {
        let table = RouteTable::dashboard("TokoAdmin Pro");
        assert_eq!(
            table.resolve("/billing"),
            Err(RouteError::NotFound("/billing".to_string()))
        );

        let looping = RouteTable::new("X", Vec::new(), vec![("/a", "/b"), ("/b", "/a")]);
        assert!(matches!(
            looping.resolve("/a"),
            Err(RouteError::RedirectLoop(_))
        ));
    }

    #[test]
    fn untitled_route_uses_app_title() {
        let table = RouteTable::new(
            "TokoAdmin Pro",
            vec![RouteDef {
                path: "/help",
                name: "Help",
                title: None,
            }],
            Vec::new(),
        );
        assert_eq!(
            table.resolve("/help").expect("help").document_title,
            "TokoAdmin Pro"
        );
    }

    #[test]
    fn navigator_measures_duration() {
        let mut navigator = Navigator::new(RouteTable::dashboard("TokoAdmin Pro"));
        assert_eq!(navigator.complete(10), None);

        navigator.begin("/orders", 100).expect("orders");
        assert_eq!(navigator.complete(142), Some(42));
        assert_eq!(
            navigator.current().map(|route| route.route.name),
            Some("Orders")
        );
    }
}
