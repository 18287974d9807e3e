//! Dashboard configuration.
//!
//! # Responsibility
//! - Define tunables for paging, sorting, the order feed and notifications.
//! - Load them from JSON with per-field defaults and validate ranges.
//!
//! # Invariants
//! - A validated config has positive page size, feed interval, retention and ttl.
//! - Missing JSON fields fall back to the documented defaults.

use crate::query::engine::DEFAULT_PAGE_SIZE;
use crate::query::pipeline::SortDirection;
use crate::service::feed_service::{FeedConfig, DEFAULT_FEED_INTERVAL_MS, DEFAULT_FEED_RETENTION};
use crate::service::notification_service::DEFAULT_NOTIFICATION_TTL_MS;
use crate::shell::state::Theme;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_APP_TITLE: &str = "TokoAdmin Pro";

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config JSON: {err}"),
            Self::Invalid { field, message } => write!(f, "invalid config `{field}`: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Tunables for one dashboard instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Rows per page for list views.
    pub page_size: usize,
    /// Initial product sort key.
    pub default_sort_field: String,
    pub default_sort_direction: SortDirection,
    pub feed_interval_ms: i64,
    /// Maximum retained real-time orders.
    pub feed_retention: usize,
    pub notification_ttl_ms: i64,
    pub app_title: String,
    pub theme: Theme,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            default_sort_field: "name".to_string(),
            default_sort_direction: SortDirection::Ascending,
            feed_interval_ms: DEFAULT_FEED_INTERVAL_MS,
            feed_retention: DEFAULT_FEED_RETENTION,
            notification_ttl_ms: DEFAULT_NOTIFICATION_TTL_MS,
            app_title: DEFAULT_APP_TITLE.to_string(),
            theme: Theme::Light,
        }
    }
}

impl DashboardConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(invalid("page_size", "must be greater than zero"));
        }
        if self.default_sort_field.trim().is_empty() {
            return Err(invalid("default_sort_field", "cannot be empty"));
        }
        if self.feed_interval_ms <= 0 {
            return Err(invalid("feed_interval_ms", "must be greater than zero"));
        }
        if self.feed_retention == 0 {
            return Err(invalid("feed_retention", "must be greater than zero"));
        }
        if self.notification_ttl_ms <= 0 {
            return Err(invalid("notification_ttl_ms", "must be greater than zero"));
        }
        Ok(())
    }

    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig {
            interval_ms: self.feed_interval_ms,
            retention: self.feed_retention,
        }
    }
}

fn invalid(field: &'static str, message: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        message: message.to_string(),
    }
}
