//! Data provider seam for dashboard collections.
//!
//! # Responsibility
//! - Define the fetch contract the dashboard loads products and orders through.
//! - Ship a file-backed JSON provider and an in-memory provider.
//!
//! # Invariants
//! - Providers only shape raw data into records; schema requirements are
//!   enforced by the query engine on load.
//! - Provider failures are values, never panics.

pub mod json;

use crate::model::record::Record;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub use json::{parse_collection, JsonFileProvider};

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Fetch-level failure reported by a data provider.
#[derive(Debug)]
pub enum ProviderError {
    /// Provider refused or could not serve the request.
    Unavailable(String),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json(serde_json::Error),
    /// Document parsed but does not have the record-of-arrays shape.
    Malformed {
        collection: &'static str,
        message: String,
    },
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "provider unavailable: {message}"),
            Self::Io { path, source } => {
                write!(f, "failed to read `{}`: {source}", path.display())
            }
            Self::Json(err) => write!(f, "invalid JSON: {err}"),
            Self::Malformed {
                collection,
                message,
            } => write!(f, "malformed `{collection}` document: {message}"),
        }
    }
}

impl Error for ProviderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::Unavailable(_) | Self::Malformed { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Source of raw product and order collections.
pub trait DataProvider {
    /// Short identifier used in log lines.
    fn provider_id(&self) -> &str;
    fn fetch_products(&self) -> ProviderResult<Vec<Record>>;
    fn fetch_orders(&self) -> ProviderResult<Vec<Record>>;
}

/// In-memory provider serving fixed collections, or a fixed failure.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    products: Vec<Record>,
    orders: Vec<Record>,
    failure: Option<String>,
}

impl StaticProvider {
    pub fn new(products: Vec<Record>, orders: Vec<Record>) -> Self {
        Self {
            products,
            orders,
            failure: None,
        }
    }

    /// Provider that rejects every fetch with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Makes subsequent fetches fail (`Some`) or succeed again (`None`).
    pub fn set_failure(&mut self, message: Option<String>) {
        self.failure = message;
    }

    pub fn set_products(&mut self, products: Vec<Record>) {
        self.products = products;
    }

    pub fn set_orders(&mut self, orders: Vec<Record>) {
        self.orders = orders;
    }

    fn serve(&self, records: &[Record]) -> ProviderResult<Vec<Record>> {
        match &self.failure {
            Some(message) => Err(ProviderError::Unavailable(message.clone())),
            None => Ok(records.to_vec()),
        }
    }
}

impl DataProvider for StaticProvider {
    fn provider_id(&self) -> &str {
        "static"
    }

    fn fetch_products(&self) -> ProviderResult<Vec<Record>> {
        self.serve(&self.products)
    }

    fn fetch_orders(&self) -> ProviderResult<Vec<Record>> {
        self.serve(&self.orders)
    }
}
