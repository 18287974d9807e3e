//! Record model and per-collection schemas.
//!
//! # Responsibility
//! - Define the scalar field vocabulary (`text|number|timestamp|status`).
//! - Describe which fields a collection requires, searches, filters and sorts.
//! - Validate records against a schema before they enter a query engine.
//!
//! # Invariants
//! - `Record::id` is unique within one collection and immutable.
//! - The `id` key is never stored inside `Record::fields`.

use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier of one record inside its collection.
pub type RecordId = i64;

/// Reserved field name carrying record identity.
pub const ID_FIELD: &str = "id";

/// Scalar kind declared by a schema for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    /// Unix epoch milliseconds.
    Timestamp,
    /// Enumerated status label, compared like text.
    Status,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Timestamp => "timestamp",
            Self::Status => "status",
        }
    }
}

/// One scalar field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    /// Unix epoch milliseconds.
    Timestamp(i64),
    Status(String),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Number(_) => FieldKind::Number,
            Self::Timestamp(_) => FieldKind::Timestamp,
            Self::Status(_) => FieldKind::Status,
        }
    }

    /// Returns the string payload for text-like values.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) | Self::Status(value) => Some(value.as_str()),
            Self::Number(_) | Self::Timestamp(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Text used for substring search.
    ///
    /// Numeric values are rendered so a SKU-like number can still match.
    pub fn search_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(value) | Self::Status(value) => Cow::Borrowed(value.as_str()),
            Self::Number(value) => Cow::Owned(value.to_string()),
            Self::Timestamp(value) => Cow::Owned(value.to_string()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// One row of a dashboard collection (product, order).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Creates an empty record with the given identity.
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter. Writes to `id` are ignored.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets one field; returns `false` when `name` is the identity field.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> bool {
        let name = name.into();
        if name == ID_FIELD {
            return false;
        }
        self.fields.insert(name, value.into());
        true
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// Returns a field value for comparisons, exposing `id` as a number.
    pub fn value(&self, name: &str) -> Option<Cow<'_, FieldValue>> {
        if name == ID_FIELD {
            return Some(Cow::Owned(FieldValue::Number(self.id as f64)));
        }
        self.get(name).map(Cow::Borrowed)
    }

    /// Shallow-merges `partial` into this record. Identity is preserved.
    ///
    /// Returns the number of fields written.
    pub fn merge(&mut self, partial: &BTreeMap<String, FieldValue>) -> usize {
        let mut written = 0;
        for (name, value) in partial {
            if self.set(name.clone(), value.clone()) {
                written += 1;
            }
        }
        written
    }
}

/// Declared field of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

/// Static description of one record collection.
#[derive(Debug, PartialEq, Eq)]
pub struct RecordSchema {
    /// Collection key in record-of-arrays JSON (`products`, `orders`).
    pub collection: &'static str,
    /// Fields every record must carry (besides `id`).
    pub required: &'static [FieldSpec],
    /// Fields scanned by case-insensitive search.
    pub searchable: &'static [&'static str],
    /// Field compared by exact category filter.
    pub category_field: &'static str,
    /// Extra undeclared fields accepted as sort keys. `id` and every
    /// required field are always accepted.
    pub sortable: &'static [&'static str],
    /// Sort key used before any explicit choice.
    pub default_sort: &'static str,
}

pub static PRODUCT_SCHEMA: RecordSchema = RecordSchema {
    collection: "products",
    required: &[
        field("name", FieldKind::Text),
        field("description", FieldKind::Text),
        field("sku", FieldKind::Text),
        field("category", FieldKind::Text),
        field("price", FieldKind::Number),
    ],
    searchable: &["name", "description", "sku"],
    category_field: "category",
    sortable: &["stock"],
    default_sort: "name",
};

pub static ORDER_SCHEMA: RecordSchema = RecordSchema {
    collection: "orders",
    required: &[
        field("customer", FieldKind::Text),
        field("total", FieldKind::Number),
        field("status", FieldKind::Status),
        field("timestamp", FieldKind::Timestamp),
    ],
    searchable: &["customer", "status"],
    category_field: "status",
    sortable: &[],
    default_sort: "timestamp",
};

impl RecordSchema {
    /// Returns the declared kind for a required field.
    pub fn field_kind(&self, name: &str) -> Option<FieldKind> {
        self.required
            .iter()
            .find(|spec| spec.name == name)
            .map(|spec| spec.kind)
    }

    /// `id`, any required field, or a listed extra field.
    pub fn is_sortable(&self, name: &str) -> bool {
        name == ID_FIELD || self.field_kind(name).is_some() || self.sortable.contains(&name)
    }

    /// Checks that `record` carries every required field with its declared kind.
    pub fn validate(&self, record: &Record) -> Result<(), RecordValidationError> {
        for spec in self.required {
            match record.get(spec.name) {
                None => {
                    return Err(RecordValidationError::MissingField {
                        record_id: record.id,
                        field: spec.name,
                    });
                }
                Some(value) if value.kind() != spec.kind => {
                    return Err(RecordValidationError::WrongKind {
                        record_id: record.id,
                        field: spec.name,
                        expected: spec.kind,
                        found: value.kind(),
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// Record-level schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    MissingField {
        record_id: RecordId,
        field: &'static str,
    },
    WrongKind {
        record_id: RecordId,
        field: &'static str,
        expected: FieldKind,
        found: FieldKind,
    },
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { record_id, field } => {
                write!(f, "record {record_id} is missing required field `{field}`")
            }
            Self::WrongKind {
                record_id,
                field,
                expected,
                found,
            } => write!(
                f,
                "record {record_id} field `{field}` must be {}, got {}",
                expected.as_str(),
                found.as_str()
            ),
        }
    }
}

impl Error for RecordValidationError {}
