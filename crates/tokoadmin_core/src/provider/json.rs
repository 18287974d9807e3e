//! Record-of-arrays JSON provider.
//!
//! Documents look like `{"products": [{"id": 1, "name": "...", ...}]}`.
//! Fields declared by the collection schema are decoded to their declared
//! kind; undeclared scalar fields are kept as text or numbers.

use crate::model::record::{FieldKind, FieldValue, Record, RecordSchema, ID_FIELD};
use crate::model::record::{ORDER_SCHEMA, PRODUCT_SCHEMA};
use crate::provider::{DataProvider, ProviderError, ProviderResult};
use chrono::{DateTime, NaiveDateTime};
use log::{debug, error};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

const PRODUCTS_FILE_NAME: &str = "products.json";
const ORDERS_FILE_NAME: &str = "orders.json";
const NAIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Provider reading `products.json` and `orders.json` from one directory.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    data_dir: PathBuf,
}

impl JsonFileProvider {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn read_collection(
        &self,
        file_name: &str,
        schema: &'static RecordSchema,
    ) -> ProviderResult<Vec<Record>> {
        let path = self.data_dir.join(file_name);
        let text = std::fs::read_to_string(&path).map_err(|source| {
            error!(
                "event=provider_read module=provider status=error collection={} path={}",
                schema.collection,
                path.display()
            );
            ProviderError::Io {
                path: path.clone(),
                source,
            }
        })?;
        let document: Value = serde_json::from_str(&text)?;
        let records = parse_collection(&document, schema)?;
        debug!(
            "event=provider_read module=provider status=ok collection={} records={}",
            schema.collection,
            records.len()
        );
        Ok(records)
    }
}

impl DataProvider for JsonFileProvider {
    fn provider_id(&self) -> &str {
        "json_file"
    }

    fn fetch_products(&self) -> ProviderResult<Vec<Record>> {
        self.read_collection(PRODUCTS_FILE_NAME, &PRODUCT_SCHEMA)
    }

    fn fetch_orders(&self) -> ProviderResult<Vec<Record>> {
        self.read_collection(ORDERS_FILE_NAME, &ORDER_SCHEMA)
    }
}

/// Decodes the `schema.collection` array of a record-of-arrays document.
///
/// # Errors
/// - `Malformed` when the collection key is missing or not an array.
/// - `Malformed` when an item is not an object, has no integer `id`, or a
///   declared field holds a value of the wrong kind.
pub fn parse_collection(
    document: &Value,
    schema: &'static RecordSchema,
) -> ProviderResult<Vec<Record>> {
    let items = document
        .get(schema.collection)
        .and_then(Value::as_array)
        .ok_or_else(|| malformed(schema, format!("missing `{}` array", schema.collection)))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let object = item
                .as_object()
                .ok_or_else(|| malformed(schema, format!("item #{index} is not an object")))?;
            parse_record(index, object, schema)
        })
        .collect()
}

fn parse_record(
    index: usize,
    object: &Map<String, Value>,
    schema: &'static RecordSchema,
) -> ProviderResult<Record> {
    let id = object
        .get(ID_FIELD)
        .and_then(Value::as_i64)
        .ok_or_else(|| malformed(schema, format!("item #{index} has no integer `id`")))?;

    let mut record = Record::new(id);
    for (name, raw) in object {
        if name == ID_FIELD {
            continue;
        }
        let value = match schema.field_kind(name) {
            Some(kind) => Some(decode_declared(raw, kind).ok_or_else(|| {
                malformed(
                    schema,
                    format!("record {id} field `{name}` is not a {}", kind.as_str()),
                )
            })?),
            None => decode_undeclared(raw),
        };
        if let Some(value) = value {
            record.set(name.clone(), value);
        }
    }
    Ok(record)
}

fn decode_declared(raw: &Value, kind: FieldKind) -> Option<FieldValue> {
    match kind {
        FieldKind::Text => raw.as_str().map(|value| FieldValue::Text(value.to_string())),
        FieldKind::Status => raw
            .as_str()
            .map(|value| FieldValue::Status(value.to_string())),
        FieldKind::Number => raw.as_f64().map(FieldValue::Number),
        FieldKind::Timestamp => match raw {
            Value::Number(number) => number.as_i64().map(FieldValue::Timestamp),
            Value::String(text) => parse_timestamp_ms(text).map(FieldValue::Timestamp),
            _ => None,
        },
    }
}

fn decode_undeclared(raw: &Value) -> Option<FieldValue> {
    match raw {
        Value::String(text) => Some(FieldValue::Text(text.clone())),
        Value::Number(number) => number.as_f64().map(FieldValue::Number),
        Value::Bool(flag) => Some(FieldValue::Text(flag.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Parses RFC 3339 or `YYYY-MM-DD HH:MM:SS` (UTC) into epoch milliseconds.
pub fn parse_timestamp_ms(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.timestamp_millis());
    }
    NaiveDateTime::parse_from_str(trimmed, NAIVE_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc().timestamp_millis())
}

fn malformed(schema: &RecordSchema, message: String) -> ProviderError {
    ProviderError::Malformed {
        collection: schema.collection,
        message,
    }
}
