//! Pure search/filter/sort/paginate steps used by the query engine.

use crate::model::record::{FieldValue, Record, RecordSchema};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc", alias = "ascending")]
    Ascending,
    #[serde(rename = "desc", alias = "descending")]
    Descending,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Keeps records where any searchable field contains `needle` (case-insensitive).
///
/// An empty needle keeps everything.
pub fn search<'a>(
    records: impl Iterator<Item = &'a Record>,
    schema: &RecordSchema,
    needle: &str,
) -> Vec<&'a Record> {
    if needle.is_empty() {
        return records.collect();
    }
    let needle = needle.to_lowercase();
    records
        .filter(|record| {
            schema.searchable.iter().any(|field| {
                record
                    .get(field)
                    .is_some_and(|value| value.search_text().to_lowercase().contains(&needle))
            })
        })
        .collect()
}

/// Keeps records whose category field equals `category` exactly.
pub fn filter_category<'a>(
    records: Vec<&'a Record>,
    schema: &RecordSchema,
    category: Option<&str>,
) -> Vec<&'a Record> {
    let Some(category) = category else {
        return records;
    };
    records
        .into_iter()
        .filter(|record| record.text(schema.category_field) == Some(category))
        .collect()
}

/// Stable sort by one field. Equal keys keep their prior relative order in
/// both directions.
pub fn sort_by_field(records: &mut [&Record], field: &str, direction: SortDirection) {
    records.sort_by(|left, right| {
        let ordering = compare_values(
            left.value(field).as_deref(),
            right.value(field).as_deref(),
        );
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// Orders two optional field values.
///
/// - Missing values sort before present ones.
/// - Text and status compare case-insensitively.
/// - Numbers use IEEE total order; timestamps compare as integers.
/// - Mismatched kinds fall back to a fixed kind rank.
pub fn compare_values(left: Option<&FieldValue>, right: Option<&FieldValue>) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(left), Some(right)) => match (left, right) {
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => a.cmp(b),
            (
                FieldValue::Text(a) | FieldValue::Status(a),
                FieldValue::Text(b) | FieldValue::Status(b),
            ) => a.to_lowercase().cmp(&b.to_lowercase()),
            _ => kind_rank(left).cmp(&kind_rank(right)),
        },
    }
}

fn kind_rank(value: &FieldValue) -> u8 {
    match value {
        FieldValue::Number(_) => 0,
        FieldValue::Timestamp(_) => 1,
        FieldValue::Text(_) | FieldValue::Status(_) => 2,
    }
}

/// Number of pages needed for `len` items.
pub fn page_count(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1))
}

/// Bounds of page `page_index` (1-based) inside a list of `len` items.
pub fn page_bounds(len: usize, page_index: usize, page_size: usize) -> (usize, usize) {
    let page_size = page_size.max(1);
    let start = page_index.saturating_sub(1).saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    (start, end)
}
