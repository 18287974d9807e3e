//! Query engine over one in-memory record collection.
//!
//! # Responsibility
//! - Own the source collection and its query state (search, category, sort, page).
//! - Recompute a full derived view after every state or source mutation.
//!
//! # Invariants
//! - `DerivedView` is replaced wholesale, never patched.
//! - `current_page` is the slice of `filtered_ordered` starting at
//!   `(page_index - 1) * page_size`, with at most `page_size` items.
//! - A failed `load` leaves the previous source and view untouched.
//! - Setters never fail; unknown sort fields and out-of-range pages are
//!   ignored or clamped.

use crate::model::record::{FieldValue, Record, RecordId, RecordSchema, RecordValidationError};
use crate::provider::ProviderError;
use crate::query::pipeline::{self, SortDirection};
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Failure to replace a collection.
#[derive(Debug)]
pub enum LoadError {
    /// The data provider rejected the fetch or returned unreadable data.
    Provider(ProviderError),
    /// A record lacks a required field or carries the wrong scalar kind.
    Invalid(RecordValidationError),
    /// Two records share one identity.
    DuplicateId(RecordId),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provider(err) => write!(f, "{err}"),
            Self::Invalid(err) => write!(f, "malformed record: {err}"),
            Self::DuplicateId(id) => write!(f, "duplicate record id: {id}"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Provider(err) => Some(err),
            Self::Invalid(err) => Some(err),
            Self::DuplicateId(_) => None,
        }
    }
}

impl From<ProviderError> for LoadError {
    fn from(value: ProviderError) -> Self {
        Self::Provider(value)
    }
}

impl From<RecordValidationError> for LoadError {
    fn from(value: RecordValidationError) -> Self {
        Self::Invalid(value)
    }
}

/// Query parameters owned by one engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub search_text: String,
    pub category_filter: Option<String>,
    pub sort_field: String,
    pub sort_direction: SortDirection,
    /// 1-based.
    pub page_index: usize,
    /// Always > 0.
    pub page_size: usize,
}

/// Read-only snapshot produced by the last recompute.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DerivedView {
    pub filtered_ordered: Vec<Record>,
    pub page_count: usize,
    pub page_index: usize,
    pub page_size: usize,
    pub current_page: Vec<Record>,
}

impl DerivedView {
    fn sliced(filtered_ordered: Vec<Record>, page_index: usize, page_size: usize) -> Self {
        let page_count = pipeline::page_count(filtered_ordered.len(), page_size);
        let (start, end) = pipeline::page_bounds(filtered_ordered.len(), page_index, page_size);
        let current_page = filtered_ordered[start..end].to_vec();
        Self {
            filtered_ordered,
            page_count,
            page_index,
            page_size,
            current_page,
        }
    }

    /// Number of records that passed search and category filtering.
    pub fn total(&self) -> usize {
        self.filtered_ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filtered_ordered.is_empty()
    }
}

/// Search/filter/sort/paginate engine for one collection.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    schema: &'static RecordSchema,
    source: Vec<Record>,
    state: QueryState,
    view: DerivedView,
}

impl QueryEngine {
    /// Creates an empty engine sorted ascending by the schema's default key.
    pub fn new(schema: &'static RecordSchema) -> Self {
        Self {
            schema,
            source: Vec::new(),
            state: QueryState {
                search_text: String::new(),
                category_filter: None,
                sort_field: schema.default_sort.to_string(),
                sort_direction: SortDirection::Ascending,
                page_index: 1,
                page_size: DEFAULT_PAGE_SIZE,
            },
            view: DerivedView {
                page_index: 1,
                page_size: DEFAULT_PAGE_SIZE,
                ..DerivedView::default()
            },
        }
    }

    /// Sets the initial page size (0 is raised to 1).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.set_page_size(page_size);
        self
    }

    /// Sets the initial sort. Unknown fields keep the schema default.
    pub fn with_sort(mut self, field: &str, direction: SortDirection) -> Self {
        self.set_sort_field(field);
        self.set_sort_direction(direction);
        self
    }

    pub fn schema(&self) -> &'static RecordSchema {
        self.schema
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Current derived snapshot.
    pub fn view(&self) -> &DerivedView {
        &self.view
    }

    /// Full source collection in load order.
    pub fn records(&self) -> &[Record] {
        &self.source
    }

    pub fn record(&self, id: RecordId) -> Option<&Record> {
        self.source.iter().find(|record| record.id == id)
    }

    /// Distinct category values in first-seen source order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.source
            .iter()
            .filter_map(|record| record.text(self.schema.category_field))
            .filter(|category| seen.insert(*category))
            .map(str::to_string)
            .collect()
    }

    /// Replaces the source collection after validating every record.
    ///
    /// Returns the number of loaded records. On error nothing changes.
    pub fn load(&mut self, records: Vec<Record>) -> Result<usize, LoadError> {
        let mut ids = HashSet::with_capacity(records.len());
        for record in &records {
            self.schema.validate(record)?;
            if !ids.insert(record.id) {
                return Err(LoadError::DuplicateId(record.id));
            }
        }

        let count = records.len();
        self.source = records;
        self.state.page_index = 1;
        self.recompute();
        info!(
            "event=collection_load module=query status=ok collection={} records={}",
            self.schema.collection, count
        );
        Ok(count)
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.state.search_text = text.into();
        self.state.page_index = 1;
        self.recompute();
    }

    /// Sets the exact-match category filter. `None` or `""` clears it.
    pub fn set_category_filter(&mut self, category: Option<&str>) {
        self.state.category_filter = category
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        self.state.page_index = 1;
        self.recompute();
    }

    /// Sets the sort key. Returns `false` and changes nothing for fields the
    /// schema does not declare sortable.
    pub fn set_sort_field(&mut self, field: &str) -> bool {
        if !self.schema.is_sortable(field) {
            warn!(
                "event=sort_field_ignored module=query status=skip collection={} field={}",
                self.schema.collection, field
            );
            return false;
        }
        self.state.sort_field = field.to_string();
        self.state.page_index = 1;
        self.recompute();
        true
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        self.state.sort_direction = direction;
        self.state.page_index = 1;
        self.recompute();
    }

    /// Moves to page `page_index`, clamped to `[1, max(page_count, 1)]`.
    ///
    /// Returns the effective page index. Only reslices.
    pub fn set_page_index(&mut self, page_index: usize) -> usize {
        let last = self.view.page_count.max(1);
        self.state.page_index = page_index.clamp(1, last);
        self.reslice();
        self.state.page_index
    }

    /// Changes the page size (0 is raised to 1) and returns to page 1.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.state.page_size = page_size.max(1);
        self.state.page_index = 1;
        self.reslice();
    }

    /// Shallow-merges `partial` into the record with `id`, then recomputes.
    ///
    /// Unknown ids are a no-op. An update that would break the schema is
    /// ignored. Returns whether the record changed.
    pub fn update_record(&mut self, id: RecordId, partial: &BTreeMap<String, FieldValue>) -> bool {
        let Some(index) = self.source.iter().position(|record| record.id == id) else {
            return false;
        };

        let mut updated = self.source[index].clone();
        updated.merge(partial);
        if let Err(err) = self.schema.validate(&updated) {
            warn!(
                "event=record_update module=query status=skip collection={} id={} reason={}",
                self.schema.collection, id, err
            );
            return false;
        }
        if updated == self.source[index] {
            return false;
        }

        self.source[index] = updated;
        self.recompute();
        true
    }

    /// Removes the record with `id`, then recomputes. Unknown ids are a no-op.
    pub fn delete_record(&mut self, id: RecordId) -> Option<Record> {
        let index = self.source.iter().position(|record| record.id == id)?;
        let removed = self.source.remove(index);
        self.recompute();
        Some(removed)
    }

    /// Runs search, category filter, sort and pagination from scratch.
    fn recompute(&mut self) {
        let searched = pipeline::search(self.source.iter(), self.schema, &self.state.search_text);
        let mut filtered = pipeline::filter_category(
            searched,
            self.schema,
            self.state.category_filter.as_deref(),
        );
        pipeline::sort_by_field(
            &mut filtered,
            &self.state.sort_field,
            self.state.sort_direction,
        );
        let filtered_ordered: Vec<Record> = filtered.into_iter().cloned().collect();

        let page_count = pipeline::page_count(filtered_ordered.len(), self.state.page_size);
        if self.state.page_index > page_count.max(1) {
            self.state.page_index = 1;
        }

        self.view = DerivedView::sliced(
            filtered_ordered,
            self.state.page_index,
            self.state.page_size,
        );
        debug!(
            "event=query_recompute module=query collection={} source={} filtered={} page={}/{}",
            self.schema.collection,
            self.source.len(),
            self.view.total(),
            self.view.page_index,
            self.view.page_count
        );
    }

    fn reslice(&mut self) {
        let filtered_ordered = std::mem::take(&mut self.view.filtered_ordered);
        self.view = DerivedView::sliced(
            filtered_ordered,
            self.state.page_index,
            self.state.page_size,
        );
    }
}
