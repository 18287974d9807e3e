//! List-query pipeline over in-memory collections.
//!
//! # Responsibility
//! - Search, category-filter, sort and paginate one collection.
//! - Keep the derived view consistent with query state at all times.
//!
//! # See also
//! - `dashboard` for provider-backed loading.

pub mod engine;
pub mod pipeline;
