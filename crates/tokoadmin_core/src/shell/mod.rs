//! Application shell state: layout toggles, theme and route resolution.
//!
//! # See also
//! - `dashboard::Dashboard::navigate`

pub mod routes;
pub mod state;
