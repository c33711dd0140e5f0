//! Exact flat vector search and its on-disk form.

pub mod store;
pub mod vector;
