//! Core data models for catalog records and search operations.

mod record;
mod search;

pub use record::{CatalogRecord, SearchResponse};
pub use search::{SearchCategory, SearchQuery, SearchRequest, PAGE_SIZE};
