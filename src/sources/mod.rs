//! Catalog source plugins.
//!
//! This module defines the [`CatalogSource`] trait that the search controller
//! talks to. [`OpenLibrarySource`] is the production implementation; the
//! [`MockSource`] returns canned outcomes and counts requests, for tests and
//! for driving the controller without network access.

mod mock;
mod openlibrary;

pub use mock::{make_record, MockSource};
pub use openlibrary::{OpenLibrarySource, SEARCH_PATH};

use crate::models::{SearchQuery, SearchResponse};
use async_trait::async_trait;

/// The interface a catalog backend implements.
///
/// # Implementing a New Source
///
/// 1. Create a struct that implements `CatalogSource`
/// 2. Implement `name` and `search`
/// 3. Override `cover_available` if the backend can probe image URLs
#[async_trait]
pub trait CatalogSource: Send + Sync + std::fmt::Debug {
    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Search the catalog.
    ///
    /// Records are returned in upstream order. A well-formed response with no
    /// matches is `Ok` with an empty record list, not an error.
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SourceError>;

    /// Check whether an image URL can be loaded
    async fn cover_available(&self, _url: &str) -> Result<bool, SourceError> {
        Ok(true)
    }
}

/// Errors that can occur when talking to a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or transport error
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("API error: {0}")]
    Api(String),

    /// Response body could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}
