//! Open Library search source implementation.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::{ApiConfig, DEFAULT_BASE_URL};
use crate::models::{CatalogRecord, SearchQuery, SearchResponse};
use crate::sources::{CatalogSource, SourceError};
use crate::utils::HttpClient;

/// Path of the search endpoint relative to the catalog base URL
pub const SEARCH_PATH: &str = "/search.json";

/// Open Library catalog source
///
/// Uses the public `search.json` endpoint.
#[derive(Debug, Clone)]
pub struct OpenLibrarySource {
    http: HttpClient,
    base_url: String,
}

impl OpenLibrarySource {
    /// Create a source for the public Open Library site
    pub fn new() -> Result<Self, SourceError> {
        Ok(Self {
            http: HttpClient::new()?,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Create a source from the `[api]` configuration
    pub fn from_config(config: &ApiConfig) -> Result<Self, SourceError> {
        Ok(Self {
            http: HttpClient::from_config(config)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Point the source at a different catalog host (used against mock servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Full request URL for a query
    pub fn search_url(&self, query: &SearchQuery) -> String {
        format!("{}{}?{}", self.base_url, SEARCH_PATH, query.query_string())
    }
}

#[async_trait]
impl CatalogSource for OpenLibrarySource {
    fn name(&self) -> &str {
        "Open Library"
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SourceError> {
        let url = self.search_url(query);
        tracing::debug!(%url, "Searching Open Library");

        let response = self
            .http
            .client()
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to search Open Library: {}", e)))?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "Open Library returned status: {}",
                response.status()
            )));
        }

        let data: SearchDocs = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("Failed to parse JSON: {}", e)))?;

        let records = data.records();
        tracing::debug!(
            returned = records.len(),
            num_found = ?data.num_found,
            "Open Library search complete"
        );

        let mut response = SearchResponse::new(records, &query.text, query.category);
        response.num_found = data.num_found;
        Ok(response)
    }

    async fn cover_available(&self, url: &str) -> Result<bool, SourceError> {
        let response = self
            .http
            .client()
            .head(url)
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to probe cover: {}", e)))?;

        Ok(response.status().is_success())
    }
}

// ===== Open Library API Types =====

#[derive(Debug, Deserialize)]
struct SearchDocs {
    // absent or null when nothing matches
    #[serde(default)]
    docs: Option<Vec<serde_json::Value>>,
    #[serde(default, rename = "numFound")]
    num_found: Option<usize>,
}

impl SearchDocs {
    /// Parse each document on its own, dropping the ones that don't fit.
    fn records(&self) -> Vec<CatalogRecord> {
        let Some(docs) = &self.docs else {
            return Vec::new();
        };

        docs.iter()
            .enumerate()
            .filter_map(|(index, doc)| {
                match serde_json::from_value::<CatalogRecord>(doc.clone()) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        tracing::debug!(index, error = %e, "Skipping malformed document");
                        None
                    }
                }
            })
            .collect()
    }
}
