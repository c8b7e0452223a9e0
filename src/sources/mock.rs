//! Mock source for testing purposes.

use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::models::{CatalogRecord, SearchQuery, SearchResponse};
use crate::sources::{CatalogSource, SourceError};

/// A mock source that returns predefined records and counts requests.
///
/// Queued failures are consumed one per search; once the queue is empty the
/// default records (initially none) are returned.
#[derive(Debug, Default)]
pub struct MockSource {
    default_records: Mutex<Vec<CatalogRecord>>,
    queued_failures: Mutex<VecDeque<String>>,
    queries: Mutex<Vec<SearchQuery>>,
    unavailable_covers: Mutex<HashSet<String>>,
    requests: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockSource {
    /// Create a new mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that always answers with these records.
    pub fn with_records(records: Vec<CatalogRecord>) -> Self {
        let source = Self::new();
        source.set_records(records);
        source
    }

    /// Set the records returned when nothing is queued.
    pub fn set_records(&self, records: Vec<CatalogRecord>) {
        *lock(&self.default_records) = records;
    }

    /// Queue a network failure for the next search.
    pub fn push_failure(&self, message: impl Into<String>) {
        lock(&self.queued_failures).push_back(message.into());
    }

    /// Make `cover_available` report this URL as unloadable.
    pub fn mark_cover_unavailable(&self, url: impl Into<String>) {
        lock(&self.unavailable_covers).insert(url.into());
    }

    /// Number of searches issued against this source.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Queries received, oldest first.
    pub fn queries(&self) -> Vec<SearchQuery> {
        lock(&self.queries).clone()
    }
}

#[async_trait]
impl CatalogSource for MockSource {
    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SourceError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        lock(&self.queries).push(query.clone());

        if let Some(message) = lock(&self.queued_failures).pop_front() {
            return Err(SourceError::Network(message));
        }
        let records = lock(&self.default_records).clone();

        Ok(SearchResponse::new(records, &query.text, query.category))
    }

    async fn cover_available(&self, url: &str) -> Result<bool, SourceError> {
        Ok(!lock(&self.unavailable_covers).contains(url))
    }
}

/// Helper function to create a catalog record for testing.
pub fn make_record(id: &str, title: &str) -> CatalogRecord {
    CatalogRecord::new(format!("/works/{}", id), title)
}
