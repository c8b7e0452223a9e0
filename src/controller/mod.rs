//! Search controller: form state, committed request and result state.
//!
//! The controller is owned by a single task and only mutated between awaits,
//! so it needs no locking. A search cycle is split in two halves so callers
//! can interleave other work:
//!
//! 1. [`SearchController::submit`] commits the current input and category,
//!    enters [`ResultState::Loading`] and hands back a [`PendingSearch`].
//! 2. [`SearchController::complete`] applies the outcome of that search.
//!
//! [`SearchController::run`] and [`SearchController::submit_and_run`] drive
//! both halves against a [`CatalogSource`].
//!
//! Every submission carries a sequence number. Only the outcome of the most
//! recent submission is applied; a response that settles after it has been
//! superseded is dropped.

use serde::Serialize;

use crate::models::{CatalogRecord, SearchCategory, SearchRequest, SearchResponse};
use crate::sources::{CatalogSource, SourceError};

/// User-visible failure of a search cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum SearchFailure {
    /// The request failed or the catalog answered with a non-success status
    #[error("Failed to fetch books. Please try again.")]
    Transport,

    /// The catalog answered but nothing matched
    #[error("No books found. Try a different search.")]
    EmptyResult,
}

impl SearchFailure {
    /// Message shown to the user
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// What the result area currently holds. Exactly one variant at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ResultState {
    /// Nothing has been submitted yet
    #[default]
    Idle,

    /// A search is in flight
    Loading,

    /// The last search failed
    Error(SearchFailure),

    /// The last search returned records, in upstream order
    Ready(Vec<CatalogRecord>),
}

impl ResultState {
    /// Whether a search is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, ResultState::Loading)
    }

    /// The failure, if the state is an error
    pub fn failure(&self) -> Option<SearchFailure> {
        match self {
            ResultState::Error(failure) => Some(*failure),
            _ => None,
        }
    }

    /// The records, if the state is ready
    pub fn records(&self) -> Option<&[CatalogRecord]> {
        match self {
            ResultState::Ready(records) => Some(records.as_slice()),
            _ => None,
        }
    }
}

/// A committed search waiting for its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSearch {
    /// Sequence number of this submission
    pub seq: u64,

    /// The committed request
    pub request: SearchRequest,
}

/// Owns the search form and the result state derived from it
#[derive(Debug, Default)]
pub struct SearchController {
    input: String,
    category: SearchCategory,
    committed: Option<SearchRequest>,
    state: ResultState,
    seq: u64,
}

impl SearchController {
    /// Create a controller with an empty form and the default category
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a controller with a preselected category
    pub fn with_category(category: SearchCategory) -> Self {
        Self {
            category,
            ..Self::default()
        }
    }

    /// Current, uncommitted input text
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the uncommitted input. Never starts a search.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Category that the next submission will use
    pub fn category(&self) -> SearchCategory {
        self.category
    }

    /// Select the category for the next submission. Never starts a search.
    pub fn set_category(&mut self, category: SearchCategory) {
        self.category = category;
    }

    /// The last committed request, if any
    pub fn committed(&self) -> Option<&SearchRequest> {
        self.committed.as_ref()
    }

    /// Current result state
    pub fn state(&self) -> &ResultState {
        &self.state
    }

    /// Whether any search has ever been committed
    pub fn has_searched(&self) -> bool {
        self.committed.is_some()
    }

    /// Number of searches started so far
    pub fn requests_issued(&self) -> u64 {
        self.seq
    }

    /// Submit the form.
    ///
    /// Returns `None` without touching any state when the trimmed input is
    /// empty, or when the input and category match the committed request.
    /// Otherwise commits the request, enters `Loading` and returns the
    /// search to run.
    pub fn submit(&mut self) -> Option<PendingSearch> {
        let request = SearchRequest::new(&self.input, self.category)?;

        if self.committed.as_ref() == Some(&request) {
            tracing::debug!(query = %request.text, category = %request.category, "Search unchanged, not resubmitting");
            return None;
        }

        self.seq += 1;
        self.committed = Some(request.clone());
        self.state = ResultState::Loading;

        tracing::info!(
            seq = self.seq,
            query = %request.text,
            category = %request.category,
            "Search submitted"
        );

        Some(PendingSearch {
            seq: self.seq,
            request,
        })
    }

    /// Apply the outcome of the search with sequence number `seq`.
    ///
    /// Returns `false` if that search has been superseded, in which case
    /// the state is left as is.
    pub fn complete(&mut self, seq: u64, outcome: Result<SearchResponse, SourceError>) -> bool {
        if seq != self.seq {
            tracing::warn!(seq, latest = self.seq, "Discarding superseded search response");
            return false;
        }

        self.state = match outcome {
            Ok(response) if response.is_empty() => {
                tracing::info!(seq, "Search returned no records");
                ResultState::Error(SearchFailure::EmptyResult)
            }
            Ok(response) => {
                tracing::info!(seq, count = response.records.len(), "Search returned records");
                ResultState::Ready(response.records)
            }
            Err(e) => {
                tracing::warn!(seq, error = %e, "Search failed");
                ResultState::Error(SearchFailure::Transport)
            }
        };
        true
    }

    /// Run a pending search against `source` and apply its outcome
    pub async fn run<S>(&mut self, source: &S, pending: PendingSearch) -> bool
    where
        S: CatalogSource + ?Sized,
    {
        let query = pending.request.to_query();
        let outcome = source.search(&query).await;
        self.complete(pending.seq, outcome)
    }

    /// Submit the form and, if a search was started, run it to completion.
    ///
    /// Returns whether a search was started.
    pub async fn submit_and_run<S>(&mut self, source: &S) -> bool
    where
        S: CatalogSource + ?Sized,
    {
        match self.submit() {
            Some(pending) => {
                self.run(source, pending).await;
                true
            }
            None => false,
        }
    }
}
