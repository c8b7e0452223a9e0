//! Search request and query models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of records requested per search.
pub const PAGE_SIZE: usize = 24;

/// The catalog field a search is run against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchCategory {
    #[default]
    Title,
    Author,
    Subject,
}

impl SearchCategory {
    /// Name of the upstream query parameter for this category
    pub fn param_name(&self) -> &'static str {
        match self {
            SearchCategory::Title => "title",
            SearchCategory::Author => "author",
            SearchCategory::Subject => "subject",
        }
    }
}

impl fmt::Display for SearchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param_name())
    }
}

impl FromStr for SearchCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(SearchCategory::Title),
            "author" => Ok(SearchCategory::Author),
            "subject" => Ok(SearchCategory::Subject),
            other => Err(format!("unknown search category: {}", other)),
        }
    }
}

/// A submitted search: trimmed, non-empty text plus the category it targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Search text with surrounding whitespace removed
    pub text: String,

    /// Category the text is matched against
    pub category: SearchCategory,
}

impl SearchRequest {
    /// Build a request from raw form input.
    ///
    /// Returns `None` when the input is empty or whitespace only.
    pub fn new(raw_input: &str, category: SearchCategory) -> Option<Self> {
        let text = raw_input.trim();
        if text.is_empty() {
            return None;
        }

        Some(Self {
            text: text.to_string(),
            category,
        })
    }

    /// The outbound query for this request, capped at [`PAGE_SIZE`]
    pub fn to_query(&self) -> SearchQuery {
        SearchQuery::new(&self.text, self.category)
    }
}

/// Outbound search query parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Search text
    pub text: String,

    /// Upstream field to search
    pub category: SearchCategory,

    /// Maximum number of records to return
    pub limit: usize,
}

impl SearchQuery {
    /// Create a new query with the default page size
    pub fn new(text: impl Into<String>, category: SearchCategory) -> Self {
        Self {
            text: text.into(),
            category,
            limit: PAGE_SIZE,
        }
    }

    /// Query string for the upstream search endpoint, e.g.
    /// `subject=space&limit=24`
    pub fn query_string(&self) -> String {
        format!(
            "{}={}&limit={}",
            self.category.param_name(),
            urlencoding::encode(&self.text),
            self.limit
        )
    }
}
