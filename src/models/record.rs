//! Catalog record model.

use serde::{Deserialize, Deserializer, Serialize};

use super::SearchCategory;

/// A single search hit as returned by the upstream catalog.
///
/// Only the fields the client displays are kept; anything else in the
/// upstream document is ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Catalog path of the work, including its leading `/` (e.g. `/works/OL45804W`)
    pub key: String,

    /// Title of the work
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// Author names in upstream order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<Vec<String>>,

    /// Cover image id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_i: Option<i64>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl CatalogRecord {
    /// Create a record with only a key and title
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            author_name: None,
            cover_i: None,
        }
    }

    /// Set the author names
    pub fn authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.author_name = Some(authors.into_iter().map(Into::into).collect());
        self
    }

    /// Set the cover image id
    pub fn cover(mut self, cover_i: i64) -> Self {
        self.cover_i = Some(cover_i);
        self
    }
}

/// Records returned for one query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Records found, in upstream order
    pub records: Vec<CatalogRecord>,

    /// Total number of matches upstream (may be more than returned)
    pub num_found: Option<usize>,

    /// Query text that was executed
    pub query: String,

    /// Category that was searched
    pub category: SearchCategory,
}

impl SearchResponse {
    /// Create a new search response
    pub fn new(
        records: Vec<CatalogRecord>,
        query: impl Into<String>,
        category: SearchCategory,
    ) -> Self {
        Self {
            records,
            num_found: None,
            query: query.into(),
            category,
        }
    }

    /// Whether no records came back
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
