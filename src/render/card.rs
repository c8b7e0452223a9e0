//! Result card: display fields for one catalog record.

use serde::Serialize;

use crate::config::{ApiConfig, DEFAULT_BASE_URL, DEFAULT_COVERS_URL, DEFAULT_PLACEHOLDER_COVER_URL};
use crate::models::CatalogRecord;

/// Shown when a record lists no authors
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// URL bases used to build cover images and detail links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogLinks {
    /// Catalog site; detail links are this plus the record key
    pub site_base: String,

    /// Cover image host
    pub covers_base: String,

    /// Image used when no cover is available
    pub placeholder: String,
}

impl Default for CatalogLinks {
    fn default() -> Self {
        Self {
            site_base: DEFAULT_BASE_URL.to_string(),
            covers_base: DEFAULT_COVERS_URL.to_string(),
            placeholder: DEFAULT_PLACEHOLDER_COVER_URL.to_string(),
        }
    }
}

impl From<&ApiConfig> for CatalogLinks {
    fn from(config: &ApiConfig) -> Self {
        Self {
            site_base: config.base_url.trim_end_matches('/').to_string(),
            covers_base: config.covers_url.trim_end_matches('/').to_string(),
            placeholder: config.placeholder_cover_url.clone(),
        }
    }
}

impl CatalogLinks {
    /// Large cover image for a cover id
    pub fn cover_url(&self, cover_i: i64) -> String {
        format!("{}/b/id/{}-L.jpg", self.covers_base, cover_i)
    }

    /// Detail page for a catalog key. Keys carry their own leading `/`.
    pub fn detail_url(&self, key: &str) -> String {
        format!("{}{}", self.site_base, key)
    }
}

/// Cover image source with a one-shot fallback to the placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverImage {
    src: String,
    #[serde(skip)]
    placeholder: String,
}

impl CoverImage {
    fn new(src: String, placeholder: String) -> Self {
        Self { src, placeholder }
    }

    /// URL to load
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Whether the placeholder is showing
    pub fn is_placeholder(&self) -> bool {
        self.src == self.placeholder
    }

    /// The image failed to load: show the placeholder instead.
    ///
    /// Returns `true` if the source changed. Calling this again, or when the
    /// placeholder itself failed, does nothing.
    pub fn on_load_error(&mut self) -> bool {
        if self.is_placeholder() {
            return false;
        }
        self.src = self.placeholder.clone();
        true
    }
}

/// Display fields for one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultCard {
    /// Record title, as given upstream
    pub title: String,

    /// Author names joined with `", "`, or [`UNKNOWN_AUTHOR`]
    pub authors: String,

    /// Cover image, possibly the placeholder
    pub cover: CoverImage,

    /// Detail page on the catalog site
    pub link: String,
}

impl ResultCard {
    /// Format a record for display
    pub fn from_record(record: &CatalogRecord, links: &CatalogLinks) -> Self {
        let cover_src = record
            .cover_i
            .map(|id| links.cover_url(id))
            .unwrap_or_else(|| links.placeholder.clone());

        Self {
            title: record.title.clone(),
            authors: format_authors(record.author_name.as_deref()),
            cover: CoverImage::new(cover_src, links.placeholder.clone()),
            link: links.detail_url(&record.key),
        }
    }
}

/// Join author names with `", "`, or [`UNKNOWN_AUTHOR`] when there are none
pub fn format_authors(authors: Option<&[String]>) -> String {
    match authors {
        Some(names) if !names.is_empty() => names.join(", "),
        _ => UNKNOWN_AUTHOR.to_string(),
    }
}
