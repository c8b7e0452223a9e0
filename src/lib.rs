//! # Open Library Search
//!
//! A client for searching the Open Library book catalog by title, author, or
//! subject.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (SearchRequest, CatalogRecord, etc.)
//! - [`sources`]: The catalog source trait and its Open Library implementation
//! - [`controller`]: Search form state and the result state machine
//! - [`render`]: Pure mapping from result state to view, and result cards
//! - [`ui`]: Terminal presentation of views
//! - [`utils`]: HTTP client and display helpers
//! - [`config`]: Configuration management
//!
//! ## Example
//!
//! ```rust,no_run
//! use openlibrary_search::{render, CatalogLinks, OpenLibrarySource, SearchCategory, SearchController};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = OpenLibrarySource::new()?;
//! let mut controller = SearchController::with_category(SearchCategory::Subject);
//!
//! controller.set_input("space");
//! controller.submit_and_run(&source).await;
//!
//! let view = render(controller.state(), &CatalogLinks::default());
//! println!("{}", serde_json::to_string_pretty(&view)?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod models;
pub mod render;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use controller::{PendingSearch, ResultState, SearchController, SearchFailure};
pub use models::{CatalogRecord, SearchCategory, SearchRequest};
pub use render::{render, CatalogLinks, ResultCard, View};
pub use sources::{CatalogSource, OpenLibrarySource, SourceError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
