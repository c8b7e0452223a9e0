//! Utility modules supporting catalog search.
//!
//! - [`HttpClient`]: shared reqwest client built from the `[api]` settings
//! - [`truncate_with_ellipsis`] and friends: terminal layout helpers
//!
//! # HTTP Client
//!
//! ```rust,no_run
//! use openlibrary_search::utils::HttpClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let response = client.client().get("https://openlibrary.org").send().await?;
//! # Ok(())
//! # }
//! ```

mod display;
mod http;

pub use display::{
    card_table_columns, display_width, is_terminal, terminal_width, truncate_with_ellipsis,
};
pub use http::{HttpClient, DEFAULT_USER_AGENT};
