//! Configuration management.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables prefixed with `OPENLIBRARY_SEARCH` (nested keys are
//! separated by `__`, e.g. `OPENLIBRARY_SEARCH_API__BASE_URL`).
//!
//! # Configuration File Format
//!
//! ```toml
//! [api]
//! base_url = "https://openlibrary.org"
//! covers_url = "https://covers.openlibrary.org"
//! placeholder_cover_url = "https://via.placeholder.com/180x270?text=No+Cover"
//! timeout_secs = 30
//!
//! [display]
//! default_category = "author"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::SearchCategory;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "OPENLIBRARY_SEARCH";

/// Default catalog site, also the base of every detail link
pub const DEFAULT_BASE_URL: &str = "https://openlibrary.org";

/// Default covers host
pub const DEFAULT_COVERS_URL: &str = "https://covers.openlibrary.org";

/// Image shown when a record has no cover or the cover fails to load
pub const DEFAULT_PLACEHOLDER_COVER_URL: &str =
    "https://via.placeholder.com/180x270?text=No+Cover";

const CONFIG_FILE_NAME: &str = "config.toml";
const LOCAL_CONFIG_FILE_NAME: &str = "openlibrary-search.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Upstream endpoints and HTTP settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Presentation settings
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Upstream API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Catalog base URL (search endpoint and detail links)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Cover image host
    #[serde(default = "default_covers_url")]
    pub covers_url: String,

    /// Placeholder image URL
    #[serde(default = "default_placeholder_cover_url")]
    pub placeholder_cover_url: String,

    /// Request timeout in seconds. Unset means the transport default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Custom user agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            covers_url: default_covers_url(),
            placeholder_cover_url: default_placeholder_cover_url(),
            timeout_secs: None,
            user_agent: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_covers_url() -> String {
    DEFAULT_COVERS_URL.to_string()
}

fn default_placeholder_cover_url() -> String {
    DEFAULT_PLACEHOLDER_COVER_URL.to_string()
}

/// Display configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Category selected when none is given on the command line
    #[serde(default)]
    pub default_category: SearchCategory,
}

impl Config {
    /// Check that every configured URL is absolute and parseable
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("api.base_url", &self.api.base_url),
            ("api.covers_url", &self.api.covers_url),
            ("api.placeholder_cover_url", &self.api.placeholder_cover_url),
        ] {
            url::Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
                field,
                value: value.clone(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Write this configuration as TOML
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid URL for {field} ({value}): {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },
}

/// Load configuration from an optional file plus environment overrides
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let config: Config = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// Default location of the user configuration file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("openlibrary-search").join(CONFIG_FILE_NAME))
}

/// Find a configuration file in the standard locations.
///
/// The user config directory is checked first, then the working directory.
pub fn find_config_file() -> Option<PathBuf> {
    default_config_path()
        .into_iter()
        .chain(std::iter::once(PathBuf::from(LOCAL_CONFIG_FILE_NAME)))
        .find(|path| path.is_file())
}
