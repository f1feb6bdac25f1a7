//! Wiki-Mirror: an incremental, resumable wiki crawler
//!
//! This crate mirrors a documentation wiki by crawling outward from a start
//! page. Every fetched page is committed to a SQLite store together with the
//! templates it uses, so repeated runs only fetch what is still missing.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod page;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Wiki-Mirror operations
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while turning one page identifier into a stored page
///
/// None of these abort a crawl. The crawler logs them against the offending
/// identifier and leaves that identifier unresolved for the rest of the run.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("transport error: {0}")]
    Transport(#[from] crawler::FetchError),

    #[error("normalization error: {0}")]
    Normalization(#[from] crawler::NormalizeError),

    #[error("parse error: {0}")]
    Parse(#[from] page::ParseError),

    #[error("store error: {0}")]
    Store(#[from] storage::StorageError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Wiki-Mirror operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, Crawler};
pub use extract::ExtractionStrategy;
pub use page::{ExclusionRules, Page};
pub use state::CrawlContext;
pub use url::EditUrlBuilder;
