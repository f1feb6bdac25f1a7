//! Crawler module for wiki page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetcher` trait
//! - Markup repair behind the `Normalizer` trait
//! - The fixed-point crawl over the page graph

mod coordinator;
mod fetcher;
mod normalizer;

pub use crate::state::CrawlReport;
pub use coordinator::{run_crawl, Crawler};
pub use fetcher::{
    build_http_client, user_agent_string, FetchError, FetchResponse, Fetcher, HttpFetcher,
};
pub use normalizer::{HtmlNormalizer, NormalizeError, Normalizer};

use crate::config::Config;
use crate::MirrorError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the page store and record a new run
/// 2. Build the HTTP client
/// 3. Crawl from the start page until nothing new resolves
/// 4. Mark the run completed
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `config_hash` - Hash of the configuration file
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed
/// * `Err(MirrorError)` - Crawl could not be set up
pub async fn crawl(config: &Config, config_hash: &str) -> Result<CrawlReport, MirrorError> {
    run_crawl(config, config_hash).await
}
