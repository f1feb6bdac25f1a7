//! Output module for crawl summaries
//!
//! This module handles:
//! - Reading mirror statistics back out of the page store
//! - Printing statistics and per-run reports

pub mod stats;

pub use stats::{load_statistics, print_report, print_statistics, CrawlStatistics};
