//! Statistics generation from the page store
//!
//! This module provides functionality for extracting and displaying
//! mirror statistics from the storage layer.

use crate::state::CrawlReport;
use crate::storage::{PageStore, RunRecord};
use crate::MirrorError;
use std::collections::BTreeMap;

/// Mirror statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Total number of stored pages
    pub total_pages: u64,

    /// Number of distinct templates referenced by stored pages
    pub total_templates: u64,

    /// Stored pages grouped by top-level section (`cpp`, `Template`, ...)
    pub pages_by_section: BTreeMap<String, u64>,

    /// Number of page-template edges
    pub total_edges: u64,

    /// Referenced templates that have no stored page yet
    pub missing_templates: u64,

    /// The most recent run, if any
    pub latest_run: Option<RunRecord>,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Successfully loaded statistics
/// * `Err(MirrorError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn PageStore) -> Result<CrawlStatistics, MirrorError> {
    let mut pages_by_section = BTreeMap::new();
    for identifier in storage.page_identifiers()? {
        *pages_by_section
            .entry(section_of(&identifier).to_string())
            .or_insert(0) += 1;
    }

    Ok(CrawlStatistics {
        total_pages: storage.count_pages()?,
        pages_by_section,
        total_templates: storage.count_templates()?,
        total_edges: storage.count_edges()?,
        missing_templates: storage.count_missing_templates()?,
        latest_run: storage.get_latest_run()?,
    })
}

/// First path or namespace segment of an identifier
fn section_of(identifier: &str) -> &str {
    identifier.split(['/', ':']).next().unwrap_or(identifier)
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Mirror Statistics ===\n");

    println!("Overview:");
    println!("  Pages stored: {}", stats.total_pages);
    println!("  Templates referenced: {}", stats.total_templates);
    println!("  Page-template edges: {}", stats.total_edges);
    println!("  Templates not yet stored: {}", stats.missing_templates);
    println!();

    if !stats.pages_by_section.is_empty() {
        println!("Pages by Section:");
        for (section, count) in &stats.pages_by_section {
            println!("  {:20} {}", section, count);
        }
        println!();
    }

    match &stats.latest_run {
        Some(run) => {
            println!("Latest Run:");
            println!("  Run ID: {}", run.id);
            println!("  Status: {}", run.status.to_db_string());
            println!("  Strategy: {}", run.strategy);
            println!("  Started: {}", run.started_at);
            if let Some(finished) = &run.finished_at {
                println!("  Finished: {}", finished);
            }
            println!(
                "  Pages: {} loaded, {} fetched, {} failed",
                run.counts.loaded, run.counts.fetched, run.counts.failed
            );
        }
        None => println!("No crawl runs recorded"),
    }
}

/// Prints the summary of a finished crawl to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");
    println!("  Pages resolved: {}", report.resolved);
    println!("  Loaded from store: {}", report.loaded);
    println!("  Fetched: {}", report.fetched);
    println!("  Excluded references: {}", report.excluded);
    println!("  Sweeps: {}", report.sweeps);

    if !report.failed.is_empty() {
        println!("\nFailed Pages ({}):", report.failed.len());
        for identifier in &report.failed {
            println!("  - {}", identifier);
        }
    }
}
