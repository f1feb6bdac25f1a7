//! Storage traits and error types
//!
//! This module defines the trait interface for page store backends and
//! associated error types.

use crate::storage::{RunCounts, RunRecord, StoredPage};
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable, append-only cache of fetched pages
///
/// Pages are keyed by identifier and never updated or deleted. All inserts
/// are idempotent: storing something that is already present succeeds
/// without changing it.
pub trait PageStore {
    // ===== Pages =====

    /// Loads a stored page with its template identifiers
    ///
    /// Returns `Ok(None)` if the page has never been committed.
    fn load_page(&self, identifier: &str) -> StorageResult<Option<StoredPage>>;

    /// Checks whether a page has been committed
    fn contains_page(&self, identifier: &str) -> StorageResult<bool>;

    /// Commits a page and its template edges atomically
    ///
    /// Either the page record and every edge become visible together, or
    /// nothing does. A page or edge that already exists is left untouched.
    fn commit_page(
        &mut self,
        identifier: &str,
        content: &str,
        templates: &BTreeSet<String>,
    ) -> StorageResult<()>;

    /// Gets the template identifiers recorded for a page
    fn get_templates(&self, identifier: &str) -> StorageResult<BTreeSet<String>>;

    /// Gets every stored page identifier, sorted
    fn page_identifiers(&self) -> StorageResult<Vec<String>>;

    // ===== Run Management =====

    /// Records the start of a crawl run and returns its ID
    fn create_run(&mut self, config_hash: &str, strategy: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Marks a run as completed with its final counts
    fn complete_run(&mut self, run_id: i64, counts: &RunCounts) -> StorageResult<()>;

    // ===== Statistics =====

    /// Gets total page count
    fn count_pages(&self) -> StorageResult<u64>;

    /// Gets the number of distinct templates referenced by any page
    fn count_templates(&self) -> StorageResult<u64>;

    /// Gets the number of page-template edges
    fn count_edges(&self) -> StorageResult<u64>;

    /// Gets the number of referenced templates that have no stored page yet
    fn count_missing_templates(&self) -> StorageResult<u64>;
}
