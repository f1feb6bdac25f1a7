//! Storage module for persisting crawled pages
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - Atomic page + template edge commits
//! - Run tracking

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{PageStore, StorageError, StorageResult};

use crate::MirrorError;

use std::collections::BTreeSet;
use std::path::Path;

/// Initializes or opens a storage database
///
/// Missing parent directories of `path` are created first.
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(MirrorError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, MirrorError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    SqliteStorage::new(path)
}

/// A page as it was committed to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPage {
    pub identifier: String,
    pub content: String,
    pub templates: BTreeSet<String>,
    pub fetched_at: String,
}

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub strategy: String,
    pub status: RunStatus,
    pub counts: RunCounts,
}

/// Per-run page counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounts {
    /// Pages resolved from the store without a fetch
    pub loaded: u64,
    /// Pages fetched and committed
    pub fetched: u64,
    /// Pages whose fetch, parse, or commit failed
    pub failed: u64,
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_status_roundtrip() {
        for status in &[RunStatus::Running, RunStatus::Completed] {
            let parsed = RunStatus::from_db_string(status.to_db_string());
            assert_eq!(Some(*status), parsed);
        }
    }

    #[test]
    fn test_run_status_invalid() {
        assert_eq!(RunStatus::from_db_string("invalid"), None);
    }

    #[test]
    fn test_open_storage_creates_directories() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let db_path = temp_dir.path().join("mirror").join("pages.db");

        let storage = open_storage(&db_path).unwrap();

        assert!(db_path.exists());
        assert_eq!(storage.count_pages().unwrap(), 0);
    }

    #[test]
    fn test_open_storage_reports_io_errors() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let result = open_storage(&blocker.join("pages.db"));

        assert!(matches!(result, Err(MirrorError::Io(_))));
    }
}
