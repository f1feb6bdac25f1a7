//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the PageStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{PageStore, StorageError, StorageResult};
use crate::storage::{RunCounts, RunRecord, RunStatus, StoredPage};
use crate::MirrorError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeSet;
use std::path::Path;

const RUN_COLUMNS: &str = "id, started_at, finished_at, config_hash, strategy, status,
     pages_loaded, pages_fetched, pages_failed";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(MirrorError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, MirrorError> {
        let conn = Connection::open(path)?;

        // Configure SQLite for concurrent readers and durable commits
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, MirrorError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn page_id(&self, identifier: &str) -> StorageResult<Option<i64>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id FROM pages WHERE identifier = ?1",
                params![identifier],
                |row| row.get(0),
            )
            .optional()?)
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        strategy: row.get(4)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(5)?)
            .unwrap_or(RunStatus::Running),
        counts: RunCounts {
            loaded: row.get::<_, i64>(6)? as u64,
            fetched: row.get::<_, i64>(7)? as u64,
            failed: row.get::<_, i64>(8)? as u64,
        },
    })
}

impl PageStore for SqliteStorage {
    // ===== Pages =====

    fn load_page(&self, identifier: &str) -> StorageResult<Option<StoredPage>> {
        let row: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT content, fetched_at FROM pages WHERE identifier = ?1",
                params![identifier],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((content, fetched_at)) = row else {
            return Ok(None);
        };

        Ok(Some(StoredPage {
            identifier: identifier.to_string(),
            content,
            templates: self.get_templates(identifier)?,
            fetched_at,
        }))
    }

    fn contains_page(&self, identifier: &str) -> StorageResult<bool> {
        Ok(self.page_id(identifier)?.is_some())
    }

    fn commit_page(
        &mut self,
        identifier: &str,
        content: &str,
        templates: &BTreeSet<String>,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();

        // Dropping the transaction on an early return rolls everything back
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT OR IGNORE INTO pages (identifier, content, fetched_at) VALUES (?1, ?2, ?3)",
            params![identifier, content, now],
        )?;
        let page_id: i64 = tx.query_row(
            "SELECT id FROM pages WHERE identifier = ?1",
            params![identifier],
            |row| row.get(0),
        )?;

        {
            let mut insert_template =
                tx.prepare("INSERT OR IGNORE INTO templates (identifier) VALUES (?1)")?;
            let mut select_template = tx.prepare("SELECT id FROM templates WHERE identifier = ?1")?;
            let mut insert_edge = tx.prepare(
                "INSERT OR IGNORE INTO page_templates (page_id, template_id) VALUES (?1, ?2)",
            )?;

            for template in templates {
                insert_template.execute(params![template])?;
                let template_id: i64 =
                    select_template.query_row(params![template], |row| row.get(0))?;
                insert_edge.execute(params![page_id, template_id])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn get_templates(&self, identifier: &str) -> StorageResult<BTreeSet<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.identifier FROM page_templates pt
             JOIN pages p ON p.id = pt.page_id
             JOIN templates t ON t.id = pt.template_id
             WHERE p.identifier = ?1",
        )?;

        let templates = stmt
            .query_map(params![identifier], |row| row.get(0))?
            .collect::<Result<BTreeSet<String>, _>>()?;

        Ok(templates)
    }

    fn page_identifiers(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT identifier FROM pages ORDER BY identifier")?;

        let identifiers = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(identifiers)
    }

    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str, strategy: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, strategy, status) VALUES (?1, ?2, ?3, ?4)",
            params![now, config_hash, strategy, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS),
                params![run_id],
                run_from_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {} FROM runs ORDER BY id DESC LIMIT 1", RUN_COLUMNS),
                [],
                run_from_row,
            )
            .optional()?)
    }

    fn complete_run(&mut self, run_id: i64, counts: &RunCounts) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2,
             pages_loaded = ?3, pages_fetched = ?4, pages_failed = ?5
             WHERE id = ?6",
            params![
                RunStatus::Completed.to_db_string(),
                now,
                counts.loaded as i64,
                counts.fetched as i64,
                counts.failed as i64,
                run_id
            ],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    // ===== Statistics =====

    fn count_pages(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_templates(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM templates", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_edges(&self) -> StorageResult<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM page_templates", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_missing_templates(&self) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM templates t
             WHERE NOT EXISTS (SELECT 1 FROM pages p WHERE p.identifier = t.identifier)",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
