//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Wiki-Mirror database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Track crawl runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    strategy TEXT NOT NULL,
    status TEXT NOT NULL,
    pages_loaded INTEGER NOT NULL DEFAULT 0,
    pages_fetched INTEGER NOT NULL DEFAULT 0,
    pages_failed INTEGER NOT NULL DEFAULT 0
);

-- Every fetched page; content is never updated once captured
CREATE TABLE IF NOT EXISTS pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    identifier TEXT NOT NULL UNIQUE,
    content TEXT NOT NULL,
    fetched_at TEXT NOT NULL
);

-- Templates referenced by pages; may not be fetched yet
CREATE TABLE IF NOT EXISTS templates (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    identifier TEXT NOT NULL UNIQUE
);

-- Page uses template
CREATE TABLE IF NOT EXISTS page_templates (
    page_id INTEGER NOT NULL REFERENCES pages(id),
    template_id INTEGER NOT NULL REFERENCES templates(id),
    UNIQUE(page_id, template_id)
);

CREATE INDEX IF NOT EXISTS idx_page_templates_page ON page_templates(page_id);
CREATE INDEX IF NOT EXISTS idx_page_templates_template ON page_templates(template_id);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
