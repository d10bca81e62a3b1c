//! Database schema management
//!
//! This module defines the book catalog schema and the manager that
//! creates, drops, and probes it. All tables are defined here to keep the
//! dependency order between them in one place.

use anyhow::{anyhow, Result};
use rusqlite::Connection;

/// Schema definitions for all tables in the catalog database
pub struct SchemaDefinitions;

impl SchemaDefinitions {
    /// SQL for creating the authors table
    pub const AUTHORS_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS authors (
            author_id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL
        );
    "#;

    /// SQL for creating the publishers table
    pub const PUBLISHERS_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS publishers (
            publisher_id INTEGER PRIMARY KEY AUTOINCREMENT,
            publisher_name TEXT NOT NULL
        );
    "#;

    /// SQL for creating the titles table
    ///
    /// The ISBN is the natural key; every title references exactly one
    /// publisher, so publishers must be created (and populated) first.
    pub const TITLES_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS titles (
            isbn TEXT PRIMARY KEY,
            edition_number INTEGER NOT NULL,
            years TEXT NOT NULL,
            publisher_id INTEGER NOT NULL,
            price REAL NOT NULL,
            title TEXT NOT NULL,
            FOREIGN KEY (publisher_id) REFERENCES publishers (publisher_id)
        );
    "#;

    /// SQL for creating the author_isbn relation table
    ///
    /// Join table for the many-to-many relation between authors and
    /// titles; the composite key makes each pairing unique.
    pub const AUTHOR_ISBN_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS author_isbn (
            author_id INTEGER NOT NULL,
            isbn TEXT NOT NULL,
            PRIMARY KEY (author_id, isbn),
            FOREIGN KEY (author_id) REFERENCES authors (author_id),
            FOREIGN KEY (isbn) REFERENCES titles (isbn)
        );
    "#;

    /// SQL for creating the catalog meta table (tracks the last batch load)
    pub const CATALOG_META_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS catalog_meta (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            source TEXT NOT NULL,
            loaded_at INTEGER NOT NULL,
            records_loaded INTEGER NOT NULL DEFAULT 0
        );
    "#;

    /// All catalog tables, in creation (dependency) order
    pub const ALL_TABLES: &'static [&'static str] = &[
        "authors",
        "publishers",
        "titles",
        "author_isbn",
        "catalog_meta",
    ];
}

/// Schema manager for the catalog database
///
/// Handles schema creation, destructive resets, and status checks.
pub struct SchemaManager<'a> {
    conn: &'a Connection,
}

impl<'a> SchemaManager<'a> {
    /// Create a new schema manager for the given connection
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Initialize the database schema
    ///
    /// Creates all tables in dependency order: referenced entity tables
    /// (authors, publishers) before titles, titles before the
    /// author_isbn relation. A creation failure is fatal.
    pub fn initialize(&self) -> Result<()> {
        self.conn
            .execute(SchemaDefinitions::AUTHORS_TABLE, [])
            .map_err(|e| anyhow!("Failed to create authors table: {}", e))?;

        self.conn
            .execute(SchemaDefinitions::PUBLISHERS_TABLE, [])
            .map_err(|e| anyhow!("Failed to create publishers table: {}", e))?;

        self.conn
            .execute(SchemaDefinitions::TITLES_TABLE, [])
            .map_err(|e| anyhow!("Failed to create titles table: {}", e))?;

        self.conn
            .execute(SchemaDefinitions::AUTHOR_ISBN_TABLE, [])
            .map_err(|e| anyhow!("Failed to create author_isbn table: {}", e))?;

        self.conn
            .execute(SchemaDefinitions::CATALOG_META_TABLE, [])
            .map_err(|e| anyhow!("Failed to create catalog_meta table: {}", e))?;

        Ok(())
    }

    /// Reset the database by dropping all catalog tables
    ///
    /// Drops dependents before referents (author_isbn and titles before
    /// authors and publishers) so the drops never violate foreign-key
    /// dependencies. `IF EXISTS` makes a missing table a non-event; any
    /// other DDL failure propagates.
    pub fn reset(&self) -> Result<()> {
        self.conn.execute("DROP TABLE IF EXISTS author_isbn", [])?;
        self.conn.execute("DROP TABLE IF EXISTS titles", [])?;
        self.conn.execute("DROP TABLE IF EXISTS authors", [])?;
        self.conn.execute("DROP TABLE IF EXISTS publishers", [])?;
        self.conn.execute("DROP TABLE IF EXISTS catalog_meta", [])?;

        Ok(())
    }

    /// Check the current schema status
    pub fn check_status(&self) -> Result<SchemaStatus> {
        let mut present = 0;
        for table in SchemaDefinitions::ALL_TABLES {
            let exists: i32 = self
                .conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap_or(0);
            if exists > 0 {
                present += 1;
            }
        }

        Ok(match present {
            0 => SchemaStatus::NotInitialized,
            n if n == SchemaDefinitions::ALL_TABLES.len() => SchemaStatus::Current,
            _ => SchemaStatus::Corrupted,
        })
    }
}

/// Status of the database schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaStatus {
    /// Database is not initialized (fresh database)
    NotInitialized,

    /// All catalog tables are present
    Current,

    /// Only some catalog tables are present (partial schema)
    Corrupted,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn create_test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("PRAGMA foreign_keys=ON", []).unwrap();
        conn
    }

    #[test]
    fn test_schema_not_initialized() {
        let conn = create_test_db();
        let manager = SchemaManager::new(&conn);

        assert_eq!(
            manager.check_status().unwrap(),
            SchemaStatus::NotInitialized
        );
    }

    #[test]
    fn test_schema_initialize() {
        let conn = create_test_db();
        let manager = SchemaManager::new(&conn);

        manager.initialize().unwrap();

        assert_eq!(manager.check_status().unwrap(), SchemaStatus::Current);
    }

    #[test]
    fn test_schema_reset() {
        let conn = create_test_db();
        let manager = SchemaManager::new(&conn);

        manager.initialize().unwrap();
        assert_eq!(manager.check_status().unwrap(), SchemaStatus::Current);

        manager.reset().unwrap();
        assert_eq!(
            manager.check_status().unwrap(),
            SchemaStatus::NotInitialized
        );
    }

    #[test]
    fn test_reset_is_idempotent() {
        let conn = create_test_db();
        let manager = SchemaManager::new(&conn);

        // Resetting a fresh database drops nothing and succeeds
        manager.reset().unwrap();
        manager.reset().unwrap();

        manager.initialize().unwrap();
        manager.reset().unwrap();
        manager.initialize().unwrap();
        assert_eq!(manager.check_status().unwrap(), SchemaStatus::Current);
    }

    #[test]
    fn test_schema_corrupted() {
        let conn = create_test_db();
        let manager = SchemaManager::new(&conn);

        manager.initialize().unwrap();
        conn.execute("DROP TABLE author_isbn", []).unwrap();

        assert_eq!(manager.check_status().unwrap(), SchemaStatus::Corrupted);
    }

    #[test]
    fn test_foreign_keys_reject_orphans() {
        let conn = create_test_db();
        let manager = SchemaManager::new(&conn);
        manager.initialize().unwrap();

        // A title referencing a missing publisher must be rejected
        let res = conn.execute(
            "INSERT INTO titles (isbn, edition_number, years, publisher_id, price, title)
             VALUES ('1234567890', 1, '1993', 99, 55.0, 'Test Book')",
            [],
        );
        assert!(res.is_err());

        // A join row referencing missing author and title must be rejected
        let res = conn.execute(
            "INSERT INTO author_isbn (author_id, isbn) VALUES (1, '1234567890')",
            [],
        );
        assert!(res.is_err());
    }
}
