//! Database module
//!
//! This module provides all database functionality for bookdb, organized into:
//!
//! - **core**: Core database infrastructure (SQLite connections, schema management)
//! - **catalog**: Per-table repositories for the book catalog
//!
//! # Architecture
//!
//! ```text
//! database/
//! ├── core/           # Foundation
//! │   ├── connection  # SQLite DatabaseConn wrapper
//! │   └── schema      # Schema definitions and management
//! │
//! └── catalog/        # Catalog storage
//!     ├── authors     # Author entities
//!     ├── publishers  # Publisher entities
//!     ├── titles      # Title entities (keyed by ISBN)
//!     └── links       # author_isbn many-to-many relation
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use bookdb::database::BookDatabase;
//!
//! // Open (and initialize if needed) the catalog database
//! let db = BookDatabase::open("~/.bookdb/bookdb-catalog.sqlite3")?;
//!
//! // Destructive reset: drop and recreate all tables
//! db.reset_schema()?;
//!
//! // Query data
//! let authors = db.authors().list_ordered()?;
//! ```

pub mod catalog;
pub mod core;

pub use catalog::{
    AuthorIsbnRepository, AuthorRecord, AuthorRepository, PublisherRecord, PublisherRepository,
    TitleByPublisherRecord, TitleRecord, TitleRepository,
};
pub use core::{DatabaseConn, SchemaDefinitions, SchemaManager, SchemaStatus};

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// Catalog database for book data (SQLite backend)
///
/// `BookDatabase` owns the connection and provides a unified interface
/// to the catalog tables. It handles schema initialization on open and
/// hands out per-table repositories that borrow the live connection.
/// The connection is released when the value is dropped, on every exit
/// path.
pub struct BookDatabase {
    db: DatabaseConn,
}

impl BookDatabase {
    /// Open the catalog database at the specified path
    ///
    /// A fresh database gets its schema created; a partial schema
    /// (some tables missing) is dropped and recreated.
    pub fn open(path: &str) -> Result<Self> {
        let db = DatabaseConn::open_path(path)?;
        Self::from_conn(db)
    }

    /// Create an in-memory catalog database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let db = DatabaseConn::open_in_memory()?;
        Self::from_conn(db)
    }

    fn from_conn(db: DatabaseConn) -> Result<Self> {
        let schema = SchemaManager::new(&db.conn);

        match schema.check_status()? {
            SchemaStatus::Current => {}
            SchemaStatus::NotInitialized => {
                info!("Initializing catalog database schema");
                schema.initialize()?;
            }
            SchemaStatus::Corrupted => {
                info!("Catalog database schema is partial, resetting");
                schema.reset()?;
                schema.initialize()?;
            }
        }

        Ok(Self { db })
    }

    /// Drop and recreate the entire catalog schema
    ///
    /// Destroys the whole prior dataset. Idempotent: calling it twice
    /// leaves the same empty, constraint-intact schema.
    pub fn reset_schema(&self) -> Result<()> {
        let schema = SchemaManager::new(&self.db.conn);
        schema.reset()?;
        schema.initialize()?;
        Ok(())
    }

    /// Get a reference to the author repository
    pub fn authors(&self) -> AuthorRepository<'_> {
        AuthorRepository::new(&self.db.conn)
    }

    /// Get a reference to the publisher repository
    pub fn publishers(&self) -> PublisherRepository<'_> {
        PublisherRepository::new(&self.db.conn)
    }

    /// Get a reference to the title repository
    pub fn titles(&self) -> TitleRepository<'_> {
        TitleRepository::new(&self.db.conn)
    }

    /// Get a reference to the author_isbn relation repository
    pub fn author_isbn(&self) -> AuthorIsbnRepository<'_> {
        AuthorIsbnRepository::new(&self.db.conn)
    }

    /// Get the underlying database connection (for advanced queries)
    pub fn connection(&self) -> &rusqlite::Connection {
        &self.db.conn
    }

    /// Record metadata about a completed batch load
    pub fn set_load_meta(&self, source: &str, records_loaded: u64) -> Result<()> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        self.db
            .conn
            .execute(
                "INSERT OR REPLACE INTO catalog_meta (id, source, loaded_at, records_loaded)
                 VALUES (1, ?1, ?2, ?3)",
                rusqlite::params![source, now, records_loaded],
            )
            .map_err(|e| anyhow!("Failed to set load metadata: {}", e))?;
        Ok(())
    }

    /// Get metadata about the last batch load, if any
    pub fn get_load_meta(&self) -> Result<Option<LoadMeta>> {
        let result = self.db.conn.query_row(
            "SELECT source, loaded_at, records_loaded FROM catalog_meta WHERE id = 1",
            [],
            |row| {
                Ok(LoadMeta {
                    source: row.get(0)?,
                    loaded_at: row.get(1)?,
                    records_loaded: row.get(2)?,
                })
            },
        );

        match result {
            Ok(meta) => Ok(Some(meta)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(anyhow!("Failed to get load metadata: {}", e)),
        }
    }

    /// Summarize the catalog: row counts per table plus last-load info
    pub fn summary(&self) -> Result<CatalogSummary> {
        Ok(CatalogSummary {
            authors: self.authors().count()?,
            publishers: self.publishers().count()?,
            titles: self.titles().count()?,
            author_links: self.author_isbn().count()?,
            last_load: self.get_load_meta()?,
        })
    }
}

/// Metadata about the last batch load
#[derive(Debug, Clone, Serialize)]
pub struct LoadMeta {
    /// Label of the input source (usually the file path)
    pub source: String,
    /// Unix timestamp of the load
    pub loaded_at: u64,
    /// Number of input records consumed
    pub records_loaded: u64,
}

impl LoadMeta {
    /// Load time formatted as a UTC timestamp string
    pub fn loaded_at_utc(&self) -> String {
        chrono::DateTime::from_timestamp(self.loaded_at as i64, 0)
            .unwrap_or_default()
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
    }
}

/// Row counts and load metadata for the whole catalog
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSummary {
    pub authors: u64,
    pub publishers: u64,
    pub titles: u64,
    pub author_links: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_load: Option<LoadMeta>,
}

/// Ensure the data directory exists
pub fn ensure_data_dir(data_dir: &str) -> Result<()> {
    std::fs::create_dir_all(data_dir)
        .map_err(|e| anyhow!("Failed to create data directory '{}': {}", data_dir, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = BookDatabase::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_repositories_start_empty() {
        let db = BookDatabase::open_in_memory().unwrap();

        assert!(db.authors().is_empty());
        assert!(db.publishers().is_empty());
        assert!(db.titles().is_empty());
        assert_eq!(db.author_isbn().count().unwrap(), 0);
    }

    #[test]
    fn test_reset_schema_destroys_data() {
        let db = BookDatabase::open_in_memory().unwrap();

        db.authors().insert_with_id(1, "John", "Smith").unwrap();
        assert_eq!(db.authors().count().unwrap(), 1);

        db.reset_schema().unwrap();
        assert!(db.authors().is_empty());

        // Idempotent: a second reset leaves the same empty schema
        db.reset_schema().unwrap();
        let schema = SchemaManager::new(db.connection());
        assert_eq!(schema.check_status().unwrap(), SchemaStatus::Current);
    }

    #[test]
    fn test_load_meta_roundtrip() {
        let db = BookDatabase::open_in_memory().unwrap();

        assert!(db.get_load_meta().unwrap().is_none());

        db.set_load_meta("books.tsv", 15).unwrap();
        let meta = db.get_load_meta().unwrap().unwrap();
        assert_eq!(meta.source, "books.tsv");
        assert_eq!(meta.records_loaded, 15);

        // Single-row table: a second load replaces the record
        db.set_load_meta("more.tsv", 3).unwrap();
        let meta = db.get_load_meta().unwrap().unwrap();
        assert_eq!(meta.source, "more.tsv");
    }

    #[test]
    fn test_summary() {
        let db = BookDatabase::open_in_memory().unwrap();
        db.authors().insert_with_id(1, "John", "Smith").unwrap();
        db.publishers().insert_with_id(1, "IEEE").unwrap();

        let summary = db.summary().unwrap();
        assert_eq!(summary.authors, 1);
        assert_eq!(summary.publishers, 1);
        assert_eq!(summary.titles, 0);
        assert!(summary.last_load.is_none());
    }
}
