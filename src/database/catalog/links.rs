//! Author-to-title relation repository
//!
//! The `author_isbn` table records which authors wrote which titles.
//! One title may have several authors and one author several titles;
//! the composite primary key keeps each pairing unique.

use anyhow::{anyhow, Result};
use rusqlite::Connection;

/// Repository for the author_isbn relation
pub struct AuthorIsbnRepository<'a> {
    conn: &'a Connection,
}

impl<'a> AuthorIsbnRepository<'a> {
    /// Create a new relation repository
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Link an author to a title, keeping any existing link
    ///
    /// Both the author and the title must already exist; a missing
    /// referent is an error, only the duplicate-pair case is ignored.
    /// Returns `true` if the link was inserted.
    pub fn link_or_ignore(&self, author_id: i64, isbn: &str) -> Result<bool> {
        let changed = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO author_isbn (author_id, isbn) VALUES (?1, ?2)",
                rusqlite::params![author_id, isbn],
            )
            .map_err(|e| anyhow!("Failed to link author {} to '{}': {}", author_id, isbn, e))?;
        Ok(changed > 0)
    }

    /// Check whether a specific author-title link exists
    pub fn exists(&self, author_id: i64, isbn: &str) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM author_isbn WHERE author_id = ?1 AND isbn = ?2",
                rusqlite::params![author_id, isbn],
                |row| row.get(0),
            )
            .map_err(|e| anyhow!("Failed to check author-title link: {}", e))?;
        Ok(count > 0)
    }

    /// Get the count of relation rows
    pub fn count(&self) -> Result<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM author_isbn", [], |row| row.get(0))
            .map_err(|e| anyhow!("Failed to get relation count: {}", e))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::catalog::{
        AuthorRepository, PublisherRepository, TitleRecord, TitleRepository,
    };
    use crate::database::core::{DatabaseConn, SchemaManager};

    fn setup_test_db() -> DatabaseConn {
        let db = DatabaseConn::open_in_memory().unwrap();
        let schema = SchemaManager::new(&db.conn);
        schema.initialize().unwrap();

        AuthorRepository::new(&db.conn)
            .insert_with_id(1, "John", "Smith")
            .unwrap();
        PublisherRepository::new(&db.conn)
            .insert_with_id(1, "IEEE")
            .unwrap();
        TitleRepository::new(&db.conn)
            .insert_or_ignore(&TitleRecord {
                isbn: "1234567890".to_string(),
                edition_number: 1,
                years: "1993".to_string(),
                publisher_id: 1,
                price: 55.0,
                title: "Test Book".to_string(),
            })
            .unwrap();
        db
    }

    #[test]
    fn test_link_is_idempotent() {
        let db = setup_test_db();
        let repo = AuthorIsbnRepository::new(&db.conn);

        assert!(repo.link_or_ignore(1, "1234567890").unwrap());
        assert!(!repo.link_or_ignore(1, "1234567890").unwrap());

        assert_eq!(repo.count().unwrap(), 1);
        assert!(repo.exists(1, "1234567890").unwrap());
    }

    #[test]
    fn test_link_rejects_missing_referents() {
        let db = setup_test_db();
        let repo = AuthorIsbnRepository::new(&db.conn);

        assert!(repo.link_or_ignore(2, "1234567890").is_err());
        assert!(repo.link_or_ignore(1, "0000000000").is_err());
        assert_eq!(repo.count().unwrap(), 0);
    }
}
