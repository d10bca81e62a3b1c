//! Publisher repository for the catalog database

use anyhow::{anyhow, Result};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

/// A row from the publishers table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "display", derive(tabled::Tabled))]
pub struct PublisherRecord {
    pub publisher_id: i64,
    pub publisher_name: String,
}

/// Repository for publisher data operations
pub struct PublisherRepository<'a> {
    conn: &'a Connection,
}

impl<'a> PublisherRepository<'a> {
    /// Create a new publisher repository
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a publisher with an explicit id, keeping any existing row
    ///
    /// Returns `true` if the row was inserted, `false` if a publisher
    /// with this id already existed.
    pub fn insert_with_id(&self, publisher_id: i64, publisher_name: &str) -> Result<bool> {
        let changed = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO publishers (publisher_id, publisher_name)
                 VALUES (?1, ?2)",
                rusqlite::params![publisher_id, publisher_name],
            )
            .map_err(|e| anyhow!("Failed to insert publisher {}: {}", publisher_id, e))?;
        Ok(changed > 0)
    }

    /// Insert a new publisher and return the store-assigned id
    pub fn insert(&self, publisher_name: &str) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO publishers (publisher_name) VALUES (?1)",
                rusqlite::params![publisher_name],
            )
            .map_err(|e| anyhow!("Failed to insert publisher '{}': {}", publisher_name, e))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Rename an existing publisher
    ///
    /// Returns the number of rows changed (0 when no publisher has this id).
    pub fn rename(&self, publisher_id: i64, publisher_name: &str) -> Result<usize> {
        self.conn
            .execute(
                "UPDATE publishers SET publisher_name = ?2 WHERE publisher_id = ?1",
                rusqlite::params![publisher_id, publisher_name],
            )
            .map_err(|e| anyhow!("Failed to rename publisher {}: {}", publisher_id, e))
    }

    /// Look up a single publisher by id
    pub fn get(&self, publisher_id: i64) -> Result<Option<PublisherRecord>> {
        let result = self.conn.query_row(
            "SELECT publisher_id, publisher_name FROM publishers WHERE publisher_id = ?1",
            [publisher_id],
            |row| {
                Ok(PublisherRecord {
                    publisher_id: row.get(0)?,
                    publisher_name: row.get(1)?,
                })
            },
        );

        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(anyhow!("Failed to get publisher {}: {}", publisher_id, e)),
        }
    }

    /// List all publisher names, in storage order
    pub fn list_names(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT publisher_name FROM publishers")?;

        let rows = stmt
            .query_map([], |row| row.get(0))
            .map_err(|e| anyhow!("Failed to list publishers: {}", e))?;

        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Check if the publishers table is empty
    pub fn is_empty(&self) -> bool {
        self.count().map(|c| c == 0).unwrap_or(true)
    }

    /// Get the count of publisher rows
    pub fn count(&self) -> Result<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM publishers", [], |row| row.get(0))
            .map_err(|e| anyhow!("Failed to get publisher count: {}", e))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::core::{DatabaseConn, SchemaManager};

    fn setup_test_db() -> DatabaseConn {
        let db = DatabaseConn::open_in_memory().unwrap();
        let schema = SchemaManager::new(&db.conn);
        schema.initialize().unwrap();
        db
    }

    #[test]
    fn test_insert_with_id_is_idempotent() {
        let db = setup_test_db();
        let repo = PublisherRepository::new(&db.conn);

        assert!(repo.insert_with_id(1, "IEEE").unwrap());
        assert!(!repo.insert_with_id(1, "ACM").unwrap());

        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(repo.get(1).unwrap().unwrap().publisher_name, "IEEE");
    }

    #[test]
    fn test_insert_assigns_surrogate_id() {
        let db = setup_test_db();
        let repo = PublisherRepository::new(&db.conn);

        repo.insert_with_id(1, "IEEE").unwrap();
        let id = repo.insert("Johnson and Johnson").unwrap();
        assert_eq!(id, 2);

        let publisher = repo.get(id).unwrap().unwrap();
        assert_eq!(publisher.publisher_name, "Johnson and Johnson");
    }

    #[test]
    fn test_rename() {
        let db = setup_test_db();
        let repo = PublisherRepository::new(&db.conn);

        let id = repo.insert("Johnson and Johnson").unwrap();
        let changed = repo.rename(id, "Johnson and Thompson").unwrap();
        assert_eq!(changed, 1);
        assert_eq!(
            repo.get(id).unwrap().unwrap().publisher_name,
            "Johnson and Thompson"
        );

        assert_eq!(repo.rename(99, "Nobody").unwrap(), 0);
    }

    #[test]
    fn test_list_names() {
        let db = setup_test_db();
        let repo = PublisherRepository::new(&db.conn);

        repo.insert("IEEE").unwrap();
        repo.insert("ACM").unwrap();

        let names = repo.list_names().unwrap();
        assert_eq!(names, vec!["IEEE".to_string(), "ACM".to_string()]);
    }
}
