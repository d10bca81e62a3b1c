//! Author repository for the catalog database

use anyhow::{anyhow, Result};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

/// A row from the authors table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "display", derive(tabled::Tabled))]
pub struct AuthorRecord {
    pub author_id: i64,
    pub first_name: String,
    pub last_name: String,
}

/// Repository for author data operations
pub struct AuthorRepository<'a> {
    conn: &'a Connection,
}

impl<'a> AuthorRepository<'a> {
    /// Create a new author repository
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert an author with an explicit id, keeping any existing row
    ///
    /// Used by the batch loader, where the input carries its own author
    /// ids and repeated ids are expected. Returns `true` if the row was
    /// inserted, `false` if an author with this id already existed.
    pub fn insert_with_id(&self, author_id: i64, first_name: &str, last_name: &str) -> Result<bool> {
        let changed = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO authors (author_id, first_name, last_name)
                 VALUES (?1, ?2, ?3)",
                rusqlite::params![author_id, first_name, last_name],
            )
            .map_err(|e| anyhow!("Failed to insert author {}: {}", author_id, e))?;
        Ok(changed > 0)
    }

    /// Insert a new author and return the store-assigned id
    pub fn insert(&self, first_name: &str, last_name: &str) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO authors (first_name, last_name) VALUES (?1, ?2)",
                rusqlite::params![first_name, last_name],
            )
            .map_err(|e| anyhow!("Failed to insert author '{} {}': {}", first_name, last_name, e))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Update both name fields of an existing author
    ///
    /// Returns the number of rows changed (0 when no author has this id).
    pub fn update_name(&self, author_id: i64, first_name: &str, last_name: &str) -> Result<usize> {
        self.conn
            .execute(
                "UPDATE authors SET first_name = ?2, last_name = ?3 WHERE author_id = ?1",
                rusqlite::params![author_id, first_name, last_name],
            )
            .map_err(|e| anyhow!("Failed to update author {}: {}", author_id, e))
    }

    /// Look up a single author by id
    pub fn get(&self, author_id: i64) -> Result<Option<AuthorRecord>> {
        let result = self.conn.query_row(
            "SELECT author_id, first_name, last_name FROM authors WHERE author_id = ?1",
            [author_id],
            |row| {
                Ok(AuthorRecord {
                    author_id: row.get(0)?,
                    first_name: row.get(1)?,
                    last_name: row.get(2)?,
                })
            },
        );

        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(anyhow!("Failed to get author {}: {}", author_id, e)),
        }
    }

    /// List all authors ordered by last name, then first name, ascending
    pub fn list_ordered(&self) -> Result<Vec<AuthorRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT author_id, first_name, last_name
             FROM authors
             ORDER BY last_name ASC, first_name ASC",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(AuthorRecord {
                    author_id: row.get(0)?,
                    first_name: row.get(1)?,
                    last_name: row.get(2)?,
                })
            })
            .map_err(|e| anyhow!("Failed to list authors: {}", e))?;

        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Check if the authors table is empty
    pub fn is_empty(&self) -> bool {
        self.count().map(|c| c == 0).unwrap_or(true)
    }

    /// Get the count of author rows
    pub fn count(&self) -> Result<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM authors", [], |row| row.get(0))
            .map_err(|e| anyhow!("Failed to get author count: {}", e))?;
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
        let repo = AuthorRepository::new(&db.conn);

        assert!(repo.insert_with_id(1, "John", "Smith").unwrap());
        // Same id again: existing row kept, nothing changed
        assert!(!repo.insert_with_id(1, "Jane", "Doe").unwrap());

        assert_eq!(repo.count().unwrap(), 1);
        let author = repo.get(1).unwrap().unwrap();
        assert_eq!(author.first_name, "John");
        assert_eq!(author.last_name, "Smith");
    }

    #[test]
    fn test_insert_assigns_surrogate_id() {
        let db = setup_test_db();
        let repo = AuthorRepository::new(&db.conn);

        let id1 = repo.insert("John", "Miller").unwrap();
        let id2 = repo.insert("Neil", "Savage").unwrap();
        assert!(id2 > id1);

        let author = repo.get(id1).unwrap().unwrap();
        assert_eq!(author.first_name, "John");
        assert_eq!(author.last_name, "Miller");
    }

    #[test]
    fn test_update_name() {
        let db = setup_test_db();
        let repo = AuthorRepository::new(&db.conn);

        let id = repo.insert("John", "Miller").unwrap();
        let changed = repo.update_name(id, "Mary", "Johnson").unwrap();
        assert_eq!(changed, 1);

        let author = repo.get(id).unwrap().unwrap();
        assert_eq!(author.first_name, "Mary");
        assert_eq!(author.last_name, "Johnson");

        // No author keeps the old names under this id
        let all = repo.list_ordered().unwrap();
        assert!(!all
            .iter()
            .any(|a| a.author_id == id && a.first_name == "John" && a.last_name == "Miller"));
    }

    #[test]
    fn test_update_missing_author_changes_nothing() {
        let db = setup_test_db();
        let repo = AuthorRepository::new(&db.conn);

        assert_eq!(repo.update_name(42, "Mary", "Johnson").unwrap(), 0);
    }

    #[test]
    fn test_list_ordered_by_last_then_first_name() {
        let db = setup_test_db();
        let repo = AuthorRepository::new(&db.conn);

        repo.insert("Neil", "Savage").unwrap();
        repo.insert("Arvind", "Narayanan").unwrap();
        repo.insert("Alice", "Savage").unwrap();

        let names: Vec<(String, String)> = repo
            .list_ordered()
            .unwrap()
            .into_iter()
            .map(|a| (a.last_name, a.first_name))
            .collect();

        assert_eq!(
            names,
            vec![
                ("Narayanan".to_string(), "Arvind".to_string()),
                ("Savage".to_string(), "Alice".to_string()),
                ("Savage".to_string(), "Neil".to_string()),
            ]
        );
    }

    #[test]
    fn test_get_missing_author() {
        let db = setup_test_db();
        let repo = AuthorRepository::new(&db.conn);

        assert!(repo.get(99).unwrap().is_none());
        assert!(repo.is_empty());
    }
}
