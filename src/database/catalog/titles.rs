//! Title repository for the catalog database

use anyhow::{anyhow, Result};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

/// A row from the titles table
///
/// The ISBN is the natural key; `publisher_id` must reference an
/// existing publisher row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "display", derive(tabled::Tabled))]
pub struct TitleRecord {
    pub isbn: String,
    pub edition_number: u32,
    pub years: String,
    pub publisher_id: i64,
    pub price: f64,
    pub title: String,
}

/// A title row projected for the by-publisher report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "display", derive(tabled::Tabled))]
pub struct TitleByPublisherRecord {
    pub title: String,
    pub years: String,
    pub isbn: String,
}

/// Repository for title data operations
pub struct TitleRepository<'a> {
    conn: &'a Connection,
}

impl<'a> TitleRepository<'a> {
    /// Create a new title repository
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a title, keeping any existing row with the same ISBN
    ///
    /// Returns `true` if the row was inserted, `false` if a title with
    /// this ISBN already existed. A missing publisher still errors: the
    /// ignored class is confined to duplicate keys.
    pub fn insert_or_ignore(&self, record: &TitleRecord) -> Result<bool> {
        let changed = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO titles
                 (isbn, edition_number, years, publisher_id, price, title)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    record.isbn,
                    record.edition_number,
                    record.years,
                    record.publisher_id,
                    record.price,
                    record.title,
                ],
            )
            .map_err(|e| anyhow!("Failed to insert title '{}': {}", record.isbn, e))?;
        Ok(changed > 0)
    }

    /// Insert a title, erroring on any conflict
    pub fn insert(&self, record: &TitleRecord) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO titles
                 (isbn, edition_number, years, publisher_id, price, title)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    record.isbn,
                    record.edition_number,
                    record.years,
                    record.publisher_id,
                    record.price,
                    record.title,
                ],
            )
            .map_err(|e| anyhow!("Failed to insert title '{}': {}", record.isbn, e))?;
        Ok(())
    }

    /// Look up a single title by ISBN
    pub fn get(&self, isbn: &str) -> Result<Option<TitleRecord>> {
        let result = self.conn.query_row(
            "SELECT isbn, edition_number, years, publisher_id, price, title
             FROM titles WHERE isbn = ?1",
            [isbn],
            |row| {
                Ok(TitleRecord {
                    isbn: row.get(0)?,
                    edition_number: row.get(1)?,
                    years: row.get(2)?,
                    publisher_id: row.get(3)?,
                    price: row.get(4)?,
                    title: row.get(5)?,
                })
            },
        );

        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(anyhow!("Failed to get title '{}': {}", isbn, e)),
        }
    }

    /// List titles published by a named publisher, ordered by title
    ///
    /// Projects (title, years, isbn) for every title whose publisher
    /// name matches exactly, alphabetical by title.
    pub fn by_publisher_name(&self, publisher_name: &str) -> Result<Vec<TitleByPublisherRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.title, t.years, t.isbn
             FROM titles t
             JOIN publishers p ON t.publisher_id = p.publisher_id
             WHERE p.publisher_name = ?1
             ORDER BY t.title ASC",
        )?;

        let rows = stmt
            .query_map([publisher_name], |row| {
                Ok(TitleByPublisherRecord {
                    title: row.get(0)?,
                    years: row.get(1)?,
                    isbn: row.get(2)?,
                })
            })
            .map_err(|e| anyhow!("Failed to list titles by publisher: {}", e))?;

        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Check if the titles table is empty
    pub fn is_empty(&self) -> bool {
        self.count().map(|c| c == 0).unwrap_or(true)
    }

    /// Get the count of title rows
    pub fn count(&self) -> Result<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM titles", [], |row| row.get(0))
            .map_err(|e| anyhow!("Failed to get title count: {}", e))?;
        Ok(count)
    }
}
