//! Batch loading of tab-separated book records
//!
//! The input is a line-oriented text file, one record per line, with
//! exactly 10 tab-separated fields in fixed column order:
//!
//! ```text
//! authorID  firstName  lastName  publisherID  publisherName  editionNumber  year  price  title  isbn
//! ```
//!
//! Lines with any other field count are skipped and counted; a
//! malformed numeric field aborts the whole batch. Each valid record is
//! inserted into the four catalog tables in foreign-key dependency
//! order (author and publisher before title, title before the relation
//! row), with duplicate keys keeping the existing row.

use crate::database::{BookDatabase, TitleRecord};
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

/// Number of tab-separated fields in a valid record
const RECORD_FIELD_COUNT: usize = 10;

/// One parsed input record, spanning all four catalog tables
#[derive(Debug, Clone, PartialEq)]
pub struct BookRecord {
    pub author_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub publisher_id: i64,
    pub publisher_name: String,
    pub edition_number: u32,
    pub years: String,
    pub price: f64,
    pub title: String,
    pub isbn: String,
}

impl BookRecord {
    /// Parse a single input line
    ///
    /// Returns `Ok(None)` for a line whose field count is not exactly
    /// 10 (such lines are skipped, not errors). A numeric field that
    /// fails to parse is an error and aborts the batch.
    pub fn parse(line: &str) -> Result<Option<BookRecord>> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != RECORD_FIELD_COUNT {
            return Ok(None);
        }

        let author_id: i64 = fields[0]
            .parse()
            .map_err(|_| anyhow!("invalid author id '{}'", fields[0]))?;
        let publisher_id: i64 = fields[3]
            .parse()
            .map_err(|_| anyhow!("invalid publisher id '{}'", fields[3]))?;
        let edition_number: u32 = fields[5]
            .parse()
            .map_err(|_| anyhow!("invalid edition number '{}'", fields[5]))?;
        let price: f64 = fields[7]
            .parse()
            .map_err(|_| anyhow!("invalid price '{}'", fields[7]))?;

        Ok(Some(BookRecord {
            author_id,
            first_name: fields[1].to_string(),
            last_name: fields[2].to_string(),
            publisher_id,
            publisher_name: fields[4].to_string(),
            edition_number,
            years: fields[6].to_string(),
            price,
            title: fields[8].to_string(),
            isbn: fields[9].to_string(),
        }))
    }
}

/// Outcome of a batch load
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadSummary {
    /// Total lines read from the input
    pub lines_read: u64,
    /// Lines that parsed as valid records
    pub records_loaded: u64,
    /// Lines skipped for a wrong field count
    pub malformed_skipped: u64,
    /// New rows inserted per table
    pub authors_inserted: u64,
    pub publishers_inserted: u64,
    pub titles_inserted: u64,
    pub links_inserted: u64,
    /// Inserts that found an existing row under the same key
    pub duplicates_ignored: u64,
}

/// Load a batch of records from a file path
///
/// Failure to open the input is fatal for the run.
pub fn load_batch_from_path(db: &BookDatabase, path: &Path) -> Result<LoadSummary> {
    let file = File::open(path)
        .map_err(|e| anyhow!("Failed to open input file '{}': {}", path.display(), e))?;
    load_batch(db, BufReader::new(file), &path.display().to_string())
}

/// Load a batch of records from any line source
///
/// Each record's four inserts run in foreign-key order; a duplicate key
/// on one insert does not prevent the other three. Duplicates are
/// idempotent by design: the existing row is kept, never updated. Every
/// insert is its own implicit unit of work, so an abort partway through
/// leaves previously-loaded rows in place.
pub fn load_batch<R: BufRead>(db: &BookDatabase, reader: R, source: &str) -> Result<LoadSummary> {
    info!("Loading book records from {}...", source);

    let mut summary = LoadSummary::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| anyhow!("Failed to read input line {}: {}", idx + 1, e))?;
        summary.lines_read += 1;

        let record = BookRecord::parse(&line)
            .map_err(|e| anyhow!("Invalid record on line {}: {}", idx + 1, e))?;
        let Some(record) = record else {
            summary.malformed_skipped += 1;
            continue;
        };

        if db
            .authors()
            .insert_with_id(record.author_id, &record.first_name, &record.last_name)?
        {
            summary.authors_inserted += 1;
        } else {
            summary.duplicates_ignored += 1;
        }

        if db
            .publishers()
            .insert_with_id(record.publisher_id, &record.publisher_name)?
        {
            summary.publishers_inserted += 1;
        } else {
            summary.duplicates_ignored += 1;
        }

        let title = TitleRecord {
            isbn: record.isbn.clone(),
            edition_number: record.edition_number,
            years: record.years.clone(),
            publisher_id: record.publisher_id,
            price: record.price,
            title: record.title.clone(),
        };
        if db.titles().insert_or_ignore(&title)? {
            summary.titles_inserted += 1;
        } else {
            summary.duplicates_ignored += 1;
        }

        if db
            .author_isbn()
            .link_or_ignore(record.author_id, &record.isbn)?
        {
            summary.links_inserted += 1;
        } else {
            summary.duplicates_ignored += 1;
        }

        summary.records_loaded += 1;
    }

    db.set_load_meta(source, summary.records_loaded)?;

    info!(
        "Batch load finished: {} records from {} lines ({} malformed skipped, {} duplicates ignored)",
        summary.records_loaded, summary.lines_read, summary.malformed_skipped, summary.duplicates_ignored
    );

    Ok(summary)
}
