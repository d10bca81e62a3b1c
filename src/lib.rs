#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! Bookdb - a book catalog batch loader
//!
//! Bookdb loads tab-separated book records into a relational catalog
//! (authors, publishers, titles, and the author-title relation), then
//! runs a fixed battery of report queries and insert/update/verify
//! mutations against it. It can be used as both a command-line
//! application and a library.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - **[`database`]**: All database functionality
//!   - `core`: SQLite connection management and schema definitions
//!   - `catalog`: Per-table repositories (authors, publishers, titles, links)
//! - **[`loader`]**: Tab-separated batch record parsing and loading
//! - **[`report`]**: Report queries and the demo mutation battery
//! - **[`config`]**: Configuration management
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | `display` | Table formatting with `tabled` | `tabled` |
//! | `cli` | Full CLI binary (default) | `clap`, `tracing-subscriber` |
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use bookdb::database::BookDatabase;
//! use bookdb::loader::load_batch_from_path;
//! use bookdb::report::{run_demo, Reporter};
//! use std::path::Path;
//!
//! let db = BookDatabase::open_in_memory()?;
//!
//! // Destructive reset, then load a batch
//! db.reset_schema()?;
//! let summary = load_batch_from_path(&db, Path::new("data/books.tsv"))?;
//! println!("loaded {} records", summary.records_loaded);
//!
//! // Report queries
//! let reporter = Reporter::new(&db);
//! for author in reporter.authors_by_name()? {
//!     println!("{}, {}", author.last_name, author.first_name);
//! }
//!
//! // Fixed mutation battery
//! for outcome in run_demo(&db) {
//!     println!("{}: {}", outcome.step, outcome.status);
//! }
//! ```

pub mod config;
pub mod database;
pub mod loader;
pub mod report;

// =============================================================================
// Configuration
// =============================================================================

pub use config::BookdbConfig;

// =============================================================================
// Database - re-export commonly used types
// =============================================================================

pub use database::{ensure_data_dir, BookDatabase, CatalogSummary, LoadMeta};

pub use database::{DatabaseConn, SchemaDefinitions, SchemaManager, SchemaStatus};

pub use database::{
    AuthorIsbnRepository, AuthorRecord, AuthorRepository, PublisherRecord, PublisherRepository,
    TitleByPublisherRecord, TitleRecord, TitleRepository,
};

// =============================================================================
// Loader and reporter
// =============================================================================

pub use loader::{load_batch, load_batch_from_path, BookRecord, LoadSummary};

pub use report::{run_demo, DemoOutcome, DemoStatus, Reporter, DEFAULT_REPORT_PUBLISHER};
