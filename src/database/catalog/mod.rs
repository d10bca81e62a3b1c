//! Book catalog storage
//!
//! This module provides per-table data access for the catalog database:
//!
//! - `authors`: author entities with store-assigned surrogate ids
//! - `publishers`: publisher entities with store-assigned surrogate ids
//! - `titles`: title entities keyed by ISBN, each referencing a publisher
//! - `author_isbn`: the many-to-many relation between authors and titles
//!
//! Each repository borrows a live connection and keeps all SQL for its
//! table in one place. Loader-facing inserts use `INSERT OR IGNORE` so a
//! duplicate key keeps the existing row without masking other failure
//! classes (foreign-key violations still surface as errors).

mod authors;
mod links;
mod publishers;
mod titles;

pub use authors::{AuthorRecord, AuthorRepository};
pub use links::AuthorIsbnRepository;
pub use publishers::{PublisherRecord, PublisherRepository};
pub use titles::{TitleByPublisherRecord, TitleRecord, TitleRepository};
