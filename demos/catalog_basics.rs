//! Catalog Basics Example
//!
//! This example demonstrates using BookDatabase for catalog operations
//! against an in-memory database.
//!
//! # Running
//!
//! ```bash
//! cargo run --example catalog_basics
//! ```

use bookdb::database::BookDatabase;
use bookdb::loader::load_batch;
use std::io::Cursor;

fn main() -> anyhow::Result<()> {
    println!("=== Bookdb Catalog Basics Example ===\n");

    // Example 1: Create an in-memory database
    println!("1. Creating in-memory database:");
    let db = BookDatabase::open_in_memory()?;
    println!("   Database created successfully");

    // Example 2: Check catalog repositories
    println!("\n2. Checking catalog repositories:");
    println!("   Authors are empty: {}", db.authors().is_empty());
    println!("   Publishers are empty: {}", db.publishers().is_empty());
    println!("   Titles are empty: {}", db.titles().is_empty());

    // Example 3: Load a small batch
    println!("\n3. Loading a small batch:");
    let batch = "1\tJohn\tSmith\t1\tIEEE\t1\t1993\t55.00\tTest Book\t1234567890\n\
                 2\tJane\tDoe\t1\tIEEE\t1\t1993\t55.00\tTest Book\t1234567890\n";
    let summary = load_batch(&db, Cursor::new(batch.to_string()), "inline-batch")?;
    println!(
        "   Loaded {} records ({} authors, {} publishers, {} titles, {} links)",
        summary.records_loaded,
        summary.authors_inserted,
        summary.publishers_inserted,
        summary.titles_inserted,
        summary.links_inserted
    );

    // Example 4: Query the catalog
    println!("\n4. Querying the catalog:");
    for author in db.authors().list_ordered()? {
        println!(
            "   author {}: {}, {}",
            author.author_id, author.last_name, author.first_name
        );
    }

    // Example 5: Inspect load metadata
    println!("\n5. Load metadata:");
    if let Some(meta) = db.get_load_meta()? {
        println!(
            "   {} records from '{}' at {}",
            meta.records_loaded,
            meta.source,
            meta.loaded_at_utc()
        );
    }

    // Example 6: Destructive reset
    println!("\n6. Resetting the schema:");
    db.reset_schema()?;
    println!("   Authors are empty again: {}", db.authors().is_empty());

    println!("\n=== Example completed successfully ===");
    Ok(())
}
