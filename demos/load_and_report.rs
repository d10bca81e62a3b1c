//! Load and Report Example
//!
//! This example runs the full pipeline against an in-memory database:
//! schema reset, batch load from the bundled sample file, report
//! queries, and the demo mutation battery.
//!
//! # Feature Requirements
//!
//! This example requires the `display` feature for table rendering.
//!
//! # Running
//!
//! ```bash
//! cargo run --example load_and_report --features display
//! ```

use bookdb::database::BookDatabase;
use bookdb::loader::load_batch_from_path;
use bookdb::report::{render, run_demo, Reporter, DEFAULT_REPORT_PUBLISHER};
use std::path::Path;

fn main() -> anyhow::Result<()> {
    let db = BookDatabase::open_in_memory()?;
    db.reset_schema()?;

    let summary = load_batch_from_path(&db, Path::new("data/books.tsv"))?;
    println!(
        "Loaded {} records from {} lines",
        summary.records_loaded, summary.lines_read
    );

    let reporter = Reporter::new(&db);

    println!("\nAuthors by last and first name:");
    println!("{}", render::authors_table(&reporter.authors_by_name()?));

    println!("\nPublishers:");
    println!(
        "{}",
        render::publishers_table(&reporter.publisher_names()?)
    );

    println!("\nTitles published by {}:", DEFAULT_REPORT_PUBLISHER);
    println!(
        "{}",
        render::titles_table(&reporter.titles_by_publisher(DEFAULT_REPORT_PUBLISHER)?)
    );

    println!("\nDemo mutations:");
    println!("{}", render::demo_table(&run_demo(&db)));

    Ok(())
}
