use std::path::PathBuf;

use anyhow::Result;
use bookdb::report::render;
use bookdb::*;
use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.bookdb/bookdb.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Database file path, overriding the configured location
    #[clap(long)]
    db: Option<String>,

    /// Print debug information
    #[clap(long)]
    debug: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reset the schema, load a batch file, then run the reports and the demo battery.
    Run {
        /// Path to a tab-separated book data file
        #[clap(name = "FILE")]
        file_path: PathBuf,

        /// Publisher for the by-publisher report, overriding the configured one
        #[clap(short, long)]
        publisher: Option<String>,

        /// Output report results as JSON
        #[clap(long)]
        json: bool,
    },

    /// Load a batch file into the existing schema without resetting.
    Load {
        /// Path to a tab-separated book data file
        #[clap(name = "FILE")]
        file_path: PathBuf,
    },

    /// Run the report queries against the current catalog.
    Report {
        /// Publisher for the by-publisher report, overriding the configured one
        #[clap(short, long)]
        publisher: Option<String>,

        /// Output report results as JSON
        #[clap(long)]
        json: bool,
    },

    /// Show catalog row counts and last-load information.
    Status {
        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Drop and recreate the catalog schema, destroying all data.
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt().with_max_level(Level::INFO).init();
    }

    let config = BookdbConfig::new(&cli.config)?;

    let db_path = match &cli.db {
        Some(path) => path.clone(),
        None => {
            ensure_data_dir(&config.data_dir)?;
            config.sqlite_path()
        }
    };
    let db = BookDatabase::open(&db_path)?;

    match cli.command {
        Commands::Run {
            file_path,
            publisher,
            json,
        } => {
            db.reset_schema()?;
            println!("Catalog schema reset.");

            let summary = load_batch_from_path(&db, &file_path)?;
            print_load_summary(&summary);

            let publisher = publisher.unwrap_or(config.report_publisher);
            print_reports(&db, &publisher, json)?;
            print_demo(&db, json)?;

            let totals = db.summary()?;
            println!();
            println!(
                "Catalog now holds {} authors, {} publishers, {} titles, {} author links.",
                totals.authors, totals.publishers, totals.titles, totals.author_links
            );
        }
        Commands::Load { file_path } => {
            let summary = load_batch_from_path(&db, &file_path)?;
            print_load_summary(&summary);
        }
        Commands::Report { publisher, json } => {
            let publisher = publisher.unwrap_or(config.report_publisher);
            print_reports(&db, &publisher, json)?;
        }
        Commands::Status { json } => {
            let summary = db.summary()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Authors:        {}", summary.authors);
                println!("Publishers:     {}", summary.publishers);
                println!("Titles:         {}", summary.titles);
                println!("Author links:   {}", summary.author_links);
                match summary.last_load {
                    Some(meta) => println!(
                        "Last load:      {} records from '{}' at {}",
                        meta.records_loaded,
                        meta.source,
                        meta.loaded_at_utc()
                    ),
                    None => println!("Last load:      never"),
                }
            }
        }
        Commands::Reset => {
            db.reset_schema()?;
            println!("Catalog schema reset.");
        }
    }

    Ok(())
}

fn print_load_summary(summary: &LoadSummary) {
    println!(
        "Loaded {} records from {} lines ({} malformed skipped, {} duplicates ignored).",
        summary.records_loaded,
        summary.lines_read,
        summary.malformed_skipped,
        summary.duplicates_ignored
    );
}

fn print_reports(db: &BookDatabase, publisher: &str, json: bool) -> Result<()> {
    let reporter = Reporter::new(db);

    let authors = reporter.authors_by_name()?;
    let publishers = reporter.publisher_names()?;
    let titles = reporter.titles_by_publisher(publisher)?;

    if json {
        let value = serde_json::json!({
            "authors": authors,
            "publishers": publishers,
            "titles_by_publisher": {
                "publisher": publisher,
                "titles": titles,
            },
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!();
    println!("Authors by last and first name:");
    println!("{}", render::authors_table(&authors));

    println!();
    println!("Publishers:");
    println!("{}", render::publishers_table(&publishers));

    println!();
    println!("Titles published by {}:", publisher);
    if titles.is_empty() {
        println!("no titles found for publisher '{}'", publisher);
    } else {
        println!("{}", render::titles_table(&titles));
    }

    Ok(())
}

fn print_demo(db: &BookDatabase, json: bool) -> Result<()> {
    let outcomes = run_demo(db);

    if json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
        return Ok(());
    }

    println!();
    println!("Demo mutations:");
    println!("{}", render::demo_table(&outcomes));

    Ok(())
}
