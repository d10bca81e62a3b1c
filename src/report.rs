//! Report queries and the demo mutation battery
//!
//! The reporter wraps the fixed battery of read queries run after a
//! batch load, and the fixed sequence of insert/update/verify
//! mutations against named rows. Every mutation that needs a surrogate
//! id captures it from the insert itself rather than assuming a value,
//! so the verification half always checks the row that was actually
//! written.

use crate::database::{AuthorRecord, BookDatabase, TitleByPublisherRecord, TitleRecord};
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Publisher whose titles the by-publisher report lists by default
pub const DEFAULT_REPORT_PUBLISHER: &str = "IEEE";

/// Name of the author inserted by the demo battery
const DEMO_AUTHOR: (&str, &str) = ("John", "Miller");
/// Name the demo author is renamed to
const DEMO_AUTHOR_EDITED: (&str, &str) = ("Mary", "Johnson");
/// Name of the publisher inserted by the demo battery
const DEMO_PUBLISHER: &str = "Johnson and Johnson";
/// Name the demo publisher is renamed to
const DEMO_PUBLISHER_EDITED: &str = "Johnson and Thompson";
/// Publisher id referenced by the demo title insert
const DEMO_TITLE_PUBLISHER_ID: i64 = 5;

/// Read-only report queries over the catalog
pub struct Reporter<'a> {
    db: &'a BookDatabase,
}

impl<'a> Reporter<'a> {
    /// Create a reporter over the given database
    pub fn new(db: &'a BookDatabase) -> Self {
        Self { db }
    }

    /// All authors, ordered by last name then first name ascending
    pub fn authors_by_name(&self) -> Result<Vec<AuthorRecord>> {
        self.db.authors().list_ordered()
    }

    /// All publisher names, unordered
    pub fn publisher_names(&self) -> Result<Vec<String>> {
        self.db.publishers().list_names()
    }

    /// (title, year, isbn) for every title of the named publisher,
    /// ordered alphabetically by title
    pub fn titles_by_publisher(&self, publisher_name: &str) -> Result<Vec<TitleByPublisherRecord>> {
        self.db.titles().by_publisher_name(publisher_name)
    }
}

/// Status of one demo battery step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DemoStatus {
    /// Mutation applied and the follow-up select confirmed it
    Verified,
    /// Mutation applied (step has no verification half)
    Applied,
    /// Step failed; the battery continued
    Failed,
}

impl fmt::Display for DemoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemoStatus::Verified => write!(f, "verified"),
            DemoStatus::Applied => write!(f, "applied"),
            DemoStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome of one demo battery step
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "display", derive(tabled::Tabled))]
pub struct DemoOutcome {
    pub step: String,
    pub status: DemoStatus,
    pub detail: String,
}

impl DemoOutcome {
    fn ok(step: &str, status: DemoStatus, detail: String) -> Self {
        Self {
            step: step.to_string(),
            status,
            detail,
        }
    }

    fn failed(step: &str, err: &anyhow::Error) -> Self {
        warn!("demo step '{}' failed: {}", step, err);
        Self {
            step: step.to_string(),
            status: DemoStatus::Failed,
            detail: err.to_string(),
        }
    }
}

/// Run the fixed demo mutation battery
///
/// Steps run in order and are independent: a failed step is recorded
/// and the battery continues. Later steps only depend on earlier ones
/// through the captured surrogate ids (the author edit targets the id
/// returned by the author insert, likewise for the publisher rename).
pub fn run_demo(db: &BookDatabase) -> Vec<DemoOutcome> {
    let mut outcomes = Vec::new();

    // Insert one new author, verify by selecting the captured id
    let author_id = match insert_demo_author(db) {
        Ok((id, outcome)) => {
            outcomes.push(outcome);
            Some(id)
        }
        Err(e) => {
            outcomes.push(DemoOutcome::failed("add author", &e));
            None
        }
    };

    // Edit that author's name, verify both fields on the same id
    match author_id {
        Some(id) => match edit_demo_author(db, id) {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => outcomes.push(DemoOutcome::failed("edit author", &e)),
        },
        None => outcomes.push(DemoOutcome::failed(
            "edit author",
            &anyhow!("no author to edit: the insert step failed"),
        )),
    }

    // Insert one new title with fixed field values
    match add_demo_title(db) {
        Ok(outcome) => outcomes.push(outcome),
        Err(e) => outcomes.push(DemoOutcome::failed("add title", &e)),
    }

    // Insert one new publisher, verify by the captured id
    let publisher_id = match insert_demo_publisher(db) {
        Ok((id, outcome)) => {
            outcomes.push(outcome);
            Some(id)
        }
        Err(e) => {
            outcomes.push(DemoOutcome::failed("add publisher", &e));
            None
        }
    };

    // Rename that publisher, verify on the same id
    match publisher_id {
        Some(id) => match rename_demo_publisher(db, id) {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => outcomes.push(DemoOutcome::failed("rename publisher", &e)),
        },
        None => outcomes.push(DemoOutcome::failed(
            "rename publisher",
            &anyhow!("no publisher to rename: the insert step failed"),
        )),
    }

    outcomes
}

fn insert_demo_author(db: &BookDatabase) -> Result<(i64, DemoOutcome)> {
    let (first, last) = DEMO_AUTHOR;
    let id = db.authors().insert(first, last)?;

    let found = db
        .authors()
        .get(id)?
        .ok_or_else(|| anyhow!("inserted author {} not found on re-select", id))?;
    if found.first_name != first || found.last_name != last {
        return Err(anyhow!(
            "author {} holds '{} {}' instead of '{} {}'",
            id,
            found.first_name,
            found.last_name,
            first,
            last
        ));
    }

    Ok((
        id,
        DemoOutcome::ok(
            "add author",
            DemoStatus::Verified,
            format!("author {} is '{} {}'", id, first, last),
        ),
    ))
}

fn edit_demo_author(db: &BookDatabase, id: i64) -> Result<DemoOutcome> {
    let (first, last) = DEMO_AUTHOR_EDITED;
    let changed = db.authors().update_name(id, first, last)?;
    if changed == 0 {
        return Err(anyhow!("author {} no longer exists", id));
    }

    let found = db
        .authors()
        .get(id)?
        .ok_or_else(|| anyhow!("author {} not found after update", id))?;
    if found.first_name != first || found.last_name != last {
        return Err(anyhow!(
            "author {} holds '{} {}' after update",
            id,
            found.first_name,
            found.last_name
        ));
    }

    Ok(DemoOutcome::ok(
        "edit author",
        DemoStatus::Verified,
        format!("author {} renamed to '{} {}'", id, first, last),
    ))
}

fn add_demo_title(db: &BookDatabase) -> Result<DemoOutcome> {
    let record = TitleRecord {
        isbn: "12345678".to_string(),
        edition_number: 1,
        years: "1993".to_string(),
        publisher_id: DEMO_TITLE_PUBLISHER_ID,
        price: 55.0,
        title: "Marching Band".to_string(),
    };
    db.titles().insert(&record)?;

    Ok(DemoOutcome::ok(
        "add title",
        DemoStatus::Applied,
        format!("title '{}' ({})", record.title, record.isbn),
    ))
}

fn insert_demo_publisher(db: &BookDatabase) -> Result<(i64, DemoOutcome)> {
    let id = db.publishers().insert(DEMO_PUBLISHER)?;

    let found = db
        .publishers()
        .get(id)?
        .ok_or_else(|| anyhow!("inserted publisher {} not found on re-select", id))?;
    if found.publisher_name != DEMO_PUBLISHER {
        return Err(anyhow!(
            "publisher {} holds '{}' instead of '{}'",
            id,
            found.publisher_name,
            DEMO_PUBLISHER
        ));
    }

    Ok((
        id,
        DemoOutcome::ok(
            "add publisher",
            DemoStatus::Verified,
            format!("publisher {} is '{}'", id, DEMO_PUBLISHER),
        ),
    ))
}

fn rename_demo_publisher(db: &BookDatabase, id: i64) -> Result<DemoOutcome> {
    let changed = db.publishers().rename(id, DEMO_PUBLISHER_EDITED)?;
    if changed == 0 {
        return Err(anyhow!("publisher {} no longer exists", id));
    }

    let found = db
        .publishers()
        .get(id)?
        .ok_or_else(|| anyhow!("publisher {} not found after rename", id))?;
    if found.publisher_name != DEMO_PUBLISHER_EDITED {
        return Err(anyhow!(
            "publisher {} holds '{}' after rename",
            id,
            found.publisher_name
        ));
    }

    Ok(DemoOutcome::ok(
        "rename publisher",
        DemoStatus::Verified,
        format!("publisher {} renamed to '{}'", id, DEMO_PUBLISHER_EDITED),
    ))
}

/// Table rendering for report and demo output
#[cfg(feature = "display")]
pub mod render {
    use super::DemoOutcome;
    use crate::database::{AuthorRecord, TitleByPublisherRecord};
    use tabled::settings::Style;
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct PublisherNameRow {
        publisher_name: String,
    }

    /// Render the ordered author listing as a bordered table
    pub fn authors_table(rows: &[AuthorRecord]) -> String {
        Table::new(rows.to_vec()).with(Style::rounded()).to_string()
    }

    /// Render the publisher name listing as a bordered table
    pub fn publishers_table(names: &[String]) -> String {
        let rows: Vec<PublisherNameRow> = names
            .iter()
            .map(|n| PublisherNameRow {
                publisher_name: n.clone(),
            })
            .collect();
        Table::new(rows).with(Style::rounded()).to_string()
    }

    /// Render the by-publisher title listing as a bordered table
    pub fn titles_table(rows: &[TitleByPublisherRecord]) -> String {
        Table::new(rows.to_vec()).with(Style::rounded()).to_string()
    }

    /// Render demo battery outcomes as a bordered table
    pub fn demo_table(outcomes: &[DemoOutcome]) -> String {
        Table::new(outcomes.to_vec())
            .with(Style::rounded())
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_batch;
    use std::io::Cursor;

    /// Five publishers so the demo title insert has a valid referent
    const BATCH: &str = "\
1\tJohn\tSmith\t1\tIEEE\t1\t1993\t55.00\tCircuit Design\t1111111111
2\tNeil\tSavage\t1\tIEEE\t2\t2001\t25.50\tSignal Processing\t2222222222
3\tArvind\tNarayanan\t2\tACM\t1\t2017\t30.00\tBitcoin's Academic Pedigree\t3333333333
4\tJane\tDoe\t3\tSpringer\t1\t2005\t80.00\tGraph Theory\t4444444444
5\tAlan\tTuring\t4\tOxford Press\t1\t1950\t15.00\tComputing Machinery\t5555555555
6\tDonald\tKnuth\t5\tAddison-Wesley\t3\t1997\t99.99\tThe Art of Computer Programming\t6666666666
";

    fn loaded_db() -> BookDatabase {
        let db = BookDatabase::open_in_memory().unwrap();
        load_batch(&db, Cursor::new(BATCH.to_string()), "test-batch").unwrap();
        db
    }

    #[test]
    fn test_authors_by_name() {
        let db = loaded_db();
        let reporter = Reporter::new(&db);

        let authors = reporter.authors_by_name().unwrap();
        assert_eq!(authors.len(), 6);
        assert_eq!(authors[0].last_name, "Doe");
        assert_eq!(authors[5].last_name, "Turing");
    }

    #[test]
    fn test_publisher_names() {
        let db = loaded_db();
        let reporter = Reporter::new(&db);

        let names = reporter.publisher_names().unwrap();
        assert_eq!(names.len(), 5);
        assert!(names.contains(&"IEEE".to_string()));
    }

    #[test]
    fn test_titles_by_publisher_ordered() {
        let db = loaded_db();
        let reporter = Reporter::new(&db);

        let titles = reporter
            .titles_by_publisher(DEFAULT_REPORT_PUBLISHER)
            .unwrap();
        let names: Vec<&str> = titles.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(names, vec!["Circuit Design", "Signal Processing"]);

        assert!(reporter.titles_by_publisher("Elsevier").unwrap().is_empty());
    }

    #[test]
    fn test_demo_battery_all_steps_pass() {
        let db = loaded_db();
        let outcomes = run_demo(&db);

        assert_eq!(outcomes.len(), 5);
        let statuses: Vec<DemoStatus> = outcomes.iter().map(|o| o.status).collect();
        assert_eq!(
            statuses,
            vec![
                DemoStatus::Verified,
                DemoStatus::Verified,
                DemoStatus::Applied,
                DemoStatus::Verified,
                DemoStatus::Verified,
            ]
        );

        // The edited author replaced the inserted one under the same id
        let authors = db.authors().list_ordered().unwrap();
        assert!(authors
            .iter()
            .any(|a| a.first_name == "Mary" && a.last_name == "Johnson"));
        assert!(!authors
            .iter()
            .any(|a| a.first_name == "John" && a.last_name == "Miller"));

        // The renamed publisher replaced the inserted one
        let names = db.publishers().list_names().unwrap();
        assert!(names.contains(&"Johnson and Thompson".to_string()));
        assert!(!names.contains(&"Johnson and Johnson".to_string()));

        // The demo title landed under publisher 5
        let title = db.titles().get("12345678").unwrap().unwrap();
        assert_eq!(title.title, "Marching Band");
        assert_eq!(title.publisher_id, 5);
    }

    #[test]
    fn test_demo_title_fails_without_publisher_but_battery_continues() {
        // Empty catalog: publisher 5 does not exist, so the title insert
        // must fail while every other step still runs
        let db = BookDatabase::open_in_memory().unwrap();
        let outcomes = run_demo(&db);

        assert_eq!(outcomes.len(), 5);
        assert_eq!(outcomes[2].step, "add title");
        assert_eq!(outcomes[2].status, DemoStatus::Failed);

        assert_eq!(outcomes[0].status, DemoStatus::Verified);
        assert_eq!(outcomes[1].status, DemoStatus::Verified);
        assert_eq!(outcomes[3].status, DemoStatus::Verified);
        assert_eq!(outcomes[4].status, DemoStatus::Verified);
    }

    #[test]
    fn test_demo_is_rerunnable_after_reset() {
        let db = loaded_db();
        run_demo(&db);

        db.reset_schema().unwrap();
        load_batch(&db, Cursor::new(BATCH.to_string()), "test-batch").unwrap();
        let outcomes = run_demo(&db);
        assert!(outcomes.iter().all(|o| o.status != DemoStatus::Failed));
    }
}
