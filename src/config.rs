use crate::report::DEFAULT_REPORT_PUBLISHER;
use anyhow::{anyhow, Result};
use config::Config;
use std::collections::HashMap;
use std::path::Path;

pub struct BookdbConfig {
    /// Path to the directory holding bookdb's data
    pub data_dir: String,

    /// Publisher whose titles the by-publisher report lists
    pub report_publisher: String,
}

const EMPTY_CONFIG: &str = r#"### bookdb configuration file

### directory for the catalog database
# data_dir = "~/.bookdb"

### publisher listed by the by-publisher report
# report_publisher = "IEEE"
"#;

impl Default for BookdbConfig {
    fn default() -> Self {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| ".".to_string());

        Self {
            data_dir: format!("{}/.bookdb", home_dir),
            report_publisher: DEFAULT_REPORT_PUBLISHER.to_string(),
        }
    }
}

impl BookdbConfig {
    /// Create and initialize a new configuration
    ///
    /// Reads `{path}` when given, otherwise `$HOME/.bookdb/bookdb.toml`
    /// (created with a commented template when missing). Environment
    /// variables with the `BOOKDB` prefix override file settings, e.g.
    /// `BOOKDB_DATA_DIR=/tmp/bookdb`.
    pub fn new(path: &Option<String>) -> Result<BookdbConfig> {
        let mut builder = Config::builder();

        let home_dir = dirs::home_dir()
            .ok_or_else(|| anyhow!("Could not find home directory"))?
            .to_str()
            .ok_or_else(|| anyhow!("Could not convert home directory path to string"))?
            .to_owned();

        let bookdb_dir = format!("{}/.bookdb", home_dir.as_str());

        match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if path.exists() {
                    let path_str = path
                        .to_str()
                        .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                    builder = builder.add_source(config::File::with_name(path_str));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file: {}", e))?;
                }
            }
            None => {
                std::fs::create_dir_all(bookdb_dir.as_str())
                    .map_err(|e| anyhow!("Unable to create bookdb directory: {}", e))?;
                let p = format!("{}/bookdb.toml", bookdb_dir.as_str());
                if Path::new(p.as_str()).exists() {
                    builder = builder.add_source(config::File::with_name(p.as_str()));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG).map_err(|e| {
                        anyhow!("Unable to create config file {}: {}", p.as_str(), e)
                    })?;
                }
            }
        }

        // Settings from the environment, e.g. BOOKDB_DATA_DIR
        builder = builder.add_source(config::Environment::with_prefix("BOOKDB"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        let data_dir = match config.get("data_dir") {
            Some(p) => p.trim_end_matches('/').to_string(),
            None => {
                std::fs::create_dir_all(bookdb_dir.as_str())
                    .map_err(|e| anyhow!("Unable to create data directory: {}", e))?;
                bookdb_dir
            }
        };

        let report_publisher = config
            .get("report_publisher")
            .cloned()
            .unwrap_or_else(|| DEFAULT_REPORT_PUBLISHER.to_string());

        Ok(BookdbConfig {
            data_dir,
            report_publisher,
        })
    }

    /// Get the path to the SQLite database file
    pub fn sqlite_path(&self) -> String {
        let data_dir = self.data_dir.trim_end_matches('/');
        format!("{}/bookdb-catalog.sqlite3", data_dir)
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        [
            format!("Data Directory:     {}", self.data_dir),
            format!("SQLite Path:        {}", self.sqlite_path()),
            format!("Report Publisher:   {}", self.report_publisher),
        ]
        .join("\n")
    }
}
