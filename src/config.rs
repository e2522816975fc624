use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".student-registry";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "students.sqlite";
/// Log file written next to the database while the TUI owns the terminal.
const LOG_FILE_NAME: &str = "student-registry.log";

/// Command-line overrides for the default file locations.
#[derive(Debug, Parser)]
#[command(name = "student-registry", about = "Register, list, edit and delete students")]
pub struct Cli {
    /// Path to the SQLite database file
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Path to the log file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Resolved file locations the binary runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_path: PathBuf,
}

impl Config {
    /// Fill in whatever the command line left out with paths inside the
    /// user's home directory.
    pub fn resolve(cli: Cli) -> Result<Self> {
        let (db_path, log_path) = match (cli.db, cli.log_file) {
            (Some(db), Some(log)) => (db, log),
            (db, log) => {
                let data_dir = data_dir()?;
                (
                    db.unwrap_or_else(|| data_dir.join(DB_FILE_NAME)),
                    log.unwrap_or_else(|| data_dir.join(LOG_FILE_NAME)),
                )
            }
        };

        Ok(Self { db_path, log_path })
    }
}

/// Resolve the application data directory inside the user's home.
fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
