use std::fs;
use std::path::Path;

use rusqlite::Connection;

use super::StoreError;

/// Make sure the parent directory exists and open a connection to the SQLite
/// file. Callers drop the connection as soon as their single statement is
/// done.
pub(crate) fn open(db_path: &Path) -> Result<Connection, StoreError> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(StoreError::DataDir)?;
        }
    }

    Ok(Connection::open(db_path)?)
}

/// Create the `student` table when it does not exist yet. This is the only
/// migration the application runs.
///
/// `name` is declared NOT NULL: the registration service relies on the store
/// rejecting a nameless row and reports "Required field" from that failure.
pub(crate) fn ensure_schema(db_path: &Path) -> Result<(), StoreError> {
    let conn = open(db_path)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS student (
            idstudent INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT UNIQUE,
            sex TEXT,
            branch TEXT,
            programming TEXT
        )",
        [],
    )?;

    Ok(())
}
