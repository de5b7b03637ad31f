//! Database connection management
//!
//! Connections are opened per operation and dropped when the operation's
//! scope ends, on success and error paths alike.

use crate::errors::{from_rusqlite, io_error, Result};
use rusqlite::Connection;
use std::path::Path;

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Create the parent directory of a database file if it is missing
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
            std::fs::create_dir_all(dir).map_err(|e| io_error("create_db_dir", e))
        }
        _ => Ok(()),
    }
}

/// Switch a file-backed database to WAL journaling
///
/// The mode is persistent in the file, so this only needs to run once.
/// Returns the journal mode SQLite reports afterwards.
pub fn configure(conn: &Connection) -> Result<String> {
    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))
        .map_err(from_rusqlite)
}

/// Run `f` with a freshly opened connection, closing it before returning
pub fn with_connection<T, F>(path: &Path, f: F) -> Result<T>
where
    F: FnOnce(&mut Connection) -> Result<T>,
{
    let mut conn = open(path)?;
    let result = f(&mut conn);
    // close explicitly so close-time failures surface on the success path
    match conn.close() {
        Ok(()) => result,
        Err((_conn, err)) => result.and(Err(from_rusqlite(err))),
    }
}
