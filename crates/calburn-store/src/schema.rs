//! Schema bootstrap
//!
//! The store owns a single table. It is created if absent and never
//! altered, so databases written by earlier deployments are adopted as-is.

use crate::errors::{storage_error, Result};
use rusqlite::Connection;

pub const PREDICTIONS_TABLE: &str = "predictions";

pub const CREATE_PREDICTIONS: &str = "
    CREATE TABLE IF NOT EXISTS predictions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        gender TEXT,
        age INTEGER,
        height REAL,
        weight REAL,
        duration REAL,
        heart_rate REAL,
        body_temp REAL,
        prediction REAL
    )";

/// Create the predictions table if it does not exist
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_PREDICTIONS, [])
        .map_err(|e| storage_error("initialize", e))?;
    Ok(())
}

/// Whether a table with the given name exists
pub fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get(0),
        )
        .map_err(|e| storage_error("table_exists", e))?;
    Ok(count > 0)
}
