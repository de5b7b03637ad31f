//! SQLite prediction store
//!
//! Every public operation opens its own connection through
//! `db::with_connection` and releases it before returning.

use std::path::{Path, PathBuf};
use std::time::Instant;

use calburn_core::model::{NewPrediction, PredictionRecord};
use calburn_core::{log_op_end, log_op_error, log_op_start, PredictionLog};
use rusqlite::Connection;
use tracing::info;

use crate::db;
use crate::errors::{corrupt_row, storage_error, Result};
use crate::schema;

/// SQLite-backed `PredictionLog`
#[derive(Debug, Clone)]
pub struct SqlitePredictionStore {
    path: PathBuf,
}

impl SqlitePredictionStore {
    /// Create a store for the database file at `path`
    ///
    /// Nothing is opened until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a record and return the id SQLite assigned to it
    pub fn insert_returning_id(&self, record: &NewPrediction) -> Result<i64> {
        let start = Instant::now();
        log_op_start!("store_insert");
        let result = db::with_connection(&self.path, |conn| Self::insert_record(conn, record));
        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(id) => {
                log_op_end!("store_insert", duration_ms = duration_ms, record_id = *id);
            }
            Err(e) => {
                log_op_error!("store_insert", e.clone(), duration_ms = duration_ms);
            }
        }
        result
    }

    /// Insert one record inside a transaction on an open connection
    pub fn insert_record(conn: &mut Connection, record: &NewPrediction) -> Result<i64> {
        let input = &record.input;
        let tx = conn.transaction().map_err(|e| storage_error("insert", e))?;
        tx.execute(
            "INSERT INTO predictions (gender, age, height, weight, duration, heart_rate, body_temp, prediction)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                input.gender,
                input.age,
                input.height,
                input.weight,
                input.duration,
                input.heart_rate,
                input.body_temp,
                record.prediction,
            ],
        )
        .map_err(|e| storage_error("insert", e))?;
        let id = tx.last_insert_rowid();
        tx.commit().map_err(|e| storage_error("insert", e))?;
        Ok(id)
    }

    /// All rows on an open connection, highest id first
    pub fn query_all(conn: &Connection) -> Result<Vec<PredictionRecord>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, gender, age, height, weight, duration, heart_rate, body_temp, prediction
                 FROM predictions ORDER BY id DESC",
            )
            .map_err(|e| storage_error("list_all", e))?;

        let rows = stmt
            .query_map([], |row| {
                let gender: Option<String> = row.get(1)?;
                let age: i64 = row.get(2)?;
                Ok((
                    age,
                    PredictionRecord {
                        id: row.get(0)?,
                        gender: gender.unwrap_or_default(),
                        age: 0,
                        height: row.get(3)?,
                        weight: row.get(4)?,
                        duration: row.get(5)?,
                        heart_rate: row.get(6)?,
                        body_temp: row.get(7)?,
                        prediction: row.get(8)?,
                    },
                ))
            })
            .map_err(|e| storage_error("list_all", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| storage_error("list_all", e))?;

        rows.into_iter()
            .map(|(age, mut record)| {
                record.age = u32::try_from(age).map_err(|_| {
                    corrupt_row(
                        "list_all",
                        format!("row {} has out-of-range age {}", record.id, age),
                    )
                })?;
                Ok(record)
            })
            .collect()
    }
}

impl PredictionLog for SqlitePredictionStore {
    fn initialize(&self) -> Result<()> {
        db::ensure_parent_dir(&self.path)?;
        db::with_connection(&self.path, |conn| {
            info!(
                component = module_path!(),
                path = %self.path.display(),
                "database opened"
            );
            let journal_mode = db::configure(conn)?;
            schema::ensure_schema(conn)?;
            info!(
                component = module_path!(),
                table = schema::PREDICTIONS_TABLE,
                journal_mode = %journal_mode,
                "predictions table ready"
            );
            Ok(())
        })
    }

    fn insert(&self, record: &NewPrediction) -> Result<()> {
        self.insert_returning_id(record).map(|_| ())
    }

    fn list_all(&self) -> Result<Vec<PredictionRecord>> {
        let start = Instant::now();
        log_op_start!("store_list_all");
        let result = db::with_connection(&self.path, |conn| Self::query_all(conn));
        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(rows) => {
                log_op_end!(
                    "store_list_all",
                    duration_ms = duration_ms,
                    row_count = rows.len()
                );
            }
            Err(e) => {
                log_op_error!("store_list_all", e.clone(), duration_ms = duration_ms);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calburn_core::model::ActivityInput;

    fn sample(gender: &str, duration: f64, prediction: f64) -> NewPrediction {
        NewPrediction::new(
            ActivityInput {
                gender: gender.to_string(),
                age: 25,
                height: 175.0,
                weight: 70.0,
                duration,
                heart_rate: 110.0,
                body_temp: 40.5,
            },
            prediction,
        )
    }

    fn memory_db() -> Connection {
        let conn = db::open_in_memory().unwrap();
        schema::ensure_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn test_insert_record_assigns_increasing_ids() {
        let mut conn = memory_db();
        let a = SqlitePredictionStore::insert_record(&mut conn, &sample("Male", 1.0, 1.0))
            .unwrap();
        let b = SqlitePredictionStore::insert_record(&mut conn, &sample("Male", 2.0, 2.0))
            .unwrap();
        assert!(b > a);
    }

    #[test]
    fn test_query_all_newest_first() {
        let mut conn = memory_db();
        for d in [5.0, 15.0, 25.0] {
            SqlitePredictionStore::insert_record(&mut conn, &sample("Female", d, d * 2.0))
                .unwrap();
        }
        let rows = SqlitePredictionStore::query_all(&conn).unwrap();
        let durations: Vec<f64> = rows.iter().map(|r| r.duration).collect();
        assert_eq!(durations, vec![25.0, 15.0, 5.0]);
    }

    #[test]
    fn test_query_all_tolerates_null_gender() {
        let conn = memory_db();
        conn.execute(
            "INSERT INTO predictions (gender, age, height, weight, duration, heart_rate, body_temp, prediction)
             VALUES (NULL, 30, 1, 1, 1, 1, 1, 1)",
            [],
        )
        .unwrap();
        let rows = SqlitePredictionStore::query_all(&conn).unwrap();
        assert_eq!(rows[0].gender, "");
    }

    #[test]
    fn test_query_all_rejects_negative_age() {
        let conn = memory_db();
        conn.execute(
            "INSERT INTO predictions (gender, age, height, weight, duration, heart_rate, body_temp, prediction)
             VALUES ('Male', -4, 1, 1, 1, 1, 1, 1)",
            [],
        )
        .unwrap();
        let err = SqlitePredictionStore::query_all(&conn).unwrap_err();
        assert!(err.message().contains("out-of-range age -4"));
    }

    #[test]
    fn test_query_without_table_is_storage_error() {
        let conn = db::open_in_memory().unwrap();
        let err = SqlitePredictionStore::query_all(&conn).unwrap_err();
        assert_eq!(err.kind(), calburn_core::ExErrorKind::Storage);
        assert_eq!(err.op(), Some("list_all"));
    }
}
