//! Storage seam for prediction records.

use std::sync::Mutex;

use crate::errors::{ExError, ExErrorKind, Result};
use crate::model::{NewPrediction, PredictionRecord};

/// Append-only log of prediction records.
///
/// Implemented by the SQLite store; the request handler only sees this trait.
pub trait PredictionLog: Send + Sync {
    /// Ensure the backing table exists. Safe to call repeatedly.
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Storage` if the backend cannot be opened.
    fn initialize(&self) -> Result<()>;

    /// Append one record; the log assigns its id.
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Storage` if the write cannot be committed.
    fn insert(&self, record: &NewPrediction) -> Result<()>;

    /// All records, newest (highest id) first.
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Storage` if the backend cannot be read.
    fn list_all(&self) -> Result<Vec<PredictionRecord>>;
}

/// Process-local log used by tests and tooling that has no database.
#[derive(Debug, Default)]
pub struct InMemoryPredictionLog {
    rows: Mutex<Vec<PredictionRecord>>,
}

impl InMemoryPredictionLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned(op: &str) -> ExError {
        ExError::new(ExErrorKind::Storage)
            .with_op(op.to_string())
            .with_message("in-memory log lock poisoned")
    }
}

impl PredictionLog for InMemoryPredictionLog {
    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    fn insert(&self, record: &NewPrediction) -> Result<()> {
        let mut rows = self.rows.lock().map_err(|_| Self::poisoned("insert"))?;
        let id = rows.last().map_or(1, |r| r.id + 1);
        rows.push(PredictionRecord::from_new(id, record));
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<PredictionRecord>> {
        let rows = self.rows.lock().map_err(|_| Self::poisoned("list_all"))?;
        Ok(rows.iter().rev().cloned().collect())
    }
}
