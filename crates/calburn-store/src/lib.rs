//! calburn Store - persistence of prediction records in SQLite
//!
//! Provides:
//! - Scoped per-operation connections (no pooling)
//! - Create-if-absent schema bootstrap for the `predictions` table
//! - `SqlitePredictionStore`, the `PredictionLog` implementation

pub mod db;
pub mod errors;
pub mod repo;
pub mod schema;

// Re-export key types
pub use errors::Result;
pub use repo::SqlitePredictionStore;
