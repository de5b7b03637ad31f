//! Repository layer
//!
//! Bridges the domain records in calburn-core to SQLite rows.

pub mod sqlite_repo;

pub use sqlite_repo::SqlitePredictionStore;
