//! Error handling for calburn-store
//!
//! Every store failure becomes `CalburnError::Storage`, which converts into
//! an `ExError` of kind `Storage` carrying the failing operation.

use calburn_core::errors::{CalburnError, ExError};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

fn storage(op: &str, message: impl Into<String>) -> ExError {
    CalburnError::Storage {
        op: op.to_string(),
        message: message.into(),
    }
    .into()
}

/// Create a storage error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    storage("sqlite", err.to_string())
}

/// Create a storage error tagged with the store operation that failed
pub fn storage_error(op: &str, err: rusqlite::Error) -> ExError {
    storage(op, err.to_string())
}

/// Create an IO error (e.g. the database directory cannot be created)
pub fn io_error(op: &str, err: std::io::Error) -> ExError {
    storage(op, err.to_string())
}

/// Create an error for a stored value that cannot be represented
pub fn corrupt_row(op: &str, reason: impl Into<String>) -> ExError {
    storage(op, reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calburn_core::errors::ExErrorKind;

    #[test]
    fn test_storage_error_keeps_op_and_cause() {
        let err = storage_error("insert", rusqlite::Error::InvalidQuery);
        assert_eq!(err.kind(), ExErrorKind::Storage);
        assert_eq!(err.op(), Some("insert"));
        assert!(err.message().starts_with("storage failure during insert: "));
    }

    #[test]
    fn test_corrupt_row_is_storage_kind() {
        let err = corrupt_row("list_all", "row 3 has out-of-range age -1");
        assert_eq!(err.kind(), ExErrorKind::Storage);
        assert!(err.message().contains("row 3 has out-of-range age -1"));
    }
}
