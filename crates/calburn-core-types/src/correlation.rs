//! Correlation types for request tracking
//!
//! Every HTTP request handled by the server gets a `RequestId`, which is
//! attached to its log events and to any error it produces.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upper bound on caller-supplied request ids; longer values are replaced.
const MAX_EXTERNAL_ID_LEN: usize = 128;

/// Unique identifier for a single request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random RequestId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }

    /// Adopt a caller-supplied id (e.g. an `x-request-id` header).
    ///
    /// Blank, oversized, or non-printable values are discarded and a fresh
    /// id is generated instead.
    pub fn from_external(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v)
                if !v.is_empty()
                    && v.len() <= MAX_EXTERNAL_ID_LEN
                    && v.chars().all(|c| c.is_ascii_graphic()) =>
            {
                Self(v.to_string())
            }
            _ => Self::new(),
        }
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Context carried through a single request
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: RequestId,
    pub route: &'static str,
}

impl RequestContext {
    /// Create a new context with a fresh RequestId
    pub fn new(route: &'static str) -> Self {
        Self {
            request_id: RequestId::new(),
            route,
        }
    }

    /// Create a context with an existing RequestId
    pub fn with_request_id(route: &'static str, request_id: RequestId) -> Self {
        Self { request_id, route }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_generation() {
        let id1 = RequestId::new();
        let id2 = RequestId::new();

        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
        assert!(!id2.as_str().is_empty());
    }

    #[test]
    fn test_request_id_display() {
        let id = RequestId::new();
        assert_eq!(format!("{}", id), id.as_str());
    }

    #[test]
    fn test_external_id_adopted() {
        let id = RequestId::from_external(Some("  req-42 "));
        assert_eq!(id.as_str(), "req-42");
    }

    #[test]
    fn test_external_id_rejected() {
        let blank = RequestId::from_external(Some("   "));
        assert!(!blank.as_str().trim().is_empty());

        let spaced = RequestId::from_external(Some("has space"));
        assert_ne!(spaced.as_str(), "has space");

        let long = "x".repeat(MAX_EXTERNAL_ID_LEN + 1);
        assert_ne!(RequestId::from_external(Some(&long)).as_str(), long);

        assert!(!RequestId::from_external(None).as_str().is_empty());
    }

    #[test]
    fn test_request_context_creation() {
        let ctx = RequestContext::new("history");
        assert!(!ctx.request_id.as_str().is_empty());
        assert_eq!(ctx.route, "history");
    }

    #[test]
    fn test_serialization() {
        let id = RequestId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: RequestId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
