use calburn_core_types::RequestId;
use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure that can reach the HTTP boundary is classified into one of
/// these kinds. The kind is what the server maps to a status code, and its
/// stable code string is what appears in logs and response bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    /// A required form field is missing or does not parse
    FormParse,
    /// The regressor rejected the feature vector or produced no usable value
    Model,
    /// The model artifact is missing, unreadable, or incompatible
    ModelArtifact,
    /// The database cannot be opened, written, or read
    Storage,
    /// Invalid server configuration
    Config,
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::FormParse => "ERR_FORM_PARSE",
            ExErrorKind::Model => "ERR_MODEL",
            ExErrorKind::ModelArtifact => "ERR_MODEL_ARTIFACT",
            ExErrorKind::Storage => "ERR_STORAGE",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the kind plus optional context (operation, offending form field,
/// request id) and a human-readable message.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    field: Option<String>,
    request_id: Option<RequestId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            field: None,
            request_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add form field context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the offending form field, if any
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain error taxonomy for calburn operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalburnError {
    // ===== Form Errors =====
    /// A required form field was not submitted
    #[error("missing form field '{field}'")]
    MissingField { field: String },

    /// The request body could not be decoded as a form
    #[error("unreadable form submission: {reason}")]
    UnreadableForm { reason: String },

    /// A form field was submitted but does not parse as the expected type
    #[error("invalid value {value:?} for form field '{field}': {reason}")]
    InvalidField {
        field: String,
        value: String,
        reason: String,
    },

    // ===== Model Errors =====
    /// The feature vector length does not match what the regressor expects
    #[error("expected {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    /// A feature value is NaN or infinite
    #[error("feature '{feature}' is not a finite number: {value}")]
    NonFiniteFeature { feature: String, value: f64 },

    /// The regressor produced NaN or infinity
    #[error("model produced a non-finite prediction: {value}")]
    NonFiniteOutput { value: f64 },

    /// A tree walk left the node table (corrupt ensemble)
    #[error("tree {tree} references missing node {node}")]
    BrokenTree { tree: usize, node: usize },

    // ===== Artifact Errors =====
    /// The model artifact file does not exist
    #[error("model artifact not found: {path}")]
    ArtifactNotFound { path: String },

    /// The model artifact exists but cannot be used
    #[error("model artifact {path} is invalid: {reason}")]
    ArtifactInvalid { path: String, reason: String },

    // ===== Storage Errors =====
    /// Database failure
    #[error("storage failure during {op}: {message}")]
    Storage { op: String, message: String },

    // ===== Configuration Errors =====
    #[error("invalid configuration: {reason}")]
    Config { reason: String },
}

impl From<CalburnError> for ExError {
    fn from(err: CalburnError) -> Self {
        let message = err.to_string();
        match err {
            CalburnError::MissingField { field } => ExError::new(ExErrorKind::FormParse)
                .with_op("parse_form")
                .with_field(field)
                .with_message(message),

            CalburnError::UnreadableForm { .. } => ExError::new(ExErrorKind::FormParse)
                .with_op("parse_form")
                .with_message(message),

            CalburnError::InvalidField { field, .. } => ExError::new(ExErrorKind::FormParse)
                .with_op("parse_form")
                .with_field(field)
                .with_message(message),

            CalburnError::FeatureCount { .. }
            | CalburnError::NonFiniteFeature { .. }
            | CalburnError::NonFiniteOutput { .. }
            | CalburnError::BrokenTree { .. } => ExError::new(ExErrorKind::Model)
                .with_op("predict")
                .with_message(message),

            CalburnError::ArtifactNotFound { .. } | CalburnError::ArtifactInvalid { .. } => {
                ExError::new(ExErrorKind::ModelArtifact)
                    .with_op("load_model")
                    .with_message(message)
            }

            CalburnError::Storage { op, .. } => ExError::new(ExErrorKind::Storage)
                .with_op(op)
                .with_message(message),

            CalburnError::Config { .. } => ExError::new(ExErrorKind::Config)
                .with_op("load_config")
                .with_message(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (ExErrorKind::FormParse, "ERR_FORM_PARSE"),
            (ExErrorKind::Model, "ERR_MODEL"),
            (ExErrorKind::ModelArtifact, "ERR_MODEL_ARTIFACT"),
            (ExErrorKind::Storage, "ERR_STORAGE"),
            (ExErrorKind::Config, "ERR_CONFIG"),
            (ExErrorKind::Internal, "ERR_INTERNAL"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_display_includes_context() {
        let err = ExError::new(ExErrorKind::FormParse)
            .with_op("parse_form")
            .with_field("age")
            .with_message("missing form field 'age'");

        let text = err.to_string();
        assert_eq!(
            text,
            "[ERR_FORM_PARSE] in operation 'parse_form': missing form field 'age' (field: age)"
        );
    }

    #[test]
    fn test_display_without_context() {
        let err = ExError::new(ExErrorKind::Internal);
        assert_eq!(err.to_string(), "[ERR_INTERNAL]");
    }
}
