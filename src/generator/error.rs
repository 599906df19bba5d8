use serde::Serialize;
use thiserror::Error;

/// Why a single field was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum ValidationError {
    /// Malformed token: address, number, hostname or port id
    #[error("{0}")]
    Format(String),
    /// Well-formed number outside its allowed bounds
    #[error("{0}")]
    Range(String),
    /// Disagrees with a sibling field
    #[error("{0}")]
    Consistency(String),
    /// Required by another field's value but absent
    #[error("{0}")]
    PreconditionMissing(String),
}

impl ValidationError {
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    pub fn range(msg: impl Into<String>) -> Self {
        Self::Range(msg.into())
    }

    pub fn consistency(msg: impl Into<String>) -> Self {
        Self::Consistency(msg.into())
    }

    pub fn missing(msg: impl Into<String>) -> Self {
        Self::PreconditionMissing(msg.into())
    }
}

/// A rejected field and the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    #[serde(flatten)]
    pub error: ValidationError,
}

/// Every failing field of one form snapshot, in rule order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push(&mut self, field: impl Into<String>, error: ValidationError) {
        self.errors.push(FieldError {
            field: field.into(),
            error,
        });
    }

    /// First error recorded for `field`, if any
    pub fn get(&self, field: &str) -> Option<&ValidationError> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| &e.error)
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.error))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}
