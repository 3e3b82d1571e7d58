use serde::Serialize;
use std::fmt;
use thiserror::Error;
use validator::ValidationErrors;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A single violated business rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{kind} '{key}' not found")]
    NotFound { kind: &'static str, key: String },

    #[error("{kind} '{key}' already exists")]
    AlreadyExists { kind: &'static str, key: String },

    #[error("validation failed: {}", join_violations(.0))]
    ValidationFailed(Vec<Violation>),

    #[error("{kind} '{key}' is not available")]
    Unavailable { kind: &'static str, key: String },

    #[error("operation cancelled")]
    Cancelled,

    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Stable classification of a [`CatalogError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    ValidationFailed,
    Unavailable,
    Cancelled,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::ValidationFailed => "validation_failed",
            ErrorKind::Unavailable => "unavailable",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CatalogError {
    pub fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        CatalogError::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub fn already_exists(kind: &'static str, key: impl Into<String>) -> Self {
        CatalogError::AlreadyExists {
            kind,
            key: key.into(),
        }
    }

    pub fn unavailable(kind: &'static str, key: impl Into<String>) -> Self {
        CatalogError::Unavailable {
            kind,
            key: key.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CatalogError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap a lower-level failure, keeping it reachable through `source()`.
    pub fn internal_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        CatalogError::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::NotFound { .. } => ErrorKind::NotFound,
            CatalogError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            CatalogError::ValidationFailed(_) => ErrorKind::ValidationFailed,
            CatalogError::Unavailable { .. } => ErrorKind::Unavailable,
            CatalogError::Cancelled => ErrorKind::Cancelled,
            CatalogError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Whether this error is charged to the service's error counter.
    ///
    /// Missing, duplicate and inactive entities are answers, not failures.
    pub fn counts_as_failure(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::ValidationFailed | ErrorKind::Cancelled | ErrorKind::Internal
        )
    }

    /// Keep pass-through kinds and fold everything else into `Internal`.
    pub(crate) fn or_internal(self, message: impl Into<String>) -> Self {
        match self {
            CatalogError::NotFound { .. }
            | CatalogError::AlreadyExists { .. }
            | CatalogError::Cancelled => self,
            other => CatalogError::internal_with(message, other),
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ValidationErrors> for CatalogError {
    fn from(errors: ValidationErrors) -> Self {
        let mut violations: Vec<Violation> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    Violation::new(field.to_string(), message)
                })
            })
            .collect();
        violations.sort_by(|a, b| a.field.cmp(&b.field));
        CatalogError::ValidationFailed(violations)
    }
}
