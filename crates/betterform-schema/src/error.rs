//! Error types for schema loading, validation and normalization.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors returned while loading, validating or normalizing a form schema.
#[derive(Debug, Error)]
pub enum FormError {
    /// Reading a schema file failed.
    #[error("failed to read schema: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// Parsing schema text failed.
    #[error("failed to parse schema: {0}")]
    ParseFailed(#[from] json5::Error),
    /// Converting a checked JSON value into typed input failed.
    #[error("failed to decode schema: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// The schema does not have the recognized shape.
    #[error("invalid schema at {path}: {reason}: {message}")]
    Structural {
        path: String,
        reason: StructuralReason,
        message: String,
    },
    /// A step or `sameAs` rule names a field that does not exist.
    #[error("invalid schema at {path}: dangling-reference: no field named `{target}`")]
    DanglingReference { path: String, target: String },
}

impl FormError {
    /// Coarse error category, suitable for display or metrics labels.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FormError::ReadFailed(_) => ErrorKind::Io,
            FormError::ParseFailed(_) | FormError::DecodeFailed(_) => ErrorKind::Parse,
            FormError::Structural { .. } => ErrorKind::Structural,
            FormError::DanglingReference { .. } => ErrorKind::DanglingReference,
        }
    }

    /// Offending schema path for structural and reference errors.
    pub fn path(&self) -> Option<&str> {
        match self {
            FormError::Structural { path, .. } | FormError::DanglingReference { path, .. } => {
                Some(path)
            }
            _ => None,
        }
    }

    /// Reason code for structural errors.
    pub fn reason(&self) -> Option<StructuralReason> {
        match self {
            FormError::Structural { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    pub(crate) fn structural(path: &str, reason: StructuralReason, message: &str) -> Self {
        let path = if path.is_empty() { "root" } else { path };
        FormError::Structural {
            path: path.to_string(),
            reason,
            message: message.to_string(),
        }
    }

    pub(crate) fn dangling(path: &str, target: &str) -> Self {
        FormError::DanglingReference {
            path: path.to_string(),
            target: target.to_string(),
        }
    }
}

/// Error taxonomy reported by [`FormError::kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    Io,
    Parse,
    Structural,
    DanglingReference,
}

/// Reason code attached to a structural schema error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructuralReason {
    MissingRequiredKey,
    WrongType,
    UnknownFieldType,
    DuplicateName,
}

impl StructuralReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StructuralReason::MissingRequiredKey => "missing-required-key",
            StructuralReason::WrongType => "wrong-type",
            StructuralReason::UnknownFieldType => "unknown-field-type",
            StructuralReason::DuplicateName => "duplicate-name",
        }
    }
}

impl fmt::Display for StructuralReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
