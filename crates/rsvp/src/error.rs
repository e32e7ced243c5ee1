//! Error types for rsvp.
//!
//! This module defines all error types used throughout the rsvp crate. Every
//! failure the store can produce falls into one of two user-facing buckets:
//! a validation error the guest can fix, or a storage error they can only
//! retry. [`Error::kind`] exposes that classification to the front end.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A submission field that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The guest's full name.
    Name,
    /// The guest's email address.
    Email,
    /// The size of the guest's party.
    GuestCount,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Email => write!(f, "email"),
            Self::GuestCount => write!(f, "guests"),
        }
    }
}

/// The main error type for rsvp operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Validation Errors ===
    /// A submission field is missing or out of range.
    #[error("invalid {field}: {message}")]
    Validation {
        /// The offending field.
        field: Field,
        /// Description of the problem.
        message: String,
    },

    // === Storage Errors ===
    /// The storage file could not be read.
    #[error("failed to read RSVP storage at {path}: {source}")]
    StorageRead {
        /// Path to the storage file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The storage file could not be written.
    #[error("failed to write RSVP storage at {path}: {source}")]
    StorageWrite {
        /// Path to the storage file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The storage file lock could not be acquired.
    #[error("failed to lock RSVP storage at {path}: {source}")]
    StorageLock {
        /// Path to the storage file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The storage file contents do not match the expected layout.
    #[error("malformed RSVP storage at {path}: {message}")]
    StorageFormat {
        /// Path to the storage file.
        path: PathBuf,
        /// Description of what went wrong.
        message: String,
    },

    /// Failed to create the storage directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for rsvp operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`], used to pick a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The submitter supplied bad input.
    Validation,
    /// The storage file could not be used.
    Storage,
    /// Configuration could not be loaded.
    Config,
    /// Output formatting failed.
    Output,
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new validation error.
    #[must_use]
    pub fn validation(field: Field, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Create a new storage format error.
    #[must_use]
    pub fn storage_format(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::StorageFormat {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::StorageRead { .. }
            | Self::StorageWrite { .. }
            | Self::StorageLock { .. }
            | Self::StorageFormat { .. }
            | Self::DirectoryCreate { .. } => ErrorKind::Storage,
            Self::ConfigLoad(_) | Self::ConfigValidation { .. } => ErrorKind::Config,
            Self::Json(_) => ErrorKind::Output,
        }
    }

    /// Check if this error was caused by invalid submission input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// Check if this error came from the storage file.
    #[must_use]
    pub fn is_storage(&self) -> bool {
        self.kind() == ErrorKind::Storage
    }

    /// The field that failed validation, if any.
    #[must_use]
    pub fn field(&self) -> Option<Field> {
        match self {
            Self::Validation { field, .. } => Some(*field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn io_error() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied")
    }

    #[test]
    fn test_validation_error_display() {
        let err = Error::validation(Field::Name, "is required");
        assert_eq!(err.to_string(), "invalid name: is required");
    }

    #[test]
    fn test_field_display() {
        assert_eq!(Field::Name.to_string(), "name");
        assert_eq!(Field::Email.to_string(), "email");
        assert_eq!(Field::GuestCount.to_string(), "guests");
    }

    #[test]
    fn test_validation_kind() {
        let err = Error::validation(Field::Email, "is required");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.is_validation());
        assert!(!err.is_storage());
        assert_eq!(err.field(), Some(Field::Email));
    }

    #[test]
    fn test_storage_kinds() {
        let path = PathBuf::from("/data/rsvps.csv");
        let errors = vec![
            Error::StorageRead {
                path: path.clone(),
                source: io_error(),
            },
            Error::StorageWrite {
                path: path.clone(),
                source: io_error(),
            },
            Error::StorageLock {
                path: path.clone(),
                source: io_error(),
            },
            Error::storage_format(path.clone(), "bad header"),
            Error::DirectoryCreate {
                path,
                source: io_error(),
            },
        ];

        for err in errors {
            assert!(err.is_storage(), "{err} should be a storage error");
            assert!(!err.is_validation());
            assert!(err.field().is_none());
        }
    }

    #[test]
    fn test_storage_write_display_includes_path() {
        let err = Error::StorageWrite {
            path: PathBuf::from("/data/rsvps.csv"),
            source: io_error(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/data/rsvps.csv"));
        assert!(msg.contains("access denied"));
    }

    #[test]
    fn test_storage_format_display() {
        let err = Error::storage_format("/data/rsvps.csv", "unexpected header");
        let msg = err.to_string();
        assert!(msg.contains("malformed"));
        assert!(msg.contains("unexpected header"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "storage path is empty".to_string(),
        };
        assert!(err.to_string().contains("storage path is empty"));
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
            assert_eq!(err.kind(), ErrorKind::Output);
        }
    }
}
