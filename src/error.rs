//! Error types for the entertainment engine
//!
//! One error enum covers the whole crate:
//! - `thiserror` for ergonomic error definitions
//! - Domain variants for catalog, profile and scoring failures
//! - Load variants that name the first offending record entry

use std::borrow::Cow;
use std::path::PathBuf;
use thiserror::Error;

use crate::recommendation::item::MediaKind;
use crate::recommendation::preferences::PreferenceCategory;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the entertainment engine
#[derive(Debug, Error)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    #[error("Configuration error: {message}")]
    Config {
        message: Cow<'static, str>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidConfig {
        key: &'static str,
        message: Cow<'static, str>,
    },

    // ========================================================================
    // Catalog Errors
    // ========================================================================
    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: MediaKind, id: String },

    #[error("Invalid item {id}: {message}")]
    InvalidItem {
        id: String,
        message: Cow<'static, str>,
    },

    #[error("Item not found: {kind} with id {id}")]
    ItemNotFound { kind: MediaKind, id: String },

    // ========================================================================
    // Kind Errors
    // ========================================================================
    #[error("Kind mismatch: expected {expected}, found {found}")]
    KindMismatch { expected: MediaKind, found: MediaKind },

    #[error("Preference category {category} does not apply to {kind}")]
    UnsupportedCategory {
        kind: MediaKind,
        category: PreferenceCategory,
    },

    #[error("Invalid {category} preference '{value}': {message}")]
    InvalidPreference {
        category: PreferenceCategory,
        value: String,
        message: Cow<'static, str>,
    },

    // ========================================================================
    // Persistence Errors
    // ========================================================================
    #[error("Catalog load failed at {entry}: {message}")]
    CatalogLoad {
        entry: String,
        message: Cow<'static, str>,
    },

    #[error("Profile load failed at {entry}: {message}")]
    ProfileLoad {
        entry: String,
        message: Cow<'static, str>,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    // ========================================================================
    // Constructors for common error patterns
    // ========================================================================

    /// Create a catalog load error for the given record entry
    pub fn catalog_load(entry: impl Into<String>, message: impl Into<Cow<'static, str>>) -> Self {
        Self::CatalogLoad {
            entry: entry.into(),
            message: message.into(),
        }
    }

    /// Create a profile load error for the given record entry
    pub fn profile_load(entry: impl Into<String>, message: impl Into<Cow<'static, str>>) -> Self {
        Self::ProfileLoad {
            entry: entry.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error bound to a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    // ========================================================================
    // Error Classification
    // ========================================================================

    /// Returns true if this error came from decoding a persisted record
    pub fn is_load_error(&self) -> bool {
        matches!(self, Error::CatalogLoad { .. } | Error::ProfileLoad { .. })
    }

    /// Get a stable error code for logs and CLI output
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } | Error::InvalidConfig { .. } => "CONFIG_ERROR",
            Error::DuplicateId { .. } => "DUPLICATE_ID",
            Error::InvalidItem { .. } => "INVALID_ITEM",
            Error::ItemNotFound { .. } => "NOT_FOUND",
            Error::KindMismatch { .. } | Error::UnsupportedCategory { .. } => "KIND_MISMATCH",
            Error::InvalidPreference { .. } => "INVALID_PREFERENCE",
            Error::CatalogLoad { .. } => "CATALOG_LOAD_ERROR",
            Error::ProfileLoad { .. } => "PROFILE_LOAD_ERROR",
            Error::Io { .. } => "IO_ERROR",
            Error::Json(_) => "SERIALIZATION_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::DuplicateId {
                kind: MediaKind::Movie,
                id: "m1".to_string()
            }
            .error_code(),
            "DUPLICATE_ID"
        );
        assert_eq!(
            Error::UnsupportedCategory {
                kind: MediaKind::Book,
                category: PreferenceCategory::Platforms
            }
            .error_code(),
            "KIND_MISMATCH"
        );
        assert_eq!(
            Error::KindMismatch {
                expected: MediaKind::Game,
                found: MediaKind::Music
            }
            .error_code(),
            "KIND_MISMATCH"
        );
    }

    #[test]
    fn test_load_errors_name_entry() {
        let err = Error::catalog_load("movies.m3", "missing field `director`");
        assert!(err.is_load_error());
        assert_eq!(
            err.to_string(),
            "Catalog load failed at movies.m3: missing field `director`"
        );
        assert!(!Error::InvalidConfig {
            key: "REC_DEFAULT_COUNT",
            message: "must be at least 1".into(),
        }
        .is_load_error());
    }
}
