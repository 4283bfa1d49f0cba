//! # Purgearr
//!
//! A retention and maintenance agent for Sonarr and Radarr libraries.
//!
//! Purgearr walks every series and movie a catalog manages, skips anything
//! carrying the protection tag, and removes media files that were added
//! before the retention cutoff. It can also unmonitor seasons that have no
//! monitored episodes left and ask both catalogs to refresh every item.
//!
//! ## Features
//!
//! - Per-catalog, per-item and per-file failure isolation
//! - Dry-run mode that never touches the file store
//! - Pluggable catalogs and file stores for testing
//! - Structured logging via `tracing`
//!
//! ## Example
//!
//! ```rust,ignore
//! use purgearr::catalog::{CatalogKind, HttpCatalog};
//! use purgearr::retention::{LocalFileStore, RetentionEngine, RetentionPolicy};
//!
//! let sonarr = HttpCatalog::new(CatalogKind::Sonarr, "http://nas:8989/api/v3", key)?;
//! let engine = RetentionEngine::new(RetentionPolicy::default(), LocalFileStore, true);
//! let report = engine.run(&[&sonarr]);
//! println!("{}", report.summary());
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod catalog;
pub mod config;
pub mod maintenance;
pub mod models;
pub mod observability;
pub mod retention;

pub use catalog::{Catalog, CatalogKind, HttpCatalog, MemoryCatalog};
pub use config::{CatalogConfig, PurgearrConfig};
pub use models::{DeletionOutcome, Episode, MediaFile, MediaItem, Season, Tag};
pub use retention::{
    CatalogReport, DeletionExecutor, FileStore, LocalFileStore, RetentionEngine, RetentionPolicy,
    RetentionReport, TagMap,
};

/// Error type for purgearr operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When | Scope it aborts |
/// |---------|-------------|-----------------|
/// | `Transport` | A catalog cannot be reached or answers with a non-success status | Catalog or item |
/// | `Decode` | A catalog response body is not the expected JSON | Catalog or item |
/// | `DateFormat` | A file's `dateAdded` matches neither accepted pattern | Single file |
/// | `FileOperation` | Removing a file from the file store fails | Single file |
/// | `InvalidInput` | Configuration values are missing or malformed | Process start-up |
/// | `OperationFailed` | Local plumbing fails (config file I/O, logging init) | Process start-up |
#[derive(Debug, ThisError)]
pub enum Error {
    /// A catalog request failed before a usable response arrived.
    #[error("transport error calling {catalog} '{operation}': {cause}")]
    Transport {
        /// Catalog name (`sonarr` or `radarr`).
        catalog: String,
        /// The request that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// A catalog response could not be decoded.
    #[error("decode error in {catalog} '{operation}': {cause}")]
    Decode {
        /// Catalog name (`sonarr` or `radarr`).
        catalog: String,
        /// The request whose response was malformed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// A timestamp matched neither accepted format.
    #[error("unrecognised timestamp '{value}'")]
    DateFormat {
        /// The raw timestamp text.
        value: String,
    },

    /// A file could not be removed.
    #[error("failed to delete {path}: {cause}")]
    FileOperation {
        /// Path of the file.
        path: String,
        /// The underlying cause.
        cause: String,
    },

    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - A catalog base URL cannot be parsed
    /// - A retention period or log format value is malformed
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - The configuration file cannot be read or parsed
    /// - Logging cannot be initialized
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for purgearr operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("test error".to_string());
        assert_eq!(err.to_string(), "invalid input: test error");

        let err = Error::OperationFailed {
            operation: "test".to_string(),
            cause: "failed".to_string(),
        };
        assert_eq!(err.to_string(), "operation 'test' failed: failed");

        let err = Error::Transport {
            catalog: "sonarr".to_string(),
            operation: "list_tags".to_string(),
            cause: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "transport error calling sonarr 'list_tags': connection refused"
        );

        let err = Error::DateFormat {
            value: "yesterday".to_string(),
        };
        assert_eq!(err.to_string(), "unrecognised timestamp 'yesterday'");
    }
}
