//! Retention: deciding which media files to delete and deleting them.
//!
//! This module turns catalog metadata into deletions. An item carrying the
//! protection tag is skipped outright; every other item's files are checked
//! against a cutoff instant and the eligible ones are handed to a
//! [`DeletionExecutor`].
//!
//! # Example
//!
//! ```rust,ignore
//! use purgearr::retention::{LocalFileStore, RetentionEngine, RetentionPolicy};
//!
//! // 30 days instead of the default 90, protected by the "keeper" tag
//! let policy = RetentionPolicy::default().with_retention_days(30);
//!
//! // Dry run to see what would be deleted
//! let engine = RetentionEngine::new(policy, LocalFileStore, true);
//! let report = engine.run(&[&sonarr, &radarr]);
//! println!("{}", report.summary());
//! ```
//!
//! # Failure scopes
//!
//! | Failure | Stops |
//! |---------|-------|
//! | Listing tags or items | That catalog only |
//! | Listing one item's files | That item only |
//! | Unreadable timestamp, failed removal | That file only |

mod engine;
mod executor;
mod policy;
mod report;

pub mod eligibility;
pub mod tags;

pub use eligibility::{FileEligibility, evaluate_file, is_eligible};
pub use engine::RetentionEngine;
pub use executor::{DeletionExecutor, FileStore, LocalFileStore};
pub use policy::{
    DEFAULT_PROTECTION_TAG, DEFAULT_RETENTION_DAYS, PROTECTION_TAG_ENV, RETENTION_DAYS_ENV,
    RetentionPolicy,
};
pub use report::{
    CatalogReport, CatalogStatus, FileRecord, ItemDisposition, ItemReport, RetentionReport,
};
pub use tags::{TagMap, is_protected, resolve_tags};
