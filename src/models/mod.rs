//! Data models for catalog records and retention outcomes.
//!
//! Catalog records mirror the JSON shapes Sonarr and Radarr return from
//! their v3 APIs. Records that are written back to a catalog keep every
//! field they were read with, so an update never drops data the model does
//! not know about.

mod media;
pub mod timestamp;

pub use media::{DeletionOutcome, Episode, MediaFile, MediaItem, Season, Tag};
pub use timestamp::parse_added_at;
