//! File eligibility filter.

use crate::Result;
use crate::models::MediaFile;
use chrono::NaiveDateTime;

/// Returns `true` if a file added at `added_at` predates `cutoff`.
///
/// The boundary is exclusive: a file added exactly at the cutoff is kept.
#[must_use]
pub fn is_eligible(added_at: NaiveDateTime, cutoff: NaiveDateTime) -> bool {
    added_at < cutoff
}

/// Eligibility verdict for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileEligibility {
    /// Parsed import timestamp.
    pub added_at: NaiveDateTime,
    /// Whether the file may be deleted.
    pub eligible: bool,
}

/// Parses a file's timestamp and checks it against `cutoff`.
///
/// # Errors
///
/// Returns [`crate::Error::DateFormat`] if `date_added` is malformed.
pub fn evaluate_file(file: &MediaFile, cutoff: NaiveDateTime) -> Result<FileEligibility> {
    let added_at = file.added_at()?;
    Ok(FileEligibility {
        added_at,
        eligible: is_eligible(added_at, cutoff),
    })
}
