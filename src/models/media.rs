//! Catalog record types.

use crate::Result;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// A tag defined by a catalog instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Opaque tag identifier.
    pub id: i64,
    /// Display label as stored by the catalog.
    pub label: String,
}

impl Tag {
    /// Creates a new tag.
    #[must_use]
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// A series or movie managed by a catalog.
///
/// Fields that purgearr does not interpret are kept in `extra` so the
/// record can be sent back unchanged apart from the seasons it edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    /// Catalog identifier.
    pub id: i64,
    /// Display title.
    pub title: String,
    /// Tag identifiers attached to the item.
    #[serde(default)]
    pub tags: BTreeSet<i64>,
    /// Seasons of a series. Always empty for movies.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub seasons: Vec<Season>,
    /// Remaining fields of the remote record.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MediaItem {
    /// Creates an item with no tags and no seasons.
    #[must_use]
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            tags: BTreeSet::new(),
            seasons: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Adds tag identifiers.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = i64>) -> Self {
        self.tags.extend(tags);
        self
    }

    /// Sets the seasons.
    #[must_use]
    pub fn with_seasons(mut self, seasons: Vec<Season>) -> Self {
        self.seasons = seasons;
        self
    }
}

/// A season entry inside a series record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    /// Season number (0 is specials).
    pub season_number: i32,
    /// Whether the catalog is monitoring the season.
    pub monitored: bool,
    /// Remaining fields (statistics and the like).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Season {
    /// Creates a season entry.
    #[must_use]
    pub fn new(season_number: i32, monitored: bool) -> Self {
        Self {
            season_number,
            monitored,
            extra: Map::new(),
        }
    }
}

/// An episode of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    /// Episode identifier.
    pub id: i64,
    /// Season the episode belongs to.
    pub season_number: i32,
    /// Whether the episode is monitored.
    pub monitored: bool,
    /// Whether a file exists for the episode.
    #[serde(default)]
    pub has_file: bool,
}

impl Episode {
    /// Creates an episode.
    #[must_use]
    pub const fn new(id: i64, season_number: i32, monitored: bool) -> Self {
        Self {
            id,
            season_number,
            monitored,
            has_file: false,
        }
    }
}

/// A media file tracked by a catalog.
///
/// `date_added` stays in its raw form; parsing happens per file inside the
/// retention loop so a malformed value only affects that file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFile {
    /// File identifier.
    #[serde(default)]
    pub id: i64,
    /// Absolute path on the file store.
    pub path: String,
    /// Timestamp the catalog imported the file.
    pub date_added: String,
}

impl MediaFile {
    /// Creates a file record.
    #[must_use]
    pub fn new(id: i64, path: impl Into<String>, date_added: impl Into<String>) -> Self {
        Self {
            id,
            path: path.into(),
            date_added: date_added.into(),
        }
    }

    /// Parses `date_added` into a zone-less instant.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DateFormat`] if the timestamp matches neither
    /// accepted format.
    pub fn added_at(&self) -> Result<NaiveDateTime> {
        super::parse_added_at(&self.date_added)
    }
}

/// Result of deleting (or simulating the deletion of) one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionOutcome {
    /// Path that was targeted.
    pub path: String,
    /// Whether the deletion succeeded. Always true for a dry run.
    pub succeeded: bool,
    /// Whether this was a dry run that left the file store untouched.
    pub simulated: bool,
    /// Cause of the failure, when `succeeded` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl DeletionOutcome {
    /// Outcome of a dry run.
    #[must_use]
    pub fn simulated(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            succeeded: true,
            simulated: true,
            error_detail: None,
        }
    }

    /// Outcome of a completed deletion.
    #[must_use]
    pub fn deleted(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            succeeded: true,
            simulated: false,
            error_detail: None,
        }
    }

    /// Outcome of a failed deletion.
    #[must_use]
    pub fn failed(path: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            succeeded: false,
            simulated: false,
            error_detail: Some(detail.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_series_record_roundtrips_unknown_fields() {
        let raw = json!({
            "id": 7,
            "title": "Show A",
            "tags": [5, 2],
            "monitored": true,
            "path": "/tv/Show A",
            "seasons": [
                {"seasonNumber": 1, "monitored": true, "statistics": {"episodeCount": 10}}
            ]
        });

        let item: MediaItem = serde_json::from_value(raw).expect("series should decode");
        assert_eq!(item.id, 7);
        assert_eq!(item.tags.iter().copied().collect::<Vec<_>>(), vec![2, 5]);
        assert_eq!(item.seasons.len(), 1);
        assert_eq!(item.extra.get("path"), Some(&json!("/tv/Show A")));

        let back = serde_json::to_value(&item).expect("series should encode");
        assert_eq!(back["monitored"], json!(true));
        assert_eq!(back["seasons"][0]["statistics"]["episodeCount"], json!(10));
        assert_eq!(back["seasons"][0]["seasonNumber"], json!(1));
    }

    #[test]
    fn test_movie_record_without_tags_or_seasons() {
        let item: MediaItem =
            serde_json::from_value(json!({"id": 3, "title": "Film B"})).expect("movie decodes");
        assert!(item.tags.is_empty());
        assert!(item.seasons.is_empty());

        let back = serde_json::to_value(&item).expect("movie encodes");
        assert!(back.get("seasons").is_none());
    }

    #[test]
    fn test_media_file_decodes_catalog_shape() {
        let file: MediaFile = serde_json::from_value(json!({
            "id": 11,
            "seriesId": 7,
            "path": "/tv/Show A/S01E01.mkv",
            "dateAdded": "2024-01-02T03:04:05.123Z",
            "size": 123
        }))
        .expect("episode file decodes");
        assert_eq!(file.path, "/tv/Show A/S01E01.mkv");
        assert!(file.added_at().is_ok());
    }

    #[test]
    fn test_deletion_outcome_constructors() {
        let simulated = DeletionOutcome::simulated("/a");
        assert!(simulated.succeeded && simulated.simulated);

        let deleted = DeletionOutcome::deleted("/a");
        assert!(deleted.succeeded && !deleted.simulated);

        let failed = DeletionOutcome::failed("/a", "permission denied");
        assert!(!failed.succeeded);
        assert_eq!(failed.error_detail.as_deref(), Some("permission denied"));
    }
}
