//! Catalog service abstraction.
//!
//! A catalog is a media-library manager (Sonarr or Radarr) that owns the
//! metadata purgearr reasons about. Every operation is a single blocking
//! request/response with no retry; empty result sets are valid answers.
//!
//! | Operation | Sonarr | Radarr |
//! |-----------|--------|--------|
//! | `list_tags` | `GET tag` | `GET tag` |
//! | `list_items` | `GET series` | `GET movie` |
//! | `list_files` | `GET episodefile?seriesId=` | `GET moviefile?movieId=` |
//! | `list_episodes` | `GET episode?seriesId=` | always empty |
//! | `update_item` | `PUT series/{id}` | `PUT movie/{id}` |
//! | `send_command` | `POST command` | `POST command` |

mod http;
mod memory;

pub use http::{API_KEY_HEADER, HttpCatalog};
pub use memory::{FailPoint, MemoryCatalog, RecordedCommand};

use crate::Result;
use crate::models::{Episode, MediaFile, MediaItem, Tag};
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;

/// Which kind of library a catalog manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    /// TV series (Sonarr).
    Sonarr,
    /// Movies (Radarr).
    Radarr,
}

impl CatalogKind {
    /// Both kinds, in processing order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Sonarr, Self::Radarr]
    }

    /// Lowercase identifier used in logs and configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sonarr => "sonarr",
            Self::Radarr => "radarr",
        }
    }

    /// Human-facing name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Sonarr => "Sonarr",
            Self::Radarr => "Radarr",
        }
    }

    /// Resource path listing the catalog's items.
    #[must_use]
    pub const fn items_resource(self) -> &'static str {
        match self {
            Self::Sonarr => "series",
            Self::Radarr => "movie",
        }
    }

    /// Resource path listing an item's files.
    #[must_use]
    pub const fn files_resource(self) -> &'static str {
        match self {
            Self::Sonarr => "episodefile",
            Self::Radarr => "moviefile",
        }
    }

    /// Query key that scopes a listing to one item.
    #[must_use]
    pub const fn item_key(self) -> &'static str {
        match self {
            Self::Sonarr => "seriesId",
            Self::Radarr => "movieId",
        }
    }

    /// Name of the command that refreshes one item.
    #[must_use]
    pub const fn refresh_command(self) -> &'static str {
        match self {
            Self::Sonarr => "RefreshSeries",
            Self::Radarr => "RefreshMovie",
        }
    }

    /// Whether items of this kind have episodes.
    #[must_use]
    pub const fn has_episodes(self) -> bool {
        matches!(self, Self::Sonarr)
    }

    /// Builds the body of a command addressed at one item.
    ///
    /// Radarr expects a list of movie ids, Sonarr a single series id.
    #[must_use]
    pub fn command_body(self, name: &str, item_id: i64) -> Value {
        match self {
            Self::Sonarr => json!({ "name": name, "seriesId": item_id }),
            Self::Radarr => json!({ "name": name, "movieIds": [item_id] }),
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Operations purgearr needs from a catalog.
pub trait Catalog: Send + Sync {
    /// The kind of library this catalog manages.
    fn kind(&self) -> CatalogKind;

    /// Lists every tag the catalog defines.
    ///
    /// # Errors
    ///
    /// Returns a transport or decode error if the request fails.
    fn list_tags(&self) -> Result<Vec<Tag>>;

    /// Lists every series or movie, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns a transport or decode error if the request fails.
    fn list_items(&self) -> Result<Vec<MediaItem>>;

    /// Lists the files belonging to one item, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns a transport or decode error if the request fails.
    fn list_files(&self, item_id: i64) -> Result<Vec<MediaFile>>;

    /// Lists the episodes of one series. Movie catalogs return nothing.
    ///
    /// # Errors
    ///
    /// Returns a transport or decode error if the request fails.
    fn list_episodes(&self, item_id: i64) -> Result<Vec<Episode>>;

    /// Writes an item record back to the catalog.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the write is rejected.
    fn update_item(&self, item: &MediaItem) -> Result<()>;

    /// Issues a named command addressed at one item.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the command is rejected.
    fn send_command(&self, name: &str, item_id: i64) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_resources() {
        assert_eq!(CatalogKind::Sonarr.items_resource(), "series");
        assert_eq!(CatalogKind::Sonarr.files_resource(), "episodefile");
        assert_eq!(CatalogKind::Radarr.items_resource(), "movie");
        assert_eq!(CatalogKind::Radarr.files_resource(), "moviefile");
        assert_eq!(CatalogKind::Radarr.item_key(), "movieId");
    }

    #[test]
    fn test_command_bodies() {
        assert_eq!(
            CatalogKind::Sonarr.command_body("RefreshSeries", 4),
            json!({"name": "RefreshSeries", "seriesId": 4})
        );
        assert_eq!(
            CatalogKind::Radarr.command_body("RefreshMovie", 9),
            json!({"name": "RefreshMovie", "movieIds": [9]})
        );
    }

    #[test]
    fn test_processing_order() {
        assert_eq!(
            CatalogKind::all(),
            &[CatalogKind::Sonarr, CatalogKind::Radarr]
        );
        assert!(CatalogKind::Sonarr.has_episodes());
        assert!(!CatalogKind::Radarr.has_episodes());
    }
}
