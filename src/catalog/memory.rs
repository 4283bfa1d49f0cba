//! In-memory catalog for testing.
//!
//! Serves canned records, fails selected operations on demand, and records
//! every call that reached it so tests can assert on what the engine asked
//! for (and what it did not).

use super::{Catalog, CatalogKind};
use crate::models::{Episode, MediaFile, MediaItem, Tag};
use crate::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

/// Operations a [`MemoryCatalog`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    /// `list_tags` fails.
    Tags,
    /// `list_items` fails.
    Items,
    /// `list_files` for this item fails.
    Files(i64),
    /// `list_episodes` for this item fails.
    Episodes(i64),
    /// `update_item` for this item fails.
    Update(i64),
    /// `send_command` for this item fails.
    Command(i64),
}

/// A command the catalog received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommand {
    /// Command name.
    pub name: String,
    /// Item the command addressed.
    pub item_id: i64,
}

/// In-memory catalog.
///
/// # Example
///
/// ```rust
/// use purgearr::catalog::{Catalog, CatalogKind, MemoryCatalog};
/// use purgearr::models::{MediaItem, Tag};
///
/// let catalog = MemoryCatalog::new(CatalogKind::Sonarr)
///     .with_tag(Tag::new(5, "Keeper"))
///     .with_item(MediaItem::new(1, "Show A").with_tags([5]));
///
/// assert_eq!(catalog.list_items().unwrap().len(), 1);
/// ```
#[derive(Debug)]
pub struct MemoryCatalog {
    kind: CatalogKind,
    tags: Vec<Tag>,
    items: Mutex<Vec<MediaItem>>,
    files: HashMap<i64, Vec<MediaFile>>,
    episodes: HashMap<i64, Vec<Episode>>,
    fail_points: HashSet<FailPoint>,
    malformed: HashSet<FailPoint>,
    file_requests: Mutex<Vec<i64>>,
    updates: Mutex<Vec<MediaItem>>,
    commands: Mutex<Vec<RecordedCommand>>,
}

impl MemoryCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new(kind: CatalogKind) -> Self {
        Self {
            kind,
            tags: Vec::new(),
            items: Mutex::new(Vec::new()),
            files: HashMap::new(),
            episodes: HashMap::new(),
            fail_points: HashSet::new(),
            malformed: HashSet::new(),
            file_requests: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
            commands: Mutex::new(Vec::new()),
        }
    }

    /// Adds a tag definition.
    #[must_use]
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Appends an item to the listing.
    #[must_use]
    pub fn with_item(self, item: MediaItem) -> Self {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(item);
        self
    }

    /// Appends a file to an item's file listing.
    #[must_use]
    pub fn with_file(mut self, item_id: i64, file: MediaFile) -> Self {
        self.files.entry(item_id).or_default().push(file);
        self
    }

    /// Appends an episode to a series.
    #[must_use]
    pub fn with_episode(mut self, item_id: i64, episode: Episode) -> Self {
        self.episodes.entry(item_id).or_default().push(episode);
        self
    }

    /// Makes an operation fail with a transport error.
    #[must_use]
    pub fn failing(mut self, point: FailPoint) -> Self {
        self.fail_points.insert(point);
        self
    }

    /// Makes an operation fail as if the catalog answered with a body that
    /// does not decode.
    #[must_use]
    pub fn malformed(mut self, point: FailPoint) -> Self {
        self.malformed.insert(point);
        self
    }

    /// Item ids whose files were requested, in request order.
    #[must_use]
    pub fn file_requests(&self) -> Vec<i64> {
        self.file_requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Item records written back, in write order.
    #[must_use]
    pub fn updates(&self) -> Vec<MediaItem> {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Commands received, in order.
    #[must_use]
    pub fn commands(&self) -> Vec<RecordedCommand> {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn check(&self, point: FailPoint, operation: &str) -> Result<()> {
        if self.fail_points.contains(&point) {
            return Err(Error::Transport {
                catalog: self.kind.as_str().to_string(),
                operation: operation.to_string(),
                cause: "connection refused".to_string(),
            });
        }
        if self.malformed.contains(&point) {
            return Err(Error::Decode {
                catalog: self.kind.as_str().to_string(),
                operation: operation.to_string(),
                cause: "expected value at line 1 column 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Catalog for MemoryCatalog {
    fn kind(&self) -> CatalogKind {
        self.kind
    }

    fn list_tags(&self) -> Result<Vec<Tag>> {
        self.check(FailPoint::Tags, "list_tags")?;
        Ok(self.tags.clone())
    }

    fn list_items(&self) -> Result<Vec<MediaItem>> {
        self.check(FailPoint::Items, "list_items")?;
        Ok(self
            .items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn list_files(&self, item_id: i64) -> Result<Vec<MediaFile>> {
        self.file_requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(item_id);
        self.check(FailPoint::Files(item_id), "list_files")?;
        Ok(self.files.get(&item_id).cloned().unwrap_or_default())
    }

    fn list_episodes(&self, item_id: i64) -> Result<Vec<Episode>> {
        self.check(FailPoint::Episodes(item_id), "list_episodes")?;
        Ok(self.episodes.get(&item_id).cloned().unwrap_or_default())
    }

    fn update_item(&self, item: &MediaItem) -> Result<()> {
        self.check(FailPoint::Update(item.id), "update_item")?;

        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = items.iter_mut().find(|existing| existing.id == item.id) {
            *existing = item.clone();
        }
        drop(items);

        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(item.clone());
        Ok(())
    }

    fn send_command(&self, name: &str, item_id: i64) -> Result<()> {
        self.check(FailPoint::Command(item_id), "send_command")?;
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCommand {
                name: name.to_string(),
                item_id,
            });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_and_recording() {
        let catalog = MemoryCatalog::new(CatalogKind::Radarr)
            .with_item(MediaItem::new(1, "Film"))
            .with_file(1, MediaFile::new(10, "/m/film.mkv", "2024-01-01T00:00:00Z"));

        assert_eq!(catalog.list_files(1).expect("files").len(), 1);
        assert!(catalog.list_files(2).expect("files").is_empty());
        assert_eq!(catalog.file_requests(), vec![1, 2]);
    }

    #[test]
    fn test_fail_points() {
        let catalog = MemoryCatalog::new(CatalogKind::Sonarr)
            .failing(FailPoint::Tags)
            .failing(FailPoint::Files(3));

        assert!(matches!(catalog.list_tags(), Err(Error::Transport { .. })));
        assert!(catalog.list_files(3).is_err());
        assert!(catalog.list_files(4).is_ok());
        // Failed requests are still recorded.
        assert_eq!(catalog.file_requests(), vec![3, 4]);
    }

    #[test]
    fn test_malformed_points_raise_decode_errors() {
        let catalog = MemoryCatalog::new(CatalogKind::Radarr).malformed(FailPoint::Files(1));

        assert!(matches!(
            catalog.list_files(1),
            Err(Error::Decode { ref operation, .. }) if operation == "list_files"
        ));
        assert!(catalog.list_files(2).is_ok());
    }

    #[test]
    fn test_update_replaces_item() {
        let catalog = MemoryCatalog::new(CatalogKind::Sonarr).with_item(MediaItem::new(1, "Old"));
        catalog
            .update_item(&MediaItem::new(1, "New"))
            .expect("update");

        let items = catalog.list_items().expect("items");
        assert_eq!(items[0].title, "New");
        assert_eq!(catalog.updates().len(), 1);
    }
}
