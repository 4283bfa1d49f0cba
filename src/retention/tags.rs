//! Tag resolution and protection checks.

use super::RetentionPolicy;
use crate::Result;
use crate::catalog::Catalog;
use crate::models::Tag;
use std::collections::HashMap;

/// Mapping from tag id to lower-cased label for one catalog.
///
/// Built fresh for every pass; tags can change between invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMap {
    labels: HashMap<i64, String>,
}

impl TagMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the normalized label for `id`, if the catalog defines it.
    #[must_use]
    pub fn label(&self, id: i64) -> Option<&str> {
        self.labels.get(&id).map(String::as_str)
    }

    /// Number of tags in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` if the catalog defines no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl FromIterator<Tag> for TagMap {
    fn from_iter<T: IntoIterator<Item = Tag>>(iter: T) -> Self {
        Self {
            labels: iter
                .into_iter()
                .map(|tag| (tag.id, tag.label.to_lowercase()))
                .collect(),
        }
    }
}

/// Fetches the catalog's tags and builds a [`TagMap`].
///
/// # Errors
///
/// Propagates the catalog's transport or decode error unchanged.
pub fn resolve_tags(catalog: &dyn Catalog) -> Result<TagMap> {
    Ok(catalog.list_tags()?.into_iter().collect())
}

/// Returns `true` if any of `tag_ids` carries the policy's protection tag.
///
/// Ids missing from `tag_map` never match. Stops at the first match.
#[must_use]
pub fn is_protected<'a, I>(tag_ids: I, tag_map: &TagMap, policy: &RetentionPolicy) -> bool
where
    I: IntoIterator<Item = &'a i64>,
{
    tag_ids
        .into_iter()
        .any(|id| tag_map.label(*id) == Some(policy.protection_tag()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogKind, FailPoint, MemoryCatalog};

    fn map() -> TagMap {
        [Tag::new(5, "Keeper"), Tag::new(6, "anime")]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_labels_lowercased() {
        let tags = map();
        assert_eq!(tags.label(5), Some("keeper"));
        assert_eq!(tags.label(7), None);
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_protected_by_matching_tag() {
        let policy = RetentionPolicy::default();
        assert!(is_protected(&[6, 5], &map(), &policy));
        assert!(is_protected(&[5], &map(), &policy));
    }

    #[test]
    fn test_unknown_and_other_tags_do_not_protect() {
        let policy = RetentionPolicy::default();
        assert!(!is_protected(&[6, 99], &map(), &policy));
        assert!(!is_protected(&[], &map(), &policy));
        assert!(!is_protected(&[5], &TagMap::new(), &policy));
    }

    #[test]
    fn test_custom_protection_tag() {
        let policy = RetentionPolicy::new().with_protection_tag("ANIME");
        assert!(is_protected(&[6], &map(), &policy));
        assert!(!is_protected(&[5], &map(), &policy));
    }

    #[test]
    fn test_resolve_tags_from_catalog() {
        let catalog = MemoryCatalog::new(CatalogKind::Sonarr).with_tag(Tag::new(1, "KEEPER"));
        let tags = resolve_tags(&catalog).expect("tags resolve");
        assert_eq!(tags.label(1), Some("keeper"));
    }

    #[test]
    fn test_resolve_tags_propagates_failure() {
        let catalog = MemoryCatalog::new(CatalogKind::Radarr).failing(FailPoint::Tags);
        assert!(resolve_tags(&catalog).is_err());
    }
}
