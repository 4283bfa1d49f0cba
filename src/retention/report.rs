//! Retention run reports.
//!
//! Every failure the engine catches ends up here as a value rather than an
//! error, at the narrowest scope it affected: a whole catalog, one item, or
//! one file.

use crate::catalog::CatalogKind;
use crate::models::DeletionOutcome;
use chrono::NaiveDateTime;
use serde::Serialize;

/// What happened to one file that was not silently kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum FileRecord {
    /// The file was eligible and handed to the deletion executor.
    Processed {
        /// When the catalog imported the file.
        added_at: NaiveDateTime,
        /// Executor outcome.
        outcome: DeletionOutcome,
    },
    /// The file's timestamp could not be parsed.
    DateError {
        /// Path of the file.
        path: String,
        /// Parse failure.
        detail: String,
    },
}

/// How an item was handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemDisposition {
    /// The item carries the protection tag; its files were never fetched.
    Protected,
    /// Listing the item's files failed.
    FetchFailed {
        /// Failure cause.
        detail: String,
    },
    /// The item's files were inspected.
    Inspected {
        /// Number of files the catalog listed.
        files_checked: usize,
        /// Eligible files and files with unreadable timestamps.
        files: Vec<FileRecord>,
    },
}

/// Per-item report entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemReport {
    /// Catalog id of the item.
    pub id: i64,
    /// Title of the item.
    pub title: String,
    /// How the item was handled.
    #[serde(flatten)]
    pub disposition: ItemDisposition,
}

impl ItemReport {
    /// Deletion outcomes produced for this item.
    pub fn outcomes(&self) -> impl Iterator<Item = &DeletionOutcome> {
        self.files().iter().filter_map(|record| match record {
            FileRecord::Processed { outcome, .. } => Some(outcome),
            FileRecord::DateError { .. } => None,
        })
    }

    fn files(&self) -> &[FileRecord] {
        match &self.disposition {
            ItemDisposition::Inspected { files, .. } => files.as_slice(),
            _ => &[],
        }
    }
}

/// Terminal state of one catalog pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CatalogStatus {
    /// All items were enumerated.
    Completed,
    /// Tags or items could not be listed; nothing was processed.
    Failed {
        /// Failure cause.
        detail: String,
    },
}

/// Result of one catalog pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogReport {
    /// Which catalog was processed.
    pub catalog: CatalogKind,
    /// Whether deletions were simulated.
    pub dry_run: bool,
    /// Terminal state.
    pub status: CatalogStatus,
    /// Items in catalog order.
    pub items: Vec<ItemReport>,
}

impl CatalogReport {
    /// Creates an empty, completed report.
    #[must_use]
    pub const fn new(catalog: CatalogKind, dry_run: bool) -> Self {
        Self {
            catalog,
            dry_run,
            status: CatalogStatus::Completed,
            items: Vec::new(),
        }
    }

    /// Creates a report for a catalog that could not be enumerated.
    #[must_use]
    pub fn failed(catalog: CatalogKind, dry_run: bool, detail: impl Into<String>) -> Self {
        Self {
            status: CatalogStatus::Failed {
                detail: detail.into(),
            },
            ..Self::new(catalog, dry_run)
        }
    }

    /// Returns `true` if the catalog could not be enumerated.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self.status, CatalogStatus::Failed { .. })
    }

    /// Number of items enumerated.
    #[must_use]
    pub fn items_checked(&self) -> usize {
        self.items.len()
    }

    /// Number of protected items.
    #[must_use]
    pub fn items_protected(&self) -> usize {
        self.count_items(|d| matches!(d, ItemDisposition::Protected))
    }

    /// Number of items whose file listing failed.
    #[must_use]
    pub fn items_failed(&self) -> usize {
        self.count_items(|d| matches!(d, ItemDisposition::FetchFailed { .. }))
    }

    /// Number of files inspected.
    #[must_use]
    pub fn files_checked(&self) -> usize {
        self.items
            .iter()
            .map(|item| match item.disposition {
                ItemDisposition::Inspected { files_checked, .. } => files_checked,
                _ => 0,
            })
            .sum()
    }

    /// Number of files deleted, or that would be in a dry run.
    #[must_use]
    pub fn files_deleted(&self) -> usize {
        self.outcomes().filter(|o| o.succeeded).count()
    }

    /// Number of deletions that failed.
    #[must_use]
    pub fn files_failed(&self) -> usize {
        self.outcomes().filter(|o| !o.succeeded).count()
    }

    /// Number of files skipped because their timestamp was unreadable.
    #[must_use]
    pub fn date_errors(&self) -> usize {
        self.items
            .iter()
            .flat_map(ItemReport::files)
            .filter(|record| matches!(record, FileRecord::DateError { .. }))
            .count()
    }

    /// All deletion outcomes, in processing order.
    pub fn outcomes(&self) -> impl Iterator<Item = &DeletionOutcome> {
        self.items.iter().flat_map(ItemReport::outcomes)
    }

    fn count_items(&self, predicate: impl Fn(&ItemDisposition) -> bool) -> usize {
        self.items
            .iter()
            .filter(|item| predicate(&item.disposition))
            .count()
    }

    /// Returns a one-line summary.
    #[must_use]
    pub fn summary(&self) -> String {
        if let CatalogStatus::Failed { detail } = &self.status {
            return format!("{}: failed ({detail})", self.catalog);
        }

        let action = if self.dry_run {
            "would delete"
        } else {
            "deleted"
        };

        format!(
            "{}: {action} {} of {} files across {} items ({} protected, {} item errors, {} delete failures, {} bad timestamps)",
            self.catalog,
            self.files_deleted(),
            self.files_checked(),
            self.items_checked(),
            self.items_protected(),
            self.items_failed(),
            self.files_failed(),
            self.date_errors(),
        )
    }
}

/// Result of a full retention run across catalogs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetentionReport {
    /// Whether deletions were simulated.
    pub dry_run: bool,
    /// Cutoff instant shared by every comparison in the run.
    pub cutoff: NaiveDateTime,
    /// Catalog reports, in processing order.
    pub catalogs: Vec<CatalogReport>,
    /// Wall time of the run in milliseconds.
    pub duration_ms: u64,
}

impl RetentionReport {
    /// Total files deleted (or that would be) across catalogs.
    #[must_use]
    pub fn files_deleted(&self) -> usize {
        self.catalogs.iter().map(CatalogReport::files_deleted).sum()
    }

    /// Returns the report for `catalog`, if it was processed.
    #[must_use]
    pub fn catalog(&self, catalog: CatalogKind) -> Option<&CatalogReport> {
        self.catalogs.iter().find(|report| report.catalog == catalog)
    }

    /// Returns a multi-line summary, one line per catalog.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut lines: Vec<String> = self.catalogs.iter().map(CatalogReport::summary).collect();
        lines.push(format!(
            "Cutoff {} - completed in {}ms",
            self.cutoff, self.duration_ms
        ));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn added() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid date")
    }

    fn sample(dry_run: bool) -> CatalogReport {
        let mut report = CatalogReport::new(CatalogKind::Radarr, dry_run);
        report.items = vec![
            ItemReport {
                id: 1,
                title: "Kept".to_string(),
                disposition: ItemDisposition::Protected,
            },
            ItemReport {
                id: 2,
                title: "Broken".to_string(),
                disposition: ItemDisposition::FetchFailed {
                    detail: "timeout".to_string(),
                },
            },
            ItemReport {
                id: 3,
                title: "Old".to_string(),
                disposition: ItemDisposition::Inspected {
                    files_checked: 4,
                    files: vec![
                        FileRecord::Processed {
                            added_at: added(),
                            outcome: DeletionOutcome::deleted("/m/a.mkv"),
                        },
                        FileRecord::Processed {
                            added_at: added(),
                            outcome: DeletionOutcome::failed("/m/b.mkv", "permission denied"),
                        },
                        FileRecord::DateError {
                            path: "/m/c.mkv".to_string(),
                            detail: "bad".to_string(),
                        },
                    ],
                },
            },
        ];
        report
    }

    #[test]
    fn test_counts() {
        let report = sample(false);
        assert_eq!(report.items_checked(), 3);
        assert_eq!(report.items_protected(), 1);
        assert_eq!(report.items_failed(), 1);
        assert_eq!(report.files_checked(), 4);
        assert_eq!(report.files_deleted(), 1);
        assert_eq!(report.files_failed(), 1);
        assert_eq!(report.date_errors(), 1);
    }

    #[test]
    fn test_summary_wording() {
        assert!(sample(false).summary().contains("Radarr: deleted 1 of 4 files"));
        assert!(sample(true).summary().contains("would delete"));

        let failed = CatalogReport::failed(CatalogKind::Sonarr, false, "connection refused");
        assert!(failed.is_failed());
        assert_eq!(failed.summary(), "Sonarr: failed (connection refused)");
    }

    #[test]
    fn test_json_shape() {
        let value = serde_json::to_value(sample(false)).expect("serializes");
        assert_eq!(value["catalog"], "radarr");
        assert_eq!(value["status"]["state"], "completed");
        assert_eq!(value["items"][0]["status"], "protected");
        assert_eq!(value["items"][2]["files"][0]["result"], "processed");
    }
}
