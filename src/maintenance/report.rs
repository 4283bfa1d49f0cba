//! Maintenance run reports.

use crate::catalog::CatalogKind;
use crate::retention::CatalogStatus;
use serde::Serialize;
use std::fmt;

/// Which maintenance action produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceTask {
    /// Season unmonitoring.
    Unmonitor,
    /// Library refresh.
    Refresh,
}

impl fmt::Display for MaintenanceTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unmonitor => f.write_str("unmonitor"),
            Self::Refresh => f.write_str("refresh"),
        }
    }
}

/// What was done to one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ItemAction {
    /// Nothing needed changing.
    Unchanged,
    /// These seasons were (or in a dry run would be) unmonitored.
    Unmonitored {
        /// Season numbers flipped to unmonitored.
        seasons: Vec<i32>,
        /// Whether the update was only planned.
        simulated: bool,
    },
    /// A refresh command was accepted.
    Refreshed,
    /// The item's work failed.
    Failed {
        /// Failure cause.
        detail: String,
    },
}

/// Per-item entry of a maintenance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaintenanceItem {
    /// Catalog id of the item.
    pub id: i64,
    /// Title of the item.
    pub title: String,
    /// What was done.
    #[serde(flatten)]
    pub action: ItemAction,
}

/// Result of running one maintenance action against one catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaintenanceReport {
    /// Action that ran.
    pub task: MaintenanceTask,
    /// Catalog it ran against.
    pub catalog: CatalogKind,
    /// Terminal state of the pass.
    pub status: CatalogStatus,
    /// Items in catalog order.
    pub items: Vec<MaintenanceItem>,
}

impl MaintenanceReport {
    /// Creates an empty, completed report.
    #[must_use]
    pub const fn new(task: MaintenanceTask, catalog: CatalogKind) -> Self {
        Self {
            task,
            catalog,
            status: CatalogStatus::Completed,
            items: Vec::new(),
        }
    }

    /// Creates a report for a catalog whose items could not be listed.
    #[must_use]
    pub fn failed(task: MaintenanceTask, catalog: CatalogKind, detail: impl Into<String>) -> Self {
        Self {
            status: CatalogStatus::Failed {
                detail: detail.into(),
            },
            ..Self::new(task, catalog)
        }
    }

    /// Returns `true` if the catalog could not be enumerated.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self.status, CatalogStatus::Failed { .. })
    }

    /// Number of items that were changed or refreshed.
    #[must_use]
    pub fn items_changed(&self) -> usize {
        self.items
            .iter()
            .filter(|item| {
                matches!(
                    item.action,
                    ItemAction::Unmonitored { .. } | ItemAction::Refreshed
                )
            })
            .count()
    }

    /// Number of items whose work failed.
    #[must_use]
    pub fn items_failed(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.action, ItemAction::Failed { .. }))
            .count()
    }

    /// Returns a one-line summary.
    #[must_use]
    pub fn summary(&self) -> String {
        if let CatalogStatus::Failed { detail } = &self.status {
            return format!("{} {}: failed ({detail})", self.catalog, self.task);
        }
        format!(
            "{} {}: {} of {} items changed, {} failed",
            self.catalog,
            self.task,
            self.items_changed(),
            self.items.len(),
            self.items_failed()
        )
    }
}
