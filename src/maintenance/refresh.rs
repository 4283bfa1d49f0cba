//! Library refresh trigger.

use super::report::{ItemAction, MaintenanceItem, MaintenanceReport, MaintenanceTask};
use crate::catalog::Catalog;
use tracing::{debug, info, info_span, warn};

/// Issues a refresh command for every item in a catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct RefreshTrigger;

impl RefreshTrigger {
    /// Creates a refresh trigger.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Sends the catalog's refresh command once per item, in listing order.
    pub fn run(&self, catalog: &dyn Catalog) -> MaintenanceReport {
        let kind = catalog.kind();
        let _span = info_span!("purgearr.maintenance.refresh", catalog = kind.as_str()).entered();

        let items = match catalog.list_items() {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "Error with {kind}: could not list items");
                return MaintenanceReport::failed(MaintenanceTask::Refresh, kind, e.to_string());
            },
        };

        let command = kind.refresh_command();
        let mut report = MaintenanceReport::new(MaintenanceTask::Refresh, kind);
        report.items = items
            .into_iter()
            .map(|item| {
                let action = match catalog.send_command(command, item.id) {
                    Ok(()) => {
                        debug!(item_id = item.id, command, "Refresh requested");
                        ItemAction::Refreshed
                    },
                    Err(e) => {
                        warn!(item_id = item.id, title = %item.title, error = %e, "Refresh failed");
                        ItemAction::Failed {
                            detail: e.to_string(),
                        }
                    },
                };
                MaintenanceItem {
                    id: item.id,
                    title: item.title,
                    action,
                }
            })
            .collect();

        info!(
            items = report.items.len(),
            failed = report.items_failed(),
            "Refresh completed"
        );
        report
    }
}
