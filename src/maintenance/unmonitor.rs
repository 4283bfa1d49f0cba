//! Season unmonitoring.

use super::report::{ItemAction, MaintenanceItem, MaintenanceReport, MaintenanceTask};
use crate::Result;
use crate::catalog::Catalog;
use crate::models::{Episode, MediaItem, Season};
use std::collections::HashMap;
use tracing::{info, info_span, warn};

/// Returns the season numbers that should stop being monitored.
///
/// A season qualifies when it is currently monitored and at least one of
/// its episodes was returned, none of them monitored. Seasons without any
/// returned episodes are left alone.
#[must_use]
pub fn seasons_to_unmonitor(seasons: &[Season], episodes: &[Episode]) -> Vec<i32> {
    let mut any_monitored: HashMap<i32, bool> = HashMap::new();
    for episode in episodes {
        *any_monitored.entry(episode.season_number).or_default() |= episode.monitored;
    }

    seasons
        .iter()
        .filter(|season| season.monitored)
        .filter(|season| any_monitored.get(&season.season_number) == Some(&false))
        .map(|season| season.season_number)
        .collect()
}

/// Unmonitors seasons with no monitored episodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeasonUnmonitor {
    dry_run: bool,
}

impl SeasonUnmonitor {
    /// Creates an unmonitor pass. With `dry_run` set, no record is written.
    #[must_use]
    pub const fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Runs against every series in `catalog`.
    pub fn run(&self, catalog: &dyn Catalog) -> MaintenanceReport {
        let kind = catalog.kind();
        let _span = info_span!("purgearr.maintenance.unmonitor", catalog = kind.as_str()).entered();

        let series = match catalog.list_items() {
            Ok(series) => series,
            Err(e) => {
                warn!(error = %e, "Error with {kind}: could not list series");
                return MaintenanceReport::failed(MaintenanceTask::Unmonitor, kind, e.to_string());
            },
        };

        let mut report = MaintenanceReport::new(MaintenanceTask::Unmonitor, kind);
        report.items = series
            .into_iter()
            .map(|item| {
                let action = self.process_series(catalog, &item).unwrap_or_else(|e| {
                    warn!(item_id = item.id, title = %item.title, error = %e, "Season unmonitor failed");
                    ItemAction::Failed {
                        detail: e.to_string(),
                    }
                });
                MaintenanceItem {
                    id: item.id,
                    title: item.title,
                    action,
                }
            })
            .collect();

        info!(
            series = report.items.len(),
            changed = report.items_changed(),
            failed = report.items_failed(),
            "Season unmonitor completed"
        );
        report
    }

    /// Fetches episodes and writes back the series if any season changed.
    fn process_series(&self, catalog: &dyn Catalog, item: &MediaItem) -> Result<ItemAction> {
        let episodes = catalog.list_episodes(item.id)?;
        let seasons = seasons_to_unmonitor(&item.seasons, &episodes);
        if seasons.is_empty() {
            return Ok(ItemAction::Unchanged);
        }

        if !self.dry_run {
            let mut updated = item.clone();
            for season in &mut updated.seasons {
                if seasons.contains(&season.season_number) {
                    season.monitored = false;
                }
            }
            catalog.update_item(&updated)?;
        }

        info!(
            item_id = item.id,
            ?seasons,
            dry_run = self.dry_run,
            "Unmonitored seasons of {}",
            item.title
        );
        Ok(ItemAction::Unmonitored {
            seasons,
            simulated: self.dry_run,
        })
    }
}
