//! Maintenance command handlers.

use super::{OutputFormat, connect_catalogs};
use purgearr::catalog::{Catalog, HttpCatalog};
use purgearr::config::PurgearrConfig;
use purgearr::maintenance::{
    ItemAction, MaintenanceReport, MaintenanceTask, RefreshTrigger, SeasonUnmonitor,
};
use purgearr::retention::CatalogStatus;

/// Unmonitor command: unmonitors seasons whose episodes are all unmonitored.
pub fn cmd_unmonitor(
    config: &PurgearrConfig,
    dry_run: bool,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalogs = connect_catalogs(config)?;
    let reports = run_unmonitor(&catalogs, dry_run);
    output(&reports, format)
}

/// Refresh command: asks every catalog to rescan each of its items.
pub fn cmd_refresh(
    config: &PurgearrConfig,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalogs = connect_catalogs(config)?;
    let reports = run_refresh(&catalogs);
    output(&reports, format)
}

/// Runs season unmonitoring against every catalog that has seasons.
pub fn run_unmonitor(catalogs: &[HttpCatalog], dry_run: bool) -> Vec<MaintenanceReport> {
    let unmonitor = SeasonUnmonitor::new(dry_run);
    catalogs
        .iter()
        .filter(|catalog| catalog.kind().has_episodes())
        .map(|catalog| unmonitor.run(catalog))
        .collect()
}

/// Triggers a refresh on every catalog.
pub fn run_refresh(catalogs: &[HttpCatalog]) -> Vec<MaintenanceReport> {
    let trigger = RefreshTrigger::new();
    catalogs.iter().map(|catalog| trigger.run(catalog)).collect()
}

fn output(
    reports: &[MaintenanceReport],
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Text => display_maintenance_reports(reports),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(reports)?),
    }
    Ok(())
}

/// Displays maintenance reports, one line per changed or failed item.
pub fn display_maintenance_reports(reports: &[MaintenanceReport]) {
    if reports.is_empty() {
        println!("No catalog supports this task.");
        return;
    }

    for report in reports {
        if let CatalogStatus::Failed { detail } = &report.status {
            println!("Error with {}: {detail}", report.catalog);
            continue;
        }

        for item in &report.items {
            match &item.action {
                ItemAction::Unchanged => {},
                ItemAction::Unmonitored {
                    seasons,
                    simulated: true,
                } => println!(
                    "[TEST MODE] Would unmonitor {} season(s) {seasons:?}",
                    item.title
                ),
                ItemAction::Unmonitored { seasons, .. } => {
                    println!("Unmonitored {} season(s) {seasons:?}", item.title);
                },
                ItemAction::Refreshed => println!("Refreshed {}", item.title),
                ItemAction::Failed { detail } => {
                    let verb = match report.task {
                        MaintenanceTask::Unmonitor => "update",
                        MaintenanceTask::Refresh => "refresh",
                    };
                    println!("Failed to {verb} {}: {detail}", item.title);
                },
            }
        }
        println!("{}", report.summary());
    }
}
