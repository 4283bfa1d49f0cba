//! Clean command handler.
//!
//! Deletes media files older than the retention period, skipping items
//! that carry the protection tag.

use super::{OutputFormat, connect_catalogs};
use purgearr::catalog::{Catalog, CatalogKind, HttpCatalog};
use purgearr::config::PurgearrConfig;
use purgearr::retention::{
    CatalogStatus, FileRecord, ItemDisposition, LocalFileStore, RetentionEngine, RetentionReport,
};

/// Clean command.
///
/// # Examples
///
/// ```bash
/// # See what would be deleted
/// purgearr clean --dry-run
///
/// # Delete for real
/// purgearr clean
/// ```
pub fn cmd_clean(
    config: &PurgearrConfig,
    dry_run: bool,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalogs = connect_catalogs(config)?;
    let report = run_clean(config, &catalogs, dry_run);

    match format {
        OutputFormat::Text => {
            display_retention_report(&report, config.retention.protection_tag());
        },
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

/// Runs the retention engine against the local filesystem.
pub fn run_clean(
    config: &PurgearrConfig,
    catalogs: &[HttpCatalog],
    dry_run: bool,
) -> RetentionReport {
    let engine = RetentionEngine::new(config.retention.clone(), LocalFileStore, dry_run);
    let catalogs: Vec<&dyn Catalog> = catalogs.iter().map(|c| c as &dyn Catalog).collect();
    engine.run(&catalogs)
}

/// Displays a retention report, one line per notable event.
pub fn display_retention_report(report: &RetentionReport, protection_tag: &str) {
    for catalog in &report.catalogs {
        println!("Checking {} for old files...", catalog.catalog);

        if let CatalogStatus::Failed { detail } = &catalog.status {
            println!("Error with {}: {detail}", catalog.catalog);
            continue;
        }

        for item in &catalog.items {
            match &item.disposition {
                ItemDisposition::Protected => {
                    println!("Skipping {} (tagged as '{protection_tag}')", item.title);
                },
                ItemDisposition::FetchFailed { detail } => {
                    println!("Error fetching files for {}: {detail}", item.title);
                },
                ItemDisposition::Inspected { files, .. } => {
                    for record in files {
                        println!("{}", file_record_line(record, catalog.catalog));
                    }
                },
            }
        }
    }

    println!();
    for catalog in &report.catalogs {
        println!("{}", catalog.summary());
    }
    println!("Cutoff: {} (completed in {}ms)", report.cutoff, report.duration_ms);

    if report.dry_run {
        println!();
        println!("This was a dry run. Run without --dry-run to delete files.");
    }
}

/// Formats one file record the way the report prints it.
fn file_record_line(record: &FileRecord, catalog: CatalogKind) -> String {
    match record {
        FileRecord::Processed { added_at, outcome } if outcome.simulated => format!(
            "[TEST MODE] Would delete {} from {catalog}. Added on: {added_at}",
            outcome.path
        ),
        FileRecord::Processed { added_at, outcome } if outcome.succeeded => {
            format!("Deleted {} from {catalog}. Added on: {added_at}", outcome.path)
        },
        FileRecord::Processed { outcome, .. } => format!(
            "Error with {catalog}: {}",
            outcome.error_detail.as_deref().unwrap_or("unknown error")
        ),
        FileRecord::DateError { path, detail } => format!("Skipping {path}: {detail}"),
    }
}
