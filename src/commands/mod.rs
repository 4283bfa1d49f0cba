//! Command handlers module.
//!
//! - `clean.rs`: retention run (`clean`)
//! - `maintenance.rs`: season unmonitoring and refresh (`unmonitor`, `refresh`)
//! - `config.rs`: configuration display (`config`)

mod clean;
mod config;
mod maintenance;

use clap::ValueEnum;
use purgearr::catalog::HttpCatalog;
use purgearr::config::PurgearrConfig;

pub use clean::{cmd_clean, display_retention_report, run_clean};
pub use config::cmd_config;
pub use maintenance::{
    cmd_refresh, cmd_unmonitor, display_maintenance_reports, run_refresh, run_unmonitor,
};

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// A single JSON document.
    Json,
}

/// Connects every enabled, configured catalog.
///
/// A catalog whose settings are unusable is reported and left out; the
/// others still run.
pub fn connect_catalogs(
    config: &PurgearrConfig,
) -> Result<Vec<HttpCatalog>, Box<dyn std::error::Error>> {
    let mut catalogs = Vec::new();
    for settings in config.catalogs() {
        match settings.connect() {
            Ok(Some(catalog)) => catalogs.push(catalog),
            Ok(None) => {
                tracing::debug!(catalog = settings.kind.as_str(), "Catalog not configured");
            },
            Err(e) => eprintln!("Error with {}: {e}", settings.kind),
        }
    }

    if catalogs.is_empty() {
        return Err("no catalog is configured; set [sonarr] or [radarr] url and api_key".into());
    }
    Ok(catalogs)
}

/// `all`: clean, then unmonitor, then refresh.
///
/// Every stage runs even if an earlier one reported failures; failures are
/// reported, not returned.
pub fn cmd_all(
    config: &PurgearrConfig,
    dry_run: bool,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalogs = connect_catalogs(config)?;

    let retention = run_clean(config, &catalogs, dry_run);
    let unmonitor = run_unmonitor(&catalogs, dry_run);
    let refresh = run_refresh(&catalogs);

    match format {
        OutputFormat::Text => {
            display_retention_report(&retention, config.retention.protection_tag());
            println!();
            display_maintenance_reports(&unmonitor);
            println!();
            display_maintenance_reports(&refresh);
        },
        OutputFormat::Json => {
            let document = serde_json::json!({
                "clean": retention,
                "unmonitor": unmonitor,
                "refresh": refresh,
            });
            println!("{}", serde_json::to_string_pretty(&document)?);
        },
    }

    Ok(())
}
