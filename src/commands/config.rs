//! Config command handler.

use purgearr::config::{CatalogConfig, PurgearrConfig};
use purgearr::observability::LoggingConfig;

/// Config command: shows the effective configuration. API keys are never
/// printed.
pub fn cmd_config(
    config: &PurgearrConfig,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Current Configuration");
    println!("=====================");
    println!();

    println!("Config Files Loaded:");
    if config.config_sources.is_empty() {
        println!("  (none - using defaults)");
    } else {
        for source in &config.config_sources {
            println!("  - {}", source.display());
        }
    }
    println!();

    for catalog in config.catalogs() {
        display_catalog(catalog);
    }

    println!("Retention:");
    println!("  Days: {}", config.retention.cutoff_age().num_days());
    println!("  Protection Tag: {}", config.retention.protection_tag());
    println!();

    let logging = LoggingConfig::from_settings(Some(&config.logging), verbose);
    println!("Logging:");
    println!("  Format: {:?}", logging.format);
    println!("  Filter: {}", logging.filter);
    println!(
        "  File: {}",
        logging
            .file
            .as_ref()
            .map_or_else(|| "(stderr)".to_string(), |p| p.display().to_string())
    );

    Ok(())
}

fn display_catalog(catalog: &CatalogConfig) {
    println!("{}:", catalog.kind);
    println!("  Enabled: {}", catalog.enabled);
    println!("  URL: {}", catalog.url.as_deref().unwrap_or("(not set)"));
    println!(
        "  API Key: {}",
        if catalog.api_key.is_some() {
            "(set)"
        } else {
            "(not set)"
        }
    );
    if let Some(secs) = catalog.timeout_secs {
        println!("  Timeout: {secs}s");
    }
    println!();
}
