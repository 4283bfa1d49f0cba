//! Binary entry point for purgearr.
//!
//! This binary provides the CLI for the Sonarr/Radarr retention agent.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

mod commands;

use clap::{Parser, Subcommand};
use commands::{OutputFormat, cmd_all, cmd_clean, cmd_config, cmd_refresh, cmd_unmonitor};
use purgearr::config::PurgearrConfig;
use purgearr::observability::{self, LoggingConfig};
use std::path::PathBuf;
use std::process::ExitCode;

/// Purgearr - retention and maintenance for Sonarr and Radarr libraries.
#[derive(Parser)]
#[command(name = "purgearr")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "PURGEARR_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Report output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Delete media files older than the retention period.
    Clean {
        /// Show what would be deleted without deleting anything.
        #[arg(long, visible_alias = "test")]
        dry_run: bool,
    },

    /// Unmonitor seasons whose episodes are all unmonitored.
    Unmonitor {
        /// Show what would change without writing to the catalog.
        #[arg(long, visible_alias = "test")]
        dry_run: bool,
    },

    /// Ask each catalog to rescan every item.
    Refresh,

    /// Run clean, unmonitor, and refresh in that order.
    All {
        /// Simulate deletions and season updates.
        #[arg(long, visible_alias = "test")]
        dry_run: bool,
    },

    /// Show the effective configuration.
    Config,
}

/// Main entry point.
fn main() -> ExitCode {
    // A missing .env file is the normal case.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match PurgearrConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    let logging = LoggingConfig::from_settings(Some(&config.logging), cli.verbose);
    if let Err(e) = observability::init(&logging) {
        eprintln!("Failed to initialize observability: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(cli: Cli, config: &PurgearrConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Clean { dry_run } => cmd_clean(config, dry_run, cli.format),
        Commands::Unmonitor { dry_run } => cmd_unmonitor(config, dry_run, cli.format),
        Commands::Refresh => cmd_refresh(config, cli.format),
        Commands::All { dry_run } => cmd_all(config, dry_run, cli.format),
        Commands::Config => cmd_config(config, cli.verbose),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_test_alias_sets_dry_run() {
        let cli = Cli::try_parse_from(["purgearr", "clean", "--test"]).expect("parses");
        assert!(matches!(cli.command, Commands::Clean { dry_run: true }));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["purgearr", "all", "--dry-run", "--format", "json", "-v"])
            .expect("parses");
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::All { dry_run: true }));
    }
}
