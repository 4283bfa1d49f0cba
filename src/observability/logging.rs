//! Log output settings.

use crate::config::LoggingSettings;
use std::path::PathBuf;

/// Environment variable holding a log filter directive.
pub const LOG_FILTER_ENV: &str = "PURGEARR_LOG";

/// Environment variable selecting the log format.
pub const LOG_FORMAT_ENV: &str = "PURGEARR_LOG_FORMAT";

/// Environment variable naming a log file.
pub const LOG_FILE_ENV: &str = "PURGEARR_LOG_FILE";

const DEFAULT_FILTER: &str = "warn";
const VERBOSE_FILTER: &str = "warn,purgearr=debug";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pretty" | "text" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// `EnvFilter` directive.
    pub filter: String,
    /// Log file; stderr when `None`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: DEFAULT_FILTER.to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Builds logging config from file settings and the process environment.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        Self::resolve(settings, verbose, |key| std::env::var(key).ok())
    }

    /// Builds logging config, reading environment values through `lookup`.
    ///
    /// Filter precedence: `PURGEARR_LOG`, `RUST_LOG`, `--verbose`, the
    /// config file, then the built-in default.
    #[must_use]
    pub fn resolve(
        settings: Option<&LoggingSettings>,
        verbose: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let filter = non_empty(LOG_FILTER_ENV)
            .or_else(|| non_empty("RUST_LOG"))
            .or_else(|| verbose.then(|| VERBOSE_FILTER.to_string()))
            .or_else(|| settings.and_then(|s| s.filter.clone()))
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());

        let format = non_empty(LOG_FORMAT_ENV)
            .or_else(|| settings.and_then(|s| s.format.clone()))
            .and_then(|name| LogFormat::parse(&name))
            .unwrap_or_default();

        let file = non_empty(LOG_FILE_ENV)
            .map(PathBuf::from)
            .or_else(|| settings.and_then(|s| s.file.clone()));

        Self {
            format,
            filter,
            file,
        }
    }
}
