//! Configuration management.
//!
//! Configuration is assembled once at start-up and then passed by value
//! into the components that need it:
//!
//! 1. Defaults
//! 2. TOML config file (`--config`, `PURGEARR_CONFIG_PATH`, or the platform
//!    config directory)
//! 3. Environment overrides (`PURGEARR_*`)
//!
//! ```toml
//! [sonarr]
//! url = "http://nas:8989/api/v3"
//! api_key = "..."
//!
//! [radarr]
//! url = "http://nas:7878/api/v3"
//! api_key = "..."
//! timeout_secs = 30
//!
//! [retention]
//! days = 90
//! protection_tag = "keeper"
//!
//! [logging]
//! format = "json"
//! ```

use crate::catalog::{CatalogKind, HttpCatalog};
use crate::retention::{PROTECTION_TAG_ENV, RETENTION_DAYS_ENV, RetentionPolicy};
use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "PURGEARR_CONFIG_PATH";

/// Main configuration for purgearr.
#[derive(Debug)]
pub struct PurgearrConfig {
    /// Sonarr connection.
    pub sonarr: CatalogConfig,
    /// Radarr connection.
    pub radarr: CatalogConfig,
    /// Retention policy.
    pub retention: RetentionPolicy,
    /// Logging settings.
    pub logging: LoggingSettings,
    /// Config files that were loaded, in load order.
    pub config_sources: Vec<PathBuf>,
}

/// Connection settings for one catalog.
#[derive(Debug)]
pub struct CatalogConfig {
    /// Which catalog this is.
    pub kind: CatalogKind,
    /// Whether the catalog takes part in runs.
    pub enabled: bool,
    /// API base URL, e.g. `http://nas:8989/api/v3`.
    pub url: Option<String>,
    /// API key.
    pub api_key: Option<SecretString>,
    /// Request timeout in seconds. `None` leaves the client default.
    pub timeout_secs: Option<u64>,
}

impl CatalogConfig {
    /// Creates an enabled catalog config with no URL.
    #[must_use]
    pub const fn new(kind: CatalogKind) -> Self {
        Self {
            kind,
            enabled: true,
            url: None,
            api_key: None,
            timeout_secs: None,
        }
    }

    /// Returns `true` if the catalog is enabled and has a URL.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.enabled && self.url.is_some()
    }

    /// Builds an HTTP client for the catalog.
    ///
    /// Returns `Ok(None)` when the catalog is disabled or has no URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the URL is malformed or the API
    /// key is missing.
    pub fn connect(&self) -> Result<Option<HttpCatalog>> {
        let Some(url) = self.url.as_deref().filter(|_| self.is_configured()) else {
            return Ok(None);
        };

        let api_key = self
            .api_key
            .as_ref()
            .map(|key| SecretString::from(key.expose_secret().to_owned()))
            .ok_or_else(|| {
                Error::InvalidInput(format!("{} API key is not configured", self.kind.as_str()))
            })?;

        let catalog = HttpCatalog::new(self.kind, url, api_key)?;
        match self.timeout_secs {
            Some(secs) if secs > 0 => catalog.with_timeout(Duration::from_secs(secs)).map(Some),
            _ => Ok(Some(catalog)),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSettings {
    /// Output format: `pretty` or `json`.
    pub format: Option<String>,
    /// `EnvFilter` directive, e.g. `purgearr=debug`.
    pub filter: Option<String>,
    /// Log file path. Logs go to stderr when unset.
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Sonarr section.
    pub sonarr: Option<ConfigFileCatalog>,
    /// Radarr section.
    pub radarr: Option<ConfigFileCatalog>,
    /// Retention section.
    pub retention: Option<ConfigFileRetention>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
}

/// Catalog section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileCatalog {
    /// Enable switch.
    pub enabled: Option<bool>,
    /// API base URL.
    pub url: Option<String>,
    /// API key.
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// Retention section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileRetention {
    /// Retention period in days.
    pub days: Option<u32>,
    /// Protection tag label.
    pub protection_tag: Option<String>,
}

impl Default for PurgearrConfig {
    fn default() -> Self {
        Self {
            sonarr: CatalogConfig::new(CatalogKind::Sonarr),
            radarr: CatalogConfig::new(CatalogKind::Radarr),
            retention: RetentionPolicy::default(),
            logging: LoggingSettings::default(),
            config_sources: Vec::new(),
        }
    }
}

impl PurgearrConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        let mut config = Self::from_toml(&contents)?;
        config.config_sources.push(path.to_path_buf());
        Ok(config)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration TOML.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;
        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/purgearr/` on macOS)
    /// 2. XDG config dir (`~/.config/purgearr/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let candidates = [
            base_dirs.config_dir().join("purgearr").join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("purgearr")
                .join("config.toml"),
        ];

        candidates
            .iter()
            .filter(|path| path.exists())
            .find_map(|path| Self::load_from_file(path).ok())
            .unwrap_or_default()
    }

    /// Loads configuration for a CLI invocation.
    ///
    /// An explicit `path` wins, then `PURGEARR_CONFIG_PATH`, then the
    /// default location. Environment overrides are applied last.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file cannot be loaded.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var(CONFIG_PATH_ENV)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let mut config = match path.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::load_default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Applies `PURGEARR_*` overrides read through `lookup`.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for catalog in [&mut self.sonarr, &mut self.radarr] {
            let prefix = format!("PURGEARR_{}", catalog.kind.as_str().to_uppercase());
            if let Some(url) = lookup(&format!("{prefix}_URL")).filter(|v| !v.trim().is_empty()) {
                catalog.url = Some(url);
            }
            if let Some(key) = lookup(&format!("{prefix}_API_KEY")).filter(|v| !v.is_empty()) {
                catalog.api_key = Some(SecretString::from(key));
            }
            if let Some(enabled) = lookup(&format!("{prefix}_ENABLED")).and_then(|v| parse_bool(&v))
            {
                catalog.enabled = enabled;
            }
        }

        if let Some(days) = lookup(RETENTION_DAYS_ENV).and_then(|v| v.trim().parse::<u32>().ok()) {
            self.retention = self.retention.clone().with_retention_days(days);
        }
        if let Some(tag) = lookup(PROTECTION_TAG_ENV).filter(|v| !v.trim().is_empty()) {
            self.retention = self.retention.clone().with_protection_tag(tag);
        }
    }

    /// Returns the settings for one catalog.
    #[must_use]
    pub const fn catalog(&self, kind: CatalogKind) -> &CatalogConfig {
        match kind {
            CatalogKind::Sonarr => &self.sonarr,
            CatalogKind::Radarr => &self.radarr,
        }
    }

    /// Catalog configs in processing order.
    pub fn catalogs(&self) -> impl Iterator<Item = &CatalogConfig> {
        CatalogKind::all().iter().map(|kind| self.catalog(*kind))
    }

    /// Converts a `ConfigFile` to `PurgearrConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(section) = file.sonarr {
            apply_catalog_section(&mut config.sonarr, section);
        }
        if let Some(section) = file.radarr {
            apply_catalog_section(&mut config.radarr, section);
        }
        if let Some(retention) = file.retention {
            if let Some(days) = retention.days {
                config.retention = config.retention.with_retention_days(days);
            }
            if let Some(tag) = retention.protection_tag {
                config.retention = config.retention.with_protection_tag(tag);
            }
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        config
    }
}

fn apply_catalog_section(config: &mut CatalogConfig, section: ConfigFileCatalog) {
    if let Some(enabled) = section.enabled {
        config.enabled = enabled;
    }
    config.url = section.url.filter(|url| !url.trim().is_empty());
    config.api_key = section.api_key.map(SecretString::from);
    config.timeout_secs = section.timeout_secs;
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
