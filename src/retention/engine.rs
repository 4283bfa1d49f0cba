//! Retention engine.
//!
//! Runs the per-catalog state machine:
//!
//! ```text
//! FetchTags ──err──► CatalogFailed
//!     │
//! FetchItems ──err──► CatalogFailed
//!     │
//! IterateItems ─ protected ─► Protected (files never fetched)
//!     │
//! FetchFiles ──err──► item FetchFailed, next item
//!     │
//! IterateFiles ─ bad date ─► DateError, next file
//!     │        ─ too new  ─► kept silently
//!     │        ─ eligible ─► DeletionExecutor
//!     ▼
//! CatalogDone
//! ```
//!
//! Catalogs are processed one after the other and share nothing but the
//! cutoff instant, which is sampled once per run.

use super::eligibility::evaluate_file;
use super::executor::{DeletionExecutor, FileStore};
use super::report::{CatalogReport, FileRecord, ItemDisposition, ItemReport, RetentionReport};
use super::tags::{TagMap, is_protected, resolve_tags};
use super::RetentionPolicy;
use crate::catalog::Catalog;
use crate::models::{MediaFile, MediaItem};
use chrono::{NaiveDateTime, Utc};
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span, instrument, warn};

/// Safely converts Duration to milliseconds as u64, capping at `u64::MAX`.
#[inline]
fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Converts u64 to f64 for metrics, capping at `u32::MAX`.
#[inline]
fn u64_to_f64(value: u64) -> f64 {
    let capped = u32::try_from(value).unwrap_or(u32::MAX);
    f64::from(capped)
}

/// Applies a [`RetentionPolicy`] to catalogs.
///
/// Configuration is fixed at construction; the engine itself holds no
/// per-run state, so one instance can run repeatedly.
#[derive(Debug)]
pub struct RetentionEngine<S: FileStore> {
    policy: RetentionPolicy,
    executor: DeletionExecutor<S>,
    dry_run: bool,
}

impl<S: FileStore> RetentionEngine<S> {
    /// Creates an engine.
    ///
    /// # Arguments
    ///
    /// * `policy` - Cutoff age and protection tag.
    /// * `store` - File store eligible files are removed from.
    /// * `dry_run` - If true, report deletions without performing them.
    #[must_use]
    pub const fn new(policy: RetentionPolicy, store: S, dry_run: bool) -> Self {
        Self {
            policy,
            executor: DeletionExecutor::new(store),
            dry_run,
        }
    }

    /// Runs every catalog against a cutoff derived from the current UTC time.
    pub fn run(&self, catalogs: &[&dyn Catalog]) -> RetentionReport {
        self.run_at(catalogs, Utc::now().naive_utc())
    }

    /// Runs every catalog against a cutoff derived from `now`.
    ///
    /// Catalogs are processed in slice order and never interleaved.
    #[instrument(
        name = "purgearr.retention.run",
        skip(self, catalogs),
        fields(
            dry_run = self.dry_run,
            protection_tag = %self.policy.protection_tag(),
            catalogs = catalogs.len()
        )
    )]
    pub fn run_at(&self, catalogs: &[&dyn Catalog], now: NaiveDateTime) -> RetentionReport {
        let start = Instant::now();
        let cutoff = self.policy.cutoff_instant(now);
        debug!(%cutoff, "Computed retention cutoff");

        let reports: Vec<CatalogReport> = catalogs
            .iter()
            .map(|catalog| self.process_catalog(*catalog, cutoff))
            .collect();

        let report = RetentionReport {
            dry_run: self.dry_run,
            cutoff,
            catalogs: reports,
            duration_ms: duration_to_millis(start.elapsed()),
        };

        metrics::counter!(
            "retention_runs_total",
            "dry_run" => self.dry_run.to_string()
        )
        .increment(1);
        metrics::histogram!("retention_duration_ms").record(u64_to_f64(report.duration_ms));

        info!(
            files_deleted = report.files_deleted(),
            duration_ms = report.duration_ms,
            dry_run = self.dry_run,
            "Retention run completed"
        );

        report
    }

    /// Processes one catalog.
    ///
    /// Failing to list tags or items ends this catalog's pass; nothing
    /// below that level can.
    pub fn process_catalog(&self, catalog: &dyn Catalog, cutoff: NaiveDateTime) -> CatalogReport {
        let kind = catalog.kind();
        let _span = info_span!("purgearr.retention.catalog", catalog = kind.as_str()).entered();
        info!("Checking {kind} for old files");

        let tags = match resolve_tags(catalog) {
            Ok(tags) => tags,
            Err(e) => {
                warn!(error = %e, "Error with {kind}: could not list tags");
                return CatalogReport::failed(kind, self.dry_run, e.to_string());
            },
        };

        let items = match catalog.list_items() {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "Error with {kind}: could not list items");
                return CatalogReport::failed(kind, self.dry_run, e.to_string());
            },
        };

        let mut report = CatalogReport::new(kind, self.dry_run);
        report.items = items
            .iter()
            .map(|item| self.process_item(catalog, item, &tags, cutoff))
            .collect();

        if !self.dry_run {
            metrics::counter!("retention_files_deleted_total", "catalog" => kind.as_str())
                .increment(u64::try_from(report.files_deleted()).unwrap_or(u64::MAX));
        }

        info!(
            items_checked = report.items_checked(),
            items_protected = report.items_protected(),
            files_checked = report.files_checked(),
            files_deleted = report.files_deleted(),
            files_failed = report.files_failed(),
            "Catalog pass completed"
        );

        report
    }

    fn process_item(
        &self,
        catalog: &dyn Catalog,
        item: &MediaItem,
        tags: &TagMap,
        cutoff: NaiveDateTime,
    ) -> ItemReport {
        let disposition = if is_protected(&item.tags, tags, &self.policy) {
            info!(
                item_id = item.id,
                "Skipping {} (tagged as '{}')",
                item.title,
                self.policy.protection_tag()
            );
            ItemDisposition::Protected
        } else {
            match catalog.list_files(item.id) {
                Ok(files) => ItemDisposition::Inspected {
                    files_checked: files.len(),
                    files: files
                        .iter()
                        .filter_map(|file| self.process_file(file, cutoff))
                        .collect(),
                },
                Err(e) => {
                    warn!(item_id = item.id, title = %item.title, error = %e, "Could not list files");
                    ItemDisposition::FetchFailed {
                        detail: e.to_string(),
                    }
                },
            }
        };

        ItemReport {
            id: item.id,
            title: item.title.clone(),
            disposition,
        }
    }

    fn process_file(&self, file: &MediaFile, cutoff: NaiveDateTime) -> Option<FileRecord> {
        match evaluate_file(file, cutoff) {
            Ok(verdict) if verdict.eligible => Some(FileRecord::Processed {
                added_at: verdict.added_at,
                outcome: self.executor.execute(&file.path, self.dry_run),
            }),
            Ok(_) => None,
            Err(e) => {
                warn!(path = %file.path, error = %e, "Skipping file with unreadable timestamp");
                Some(FileRecord::DateError {
                    path: file.path.clone(),
                    detail: e.to_string(),
                })
            },
        }
    }
}
