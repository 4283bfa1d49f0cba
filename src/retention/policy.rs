//! Retention policy.
//!
//! The policy is built by [`crate::config::PurgearrConfig`] from the
//! `[retention]` config section and the `PURGEARR_RETENTION_DAYS` /
//! `PURGEARR_PROTECTION_TAG` overrides.

use chrono::{NaiveDateTime, TimeDelta};

/// Environment variable for the retention period in days.
pub const RETENTION_DAYS_ENV: &str = "PURGEARR_RETENTION_DAYS";

/// Environment variable for the protection tag label.
pub const PROTECTION_TAG_ENV: &str = "PURGEARR_PROTECTION_TAG";

/// Default retention period in days.
pub const DEFAULT_RETENTION_DAYS: u32 = 90;

/// Default protection tag label.
pub const DEFAULT_PROTECTION_TAG: &str = "keeper";

/// Process-wide retention policy, fixed for the duration of a run.
///
/// The protection tag is stored lower-cased so it can be compared directly
/// against a [`super::TagMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionPolicy {
    cutoff_age: TimeDelta,
    protection_tag: String,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            cutoff_age: TimeDelta::days(i64::from(DEFAULT_RETENTION_DAYS)),
            protection_tag: DEFAULT_PROTECTION_TAG.to_string(),
        }
    }
}

impl RetentionPolicy {
    /// Creates a policy with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the retention period in whole days.
    #[must_use]
    pub fn with_retention_days(self, days: u32) -> Self {
        self.with_cutoff_age(TimeDelta::days(i64::from(days)))
    }

    /// Sets the retention period.
    #[must_use]
    pub const fn with_cutoff_age(mut self, age: TimeDelta) -> Self {
        self.cutoff_age = age;
        self
    }

    /// Sets the protection tag label.
    #[must_use]
    pub fn with_protection_tag(mut self, label: impl Into<String>) -> Self {
        self.protection_tag = label.into().trim().to_lowercase();
        self
    }

    /// How old a file must be before it may be deleted.
    #[must_use]
    pub const fn cutoff_age(&self) -> TimeDelta {
        self.cutoff_age
    }

    /// Normalized protection tag label.
    #[must_use]
    pub fn protection_tag(&self) -> &str {
        &self.protection_tag
    }

    /// Returns the cutoff instant for a run that started at `now`.
    ///
    /// Files added strictly before this instant are eligible.
    #[must_use]
    pub fn cutoff_instant(&self, now: NaiveDateTime) -> NaiveDateTime {
        now.checked_sub_signed(self.cutoff_age)
            .unwrap_or(NaiveDateTime::MIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("valid date")
    }

    #[test]
    fn test_policy_default() {
        let policy = RetentionPolicy::default();
        assert_eq!(policy.cutoff_age(), TimeDelta::days(90));
        assert_eq!(policy.protection_tag(), "keeper");
    }

    #[test]
    fn test_protection_tag_normalized() {
        let policy = RetentionPolicy::new().with_protection_tag("  KeepForever ");
        assert_eq!(policy.protection_tag(), "keepforever");
    }

    #[test]
    fn test_cutoff_instant() {
        let policy = RetentionPolicy::new().with_retention_days(30);
        let cutoff = policy.cutoff_instant(noon());
        assert_eq!(noon() - cutoff, TimeDelta::days(30));
    }

    #[test]
    fn test_cutoff_instant_saturates() {
        let policy = RetentionPolicy::new().with_cutoff_age(TimeDelta::MAX);
        assert_eq!(policy.cutoff_instant(noon()), NaiveDateTime::MIN);
    }
}
