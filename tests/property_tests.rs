//! Property-based tests for retention decisions.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Protection is independent of tag order and label case
//! - Eligibility is a strict comparison against the cutoff
//! - Both timestamp encodings of one instant parse equal

#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta};
use proptest::prelude::*;
use purgearr::models::{Tag, parse_added_at};
use purgearr::retention::{RetentionPolicy, TagMap, is_eligible, is_protected};

/// Instants between 2000 and 2040, whole milliseconds.
fn instant() -> impl Strategy<Value = NaiveDateTime> {
    (946_684_800_000_i64..2_208_988_800_000_i64).prop_map(|millis| {
        DateTime::from_timestamp_millis(millis)
            .expect("in range")
            .naive_utc()
    })
}

fn tag_map(labels: &[String]) -> TagMap {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| Tag::new(i64::try_from(i).unwrap(), label.clone()))
        .collect()
}

proptest! {
    /// Property: reordering an item's tag ids never changes protection.
    #[test]
    fn prop_protection_ignores_tag_order(
        labels in prop::collection::vec("[a-z]{1,8}", 1..8),
        picks in prop::collection::vec(0usize..8, 0..8),
    ) {
        let tags = tag_map(&labels);
        let policy = RetentionPolicy::default().with_protection_tag(labels[0].clone());
        let ids: Vec<i64> = picks
            .iter()
            .map(|p| i64::try_from(p % labels.len()).unwrap())
            .collect();
        let mut reversed = ids.clone();
        reversed.reverse();

        prop_assert_eq!(
            is_protected(&ids, &tags, &policy),
            is_protected(&reversed, &tags, &policy)
        );
        let expected = ids
            .iter()
            .any(|id| labels[usize::try_from(*id).unwrap()] == labels[0]);
        prop_assert_eq!(is_protected(&ids, &tags, &policy), expected);
    }

    /// Property: tag label case never changes protection.
    #[test]
    fn prop_protection_is_case_insensitive(label in "[a-zA-Z]{1,12}") {
        let tags: TagMap = std::iter::once(Tag::new(1, label.to_uppercase())).collect();
        let policy = RetentionPolicy::default().with_protection_tag(label.to_lowercase());

        prop_assert!(is_protected(&[1], &tags, &policy));
    }

    /// Property: unknown tag ids never protect.
    #[test]
    fn prop_unknown_ids_do_not_protect(ids in prop::collection::vec(100i64..1000, 0..10)) {
        let tags: TagMap = std::iter::once(Tag::new(1, "keeper")).collect();
        prop_assert!(!is_protected(&ids, &tags, &RetentionPolicy::default()));
    }

    /// Property: a file is eligible exactly when added before the cutoff.
    #[test]
    fn prop_eligibility_is_strict(cutoff in instant(), offset_ms in -10_000_000i64..10_000_000) {
        let added_at = cutoff + TimeDelta::milliseconds(offset_ms);
        prop_assert_eq!(is_eligible(added_at, cutoff), offset_ms < 0);
        prop_assert!(!is_eligible(cutoff, cutoff));
    }

    /// Property: the UTC and offset encodings of one instant parse equal.
    #[test]
    fn prop_timestamp_formats_agree(at in instant(), offset_hours in -12i32..=14) {
        let whole = at - TimeDelta::nanoseconds(i64::from(at.and_utc().timestamp_subsec_nanos()));
        let offset = FixedOffset::east_opt(offset_hours * 3600).expect("valid offset");

        let utc = whole.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
        let zoned = whole
            .and_utc()
            .with_timezone(&offset)
            .format("%Y-%m-%dT%H:%M:%S%:z")
            .to_string();

        prop_assert_eq!(parse_added_at(&utc).expect("utc"), whole);
        prop_assert_eq!(parse_added_at(&zoned).expect("zoned"), whole);
    }
}
