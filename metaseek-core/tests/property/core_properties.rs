//! Property tests for predicate evaluation and record identity.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use metaseek_core::plan::{Operator, Predicate};
use metaseek_core::record::{FieldValue, RecordId};

// =============================================================================
// Predicate evaluation
// =============================================================================
proptest! {
    #[test]
    fn equals_ignores_text_case(value in "[a-zA-Z][a-zA-Z0-9_-]{0,15}") {
        let p = Predicate::equals("status", value.as_str());
        prop_assert!(p.matches(&FieldValue::Text(value.to_uppercase())));
        prop_assert!(p.matches(&FieldValue::Text(value.to_lowercase())));
    }

    #[test]
    fn ordered_operators_agree_with_number_ordering(
        actual in -1e6f64..1e6,
        bound in -1e6f64..1e6,
    ) {
        let gt = Predicate::new("x", Operator::GreaterThan, bound);
        let ge = Predicate::new("x", Operator::GreaterOrEqual, bound);
        let lt = Predicate::new("x", Operator::LessThan, bound);
        let le = Predicate::new("x", Operator::LessOrEqual, bound);

        let v = FieldValue::Number(actual);
        prop_assert_eq!(gt.matches(&v), actual > bound);
        prop_assert_eq!(ge.matches(&v), actual >= bound);
        prop_assert_eq!(lt.matches(&v), actual < bound);
        prop_assert_eq!(le.matches(&v), actual <= bound);
        // Exactly one of > and <= holds.
        prop_assert_ne!(gt.matches(&v), le.matches(&v));
    }

    #[test]
    fn in_range_means_both_inclusive_bounds(
        actual in -1000i64..1000,
        lo in -1000i64..1000,
        hi in -1000i64..1000,
    ) {
        let p = Predicate::in_range("x", lo as f64, hi as f64);
        let inside = actual >= lo && actual <= hi;
        prop_assert_eq!(p.matches(&FieldValue::Number(actual as f64)), inside);
    }

    #[test]
    fn timestamp_window_is_inclusive_at_the_cutoff(offset_days in -400i64..400) {
        let cutoff = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let p = Predicate::new("started", Operator::GreaterOrEqual, cutoff);
        let ts = cutoff + Duration::days(offset_days);
        prop_assert_eq!(p.matches(&FieldValue::Timestamp(ts)), offset_days >= 0);
    }

    #[test]
    fn non_coercible_text_never_satisfies_ordered_operators(
        word in "[a-zA-Z]{1,12}",
        bound in -1e3f64..1e3,
    ) {
        prop_assume!(word.parse::<f64>().is_err());
        let p = Predicate::new("x", Operator::GreaterThan, bound);
        prop_assert!(!p.matches(&FieldValue::Text(word)));
    }
}

// =============================================================================
// Record identity
// =============================================================================
proptest! {
    #[test]
    fn record_id_ordering_is_lexicographic(a in "[a-z0-9-]{1,20}", b in "[a-z0-9-]{1,20}") {
        let (ra, rb) = (RecordId::new(a.clone()), RecordId::new(b.clone()));
        prop_assert_eq!(ra.cmp(&rb), a.cmp(&b));
    }
}
