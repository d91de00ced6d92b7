//! Property tests: classification totality, temporal window extraction,
//! and extraction determinism over randomized queries.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use metaseek_core::mapping::{FieldMapping, FieldRole};
use metaseek_core::plan::{Operator, Strategy};
use metaseek_core::record::{FieldDescriptor, FieldType, FieldValue};
use metaseek_query::{classify, extract, ClassifyOptions, ExtractionContext};

fn fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("id", FieldType::Text),
        FieldDescriptor::new("name", FieldType::Text),
        FieldDescriptor::new("status", FieldType::Text),
        FieldDescriptor::new("priority", FieldType::Number),
        FieldDescriptor::new("started", FieldType::Timestamp),
    ]
}

fn mapping() -> FieldMapping {
    FieldMapping::new()
        .map(FieldRole::Id, "id")
        .map(FieldRole::Name, "name")
        .map(FieldRole::Status, "status")
        .map(FieldRole::Timestamp, "started")
}

fn status_values() -> Vec<String> {
    vec![
        "completed".to_string(),
        "failed".to_string(),
        "running".to_string(),
    ]
}

// =============================================================================
// Classification is total and well-formed for any input
// =============================================================================
proptest! {
    #[test]
    fn every_query_gets_a_plan(query in ".{0,60}") {
        let m = mapping();
        let f = fields();
        let status = status_values();
        let ctx = ExtractionContext {
            mapping: &m,
            known_fields: &f,
            status_values: &status,
            now: Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
        };

        let plan = classify(&query, &ctx, &ClassifyOptions::default());
        prop_assert!((0.0..=1.0).contains(&plan.vector_weight));
        if plan.strategy == Strategy::Semantic {
            prop_assert!(plan.predicates.is_empty());
            prop_assert!(!plan.free_text.is_empty() || query.trim().is_empty() || query.is_empty());
        }
    }

    #[test]
    fn extraction_is_deterministic(query in ".{0,60}") {
        let m = mapping();
        let f = fields();
        let status = status_values();
        let ctx = ExtractionContext {
            mapping: &m,
            known_fields: &f,
            status_values: &status,
            now: Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
        };

        prop_assert_eq!(extract(&query, &ctx), extract(&query, &ctx));
    }
}

// =============================================================================
// Relative temporal windows extract to the exact cutoff
// =============================================================================
proptest! {
    #[test]
    fn last_n_days_yields_the_exact_cutoff(n in 1u32..365) {
        let m = mapping();
        let f = fields();
        let status = status_values();
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let ctx = ExtractionContext {
            mapping: &m,
            known_fields: &f,
            status_values: &status,
            now,
        };

        let extraction = extract(&format!("last {n} days"), &ctx);
        prop_assert!(extraction.remainder.is_empty());
        prop_assert_eq!(extraction.predicates.len(), 1);

        let p = &extraction.predicates[0];
        prop_assert_eq!(p.field.as_str(), "started");
        prop_assert_eq!(p.operator, Operator::GreaterOrEqual);
        prop_assert_eq!(
            &p.value,
            &FieldValue::Timestamp(now - Duration::days(i64::from(n)))
        );
    }
}
