//! Property tests for score fusion and cosine similarity over
//! randomized inputs.

use proptest::prelude::*;

use metaseek_core::record::RecordId;
use metaseek_retrieval::{combine, cosine_similarity, StructuredHit, VectorHit};

fn rid(n: u32) -> RecordId {
    RecordId::new(format!("r-{n:03}"))
}

/// Deduplicated (id, score) pairs; BTreeMap keys guarantee uniqueness.
fn structured_strategy(max: usize) -> impl Strategy<Value = Vec<StructuredHit>> {
    prop::collection::btree_map(0u32..200, 0.0f64..100.0, 0..max).prop_map(|m| {
        m.into_iter()
            .map(|(n, score)| StructuredHit {
                record_id: rid(n),
                score,
            })
            .collect()
    })
}

fn vector_strategy(max: usize) -> impl Strategy<Value = Vec<VectorHit>> {
    prop::collection::btree_map(0u32..200, 0.0f64..1.0, 0..max).prop_map(|m| {
        m.into_iter()
            .map(|(n, similarity)| VectorHit {
                record_id: rid(n),
                similarity,
            })
            .collect()
    })
}

// =============================================================================
// Fusion: weight extremes reproduce the single-engine result
// =============================================================================
proptest! {
    #[test]
    fn zero_weight_matches_structured_alone(
        structured in structured_strategy(40),
        vector in vector_strategy(40),
    ) {
        let fused = combine(&structured, &vector, 0.0, 1000);

        let mut expected = structured.clone();
        expected.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.record_id.cmp(&b.record_id))
        });

        let got: Vec<&RecordId> = fused.iter().map(|m| &m.record_id).collect();
        let want: Vec<&RecordId> = expected.iter().map(|h| &h.record_id).collect();
        prop_assert_eq!(got, want);
        for m in &fused {
            prop_assert_eq!(m.vector_score, 0.0);
        }
    }

    #[test]
    fn full_weight_matches_vector_alone(
        structured in structured_strategy(40),
        vector in vector_strategy(40),
    ) {
        let fused = combine(&structured, &vector, 1.0, 1000);

        let mut expected = vector.clone();
        expected.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.record_id.cmp(&b.record_id))
        });

        let got: Vec<&RecordId> = fused.iter().map(|m| &m.record_id).collect();
        let want: Vec<&RecordId> = expected.iter().map(|h| &h.record_id).collect();
        prop_assert_eq!(got, want);
    }
}

// =============================================================================
// Fusion: ordering, bounds, limit, determinism
// =============================================================================
proptest! {
    #[test]
    fn fused_scores_are_bounded_and_sorted(
        structured in structured_strategy(40),
        vector in vector_strategy(40),
        weight in 0.0f64..=1.0,
    ) {
        let fused = combine(&structured, &vector, weight, 1000);
        for pair in fused.windows(2) {
            prop_assert!(pair[0].combined_score >= pair[1].combined_score);
            if pair[0].combined_score == pair[1].combined_score {
                prop_assert!(pair[0].record_id < pair[1].record_id);
            }
        }
        for m in &fused {
            prop_assert!((0.0..=1.0 + 1e-9).contains(&m.combined_score));
        }
    }

    #[test]
    fn limit_takes_a_prefix(
        structured in structured_strategy(40),
        vector in vector_strategy(40),
        weight in 0.0f64..=1.0,
        limit in 0usize..30,
    ) {
        let full = combine(&structured, &vector, weight, 1000);
        let capped = combine(&structured, &vector, weight, limit);
        prop_assert!(capped.len() <= limit);
        prop_assert_eq!(&capped[..], &full[..capped.len()]);
    }

    #[test]
    fn fusion_is_deterministic(
        structured in structured_strategy(30),
        vector in vector_strategy(30),
        weight in 0.0f64..=1.0,
    ) {
        let a = combine(&structured, &vector, weight, 1000);
        let b = combine(&structured, &vector, weight, 1000);
        prop_assert_eq!(a, b);
    }
}

// =============================================================================
// Cosine similarity: symmetry and bounds
// =============================================================================
proptest! {
    #[test]
    fn cosine_is_symmetric_and_bounded(
        pair in (1usize..16).prop_flat_map(|len| {
            (
                prop::collection::vec(-10.0f32..10.0, len),
                prop::collection::vec(-10.0f32..10.0, len),
            )
        })
    ) {
        let (a, b) = pair;
        let ab = cosine_similarity(&a, &b);
        prop_assert_eq!(ab, cosine_similarity(&b, &a));
        prop_assert!(ab.abs() <= 1.0 + 1e-9);
    }
}
