//! Score fusion: one ranked list from two engines with incompatible
//! score ranges.
//!
//! Each list is normalized by its own maximum, missing scores count as
//! zero, and the combined score is the weighted sum. The weight edges
//! are exact: weight 0 reproduces the structured ranking, weight 1 the
//! vector ranking — membership included, which is why a record seen
//! only by a zero-weighted engine is excluded rather than carried at
//! score zero.

use std::collections::BTreeMap;

use metaseek_core::outcome::ScoredMatch;
use metaseek_core::record::RecordId;

use crate::structured::StructuredHit;
use crate::vector::VectorHit;

/// Fuse structured and vector results under `vector_weight` ∈ [0, 1].
///
/// Output is descending by combined score, ties broken by record id
/// ascending, truncated to `limit`.
pub fn combine(
    structured: &[StructuredHit],
    vector: &[VectorHit],
    vector_weight: f64,
    limit: usize,
) -> Vec<ScoredMatch> {
    let max_structured = structured.iter().map(|h| h.score).fold(0.0f64, f64::max);
    let max_vector = vector.iter().map(|h| h.similarity).fold(0.0f64, f64::max);

    // BTreeMap keeps the union in id order, which settles ties without
    // a second pass.
    let mut merged: BTreeMap<RecordId, (f64, f64)> = BTreeMap::new();

    let structured_counts = vector_weight < 1.0;
    let vector_counts = vector_weight > 0.0;

    if structured_counts {
        for hit in structured {
            merged.entry(hit.record_id.clone()).or_insert((0.0, 0.0)).0 = hit.score;
        }
    }
    if vector_counts {
        for hit in vector {
            merged.entry(hit.record_id.clone()).or_insert((0.0, 0.0)).1 = hit.similarity;
        }
    }

    // Component scores stay raw; only the combination is normalized.
    let mut matches: Vec<ScoredMatch> = merged
        .into_iter()
        .map(|(record_id, (s, v))| ScoredMatch {
            record_id,
            structured_score: s,
            vector_score: v,
            combined_score: (1.0 - vector_weight) * normalize(s, max_structured)
                + vector_weight * normalize(v, max_vector),
        })
        .collect();

    matches.sort_by(|a, b| {
        b.combined_score
            .partial_cmp(&a.combined_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.record_id.cmp(&b.record_id))
    });
    matches.truncate(limit);
    matches
}

/// Divide by the list maximum; a non-positive maximum flattens the
/// whole list to zero instead of dividing by it.
fn normalize(score: f64, max: f64) -> f64 {
    if max > 0.0 {
        score / max
    } else {
        0.0
    }
}
