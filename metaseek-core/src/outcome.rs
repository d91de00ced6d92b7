//! Search results: per-record scores and the caller-facing outcome.

use serde::{Deserialize, Serialize};

use crate::plan::Strategy;
use crate::record::RecordId;

/// One ranked record with the scores that produced its position.
///
/// `structured_score` is ≥ 0, `vector_score` is cosine similarity in
/// [-1, 1], `combined_score` is the weighted fusion of the two after
/// normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    pub record_id: RecordId,
    pub structured_score: f64,
    pub vector_score: f64,
    pub combined_score: f64,
}

impl ScoredMatch {
    pub fn structured(record_id: RecordId, score: f64) -> Self {
        Self {
            record_id,
            structured_score: score,
            vector_score: 0.0,
            combined_score: score,
        }
    }
}

/// Payload of a completed search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// Ranked records, descending by combined score, ties broken by
    /// record id ascending.
    Records(Vec<ScoredMatch>),
    /// Scalar answer to a counting query.
    Count(u64),
}

/// What the caller receives: the payload plus enough context to explain
/// how it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Which strategy the classifier selected.
    pub strategy: Strategy,
    /// True when a hybrid query lost its vector side and fell back to
    /// structured-only results.
    pub degraded: bool,
    pub kind: OutcomeKind,
}

impl SearchOutcome {
    pub fn records(strategy: Strategy, matches: Vec<ScoredMatch>) -> Self {
        Self {
            strategy,
            degraded: false,
            kind: OutcomeKind::Records(matches),
        }
    }

    pub fn count(strategy: Strategy, count: u64) -> Self {
        Self {
            strategy,
            degraded: false,
            kind: OutcomeKind::Count(count),
        }
    }

    pub fn degraded(mut self) -> Self {
        self.degraded = true;
        self
    }

    /// The ranked matches, or an empty slice for counting outcomes.
    pub fn matches(&self) -> &[ScoredMatch] {
        match &self.kind {
            OutcomeKind::Records(m) => m,
            OutcomeKind::Count(_) => &[],
        }
    }
}
