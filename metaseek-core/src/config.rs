//! Search configuration.
//!
//! Score constants are tunable defaults, not physical constants; every
//! one of them can be overridden via TOML.

use serde::{Deserialize, Serialize};

use crate::errors::{SeekError, SeekResult};

/// Named defaults, kept in one place so config and docs agree.
pub mod defaults {
    /// Fusion weight for hybrid plans.
    pub const VECTOR_WEIGHT: f64 = 0.4;
    /// Result cap when the caller does not pass one.
    pub const DEFAULT_LIMIT: usize = 10;
    /// Implicit top-K for "latest"-style queries with no explicit limit.
    pub const LATEST_TOP_K: usize = 10;
    /// Max entries in the query-embedding cache.
    pub const EMBEDDING_CACHE_CAPACITY: u64 = 1024;
    /// Each engine is asked for this multiple of the final limit so
    /// fusion has enough overlap to work with.
    pub const CANDIDATE_MULTIPLIER: usize = 2;

    pub const PREDICATE_BASE: f64 = 10.0;
    pub const HIGH_SIGNAL_BONUS: f64 = 2.0;
    pub const PREDICATE_BONUS: f64 = 1.0;
    pub const EXACT_FIELD: f64 = 10.0;
    pub const SUBSTRING: f64 = 5.0;
    pub const WORD_MATCH: f64 = 1.0;
    pub const ID_LOOKUP: f64 = 100.0;
}

/// Structured-score constants.
///
/// The predicate path scores `base + high_signal_bonus × (predicates on
/// id/name/title fields) + bonus × (remaining predicates)`. The
/// free-text fallback scores `exact_field` for a full-field match,
/// `substring` for containment, `word_match` per matched word.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub predicate_base: f64,
    pub high_signal_bonus: f64,
    pub predicate_bonus: f64,
    pub exact_field: f64,
    pub substring: f64,
    pub word_match: f64,
    pub id_lookup: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            predicate_base: defaults::PREDICATE_BASE,
            high_signal_bonus: defaults::HIGH_SIGNAL_BONUS,
            predicate_bonus: defaults::PREDICATE_BONUS,
            exact_field: defaults::EXACT_FIELD,
            substring: defaults::SUBSTRING,
            word_match: defaults::WORD_MATCH,
            id_lookup: defaults::ID_LOOKUP,
        }
    }
}

/// Top-level configuration for the search engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Fusion weight for hybrid plans, in [0, 1].
    pub vector_weight: f64,
    pub default_limit: usize,
    pub latest_top_k: usize,
    pub embedding_cache_capacity: u64,
    pub candidate_multiplier: usize,
    pub scoring: ScoringConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            vector_weight: defaults::VECTOR_WEIGHT,
            default_limit: defaults::DEFAULT_LIMIT,
            latest_top_k: defaults::LATEST_TOP_K,
            embedding_cache_capacity: defaults::EMBEDDING_CACHE_CAPACITY,
            candidate_multiplier: defaults::CANDIDATE_MULTIPLIER,
            scoring: ScoringConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Parse a TOML override document. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> SeekResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| SeekError::Config {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> SeekResult<()> {
        if !(0.0..=1.0).contains(&self.vector_weight) {
            return Err(SeekError::Config {
                reason: format!("vector_weight must be in [0, 1], got {}", self.vector_weight),
            });
        }
        if self.default_limit == 0 {
            return Err(SeekError::Config {
                reason: "default_limit must be positive".into(),
            });
        }
        Ok(())
    }
}
