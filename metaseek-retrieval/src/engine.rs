//! SearchEngine: classify → dispatch → fuse, end to end.
//!
//! A hybrid plan runs its two sub-searches on the rayon pool and joins
//! before fusion; neither engine observes the other's state. The store
//! is read-only for the whole call, and the embedding cache is the only
//! shared mutable structure.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use metaseek_core::cancel::CancelToken;
use metaseek_core::config::SearchConfig;
use metaseek_core::errors::{RetrievalError, SeekResult};
use metaseek_core::mapping::{FieldMapping, FieldRole};
use metaseek_core::outcome::{ScoredMatch, SearchOutcome};
use metaseek_core::plan::{QueryPlan, Strategy};
use metaseek_core::record::RecordId;
use metaseek_core::traits::{IEmbeddingProvider, IRecordStore};

use metaseek_query::{classify, ClassifyOptions, ExtractionContext};

use crate::cache::QueryEmbeddingCache;
use crate::fusion::combine;
use crate::structured::StructuredSearch;
use crate::vector::{VectorHit, VectorSearch};

/// Per-call options supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Result cap; falls back to the plan's implicit cap, then the
    /// configured default.
    pub limit: Option<usize>,
    /// Fusion weight override for hybrid plans.
    pub vector_weight: Option<f64>,
    /// Cooperative cancellation handle.
    pub cancel: CancelToken,
}

/// The hybrid search coordinator.
///
/// Holds borrowed collaborators (store, optional embedding provider)
/// and owns the bounded query-embedding cache. One engine serves many
/// concurrent searches; nothing here is per-query state.
pub struct SearchEngine<'a> {
    store: &'a dyn IRecordStore,
    provider: Option<&'a dyn IEmbeddingProvider>,
    mapping: FieldMapping,
    config: SearchConfig,
    cache: QueryEmbeddingCache,
    /// Injected clock so temporal windows are deterministic in tests.
    clock: fn() -> DateTime<Utc>,
}

impl<'a> SearchEngine<'a> {
    pub fn new(store: &'a dyn IRecordStore, mapping: FieldMapping, config: SearchConfig) -> Self {
        let cache = QueryEmbeddingCache::new(config.embedding_cache_capacity);
        Self {
            store,
            provider: None,
            mapping,
            config,
            cache,
            clock: Utc::now,
        }
    }

    /// Attach an embedding provider, enabling semantic retrieval.
    pub fn with_embedding_provider(mut self, provider: &'a dyn IEmbeddingProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// The query-embedding cache, exposed so tests can reset it and
    /// assert hit/miss purity.
    pub fn cache(&self) -> &QueryEmbeddingCache {
        &self.cache
    }

    /// Run one query end to end.
    pub fn search(&self, query: &str, opts: &SearchOptions) -> SeekResult<SearchOutcome> {
        if opts.cancel.is_cancelled() {
            return Err(RetrievalError::Cancelled.into());
        }

        let plan = self.plan(query, opts)?;
        info!(
            strategy = ?plan.strategy,
            predicates = plan.predicates.len(),
            counting = plan.is_counting,
            "query planned"
        );

        let limit = opts
            .limit
            .or(plan.limit)
            .unwrap_or(self.config.default_limit);

        let structured = StructuredSearch::new(
            self.store,
            &self.config.scoring,
            self.high_signal_fields(),
        );

        if let Some(id) = &plan.id_lookup {
            return self.lookup_by_id(id);
        }

        if plan.is_counting {
            let count = structured.count(&plan.predicates, &plan.free_text)?;
            debug!(count, "counting query");
            return Ok(SearchOutcome::count(plan.strategy, count));
        }

        let outcome = match plan.strategy {
            Strategy::Structured => {
                let hits = structured.search(
                    &plan.predicates,
                    &plan.free_text,
                    plan.order_by.as_ref(),
                    limit,
                )?;
                // Normalize in place; fusion would re-sort and lose the
                // plan's order-by ordering.
                let max = hits.iter().map(|h| h.score).fold(0.0f64, f64::max);
                let matches: Vec<ScoredMatch> = hits
                    .into_iter()
                    .map(|h| {
                        let normalized = if max > 0.0 { h.score / max } else { 0.0 };
                        ScoredMatch {
                            record_id: h.record_id,
                            structured_score: h.score,
                            vector_score: 0.0,
                            combined_score: normalized,
                        }
                    })
                    .collect();
                SearchOutcome::records(Strategy::Structured, matches)
            }

            Strategy::Semantic => {
                let hits = self.vector_hits(&plan.free_text, limit, &opts.cancel)?;
                let matches = combine(&[], &hits, 1.0, limit);
                SearchOutcome::records(Strategy::Semantic, matches)
            }

            Strategy::Hybrid => {
                let fetch = limit.saturating_mul(self.config.candidate_multiplier.max(1));
                let (structured_result, vector_result) = rayon::join(
                    || {
                        structured.search(
                            &plan.predicates,
                            &plan.free_text,
                            plan.order_by.as_ref(),
                            fetch,
                        )
                    },
                    || self.vector_hits(&plan.free_text, fetch, &opts.cancel),
                );

                let structured_hits = structured_result?;
                match vector_result {
                    Ok(vector_hits) => {
                        let matches =
                            combine(&structured_hits, &vector_hits, plan.vector_weight, limit);
                        SearchOutcome::records(Strategy::Hybrid, matches)
                    }
                    Err(e) if e.is_cancelled() => return Err(e),
                    Err(e) => {
                        warn!(error = %e, "vector side failed, degrading to structured-only");
                        let matches = combine(&structured_hits, &[], 0.0, limit);
                        SearchOutcome::records(Strategy::Hybrid, matches).degraded()
                    }
                }
            }
        };

        if opts.cancel.is_cancelled() {
            return Err(RetrievalError::Cancelled.into());
        }
        info!(results = outcome.matches().len(), "search complete");
        Ok(outcome)
    }

    /// Build the plan for a query. Classification itself never fails;
    /// only store access (field enumeration, status vocabulary) can.
    fn plan(&self, query: &str, opts: &SearchOptions) -> SeekResult<QueryPlan> {
        let known_fields = self.store.all_fields();
        let status_values = match self.mapping.resolve(FieldRole::Status) {
            Some(field) => self.store.distinct_values(field)?,
            None => Vec::new(),
        };
        let ctx = ExtractionContext {
            mapping: &self.mapping,
            known_fields: &known_fields,
            status_values: &status_values,
            now: (self.clock)(),
        };
        let classify_opts = ClassifyOptions {
            hybrid_vector_weight: opts.vector_weight.unwrap_or(self.config.vector_weight),
            latest_top_k: self.config.latest_top_k,
        };
        Ok(classify(query, &ctx, &classify_opts))
    }

    /// Direct identifier lookup: at most one record, scoring bypassed.
    fn lookup_by_id(&self, id: &RecordId) -> SeekResult<SearchOutcome> {
        let matches = match self.store.get(id)? {
            Some(record) => vec![ScoredMatch {
                record_id: record.id,
                structured_score: self.config.scoring.id_lookup,
                vector_score: 0.0,
                combined_score: 1.0,
            }],
            None => Vec::new(),
        };
        Ok(SearchOutcome::records(Strategy::Structured, matches))
    }

    fn vector_hits(
        &self,
        free_text: &str,
        limit: usize,
        cancel: &CancelToken,
    ) -> SeekResult<Vec<VectorHit>> {
        let Some(provider) = self.provider else {
            return Err(RetrievalError::EmbeddingUnavailable {
                provider: "none".to_string(),
                reason: "no embedding provider configured".to_string(),
            }
            .into());
        };
        VectorSearch::new(self.store, provider, &self.cache).search(free_text, limit, cancel)
    }

    /// Mapped id/name fields earn the high-signal scoring bonus.
    fn high_signal_fields(&self) -> Vec<String> {
        [FieldRole::Id, FieldRole::Name]
            .into_iter()
            .filter_map(|role| self.mapping.resolve(role).map(str::to_string))
            .collect()
    }
}
