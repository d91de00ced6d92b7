//! Vector search: query embedding plus brute-force cosine scan.
//!
//! Exact comparison against every embedded record is the correctness
//! contract; an approximate index would be a drop-in performance
//! optimization and must return the same top-K. The scan runs on the
//! rayon pool and polls the cancellation token between records.

use rayon::prelude::*;
use tracing::debug;

use metaseek_core::cancel::CancelToken;
use metaseek_core::errors::{RetrievalError, SeekResult};
use metaseek_core::record::RecordId;
use metaseek_core::traits::{IEmbeddingProvider, IRecordStore};

use crate::cache::QueryEmbeddingCache;

/// One nearest-neighbor hit.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorHit {
    pub record_id: RecordId,
    /// Cosine similarity in [-1, 1].
    pub similarity: f64,
}

/// Cosine similarity with a zero-norm guard: any zero vector (or a
/// dimension mismatch) yields 0 rather than dividing by zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        dot += f64::from(*x) * f64::from(*y);
        norm_a += f64::from(*x) * f64::from(*x);
        norm_b += f64::from(*y) * f64::from(*y);
    }
    if norm_a <= 0.0 || norm_b <= 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// The semantic retrieval engine.
pub struct VectorSearch<'a> {
    store: &'a dyn IRecordStore,
    provider: &'a dyn IEmbeddingProvider,
    cache: &'a QueryEmbeddingCache,
}

impl<'a> VectorSearch<'a> {
    pub fn new(
        store: &'a dyn IRecordStore,
        provider: &'a dyn IEmbeddingProvider,
        cache: &'a QueryEmbeddingCache,
    ) -> Self {
        Self {
            store,
            provider,
            cache,
        }
    }

    /// Top `limit` embedded records by similarity to `query_text`,
    /// descending, ties broken by record id ascending.
    pub fn search(
        &self,
        query_text: &str,
        limit: usize,
        cancel: &CancelToken,
    ) -> SeekResult<Vec<VectorHit>> {
        let query_embedding = self.query_embedding(query_text, cancel)?;

        let ids = self.store.embedded_ids()?;
        debug!(candidates = ids.len(), "vector scan");

        let mut hits: Vec<VectorHit> = ids
            .into_par_iter()
            .map(|id| -> SeekResult<Option<VectorHit>> {
                if cancel.is_cancelled() {
                    return Ok(None);
                }
                let Some(embedding) = self.store.embedding(&id)? else {
                    return Ok(None);
                };
                let similarity = cosine_similarity(&query_embedding, &embedding);
                Ok(Some(VectorHit {
                    record_id: id,
                    similarity,
                }))
            })
            .collect::<SeekResult<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect();

        if cancel.is_cancelled() {
            return Err(RetrievalError::Cancelled.into());
        }

        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.record_id.cmp(&b.record_id))
        });
        hits.truncate(limit);
        Ok(hits)
    }

    /// Cached or freshly computed query embedding.
    ///
    /// The cache is written only after a complete, uncancelled embed,
    /// so abandonment can never leave a torn entry behind.
    fn query_embedding(&self, query_text: &str, cancel: &CancelToken) -> SeekResult<Vec<f32>> {
        if let Some(hit) = self.cache.get(query_text) {
            return Ok(hit.as_ref().clone());
        }
        if !self.provider.is_available() {
            return Err(RetrievalError::EmbeddingUnavailable {
                provider: self.provider.name().to_string(),
                reason: "provider reports unavailable".to_string(),
            }
            .into());
        }
        let embedding = self.provider.embed(query_text)?;
        if cancel.is_cancelled() {
            return Err(RetrievalError::Cancelled.into());
        }
        self.cache.insert(query_text, embedding.clone());
        Ok(embedding)
    }
}
