//! Hashed term-frequency embeddings.
//!
//! Terms are hashed into fixed-dimension buckets and weighted by their
//! in-text frequency, then L2-normalized. Far less expressive than a
//! neural model, but deterministic, dependency-free, and usable in
//! air-gapped environments — overlapping vocabulary still yields
//! higher cosine similarity than disjoint vocabulary.

use std::collections::HashMap;

use tracing::trace;

use metaseek_core::errors::SeekResult;
use metaseek_core::traits::IEmbeddingProvider;

const DEFAULT_DIMENSIONS: usize = 256;

/// Deterministic bag-of-terms embedding provider.
pub struct HashedTermProvider {
    dimensions: usize,
}

impl Default for HashedTermProvider {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

impl HashedTermProvider {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// FNV-1a bucket assignment for a term.
    fn bucket(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in term.as_bytes() {
            h ^= u64::from(*byte);
            h = h.wrapping_mul(0x0100_0000_01b3);
        }
        (h % dims as u64) as usize
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        let lowered: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|t| t.len() > 1)
            .map(str::to_lowercase)
            .collect();

        if lowered.is_empty() {
            return vec![0.0; self.dimensions];
        }

        let mut counts: HashMap<&str, f32> = HashMap::new();
        for term in &lowered {
            *counts.entry(term.as_str()).or_default() += 1.0;
        }

        let mut out = vec![0.0f32; self.dimensions];
        let total = lowered.len() as f32;
        for (term, count) in counts {
            // Longer terms carry more signal than near-stopwords.
            let weight = (count / total) * (1.0 + (term.len() as f32).ln());
            out[Self::bucket(term, self.dimensions)] += weight;
        }

        let norm = out.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for x in &mut out {
                *x /= norm;
            }
        }
        out
    }
}

impl IEmbeddingProvider for HashedTermProvider {
    fn embed(&self, text: &str) -> SeekResult<Vec<f32>> {
        trace!(chars = text.len(), dims = self.dimensions, "hashed embed");
        Ok(self.vector(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashed-term"
    }

    fn is_available(&self) -> bool {
        true
    }
}
