//! Bounded query-embedding cache.
//!
//! Keys are blake3 hashes of the exact query text. A hit or miss must
//! never change what a search returns, only how fast it returns —
//! entries are only ever inserted complete, and eviction is invisible
//! to correctness.

use std::sync::Arc;

use moka::sync::Cache;

/// In-memory embedding cache with capacity-bounded eviction.
pub struct QueryEmbeddingCache {
    cache: Cache<String, Arc<Vec<f32>>>,
}

impl QueryEmbeddingCache {
    /// Create a cache holding at most `capacity` query embeddings.
    pub fn new(capacity: u64) -> Self {
        Self {
            cache: Cache::builder().max_capacity(capacity).build(),
        }
    }

    fn key(query_text: &str) -> String {
        blake3::hash(query_text.as_bytes()).to_hex().to_string()
    }

    /// Look up the embedding for an exact query text.
    pub fn get(&self, query_text: &str) -> Option<Arc<Vec<f32>>> {
        self.cache.get(&Self::key(query_text))
    }

    /// Store a fully computed embedding.
    pub fn insert(&self, query_text: &str, embedding: Vec<f32>) {
        self.cache.insert(Self::key(query_text), Arc::new(embedding));
    }

    /// Number of cached entries. Call [`Self::run_pending_tasks`] first
    /// when an exact count matters.
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Flush the cache's internal maintenance queue so `len` is exact.
    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry. Tests use this to prove hit/miss purity.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}
