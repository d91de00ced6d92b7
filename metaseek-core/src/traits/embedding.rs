use crate::errors::SeekResult;

/// Embedding generation provider.
pub trait IEmbeddingProvider: Send + Sync {
    /// Embed a single text, returning a vector of floats.
    fn embed(&self, text: &str) -> SeekResult<Vec<f32>>;

    /// The dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;

    /// Human-readable provider name, for logs and degradation reports.
    fn name(&self) -> &str;

    /// Whether this provider is currently reachable.
    fn is_available(&self) -> bool;
}
