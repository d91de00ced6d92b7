//! A provider that is never available.
//!
//! Stands in for an unreachable model endpoint when exercising the
//! degradation paths: hybrid plans fall back to structured results,
//! pure semantic plans surface the failure.

use metaseek_core::errors::{RetrievalError, SeekResult};
use metaseek_core::traits::IEmbeddingProvider;

/// Always-failing embedding provider.
#[derive(Debug, Default)]
pub struct UnavailableProvider {
    dimensions: usize,
}

impl UnavailableProvider {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl IEmbeddingProvider for UnavailableProvider {
    fn embed(&self, _text: &str) -> SeekResult<Vec<f32>> {
        Err(RetrievalError::EmbeddingUnavailable {
            provider: self.name().to_string(),
            reason: "provider is offline".to_string(),
        }
        .into())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "unavailable"
    }

    fn is_available(&self) -> bool {
        false
    }
}
