/// Retrieval subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("embedding provider '{provider}' unavailable: {reason}")]
    EmbeddingUnavailable { provider: String, reason: String },

    #[error("search cancelled by caller")]
    Cancelled,

    #[error("search failed: {reason}")]
    SearchFailed { reason: String },
}
