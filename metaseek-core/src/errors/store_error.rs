/// Record store errors.
///
/// An unknown field inside a predicate is not represented here — stores
/// treat it as a non-match and filtering degrades to an empty result.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store backend error: {message}")]
    Backend { message: String },

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
