//! Error taxonomy.
//!
//! Almost everything degrades locally instead of erroring: malformed
//! predicates demote to free text, absent fields yield empty results.
//! The only conditions that reach the caller are an unavailable
//! embedding provider on a pure semantic plan, cancellation, and
//! configuration problems.

mod retrieval_error;
mod store_error;

pub use retrieval_error::RetrievalError;
pub use store_error::StoreError;

/// Workspace-wide error type.
#[derive(Debug, thiserror::Error)]
pub enum SeekError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("config error: {reason}")]
    Config { reason: String },
}

pub type SeekResult<T> = Result<T, SeekError>;

impl SeekError {
    /// Whether this error is a cancellation, as opposed to a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SeekError::Retrieval(RetrievalError::Cancelled))
    }
}
