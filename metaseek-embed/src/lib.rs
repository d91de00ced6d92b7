//! # metaseek-embed
//!
//! Embedding providers. The `IEmbeddingProvider` trait lives in
//! metaseek-core; this crate ships implementations. Neural providers
//! are collaborators wired in by the application — what lives here is
//! the always-available deterministic fallback.

mod hashed;
mod unavailable;

pub use hashed::HashedTermProvider;
pub use unavailable::UnavailableProvider;
