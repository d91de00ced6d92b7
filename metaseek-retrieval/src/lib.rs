//! # metaseek-retrieval
//!
//! The retrieval half of metaseek: the structured search engine, the
//! vector search engine with its bounded query-embedding cache, score
//! fusion, and the `SearchEngine` coordinator that runs a classified
//! query end to end.

pub mod cache;
pub mod engine;
pub mod fusion;
pub mod structured;
pub mod vector;

pub use cache::QueryEmbeddingCache;
pub use engine::{SearchEngine, SearchOptions};
pub use fusion::combine;
pub use structured::{StructuredHit, StructuredSearch};
pub use vector::{cosine_similarity, VectorHit, VectorSearch};
