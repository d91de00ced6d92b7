//! Trait seams toward external collaborators.

mod embedding;
mod store;

pub use embedding::IEmbeddingProvider;
pub use store::IRecordStore;
