//! # metaseek-core
//!
//! Foundation crate for the metaseek hybrid search system.
//! Defines all shared types, traits, errors, and config.
//! Every other crate in the workspace depends on this.

pub mod cancel;
pub mod config;
pub mod errors;
pub mod mapping;
pub mod outcome;
pub mod plan;
pub mod record;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use cancel::CancelToken;
pub use config::{ScoringConfig, SearchConfig};
pub use errors::{RetrievalError, SeekError, SeekResult, StoreError};
pub use mapping::{FieldMapping, FieldRole};
pub use outcome::{OutcomeKind, ScoredMatch, SearchOutcome};
pub use plan::{Operator, OrderBy, Predicate, QueryPlan, Strategy};
pub use record::{FieldDescriptor, FieldType, FieldValue, Record, RecordId};
