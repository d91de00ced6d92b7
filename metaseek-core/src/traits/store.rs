use crate::errors::SeekResult;
use crate::plan::Predicate;
use crate::record::{FieldDescriptor, Record, RecordId};

/// Read-only record collection: field enumeration, predicate filtering,
/// lookup, counting, embedding access.
///
/// Stores are loaded once per session and read-only thereafter, so
/// implementations only need safe concurrent reads.
pub trait IRecordStore: Send + Sync {
    /// All field descriptors present in the collection.
    fn all_fields(&self) -> Vec<FieldDescriptor>;

    /// Ids of records satisfying every predicate (conjunction).
    ///
    /// A predicate naming an absent field matches nothing; the result
    /// degrades to empty rather than erroring.
    fn filter(&self, predicates: &[Predicate]) -> SeekResult<Vec<RecordId>>;

    /// Fetch one record by id.
    fn get(&self, id: &RecordId) -> SeekResult<Option<Record>>;

    /// Precomputed embedding for a record, if present.
    fn embedding(&self, id: &RecordId) -> SeekResult<Option<Vec<f32>>>;

    /// Ids of all records carrying an embedding, ascending.
    fn embedded_ids(&self) -> SeekResult<Vec<RecordId>>;

    /// Cardinality of the filtered set.
    fn count(&self, predicates: &[Predicate]) -> SeekResult<u64>;

    /// Distinct textual values of a field (e.g. the status vocabulary).
    fn distinct_values(&self, field: &str) -> SeekResult<Vec<String>>;
}
