//! # metaseek-store
//!
//! In-memory `IRecordStore` backend. Records are loaded once and the
//! store is read-only afterward, so concurrent searches need no
//! locking. CSV/JSON/relational ingestion is a loader concern; the
//! store only consumes already-normalized records.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use metaseek_core::errors::{SeekResult, StoreError};
use metaseek_core::plan::Predicate;
use metaseek_core::record::{FieldDescriptor, Record, RecordId};
use metaseek_core::traits::IRecordStore;

/// Read-only in-memory record collection.
pub struct MemoryStore {
    records: Vec<Record>,
    by_id: HashMap<RecordId, usize>,
}

impl MemoryStore {
    /// Build a store from normalized records.
    ///
    /// Records are held in id order so every enumeration downstream is
    /// deterministic. Embeddings, where present, must share one
    /// dimension across the collection.
    pub fn new(mut records: Vec<Record>) -> Result<Self, StoreError> {
        records.sort_by(|a, b| a.id.cmp(&b.id));

        let mut expected_dim: Option<usize> = None;
        for record in &records {
            if let Some(embedding) = &record.embedding {
                match expected_dim {
                    None => expected_dim = Some(embedding.len()),
                    Some(dim) if dim != embedding.len() => {
                        return Err(StoreError::DimensionMismatch {
                            expected: dim,
                            actual: embedding.len(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        let by_id = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();

        debug!(records = records.len(), "memory store loaded");
        Ok(Self { records, by_id })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn record_matches(record: &Record, predicates: &[Predicate]) -> bool {
        predicates.iter().all(|p| {
            record
                .field(&p.field)
                .map(|value| p.matches(value))
                // A predicate naming an absent field matches nothing.
                .unwrap_or(false)
        })
    }
}

impl IRecordStore for MemoryStore {
    fn all_fields(&self) -> Vec<FieldDescriptor> {
        // Union of fields across records; the declared type comes from
        // the first record carrying the field.
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for record in &self.records {
            for (name, value) in &record.fields {
                if seen.insert(name.clone()) {
                    out.push(FieldDescriptor::new(name.clone(), value.field_type()));
                }
            }
        }
        out
    }

    fn filter(&self, predicates: &[Predicate]) -> SeekResult<Vec<RecordId>> {
        Ok(self
            .records
            .iter()
            .filter(|r| Self::record_matches(r, predicates))
            .map(|r| r.id.clone())
            .collect())
    }

    fn get(&self, id: &RecordId) -> SeekResult<Option<Record>> {
        Ok(self.by_id.get(id).map(|&i| self.records[i].clone()))
    }

    fn embedding(&self, id: &RecordId) -> SeekResult<Option<Vec<f32>>> {
        Ok(self
            .by_id
            .get(id)
            .and_then(|&i| self.records[i].embedding.clone()))
    }

    fn embedded_ids(&self) -> SeekResult<Vec<RecordId>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.embedding.is_some())
            .map(|r| r.id.clone())
            .collect())
    }

    fn count(&self, predicates: &[Predicate]) -> SeekResult<u64> {
        Ok(self
            .records
            .iter()
            .filter(|r| Self::record_matches(r, predicates))
            .count() as u64)
    }

    fn distinct_values(&self, field: &str) -> SeekResult<Vec<String>> {
        let mut values = BTreeSet::new();
        for record in &self.records {
            if let Some(value) = record.field(field) {
                values.insert(value.to_text());
            }
        }
        Ok(values.into_iter().collect())
    }
}
