//! Structured search: predicate filtering and free-text containment.
//!
//! The predicate path is a conjunction — a record must satisfy every
//! predicate to appear. Scores come from a fixed scheme that rewards
//! exact high-signal matches (id/name/title) without per-corpus
//! calibration; all constants are config.

use std::cmp::Ordering;

use tracing::debug;

use metaseek_core::config::ScoringConfig;
use metaseek_core::errors::SeekResult;
use metaseek_core::plan::{OrderBy, Predicate};
use metaseek_core::record::{FieldValue, Record, RecordId};
use metaseek_core::traits::IRecordStore;

/// Field names whose predicates earn the high-signal bonus even when
/// no mapping marks them.
const HIGH_SIGNAL_FIELDS: &[&str] = &["id", "name", "title"];

/// One structured match.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredHit {
    pub record_id: RecordId,
    /// Non-negative structured relevance score.
    pub score: f64,
}

/// The exact/structured retrieval engine.
pub struct StructuredSearch<'a> {
    store: &'a dyn IRecordStore,
    scoring: &'a ScoringConfig,
    /// Collection-specific high-signal field names (mapped id/name).
    high_signal: Vec<String>,
}

impl<'a> StructuredSearch<'a> {
    pub fn new(
        store: &'a dyn IRecordStore,
        scoring: &'a ScoringConfig,
        high_signal: Vec<String>,
    ) -> Self {
        Self {
            store,
            scoring,
            high_signal,
        }
    }

    /// Evaluate predicates (or fall back to free-text containment) and
    /// return scored matches, descending.
    ///
    /// An empty store, or predicates over absent fields, yield an empty
    /// result — never an error, so an impaired hybrid query can still
    /// serve its other half.
    pub fn search(
        &self,
        predicates: &[Predicate],
        free_text: &str,
        order_by: Option<&OrderBy>,
        limit: usize,
    ) -> SeekResult<Vec<StructuredHit>> {
        let mut hits = if !predicates.is_empty() {
            self.predicate_search(predicates)?
        } else if !free_text.is_empty() {
            self.free_text_search(free_text)?
        } else if order_by.is_some() {
            // A bare ordering directive ("latest") selects everything
            // and lets the order-by pick the top of the list.
            self.scan_all()?
        } else {
            Vec::new()
        };

        self.order(&mut hits, order_by)?;
        hits.truncate(limit);
        debug!(hits = hits.len(), "structured search");
        Ok(hits)
    }

    /// Cardinality of the filtered set, for counting queries.
    pub fn count(&self, predicates: &[Predicate], free_text: &str) -> SeekResult<u64> {
        if predicates.is_empty() && !free_text.is_empty() {
            return Ok(self.free_text_search(free_text)?.len() as u64);
        }
        self.store.count(predicates)
    }

    fn scan_all(&self) -> SeekResult<Vec<StructuredHit>> {
        Ok(self
            .store
            .filter(&[])?
            .into_iter()
            .map(|record_id| StructuredHit {
                record_id,
                score: self.scoring.predicate_base,
            })
            .collect())
    }

    fn predicate_search(&self, predicates: &[Predicate]) -> SeekResult<Vec<StructuredHit>> {
        let ids = self.store.filter(predicates)?;

        let high = predicates
            .iter()
            .filter(|p| self.is_high_signal(&p.field))
            .count() as f64;
        let rest = predicates.len() as f64 - high;
        let score = self.scoring.predicate_base
            + self.scoring.high_signal_bonus * high
            + self.scoring.predicate_bonus * rest;

        Ok(ids
            .into_iter()
            .map(|record_id| StructuredHit { record_id, score })
            .collect())
    }

    /// Whole-field containment fallback when no predicate was extracted.
    fn free_text_search(&self, free_text: &str) -> SeekResult<Vec<StructuredHit>> {
        let needle = free_text.to_lowercase();
        let words: Vec<&str> = needle.split_whitespace().collect();

        let mut hits = Vec::new();
        for id in self.store.filter(&[])? {
            let Some(record) = self.store.get(&id)? else {
                continue;
            };
            let score = self.text_score(&record, &needle, &words);
            if score > 0.0 {
                hits.push(StructuredHit {
                    record_id: id,
                    score,
                });
            }
        }
        Ok(hits)
    }

    fn text_score(&self, record: &Record, needle: &str, words: &[&str]) -> f64 {
        let mut score = 0.0;
        for value in record.fields.values() {
            let haystack = value.to_text().to_lowercase();
            if haystack == *needle {
                score += self.scoring.exact_field;
            } else if haystack.contains(needle) {
                score += self.scoring.substring;
            } else {
                score += words.iter().filter(|w| haystack.contains(**w)).count() as f64
                    * self.scoring.word_match;
            }
        }
        score
    }

    fn is_high_signal(&self, field: &str) -> bool {
        HIGH_SIGNAL_FIELDS
            .iter()
            .any(|f| f.eq_ignore_ascii_case(field))
            || self
                .high_signal
                .iter()
                .any(|f| f.eq_ignore_ascii_case(field))
    }

    /// Score descending, then the plan's order-by directive, then
    /// record id ascending for determinism.
    fn order(&self, hits: &mut [StructuredHit], order_by: Option<&OrderBy>) -> SeekResult<()> {
        let keys: Vec<Option<FieldValue>> = match order_by {
            Some(ob) => hits
                .iter()
                .map(|h| {
                    Ok(self
                        .store
                        .get(&h.record_id)?
                        .and_then(|r| r.field(&ob.field).cloned()))
                })
                .collect::<SeekResult<_>>()?,
            None => vec![None; hits.len()],
        };

        let mut idx: Vec<usize> = (0..hits.len()).collect();
        idx.sort_by(|&a, &b| {
            hits[b]
                .score
                .partial_cmp(&hits[a].score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| order_key_cmp(&keys[a], &keys[b], order_by))
                .then_with(|| hits[a].record_id.cmp(&hits[b].record_id))
        });

        let reordered: Vec<StructuredHit> = idx.into_iter().map(|i| hits[i].clone()).collect();
        hits.clone_from_slice(&reordered);
        Ok(())
    }
}

fn order_key_cmp(
    a: &Option<FieldValue>,
    b: &Option<FieldValue>,
    order_by: Option<&OrderBy>,
) -> Ordering {
    let Some(ob) = order_by else {
        return Ordering::Equal;
    };
    let ord = match (a, b) {
        (Some(x), Some(y)) => compare_values(x, y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    };
    if ob.descending {
        ord.reverse()
    } else {
        ord
    }
}

fn compare_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_timestamp(), b.as_timestamp()) {
        return x.cmp(&y);
    }
    if let (Some(x), Some(y)) = (a.as_number(), b.as_number()) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    a.to_text().cmp(&b.to_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use metaseek_core::config::ScoringConfig;
    use metaseek_core::plan::Operator;

    // Minimal in-crate store so unit tests do not depend on the store
    // crate; integration tests use the real one.
    struct TinyStore(Vec<Record>);

    impl IRecordStore for TinyStore {
        fn all_fields(&self) -> Vec<metaseek_core::record::FieldDescriptor> {
            Vec::new()
        }
        fn filter(&self, predicates: &[Predicate]) -> SeekResult<Vec<RecordId>> {
            Ok(self
                .0
                .iter()
                .filter(|r| {
                    predicates
                        .iter()
                        .all(|p| r.field(&p.field).map(|v| p.matches(v)).unwrap_or(false))
                })
                .map(|r| r.id.clone())
                .collect())
        }
        fn get(&self, id: &RecordId) -> SeekResult<Option<Record>> {
            Ok(self.0.iter().find(|r| &r.id == id).cloned())
        }
        fn embedding(&self, _id: &RecordId) -> SeekResult<Option<Vec<f32>>> {
            Ok(None)
        }
        fn embedded_ids(&self) -> SeekResult<Vec<RecordId>> {
            Ok(Vec::new())
        }
        fn count(&self, predicates: &[Predicate]) -> SeekResult<u64> {
            Ok(self.filter(predicates)?.len() as u64)
        }
        fn distinct_values(&self, _field: &str) -> SeekResult<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn store() -> TinyStore {
        TinyStore(vec![
            Record::new("j-1")
                .field("name", "nightly etl")
                .field("status", "failed")
                .build(),
            Record::new("j-2")
                .field("name", "billing export")
                .field("status", "success")
                .build(),
            Record::new("j-3")
                .field("name", "etl backfill")
                .field("status", "failed")
                .build(),
        ])
    }

    fn engine<'a>(store: &'a TinyStore, scoring: &'a ScoringConfig) -> StructuredSearch<'a> {
        StructuredSearch::new(store, scoring, vec![])
    }

    #[test]
    fn predicate_match_scores_base_plus_bonus() {
        let (s, sc) = (store(), ScoringConfig::default());
        let hits = engine(&s, &sc)
            .search(&[Predicate::equals("status", "failed")], "", None, 10)
            .unwrap();
        assert_eq!(hits.len(), 2);
        // One low-signal predicate: 10 + 1.
        assert!(hits.iter().all(|h| h.score == 11.0));
        // Equal scores fall back to id order.
        assert_eq!(hits[0].record_id, RecordId::new("j-1"));
    }

    #[test]
    fn high_signal_predicate_earns_bonus() {
        let (s, sc) = (store(), ScoringConfig::default());
        let hits = engine(&s, &sc)
            .search(&[Predicate::equals("name", "nightly etl")], "", None, 10)
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].score, 12.0); // 10 + 2
    }

    #[test]
    fn free_text_scores_exact_over_substring_over_words() {
        let (s, sc) = (store(), ScoringConfig::default());
        let e = engine(&s, &sc);

        let exact = e.search(&[], "nightly etl", None, 10).unwrap();
        assert_eq!(exact[0].record_id, RecordId::new("j-1"));
        assert!(exact[0].score >= sc.exact_field);

        // "etl" is a substring of two records' names.
        let partial = e.search(&[], "etl", None, 10).unwrap();
        assert_eq!(partial.len(), 2);
    }

    #[test]
    fn unmatched_free_text_yields_nothing() {
        let (s, sc) = (store(), ScoringConfig::default());
        assert!(engine(&s, &sc).search(&[], "zzz", None, 10).unwrap().is_empty());
    }

    #[test]
    fn absent_field_predicate_degrades_to_empty() {
        let (s, sc) = (store(), ScoringConfig::default());
        let hits = engine(&s, &sc)
            .search(&[Predicate::new("owner", Operator::Equals, "ana")], "", None, 10)
            .unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn order_by_alone_selects_everything() {
        let (s, sc) = (store(), ScoringConfig::default());
        let ob = OrderBy {
            field: "name".into(),
            descending: true,
        };
        let hits = engine(&s, &sc).search(&[], "", Some(&ob), 10).unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].record_id, RecordId::new("j-1")); // "nightly etl"
        assert_eq!(hits[1].record_id, RecordId::new("j-3")); // "etl backfill"
        assert_eq!(hits[2].record_id, RecordId::new("j-2")); // "billing export"
    }

    #[test]
    fn count_delegates_to_the_store() {
        let (s, sc) = (store(), ScoringConfig::default());
        let n = engine(&s, &sc)
            .count(&[Predicate::equals("status", "failed")], "")
            .unwrap();
        assert_eq!(n, 2);
    }
}
