//! Query plan artifacts: predicates, ordering, strategy.
//!
//! A `QueryPlan` is produced once per query by the classifier, consumed
//! once by the search engine, then discarded.

use serde::{Deserialize, Serialize};

use crate::record::{FieldValue, RecordId};

/// Comparison operator of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    Contains,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    InRange,
}

/// A single typed filter condition against one field.
///
/// `upper` is only meaningful for `InRange` (inclusive bounds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub field: String,
    pub operator: Operator,
    pub value: FieldValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<FieldValue>,
}

impl Predicate {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<FieldValue>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
            upper: None,
        }
    }

    pub fn equals(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::new(field, Operator::Equals, value)
    }

    pub fn in_range(
        field: impl Into<String>,
        lower: impl Into<FieldValue>,
        upper: impl Into<FieldValue>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: Operator::InRange,
            value: lower.into(),
            upper: Some(upper.into()),
        }
    }

    /// Evaluate this predicate against a single field value.
    ///
    /// Text equality and containment are case-insensitive. Ordered
    /// comparisons coerce timestamps first, then numbers; a value that
    /// coerces to neither fails the predicate rather than erroring.
    pub fn matches(&self, actual: &FieldValue) -> bool {
        match self.operator {
            Operator::Equals => match (actual, &self.value) {
                (FieldValue::Number(a), _) => self.value.as_number() == Some(*a),
                (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
                _ => actual.to_text().eq_ignore_ascii_case(&self.value.to_text()),
            },
            Operator::Contains => actual
                .to_text()
                .to_lowercase()
                .contains(&self.value.to_text().to_lowercase()),
            Operator::GreaterThan => Self::ordered(actual, &self.value, |o| o.is_gt()),
            Operator::GreaterOrEqual => Self::ordered(actual, &self.value, |o| o.is_ge()),
            Operator::LessThan => Self::ordered(actual, &self.value, |o| o.is_lt()),
            Operator::LessOrEqual => Self::ordered(actual, &self.value, |o| o.is_le()),
            Operator::InRange => {
                let Some(upper) = &self.upper else { return false };
                Self::ordered(actual, &self.value, |o| o.is_ge())
                    && Self::ordered(actual, upper, |o| o.is_le())
            }
        }
    }

    fn ordered(
        actual: &FieldValue,
        expected: &FieldValue,
        accept: impl Fn(std::cmp::Ordering) -> bool,
    ) -> bool {
        if let (Some(a), Some(b)) = (actual.as_timestamp(), expected.as_timestamp()) {
            return accept(a.cmp(&b));
        }
        match (actual.as_number(), expected.as_number()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).map(&accept).unwrap_or(false),
            _ => false,
        }
    }
}

/// Sort directive attached to a plan by temporal normalization
/// ("latest" → timestamp descending).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    pub descending: bool,
}

/// Which retrieval strategies a plan runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Structured,
    Semantic,
    Hybrid,
}

/// The classifier's decision artifact for a single query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryPlan {
    pub is_counting: bool,
    pub strategy: Strategy,
    pub predicates: Vec<Predicate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderBy>,
    /// Free text left over after predicate extraction; the vector
    /// engine's input.
    pub free_text: String,
    /// Fusion weight in [0, 1]: 0 = structured only, 1 = vector only.
    pub vector_weight: f64,
    /// Direct identifier lookup, bypassing scoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_lookup: Option<RecordId>,
    /// Implicit result cap (e.g. "latest" defaults to top 10). An
    /// explicit caller limit takes precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl QueryPlan {
    /// Pure-semantic fallback plan carrying the whole query as free text.
    pub fn semantic(free_text: impl Into<String>) -> Self {
        Self {
            is_counting: false,
            strategy: Strategy::Semantic,
            predicates: Vec::new(),
            order_by: None,
            free_text: free_text.into(),
            vector_weight: 1.0,
            id_lookup: None,
            limit: None,
        }
    }
}
