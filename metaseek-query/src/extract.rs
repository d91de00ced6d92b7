//! Structured filter extraction.
//!
//! Pulls `field:value` tokens, comparison expressions, bare status
//! keywords, and temporal phrases out of query text into typed
//! predicates. Everything consumed is removed from the remainder; the
//! remainder is what the vector engine embeds.
//!
//! Malformed structure never fails the query. A non-numeric value
//! against a numeric field, or an unknown field name, leaves the token
//! in the remainder and the query degrades toward semantic search.

use std::ops::Range;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use metaseek_core::mapping::{FieldMapping, FieldRole};
use metaseek_core::plan::{Operator, OrderBy, Predicate};
use metaseek_core::record::{FieldDescriptor, FieldType, FieldValue};

use crate::temporal;

static FIELD_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?P<field>\w+):(?:"(?P<quoted>[^"]*)"|(?P<bare>[^\s"]+))"#).expect("valid regex")
});

static COMPARISON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<field>\w+)\s*(?P<op>>=|<=|>|<)\s*(?P<value>\S+)").expect("valid regex")
});

/// Filler words dropped from the free-text remainder.
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "for", "in", "is", "of", "or", "that", "the", "to", "was", "were",
    "which", "with",
];

/// Everything extraction needs to know about the collection.
pub struct ExtractionContext<'a> {
    pub mapping: &'a FieldMapping,
    pub known_fields: &'a [FieldDescriptor],
    /// Enumerated values of the mapped status field, for bare-keyword
    /// detection ("failed" → `status = failed`).
    pub status_values: &'a [String],
    /// Injected clock for deterministic temporal windows.
    pub now: DateTime<Utc>,
}

impl ExtractionContext<'_> {
    /// Resolve a query-side field token to a collection field, either
    /// directly (case-insensitive) or through a mapped role alias.
    fn resolve_field(&self, name: &str) -> Option<(String, FieldType)> {
        if let Some(desc) = self
            .known_fields
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
        {
            return Some((desc.name.clone(), desc.field_type));
        }

        for role in [
            FieldRole::Id,
            FieldRole::Name,
            FieldRole::Status,
            FieldRole::Timestamp,
            FieldRole::Description,
        ] {
            if role.aliases().iter().any(|a| a.eq_ignore_ascii_case(name)) {
                if let Some(mapped) = self.mapping.resolve(role) {
                    let field_type = self
                        .known_fields
                        .iter()
                        .find(|d| d.name.eq_ignore_ascii_case(mapped))
                        .map(|d| d.field_type)
                        .unwrap_or(FieldType::Text);
                    return Some((mapped.to_string(), field_type));
                }
            }
        }
        None
    }
}

/// Result of filter extraction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub predicates: Vec<Predicate>,
    pub order_by: Option<OrderBy>,
    pub remainder: String,
}

impl Extraction {
    /// Whether any structured token was recognized.
    pub fn has_structured_signal(&self) -> bool {
        !self.predicates.is_empty() || self.order_by.is_some()
    }
}

/// Extract predicates and the free-text remainder from `query`.
///
/// Deterministic and side-effect-free: same inputs, same extraction.
pub fn extract(query: &str, ctx: &ExtractionContext<'_>) -> Extraction {
    let mut out = Extraction::default();
    let mut working = query.to_string();

    // Temporal phrases first, so "last 7 days" is not shredded by the
    // token passes below. Skipped entirely without a timestamp field.
    if let Some(ts_field) = ctx.mapping.resolve(FieldRole::Timestamp) {
        let t = temporal::extract(&working, ts_field, ctx.now);
        if let Some(p) = t.predicate {
            out.predicates.push(p);
        }
        out.order_by = t.order_by;
        working = t.remainder;
    }

    working = consume_field_value_tokens(&working, ctx, &mut out.predicates);
    working = consume_comparisons(&working, ctx, &mut out.predicates);
    working = consume_status_keywords(&working, ctx, &mut out.predicates);

    out.remainder = working
        .split_whitespace()
        .filter(|w| !STOPWORDS.contains(&w.to_lowercase().as_str()))
        .collect::<Vec<_>>()
        .join(" ");
    out
}

/// `field:value` and `field:"quoted value"` tokens.
fn consume_field_value_tokens(
    text: &str,
    ctx: &ExtractionContext<'_>,
    predicates: &mut Vec<Predicate>,
) -> String {
    let mut consumed: Vec<Range<usize>> = Vec::new();

    for caps in FIELD_VALUE.captures_iter(text) {
        let field_token = &caps["field"];
        let raw_value = caps
            .name("quoted")
            .or_else(|| caps.name("bare"))
            .map(|m| m.as_str())
            .unwrap_or_default();

        // Unknown field names stay in the remainder untouched; a false
        // negative here must not silently become "no predicate".
        let Some((field, field_type)) = ctx.resolve_field(field_token) else {
            continue;
        };

        let (operator, value_str) = split_operator_prefix(raw_value);
        match parse_typed(value_str, field_type) {
            Some(value) => {
                predicates.push(Predicate {
                    field,
                    operator,
                    value,
                    upper: None,
                });
                consumed.push(caps.get(0).expect("whole match").range());
            }
            // Unparseable value: the whole token demotes to free text.
            None => continue,
        }
    }

    strip_spans(text, &consumed)
}

/// `field >= value` comparison expressions (spaced or not).
fn consume_comparisons(
    text: &str,
    ctx: &ExtractionContext<'_>,
    predicates: &mut Vec<Predicate>,
) -> String {
    let mut consumed: Vec<Range<usize>> = Vec::new();

    for caps in COMPARISON.captures_iter(text) {
        let Some((field, field_type)) = ctx.resolve_field(&caps["field"]) else {
            continue;
        };
        // Comparisons only make sense against ordered fields.
        if !matches!(field_type, FieldType::Number | FieldType::Timestamp) {
            continue;
        }
        let Some(value) = parse_typed(&caps["value"], field_type) else {
            continue;
        };
        let operator = match &caps["op"] {
            ">" => Operator::GreaterThan,
            ">=" => Operator::GreaterOrEqual,
            "<" => Operator::LessThan,
            _ => Operator::LessOrEqual,
        };
        predicates.push(Predicate {
            field,
            operator,
            value,
            upper: None,
        });
        consumed.push(caps.get(0).expect("whole match").range());
    }

    strip_spans(text, &consumed)
}

/// Bare words matching the status vocabulary ("failed" → status=failed).
fn consume_status_keywords(
    text: &str,
    ctx: &ExtractionContext<'_>,
    predicates: &mut Vec<Predicate>,
) -> String {
    let Some(status_field) = ctx.mapping.resolve(FieldRole::Status) else {
        return text.to_string();
    };

    let mut kept: Vec<&str> = Vec::new();
    for word in text.split_whitespace() {
        let bare = word.trim_matches(|c: char| !c.is_alphanumeric());
        let hit = ctx
            .status_values
            .iter()
            .find(|v| v.eq_ignore_ascii_case(bare));
        match hit {
            Some(value) => predicates.push(Predicate::equals(status_field, value.as_str())),
            None => kept.push(word),
        }
    }
    kept.join(" ")
}

/// Leading comparison operator inside a `field:value` token
/// (`priority:>3`). Defaults to equality.
fn split_operator_prefix(value: &str) -> (Operator, &str) {
    for (prefix, op) in [
        (">=", Operator::GreaterOrEqual),
        ("<=", Operator::LessOrEqual),
        (">", Operator::GreaterThan),
        ("<", Operator::LessThan),
    ] {
        if let Some(rest) = value.strip_prefix(prefix) {
            return (op, rest.trim());
        }
    }
    (Operator::Equals, value)
}

/// Parse a raw token according to the field's declared type.
/// `None` means the token should stay in the remainder as plain text.
fn parse_typed(raw: &str, field_type: FieldType) -> Option<FieldValue> {
    match field_type {
        FieldType::Text => Some(FieldValue::Text(raw.to_string())),
        FieldType::Number => raw.trim().parse::<f64>().ok().map(FieldValue::Number),
        FieldType::Timestamp => raw
            .parse::<DateTime<Utc>>()
            .ok()
            .or_else(|| {
                chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|dt| dt.and_utc())
            })
            .map(FieldValue::Timestamp),
        FieldType::Bool => match raw.to_lowercase().as_str() {
            "true" | "yes" | "1" | "t" | "y" => Some(FieldValue::Bool(true)),
            "false" | "no" | "0" | "f" | "n" => Some(FieldValue::Bool(false)),
            _ => None,
        },
    }
}

/// Rebuild `text` with the given byte spans removed.
fn strip_spans(text: &str, spans: &[Range<usize>]) -> String {
    if spans.is_empty() {
        return text.to_string();
    }
    let mut result = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in spans {
        if span.start > cursor {
            result.push_str(&text[cursor..span.start]);
        }
        result.push(' ');
        cursor = span.end.max(cursor);
    }
    if cursor < text.len() {
        result.push_str(&text[cursor..]);
    }
    result
}
