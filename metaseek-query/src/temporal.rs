//! Temporal phrase normalization.
//!
//! Phrases like "last 3 days", "today", "latest" become a range
//! predicate (or an order-by directive) against the mapped timestamp
//! field. Without a mapped timestamp field the phrases are left in the
//! text untouched.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;

use metaseek_core::plan::{Operator, OrderBy, Predicate};

/// `last/past N days|hours|weeks|months`
static RELATIVE_WINDOW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:last|past)\s+(\d+)\s+(day|days|hour|hours|week|weeks|month|months)\b")
        .expect("valid regex")
});

/// Phrases that imply ordering by newest first.
static LATEST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:latest|newest|most recent)\b").expect("valid regex"));

/// Fixed-window phrases as one alternation. Two-word phrases come
/// first so "last week" is not half-consumed as the word "week".
/// Matching on the original text keeps the byte offsets valid even
/// when lowercasing would change a character's length.
static FIXED_WINDOW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:this week|last week|this month|last month|yesterday|today|recent)\b")
        .expect("valid regex")
});

/// Window width in days for each fixed phrase.
const FIXED_WINDOWS: &[(&str, f64)] = &[
    ("this week", 7.0),
    ("last week", 7.0),
    ("this month", 30.0),
    ("last month", 60.0),
    ("yesterday", 2.0),
    ("today", 1.0),
    ("recent", 1.0),
];

/// Outcome of temporal extraction.
#[derive(Debug, Default, PartialEq)]
pub struct TemporalExtraction {
    /// Window predicate (`timestamp >= now - N days`).
    pub predicate: Option<Predicate>,
    /// Newest-first ordering for "latest"-style phrases.
    pub order_by: Option<OrderBy>,
    /// Query text with consumed phrases removed.
    pub remainder: String,
}

/// Extract temporal phrases against `timestamp_field`, relative to `now`.
///
/// `now` is injected rather than read from the clock so extraction is
/// deterministic under test.
pub fn extract(text: &str, timestamp_field: &str, now: DateTime<Utc>) -> TemporalExtraction {
    let mut out = TemporalExtraction::default();
    let mut remaining = text.to_string();

    let relative = RELATIVE_WINDOW.captures(&remaining).map(|caps| {
        let amount: f64 = caps[1].parse().unwrap_or(1.0);
        let days = match caps[2].to_lowercase().as_str() {
            u if u.starts_with("hour") => amount / 24.0,
            u if u.starts_with("week") => amount * 7.0,
            u if u.starts_with("month") => amount * 30.0,
            _ => amount,
        };
        (caps.get(0).expect("whole match").range(), days)
    });
    if let Some((span, days)) = relative {
        out.predicate = Some(window_predicate(timestamp_field, now, days));
        remaining.replace_range(span, " ");
    }

    if LATEST.is_match(&remaining) {
        out.order_by = Some(OrderBy {
            field: timestamp_field.to_string(),
            descending: true,
        });
        remaining = LATEST.replace_all(&remaining, " ").into_owned();
    }

    if out.predicate.is_none() {
        if let Some(m) = FIXED_WINDOW.find(&remaining) {
            let days = FIXED_WINDOWS
                .iter()
                .find(|(phrase, _)| m.as_str().eq_ignore_ascii_case(phrase))
                .map(|(_, days)| *days);
            if let Some(days) = days {
                out.predicate = Some(window_predicate(timestamp_field, now, days));
                remaining.replace_range(m.range(), " ");
            }
        }
    }

    out.remainder = remaining.split_whitespace().collect::<Vec<_>>().join(" ");
    out
}

fn window_predicate(field: &str, now: DateTime<Utc>, days: f64) -> Predicate {
    let cutoff = now - Duration::seconds((days * 86_400.0) as i64);
    Predicate::new(field, Operator::GreaterOrEqual, cutoff)
}
