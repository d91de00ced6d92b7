//! Query classification.
//!
//! An ordered list of pure rules over the extraction result; the first
//! rule to produce a plan wins. Adding a policy means adding a rule to
//! the list, not editing existing ones. The semantic fallback is total:
//! every query gets a plan.

use tracing::debug;

use metaseek_core::mapping::FieldRole;
use metaseek_core::plan::{Operator, QueryPlan, Strategy};
use metaseek_core::record::RecordId;

use crate::extract::{extract, Extraction, ExtractionContext};

/// Counting cues checked as lowercase substrings.
const COUNTING_CUES: &[&str] = &["how many", "count", "total", "number of"];

/// Caller-tunable classification parameters.
#[derive(Debug, Clone)]
pub struct ClassifyOptions {
    /// Fusion weight given to hybrid plans.
    pub hybrid_vector_weight: f64,
    /// Implicit top-K attached to "latest"-style plans.
    pub latest_top_k: usize,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            hybrid_vector_weight: metaseek_core::config::defaults::VECTOR_WEIGHT,
            latest_top_k: metaseek_core::config::defaults::LATEST_TOP_K,
        }
    }
}

/// Everything a rule may look at. Rules are pure: same input, same plan.
struct RuleInput<'a> {
    raw: &'a str,
    lowered: String,
    extraction: &'a Extraction,
    id_field: Option<&'a str>,
    opts: &'a ClassifyOptions,
}

type Rule = fn(&RuleInput<'_>) -> Option<QueryPlan>;

/// Decision policy, first match wins.
const RULES: &[Rule] = &[counting_rule, id_lookup_rule, structured_rule, hybrid_rule];

/// Classify a query into a `QueryPlan`. Never fails; the fallback is a
/// pure semantic plan carrying the remaining text.
pub fn classify(query: &str, ctx: &ExtractionContext<'_>, opts: &ClassifyOptions) -> QueryPlan {
    let extraction = extract(query, ctx);
    let input = RuleInput {
        raw: query,
        lowered: query.to_lowercase(),
        extraction: &extraction,
        id_field: ctx.mapping.resolve(FieldRole::Id),
        opts,
    };

    for rule in RULES {
        if let Some(plan) = rule(&input) {
            debug!(strategy = ?plan.strategy, is_counting = plan.is_counting, "classified query");
            return plan;
        }
    }

    let free_text = if extraction.remainder.is_empty() {
        query.to_string()
    } else {
        extraction.remainder.clone()
    };
    debug!(strategy = ?Strategy::Semantic, "classified query");
    QueryPlan::semantic(free_text)
}

/// Rule 1: counting cues make the caller expect a scalar, whatever
/// predicates were found.
fn counting_rule(input: &RuleInput<'_>) -> Option<QueryPlan> {
    if !COUNTING_CUES.iter().any(|cue| input.lowered.contains(cue)) {
        return None;
    }
    let e = input.extraction;
    Some(QueryPlan {
        is_counting: true,
        strategy: Strategy::Structured,
        predicates: e.predicates.clone(),
        order_by: e.order_by.clone(),
        free_text: e.remainder.clone(),
        vector_weight: 0.0,
        id_lookup: None,
        limit: None,
    })
}

/// Rule 2: an id reference bypasses scoring entirely.
fn id_lookup_rule(input: &RuleInput<'_>) -> Option<QueryPlan> {
    let id = predicate_id(input).or_else(|| textual_id(input))?;
    Some(QueryPlan {
        is_counting: false,
        strategy: Strategy::Structured,
        predicates: Vec::new(),
        order_by: None,
        free_text: String::new(),
        vector_weight: 0.0,
        id_lookup: Some(RecordId::new(id)),
        limit: Some(1),
    })
}

/// An extracted equality predicate on the id field (e.g. `id:42`).
fn predicate_id(input: &RuleInput<'_>) -> Option<String> {
    let id_field = input.id_field?;
    input
        .extraction
        .predicates
        .iter()
        .find(|p| p.operator == Operator::Equals && p.field.eq_ignore_ascii_case(id_field))
        .map(|p| p.value.to_text())
}

/// A bare "id 42" / "identifier J-17" pair in the query text. The role
/// token matches case-insensitively but the candidate keeps the query's
/// casing; store lookups are exact.
fn textual_id(input: &RuleInput<'_>) -> Option<String> {
    let words: Vec<&str> = input.raw.split_whitespace().collect();
    for pair in words.windows(2) {
        let role_token = pair[0].trim_end_matches(':').to_lowercase();
        if FieldRole::Id.aliases().contains(&role_token.as_str()) {
            let candidate = pair[1].trim_matches(|c: char| !c.is_alphanumeric() && c != '-');
            if !candidate.is_empty() && candidate.chars().any(|c| c.is_ascii_digit()) {
                return Some(candidate.to_string());
            }
        }
    }
    None
}

/// Rule 3: structured tokens and nothing left over.
fn structured_rule(input: &RuleInput<'_>) -> Option<QueryPlan> {
    let e = input.extraction;
    if !e.has_structured_signal() || !e.remainder.is_empty() {
        return None;
    }
    Some(QueryPlan {
        is_counting: false,
        strategy: Strategy::Structured,
        predicates: e.predicates.clone(),
        order_by: e.order_by.clone(),
        free_text: String::new(),
        vector_weight: 0.0,
        id_lookup: None,
        limit: implicit_limit(input),
    })
}

/// Rule 4: structured tokens plus non-trivial free text.
fn hybrid_rule(input: &RuleInput<'_>) -> Option<QueryPlan> {
    let e = input.extraction;
    if !e.has_structured_signal() || e.remainder.is_empty() {
        return None;
    }
    Some(QueryPlan {
        is_counting: false,
        strategy: Strategy::Hybrid,
        predicates: e.predicates.clone(),
        order_by: e.order_by.clone(),
        free_text: e.remainder.clone(),
        vector_weight: input.opts.hybrid_vector_weight,
        id_lookup: None,
        limit: implicit_limit(input),
    })
}

/// "latest" implies a top-K cap; an explicit caller limit overrides it
/// downstream.
fn implicit_limit(input: &RuleInput<'_>) -> Option<usize> {
    input
        .extraction
        .order_by
        .as_ref()
        .map(|_| input.opts.latest_top_k)
}
