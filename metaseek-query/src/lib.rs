//! # metaseek-query
//!
//! Turns raw query text into a `QueryPlan`: temporal phrase
//! normalization, structured filter extraction, and an ordered-rule
//! classifier deciding which retrieval strategies to run.
//!
//! Classification never fails. Anything unparseable degrades to a pure
//! semantic plan carrying the full text.

pub mod classify;
pub mod extract;
pub mod temporal;

pub use classify::{classify, ClassifyOptions};
pub use extract::{extract, Extraction, ExtractionContext};
