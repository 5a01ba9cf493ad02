//! Per-symbol classification and per-binary aggregation.
//!
//! - `classify`: the ordered decision procedure turning one
//!   `(real_name, matched_name)` pair into a `Verdict`.
//! - `score`: rolls a binary's per-address verdicts into a `BinaryScore`,
//!   plus per-category summaries.

pub mod classify;
pub mod score;

pub use classify::{Classifier, SymbolVerdict};
pub use score::{
    score_verdicts, score_with_reference, score_without_reference, BinaryScore, CategorySummary,
    GroundTruthScore, NoReferenceScore,
};
