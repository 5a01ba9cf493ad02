use serde::{Deserialize, Serialize};

use crate::analysis::{Classifier, SymbolVerdict};
use crate::model::{MatchedTable, ShapeVerdict, SymbolTable, Verdict};

/// Verdict counts for a binary with ground truth.
///
/// `unattempted` counts reference addresses the matcher never reported, so
/// the verdict counts plus `unattempted` always equal `total`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundTruthScore {
    pub matched: usize,
    pub different_hash: usize,
    pub sig_collision: usize,
    pub wrong: usize,
    pub missed: usize,
    pub unknown: usize,
    pub unattempted: usize,
    pub total: usize,
}

impl GroundTruthScore {
    pub fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Matched => self.matched += 1,
            Verdict::DifferentHash => self.different_hash += 1,
            Verdict::SigCollision => self.sig_collision += 1,
            Verdict::Wrong => self.wrong += 1,
            Verdict::Missed => self.missed += 1,
            Verdict::Unknown => self.unknown += 1,
        }
    }

    pub fn count(&self, verdict: Verdict) -> usize {
        match verdict {
            Verdict::Matched => self.matched,
            Verdict::DifferentHash => self.different_hash,
            Verdict::SigCollision => self.sig_collision,
            Verdict::Wrong => self.wrong,
            Verdict::Missed => self.missed,
            Verdict::Unknown => self.unknown,
        }
    }

    /// Number of reference addresses that received a verdict.
    pub fn classified(&self) -> usize {
        Verdict::ALL.iter().map(|v| self.count(*v)).sum()
    }

    /// Matched + DifferentHash + SigCollision.
    pub fn overall_success(&self) -> usize {
        Verdict::ALL.iter().filter(|v| v.is_success()).map(|v| self.count(*v)).sum()
    }

    pub fn success_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.overall_success() as f64 / self.total as f64
        }
    }

    pub fn merge(&mut self, other: &GroundTruthScore) {
        self.matched += other.matched;
        self.different_hash += other.different_hash;
        self.sig_collision += other.sig_collision;
        self.wrong += other.wrong;
        self.missed += other.missed;
        self.unknown += other.unknown;
        self.unattempted += other.unattempted;
        self.total += other.total;
    }

    pub fn summary_line(&self) -> String {
        format!(
            "{} / {} (ok: {}, different_hash: {}, sig_collision: {}, wrong: {}, missed: {}, unknown: {}, unattempted: {})",
            self.overall_success(),
            self.total,
            self.matched,
            self.different_hash,
            self.sig_collision,
            self.wrong,
            self.missed,
            self.unknown,
            self.unattempted
        )
    }
}

/// Shape-only counts for a binary without ground truth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoReferenceScore {
    pub recovered: usize,
    pub unresolved: usize,
    pub total: usize,
    /// Functions the matching pass flagged as library code, when it reports them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_functions: Option<usize>,
}

impl NoReferenceScore {
    pub fn record(&mut self, verdict: ShapeVerdict) {
        self.total += 1;
        match verdict {
            ShapeVerdict::Recovered => self.recovered += 1,
            ShapeVerdict::Unresolved => self.unresolved += 1,
        }
    }

    pub fn merge(&mut self, other: &NoReferenceScore) {
        self.recovered += other.recovered;
        self.unresolved += other.unresolved;
        self.total += other.total;
        self.library_functions = match (self.library_functions, other.library_functions) {
            (Some(a), Some(b)) => Some(a + b),
            (a, b) => a.or(b),
        };
    }

    pub fn summary_line(&self) -> String {
        match self.library_functions {
            Some(lib) => format!(
                "{} / {} (no reference symbols, library functions: {})",
                self.recovered, self.total, lib
            ),
            None => format!("{} / {} (no reference symbols)", self.recovered, self.total),
        }
    }
}

/// Score for one binary, tagged by the mode it was computed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BinaryScore {
    GroundTruth(GroundTruthScore),
    NoReference(NoReferenceScore),
}

impl BinaryScore {
    pub fn summary_line(&self) -> String {
        match self {
            BinaryScore::GroundTruth(score) => score.summary_line(),
            BinaryScore::NoReference(score) => score.summary_line(),
        }
    }
}

/// Roll per-address verdicts into counts; `total` reference addresses minus
/// the verdicts given are the unattempted ones.
pub fn score_verdicts(total: usize, verdicts: &[SymbolVerdict]) -> GroundTruthScore {
    let mut score = GroundTruthScore { total, ..GroundTruthScore::default() };
    for verdict in verdicts {
        score.record(verdict.verdict);
    }
    score.unattempted = total.saturating_sub(verdicts.len());
    log::debug!("scored {} reference symbols ({} unattempted)", score.total, score.unattempted);
    score
}

/// Classify every reference address present in `matched`; absent addresses only count in `total`.
pub fn score_with_reference(
    reference: &SymbolTable,
    matched: &SymbolTable,
    classifier: &Classifier<'_>,
) -> GroundTruthScore {
    score_verdicts(reference.len(), &classifier.classify_tables(reference, matched))
}

/// Shape-only scoring over every matched address.
pub fn score_without_reference(
    matched: &MatchedTable,
    classifier: &Classifier<'_>,
) -> NoReferenceScore {
    let mut score = NoReferenceScore::default();
    for (_, name) in matched.table.iter() {
        score.record(classifier.classify_shape(name));
    }
    score.library_functions = matched.library_functions;
    score
}

/// Running totals for one corpus category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub binaries: usize,
    pub ground_truth: GroundTruthScore,
    pub no_reference: NoReferenceScore,
}

impl CategorySummary {
    pub fn new(category: impl Into<String>) -> Self {
        Self { category: category.into(), ..Self::default() }
    }

    pub fn add(&mut self, score: &BinaryScore) {
        self.binaries += 1;
        match score {
            BinaryScore::GroundTruth(s) => self.ground_truth.merge(s),
            BinaryScore::NoReference(s) => self.no_reference.merge(s),
        }
    }

    pub fn summary_line(&self) -> String {
        let mut parts = Vec::new();
        if self.ground_truth.total > 0 {
            parts.push(self.ground_truth.summary_line());
        }
        if self.no_reference.total > 0 {
            parts.push(self.no_reference.summary_line());
        }
        if parts.is_empty() {
            parts.push("no symbols".to_string());
        }
        format!("{} [{} binaries]: {}", self.category, self.binaries, parts.join("; "))
    }
}
