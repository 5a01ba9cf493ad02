use std::path::PathBuf;

use crate::analysis::{score_verdicts, score_without_reference, BinaryScore, Classifier, SymbolVerdict};
use crate::corpus::RegistryEntry;
use crate::error::EvalResult;
use crate::model::Verdict;
use crate::services::{ExtractionPass, SymbolExtractor};

/// Score for one registry entry and the files it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryEvaluation {
    pub score: BinaryScore,
    /// Every reported address whose verdict was not `Matched`, in address order.
    pub mismatches: Vec<SymbolVerdict>,
    pub reference_source: Option<PathBuf>,
    pub matched_source: Option<PathBuf>,
}

/// Extract the tables for `entry` and score it.
///
/// Binaries with ground truth need both tables; a missing one surfaces as
/// `EvalError::MissingArtifact` for the caller to skip.
pub fn evaluate_binary(
    extractor: &dyn SymbolExtractor,
    classifier: &Classifier<'_>,
    entry: &RegistryEntry,
) -> EvalResult<BinaryEvaluation> {
    let reference = if entry.has_ground_truth() {
        Some(extractor.extract_symbols(&entry.binary, ExtractionPass::Reference)?.table)
    } else {
        None
    };
    let matched = extractor.extract_symbols(&entry.binary, ExtractionPass::Matched)?;

    let (score, mismatches) = match &reference {
        Some(reference) => {
            let verdicts = classifier.classify_tables(reference, &matched.table);
            let score = score_verdicts(reference.len(), &verdicts);
            let mismatches: Vec<_> =
                verdicts.into_iter().filter(|v| v.verdict != Verdict::Matched).collect();
            (BinaryScore::GroundTruth(score), mismatches)
        }
        None => (BinaryScore::NoReference(score_without_reference(&matched, classifier)), Vec::new()),
    };
    log::info!("{}: {}", entry.binary.display(), score.summary_line());

    Ok(BinaryEvaluation {
        score,
        mismatches,
        reference_source: reference
            .as_ref()
            .and_then(|_| extractor.source_path(&entry.binary, ExtractionPass::Reference)),
        matched_source: extractor.source_path(&entry.binary, ExtractionPass::Matched),
    })
}
