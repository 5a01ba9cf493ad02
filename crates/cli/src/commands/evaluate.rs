use std::path::Path;

use anyhow::{anyhow, Context, Result};
use sigeval_core::analysis::Classifier;
use sigeval_core::corpus::{BinaryRegistry, EvaluationRecord, EvaluationReport};
use sigeval_core::services::{default_extractor_registry, evaluate_binary};
use sigeval_core::EvalError;

use crate::commands::{compile_filter, dump_digest, load_layout, parse_mode, resolve_root};

/// Score every registered binary the mode selects and write the results document.
///
/// Binaries whose dumps are missing are skipped and listed in the report; the
/// command fails afterwards if any of them was registered with ground truth.
/// With `details`, each record also lists its non-`Matched` verdicts.
pub fn evaluate_command(
    root: &str,
    mode: &str,
    filter: Option<String>,
    out: Option<String>,
    details: bool,
    json: bool,
) -> Result<()> {
    let mode = parse_mode(mode)?;
    let pattern = compile_filter(filter.as_deref())?;
    let root_path = resolve_root(root)?;
    let (config, layout) = load_layout(&root_path)?;

    let registry = BinaryRegistry::load(&layout.registry_path).with_context(|| {
        format!("Failed to load binary registry at {}", layout.registry_path.display())
    })?;
    let aliases = config.alias_table();
    let classifier = Classifier::new(&aliases);
    let extractors = default_extractor_registry(&layout);
    let extractor = extractors.get(mode.as_str()).ok_or_else(|| {
        anyhow!(
            "No extractor registered for mode '{}'. Available: {}",
            mode.as_str(),
            extractors.names().join(", ")
        )
    })?;

    let mut report = EvaluationReport::new(mode, filter);
    for entry in registry.entries().iter().filter(|e| mode.includes(e, &config)) {
        let identity = entry.identity(&layout);
        if let Some(re) = &pattern {
            if !re.is_match(&identity.key) {
                continue;
            }
        }
        if !json {
            println!("{}", identity.key);
        }

        let evaluation = match evaluate_binary(extractor, &classifier, entry) {
            Ok(evaluation) => evaluation,
            Err(EvalError::MissingArtifact { path }) => {
                log::warn!("skipping {}: missing {}", identity.key, path.display());
                if !json {
                    println!("  skipped (missing {})", path.display());
                }
                report.add_missing(identity.key.clone(), path, entry.has_ground_truth());
                continue;
            }
            Err(err) => {
                return Err(anyhow::Error::new(err)
                    .context(format!("Failed to evaluate {}", identity.key)))
            }
        };

        let reference_sha256 =
            evaluation.reference_source.as_deref().map(dump_digest).transpose()?;
        let matched_sha256 = evaluation.matched_source.as_deref().map(dump_digest).transpose()?;
        if !json {
            println!("  {}", evaluation.score.summary_line());
        }
        report.add(EvaluationRecord {
            identity,
            category: entry.category.clone(),
            score: evaluation.score,
            reference_sha256,
            matched_sha256,
            mismatches: if details { evaluation.mismatches } else { Vec::new() },
        });
    }

    let out_path = match out {
        Some(path) => layout.resolve(Path::new(&path)),
        None => layout.results_path(mode.as_str()),
    };
    report
        .write(&out_path)
        .with_context(|| format!("Failed to write results to {}", out_path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!();
        if report.categories.is_empty() {
            println!("No binaries evaluated.");
        }
        for summary in report.categories.values() {
            println!("{}", summary.summary_line());
        }
        if !report.missing.is_empty() {
            println!("Skipped {} binaries with missing artifacts.", report.missing.len());
        }
        println!("Results: {}", out_path.display());
    }

    let missing: Vec<_> = report.missing_ground_truth().collect();
    if let Some(first) = missing.first() {
        return Err(anyhow!(
            "{} binaries are missing ground-truth artifacts (first: {})",
            missing.len(),
            first.path.display()
        ));
    }

    Ok(())
}
