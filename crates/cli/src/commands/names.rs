use anyhow::Result;
use serde::Serialize;
use sigeval_core::analysis::Classifier;
use sigeval_core::model::Verdict;
use sigeval_core::names::{canonicalize, CanonicalName};

use crate::commands::{load_layout, resolve_root};

#[derive(Debug, Serialize)]
pub struct ClassificationInfo {
    pub real: CanonicalName,
    pub matched: CanonicalName,
    pub verdict: Verdict,
}

/// Print both canonical forms of a raw name.
pub fn canonicalize_command(name: &str, json: bool) -> Result<()> {
    let canon = canonicalize(name);
    if json {
        println!("{}", serde_json::to_string_pretty(&canon)?);
        return Ok(());
    }
    println!("Full: {}", canon.full);
    println!("Hash-agnostic: {}", canon.hash_agnostic);
    println!("Scheme: {:?}", canon.scheme);
    Ok(())
}

/// Classify one (reference, matched) pair with the configured alias table.
pub fn classify_command(root: &str, real: &str, matched: &str, json: bool) -> Result<()> {
    let root_path = resolve_root(root)?;
    let (config, _layout) = load_layout(&root_path)?;
    let aliases = config.alias_table();
    let classifier = Classifier::new(&aliases);

    let info = ClassificationInfo {
        real: canonicalize(real),
        matched: canonicalize(matched),
        verdict: classifier.classify(real, matched),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }
    println!("Verdict: {}", info.verdict.as_str());
    println!("  real:    {}", info.real.full);
    println!("  matched: {}", info.matched.full);
    Ok(())
}

/// List the pinned alias pairs in effect (built-in plus config extras).
pub fn list_aliases_command(root: &str, json: bool) -> Result<()> {
    let root_path = resolve_root(root)?;
    let (config, _layout) = load_layout(&root_path)?;
    let entries = config.alias_table().entries();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("Aliases: (none)");
        return Ok(());
    }
    println!("Aliases:");
    for entry in entries {
        println!("- {} -> {}", entry.real_name, entry.matched_name);
    }
    Ok(())
}
