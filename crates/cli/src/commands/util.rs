use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use sha2::{Digest, Sha256};
use sigeval_core::corpus::{load_config, EvalConfig, EvaluationLayout, EvaluationMode};

/// Absolute corpus root for `--root`; it may not exist yet (`init`).
pub fn resolve_root(root: &str) -> Result<PathBuf> {
    Path::new(root)
        .canonicalize()
        .or_else(|_| std::path::absolute(root))
        .with_context(|| format!("Failed to resolve root '{root}'"))
}

/// Hex SHA-256 of a consumed table dump, recorded next to its score.
pub fn dump_digest(path: &Path) -> Result<String> {
    let mut file = File::open(path)
        .with_context(|| format!("Failed to open table dump: {}", path.display()))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)
        .with_context(|| format!("Failed to hash table dump: {}", path.display()))?;
    Ok(format!("{:x}", hasher.finalize()))
}

pub fn parse_mode(mode: &str) -> Result<EvaluationMode> {
    match mode {
        "ground-truth" => Ok(EvaluationMode::GroundTruth),
        "crates" => Ok(EvaluationMode::Crates),
        "no-reference" => Ok(EvaluationMode::NoReference),
        other => Err(anyhow!(
            "Invalid mode '{}'. Allowed: ground-truth, crates, no-reference",
            other
        )),
    }
}

/// Compile the optional `--filter` pattern applied to binary identity keys.
pub fn compile_filter(filter: Option<&str>) -> Result<Option<Regex>> {
    filter
        .map(|pattern| {
            Regex::new(pattern).with_context(|| format!("Invalid filter pattern '{pattern}'"))
        })
        .transpose()
}

/// Load the config at `root` and the layout it describes.
pub fn load_layout(root: &Path) -> Result<(EvalConfig, EvaluationLayout)> {
    let config = load_config(&EvaluationLayout::new(root))?;
    let layout = config.layout(root);
    Ok((config, layout))
}

/// Helper to print whether a path exists.
pub fn print_path_status(label: &str, path: &Path) {
    let exists = path.exists();
    println!("- {label}: {} ({})", if exists { "OK" } else { "MISSING" }, path.display());
}
