use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use sigeval_core::corpus::{EvalConfig, EvaluationLayout};

use crate::commands::{print_path_status, resolve_root};

/// Evaluations are named after their root directory unless `--name` is given.
pub fn default_evaluation_name(root: &Path) -> String {
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unnamed-evaluation".to_string())
}

/// Write `sigeval.json` and create the evaluation directory at `root`.
pub fn init_command(root: &str, name: Option<String>, target_dir: Option<String>) -> Result<()> {
    let root_path = resolve_root(root)?;
    let existing = EvaluationLayout::new(&root_path);
    if existing.config_path.exists() {
        return Err(anyhow!("Config already exists: {}", existing.config_path.display()));
    }

    let mut config = EvalConfig::new(name.unwrap_or_else(|| default_evaluation_name(&root_path)));
    if let Some(target) = target_dir {
        config.target_dir = target;
    }
    let layout = config.layout(&root_path);

    fs::create_dir_all(&layout.evaluation_dir).with_context(|| {
        format!("Failed to create evaluation dir: {}", layout.evaluation_dir.display())
    })?;

    let json = serde_json::to_string_pretty(&config)?;
    fs::write(&layout.config_path, json)
        .with_context(|| format!("Failed to write config: {}", layout.config_path.display()))?;

    println!("Initialized sigeval evaluation:");
    println!("  Name: {}", config.name);
    println!("  Root: {}", layout.root.display());
    println!("  Config: {}", layout.config_path.display());
    println!("  Evaluation dir: {}", layout.evaluation_dir.display());
    println!("Inputs:");
    print_path_status("Binary registry", &layout.registry_path);
    print_path_status("Uniqueness registry", &layout.uniqueness_registry_path);
    print_path_status("Uniqueness signatures", &layout.uniqueness_sigs_dir);
    print_path_status("Uniqueness counts", &layout.uniqueness_counts_path);

    Ok(())
}
