use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sigeval_core::corpus::{BinaryRegistry, EvaluationLayout};
use sigeval_core::uniqueness::{
    build_matrix, RecordedHost, SignatureSet, UniquenessCounts, UniquenessSubject,
    SIGNATURE_EXTENSION,
};

use crate::commands::{load_layout, resolve_root};

/// Subject for a registry path; the version comes from the path below the corpus directory.
pub fn uniqueness_subject(layout: &EvaluationLayout, path: &Path) -> UniquenessSubject {
    let version = UniquenessSubject::from_path(layout.resolve(path), &layout.target_dir).version;
    UniquenessSubject { path: path.to_path_buf(), version }
}

/// Discover `*.sig` files in `dir`.
pub fn collect_signature_sets(dir: &Path) -> Result<Vec<SignatureSet>> {
    let mut sets = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some(SIGNATURE_EXTENSION) {
            sets.push(SignatureSet::from_path(path));
        }
    }
    sets.sort();
    Ok(sets)
}

/// Build the cross-version uniqueness matrix from recorded match counts.
pub fn uniqueness_command(
    root: &str,
    counts: Option<String>,
    out: Option<String>,
    json: bool,
) -> Result<()> {
    let root_path = resolve_root(root)?;
    let (_config, layout) = load_layout(&root_path)?;

    let registry = BinaryRegistry::load(&layout.uniqueness_registry_path).with_context(|| {
        format!(
            "Failed to load uniqueness registry at {}",
            layout.uniqueness_registry_path.display()
        )
    })?;
    let subjects: Vec<UniquenessSubject> = registry
        .entries()
        .iter()
        .map(|entry| uniqueness_subject(&layout, entry.matcher_input()))
        .collect();
    let sets = collect_signature_sets(&layout.uniqueness_sigs_dir)?;

    let counts_path: PathBuf = match counts {
        Some(path) => layout.resolve(Path::new(&path)),
        None => layout.uniqueness_counts_path.clone(),
    };
    let recorded = UniquenessCounts::load(&counts_path)
        .with_context(|| format!("Failed to load match counts at {}", counts_path.display()))?;

    let matrix = build_matrix(&RecordedHost::new(recorded), &subjects, &sets)
        .context("Failed to build uniqueness matrix")?;

    let out_path = match out {
        Some(path) => layout.resolve(Path::new(&path)),
        None => layout.uniqueness_report_path(),
    };
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let body = serde_json::to_string_pretty(&matrix)?;
    fs::write(&out_path, &body)
        .with_context(|| format!("Failed to write {}", out_path.display()))?;

    if json {
        println!("{body}");
        return Ok(());
    }

    println!("Uniqueness matrix ({} versions):", matrix.versions.len());
    for ((version, total), row) in
        matrix.versions.iter().zip(&matrix.total_functions).zip(&matrix.matrix)
    {
        let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        println!("  {version} [{total} functions]: {}", cells.join(" "));
    }
    println!("Results: {}", out_path.display());

    Ok(())
}
