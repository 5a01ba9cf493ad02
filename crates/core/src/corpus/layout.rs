use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Logical layout of an evaluation tree on disk.
///
/// This is derived from a chosen root path. It does *not* perform any IO itself.
/// The build and disassembly stages populate `target/`; the CLI writes results
/// under `target/evaluation/`.
#[derive(Debug, Clone)]
pub struct EvaluationLayout {
    /// Root directory (the directory the corpus was built from).
    pub root: PathBuf,
    /// Corpus of built binaries (target).
    pub target_dir: PathBuf,
    /// Table dumps and results, mirroring the corpus tree (target/evaluation).
    pub evaluation_dir: PathBuf,
    /// Registry of evaluated binaries (target/binaries.json).
    pub registry_path: PathBuf,
    /// Registry of the cross-version uniqueness set (target/binaries_uniqueness.json).
    pub uniqueness_registry_path: PathBuf,
    /// Per-version signature sets (target/uniqueness_sigs).
    pub uniqueness_sigs_dir: PathBuf,
    /// Recorded per-signature-set match counts (target/uniqueness_counts.json).
    pub uniqueness_counts_path: PathBuf,
    /// Optional run configuration (sigeval.json).
    pub config_path: PathBuf,
}

impl EvaluationLayout {
    /// Compute the default layout for a tree rooted at `root`.
    ///
    /// This does *not* touch the filesystem.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self::with_target_dir(root, "target")
    }

    /// Layout with a custom corpus directory (relative to `root` unless absolute).
    pub fn with_target_dir(root: impl AsRef<Path>, target: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let target_dir = root.join(target);
        let evaluation_dir = target_dir.join("evaluation");
        let registry_path = target_dir.join("binaries.json");
        let uniqueness_registry_path = target_dir.join("binaries_uniqueness.json");
        let uniqueness_sigs_dir = target_dir.join("uniqueness_sigs");
        let uniqueness_counts_path = target_dir.join("uniqueness_counts.json");
        let config_path = root.join("sigeval.json");

        Self {
            root,
            target_dir,
            evaluation_dir,
            registry_path,
            uniqueness_registry_path,
            uniqueness_sigs_dir,
            uniqueness_counts_path,
            config_path,
        }
    }

    /// Resolve a registry path (relative to `root`) to an absolute one.
    pub fn resolve(&self, artifact: &Path) -> PathBuf {
        if artifact.is_absolute() {
            artifact.to_path_buf()
        } else {
            self.root.join(artifact)
        }
    }

    /// Path of an artifact relative to the corpus directory.
    pub fn relative_to_target(&self, artifact: &Path) -> PathBuf {
        let resolved = self.resolve(artifact);
        match resolved.strip_prefix(&self.target_dir) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => artifact.to_path_buf(),
        }
    }

    /// Dump file for an artifact: `<evaluation>/<relative path>.<suffix>`.
    pub fn dump_path(&self, artifact: &Path, suffix: &str) -> PathBuf {
        let mut name: OsString = self.evaluation_dir.join(self.relative_to_target(artifact)).into();
        name.push(".");
        name.push(suffix);
        PathBuf::from(name)
    }

    /// Results document for an evaluation mode.
    pub fn results_path(&self, mode: &str) -> PathBuf {
        self.evaluation_dir.join(format!("results_{mode}.json"))
    }

    /// Output document of the uniqueness run.
    pub fn uniqueness_report_path(&self) -> PathBuf {
        self.evaluation_dir.join("uniqueness.json")
    }
}
