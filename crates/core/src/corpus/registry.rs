use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::corpus::EvaluationLayout;
use crate::error::{EvalError, EvalResult};
use crate::model::BinaryIdentity;

/// Category used for registries that are not grouped.
pub const DEFAULT_CATEGORY: &str = "default";

#[derive(Deserialize)]
#[serde(untagged)]
enum RegistryDocument {
    Flat(BTreeMap<String, String>),
    Grouped(BTreeMap<String, BTreeMap<String, String>>),
}

/// One registered binary and its ground-truth companion.
///
/// The companion is the stripped copy for DWARF targets, the `.pdb` sidecar
/// for MSVC targets, or the binary itself when no unstripped build exists.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub category: String,
    pub binary: PathBuf,
    pub companion: PathBuf,
}

impl RegistryEntry {
    pub fn new(
        category: impl Into<String>,
        binary: impl Into<PathBuf>,
        companion: impl Into<PathBuf>,
    ) -> Self {
        Self { category: category.into(), binary: binary.into(), companion: companion.into() }
    }

    pub fn has_ground_truth(&self) -> bool {
        self.binary != self.companion
    }

    /// Debug info lives in a `.pdb` sidecar next to the binary.
    pub fn is_msvc(&self) -> bool {
        self.companion.extension().and_then(|e| e.to_str()) == Some("pdb")
    }

    /// Artifact the matcher runs on. MSVC binaries keep their symbols
    /// external, so the binary itself is matched with debug info disabled.
    pub fn matcher_input(&self) -> &Path {
        if self.is_msvc() || !self.has_ground_truth() {
            &self.binary
        } else {
            &self.companion
        }
    }

    /// Source of ground-truth names, if any.
    pub fn ground_truth_source(&self) -> Option<&Path> {
        match (self.has_ground_truth(), self.is_msvc()) {
            (false, _) => None,
            (true, true) => Some(&self.companion),
            (true, false) => Some(&self.binary),
        }
    }

    pub fn identity(&self, layout: &EvaluationLayout) -> BinaryIdentity {
        BinaryIdentity::from_relative(
            &layout.relative_to_target(&self.binary),
            self.matcher_input(),
            self.ground_truth_source().map(Path::to_path_buf),
        )
    }
}

/// Binaries produced by the build stage, grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryRegistry {
    entries: Vec<RegistryEntry>,
}

impl BinaryRegistry {
    pub fn new(mut entries: Vec<RegistryEntry>) -> Self {
        entries.sort();
        Self { entries }
    }

    /// Parse either `{binary: companion}` or `{category: {binary: companion}}`.
    pub fn parse(body: &str, path: &Path) -> EvalResult<Self> {
        let document: RegistryDocument = serde_json::from_str(body)
            .map_err(|source| EvalError::Json { path: path.to_path_buf(), source })?;
        let entries = match document {
            RegistryDocument::Flat(map) => map
                .into_iter()
                .map(|(binary, companion)| RegistryEntry::new(DEFAULT_CATEGORY, binary, companion))
                .collect(),
            RegistryDocument::Grouped(groups) => groups
                .into_iter()
                .flat_map(|(category, map)| {
                    map.into_iter().map(move |(binary, companion)| {
                        RegistryEntry::new(category.clone(), binary, companion)
                    })
                })
                .collect(),
        };
        Ok(Self::new(entries))
    }

    pub fn load(path: &Path) -> EvalResult<Self> {
        if !path.is_file() {
            return Err(EvalError::MissingArtifact { path: path.to_path_buf() });
        }
        let body = std::fs::read_to_string(path)
            .map_err(|source| EvalError::Io { path: path.to_path_buf(), source })?;
        Self::parse(&body, path)
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorted, de-duplicated category names.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self.entries.iter().map(|e| e.category.clone()).collect();
        categories.dedup();
        categories
    }
}
