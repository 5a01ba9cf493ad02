use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::analysis::{BinaryScore, CategorySummary, SymbolVerdict};
use crate::corpus::EvaluationMode;
use crate::error::{EvalError, EvalResult};
use crate::model::BinaryIdentity;

/// Score for one binary plus provenance of the tables it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub identity: BinaryIdentity,
    pub category: String,
    pub score: BinaryScore,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_sha256: Option<String>,
    /// Non-`Matched` verdicts, kept only when the run asked for details.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mismatches: Vec<SymbolVerdict>,
}

/// A binary skipped because a required file was absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingArtifactRecord {
    pub binary: String,
    pub path: PathBuf,
    /// The registry promised ground truth for this binary.
    #[serde(default)]
    pub ground_truth_expected: bool,
}

/// Results of one evaluation run, keyed by binary identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub tool_version: String,
    pub mode: EvaluationMode,
    pub generated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    pub binaries: BTreeMap<String, EvaluationRecord>,
    pub categories: BTreeMap<String, CategorySummary>,
    #[serde(default)]
    pub missing: Vec<MissingArtifactRecord>,
}

impl EvaluationReport {
    pub fn new(mode: EvaluationMode, filter: Option<String>) -> Self {
        Self {
            tool_version: crate::version().to_string(),
            mode,
            generated_at: Utc::now().to_rfc3339(),
            filter,
            binaries: BTreeMap::new(),
            categories: BTreeMap::new(),
            missing: Vec::new(),
        }
    }

    /// Add a scored binary and fold it into its category summary.
    pub fn add(&mut self, record: EvaluationRecord) {
        self.categories
            .entry(record.category.clone())
            .or_insert_with(|| CategorySummary::new(&record.category))
            .add(&record.score);
        self.binaries.insert(record.identity.key.clone(), record);
    }

    pub fn add_missing(
        &mut self,
        binary: impl Into<String>,
        path: impl Into<PathBuf>,
        ground_truth_expected: bool,
    ) {
        self.missing.push(MissingArtifactRecord {
            binary: binary.into(),
            path: path.into(),
            ground_truth_expected,
        });
    }

    /// Skipped binaries that the registry declared ground truth for.
    pub fn missing_ground_truth(&self) -> impl Iterator<Item = &MissingArtifactRecord> {
        self.missing.iter().filter(|m| m.ground_truth_expected)
    }

    pub fn write(&self, path: &Path) -> EvalResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|source| EvalError::Io { path: parent.to_path_buf(), source })?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|source| EvalError::Json { path: path.to_path_buf(), source })?;
        std::fs::write(path, json).map_err(|source| EvalError::Io { path: path.to_path_buf(), source })
    }
}
