//! Evaluation corpus on disk: layout, config, binary registry, table dumps,
//! and result documents.
//!
//! For now, we define:
//! - `EvaluationLayout`: computed paths for the corpus and evaluation trees.
//! - `EvalConfig`: serializable run configuration.
//! - `BinaryRegistry`: the build stage's map of binaries to ground-truth companions.
//! - Table dump parsing for the disassembler's address→name output.
//! - `EvaluationReport`: per-run results keyed by binary identity.

pub mod config;
pub mod layout;
pub mod registry;
pub mod report;
pub mod tables;

use serde::{Deserialize, Serialize};

pub use config::{load_config, load_config_file, EvalConfig};
pub use layout::EvaluationLayout;
pub use registry::{BinaryRegistry, RegistryEntry};
pub use report::{EvaluationRecord, EvaluationReport, MissingArtifactRecord};
pub use tables::{load_table_dump, parse_address, parse_table_dump};

/// Which binaries are scored and which matcher output is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvaluationMode {
    /// Binaries with an unstripped counterpart, standard-library signatures.
    GroundTruth,
    /// Third-party categories, matched with per-crate signatures as well.
    Crates,
    /// Binaries without any ground truth; names are judged by shape only.
    NoReference,
}

impl EvaluationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            EvaluationMode::GroundTruth => "ground-truth",
            EvaluationMode::Crates => "crates",
            EvaluationMode::NoReference => "no-reference",
        }
    }

    /// Dump suffix of the matcher output this mode reads.
    pub fn matched_suffix(self) -> &'static str {
        match self {
            EvaluationMode::Crates => "matched_with_crates",
            EvaluationMode::GroundTruth | EvaluationMode::NoReference => "matched",
        }
    }

    /// Whether this mode scores `entry`.
    pub fn includes(self, entry: &RegistryEntry, config: &EvalConfig) -> bool {
        match self {
            EvaluationMode::GroundTruth => entry.has_ground_truth(),
            EvaluationMode::NoReference => !entry.has_ground_truth(),
            EvaluationMode::Crates => config.third_party_categories.contains(&entry.category),
        }
    }
}
