use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::corpus::EvaluationLayout;
use crate::names::{AliasEntry, AliasTable};

fn default_target_dir() -> String {
    "target".to_string()
}

fn default_third_party_categories() -> Vec<String> {
    vec!["oss_projects".to_string(), "malware_samples".to_string()]
}

/// Serializable configuration for evaluation runs.
///
/// This lives at `sigeval.json` in the root; every field has a default so a
/// missing file behaves like an empty one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Human-friendly name for the evaluation.
    #[serde(default)]
    pub name: String,
    /// Optional description / notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Schema/config version. This is about the config format, not toolchain version.
    #[serde(default = "EvalConfig::current_version")]
    pub config_version: String,
    /// Corpus directory, relative to the root unless absolute.
    #[serde(default = "default_target_dir")]
    pub target_dir: String,
    /// Registry categories scored by the crates mode.
    #[serde(default = "default_third_party_categories")]
    pub third_party_categories: Vec<String>,
    /// Alias pairs added on top of the built-in table.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_aliases: Vec<AliasEntry>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self::new("")
    }
}

impl EvalConfig {
    fn current_version() -> String {
        "0.1.0".to_string()
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            config_version: Self::current_version(),
            target_dir: default_target_dir(),
            third_party_categories: default_third_party_categories(),
            extra_aliases: Vec::new(),
        }
    }

    /// Built-in aliases plus `extra_aliases`.
    pub fn alias_table(&self) -> AliasTable {
        AliasTable::builtin().with_entries(self.extra_aliases.iter().cloned())
    }

    /// Layout for `root` honoring `target_dir`.
    pub fn layout(&self, root: &Path) -> EvaluationLayout {
        EvaluationLayout::with_target_dir(root, &self.target_dir)
    }
}

/// Load a config file, choosing YAML or JSON by extension.
pub fn load_config_file(path: &Path) -> Result<EvalConfig> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config at {}", path.display()))?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let config = if matches!(ext, "yaml" | "yml") {
        serde_yaml::from_str(&body).context("Failed to parse config YAML")?
    } else {
        serde_json::from_str(&body).context("Failed to parse config JSON")?
    };
    Ok(config)
}

/// Load the config for a layout, falling back to defaults when no file exists.
pub fn load_config(layout: &EvaluationLayout) -> Result<EvalConfig> {
    if !layout.config_path.is_file() {
        log::debug!("no config at {}, using defaults", layout.config_path.display());
        return Ok(EvalConfig::default());
    }
    load_config_file(&layout.config_path)
}
