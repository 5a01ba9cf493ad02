//! Core data model: symbol tables, binary identities, and verdicts.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Binary-relative virtual address of a function.
pub type Address = u64;

/// Address-keyed function names for one binary.
///
/// One function per address; iteration is in address order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolTable {
    entries: BTreeMap<Address, String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) the name recorded at `address`.
    pub fn insert(&mut self, address: Address, name: impl Into<String>) -> Option<String> {
        self.entries.insert(address, name.into())
    }

    pub fn get(&self, address: Address) -> Option<&str> {
        self.entries.get(&address).map(String::as_str)
    }

    pub fn contains(&self, address: Address) -> bool {
        self.entries.contains_key(&address)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Address, &str)> {
        self.entries.iter().map(|(addr, name)| (*addr, name.as_str()))
    }
}

impl<S: Into<String>> FromIterator<(Address, S)> for SymbolTable {
    fn from_iter<I: IntoIterator<Item = (Address, S)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().map(|(addr, name)| (addr, name.into())).collect() }
    }
}

/// Output of a signature-matching pass: the renamed table plus, for passes
/// that report it, how many functions the matcher flagged as library code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedTable {
    pub table: SymbolTable,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_functions: Option<usize>,
}

impl MatchedTable {
    pub fn new(table: SymbolTable) -> Self {
        Self { table, library_functions: None }
    }

    pub fn with_library_functions(mut self, count: Option<usize>) -> Self {
        self.library_functions = count;
        self
    }
}

/// Identity of a binary in the evaluation corpus.
///
/// Parsed from the artifact path relative to the corpus root, which the build
/// stage lays out as `<toolchain>/<target>/<mode>/<name>`. Paths with a
/// different depth (e.g. `malware/<name>`) only populate `name`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BinaryIdentity {
    /// Relative path string; the sort and report key.
    pub key: String,
    pub toolchain: Option<String>,
    pub target: Option<String>,
    pub build_mode: Option<String>,
    pub name: String,
    /// Artifact the matcher ran on.
    pub stripped: PathBuf,
    /// Unstripped build or debug-info sidecar, when ground truth exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_truth: Option<PathBuf>,
}

impl BinaryIdentity {
    pub fn from_relative(
        relative: &Path,
        stripped: impl Into<PathBuf>,
        ground_truth: Option<PathBuf>,
    ) -> Self {
        let parts: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(os) => Some(os.to_string_lossy().to_string()),
                _ => None,
            })
            .collect();
        let key = parts.join("/");
        let name = parts.last().cloned().unwrap_or_else(|| key.clone());
        let (toolchain, target, build_mode) = if parts.len() == 4 {
            (Some(parts[0].clone()), Some(parts[1].clone()), Some(parts[2].clone()))
        } else {
            (None, None, None)
        };

        Self { key, toolchain, target, build_mode, name, stripped: stripped.into(), ground_truth }
    }

    /// Whether an unstripped counterpart (and therefore a reference table) exists.
    pub fn has_ground_truth(&self) -> bool {
        self.ground_truth.is_some()
    }
}

impl fmt::Display for BinaryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// Outcome of comparing one reference name with the matcher's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Exact recovery (or a pinned alias, or a name for a function the ground truth never named).
    Matched,
    /// Right symbol, different per-instantiation hash.
    DifferentHash,
    /// Several signatures claimed the same bytes; the matcher left a collision marker.
    SigCollision,
    /// Confident but incorrect name.
    Wrong,
    /// The matcher left an address placeholder for a named function.
    Missed,
    /// Ground truth itself is a placeholder.
    Unknown,
}

impl Verdict {
    pub const ALL: [Verdict; 6] = [
        Verdict::Matched,
        Verdict::DifferentHash,
        Verdict::SigCollision,
        Verdict::Wrong,
        Verdict::Missed,
        Verdict::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Matched => "matched",
            Verdict::DifferentHash => "different_hash",
            Verdict::SigCollision => "sig_collision",
            Verdict::Wrong => "wrong",
            Verdict::Missed => "missed",
            Verdict::Unknown => "unknown",
        }
    }

    /// Verdicts that count towards the overall success figure.
    pub fn is_success(self) -> bool {
        matches!(self, Verdict::Matched | Verdict::DifferentHash | Verdict::SigCollision)
    }
}

/// Verdict used when no ground truth exists: only the name's shape is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeVerdict {
    Recovered,
    Unresolved,
}
