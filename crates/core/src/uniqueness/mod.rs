//! Cross-version uniqueness matrix.
//!
//! Every signature set is applied to every binary, one trial at a time, and
//! the number of matched functions is recorded. Binary `i` and signature set
//! `i` (both sorted by path) must share a toolchain version; a mismatch aborts
//! before any row is computed. Each trial runs against a snapshot of the
//! per-binary baseline that is restored afterwards, so no signature set's
//! matches leak into the next trial.

mod arena;

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EvalError, EvalResult};

pub use arena::{ArenaSnapshot, FunctionArena, FunctionSlot};

/// File-name prefix of per-version standard-library signature sets.
pub const SIGNATURE_PREFIX: &str = "rust-std-";

/// Extension of signature set files.
pub const SIGNATURE_EXTENSION: &str = "sig";

/// A signature file and the toolchain version encoded in its name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SignatureSet {
    pub path: PathBuf,
    pub version: String,
}

impl SignatureSet {
    /// `rust-std-1-78-0.sig` declares version `1.78.0`.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path.file_name().map(|f| f.to_string_lossy().to_string()).unwrap_or_default();
        let stem = file_name.strip_prefix(SIGNATURE_PREFIX).unwrap_or(&file_name);
        let stem = stem.strip_suffix(&format!(".{SIGNATURE_EXTENSION}")).unwrap_or(stem);
        let version = stem.replace('-', ".");
        Self { path, version }
    }

    /// File name used to key recorded match counts.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// A stripped binary taking part in the uniqueness run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UniquenessSubject {
    pub path: PathBuf,
    pub version: String,
}

impl UniquenessSubject {
    /// The version is the first path component below the corpus root
    /// (`<root>/<version>/<target>/<mode>/<name>`).
    pub fn from_path(path: impl Into<PathBuf>, corpus_root: &Path) -> Self {
        let path = path.into();
        let version = match path.strip_prefix(corpus_root) {
            Ok(rel) => first_normal_component(rel, 0),
            Err(_) => first_normal_component(&path, 1),
        };
        Self { path, version: version.unwrap_or_default() }
    }

    pub fn key(&self) -> String {
        self.path.to_string_lossy().replace('\\', "/")
    }
}

fn first_normal_component(path: &Path, skip: usize) -> Option<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(os) => Some(os.to_string_lossy().to_string()),
            _ => None,
        })
        .nth(skip)
}

/// Version × signature-set match counts plus per-binary function totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniquenessMatrix {
    pub versions: Vec<String>,
    pub total_functions: Vec<usize>,
    pub matrix: Vec<Vec<usize>>,
}

/// One per-binary analysis state that signature sets can be tried against.
pub trait AnalysisSession {
    type Snapshot;

    /// Function count, excluding import/external-linkage stubs.
    fn total_functions(&self) -> usize;

    fn snapshot(&mut self) -> EvalResult<Self::Snapshot>;

    /// Apply a signature set and return how many functions it matched.
    fn apply_signature_set(&mut self, set: &SignatureSet) -> EvalResult<usize>;

    fn restore(&mut self, snapshot: Self::Snapshot) -> EvalResult<()>;
}

/// Opens fresh analysis sessions for binaries.
pub trait AnalysisHost {
    type Session: AnalysisSession;

    fn open(&self, subject: &UniquenessSubject) -> EvalResult<Self::Session>;
}

/// Verify one-to-one pairing by sort order and return the shared version list.
pub fn check_alignment(
    subjects: &[UniquenessSubject],
    sets: &[SignatureSet],
) -> EvalResult<Vec<String>> {
    if subjects.len() != sets.len() {
        return Err(EvalError::AlignmentLength {
            binaries: subjects.len(),
            signature_sets: sets.len(),
        });
    }
    subjects
        .iter()
        .zip(sets)
        .enumerate()
        .map(|(index, (subject, set))| {
            if subject.version == set.version {
                Ok(subject.version.clone())
            } else {
                Err(EvalError::AlignmentViolation {
                    index,
                    binary_version: subject.version.clone(),
                    signature_version: set.version.clone(),
                })
            }
        })
        .collect()
}

/// Build the full matrix, trying every signature set on every binary in isolation.
pub fn build_matrix<H: AnalysisHost>(
    host: &H,
    subjects: &[UniquenessSubject],
    sets: &[SignatureSet],
) -> EvalResult<UniquenessMatrix> {
    let mut subjects = subjects.to_vec();
    subjects.sort();
    let mut sets = sets.to_vec();
    sets.sort();

    let versions = check_alignment(&subjects, &sets)?;

    let mut total_functions = Vec::with_capacity(subjects.len());
    let mut matrix = Vec::with_capacity(subjects.len());
    for subject in &subjects {
        log::info!("uniqueness: {}", subject.path.display());
        let mut session = host.open(subject)?;
        total_functions.push(session.total_functions());

        let mut row = Vec::with_capacity(sets.len());
        for set in &sets {
            let baseline = session.snapshot()?;
            let count = session.apply_signature_set(set)?;
            session.restore(baseline).map_err(|err| {
                log::error!("rollback failed: {err}");
                EvalError::RollbackFailed {
                    binary: subject.key(),
                    signature_set: set.name(),
                }
            })?;
            log::debug!("{} {} -> {}", subject.key(), set.name(), count);
            row.push(count);
        }
        matrix.push(row);
    }

    Ok(UniquenessMatrix { versions, total_functions, matrix })
}

/// Match counts reported by the external matcher, keyed by binary path and
/// signature-set file name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniquenessCounts {
    pub total_functions: BTreeMap<String, usize>,
    #[serde(default)]
    pub import_stubs: BTreeMap<String, usize>,
    pub matches: BTreeMap<String, BTreeMap<String, usize>>,
}

impl UniquenessCounts {
    pub fn load(path: &Path) -> EvalResult<Self> {
        if !path.is_file() {
            return Err(EvalError::MissingArtifact { path: path.to_path_buf() });
        }
        let body = std::fs::read_to_string(path)
            .map_err(|source| EvalError::Io { path: path.to_path_buf(), source })?;
        serde_json::from_str(&body)
            .map_err(|source| EvalError::Json { path: path.to_path_buf(), source })
    }
}

/// Host whose sessions replay recorded match counts over a `FunctionArena`.
#[derive(Debug, Clone)]
pub struct RecordedHost {
    counts: UniquenessCounts,
}

impl RecordedHost {
    pub fn new(counts: UniquenessCounts) -> Self {
        Self { counts }
    }
}

/// Session backed by one binary's arena and its recorded counts.
#[derive(Debug)]
pub struct RecordedSession {
    binary: String,
    arena: FunctionArena,
    matches: BTreeMap<String, usize>,
}

impl AnalysisHost for RecordedHost {
    type Session = RecordedSession;

    fn open(&self, subject: &UniquenessSubject) -> EvalResult<RecordedSession> {
        let key = subject.key();
        let total = *self
            .counts
            .total_functions
            .get(&key)
            .ok_or_else(|| EvalError::MissingArtifact { path: subject.path.clone() })?;
        let imports = self.counts.import_stubs.get(&key).copied().unwrap_or(0);
        let matches = self.counts.matches.get(&key).cloned().unwrap_or_default();
        Ok(RecordedSession { binary: key, arena: FunctionArena::new(total, imports), matches })
    }
}

impl AnalysisSession for RecordedSession {
    type Snapshot = ArenaSnapshot;

    fn total_functions(&self) -> usize {
        self.arena.total_functions()
    }

    fn snapshot(&mut self) -> EvalResult<ArenaSnapshot> {
        Ok(self.arena.snapshot())
    }

    fn apply_signature_set(&mut self, set: &SignatureSet) -> EvalResult<usize> {
        let name = set.name();
        let recorded = *self.matches.get(&name).ok_or_else(|| EvalError::MissingRecording {
            binary: self.binary.clone(),
            signature_set: name.clone(),
        })?;
        let total = self.arena.total_functions();
        if recorded > total {
            return Err(EvalError::InvalidRecording {
                binary: self.binary.clone(),
                signature_set: name,
                matched: recorded,
                total,
            });
        }
        // A short claim means an earlier trial left functions claimed.
        if self.arena.claim(&name, recorded) != recorded {
            return Err(EvalError::RollbackFailed { binary: self.binary.clone(), signature_set: name });
        }
        Ok(recorded)
    }

    fn restore(&mut self, snapshot: ArenaSnapshot) -> EvalResult<()> {
        self.arena.restore(snapshot).map_err(|_| EvalError::RollbackFailed {
            binary: self.binary.clone(),
            signature_set: String::new(),
        })
    }
}
