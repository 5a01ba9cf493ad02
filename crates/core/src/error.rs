use std::path::PathBuf;

use thiserror::Error;

/// Error type for evaluation runs.
///
/// Canonicalization and classification never fail; only missing inputs,
/// malformed dumps, and the uniqueness builder's alignment/rollback checks
/// surface here.
#[derive(Debug, Error)]
pub enum EvalError {
    /// A required table, sidecar, or registry file is absent.
    ///
    /// Fatal for the affected binary only; drivers skip it and continue.
    #[error("Missing artifact: {path}")]
    MissingArtifact { path: PathBuf },

    /// Binaries and signature sets do not pair up one-to-one by toolchain version.
    #[error(
        "Alignment violation at index {index}: binary version '{binary_version}' does not match signature set version '{signature_version}'"
    )]
    AlignmentViolation { index: usize, binary_version: String, signature_version: String },

    /// Binary and signature-set lists have different lengths.
    #[error("Alignment violation: {binaries} binaries but {signature_sets} signature sets")]
    AlignmentLength { binaries: usize, signature_sets: usize },

    /// Reverting a signature-set trial to the per-binary baseline failed.
    #[error("Failed to restore baseline for {binary} after applying {signature_set}")]
    RollbackFailed { binary: String, signature_set: String },

    /// No recorded match count exists for a (binary, signature set) pair.
    #[error("No recorded match count for {binary} with signature set {signature_set}")]
    MissingRecording { binary: String, signature_set: String },

    /// A recorded match count exceeds the binary's non-import functions.
    #[error(
        "Recorded {matched} matches for {binary} with signature set {signature_set}, but it has only {total} functions"
    )]
    InvalidRecording { binary: String, signature_set: String, matched: usize, total: usize },

    /// A table dump could not be interpreted.
    #[error("Malformed table at {path}: {reason}")]
    MalformedTable { path: PathBuf, reason: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl EvalError {
    /// True for errors that invalidate the whole run rather than one binary.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EvalError::AlignmentViolation { .. }
                | EvalError::AlignmentLength { .. }
                | EvalError::RollbackFailed { .. }
        )
    }
}

/// Convenience result type for evaluation operations.
pub type EvalResult<T> = Result<T, EvalError>;
