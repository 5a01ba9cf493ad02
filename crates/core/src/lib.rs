//! sigeval-core
//!
//! Core library for scoring how well function-signature matching recovers
//! human-meaningful names in stripped native binaries.
//!
//! This crate defines the symbol-table model, the name canonicalizer, the
//! pinned alias table, the per-symbol classifier, per-binary aggregation, the
//! cross-version uniqueness matrix builder, and the file-tree plumbing that
//! feeds them (layout, registry, config, table dumps, reports).
//!
//! All substantive logic lives here so it is fully testable and reusable from
//! multiple frontends; the `sigeval` CLI is a thin driver on top.

pub mod analysis;
pub mod corpus;
pub mod error;
pub mod model;
pub mod names;
pub mod services;
pub mod uniqueness;

pub use error::{EvalError, EvalResult};

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
