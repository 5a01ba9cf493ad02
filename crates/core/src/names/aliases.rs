use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::names::{canonicalize, surface_form};

/// Pinned `(real_name, matched_name)` pairs that name the same symbol.
///
/// Startup symbols are aliased by the loader, allocator shims are too small to
/// be in a signature library but the disassembler names their `j_` thunks
/// after the jump target, and a few lang items are linked under their bare
/// name.
pub const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("_start", "start"),
    ("mainCRTStartup", "start"),
    // Linux allocator thunks
    ("__rust_alloc", "j___rdl_alloc"),
    ("__rust_dealloc", "j___rdl_dealloc"),
    ("__rust_realloc", "j___rdl_realloc"),
    ("__rust_alloc_zeroed", "j___rdl_alloc_zeroed"),
    ("__rust_alloc_error_handler", "j___rg_oom"),
    ("_alloca_probe", "__alloca_probe"),
    ("rust_alloc_zeroed", "j___rdl_alloc_zeroed"),
    // MSVC allocator thunks
    ("rust_alloc", "j___rdl_alloc"),
    ("rust_dealloc", "j___rdl_dealloc"),
    ("rust_realloc", "j___rdl_realloc"),
    ("rust_alloc_error_handler", "j___rg_oom"),
    // Lang items with special linkage
    ("std::alloc::__default_lib_allocator::__rdl_alloc", "__rdl_alloc"),
    ("std::alloc::__default_lib_allocator::__rdl_dealloc", "__rdl_dealloc"),
    ("std::alloc::__default_lib_allocator::__rdl_realloc", "__rdl_realloc"),
    ("std::alloc::__default_lib_allocator::__rdl_alloc_zeroed", "__rdl_alloc_zeroed"),
    ("std::panicking::rust_panic", "rust_panic"),
    ("std::sys::personality::gcc::rust_eh_personality", "rust_eh_personality"),
    ("std::alloc::_::__rg_oom", "__rg_oom"),
    ("panic_unwind::__rust_panic_cleanup", "__rust_panic_cleanup"),
    ("panic_unwind::__rust_start_panic", "__rust_start_panic"),
];

/// One pinned alias pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AliasEntry {
    pub real_name: String,
    pub matched_name: String,
}

impl AliasEntry {
    pub fn new(real_name: impl Into<String>, matched_name: impl Into<String>) -> Self {
        Self { real_name: real_name.into(), matched_name: matched_name.into() }
    }
}

/// Immutable lookup of pinned alias pairs.
///
/// Built once before evaluation and shared by reference with the classifier.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    pairs: HashSet<(String, String)>,
}

impl AliasTable {
    /// A table with no pinned pairs.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in pairs.
    pub fn builtin() -> Self {
        Self::empty().with_entries(
            BUILTIN_ALIASES.iter().map(|(real, matched)| AliasEntry::new(*real, *matched)),
        )
    }

    /// Builder-style helper to add extra pairs (e.g. from config) at construction time.
    pub fn with_entries(mut self, entries: impl IntoIterator<Item = AliasEntry>) -> Self {
        self.pairs.extend(entries.into_iter().map(|e| (e.real_name, e.matched_name)));
        self
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn has(&self, real: &str, matched: &str) -> bool {
        self.pairs.contains(&(real.to_string(), matched.to_string()))
    }

    /// True if the pair is pinned in raw, surface-normalized, or demangled form.
    pub fn contains(&self, real_name: &str, matched_name: &str) -> bool {
        self.has(real_name, matched_name)
            || self.has(surface_form(real_name), surface_form(matched_name))
            || self.has(&canonicalize(real_name).full, &canonicalize(matched_name).full)
    }

    /// Sorted entries, for listing.
    pub fn entries(&self) -> Vec<AliasEntry> {
        let mut entries: Vec<AliasEntry> =
            self.pairs.iter().map(|(r, m)| AliasEntry::new(r.clone(), m.clone())).collect();
        entries.sort_by(|a, b| {
            a.real_name.cmp(&b.real_name).then_with(|| a.matched_name.cmp(&b.matched_name))
        });
        entries
    }
}
