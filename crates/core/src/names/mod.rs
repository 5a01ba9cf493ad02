//! Name canonicalization.
//!
//! Reference tables and matcher output name the same function in different
//! ways: the disassembler appends `_N` to duplicate names, platforms disagree
//! on leading underscores, names arrive mangled under either the Rust (legacy
//! or v0) or the MSVC scheme, and 32-bit x86 adds `@N` decorations. This module
//! folds all of that into two comparable forms:
//! - `full`: the demangled name including any per-instantiation hash.
//! - `hash_agnostic`: the same name with the hash dropped.
//!
//! Canonicalization is total: anything that cannot be parsed passes through
//! unchanged as both forms.

pub mod aliases;

use msvc_demangler::DemangleFlags;
use serde::{Deserialize, Serialize};

pub use aliases::{AliasEntry, AliasTable, BUILTIN_ALIASES};

/// Prefix of the disassembler's address-derived placeholder names.
pub const PLACEHOLDER_PREFIX: &str = "sub_";

/// Prefix of the placeholder used when several signatures claim the same bytes.
pub const COLLISION_PREFIX: &str = "unknown_libname_";

/// Mangling scheme detected for a (surface-normalized) name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManglingScheme {
    Msvc,
    RustLegacy,
    RustV0,
    /// Already demangled, a C symbol, or a placeholder.
    Unmangled,
}

/// Both comparable forms of a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalName {
    pub full: String,
    pub hash_agnostic: String,
    pub scheme: ManglingScheme,
}

/// True for `sub_…` names.
pub fn is_placeholder(name: &str) -> bool {
    name.starts_with(PLACEHOLDER_PREFIX)
}

/// True for `unknown_libname_…` names.
pub fn is_collision_placeholder(name: &str) -> bool {
    name.starts_with(COLLISION_PREFIX)
}

/// Exact `sub_<hex>` or `unknown_libname_<digits>`, whose trailing digits are
/// the address/ordinal and must survive duplicate-suffix stripping.
pub fn is_reserved_placeholder(name: &str) -> bool {
    if let Some(rest) = name.strip_prefix(PLACEHOLDER_PREFIX) {
        !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_hexdigit())
    } else if let Some(rest) = name.strip_prefix(COLLISION_PREFIX) {
        !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit())
    } else {
        false
    }
}

fn strip_numeric_suffix(name: &str, separator: char) -> Option<&str> {
    let pos = name.rfind(separator)?;
    let digits = &name[pos + separator.len_utf8()..];
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Some(&name[..pos])
    } else {
        None
    }
}

/// Demangled paths (`a::b_12`) carry real digits and are never suffix-stripped.
fn is_demangled_path(name: &str) -> bool {
    name.contains("::")
}

/// Remove disassembler-added `_N` duplicate suffixes.
pub fn strip_duplicate_suffix(mut name: &str) -> &str {
    if is_demangled_path(name) {
        return name;
    }
    // Renaming an already-suffixed duplicate chains groups (`foo_0_1`); drop them all.
    while !is_reserved_placeholder(name) {
        match strip_numeric_suffix(name, '_') {
            Some(head) => name = head,
            None => break,
        }
    }
    name
}

/// Remove a trailing `@N` calling-convention decoration.
pub fn strip_arch_suffix(name: &str) -> &str {
    strip_numeric_suffix(name, '@').unwrap_or(name)
}

/// Steps that precede demangling: duplicate suffix, then edge underscores.
pub fn surface_form(name: &str) -> &str {
    strip_duplicate_suffix(name).trim_matches('_')
}

/// Apply every raw-name normalization until nothing changes.
fn settle_raw(mut name: &str) -> &str {
    loop {
        let next = strip_arch_suffix(surface_form(name));
        if next == name {
            return name;
        }
        name = next;
    }
}

/// Normalize demangler output: edge underscores and `@N` only.
fn settle_demangled(mut name: &str) -> &str {
    loop {
        let next = strip_arch_suffix(name.trim_matches('_'));
        if next == name {
            return name;
        }
        name = next;
    }
}

/// Decide which demangler applies to an already surface-normalized name.
pub fn detect_scheme(name: &str) -> ManglingScheme {
    if name.starts_with('?') {
        return ManglingScheme::Msvc;
    }
    match rustc_demangle::try_demangle(name) {
        Ok(_) if name.trim_start_matches('_').starts_with('R') => ManglingScheme::RustV0,
        Ok(_) => ManglingScheme::RustLegacy,
        Err(_) => ManglingScheme::Unmangled,
    }
}

fn demangle_msvc(name: &str) -> Option<String> {
    let flags = DemangleFlags::llvm() | DemangleFlags::NAME_ONLY;
    msvc_demangler::demangle(name, flags).ok()
}

/// Canonicalize a raw table name into its full and hash-agnostic forms.
pub fn canonicalize(raw: &str) -> CanonicalName {
    let surface = surface_form(raw);
    let scheme = detect_scheme(surface);

    let demangled = match scheme {
        ManglingScheme::Msvc => demangle_msvc(surface).map(|d| (d.clone(), d)),
        ManglingScheme::RustLegacy | ManglingScheme::RustV0 => rustc_demangle::try_demangle(surface)
            .ok()
            .map(|d| (format!("{d}"), format!("{d:#}"))),
        ManglingScheme::Unmangled => None,
    };

    match demangled {
        Some((full, hash_agnostic)) => CanonicalName {
            full: settle_demangled(&full).to_string(),
            hash_agnostic: settle_demangled(&hash_agnostic).to_string(),
            scheme,
        },
        None => {
            let name = settle_raw(surface).to_string();
            CanonicalName { full: name.clone(), hash_agnostic: name, scheme: ManglingScheme::Unmangled }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_suffix_keeps_placeholder_digits() {
        assert_eq!(strip_duplicate_suffix("sub_401000"), "sub_401000");
        assert_eq!(strip_duplicate_suffix("unknown_libname_42"), "unknown_libname_42");
        assert_eq!(strip_duplicate_suffix("sub_401000_3"), "sub_401000");
        assert_eq!(strip_duplicate_suffix("memcpy_0"), "memcpy");
        assert_eq!(strip_duplicate_suffix("fmt_u64"), "fmt_u64");
        assert_eq!(strip_duplicate_suffix("foo_128_1"), "foo");
        assert_eq!(strip_duplicate_suffix("test::foo_12"), "test::foo_12");
    }

    #[test]
    fn arch_suffix_only_strips_digits() {
        assert_eq!(strip_arch_suffix("foo@12"), "foo");
        assert_eq!(strip_arch_suffix("foo@bar"), "foo@bar");
    }

    #[test]
    fn msvc_names_take_the_msvc_path() {
        assert_eq!(detect_scheme("?foo@@YAXXZ"), ManglingScheme::Msvc);
        let canon = canonicalize("?foo@@YAXXZ");
        assert_eq!(canon.full, canon.hash_agnostic);
        assert!(canon.full.contains("foo"));
    }
}
