use serde::{Deserialize, Serialize};

use crate::model::{Address, ShapeVerdict, SymbolTable, Verdict};
use crate::names::{canonicalize, is_collision_placeholder, is_placeholder, surface_form, AliasTable};

/// Verdict for one address, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolVerdict {
    pub address: Address,
    pub real_name: String,
    pub matched_name: String,
    pub verdict: Verdict,
}

/// Compares reference names with matcher names.
///
/// Holds only a borrowed alias table; classification is pure.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    aliases: &'a AliasTable,
}

impl<'a> Classifier<'a> {
    pub fn new(aliases: &'a AliasTable) -> Self {
        Self { aliases }
    }

    pub fn aliases(&self) -> &'a AliasTable {
        self.aliases
    }

    /// Classify one pair. First matching rule wins:
    /// 1. both placeholders -> `Unknown`
    /// 2. same full form, `__`-prefixed alias, newly named placeholder, or pinned alias -> `Matched`
    /// 3. same hash-agnostic form -> `DifferentHash`
    /// 4. collision marker -> `SigCollision`
    /// 5. matcher left a placeholder -> `Missed`
    /// 6. otherwise -> `Wrong`
    pub fn classify(&self, real_name: &str, matched_name: &str) -> Verdict {
        let real = surface_form(real_name);
        let matched = surface_form(matched_name);

        // Shape only; the digits of the two placeholders are not compared.
        if is_placeholder(real) && is_placeholder(matched) {
            return Verdict::Unknown;
        }

        let real_canon = canonicalize(real_name);
        let matched_canon = canonicalize(matched_name);

        if real_canon.full == matched_canon.full
            || format!("__{}", real_canon.full) == matched_canon.full
            || (is_placeholder(real) && !is_placeholder(matched))
            || self.aliases.contains(real_name, matched_name)
        {
            Verdict::Matched
        } else if real_canon.hash_agnostic == matched_canon.hash_agnostic {
            Verdict::DifferentHash
        } else if is_collision_placeholder(matched) {
            Verdict::SigCollision
        } else if is_placeholder(matched) {
            Verdict::Missed
        } else {
            Verdict::Wrong
        }
    }

    /// Judge a matched name without ground truth: anything but a placeholder counts.
    pub fn classify_shape(&self, matched_name: &str) -> ShapeVerdict {
        if is_placeholder(surface_form(matched_name)) {
            ShapeVerdict::Unresolved
        } else {
            ShapeVerdict::Recovered
        }
    }

    /// Classify every reference address that the matcher also reported.
    pub fn classify_tables(
        &self,
        reference: &SymbolTable,
        matched: &SymbolTable,
    ) -> Vec<SymbolVerdict> {
        reference
            .iter()
            .filter_map(|(address, real_name)| {
                matched.get(address).map(|matched_name| SymbolVerdict {
                    address,
                    real_name: real_name.to_string(),
                    matched_name: matched_name.to_string(),
                    verdict: self.classify(real_name, matched_name),
                })
            })
            .collect()
    }
}
