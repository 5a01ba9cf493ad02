use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::corpus::{load_table_dump, EvaluationLayout, EvaluationMode};
use crate::error::EvalResult;
use crate::model::MatchedTable;

/// Which table to extract for a binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionPass {
    /// Ground-truth names from the unstripped build.
    Reference,
    /// Names proposed by signature matching on the stripped build.
    Matched,
}

/// Synchronous source of address→name tables.
///
/// A live disassembler is one possible implementation; the in-tree one reads
/// dumps a disassembler already wrote.
pub trait SymbolExtractor: Send + Sync {
    fn extract_symbols(&self, binary: &Path, pass: ExtractionPass) -> EvalResult<MatchedTable>;
    fn name(&self) -> &'static str;

    /// File the table is read from, for extractors backed by files.
    fn source_path(&self, _binary: &Path, _pass: ExtractionPass) -> Option<PathBuf> {
        None
    }
}

/// Reads `<evaluation>/<binary>.reference` and `<evaluation>/<binary>.<matched suffix>`.
#[derive(Debug, Clone)]
pub struct DumpFileExtractor {
    layout: EvaluationLayout,
    matched_suffix: String,
}

impl DumpFileExtractor {
    pub fn new(layout: EvaluationLayout, matched_suffix: impl Into<String>) -> Self {
        Self { layout, matched_suffix: matched_suffix.into() }
    }

    pub fn for_mode(layout: EvaluationLayout, mode: EvaluationMode) -> Self {
        Self::new(layout, mode.matched_suffix())
    }

    /// Where the dump for `binary` and `pass` lives.
    pub fn dump_path(&self, binary: &Path, pass: ExtractionPass) -> PathBuf {
        let suffix = match pass {
            ExtractionPass::Reference => "reference",
            ExtractionPass::Matched => self.matched_suffix.as_str(),
        };
        self.layout.dump_path(binary, suffix)
    }
}

impl SymbolExtractor for DumpFileExtractor {
    fn extract_symbols(&self, binary: &Path, pass: ExtractionPass) -> EvalResult<MatchedTable> {
        load_table_dump(&self.dump_path(binary, pass))
    }

    fn name(&self) -> &'static str {
        "dump"
    }

    fn source_path(&self, binary: &Path, pass: ExtractionPass) -> Option<PathBuf> {
        Some(self.dump_path(binary, pass))
    }
}

/// Registry for extractors; callers select by name.
#[derive(Default)]
pub struct ExtractorRegistry {
    extractors: HashMap<String, Box<dyn SymbolExtractor>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self { extractors: HashMap::new() }
    }

    pub fn register_as<E: SymbolExtractor + 'static>(
        &mut self,
        name: impl Into<String>,
        extractor: E,
    ) -> &mut Self {
        self.extractors.insert(name.into(), Box::new(extractor));
        self
    }

    pub fn register<E: SymbolExtractor + 'static>(&mut self, extractor: E) -> &mut Self {
        let name = extractor.name().to_string();
        self.register_as(name, extractor)
    }

    pub fn get(&self, name: &str) -> Option<&dyn SymbolExtractor> {
        self.extractors.get(name).map(|e| &**e)
    }

    /// Return a sorted list of registered extractor names for error messages/help.
    pub fn names(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.extractors.keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// Registry with one dump extractor per evaluation mode, named after the mode.
pub fn default_extractor_registry(layout: &EvaluationLayout) -> ExtractorRegistry {
    let mut registry = ExtractorRegistry::new();
    for mode in [EvaluationMode::GroundTruth, EvaluationMode::Crates, EvaluationMode::NoReference]
    {
        registry.register_as(mode.as_str(), DumpFileExtractor::for_mode(layout.clone(), mode));
    }
    registry
}
