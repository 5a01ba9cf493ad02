pub mod evaluate;
pub mod extract;

pub use evaluate::{evaluate_binary, BinaryEvaluation};
pub use extract::{
    default_extractor_registry, DumpFileExtractor, ExtractionPass, ExtractorRegistry,
    SymbolExtractor,
};
