pub mod cache;
pub mod common;
pub mod javascript;
pub mod pattern;
pub mod python;
pub mod rust_lang;
pub mod typescript;

use crate::core::model::{Diagnostic, EngineError, Extraction, Language};

/// Per-language extraction strategy.
///
/// `extract` never fails for malformed input: a file the extractor cannot
/// make sense of yields an empty extraction plus an `ExtractionFailure`
/// diagnostic, and the run continues.
pub trait Extractor {
    fn extract(&mut self, path: &str, content: &str) -> (Extraction, Vec<Diagnostic>);
    fn language(&self) -> Language;
}

/// Strategy table keyed by language, resolved once per file.
pub struct ExtractorFactory;

impl ExtractorFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn extractor_for(
        &self,
        language: Language,
    ) -> Result<Box<dyn Extractor + Send>, EngineError> {
        match language {
            Language::TypeScript => Ok(Box::new(typescript::TypeScriptExtractor::new()?)),
            Language::JavaScript => Ok(Box::new(javascript::JavaScriptExtractor::new()?)),
            Language::Python => Ok(Box::new(python::PythonExtractor::new()?)),
            Language::Rust => Ok(Box::new(rust_lang::RustExtractor::new()?)),
            Language::Java | Language::CSharp | Language::Go | Language::Cpp => {
                Ok(Box::new(pattern::PatternExtractor::new(language)))
            }
        }
    }
}

impl Default for ExtractorFactory {
    fn default() -> Self {
        Self::new()
    }
}
