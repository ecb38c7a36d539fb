use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Languages the engine knows how to extract symbols from.
///
/// TypeScript, JavaScript, Python and Rust are parsed structurally via
/// tree-sitter; the remaining languages go through the line-oriented
/// pattern extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    TypeScript,
    JavaScript,
    Python,
    Rust,
    Java,
    CSharp,
    Go,
    Cpp,
}

impl Language {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "ts" | "tsx" => Some(Language::TypeScript),
            "js" | "jsx" | "mjs" => Some(Language::JavaScript),
            "py" | "pyi" | "pyw" => Some(Language::Python),
            "rs" => Some(Language::Rust),
            "java" => Some(Language::Java),
            "cs" => Some(Language::CSharp),
            "go" => Some(Language::Go),
            "cpp" | "cxx" | "cc" | "hpp" | "hh" => Some(Language::Cpp),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "typescript" => Some(Language::TypeScript),
            "javascript" => Some(Language::JavaScript),
            "python" => Some(Language::Python),
            "rust" => Some(Language::Rust),
            "java" => Some(Language::Java),
            "csharp" | "c#" => Some(Language::CSharp),
            "go" => Some(Language::Go),
            "cpp" | "c++" => Some(Language::Cpp),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::TypeScript => "typescript",
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Rust => "rust",
            Language::Java => "java",
            Language::CSharp => "csharp",
            Language::Go => "go",
            Language::Cpp => "cpp",
        }
    }

    /// File extensions this language claims during discovery.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::TypeScript => &["ts", "tsx"],
            Language::JavaScript => &["js", "jsx", "mjs"],
            Language::Python => &["py", "pyi", "pyw"],
            Language::Rust => &["rs"],
            Language::Java => &["java"],
            Language::CSharp => &["cs"],
            Language::Go => &["go"],
            Language::Cpp => &["cpp", "cxx", "cc", "hpp", "hh"],
        }
    }
}

/// One source file supplied to the engine, identified by its canonical path
/// (workspace-relative, forward-slash normalized).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    pub language: Language,
    pub size: u64,
}

/// Engine input triple. The caller owns file discovery; the engine never
/// touches the filesystem after these are handed over.
#[derive(Debug, Clone)]
pub struct InputFile {
    pub path: String,
    pub language: Language,
    pub content: String,
}

impl InputFile {
    pub fn new(path: impl Into<String>, language: Language, content: impl Into<String>) -> Self {
        Self {
            path: canonical_path(&path.into()),
            language,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Class,
    Function,
    Interface,
    Type,
    Const,
    Variable,
    Unknown,
}

/// A named, exported symbol owned by exactly one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
    pub file: String,
    /// 1-based source line; `None` when the extractor cannot attribute one
    /// confidently. Consumers treat a missing line as unknown, not line 0.
    pub line: Option<u32>,
}

impl Declaration {
    pub fn new(name: impl Into<String>, kind: DeclarationKind, file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            file: file.into(),
            line: None,
        }
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }
}

/// One import/usage edge originating in a file. An import statement that
/// names several symbols yields one `Reference` per symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub imported_name: String,
    /// The specifier exactly as written: `./foo`, `os`, `com.acme.Bar`, ...
    pub raw_specifier: String,
    pub file: String,
    pub line: Option<u32>,
}

impl Reference {
    pub fn new(
        imported_name: impl Into<String>,
        raw_specifier: impl Into<String>,
        file: impl Into<String>,
    ) -> Self {
        Self {
            imported_name: imported_name.into(),
            raw_specifier: raw_specifier.into(),
            file: file.into(),
            line: None,
        }
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }
}

/// Per-file extraction result: everything one file declares and references.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub declarations: Vec<Declaration>,
    pub references: Vec<Reference>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.references.is_empty()
    }
}

/// Outcome of resolving a raw specifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Target {
    /// Canonical path of a file inside the analyzed set.
    Internal(String),
    /// Package or namespace outside the analyzed set.
    External(String),
}

/// A reference after resolution to an internal file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEdge {
    pub source: String,
    pub target: String,
    pub reference: Reference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    Ok,
    ConsiderRefactor,
    Refactor,
}

/// Per-file complexity subscores derived from graph topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityScore {
    pub file: String,
    /// Bounded count of distinct internal outbound targets, 0..=3.
    pub coupling: u8,
    /// Bounded count of distinct internal dependents, 0..=3.
    pub impact: u8,
    /// Heuristic proxy from declaration and edge counts, 0..=4.
    pub volatility: u8,
    /// coupling + impact + volatility, 0..=10.
    pub total: u8,
    pub recommendation: Recommendation,
}

/// A declaration no resolved internal reference ever names, surviving the
/// allowlist filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanedExport {
    pub file: String,
    pub name: String,
    pub kind: DeclarationKind,
    pub reason: String,
}

/// Advisory cluster of files sharing a path boundary. Presentation aid only;
/// never an input to scoring or dead-code detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentGroup {
    pub name: String,
    pub description: String,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    ExtractionFailure,
    ResolutionAmbiguity,
    UnsupportedLanguage,
}

/// Non-fatal problem surfaced alongside normal output. The engine never
/// raises for per-file or per-edge trouble; callers decide whether to warn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn extraction_failure(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::ExtractionFailure,
            file: Some(file.into()),
            message: message.into(),
        }
    }

    pub fn resolution_ambiguity(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::ResolutionAmbiguity,
            file: Some(file.into()),
            message: message.into(),
        }
    }

    pub fn unsupported_language(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::UnsupportedLanguage,
            file: Some(file.into()),
            message: message.into(),
        }
    }
}

/// Serializable view of the dependency graph: the internal edge list plus
/// the tally of external packages referenced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphExport {
    pub edges: Vec<ResolvedEdge>,
    pub external_packages: BTreeMap<String, usize>,
}

/// Complete engine output for one run. Every vector is deterministically
/// sorted so identical input serializes byte-identically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub files: Vec<SourceFile>,
    pub graph: GraphExport,
    pub scores: Vec<ComplexityScore>,
    pub orphaned_exports: Vec<OrphanedExport>,
    pub components: Vec<ComponentGroup>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to load tree-sitter grammar for {language}: {source}")]
    Grammar {
        language: &'static str,
        #[source]
        source: tree_sitter::LanguageError,
    },
    #[error("no extractor registered for language '{0}'")]
    UnsupportedLanguage(String),
}

/// Normalizes a path into the canonical node-key form: forward slashes,
/// no leading `./`.
pub fn canonical_path(path: &str) -> String {
    let slashed = path.replace('\\', "/");
    let trimmed = slashed.strip_prefix("./").unwrap_or(&slashed);
    trimmed.to_string()
}

/// Strips a known source-file extension, leaving the extension-normalized
/// identity the resolver matches against.
pub fn strip_extension(path: &str) -> &str {
    match path.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && Language::from_extension(ext).is_some() => stem,
        Some((stem, "json")) if !stem.is_empty() => stem,
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_path_normalizes_separators_and_prefix() {
        assert_eq!(canonical_path("./src\\core\\mod.rs"), "src/core/mod.rs");
        assert_eq!(canonical_path("src/a.ts"), "src/a.ts");
    }

    #[test]
    fn strip_extension_only_removes_known_extensions() {
        assert_eq!(strip_extension("src/a.ts"), "src/a");
        assert_eq!(strip_extension("pkg/util.py"), "pkg/util");
        assert_eq!(strip_extension("data/config.json"), "data/config");
        assert_eq!(strip_extension("Makefile"), "Makefile");
        assert_eq!(strip_extension("archive.tar"), "archive.tar");
    }

    #[test]
    fn language_detection_by_extension() {
        assert_eq!(Language::from_extension("tsx"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("go"), Some(Language::Go));
        assert_eq!(Language::from_extension("md"), None);
    }
}
