pub mod engine;
pub mod graph;
pub mod model;
pub mod resolver;
pub mod scanner;

pub use engine::{AnalysisEngine, CachePolicy, EngineConfig};
pub use graph::{DependencyGraph, GraphBuilder, GraphNode};
pub use model::{
    Analysis, ComplexityScore, ComponentGroup, Declaration, DeclarationKind, Diagnostic,
    DiagnosticKind, EngineError, Extraction, InputFile, Language, OrphanedExport, Recommendation,
    Reference, ResolvedEdge, SourceFile, Target,
};
pub use resolver::PathResolver;
pub use scanner::FileScanner;
