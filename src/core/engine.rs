use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

use super::graph::GraphBuilder;
use super::model::{
    canonical_path, Analysis, Declaration, Diagnostic, EngineError, Extraction, InputFile,
    SourceFile,
};
use super::resolver::PathResolver;
use crate::analysis::{ComplexityScorer, ComponentMapper, DeadCodeDetector};
use crate::extract::cache::ExtractionCache;
use crate::extract::ExtractorFactory;

/// Where extraction results may be cached between runs.
#[derive(Debug, Clone, Default)]
pub enum CachePolicy {
    /// Every run extracts from scratch.
    #[default]
    Disabled,
    /// Process-lifetime memory cache only.
    Memory,
    /// Memory cache plus a best-effort disk tier (default temp location
    /// when `None`).
    Disk(Option<PathBuf>),
}

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Worker threads for the extraction stage; `None` uses the global
    /// rayon pool.
    pub concurrency: Option<usize>,
    pub cache: CachePolicy,
}

/// The analysis pipeline.
///
/// Stage 1 extracts each file in parallel with no shared mutable state.
/// Stage 2 builds the dependency graph in a single-threaded reduction.
/// Stage 3 runs the scorer, dead-code detector and component mapper
/// concurrently, read-only over the frozen graph. Per-file problems become
/// diagnostics; nothing in the pipeline aborts the run.
pub struct AnalysisEngine {
    factory: ExtractorFactory,
    cache: Option<ExtractionCache>,
    concurrency: Option<usize>,
}

impl AnalysisEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let cache = match config.cache {
            CachePolicy::Disabled => None,
            CachePolicy::Memory => Some(ExtractionCache::in_memory_only()),
            CachePolicy::Disk(dir) => Some(ExtractionCache::new(dir)),
        };
        Self {
            factory: ExtractorFactory::new(),
            cache,
            concurrency: config.concurrency,
        }
    }

    pub fn analyze(&self, files: Vec<InputFile>) -> Analysis {
        self.analyze_with_cancel(files, &AtomicBool::new(false))
    }

    /// Full pipeline with a caller-supplied cancellation signal, checked
    /// between files during extraction (never inside a single parse).
    /// Cancelled files contribute a node but no extraction.
    pub fn analyze_with_cancel(&self, files: Vec<InputFile>, cancel: &AtomicBool) -> Analysis {
        let inputs = Self::normalize_inputs(files);
        if inputs.is_empty() {
            return Analysis::default();
        }

        // Stage 1: parallel extraction.
        let results = self.extract_all(&inputs, cancel);

        let mut source_files = Vec::with_capacity(inputs.len());
        let mut extractions: HashMap<String, Extraction> = HashMap::with_capacity(inputs.len());
        let mut diagnostics = Vec::new();
        for (input, (extraction, diags)) in inputs.iter().zip(results) {
            source_files.push(SourceFile {
                path: input.path.clone(),
                language: input.language,
                size: input.content.len() as u64,
            });
            diagnostics.extend(diags);
            if let Some(extraction) = extraction {
                extractions.insert(input.path.clone(), extraction);
            }
        }

        // Stage 2: single-threaded graph reduction.
        let resolver = PathResolver::new(&source_files);
        let (graph, resolution_diagnostics) =
            GraphBuilder::build(&source_files, &extractions, &resolver);
        diagnostics.extend(resolution_diagnostics);
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "dependency graph frozen"
        );

        let mut declarations: Vec<Declaration> = extractions
            .values()
            .flat_map(|e| e.declarations.iter().cloned())
            .collect();
        declarations.sort_by(|a, b| (&a.file, &a.name, a.line).cmp(&(&b.file, &b.name, b.line)));

        // Stage 3: read-only analyzers over the frozen graph.
        let (scores, (orphaned_exports, components)) = rayon::join(
            || ComplexityScorer::score(&graph),
            || {
                rayon::join(
                    || DeadCodeDetector::detect(&graph, &declarations),
                    || ComponentMapper::group(&source_files),
                )
            },
        );

        diagnostics.sort_by(|a, b| (&a.file, &a.message).cmp(&(&b.file, &b.message)));

        Analysis {
            files: source_files,
            graph: graph.export(),
            scores,
            orphaned_exports,
            components,
            diagnostics,
        }
    }

    /// Canonicalizes paths, drops duplicates, and fixes the processing
    /// order so output is independent of input ordering.
    fn normalize_inputs(files: Vec<InputFile>) -> Vec<InputFile> {
        let mut seen = HashSet::new();
        let mut inputs: Vec<InputFile> = files
            .into_iter()
            .map(|mut f| {
                f.path = canonical_path(&f.path);
                f
            })
            .filter(|f| seen.insert(f.path.clone()))
            .collect();
        inputs.sort_by(|a, b| a.path.cmp(&b.path));
        inputs
    }

    fn extract_all(
        &self,
        inputs: &[InputFile],
        cancel: &AtomicBool,
    ) -> Vec<(Option<Extraction>, Vec<Diagnostic>)> {
        let run = || {
            inputs
                .par_iter()
                .map(|input| self.extract_one(input, cancel))
                .collect()
        };

        match self.concurrency {
            Some(threads) => match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(run),
                Err(err) => {
                    warn!(%err, "bounded pool unavailable; using global pool");
                    run()
                }
            },
            None => run(),
        }
    }

    fn extract_one(
        &self,
        input: &InputFile,
        cancel: &AtomicBool,
    ) -> (Option<Extraction>, Vec<Diagnostic>) {
        if cancel.load(Ordering::Relaxed) {
            return (None, Vec::new());
        }

        let content_hash = ExtractionCache::content_hash(&input.content);
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&input.path, content_hash) {
                return (Some(hit), Vec::new());
            }
        }

        match self.factory.extractor_for(input.language) {
            Ok(mut extractor) => {
                let (extraction, diagnostics) = extractor.extract(&input.path, &input.content);
                if diagnostics.is_empty() {
                    if let Some(cache) = &self.cache {
                        cache.store(&input.path, content_hash, &extraction);
                    }
                }
                (Some(extraction), diagnostics)
            }
            Err(EngineError::UnsupportedLanguage(language)) => (
                None,
                vec![Diagnostic::unsupported_language(
                    input.path.clone(),
                    format!("no extractor for language '{language}'"),
                )],
            ),
            Err(err) => (
                None,
                vec![Diagnostic::extraction_failure(
                    input.path.clone(),
                    err.to_string(),
                )],
            ),
        }
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}
