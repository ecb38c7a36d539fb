use petgraph::graph::NodeIndex;
use petgraph::{Directed, Direction, Graph};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use super::model::{
    Diagnostic, Extraction, GraphExport, Reference, ResolvedEdge, SourceFile, Target,
};
use super::resolver::{Confidence, PathResolver};

/// One graph node: the file plus the declaration count the scorer needs.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub file: SourceFile,
    pub declaration_count: usize,
}

/// Bidirectional dependency graph over the analyzed file set.
///
/// Backed by a petgraph directed graph, so the reverse adjacency is the
/// incoming-edge view of the same structure; an internal edge A->B is by
/// construction visible from both endpoints.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    graph: Graph<GraphNode, ResolvedEdge, Directed>,
    node_map: HashMap<String, NodeIndex>,
    external_packages: BTreeMap<String, usize>,
}

impl DependencyGraph {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node(&self, path: &str) -> Option<&GraphNode> {
        let idx = self.node_map.get(path)?;
        self.graph.node_weight(*idx)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(|n| n.file.path.as_str())
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.graph.node_weights()
    }

    /// Forward adjacency: every internal edge leaving `path`, raw
    /// multiplicity preserved.
    pub fn dependencies(&self, path: &str) -> Vec<&ResolvedEdge> {
        self.adjacent(path, Direction::Outgoing)
    }

    /// Reverse adjacency: every internal edge arriving at `path`.
    pub fn dependents(&self, path: &str) -> Vec<&ResolvedEdge> {
        self.adjacent(path, Direction::Incoming)
    }

    fn adjacent(&self, path: &str, dir: Direction) -> Vec<&ResolvedEdge> {
        match self.node_map.get(path) {
            Some(idx) => self
                .graph
                .edges_directed(*idx, dir)
                .map(|e| e.weight())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn edges(&self) -> impl Iterator<Item = &ResolvedEdge> {
        self.graph.edge_weights()
    }

    /// External package names with the number of references that resolved
    /// to each.
    pub fn external_packages(&self) -> &BTreeMap<String, usize> {
        &self.external_packages
    }

    /// Plain serializable view with deterministically sorted edges.
    pub fn export(&self) -> GraphExport {
        let mut edges: Vec<ResolvedEdge> = self.edges().cloned().collect();
        edges.sort_by(|a, b| {
            (
                &a.source,
                &a.target,
                &a.reference.imported_name,
                a.reference.line,
            )
                .cmp(&(
                    &b.source,
                    &b.target,
                    &b.reference.imported_name,
                    b.reference.line,
                ))
        });
        GraphExport {
            edges,
            external_packages: self.external_packages.clone(),
        }
    }
}

/// Single-threaded reduction over all per-file extractions.
///
/// Edge insertion needs a globally consistent view of which files exist, so
/// this stage is deliberately sequential; the pass is a single scan over an
/// in-memory list and would not repay fine-grained locking.
pub struct GraphBuilder {
    graph: DependencyGraph,
    diagnostics: Vec<Diagnostic>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: DependencyGraph::default(),
            diagnostics: Vec::new(),
        }
    }

    /// Seeds one node per supplied file.
    pub fn add_file(&mut self, file: SourceFile, declaration_count: usize) -> NodeIndex {
        let path = file.path.clone();
        let idx = self.graph.graph.add_node(GraphNode {
            file,
            declaration_count,
        });
        self.graph.node_map.insert(path, idx);
        idx
    }

    /// Resolves one reference and records the resulting edge. Internal
    /// targets become graph edges; everything else is tallied as external.
    /// A target missing from the node map degrades the edge to external
    /// rather than failing the build.
    pub fn add_reference(&mut self, resolver: &PathResolver, reference: Reference) {
        let resolution = resolver.resolve(&reference.file, &reference.raw_specifier);
        if resolution.confidence == Confidence::Ambiguous {
            self.diagnostics.push(Diagnostic::resolution_ambiguity(
                reference.file.clone(),
                format!(
                    "specifier '{}' matches more than one file; treated as external",
                    reference.raw_specifier
                ),
            ));
        }
        match resolution.target {
            Target::Internal(target_path) => {
                let source_idx = self.graph.node_map.get(&reference.file).copied();
                let target_idx = self.graph.node_map.get(&target_path).copied();
                match (source_idx, target_idx) {
                    (Some(s), Some(t)) => {
                        let edge = ResolvedEdge {
                            source: reference.file.clone(),
                            target: target_path,
                            reference,
                        };
                        self.graph.graph.add_edge(s, t, edge);
                    }
                    _ => {
                        debug!(target = %target_path, "resolved target missing from node map");
                        self.tally_external(package_root(&reference.raw_specifier));
                    }
                }
            }
            Target::External(name) => self.tally_external(name),
        }
    }

    fn tally_external(&mut self, name: String) {
        *self.graph.external_packages.entry(name).or_insert(0) += 1;
    }

    /// Seeds nodes from the file set, resolves every reference in file
    /// order (deterministic edge insertion), and freezes the graph.
    pub fn build(
        files: &[SourceFile],
        extractions: &HashMap<String, Extraction>,
        resolver: &PathResolver,
    ) -> (DependencyGraph, Vec<Diagnostic>) {
        let mut builder = GraphBuilder::new();

        for file in files {
            let declaration_count = extractions
                .get(&file.path)
                .map(|e| e.declarations.len())
                .unwrap_or(0);
            builder.add_file(file.clone(), declaration_count);
        }

        for file in files {
            if let Some(extraction) = extractions.get(&file.path) {
                for reference in &extraction.references {
                    builder.add_reference(resolver, reference.clone());
                }
            }
        }

        (builder.graph, builder.diagnostics)
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn package_root(specifier: &str) -> String {
    specifier
        .split(['.', '/', ':'])
        .find(|s| !s.is_empty())
        .unwrap_or(specifier)
        .to_string()
}
