use std::collections::BTreeSet;

use crate::core::graph::DependencyGraph;
use crate::core::model::{ComplexityScore, Recommendation};

const COUPLING_CAP: usize = 3;
const IMPACT_CAP: usize = 3;
const VOLATILITY_CAP: usize = 4;

/// Computes coupling/impact/volatility subscores per graph node.
///
/// The formulas are a deliberate, explainable heuristic rather than a
/// learned model: a reviewer looking at one file's numbers can recompute
/// them by hand from the adjacency counts.
pub struct ComplexityScorer;

impl ComplexityScorer {
    /// One score per node, sorted by file path. Read-only over the frozen
    /// graph.
    pub fn score(graph: &DependencyGraph) -> Vec<ComplexityScore> {
        let mut scores: Vec<ComplexityScore> = graph
            .paths()
            .map(|path| Self::score_node(graph, path))
            .collect();
        scores.sort_by(|a, b| a.file.cmp(&b.file));
        scores
    }

    fn score_node(graph: &DependencyGraph, path: &str) -> ComplexityScore {
        // The graph keeps raw edge multiplicity; scoring wants the simple
        // adjacency set, so deduplicate by neighbor file here.
        let outbound: BTreeSet<&str> = graph
            .dependencies(path)
            .iter()
            .map(|e| e.target.as_str())
            .collect();
        let inbound: BTreeSet<&str> = graph
            .dependents(path)
            .iter()
            .map(|e| e.source.as_str())
            .collect();

        let declaration_count = graph
            .node(path)
            .map(|n| n.declaration_count)
            .unwrap_or(0);

        let coupling_raw = outbound.len();
        let coupling = coupling_raw.min(COUPLING_CAP) as u8;
        let impact = inbound.len().min(IMPACT_CAP) as u8;
        let volatility = ((declaration_count + coupling_raw) / 2).min(VOLATILITY_CAP) as u8;
        let total = coupling + impact + volatility;

        let recommendation = if total >= 8 {
            Recommendation::Refactor
        } else if total >= 6 {
            Recommendation::ConsiderRefactor
        } else {
            Recommendation::Ok
        };

        ComplexityScore {
            file: path.to_string(),
            coupling,
            impact,
            volatility,
            total,
            recommendation,
        }
    }
}
