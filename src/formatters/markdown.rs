use anyhow::Result;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::core::model::{Analysis, Recommendation};

/// Human-readable summary report.
pub struct MarkdownFormatter {
    /// Cap on rows in the complexity table.
    max_score_rows: usize,
}

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self { max_score_rows: 20 }
    }

    pub fn with_max_score_rows(mut self, rows: usize) -> Self {
        self.max_score_rows = rows;
        self
    }

    pub fn format(&self, analysis: &Analysis) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "# Dependency Analysis Report\n");
        let _ = writeln!(
            out,
            "- Files analyzed: {}\n- Internal edges: {}\n- External packages: {}\n- Orphaned exports: {}\n- Diagnostics: {}\n",
            analysis.files.len(),
            analysis.graph.edges.len(),
            analysis.graph.external_packages.len(),
            analysis.orphaned_exports.len(),
            analysis.diagnostics.len(),
        );

        if !analysis.components.is_empty() {
            let _ = writeln!(out, "## Components\n");
            for group in &analysis.components {
                let _ = writeln!(
                    out,
                    "- **{}** ({} files): {}",
                    group.name,
                    group.files.len(),
                    group.description
                );
            }
            let _ = writeln!(out);
        }

        let _ = writeln!(out, "## Complexity\n");
        let _ = writeln!(out, "| File | Coupling | Impact | Volatility | Total | Recommendation |");
        let _ = writeln!(out, "|------|----------|--------|------------|-------|----------------|");
        let mut ranked: Vec<_> = analysis.scores.iter().collect();
        ranked.sort_by(|a, b| b.total.cmp(&a.total).then(a.file.cmp(&b.file)));
        for score in ranked.iter().take(self.max_score_rows) {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} |",
                score.file,
                score.coupling,
                score.impact,
                score.volatility,
                score.total,
                recommendation_label(score.recommendation),
            );
        }
        let _ = writeln!(out);

        if !analysis.orphaned_exports.is_empty() {
            let _ = writeln!(out, "## Orphaned Exports\n");
            for orphan in &analysis.orphaned_exports {
                let _ = writeln!(
                    out,
                    "- `{}` ({:?}) in {} - {}",
                    orphan.name, orphan.kind, orphan.file, orphan.reason
                );
            }
            let _ = writeln!(out);
        }

        if !analysis.graph.external_packages.is_empty() {
            let _ = writeln!(out, "## External Packages\n");
            for (package, count) in &analysis.graph.external_packages {
                let _ = writeln!(out, "- {package} ({count} references)");
            }
            let _ = writeln!(out);
        }

        if !analysis.diagnostics.is_empty() {
            let _ = writeln!(out, "## Diagnostics\n");
            for diagnostic in &analysis.diagnostics {
                let _ = writeln!(
                    out,
                    "- [{:?}] {}: {}",
                    diagnostic.kind,
                    diagnostic.file.as_deref().unwrap_or("-"),
                    diagnostic.message
                );
            }
        }

        out
    }

    pub fn format_to_file(&self, analysis: &Analysis, output_path: &Path) -> Result<()> {
        fs::write(output_path, self.format(analysis))?;
        Ok(())
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn recommendation_label(recommendation: Recommendation) -> &'static str {
    match recommendation {
        Recommendation::Ok => "OK",
        Recommendation::ConsiderRefactor => "CONSIDER_REFACTOR",
        Recommendation::Refactor => "REFACTOR",
    }
}
