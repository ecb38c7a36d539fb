use std::collections::{HashMap, HashSet};

use crate::core::graph::DependencyGraph;
use crate::core::model::{Declaration, OrphanedExport};

/// Exported names that frameworks invoke by convention; never reported as
/// orphaned regardless of reference count.
const RESERVED_ENTRY_POINTS: &[&str] = &["activate", "deactivate", "main"];

/// Path segments wired up reflectively by web frameworks.
const CONVENTION_SEGMENTS: &[&str] = &["models", "views", "routes"];

/// Cross-references declarations against the set of symbol names actually
/// imported from each file.
///
/// Static resolution cannot see dynamic, reflective or templated usage, so
/// every candidate runs through an allowlist before being reported: the
/// detector deliberately trades recall for precision.
pub struct DeadCodeDetector;

impl DeadCodeDetector {
    /// Read-only over the frozen graph. Output is sorted by (file, name).
    pub fn detect(graph: &DependencyGraph, declarations: &[Declaration]) -> Vec<OrphanedExport> {
        // Symbol names imported from each target file, over every edge.
        let mut imported: HashMap<&str, HashSet<&str>> = HashMap::new();
        for edge in graph.edges() {
            imported
                .entry(edge.target.as_str())
                .or_default()
                .insert(edge.reference.imported_name.as_str());
        }

        let mut orphans: Vec<OrphanedExport> = declarations
            .iter()
            .filter_map(|decl| {
                let names = imported.get(decl.file.as_str());
                if let Some(names) = names {
                    if names.contains(decl.name.as_str()) {
                        return None;
                    }
                    // A wildcard or whole-module import may use any export;
                    // stay conservative and assume it does.
                    if names.contains("*") || names.contains(file_basename(&decl.file)) {
                        return None;
                    }
                }
                if Self::allowlisted(decl) {
                    return None;
                }
                Some(OrphanedExport {
                    file: decl.file.clone(),
                    name: decl.name.clone(),
                    kind: decl.kind,
                    reason: format!(
                        "no analyzed file imports '{}' from {}",
                        decl.name, decl.file
                    ),
                })
            })
            .collect();

        orphans.sort_by(|a, b| (&a.file, &a.name).cmp(&(&b.file, &b.name)));
        orphans.dedup_by(|a, b| a.file == b.file && a.name == b.name);
        orphans
    }

    fn allowlisted(decl: &Declaration) -> bool {
        if RESERVED_ENTRY_POINTS.contains(&decl.name.as_str()) {
            return true;
        }
        if Self::is_component_file(&decl.file) && starts_uppercase(&decl.name) {
            return true;
        }
        if Self::has_convention_segment(&decl.file) {
            return true;
        }
        Self::is_test_or_fixture(&decl.file)
    }

    /// Capitalized exports in UI-component-suffixed files are usually
    /// consumed by a templating layer the extractor cannot see.
    fn is_component_file(path: &str) -> bool {
        let basename = file_basename(path);
        let lower = basename.to_ascii_lowercase();
        lower.ends_with("component")
            || lower.ends_with("view")
            || lower.ends_with("page")
            || lower.ends_with("widget")
            || path.contains(".component.")
            || path.ends_with(".tsx")
            || path.ends_with(".jsx")
    }

    fn has_convention_segment(path: &str) -> bool {
        path.split('/')
            .any(|segment| CONVENTION_SEGMENTS.contains(&segment))
    }

    fn is_test_or_fixture(path: &str) -> bool {
        let has_test_segment = path.split('/').any(|segment| {
            matches!(
                segment,
                "test" | "tests" | "__tests__" | "spec" | "specs" | "fixtures" | "fixture"
            )
        });
        if has_test_segment {
            return true;
        }
        let basename = file_basename(path);
        basename.starts_with("test_")
            || basename.ends_with("_test")
            || path.contains(".test.")
            || path.contains(".spec.")
    }
}

/// Extensionless final path segment.
fn file_basename(path: &str) -> &str {
    let base = path.rsplit('/').next().unwrap_or(path);
    base.split('.').next().unwrap_or(base)
}

fn starts_uppercase(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_uppercase())
}
