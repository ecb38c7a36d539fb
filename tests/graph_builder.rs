use std::collections::HashMap;

use depscan::core::{
    DiagnosticKind, Extraction, GraphBuilder, Language, PathResolver, Reference, SourceFile,
};

fn file(path: &str, language: Language) -> SourceFile {
    SourceFile {
        path: path.to_string(),
        language,
        size: 0,
    }
}

fn extraction(references: Vec<Reference>) -> Extraction {
    Extraction {
        declarations: Vec::new(),
        references,
    }
}

#[test]
fn internal_edges_are_visible_from_both_endpoints() {
    let files = vec![
        file("src/a.ts", Language::TypeScript),
        file("src/b.ts", Language::TypeScript),
    ];
    let mut extractions = HashMap::new();
    extractions.insert(
        "src/a.ts".to_string(),
        extraction(vec![Reference::new("helper", "./b", "src/a.ts")]),
    );

    let resolver = PathResolver::new(&files);
    let (graph, diags) = GraphBuilder::build(&files, &extractions, &resolver);

    assert!(diags.is_empty());
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);

    let deps = graph.dependencies("src/a.ts");
    assert_eq!(deps.len(), 1);
    assert_eq!(deps[0].target, "src/b.ts");

    let dependents = graph.dependents("src/b.ts");
    assert_eq!(dependents.len(), 1);
    assert_eq!(dependents[0].source, "src/a.ts");
    assert_eq!(dependents[0].reference.imported_name, "helper");
}

#[test]
fn every_file_becomes_a_node_even_without_edges() {
    let files = vec![
        file("src/a.ts", Language::TypeScript),
        file("src/isolated.ts", Language::TypeScript),
    ];
    let resolver = PathResolver::new(&files);
    let (graph, _) = GraphBuilder::build(&files, &HashMap::new(), &resolver);

    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 0);
    assert!(graph.node("src/isolated.ts").is_some());
}

#[test]
fn repeated_imports_keep_raw_multiplicity() {
    let files = vec![
        file("src/a.ts", Language::TypeScript),
        file("src/b.ts", Language::TypeScript),
    ];
    let mut extractions = HashMap::new();
    extractions.insert(
        "src/a.ts".to_string(),
        extraction(vec![
            Reference::new("one", "./b", "src/a.ts"),
            Reference::new("two", "./b", "src/a.ts"),
        ]),
    );

    let resolver = PathResolver::new(&files);
    let (graph, _) = GraphBuilder::build(&files, &extractions, &resolver);

    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.dependencies("src/a.ts").len(), 2);
}

#[test]
fn external_targets_are_tallied_not_edged() {
    let files = vec![file("src/a.py", Language::Python)];
    let mut extractions = HashMap::new();
    extractions.insert(
        "src/a.py".to_string(),
        extraction(vec![
            Reference::new("get", "requests", "src/a.py"),
            Reference::new("post", "requests", "src/a.py"),
            Reference::new("path", "os.path", "src/a.py"),
        ]),
    );

    let resolver = PathResolver::new(&files);
    let (graph, _) = GraphBuilder::build(&files, &extractions, &resolver);

    assert_eq!(graph.edge_count(), 0);
    assert_eq!(graph.external_packages().get("requests"), Some(&2));
    assert_eq!(graph.external_packages().get("os"), Some(&1));
}

#[test]
fn ambiguous_specifier_degrades_to_external_with_diagnostic() {
    // Two files share the basename "util"; a bare import cannot pick one.
    let files = vec![
        file("src/a/util.ts", Language::TypeScript),
        file("src/b/util.ts", Language::TypeScript),
        file("src/main.ts", Language::TypeScript),
    ];
    let mut extractions = HashMap::new();
    extractions.insert(
        "src/main.ts".to_string(),
        extraction(vec![Reference::new("util", "util", "src/main.ts")]),
    );

    let resolver = PathResolver::new(&files);
    let (graph, diags) = GraphBuilder::build(&files, &extractions, &resolver);

    assert_eq!(graph.edge_count(), 0);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].kind, DiagnosticKind::ResolutionAmbiguity);
    assert_eq!(diags[0].file.as_deref(), Some("src/main.ts"));
}

#[test]
fn export_lists_edges_deterministically() {
    let files = vec![
        file("src/a.ts", Language::TypeScript),
        file("src/b.ts", Language::TypeScript),
        file("src/c.ts", Language::TypeScript),
    ];
    let mut extractions = HashMap::new();
    extractions.insert(
        "src/c.ts".to_string(),
        extraction(vec![Reference::new("x", "./a", "src/c.ts")]),
    );
    extractions.insert(
        "src/a.ts".to_string(),
        extraction(vec![Reference::new("y", "./b", "src/a.ts")]),
    );

    let resolver = PathResolver::new(&files);
    let (graph, _) = GraphBuilder::build(&files, &extractions, &resolver);

    let export = graph.export();
    let order: Vec<(&str, &str)> = export
        .edges
        .iter()
        .map(|e| (e.source.as_str(), e.target.as_str()))
        .collect();
    assert_eq!(order, vec![("src/a.ts", "src/b.ts"), ("src/c.ts", "src/a.ts")]);
}
