use std::collections::HashMap;

use depscan::analysis::ComplexityScorer;
use depscan::core::{
    Declaration, DeclarationKind, Extraction, GraphBuilder, Language, PathResolver, Recommendation,
    Reference, SourceFile,
};

fn file(path: &str) -> SourceFile {
    SourceFile {
        path: path.to_string(),
        language: Language::TypeScript,
        size: 0,
    }
}

fn decl(name: &str, file: &str) -> Declaration {
    Declaration::new(name, DeclarationKind::Function, file)
}

fn build(
    files: &[SourceFile],
    extractions: HashMap<String, Extraction>,
) -> depscan::core::DependencyGraph {
    let resolver = PathResolver::new(files);
    let (graph, _) = GraphBuilder::build(files, &extractions, &resolver);
    graph
}

#[test]
fn isolated_file_scores_zero() {
    let files = vec![file("src/alone.ts")];
    let graph = build(&files, HashMap::new());

    let scores = ComplexityScorer::score(&graph);
    assert_eq!(scores.len(), 1);
    let s = &scores[0];
    assert_eq!((s.coupling, s.impact, s.volatility, s.total), (0, 0, 0, 0));
    assert_eq!(s.recommendation, Recommendation::Ok);
}

#[test]
fn hub_file_is_flagged_for_refactor() {
    let files = vec![
        file("src/hub.ts"),
        file("src/a.ts"),
        file("src/b.ts"),
        file("src/c.ts"),
        file("src/d.ts"),
        file("src/e.ts"),
    ];
    let mut extractions = HashMap::new();
    // The hub declares five symbols and imports two files.
    extractions.insert(
        "src/hub.ts".to_string(),
        Extraction {
            declarations: (0..5).map(|i| decl(&format!("f{i}"), "src/hub.ts")).collect(),
            references: vec![
                Reference::new("x", "./a", "src/hub.ts"),
                Reference::new("y", "./b", "src/hub.ts"),
            ],
        },
    );
    // Three files depend on the hub.
    for dependent in ["src/c.ts", "src/d.ts", "src/e.ts"] {
        extractions.insert(
            dependent.to_string(),
            Extraction {
                declarations: Vec::new(),
                references: vec![Reference::new("f0", "./hub", dependent)],
            },
        );
    }

    let graph = build(&files, extractions);
    let scores = ComplexityScorer::score(&graph);
    let hub = scores.iter().find(|s| s.file == "src/hub.ts").unwrap();

    assert_eq!(hub.coupling, 2);
    assert_eq!(hub.impact, 3);
    // (5 declarations + 2 outbound) / 2 = 3
    assert_eq!(hub.volatility, 3);
    assert_eq!(hub.total, 8);
    assert_eq!(hub.recommendation, Recommendation::Refactor);
}

#[test]
fn subscores_are_capped() {
    let targets = ["a", "b", "c", "d", "e"];
    let mut files = vec![file("src/spine.ts")];
    files.extend(targets.iter().map(|t| file(&format!("src/{t}.ts"))));

    let mut extractions = HashMap::new();
    extractions.insert(
        "src/spine.ts".to_string(),
        Extraction {
            declarations: (0..20)
                .map(|i| decl(&format!("g{i}"), "src/spine.ts"))
                .collect(),
            references: targets
                .iter()
                .map(|t| Reference::new("x", format!("./{t}"), "src/spine.ts"))
                .collect(),
        },
    );

    let graph = build(&files, extractions);
    let scores = ComplexityScorer::score(&graph);
    let spine = scores.iter().find(|s| s.file == "src/spine.ts").unwrap();

    // Five distinct targets cap at 3; (20 + 5) / 2 caps at 4.
    assert_eq!(spine.coupling, 3);
    assert_eq!(spine.volatility, 4);
    assert!(spine.total <= 10);
}

#[test]
fn duplicate_edges_to_one_neighbor_count_once() {
    let files = vec![file("src/a.ts"), file("src/b.ts")];
    let mut extractions = HashMap::new();
    extractions.insert(
        "src/a.ts".to_string(),
        Extraction {
            declarations: Vec::new(),
            references: vec![
                Reference::new("one", "./b", "src/a.ts"),
                Reference::new("two", "./b", "src/a.ts"),
                Reference::new("three", "./b", "src/a.ts"),
            ],
        },
    );

    let graph = build(&files, extractions);
    let scores = ComplexityScorer::score(&graph);
    let a = scores.iter().find(|s| s.file == "src/a.ts").unwrap();
    assert_eq!(a.coupling, 1);
}

#[test]
fn scores_are_sorted_by_file() {
    let files = vec![file("src/z.ts"), file("src/a.ts"), file("src/m.ts")];
    let graph = build(&files, HashMap::new());

    let scores = ComplexityScorer::score(&graph);
    let order: Vec<&str> = scores.iter().map(|s| s.file.as_str()).collect();
    assert_eq!(order, vec!["src/a.ts", "src/m.ts", "src/z.ts"]);
}
