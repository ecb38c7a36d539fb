use depscan::core::{DeclarationKind, DiagnosticKind, Language};
use depscan::extract::{Extractor, ExtractorFactory};

fn extractor() -> Box<dyn Extractor + Send> {
    ExtractorFactory::new()
        .extractor_for(Language::Rust)
        .unwrap()
}

#[test]
fn only_pub_items_are_declarations() {
    let src = r#"
pub struct Config;
pub fn load() {}
pub enum Mode { Fast, Slow }
pub trait Store {}
pub const LIMIT: usize = 8;
pub static NAME: &str = "depscan";
pub type Result = std::result::Result<(), ()>;

struct Private;
fn helper() {}
"#;
    let (extraction, diags) = extractor().extract("src/config.rs", src);
    assert!(diags.is_empty());

    let by_name: Vec<(&str, DeclarationKind)> = extraction
        .declarations
        .iter()
        .map(|d| (d.name.as_str(), d.kind))
        .collect();
    assert!(by_name.contains(&("Config", DeclarationKind::Class)));
    assert!(by_name.contains(&("load", DeclarationKind::Function)));
    assert!(by_name.contains(&("Mode", DeclarationKind::Type)));
    assert!(by_name.contains(&("Store", DeclarationKind::Interface)));
    assert!(by_name.contains(&("LIMIT", DeclarationKind::Const)));
    assert!(by_name.contains(&("NAME", DeclarationKind::Variable)));
    assert!(by_name.contains(&("Result", DeclarationKind::Type)));

    assert!(!by_name.iter().any(|(n, _)| *n == "Private"));
    assert!(!by_name.iter().any(|(n, _)| *n == "helper"));
}

#[test]
fn use_paths_keep_the_full_specifier() {
    let src = "use crate::core::engine::AnalysisEngine;\n";
    let (extraction, _) = extractor().extract("src/main.rs", src);

    assert_eq!(extraction.references.len(), 1);
    assert_eq!(extraction.references[0].imported_name, "AnalysisEngine");
    assert_eq!(
        extraction.references[0].raw_specifier,
        "crate::core::engine::AnalysisEngine"
    );
}

#[test]
fn use_lists_flatten_to_one_reference_per_leaf() {
    let src = "use crate::model::{Declaration, Reference as Ref, kinds::DeclarationKind};\n";
    let (extraction, _) = extractor().extract("src/lib.rs", src);

    let pairs: Vec<(&str, &str)> = extraction
        .references
        .iter()
        .map(|r| (r.imported_name.as_str(), r.raw_specifier.as_str()))
        .collect();
    assert!(pairs.contains(&("Declaration", "crate::model::Declaration")));
    // Aliases record the original path.
    assert!(pairs.contains(&("Reference", "crate::model::Reference")));
    assert!(pairs.contains(&(
        "DeclarationKind",
        "crate::model::kinds::DeclarationKind"
    )));
}

#[test]
fn wildcard_use_is_recorded_as_star() {
    let src = "use crate::prelude::*;\n";
    let (extraction, _) = extractor().extract("src/lib.rs", src);

    assert_eq!(extraction.references.len(), 1);
    assert_eq!(extraction.references[0].imported_name, "*");
    assert_eq!(extraction.references[0].raw_specifier, "crate::prelude");
}

#[test]
fn external_crate_use_is_still_a_reference() {
    let src = "use serde::Serialize;\n";
    let (extraction, _) = extractor().extract("src/model.rs", src);

    assert_eq!(extraction.references.len(), 1);
    assert_eq!(extraction.references[0].raw_specifier, "serde::Serialize");
}

#[test]
fn syntax_errors_skip_the_file() {
    let src = "pub fn broken( {{{\n";
    let (extraction, diags) = extractor().extract("src/broken.rs", src);

    assert!(extraction.is_empty());
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].kind, DiagnosticKind::ExtractionFailure);
}
