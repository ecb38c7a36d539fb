use depscan::core::Language;
use depscan::extract::{Extractor, ExtractorFactory};

fn extractor() -> Box<dyn Extractor + Send> {
    ExtractorFactory::new()
        .extractor_for(Language::JavaScript)
        .unwrap()
}

#[test]
fn require_bindings_become_references() {
    let src = r#"
const fs = require("fs");
const { join, resolve } = require("./paths");
"#;
    let (extraction, diags) = extractor().extract("lib/io.js", src);
    assert!(diags.is_empty());

    let pairs: Vec<(&str, &str)> = extraction
        .references
        .iter()
        .map(|r| (r.imported_name.as_str(), r.raw_specifier.as_str()))
        .collect();
    assert!(pairs.contains(&("fs", "fs")));
    assert!(pairs.contains(&("join", "./paths")));
    assert!(pairs.contains(&("resolve", "./paths")));
}

#[test]
fn commonjs_exports_become_declarations() {
    let src = r#"
module.exports.parse = function parse() {};
exports.render = function render() {};
module.exports = {};
"#;
    let (extraction, _) = extractor().extract("lib/template.js", src);

    let names: Vec<&str> = extraction
        .declarations
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    assert!(names.contains(&"parse"));
    assert!(names.contains(&"render"));
    assert!(names.contains(&"default"));
}

#[test]
fn aliased_re_export_references_the_original_name() {
    let src = r#"export { foo as renamed } from "./a";"#;
    let (extraction, _) = extractor().extract("lib/index.js", src);

    assert_eq!(extraction.references.len(), 1);
    assert_eq!(extraction.references[0].imported_name, "foo");
    assert_eq!(extraction.references[0].raw_specifier, "./a");
    assert_eq!(extraction.declarations.len(), 1);
    assert_eq!(extraction.declarations[0].name, "renamed");
}

#[test]
fn esm_syntax_works_in_javascript_files() {
    let src = r#"
import { helper } from "./util";
export function run() {}
"#;
    let (extraction, _) = extractor().extract("lib/run.mjs", src);

    assert_eq!(extraction.references.len(), 1);
    assert_eq!(extraction.references[0].imported_name, "helper");
    assert_eq!(extraction.declarations.len(), 1);
    assert_eq!(extraction.declarations[0].name, "run");
}
