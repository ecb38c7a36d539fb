use std::fs;
use std::path::Path;

use depscan::core::{FileScanner, Language};

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn discovers_only_requested_languages() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "src/app.ts", "export function app() {}");
    write(root, "src/util.py", "def util():\n    pass\n");
    write(root, "README.md", "# readme");

    let files = FileScanner::new()
        .scan_directory(root, &[Language::TypeScript])
        .unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "src/app.ts");
    assert_eq!(files[0].language, Language::TypeScript);
    assert!(files[0].content.contains("app"));
}

#[test]
fn skips_dependency_and_hidden_directories() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "src/a.ts", "export const a = 1;");
    write(root, "node_modules/pkg/index.ts", "export const x = 1;");
    write(root, "target/debug/gen.rs", "pub fn gen() {}");
    write(root, ".git/hooks/sample.py", "pass");

    let files = FileScanner::new()
        .scan_directory(root, &[Language::TypeScript, Language::Rust, Language::Python])
        .unwrap();

    let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["src/a.ts"]);
}

#[test]
fn paths_are_workspace_relative_and_sorted() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "src/z.py", "pass");
    write(root, "src/a.py", "pass");
    write(root, "lib/m.py", "pass");

    let files = FileScanner::new()
        .scan_directory(root, &[Language::Python])
        .unwrap();

    let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["lib/m.py", "src/a.py", "src/z.py"]);
}
