//! Line-oriented extraction for languages without a bundled structural
//! parser (Java, C#, Go, C++).
//!
//! Pattern matching tolerates leading whitespace and trailing punctuation
//! and skips lines it can recognize as comments. It is deliberately
//! heuristic; the dead-code allowlist downstream absorbs the false
//! positives this strategy trades for coverage.

use regex::Regex;
use std::sync::OnceLock;

use super::Extractor;
use crate::core::model::{
    Declaration, DeclarationKind, Diagnostic, Extraction, Language, Reference,
};

pub struct PatternExtractor {
    language: Language,
}

impl PatternExtractor {
    pub fn new(language: Language) -> Self {
        Self { language }
    }
}

impl Extractor for PatternExtractor {
    fn extract(&mut self, path: &str, content: &str) -> (Extraction, Vec<Diagnostic>) {
        if content.contains('\0') {
            return (
                Extraction::default(),
                vec![Diagnostic::extraction_failure(
                    path,
                    "binary content; file skipped",
                )],
            );
        }

        let mut out = Extraction::default();
        let mut state = ScanState::default();
        for (idx, raw_line) in content.lines().enumerate() {
            let line_no = idx as u32 + 1;
            let line = raw_line.trim();
            if state.skip_comment_line(line) {
                continue;
            }
            match self.language {
                Language::Java => scan_java(line, line_no, path, &mut out),
                Language::CSharp => scan_csharp(line, line_no, path, &mut out),
                Language::Go => scan_go(line, line_no, path, &mut state, &mut out),
                Language::Cpp => scan_cpp(line, line_no, path, &mut out),
                _ => {}
            }
        }
        (out, Vec::new())
    }

    fn language(&self) -> Language {
        self.language
    }
}

/// Per-file scan state: block-comment tracking plus Go's import block.
#[derive(Default)]
struct ScanState {
    in_block_comment: bool,
    in_go_import_block: bool,
}

impl ScanState {
    /// Returns true when the line is (part of) a comment and should not be
    /// pattern-matched.
    fn skip_comment_line(&mut self, line: &str) -> bool {
        if self.in_block_comment {
            if line.contains("*/") {
                self.in_block_comment = false;
            }
            return true;
        }
        if line.starts_with("/*") {
            self.in_block_comment = !line.contains("*/");
            return true;
        }
        line.starts_with("//") || line.starts_with('*')
    }
}

fn re(cell: &'static OnceLock<Regex>, pattern: &'static str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("hard-coded pattern"))
}

fn scan_java(line: &str, line_no: u32, path: &str, out: &mut Extraction) {
    static IMPORT: OnceLock<Regex> = OnceLock::new();
    static TYPE: OnceLock<Regex> = OnceLock::new();
    static METHOD: OnceLock<Regex> = OnceLock::new();

    if let Some(caps) = re(
        &IMPORT,
        r#"^import\s+(?:static\s+)?([\w.]+?)(\.\*)?\s*;"#,
    )
    .captures(line)
    {
        let raw = caps[1].to_string();
        let name = if caps.get(2).is_some() {
            "*".to_string()
        } else {
            raw.rsplit('.').next().unwrap_or(&raw).to_string()
        };
        out.references
            .push(Reference::new(name, raw, path).with_line(line_no));
        return;
    }

    if let Some(caps) = re(
        &TYPE,
        r#"^(?:public|protected)\s+(?:(?:static|final|abstract|sealed|non-sealed)\s+)*(class|interface|enum|record)\s+([A-Za-z_]\w*)"#,
    )
    .captures(line)
    {
        let kind = match &caps[1] {
            "interface" => DeclarationKind::Interface,
            "enum" => DeclarationKind::Type,
            _ => DeclarationKind::Class,
        };
        out.declarations
            .push(Declaration::new(&caps[2], kind, path).with_line(line_no));
        return;
    }

    // Lowercase first letter keeps constructors out of the method pattern.
    if let Some(caps) = re(
        &METHOD,
        r#"^public\s+(?:(?:static|final|abstract|synchronized)\s+)*[\w<>\[\],.\s]+?\s+([a-z]\w*)\s*\("#,
    )
    .captures(line)
    {
        out.declarations.push(
            Declaration::new(&caps[1], DeclarationKind::Function, path).with_line(line_no),
        );
    }
}

fn scan_csharp(line: &str, line_no: u32, path: &str, out: &mut Extraction) {
    static USING_ALIAS: OnceLock<Regex> = OnceLock::new();
    static USING: OnceLock<Regex> = OnceLock::new();
    static TYPE: OnceLock<Regex> = OnceLock::new();
    static METHOD: OnceLock<Regex> = OnceLock::new();

    if let Some(caps) = re(
        &USING_ALIAS,
        r#"^using\s+[A-Za-z_]\w*\s*=\s*([\w.]+)\s*;"#,
    )
    .captures(line)
    {
        let raw = caps[1].to_string();
        let name = raw.rsplit('.').next().unwrap_or(&raw).to_string();
        out.references
            .push(Reference::new(name, raw, path).with_line(line_no));
        return;
    }

    // `using (resource)` statements and `using var` bindings are not imports.
    if !line.starts_with("using (") && !line.starts_with("using var ") {
        if let Some(caps) = re(&USING, r#"^using\s+(?:static\s+)?([\w.]+)\s*;"#).captures(line) {
            let raw = caps[1].to_string();
            let name = raw.rsplit('.').next().unwrap_or(&raw).to_string();
            out.references
                .push(Reference::new(name, raw, path).with_line(line_no));
            return;
        }
    }

    if let Some(caps) = re(
        &TYPE,
        r#"^(?:public|internal)\s+(?:(?:sealed|static|abstract|partial|readonly|unsafe)\s+)*(class|interface|struct|enum|record)\s+([A-Za-z_]\w*)"#,
    )
    .captures(line)
    {
        let kind = match &caps[1] {
            "interface" => DeclarationKind::Interface,
            "enum" => DeclarationKind::Type,
            _ => DeclarationKind::Class,
        };
        out.declarations
            .push(Declaration::new(&caps[2], kind, path).with_line(line_no));
        return;
    }

    if let Some(caps) = re(
        &METHOD,
        r#"^public\s+(?:(?:static|virtual|override|async|sealed|abstract)\s+)*[\w<>\[\],.\s]+?\s+([A-Za-z_]\w*)\s*\("#,
    )
    .captures(line)
    {
        out.declarations.push(
            Declaration::new(&caps[1], DeclarationKind::Function, path).with_line(line_no),
        );
    }
}

fn scan_go(line: &str, line_no: u32, path: &str, state: &mut ScanState, out: &mut Extraction) {
    static IMPORT_ONE: OnceLock<Regex> = OnceLock::new();
    static IMPORT_IN_BLOCK: OnceLock<Regex> = OnceLock::new();
    static FUNC: OnceLock<Regex> = OnceLock::new();
    static TYPE: OnceLock<Regex> = OnceLock::new();
    static CONST: OnceLock<Regex> = OnceLock::new();
    static VAR: OnceLock<Regex> = OnceLock::new();

    if state.in_go_import_block {
        if line.starts_with(')') {
            state.in_go_import_block = false;
            return;
        }
        if let Some(caps) = re(&IMPORT_IN_BLOCK, r#"^(?:([A-Za-z_.]\w*)\s+)?"([^"]+)""#)
            .captures(line)
        {
            push_go_import(&caps, line_no, path, out);
        }
        return;
    }

    if line.starts_with("import (") || line == "import(" {
        state.in_go_import_block = true;
        return;
    }

    if let Some(caps) =
        re(&IMPORT_ONE, r#"^import\s+(?:([A-Za-z_.]\w*)\s+)?"([^"]+)""#).captures(line)
    {
        push_go_import(&caps, line_no, path, out);
        return;
    }

    // Only capitalized identifiers are exported in Go.
    if let Some(caps) = re(&FUNC, r#"^func\s+(?:\([^)]*\)\s*)?([A-Z]\w*)"#).captures(line) {
        out.declarations.push(
            Declaration::new(&caps[1], DeclarationKind::Function, path).with_line(line_no),
        );
        return;
    }
    if let Some(caps) = re(&TYPE, r#"^type\s+([A-Z]\w*)\s*(\w+)?"#).captures(line) {
        let kind = match caps.get(2).map(|m| m.as_str()) {
            Some("struct") => DeclarationKind::Class,
            Some("interface") => DeclarationKind::Interface,
            _ => DeclarationKind::Type,
        };
        out.declarations
            .push(Declaration::new(&caps[1], kind, path).with_line(line_no));
        return;
    }
    if let Some(caps) = re(&CONST, r#"^const\s+([A-Z]\w*)"#).captures(line) {
        out.declarations
            .push(Declaration::new(&caps[1], DeclarationKind::Const, path).with_line(line_no));
        return;
    }
    if let Some(caps) = re(&VAR, r#"^var\s+([A-Z]\w*)"#).captures(line) {
        out.declarations
            .push(Declaration::new(&caps[1], DeclarationKind::Variable, path).with_line(line_no));
    }
}

fn push_go_import(caps: &regex::Captures, line_no: u32, path: &str, out: &mut Extraction) {
    let raw = caps[2].to_string();
    let name = caps
        .get(1)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| raw.rsplit('/').next().unwrap_or(&raw).to_string());
    out.references
        .push(Reference::new(name, raw, path).with_line(line_no));
}

fn scan_cpp(line: &str, line_no: u32, path: &str, out: &mut Extraction) {
    static INCLUDE_LOCAL: OnceLock<Regex> = OnceLock::new();
    static INCLUDE_SYSTEM: OnceLock<Regex> = OnceLock::new();
    static TYPE: OnceLock<Regex> = OnceLock::new();
    static USING_ALIAS: OnceLock<Regex> = OnceLock::new();
    static TYPEDEF: OnceLock<Regex> = OnceLock::new();

    if let Some(caps) = re(&INCLUDE_LOCAL, r#"^#\s*include\s+"([^"]+)""#).captures(line) {
        let raw = caps[1].to_string();
        let name = include_stem(&raw);
        out.references
            .push(Reference::new(name, raw, path).with_line(line_no));
        return;
    }
    if let Some(caps) = re(&INCLUDE_SYSTEM, r#"^#\s*include\s+<([^>]+)>"#).captures(line) {
        let raw = caps[1].to_string();
        let name = include_stem(&raw);
        out.references
            .push(Reference::new(name, raw, path).with_line(line_no));
        return;
    }

    // The name must be followed by a base clause, a body, or the line end;
    // this keeps `class X;` forward declarations out.
    if let Some(caps) = re(
        &TYPE,
        r#"^(?:template\s*<[^>]*>\s*)?(?:class|struct)\s+([A-Za-z_]\w*)\s*(?::|\{|$)"#,
    )
    .captures(line)
    {
        out.declarations
            .push(Declaration::new(&caps[1], DeclarationKind::Class, path).with_line(line_no));
        return;
    }

    if let Some(caps) = re(&USING_ALIAS, r#"^using\s+([A-Za-z_]\w*)\s*="#).captures(line) {
        out.declarations
            .push(Declaration::new(&caps[1], DeclarationKind::Type, path).with_line(line_no));
        return;
    }
    if let Some(caps) = re(&TYPEDEF, r#"^typedef\s+.*[\s*]([A-Za-z_]\w*)\s*;"#).captures(line) {
        out.declarations
            .push(Declaration::new(&caps[1], DeclarationKind::Type, path).with_line(line_no));
    }
}

fn include_stem(include_path: &str) -> String {
    let base = include_path.rsplit('/').next().unwrap_or(include_path);
    base.rsplit_once('.')
        .map(|(stem, _)| stem.to_string())
        .unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(language: Language, content: &str) -> Extraction {
        let mut extractor = PatternExtractor::new(language);
        let (extraction, diagnostics) = extractor.extract("test/file", content);
        assert!(diagnostics.is_empty());
        extraction
    }

    #[test]
    fn java_imports_and_types() {
        let out = extract(
            Language::Java,
            "package com.acme;\nimport java.util.List;\nimport com.acme.util.*;\npublic final class Widget {\n  public void render() {}\n}\n",
        );
        assert_eq!(out.references.len(), 2);
        assert_eq!(out.references[0].imported_name, "List");
        assert_eq!(out.references[0].raw_specifier, "java.util.List");
        assert_eq!(out.references[1].imported_name, "*");
        let names: Vec<_> = out.declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Widget", "render"]);
    }

    #[test]
    fn go_import_block_and_visibility() {
        let out = extract(
            Language::Go,
            "package main\n\nimport (\n\t\"fmt\"\n\talias \"example.com/pkg/util\"\n)\n\nfunc Exported() {}\nfunc internal() {}\ntype Config struct {}\n",
        );
        assert_eq!(out.references.len(), 2);
        assert_eq!(out.references[0].raw_specifier, "fmt");
        assert_eq!(out.references[1].imported_name, "alias");
        let names: Vec<_> = out.declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Exported", "Config"]);
    }

    #[test]
    fn cpp_includes_skip_comments() {
        let out = extract(
            Language::Cpp,
            "// #include \"commented.hpp\"\n#include \"util/helpers.hpp\"\n#include <vector>\nclass Engine {\n};\nclass Forward;\n",
        );
        assert_eq!(out.references.len(), 2);
        assert_eq!(out.references[0].raw_specifier, "util/helpers.hpp");
        let names: Vec<_> = out.declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Engine"]);
    }

    #[test]
    fn csharp_usings_and_types() {
        let out = extract(
            Language::CSharp,
            "using System.Collections.Generic;\nusing Acme.Billing;\npublic sealed class Invoice {\n  public decimal Total() { return 0; }\n}\n",
        );
        assert_eq!(out.references.len(), 2);
        assert_eq!(out.references[1].raw_specifier, "Acme.Billing");
        let names: Vec<_> = out.declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Invoice", "Total"]);
    }
}
