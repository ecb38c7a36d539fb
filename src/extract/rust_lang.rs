use tree_sitter::Node as TsNode;

use super::common::{find_child, line_of, node_text, SourceParser};
use super::Extractor;
use crate::core::model::{
    Declaration, DeclarationKind, Diagnostic, EngineError, Extraction, Language, Reference,
};

pub struct RustExtractor {
    parser: SourceParser,
}

impl RustExtractor {
    pub fn new() -> Result<Self, EngineError> {
        let parser = SourceParser::new(tree_sitter_rust::language(), "rust")?;
        Ok(Self { parser })
    }

    fn walk_root(&self, root: &TsNode, source: &[u8], path: &str, out: &mut Extraction) {
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                "use_declaration" => self.handle_use(&child, source, path, out),
                kind => {
                    let decl_kind = match kind {
                        "function_item" => DeclarationKind::Function,
                        "struct_item" => DeclarationKind::Class,
                        "enum_item" | "type_item" => DeclarationKind::Type,
                        "trait_item" => DeclarationKind::Interface,
                        "const_item" => DeclarationKind::Const,
                        "static_item" => DeclarationKind::Variable,
                        _ => continue,
                    };
                    // Only `pub` items are exports.
                    if find_child(&child, "visibility_modifier").is_none() {
                        continue;
                    }
                    if let Some(name) = child.child_by_field_name("name") {
                        out.declarations.push(
                            Declaration::new(node_text(&name, source), decl_kind, path)
                                .with_line(line_of(&child)),
                        );
                    }
                }
            }
        }
    }

    fn handle_use(&self, node: &TsNode, source: &[u8], path: &str, out: &mut Extraction) {
        let line = line_of(node);
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if matches!(child.kind(), "use" | "visibility_modifier" | ";") {
                continue;
            }
            self.flatten_use(&child, source, "", path, line, out);
        }
    }

    /// Flattens a `use` tree into one reference per leaf binding, keeping
    /// the full `::` path as the raw specifier.
    fn flatten_use(
        &self,
        node: &TsNode,
        source: &[u8],
        prefix: &str,
        path: &str,
        line: u32,
        out: &mut Extraction,
    ) {
        match node.kind() {
            "identifier" | "scoped_identifier" | "crate" | "self" | "super" => {
                let text = node_text(node, source);
                let full = join_path(prefix, text);
                let name = full.rsplit("::").next().unwrap_or(&full).to_string();
                out.references
                    .push(Reference::new(name, full, path).with_line(line));
            }
            "use_as_clause" => {
                // The symbol looked up in the target module is the original
                // path, not the local alias.
                if let Some(original) = node.child_by_field_name("path") {
                    self.flatten_use(&original, source, prefix, path, line, out);
                }
            }
            "scoped_use_list" => {
                let new_prefix = node
                    .child_by_field_name("path")
                    .map(|p| join_path(prefix, node_text(&p, source)))
                    .unwrap_or_else(|| prefix.to_string());
                if let Some(list) = node.child_by_field_name("list") {
                    self.flatten_use(&list, source, &new_prefix, path, line, out);
                }
            }
            "use_list" => {
                let mut cursor = node.walk();
                for item in node.children(&mut cursor) {
                    if !matches!(item.kind(), "{" | "}" | ",") {
                        self.flatten_use(&item, source, prefix, path, line, out);
                    }
                }
            }
            "use_wildcard" => {
                let base = node
                    .child(0)
                    .filter(|c| c.kind() != "*")
                    .map(|c| join_path(prefix, node_text(&c, source)))
                    .unwrap_or_else(|| prefix.to_string());
                if !base.is_empty() {
                    out.references
                        .push(Reference::new("*", base, path).with_line(line));
                }
            }
            _ => {}
        }
    }
}

fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}::{segment}")
    }
}

impl Extractor for RustExtractor {
    fn extract(&mut self, path: &str, content: &str) -> (Extraction, Vec<Diagnostic>) {
        let Some(tree) = self.parser.parse(content) else {
            return (
                Extraction::default(),
                vec![Diagnostic::extraction_failure(
                    path,
                    "tree-sitter produced no parse tree",
                )],
            );
        };

        let root = tree.root_node();
        if root.has_error() {
            return (
                Extraction::default(),
                vec![Diagnostic::extraction_failure(
                    path,
                    "syntax errors prevented extraction; file skipped",
                )],
            );
        }

        let mut out = Extraction::default();
        self.walk_root(&root, content.as_bytes(), path, &mut out);
        (out, Vec::new())
    }

    fn language(&self) -> Language {
        Language::Rust
    }
}
