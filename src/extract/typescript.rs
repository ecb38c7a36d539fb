use tree_sitter::Node as TsNode;

use super::common::{find_child, line_of, node_text, unquote, SourceParser};
use super::Extractor;
use crate::core::model::{
    Declaration, DeclarationKind, Diagnostic, EngineError, Extraction, Language, Reference,
};

pub struct TypeScriptExtractor {
    parser: SourceParser,
}

impl TypeScriptExtractor {
    pub fn new() -> Result<Self, EngineError> {
        let parser = SourceParser::new(
            tree_sitter_typescript::language_typescript(),
            "typescript",
        )?;
        Ok(Self { parser })
    }

    fn walk_root(&self, root: &TsNode, source: &[u8], path: &str, out: &mut Extraction) {
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                "export_statement" => self.handle_export(&child, source, path, out),
                "import_statement" => self.handle_import(&child, source, path, out),
                _ => {}
            }
        }
    }

    fn handle_export(&self, node: &TsNode, source: &[u8], path: &str, out: &mut Extraction) {
        // `export function f() {}` and friends carry the declaration inline.
        if let Some(decl) = node.child_by_field_name("declaration") {
            self.collect_declaration(&decl, source, path, out);
            return;
        }

        // `export { a, b as c }` possibly `from "./mod"`.
        let specifier = node
            .child_by_field_name("source")
            .map(|s| unquote(node_text(&s, source)).to_string());

        if let Some(clause) = find_child(node, "export_clause") {
            let mut cursor = clause.walk();
            for spec in clause.children(&mut cursor) {
                if spec.kind() != "export_specifier" {
                    continue;
                }
                let original = spec
                    .child_by_field_name("name")
                    .map(|n| node_text(&n, source).to_string());
                let Some(original) = original else { continue };
                let exported = spec
                    .child_by_field_name("alias")
                    .map(|n| node_text(&n, source).to_string())
                    .unwrap_or_else(|| original.clone());

                if let Some(ref from) = specifier {
                    // Re-export: the symbol fetched from the source module
                    // is the original name; the alias is what this file
                    // re-declares.
                    out.references.push(
                        Reference::new(original, from.clone(), path).with_line(line_of(&spec)),
                    );
                }
                out.declarations.push(
                    Declaration::new(exported, DeclarationKind::Unknown, path)
                        .with_line(line_of(&spec)),
                );
            }
            return;
        }

        // `export default <expr>`.
        if find_child(node, "default").is_some() {
            out.declarations.push(
                Declaration::new("default", DeclarationKind::Unknown, path)
                    .with_line(line_of(node)),
            );
        }
    }

    fn collect_declaration(&self, decl: &TsNode, source: &[u8], path: &str, out: &mut Extraction) {
        let kind = match decl.kind() {
            "function_declaration" | "generator_function_declaration" => DeclarationKind::Function,
            "class_declaration" | "abstract_class_declaration" => DeclarationKind::Class,
            "interface_declaration" => DeclarationKind::Interface,
            "type_alias_declaration" | "enum_declaration" => DeclarationKind::Type,
            "lexical_declaration" | "variable_declaration" => {
                let is_const = node_text(decl, source).starts_with("const");
                let kind = if is_const {
                    DeclarationKind::Const
                } else {
                    DeclarationKind::Variable
                };
                let mut cursor = decl.walk();
                for declarator in decl.children(&mut cursor) {
                    if declarator.kind() != "variable_declarator" {
                        continue;
                    }
                    if let Some(name) = declarator.child_by_field_name("name") {
                        out.declarations.push(
                            Declaration::new(node_text(&name, source), kind, path)
                                .with_line(line_of(&declarator)),
                        );
                    }
                }
                return;
            }
            _ => DeclarationKind::Unknown,
        };

        if let Some(name) = decl.child_by_field_name("name") {
            out.declarations.push(
                Declaration::new(node_text(&name, source), kind, path).with_line(line_of(decl)),
            );
        }
    }

    fn handle_import(&self, node: &TsNode, source: &[u8], path: &str, out: &mut Extraction) {
        let Some(source_node) = node.child_by_field_name("source") else {
            return;
        };
        let specifier = unquote(node_text(&source_node, source)).to_string();
        let line = line_of(node);

        let Some(clause) = find_child(node, "import_clause") else {
            // Side-effect import: the module itself is the binding.
            let name = specifier.rsplit('/').next().unwrap_or(&specifier).to_string();
            out.references
                .push(Reference::new(name, specifier, path).with_line(line));
            return;
        };

        let mut cursor = clause.walk();
        for part in clause.children(&mut cursor) {
            match part.kind() {
                // `import Default from "./x"`
                "identifier" => out.references.push(
                    Reference::new(node_text(&part, source), specifier.clone(), path)
                        .with_line(line),
                ),
                // `import * as ns from "./x"`
                "namespace_import" => {
                    if let Some(name) = find_child(&part, "identifier") {
                        out.references.push(
                            Reference::new(node_text(&name, source), specifier.clone(), path)
                                .with_line(line),
                        );
                    }
                }
                // `import { a, b as c } from "./x"` - one reference per binding
                "named_imports" => {
                    let mut inner = part.walk();
                    for spec in part.children(&mut inner) {
                        if spec.kind() != "import_specifier" {
                            continue;
                        }
                        if let Some(name) = spec.child_by_field_name("name") {
                            out.references.push(
                                Reference::new(node_text(&name, source), specifier.clone(), path)
                                    .with_line(line_of(&spec)),
                            );
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

impl Extractor for TypeScriptExtractor {
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
        Language::TypeScript
    }
}
