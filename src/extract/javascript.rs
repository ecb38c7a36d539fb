use tree_sitter::Node as TsNode;

use super::common::{find_child, line_of, node_text, unquote, SourceParser};
use super::Extractor;
use crate::core::model::{
    Declaration, DeclarationKind, Diagnostic, EngineError, Extraction, Language, Reference,
};

pub struct JavaScriptExtractor {
    parser: SourceParser,
}

impl JavaScriptExtractor {
    pub fn new() -> Result<Self, EngineError> {
        let parser = SourceParser::new(tree_sitter_javascript::language(), "javascript")?;
        Ok(Self { parser })
    }

    fn walk_root(&self, root: &TsNode, source: &[u8], path: &str, out: &mut Extraction) {
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                "export_statement" => self.handle_export(&child, source, path, out),
                "import_statement" => self.handle_import(&child, source, path, out),
                "lexical_declaration" | "variable_declaration" => {
                    self.handle_require(&child, source, path, out)
                }
                "expression_statement" => self.handle_commonjs_export(&child, source, path, out),
                _ => {}
            }
        }
    }

    fn handle_export(&self, node: &TsNode, source: &[u8], path: &str, out: &mut Extraction) {
        if let Some(decl) = node.child_by_field_name("declaration") {
            let kind = match decl.kind() {
                "function_declaration" | "generator_function_declaration" => {
                    DeclarationKind::Function
                }
                "class_declaration" => DeclarationKind::Class,
                "lexical_declaration" | "variable_declaration" => {
                    let is_const = node_text(&decl, source).starts_with("const");
                    let var_kind = if is_const {
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
                                Declaration::new(node_text(&name, source), var_kind, path)
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
                    Declaration::new(node_text(&name, source), kind, path).with_line(line_of(&decl)),
                );
            }
            return;
        }

        if let Some(clause) = find_child(node, "export_clause") {
            let specifier = node
                .child_by_field_name("source")
                .map(|s| unquote(node_text(&s, source)).to_string());
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
                    // The symbol fetched from the source module is the
                    // original name, not the alias.
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

        if find_child(node, "default").is_some() {
            out.declarations.push(
                Declaration::new("default", DeclarationKind::Unknown, path)
                    .with_line(line_of(node)),
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
            let name = specifier.rsplit('/').next().unwrap_or(&specifier).to_string();
            out.references
                .push(Reference::new(name, specifier, path).with_line(line));
            return;
        };

        let mut cursor = clause.walk();
        for part in clause.children(&mut cursor) {
            match part.kind() {
                "identifier" => out.references.push(
                    Reference::new(node_text(&part, source), specifier.clone(), path)
                        .with_line(line),
                ),
                "namespace_import" => {
                    if let Some(name) = find_child(&part, "identifier") {
                        out.references.push(
                            Reference::new(node_text(&name, source), specifier.clone(), path)
                                .with_line(line),
                        );
                    }
                }
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

    /// `const x = require("y")` and `const { a, b } = require("y")`.
    fn handle_require(&self, node: &TsNode, source: &[u8], path: &str, out: &mut Extraction) {
        let mut cursor = node.walk();
        for declarator in node.children(&mut cursor) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let Some(value) = declarator.child_by_field_name("value") else {
                continue;
            };
            let Some(specifier) = require_specifier(&value, source) else {
                continue;
            };
            let line = line_of(&declarator);
            let Some(name_node) = declarator.child_by_field_name("name") else {
                continue;
            };
            match name_node.kind() {
                "identifier" => out.references.push(
                    Reference::new(node_text(&name_node, source), specifier, path).with_line(line),
                ),
                "object_pattern" => {
                    let mut inner = name_node.walk();
                    for prop in name_node.children(&mut inner) {
                        if matches!(
                            prop.kind(),
                            "shorthand_property_identifier_pattern" | "pair_pattern"
                        ) {
                            let binding = if prop.kind() == "pair_pattern" {
                                prop.child_by_field_name("key")
                            } else {
                                Some(prop)
                            };
                            if let Some(binding) = binding {
                                out.references.push(
                                    Reference::new(
                                        node_text(&binding, source),
                                        specifier.clone(),
                                        path,
                                    )
                                    .with_line(line),
                                );
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// `module.exports = ...` and `exports.name = ...` assignments.
    fn handle_commonjs_export(
        &self,
        node: &TsNode,
        source: &[u8],
        path: &str,
        out: &mut Extraction,
    ) {
        let Some(assignment) = find_child(node, "assignment_expression") else {
            return;
        };
        let Some(left) = assignment.child_by_field_name("left") else {
            return;
        };
        if left.kind() != "member_expression" {
            return;
        }
        let text = node_text(&left, source);
        if text == "module.exports" {
            out.declarations.push(
                Declaration::new("default", DeclarationKind::Unknown, path)
                    .with_line(line_of(node)),
            );
        } else if let Some(name) = text
            .strip_prefix("module.exports.")
            .or_else(|| text.strip_prefix("exports."))
        {
            if !name.is_empty() && !name.contains('.') {
                out.declarations.push(
                    Declaration::new(name, DeclarationKind::Unknown, path)
                        .with_line(line_of(node)),
                );
            }
        }
    }
}

/// Extracts the module string from a `require("...")` call node.
fn require_specifier(value: &TsNode, source: &[u8]) -> Option<String> {
    if value.kind() != "call_expression" {
        return None;
    }
    let function = value.child_by_field_name("function")?;
    if node_text(&function, source) != "require" {
        return None;
    }
    let args = value.child_by_field_name("arguments")?;
    let arg = find_child(&args, "string")?;
    Some(unquote(node_text(&arg, source)).to_string())
}

impl Extractor for JavaScriptExtractor {
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
        Language::JavaScript
    }
}
