use tree_sitter::Node as TsNode;

use super::common::{find_child, line_of, node_text, SourceParser};
use super::Extractor;
use crate::core::model::{
    Declaration, DeclarationKind, Diagnostic, EngineError, Extraction, Language, Reference,
};

pub struct PythonExtractor {
    parser: SourceParser,
}

impl PythonExtractor {
    pub fn new() -> Result<Self, EngineError> {
        let parser = SourceParser::new(tree_sitter_python::language(), "python")?;
        Ok(Self { parser })
    }

    fn walk_root(&self, root: &TsNode, source: &[u8], path: &str, out: &mut Extraction) {
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                "function_definition" => {
                    self.collect_definition(&child, source, path, DeclarationKind::Function, out)
                }
                "class_definition" => {
                    self.collect_definition(&child, source, path, DeclarationKind::Class, out)
                }
                "decorated_definition" => {
                    // The decorator wraps the real definition.
                    if let Some(def) = find_child(&child, "function_definition") {
                        self.collect_definition(&def, source, path, DeclarationKind::Function, out);
                    } else if let Some(def) = find_child(&child, "class_definition") {
                        self.collect_definition(&def, source, path, DeclarationKind::Class, out);
                    }
                }
                "import_statement" => self.handle_import(&child, source, path, out),
                "import_from_statement" => self.handle_from_import(&child, source, path, out),
                "expression_statement" => self.handle_assignment(&child, source, path, out),
                _ => {}
            }
        }
    }

    /// Module-level `def`/`class`. A leading underscore marks the symbol
    /// private by convention, so it is not an export.
    fn collect_definition(
        &self,
        node: &TsNode,
        source: &[u8],
        path: &str,
        kind: DeclarationKind,
        out: &mut Extraction,
    ) {
        if let Some(name_node) = node.child_by_field_name("name") {
            let name = node_text(&name_node, source);
            if name.starts_with('_') {
                return;
            }
            out.declarations
                .push(Declaration::new(name, kind, path).with_line(line_of(node)));
        }
    }

    /// `import a.b`, `import a.b as c` - the binding is the alias, or the
    /// final module segment.
    fn handle_import(&self, node: &TsNode, source: &[u8], path: &str, out: &mut Extraction) {
        let line = line_of(node);
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "dotted_name" => {
                    let raw = node_text(&child, source);
                    // The final segment names the module whose exports the
                    // import makes reachable; recording it lets the
                    // whole-module suppression downstream match the target
                    // file's basename.
                    let binding = raw.rsplit('.').next().unwrap_or(raw);
                    out.references
                        .push(Reference::new(binding, raw, path).with_line(line));
                }
                "aliased_import" => {
                    let raw = child
                        .child_by_field_name("name")
                        .map(|n| node_text(&n, source))
                        .unwrap_or_default();
                    let binding = child
                        .child_by_field_name("alias")
                        .map(|n| node_text(&n, source))
                        .unwrap_or(raw);
                    if !raw.is_empty() {
                        out.references
                            .push(Reference::new(binding, raw, path).with_line(line));
                    }
                }
                _ => {}
            }
        }
    }

    /// `from x import y, z` - one reference per imported name, specifier
    /// preserved exactly as written (including relative leading dots).
    fn handle_from_import(&self, node: &TsNode, source: &[u8], path: &str, out: &mut Extraction) {
        let line = line_of(node);
        let Some(module) = node.child_by_field_name("module_name") else {
            return;
        };
        let specifier = node_text(&module, source).to_string();

        let mut saw_module = false;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            // Skip the module-name node itself; the rest of the dotted/aliased
            // children are the imported bindings.
            if child.id() == module.id() {
                saw_module = true;
                continue;
            }
            if !saw_module {
                continue;
            }
            match child.kind() {
                "dotted_name" | "identifier" => {
                    out.references.push(
                        Reference::new(node_text(&child, source), specifier.clone(), path)
                            .with_line(line),
                    );
                }
                "aliased_import" => {
                    // The symbol looked up in the target module is the
                    // original name, not the alias.
                    if let Some(name) = child.child_by_field_name("name") {
                        out.references.push(
                            Reference::new(node_text(&name, source), specifier.clone(), path)
                                .with_line(line),
                        );
                    }
                }
                "wildcard_import" => {
                    out.references
                        .push(Reference::new("*", specifier.clone(), path).with_line(line));
                }
                _ => {}
            }
        }
    }

    /// Module-level simple assignments: ALL_CAPS names are constants,
    /// other public names are variables.
    fn handle_assignment(&self, node: &TsNode, source: &[u8], path: &str, out: &mut Extraction) {
        let Some(assignment) = find_child(node, "assignment") else {
            return;
        };
        let Some(left) = assignment.child_by_field_name("left") else {
            return;
        };
        if left.kind() != "identifier" {
            return;
        }
        let name = node_text(&left, source);
        if name.starts_with('_') {
            return;
        }
        let kind = if name.chars().all(|c| c.is_uppercase() || c == '_' || c.is_ascii_digit()) {
            DeclarationKind::Const
        } else {
            DeclarationKind::Variable
        };
        out.declarations
            .push(Declaration::new(name, kind, path).with_line(line_of(node)));
    }
}

impl Extractor for PythonExtractor {
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
        Language::Python
    }
}
