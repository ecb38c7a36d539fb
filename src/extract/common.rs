use tree_sitter::{Language as TsLanguage, Node as TsNode, Parser, Tree};

use crate::core::model::EngineError;

/// Thin wrapper holding a configured tree-sitter parser.
///
/// Parses from already-loaded content; the engine owns no file I/O after
/// discovery hands it the input triples.
pub struct SourceParser {
    parser: Parser,
}

impl SourceParser {
    pub fn new(language: TsLanguage, name: &'static str) -> Result<Self, EngineError> {
        let mut parser = Parser::new();
        parser
            .set_language(language)
            .map_err(|source| EngineError::Grammar {
                language: name,
                source,
            })?;
        Ok(Self { parser })
    }

    /// Returns `None` when tree-sitter cannot produce a tree at all
    /// (cancellation or unset language; both unexpected here).
    pub fn parse(&mut self, content: &str) -> Option<Tree> {
        self.parser.parse(content, None)
    }
}

pub fn node_text<'a>(node: &TsNode, source: &'a [u8]) -> &'a str {
    std::str::from_utf8(&source[node.byte_range()]).unwrap_or("")
}

/// 1-based line of a node's first character.
pub fn line_of(node: &TsNode) -> u32 {
    node.start_position().row as u32 + 1
}

pub fn find_child<'a>(node: &'a TsNode, kind: &str) -> Option<TsNode<'a>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| c.kind() == kind);
    found
}

/// Strips matching string quotes from an import specifier literal.
pub fn unquote(literal: &str) -> &str {
    literal
        .trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .trim()
}
