//! PHP parser using native tree-sitter.

use tree_sitter::{Node, Parser, Tree};

use tracing::debug;

use crate::scanner::SourceFile;

/// A parsed source unit. The tree is retained so that every pass walks the
/// same syntax; a unit either contributes to every pass or to none.
pub struct SourceUnit {
    pub file: SourceFile,
    pub tree: Tree,
}

impl SourceUnit {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn source_bytes(&self) -> &[u8] {
        self.file.source.as_bytes()
    }
}

/// PHP parser. One instance per thread; `parse_unit` takes `&mut self`
/// because tree-sitter parsers are stateful.
pub struct PhpParser {
    parser: Parser,
}

impl PhpParser {
    pub fn new() -> Result<Self, String> {
        let mut parser = Parser::new();
        let language = tree_sitter_php::LANGUAGE_PHP;
        parser
            .set_language(&language.into())
            .map_err(|e| format!("Failed to set language: {}", e))?;
        Ok(Self { parser })
    }

    /// Parse one file. Returns `None` for unparseable or empty units, which
    /// are skipped without affecting the run.
    pub fn parse_unit(&mut self, file: SourceFile) -> Option<SourceUnit> {
        let tree = match self.parser.parse(&file.source, None) {
            Some(t) => t,
            None => {
                debug!(path = %file.path.display(), "parser produced no tree, skipping");
                return None;
            }
        };

        let root = tree.root_node();
        if root.has_error() {
            debug!(path = %file.path.display(), "syntax errors, skipping");
            return None;
        }
        if root.named_child_count() == 0 {
            debug!(path = %file.path.display(), "empty syntax tree, skipping");
            return None;
        }

        Some(SourceUnit { file, tree })
    }
}

impl Default for PhpParser {
    fn default() -> Self {
        Self::new().expect("Failed to create PHP parser")
    }
}

/// Text of a node, empty on invalid UTF-8 ranges.
pub(crate) fn node_text<'a>(node: Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

/// 1-based source line of a node. Line 0 is reserved for synthesized edges.
pub(crate) fn line_of(node: Node) -> u32 {
    node.start_position().row as u32 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file(source: &str) -> SourceFile {
        SourceFile {
            path: PathBuf::from("/test/File.php"),
            relative: "File.php".to_string(),
            source: source.to_string(),
        }
    }

    #[test]
    fn parses_a_class() {
        let mut parser = PhpParser::default();
        let unit = parser.parse_unit(file("<?php class UserController { }")).unwrap();
        assert_eq!(unit.root().kind(), "program");
    }

    #[test]
    fn skips_files_with_syntax_errors() {
        let mut parser = PhpParser::default();
        assert!(parser.parse_unit(file("<?php class {{{{")).is_none());
    }

    #[test]
    fn skips_empty_source() {
        let mut parser = PhpParser::default();
        assert!(parser.parse_unit(file("")).is_none());
    }
}
