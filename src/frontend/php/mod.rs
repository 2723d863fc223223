//! PHP frontend backed by `tree-sitter-php`.

mod convert;
pub mod kinds;
mod resolve;

pub use resolve::{PARENT_NAME, TRAIT_NAMES};

use super::{Frontend, Language};
use crate::core::SyntaxNode;
use crate::errors::{Error, Result};
use crate::index::ProjectIndex;
use std::path::Path;
use tree_sitter::Parser;

#[derive(Debug, Default, Clone, Copy)]
pub struct PhpFrontend;

impl PhpFrontend {
    pub fn new() -> Self {
        Self
    }

    /// A fresh parser per call keeps the frontend `Sync`; parser setup is
    /// cheap next to parsing itself.
    fn parser() -> Result<Parser> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_php::LANGUAGE_PHP.into())
            .map_err(|e| Error::Frontend(format!("Failed to set PHP language: {}", e)))?;
        Ok(parser)
    }
}

fn first_error_position(node: tree_sitter::Node<'_>) -> Option<tree_sitter::Point> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position());
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error_position)
}

impl Frontend for PhpFrontend {
    fn language(&self) -> Language {
        Language::Php
    }

    fn parse(&self, source: &str, path: &Path) -> Result<SyntaxNode> {
        let mut parser = Self::parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| Error::parse(path, "parser returned no tree"))?;

        let root = tree.root_node();
        if root.has_error() {
            let message = match first_error_position(root) {
                Some(point) => format!(
                    "syntax error at line {}, column {}",
                    point.row + 1,
                    point.column + 1
                ),
                None => "syntax error".to_string(),
            };
            return Err(Error::parse(path, message));
        }

        let mut converted = convert::convert_tree(&tree, source);
        resolve::resolve_names(&mut converted);
        Ok(converted)
    }

    fn collect_declarations(&self, tree: &SyntaxNode, index: &mut ProjectIndex) {
        resolve::collect_declarations(tree, index);
    }
}
