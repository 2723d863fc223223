//! Language frontends: source text to [`SyntaxNode`] and back.
//!
//! The rewrite engine itself never looks at a grammar. A frontend turns a
//! source unit into a lossless tree, prints it back, and reports the
//! declarations the unit contributes to the project index.

pub mod php;

use crate::core::SyntaxNode;
use crate::errors::Result;
use crate::index::ProjectIndex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Php,
}

impl Language {
    /// File extensions this language is discovered by, without the dot
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Php => &["php"],
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        [Language::Php]
            .into_iter()
            .find(|lang| lang.extensions().contains(&ext))
    }
}

pub trait Frontend: Send + Sync {
    fn language(&self) -> Language;

    /// Parse one unit. Sources with syntax errors are rejected rather than
    /// handed to rules as partial trees.
    fn parse(&self, source: &str, path: &Path) -> Result<SyntaxNode>;

    /// Print a tree back to source. Untouched subtrees keep their exact
    /// original text.
    fn print(&self, tree: &SyntaxNode) -> String {
        tree.to_source()
    }

    /// Add every declaration found in `tree` to `index`.
    fn collect_declarations(&self, tree: &SyntaxNode, index: &mut ProjectIndex);
}

pub fn get_frontend(language: Language) -> Box<dyn Frontend> {
    match language {
        Language::Php => Box::new(php::PhpFrontend::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_extension() {
        assert_eq!(Language::from_extension("php"), Some(Language::Php));
        assert_eq!(Language::from_extension("PHP"), None);
        assert_eq!(Language::from_extension("rs"), None);
    }

    #[test]
    fn test_get_frontend_reports_language() {
        assert_eq!(get_frontend(Language::Php).language(), Language::Php);
    }
}
