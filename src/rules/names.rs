//! Stateless name and kind predicates shared by rules.

use crate::core::{NodeKind, SyntaxNode};
use glob::{MatchOptions, Pattern};

const NAME_MATCH: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Match an identifier against a name or a wildcard pattern such as
/// `assert*`. Identifiers compare case-insensitively.
pub fn matches_name(actual: &str, pattern: &str) -> bool {
    if !pattern.contains(['*', '?', '[']) {
        return actual.eq_ignore_ascii_case(pattern);
    }
    Pattern::new(pattern)
        .map(|p| p.matches_with(actual, NAME_MATCH))
        .unwrap_or(false)
}

/// Text of `node` when it is a statically known identifier, i.e. one of
/// `identifier_kinds`. Computed or variable names yield `None`.
pub fn static_identifier(node: &SyntaxNode, identifier_kinds: &[NodeKind]) -> Option<String> {
    identifier_kinds
        .contains(node.kind())
        .then(|| node.text())
        .filter(|text| !text.is_empty())
}

/// Whether `node` is a variable reference of `variable_kind` spelled `spelling`
/// (for example `$this`).
pub fn is_variable(node: &SyntaxNode, variable_kind: &NodeKind, spelling: &str) -> bool {
    node.is_kind(variable_kind) && node.text() == spelling
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_name_exact_is_case_insensitive() {
        assert!(matches_name("assertSame", "ASSERTSAME"));
        assert!(!matches_name("assertSame", "assert"));
    }

    #[test]
    fn test_matches_name_prefix_wildcard() {
        assert!(matches_name("assertSame", "assert*"));
        assert!(matches_name("AssertTrue", "assert*"));
        assert!(!matches_name("doAssert", "assert*"));
    }

    #[test]
    fn test_static_identifier() {
        let kinds = [NodeKind::from_static("name")];
        let name = SyntaxNode::leaf("name", "eat");
        let dynamic = SyntaxNode::branch(
            "variable_name",
            vec![SyntaxNode::leaf("$", "$"), SyntaxNode::leaf("name", "method")],
        );

        assert_eq!(static_identifier(&name, &kinds).as_deref(), Some("eat"));
        assert_eq!(static_identifier(&dynamic, &kinds), None);
    }

    #[test]
    fn test_is_variable() {
        let kind = NodeKind::from_static("variable_name");
        let this = SyntaxNode::branch(
            "variable_name",
            vec![SyntaxNode::leaf("$", "$"), SyntaxNode::leaf("name", "this")],
        );
        assert!(is_variable(&this, &kind, "$this"));
        assert!(!is_variable(&this, &kind, "$that"));
    }
}
