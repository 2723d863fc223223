//! tree-sitter CST to [`SyntaxNode`] conversion.
//!
//! Every tree-sitter node, named or anonymous, becomes a [`SyntaxNode`].
//! Bytes between siblings are stored as the next sibling's leading trivia and
//! bytes after the last child as the parent's trailing trivia, so the
//! converted tree covers the source exactly.

use crate::core::{NodeKind, SyntaxNode};
use tree_sitter::Node;

pub(crate) fn convert_tree(tree: &tree_sitter::Tree, source: &str) -> SyntaxNode {
    let root = tree.root_node();
    let converted = convert_node(root, source);

    let leading = slice(source, 0, root.start_byte());
    let trailing = format!(
        "{}{}",
        converted.trailing(),
        slice(source, root.end_byte(), source.len())
    );

    converted.with_leading(leading).with_trailing(trailing)
}

fn convert_node(node: Node<'_>, source: &str) -> SyntaxNode {
    let kind = NodeKind::from_static(node.kind());

    if node.child_count() == 0 {
        return SyntaxNode::leaf(kind, slice(source, node.start_byte(), node.end_byte()));
    }

    let mut children = Vec::with_capacity(node.child_count());
    let mut offset = node.start_byte();
    let mut cursor = node.walk();

    if cursor.goto_first_child() {
        loop {
            let child = cursor.node();
            let mut converted =
                convert_node(child, source).with_leading(slice(source, offset, child.start_byte()));
            if let Some(field) = cursor.field_name() {
                converted = converted.with_field(field);
            }
            children.push(converted);
            offset = offset.max(child.end_byte());

            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }

    SyntaxNode::branch(kind, children).with_trailing(slice(source, offset, node.end_byte()))
}

/// Byte-range slice that never panics on malformed ranges.
fn slice(source: &str, start: usize, end: usize) -> &str {
    if start >= end {
        return "";
    }
    source.get(start..end).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_out_of_range_is_empty() {
        assert_eq!(slice("abc", 2, 1), "");
        assert_eq!(slice("abc", 1, 10), "");
        assert_eq!(slice("abc", 0, 2), "ab");
    }
}
