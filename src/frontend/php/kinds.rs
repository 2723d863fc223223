//! Node kinds produced by the `tree-sitter-php` grammar that refit looks at.

use crate::core::NodeKind;

pub const PROGRAM: NodeKind = NodeKind::from_static("program");
pub const NAME: NodeKind = NodeKind::from_static("name");
pub const QUALIFIED_NAME: NodeKind = NodeKind::from_static("qualified_name");
pub const NAMESPACE_NAME: NodeKind = NodeKind::from_static("namespace_name");
pub const VARIABLE_NAME: NodeKind = NodeKind::from_static("variable_name");

pub const NAMESPACE_DEFINITION: NodeKind = NodeKind::from_static("namespace_definition");
pub const NAMESPACE_USE_DECLARATION: NodeKind = NodeKind::from_static("namespace_use_declaration");
pub const NAMESPACE_USE_CLAUSE: NodeKind = NodeKind::from_static("namespace_use_clause");
pub const NAMESPACE_ALIASING_CLAUSE: NodeKind = NodeKind::from_static("namespace_aliasing_clause");

pub const CLASS_DECLARATION: NodeKind = NodeKind::from_static("class_declaration");
pub const TRAIT_DECLARATION: NodeKind = NodeKind::from_static("trait_declaration");
pub const ENUM_DECLARATION: NodeKind = NodeKind::from_static("enum_declaration");
pub const INTERFACE_DECLARATION: NodeKind = NodeKind::from_static("interface_declaration");
pub const ANONYMOUS_CLASS: NodeKind = NodeKind::from_static("anonymous_class");
pub const DECLARATION_LIST: NodeKind = NodeKind::from_static("declaration_list");
pub const ENUM_DECLARATION_LIST: NodeKind = NodeKind::from_static("enum_declaration_list");
pub const BASE_CLAUSE: NodeKind = NodeKind::from_static("base_clause");
pub const USE_DECLARATION: NodeKind = NodeKind::from_static("use_declaration");
pub const METHOD_DECLARATION: NodeKind = NodeKind::from_static("method_declaration");
pub const STATIC_MODIFIER: NodeKind = NodeKind::from_static("static_modifier");

pub const MEMBER_CALL_EXPRESSION: NodeKind = NodeKind::from_static("member_call_expression");
pub const SCOPED_CALL_EXPRESSION: NodeKind = NodeKind::from_static("scoped_call_expression");
pub const RELATIVE_SCOPE: NodeKind = NodeKind::from_static("relative_scope");
pub const ARGUMENTS: NodeKind = NodeKind::from_static("arguments");

pub const SELF_KEYWORD: NodeKind = NodeKind::from_static("self");
pub const SCOPE_RESOLUTION: NodeKind = NodeKind::from_static("::");
pub const MEMBER_ACCESS: NodeKind = NodeKind::from_static("->");

/// Declarations that can own methods and take part in inheritance.
pub const CLASS_LIKE: [NodeKind; 4] = [
    CLASS_DECLARATION,
    TRAIT_DECLARATION,
    ENUM_DECLARATION,
    INTERFACE_DECLARATION,
];

pub fn is_class_like(kind: &NodeKind) -> bool {
    CLASS_LIKE.contains(kind)
}
