//! Namespace-aware name resolution for PHP declarations.
//!
//! Runs once per parsed unit and records, on every class-like declaration,
//! its fully qualified name, its resolved parent and the traits it uses.
//! Later stages (rule context, index collection) read these attributes and
//! never need to track namespaces or `use` imports themselves.

use super::kinds;
use crate::core::ast::QUALIFIED_NAME;
use crate::core::SyntaxNode;
use crate::index::{DeclarationInfo, ProjectIndex};
use std::collections::HashMap;

pub const PARENT_NAME: &str = "parent_name";
pub const TRAIT_NAMES: &str = "trait_names";

const TRAIT_SEPARATOR: char = ',';

#[derive(Debug, Default, Clone)]
struct Scope {
    namespace: String,
    /// Lowercased alias to fully qualified name
    imports: HashMap<String, String>,
}

impl Scope {
    fn enter_namespace(&mut self, namespace: String) {
        self.namespace = namespace;
        self.imports.clear();
    }

    fn declare(&self, name: &str) -> String {
        if self.namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}\\{}", self.namespace, name)
        }
    }

    /// Resolve a class reference the way PHP does for class names.
    fn resolve(&self, reference: &str) -> String {
        if let Some(absolute) = reference.strip_prefix('\\') {
            return absolute.to_string();
        }
        if let Some(relative) = reference
            .strip_prefix("namespace\\")
            .or_else(|| reference.strip_prefix("NAMESPACE\\"))
        {
            return self.declare(relative);
        }

        let (head, rest) = match reference.split_once('\\') {
            Some((head, rest)) => (head, Some(rest)),
            None => (reference, None),
        };
        match (self.imports.get(&head.to_ascii_lowercase()), rest) {
            (Some(imported), Some(rest)) => format!("{}\\{}", imported, rest),
            (Some(imported), None) => imported.clone(),
            (None, _) => self.declare(reference),
        }
    }

    fn import(&mut self, target: &str, alias: Option<String>) {
        let target = target.trim_start_matches('\\').to_string();
        let alias = alias.unwrap_or_else(|| last_segment(&target).to_string());
        self.imports.insert(alias.to_ascii_lowercase(), target);
    }
}

fn last_segment(name: &str) -> &str {
    name.rsplit('\\').next().unwrap_or(name)
}

fn is_class_reference(node: &SyntaxNode) -> bool {
    node.is_kind(&kinds::NAME) || node.is_kind(&kinds::QUALIFIED_NAME)
}

/// Annotate every class-like declaration in `root` with resolved names.
pub(crate) fn resolve_names(root: &mut SyntaxNode) {
    let mut scope = Scope::default();
    resolve_in(root, &mut scope);
}

fn resolve_in(node: &mut SyntaxNode, scope: &mut Scope) {
    for child in node.children_mut().iter_mut() {
        if child.is_kind(&kinds::NAMESPACE_DEFINITION) {
            let namespace = child
                .child_by_field("name")
                .map(SyntaxNode::text)
                .unwrap_or_default();
            if child.child_by_field("body").is_some() {
                let mut inner = Scope::default();
                inner.enter_namespace(namespace);
                resolve_in(child, &mut inner);
            } else {
                scope.enter_namespace(namespace);
            }
        } else if child.is_kind(&kinds::NAMESPACE_USE_DECLARATION) {
            register_imports(child, scope);
        } else {
            if kinds::is_class_like(child.kind()) {
                annotate_declaration(child, scope);
            }
            resolve_in(child, scope);
        }
    }
}

fn register_imports(declaration: &SyntaxNode, scope: &mut Scope) {
    // `use function ...;` and `use const ...;` do not import class names.
    let imports_classes = !declaration.children().iter().any(|c| {
        c.token_text()
            .is_some_and(|t| t.eq_ignore_ascii_case("function") || t.eq_ignore_ascii_case("const"))
    });
    if !imports_classes {
        return;
    }

    let group_prefix = declaration
        .child_of_kind(&kinds::NAMESPACE_NAME)
        .map(SyntaxNode::text);

    for clause in declaration.descendants().filter(|n| is_use_clause(n)) {
        let Some(target) = clause.children().iter().find(|c| {
            is_class_reference(c) && c.field() != Some("alias")
        }) else {
            continue;
        };
        let target = match &group_prefix {
            Some(prefix) => format!("{}\\{}", prefix, target.text()),
            None => target.text(),
        };
        scope.import(&target, use_alias(clause));
    }
}

fn is_use_clause(node: &SyntaxNode) -> bool {
    node.is_kind(&kinds::NAMESPACE_USE_CLAUSE) || node.kind().as_str() == "namespace_use_group_clause"
}

fn use_alias(clause: &SyntaxNode) -> Option<String> {
    clause
        .child_by_field("alias")
        .map(SyntaxNode::text)
        .or_else(|| {
            clause
                .child_of_kind(&kinds::NAMESPACE_ALIASING_CLAUSE)
                .and_then(|c| c.child_of_kind(&kinds::NAME))
                .map(SyntaxNode::text)
        })
}

fn annotate_declaration(declaration: &mut SyntaxNode, scope: &Scope) {
    let Some(name) = declaration.child_by_field("name").map(SyntaxNode::text) else {
        return;
    };
    let qualified = scope.declare(&name);

    let parent = declaration
        .child_of_kind(&kinds::BASE_CLAUSE)
        .and_then(|clause| clause.children().iter().find(|c| is_class_reference(c)))
        .map(|reference| scope.resolve(&reference.text()));

    let traits: Vec<String> = declaration
        .child_by_field("body")
        .map(|body| {
            body.children()
                .iter()
                .filter(|c| c.is_kind(&kinds::USE_DECLARATION))
                .flat_map(|use_decl| use_decl.children().iter().filter(|c| is_class_reference(c)))
                .map(|reference| scope.resolve(&reference.text()))
                .collect()
        })
        .unwrap_or_default();

    declaration.set_attribute(QUALIFIED_NAME, qualified);
    if let Some(parent) = parent {
        declaration.set_attribute(PARENT_NAME, parent);
    }
    if !traits.is_empty() {
        let joined = traits.join(&TRAIT_SEPARATOR.to_string());
        declaration.set_attribute(TRAIT_NAMES, joined);
    }
}

fn is_static_method(method: &SyntaxNode) -> bool {
    method.children().iter().any(|c| {
        c.is_kind(&kinds::STATIC_MODIFIER)
            || c.token_text()
                .is_some_and(|t| t.eq_ignore_ascii_case("static"))
    })
}

/// Turn the annotated declarations of a unit into index entries.
pub(crate) fn collect_declarations(root: &SyntaxNode, index: &mut ProjectIndex) {
    for declaration in root.descendants().filter(|n| kinds::is_class_like(n.kind())) {
        let Some(name) = declaration.declared_name() else {
            continue;
        };
        let mut info = DeclarationInfo::new(name);

        if let Some(parent) = declaration.attribute(PARENT_NAME) {
            info = info.with_parent(parent);
        }
        if let Some(traits) = declaration.attribute(TRAIT_NAMES) {
            for name in traits.split(TRAIT_SEPARATOR).filter(|t| !t.is_empty()) {
                info = info.with_trait(name);
            }
        }

        let methods = declaration
            .child_by_field("body")
            .map(|body| body.children())
            .unwrap_or_default()
            .iter()
            .filter(|c| c.is_kind(&kinds::METHOD_DECLARATION));
        for method in methods {
            if let Some(method_name) = method.child_by_field("name").map(SyntaxNode::text) {
                info = info.with_member(method_name, is_static_method(method));
            }
        }

        index.insert(info);
    }
}
