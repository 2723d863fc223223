//! Whole-project declaration index.
//!
//! Rules ask semantic questions ("is `eat` declared static on `App\Foo`?")
//! through the [`DeclarationIndex`] trait. [`ProjectIndex`] is the in-memory
//! implementation: it is filled in a sequential pass over every discovered
//! unit before any rewriting starts and is only read afterwards, so a shared
//! reference can be handed to rewrites running in parallel.

use std::collections::{HashMap, HashSet};

/// Semantic queries a rule may issue while evaluating a node.
pub trait DeclarationIndex: Send + Sync {
    /// Whether `member` is declared static on `declaration` or on anything it
    /// inherits from.
    fn is_static_member(&self, member: &str, declaration: &str) -> bool;

    /// Whether `declaration` is `ancestor` or extends it, directly or not.
    fn is_subtype_of(&self, declaration: &str, ancestor: &str) -> bool;
}

/// Member visibility facts for one declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberInfo {
    pub name: String,
    pub is_static: bool,
}

/// Class-like declaration (class, trait, enum, interface).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationInfo {
    /// Fully qualified name as written in the source, e.g. `App\Models\User`
    pub name: String,
    /// Fully qualified name of the parent declaration, if any
    pub parent: Option<String>,
    /// Fully qualified names of traits pulled in with `use`
    pub traits: Vec<String>,
    pub members: Vec<MemberInfo>,
}

impl DeclarationInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    #[must_use]
    pub fn with_trait(mut self, name: impl Into<String>) -> Self {
        self.traits.push(name.into());
        self
    }

    #[must_use]
    pub fn with_member(mut self, name: impl Into<String>, is_static: bool) -> Self {
        self.members.push(MemberInfo {
            name: name.into(),
            is_static,
        });
        self
    }

    fn member(&self, name: &str) -> Option<&MemberInfo> {
        self.members
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }
}

/// Names are matched case-insensitively and without a leading `\`.
fn normalize_key(name: &str) -> String {
    name.trim_start_matches('\\').to_ascii_lowercase()
}

#[derive(Debug, Clone, Default)]
pub struct ProjectIndex {
    declarations: HashMap<String, DeclarationInfo>,
}

impl ProjectIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declaration. A later declaration with the same name
    /// replaces the earlier one.
    pub fn insert(&mut self, declaration: DeclarationInfo) {
        let key = normalize_key(&declaration.name);
        if self.declarations.insert(key, declaration).is_some() {
            log::debug!("Duplicate declaration replaced in project index");
        }
    }

    pub fn get(&self, name: &str) -> Option<&DeclarationInfo> {
        self.declarations.get(&normalize_key(name))
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Find the first declaration of `member` reachable from `declaration`:
    /// the declaration itself, then its traits, then its parent chain.
    fn resolve_member(&self, member: &str, declaration: &str) -> Option<&MemberInfo> {
        let mut visited = HashSet::new();
        let mut pending = vec![normalize_key(declaration)];

        while let Some(key) = pending.pop() {
            if !visited.insert(key.clone()) {
                continue;
            }
            let Some(info) = self.declarations.get(&key) else {
                continue;
            };
            if let Some(found) = info.member(member) {
                return Some(found);
            }
            // Parent is searched after the traits, so it goes on the stack first.
            if let Some(parent) = &info.parent {
                pending.push(normalize_key(parent));
            }
            pending.extend(info.traits.iter().rev().map(|t| normalize_key(t)));
        }

        None
    }
}

impl DeclarationIndex for ProjectIndex {
    fn is_static_member(&self, member: &str, declaration: &str) -> bool {
        self.resolve_member(member, declaration)
            .is_some_and(|m| m.is_static)
    }

    fn is_subtype_of(&self, declaration: &str, ancestor: &str) -> bool {
        let target = normalize_key(ancestor);
        let mut visited = HashSet::new();
        let mut current = Some(normalize_key(declaration));

        while let Some(key) = current {
            if key == target {
                return true;
            }
            if !visited.insert(key.clone()) {
                log::warn!("Inheritance cycle detected at {}", key);
                return false;
            }
            current = self
                .declarations
                .get(&key)
                .and_then(|info| info.parent.as_deref())
                .map(normalize_key);
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> ProjectIndex {
        let mut index = ProjectIndex::new();
        index.insert(
            DeclarationInfo::new("App\\Base")
                .with_member("make", true)
                .with_member("run", false),
        );
        index.insert(
            DeclarationInfo::new("App\\Helpers")
                .with_member("helper", true),
        );
        index.insert(
            DeclarationInfo::new("App\\Child")
                .with_parent("App\\Base")
                .with_trait("App\\Helpers")
                .with_member("run", true),
        );
        index
    }

    #[test]
    fn test_own_static_member() {
        let index = sample_index();
        assert!(index.is_static_member("make", "App\\Base"));
        assert!(!index.is_static_member("run", "App\\Base"));
    }

    #[test]
    fn test_inherited_and_trait_members() {
        let index = sample_index();
        assert!(index.is_static_member("make", "App\\Child"));
        assert!(index.is_static_member("helper", "App\\Child"));
    }

    #[test]
    fn test_override_shadows_parent() {
        let index = sample_index();
        assert!(index.is_static_member("run", "App\\Child"));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let index = sample_index();
        assert!(index.is_static_member("MAKE", "\\app\\base"));
    }

    #[test]
    fn test_unknown_declaration_or_member() {
        let index = sample_index();
        assert!(!index.is_static_member("make", "App\\Missing"));
        assert!(!index.is_static_member("missing", "App\\Child"));
    }

    #[test]
    fn test_subtype_through_external_parent() {
        let mut index = ProjectIndex::new();
        index.insert(
            DeclarationInfo::new("Tests\\BaseTest").with_parent("PHPUnit\\Framework\\TestCase"),
        );
        index.insert(DeclarationInfo::new("Tests\\FooTest").with_parent("Tests\\BaseTest"));

        assert!(index.is_subtype_of("Tests\\FooTest", "PHPUnit\\Framework\\TestCase"));
        assert!(index.is_subtype_of("Tests\\FooTest", "Tests\\FooTest"));
        assert!(!index.is_subtype_of("Tests\\BaseTest", "Tests\\FooTest"));
    }

    #[test]
    fn test_inheritance_cycle_terminates() {
        let mut index = ProjectIndex::new();
        index.insert(DeclarationInfo::new("A").with_parent("B"));
        index.insert(DeclarationInfo::new("B").with_parent("A"));

        assert!(!index.is_subtype_of("A", "C"));
        assert!(!index.is_static_member("x", "A"));
    }
}
