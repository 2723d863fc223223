//! Rule dispatch over a syntax tree.
//!
//! [`RuleRegistry`] maps each [`NodeKind`] to the rules interested in it, in
//! registration order. [`Dispatcher::apply_all`] walks a tree in pre-order,
//! shows every node to its rules and applies the first change any of them
//! asks for. A replacement is not shown to rules again in the same pass, but
//! its children are.

use crate::core::{NodeKind, SyntaxNode};
use crate::index::DeclarationIndex;
use crate::observability::set_current_rule;
use crate::rules::{Ancestor, NodeContext, Rule, RuleDefinition, RuleOutcome};
use serde::Serialize;
use std::collections::HashMap;

pub const DEFAULT_MAX_PASSES: usize = 10;

#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
    by_kind: HashMap<NodeKind, Vec<usize>>,
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        let position = self.rules.len();
        for kind in rule.node_kinds() {
            let interested = self.by_kind.entry(kind).or_default();
            if !interested.contains(&position) {
                interested.push(position);
            }
        }
        self.rules.push(rule);
    }

    #[must_use]
    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.register(Box::new(rule));
        self
    }

    /// Rules interested in `kind`, in registration order.
    pub fn rules_for<'a>(&'a self, kind: &NodeKind) -> impl Iterator<Item = &'a dyn Rule> + 'a {
        self.by_kind
            .get(kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(move |&i| self.rules[i].as_ref())
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    pub fn definitions(&self) -> Vec<(&'static str, RuleDefinition)> {
        self.rules().map(|r| (r.name(), r.definition())).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PassMode {
    /// One pass; replacements are not revisited.
    #[default]
    Single,
    /// Repeat passes until one applies nothing, at most `max_passes` times.
    Converge { max_passes: usize },
}

/// One applied rule outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Application {
    pub rule: &'static str,
    pub kind: String,
    pub removed: bool,
}

#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub tree: SyntaxNode,
    pub applied: usize,
    pub passes: usize,
    pub applications: Vec<Application>,
}

pub struct Dispatcher<'r> {
    registry: &'r RuleRegistry,
    mode: PassMode,
}

impl<'r> Dispatcher<'r> {
    pub fn new(registry: &'r RuleRegistry) -> Self {
        Self {
            registry,
            mode: PassMode::default(),
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: PassMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn apply_all(&self, mut tree: SyntaxNode, index: &dyn DeclarationIndex) -> DispatchOutcome {
        let max_passes = match self.mode {
            PassMode::Single => 1,
            PassMode::Converge { max_passes } => max_passes.max(1),
        };

        let mut applications = Vec::new();
        let mut passes = 0;

        while passes < max_passes {
            passes += 1;
            let before = applications.len();
            self.run_pass(&mut tree, index, &mut applications);

            if applications.len() == before {
                break;
            }
            if passes == max_passes && matches!(self.mode, PassMode::Converge { .. }) {
                log::warn!(
                    "Rewrite did not converge after {} passes; last pass applied {} changes",
                    max_passes,
                    applications.len() - before
                );
            }
        }

        DispatchOutcome {
            tree,
            applied: applications.len(),
            passes,
            applications,
        }
    }

    fn run_pass(
        &self,
        root: &mut SyntaxNode,
        index: &dyn DeclarationIndex,
        applications: &mut Vec<Application>,
    ) {
        let mut ancestors = Vec::new();

        match self.evaluate(root, &ancestors, index) {
            Some((rule, RuleOutcome::Replace(mut replacement))) => {
                applications.push(application(rule, root, false));
                replacement.inherit_position(root);
                *root = replacement;
                self.walk_children(root, &mut ancestors, index, applications);
            }
            Some((rule, RuleOutcome::Remove)) => {
                applications.push(application(rule, root, true));
                root.clear();
            }
            _ => self.walk_children(root, &mut ancestors, index, applications),
        }
    }

    fn walk_children(
        &self,
        node: &mut SyntaxNode,
        ancestors: &mut Vec<Ancestor>,
        index: &dyn DeclarationIndex,
        applications: &mut Vec<Application>,
    ) {
        ancestors.push(Ancestor::of(node));

        let children = node.children_mut();
        let mut i = 0;
        while i < children.len() {
            match self.evaluate(&children[i], ancestors, index) {
                Some((rule, RuleOutcome::Replace(mut replacement))) => {
                    applications.push(application(rule, &children[i], false));
                    replacement.inherit_position(&children[i]);
                    children[i] = replacement;
                    self.walk_children(&mut children[i], ancestors, index, applications);
                    i += 1;
                }
                Some((rule, RuleOutcome::Remove)) => {
                    applications.push(application(rule, &children[i], true));
                    children.remove(i);
                }
                _ => {
                    self.walk_children(&mut children[i], ancestors, index, applications);
                    i += 1;
                }
            }
        }

        ancestors.pop();
    }

    /// First change requested by a rule interested in `node`.
    fn evaluate(
        &self,
        node: &SyntaxNode,
        ancestors: &[Ancestor],
        index: &dyn DeclarationIndex,
    ) -> Option<(&'static str, RuleOutcome)> {
        let ctx = NodeContext::new(ancestors, index);
        self.registry
            .rules_for(node.kind())
            .map(|rule| {
                let _rule = set_current_rule(rule.name());
                (rule.name(), rule.evaluate(node, &ctx))
            })
            .find(|(_, outcome)| outcome.is_change())
    }
}

fn application(rule: &'static str, node: &SyntaxNode, removed: bool) -> Application {
    Application {
        rule,
        kind: node.kind().to_string(),
        removed,
    }
}

/// Apply `registry` to `tree` in a single pass, returning the rewritten tree
/// and the number of changes made.
pub fn apply_all(
    tree: SyntaxNode,
    registry: &RuleRegistry,
    index: &dyn DeclarationIndex,
) -> (SyntaxNode, usize) {
    let outcome = Dispatcher::new(registry).apply_all(tree, index);
    (outcome.tree, outcome.applied)
}
