//! Rule contract.
//!
//! A rule declares which [`NodeKind`]s it cares about and, for each node of
//! those kinds, returns a [`RuleOutcome`]. Rules never touch the tree
//! themselves: the dispatcher applies the outcome, which keeps dry runs and
//! repeated passes uniform.
//!
//! Preconditions inside `evaluate` are ordered cheapest first. Shape checks
//! on the node come before name checks, and name checks come before any
//! [`DeclarationIndex`] query; the first failing check returns
//! [`RuleOutcome::NoChange`].

pub mod catalog;
pub mod names;
pub mod this_call_on_static_method;

use crate::core::{NodeKind, SyntaxNode};
use crate::index::DeclarationIndex;
use serde::Serialize;

pub use this_call_on_static_method::ThisCallOnStaticMethodToStaticCall;

/// What a rule wants done with the node it was shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    NoChange,
    Replace(SyntaxNode),
    Remove,
}

impl RuleOutcome {
    pub fn is_change(&self) -> bool {
        !matches!(self, RuleOutcome::NoChange)
    }
}

/// Before/after pair shown in documentation and used as a test fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeSample {
    pub before: String,
    pub after: String,
}

impl CodeSample {
    pub fn new(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleDefinition {
    pub description: String,
    pub samples: Vec<CodeSample>,
}

impl RuleDefinition {
    pub fn new(description: impl Into<String>, samples: Vec<CodeSample>) -> Self {
        Self {
            description: description.into(),
            samples,
        }
    }
}

/// Snapshot of an enclosing node, taken when the dispatcher descends into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ancestor {
    pub kind: NodeKind,
    pub name: Option<String>,
}

impl Ancestor {
    pub fn of(node: &SyntaxNode) -> Self {
        Self {
            kind: node.kind().clone(),
            name: node.declared_name(),
        }
    }
}

/// Read-only view handed to a rule together with the node under evaluation.
pub struct NodeContext<'a> {
    ancestors: &'a [Ancestor],
    index: &'a dyn DeclarationIndex,
}

impl<'a> NodeContext<'a> {
    pub fn new(ancestors: &'a [Ancestor], index: &'a dyn DeclarationIndex) -> Self {
        Self { ancestors, index }
    }

    /// Enclosing nodes, outermost first.
    pub fn ancestors(&self) -> &'a [Ancestor] {
        self.ancestors
    }

    pub fn parent(&self) -> Option<&'a Ancestor> {
        self.ancestors.last()
    }

    pub fn index(&self) -> &'a dyn DeclarationIndex {
        self.index
    }

    /// Nearest ancestor whose kind is one of `kinds`.
    pub fn enclosing(&self, kinds: &[NodeKind]) -> Option<&'a Ancestor> {
        self.ancestors
            .iter()
            .rev()
            .find(|a| kinds.contains(&a.kind))
    }

    /// Name of the nearest enclosing declaration of one of `kinds`.
    ///
    /// `None` when there is no such ancestor or when the nearest one is
    /// anonymous; an outer named declaration is never used in its place.
    pub fn enclosing_name(&self, kinds: &[NodeKind]) -> Option<&'a str> {
        self.enclosing(kinds).and_then(|a| a.name.as_deref())
    }
}

/// A self-contained rewrite: interest declaration plus node evaluation.
///
/// `evaluate` must be a pure function of the node and context. It may be
/// called from several threads at once for different source units.
pub trait Rule: Send + Sync {
    /// Stable identifier used in configuration and reports.
    fn name(&self) -> &'static str;

    fn definition(&self) -> RuleDefinition;

    fn node_kinds(&self) -> Vec<NodeKind>;

    fn evaluate(&self, node: &SyntaxNode, ctx: &NodeContext<'_>) -> RuleOutcome;
}
