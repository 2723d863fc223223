//! Lossless syntax tree shared by every frontend and rule.
//!
//! A [`SyntaxNode`] owns its children. Leaves carry their source text, and
//! every node carries the trivia (whitespace, inline markup) that preceded it
//! in the original source, plus any trailing trivia before its parent's next
//! token. Printing concatenates trivia and leaf text in order, so a tree that
//! no rule touched prints back to the exact bytes it was parsed from.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// Attribute a frontend sets on declarations whose fully qualified name
/// differs from the bare `name` field (namespaced classes, for example).
pub const QUALIFIED_NAME: &str = "qualified_name";

/// Opaque tag naming the syntactic category of a node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKind(Cow<'static, str>);

impl NodeKind {
    pub const fn from_static(kind: &'static str) -> Self {
        Self(Cow::Borrowed(kind))
    }

    pub fn new(kind: impl Into<String>) -> Self {
        Self(Cow::Owned(kind.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for NodeKind {
    fn from(kind: &'static str) -> Self {
        Self::from_static(kind)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxNode {
    kind: NodeKind,
    field: Option<String>,
    leading: String,
    text: Option<String>,
    children: Vec<SyntaxNode>,
    trailing: String,
    attributes: BTreeMap<String, String>,
}

impl SyntaxNode {
    /// Create a leaf token carrying `text`.
    pub fn leaf(kind: impl Into<NodeKind>, text: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            field: None,
            leading: String::new(),
            text: Some(text.into()),
            children: Vec::new(),
            trailing: String::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Create an interior node from its children.
    pub fn branch(kind: impl Into<NodeKind>, children: Vec<SyntaxNode>) -> Self {
        Self {
            kind: kind.into(),
            field: None,
            leading: String::new(),
            text: None,
            children,
            trailing: String::new(),
            attributes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    #[must_use]
    pub fn with_leading(mut self, leading: impl Into<String>) -> Self {
        self.leading = leading.into();
        self
    }

    #[must_use]
    pub fn with_trailing(mut self, trailing: impl Into<String>) -> Self {
        self.trailing = trailing.into();
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_kind(&self, kind: &NodeKind) -> bool {
        &self.kind == kind
    }

    /// Field name this node occupies in its parent, if the grammar names it.
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn leading(&self) -> &str {
        &self.leading
    }

    pub fn trailing(&self) -> &str {
        &self.trailing
    }

    /// Source text of a leaf token; `None` for interior nodes.
    pub fn token_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[SyntaxNode] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<SyntaxNode> {
        &mut self.children
    }

    /// First child occupying the grammar field `field`.
    pub fn child_by_field(&self, field: &str) -> Option<&SyntaxNode> {
        self.children.iter().find(|c| c.field() == Some(field))
    }

    /// First direct child of the given kind.
    pub fn child_of_kind(&self, kind: &NodeKind) -> Option<&SyntaxNode> {
        self.children.iter().find(|c| c.is_kind(kind))
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Name this node declares: the [`QUALIFIED_NAME`] attribute when a
    /// frontend resolved one, else the text of the `name` field.
    pub fn declared_name(&self) -> Option<String> {
        self.attribute(QUALIFIED_NAME)
            .map(str::to_string)
            .or_else(|| self.child_by_field("name").map(SyntaxNode::text))
            .filter(|name| !name.is_empty())
    }

    /// Concatenated leaf text of this subtree without any trivia.
    ///
    /// `$this` parses as a `$` token followed by a `this` name; `text()`
    /// yields `"$this"` regardless of how the tokens were spaced.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.text {
            Some(text) => out.push_str(text),
            None => self.children.iter().for_each(|c| c.collect_text(out)),
        }
    }

    /// Render the subtree, trivia included, exactly as it would appear in a file.
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        self.write_source(&mut out);
        out
    }

    pub fn write_source(&self, out: &mut String) {
        out.push_str(&self.leading);
        match &self.text {
            Some(text) => out.push_str(text),
            None => self.children.iter().for_each(|c| c.write_source(out)),
        }
        out.push_str(&self.trailing);
    }

    /// Take over the position of `old`: its field name and surrounding trivia.
    ///
    /// Used when a rule's replacement is spliced into the tree, so formatting
    /// around the rewritten node is preserved.
    pub fn inherit_position(&mut self, old: &SyntaxNode) {
        self.field = old.field.clone();
        if self.leading.is_empty() {
            self.leading = old.leading.clone();
        }
        if self.trailing.is_empty() {
            self.trailing = old.trailing.clone();
        }
    }

    /// Drop all content while keeping the node itself.
    pub(crate) fn clear(&mut self) {
        self.children.clear();
        self.text = None;
        self.leading.clear();
        self.trailing.clear();
    }

    /// Pre-order iterator over this node and all descendants.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a SyntaxNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a SyntaxNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
