//! `$this->method()` on a static method becomes `self::method()`.

use super::names;
use super::{CodeSample, NodeContext, Rule, RuleDefinition, RuleOutcome};
use crate::core::{NodeKind, SyntaxNode};
use crate::frontend::php::kinds;
use indoc::indoc;

pub const NAME: &str = "this_call_on_static_method_to_static_call";

/// Declarations a `$this` can refer to.
const SELF_SCOPES: [NodeKind; 3] = [
    kinds::CLASS_DECLARATION,
    kinds::TRAIT_DECLARATION,
    kinds::ENUM_DECLARATION,
];

const CLASS_BODIES: [NodeKind; 2] = [kinds::DECLARATION_LIST, kinds::ENUM_DECLARATION_LIST];

pub const DEFAULT_TEST_CASE_CLASS: &str = "PHPUnit\\Framework\\TestCase";
pub const DEFAULT_ASSERTION_PATTERN: &str = "assert*";

#[derive(Debug, Clone)]
pub struct ThisCallOnStaticMethodToStaticCall {
    test_case_classes: Vec<String>,
    assertion_pattern: String,
}

impl Default for ThisCallOnStaticMethodToStaticCall {
    fn default() -> Self {
        Self {
            test_case_classes: vec![DEFAULT_TEST_CASE_CLASS.to_string()],
            assertion_pattern: DEFAULT_ASSERTION_PATTERN.to_string(),
        }
    }
}

impl ThisCallOnStaticMethodToStaticCall {
    pub fn new(test_case_classes: Vec<String>, assertion_pattern: impl Into<String>) -> Self {
        Self {
            test_case_classes,
            assertion_pattern: assertion_pattern.into(),
        }
    }

    /// Assertion helpers on test cases stay `$this->assert*()` even when
    /// the framework declares them static.
    fn is_exempt_test_call(
        &self,
        method: Option<&str>,
        class: Option<&str>,
        ctx: &NodeContext<'_>,
    ) -> bool {
        let (Some(method), Some(class)) = (method, class) else {
            return false;
        };
        names::matches_name(method, &self.assertion_pattern)
            && self
                .test_case_classes
                .iter()
                .any(|base| ctx.index().is_subtype_of(class, base))
    }
}

/// Name of the declaration `$this` refers to: the owner of the nearest
/// enclosing class body. The owner of an anonymous class body has no name,
/// so a call inside one never resolves against an outer class.
fn receiver_class<'a>(ctx: &NodeContext<'a>) -> Option<&'a str> {
    let ancestors = ctx.ancestors();
    let body = ancestors
        .iter()
        .rposition(|a| CLASS_BODIES.contains(&a.kind))?;
    let owner = ancestors.get(body.checked_sub(1)?)?;
    if !SELF_SCOPES.contains(&owner.kind) {
        return None;
    }
    owner.name.as_deref()
}

/// Source between the object and the method name, comments included, with
/// the `->` token itself left out.
fn operator_trivia(call: &SyntaxNode) -> String {
    let children = call.children();
    let field_at = |field: &str| children.iter().position(|c| c.field() == Some(field));
    let (Some(object_at), Some(name_at)) = (field_at("object"), field_at("name")) else {
        return String::new();
    };

    let mut trivia = children[object_at].trailing().to_string();
    for between in children.get(object_at + 1..name_at).unwrap_or_default() {
        if between.is_kind(&kinds::MEMBER_ACCESS) {
            trivia.push_str(between.leading());
            trivia.push_str(between.trailing());
        } else {
            between.write_source(&mut trivia);
        }
    }
    trivia
}

/// `self::method(arguments)`. Comments and whitespace around `$this`, the
/// `->` and the method name stay where they were.
fn static_call(
    call: &SyntaxNode,
    object: &SyntaxNode,
    name: &SyntaxNode,
    method: &str,
    arguments: &SyntaxNode,
) -> SyntaxNode {
    SyntaxNode::branch(
        kinds::SCOPED_CALL_EXPRESSION,
        vec![
            SyntaxNode::branch(
                kinds::RELATIVE_SCOPE,
                vec![SyntaxNode::leaf(kinds::SELF_KEYWORD, "self")],
            )
            .with_field("scope")
            .with_leading(object.leading()),
            SyntaxNode::leaf(kinds::SCOPE_RESOLUTION, "::").with_leading(operator_trivia(call)),
            SyntaxNode::leaf(kinds::NAME, method)
                .with_field("name")
                .with_leading(name.leading())
                .with_trailing(name.trailing()),
            arguments.clone(),
        ],
    )
}

impl Rule for ThisCallOnStaticMethodToStaticCall {
    fn name(&self) -> &'static str {
        NAME
    }

    fn definition(&self) -> RuleDefinition {
        RuleDefinition::new(
            "Changes $this->call() of a static method into a self::call() static call",
            vec![CodeSample::new(
                indoc! {r#"
                    class SomeClass
                    {
                        public function run()
                        {
                            $this->eat();
                        }

                        public static function eat()
                        {
                        }
                    }
                "#},
                indoc! {r#"
                    class SomeClass
                    {
                        public function run()
                        {
                            self::eat();
                        }

                        public static function eat()
                        {
                        }
                    }
                "#},
            )],
        )
    }

    fn node_kinds(&self) -> Vec<NodeKind> {
        vec![kinds::MEMBER_CALL_EXPRESSION]
    }

    fn evaluate(&self, node: &SyntaxNode, ctx: &NodeContext<'_>) -> RuleOutcome {
        let Some(object) = node.child_by_field("object") else {
            return RuleOutcome::NoChange;
        };
        if !names::is_variable(object, &kinds::VARIABLE_NAME, "$this") {
            return RuleOutcome::NoChange;
        }

        let Some(name) = node.child_by_field("name") else {
            return RuleOutcome::NoChange;
        };
        let method = names::static_identifier(name, &[kinds::NAME]);
        let class = receiver_class(ctx);

        if self.is_exempt_test_call(method.as_deref(), class, ctx) {
            return RuleOutcome::NoChange;
        }

        let Some(class) = class else {
            return RuleOutcome::NoChange;
        };
        let Some(method) = method else {
            return RuleOutcome::NoChange;
        };
        let Some(arguments) = node.child_by_field("arguments") else {
            return RuleOutcome::NoChange;
        };

        if !ctx.index().is_static_member(&method, class) {
            return RuleOutcome::NoChange;
        }

        RuleOutcome::Replace(static_call(node, object, name, &method, arguments))
    }
}
