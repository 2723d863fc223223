use indoc::indoc;
use pretty_assertions::assert_eq;
use refit::frontend::php::PhpFrontend;
use refit::rules::catalog::full_registry;
use refit::{Dispatcher, Frontend, PassMode, ProjectIndex, RuleRegistry};
use std::path::Path;

/// Rewrite `target` with every other unit in `project` contributing to the
/// index, the way a pipeline run would see them.
fn rewrite_in_project(target: &str, project: &[&str], registry: &RuleRegistry) -> (String, usize) {
    let frontend = PhpFrontend::new();
    let mut index = ProjectIndex::new();

    let tree = frontend.parse(target, Path::new("Target.php")).unwrap();
    frontend.collect_declarations(&tree, &mut index);
    for (i, source) in project.iter().enumerate() {
        let other = frontend
            .parse(source, Path::new(&format!("Other{i}.php")))
            .unwrap();
        frontend.collect_declarations(&other, &mut index);
    }

    let outcome = Dispatcher::new(registry).apply_all(tree, &index);
    (frontend.print(&outcome.tree), outcome.applied)
}

fn rewrite(source: &str) -> String {
    rewrite_in_project(source, &[], &full_registry()).0
}

#[test]
fn test_unmodified_tree_prints_source_exactly() {
    let source = indoc! {r#"
        <?php
        declare(strict_types=1);

        namespace App;

        // Leading comment
        final class Printer   {
            /** Doc block */
            public function   run( $a,$b ) : int
            {
                return $a  +  $b; # trailing
            }
        }
    "#};
    let frontend = PhpFrontend::new();
    let tree = frontend.parse(source, Path::new("Printer.php")).unwrap();
    assert_eq!(frontend.print(&tree), source);
}

#[test]
fn test_this_call_on_static_method_becomes_self_call() {
    let source = indoc! {r#"
        <?php
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
    "#};
    let expected = indoc! {r#"
        <?php
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
    "#};
    assert_eq!(rewrite(source), expected);
}

#[test]
fn test_arguments_and_formatting_are_kept() {
    let source = indoc! {r#"
        <?php
        class Math
        {
            public function total(array $items)
            {
                return $this->sum( $items,  0 ) + 1;
            }

            public static function sum(array $items, int $start)
            {
                return $start + array_sum($items);
            }
        }
    "#};
    let output = rewrite(source);
    assert!(output.contains("return self::sum( $items,  0 ) + 1;"));
}

#[test]
fn test_comments_between_this_and_method_are_kept() {
    let source = indoc! {r#"
        <?php
        class Math
        {
            public function total(array $items)
            {
                return $this /* keep */
                    ->sum($items);
            }

            public static function sum(array $items)
            {
                return array_sum($items);
            }
        }
    "#};
    let output = rewrite(source);
    assert!(output.contains("return self /* keep */\n            ::sum($items);"));
}

#[test]
fn test_non_static_method_is_left_alone() {
    let source = indoc! {r#"
        <?php
        class SomeClass
        {
            public function run()
            {
                $this->eat();
            }

            public function eat()
            {
            }
        }
    "#};
    assert_eq!(rewrite(source), source);
}

#[test]
fn test_static_method_of_another_class_is_not_used() {
    let other = indoc! {r#"
        <?php
        class Kitchen
        {
            public static function eat()
            {
            }
        }
    "#};
    let source = indoc! {r#"
        <?php
        class Dinner
        {
            public function run()
            {
                $this->eat();
            }

            public function eat()
            {
            }
        }
    "#};
    let (output, applied) = rewrite_in_project(source, &[other], &full_registry());
    assert_eq!(applied, 0);
    assert_eq!(output, source);
}

#[test]
fn test_inherited_static_method_from_other_unit() {
    let base = indoc! {r#"
        <?php
        namespace App\Base;

        abstract class Model
        {
            public static function table(): string
            {
                return 'models';
            }
        }
    "#};
    let source = indoc! {r#"
        <?php
        namespace App;

        use App\Base\Model;

        class User extends Model
        {
            public function describe(): string
            {
                return $this->table();
            }
        }
    "#};
    let (output, applied) = rewrite_in_project(source, &[base], &full_registry());
    assert_eq!(applied, 1);
    assert!(output.contains("return self::table();"));
}

#[test]
fn test_static_method_from_trait() {
    let source = indoc! {r#"
        <?php
        trait Counts
        {
            public static function count(): int
            {
                return 0;
            }
        }

        class Basket
        {
            use Counts;

            public function size(): int
            {
                return $this->count();
            }
        }
    "#};
    assert!(rewrite(source).contains("return self::count();"));
}

#[test]
fn test_calls_inside_traits_are_rewritten() {
    let source = indoc! {r#"
        <?php
        trait Greets
        {
            public function greet()
            {
                return $this->hello();
            }

            public static function hello()
            {
                return 'hi';
            }
        }
    "#};
    assert!(rewrite(source).contains("return self::hello();"));
}

#[test]
fn test_test_case_assertions_are_exempt() {
    let source = indoc! {r#"
        <?php
        namespace Tests;

        use PHPUnit\Framework\TestCase;

        final class SomeTest extends TestCase
        {
            public function testIt()
            {
                $this->assertSame(1, 1);
                $this->assertTrue(true);
            }

            public static function assertSame($a, $b)
            {
            }

            public static function assertTrue($a)
            {
            }
        }
    "#};
    assert_eq!(rewrite(source), source);
}

#[test]
fn test_non_assertion_statics_in_test_case_are_rewritten() {
    let source = indoc! {r#"
        <?php
        use PHPUnit\Framework\TestCase;

        final class SomeTest extends TestCase
        {
            public function testIt()
            {
                $this->assertSame(1, self::fixture());
                $this->helper();
            }

            public static function helper()
            {
            }

            public static function assertSame($a, $b)
            {
            }
        }
    "#};
    let output = rewrite(source);
    assert!(output.contains("$this->assertSame(1, self::fixture());"));
    assert!(output.contains("self::helper();"));
}

#[test]
fn test_assert_method_outside_test_case_is_rewritten() {
    let source = indoc! {r#"
        <?php
        class Guard
        {
            public function check($value)
            {
                $this->assertValid($value);
            }

            public static function assertValid($value)
            {
            }
        }
    "#};
    assert!(rewrite(source).contains("self::assertValid($value);"));
}

#[test]
fn test_dynamic_method_name_is_left_alone() {
    let source = indoc! {r#"
        <?php
        class Dynamic
        {
            public function run($method)
            {
                $this->$method();
            }

            public static function eat()
            {
            }
        }
    "#};
    assert_eq!(rewrite(source), source);
}

#[test]
fn test_call_on_other_variable_is_left_alone() {
    let source = indoc! {r#"
        <?php
        class Caller
        {
            public function run(Caller $other)
            {
                $other->eat();
            }

            public static function eat()
            {
            }
        }
    "#};
    assert_eq!(rewrite(source), source);
}

#[test]
fn test_anonymous_class_is_not_resolved_against_outer_class() {
    let source = indoc! {r#"
        <?php
        class Outer
        {
            public function make()
            {
                return new class {
                    public function run()
                    {
                        return $this->eat();
                    }
                };
            }

            public static function eat()
            {
            }
        }
    "#};
    assert_eq!(rewrite(source), source);
}

#[test]
fn test_rewrite_is_idempotent() {
    let source = indoc! {r#"
        <?php
        class SomeClass
        {
            public function run()
            {
                $this->eat($this->eat());
            }

            public static function eat($x = null)
            {
            }
        }
    "#};
    let once = rewrite(source);
    let twice = rewrite(&once);
    assert_eq!(once, twice);
}

#[test]
fn test_nested_calls_rewrite_in_one_pass() {
    let source = indoc! {r#"
        <?php
        class SomeClass
        {
            public function run()
            {
                $this->eat($this->eat());
            }

            public static function eat($x = null)
            {
            }
        }
    "#};
    let frontend = PhpFrontend::new();
    let mut index = ProjectIndex::new();
    let tree = frontend.parse(source, Path::new("SomeClass.php")).unwrap();
    frontend.collect_declarations(&tree, &mut index);

    let registry = full_registry();
    let single = Dispatcher::new(&registry).apply_all(tree.clone(), &index);
    assert_eq!(single.applied, 2);
    assert_eq!(single.passes, 1);
    assert!(frontend
        .print(&single.tree)
        .contains("self::eat(self::eat());"));

    let converged = Dispatcher::new(&registry)
        .with_mode(PassMode::Converge { max_passes: 5 })
        .apply_all(tree, &index);
    assert_eq!(converged.applied, 2);
    assert_eq!(converged.passes, 2);
    assert_eq!(converged.tree, single.tree);
}

#[test]
fn test_syntax_error_is_rejected() {
    let frontend = PhpFrontend::new();
    let err = frontend
        .parse("<?php\nclass {\n", Path::new("Broken.php"))
        .unwrap_err();
    assert!(err.to_string().contains("Broken.php"));
}
