use indoc::indoc;
use pretty_assertions::assert_eq;
use refit::config::RefitConfig;
use refit::rules::catalog::full_registry;
use refit::{run, RunConfig, UnitStatus};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const BASE: &str = indoc! {r#"
    <?php
    namespace App;

    abstract class Base
    {
        public static function create()
        {
            return new static();
        }
    }
"#};

const CHILD: &str = indoc! {r#"
    <?php
    namespace App;

    class Child extends Base
    {
        public function copy()
        {
            return $this->create();
        }
    }
"#};

const CHILD_REWRITTEN: &str = indoc! {r#"
    <?php
    namespace App;

    class Child extends Base
    {
        public function copy()
        {
            return self::create();
        }
    }
"#};

const BROKEN: &str = "<?php\nclass Broken {\n    public function (\n";

/// `src/Base.php`, `src/Child.php` and `src/Broken.php` (syntax error).
fn create_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("Base.php"), BASE).unwrap();
    fs::write(src.join("Child.php"), CHILD).unwrap();
    fs::write(src.join("Broken.php"), BROKEN).unwrap();
    temp_dir
}

fn config(root: &Path, dry_run: bool) -> RunConfig {
    RunConfig {
        paths: vec![root.join("src").to_string_lossy().to_string()],
        dry_run,
        ..RunConfig::from_config(&RefitConfig::default())
    }
}

fn status_of(report: &refit::RunReport, root: &Path, file: &str) -> UnitStatus {
    let path = root.join("src").join(file).canonicalize().unwrap();
    report.unit(&path).unwrap().status
}

#[test]
fn test_run_rewrites_across_units() {
    let project = create_project();
    let root = project.path();

    let report = run(&config(root, false), &full_registry()).unwrap();

    assert_eq!(report.units.len(), 3);
    assert_eq!(status_of(&report, root, "Child.php"), UnitStatus::Changed);
    assert_eq!(status_of(&report, root, "Base.php"), UnitStatus::Unchanged);
    assert_eq!(
        fs::read_to_string(root.join("src/Child.php")).unwrap(),
        CHILD_REWRITTEN
    );
    assert_eq!(fs::read_to_string(root.join("src/Base.php")).unwrap(), BASE);
}

#[test]
fn test_syntax_error_skips_only_that_unit() {
    let project = create_project();
    let root = project.path();

    let report = run(&config(root, false), &full_registry()).unwrap();

    assert_eq!(status_of(&report, root, "Broken.php"), UnitStatus::Skipped);
    assert_eq!(report.skipped(), 1);
    assert_eq!(report.changed(), 1);
    let broken = report
        .units
        .iter()
        .find(|u| u.status == UnitStatus::Skipped)
        .unwrap();
    assert!(broken.error.as_deref().unwrap().contains("syntax error"));
    assert_eq!(fs::read_to_string(root.join("src/Broken.php")).unwrap(), BROKEN);
}

#[test]
fn test_dry_run_writes_nothing() {
    let project = create_project();
    let root = project.path();

    let report = run(&config(root, true), &full_registry()).unwrap();

    assert!(report.dry_run);
    assert_eq!(status_of(&report, root, "Child.php"), UnitStatus::Changed);
    assert_eq!(fs::read_to_string(root.join("src/Child.php")).unwrap(), CHILD);
}

#[test]
fn test_second_run_changes_nothing() {
    let project = create_project();
    let root = project.path();

    run(&config(root, false), &full_registry()).unwrap();
    let second = run(&config(root, false), &full_registry()).unwrap();

    assert_eq!(second.changed(), 0);
    assert_eq!(second.total_applications(), 0);
}

#[test]
fn test_excluded_parent_is_not_indexed() {
    let project = create_project();
    let root = project.path();
    let config = RunConfig {
        excludes: vec!["Base.php".to_string()],
        ..config(root, false)
    };

    let report = run(&config, &full_registry()).unwrap();

    assert_eq!(report.units.len(), 2);
    assert_eq!(status_of(&report, root, "Child.php"), UnitStatus::Unchanged);
    assert_eq!(fs::read_to_string(root.join("src/Child.php")).unwrap(), CHILD);
}

#[test]
fn test_units_are_reported_in_discovery_order() {
    let project = create_project();
    let root = project.path();

    let report = run(&config(root, true), &full_registry()).unwrap();
    let names: Vec<_> = report
        .units
        .iter()
        .map(|u| u.path.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["Base.php", "Broken.php", "Child.php"]);
}
