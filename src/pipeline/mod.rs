//! End-to-end rewrite run.
//!
//! Discovery → parse (parallel) → index (sequential, discovery order) →
//! rewrite (parallel, index read-only) → write back.
//!
//! Every unit is independent once the index is built. A unit that cannot be
//! read or parsed is reported as skipped and the rest of the run continues;
//! only an invalid discovery root aborts the run.

mod report;

pub use report::{RunReport, UnitReport, UnitStatus};

use crate::config::RefitConfig;
use crate::core::SyntaxNode;
use crate::discovery::{FilesFinder, SourceUnit};
use crate::dispatch::{Dispatcher, PassMode, RuleRegistry};
use crate::errors::Result;
use crate::frontend::{get_frontend, Frontend, Language};
use crate::index::ProjectIndex;
use crate::observability::{
    increment_processed, set_current_file, set_phase, set_progress, RewritePhase,
};
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub paths: Vec<String>,
    pub suffixes: Vec<String>,
    pub excludes: Vec<String>,
    pub language: Language,
    pub mode: PassMode,
    pub dry_run: bool,
}

impl RunConfig {
    pub fn from_config(config: &RefitConfig) -> Self {
        Self {
            paths: config.paths.clone(),
            suffixes: config.suffixes.clone(),
            excludes: config.exclude_paths.clone(),
            language: Language::Php,
            mode: config.rewrite.pass_mode(),
            dry_run: config.rewrite.dry_run,
        }
    }
}

/// A unit that made it through parsing.
struct ParsedUnit {
    path: PathBuf,
    source: String,
    tree: SyntaxNode,
}

/// Outcome of rewriting one parsed unit, before anything is written.
struct RewrittenUnit {
    path: PathBuf,
    output: Option<String>,
    applied: Vec<&'static str>,
    passes: usize,
}

pub fn run(config: &RunConfig, registry: &RuleRegistry) -> Result<RunReport> {
    let started_at = chrono::Utc::now();

    let units = {
        let _phase = set_phase(RewritePhase::Discovery);
        FilesFinder::new().resolve(config.paths.as_slice(), &config.suffixes, &config.excludes)?
    };
    log::info!("Processing {} source units", units.len());

    let reports = process_units(&units, config, registry);
    Ok(RunReport::new(started_at, config.dry_run, reports))
}

/// Rewrite already-discovered units. The index covers exactly `units`.
pub fn process_units(
    units: &[SourceUnit],
    config: &RunConfig,
    registry: &RuleRegistry,
) -> Vec<UnitReport> {
    let frontend = get_frontend(config.language);
    set_progress(0, units.len());

    let parsed: Vec<std::result::Result<ParsedUnit, UnitReport>> = {
        let _phase = set_phase(RewritePhase::Parsing);
        units
            .par_iter()
            .map(|unit| parse_unit(unit, frontend.as_ref()))
            .collect()
    };

    let index = {
        let _phase = set_phase(RewritePhase::Indexing);
        build_index(parsed.iter().filter_map(|p| p.as_ref().ok()), frontend.as_ref())
    };
    log::debug!("Indexed {} declarations", index.len());

    let dispatcher = Dispatcher::new(registry).with_mode(config.mode);
    let rewritten: Vec<std::result::Result<RewrittenUnit, UnitReport>> = {
        let _phase = set_phase(RewritePhase::Rewriting);
        parsed
            .into_par_iter()
            .map(|unit| unit.map(|u| rewrite_unit(u, &dispatcher, &index, frontend.as_ref())))
            .collect()
    };

    let _phase = set_phase(RewritePhase::WriteBack);
    rewritten
        .into_iter()
        .map(|unit| match unit {
            Ok(unit) => write_back(unit, config.dry_run),
            Err(skipped) => skipped,
        })
        .collect()
}

fn parse_unit(
    unit: &SourceUnit,
    frontend: &dyn Frontend,
) -> std::result::Result<ParsedUnit, UnitReport> {
    let _phase = set_phase(RewritePhase::Parsing);
    let _unit = set_current_file(unit.path());
    let path = unit.path().to_path_buf();

    let source = match fs::read_to_string(&path) {
        Ok(source) => source,
        Err(e) => {
            log::warn!("Skipping {}: {}", path.display(), e);
            return Err(UnitReport::skipped(path, format!("read failed: {}", e)));
        }
    };

    match frontend.parse(&source, &path) {
        Ok(tree) => Ok(ParsedUnit { path, source, tree }),
        Err(e) => {
            log::warn!("Skipping {}", e);
            Err(UnitReport::skipped(path, e.to_string()))
        }
    }
}

fn build_index<'a>(
    units: impl Iterator<Item = &'a ParsedUnit>,
    frontend: &dyn Frontend,
) -> ProjectIndex {
    let mut index = ProjectIndex::new();
    for unit in units {
        let _unit = set_current_file(&unit.path);
        frontend.collect_declarations(&unit.tree, &mut index);
    }
    index
}

fn rewrite_unit(
    unit: ParsedUnit,
    dispatcher: &Dispatcher<'_>,
    index: &ProjectIndex,
    frontend: &dyn Frontend,
) -> RewrittenUnit {
    let _phase = set_phase(RewritePhase::Rewriting);
    let _unit = set_current_file(&unit.path);
    let outcome = dispatcher.apply_all(unit.tree, index);
    increment_processed();

    let output = if outcome.applied > 0 {
        Some(frontend.print(&outcome.tree)).filter(|printed| *printed != unit.source)
    } else {
        None
    };

    RewrittenUnit {
        path: unit.path,
        output,
        applied: outcome.applications.iter().map(|a| a.rule).collect(),
        passes: outcome.passes,
    }
}

fn write_back(unit: RewrittenUnit, dry_run: bool) -> UnitReport {
    let Some(output) = unit.output else {
        return UnitReport {
            path: unit.path,
            status: UnitStatus::Unchanged,
            applied: unit.applied,
            passes: unit.passes,
            error: None,
        };
    };

    if !dry_run {
        let _unit = set_current_file(&unit.path);
        if let Err(e) = fs::write(&unit.path, output) {
            log::warn!("Failed to write {}: {}", unit.path.display(), e);
            return UnitReport::skipped(unit.path, format!("write failed: {}", e));
        }
        log::info!("Rewrote {}", unit.path.display());
    }

    UnitReport {
        path: unit.path,
        status: UnitStatus::Changed,
        applied: unit.applied,
        passes: unit.passes,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::catalog::full_registry;
    use indoc::indoc;
    use std::path::Path;
    use tempfile::TempDir;

    fn config_for(root: &Path, dry_run: bool) -> RunConfig {
        RunConfig {
            paths: vec![root.to_string_lossy().to_string()],
            dry_run,
            ..RunConfig::from_config(&RefitConfig::default())
        }
    }

    #[test]
    fn test_from_config_copies_settings() {
        let mut config = RefitConfig::default();
        config.paths = vec!["src".to_string()];
        config.exclude_paths = vec!["vendor".to_string()];
        config.rewrite.dry_run = true;

        let run_config = RunConfig::from_config(&config);
        assert_eq!(run_config.paths, vec!["src"]);
        assert_eq!(run_config.excludes, vec!["vendor"]);
        assert_eq!(run_config.suffixes, vec!["php"]);
        assert!(run_config.dry_run);
        assert_eq!(run_config.mode, PassMode::Single);
    }

    #[test]
    fn test_unchanged_units_are_not_written() {
        let dir = TempDir::new().unwrap();
        let source = indoc! {r#"
            <?php
            class Plain
            {
                public function run() { return 1; }
            }
        "#};
        let file = dir.path().join("Plain.php");
        fs::write(&file, source).unwrap();

        let report = run(&config_for(dir.path(), false), &full_registry()).unwrap();
        assert_eq!(report.unchanged(), 1);
        assert_eq!(fs::read_to_string(&file).unwrap(), source);
    }

    #[test]
    fn test_invalid_root_aborts_run() {
        let config = RunConfig {
            paths: vec!["/definitely/not/here".to_string()],
            ..RunConfig::from_config(&RefitConfig::default())
        };
        assert!(run(&config, &full_registry()).is_err());
    }
}
