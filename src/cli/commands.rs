//! Command handlers. Each loads the config, applies CLI overrides and hands
//! off to the library.

use super::args::{Commands, DiscoveryArgs};
use super::setup::configure_thread_pool;
use crate::config::{load_config, load_config_from, RefitConfig, RewriteMode};
use crate::discovery::FilesFinder;
use crate::observability::{set_phase, RewritePhase};
use crate::output::{self, emit, OutputFormat};
use crate::pipeline::{self, RunConfig};
use crate::rules::catalog::{build_registry, full_registry};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const DEFAULT_ROOT: &str = ".";

pub fn resolve_config(config_path: Option<&Path>) -> Result<RefitConfig> {
    match config_path {
        Some(path) => Ok(load_config_from(path)?),
        None => Ok(load_config()),
    }
}

/// CLI values replace config values when given.
pub fn apply_discovery_overrides(mut config: RefitConfig, args: &DiscoveryArgs) -> RefitConfig {
    if !args.paths.is_empty() {
        config.paths = args.paths.clone();
    }
    if !args.suffixes.is_empty() {
        config.suffixes = args
            .suffixes
            .iter()
            .map(|s| s.trim_start_matches('.').to_string())
            .collect();
    }
    if !args.excludes.is_empty() {
        config.exclude_paths = args.excludes.clone();
    }
    if config.paths.is_empty() {
        config.paths = vec![DEFAULT_ROOT.to_string()];
    }
    config
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewriteOverrides {
    pub dry_run: bool,
    pub converge: bool,
    pub max_passes: Option<usize>,
    pub rules: Option<Vec<String>>,
}

pub fn apply_rewrite_overrides(mut config: RefitConfig, overrides: RewriteOverrides) -> RefitConfig {
    config.rewrite.dry_run |= overrides.dry_run;
    if overrides.converge {
        config.rewrite.mode = RewriteMode::Converge;
    }
    if let Some(max_passes) = overrides.max_passes {
        config.rewrite.max_passes = max_passes.max(1);
    }
    if let Some(rules) = overrides.rules {
        config.rules.enabled = rules;
    }
    config
}

pub fn handle_command(command: Commands, config_path: Option<PathBuf>, verbosity: u8) -> Result<()> {
    let config = resolve_config(config_path.as_deref())?;

    match command {
        Commands::Process {
            discovery,
            dry_run,
            converge,
            max_passes,
            rules,
            jobs,
            format,
            output,
        } => {
            let config = apply_discovery_overrides(config, &discovery);
            let config = apply_rewrite_overrides(
                config,
                RewriteOverrides {
                    dry_run,
                    converge,
                    max_passes,
                    rules,
                },
            );
            configure_thread_pool(jobs);
            handle_process(&config, format, output.as_deref(), verbosity)
        }
        Commands::Discover { discovery, format } => {
            let config = apply_discovery_overrides(config, &discovery);
            handle_discover(&config, format)
        }
        Commands::Rules { format } => handle_rules(format),
    }
}

fn handle_process(
    config: &RefitConfig,
    format: OutputFormat,
    output_file: Option<&Path>,
    verbosity: u8,
) -> Result<()> {
    let registry = build_registry(&config.rules).context("Failed to build rule set")?;
    let run_config = RunConfig::from_config(config);
    let report = pipeline::run(&run_config, &registry).context("Rewrite run failed")?;

    let _phase = set_phase(RewritePhase::WriteBack);
    let content = match format {
        OutputFormat::Terminal => output::terminal::format_run_report(&report, verbosity),
        OutputFormat::Json => output::json::format_run_report(&report)?,
    };
    emit(&content, output_file)?;
    Ok(())
}

fn handle_discover(config: &RefitConfig, format: OutputFormat) -> Result<()> {
    let units = {
        let _phase = set_phase(RewritePhase::Discovery);
        FilesFinder::new()
            .resolve(config.paths.as_slice(), &config.suffixes, &config.exclude_paths)
            .context("Discovery failed")?
    };
    let content = match format {
        OutputFormat::Terminal => output::terminal::format_units(&units),
        OutputFormat::Json => output::json::format_units(&units)?,
    };
    emit(&content, None)?;
    Ok(())
}

fn handle_rules(format: OutputFormat) -> Result<()> {
    let definitions = full_registry().definitions();
    let content = match format {
        OutputFormat::Terminal => output::terminal::format_rules(&definitions),
        OutputFormat::Json => output::json::format_rules(&definitions)?,
    };
    emit(&content, None)?;
    Ok(())
}
