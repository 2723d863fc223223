use crate::discovery::SourceUnit;
use crate::pipeline::{RunReport, UnitReport, UnitStatus};
use crate::rules::RuleDefinition;
use colored::*;
use std::fmt::Write as _;

fn status_label(status: UnitStatus, dry_run: bool) -> ColoredString {
    match status {
        UnitStatus::Changed if dry_run => "would change".yellow().bold(),
        UnitStatus::Changed => "changed".green().bold(),
        UnitStatus::Unchanged => "unchanged".dimmed(),
        UnitStatus::Skipped => "skipped".red().bold(),
    }
}

fn format_unit(out: &mut String, unit: &UnitReport, dry_run: bool) {
    let _ = write!(
        out,
        "  {:<12} {}",
        status_label(unit.status, dry_run),
        unit.path.display()
    );
    if !unit.applied.is_empty() {
        let _ = write!(out, " ({} change{})", unit.applied.len(), plural(unit.applied.len()));
    }
    out.push('\n');
    if let Some(error) = &unit.error {
        let _ = writeln!(out, "      {}", error.red());
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Changed and skipped units are always listed; unchanged ones only at
/// higher verbosity.
pub fn format_run_report(report: &RunReport, verbosity: u8) -> String {
    let mut out = String::new();
    let header = if report.dry_run {
        "refit (dry run)"
    } else {
        "refit"
    };
    let _ = writeln!(out, "{}", header.bold());

    for unit in &report.units {
        if unit.status == UnitStatus::Unchanged && verbosity == 0 {
            continue;
        }
        format_unit(&mut out, unit, report.dry_run);
    }

    let _ = writeln!(
        out,
        "\n{} unit{}: {} {}, {} unchanged, {} skipped ({} rule application{})",
        report.units.len(),
        plural(report.units.len()),
        report.changed().to_string().green(),
        if report.dry_run { "would change" } else { "changed" },
        report.unchanged(),
        report.skipped().to_string().red(),
        report.total_applications(),
        plural(report.total_applications()),
    );
    out
}

pub fn format_units(units: &[SourceUnit]) -> String {
    let mut out = String::new();
    for unit in units {
        let _ = writeln!(out, "{}", unit);
    }
    let _ = writeln!(out, "{} {}", units.len().to_string().bold(), "units".dimmed());
    out
}

pub fn format_rules(definitions: &[(&'static str, RuleDefinition)]) -> String {
    let mut out = String::new();
    for (name, definition) in definitions {
        let _ = writeln!(out, "{}", name.bold().cyan());
        let _ = writeln!(out, "  {}", definition.description);
        for sample in &definition.samples {
            let _ = writeln!(out, "\n  {}", "before:".red());
            for line in sample.before.lines() {
                let _ = writeln!(out, "    {}", line);
            }
            let _ = writeln!(out, "  {}", "after:".green());
            for line in sample.after.lines() {
                let _ = writeln!(out, "    {}", line);
            }
        }
        out.push('\n');
    }
    out
}
