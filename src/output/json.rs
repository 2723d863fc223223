use crate::discovery::SourceUnit;
use crate::errors::Result;
use crate::pipeline::RunReport;
use crate::rules::RuleDefinition;
use serde::Serialize;

pub fn format_run_report(report: &RunReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn format_units(units: &[SourceUnit]) -> Result<String> {
    Ok(serde_json::to_string_pretty(units)?)
}

#[derive(Serialize)]
struct NamedDefinition<'a> {
    name: &'static str,
    #[serde(flatten)]
    definition: &'a RuleDefinition,
}

pub fn format_rules(definitions: &[(&'static str, RuleDefinition)]) -> Result<String> {
    let named: Vec<NamedDefinition<'_>> = definitions
        .iter()
        .map(|(name, definition)| NamedDefinition {
            name: *name,
            definition,
        })
        .collect();
    Ok(serde_json::to_string_pretty(&named)?)
}
