//! Built-in rules, selected by name.

use super::this_call_on_static_method::{self, ThisCallOnStaticMethodToStaticCall};
use super::Rule;
use crate::config::RulesConfig;
use crate::dispatch::RuleRegistry;
use crate::errors::{Error, Result};

type RuleFactory = fn(&RulesConfig) -> Box<dyn Rule>;

const CATALOG: &[(&str, RuleFactory)] = &[(
    this_call_on_static_method::NAME,
    build_this_call_on_static_method,
)];

fn build_this_call_on_static_method(config: &RulesConfig) -> Box<dyn Rule> {
    Box::new(ThisCallOnStaticMethodToStaticCall::new(
        config.test_case_classes.clone(),
        config.assertion_pattern.clone(),
    ))
}

/// Names of every rule the catalog can build.
pub fn available_rules() -> Vec<&'static str> {
    CATALOG.iter().map(|(name, _)| *name).collect()
}

/// Build a registry holding the enabled rules in configuration order.
/// A name listed twice is registered once.
pub fn build_registry(config: &RulesConfig) -> Result<RuleRegistry> {
    let mut registry = RuleRegistry::new();
    let mut registered: Vec<&str> = Vec::new();

    for name in &config.enabled {
        let Some((catalog_name, factory)) = CATALOG
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name.trim()))
        else {
            return Err(Error::UnknownRule {
                name: name.clone(),
                available: available_rules().join(", "),
            });
        };
        if registered.contains(catalog_name) {
            log::debug!("Rule {} enabled twice, registering once", catalog_name);
            continue;
        }
        registered.push(catalog_name);
        registry.register(factory(config));
    }

    if registry.is_empty() {
        log::warn!("No rules enabled; units will be parsed but left unchanged");
    }
    Ok(registry)
}

/// Every catalog rule with default options, for listing and documentation.
pub fn full_registry() -> RuleRegistry {
    let config = RulesConfig::default();
    let mut registry = RuleRegistry::new();
    for (_, factory) in CATALOG {
        registry.register(factory(&config));
    }
    registry
}
