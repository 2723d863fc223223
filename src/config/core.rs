use crate::dispatch::{PassMode, DEFAULT_MAX_PASSES};
use crate::rules::this_call_on_static_method::{
    DEFAULT_ASSERTION_PATTERN, DEFAULT_TEST_CASE_CLASS, NAME as THIS_CALL_ON_STATIC_METHOD,
};
use serde::{Deserialize, Serialize};

/// Root configuration structure for refit, read from `.refit.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefitConfig {
    /// Roots to process when none are given on the command line
    #[serde(default)]
    pub paths: Vec<String>,

    /// File suffixes picked up when expanding directory roots
    #[serde(default = "default_suffixes")]
    pub suffixes: Vec<String>,

    /// Exclude patterns (literal substring or glob)
    #[serde(default)]
    pub exclude_paths: Vec<String>,

    #[serde(default)]
    pub rewrite: RewriteConfig,

    #[serde(default)]
    pub rules: RulesConfig,
}

impl Default for RefitConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            suffixes: default_suffixes(),
            exclude_paths: Vec::new(),
            rewrite: RewriteConfig::default(),
            rules: RulesConfig::default(),
        }
    }
}

fn default_suffixes() -> Vec<String> {
    vec!["php".to_string()]
}

/// How many dispatcher passes a unit gets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RewriteMode {
    /// One pass per unit
    #[default]
    Single,
    /// Repeat passes until nothing changes
    Converge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteConfig {
    #[serde(default)]
    pub mode: RewriteMode,

    /// Upper bound on passes in converge mode
    #[serde(default = "default_max_passes")]
    pub max_passes: usize,

    /// Report changes without writing files
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            mode: RewriteMode::default(),
            max_passes: default_max_passes(),
            dry_run: false,
        }
    }
}

fn default_max_passes() -> usize {
    DEFAULT_MAX_PASSES
}

impl RewriteConfig {
    pub fn pass_mode(&self) -> PassMode {
        match self.mode {
            RewriteMode::Single => PassMode::Single,
            RewriteMode::Converge => PassMode::Converge {
                max_passes: self.max_passes.max(1),
            },
        }
    }
}

/// Rule selection and per-rule options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Rule names, applied in this order
    #[serde(default = "default_enabled_rules")]
    pub enabled: Vec<String>,

    /// Base classes whose subclasses keep `$this->assert*()` calls
    #[serde(default = "default_test_case_classes")]
    pub test_case_classes: Vec<String>,

    /// Method-name pattern treated as an assertion helper
    #[serde(default = "default_assertion_pattern")]
    pub assertion_pattern: String,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled_rules(),
            test_case_classes: default_test_case_classes(),
            assertion_pattern: default_assertion_pattern(),
        }
    }
}

fn default_enabled_rules() -> Vec<String> {
    vec![THIS_CALL_ON_STATIC_METHOD.to_string()]
}

fn default_test_case_classes() -> Vec<String> {
    vec![DEFAULT_TEST_CASE_CLASS.to_string()]
}

fn default_assertion_pattern() -> String {
    DEFAULT_ASSERTION_PATTERN.to_string()
}
