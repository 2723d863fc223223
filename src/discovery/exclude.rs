//! Exclude-pattern matching.
//!
//! Each pattern is tried two ways against a candidate's absolute path: as a
//! literal substring (an escaped regex) and as a shell glob after
//! [`normalize_for_glob`]. Either match excludes the path. Patterns that
//! fail to compile under one interpretation simply never match under it.

use glob::{MatchOptions, Pattern};
use regex::Regex;

const GLOB_MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Make a pattern match anywhere in a path: `value` → `*value*`,
/// `value*` → `*value*`, `*value` → `*value*`. `*value*` is unchanged.
pub fn normalize_for_glob(pattern: &str) -> String {
    let mut normalized = String::with_capacity(pattern.len() + 2);
    if !pattern.starts_with('*') {
        normalized.push('*');
    }
    normalized.push_str(pattern);
    if !pattern.ends_with('*') {
        normalized.push('*');
    }
    normalized
}

/// One exclude pattern compiled under both interpretations.
#[derive(Debug, Clone)]
pub struct ExcludeMatcher {
    pattern: String,
    literal: Option<Regex>,
    glob: Option<Pattern>,
}

impl ExcludeMatcher {
    pub fn new(pattern: &str) -> Self {
        let literal = Regex::new(&regex::escape(pattern))
            .map_err(|e| log::debug!("Exclude pattern {:?} unusable as regex: {}", pattern, e))
            .ok();
        let glob = Pattern::new(&normalize_for_glob(pattern))
            .map_err(|e| log::debug!("Exclude pattern {:?} unusable as glob: {}", pattern, e))
            .ok();

        Self {
            pattern: pattern.to_string(),
            literal,
            glob,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches_literal(&self, path: &str) -> bool {
        self.literal.as_ref().is_some_and(|re| re.is_match(path))
    }

    pub fn matches_glob(&self, path: &str) -> bool {
        self.glob
            .as_ref()
            .is_some_and(|glob| glob.matches_with(path, GLOB_MATCH))
    }

    pub fn matches(&self, path: &str) -> bool {
        self.matches_literal(path) || self.matches_glob(path)
    }
}

/// Compile exclude patterns, skipping empty ones: an empty pattern would
/// otherwise exclude every file.
pub fn compile_excludes(patterns: &[String]) -> Vec<ExcludeMatcher> {
    patterns
        .iter()
        .filter(|p| {
            let keep = !p.trim().is_empty();
            if !keep {
                log::debug!("Ignoring empty exclude pattern");
            }
            keep
        })
        .map(|p| ExcludeMatcher::new(p))
        .collect()
}

pub fn is_excluded(path: &str, excludes: &[ExcludeMatcher]) -> bool {
    match excludes.iter().find(|m| m.matches(path)) {
        Some(matcher) => {
            log::trace!("Excluding {} (matched {:?})", path, matcher.pattern());
            true
        }
        None => false,
    }
}
