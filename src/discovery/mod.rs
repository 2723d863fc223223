//! Source-unit discovery.
//!
//! [`FilesFinder`] turns caller-supplied roots (files, directories or
//! directory globs such as `src/*/tests`) into an ordered, deduplicated list
//! of absolute file paths. Symlinked files are reported by their target.
//! Results are memoized per finder instance, keyed by a digest of the roots,
//! suffixes and exclude patterns.

mod exclude;

pub use exclude::{compile_excludes, is_excluded, normalize_for_glob, ExcludeMatcher};

use crate::errors::{Error, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One resolved file to process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SourceUnit {
    path: PathBuf,
}

impl SourceUnit {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

impl fmt::Display for SourceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

#[derive(Debug, Default)]
pub struct FilesFinder {
    cache: HashMap<String, Vec<SourceUnit>>,
}

impl FilesFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `roots` into source units.
    ///
    /// Explicit file roots come first, in caller order, and bypass both the
    /// suffix filter and exclusion. Directory roots are walked recursively,
    /// keeping files whose name ends with `.` + one of `suffixes`, sorted by
    /// path per directory and filtered through `excludes`.
    ///
    /// A second call with equal arguments returns the cached list without
    /// touching the filesystem.
    pub fn resolve<R: AsRef<str>>(
        &mut self,
        roots: &[R],
        suffixes: &[String],
        excludes: &[String],
    ) -> Result<Vec<SourceUnit>> {
        let roots: Vec<&str> = roots.iter().map(AsRef::as_ref).collect();
        let key = cache_key(&roots, suffixes, excludes);

        if let Some(cached) = self.cache.get(&key) {
            log::debug!("Discovery cache hit ({} units)", cached.len());
            return Ok(cached.clone());
        }

        let units = discover(&roots, suffixes, excludes)?;
        log::debug!("Discovered {} units from {} roots", units.len(), roots.len());
        self.cache.insert(key, units.clone());
        Ok(units)
    }

    pub fn cached_signatures(&self) -> usize {
        self.cache.len()
    }
}

/// Hex SHA-256 over the ordered inputs. Each item is NUL-terminated and each
/// section tagged so `["a", "b"]` and `["ab"]` never collide.
pub fn cache_key(roots: &[&str], suffixes: &[String], excludes: &[String]) -> String {
    let mut hasher = Sha256::new();
    let sections: [(&str, Vec<&str>); 3] = [
        ("roots", roots.to_vec()),
        ("suffixes", suffixes.iter().map(String::as_str).collect()),
        ("excludes", excludes.iter().map(String::as_str).collect()),
    ];
    for (tag, items) in sections {
        hasher.update(tag.as_bytes());
        hasher.update(b"\x1e");
        for item in items {
            hasher.update(item.as_bytes());
            hasher.update(b"\0");
        }
    }
    format!("{:x}", hasher.finalize())
}

fn discover(roots: &[&str], suffixes: &[String], excludes: &[String]) -> Result<Vec<SourceUnit>> {
    let mut files = Vec::new();
    let mut directories = Vec::new();

    for root in roots {
        if is_pattern(root) {
            directories.extend(expand_directory_pattern(root));
            continue;
        }
        let path = Path::new(root);
        if path.is_file() {
            files.push(canonical(path)?);
        } else if path.is_dir() {
            directories.push(canonical(path)?);
        } else {
            return Err(Error::invalid_root(path));
        }
    }

    let matchers = compile_excludes(excludes);
    for directory in &directories {
        files.extend(files_in_directory(directory, suffixes, &matchers));
    }

    let mut seen = HashSet::new();
    Ok(files
        .into_iter()
        .filter(|path| seen.insert(path.clone()))
        .map(SourceUnit::new)
        .collect())
}

fn is_pattern(root: &str) -> bool {
    root.contains(['*', '?', '['])
}

fn canonical(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .map_err(|e| Error::file_system("Failed to resolve path", path, e))
}

fn expand_directory_pattern(pattern: &str) -> Vec<PathBuf> {
    let entries = match glob::glob(pattern) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Skipping malformed root pattern {:?}: {}", pattern, e);
            return Vec::new();
        }
    };

    let directories: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_dir())
        .filter_map(|path| path.canonicalize().ok())
        .collect();

    if directories.is_empty() {
        log::debug!("Root pattern {:?} matched no directories", pattern);
    }
    directories
}

fn has_suffix(path: &Path, suffixes: &[String]) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| {
            suffixes.iter().any(|suffix| {
                name.strip_suffix(suffix.as_str())
                    .is_some_and(|stem| stem.ends_with('.'))
            })
        })
}

/// Files under `directory`, symlinked files included. Suffixes match the
/// name found in the directory; exclusion and the returned path use the
/// resolved target.
fn files_in_directory(
    directory: &Path,
    suffixes: &[String],
    excludes: &[ExcludeMatcher],
) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = WalkDir::new(directory)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable entry under {}: {}", directory.display(), e);
                None
            }
        })
        .filter(|entry| entry.path().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| has_suffix(path, suffixes))
        .collect();
    candidates.sort();

    candidates
        .into_iter()
        .filter_map(|path| match path.canonicalize() {
            Ok(resolved) => Some(resolved),
            Err(e) => {
                log::warn!("Skipping unresolvable file {}: {}", path.display(), e);
                None
            }
        })
        .filter(|path| !is_excluded(&path.to_string_lossy(), excludes))
        .collect()
}
