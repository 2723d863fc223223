use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::RefitConfig;
use crate::dispatch::DEFAULT_MAX_PASSES;
use crate::errors::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".refit.toml";

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> std::io::Result<String> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse and validate config from TOML string
pub fn parse_and_validate_config(contents: &str) -> std::result::Result<RefitConfig, String> {
    let mut config = toml::from_str::<RefitConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))?;

    if config.rewrite.max_passes == 0 {
        log::warn!(
            "rewrite.max_passes must be at least 1. Using {}.",
            DEFAULT_MAX_PASSES
        );
        config.rewrite.max_passes = DEFAULT_MAX_PASSES;
    }
    config.suffixes = config
        .suffixes
        .into_iter()
        .map(|s| s.trim_start_matches('.').to_string())
        .filter(|s| !s.is_empty())
        .collect();

    Ok(config)
}

/// Try loading config from a specific path, `None` if missing or invalid
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<RefitConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// Only log actual errors, not "file not found"
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Directory ancestors of `start`, nearest first, up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Load an explicit config file. Unlike discovery, which skips unreadable
/// or invalid files, any failure here is an error because the user named it.
pub fn load_config_from(path: &Path) -> Result<RefitConfig> {
    let contents = read_config_file(path).map_err(|e| {
        Error::configuration(format!("Cannot read {}: {}", path.display(), e))
    })?;
    let config = parse_and_validate_config(&contents)
        .map_err(|e| Error::configuration(format!("{} ({})", e, path.display())))?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Search `start` and its ancestors for `.refit.toml`
pub fn find_config(start: PathBuf) -> RefitConfig {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            RefitConfig::default()
        })
}

pub fn load_config() -> RefitConfig {
    match std::env::current_dir() {
        Ok(dir) => find_config(dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            RefitConfig::default()
        }
    }
}
