//! Rendering of run reports, discovered units and rule listings.

pub mod json;
pub mod terminal;

use crate::errors::{Error, Result};
use clap::ValueEnum;
use std::fs;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

/// Print to stdout, or write to `output_file` (creating parent directories).
pub fn emit(content: &str, output_file: Option<&Path>) -> Result<()> {
    match output_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .map_err(|e| Error::file_system("Failed to create directory", parent, e))?;
            }
            let mut file = fs::File::create(path)
                .map_err(|e| Error::file_system("Failed to create output file", path, e))?;
            file.write_all(content.as_bytes())?;
        }
        None => {
            print!("{content}");
            if !content.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}
