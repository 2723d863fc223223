//! Shared error types for refit

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for refit operations
#[derive(Debug, Error)]
pub enum Error {
    /// A discovery root is neither an existing file nor an existing directory
    #[error("Invalid source root: {} is neither a file nor a directory", path.display())]
    InvalidRoot { path: PathBuf },

    /// A source unit could not be parsed into a syntax tree
    #[error("Parse error in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// The language frontend could not be initialized
    #[error("Frontend error: {0}")]
    Frontend(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A configured rule name is not part of the catalog
    #[error("Unknown rule '{name}' (available: {available})")]
    UnknownRule { name: String, available: String },

    /// File system related errors
    #[error("File system error: {message}")]
    FileSystem {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid root error
    pub fn invalid_root(path: impl Into<PathBuf>) -> Self {
        Self::InvalidRoot { path: path.into() }
    }

    /// Create a parse error for a source unit
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file system error with path context
    pub fn file_system(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: Some(path.into()),
            source: Some(source),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_root_message_names_path() {
        let err = Error::invalid_root("/no/such/place");
        assert_eq!(
            err.to_string(),
            "Invalid source root: /no/such/place is neither a file nor a directory"
        );
    }

    #[test]
    fn test_parse_message_names_path() {
        let err = Error::parse("a.php", "unexpected token");
        assert_eq!(err.to_string(), "Parse error in a.php: unexpected token");
    }
}
