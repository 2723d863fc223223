//! `.refit.toml` configuration.
//!
//! Every section is optional and missing keys take their defaults. A
//! discovered file that fails to parse is reported and replaced by the
//! default config; a file named with `--config` must load.

mod core;
mod loader;

pub use self::core::{RefitConfig, RewriteConfig, RewriteMode, RulesConfig};
pub use loader::{
    directory_ancestors, find_config, load_config, load_config_from, parse_and_validate_config,
    CONFIG_FILE_NAME,
};
