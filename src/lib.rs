// Export modules for library usage
pub mod cli;
pub mod config;
pub mod core;
pub mod discovery;
pub mod dispatch;
pub mod errors;
pub mod frontend;
pub mod index;
pub mod observability;
pub mod output;
pub mod pipeline;
pub mod rules;

// Re-export commonly used types
pub use crate::config::RefitConfig;
pub use crate::core::{NodeKind, SyntaxNode};
pub use crate::discovery::{FilesFinder, SourceUnit};
pub use crate::dispatch::{apply_all, DispatchOutcome, Dispatcher, PassMode, RuleRegistry};
pub use crate::errors::{Error, Result};
pub use crate::frontend::{get_frontend, Frontend, Language};
pub use crate::index::{DeclarationIndex, ProjectIndex};
pub use crate::pipeline::{run, RunConfig, RunReport, UnitReport, UnitStatus};
pub use crate::rules::{NodeContext, Rule, RuleDefinition, RuleOutcome};
