//! Crash reporting and context tracking.
//!
//! The pipeline marks its phase and current unit with RAII guards; the panic
//! hook reads them back so a crash report names the phase, file and rule
//! that were active.
//!
//! ```ignore
//! let _phase = set_phase(RewritePhase::Parsing);
//! for unit in &units {
//!     let _unit = set_current_file(unit.path());
//!     frontend.parse(&source, unit.path())?;
//! }
//! ```

pub mod context;
pub mod panic_hook;

pub use context::{
    get_current_context, get_progress, increment_processed, reset_context, set_current_file,
    set_current_rule, set_phase, set_progress, ContextGuard, RewriteContext, RewritePhase,
    RuleGuard,
};
pub use panic_hook::install_panic_hook;
