//! Thread-local context tracking for crash reports.
//!
//! Each thread records the rewrite phase, the unit it is working on and the
//! rule being evaluated. Thread-local storage keeps this correct under rayon;
//! progress across all threads lives in atomic counters.

use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

static UNITS_PROCESSED: AtomicUsize = AtomicUsize::new(0);
static UNITS_TOTAL: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_CONTEXT: RefCell<UnitContext> = const { RefCell::new(UnitContext::new()) };
    static CURRENT_RULE: Cell<Option<&'static str>> = const { Cell::new(None) };
}

/// Phase and unit, restored by [`ContextGuard`]. The rule is kept apart in
/// [`CURRENT_RULE`] since it changes once per rule evaluation.
#[derive(Debug, Clone, Default)]
struct UnitContext {
    phase: Option<RewritePhase>,
    current_file: Option<PathBuf>,
}

impl UnitContext {
    const fn new() -> Self {
        Self {
            phase: None,
            current_file: None,
        }
    }
}

/// What this thread was doing when a snapshot was taken.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteContext {
    pub phase: Option<RewritePhase>,
    pub current_file: Option<PathBuf>,
    pub current_rule: Option<&'static str>,
}

impl RewriteContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            current_file: None,
            current_rule: None,
        }
    }
}

/// Major stages of a rewrite run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewritePhase {
    Discovery,
    Parsing,
    Indexing,
    Rewriting,
    WriteBack,
}

impl std::fmt::Display for RewritePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Discovery => write!(f, "discovery"),
            Self::Parsing => write!(f, "parsing"),
            Self::Indexing => write!(f, "indexing"),
            Self::Rewriting => write!(f, "rewriting"),
            Self::WriteBack => write!(f, "write_back"),
        }
    }
}

/// Restores the previous context on drop, so guards nest (file within phase).
pub struct ContextGuard {
    previous: UnitContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

fn update(apply: impl FnOnce(&mut UnitContext)) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        apply(&mut *ctx.borrow_mut());
        ContextGuard { previous }
    })
}

#[must_use]
pub fn set_phase(phase: RewritePhase) -> ContextGuard {
    update(|ctx| ctx.phase = Some(phase))
}

/// Usage: `let _unit = set_current_file(unit.path());` around per-unit work.
#[must_use]
pub fn set_current_file(path: impl Into<PathBuf>) -> ContextGuard {
    let path = path.into();
    update(|ctx| ctx.current_file = Some(path))
}

/// Restores the previously evaluated rule on drop.
pub struct RuleGuard {
    previous: Option<&'static str>,
}

impl Drop for RuleGuard {
    fn drop(&mut self) {
        CURRENT_RULE.with(|rule| rule.set(self.previous));
    }
}

#[must_use]
pub fn set_current_rule(rule: &'static str) -> RuleGuard {
    RuleGuard {
        previous: CURRENT_RULE.with(|current| current.replace(Some(rule))),
    }
}

pub fn set_progress(processed: usize, total: usize) {
    UNITS_PROCESSED.store(processed, Ordering::Relaxed);
    UNITS_TOTAL.store(total, Ordering::Relaxed);
}

/// Safe to call from parallel iterators.
pub fn increment_processed() {
    UNITS_PROCESSED.fetch_add(1, Ordering::Relaxed);
}

#[must_use]
pub fn get_current_context() -> RewriteContext {
    let (phase, current_file) = CURRENT_CONTEXT.with(|ctx| {
        let ctx = ctx.borrow();
        (ctx.phase, ctx.current_file.clone())
    });
    RewriteContext {
        phase,
        current_file,
        current_rule: CURRENT_RULE.with(Cell::get),
    }
}

/// (processed, total)
#[must_use]
pub fn get_progress() -> (usize, usize) {
    (
        UNITS_PROCESSED.load(Ordering::Relaxed),
        UNITS_TOTAL.load(Ordering::Relaxed),
    )
}

pub fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = UnitContext::new();
    });
    CURRENT_RULE.with(|rule| rule.set(None));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_guard_restores_previous() {
        reset_context();

        let _outer = set_phase(RewritePhase::Parsing);
        {
            let _inner = set_phase(RewritePhase::Rewriting);
            assert_eq!(get_current_context().phase, Some(RewritePhase::Rewriting));
        }
        assert_eq!(get_current_context().phase, Some(RewritePhase::Parsing));
    }

    #[test]
    fn test_nested_guards_accumulate() {
        reset_context();

        let _phase = set_phase(RewritePhase::Rewriting);
        let _file = set_current_file("/project/src/A.php");
        let _rule = set_current_rule("some_rule");

        let ctx = get_current_context();
        assert_eq!(ctx.phase, Some(RewritePhase::Rewriting));
        assert_eq!(ctx.current_file, Some(PathBuf::from("/project/src/A.php")));
        assert_eq!(ctx.current_rule, Some("some_rule"));
    }

    #[test]
    fn test_rule_guard_restores_previous_rule() {
        reset_context();
        let _file = set_current_file("/project/src/A.php");

        let outer = set_current_rule("outer");
        {
            let _inner = set_current_rule("inner");
            assert_eq!(get_current_context().current_rule, Some("inner"));
        }
        assert_eq!(get_current_context().current_rule, Some("outer"));
        drop(outer);

        let ctx = get_current_context();
        assert_eq!(ctx.current_rule, None);
        assert_eq!(ctx.current_file, Some(PathBuf::from("/project/src/A.php")));
    }

    #[test]
    fn test_context_is_per_thread() {
        reset_context();
        let _phase = set_phase(RewritePhase::Indexing);

        let other = std::thread::spawn(get_current_context).join().unwrap();
        assert_eq!(other, RewriteContext::new());
        assert_eq!(get_current_context().phase, Some(RewritePhase::Indexing));
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(RewritePhase::Discovery.to_string(), "discovery");
        assert_eq!(RewritePhase::WriteBack.to_string(), "write_back");
    }
}
