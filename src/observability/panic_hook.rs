//! Panic hook that prints what refit was doing when it crashed.

use super::context::{get_current_context, get_progress, RewriteContext};
use std::fmt::Write as _;
use std::panic::PanicHookInfo;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const WIDTH: usize = 78;

/// Call early in `main`, before any rewriting starts.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let report = CrashReport::capture(info);
        eprintln!();
        eprint!("{}", report.render());
        if std::env::var("RUST_BACKTRACE").is_ok() {
            eprintln!("{}", std::backtrace::Backtrace::capture());
        }
    }));
}

struct CrashReport {
    message: String,
    location: Option<String>,
    context: RewriteContext,
    progress: (usize, usize),
    timestamp: String,
}

impl CrashReport {
    fn capture(info: &PanicHookInfo<'_>) -> Self {
        Self {
            message: panic_message(info),
            location: info
                .location()
                .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column())),
            context: get_current_context(),
            progress: get_progress(),
            timestamp: chrono::Utc::now()
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
        }
    }

    fn render(&self) -> String {
        let rule = "=".repeat(WIDTH);
        let mut out = String::new();
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, " REFIT CRASH REPORT");
        let _ = writeln!(out, "{}", rule);
        line(&mut out, "Version", VERSION);
        line(&mut out, "Platform", std::env::consts::OS);
        line(&mut out, "Time", &self.timestamp);
        line(&mut out, "Panic", &self.message);
        if let Some(location) = &self.location {
            line(&mut out, "Location", location);
        }

        match self.context.phase {
            Some(phase) => line(&mut out, "Phase", &phase.to_string()),
            None => line(&mut out, "Phase", "(not set, crashed before rewriting started)"),
        }
        if let Some(file) = &self.context.current_file {
            line(&mut out, "File", &file.display().to_string());
        }
        if let Some(rule_name) = self.context.current_rule {
            line(&mut out, "Rule", rule_name);
        }
        let (processed, total) = self.progress;
        if total > 0 {
            let pct = processed * 100 / total;
            line(
                &mut out,
                "Progress",
                &format!("{} / {} units ({}%)", processed, total, pct),
            );
        }
        if std::env::var("RUST_BACKTRACE").is_err() {
            let _ = writeln!(out, " Run with RUST_BACKTRACE=1 for a stack trace");
        }
        let _ = writeln!(out, "{}", rule);
        if let Some(file) = &self.context.current_file {
            let _ = writeln!(out, "Include this report and {} when filing an issue.", file.display());
        }
        out
    }
}

fn line(out: &mut String, label: &str, value: &str) {
    let budget = WIDTH.saturating_sub(label.len() + 4);
    let _ = writeln!(out, " {}: {}", label, truncate(value, budget));
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Truncate on a char boundary, marking the cut with `...`.
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::RewritePhase;
    use std::path::PathBuf;

    fn report(context: RewriteContext, progress: (usize, usize)) -> CrashReport {
        CrashReport {
            message: "index out of bounds".to_string(),
            location: Some("src/dispatch/mod.rs:10:5".to_string()),
            context,
            progress,
            timestamp: "2026-01-01 00:00:00 UTC".to_string(),
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("hello", 3), "...");
        assert_eq!(truncate("ééééé", 4), "é...");
    }

    #[test]
    fn test_report_includes_context() {
        let context = RewriteContext {
            phase: Some(RewritePhase::Rewriting),
            current_file: Some(PathBuf::from("/src/A.php")),
            current_rule: Some("some_rule"),
        };
        let rendered = report(context, (3, 4)).render();

        assert!(rendered.contains("Panic: index out of bounds"));
        assert!(rendered.contains("Phase: rewriting"));
        assert!(rendered.contains("File: /src/A.php"));
        assert!(rendered.contains("Rule: some_rule"));
        assert!(rendered.contains("3 / 4 units (75%)"));
    }

    #[test]
    fn test_report_without_context() {
        let rendered = report(RewriteContext::new(), (0, 0)).render();
        assert!(rendered.contains("Phase: (not set"));
        assert!(!rendered.contains("Progress"));
        assert!(!rendered.contains("File:"));
    }
}
