//! CLI output formatting for replay and check.
//!
//! # Information-First Display
//!
//! Output is **observation-centric, not element-centric**. The primary
//! display for a replay is the sequence of domain events it produced —
//! menu transitions, activated sections, notifications, submissions — with
//! timing and payloads as indented context lines. Final page state follows
//! as its own block, so the report reads as "what happened, where it ended
//! up".
//!
//! # Output Format
//!
//! ## Replay
//!
//! ```text
//! Interactions
//! 001 menu opened
//!     At: 0ms
//! 002 menu closed (escape)
//!     At: 40ms
//! 003 notification shown (danger)
//!     At: 40ms
//!     Message: Naam is verplicht.
//!
//! Final state
//!     Location: /index.html
//!     Scroll: 0px
//!     Notifications: 1 active
//!
//! Replayed 3 events in 5200ms
//! ```
//!
//! ## Check
//!
//! ```text
//! Modules
//! 001 menu
//!     Status: active
//! 002 smooth-scroll
//!     Status: inactive (no matching elements)
//!
//! 1 of 2 modules active
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::event::{CloseCause, Trace, TraceKind};
use crate::notify::Notifier;
use crate::page::Page;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn cause_name(cause: &CloseCause) -> &'static str {
    match cause {
        CloseCause::Toggle => "toggle",
        CloseCause::Link => "nav link",
        CloseCause::Outside => "outside click",
        CloseCause::Escape => "escape",
        CloseCause::Resize => "resize",
    }
}

/// One-line title for a trace event, shared with the HTML snapshot.
pub fn event_title(kind: &TraceKind) -> String {
    match kind {
        TraceKind::MenuOpened => "menu opened".to_string(),
        TraceKind::MenuClosed { cause } => format!("menu closed ({})", cause_name(cause)),
        TraceKind::SectionActivated { id } => format!("section activated: {id}"),
        TraceKind::FragmentPushed { fragment } => format!("fragment pushed: #{fragment}"),
        TraceKind::ModalOpened { id } => format!("modal opened: {id}"),
        TraceKind::ModalClosed { id } => {
            format!("modal closed: {}", id.as_deref().unwrap_or("<anonymous>"))
        }
        TraceKind::NotificationShown { severity, .. } => {
            format!("notification shown ({severity})")
        }
        TraceKind::NotificationDismissed { manual } => {
            if *manual {
                "notification dismissed (manual)".to_string()
            } else {
                "notification dismissed (timeout)".to_string()
            }
        }
        TraceKind::SubmissionBlocked { errors } => {
            format!("submission blocked ({} errors)", errors.len())
        }
        TraceKind::SubmissionStarted { form } => format!(
            "submission started: {}",
            form.as_deref().unwrap_or("<anonymous>")
        ),
        TraceKind::SubmissionSucceeded { form } => format!(
            "submission succeeded: {}",
            form.as_deref().unwrap_or("<anonymous>")
        ),
        TraceKind::SubmissionFailed { reason } => format!("submission failed: {reason}"),
        TraceKind::Navigated { url } => format!("navigation: {url}"),
    }
}

fn event_context(kind: &TraceKind) -> Vec<String> {
    match kind {
        TraceKind::NotificationShown { message, .. } => message
            .lines()
            .map(|line| format!("Message: {line}"))
            .collect(),
        TraceKind::SubmissionBlocked { errors } => {
            errors.iter().map(|e| format!("Error: {e}")).collect()
        }
        _ => Vec::new(),
    }
}

/// Format a full replay report: interactions, final state, summary line.
pub fn format_replay_output(page: &Page, trace: &Trace, total_ms: u64) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Interactions".to_string());
    if trace.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (pos, event) in trace.events.iter().enumerate() {
        lines.push(format!("{} {}", format_index(pos + 1), event_title(&event.kind)));
        lines.push(format!("{}At: {}ms", indent(1), event.at_ms));
        for context in event_context(&event.kind) {
            lines.push(format!("{}{}", indent(1), context));
        }
    }

    lines.push(String::new());
    lines.push("Final state".to_string());
    lines.push(format!("{}Location: {}", indent(1), page.location()));
    lines.push(format!("{}Scroll: {}px", indent(1), page.scroll_y()));
    lines.push(format!(
        "{}Notifications: {} active",
        indent(1),
        Notifier::active_count(page)
    ));
    if let Some(url) = page.pending_navigation() {
        lines.push(format!("{}Pending navigation: {}", indent(1), url));
    }

    lines.push(String::new());
    lines.push(format!(
        "Replayed {} events in {}ms",
        trace.len(),
        total_ms
    ));
    lines
}

/// Format the check report: per-module status plus a summary.
pub fn format_check_output(statuses: &[(&'static str, bool)]) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("Modules".to_string());
    for (pos, (name, active)) in statuses.iter().enumerate() {
        lines.push(format!("{} {}", format_index(pos + 1), name));
        let status = if *active {
            "active"
        } else {
            "inactive (no matching elements)"
        };
        lines.push(format!("{}Status: {}", indent(1), status));
    }
    let active = statuses.iter().filter(|(_, a)| *a).count();
    lines.push(String::new());
    lines.push(format!("{} of {} modules active", active, statuses.len()));
    lines
}

pub fn print_replay_output(page: &Page, trace: &Trace, total_ms: u64) {
    for line in format_replay_output(page, trace, total_ms) {
        println!("{line}");
    }
}

pub fn print_check_output(statuses: &[(&'static str, bool)]) {
    for line in format_check_output(statuses) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Trace;
    use crate::notify::Severity;

    #[test]
    fn replay_report_lists_events_with_context() {
        let page = Page::new("/index.html");
        let mut trace = Trace::default();
        trace.record(0, TraceKind::MenuOpened);
        trace.record(
            40,
            TraceKind::NotificationShown {
                message: "Naam is verplicht.\nE-mailadres is verplicht.".to_string(),
                severity: Severity::Danger,
            },
        );

        let lines = format_replay_output(&page, &trace, 5200);
        assert_eq!(lines[0], "Interactions");
        assert_eq!(lines[1], "001 menu opened");
        assert_eq!(lines[2], "    At: 0ms");
        assert_eq!(lines[3], "002 notification shown (danger)");
        assert!(lines.contains(&"    Message: Naam is verplicht.".to_string()));
        assert!(lines.contains(&"    Message: E-mailadres is verplicht.".to_string()));
        assert!(lines.contains(&"Replayed 2 events in 5200ms".to_string()));
    }

    #[test]
    fn empty_trace_reads_as_none() {
        let page = Page::new("/");
        let lines = format_replay_output(&page, &Trace::default(), 0);
        assert_eq!(lines[1], "    (none)");
    }

    #[test]
    fn check_report_counts_active_modules() {
        let statuses = [("menu", true), ("forms", false)];
        let lines = format_check_output(&statuses);
        assert_eq!(lines[0], "Modules");
        assert_eq!(lines[1], "001 menu");
        assert_eq!(lines[2], "    Status: active");
        assert_eq!(lines[4], "    Status: inactive (no matching elements)");
        assert_eq!(lines.last().unwrap(), "1 of 2 modules active");
    }

    #[test]
    fn titles_cover_every_close_cause() {
        for (cause, label) in [
            (CloseCause::Toggle, "toggle"),
            (CloseCause::Escape, "escape"),
            (CloseCause::Resize, "resize"),
        ] {
            assert_eq!(
                event_title(&TraceKind::MenuClosed { cause }),
                format!("menu closed ({label})")
            );
        }
    }
}
