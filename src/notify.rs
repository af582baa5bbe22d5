//! Fire-and-forget toast notifications.
//!
//! `notify` appends a self-dismissing alert to a singleton container and
//! walks away: the page owns the alert from then on, the notifier keeps no
//! reference. Dismissal — manual via the alert's close control, or automatic
//! when the display window elapses — is two-phase: the `show` class drops
//! immediately so a fade transition can play, and the element is physically
//! removed after a short grace period.
//!
//! Both dismissal paths may fire for the same alert (the user clicks close
//! while the auto-dismiss timer is pending). That race is benign by
//! construction: whichever path runs second finds the alert already
//! dismissed or already detached and does nothing.

use crate::config::NotifyConfig;
use crate::event::{Trace, TraceKind};
use crate::page::{NodeId, Page};
use crate::timer::{Task, TimerQueue};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Id of the lazily created notification container. Found by id on every
/// call, never held in memory.
pub const CONTAINER_ID: &str = "toast-container";

/// Class marking an alert's manual close control.
pub const CLOSE_CLASS: &str = "btn-close";

const ALERT_CLASS: &str = "alert";
const OWNER: &str = "notify";

/// Severity level of a notification, mapped onto `alert-*` styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Danger,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Danger => "danger",
            Severity::Warning => "warning",
        };
        write!(f, "{name}")
    }
}

/// Toast presenter. Holds timing only — never references to live alerts.
#[derive(Debug)]
pub struct Notifier {
    timeout_ms: u64,
    fade_ms: u64,
}

impl Notifier {
    pub fn new(config: &NotifyConfig) -> Self {
        Self {
            timeout_ms: config.timeout_ms,
            fade_ms: config.fade_ms,
        }
    }

    /// Present a notification. Creates the container on first use, wires a
    /// close control, and schedules automatic dismissal.
    pub fn notify(
        &self,
        page: &mut Page,
        timers: &mut TimerQueue,
        trace: &mut Trace,
        message: &str,
        severity: Severity,
    ) -> NodeId {
        let container = Self::ensure_container(page);

        let alert = page.create_element("div");
        page.append_child(container, alert);
        page.add_class(alert, ALERT_CLASS);
        page.add_class(alert, &format!("alert-{severity}"));
        page.add_class(alert, "alert-dismissible");
        page.add_class(alert, "fade");
        page.add_class(alert, "show");
        page.set_attr(alert, "role", "alert");
        page.element_mut(alert).text = message.to_string();

        let close = page.create_element("button");
        page.append_child(alert, close);
        page.add_class(close, CLOSE_CLASS);
        page.set_attr(close, "type", "button");
        page.set_attr(close, "aria-label", "Sluiten");

        timers.schedule(OWNER, self.timeout_ms, Task::NotifyAutoDismiss { alert });
        debug!(%severity, text = message, "notification shown");
        trace.record(
            timers.now(),
            TraceKind::NotificationShown {
                message: message.to_string(),
                severity,
            },
        );
        alert
    }

    /// Begin dismissal: drop the visible style now, remove after the fade
    /// grace. Dismissing an alert that is already gone is a no-op.
    pub fn dismiss(
        &self,
        page: &mut Page,
        timers: &mut TimerQueue,
        trace: &mut Trace,
        alert: NodeId,
        manual: bool,
    ) {
        if page.is_detached(alert) || !page.has_class(alert, "show") {
            return;
        }
        page.remove_class(alert, "show");
        timers.schedule(OWNER, self.fade_ms, Task::NotifyRemove { alert });
        trace.record(timers.now(), TraceKind::NotificationDismissed { manual });
    }

    /// Second phase of dismissal: physically remove the alert. Safe to call
    /// any number of times.
    pub fn remove(page: &mut Page, alert: NodeId) {
        page.detach(alert);
    }

    /// Alerts currently attached to the container.
    pub fn active_count(page: &Page) -> usize {
        match page.by_id(CONTAINER_ID) {
            Some(container) => page
                .descendants(container)
                .into_iter()
                .filter(|n| page.has_class(*n, ALERT_CLASS))
                .count(),
            None => 0,
        }
    }

    fn ensure_container(page: &mut Page) -> NodeId {
        if let Some(existing) = page.by_id(CONTAINER_ID) {
            return existing;
        }
        let container = page.create_element("div");
        let body = page.body();
        page.append_child(body, container);
        page.element_mut(container).id = Some(CONTAINER_ID.to_string());
        page.set_attr(container, "role", "region");
        page.set_attr(container, "aria-live", "polite");
        container
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Page, TimerQueue, Trace, Notifier) {
        (
            Page::new("/"),
            TimerQueue::new(),
            Trace::default(),
            Notifier::new(&NotifyConfig::default()),
        )
    }

    #[test]
    fn container_is_created_once_and_reused() {
        let (mut page, mut timers, mut trace, notifier) = setup();
        notifier.notify(&mut page, &mut timers, &mut trace, "een", Severity::Info);
        notifier.notify(&mut page, &mut timers, &mut trace, "twee", Severity::Info);

        let containers: Vec<_> = page
            .all()
            .into_iter()
            .filter(|n| page.element(*n).id.as_deref() == Some(CONTAINER_ID))
            .collect();
        assert_eq!(containers.len(), 1);
        assert_eq!(page.attr(containers[0], "aria-live"), Some("polite"));
        assert_eq!(Notifier::active_count(&page), 2);
    }

    #[test]
    fn alerts_are_independent() {
        let (mut page, mut timers, mut trace, notifier) = setup();
        let first = notifier.notify(&mut page, &mut timers, &mut trace, "een", Severity::Success);
        let second = notifier.notify(&mut page, &mut timers, &mut trace, "twee", Severity::Danger);

        notifier.dismiss(&mut page, &mut timers, &mut trace, first, true);
        Notifier::remove(&mut page, first);

        assert!(page.is_detached(first));
        assert!(!page.is_detached(second));
        assert!(page.has_class(second, "show"));
        assert_eq!(Notifier::active_count(&page), 1);
    }

    #[test]
    fn severity_maps_to_alert_class() {
        let (mut page, mut timers, mut trace, notifier) = setup();
        let alert = notifier.notify(&mut page, &mut timers, &mut trace, "pas op", Severity::Warning);
        assert!(page.has_class(alert, "alert-warning"));
        assert_eq!(page.attr(alert, "role"), Some("alert"));
    }

    #[test]
    fn double_dismiss_is_tolerated() {
        let (mut page, mut timers, mut trace, notifier) = setup();
        let alert = notifier.notify(&mut page, &mut timers, &mut trace, "een", Severity::Info);

        notifier.dismiss(&mut page, &mut timers, &mut trace, alert, true);
        let pending_after_first = timers.pending();
        // auto-dismiss path arrives later; alert is mid-fade
        notifier.dismiss(&mut page, &mut timers, &mut trace, alert, false);
        assert_eq!(timers.pending(), pending_after_first);

        Notifier::remove(&mut page, alert);
        Notifier::remove(&mut page, alert);
        assert!(page.is_detached(alert));

        let dismissals = trace
            .kinds()
            .iter()
            .filter(|k| matches!(k, TraceKind::NotificationDismissed { .. }))
            .count();
        assert_eq!(dismissals, 1);
    }

    #[test]
    fn auto_dismiss_is_scheduled_at_creation() {
        let (mut page, mut timers, mut trace, notifier) = setup();
        notifier.notify(&mut page, &mut timers, &mut trace, "een", Severity::Info);
        assert_eq!(timers.pending(), 1);
        assert!(matches!(
            timers.pop_due(5000),
            Some(Task::NotifyAutoDismiss { .. })
        ));
        assert_eq!(timers.now(), 5000);
    }
}
