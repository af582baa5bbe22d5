//! Modal dialogs.
//!
//! Each modal is an independent open/close machine keyed by element
//! identity; nothing makes modals mutually exclusive. Triggers name their
//! modal by id through a data attribute; close controls act on the nearest
//! enclosing modal ancestor. The global Escape handler queries for an open
//! modal at keypress time — it holds no reference — and closes at most one
//! per keypress: the first found in document order.

use crate::event::{Key, Trace, TraceKind};
use crate::page::{NodeId, Page};
use tracing::debug;

const MODAL_CLASS: &str = "modal";
const OPEN_CLASS: &str = "is-open";
const OPEN_ATTR: &str = "data-modal-open";
const CLOSE_ATTR: &str = "data-modal-close";
const SCROLL_LOCK_CLASS: &str = "u-no-scroll";

/// Modal trigger/close wiring plus the global Escape handler.
#[derive(Debug)]
pub struct ModalController {
    triggers: Vec<(NodeId, String)>,
    closers: Vec<NodeId>,
}

impl ModalController {
    /// Snapshot triggers and close controls. Attaches even when there are
    /// none: the Escape handler works by query, so a modal opened by other
    /// means still closes.
    pub fn attach(page: &Page) -> Self {
        let triggers = page
            .with_attr(OPEN_ATTR)
            .into_iter()
            .filter_map(|n| {
                page.attr(n, OPEN_ATTR)
                    .map(|target| (n, target.to_string()))
            })
            .collect();
        let closers = page.with_attr(CLOSE_ATTR);
        Self { triggers, closers }
    }

    pub fn on_click(&self, page: &mut Page, now: u64, target: NodeId, trace: &mut Trace) {
        for (trigger, modal_id) in &self.triggers {
            if page.contains(*trigger, target) {
                if let Some(modal) = page.by_id(modal_id) {
                    self.open(page, now, modal, modal_id, trace);
                }
                return;
            }
        }
        for closer in &self.closers {
            if page.contains(*closer, target) {
                if let Some(modal) = page.closest_with_class(*closer, MODAL_CLASS) {
                    self.close(page, now, modal, trace);
                }
                return;
            }
        }
    }

    pub fn on_keydown(&self, page: &mut Page, now: u64, key: &Key, trace: &mut Trace) {
        if *key != Key::Escape {
            return;
        }
        let open = page
            .with_class(MODAL_CLASS)
            .into_iter()
            .find(|n| page.has_class(*n, OPEN_CLASS));
        if let Some(modal) = open {
            self.close(page, now, modal, trace);
        }
    }

    fn open(&self, page: &mut Page, now: u64, modal: NodeId, modal_id: &str, trace: &mut Trace) {
        if page.has_class(modal, OPEN_CLASS) {
            return;
        }
        page.add_class(modal, OPEN_CLASS);
        let body = page.body();
        page.add_class(body, SCROLL_LOCK_CLASS);
        debug!(modal = modal_id, "modal opened");
        trace.record(now, TraceKind::ModalOpened {
            id: modal_id.to_string(),
        });
    }

    fn close(&self, page: &mut Page, now: u64, modal: NodeId, trace: &mut Trace) {
        if !page.has_class(modal, OPEN_CLASS) {
            return;
        }
        page.remove_class(modal, OPEN_CLASS);
        let body = page.body();
        page.remove_class(body, SCROLL_LOCK_CLASS);
        let id = page.element(modal).id.clone();
        debug!(modal = id.as_deref().unwrap_or("<anonymous>"), "modal closed");
        trace.record(now, TraceKind::ModalClosed { id });
    }
}
