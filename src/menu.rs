//! Collapsible navigation menu.
//!
//! A two-state machine (closed/open) with five close triggers: the toggle
//! itself, any nav link, a click outside both toggle and panel, Escape, and
//! the viewport growing past the desktop breakpoint. Escape additionally
//! returns keyboard focus to the toggle, so a keyboard user is not stranded
//! in a panel that no longer exists visually.
//!
//! Side effects (panel classes, `aria-expanded`, the body scroll lock) are
//! applied only on actual transitions — opening an open menu re-triggers
//! nothing.
//!
//! Resize handling is debounced: continuous window dragging produces one
//! breakpoint check after the stream settles, not hundreds during it.

use crate::config::MenuConfig;
use crate::event::{CloseCause, Key, Trace, TraceKind};
use crate::page::{NodeId, Page};
use crate::rate::Debounce;
use crate::timer::{Task, TimerQueue};
use tracing::debug;

const TOGGLE_CLASSES: [&str; 2] = ["navbar-toggler", "c-nav__toggle"];
const PANEL_CLASS: &str = "navbar-collapse";
const PANEL_ID: &str = "mainNav";
const LINK_CLASSES: [&str; 2] = ["nav-link", "c-nav__link"];
const SCROLL_LOCK_CLASS: &str = "u-no-scroll";
const OWNER: &str = "menu";

/// Owner of the menu's open/closed state. The DOM mirrors the state; it is
/// never read back from it.
#[derive(Debug)]
pub struct MenuController {
    toggle: NodeId,
    panel: NodeId,
    links: Vec<NodeId>,
    open: bool,
    breakpoint: u32,
    resize_debounce: Debounce,
}

impl MenuController {
    /// Wire up against the page, or decline when the toggle or panel is
    /// missing — a page without a collapsible menu simply has none.
    pub fn attach(page: &Page, config: &MenuConfig) -> Option<Self> {
        let mut toggles: Vec<NodeId> = TOGGLE_CLASSES
            .iter()
            .flat_map(|c| page.with_class(c))
            .collect();
        toggles.sort();
        let toggle = *toggles.first()?;
        let panel = page
            .with_class(PANEL_CLASS)
            .into_iter()
            .next()
            .or_else(|| page.by_id(PANEL_ID))?;
        let mut links: Vec<NodeId> = LINK_CLASSES
            .iter()
            .flat_map(|c| page.with_class(c))
            .collect();
        links.sort();
        links.dedup();

        Some(Self {
            toggle,
            panel,
            links,
            open: false,
            breakpoint: config.desktop_breakpoint,
            resize_debounce: Debounce::new(OWNER, config.resize_debounce_ms),
        })
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn on_click(&mut self, page: &mut Page, now: u64, target: NodeId, trace: &mut Trace) {
        if page.contains(self.toggle, target) {
            if self.open {
                self.close(page, now, CloseCause::Toggle, trace);
            } else {
                self.open(page, now, trace);
            }
            return;
        }
        if self.links.iter().any(|l| page.contains(*l, target)) {
            self.close(page, now, CloseCause::Link, trace);
            return;
        }
        if self.open && !page.contains(self.panel, target) {
            self.close(page, now, CloseCause::Outside, trace);
        }
    }

    pub fn on_keydown(&mut self, page: &mut Page, now: u64, key: &Key, trace: &mut Trace) {
        if *key == Key::Escape && self.open {
            self.close(page, now, CloseCause::Escape, trace);
            page.focus(self.toggle);
        }
    }

    /// Resize events only arm the debounce; the breakpoint check runs when
    /// the stream settles and [`MenuController::on_resize_settled`] fires.
    pub fn on_resize(&mut self, timers: &mut TimerQueue) {
        self.resize_debounce.trigger(timers, Task::MenuResizeCheck);
    }

    pub fn on_resize_settled(&mut self, page: &mut Page, now: u64, trace: &mut Trace) {
        if page.viewport_width >= self.breakpoint && self.open {
            self.close(page, now, CloseCause::Resize, trace);
        }
    }

    fn open(&mut self, page: &mut Page, now: u64, trace: &mut Trace) {
        if self.open {
            return;
        }
        self.open = true;
        page.add_class(self.panel, "show");
        page.add_class(self.panel, "is-open");
        page.set_attr(self.toggle, "aria-expanded", "true");
        let body = page.body();
        page.add_class(body, SCROLL_LOCK_CLASS);
        debug!("menu opened");
        trace.record(now, TraceKind::MenuOpened);
    }

    fn close(&mut self, page: &mut Page, now: u64, cause: CloseCause, trace: &mut Trace) {
        if !self.open {
            return;
        }
        self.open = false;
        page.remove_class(self.panel, "show");
        page.remove_class(self.panel, "is-open");
        page.set_attr(self.toggle, "aria-expanded", "false");
        let body = page.body();
        page.remove_class(body, SCROLL_LOCK_CLASS);
        debug!(?cause, "menu closed");
        trace.record(now, TraceKind::MenuClosed { cause });
    }
}
