//! Scroll-driven behavior: scrollspy, smooth fragment scrolling, and the
//! scroll-to-top control.
//!
//! ## Scrollspy
//!
//! The active section is derived from scratch on every evaluation — no
//! incremental state. The tracking position is the scroll offset plus a
//! fixed lookahead, and the active section is the first one in document
//! order whose vertical span contains it; first match wins, so overlapping
//! spans cannot produce two active sections. When no span matches (above
//! the first section, or in a gap) no link changes state that tick and the
//! previous marking persists.
//!
//! Evaluations are throttled: scroll events arrive per frame, the scan runs
//! at most once per window.
//!
//! ## Smooth scrolling
//!
//! Fragment links scroll in place instead of jumping: the viewport moves to
//! the target's top minus the header height, and the fragment is pushed
//! onto the location without a navigation. On pages other than the home
//! page, bare `#x` hrefs are rewritten to `/#x` at initialization so they
//! lead back to the page that actually has the sections.

use crate::config::ScrollConfig;
use crate::event::{Trace, TraceKind};
use crate::page::{NodeId, Page};
use crate::rate::Throttle;
use tracing::debug;

const LINK_CLASSES: [&str; 2] = ["nav-link", "c-nav__link"];
const HEADER_CLASS: &str = "l-header";
const TO_TOP_ATTR: &str = "data-scroll-top";
const TO_TOP_CLASS: &str = "scroll-to-top";

// =============================================================================
// Scrollspy
// =============================================================================

/// Maps scroll position to the currently active section and mirrors it
/// onto the nav links.
#[derive(Debug)]
pub struct ScrollSpy {
    sections: Vec<(NodeId, String)>,
    links: Vec<(NodeId, String)>,
    throttle: Throttle,
    lookahead: i64,
    last_active: Option<String>,
}

impl ScrollSpy {
    /// Wire up, or decline when the page has no sections or no fragment
    /// links — then there is nothing to track and no listener to attach.
    pub fn attach(page: &Page, config: &ScrollConfig) -> Option<Self> {
        let sections: Vec<(NodeId, String)> = page
            .with_tag("section")
            .into_iter()
            .filter_map(|n| page.element(n).id.clone().map(|id| (n, id)))
            .collect();
        let mut link_nodes: Vec<NodeId> = LINK_CLASSES
            .iter()
            .flat_map(|c| page.with_class(c))
            .collect();
        link_nodes.sort();
        link_nodes.dedup();
        let links: Vec<(NodeId, String)> = link_nodes
            .into_iter()
            .filter_map(|n| {
                let href = page.attr(n, "href")?;
                let fragment = href.strip_prefix('#')?;
                Some((n, fragment.to_string()))
            })
            .collect();

        if sections.is_empty() || links.is_empty() {
            return None;
        }
        Some(Self {
            sections,
            links,
            throttle: Throttle::new(config.throttle_ms),
            lookahead: config.lookahead,
            last_active: None,
        })
    }

    pub fn on_scroll(&mut self, page: &mut Page, now: u64, trace: &mut Trace) {
        if !self.throttle.allow(now) {
            return;
        }
        let position = page.scroll_y() + self.lookahead;
        let Some(active_id) = self.resolve_active(page, position) else {
            return;
        };

        for (link, fragment) in &self.links {
            if *fragment == active_id {
                page.add_class(*link, "active");
                page.set_attr(*link, "aria-current", "page");
            } else {
                page.remove_class(*link, "active");
                page.remove_attr(*link, "aria-current");
            }
        }
        if self.last_active.as_deref() != Some(&active_id) {
            debug!(section = %active_id, "active section changed");
            trace.record(now, TraceKind::SectionActivated {
                id: active_id.clone(),
            });
            self.last_active = Some(active_id);
        }
    }

    /// First section in document order whose span contains `position`.
    fn resolve_active(&self, page: &Page, position: i64) -> Option<String> {
        self.sections.iter().find_map(|(node, id)| {
            let el = page.element(*node);
            let contains = position >= el.offset_top && position < el.offset_top + el.height;
            contains.then(|| id.clone())
        })
    }
}

// =============================================================================
// Smooth fragment scrolling
// =============================================================================

/// In-page anchor handling: scroll to the fragment target and push the
/// fragment, or fall through to a real navigation when the target is not
/// on this page.
#[derive(Debug)]
pub struct SmoothScroll {
    anchors: Vec<NodeId>,
    header_fallback: i64,
}

impl SmoothScroll {
    /// Snapshot all usable fragment links; on non-home pages, rewrite bare
    /// `#x` hrefs to `/#x` first. Declines when the page has none.
    pub fn attach(page: &mut Page, config: &ScrollConfig) -> Option<Self> {
        let on_home = page.on_home_page();
        let anchors: Vec<NodeId> = page
            .with_tag("a")
            .into_iter()
            .filter(|n| {
                matches!(page.attr(*n, "href"), Some(href)
                    if href.starts_with('#') && href != "#" && href != "#!")
            })
            .collect();
        if !on_home {
            for anchor in &anchors {
                if let Some(href) = page.attr(*anchor, "href") {
                    let rewritten = format!("/{href}");
                    page.set_attr(*anchor, "href", &rewritten);
                }
            }
        }
        if anchors.is_empty() {
            return None;
        }
        Some(Self {
            anchors,
            header_fallback: config.header_fallback,
        })
    }

    pub fn on_click(&self, page: &mut Page, now: u64, target: NodeId, trace: &mut Trace) {
        let Some(anchor) = self
            .anchors
            .iter()
            .copied()
            .find(|a| page.contains(*a, target))
        else {
            return;
        };
        let Some(href) = page.attr(anchor, "href").map(str::to_string) else {
            return;
        };
        let Some(hash_pos) = href.find('#') else {
            return;
        };
        let fragment = &href[hash_pos + 1..];
        if fragment.is_empty() || fragment == "!" {
            return;
        }

        match page.by_id(fragment) {
            Some(section) => {
                let header_height = self.header_height(page);
                let top = (page.element(section).offset_top - header_height).max(0);
                page.set_scroll_y(top);
                page.push_fragment(fragment);
                debug!(fragment, top, "smooth scroll");
                trace.record(now, TraceKind::FragmentPushed {
                    fragment: fragment.to_string(),
                });
            }
            None if href.starts_with('#') => {
                // same-page fragment with no matching element: the location
                // changes, the viewport does not
                page.push_fragment(fragment);
                trace.record(now, TraceKind::FragmentPushed {
                    fragment: fragment.to_string(),
                });
            }
            None => {
                // rewritten cross-page anchor: default navigation takes over
                page.navigate(&href);
                trace.record(now, TraceKind::Navigated { url: href.clone() });
            }
        }
    }

    fn header_height(&self, page: &Page) -> i64 {
        let mut candidates: Vec<NodeId> = page.with_class(HEADER_CLASS);
        candidates.extend(page.with_tag("header"));
        candidates.sort();
        candidates
            .first()
            .map(|n| page.element(*n).height)
            .unwrap_or(self.header_fallback)
    }
}

// =============================================================================
// Scroll-to-top control
// =============================================================================

/// Shows a back-to-top control once the page is scrolled past a threshold.
#[derive(Debug)]
pub struct ScrollToTop {
    button: NodeId,
    threshold: i64,
    throttle: Throttle,
}

impl ScrollToTop {
    /// Wire up and evaluate visibility once, or decline without a control.
    pub fn attach(page: &mut Page, config: &ScrollConfig) -> Option<Self> {
        let button = page
            .with_attr(TO_TOP_ATTR)
            .into_iter()
            .chain(page.with_class(TO_TOP_CLASS))
            .next()?;
        let mut controller = Self {
            button,
            threshold: config.top_threshold,
            throttle: Throttle::new(config.throttle_ms),
        };
        controller.apply(page);
        Some(controller)
    }

    pub fn on_scroll(&mut self, page: &mut Page, now: u64) {
        if self.throttle.allow(now) {
            self.apply(page);
        }
    }

    pub fn on_click(&self, page: &mut Page, target: NodeId) {
        if page.contains(self.button, target) {
            page.set_scroll_y(0);
        }
    }

    fn apply(&mut self, page: &mut Page) {
        if page.scroll_y() > self.threshold {
            page.add_class(self.button, "visible");
        } else {
            page.remove_class(self.button, "visible");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPY_FIXTURE: &str = r##"
[[element]]
tag = "a"
id = "link-a"
classes = ["nav-link"]
attrs = { href = "#alpha" }

[[element]]
tag = "a"
id = "link-b"
classes = ["nav-link"]
attrs = { href = "#beta" }

[[element]]
tag = "a"
id = "link-c"
classes = ["nav-link"]
attrs = { href = "#gamma" }

[[element]]
tag = "section"
id = "alpha"
offset_top = 0
height = 100

[[element]]
tag = "section"
id = "beta"
offset_top = 100
height = 200

[[element]]
tag = "section"
id = "gamma"
offset_top = 300
height = 200
"##;

    fn spy_setup() -> (Page, ScrollSpy, Trace) {
        let page = Page::from_fixture_str(SPY_FIXTURE).unwrap();
        let spy = ScrollSpy::attach(&page, &ScrollConfig::default()).unwrap();
        (page, spy, Trace::default())
    }

    #[test]
    fn first_containing_span_wins() {
        let (page, spy, _) = spy_setup();
        assert_eq!(spy.resolve_active(&page, 50).as_deref(), Some("alpha"));
        assert_eq!(spy.resolve_active(&page, 150).as_deref(), Some("beta"));
        assert_eq!(spy.resolve_active(&page, 450).as_deref(), Some("gamma"));
        assert_eq!(spy.resolve_active(&page, 600), None);
    }

    #[test]
    fn span_boundaries_are_half_open() {
        let (page, spy, _) = spy_setup();
        assert_eq!(spy.resolve_active(&page, 99).as_deref(), Some("alpha"));
        assert_eq!(spy.resolve_active(&page, 100).as_deref(), Some("beta"));
    }

    #[test]
    fn active_link_gains_marker_others_cleared() {
        let (mut page, mut spy, mut trace) = spy_setup();
        let link_a = page.by_id("link-a").unwrap();
        let link_b = page.by_id("link-b").unwrap();

        page.set_scroll_y(50); // position 150 → beta
        spy.on_scroll(&mut page, 0, &mut trace);

        assert!(page.has_class(link_b, "active"));
        assert_eq!(page.attr(link_b, "aria-current"), Some("page"));
        assert!(!page.has_class(link_a, "active"));
        assert_eq!(page.attr(link_a, "aria-current"), None);
    }

    #[test]
    fn gap_keeps_previous_marking() {
        let (mut page, mut spy, mut trace) = spy_setup();
        let link_b = page.by_id("link-b").unwrap();

        page.set_scroll_y(50);
        spy.on_scroll(&mut page, 0, &mut trace);
        assert!(page.has_class(link_b, "active"));

        page.set_scroll_y(900); // past every section
        spy.on_scroll(&mut page, 200, &mut trace);
        assert!(page.has_class(link_b, "active"));
    }

    #[test]
    fn evaluations_are_throttled() {
        let (mut page, mut spy, mut trace) = spy_setup();
        let link_b = page.by_id("link-b").unwrap();

        page.set_scroll_y(50);
        spy.on_scroll(&mut page, 0, &mut trace);
        page.set_scroll_y(350); // would switch to gamma
        spy.on_scroll(&mut page, 50, &mut trace);
        assert!(page.has_class(link_b, "active"));

        spy.on_scroll(&mut page, 100, &mut trace);
        assert!(!page.has_class(link_b, "active"));
    }

    #[test]
    fn declines_without_sections_or_links() {
        let page = Page::from_fixture_str(
            r#"
[[element]]
tag = "section"
id = "alpha"
"#,
        )
        .unwrap();
        assert!(ScrollSpy::attach(&page, &ScrollConfig::default()).is_none());
    }

    const ANCHOR_FIXTURE: &str = r##"
path = "/index.html"

[[element]]
tag = "header"
classes = ["l-header"]
height = 80

[[element]]
tag = "a"
id = "anchor"
attrs = { href = "#contact" }

[[element]]
tag = "a"
id = "dead-anchor"
attrs = { href = "#nowhere" }

[[element]]
tag = "section"
id = "contact"
offset_top = 600
height = 300
"##;

    #[test]
    fn click_scrolls_below_header_and_pushes_fragment() {
        let mut page = Page::from_fixture_str(ANCHOR_FIXTURE).unwrap();
        let smooth = SmoothScroll::attach(&mut page, &ScrollConfig::default()).unwrap();
        let anchor = page.by_id("anchor").unwrap();
        let mut trace = Trace::default();

        smooth.on_click(&mut page, 0, anchor, &mut trace);
        assert_eq!(page.scroll_y(), 520); // 600 - 80
        assert_eq!(page.location().fragment.as_deref(), Some("contact"));
        assert!(page.pending_navigation().is_none());
    }

    #[test]
    fn missing_header_uses_fallback_height() {
        let mut page = Page::from_fixture_str(
            r##"
path = "/index.html"

[[element]]
tag = "a"
id = "anchor"
attrs = { href = "#contact" }

[[element]]
tag = "section"
id = "contact"
offset_top = 600
height = 300
"##,
        )
        .unwrap();
        let smooth = SmoothScroll::attach(&mut page, &ScrollConfig::default()).unwrap();
        let anchor = page.by_id("anchor").unwrap();
        let mut trace = Trace::default();

        smooth.on_click(&mut page, 0, anchor, &mut trace);
        assert_eq!(page.scroll_y(), 528); // 600 - 72
    }

    #[test]
    fn unresolvable_same_page_fragment_only_moves_location() {
        let mut page = Page::from_fixture_str(ANCHOR_FIXTURE).unwrap();
        let smooth = SmoothScroll::attach(&mut page, &ScrollConfig::default()).unwrap();
        let dead = page.by_id("dead-anchor").unwrap();
        let mut trace = Trace::default();

        smooth.on_click(&mut page, 0, dead, &mut trace);
        assert_eq!(page.scroll_y(), 0);
        assert_eq!(page.location().fragment.as_deref(), Some("nowhere"));
    }

    #[test]
    fn non_home_page_rewrites_and_navigates() {
        let mut page = Page::from_fixture_str(
            r##"
path = "/contact.html"

[[element]]
tag = "a"
id = "anchor"
attrs = { href = "#diensten" }
"##,
        )
        .unwrap();
        let smooth = SmoothScroll::attach(&mut page, &ScrollConfig::default()).unwrap();
        let anchor = page.by_id("anchor").unwrap();
        assert_eq!(page.attr(anchor, "href"), Some("/#diensten"));

        let mut trace = Trace::default();
        smooth.on_click(&mut page, 0, anchor, &mut trace);
        assert_eq!(page.pending_navigation(), Some("/#diensten"));
    }

    #[test]
    fn bare_and_bang_hashes_are_skipped() {
        let mut page = Page::from_fixture_str(
            r##"
path = "/index.html"

[[element]]
tag = "a"
attrs = { href = "#" }

[[element]]
tag = "a"
attrs = { href = "#!" }
"##,
        )
        .unwrap();
        assert!(SmoothScroll::attach(&mut page, &ScrollConfig::default()).is_none());
    }

    #[test]
    fn to_top_control_tracks_threshold() {
        let mut page = Page::from_fixture_str(
            r#"
[[element]]
tag = "button"
id = "top"
attrs = { data-scroll-top = "" }
"#,
        )
        .unwrap();
        let button = page.by_id("top").unwrap();
        let mut control = ScrollToTop::attach(&mut page, &ScrollConfig::default()).unwrap();
        assert!(!page.has_class(button, "visible"));

        page.set_scroll_y(400);
        control.on_scroll(&mut page, 0);
        assert!(page.has_class(button, "visible"));

        control.on_click(&mut page, button);
        assert_eq!(page.scroll_y(), 0);
    }
}
