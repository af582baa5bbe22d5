//! In-memory page model.
//!
//! The [`Page`] is the engine's stand-in for the browser document and window:
//! an arena of elements plus the handful of page-level facts the behavior
//! layer reads and writes — viewport size, vertical scroll offset, location,
//! keyboard focus, readiness. Controllers hold [`NodeId`] handles into the
//! arena; the arena never reuses slots, so a handle stays valid (though
//! possibly detached) for the lifetime of the page.
//!
//! ## Fixtures
//!
//! Pages are built from TOML fixtures. Elements appear in document order and
//! reference their parent by id, so ancestry is explicit and the fixture
//! reads like flattened markup:
//!
//! ```toml
//! path = "/index.html"
//! viewport = [375, 800]
//!
//! [[element]]
//! tag = "nav"
//! id = "mainNav"
//! classes = ["navbar-collapse"]
//!
//! [[element]]
//! tag = "a"
//! parent = "mainNav"
//! classes = ["nav-link"]
//! attrs = { href = "#about" }
//! text = "Over ons"
//!
//! [[element]]
//! tag = "section"
//! id = "about"
//! offset_top = 600
//! height = 400
//! ```
//!
//! ## Validation
//!
//! The loader enforces two rules, both hard errors:
//! - element ids are unique
//! - a `parent` reference must name an element that appeared earlier
//!
//! Everything else is optional with neutral defaults — fixtures stay sparse
//! the same way config files do.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("duplicate element id: {0}")]
    DuplicateId(String),
    #[error("unknown parent id: {0}")]
    UnknownParent(String),
}

/// Handle to an element in a [`Page`] arena.
///
/// Plain index, never reused. Obtained from queries or creation; only
/// meaningful for the page that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// A single element: markup identity plus the mutable state the behavior
/// layer touches (classes, attributes, form state, geometry).
#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: BTreeMap<String, String>,
    /// Visible text content. For the submit control this doubles as the
    /// label that gets swapped for the busy indicator.
    pub text: String,
    pub value: String,
    pub checked: bool,
    pub disabled: bool,
    /// Absolute vertical offset of the element's top edge, in pixels.
    pub offset_top: i64,
    /// Rendered height in pixels.
    pub height: i64,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    detached: bool,
    default_value: String,
    default_checked: bool,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            id: None,
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            text: String::new(),
            value: String::new(),
            checked: false,
            disabled: false,
            offset_top: 0,
            height: 0,
            parent: None,
            children: Vec::new(),
            detached: false,
            default_value: String::new(),
            default_checked: false,
        }
    }
}

/// Current location: path plus optional fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub fragment: Option<String>,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.fragment {
            Some(frag) => write!(f, "{}#{}", self.path, frag),
            None => write!(f, "{}", self.path),
        }
    }
}

/// Document readiness, the coarse two-state version the bootstrapper needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Loading,
    Interactive,
}

/// The page: element arena plus window-level state.
#[derive(Debug, Clone)]
pub struct Page {
    elements: Vec<Element>,
    body: NodeId,
    pub viewport_width: u32,
    pub viewport_height: u32,
    scroll_y: i64,
    location: Location,
    focused: Option<NodeId>,
    readiness: Readiness,
    pending_navigation: Option<String>,
}

impl Page {
    /// Empty page at `path` with just a `body` element, already interactive.
    pub fn new(path: &str) -> Self {
        let body = Element::new("body");
        Self {
            elements: vec![body],
            body: NodeId(0),
            viewport_width: 1280,
            viewport_height: 800,
            scroll_y: 0,
            location: Location {
                path: path.to_string(),
                fragment: None,
            },
            focused: None,
            readiness: Readiness::Interactive,
            pending_navigation: None,
        }
    }

    /// Load a fixture file.
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_fixture_str(&content)
    }

    /// Build a page from fixture TOML.
    pub fn from_fixture_str(toml_str: &str) -> Result<Self, FixtureError> {
        let fixture: PageFixture = toml::from_str(toml_str)?;
        let mut page = Page::new(&fixture.path);
        page.viewport_width = fixture.viewport[0];
        page.viewport_height = fixture.viewport[1];
        page.scroll_y = fixture.scroll;
        if !fixture.ready {
            page.readiness = Readiness::Loading;
        }

        let mut ids: BTreeMap<String, NodeId> = BTreeMap::new();
        for entry in fixture.elements {
            let parent = match &entry.parent {
                Some(pid) => *ids
                    .get(pid)
                    .ok_or_else(|| FixtureError::UnknownParent(pid.clone()))?,
                None => page.body,
            };
            let node = page.create_element(&entry.tag);
            if let Some(id) = &entry.id {
                if ids.contains_key(id) {
                    return Err(FixtureError::DuplicateId(id.clone()));
                }
                ids.insert(id.clone(), node);
            }
            let el = &mut page.elements[node.0];
            el.id = entry.id;
            el.classes = entry.classes;
            el.attrs = entry.attrs;
            el.text = entry.text;
            el.value = entry.value.clone();
            el.checked = entry.checked;
            el.disabled = entry.disabled;
            el.offset_top = entry.offset_top;
            el.height = entry.height;
            el.default_value = entry.value;
            el.default_checked = entry.checked;
            page.append_child(parent, node);
        }
        Ok(page)
    }

    // =========================================================================
    // Tree
    // =========================================================================

    /// The root `body` element.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Create an orphan element. Attach it with [`Page::append_child`].
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.elements.push(Element::new(tag));
        NodeId(self.elements.len() - 1)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.elements[child.0].parent = Some(parent);
        self.elements[child.0].detached = false;
        self.elements[parent.0].children.push(child);
    }

    /// Remove an element from the tree. Detaching an already-detached
    /// element is a no-op — dismissal races depend on that.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.elements[node.0].parent {
            self.elements[parent.0].children.retain(|c| *c != node);
        }
        self.elements[node.0].parent = None;
        self.elements[node.0].detached = true;
    }

    pub fn is_detached(&self, node: NodeId) -> bool {
        self.elements[node.0].detached
    }

    pub fn element(&self, node: NodeId) -> &Element {
        &self.elements[node.0]
    }

    pub fn element_mut(&mut self, node: NodeId) -> &mut Element {
        &mut self.elements[node.0]
    }

    /// True if `node` is `ancestor` or lies inside it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.elements[n.0].parent;
        }
        false
    }

    /// Nearest ancestor (including `node` itself) carrying `class`.
    pub fn closest_with_class(&self, node: NodeId, class: &str) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(n) = current {
            if self.has_class(n, class) {
                return Some(n);
            }
            current = self.elements[n.0].parent;
        }
        None
    }

    fn walk_into(&self, node: NodeId, out: &mut Vec<NodeId>) {
        out.push(node);
        for child in &self.elements[node.0].children {
            self.walk_into(*child, out);
        }
    }

    /// All attached elements in document order (depth-first from `body`).
    pub fn all(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.walk_into(self.body, &mut out);
        out
    }

    /// Descendants of `node` in document order, excluding `node` itself.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        for child in &self.elements[node.0].children {
            self.walk_into(*child, &mut out);
        }
        out
    }

    // =========================================================================
    // Queries (document order)
    // =========================================================================

    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.all()
            .into_iter()
            .find(|n| self.elements[n.0].id.as_deref() == Some(id))
    }

    pub fn with_class(&self, class: &str) -> Vec<NodeId> {
        self.all()
            .into_iter()
            .filter(|n| self.has_class(*n, class))
            .collect()
    }

    pub fn with_tag(&self, tag: &str) -> Vec<NodeId> {
        self.all()
            .into_iter()
            .filter(|n| self.elements[n.0].tag == tag)
            .collect()
    }

    pub fn with_attr(&self, name: &str) -> Vec<NodeId> {
        self.all()
            .into_iter()
            .filter(|n| self.elements[n.0].attrs.contains_key(name))
            .collect()
    }

    // =========================================================================
    // Classes and attributes
    // =========================================================================

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.elements[node.0].classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if !self.has_class(node, class) {
            self.elements[node.0].classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        self.elements[node.0].classes.retain(|c| c != class);
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.elements[node.0].attrs.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.elements[node.0].attrs.contains_key(name)
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        self.elements[node.0]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        self.elements[node.0].attrs.remove(name);
    }

    // =========================================================================
    // Window state
    // =========================================================================

    pub fn scroll_y(&self) -> i64 {
        self.scroll_y
    }

    /// Move the viewport. Negative targets clamp to the top.
    pub fn set_scroll_y(&mut self, y: i64) {
        self.scroll_y = y.max(0);
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Update the fragment without navigating (the `history.pushState`
    /// analog for in-page anchor jumps).
    pub fn push_fragment(&mut self, fragment: &str) {
        self.location.fragment = Some(fragment.to_string());
    }

    /// Record a full navigation request. The engine never acts on it; it is
    /// the observable boundary where this page's lifetime would end.
    pub fn navigate(&mut self, url: &str) {
        self.pending_navigation = Some(url.to_string());
    }

    pub fn pending_navigation(&self) -> Option<&str> {
        self.pending_navigation.as_deref()
    }

    pub fn focus(&mut self, node: NodeId) {
        self.focused = Some(node);
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn readiness(&self) -> Readiness {
        self.readiness
    }

    pub fn set_interactive(&mut self) {
        self.readiness = Readiness::Interactive;
    }

    /// True when the current path is the site root or an index page.
    pub fn on_home_page(&self) -> bool {
        self.location.path == "/" || self.location.path.ends_with("/index.html")
    }

    // =========================================================================
    // Form helpers
    // =========================================================================

    /// Serialize a form's named fields to a key/value mapping, the way
    /// `FormData` would: disabled fields are skipped, checkboxes contribute
    /// only while checked, later fields with the same name win.
    pub fn form_data(&self, form: NodeId) -> BTreeMap<String, String> {
        let mut data = BTreeMap::new();
        for node in self.descendants(form) {
            let el = &self.elements[node.0];
            let Some(name) = el.attrs.get("name") else {
                continue;
            };
            if el.disabled {
                continue;
            }
            if el.attrs.get("type").map(String::as_str) == Some("checkbox") && !el.checked {
                continue;
            }
            data.insert(name.clone(), el.value.clone());
        }
        data
    }

    /// Restore every field in the form to its fixture-time default.
    pub fn reset_form(&mut self, form: NodeId) {
        for node in self.descendants(form) {
            let el = &mut self.elements[node.0];
            el.value = el.default_value.clone();
            el.checked = el.default_checked;
        }
    }
}

// =============================================================================
// Fixture deserialization
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PageFixture {
    #[serde(default = "default_path")]
    path: String,
    #[serde(default = "default_true")]
    ready: bool,
    #[serde(default = "default_viewport")]
    viewport: [u32; 2],
    #[serde(default)]
    scroll: i64,
    #[serde(default, rename = "element")]
    elements: Vec<ElementFixture>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ElementFixture {
    tag: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    classes: Vec<String>,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    attrs: BTreeMap<String, String>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    checked: bool,
    #[serde(default)]
    disabled: bool,
    #[serde(default)]
    offset_top: i64,
    #[serde(default)]
    height: i64,
}

fn default_path() -> String {
    "/".to_string()
}

fn default_true() -> bool {
    true
}

fn default_viewport() -> [u32; 2] {
    [1280, 800]
}
