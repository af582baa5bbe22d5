//! Input events, interaction scripts, and the replay trace.
//!
//! Three closely related vocabularies live here:
//!
//! - [`Event`] — what the engine dispatches: resolved node handles, ready to
//!   route to controllers.
//! - [`Step`] — what a script file contains: the same events with elements
//!   named by id, plus `advance` for virtual time. Steps resolve to events
//!   against a concrete page.
//! - [`Trace`] — what came out: the timestamped domain events a replay
//!   produced, consumed by the report formatter, the JSON transcript, and
//!   the test suites.
//!
//! ## Script format
//!
//! ```toml
//! [[step]]
//! action = "click"
//! target = "menu-toggle"
//!
//! [[step]]
//! action = "keydown"
//! key = "Escape"
//!
//! [[step]]
//! action = "advance"
//! ms = 5200
//! ```

use crate::notify::Severity;
use crate::page::{NodeId, Page};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("script step {step}: no element with id {target}")]
    UnknownTarget { step: usize, target: String },
}

/// Keyboard key, as coarse as the behavior layer needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other(String),
}

impl Key {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" => Key::Escape,
            other => Key::Other(other.to_string()),
        }
    }
}

/// A resolved input event, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The document became interactive.
    Ready,
    Click(NodeId),
    Keydown(Key),
    Scroll { y: i64 },
    Resize { width: u32, height: Option<u32> },
    Input { target: NodeId, value: String },
    SetChecked { target: NodeId, on: bool },
    Submit(NodeId),
    ImageError(NodeId),
}

/// One entry of an interaction script. Targets are element ids.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Ready,
    Click { target: String },
    Keydown { key: String },
    Scroll { y: i64 },
    Resize { width: u32, height: Option<u32> },
    Input { target: String, value: String },
    SetChecked { target: String, on: bool },
    Submit { target: String },
    ImageError { target: String },
    Advance { ms: u64 },
}

/// A resolved step: either an event to dispatch or time to advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Event(Event),
    Advance(u64),
}

impl Step {
    /// Resolve element ids against a page. `index` is the step's position,
    /// used only for error reporting.
    pub fn resolve(&self, page: &Page, index: usize) -> Result<Action, ScriptError> {
        let lookup = |target: &str| {
            page.by_id(target).ok_or_else(|| ScriptError::UnknownTarget {
                step: index + 1,
                target: target.to_string(),
            })
        };
        Ok(match self {
            Step::Ready => Action::Event(Event::Ready),
            Step::Click { target } => Action::Event(Event::Click(lookup(target)?)),
            Step::Keydown { key } => Action::Event(Event::Keydown(Key::from_name(key))),
            Step::Scroll { y } => Action::Event(Event::Scroll { y: *y }),
            Step::Resize { width, height } => Action::Event(Event::Resize {
                width: *width,
                height: *height,
            }),
            Step::Input { target, value } => Action::Event(Event::Input {
                target: lookup(target)?,
                value: value.clone(),
            }),
            Step::SetChecked { target, on } => Action::Event(Event::SetChecked {
                target: lookup(target)?,
                on: *on,
            }),
            Step::Submit { target } => Action::Event(Event::Submit(lookup(target)?)),
            Step::ImageError { target } => Action::Event(Event::ImageError(lookup(target)?)),
            Step::Advance { ms } => Action::Advance(*ms),
        })
    }
}

/// An interaction script: steps applied in order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, ScriptError> {
        Ok(toml::from_str(toml_str)?)
    }
}

// =============================================================================
// Trace
// =============================================================================

/// Why the menu closed. Recorded so replays distinguish the five triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseCause {
    Toggle,
    Link,
    Outside,
    Escape,
    Resize,
}

/// A domain-level observation produced during a replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceKind {
    MenuOpened,
    MenuClosed { cause: CloseCause },
    SectionActivated { id: String },
    FragmentPushed { fragment: String },
    ModalOpened { id: String },
    ModalClosed { id: Option<String> },
    NotificationShown { message: String, severity: Severity },
    NotificationDismissed { manual: bool },
    SubmissionBlocked { errors: Vec<String> },
    SubmissionStarted { form: Option<String> },
    SubmissionSucceeded { form: Option<String> },
    SubmissionFailed { reason: String },
    Navigated { url: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEvent {
    pub at_ms: u64,
    #[serde(flatten)]
    pub kind: TraceKind,
}

/// Ordered, timestamped log of everything observable a replay did.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Trace {
    pub events: Vec<TraceEvent>,
}

impl Trace {
    pub fn record(&mut self, at_ms: u64, kind: TraceKind) {
        self.events.push(TraceEvent { at_ms, kind });
    }

    pub fn kinds(&self) -> Vec<&TraceKind> {
        self.events.iter().map(|e| &e.kind).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
