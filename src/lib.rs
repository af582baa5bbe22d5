//! # Sitewire
//!
//! A deterministic interaction engine for the client-side behavior layer of
//! server-rendered pages. The markup is the data source: a page fixture
//! describes the elements a real page would carry, and sitewire wires the
//! same behavior modules onto it that a browser script would — collapsible
//! navigation, scroll-position tracking, modal dialogs, form validation and
//! submission, transient notifications — then lets you drive them with
//! scripted events and a virtual clock.
//!
//! # Architecture: Page Model, Virtual Time, Controllers
//!
//! Sitewire replaces the three ambient capabilities a browser script leans on
//! with three explicit ones:
//!
//! ```text
//! 1. Page       element arena + viewport/scroll/location/focus state
//! 2. TimerQueue monotonic millisecond clock + owner-tagged continuations
//! 3. Engine     bootstraps controllers once, routes events, fires timers
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Determinism**: every timer fires at an exact virtual instant, in a
//!   defined order. A replay of the same script is bit-identical.
//! - **Testability**: controllers are exercised against the in-memory page,
//!   so menu sequences, debounce windows, and submission races are plain
//!   unit tests — no rendering environment required.
//! - **Teardown**: timer entries carry their owning module, so tearing the
//!   engine down cancels exactly the continuations that would otherwise fire
//!   against destroyed state.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`page`] | In-memory page model: elements, classes, attributes, geometry, viewport, location, focus |
//! | [`event`] | Input events, interaction scripts, and the replay trace |
//! | [`timer`] | Virtual clock, timer queue, and the `Task` continuations it fires |
//! | [`rate`] | Debounce and throttle wrappers shared by resize/scroll consumers |
//! | [`registry`] | Once-only module initialization flags owned by the engine |
//! | [`engine`] | Bootstrapper: readiness detection, init ordering, event routing, timer dispatch |
//! | [`menu`] | Collapsible navigation state machine and its close triggers |
//! | [`scroll`] | Scrollspy, smooth fragment scrolling, and the scroll-to-top control |
//! | [`links`] | One-time active-link marking against the current path |
//! | [`modal`] | Per-modal open/close via data attributes and the global Escape handler |
//! | [`notify`] | Fire-and-forget toast notifications with two-phase dismissal |
//! | [`form`] | Table-driven field validation and the submission pipeline |
//! | [`media`] | Image attribute pass and load-failure fallback |
//! | [`counter`] | Count-up animation on interval ticks |
//! | [`config`] | `behavior.toml` loading, validation, and the stock config printer |
//! | [`render`] | HTML snapshot of a page state for visual inspection |
//! | [`output`] | CLI report formatting for replay and check |
//!
//! # Design Decisions
//!
//! ## Controllers Over Callbacks
//!
//! A browser script registers closures; sitewire registers nothing. Each
//! behavior module is a struct that captures an immutable snapshot of its
//! target elements at initialization and exposes `on_*` methods the engine
//! routes events to. Timer continuations are data (the [`timer::Task`]
//! enum), not boxed closures, so nothing ever fires against state it does
//! not own.
//!
//! ## Graceful Absence
//!
//! A module whose required elements are missing from the page declines to
//! initialize — `attach` returns `None`, no listeners exist, no error is
//! raised. The page simply has less behavior, which is exactly what the
//! equivalent script does on markup that lacks the hooks.
//!
//! ## Fixed Vocabulary, Configurable Timing
//!
//! Class names and data attributes (`show`, `is-open`, `active`,
//! `is-invalid`, `data-modal-open`, …) are constants: they are the contract
//! with the markup and the stylesheet. Timing and thresholds (debounce
//! windows, the notification timeout, the desktop breakpoint) are
//! `behavior.toml` knobs with the stock values as defaults.
//!
//! ## Fixed-Locale Messages
//!
//! User-facing strings (validation errors, the busy label, the success
//! toast) are the Dutch originals, verbatim. There is no i18n layer; the
//! strings are part of the behavior under test.

pub mod config;
pub mod counter;
pub mod engine;
pub mod event;
pub mod form;
pub mod links;
pub mod media;
pub mod menu;
pub mod modal;
pub mod notify;
pub mod output;
pub mod page;
pub mod rate;
pub mod registry;
pub mod render;
pub mod scroll;
pub mod timer;

#[cfg(test)]
pub(crate) mod test_helpers;
