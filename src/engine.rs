//! Engine: startup ordering, event routing, and timer dispatch.
//!
//! The engine owns everything with a lifetime — the module registry, the
//! timer queue, the controllers, the submit backend, the trace — and is the
//! only place events enter the system. `attach` bootstraps: when the page
//! is still loading it arms a deferred initialization that the `Ready`
//! event releases; when the page is already interactive it initializes on
//! the spot. Both paths are idempotent per page lifetime, module by module.
//!
//! Routing fans out: a click goes to every controller that cares, the same
//! way independent listeners all see a browser event. When a handler moves
//! the viewport programmatically (smooth scroll, the to-top control), the
//! engine runs the scroll consumers once afterwards — the stand-in for the
//! scroll event a browser would fire — and exactly once, so there is no
//! recursion.

use crate::config::BehaviorConfig;
use crate::counter;
use crate::event::{Action, Event, Script, ScriptError, Trace, TraceKind};
use crate::form::{FormController, SubmitBackend, SimulatedBackend};
use crate::links;
use crate::media::MediaEnhancer;
use crate::menu::MenuController;
use crate::modal::ModalController;
use crate::notify::{self, Notifier, Severity};
use crate::page::{NodeId, Page, Readiness};
use crate::registry::ModuleRegistry;
use crate::scroll::{ScrollSpy, ScrollToTop, SmoothScroll};
use crate::timer::{Task, TimerQueue};
use tracing::debug;

/// Coordinates every behavior module over one page.
pub struct Engine {
    config: BehaviorConfig,
    registry: ModuleRegistry,
    timers: TimerQueue,
    trace: Trace,
    notifier: Notifier,
    backend: Box<dyn SubmitBackend>,
    menu: Option<MenuController>,
    smooth: Option<SmoothScroll>,
    spy: Option<ScrollSpy>,
    media: Option<MediaEnhancer>,
    forms: Option<FormController>,
    scroll_top: Option<ScrollToTop>,
    modals: Option<ModalController>,
    attach_pending: bool,
}

impl Engine {
    /// Engine with the always-succeeding simulated submit backend.
    pub fn new(config: BehaviorConfig) -> Self {
        Self::with_backend(config, Box::new(SimulatedBackend))
    }

    pub fn with_backend(config: BehaviorConfig, backend: Box<dyn SubmitBackend>) -> Self {
        let notifier = Notifier::new(&config.notify);
        Self {
            config,
            registry: ModuleRegistry::new(),
            timers: TimerQueue::new(),
            trace: Trace::default(),
            notifier,
            backend,
            menu: None,
            smooth: None,
            spy: None,
            media: None,
            forms: None,
            scroll_top: None,
            modals: None,
            attach_pending: false,
        }
    }

    /// Bootstrap against a page: initialize now if it is interactive,
    /// otherwise wait for the `Ready` event. Safe to call any number of
    /// times.
    pub fn attach(&mut self, page: &mut Page) {
        match page.readiness() {
            Readiness::Interactive => self.init_modules(page),
            Readiness::Loading => {
                debug!("page still loading, deferring initialization");
                self.attach_pending = true;
            }
        }
    }

    fn init_modules(&mut self, page: &mut Page) {
        if !self.registry.claim("app") {
            return;
        }
        if self.registry.claim("menu") {
            self.menu = MenuController::attach(page, &self.config.menu);
        }
        if self.registry.claim("smooth-scroll") {
            self.smooth = SmoothScroll::attach(page, &self.config.scroll);
        }
        if self.registry.claim("scrollspy") {
            self.spy = ScrollSpy::attach(page, &self.config.scroll);
        }
        if self.registry.claim("active-menu") {
            links::apply(page);
        }
        if self.registry.claim("images") {
            self.media = MediaEnhancer::attach(page);
        }
        if self.registry.claim("forms") {
            self.forms = FormController::attach(page, &self.config.form);
        }
        if self.registry.claim("scroll-top") {
            self.scroll_top = ScrollToTop::attach(page, &self.config.scroll);
        }
        if self.registry.claim("modals") {
            self.modals = Some(ModalController::attach(page));
        }
        if self.registry.claim("counters") {
            counter::start(page, &mut self.timers, &self.config.counter);
        }
        debug!("modules initialized");
    }

    /// Route one event to every interested controller.
    pub fn dispatch(&mut self, page: &mut Page, event: Event) {
        let was_scroll = matches!(&event, Event::Scroll { .. });
        let scroll_before = page.scroll_y();

        match event {
            Event::Ready => {
                page.set_interactive();
                if self.attach_pending {
                    self.attach_pending = false;
                    self.init_modules(page);
                }
            }
            Event::Click(target) => {
                let now = self.timers.now();
                if let Some(menu) = self.menu.as_mut() {
                    menu.on_click(page, now, target, &mut self.trace);
                }
                if let Some(smooth) = self.smooth.as_ref() {
                    smooth.on_click(page, now, target, &mut self.trace);
                }
                if let Some(top) = self.scroll_top.as_ref() {
                    top.on_click(page, target);
                }
                if let Some(modals) = self.modals.as_ref() {
                    modals.on_click(page, now, target, &mut self.trace);
                }
                self.notification_close_click(page, target);
            }
            Event::Keydown(key) => {
                let now = self.timers.now();
                if let Some(menu) = self.menu.as_mut() {
                    menu.on_keydown(page, now, &key, &mut self.trace);
                }
                if let Some(modals) = self.modals.as_ref() {
                    modals.on_keydown(page, now, &key, &mut self.trace);
                }
            }
            Event::Scroll { y } => {
                page.set_scroll_y(y);
                self.run_scroll_consumers(page);
            }
            Event::Resize { width, height } => {
                page.viewport_width = width;
                if let Some(h) = height {
                    page.viewport_height = h;
                }
                if let Some(menu) = self.menu.as_mut() {
                    menu.on_resize(&mut self.timers);
                }
            }
            Event::Input { target, value } => {
                page.element_mut(target).value = value;
            }
            Event::SetChecked { target, on } => {
                page.element_mut(target).checked = on;
            }
            Event::Submit(form) => {
                if let Some(forms) = self.forms.as_ref() {
                    forms.on_submit(page, &mut self.timers, &mut self.trace, &self.notifier, form);
                }
            }
            Event::ImageError(image) => {
                if let Some(media) = self.media.as_ref() {
                    media.on_image_error(page, image);
                }
            }
        }

        // a handler moved the viewport: run the scroll consumers once, the
        // stand-in for the follow-up scroll event a browser would fire
        if !was_scroll && page.scroll_y() != scroll_before {
            self.run_scroll_consumers(page);
        }
    }

    /// Advance virtual time, firing due continuations in order. Follow-ups
    /// scheduled inside the window fire in the same pass.
    pub fn advance(&mut self, page: &mut Page, ms: u64) {
        let until = self.timers.now() + ms;
        while let Some(task) = self.timers.pop_due(until) {
            self.run_task(page, task);
        }
        self.timers.finish_advance(until);
    }

    /// Run a whole interaction script.
    pub fn run_script(&mut self, page: &mut Page, script: &Script) -> Result<(), ScriptError> {
        for (index, step) in script.steps.iter().enumerate() {
            match step.resolve(page, index)? {
                Action::Event(event) => self.dispatch(page, event),
                Action::Advance(ms) => self.advance(page, ms),
            }
        }
        Ok(())
    }

    /// Present a notification (the programmatic entry point other modules
    /// and embedders share).
    pub fn notify(&mut self, page: &mut Page, message: &str, severity: Severity) -> NodeId {
        self.notifier
            .notify(page, &mut self.timers, &mut self.trace, message, severity)
    }

    /// Cancel all pending continuations and drop the controllers. Nothing
    /// scheduled before teardown can fire afterwards. Returns how many
    /// entries were cancelled.
    pub fn teardown(&mut self) -> usize {
        let dropped = self.timers.clear();
        self.menu = None;
        self.smooth = None;
        self.spy = None;
        self.media = None;
        self.forms = None;
        self.scroll_top = None;
        self.modals = None;
        debug!(dropped, "engine torn down");
        dropped
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.timers.now()
    }

    /// Which modules came up, for the check report.
    pub fn module_status(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("menu", self.menu.is_some()),
            ("smooth-scroll", self.smooth.is_some()),
            ("scrollspy", self.spy.is_some()),
            ("active-menu", self.registry.is_initialized("active-menu")),
            ("images", self.media.is_some()),
            ("forms", self.forms.is_some()),
            ("scroll-top", self.scroll_top.is_some()),
            ("modals", self.modals.is_some()),
            ("counters", self.registry.is_initialized("counters")),
        ]
    }

    fn run_scroll_consumers(&mut self, page: &mut Page) {
        let now = self.timers.now();
        if let Some(spy) = self.spy.as_mut() {
            spy.on_scroll(page, now, &mut self.trace);
        }
        if let Some(top) = self.scroll_top.as_mut() {
            top.on_scroll(page, now);
        }
    }

    fn notification_close_click(&mut self, page: &mut Page, target: NodeId) {
        let Some(close) = page.closest_with_class(target, notify::CLOSE_CLASS) else {
            return;
        };
        if let Some(alert) = page.closest_with_class(close, "alert") {
            self.notifier
                .dismiss(page, &mut self.timers, &mut self.trace, alert, true);
        }
    }

    fn run_task(&mut self, page: &mut Page, task: Task) {
        let now = self.timers.now();
        match task {
            Task::MenuResizeCheck => {
                if let Some(menu) = self.menu.as_mut() {
                    menu.on_resize_settled(page, now, &mut self.trace);
                }
            }
            Task::NotifyAutoDismiss { alert } => {
                self.notifier
                    .dismiss(page, &mut self.timers, &mut self.trace, alert, false);
            }
            Task::NotifyRemove { alert } => Notifier::remove(page, alert),
            Task::SubmitResolve {
                form,
                submit,
                original_label,
                submission,
            } => {
                if let Some(forms) = self.forms.as_ref() {
                    forms.on_resolve(
                        page,
                        &mut self.timers,
                        &mut self.trace,
                        &self.notifier,
                        self.backend.as_mut(),
                        form,
                        submit,
                        &original_label,
                        &submission,
                    );
                }
            }
            Task::Redirect { url } => {
                page.navigate(&url);
                self.trace.record(now, TraceKind::Navigated { url });
            }
            Task::CounterTick {
                counter: node,
                target,
                current,
                increment,
            } => {
                counter::tick(
                    page,
                    &mut self.timers,
                    self.config.counter.tick_ms,
                    node,
                    target,
                    current,
                    increment,
                );
            }
        }
    }
}
