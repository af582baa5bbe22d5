//! Form validation and submission.
//!
//! Submission is a small state machine: validate, and either surface the
//! aggregated errors (form stays editable, nothing is sent) or enter the
//! submitting state — disable the submit control, swap its label for the
//! busy indicator, serialize the fields, and hand off to the
//! [`SubmitBackend`] after the simulated latency. Success resets the form
//! and schedules the confirmation redirect; failure restores the form
//! untouched so the user can retry without re-entering anything.
//!
//! ## Validation policy
//!
//! Rules are a declarative table per field kind: a pattern and/or a length
//! bound plus the two fixed-locale messages (missing vs. malformed). Fields
//! are validated in a fixed order — name, email inputs, phone, message,
//! consents — and only the fields actually present in the form participate;
//! an absent field is skipped, not an error. Every pass re-marks exactly
//! the fields it evaluated: failing fields gain the `is-invalid` marker,
//! passing ones have it cleared, so partial fixes update precisely.
//!
//! The patterns are anchored and deliberately permissive; they are policy,
//! not parsing. Messages are Dutch and are part of the observable behavior.

use crate::event::{Trace, TraceKind};
use crate::notify::{Notifier, Severity};
use crate::page::{NodeId, Page};
use crate::timer::{Task, TimerQueue};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

const CONTACT_FORM_ID: &str = "contactForm";
const FORM_ATTRS: [&str; 2] = ["data-form-newsletter", "data-form-contact"];
const INVALID_CLASS: &str = "is-invalid";
const OWNER: &str = "form";

const NAME_IDS: [&str; 2] = ["contactName", "fullName"];
const PHONE_IDS: [&str; 2] = ["contactPhone", "phone"];
const MESSAGE_IDS: [&str; 2] = ["contactMessage", "message"];

pub const BUSY_LABEL: &str = "Verzenden...";
pub const SUCCESS_MESSAGE: &str = "Bedankt! Uw bericht is succesvol verzonden.";
pub const FAILURE_MESSAGE: &str = "Verzenden is mislukt. Probeer het later opnieuw.";

// =============================================================================
// Validation rules
// =============================================================================

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-zÀ-ÿ '\-]{2,50}$").expect("name pattern compiles"));
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\s+\-()]{10,20}$").expect("phone pattern compiles"));

/// What a field kind demands of a trimmed value, plus its two messages.
#[derive(Debug)]
struct FieldRule {
    /// Pattern a non-empty value must match.
    pattern: Option<&'static LazyLock<Regex>>,
    /// Minimum length of a non-empty value.
    min_len: Option<usize>,
    required_message: &'static str,
    invalid_message: &'static str,
}

static NAME_RULE: FieldRule = FieldRule {
    pattern: Some(&NAME_PATTERN),
    min_len: None,
    required_message: "Naam is verplicht.",
    invalid_message: "Naam bevat ongeldige tekens.",
};
static EMAIL_RULE: FieldRule = FieldRule {
    pattern: Some(&EMAIL_PATTERN),
    min_len: None,
    required_message: "E-mailadres is verplicht.",
    invalid_message: "E-mailadres is ongeldig.",
};
static PHONE_RULE: FieldRule = FieldRule {
    pattern: Some(&PHONE_PATTERN),
    min_len: None,
    required_message: "Telefoonnummer is verplicht.",
    invalid_message: "Telefoonnummer is ongeldig.",
};
static MESSAGE_RULE: FieldRule = FieldRule {
    pattern: None,
    min_len: Some(10),
    required_message: "Bericht is verplicht.",
    invalid_message: "Bericht moet minimaal 10 tekens bevatten.",
};
static CONSENT_RULE: FieldRule = FieldRule {
    pattern: None,
    min_len: None,
    required_message: "U moet akkoord gaan met de privacyverklaring.",
    invalid_message: "U moet akkoord gaan met de privacyverklaring.",
};

impl FieldRule {
    /// Check a trimmed text value. `None` means the value passes.
    fn check(&self, value: &str, required: bool) -> Option<&'static str> {
        if value.is_empty() {
            return required.then_some(self.required_message);
        }
        if let Some(min) = self.min_len {
            if value.chars().count() < min {
                return Some(self.invalid_message);
            }
        }
        if let Some(pattern) = self.pattern {
            if !pattern.is_match(value) {
                return Some(self.invalid_message);
            }
        }
        None
    }
}

/// Result of one validation pass: the ordered error list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub errors: Vec<String>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Run the full rule table against a form, marking fields as it goes.
/// Constructed fresh per attempt; nothing is cached between passes.
pub fn validate(page: &mut Page, form: NodeId) -> ValidationOutcome {
    let mut errors = Vec::new();

    if let Some(field) = find_by_ids(page, form, &NAME_IDS) {
        if page.has_attr(field, "required") {
            let value = page.element(field).value.trim().to_string();
            apply_check(page, field, NAME_RULE.check(&value, true), &mut errors);
        }
    }

    for field in find_emails(page, form) {
        let required = page.has_attr(field, "required");
        let value = page.element(field).value.trim().to_string();
        apply_check(page, field, EMAIL_RULE.check(&value, required), &mut errors);
    }

    if let Some(field) = find_by_ids(page, form, &PHONE_IDS) {
        if page.has_attr(field, "required") {
            let value = page.element(field).value.trim().to_string();
            apply_check(page, field, PHONE_RULE.check(&value, true), &mut errors);
        }
    }

    if let Some(field) = find_message(page, form) {
        if page.has_attr(field, "required") {
            let value = page.element(field).value.trim().to_string();
            apply_check(page, field, MESSAGE_RULE.check(&value, true), &mut errors);
        }
    }

    for field in find_consents(page, form) {
        let failed = (!page.element(field).checked).then_some(CONSENT_RULE.required_message);
        apply_check(page, field, failed, &mut errors);
    }

    ValidationOutcome { errors }
}

fn apply_check(
    page: &mut Page,
    field: NodeId,
    failure: Option<&'static str>,
    errors: &mut Vec<String>,
) {
    match failure {
        Some(message) => {
            errors.push(message.to_string());
            page.add_class(field, INVALID_CLASS);
        }
        None => page.remove_class(field, INVALID_CLASS),
    }
}

fn find_by_ids(page: &Page, form: NodeId, ids: &[&str]) -> Option<NodeId> {
    page.descendants(form)
        .into_iter()
        .find(|n| matches!(&page.element(*n).id, Some(id) if ids.contains(&id.as_str())))
}

fn find_emails(page: &Page, form: NodeId) -> Vec<NodeId> {
    page.descendants(form)
        .into_iter()
        .filter(|n| page.element(*n).tag == "input" && page.attr(*n, "type") == Some("email"))
        .collect()
}

fn find_message(page: &Page, form: NodeId) -> Option<NodeId> {
    find_by_ids(page, form, &MESSAGE_IDS).or_else(|| {
        page.descendants(form)
            .into_iter()
            .find(|n| page.element(*n).tag == "textarea" && page.attr(*n, "name") == Some("message"))
    })
}

fn find_consents(page: &Page, form: NodeId) -> Vec<NodeId> {
    page.descendants(form)
        .into_iter()
        .filter(|n| {
            let el = page.element(*n);
            let required_checkbox =
                el.attrs.get("type").map(String::as_str) == Some("checkbox")
                    && el.attrs.contains_key("required");
            let consent_id = matches!(&el.id, Some(id) if id.contains("Consent"));
            required_checkbox || consent_id
        })
        .collect()
}

// =============================================================================
// Submission backend
// =============================================================================

/// A serialized submission: the form's named fields as a key/value mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub form: Option<String>,
    pub fields: BTreeMap<String, String>,
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("verzending geweigerd: {reason}")]
    Rejected { reason: String },
}

/// Delivery boundary for validated submissions. The engine invokes it once
/// the simulated latency elapses; a real implementation would perform the
/// network call here.
pub trait SubmitBackend {
    fn deliver(&mut self, submission: &Submission) -> Result<(), SubmitError>;
}

/// Stand-in delivery that always succeeds.
#[derive(Debug, Default)]
pub struct SimulatedBackend;

impl SubmitBackend for SimulatedBackend {
    fn deliver(&mut self, _submission: &Submission) -> Result<(), SubmitError> {
        Ok(())
    }
}

// =============================================================================
// Controller
// =============================================================================

/// Intercepts submissions on the page's recognized forms.
#[derive(Debug)]
pub struct FormController {
    forms: Vec<NodeId>,
    latency_ms: u64,
    redirect_delay_ms: u64,
    confirmation_url: String,
}

impl FormController {
    /// Snapshot recognizable forms, or decline when the page has none.
    pub fn attach(page: &Page, config: &crate::config::FormConfig) -> Option<Self> {
        let mut forms: Vec<NodeId> = FORM_ATTRS
            .iter()
            .flat_map(|a| page.with_attr(a))
            .collect();
        if let Some(by_id) = page.by_id(CONTACT_FORM_ID) {
            forms.push(by_id);
        }
        forms.sort();
        forms.dedup();
        if forms.is_empty() {
            return None;
        }
        Some(Self {
            forms,
            latency_ms: config.latency_ms,
            redirect_delay_ms: config.redirect_delay_ms,
            confirmation_url: config.confirmation_url.clone(),
        })
    }

    /// Handle a submit: either surface errors or enter the submitting state
    /// and schedule backend resolution.
    pub fn on_submit(
        &self,
        page: &mut Page,
        timers: &mut TimerQueue,
        trace: &mut Trace,
        notifier: &Notifier,
        form: NodeId,
    ) {
        if !self.forms.contains(&form) {
            return;
        }
        let outcome = validate(page, form);
        if !outcome.is_valid() {
            debug!(errors = outcome.errors.len(), "submission blocked");
            let message = outcome.errors.join("\n");
            notifier.notify(page, timers, trace, &message, Severity::Danger);
            trace.record(timers.now(), TraceKind::SubmissionBlocked {
                errors: outcome.errors,
            });
            return;
        }

        let submit = self.submit_control(page, form);
        let original_label = submit
            .map(|s| page.element(s).text.clone())
            .unwrap_or_default();
        if let Some(control) = submit {
            page.element_mut(control).disabled = true;
            page.element_mut(control).text = BUSY_LABEL.to_string();
        }

        let submission = Submission {
            form: page.element(form).id.clone(),
            fields: page.form_data(form),
        };
        debug!(form = submission.form.as_deref().unwrap_or("<anonymous>"), "submission started");
        trace.record(timers.now(), TraceKind::SubmissionStarted {
            form: submission.form.clone(),
        });
        timers.schedule(OWNER, self.latency_ms, Task::SubmitResolve {
            form,
            submit,
            original_label,
            submission,
        });
    }

    /// Backend resolution, fired when the simulated latency elapses.
    #[allow(clippy::too_many_arguments)]
    pub fn on_resolve(
        &self,
        page: &mut Page,
        timers: &mut TimerQueue,
        trace: &mut Trace,
        notifier: &Notifier,
        backend: &mut dyn SubmitBackend,
        form: NodeId,
        submit: Option<NodeId>,
        original_label: &str,
        submission: &Submission,
    ) {
        // restore happens on both branches; reset only on success
        let restore = |page: &mut Page| {
            if let Some(control) = submit {
                page.element_mut(control).disabled = false;
                page.element_mut(control).text = original_label.to_string();
            }
        };

        match backend.deliver(submission) {
            Ok(()) => {
                notifier.notify(page, timers, trace, SUCCESS_MESSAGE, Severity::Success);
                page.reset_form(form);
                page.remove_class(form, "was-validated");
                restore(page);
                trace.record(timers.now(), TraceKind::SubmissionSucceeded {
                    form: submission.form.clone(),
                });
                timers.schedule(OWNER, self.redirect_delay_ms, Task::Redirect {
                    url: self.confirmation_url.clone(),
                });
            }
            Err(err) => {
                notifier.notify(page, timers, trace, FAILURE_MESSAGE, Severity::Danger);
                restore(page);
                debug!(error = %err, "submission failed");
                trace.record(timers.now(), TraceKind::SubmissionFailed {
                    reason: err.to_string(),
                });
            }
        }
    }

    fn submit_control(&self, page: &Page, form: NodeId) -> Option<NodeId> {
        page.descendants(form)
            .into_iter()
            .find(|n| page.attr(*n, "type") == Some("submit"))
    }
}
