//! End-to-end flows through the public engine API: menu sequences, the
//! submission pipeline on both branches, notification independence, and
//! scroll tracking driven by scripted events.

use sitewire::config::BehaviorConfig;
use sitewire::engine::Engine;
use sitewire::event::{CloseCause, Event, Key, Script, TraceKind};
use sitewire::form::{SubmitBackend, SubmitError, Submission};
use sitewire::notify::Severity;
use sitewire::page::Page;

const LANDING: &str = r##"
path = "/index.html"
viewport = [375, 800]

[[element]]
tag = "header"
classes = ["l-header"]
height = 80

[[element]]
tag = "button"
id = "menu-toggle"
classes = ["navbar-toggler"]

[[element]]
tag = "div"
id = "mainNav"
classes = ["navbar-collapse"]

[[element]]
tag = "a"
id = "nav-diensten"
parent = "mainNav"
classes = ["nav-link"]
attrs = { href = "#diensten" }

[[element]]
tag = "a"
id = "nav-contact"
parent = "mainNav"
classes = ["nav-link"]
attrs = { href = "#contact" }

[[element]]
tag = "main"
id = "inhoud"

[[element]]
tag = "section"
id = "intro"
parent = "inhoud"
offset_top = 0
height = 600

[[element]]
tag = "section"
id = "diensten"
parent = "inhoud"
offset_top = 600
height = 400

[[element]]
tag = "section"
id = "contact"
parent = "inhoud"
offset_top = 1000
height = 500

[[element]]
tag = "button"
id = "open-privacy"
attrs = { data-modal-open = "privacy-modal" }

[[element]]
tag = "div"
id = "privacy-modal"
classes = ["modal"]
"##;

const CONTACT: &str = r#"
path = "/contact.html"
viewport = [375, 800]

[[element]]
tag = "form"
id = "contactForm"
attrs = { data-form-contact = "" }

[[element]]
tag = "input"
id = "contactName"
parent = "contactForm"
attrs = { name = "naam", required = "" }

[[element]]
tag = "input"
id = "contactEmail"
parent = "contactForm"
attrs = { name = "email", type = "email", required = "" }

[[element]]
tag = "textarea"
id = "contactMessage"
parent = "contactForm"
attrs = { name = "message", required = "" }

[[element]]
tag = "input"
id = "privacyConsent"
parent = "contactForm"
attrs = { name = "consent", type = "checkbox", required = "" }

[[element]]
tag = "button"
id = "verstuur"
parent = "contactForm"
attrs = { type = "submit" }
text = "Versturen"
"#;

fn landing() -> (Page, Engine) {
    let mut page = Page::from_fixture_str(LANDING).unwrap();
    let mut engine = Engine::new(BehaviorConfig::default());
    engine.attach(&mut page);
    (page, engine)
}

fn contact() -> (Page, Engine) {
    let mut page = Page::from_fixture_str(CONTACT).unwrap();
    let mut engine = Engine::new(BehaviorConfig::default());
    engine.attach(&mut page);
    (page, engine)
}

fn fill_contact_form(page: &mut Page, engine: &mut Engine) {
    let mut input = |page: &mut Page, engine: &mut Engine, id: &str, value: &str| {
        let target = page.by_id(id).unwrap();
        engine.dispatch(page, Event::Input {
            target,
            value: value.to_string(),
        });
    };
    input(page, engine, "contactName", "Janneke de Vries");
    input(page, engine, "contactEmail", "janneke@voorbeeld.nl");
    input(page, engine, "contactMessage", "Graag een offerte voor de dakkapel.");
    let consent = page.by_id("privacyConsent").unwrap();
    engine.dispatch(page, Event::SetChecked {
        target: consent,
        on: true,
    });
}

#[test]
fn menu_follows_the_last_state_changing_event() {
    let (mut page, mut engine) = landing();
    let toggle = page.by_id("menu-toggle").unwrap();
    let content = page.by_id("inhoud").unwrap();
    let panel = page.by_id("mainNav").unwrap();

    engine.dispatch(&mut page, Event::Click(toggle));
    assert!(page.has_class(panel, "is-open"));

    engine.dispatch(&mut page, Event::Click(content));
    assert!(!page.has_class(panel, "is-open"));

    engine.dispatch(&mut page, Event::Click(toggle));
    engine.dispatch(&mut page, Event::Keydown(Key::Escape));
    assert!(!page.has_class(panel, "is-open"));
    assert_eq!(page.focused(), Some(toggle));

    engine.dispatch(&mut page, Event::Click(toggle));
    engine.dispatch(&mut page, Event::Resize {
        width: 1024,
        height: None,
    });
    engine.advance(&mut page, 250);
    assert!(!page.has_class(panel, "is-open"));

    let causes: Vec<_> = engine
        .trace()
        .kinds()
        .into_iter()
        .filter_map(|k| match k {
            TraceKind::MenuClosed { cause } => Some(*cause),
            _ => None,
        })
        .collect();
    assert_eq!(causes, vec![
        CloseCause::Outside,
        CloseCause::Escape,
        CloseCause::Resize,
    ]);
}

#[test]
fn escape_closes_menu_and_modal_in_one_keypress() {
    let (mut page, mut engine) = landing();
    let toggle = page.by_id("menu-toggle").unwrap();
    let trigger = page.by_id("open-privacy").unwrap();
    let modal = page.by_id("privacy-modal").unwrap();

    engine.dispatch(&mut page, Event::Click(trigger));
    assert!(page.has_class(modal, "is-open"));
    engine.dispatch(&mut page, Event::Click(toggle));
    assert!(page.has_class(page.by_id("mainNav").unwrap(), "is-open"));

    engine.dispatch(&mut page, Event::Keydown(Key::Escape));
    assert!(!page.has_class(modal, "is-open"));
    assert!(!page.has_class(page.by_id("mainNav").unwrap(), "is-open"));
}

#[test]
fn scripted_scroll_tracks_sections_with_throttling() {
    let (mut page, mut engine) = landing();
    let script = Script::from_toml_str(
        r#"
[[step]]
action = "scroll"
y = 50

[[step]]
action = "advance"
ms = 100

[[step]]
action = "scroll"
y = 950

[[step]]
action = "advance"
ms = 100

[[step]]
action = "scroll"
y = 2000
"#,
    )
    .unwrap();
    engine.run_script(&mut page, &script).unwrap();

    let activated: Vec<_> = engine
        .trace()
        .kinds()
        .into_iter()
        .filter_map(|k| match k {
            TraceKind::SectionActivated { id } => Some(id.clone()),
            _ => None,
        })
        .collect();
    // 50 → intro (position 150), 950 → contact (position 1050),
    // 2000 → past everything: previous marking persists
    assert_eq!(activated, vec!["intro".to_string(), "contact".to_string()]);

    let nav_contact = page.by_id("nav-contact").unwrap();
    assert!(page.has_class(nav_contact, "active"));
    assert_eq!(page.attr(nav_contact, "aria-current"), Some("page"));
}

#[test]
fn valid_submission_runs_the_full_success_path() {
    let (mut page, mut engine) = contact();
    let form = page.by_id("contactForm").unwrap();
    let button = page.by_id("verstuur").unwrap();

    fill_contact_form(&mut page, &mut engine);
    engine.dispatch(&mut page, Event::Submit(form));

    // busy state while the latency runs
    assert!(page.element(button).disabled);
    assert_eq!(page.element(button).text, "Verzenden...");
    assert!(page.pending_navigation().is_none());

    engine.advance(&mut page, 1000);
    // success: toast, reset, control restored — all before the redirect
    let name = page.by_id("contactName").unwrap();
    assert_eq!(page.element(name).value, "");
    assert!(!page.element(button).disabled);
    assert_eq!(page.element(button).text, "Versturen");
    assert!(page.pending_navigation().is_none());

    engine.advance(&mut page, 1500);
    assert_eq!(page.pending_navigation(), Some("thank_you.html"));

    let kinds = engine.trace().kinds();
    let succeeded_at = kinds
        .iter()
        .position(|k| matches!(k, TraceKind::SubmissionSucceeded { .. }))
        .unwrap();
    let navigated_at = kinds
        .iter()
        .position(|k| matches!(k, TraceKind::Navigated { .. }))
        .unwrap();
    assert!(succeeded_at < navigated_at);
    assert!(kinds.iter().any(|k| matches!(
        k,
        TraceKind::NotificationShown { severity: Severity::Success, message }
            if message == "Bedankt! Uw bericht is succesvol verzonden."
    )));
}

#[test]
fn invalid_submission_surfaces_one_danger_toast_and_sends_nothing() {
    let (mut page, mut engine) = contact();
    let form = page.by_id("contactForm").unwrap();
    let name = page.by_id("contactName").unwrap();

    let target = page.by_id("contactName").unwrap();
    engine.dispatch(&mut page, Event::Input {
        target,
        value: "J0e".to_string(),
    });
    engine.dispatch(&mut page, Event::Submit(form));

    assert!(page.has_class(name, "is-invalid"));
    assert_eq!(page.element(name).value, "J0e");

    let shown: Vec<_> = engine
        .trace()
        .kinds()
        .into_iter()
        .filter_map(|k| match k {
            TraceKind::NotificationShown { message, severity } => {
                Some((message.clone(), *severity))
            }
            _ => None,
        })
        .collect();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].1, Severity::Danger);
    assert!(shown[0].0.contains("Naam bevat ongeldige tekens."));
    assert!(shown[0].0.contains("E-mailadres is verplicht."));

    // nothing in flight: advancing far produces no submission events
    engine.advance(&mut page, 10_000);
    assert!(!engine
        .trace()
        .kinds()
        .iter()
        .any(|k| matches!(k, TraceKind::SubmissionStarted { .. })));
    assert!(page.pending_navigation().is_none());
}

/// Backend that refuses every delivery.
struct RefusingBackend;

impl SubmitBackend for RefusingBackend {
    fn deliver(&mut self, _submission: &Submission) -> Result<(), SubmitError> {
        Err(SubmitError::Rejected {
            reason: "upstream onbereikbaar".to_string(),
        })
    }
}

#[test]
fn failed_delivery_keeps_the_form_editable_for_retry() {
    let mut page = Page::from_fixture_str(CONTACT).unwrap();
    let mut engine = Engine::with_backend(BehaviorConfig::default(), Box::new(RefusingBackend));
    engine.attach(&mut page);
    let form = page.by_id("contactForm").unwrap();
    let button = page.by_id("verstuur").unwrap();

    fill_contact_form(&mut page, &mut engine);
    engine.dispatch(&mut page, Event::Submit(form));
    engine.advance(&mut page, 1000);

    // control restored, contents preserved, no redirect ever
    assert!(!page.element(button).disabled);
    assert_eq!(page.element(button).text, "Versturen");
    let name = page.by_id("contactName").unwrap();
    assert_eq!(page.element(name).value, "Janneke de Vries");

    engine.advance(&mut page, 10_000);
    assert!(page.pending_navigation().is_none());
    assert!(engine.trace().kinds().iter().any(|k| matches!(
        k,
        TraceKind::SubmissionFailed { reason } if reason.contains("upstream onbereikbaar")
    )));
    assert!(engine.trace().kinds().iter().any(|k| matches!(
        k,
        TraceKind::NotificationShown { severity: Severity::Danger, .. }
    )));
}

#[test]
fn two_toasts_dismiss_independently() {
    let (mut page, mut engine) = landing();
    let first = engine.notify(&mut page, "eerste", Severity::Info);
    let second = engine.notify(&mut page, "tweede", Severity::Warning);

    // dismiss the first manually via its close control
    let close = page
        .descendants(first)
        .into_iter()
        .find(|n| page.has_class(*n, "btn-close"))
        .unwrap();
    engine.dispatch(&mut page, Event::Click(close));
    engine.advance(&mut page, 150);

    assert!(page.is_detached(first));
    assert!(!page.is_detached(second));
    assert!(page.has_class(second, "show"));

    // the second goes on its own timeout
    engine.advance(&mut page, 5150);
    assert!(page.is_detached(second));
}

#[test]
fn repeated_attach_does_not_duplicate_behavior() {
    let (mut page, mut engine) = contact();
    engine.attach(&mut page);
    engine.attach(&mut page);

    let form = page.by_id("contactForm").unwrap();
    engine.dispatch(&mut page, Event::Submit(form));

    let toasts = engine
        .trace()
        .kinds()
        .iter()
        .filter(|k| matches!(k, TraceKind::NotificationShown { .. }))
        .count();
    assert_eq!(toasts, 1);
}
