//! Shared fixtures for the sitewire test suite.
//!
//! Two canonical pages cover most scenarios:
//!
//! - [`landing_fixture`] — a home page with the full behavior surface:
//!   collapsible menu, fragment nav links, sections with geometry, an image,
//!   a counter, a to-top control, and a modal.
//! - [`contact_fixture`] — a contact page carrying the recognized contact
//!   form with every validated field kind.
//!
//! Tests parse these with [`crate::page::Page::from_fixture_str`], so the
//! fixture loader itself is exercised on every use.

/// Home page with every behavior module's hooks present.
pub(crate) fn landing_fixture() -> &'static str {
    r##"
path = "/index.html"
viewport = [375, 800]

[[element]]
tag = "header"
id = "kop"
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
id = "nav-home"
parent = "mainNav"
classes = ["nav-link"]
attrs = { href = "/" }

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
tag = "img"
id = "sfeerbeeld"
parent = "inhoud"
attrs = { src = "/beeld/pand.jpg" }

[[element]]
tag = "span"
id = "teller"
parent = "inhoud"
attrs = { data-count-up = "120" }
text = "0"

[[element]]
tag = "button"
id = "naar-boven"
attrs = { data-scroll-top = "" }

[[element]]
tag = "button"
id = "open-privacy"
attrs = { data-modal-open = "privacy-modal" }

[[element]]
tag = "div"
id = "privacy-modal"
classes = ["modal"]

[[element]]
tag = "button"
id = "sluit-privacy"
parent = "privacy-modal"
attrs = { data-modal-close = "" }
"##
}

/// Contact page with the recognized contact form, all field kinds present.
pub(crate) fn contact_fixture() -> &'static str {
    r#"
path = "/contact.html"
viewport = [375, 800]

[[element]]
tag = "div"
id = "mainNav"
classes = ["navbar-collapse"]

[[element]]
tag = "button"
id = "menu-toggle"
classes = ["navbar-toggler"]

[[element]]
tag = "a"
id = "nav-contact"
parent = "mainNav"
classes = ["nav-link"]
attrs = { href = "/contact.html" }

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
tag = "input"
id = "contactPhone"
parent = "contactForm"
attrs = { name = "telefoon", required = "" }

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
"#
}
