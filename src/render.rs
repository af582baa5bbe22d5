//! HTML snapshot of a replayed page.
//!
//! Renders the final page state — window facts, the element tree, the
//! trace — as a single static HTML document for visual inspection. This is
//! an inspection artifact, not a reproduction of the page's own markup:
//! the table answers "what state did every element end up in", which is
//! the question a replay leaves you with.
//!
//! Generated with Maud, so the document structure is checked at compile
//! time and all interpolation is escaped.

use crate::event::Trace;
use crate::output::event_title;
use crate::page::Page;
use maud::{html, DOCTYPE};

const STYLE: &str = "\
body { font-family: sans-serif; margin: 2rem; color: #111; }\
table { border-collapse: collapse; width: 100%; }\
th, td { border: 1px solid #ddd; padding: 0.3rem 0.6rem; text-align: left; font-size: 0.85rem; }\
th { background: #f5f5f5; }\
code { background: #f0f0f0; padding: 0 0.2rem; }\
";

/// Render the full snapshot document.
pub fn snapshot(page: &Page, trace: &Trace) -> String {
    let markup = html! {
        (DOCTYPE)
        html lang="nl" {
            head {
                meta charset="utf-8";
                title { "sitewire snapshot" }
                style { (STYLE) }
            }
            body {
                h1 { "Page state" }
                dl {
                    dt { "Location" }
                    dd { (page.location()) }
                    dt { "Scroll" }
                    dd { (page.scroll_y()) "px" }
                    dt { "Viewport" }
                    dd { (page.viewport_width) " × " (page.viewport_height) }
                    @if let Some(url) = page.pending_navigation() {
                        dt { "Pending navigation" }
                        dd { (url) }
                    }
                }

                h2 { "Elements" }
                table {
                    thead {
                        tr {
                            th { "tag" }
                            th { "id" }
                            th { "classes" }
                            th { "attributes" }
                            th { "content" }
                        }
                    }
                    tbody {
                        @for node in page.all() {
                            @let el = page.element(node);
                            tr {
                                td { code { (el.tag) } }
                                td { (el.id.as_deref().unwrap_or("")) }
                                td { (el.classes.join(" ")) }
                                td {
                                    @for (name, value) in &el.attrs {
                                        code { (name) @if !value.is_empty() { "=" (value) } }
                                        " "
                                    }
                                    @if el.disabled { code { "disabled" } " " }
                                    @if el.checked { code { "checked" } }
                                }
                                td {
                                    @if el.value.is_empty() { (el.text) } @else { (el.value) }
                                }
                            }
                        }
                    }
                }

                h2 { "Trace" }
                @if trace.is_empty() {
                    p { "(no events)" }
                } @else {
                    ol {
                        @for event in &trace.events {
                            li { (event.at_ms) "ms — " (event_title(&event.kind)) }
                        }
                    }
                }
            }
        }
    };
    markup.into_string()
}
