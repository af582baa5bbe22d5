//! One-time active-link marking against the current path.
//!
//! Runs once at initialization — unlike the scrollspy there is no scroll
//! dependency and no re-evaluation within a page lifetime. A link matches
//! when its href is the root or index page and so is the current path, or
//! when a fragment-free href equals the current path or is a suffix of it.
//! Matching links get the active marker; all others are explicitly cleared.

use crate::page::Page;

const LINK_CLASSES: [&str; 2] = ["nav-link", "c-nav__link"];

/// Mark every nav link that matches the current path.
pub fn apply(page: &mut Page) {
    let current = page.location().path.clone();
    let mut links: Vec<_> = LINK_CLASSES
        .iter()
        .flat_map(|c| page.with_class(c))
        .collect();
    links.sort();
    links.dedup();

    for link in links {
        let Some(href) = page.attr(link, "href").map(str::to_string) else {
            continue;
        };
        let matches = if href == "/" || href == "/index.html" {
            current == "/" || current.ends_with("/index.html")
        } else if !href.contains('#') {
            current == href || current.ends_with(&href)
        } else {
            false
        };

        if matches {
            page.set_attr(link, "aria-current", "page");
            page.add_class(link, "active");
        } else {
            page.remove_attr(link, "aria-current");
            page.remove_class(link, "active");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with_links(path: &str, hrefs: &[&str]) -> Page {
        let mut fixture = format!("path = \"{path}\"\n");
        for (i, href) in hrefs.iter().enumerate() {
            fixture.push_str(&format!(
                "\n[[element]]\ntag = \"a\"\nid = \"l{i}\"\nclasses = [\"nav-link\"]\nattrs = {{ href = \"{href}\" }}\n"
            ));
        }
        Page::from_fixture_str(&fixture).unwrap()
    }

    fn is_active(page: &Page, id: &str) -> bool {
        let link = page.by_id(id).unwrap();
        page.has_class(link, "active") && page.attr(link, "aria-current") == Some("page")
    }

    #[test]
    fn absolute_and_relative_hrefs_match_page_path() {
        let mut page = page_with_links("/about.html", &["/about.html", "about.html"]);
        apply(&mut page);
        assert!(is_active(&page, "l0"));
        assert!(is_active(&page, "l1"));
    }

    #[test]
    fn longer_href_does_not_match_prefix_path() {
        let mut page = page_with_links("/about.html", &["/about.html/team"]);
        apply(&mut page);
        assert!(!is_active(&page, "l0"));
    }

    #[test]
    fn root_href_matches_root_and_index() {
        let mut page = page_with_links("/", &["/", "/contact.html"]);
        apply(&mut page);
        assert!(is_active(&page, "l0"));
        assert!(!is_active(&page, "l1"));

        let mut page = page_with_links("/nl/index.html", &["/index.html"]);
        apply(&mut page);
        assert!(is_active(&page, "l0"));
    }

    #[test]
    fn fragment_links_never_match() {
        let mut page = page_with_links("/", &["#contact", "/diensten.html#top"]);
        apply(&mut page);
        assert!(!is_active(&page, "l0"));
        assert!(!is_active(&page, "l1"));
    }

    #[test]
    fn stale_marker_is_cleared() {
        let mut page = page_with_links("/contact.html", &["/about.html"]);
        let link = page.by_id("l0").unwrap();
        page.add_class(link, "active");
        page.set_attr(link, "aria-current", "page");

        apply(&mut page);
        assert!(!is_active(&page, "l0"));
        assert!(!page.has_class(link, "active"));
    }
}
