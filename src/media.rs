//! Image attribute pass and load-failure fallback.
//!
//! One sweep at initialization normalizes every image: fluid sizing, and
//! lazy loading for anything that is not a logo or explicitly marked
//! critical. A failed load swaps the source for an inline SVG placeholder —
//! the visitor sees a neutral tile instead of a broken-image icon, and no
//! error surfaces.

use crate::page::{NodeId, Page};

/// Inline SVG shown in place of an image that failed to load.
pub const FALLBACK_IMAGE: &str = "data:image/svg+xml,%3Csvg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 400 300\"%3E%3Crect fill=\"%23e0e0e0\" width=\"400\" height=\"300\"/%3E%3Ctext fill=\"%23999\" font-family=\"sans-serif\" font-size=\"18\" x=\"50%25\" y=\"50%25\" text-anchor=\"middle\" dominant-baseline=\"middle\"%3EAfbeelding niet beschikbaar%3C/text%3E%3C/svg%3E";

const LOGO_CLASS: &str = "c-logo__img";
const BRAND_CLASS: &str = "navbar-brand";
const CRITICAL_ATTR: &str = "data-critical";

/// Normalizes images once and substitutes the fallback on load errors.
#[derive(Debug)]
pub struct MediaEnhancer {
    images: Vec<NodeId>,
}

impl MediaEnhancer {
    /// Run the attribute pass over all images, or decline when there are
    /// none.
    pub fn attach(page: &mut Page) -> Option<Self> {
        let images = page.with_tag("img");
        if images.is_empty() {
            return None;
        }
        for img in &images {
            page.add_class(*img, "img-fluid");
            let is_logo = page.has_class(*img, LOGO_CLASS)
                || page.closest_with_class(*img, BRAND_CLASS).is_some();
            let is_critical = page.has_attr(*img, CRITICAL_ATTR);
            if !page.has_attr(*img, "loading") && !is_logo && !is_critical {
                page.set_attr(*img, "loading", "lazy");
            }
        }
        Some(Self { images })
    }

    pub fn on_image_error(&self, page: &mut Page, image: NodeId) {
        if self.images.contains(&image) {
            page.set_attr(image, "src", FALLBACK_IMAGE);
        }
    }
}
