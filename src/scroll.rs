use log::debug;
use web_sys::{Document, Element, HtmlElement, ScrollBehavior, ScrollToOptions, Window};

use crate::config::SiteConfig;
use crate::dom::{self, Listener};
use crate::error::SiteError;

pub const ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";
pub const HEADER_SELECTOR: &str = ".header";

/// Fragment of an in-page link worth scrolling to; a bare `#` is not one.
pub fn scroll_fragment(href: &str) -> Option<&str> {
    if href.len() > 1 && href.starts_with('#') {
        Some(href)
    } else {
        None
    }
}

/// Document offset to scroll to so the target clears the fixed header.
pub fn scroll_offset(target_top: f64, header_height: f64, margin: f64) -> f64 {
    (target_top - header_height - margin).max(0.0)
}

/// Smooth scrolling for same-page anchor links.
pub struct SmoothScroll {
    _listener: Listener,
}

impl SmoothScroll {
    pub fn mount(document: &Document, config: &SiteConfig) -> Result<Self, SiteError> {
        let window = dom::window()?;
        let margin = config.scroll_margin_px;
        let click_document = document.clone();

        let listener = Listener::new(document, "click", move |event| {
            let Some(anchor) = dom::event_element(&event)
                .and_then(|el| el.closest(ANCHOR_SELECTOR).ok().flatten())
            else {
                return;
            };
            let Some(href) = anchor.get_attribute("href") else {
                return;
            };
            let Some(fragment) = scroll_fragment(&href) else {
                return;
            };
            // An id that is not a valid selector simply has no target.
            let Some(target) = dom::query_in_document::<HtmlElement>(&click_document, fragment) else {
                return;
            };

            event.prevent_default();
            scroll_to(&window, &click_document, &target, margin);
        })?;

        Ok(Self { _listener: listener })
    }
}

fn scroll_to(window: &Window, document: &Document, target: &HtmlElement, margin: f64) {
    let header_height = dom::query_in_document::<HtmlElement>(document, HEADER_SELECTOR)
        .map_or(0.0, |header| f64::from(header.offset_height()));
    let target_top = document_top(window, target);
    let top = scroll_offset(target_top, header_height, margin);
    debug!("Scrolling to {} (header {}px)", top, header_height);

    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);

    let _ = target.focus();
}

fn document_top(window: &Window, element: &Element) -> f64 {
    let scroll_y = window.scroll_y().unwrap_or(0.0);
    element.get_bounding_client_rect().top() + scroll_y
}
