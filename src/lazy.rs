use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlImageElement, Window};

use crate::dom;
use crate::error::SiteError;
use crate::observer::OneShotWatcher;

pub const LAZY_IMAGE_SELECTOR: &str = "img[data-src]";
pub const LAZY_CLASS: &str = "lazy";

/// Swaps `data-src` into `src` as deferred images scroll into view.
pub struct LazyImages {
    _watcher: OneShotWatcher,
}

impl LazyImages {
    /// `None` when there are no deferred images or the browser cannot watch
    /// intersections; images then keep whatever `src` the markup gave them.
    pub fn mount(window: &Window, document: &Document) -> Result<Option<Self>, SiteError> {
        if !OneShotWatcher::is_supported(window) {
            debug!("IntersectionObserver unavailable, lazy loading disabled");
            return Ok(None);
        }
        let images: Vec<HtmlImageElement> = dom::query_all_in_document(document, LAZY_IMAGE_SELECTOR);
        if images.is_empty() {
            return Ok(None);
        }

        let watcher = OneShotWatcher::new(0.0, |element: Element| {
            let Ok(image) = element.dyn_into::<HtmlImageElement>() else {
                return;
            };
            if let Some(src) = image.get_attribute("data-src") {
                image.set_src(&src);
            }
            let _ = image.class_list().remove_1(LAZY_CLASS);
        })?;

        for image in &images {
            watcher.watch(image);
        }
        debug!("Lazy loading {} images", images.len());
        Ok(Some(Self { _watcher: watcher }))
    }
}
