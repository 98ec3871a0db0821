use chrono::{Datelike, Local};
use log::debug;
use web_sys::{Document, Performance, Window};

use crate::dom::Listener;
use crate::error::SiteError;

pub const YEAR_ELEMENT_ID: &str = "year";

/// Writes the current year into the footer's `#year` element, if any.
pub fn stamp_year(document: &Document) {
    if let Some(element) = document.get_element_by_id(YEAR_ELEMENT_ID) {
        element.set_text_content(Some(&Local::now().year().to_string()));
    }
}

/// Logs how long the page took to reach `load`.
pub struct LoadTiming {
    _listener: Option<Listener>,
}

impl LoadTiming {
    pub fn mount(window: &Window, document: &Document) -> Result<Self, SiteError> {
        let performance = window.performance();
        // The wasm module is fetched asynchronously and may start after load.
        if document.ready_state() == "complete" {
            log_load_time(performance.as_ref());
            return Ok(Self { _listener: None });
        }
        let listener = Listener::new(window, "load", move |_| log_load_time(performance.as_ref()))?;
        Ok(Self {
            _listener: Some(listener),
        })
    }
}

fn log_load_time(performance: Option<&Performance>) {
    // performance.now() is measured from navigation start.
    if let Some(performance) = performance {
        debug!("Page load time: {:.0}ms", performance.now());
    }
}
