use wasm_bindgen::JsCast;
use web_sys::{ErrorEvent, PromiseRejectionEvent, Window};

use crate::dom::Listener;
use crate::error::SiteError;

/// Sends uncaught script errors and unhandled promise rejections to the
/// console. Nothing is retried or shown to the visitor.
pub struct ErrorReporter {
    _listeners: [Listener; 2],
}

impl ErrorReporter {
    pub fn mount(window: &Window) -> Result<Self, SiteError> {
        let errors = Listener::new(window, "error", |event| {
            match event.dyn_ref::<ErrorEvent>() {
                Some(error) => gloo_console::error!("JavaScript Error:", error.message(), error.error()),
                // Resource load failures arrive as plain events.
                None => gloo_console::error!("JavaScript Error:", event.clone()),
            }
        })?;

        let rejections = Listener::new(window, "unhandledrejection", |event| {
            if let Some(rejection) = event.dyn_ref::<PromiseRejectionEvent>() {
                gloo_console::error!("Unhandled Promise Rejection:", rejection.reason());
            }
        })?;

        Ok(Self {
            _listeners: [errors, rejections],
        })
    }
}
