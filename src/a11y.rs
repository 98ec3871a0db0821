//! Keyboard accessibility: focus-outline mode, focus trapping, skip link.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, KeyboardEvent};

use crate::dom::{self, Listener};
use crate::error::SiteError;

pub const KEYBOARD_CLASS: &str = "keyboard-navigation";
pub const FOCUSABLE_SELECTOR: &str =
    "button, [href], input, select, textarea, [tabindex]:not([tabindex=\"-1\"])";
pub const SKIP_LINK_SELECTOR: &str = ".skip-link";

/// Where Tab should move focus inside a trap of `count` focusables, or
/// `None` to let the browser move it normally. Only the ends wrap.
pub fn wrap_focus(count: usize, current: Option<usize>, backwards: bool) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let last = count - 1;
    match (current, backwards) {
        (Some(0), true) => Some(last),
        (Some(index), false) if index == last => Some(0),
        _ => None,
    }
}

/// Adds the keyboard-navigation class to `body` on Tab, drops it on any mouse
/// press, so focus outlines only show for keyboard users.
pub struct KeyboardMode {
    _listeners: [Listener; 2],
}

impl KeyboardMode {
    pub fn mount(document: &Document) -> Result<Self, SiteError> {
        let body = document.body().ok_or(SiteError::NoBody)?;

        let keyboard_body = body.clone();
        let keydown = Listener::new(document, "keydown", move |event| {
            let is_tab = event
                .dyn_ref::<KeyboardEvent>()
                .map_or(false, |e| e.key() == "Tab");
            if is_tab {
                let _ = keyboard_body.class_list().add_1(KEYBOARD_CLASS);
            }
        })?;

        let mousedown = Listener::new(document, "mousedown", move |_| {
            let _ = body.class_list().remove_1(KEYBOARD_CLASS);
        })?;

        Ok(Self {
            _listeners: [keydown, mousedown],
        })
    }
}

/// Keeps Tab / Shift+Tab cycling inside a container until dropped.
pub struct FocusTrap {
    _listener: Listener,
}

impl FocusTrap {
    /// Focusables are collected once, when the trap is installed.
    pub fn install(container: &Element) -> Result<Self, SiteError> {
        let focusables: Vec<HtmlElement> = dom::query_all(container, FOCUSABLE_SELECTOR);
        let listener = Listener::new(container, "keydown", move |event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if key.key() != "Tab" {
                return;
            }
            let active = dom::document().ok().and_then(|d| d.active_element());
            let current = active.and_then(|active| {
                focusables
                    .iter()
                    .position(|el| AsRef::<Element>::as_ref(el) == &active)
            });
            if let Some(next) = wrap_focus(focusables.len(), current, key.shift_key()) {
                let _ = focusables[next].focus();
                event.prevent_default();
            }
        })?;
        Ok(Self { _listener: listener })
    }
}

/// Page-script entry point for dialogs: `const trap = trapFocus(dialog);`
/// keeps focus inside `dialog` until `trap.free()` is called.
#[wasm_bindgen]
pub struct FocusTrapHandle {
    _trap: FocusTrap,
}

#[wasm_bindgen(js_name = trapFocus)]
pub fn trap_focus(container: &Element) -> Result<FocusTrapHandle, JsValue> {
    FocusTrap::install(container)
        .map(|trap| FocusTrapHandle { _trap: trap })
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Skip link that moves focus to `main` rather than only scrolling.
pub struct SkipLink {
    _listener: Listener,
}

impl SkipLink {
    pub fn mount(document: &Document) -> Result<Option<Self>, SiteError> {
        let Some(link) = dom::query_in_document::<Element>(document, SKIP_LINK_SELECTOR) else {
            return Ok(None);
        };
        let skip_document = document.clone();
        let listener = Listener::new(&link, "click", move |event| {
            event.prevent_default();
            if let Some(main) = dom::query_in_document::<HtmlElement>(&skip_document, "main") {
                let _ = main.focus();
            }
        })?;
        Ok(Some(Self { _listener: listener }))
    }
}

#[cfg(test)]
mod tests {
    use super::wrap_focus;

    #[test]
    fn tab_on_last_wraps_to_first() {
        assert_eq!(wrap_focus(4, Some(3), false), Some(0));
    }

    #[test]
    fn shift_tab_on_first_wraps_to_last() {
        assert_eq!(wrap_focus(4, Some(0), true), Some(3));
    }

    #[test]
    fn middle_of_trap_moves_normally() {
        assert_eq!(wrap_focus(4, Some(1), false), None);
        assert_eq!(wrap_focus(4, Some(2), true), None);
        assert_eq!(wrap_focus(4, Some(3), true), None);
        assert_eq!(wrap_focus(4, Some(0), false), None);
    }

    #[test]
    fn single_focusable_keeps_focus() {
        assert_eq!(wrap_focus(1, Some(0), false), Some(0));
        assert_eq!(wrap_focus(1, Some(0), true), Some(0));
    }

    #[test]
    fn focus_outside_or_empty_trap_is_left_alone() {
        assert_eq!(wrap_focus(3, None, false), None);
        assert_eq!(wrap_focus(0, None, true), None);
    }
}
