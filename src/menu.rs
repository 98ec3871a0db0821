use std::cell::Cell;
use std::rc::Rc;

use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, EventTarget, HtmlElement, KeyboardEvent, Node};

use crate::config::{SiteConfig, SiteText};
use crate::dom::{self, Listener};
use crate::error::SiteError;

pub const TOGGLE_SELECTOR: &str = ".mobile-menu-btn";
pub const NAV_SELECTOR: &str = ".nav";
pub const NAV_LINK_SELECTOR: &str = ".nav-link";
pub const ACTIVE_CLASS: &str = "active";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Closed,
    Open,
}

/// Events that close an open menu.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CloseTrigger {
    NavLink,
    Escape,
    Click { inside_nav: bool, inside_toggle: bool },
    Resize { width: f64 },
}

/// Every observable attribute of a menu state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuView<'a> {
    pub aria_expanded: &'static str,
    pub aria_label: &'a str,
    pub nav_active: bool,
    pub body_overflow: &'static str,
}

impl MenuState {
    pub fn toggled(self) -> Self {
        match self {
            MenuState::Closed => MenuState::Open,
            MenuState::Open => MenuState::Closed,
        }
    }

    /// State after `trigger`, or `None` when it causes no transition.
    pub fn close_on(self, trigger: CloseTrigger, breakpoint_px: f64) -> Option<Self> {
        if self == MenuState::Closed {
            return None;
        }
        let closes = match trigger {
            CloseTrigger::NavLink | CloseTrigger::Escape => true,
            CloseTrigger::Click { inside_nav, inside_toggle } => !inside_nav && !inside_toggle,
            CloseTrigger::Resize { width } => width >= breakpoint_px,
        };
        closes.then_some(MenuState::Closed)
    }

    pub fn view(self, text: &SiteText) -> MenuView<'_> {
        match self {
            MenuState::Closed => MenuView {
                aria_expanded: "false",
                aria_label: &text.menu_open_label,
                nav_active: false,
                body_overflow: "",
            },
            MenuState::Open => MenuView {
                aria_expanded: "true",
                aria_label: &text.menu_close_label,
                nav_active: true,
                body_overflow: "hidden",
            },
        }
    }
}

struct MenuDom {
    toggle: Element,
    nav: Element,
    body: HtmlElement,
    text: SiteText,
    breakpoint_px: f64,
    state: Cell<MenuState>,
}

impl MenuDom {
    fn render(&self, state: MenuState) {
        let view = state.view(&self.text);
        let _ = self.toggle.set_attribute("aria-expanded", view.aria_expanded);
        let _ = self.toggle.set_attribute("aria-label", view.aria_label);
        let _ = self
            .nav
            .class_list()
            .toggle_with_force(ACTIVE_CLASS, view.nav_active);
        let _ = self.body.style().set_property("overflow", view.body_overflow);
        self.state.set(state);
    }

    fn toggle(&self) {
        let next = self.state.get().toggled();
        debug!("Mobile menu {:?}", next);
        self.render(next);
    }

    fn close_on(&self, trigger: CloseTrigger) {
        if let Some(next) = self.state.get().close_on(trigger, self.breakpoint_px) {
            debug!("Mobile menu closed by {:?}", trigger);
            self.render(next);
        }
    }

    fn contains(&self, node: Option<&Node>) -> (bool, bool) {
        (self.nav.contains(node), self.toggle.contains(node))
    }
}

/// Mobile navigation toggle. Not mounted when the page has no toggle or nav.
pub struct MobileMenu {
    _listeners: Vec<Listener>,
}

impl MobileMenu {
    pub fn mount(document: &Document, config: &SiteConfig) -> Result<Option<Self>, SiteError> {
        let (Some(toggle), Some(nav)) = (
            dom::query_in_document::<Element>(document, TOGGLE_SELECTOR),
            dom::query_in_document::<Element>(document, NAV_SELECTOR),
        ) else {
            return Ok(None);
        };
        let body = document.body().ok_or(SiteError::NoBody)?;
        let window = dom::window()?;

        let initial = if toggle.get_attribute("aria-expanded").as_deref() == Some("true") {
            MenuState::Open
        } else {
            MenuState::Closed
        };
        let menu = Rc::new(MenuDom {
            toggle: toggle.clone(),
            nav: nav.clone(),
            body,
            text: config.text.clone(),
            breakpoint_px: config.desktop_breakpoint_px,
            state: Cell::new(initial),
        });

        let mut listeners = Vec::new();

        {
            let menu = menu.clone();
            listeners.push(Listener::new(&toggle, "click", move |_| menu.toggle())?);
        }

        for link in dom::query_all_in_document::<Element>(document, NAV_LINK_SELECTOR) {
            let menu = menu.clone();
            listeners.push(Listener::new(&link, "click", move |_| {
                menu.close_on(CloseTrigger::NavLink)
            })?);
        }

        {
            let menu = menu.clone();
            listeners.push(Listener::new(document, "keydown", move |event| {
                let is_escape = event
                    .dyn_ref::<KeyboardEvent>()
                    .map_or(false, |e| e.key() == "Escape");
                if is_escape {
                    menu.close_on(CloseTrigger::Escape);
                }
            })?);
        }

        {
            let menu = menu.clone();
            listeners.push(Listener::new(document, "click", move |event| {
                let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
                let (inside_nav, inside_toggle) = menu.contains(target.as_ref());
                menu.close_on(CloseTrigger::Click { inside_nav, inside_toggle });
            })?);
        }

        {
            let menu = menu.clone();
            let resize_window = window.clone();
            let target: &EventTarget = window.as_ref();
            listeners.push(Listener::new(target, "resize", move |_| {
                if let Some(width) = resize_window.inner_width().ok().and_then(|w| w.as_f64()) {
                    menu.close_on(CloseTrigger::Resize { width });
                }
            })?);
        }

        Ok(Some(Self {
            _listeners: listeners,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BREAKPOINT: f64 = 768.0;

    #[test]
    fn toggling_twice_restores_closed_view() {
        let text = SiteText::default();
        let closed = MenuState::Closed.view(&text);
        let state = MenuState::Closed.toggled().toggled();
        assert_eq!(state, MenuState::Closed);
        assert_eq!(state.view(&text), closed);
    }

    #[test]
    fn open_view_locks_scroll_and_offers_close() {
        let text = SiteText::default();
        let view = MenuState::Open.view(&text);
        assert_eq!(view.aria_expanded, "true");
        assert_eq!(view.aria_label, text.menu_close_label);
        assert!(view.nav_active);
        assert_eq!(view.body_overflow, "hidden");
    }

    #[test]
    fn close_triggers_only_act_on_open_menu() {
        for trigger in [
            CloseTrigger::NavLink,
            CloseTrigger::Escape,
            CloseTrigger::Click { inside_nav: false, inside_toggle: false },
            CloseTrigger::Resize { width: 1024.0 },
        ] {
            assert_eq!(MenuState::Closed.close_on(trigger, BREAKPOINT), None);
            assert_eq!(MenuState::Open.close_on(trigger, BREAKPOINT), Some(MenuState::Closed));
        }
    }

    #[test]
    fn clicks_inside_menu_or_toggle_keep_it_open() {
        let open = MenuState::Open;
        let inside_nav = CloseTrigger::Click { inside_nav: true, inside_toggle: false };
        let on_toggle = CloseTrigger::Click { inside_nav: false, inside_toggle: true };
        assert_eq!(open.close_on(inside_nav, BREAKPOINT), None);
        assert_eq!(open.close_on(on_toggle, BREAKPOINT), None);
    }

    #[test]
    fn resize_closes_from_breakpoint_up() {
        let open = MenuState::Open;
        assert_eq!(open.close_on(CloseTrigger::Resize { width: 767.0 }, BREAKPOINT), None);
        assert_eq!(
            open.close_on(CloseTrigger::Resize { width: 768.0 }, BREAKPOINT),
            Some(MenuState::Closed)
        );
    }
}
