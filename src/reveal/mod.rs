//! Scroll-triggered reveal: elements fade in once as they enter the viewport,
//! optionally staggered within a group, and counters count up once.

pub mod countup;
pub mod stagger;

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::config::SiteConfig;
use crate::dom;
use crate::error::SiteError;
use crate::observer::OneShotWatcher;

use countup::{format_count, CountUp};
use stagger::{css_delay, explicit_delay, transition_delay};

pub const REVEAL_SELECTOR: &str = ".reveal";
pub const GROUP_SELECTOR: &str = ".stagger-group";
pub const COUNTUP_SELECTOR: &str = ".countup";
pub const VISIBLE_CLASS: &str = "is-visible";

pub struct RevealController {
    _reveal: Option<OneShotWatcher>,
    _countup: Option<OneShotWatcher>,
}

impl RevealController {
    pub fn mount(document: &Document, config: &SiteConfig) -> Result<Self, SiteError> {
        let reveal = Self::mount_reveal(document, config)?;
        let countup = Self::mount_countup(document, config)?;
        Ok(Self {
            _reveal: reveal,
            _countup: countup,
        })
    }

    fn mount_reveal(document: &Document, config: &SiteConfig) -> Result<Option<OneShotWatcher>, SiteError> {
        let elements: Vec<HtmlElement> = dom::query_all_in_document(document, REVEAL_SELECTOR);
        if elements.is_empty() {
            return Ok(None);
        }

        let watcher = OneShotWatcher::new(config.reveal_threshold, |element: Element| {
            let _ = element.class_list().add_1(VISIBLE_CLASS);
        })?;

        for element in &elements {
            let explicit = explicit_delay(element.get_attribute("data-delay").as_deref());
            if let Some(ms) = transition_delay(explicit, None, config.stagger_step_ms) {
                set_delay(element, ms);
            }
            watcher.watch(element);
        }

        let groups: Vec<Element> = dom::query_all_in_document(document, GROUP_SELECTOR);
        for group in &groups {
            let members: Vec<HtmlElement> = dom::query_all(group, REVEAL_SELECTOR);
            for (index, element) in members.iter().enumerate() {
                let explicit = explicit_delay(element.get_attribute("data-delay").as_deref());
                // An unparsable or negative data-delay is not an override; the index delay applies.
                if explicit.is_none() {
                    if let Some(ms) = transition_delay(None, Some(index), config.stagger_step_ms) {
                        set_delay(element, ms);
                    }
                }
                watcher.watch(element);
            }
        }

        debug!(
            "Watching {} reveal elements in {} stagger groups",
            watcher.pending(),
            groups.len()
        );
        Ok(Some(watcher))
    }

    fn mount_countup(document: &Document, config: &SiteConfig) -> Result<Option<OneShotWatcher>, SiteError> {
        let elements: Vec<Element> = dom::query_all_in_document(document, COUNTUP_SELECTOR);
        if elements.is_empty() {
            return Ok(None);
        }

        let default_duration = config.countup_duration_ms;
        let watcher = OneShotWatcher::new(config.countup_threshold, move |element: Element| {
            let target = CountUp::parse_target(
                element.get_attribute("data-target").as_deref(),
                element.text_content().as_deref(),
            );
            let duration = explicit_delay(element.get_attribute("data-duration").as_deref())
                .unwrap_or(default_duration);
            if let Err(e) = animate(element, CountUp::new(target, duration)) {
                warn!("Count-up failed to start: {}", e);
            }
        })?;

        for element in &elements {
            watcher.watch(element);
        }
        Ok(Some(watcher))
    }
}

fn set_delay(element: &HtmlElement, ms: u32) {
    let _ = element
        .style()
        .set_property("transition-delay", &css_delay(ms));
}

/// Drives `count` on `element` one animation frame at a time until it
/// reaches its target.
fn animate(element: Element, count: CountUp) -> Result<(), SiteError> {
    let window = dom::window()?;
    let mut started = window.performance().map(|p| p.now());

    let frame: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let next = frame.clone();
    let frame_window = window.clone();

    *frame.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        let start = *started.get_or_insert(now);
        let elapsed = now - start;
        element.set_text_content(Some(&format_count(count.value_at(elapsed))));

        if count.is_finished(elapsed) {
            let _ = next.borrow_mut().take();
            return;
        }
        if let Some(callback) = next.borrow().as_ref() {
            let _ = frame_window.request_animation_frame(callback.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(callback) = frame.borrow().as_ref() {
        window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    }
    Ok(())
}
