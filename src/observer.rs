use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Array, Reflect};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Window};

use crate::error::SiteError;

/// Elements still waiting for their first intersection.
///
/// `take` succeeds exactly once per inserted value, which is what keeps a
/// watcher's handler from running twice for the same element even when the
/// browser batches several entries for it.
#[derive(Debug)]
pub struct Pending<T> {
    items: Vec<T>,
}

impl<T: PartialEq> Pending<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Returns false if `item` was already pending.
    pub fn insert(&mut self, item: T) -> bool {
        if self.items.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn take(&mut self, item: &T) -> bool {
        match self.items.iter().position(|pending| pending == item) {
            Some(index) => {
                self.items.swap_remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: PartialEq> Default for Pending<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Viewport watcher whose subscriptions dispose themselves: the first time a
/// watched element intersects, it is unobserved and then handed to the
/// handler. Dropping the watcher disconnects it.
pub struct OneShotWatcher {
    observer: IntersectionObserver,
    pending: Rc<RefCell<Pending<Element>>>,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl OneShotWatcher {
    pub fn is_supported(window: &Window) -> bool {
        Reflect::has(window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
    }

    pub fn new<F>(threshold: f64, mut on_enter: F) -> Result<Self, SiteError>
    where
        F: FnMut(Element) + 'static,
    {
        let pending = Rc::new(RefCell::new(Pending::new()));

        let callback = {
            let pending = pending.clone();
            Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    if !entry.is_intersecting() {
                        continue;
                    }
                    let target = entry.target();
                    observer.unobserve(&target);
                    let first = pending.borrow_mut().take(&target);
                    if first {
                        on_enter(target);
                    }
                }
                if pending.borrow().is_empty() {
                    observer.disconnect();
                }
            }) as Box<dyn FnMut(Array, IntersectionObserver)>)
        };

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(threshold));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;

        Ok(Self {
            observer,
            pending,
            _callback: callback,
        })
    }

    /// Starts watching `element`. Watching an element twice is a no-op.
    pub fn watch(&self, element: &Element) {
        if self.pending.borrow_mut().insert(element.clone()) {
            self.observer.observe(element);
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }
}

impl Drop for OneShotWatcher {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::Pending;

    #[test]
    fn each_item_is_taken_once() {
        let mut pending = Pending::new();
        assert!(pending.insert(1));
        assert!(pending.insert(2));

        assert!(pending.take(&1));
        assert!(!pending.take(&1));
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn duplicate_insert_is_ignored() {
        let mut pending = Pending::new();
        assert!(pending.insert("a"));
        assert!(!pending.insert("a"));
        assert!(pending.take(&"a"));
        assert!(pending.is_empty());
    }

    #[test]
    fn drains_after_every_item_fires() {
        let mut pending = Pending::new();
        pending.insert('x');
        pending.insert('y');
        assert!(pending.take(&'y'));
        assert!(!pending.is_empty());
        assert!(pending.take(&'x'));
        assert!(pending.is_empty());
    }

    #[test]
    fn unknown_item_is_not_taken() {
        let mut pending: Pending<u8> = Pending::default();
        assert!(!pending.take(&9));
    }
}
