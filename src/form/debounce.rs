use std::cell::RefCell;

use gloo_timers::callback::Timeout;

/// One-slot deferred task: scheduling replaces, and thereby cancels, any task
/// still waiting.
pub struct Debouncer {
    delay_ms: u32,
    pending: RefCell<Option<Timeout>>,
}

impl Debouncer {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            pending: RefCell::new(None),
        }
    }

    pub fn schedule<F>(&self, task: F)
    where
        F: FnOnce() + 'static,
    {
        let timeout = Timeout::new(self.delay_ms, task);
        // Dropping the previous Timeout clears it.
        drop(self.pending.replace(Some(timeout)));
    }

    pub fn cancel(&self) {
        if let Some(timeout) = self.pending.borrow_mut().take() {
            timeout.cancel();
        }
    }
}
