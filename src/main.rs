use std::cell::RefCell;

use log::{error, info};

mod a11y;
mod app;
mod config;
mod dom;
mod error;
mod form;
mod lazy;
mod menu;
mod observer;
mod page;
mod reporting;
mod reveal;
mod scroll;

use app::App;

thread_local! {
    // Behaviours live as long as the page.
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting site behaviours");
    match App::mount() {
        Ok(app) => APP.with(|slot| *slot.borrow_mut() = Some(app)),
        Err(e) => error!("Site behaviours not started: {}", e),
    }
}
