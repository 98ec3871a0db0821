use log::{debug, error, info};

use crate::a11y::{KeyboardMode, SkipLink};
use crate::config::SiteConfig;
use crate::dom;
use crate::error::SiteError;
use crate::form::ContactForm;
use crate::lazy::LazyImages;
use crate::menu::MobileMenu;
use crate::page::{self, LoadTiming};
use crate::reporting::ErrorReporter;
use crate::reveal::RevealController;
use crate::scroll::SmoothScroll;

/// Every behaviour mounted on the page. Dropping it detaches them all.
pub struct App {
    _reporter: Option<ErrorReporter>,
    _reveal: Option<RevealController>,
    _menu: Option<MobileMenu>,
    _form: Option<ContactForm>,
    _scroll: Option<SmoothScroll>,
    _lazy: Option<LazyImages>,
    _keyboard: Option<KeyboardMode>,
    _skip_link: Option<SkipLink>,
    _load_timing: Option<LoadTiming>,
}

impl App {
    /// Mounts each behaviour independently; one that fails to mount is logged
    /// and skipped.
    pub fn mount() -> Result<Self, SiteError> {
        let window = dom::window()?;
        let document = window.document().ok_or(SiteError::NoDocument)?;
        let config = SiteConfig::load(&document);
        debug!("Site config: {:?}", config);

        let reporter = mounted("error reporter", ErrorReporter::mount(&window));

        page::stamp_year(&document);
        let reveal = mounted("reveal", RevealController::mount(&document, &config));

        let app = Self {
            _reporter: reporter,
            _reveal: reveal,
            _menu: mounted_if_present("mobile menu", MobileMenu::mount(&document, &config)),
            _form: mounted_if_present("contact form", ContactForm::mount(&document, &config)),
            _scroll: mounted("smooth scroll", SmoothScroll::mount(&document, &config)),
            _lazy: mounted_if_present("lazy images", LazyImages::mount(&window, &document)),
            _keyboard: mounted("keyboard mode", KeyboardMode::mount(&document)),
            _skip_link: mounted_if_present("skip link", SkipLink::mount(&document)),
            _load_timing: mounted("load timing", LoadTiming::mount(&window, &document)),
        };
        info!("Site behaviours mounted");
        Ok(app)
    }
}

fn mounted<T>(name: &str, result: Result<T, SiteError>) -> Option<T> {
    result
        .map_err(|e| error!("Failed to mount {}: {}", name, e))
        .ok()
}

fn mounted_if_present<T>(name: &str, result: Result<Option<T>, SiteError>) -> Option<T> {
    match mounted(name, result).flatten() {
        Some(component) => Some(component),
        None => {
            debug!("Skipping {}", name);
            None
        }
    }
}
