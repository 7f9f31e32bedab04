use std::rc::Rc;

use log::{debug, info, warn};
use web_sys::{Document, Window};

use crate::bindings::{back_to_top, navigation, newsletter, particles, smooth_scroll};
use crate::config::Config;
use crate::dom::Preferences;
use crate::effects::{active_nav, counter, cursor, reveal};
use crate::error::EnhanceError;
use crate::scheduler::{BrowserScheduler, Scheduler};

/// Installs every enhancement once. Each one stands alone, so a failure is
/// logged and the rest carry on.
pub fn enhance(window: &Window, document: &Document, config: &Config) {
    let prefs = Preferences::detect(window);
    let scheduler: Rc<dyn Scheduler> = Rc::new(BrowserScheduler::new(window.clone()));
    debug!("Preferences: {:?}", prefs);

    if prefs.allows_particles() {
        report("particles", particles::install(document, &config.particles));
    } else {
        debug!("particles: skipped, reduced motion");
    }
    report("navigation", navigation::install(window, document, &config.navigation));
    report("reveal", reveal::install(document, scheduler.clone(), &config.reveal));
    report("counters", counter::install(document, scheduler.clone(), &config.counter));
    report("newsletter", newsletter::install(document, scheduler.clone(), &config.newsletter));
    if prefs.allows_cursor() {
        report("cursor", cursor::install(document, scheduler, &config.cursor));
    } else {
        debug!("cursor: skipped, no hover or reduced motion");
    }
    report("smooth scroll", smooth_scroll::install(document));
    report("active nav", active_nav::install(document, &config.active_nav));
    report("back to top", back_to_top::install(window, document, &config.back_to_top));

    info!("Page enhancements installed");
}

fn report(name: &str, result: Result<(), EnhanceError>) {
    match result {
        Ok(()) => {}
        Err(EnhanceError::Missing(selector)) => debug!("{}: skipped, no {}", name, selector),
        Err(EnhanceError::Unsupported(api)) => debug!("{}: inert, browser has no {}", name, api),
        Err(e) => warn!("{}: {}", name, e),
    }
}
